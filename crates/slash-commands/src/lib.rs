//! Slash-command dispatch.
//!
//! Verifies the integration token, enforces per-command channel
//! allow-lists, answers `help` requests, runs the command and turns every
//! outcome into a [`SlashResponse`]. Slow commands can acknowledge right
//! away and post their real reply to the request's `response_url` later.

mod command;
mod delivery;
mod dispatcher;
mod error;
mod registry;
mod types;

pub use command::{Command, CommandHandler, DeferredReply, PendingResponse, Reply};
pub use delivery::{DeferredDelivery, ResponseSink};
pub use dispatcher::Dispatcher;
pub use error::{DeliveryError, DispatchError, RegistryError};
pub use registry::CommandRegistry;
pub use types::*;
