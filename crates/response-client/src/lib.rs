//! Client for posting deferred slash-command replies.

mod client;
mod error;

pub use client::ResponseClient;
pub use error::ResponseClientError;
