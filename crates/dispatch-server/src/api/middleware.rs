//! Rate limiting and request logging.

use crate::error::ServerError;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::{num::NonZeroU32, sync::Arc, time::Instant};
use tracing::{debug, warn};

/// One quota shared by every slash-command webhook, whoever sends it.
pub type GlobalLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Command quota shared across requests. `/health` is never counted.
#[derive(Clone)]
pub struct RateLimitState {
    pub global: Arc<GlobalLimiter>,
}

impl RateLimitState {
    /// Allow a burst of `commands_per_minute` commands, refilled evenly over
    /// a minute. `0` lifts the quota entirely.
    pub fn new(commands_per_minute: u32) -> Self {
        let per_minute = NonZeroU32::new(commands_per_minute).unwrap_or(NonZeroU32::MAX);

        Self {
            global: Arc::new(RateLimiter::direct(Quota::per_minute(per_minute))),
        }
    }

    /// No quota; used by routers built without an explicit limit.
    pub fn permissive() -> Self {
        Self::new(0)
    }

    /// Take one command from the quota.
    pub fn check(&self) -> Result<(), ServerError> {
        self.global
            .check()
            .map_err(|_| ServerError::RateLimitExceeded)
    }
}

/// Turn away command webhooks once the quota is spent. The integration sees
/// a `429` instead of a reply.
pub async fn rate_limit_middleware(
    State(rate_limit): State<RateLimitState>,
    request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    if let Err(e) = rate_limit.check() {
        warn!(uri = %request.uri(), "Command quota exhausted");
        return Err(e);
    }

    Ok(next.run(request).await)
}

/// Log method, path, status and latency of every request. Only the path is
/// recorded; query strings never reach the logs.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    if status.is_success() {
        debug!(%method, %path, %status, ?latency, "Webhook handled");
    } else if status == StatusCode::TOO_MANY_REQUESTS {
        debug!(%method, %path, ?latency, "Webhook throttled");
    } else {
        warn!(%method, %path, %status, ?latency, "Webhook failed");
    }

    response
}
