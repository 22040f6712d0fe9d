//! Response URL HTTP client.

use crate::error::ResponseClientError;
use async_trait::async_trait;
use reqwest::Client;
use slash_commands::{DeliveryError, ResponseSink, SlashResponse};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Posts slash-command replies to the `response_url` of an earlier request.
///
/// Cloning is cheap; clones share one connection pool.
#[derive(Clone)]
pub struct ResponseClient {
    client: Client,
}

impl ResponseClient {
    /// Create a new response client with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self, ResponseClientError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client })
    }

    /// Post a reply as JSON to `response_url`.
    #[instrument(skip(self, response))]
    pub async fn post(
        &self,
        response_url: &str,
        response: &SlashResponse,
    ) -> Result<(), ResponseClientError> {
        let http_response = self
            .client
            .post(response_url)
            .header("Content-Type", "application/json")
            .json(response)
            .send()
            .await?;

        let status = http_response.status();
        if !status.is_success() {
            let message = http_response.text().await.unwrap_or_default();
            warn!("Reply rejected: {} - {}", status, message);
            return Err(ResponseClientError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        debug!("Posted reply ({})", status);
        Ok(())
    }
}

#[async_trait]
impl ResponseSink for ResponseClient {
    async fn deliver(
        &self,
        response_url: &str,
        response: &SlashResponse,
    ) -> Result<(), DeliveryError> {
        self.post(response_url, response).await.map_err(Into::into)
    }
}
