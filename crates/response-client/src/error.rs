//! Response client errors.

use slash_commands::DeliveryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResponseClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Response URL rejected the reply: {status} - {message}")]
    Rejected { status: u16, message: String },
}

impl From<ResponseClientError> for DeliveryError {
    fn from(e: ResponseClientError) -> Self {
        match e {
            ResponseClientError::Http(e) => DeliveryError::Transport(e.to_string()),
            ResponseClientError::Rejected { status, message } => DeliveryError::Rejected {
                status,
                body: message,
            },
        }
    }
}
