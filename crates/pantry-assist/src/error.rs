//! Errors raised while talking to an external collaborator.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssistError {
    /// The service has no API key.
    #[error("{0} API is not configured")]
    NotConfigured(&'static str),

    /// The request never produced an HTTP response (DNS, TLS, timeout).
    #[error("{service} request failed: {message}")]
    Http {
        service: &'static str,
        message: String,
    },

    /// The service answered with a non-success status.
    #[error("{service} API error ({status}): {message}")]
    Api {
        service: &'static str,
        status: u16,
        message: String,
    },

    /// The response could not be understood.
    #[error("Malformed {service} response: {message}")]
    MalformedResponse {
        service: &'static str,
        message: String,
    },

    /// Nothing is in the inventory to build a request from.
    #[error("No items in inventory. Add some items first.")]
    EmptyInventory,
}

impl AssistError {
    pub(crate) fn http(service: &'static str, err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "timed out".to_string()
        } else {
            err.without_url().to_string()
        };
        AssistError::Http { service, message }
    }

    pub(crate) fn malformed(service: &'static str, message: impl Into<String>) -> Self {
        AssistError::MalformedResponse {
            service,
            message: message.into(),
        }
    }
}

pub type AssistResult<T> = Result<T, AssistError>;
