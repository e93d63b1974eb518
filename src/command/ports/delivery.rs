//! Reply delivery port.
//!
//! Delivery is at-most-once: the executor calls [`ReplyDelivery::deliver`]
//! exactly once per dispatched command and only logs failures.

use async_trait::async_trait;
use thiserror::Error;

use crate::command::domain::BlockMessage;

/// Result type for delivery operations.
pub type DeliveryResult<T> = Result<T, DeliveryError>;

/// Posts a reply to the response URL carried by a request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReplyDelivery: Send + Sync {
    /// Posts `message` as JSON to `response_url`.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError`] if the request could not be sent or the
    /// callback answered with a non-success status.
    async fn deliver(&self, response_url: &str, message: &BlockMessage) -> DeliveryResult<()>;
}

/// Errors returned by delivery adapters.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeliveryError {
    /// The request never produced a response.
    #[error("reply delivery failed: {0}")]
    Transport(String),

    /// The callback rejected the reply.
    #[error("callback answered {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for the log.
        body: String,
    },
}
