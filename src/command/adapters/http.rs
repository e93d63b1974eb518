//! HTTP implementation of the [`ReplyDelivery`] port.

use std::time::Duration;

use async_trait::async_trait;

use crate::command::{
    domain::BlockMessage,
    ports::delivery::{DeliveryError, DeliveryResult, ReplyDelivery},
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts replies as JSON to the response URL of the originating request.
///
/// The callback is attempted once; non-success statuses are reported as
/// [`DeliveryError::Status`] with the response body for the log.
#[derive(Debug, Clone)]
pub struct HttpReplyDelivery {
    client: reqwest::Client,
}

impl HttpReplyDelivery {
    /// Wraps an existing client.
    #[must_use]
    pub const fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Builds a client with a request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::Transport`] if the TLS backend cannot be
    /// initialised.
    pub fn with_timeout(timeout: Duration) -> DeliveryResult<Self> {
        reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map(Self::new)
            .map_err(|err| DeliveryError::Transport(err.to_string()))
    }

    /// Builds a client with the default ten second timeout.
    ///
    /// # Errors
    ///
    /// See [`Self::with_timeout`].
    pub fn with_default_timeout() -> DeliveryResult<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl ReplyDelivery for HttpReplyDelivery {
    async fn deliver(&self, response_url: &str, message: &BlockMessage) -> DeliveryResult<()> {
        let response = self
            .client
            .post(response_url)
            .json(message)
            .send()
            .await
            .map_err(|err| DeliveryError::Transport(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(DeliveryError::Status {
            status: status.as_u16(),
            body,
        })
    }
}
