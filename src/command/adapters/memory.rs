//! In-memory implementation of the [`ReplyDelivery`] port.
//!
//! Records every delivered message instead of posting it. Suitable for
//! tests and the local demo only.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::command::{
    domain::BlockMessage,
    ports::delivery::{DeliveryError, DeliveryResult, ReplyDelivery},
};

/// One recorded delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveredReply {
    /// Response URL the reply was addressed to.
    pub response_url: String,
    /// Posted payload.
    pub message: BlockMessage,
}

/// Recording implementation of [`ReplyDelivery`].
///
/// Clones share the same record, so a test can keep one handle while the
/// executor owns another.
#[derive(Debug, Default, Clone)]
pub struct InMemoryReplyDelivery {
    delivered: Arc<RwLock<Vec<DeliveredReply>>>,
    notify: Arc<Notify>,
    failure: Option<DeliveryError>,
}

impl InMemoryReplyDelivery {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a recorder that records every reply and then reports
    /// `failure`.
    #[must_use]
    pub fn failing_with(failure: DeliveryError) -> Self {
        Self {
            failure: Some(failure),
            ..Self::default()
        }
    }

    /// Returns a snapshot of the recorded replies in delivery order.
    ///
    /// Returns an empty list if the internal lock is poisoned.
    #[must_use]
    pub fn delivered(&self) -> Vec<DeliveredReply> {
        self.delivered
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Returns the number of recorded replies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.delivered.read().map(|guard| guard.len()).unwrap_or(0)
    }

    /// Returns `true` if nothing has been delivered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Waits until at least `count` replies are recorded or `timeout`
    /// elapses, and returns the replies recorded so far.
    pub async fn wait_for(&self, count: usize, timeout: Duration) -> Vec<DeliveredReply> {
        let wait = async {
            loop {
                let notified = self.notify.notified();
                if self.len() >= count {
                    break;
                }
                notified.await;
            }
        };
        if tokio::time::timeout(timeout, wait).await.is_err() {
            tracing::debug!(count, "timed out waiting for replies");
        }
        self.delivered()
    }
}

#[async_trait]
impl ReplyDelivery for InMemoryReplyDelivery {
    async fn deliver(&self, response_url: &str, message: &BlockMessage) -> DeliveryResult<()> {
        self.delivered
            .write()
            .map_err(|err| DeliveryError::Transport(err.to_string()))?
            .push(DeliveredReply {
                response_url: response_url.to_owned(),
                message: message.clone(),
            });
        self.notify.notify_waiters();
        self.failure.clone().map_or(Ok(()), Err)
    }
}
