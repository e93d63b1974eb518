//! Request observer port.

use async_trait::async_trait;

use crate::command::domain::SlashRequest;

/// Sees every authenticated, well-formed request before it is routed.
///
/// Observers run in the background and cannot influence routing.
#[async_trait]
pub trait RequestObserver: Send + Sync {
    /// Observes one request.
    async fn observe(&self, request: &SlashRequest);
}
