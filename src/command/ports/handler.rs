//! Command handler port.

use std::future::Future;

use async_trait::async_trait;

use crate::command::domain::{CommandArgs, HandlerError, Reply};

/// Result type for command handlers.
pub type HandlerResult = Result<Reply, HandlerError>;

/// Executes one registered command.
///
/// Handlers run in the background after the request has been acknowledged.
/// An error or panic is logged and replaced with a generic apology; the
/// details never reach the user.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Runs the command with its parsed arguments.
    async fn call(&self, args: CommandArgs) -> HandlerResult;
}

#[async_trait]
impl<F, Fut> CommandHandler for F
where
    F: Fn(CommandArgs) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    async fn call(&self, args: CommandArgs) -> HandlerResult {
        self(args).await
    }
}
