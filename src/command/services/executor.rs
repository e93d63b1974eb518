//! Background execution of dispatched commands.
//!
//! The router hands every accepted request to [`Executor::dispatch`] and
//! returns its acknowledgement immediately. The spawned unit of work runs
//! the handler, normalises its reply and posts it to the response URL
//! exactly once. Nothing it does can reach the HTTP response.

use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::Instrument;
use uuid::Uuid;

use crate::command::{
    domain::{BlockMessage, CommandArgs, Reply, ResponseType, SlashRequest, help},
    ports::{CommandHandler, ReplyDelivery, RequestObserver},
};

/// One accepted command, ready to run.
#[derive(Clone)]
pub struct Job {
    /// Command name, for logging.
    pub command: String,
    /// Handler to invoke.
    pub handler: Arc<dyn CommandHandler>,
    /// Parsed, ordinal-ordered arguments.
    pub args: CommandArgs,
    /// Visibility of the delivered reply.
    pub response_type: ResponseType,
    /// Callback URL from the request.
    pub response_url: String,
    /// Correlates the log lines of one dispatch.
    pub dispatch_id: Uuid,
}

/// Spawns and runs command jobs on a tokio runtime.
pub struct Executor<D> {
    delivery: Arc<D>,
    runtime: Handle,
    contact: Option<String>,
}

impl<D> Clone for Executor<D> {
    fn clone(&self) -> Self {
        Self {
            delivery: Arc::clone(&self.delivery),
            runtime: self.runtime.clone(),
            contact: self.contact.clone(),
        }
    }
}

impl<D> Executor<D>
where
    D: ReplyDelivery + 'static,
{
    /// Creates an executor that spawns on `runtime` and delivers through
    /// `delivery`.
    #[must_use]
    pub const fn new(delivery: Arc<D>, runtime: Handle) -> Self {
        Self {
            delivery,
            runtime,
            contact: None,
        }
    }

    /// Sets the operator contact appended to the apology message.
    #[must_use]
    pub fn with_contact(mut self, contact: Option<String>) -> Self {
        self.contact = contact;
        self
    }

    /// Returns the delivery adapter.
    #[must_use]
    pub const fn delivery(&self) -> &Arc<D> {
        &self.delivery
    }

    /// Runs `job` in the background. Nobody waits for it.
    pub fn dispatch(&self, job: Job) {
        let executor = self.clone();
        self.runtime.spawn(async move { executor.run(job).await });
    }

    /// Runs the handler and delivers its reply.
    ///
    /// A handler error or panic is logged in full and replaced by a generic
    /// apology. Delivery failures are logged and never retried.
    pub async fn run(&self, job: Job) {
        let Job {
            command,
            handler,
            args,
            response_type,
            response_url,
            dispatch_id,
        } = job;
        let span = tracing::info_span!("command", %command, %dispatch_id);

        async move {
            let outcome = self
                .runtime
                .spawn(async move { handler.call(args).await })
                .await;
            let message = match outcome {
                Ok(Ok(reply)) => reply.into_message(response_type),
                Ok(Err(err)) => {
                    tracing::error!(error = %err, "command handler failed");
                    self.apology()
                }
                Err(err) => {
                    tracing::error!(error = %err, "command handler panicked");
                    self.apology()
                }
            };

            match self.delivery.deliver(&response_url, &message).await {
                Ok(()) => tracing::debug!("reply delivered"),
                Err(err) => tracing::error!(error = %err, %response_url, "reply delivery failed"),
            }
        }
        .instrument(span)
        .await;
    }

    fn apology(&self) -> BlockMessage {
        Reply::text(help::apology(self.contact.as_deref())).into_message(ResponseType::Ephemeral)
    }

    /// Runs every observer on `request` in the background.
    pub fn observe(&self, observers: &[Arc<dyn RequestObserver>], request: &SlashRequest) {
        for registered in observers {
            let observer = Arc::clone(registered);
            let owned = request.clone();
            let runtime = self.runtime.clone();
            self.runtime.spawn(async move {
                let outcome = runtime
                    .spawn(async move { observer.observe(&owned).await })
                    .await;
                if let Err(err) = outcome {
                    tracing::error!(error = %err, "request observer panicked");
                }
            });
        }
    }
}
