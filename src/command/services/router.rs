//! Request routing.
//!
//! [`Router::handle`] turns one inbound request into a [`Disposition`]
//! synchronously:
//!
//! 1. authenticate the raw body against the signature headers
//! 2. decode the form (an SSL probe is answered with an empty 200)
//! 3. hand the request to the observers
//! 4. tokenize the text and route it to global help, command help, a
//!    rejection, or a dispatched job
//!
//! Only the dispatched job runs after the response has been produced.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use uuid::Uuid;

use super::{Executor, Job, Registry};
use crate::auth::Authenticator;
use crate::command::{
    domain::{BlockMessage, CommandLine, InboundForm, ResponseType, SlashRequest, help},
    ports::{ReplyDelivery, RequestObserver},
};

const HELP_COMMAND: &str = "help";

/// Process-wide texts and defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouterSettings {
    /// App description shown in the global help.
    pub description: Option<String>,
    /// Operator contact appended to the apology message.
    pub contact: Option<String>,
    /// Body returned when a command is dispatched; empty when absent.
    pub acknowledgement: Option<BlockMessage>,
}

/// The synchronous outcome of one inbound request.
#[derive(Debug, Clone, PartialEq)]
pub enum Disposition {
    /// Accepted; background work, if any, has been scheduled.
    Ack(Option<BlockMessage>),
    /// Help or rejection text rendered for the user.
    Message(BlockMessage),
    /// Signature verification failed.
    Forbidden,
    /// The form could not be decoded.
    Unprocessable,
}

impl Disposition {
    /// HTTP status code for the inbound response.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Ack(_) | Self::Message(_) => 200,
            Self::Forbidden => 403,
            Self::Unprocessable => 422,
        }
    }

    /// Short diagnostic for rejected requests.
    #[must_use]
    pub const fn detail(&self) -> Option<&'static str> {
        match self {
            Self::Ack(_) | Self::Message(_) => None,
            Self::Forbidden => Some("Invalid request signature."),
            Self::Unprocessable => Some("Validation of request body failed."),
        }
    }
}

/// Routes inbound slash-command requests.
pub struct Router<D, C = DefaultClock> {
    registry: Arc<Registry>,
    authenticator: Authenticator<C>,
    executor: Executor<D>,
    settings: RouterSettings,
    observers: Vec<Arc<dyn RequestObserver>>,
}

impl<D, C> Router<D, C>
where
    D: ReplyDelivery + 'static,
    C: Clock + Send + Sync,
{
    /// Creates a router over a finalised registry.
    #[must_use]
    pub fn new(
        registry: Arc<Registry>,
        authenticator: Authenticator<C>,
        executor: Executor<D>,
    ) -> Self {
        Self {
            registry,
            authenticator,
            executor,
            settings: RouterSettings::default(),
            observers: Vec::new(),
        }
    }

    /// Applies process-wide settings.
    #[must_use]
    pub fn with_settings(mut self, settings: RouterSettings) -> Self {
        self.executor = self.executor.with_contact(settings.contact.clone());
        self.settings = settings;
        self
    }

    /// Adds an observer run for every authenticated, well-formed request.
    #[must_use]
    pub fn with_observer(mut self, observer: impl RequestObserver + 'static) -> Self {
        self.observers.push(Arc::new(observer));
        self
    }

    /// Returns the registry.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Returns the settings.
    #[must_use]
    pub const fn settings(&self) -> &RouterSettings {
        &self.settings
    }

    /// Handles one raw inbound request.
    #[must_use]
    pub fn handle(
        &self,
        body: &[u8],
        timestamp: Option<&str>,
        signature: Option<&str>,
    ) -> Disposition {
        if !self.authenticator.authenticate(body, timestamp, signature) {
            tracing::warn!("rejected request with invalid signature");
            return Disposition::Forbidden;
        }

        let request = match InboundForm::decode(body) {
            Ok(InboundForm::SslCheck) => return Disposition::Ack(None),
            Ok(InboundForm::Command(request)) => request,
            Err(err) => {
                tracing::error!(error = %err, "rejected malformed request");
                return Disposition::Unprocessable;
            }
        };

        self.executor.observe(&self.observers, &request);
        self.route(request)
    }

    /// Routes an authenticated, decoded request.
    #[must_use]
    pub fn route(&self, request: SlashRequest) -> Disposition {
        let line = CommandLine::tokenize(&request.text);
        let (global, flags) = line.split_flags();
        let trigger = request.command.as_str();

        if line.command().eq_ignore_ascii_case(HELP_COMMAND)
            || (line.command().is_empty() && global.help)
        {
            tracing::debug!(%trigger, "rendering global help");
            let text = help::global_help(
                trigger,
                self.settings.description.as_deref(),
                self.registry.iter().map(super::Command::help_entry),
            );
            return message(text, ResponseType::from_visible(global.visible));
        }

        let Some(command) = self.registry.get(line.command()) else {
            tracing::debug!(%trigger, command = line.command(), "unknown command");
            return message(
                help::command_not_found(trigger, request.text.trim()),
                ResponseType::Ephemeral,
            );
        };

        if global.help {
            tracing::debug!(%trigger, command = command.name(), "rendering command help");
            return message(
                help::command_help(trigger, &command.help_entry()),
                ResponseType::from_visible(global.visible),
            );
        }

        let values = match command.schema().parse_arguments(line.args()) {
            Ok(values) => values,
            Err(reason) => {
                tracing::debug!(command = command.name(), %reason, "invalid arguments");
                return message(
                    help::invalid_arguments(trigger, request.text.trim(), command.name()),
                    ResponseType::Ephemeral,
                );
            }
        };

        let dispatch_id = Uuid::new_v4();
        let response_url = request.response_url.clone();
        let args = command.schema().assemble(values, &flags, request);
        tracing::info!(command = command.name(), %dispatch_id, "dispatching command");
        self.executor.dispatch(Job {
            command: command.name().to_owned(),
            handler: command.handler(),
            args,
            response_type: ResponseType::from_visible(global.visible),
            response_url,
            dispatch_id,
        });

        Disposition::Ack(
            command
                .acknowledgement()
                .or(self.settings.acknowledgement.as_ref())
                .cloned(),
        )
    }
}

fn message(text: String, response_type: ResponseType) -> Disposition {
    Disposition::Message(BlockMessage::text(text, response_type))
}
