//! Process configuration.
//!
//! Every option can be given on the command line or through the
//! environment. Validation happens once at startup: a process that cannot
//! authenticate requests or whose commands fail to register never starts
//! serving.

use std::net::SocketAddr;

use clap::Parser;
use thiserror::Error;

use crate::auth::{Authenticator, MissingSigningSecret};
use crate::command::domain::{BlockMessage, RegistrationError, ResponseType};
use crate::command::ports::DeliveryError;
use crate::command::services::RouterSettings;
use crate::telemetry::LogFormat;

/// Fatal startup errors.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// No signing secret outside trusted mode.
    #[error(transparent)]
    MissingSigningSecret(#[from] MissingSigningSecret),

    /// The listen address does not parse.
    #[error("invalid listen address '{address}': {reason}")]
    InvalidListenAddress {
        /// Configured value.
        address: String,
        /// Parse error.
        reason: String,
    },

    /// A command failed to register.
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// The reply delivery client could not be built.
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

/// Slash-command server options.
#[derive(Debug, Clone, Parser)]
#[command(name = "slash_server", version, about = "Serve slash commands over HTTP")]
pub struct ServerConfig {
    /// Address to listen on.
    #[arg(long, env = "SLASHBIND_LISTEN", default_value = "127.0.0.1:9002")]
    pub listen: String,

    /// Path of the slash-command endpoint.
    #[arg(long, env = "SLASHBIND_PATH", default_value = "/slash")]
    pub path: String,

    /// Secret used to verify request signatures.
    #[arg(long, env = "SLACK_SIGNING_SECRET", hide_env_values = true)]
    pub signing_secret: Option<String>,

    /// Trust every request without checking signatures.
    #[arg(long, env = "SLASHBIND_DEV")]
    pub dev: bool,

    /// Description shown in the global help.
    #[arg(long, env = "SLASHBIND_DESCRIPTION")]
    pub description: Option<String>,

    /// Contact appended to the error apology.
    #[arg(long, env = "SLASHBIND_CONTACT")]
    pub contact: Option<String>,

    /// Text returned in the channel when a command is accepted.
    #[arg(long, env = "SLASHBIND_ACKNOWLEDGE")]
    pub acknowledge: Option<String>,

    /// Log output format.
    #[arg(long, env = "SLASHBIND_LOG_FORMAT", value_enum, default_value_t)]
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Parses the listen address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidListenAddress`] if the address
    /// does not parse.
    pub fn listen_address(&self) -> Result<SocketAddr, ConfigurationError> {
        self.listen
            .parse()
            .map_err(|err: std::net::AddrParseError| ConfigurationError::InvalidListenAddress {
                address: self.listen.clone(),
                reason: err.to_string(),
            })
    }

    /// Chooses the request authenticator.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingSigningSecret`] when not in
    /// development mode and no secret is configured.
    pub fn authenticator(&self) -> Result<Authenticator, ConfigurationError> {
        Ok(Authenticator::from_settings(
            self.dev,
            self.signing_secret.as_deref(),
        )?)
    }

    /// Builds the router settings.
    #[must_use]
    pub fn router_settings(&self) -> RouterSettings {
        RouterSettings {
            description: self.description.clone(),
            contact: self.contact.clone(),
            acknowledgement: self
                .acknowledge
                .as_deref()
                .map(|text| BlockMessage::text(text, ResponseType::InChannel)),
        }
    }
}
