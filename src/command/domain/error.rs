//! Error types for command registration and handler execution.

use thiserror::Error;

/// Errors raised while registering a command.
///
/// These are startup-time configuration errors: a registry is never built
/// from a command that produced one.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistrationError {
    /// The command name is already registered.
    #[error("the command '{0}' has already been registered")]
    DuplicateCommand(String),

    /// The command name is empty or contains whitespace.
    #[error("invalid command name '{0}'")]
    InvalidCommandName(String),

    /// The command name is reserved by the router.
    #[error("the command name '{0}' is reserved")]
    ReservedCommandName(String),

    /// Two parameters share a name.
    #[error("command '{command}' declares parameter '{parameter}' twice")]
    DuplicateParameter {
        /// Command name.
        command: String,
        /// Repeated parameter name.
        parameter: String,
    },

    /// More than one parameter asks for the request context.
    #[error("command '{command}' declares a second request parameter '{parameter}'")]
    MultipleContextParameters {
        /// Command name.
        command: String,
        /// Name of the second context parameter.
        parameter: String,
    },

    /// A positional argument follows a list argument.
    #[error("command '{command}' declares argument '{parameter}' after a list argument")]
    ParameterAfterList {
        /// Command name.
        command: String,
        /// Name of the offending argument.
        parameter: String,
    },

    /// The parameter's type could not be resolved to an argument type.
    #[error("command '{command}' has an unresolvable parameter '{parameter}': {reason}")]
    UnresolvableParameter {
        /// Command name.
        command: String,
        /// Parameter name.
        parameter: String,
        /// Why resolution failed.
        reason: String,
    },

    /// The argument type is malformed.
    #[error("command '{command}' has an invalid type for '{parameter}': {reason}")]
    InvalidArgType {
        /// Command name.
        command: String,
        /// Parameter name.
        parameter: String,
        /// Validation reason.
        reason: String,
    },

    /// A flag shadows a router-level flag.
    #[error("command '{command}' declares reserved flag '--{flag}'")]
    ReservedFlagName {
        /// Command name.
        command: String,
        /// Reserved flag name.
        flag: String,
    },
}

/// Errors returned by command handlers.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The handler asked for a parameter its schema does not declare.
    #[error("no value for parameter '{0}'")]
    MissingValue(String),

    /// The handler asked for a parameter as the wrong type.
    #[error("parameter '{name}' is not a {expected}")]
    WrongType {
        /// Parameter name.
        name: String,
        /// Requested type.
        expected: &'static str,
    },

    /// The handler failed.
    #[error("command failed: {0}")]
    Failed(String),

    /// The handler failed with an underlying error.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl HandlerError {
    /// Convenience constructor for a handler failure message.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}
