//! Command registration.
//!
//! Commands are registered on a consuming [`RegistryBuilder`] at startup.
//! [`RegistryBuilder::build`] finalises an immutable [`Registry`] that the
//! router shares behind an `Arc`; there is no way to add or remove a command
//! afterwards.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::command::{
    domain::{BlockMessage, CommandSchema, HelpEntry, Parameter, RegistrationError},
    ports::CommandHandler,
};

const RESERVED_COMMAND: &str = "help";

/// Declaration of one command: name, help texts and parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandSpec {
    name: String,
    summary: Option<String>,
    help: Option<String>,
    parameters: Vec<Parameter>,
    acknowledgement: Option<BlockMessage>,
}

impl CommandSpec {
    /// Starts a declaration for `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            summary: None,
            help: None,
            parameters: Vec::new(),
            acknowledgement: None,
        }
    }

    /// Sets the one-line summary shown in the global help.
    #[must_use]
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Sets the help body shown by `<command> --help`.
    #[must_use]
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Appends a parameter. Declaration order is the ordinal order.
    #[must_use]
    pub fn parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Appends several parameters in order.
    #[must_use]
    pub fn parameters(mut self, parameters: impl IntoIterator<Item = Parameter>) -> Self {
        self.parameters.extend(parameters);
        self
    }

    /// Overrides the acknowledgement returned when this command is
    /// dispatched.
    #[must_use]
    pub fn acknowledge(mut self, acknowledgement: BlockMessage) -> Self {
        self.acknowledgement = Some(acknowledgement);
        self
    }

    /// Returns the command name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A registered command.
#[derive(Clone)]
pub struct Command {
    name: String,
    summary: Option<String>,
    help: Option<String>,
    schema: CommandSchema,
    handler: Arc<dyn CommandHandler>,
    acknowledgement: Option<BlockMessage>,
}

impl Command {
    /// Returns the command name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the summary.
    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Returns the help body.
    #[must_use]
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Returns the classified parameters.
    #[must_use]
    pub const fn schema(&self) -> &CommandSchema {
        &self.schema
    }

    /// Returns a shared handle on the handler.
    #[must_use]
    pub fn handler(&self) -> Arc<dyn CommandHandler> {
        Arc::clone(&self.handler)
    }

    /// Returns the per-command acknowledgement override.
    #[must_use]
    pub const fn acknowledgement(&self) -> Option<&BlockMessage> {
        self.acknowledgement.as_ref()
    }

    /// Returns the metadata used for help rendering.
    #[must_use]
    pub fn help_entry(&self) -> HelpEntry<'_> {
        HelpEntry {
            name: &self.name,
            summary: self.summary.as_deref(),
            help: self.help.as_deref(),
            schema: &self.schema,
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("summary", &self.summary)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

/// Collects commands before the registry is finalised.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    registry: Registry,
}

impl RegistryBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command and its handler, chaining the builder.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError`] if the name is invalid, reserved or
    /// already registered, or if the parameter declaration is invalid.
    pub fn register(
        mut self,
        spec: CommandSpec,
        handler: impl CommandHandler + 'static,
    ) -> Result<Self, RegistrationError> {
        self.add(spec, handler)?;
        Ok(self)
    }

    /// Registers a command in place. A rejected command leaves the builder
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Same as [`Self::register`].
    pub fn add(
        &mut self,
        spec: CommandSpec,
        handler: impl CommandHandler + 'static,
    ) -> Result<(), RegistrationError> {
        let CommandSpec {
            name,
            summary,
            help,
            parameters,
            acknowledgement,
        } = spec;

        validate_name(&name)?;
        if self.registry.index.contains_key(&name) {
            return Err(RegistrationError::DuplicateCommand(name));
        }
        let schema = CommandSchema::build(&name, parameters)?;

        tracing::debug!(command = %name, "registered command");
        self.registry
            .index
            .insert(name.clone(), self.registry.commands.len());
        self.registry.commands.push(Command {
            name,
            summary,
            help,
            schema,
            handler: Arc::new(handler),
            acknowledgement,
        });
        Ok(())
    }

    /// Finalises the registry.
    #[must_use]
    pub fn build(self) -> Registry {
        self.registry
    }
}

fn validate_name(name: &str) -> Result<(), RegistrationError> {
    if name.is_empty() || name.starts_with("--") || name.chars().any(char::is_whitespace) {
        return Err(RegistrationError::InvalidCommandName(name.to_owned()));
    }
    if name.eq_ignore_ascii_case(RESERVED_COMMAND) {
        return Err(RegistrationError::ReservedCommandName(name.to_owned()));
    }
    Ok(())
}

/// Immutable set of registered commands, in registration order.
#[derive(Debug, Default)]
pub struct Registry {
    commands: Vec<Command>,
    index: HashMap<String, usize>,
}

impl Registry {
    /// Starts a new builder.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Finds a command by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Command> {
        self.index
            .get(name)
            .and_then(|position| self.commands.get(*position))
    }

    /// Iterates over commands in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    /// Returns the number of commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if no commands are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
