//! Slash-command binding and dispatch.
//!
//! A slash command arrives as a form post carrying a line of text such as
//! `math 4 + 5 --visible`. This module tokenizes the line, finds the
//! registered command, parses its arguments against a typed schema, and
//! runs the handler in the background, posting the reply to the request's
//! response URL.
//!
//! # Architecture
//!
//! - **Domain**: argument types, tokenizer, schemas, replies and help text
//!   ([`domain::ArgType`], [`domain::CommandLine`], [`domain::CommandSchema`])
//! - **Ports**: [`ports::CommandHandler`], [`ports::ReplyDelivery`],
//!   [`ports::RequestObserver`]
//! - **Adapters**: [`adapters::HttpReplyDelivery`] and
//!   [`adapters::InMemoryReplyDelivery`]
//! - **Services**: [`services::RegistryBuilder`], [`services::Router`],
//!   [`services::Executor`]
//!
//! # Example
//!
//! ```
//! use slashbind::command::domain::{ArgType, CommandArgs, Parameter, Reply};
//! use slashbind::command::ports::HandlerResult;
//! use slashbind::command::services::{CommandSpec, Registry};
//!
//! async fn shout(args: CommandArgs) -> HandlerResult {
//!     Ok(Reply::text(args.text("content")?.to_uppercase()))
//! }
//!
//! let registry = Registry::builder()
//!     .register(
//!         CommandSpec::new("shout")
//!             .summary("Repeats text loudly")
//!             .parameter(Parameter::argument("content", ArgType::text())),
//!         shout,
//!     )
//!     .expect("valid command")
//!     .build();
//! assert!(registry.get("shout").is_some());
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
