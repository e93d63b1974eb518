//! Domain types for slash-command binding.
//!
//! This module contains pure types with no I/O: the argument type system,
//! the command-line tokenizer, command schemas, the inbound request, handler
//! replies, and help rendering. Schemas are immutable once built.

mod arg_type;
mod error;
pub mod help;
mod reply;
mod request;
mod schema;
mod tokenizer;

pub use arg_type::{ArgError, ArgType, ArgValue, Bounds};
pub use error::{HandlerError, RegistrationError};
pub use help::HelpEntry;
pub use reply::{
    Block, BlockMessage, KitBlock, Reply, ResponseType, Section, TextKind, TextObject,
};
pub use request::{InboundForm, MalformedPayload, SlashRequest};
pub use schema::{
    ArgumentSlot, CallValue, CommandArgs, CommandSchema, ContextSlot, FlagSlot, Literal,
    NativeType, Parameter, ParameterKind,
};
pub use tokenizer::{CommandLine, GlobalFlags, HELP_FLAG, VISIBLE_FLAG};
