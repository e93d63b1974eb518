//! Port trait definitions for slash-command dispatch.
//!
//! Handlers, reply delivery, and request observers are the seams between
//! the dispatch engine and the code that embeds it.

pub mod delivery;
pub mod handler;
pub mod observer;

pub use delivery::{DeliveryError, DeliveryResult, ReplyDelivery};
pub use handler::{CommandHandler, HandlerResult};
pub use observer::RequestObserver;
