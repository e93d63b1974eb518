//! Reply delivery adapters.
//!
//! - [`http::HttpReplyDelivery`]: posts replies to the response URL with
//!   `reqwest`
//! - [`memory::InMemoryReplyDelivery`]: records replies for tests and local
//!   tooling

pub mod http;
pub mod memory;

pub use http::HttpReplyDelivery;
pub use memory::{DeliveredReply, InMemoryReplyDelivery};
