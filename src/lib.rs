//! Slashbind: typed bindings for chat slash commands.
//!
//! This crate turns the text a user types after a slash command into typed
//! handler arguments, authenticates the platform's requests, and runs
//! handlers in the background so the platform gets its acknowledgement
//! within the deadline.
//!
//! # Architecture
//!
//! Slashbind follows hexagonal architecture principles:
//!
//! - **Domain**: Pure parsing, schema and reply types with no I/O
//! - **Ports**: Trait interfaces for handlers, reply delivery and observers
//! - **Adapters**: Concrete implementations of ports (HTTP, in-memory)
//!
//! # Modules
//!
//! - [`command`]: Tokenizing, routing, argument binding and dispatch
//! - [`auth`]: Request signature verification
//! - [`config`]: Process configuration and startup validation
//! - [`server`]: The axum endpoint
//! - [`telemetry`]: Tracing subscriber setup

pub mod auth;
pub mod command;
pub mod config;
pub mod server;
pub mod telemetry;
