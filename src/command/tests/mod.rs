//! Unit tests for the command module.
//!
//! Tests are organised by concept: argument types, tokenizing, schemas,
//! replies and help, registration, routing and background execution.

mod arg_type_tests;
mod request_tests;
mod router_tests;
mod support;
