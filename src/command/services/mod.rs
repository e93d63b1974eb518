//! Application services: command registration, routing and background
//! execution.

mod executor;
mod registry;
mod router;

pub use executor::{Executor, Job};
pub use registry::{Command, CommandSpec, Registry, RegistryBuilder};
pub use router::{Disposition, Router, RouterSettings};
