//! Command registry and dispatch.

mod registry;
mod service;

pub use registry::{
    CommandEntry, CommandHandler, CommandRegistry, CommandRegistryBuilder, CommandSpec, Invocation,
};
pub use service::{CommandRunner, CommandService};
