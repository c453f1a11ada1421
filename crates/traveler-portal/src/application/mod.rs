//! Application layer: handlers that orchestrate domain logic against the
//! host, notifier and camera ports.

pub mod command_handlers;
pub mod query_handlers;
pub mod relocation;
