//! Pure portal logic: no host calls, no clocks read.

pub mod commands;
pub mod cooldown;
pub mod descriptor;
pub mod follow;
pub mod graph;
pub mod outcome;
pub mod resolver;
pub mod store;
pub mod zone;
