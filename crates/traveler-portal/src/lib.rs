//! Traveler: portal graph resolution engine.
//!
//! Markers named `Traveler:<group>:<node>[:<mode>]` form traversal groups.
//! When a token's position lands inside one, the engine resolves the next
//! node of that group and relocates the token there, either in place or by
//! cloning it into another context.

pub mod application;
pub mod config;
pub mod domain;
