//! Traveler Core: shared abstractions for the portal engine.
//!
//! This crate defines the scene model the host exposes, the ports the engine
//! calls back into (scene, notifier, camera), and the clock/RNG traits used
//! to keep resolution deterministic under test. It contains no engine logic.

pub mod camera;
pub mod clock;
pub mod command;
pub mod error;
pub mod host;
pub mod notification;
pub mod rng;
pub mod scene;
