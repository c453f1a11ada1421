//! Route modules organized by resource.

pub mod camera;
pub mod groups;
pub mod health;
pub mod notifications;
pub mod scene;
pub mod status;
pub mod tokens;
