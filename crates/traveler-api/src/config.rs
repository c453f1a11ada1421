//! Server configuration read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use traveler_portal::config::TravelerConfig;

use crate::error::AppError;

/// Default interval between camera-follow ticks, in milliseconds.
pub const DEFAULT_CAMERA_TICK_MS: u64 = 100;

/// Everything the binary needs to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// YAML scene document to load at startup. Empty scene when unset.
    pub scene_file: Option<PathBuf>,
    /// How often pending camera-follow sequences are advanced.
    pub camera_tick: Duration,
    /// Fixed RNG seed, for reproducible random-mode portals.
    pub seed: Option<u64>,
    /// Engine tunables.
    pub traveler: TravelerConfig,
}

impl ServerConfig {
    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set but malformed.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which returns a variable's value
    /// if it is set.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set but malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut traveler = TravelerConfig::default();
        if let Some(ms) = parse_var(&lookup, "TRAVELER_COOLDOWN_MS")? {
            traveler.cooldown_ms = ms;
        }
        if let Some(ms) = parse_var(&lookup, "TRAVELER_FOLLOW_DELAY_MS")? {
            traveler.follow_delay_ms = ms;
        }
        if let Some(flag) = lookup("TRAVELER_NOTIFICATIONS") {
            traveler.notifications_enabled = parse_switch(&flag)?;
        }

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_owned()),
            port: parse_var(&lookup, "PORT")?.unwrap_or(3000),
            scene_file: lookup("SCENE_FILE")
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
            camera_tick: Duration::from_millis(
                parse_var(&lookup, "CAMERA_TICK_MS")?.unwrap_or(DEFAULT_CAMERA_TICK_MS),
            ),
            seed: parse_var(&lookup, "TRAVELER_SEED")?,
            traveler,
        })
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| AppError::Config(format!("{key} must be a valid number: {e}")))
        })
        .transpose()
}

fn parse_switch(raw: &str) -> Result<bool, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "1" => Ok(true),
        "off" | "false" | "0" => Ok(false),
        other => Err(AppError::Config(format!(
            "TRAVELER_NOTIFICATIONS must be on or off, got {other:?}"
        ))),
    }
}
