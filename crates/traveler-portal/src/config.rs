//! Engine configuration.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

/// Default cooldown after a teleport, in milliseconds.
pub const DEFAULT_COOLDOWN_MS: u64 = 1500;

/// Default delay between camera-follow phases, in milliseconds.
pub const DEFAULT_FOLLOW_DELAY_MS: u64 = 500;

/// Image reference given to clones whose source has none.
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "images/placeholder-token.png";

/// Tunables for the portal engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TravelerConfig {
    /// Reserved first name segment that marks a portal.
    pub portal_keyword: String,
    /// How long a relocated entity is ignored for, in milliseconds.
    pub cooldown_ms: u64,
    /// Delay between associating viewers and focusing them, in milliseconds.
    pub follow_delay_ms: u64,
    /// Image used for clones whose source has none.
    pub placeholder_image: String,
    /// Name used for clones whose source has an empty name.
    pub unnamed_entity: String,
    /// Notification flag value whenever the store is (re)initialized.
    pub notifications_enabled: bool,
}

impl Default for TravelerConfig {
    fn default() -> Self {
        Self {
            portal_keyword: "Traveler".to_owned(),
            cooldown_ms: DEFAULT_COOLDOWN_MS,
            follow_delay_ms: DEFAULT_FOLLOW_DELAY_MS,
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_owned(),
            unnamed_entity: "Unnamed Token".to_owned(),
            notifications_enabled: true,
        }
    }
}

impl TravelerConfig {
    /// Cooldown as a time delta.
    #[must_use]
    pub fn cooldown(&self) -> TimeDelta {
        millis(self.cooldown_ms)
    }

    /// Camera-follow phase delay as a time delta.
    #[must_use]
    pub fn follow_delay(&self) -> TimeDelta {
        millis(self.follow_delay_ms)
    }

    /// Whether `name` is reserved for portal markers (`Traveler:` prefix).
    #[must_use]
    pub fn is_reserved_name(&self, name: &str) -> bool {
        name.strip_prefix(self.portal_keyword.as_str())
            .is_some_and(|rest| rest.starts_with(':'))
    }
}

fn millis(ms: u64) -> TimeDelta {
    TimeDelta::milliseconds(i64::try_from(ms).unwrap_or(i64::MAX))
}
