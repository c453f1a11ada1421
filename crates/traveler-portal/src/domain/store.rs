//! Process-wide engine state with an init-if-absent contract.
//!
//! The host may discard its persistent context between sessions, so the
//! state behind a [`TravelerStore`] can vanish at any time. Every access
//! goes through [`TravelerStore::ensure`], which recreates it on demand.

use super::cooldown::CooldownBook;
use super::follow::FollowSchedule;

/// Live engine state.
#[derive(Debug, Clone)]
pub struct TravelerState {
    /// Debounce deadlines.
    pub cooldowns: CooldownBook,
    /// Whether the external notifier is invoked.
    pub notifications_enabled: bool,
    /// Pending camera-follow sequences.
    pub follows: FollowSchedule,
}

impl TravelerState {
    fn fresh(notifications_enabled: bool) -> Self {
        Self {
            cooldowns: CooldownBook::new(),
            notifications_enabled,
            follows: FollowSchedule::new(),
        }
    }
}

/// Owner of the (possibly absent) engine state.
#[derive(Debug, Clone)]
pub struct TravelerStore {
    state: Option<TravelerState>,
    notifications_default: bool,
}

impl TravelerStore {
    /// Creates an uninitialized store. `notifications_default` seeds the
    /// notification flag whenever state is (re)created.
    #[must_use]
    pub fn new(notifications_default: bool) -> Self {
        Self {
            state: None,
            notifications_default,
        }
    }

    /// Returns the live state, creating it if absent.
    pub fn ensure(&mut self) -> &mut TravelerState {
        let notifications_enabled = self.notifications_default;
        self.state
            .get_or_insert_with(|| TravelerState::fresh(notifications_enabled))
    }

    /// Discards the live state, as a host reset would.
    pub fn reset(&mut self) {
        self.state = None;
    }

    /// Whether state currently exists.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }
}
