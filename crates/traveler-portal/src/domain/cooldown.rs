//! Debounce bookkeeping.
//!
//! A relocation moves the entity, and the host reports that move as another
//! position change. Cooldowns make the engine ignore the entity until the
//! cascade has settled.

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use traveler_core::scene::EntityId;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CooldownKey {
    Entity(EntityId),
    Name(String),
}

/// Cooldown deadlines keyed by entity id and by entity name.
#[derive(Debug, Clone, Default)]
pub struct CooldownBook {
    deadlines: HashMap<CooldownKey, DateTime<Utc>>,
}

impl CooldownBook {
    /// Creates an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the entity as cooling until `now + ttl`. Blank names are not
    /// keyed, so unnamed tokens do not block each other. Re-arming keeps
    /// whichever deadline is later.
    pub fn arm(
        &mut self,
        entity_id: &EntityId,
        entity_name: &str,
        now: DateTime<Utc>,
        ttl: TimeDelta,
    ) {
        let until = now + ttl;
        for key in Self::keys(entity_id, entity_name) {
            self.deadlines
                .entry(key)
                .and_modify(|deadline| *deadline = (*deadline).max(until))
                .or_insert(until);
        }
    }

    /// Whether either key is still cooling at `now`.
    #[must_use]
    pub fn is_cooling_down(
        &self,
        entity_id: &EntityId,
        entity_name: &str,
        now: DateTime<Utc>,
    ) -> bool {
        Self::keys(entity_id, entity_name).iter().any(|key| {
            self.deadlines
                .get(key)
                .is_some_and(|deadline| now < *deadline)
        })
    }

    /// Drops every expired entry, returning how many were removed.
    pub fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.deadlines.len();
        self.deadlines.retain(|_, deadline| now < *deadline);
        before - self.deadlines.len()
    }

    /// Number of live or not-yet-purged entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    /// Whether the book holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }

    fn keys(entity_id: &EntityId, entity_name: &str) -> Vec<CooldownKey> {
        let mut keys = vec![CooldownKey::Entity(entity_id.clone())];
        let name = entity_name.trim();
        if !name.is_empty() {
            keys.push(CooldownKey::Name(name.to_owned()));
        }
        keys
    }
}
