//! Notification feed.
//!
//! Notifications are logged and kept in a bounded feed that clients poll
//! through `GET /api/v1/notifications`.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};
use traveler_core::notification::{Notification, Notifier, Severity};

/// How many notifications the feed keeps before dropping the oldest.
pub const FEED_CAPACITY: usize = 200;

/// One feed entry: the payload plus its severity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedEntry {
    /// How a renderer should present the entry.
    pub severity: Severity,
    /// The notification itself.
    #[serde(flatten)]
    pub notification: Notification,
}

/// A [`Notifier`] that logs each notification and appends it to a feed.
#[derive(Debug)]
pub struct FeedNotifier {
    entries: Mutex<VecDeque<FeedEntry>>,
    capacity: usize,
}

impl Default for FeedNotifier {
    fn default() -> Self {
        Self::with_capacity(FEED_CAPACITY)
    }
}

impl FeedNotifier {
    /// Creates a feed with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a feed that keeps at most `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Returns the feed, oldest first. A poisoned feed reads as empty.
    #[must_use]
    pub fn entries(&self) -> Vec<FeedEntry> {
        self.entries
            .lock()
            .map(|entries| entries.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for FeedNotifier {
    async fn notify(&self, notification: Notification) {
        let severity = notification.severity();
        match severity {
            Severity::Info => info!(
                entity = %notification.entity_name,
                group = %notification.group,
                node_id = notification.node_id,
                outcome = ?notification.outcome,
                "travel notification"
            ),
            Severity::Warning => warn!(
                entity = %notification.entity_name,
                group = %notification.group,
                node_id = notification.node_id,
                outcome = ?notification.outcome,
                "travel notification"
            ),
        }

        let Ok(mut entries) = self.entries.lock() else {
            warn!("notification feed unavailable; entry dropped");
            return;
        };
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(FeedEntry {
            severity,
            notification,
        });
    }
}
