//! Shared application state.

use std::sync::{Arc, Mutex};

use traveler_core::clock::Clock;
use traveler_core::rng::DeterministicRng;
use traveler_portal::config::TravelerConfig;
use traveler_portal::domain::store::TravelerStore;

use crate::camera::FeedCamera;
use crate::notifier::FeedNotifier;
use crate::scene::InMemoryScene;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Engine tunables.
    pub config: Arc<TravelerConfig>,
    /// Time source for cooldowns and camera delays.
    pub clock: Arc<dyn Clock + Send + Sync>,
    /// Random source for random-mode portals.
    pub rng: Arc<Mutex<dyn DeterministicRng + Send>>,
    /// Cooldowns, notification flag and pending camera follows.
    pub store: Arc<Mutex<TravelerStore>>,
    /// The scene the engine runs against.
    pub scene: Arc<InMemoryScene>,
    /// Notification feed.
    pub notifier: Arc<FeedNotifier>,
    /// Camera request feed.
    pub camera: Arc<FeedCamera>,
    /// Held while a position-change event is handled; events run one at a
    /// time.
    pub position_events: Arc<tokio::sync::Mutex<()>>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Create new application state. The engine store starts uninitialized
    /// and is created on first use.
    #[must_use]
    pub fn new(
        config: TravelerConfig,
        clock: Arc<dyn Clock + Send + Sync>,
        rng: Arc<Mutex<dyn DeterministicRng + Send>>,
        scene: Arc<InMemoryScene>,
    ) -> Self {
        let store = TravelerStore::new(config.notifications_enabled);
        Self {
            config: Arc::new(config),
            camera: Arc::new(FeedCamera::new(Arc::clone(&clock))),
            clock,
            rng,
            store: Arc::new(Mutex::new(store)),
            scene,
            notifier: Arc::new(FeedNotifier::new()),
            position_events: Arc::new(tokio::sync::Mutex::new(())),
        }
    }
}
