//! Application state store
//!
//! Single source of truth for the enabled flag, the current mode, and the
//! screen-share blackout flag, with observer fan-out. Subscriber callbacks
//! are copied out of the lock and invoked outside it, from the notifier's
//! context; subscribers that need to do real work queue it themselves.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::input::SubscriptionId;

/// The interactive mode the app is currently in. At most one non-idle mode
/// is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Idle,
    Hints,
    FlatGrid,
    RecursiveGrid,
    Scroll,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Idle => "idle",
            Mode::Hints => "hints",
            Mode::FlatGrid => "grid",
            Mode::RecursiveGrid => "recursive_grid",
            Mode::Scroll => "scroll",
        }
    }

    /// Parse a mode name as used by hotkey actions and the IPC surface.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "hints" => Some(Mode::Hints),
            "grid" => Some(Mode::FlatGrid),
            "recursive_grid" => Some(Mode::RecursiveGrid),
            "scroll" => Some(Mode::Scroll),
            _ => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Mode::Idle)
    }
}

type FlagCallback = Arc<dyn Fn(bool) + Send + Sync>;
type ConfigCallback = Arc<dyn Fn(Arc<Config>) + Send + Sync>;

struct Inner {
    enabled: bool,
    mode: Mode,
    overlay_hidden_for_screen_share: bool,
    config: Arc<Config>,
    enabled_subscribers: HashMap<SubscriptionId, FlagCallback>,
    screen_share_subscribers: HashMap<SubscriptionId, FlagCallback>,
    config_subscribers: HashMap<SubscriptionId, ConfigCallback>,
}

/// Process-wide state store. Readers vastly outnumber writers.
pub struct AppState {
    inner: RwLock<Inner>,
    next_subscription: AtomicU64,
}

/// Thread-safe handle to the app state.
pub type SharedAppState = Arc<AppState>;

impl AppState {
    pub fn new(config: Config) -> SharedAppState {
        Arc::new(Self {
            inner: RwLock::new(Inner {
                enabled: true,
                mode: Mode::Idle,
                overlay_hidden_for_screen_share: false,
                config: Arc::new(config),
                enabled_subscribers: HashMap::new(),
                screen_share_subscribers: HashMap::new(),
                config_subscribers: HashMap::new(),
            }),
            next_subscription: AtomicU64::new(1),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.read().unwrap().enabled
    }

    /// Toggle the master switch and notify enabled-state subscribers.
    /// Deactivating an in-flight mode is the mode controller's job; it
    /// subscribes here and reacts to the `false` transition.
    pub fn set_enabled(&self, enabled: bool) {
        let subscribers: Vec<FlagCallback> = {
            let mut inner = self.inner.write().unwrap();
            if inner.enabled == enabled {
                return;
            }
            inner.enabled = enabled;
            inner.enabled_subscribers.values().cloned().collect()
        };
        log::info!("app {}", if enabled { "enabled" } else { "disabled" });
        for cb in subscribers {
            cb(enabled);
        }
    }

    pub fn current_mode(&self) -> Mode {
        self.inner.read().unwrap().mode
    }

    /// Only the mode controller calls this.
    pub(crate) fn set_mode(&self, mode: Mode) {
        self.inner.write().unwrap().mode = mode;
    }

    pub fn is_overlay_hidden_for_screen_share(&self) -> bool {
        self.inner.read().unwrap().overlay_hidden_for_screen_share
    }

    /// Hide or reshow the overlay surface without deactivating the mode.
    pub fn set_overlay_hidden_for_screen_share(&self, hidden: bool) {
        let subscribers: Vec<FlagCallback> = {
            let mut inner = self.inner.write().unwrap();
            if inner.overlay_hidden_for_screen_share == hidden {
                return;
            }
            inner.overlay_hidden_for_screen_share = hidden;
            inner.screen_share_subscribers.values().cloned().collect()
        };
        for cb in subscribers {
            cb(hidden);
        }
    }

    pub fn config(&self) -> Arc<Config> {
        Arc::clone(&self.inner.read().unwrap().config)
    }

    /// Swap the configuration snapshot and notify config subscribers.
    /// Sessions already running keep the snapshot they captured.
    pub fn set_config(&self, config: Config) {
        let (snapshot, subscribers) = {
            let mut inner = self.inner.write().unwrap();
            inner.config = Arc::new(config);
            (
                Arc::clone(&inner.config),
                inner
                    .config_subscribers
                    .values()
                    .cloned()
                    .collect::<Vec<_>>(),
            )
        };
        for cb in subscribers {
            cb(Arc::clone(&snapshot));
        }
    }

    pub fn subscribe_enabled<F>(&self, cb: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.inner
            .write()
            .unwrap()
            .enabled_subscribers
            .insert(id, Arc::new(cb));
        id
    }

    pub fn unsubscribe_enabled(&self, id: SubscriptionId) {
        self.inner.write().unwrap().enabled_subscribers.remove(&id);
    }

    pub fn subscribe_screen_share<F>(&self, cb: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.inner
            .write()
            .unwrap()
            .screen_share_subscribers
            .insert(id, Arc::new(cb));
        id
    }

    pub fn unsubscribe_screen_share(&self, id: SubscriptionId) {
        self.inner
            .write()
            .unwrap()
            .screen_share_subscribers
            .remove(&id);
    }

    pub fn subscribe_config<F>(&self, cb: F) -> SubscriptionId
    where
        F: Fn(Arc<Config>) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.inner
            .write()
            .unwrap()
            .config_subscribers
            .insert(id, Arc::new(cb));
        id
    }

    pub fn unsubscribe_config(&self, id: SubscriptionId) {
        self.inner.write().unwrap().config_subscribers.remove(&id);
    }

    fn next_id(&self) -> SubscriptionId {
        self.next_subscription.fetch_add(1, Ordering::Relaxed)
    }
}
