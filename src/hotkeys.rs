//! Global hotkey router
//!
//! Matches configured hotkeys against incoming tokens while the app is
//! idle and enabled. A match either activates a mode (handed to the
//! controller's worker) or spawns a shell command; either way the key is
//! swallowed. While a mode is active the router stands aside entirely:
//! the controller owns its own subscription. Nothing here blocks the OS
//! input thread.

use std::sync::{Arc, Mutex};

use crate::config::Config;
use crate::controller::ModeController;
use crate::error::Result;
use crate::input::{KeyCallback, KeyDisposition, KeyToken, KeystrokeSource, SubscriptionId};
use crate::state::{Mode, SharedAppState};

/// What a hotkey is bound to.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundAction {
    Activate(Mode),
    Exec(String),
}

type Bindings = Arc<Mutex<Vec<(KeyToken, BoundAction)>>>;

pub struct HotkeyRouter {
    app_state: SharedAppState,
    bindings: Bindings,
}

impl HotkeyRouter {
    /// Parse the binding table from the current snapshot and track
    /// configuration reloads.
    pub fn new(app_state: SharedAppState) -> Result<Arc<Self>> {
        let bindings = Arc::new(Mutex::new(parse_bindings(&app_state.config())?));

        // The reload subscriber captures only the binding table, keeping
        // subject-to-callback references one-way.
        let reload_bindings = Arc::clone(&bindings);
        app_state.subscribe_config(move |config| match parse_bindings(&config) {
            Ok(parsed) => *reload_bindings.lock().unwrap() = parsed,
            Err(e) => log::error!("keeping previous hotkey table: {e}"),
        });

        Ok(Arc::new(Self {
            app_state,
            bindings,
        }))
    }

    /// The action bound to `token`, when the router is allowed to act:
    /// idle, enabled, and a binding matches.
    pub fn route(&self, token: &KeyToken) -> Option<BoundAction> {
        if !self.app_state.is_enabled() || !self.app_state.current_mode().is_idle() {
            return None;
        }
        self.bindings
            .lock()
            .unwrap()
            .iter()
            .find_map(|(key, action)| key.matches(token).then(|| action.clone()))
    }

    /// Subscribe to the keystroke source. Matched keys are swallowed;
    /// activation and spawning happen off the input thread.
    pub fn install(
        self: &Arc<Self>,
        keys: &dyn KeystrokeSource,
        controller: Arc<ModeController>,
    ) -> SubscriptionId {
        let router = Arc::clone(self);
        let callback: KeyCallback = Arc::new(move |token| match router.route(token) {
            Some(BoundAction::Activate(mode)) => {
                controller.request_activate(mode);
                KeyDisposition::Swallow
            }
            Some(BoundAction::Exec(command)) => {
                spawn_command(command);
                KeyDisposition::Swallow
            }
            None => KeyDisposition::PassThrough,
        });
        keys.subscribe(callback)
    }
}

fn parse_bindings(config: &Config) -> Result<Vec<(KeyToken, BoundAction)>> {
    let mut bindings = Vec::new();
    for (hotkey, action) in &config.hotkeys.bindings {
        let token = KeyToken::parse(hotkey)?;
        let action = match action.strip_prefix("exec ") {
            Some(command) => BoundAction::Exec(command.trim().to_string()),
            None => match Mode::parse(action) {
                Some(mode) => BoundAction::Activate(mode),
                None => {
                    // Validation rejects unknown actions before this runs
                    log::warn!("hotkey {hotkey:?} bound to unknown action {action:?}");
                    continue;
                }
            },
        };
        bindings.push((token, action));
    }
    Ok(bindings)
}

/// Launch an `exec` binding without waiting for it.
fn spawn_command(command: String) {
    std::thread::spawn(move || {
        log::info!("exec hotkey: {command}");
        match std::process::Command::new("/bin/sh")
            .arg("-c")
            .arg(&command)
            .spawn()
        {
            Ok(child) => log::debug!("spawned pid {}", child.id()),
            Err(e) => log::error!("failed to spawn {command:?}: {e}"),
        }
    });
}
