//! Daemon composition root
//!
//! Wires the state stores, mode controller, hotkey router, and IPC server
//! together and blocks for the process lifetime.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use crate::action::ActionEngine;
use crate::config::Config;
use crate::controller::ModeController;
use crate::error::Result;
use crate::hotkeys::HotkeyRouter;
use crate::ipc::server::IpcServer;
use crate::platform::Collaborators;
use crate::state::{AppState, CursorState};

static LOG_FILE: OnceLock<Mutex<std::fs::File>> = OnceLock::new();

/// Initialise the logger: timestamped records to stderr, tee'd to a log
/// file so crashes of a background daemon stay diagnosable.
pub fn init_logger(log_path: &str) {
    if let Ok(file) = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)
    {
        LOG_FILE.set(Mutex::new(file)).ok();
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let timestamp = chrono::Local::now().format("%H:%M:%S%.3f");
            let line = format!("[{}] {} - {}\n", timestamp, record.level(), record.args());

            if let Some(file_mutex) = LOG_FILE.get() {
                if let Ok(mut file) = file_mutex.lock() {
                    let _ = file.write_all(line.as_bytes());
                    let _ = file.flush();
                }
            }

            write!(buf, "{line}")
        })
        .init();
}

/// Load configuration, falling back to defaults when the file is invalid
/// so a bad edit never keeps the daemon from starting.
fn load_config(path: &std::path::Path) -> Config {
    match Config::load(path) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}; starting with defaults");
            Config::default()
        }
    }
}

/// Run the daemon until the IPC server stops.
pub fn run(config_path: PathBuf, collaborators: Collaborators) -> Result<()> {
    let config = load_config(&config_path);
    let app_state = AppState::new(config);
    let cursor = CursorState::new();
    let actions = ActionEngine::new();

    let controller = ModeController::spawn(
        app_state.clone(),
        cursor,
        actions,
        collaborators.keys.clone(),
        collaborators.accessibility.clone(),
        collaborators.overlay.clone(),
        collaborators.pointer.clone(),
    );

    let router = HotkeyRouter::new(app_state.clone())?;
    router.install(&*collaborators.keys, controller.clone());

    let server = IpcServer::new(app_state, controller, config_path);
    let handle = server.spawn()?;
    log::info!("neru daemon up");

    handle.join().ok();
    Ok(())
}
