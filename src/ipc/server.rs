//! IPC server
//!
//! Accepts control connections on the daemon's Unix socket and executes
//! requests against the state stores and the mode controller. Runs on its
//! own thread with a current-thread tokio runtime; request handling that
//! can block (mode activation) is pushed to a blocking task so the accept
//! loop stays responsive.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use tokio::net::{UnixListener, UnixStream};

use crate::config::Config;
use crate::controller::ModeController;
use crate::error::{Error, Result};
use crate::state::{Mode, SharedAppState};

use super::{
    read_frame, write_frame, Request, Response, ResponseCode, OPERATION_TIMEOUT, READ_DEADLINE,
};

pub struct IpcServer {
    app_state: SharedAppState,
    controller: Arc<ModeController>,
    config_path: PathBuf,
    socket: PathBuf,
}

impl IpcServer {
    pub fn new(
        app_state: SharedAppState,
        controller: Arc<ModeController>,
        config_path: PathBuf,
    ) -> Self {
        Self {
            app_state,
            controller,
            config_path,
            socket: super::socket_path(),
        }
    }

    /// Use a non-default socket location (tests).
    pub fn with_socket(mut self, socket: PathBuf) -> Self {
        self.socket = socket;
        self
    }

    /// Claim the socket and serve requests on a background thread.
    ///
    /// A live socket means another daemon owns the address; a dead one is
    /// left over from a crash and is reclaimed.
    pub fn spawn(self) -> Result<thread::JoinHandle<()>> {
        if self.socket.exists() {
            match std::os::unix::net::UnixStream::connect(&self.socket) {
                Ok(_) => {
                    return Err(Error::InvalidInput(format!(
                        "another daemon is listening on {}",
                        self.socket.display()
                    )))
                }
                Err(_) => {
                    log::warn!("removing stale socket {}", self.socket.display());
                    std::fs::remove_file(&self.socket)?;
                }
            }
        }
        if let Some(parent) = self.socket.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let handle = thread::Builder::new()
            .name("neru-ipc".to_string())
            .spawn(move || {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .expect("build ipc runtime");
                runtime.block_on(self.serve());
            })?;
        Ok(handle)
    }

    async fn serve(self) {
        let listener = match UnixListener::bind(&self.socket) {
            Ok(listener) => listener,
            Err(e) => {
                log::error!("ipc bind failed on {}: {e}", self.socket.display());
                return;
            }
        };
        log::info!("ipc listening on {}", self.socket.display());
        let server = Arc::new(self);
        loop {
            match listener.accept().await {
                Ok((stream, _addr)) => {
                    let server = Arc::clone(&server);
                    tokio::spawn(async move {
                        if let Err(e) = server.handle_connection(stream).await {
                            if !e.is_silent() {
                                log::debug!("ipc connection ended: {e}");
                            }
                        }
                    });
                }
                Err(e) => {
                    log::error!("ipc accept failed: {e}");
                    return;
                }
            }
        }
    }

    async fn handle_connection(self: &Arc<Self>, mut stream: UnixStream) -> Result<()> {
        loop {
            let request: Request =
                match tokio::time::timeout(READ_DEADLINE, read_frame(&mut stream)).await {
                    Ok(Ok(request)) => request,
                    Ok(Err(Error::Io(e))) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                        return Ok(()); // client closed
                    }
                    Ok(Err(e)) => return Err(e),
                    Err(_) => return Err(Error::Timeout("ipc request")),
                };
            log::debug!("ipc request: {}", request.action);

            let server = Arc::clone(self);
            let response = tokio::task::spawn_blocking(move || server.handle(request))
                .await
                .unwrap_or_else(|e| {
                    Response::error(ResponseCode::ActionFailed, format!("handler panicked: {e}"))
                });
            write_frame(&mut stream, &response).await?;
        }
    }

    /// Execute one request. Runs on a blocking task.
    fn handle(&self, request: Request) -> Response {
        match request.action.as_str() {
            "ping" => Response::ok_with_message("pong"),
            "status" => Response::ok_with_data(serde_json::json!({
                "enabled": self.app_state.is_enabled(),
                "mode": self.app_state.current_mode().as_str(),
                "config_path": self.config_path.display().to_string(),
            })),
            "enable" => {
                self.app_state.set_enabled(true);
                Response::ok()
            }
            "disable" => {
                self.app_state.set_enabled(false);
                Response::ok()
            }
            "toggle" => {
                let enabled = !self.app_state.is_enabled();
                self.app_state.set_enabled(enabled);
                Response::ok_with_data(serde_json::json!({ "enabled": enabled }))
            }
            "activate" => self.handle_activate(&request),
            "reload_config" => self.handle_reload(),
            other => Response::error(
                ResponseCode::UnknownCommand,
                format!("unknown action {other:?}"),
            ),
        }
    }

    fn handle_activate(&self, request: &Request) -> Response {
        let name = request
            .args
            .as_ref()
            .and_then(|args| args.first().cloned())
            .or_else(|| {
                request
                    .params
                    .as_ref()
                    .and_then(|p| p.get("mode"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            });
        let Some(name) = name else {
            return Response::error(ResponseCode::InvalidInput, "missing mode argument");
        };
        let Some(mode) = Mode::parse(&name) else {
            return Response::error(
                ResponseCode::InvalidInput,
                format!("unknown mode {name:?}"),
            );
        };
        if !self.app_state.config().mode_enabled(mode) {
            return Response::error(
                ResponseCode::ModeDisabled,
                format!("{} mode is disabled", mode.as_str()),
            );
        }
        match self.controller.activate_blocking(mode, OPERATION_TIMEOUT) {
            Ok(()) => Response::ok(),
            Err(e) => Response::error(ResponseCode::ActionFailed, e.to_string()),
        }
    }

    fn handle_reload(&self) -> Response {
        match Config::load(&self.config_path) {
            Ok(config) => {
                self.app_state.set_config(config);
                log::info!("configuration reloaded from {}", self.config_path.display());
                Response::ok()
            }
            // Previous snapshot stays in place
            Err(e) => Response::error(ResponseCode::ActionFailed, e.to_string()),
        }
    }
}
