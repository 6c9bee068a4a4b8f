//! End-to-end control-surface tests: a fully wired daemon (headless
//! backend) driven over the Unix socket the way the CLI drives it.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use neru::action::ActionEngine;
use neru::config::Config;
use neru::controller::ModeController;
use neru::hotkeys::HotkeyRouter;
use neru::input::KeyToken;
use neru::ipc::server::IpcServer;
use neru::ipc::{client, Request, Response, ResponseCode};
use neru::platform::headless::{
    HeadlessAccessibility, HeadlessKeys, HeadlessOverlay, HeadlessPointer,
};
use neru::state::{AppState, CursorState, Mode, SharedAppState};

struct TestDaemon {
    socket: PathBuf,
    app_state: SharedAppState,
    keys: Arc<HeadlessKeys>,
    config_path: PathBuf,
}

fn unique_path(name: &str, suffix: &str) -> PathBuf {
    std::env::temp_dir().join(format!("neru-test-{name}-{}{suffix}", std::process::id()))
}

fn spawn_daemon(name: &str, config: Config) -> TestDaemon {
    let socket = unique_path(name, ".sock");
    let config_path = unique_path(name, ".toml");
    let _ = std::fs::remove_file(&socket);

    let app_state = AppState::new(config);
    let keys = Arc::new(HeadlessKeys::default());
    let controller = ModeController::spawn(
        app_state.clone(),
        CursorState::new(),
        ActionEngine::new(),
        keys.clone(),
        Arc::new(HeadlessAccessibility::default()),
        Arc::new(HeadlessOverlay),
        Arc::new(HeadlessPointer::default()),
    );
    let router = HotkeyRouter::new(app_state.clone()).unwrap();
    router.install(&*keys, controller.clone());

    IpcServer::new(app_state.clone(), controller, config_path.clone())
        .with_socket(socket.clone())
        .spawn()
        .unwrap();

    TestDaemon {
        socket,
        app_state,
        keys,
        config_path,
    }
}

async fn send(daemon: &TestDaemon, request: Request) -> Response {
    // The listener thread may still be binding when the first request goes
    // out; retry briefly.
    let deadline = Instant::now() + Duration::from_secs(2);
    loop {
        match client::send_to(&daemon.socket, &request).await {
            Ok(response) => return response,
            Err(e) => {
                if Instant::now() > deadline {
                    panic!("ipc request failed: {e}");
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        }
    }
}

#[tokio::test]
async fn test_ping() {
    let daemon = spawn_daemon("ping", Config::default());
    let response = send(&daemon, Request::new("ping")).await;
    assert!(response.success);
    assert_eq!(response.message.as_deref(), Some("pong"));
    assert_eq!(response.code, Some(ResponseCode::Ok));
}

#[tokio::test]
async fn test_status_reports_state() {
    let daemon = spawn_daemon("status", Config::default());
    let response = send(&daemon, Request::new("status")).await;
    assert!(response.success);
    let data = response.data.unwrap();
    assert_eq!(data["enabled"], true);
    assert_eq!(data["mode"], "idle");
    assert_eq!(
        data["config_path"],
        daemon.config_path.display().to_string()
    );
}

#[tokio::test]
async fn test_activate_grid_and_disable() {
    let daemon = spawn_daemon("activate", Config::default());

    let response = send(
        &daemon,
        Request::with_args("activate", vec!["grid".to_string()]),
    )
    .await;
    assert!(response.success, "activate failed: {:?}", response.message);
    assert_eq!(daemon.app_state.current_mode(), Mode::FlatGrid);

    let response = send(&daemon, Request::new("disable")).await;
    assert!(response.success);

    // Disabling deactivates the running mode
    let deadline = Instant::now() + Duration::from_secs(2);
    while daemon.app_state.current_mode() != Mode::Idle {
        assert!(Instant::now() < deadline, "mode never went idle");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(!daemon.app_state.is_enabled());
}

#[tokio::test]
async fn test_toggle_round_trip() {
    let daemon = spawn_daemon("toggle", Config::default());
    let response = send(&daemon, Request::new("toggle")).await;
    assert!(response.success);
    assert_eq!(response.data.unwrap()["enabled"], false);
    let response = send(&daemon, Request::new("toggle")).await;
    assert_eq!(response.data.unwrap()["enabled"], true);
}

#[tokio::test]
async fn test_unknown_action() {
    let daemon = spawn_daemon("unknown", Config::default());
    let response = send(&daemon, Request::new("teleport")).await;
    assert!(!response.success);
    assert_eq!(response.code, Some(ResponseCode::UnknownCommand));
}

#[tokio::test]
async fn test_activate_validates_mode_name() {
    let daemon = spawn_daemon("badmode", Config::default());
    let response = send(
        &daemon,
        Request::with_args("activate", vec!["warp".to_string()]),
    )
    .await;
    assert_eq!(response.code, Some(ResponseCode::InvalidInput));

    let response = send(&daemon, Request::new("activate")).await;
    assert_eq!(response.code, Some(ResponseCode::InvalidInput));
}

#[tokio::test]
async fn test_disabled_mode_reports_code() {
    let mut config = Config::default();
    config.grid.enabled = false;
    let daemon = spawn_daemon("modedisabled", config);
    let response = send(
        &daemon,
        Request::with_args("activate", vec!["grid".to_string()]),
    )
    .await;
    assert!(!response.success);
    assert_eq!(response.code, Some(ResponseCode::ModeDisabled));
}

#[tokio::test]
async fn test_hints_without_elements_fails_cleanly() {
    let daemon = spawn_daemon("noelements", Config::default());
    // The headless accessibility backend reports no clickable elements
    let response = send(
        &daemon,
        Request::with_args("activate", vec!["hints".to_string()]),
    )
    .await;
    assert!(!response.success);
    assert_eq!(response.code, Some(ResponseCode::ActionFailed));
    assert_eq!(daemon.app_state.current_mode(), Mode::Idle);
}

#[tokio::test]
async fn test_reload_config() {
    let daemon = spawn_daemon("reload", Config::default());

    std::fs::write(
        &daemon.config_path,
        "[hints]\nhint_characters = \"qwerty\"\n",
    )
    .unwrap();
    let response = send(&daemon, Request::new("reload_config")).await;
    assert!(response.success, "{:?}", response.message);
    assert_eq!(
        daemon.app_state.config().hints.hint_characters,
        "qwerty"
    );

    // Invalid config: previous snapshot stays
    std::fs::write(
        &daemon.config_path,
        "[hints]\nhint_characters = \"aa\"\n",
    )
    .unwrap();
    let response = send(&daemon, Request::new("reload_config")).await;
    assert!(!response.success);
    assert_eq!(response.code, Some(ResponseCode::ActionFailed));
    assert_eq!(
        daemon.app_state.config().hints.hint_characters,
        "qwerty"
    );

    let _ = std::fs::remove_file(&daemon.config_path);
}

#[tokio::test]
async fn test_hotkey_activates_through_router() {
    let daemon = spawn_daemon("hotkey", Config::default());

    // Default binding Cmd+Shift+g -> grid; injection mimics the OS tap
    let token = KeyToken::parse("Cmd+Shift+g").unwrap();
    let disposition = daemon.keys.inject(token);
    assert_eq!(disposition, neru::input::KeyDisposition::Swallow);

    let deadline = Instant::now() + Duration::from_secs(2);
    while daemon.app_state.current_mode() != Mode::FlatGrid {
        assert!(Instant::now() < deadline, "hotkey never activated grid");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    // While active the router ignores further hotkeys and the controller
    // swallows ordinary keys
    assert_eq!(
        daemon.keys.inject(KeyToken::char('x')),
        neru::input::KeyDisposition::Swallow
    );
}
