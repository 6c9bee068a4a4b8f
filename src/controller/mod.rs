//! Mode controller
//!
//! The top-level state machine. At most one engine is active at a time;
//! the controller owns the keystroke subscription while a mode runs and
//! performs activation, key routing, completion, and deactivation on a
//! dedicated worker thread so the input and UI threads never block.
//!
//! Deactivation is idempotent and always completes: errors on the way out
//! are logged, never re-raised.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::accessibility::{Accessibility, RoleFilter};
use crate::action::{PendingAction, SharedActionEngine};
use crate::config::Config;
use crate::engine::{EngineResult, ModeEngine};
use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::grid::{FlatGridEngine, RecursiveGridEngine};
use crate::hints::HintEngine;
use crate::input::{KeyCallback, KeyDisposition, KeyToken, KeystrokeSource, SubscriptionId};
use crate::overlay::Overlay;
use crate::pointer::PointerSink;
use crate::scroll::ScrollEngine;
use crate::state::{Mode, SharedAppState, SharedCursorState};

/// Deadline for collaborator queries (element lists, overlay resize).
const QUERY_TIMEOUT: Duration = Duration::from_secs(2);

/// Deadline for a pointer event stream (smooth moves take many hops).
const POINTER_TIMEOUT: Duration = Duration::from_secs(5);

/// Work items processed in order by the controller worker.
enum Job {
    Activate(Mode, Option<Sender<Result<()>>>),
    Key(KeyToken),
    Deactivate,
    ScreenChange(Rect),
    ScreenShare(bool),
}

/// State for one active mode session.
struct Session {
    engine: Box<dyn ModeEngine>,
    config: Arc<Config>,
    key_subscription: SubscriptionId,
    exit_keys: Vec<KeyToken>,
    arm_bindings: Vec<(PendingAction, KeyToken)>,
}

impl Session {
    fn armed_action(&self, token: &KeyToken) -> Option<PendingAction> {
        self.arm_bindings
            .iter()
            .find_map(|(kind, key)| key.matches(token).then_some(*kind))
    }
}

/// What a processed key asks the controller to do after the session lock
/// is released.
enum KeyOutcome {
    Nothing,
    Complete {
        point: crate::geometry::Point,
        config: Arc<Config>,
    },
    Exit,
    Fail(Error),
}

pub struct ModeController {
    app_state: SharedAppState,
    cursor: SharedCursorState,
    actions: SharedActionEngine,
    keys: Arc<dyn KeystrokeSource>,
    accessibility: Arc<dyn Accessibility>,
    overlay: Arc<dyn Overlay>,
    pointer: Arc<dyn PointerSink>,
    session: Mutex<Option<Session>>,
    jobs: Sender<Job>,
}

impl ModeController {
    /// Build the controller, spawn its worker, and wire the state-store
    /// and screen-change subscriptions.
    pub fn spawn(
        app_state: SharedAppState,
        cursor: SharedCursorState,
        actions: SharedActionEngine,
        keys: Arc<dyn KeystrokeSource>,
        accessibility: Arc<dyn Accessibility>,
        overlay: Arc<dyn Overlay>,
        pointer: Arc<dyn PointerSink>,
    ) -> Arc<Self> {
        let (jobs, inbox) = mpsc::channel();
        let controller = Arc::new(Self {
            app_state,
            cursor,
            actions,
            keys,
            accessibility,
            overlay,
            pointer,
            session: Mutex::new(None),
            jobs,
        });

        // Subscribers hold only a job sender, never the controller, so
        // references stay one-way.
        let tx = controller.jobs.clone();
        controller.app_state.subscribe_enabled(move |enabled| {
            if !enabled {
                let _ = tx.send(Job::Deactivate);
            }
        });
        let tx = controller.jobs.clone();
        controller.app_state.subscribe_screen_share(move |hidden| {
            let _ = tx.send(Job::ScreenShare(hidden));
        });
        let tx = controller.jobs.clone();
        controller
            .accessibility
            .on_screen_change(Arc::new(move |bounds| {
                let _ = tx.send(Job::ScreenChange(bounds));
            }));

        let worker = Arc::clone(&controller);
        thread::Builder::new()
            .name("neru-mode-worker".to_string())
            .spawn(move || worker.run(inbox))
            .expect("spawn mode worker");

        controller
    }

    fn run(&self, inbox: Receiver<Job>) {
        while let Ok(job) = inbox.recv() {
            match job {
                Job::Activate(mode, reply) => {
                    let result = self.activate(mode);
                    if let Err(e) = &result {
                        if !e.is_silent() {
                            log::warn!("activation of {} failed: {e}", mode.as_str());
                            self.overlay.notify_error(&e.to_string());
                        }
                    }
                    if let Some(reply) = reply {
                        let _ = reply.send(result);
                    }
                }
                Job::Key(token) => self.process_key(token),
                Job::Deactivate => self.deactivate(false),
                Job::ScreenChange(bounds) => self.handle_screen_change(bounds),
                Job::ScreenShare(hidden) => self.handle_screen_share(hidden),
            }
        }
        log::debug!("mode worker stopped");
    }

    /// Ask the worker to activate `mode`; used by the hotkey router.
    pub fn request_activate(&self, mode: Mode) {
        let _ = self.jobs.send(Job::Activate(mode, None));
    }

    /// Activate `mode` through the worker and wait for the outcome; used
    /// by the IPC surface.
    pub fn activate_blocking(&self, mode: Mode, timeout: Duration) -> Result<()> {
        let (tx, rx) = mpsc::channel();
        self.jobs
            .send(Job::Activate(mode, Some(tx)))
            .map_err(|_| Error::Canceled)?;
        rx.recv_timeout(timeout)
            .map_err(|_| Error::Timeout("mode activation"))?
    }

    /// Full activation pipeline; runs on the worker.
    fn activate(&self, mode: Mode) -> Result<()> {
        if mode.is_idle() {
            return Err(Error::InvalidInput("cannot activate idle".to_string()));
        }
        if !self.app_state.is_enabled() {
            return Err(Error::Canceled);
        }
        if !self.app_state.current_mode().is_idle() {
            // The router pre-filters this; two hotkeys in one input batch
            // still race here and the second one loses.
            return Err(Error::InvalidInput(format!(
                "{} already active",
                self.app_state.current_mode().as_str()
            )));
        }

        let config = self.app_state.config();
        if !config.mode_enabled(mode) {
            return Err(Error::Config(format!(
                "{} mode is disabled",
                mode.as_str()
            )));
        }
        if let Some(app) = self.accessibility.frontmost_app_id() {
            if config.general.excluded_apps.contains(&app) {
                log::info!("activation rejected: {app} is excluded");
                return Err(Error::Canceled);
            }
        }

        let exit_keys = parse_tokens(&config.general.mode_exit_keys)?;
        let arm_bindings = parse_arm_bindings(&config)?;

        let position = self.pointer.position()?;
        let bounds = self.accessibility.screen_bounds()?;
        self.cursor
            .set_restore_enabled(config.general.restore_cursor_position);
        self.cursor.capture(position, bounds);

        let engine = match self.build_engine(mode, &config, bounds) {
            Ok(engine) => engine,
            Err(e) => {
                self.cursor.reset();
                return Err(e);
            }
        };

        self.app_state.set_mode(mode);

        // The overlay resize is the one asynchronous collaborator call;
        // wait for its completion callback under the query deadline.
        let (done_tx, done_rx) = mpsc::channel();
        self.overlay.resize_to_active_screen(Box::new(move || {
            let _ = done_tx.send(());
        }));
        if done_rx.recv_timeout(QUERY_TIMEOUT).is_err() {
            self.app_state.set_mode(Mode::Idle);
            self.cursor.reset();
            return Err(Error::Timeout("overlay resize"));
        }

        let visible = !self.screen_share_hidden(&config);
        if visible {
            self.overlay.show();
            engine.draw(&*self.overlay);
        }

        let tx = self.jobs.clone();
        let app_state = Arc::clone(&self.app_state);
        let callback: KeyCallback = Arc::new(move |token| {
            if app_state.current_mode().is_idle() {
                return KeyDisposition::PassThrough;
            }
            let _ = tx.send(Job::Key(*token));
            KeyDisposition::Swallow
        });
        let key_subscription = self.keys.subscribe(callback);

        *self.session.lock().unwrap() = Some(Session {
            engine,
            config,
            key_subscription,
            exit_keys,
            arm_bindings,
        });
        log::info!("activated {} mode", mode.as_str());
        Ok(())
    }

    fn build_engine(
        &self,
        mode: Mode,
        config: &Arc<Config>,
        bounds: Rect,
    ) -> Result<Box<dyn ModeEngine>> {
        Ok(match mode {
            Mode::Hints => {
                let accessibility = Arc::clone(&self.accessibility);
                let elements = with_timeout("accessibility query", QUERY_TIMEOUT, move || {
                    accessibility.clickable_elements(&RoleFilter::all())
                })?;
                Box::new(HintEngine::new(
                    elements,
                    config.hints.clone(),
                    config.style.hints.clone(),
                )?)
            }
            Mode::FlatGrid => Box::new(FlatGridEngine::new(
                bounds,
                config.grid.clone(),
                config.style.grid.clone(),
            )?),
            Mode::RecursiveGrid => Box::new(RecursiveGridEngine::new(
                bounds,
                config.recursive_grid.clone(),
                config.style.grid.clone(),
            )?),
            Mode::Scroll => Box::new(ScrollEngine::new(
                bounds,
                config.scroll.clone(),
                config.style.scroll.clone(),
                Arc::clone(&self.pointer),
            )?),
            Mode::Idle => {
                return Err(Error::InvalidInput("cannot activate idle".to_string()))
            }
        })
    }

    /// Route one key token to the active engine; runs on the worker.
    fn process_key(&self, token: KeyToken) {
        let started_mode = self.app_state.current_mode();
        if started_mode.is_idle() {
            // Stale key queued before a concurrent deactivation
            return;
        }

        let outcome = {
            let mut guard = self.session.lock().unwrap();
            let Some(session) = guard.as_mut() else {
                return;
            };
            if session.exit_keys.iter().any(|k| k.matches(&token)) {
                KeyOutcome::Exit
            } else if let Some(kind) = session.armed_action(&token) {
                self.actions.arm(kind);
                KeyOutcome::Nothing
            } else {
                match session.engine.handle_key(&token) {
                    Ok(EngineResult::Continue { redraw }) => {
                        if redraw && !self.screen_share_hidden(&session.config) {
                            session.engine.draw(&*self.overlay);
                        }
                        KeyOutcome::Nothing
                    }
                    Ok(EngineResult::Complete { point, element }) => {
                        if let Some(element) = &element {
                            log::debug!("completed on element {}", element.id);
                        }
                        KeyOutcome::Complete {
                            point,
                            config: Arc::clone(&session.config),
                        }
                    }
                    Ok(EngineResult::Exit) => KeyOutcome::Exit,
                    Err(e) => KeyOutcome::Fail(e),
                }
            }
        };

        // A concurrent deactivation may have raced the engine call;
        // abandon the outcome if the mode we started with is gone.
        if self.app_state.current_mode() != started_mode {
            return;
        }

        match outcome {
            KeyOutcome::Nothing => {}
            KeyOutcome::Exit => self.deactivate(false),
            KeyOutcome::Complete { point, config } => {
                let kind = self.actions.consume();
                if kind.leaves_pointer() {
                    self.cursor.skip_next_restore();
                }
                let actions = Arc::clone(&self.actions);
                let pointer = Arc::clone(&self.pointer);
                let smooth = config.smooth_cursor.clone();
                let result = with_timeout("pointer stream", POINTER_TIMEOUT, move || {
                    actions.execute(kind, point, &*pointer, &smooth)
                });
                match result {
                    Ok(()) => self.deactivate(true),
                    Err(e) => {
                        log::error!("pointer action failed: {e}");
                        self.overlay.notify_error(&e.to_string());
                        self.deactivate(false);
                    }
                }
            }
            KeyOutcome::Fail(e) => {
                if !e.is_silent() {
                    log::error!("engine error: {e}");
                    self.overlay.notify_error(&e.to_string());
                }
                self.deactivate(false);
            }
        }
    }

    /// Tear down the active session. Idempotent; callable from any thread;
    /// never fails.
    pub fn deactivate(&self, success: bool) {
        let session = self.session.lock().unwrap().take();
        let Some(session) = session else {
            self.app_state.set_mode(Mode::Idle);
            return;
        };

        self.keys.unsubscribe(session.key_subscription);
        self.overlay.hide();
        self.overlay.clear();

        if self.cursor.should_restore() {
            if let Some(position) = self.cursor.captured_position() {
                if let Err(e) = self.pointer.move_to(position) {
                    log::error!("cursor restore failed: {e}");
                }
            }
        }
        self.cursor.reset();
        self.app_state.set_mode(Mode::Idle);
        log::info!(
            "deactivated {} ({})",
            session.engine.mode().as_str(),
            if success { "completed" } else { "cancelled" }
        );
    }

    /// The active screen changed; rebuild the engine's geometry.
    fn handle_screen_change(&self, bounds: Rect) {
        let mode = self.app_state.current_mode();
        if mode.is_idle() {
            return;
        }
        log::info!("active screen changed to {bounds:?} during {}", mode.as_str());

        let elements = if mode == Mode::Hints {
            let accessibility = Arc::clone(&self.accessibility);
            match with_timeout("accessibility query", QUERY_TIMEOUT, move || {
                accessibility.clickable_elements(&RoleFilter::all())
            }) {
                Ok(elements) => Some(elements),
                Err(e) => {
                    log::error!("element refresh failed: {e}");
                    self.overlay.notify_error(&e.to_string());
                    self.deactivate(false);
                    return;
                }
            }
        } else {
            None
        };

        let mut guard = self.session.lock().unwrap();
        let Some(session) = guard.as_mut() else {
            return;
        };
        if let Err(e) = session.engine.on_screen_change(bounds, elements) {
            drop(guard);
            if !e.is_silent() {
                log::error!("screen-change rebuild failed: {e}");
                self.overlay.notify_error(&e.to_string());
            }
            self.deactivate(false);
            return;
        }
        if !self.screen_share_hidden(&session.config) {
            session.engine.draw(&*self.overlay);
        }
    }

    /// Screen-share blackout: hide or reshow the overlay window while the
    /// engine and key subscription stay alive.
    fn handle_screen_share(&self, hidden: bool) {
        let guard = self.session.lock().unwrap();
        let Some(session) = guard.as_ref() else {
            return;
        };
        if !session.config.general.hide_overlay_in_screen_share {
            return;
        }
        if hidden {
            log::info!("screen share detected, hiding overlay");
            self.overlay.hide();
        } else {
            log::info!("screen share ended, reshowing overlay");
            self.overlay.show();
            session.engine.draw(&*self.overlay);
        }
    }

    fn screen_share_hidden(&self, config: &Config) -> bool {
        config.general.hide_overlay_in_screen_share
            && self.app_state.is_overlay_hidden_for_screen_share()
    }
}

/// Run a collaborator call with a deadline. The call keeps running on its
/// thread after a timeout, but its result is dropped.
fn with_timeout<T: Send + 'static>(
    what: &'static str,
    timeout: Duration,
    f: impl FnOnce() -> Result<T> + Send + 'static,
) -> Result<T> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(f());
    });
    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(_) => Err(Error::Timeout(what)),
    }
}

fn parse_tokens(tokens: &[String]) -> Result<Vec<KeyToken>> {
    tokens.iter().map(|t| KeyToken::parse(t)).collect()
}

fn parse_arm_bindings(config: &Config) -> Result<Vec<(PendingAction, KeyToken)>> {
    let b = &config.action.key_bindings;
    let mut bindings = Vec::new();
    for (kind, tokens) in [
        (PendingAction::LeftClick, &b.left_click),
        (PendingAction::RightClick, &b.right_click),
        (PendingAction::MiddleClick, &b.middle_click),
        (PendingAction::MouseDown, &b.mouse_down),
        (PendingAction::MouseUp, &b.mouse_up),
    ] {
        for token in tokens {
            bindings.push((kind, KeyToken::parse(token)?));
        }
    }
    Ok(bindings)
}
