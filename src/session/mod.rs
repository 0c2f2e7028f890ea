//! One remote terminal session: shared UI state, the blocking input loop, the
//! periodic draw loop and the teardown contract.
//!
//! Two loops run concurrently per session. The input loop blocks on
//! [`Channel::receive`] and feeds every chunk to the router; the draw loop
//! wakes once per frame to advance the active input's blink phase and
//! re-render it. All channel writes are serialized by the renderer's lock.
//! Shutdown is cooperative through a shared `running` flag, so termination
//! can lag by up to one blocking read.

mod focus;

pub use focus::{FocusChange, FocusManager};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

use serde_json::json;

use crate::channel::Channel;
use crate::error::Result;
use crate::input::{Directive, route};
use crate::layout::{Layout, Placement, solve};
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::SessionMetrics;
use crate::render::Renderer;
use crate::terminal::{DISABLE_MOUSE, ENABLE_MOUSE, TerminalDriver};
use crate::widget::{TextInput, Widget};

const LOG_TARGET: &str = "foyer::session";

/// Mutable layout state shared between the session's two loops.
///
/// Widgets are created once at session start; placements are computed once
/// and cached. Only input runtime state and focus mutate afterwards.
#[derive(Debug)]
pub struct UiState {
    widgets: Vec<Widget>,
    inputs: Vec<usize>,
    placements: Vec<Option<Placement>>,
    focus: FocusManager,
}

impl UiState {
    pub fn new(layout: Layout) -> Self {
        let (widgets, inputs) = layout.into_parts();
        let placements = solve(&widgets);
        let mut focus = FocusManager::new();
        if !inputs.is_empty() {
            // Layout::push already flagged the first input active.
            focus.seed(Some(0));
        }
        Self {
            widgets,
            inputs,
            placements,
            focus,
        }
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    /// Widget-list indices of the inputs, in focus order.
    pub fn inputs(&self) -> &[usize] {
        &self.inputs
    }

    pub fn placements(&self) -> &[Option<Placement>] {
        &self.placements
    }

    pub fn placement(&self, index: usize) -> Option<Placement> {
        self.placements.get(index).copied().flatten()
    }

    /// Focus-order slot of the currently focused input, if any.
    pub fn focused(&self) -> Option<usize> {
        self.focus.active()
    }

    /// Buffer contents of the input at focus-order `slot`.
    pub fn input_value(&self, slot: usize) -> String {
        self.input_at(slot)
            .map(TextInput::value)
            .unwrap_or_default()
    }

    /// Move focus to `target`, updating the widget flags on both sides of
    /// the transition. The caller renders the change.
    pub fn set_focus(&mut self, target: Option<usize>) -> FocusChange {
        let change = self.focus.activate(target, self.inputs.len());
        if let Some(slot) = change.deactivated {
            self.set_active_flag(slot, false);
        }
        if let Some(slot) = change.activated {
            self.set_active_flag(slot, true);
        }
        change
    }

    pub fn focus_next(&mut self) -> FocusChange {
        let target = self.focus.next(self.inputs.len());
        self.set_focus(target)
    }

    pub fn focus_prev(&mut self) -> FocusChange {
        let target = self.focus.prev(self.inputs.len());
        self.set_focus(target)
    }

    /// First input whose assigned row equals `row` (zero-based), as a
    /// focus-order slot.
    pub fn hit_test_row(&self, row: u16) -> Option<usize> {
        self.inputs
            .iter()
            .position(|&index| self.placement(index).map(|p| p.row) == Some(row))
    }

    /// Mutable access to the focused input's editor, if any.
    pub fn active_editor(&mut self) -> Option<&mut TextInput> {
        let index = *self.inputs.get(self.focus.active()?)?;
        match self.widgets.get_mut(index) {
            Some(Widget::Input(input)) => Some(input),
            _ => None,
        }
    }

    /// Rendered line and placement for the input at focus-order `slot`.
    fn input_line(&self, slot: usize) -> Option<(usize, Placement, String)> {
        let index = *self.inputs.get(slot)?;
        let placement = self.placement(index)?;
        let line = self.widgets.get(index)?.render_line()?;
        Some((index, placement, line))
    }

    /// Advance the active input's blink phase one frame and hand back what
    /// the draw loop needs to render it.
    fn advance_active_blink(&mut self) -> Option<(usize, Placement, String)> {
        let slot = self.focus.active()?;
        self.active_editor()?.advance_blink();
        self.input_line(slot)
    }

    fn input_at(&self, slot: usize) -> Option<&TextInput> {
        let index = *self.inputs.get(slot)?;
        match self.widgets.get(index) {
            Some(Widget::Input(input)) => Some(input),
            _ => None,
        }
    }

    fn set_active_flag(&mut self, slot: usize, active: bool) {
        let Some(&index) = self.inputs.get(slot) else {
            return;
        };
        if let Some(Widget::Input(input)) = self.widgets.get_mut(index) {
            input.set_active(active);
        }
    }
}

/// Runtime knobs for one session.
#[derive(Clone)]
pub struct SessionConfig {
    /// Draw-loop period; also the blink frame interval.
    pub frame_interval: Duration,
    /// Maximum bytes pulled per blocking read.
    pub read_chunk_size: usize,
    /// Optional structured logger.
    pub logger: Option<Logger>,
    /// Metrics accumulator shared with the host, if any.
    pub metrics: Option<Arc<Mutex<SessionMetrics>>>,
    /// Interval between metrics snapshot emissions. Zero disables snapshots.
    pub metrics_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(50),
            read_chunk_size: 1024,
            logger: None,
            metrics: None,
            metrics_interval: Duration::from_secs(5),
        }
    }
}

struct SharedUi {
    ui: Mutex<UiState>,
    running: AtomicBool,
}

/// Owns one session from first paint to teardown.
pub struct Session {
    channel: Arc<dyn Channel>,
    driver: Arc<dyn TerminalDriver>,
    renderer: Arc<Renderer>,
    shared: Arc<SharedUi>,
    config: SessionConfig,
}

impl Session {
    pub fn new(
        channel: Arc<dyn Channel>,
        driver: Arc<dyn TerminalDriver>,
        layout: Layout,
    ) -> Self {
        Self {
            channel,
            driver,
            renderer: Arc::new(Renderer::new()),
            shared: Arc::new(SharedUi {
                ui: Mutex::new(UiState::new(layout)),
                running: AtomicBool::new(false),
            }),
            config: SessionConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Buffer contents of every input, in focus order. Typically read after
    /// [`Session::run`] returns to harvest what the peer typed.
    pub fn input_values(&self) -> Vec<String> {
        let ui = self.lock_ui();
        (0..ui.inputs().len()).map(|slot| ui.input_value(slot)).collect()
    }

    /// Drive the session until the peer quits or the channel faults.
    ///
    /// Teardown runs on every exit path: cursor restored, screen cleared,
    /// mouse reporting disabled, channel closed. Secondary faults during
    /// teardown are suppressed.
    pub fn run(&self) -> Result<()> {
        self.shared.running.store(true, Ordering::SeqCst);
        let started = Instant::now();
        self.log(
            LogLevel::Info,
            "session_started",
            [json_kv("widgets", json!(self.lock_ui().widgets().len()))],
        );

        let result = self.enter().and_then(|()| {
            let draw_loop = self.spawn_draw_loop();
            let outcome = self.input_loop();
            self.shared.running.store(false, Ordering::SeqCst);
            let _ = draw_loop.join();
            outcome
        });

        self.shared.running.store(false, Ordering::SeqCst);
        self.teardown();
        self.log(
            LogLevel::Info,
            "session_stopped",
            [
                json_kv("uptime_ms", json!(started.elapsed().as_millis() as u64)),
                json_kv("clean", json!(result.is_ok())),
            ],
        );
        result
    }

    /// Hide the cursor, clear the screen, enable mouse reporting and paint
    /// every widget once at its cached placement.
    fn enter(&self) -> Result<()> {
        let mut setup = String::new();
        setup.push_str(&self.driver.hide_cursor());
        setup.push_str(&self.driver.clear_screen());
        setup.push_str(ENABLE_MOUSE);
        self.renderer.send_raw(&*self.channel, setup.as_bytes())?;

        let ui = self.lock_ui();
        self.renderer
            .draw_all(&*self.channel, &*self.driver, ui.widgets(), ui.placements())
    }

    fn input_loop(&self) -> Result<()> {
        while self.shared.running.load(Ordering::SeqCst) {
            let chunk = self.channel.receive(self.config.read_chunk_size)?;
            self.with_metrics(SessionMetrics::record_chunk);

            let directive = {
                let mut ui = self.lock_ui();
                let directive = route(&mut ui, &chunk);
                if let Directive::Focus(change) = directive {
                    self.render_focus_change(&ui, change)?;
                }
                directive
            };

            if directive == Directive::Quit {
                self.log(LogLevel::Info, "quit_requested", std::iter::empty());
                break;
            }
        }
        Ok(())
    }

    /// Redraw both sides of a focus transition once, so the old holder drops
    /// its cursor glyph immediately.
    fn render_focus_change(&self, ui: &UiState, change: FocusChange) -> Result<()> {
        if change.is_noop() {
            return Ok(());
        }
        for slot in [change.deactivated, change.activated].into_iter().flatten() {
            if let Some((index, placement, line)) = ui.input_line(slot) {
                self.renderer
                    .draw_line(&*self.channel, &*self.driver, index, placement, &line)?;
            }
        }
        self.with_metrics(SessionMetrics::record_focus_change);
        self.log(
            LogLevel::Debug,
            "focus_changed",
            [
                json_kv("from", json!(change.deactivated)),
                json_kv("to", json!(change.activated)),
            ],
        );
        Ok(())
    }

    fn spawn_draw_loop(&self) -> thread::JoinHandle<()> {
        let shared = Arc::clone(&self.shared);
        let renderer = Arc::clone(&self.renderer);
        let channel = Arc::clone(&self.channel);
        let driver = Arc::clone(&self.driver);
        let config = self.config.clone();

        thread::spawn(move || {
            let started = Instant::now();
            let mut last_emit = Instant::now();

            while shared.running.load(Ordering::SeqCst) {
                thread::sleep(config.frame_interval);

                let frame = {
                    let mut ui = shared.ui.lock().unwrap_or_else(|err| err.into_inner());
                    ui.advance_active_blink()
                };
                if let Some(metrics) = config.metrics.as_ref() {
                    if let Ok(mut guard) = metrics.lock() {
                        guard.record_frame();
                    }
                }

                if let Some((index, placement, line)) = frame {
                    match renderer.draw_line(&*channel, &*driver, index, placement, &line) {
                        Ok(true) => {
                            if let Some(metrics) = config.metrics.as_ref() {
                                if let Ok(mut guard) = metrics.lock() {
                                    guard.record_redraw();
                                }
                            }
                        }
                        Ok(false) => {}
                        Err(_) => {
                            // Write fault: fatal to the session.
                            shared.running.store(false, Ordering::SeqCst);
                            break;
                        }
                    }
                }

                maybe_emit_metrics(&config, started, &mut last_emit);
            }
        })
    }

    /// Best-effort restore of the peer terminal; runs on every exit path.
    fn teardown(&self) {
        let mut restore = String::new();
        restore.push_str(&self.driver.show_cursor());
        restore.push_str(&self.driver.clear_screen());
        restore.push_str(DISABLE_MOUSE);
        let _ = self.renderer.send_raw(&*self.channel, restore.as_bytes());
        self.channel.close();
    }

    fn lock_ui(&self) -> MutexGuard<'_, UiState> {
        self.shared.ui.lock().unwrap_or_else(|err| err.into_inner())
    }

    fn with_metrics(&self, record: impl FnOnce(&mut SessionMetrics)) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                record(&mut guard);
            }
        }
    }

    fn log<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            let _ = logger.log_event(event_with_fields(level, LOG_TARGET, message, fields));
        }
    }
}

fn maybe_emit_metrics(config: &SessionConfig, started: Instant, last_emit: &mut Instant) {
    let (Some(logger), Some(metrics)) = (config.logger.as_ref(), config.metrics.as_ref()) else {
        return;
    };
    if config.metrics_interval == Duration::from_millis(0) {
        return;
    }
    let now = Instant::now();
    if now.duration_since(*last_emit) < config.metrics_interval {
        return;
    }
    *last_emit = now;
    if let Ok(guard) = metrics.lock() {
        let event = guard
            .snapshot(now.duration_since(started))
            .to_log_event("foyer::session.metrics");
        let _ = logger.log_event(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ScriptedChannel;
    use crate::style::StyledText;
    use crate::terminal::AnsiDriver;

    fn login_layout() -> Layout {
        Layout::new()
            .with(Widget::Label(StyledText::plain("Welcome")))
            .with(Widget::RowGap(2))
            .with(Widget::Input(TextInput::new(
                StyledText::plain("Username - "),
                StyledText::plain(""),
                false,
            )))
            .with(Widget::Input(TextInput::new(
                StyledText::plain("Password - "),
                StyledText::plain(""),
                true,
            )))
    }

    fn session(chunks: Vec<Vec<u8>>) -> (Session, Arc<ScriptedChannel>) {
        let channel = Arc::new(ScriptedChannel::new(chunks));
        let session = Session::new(
            channel.clone(),
            Arc::new(AnsiDriver::new()),
            login_layout(),
        )
        .with_config(SessionConfig {
            frame_interval: Duration::from_millis(1),
            ..SessionConfig::default()
        });
        (session, channel)
    }

    #[test]
    fn quit_ends_the_session_cleanly_with_teardown() {
        let (session, channel) = session(vec![b"\x1b".to_vec(), b"q".to_vec()]);
        session.run().unwrap();

        let sent = String::from_utf8(channel.sent()).unwrap();
        assert!(sent.starts_with("\x1b[?25l"));
        assert!(sent.contains("\x1b[?1006h"));
        assert!(sent.contains("Welcome"));
        assert!(sent.ends_with("\x1b[?1006l\x1b[?1000l"));
        assert!(sent.contains("\x1b[?25h"));
        assert!(channel.is_closed());
    }

    #[test]
    fn typed_values_are_harvested_in_focus_order() {
        let (session, _) = session(vec![
            b"admin".to_vec(),
            b"\r".to_vec(),
            b"hunter2".to_vec(),
            b"\x1b".to_vec(),
            b"q".to_vec(),
        ]);
        session.run().unwrap();
        assert_eq!(session.input_values(), vec!["admin", "hunter2"]);
    }

    #[test]
    fn masked_input_never_reaches_the_wire() {
        let (session, channel) = session(vec![
            b"\r".to_vec(),
            b"hunter2".to_vec(),
            b"\x1b".to_vec(),
            b"q".to_vec(),
        ]);
        session.run().unwrap();
        let sent = String::from_utf8(channel.sent()).unwrap();
        assert!(!sent.contains("hunter2"));
    }

    #[test]
    fn peer_disconnect_is_fatal_but_still_torn_down() {
        let (session, channel) = session(vec![b"abc".to_vec()]);
        let err = session.run().unwrap_err();
        assert!(matches!(err, crate::error::UiError::Io(_)));
        assert!(channel.is_closed());
        let sent = String::from_utf8(channel.sent()).unwrap();
        assert!(sent.contains("\x1b[?25h"));
    }

    #[test]
    fn heartbeat_chunks_are_ignored() {
        let (session, _) = session(vec![
            b"".to_vec(),
            b"hi".to_vec(),
            b"\x1b".to_vec(),
            b"q".to_vec(),
        ]);
        session.run().unwrap();
        assert_eq!(session.input_values()[0], "hi");
    }
}
