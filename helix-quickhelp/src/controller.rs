//! The quickhelp lifecycle controller.
//!
//! One controller exists per editing session. It reacts to completion
//! events by arming a single idle timer; when the timer fires it fetches the
//! documentation of whatever candidate is selected *at that moment*, places
//! the popup and writes it. Hide requests and focus loss tear everything
//! down. No failure in here reaches the host: the popup is best effort.

use std::time::Duration;

use crate::config::PopupConfig;
use crate::doc::DocExtractor;
use crate::engine::CompletionEngine;
use crate::events::{CompletionEvent, QuickhelpCommand};
use crate::placement::decide_placement;
use crate::surface::{PopupSink, RenderSurface};
use crate::timer::{IdleTimer, TimerId};

/// Delay used by [`QuickhelpController::manual_trigger`].
pub const MANUAL_DELAY: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopupState {
    #[default]
    Hidden,
    TimerArmed,
    Visible,
}

/// The host collaborators a controller operation works with.
pub struct SessionContext<'a> {
    pub engine: &'a mut dyn CompletionEngine,
    pub surface: &'a mut dyn RenderSurface,
    pub timer: &'a mut dyn IdleTimer,
}

impl<'a> SessionContext<'a> {
    pub fn new(
        engine: &'a mut dyn CompletionEngine,
        surface: &'a mut dyn RenderSurface,
        timer: &'a mut dyn IdleTimer,
    ) -> Self {
        Self {
            engine,
            surface,
            timer,
        }
    }
}

/// Drives the documentation popup of one editing session.
pub struct QuickhelpController {
    config: PopupConfig,
    extractor: DocExtractor,
    sink: PopupSink,
    state: PopupState,
    timer: Option<TimerId>,
    enabled: bool,
}

impl QuickhelpController {
    pub fn new(config: PopupConfig) -> Self {
        Self {
            extractor: DocExtractor::from_config(&config),
            sink: PopupSink::new(config.style()),
            enabled: config.enabled,
            state: PopupState::Hidden,
            timer: None,
            config,
        }
    }

    #[must_use]
    pub fn state(&self) -> PopupState {
        self.state
    }

    /// The currently armed timer, if any.
    #[must_use]
    pub fn armed_timer(&self) -> Option<TimerId> {
        self.timer
    }

    #[must_use]
    pub fn is_popup_visible(&self) -> bool {
        self.sink.is_visible()
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Handle one command from the host event loop.
    pub fn process(&mut self, command: QuickhelpCommand, cx: &mut SessionContext<'_>) {
        match command {
            QuickhelpCommand::Event(event) => self.handle_event(event, cx),
            QuickhelpCommand::TimerFired(id) => self.on_timer_fired(id, cx),
        }
    }

    pub fn handle_event(&mut self, event: CompletionEvent, cx: &mut SessionContext<'_>) {
        log::trace!("quickhelp event: {event:?}");
        match event {
            CompletionEvent::PostEdit | CompletionEvent::SelectionChanged => {
                self.on_post_edit_or_selection_change(cx);
            }
            CompletionEvent::Completed | CompletionEvent::MenuHidden => self.on_hide_requested(cx),
            CompletionEvent::FocusLost => self.on_focus_lost(cx),
            CompletionEvent::ManualTrigger => self.manual_trigger(cx),
        }
    }

    /// Arm the idle timer unless one is already armed.
    pub fn on_post_edit_or_selection_change(&mut self, cx: &mut SessionContext<'_>) {
        if !self.enabled || self.timer.is_some() {
            return;
        }
        let Some(delay) = self.config.idle_delay() else {
            return;
        };
        self.arm(delay, cx);
    }

    /// Show documentation almost immediately, whatever the current state.
    ///
    /// Works even when automatic display is disabled.
    pub fn manual_trigger(&mut self, cx: &mut SessionContext<'_>) {
        self.cancel_timer(cx);
        self.arm(MANUAL_DELAY, cx);
    }

    pub fn on_timer_fired(&mut self, id: TimerId, cx: &mut SessionContext<'_>) {
        if self.timer != Some(id) {
            log::trace!("ignoring stale quickhelp timer {id:?}");
            return;
        }
        self.cancel_timer(cx);

        if self.show_selected(cx) {
            self.state = PopupState::Visible;
        } else {
            self.sink.hide(cx.surface);
            self.state = PopupState::Hidden;
        }
    }

    /// Cancel the timer and tear the popup down.
    pub fn on_hide_requested(&mut self, cx: &mut SessionContext<'_>) {
        self.cancel_timer(cx);
        self.sink.hide(cx.surface);
        self.state = PopupState::Hidden;
    }

    /// A popup without a completion session is meaningless: cancel both.
    pub fn on_focus_lost(&mut self, cx: &mut SessionContext<'_>) {
        self.on_hide_requested(cx);
        cx.engine.cancel_completion();
    }

    /// Toggle automatic display. Disabling also hides the popup.
    pub fn set_enabled(&mut self, enabled: bool, cx: &mut SessionContext<'_>) {
        self.enabled = enabled;
        if !enabled {
            self.on_hide_requested(cx);
        }
    }

    /// Switch to a reloaded configuration.
    ///
    /// Extraction settings and colors apply from the next display; an armed
    /// timer keeps its delay. The enabled flag follows the new config.
    pub fn reconfigure(&mut self, config: PopupConfig, cx: &mut SessionContext<'_>) {
        self.extractor = DocExtractor::from_config(&config);
        self.sink.set_style(config.style());
        let enabled = config.enabled;
        self.config = config;
        self.set_enabled(enabled, cx);
    }

    fn arm(&mut self, delay: Duration, cx: &mut SessionContext<'_>) {
        let id = cx.timer.arm(delay);
        log::debug!("armed quickhelp timer {id:?} for {delay:?}");
        self.timer = Some(id);
        self.state = PopupState::TimerArmed;
    }

    fn cancel_timer(&mut self, cx: &mut SessionContext<'_>) {
        if let Some(id) = self.timer.take() {
            cx.timer.cancel(id);
        }
    }

    /// Fetch and show the docs of the selected candidate. Returns whether a
    /// popup is now on screen.
    fn show_selected(&mut self, cx: &mut SessionContext<'_>) -> bool {
        let Some(candidate) = cx.engine.selected_candidate().cloned() else {
            log::trace!("no candidate selected");
            return false;
        };

        let Some(doc) = self.extractor.fetch(cx.engine, &candidate) else {
            log::debug!("no documentation for {}", candidate.label);
            return false;
        };

        if cx.engine.selected_candidate() != Some(&candidate) {
            log::debug!("selection moved away from {} during fetch", candidate.label);
            return false;
        }

        let text = doc.display_text(&self.config.truncation_marker);
        if text.trim().is_empty() {
            return false;
        }

        let placement = decide_placement(cx.surface.cursor_screen_row(), cx.surface.viewport_height());
        match self.sink.show(cx.surface, &text, &placement) {
            Ok(()) => {
                log::debug!(
                    "showing quickhelp for {} ({:?}, {} rows)",
                    candidate.label,
                    placement.mode,
                    placement.rows
                );
                true
            }
            Err(err) => {
                log::warn!("failed to render quickhelp for {}: {err}", candidate.label);
                false
            }
        }
    }
}
