//! Test doubles for the host collaborators.
//!
//! Provides a scripted completion engine, a recording surface, a manual idle
//! timer, and a `Harness` bundling them with a controller so tests can send
//! events and fire timers one step at a time.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use crate::config::PopupConfig;
use crate::controller::{QuickhelpController, SessionContext};
use crate::engine::{Candidate, Capability, ChooseSource, CompletionEngine, DocBuffer, DocResponse};
use crate::error::SurfaceError;
use crate::events::{CompletionEvent, QuickhelpCommand};
use crate::surface::{PopupStyle, RenderSurface, SurfaceHandle};
use crate::timer::{IdleTimer, TimerId};

/// Doc buffer a fake backend serves for one candidate.
#[derive(Debug, Clone)]
pub enum FakeDoc {
    Buffer { text: String, start: Option<usize> },
    /// Several matching sources; the backend asks the chooser.
    Ambiguous(Vec<(String, String)>),
}

/// Completion engine with a fixed candidate list and scripted docs.
pub struct FakeEngine {
    pub candidates: Vec<Candidate>,
    pub selection: Option<usize>,
    /// Quickhelp strings by label.
    pub quickhelp: HashMap<String, String>,
    /// Doc buffers by label.
    pub doc_buffers: HashMap<String, FakeDoc>,
    /// Every capability request, as `(label, capability)`.
    pub requests: Vec<(String, Capability)>,
    /// Number of doc buffers released so far.
    pub released: Rc<Cell<usize>>,
    pub cancelled: bool,
    /// Move the selection here during the next fetch.
    pub move_selection_on_fetch: Option<usize>,
}

impl FakeEngine {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self {
            candidates,
            selection: None,
            quickhelp: HashMap::new(),
            doc_buffers: HashMap::new(),
            requests: Vec::new(),
            released: Rc::new(Cell::new(0)),
            cancelled: false,
            move_selection_on_fetch: None,
        }
    }

    pub fn selecting(mut self, idx: usize) -> Self {
        self.selection = Some(idx);
        self
    }

    pub fn with_quickhelp(mut self, label: &str, text: &str) -> Self {
        self.set_quickhelp(label, text);
        self
    }

    pub fn with_doc_buffer(mut self, label: &str, text: &str, start: Option<usize>) -> Self {
        self.doc_buffers.insert(
            label.to_string(),
            FakeDoc::Buffer {
                text: text.to_string(),
                start,
            },
        );
        self
    }

    pub fn with_ambiguous(mut self, label: &str, sources: Vec<(String, String)>) -> Self {
        self.doc_buffers
            .insert(label.to_string(), FakeDoc::Ambiguous(sources));
        self
    }

    pub fn set_quickhelp(&mut self, label: &str, text: &str) {
        self.quickhelp.insert(label.to_string(), text.to_string());
    }

    fn buffer(&self, text: &str, start: Option<usize>) -> DocBuffer {
        let released = self.released.clone();
        let buffer = DocBuffer::from(text).on_release(move || released.set(released.get() + 1));
        match start {
            Some(start) => buffer.with_start(start),
            None => buffer,
        }
    }
}

impl CompletionEngine for FakeEngine {
    fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    fn selection(&self) -> Option<usize> {
        self.selection
    }

    fn invoke_capability(
        &mut self,
        candidate: &Candidate,
        capability: Capability,
        chooser: &dyn ChooseSource,
    ) -> Option<DocResponse> {
        self.requests.push((candidate.label.clone(), capability));
        if let Some(idx) = self.move_selection_on_fetch.take() {
            self.selection = Some(idx);
        }

        match capability {
            Capability::QuickhelpString => self
                .quickhelp
                .get(&candidate.label)
                .map(|text| DocResponse::Text(text.clone())),
            Capability::DocBuffer => match self.doc_buffers.get(&candidate.label)? {
                FakeDoc::Buffer { text, start } => {
                    Some(DocResponse::Buffer(self.buffer(text, *start)))
                }
                FakeDoc::Ambiguous(sources) => {
                    let names: Vec<String> = sources.iter().map(|(name, _)| name.clone()).collect();
                    let idx = chooser.choose(&names)?;
                    let (_, text) = sources.get(idx)?;
                    Some(DocResponse::Buffer(self.buffer(text, None)))
                }
            },
        }
    }

    fn cancel_completion(&mut self) {
        self.cancelled = true;
    }
}

/// Calls recorded by [`FakeSurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    Create,
    Write(String),
    PlaceBelow(usize),
    PlaceOverlay,
    MarkDedicated,
    Destroy,
    Release,
}

/// Rendering surface that records what it was asked to do.
pub struct FakeSurface {
    pub cursor_row: usize,
    pub height: usize,
    pub calls: Vec<SurfaceCall>,
    pub destroyed: Vec<SurfaceHandle>,
    pub released: Vec<SurfaceHandle>,
    pub style: Option<PopupStyle>,
    live: Option<SurfaceHandle>,
    text: Option<String>,
    next_handle: u64,
    fail_writes: bool,
    unavailable: bool,
}

impl FakeSurface {
    pub fn new(cursor_row: usize, height: usize) -> Self {
        Self {
            cursor_row,
            height,
            calls: Vec::new(),
            destroyed: Vec::new(),
            released: Vec::new(),
            style: None,
            live: None,
            text: None,
            next_handle: 0,
            fail_writes: false,
            unavailable: false,
        }
    }

    /// Reject every write.
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Refuse to create surfaces.
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    /// Text of the live surface, if any.
    pub fn content(&self) -> Option<&str> {
        self.live.and(self.text.as_deref())
    }

    pub fn live_surfaces(&self) -> usize {
        usize::from(self.live.is_some())
    }

    fn retire(&mut self, handle: SurfaceHandle) {
        if self.live == Some(handle) {
            self.live = None;
            self.text = None;
        }
    }
}

impl RenderSurface for FakeSurface {
    fn create_or_reuse(&mut self, _id: &str) -> Result<SurfaceHandle, SurfaceError> {
        if self.unavailable {
            return Err(SurfaceError::Unavailable("no frame".to_string()));
        }
        if let Some(handle) = self.live {
            return Ok(handle);
        }
        self.calls.push(SurfaceCall::Create);
        self.next_handle += 1;
        let handle = SurfaceHandle(self.next_handle);
        self.live = Some(handle);
        Ok(handle)
    }

    fn write_text(&mut self, _handle: SurfaceHandle, text: &str) -> Result<(), SurfaceError> {
        if self.fail_writes {
            return Err(SurfaceError::WriteRejected("read-only".to_string()));
        }
        self.calls.push(SurfaceCall::Write(text.to_string()));
        self.text = Some(text.to_string());
        Ok(())
    }

    fn apply_style(&mut self, _handle: SurfaceHandle, style: &PopupStyle) -> Result<(), SurfaceError> {
        self.style = Some(style.clone());
        Ok(())
    }

    fn mark_dedicated(&mut self, _handle: SurfaceHandle) -> Result<(), SurfaceError> {
        self.calls.push(SurfaceCall::MarkDedicated);
        Ok(())
    }

    fn place_below_cursor(&mut self, _handle: SurfaceHandle, rows: usize) -> Result<(), SurfaceError> {
        self.calls.push(SurfaceCall::PlaceBelow(rows));
        Ok(())
    }

    fn place_as_dedicated_overlay(&mut self, _handle: SurfaceHandle) -> Result<(), SurfaceError> {
        self.calls.push(SurfaceCall::PlaceOverlay);
        Ok(())
    }

    fn destroy(&mut self, handle: SurfaceHandle) {
        self.calls.push(SurfaceCall::Destroy);
        self.destroyed.push(handle);
        self.retire(handle);
    }

    fn release(&mut self, handle: SurfaceHandle) {
        self.calls.push(SurfaceCall::Release);
        self.released.push(handle);
        self.retire(handle);
    }

    fn cursor_screen_row(&self) -> usize {
        self.cursor_row
    }

    fn viewport_height(&self) -> usize {
        self.height
    }
}

/// Idle timer that only fires when a test says so.
#[derive(Debug, Default)]
pub struct ManualTimer {
    /// Delay of every `arm` call, in order.
    pub armed: Vec<Duration>,
    /// Timers armed and not cancelled.
    pub live: Vec<TimerId>,
    next_id: u64,
}

impl IdleTimer for ManualTimer {
    fn arm(&mut self, delay: Duration) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.armed.push(delay);
        self.live.push(id);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.live.retain(|live| *live != id);
    }
}

/// A controller wired to fake collaborators.
pub struct Harness {
    pub controller: QuickhelpController,
    pub engine: FakeEngine,
    pub surface: FakeSurface,
    pub timer: ManualTimer,
}

impl Harness {
    pub fn new(config: PopupConfig, engine: FakeEngine, surface: FakeSurface) -> Self {
        Self {
            controller: QuickhelpController::new(config),
            engine,
            surface,
            timer: ManualTimer::default(),
        }
    }

    pub fn event(&mut self, event: CompletionEvent) {
        let mut cx = SessionContext::new(&mut self.engine, &mut self.surface, &mut self.timer);
        self.controller.handle_event(event, &mut cx);
    }

    pub fn process(&mut self, command: QuickhelpCommand) {
        let mut cx = SessionContext::new(&mut self.engine, &mut self.surface, &mut self.timer);
        self.controller.process(command, &mut cx);
    }

    /// Fire the most recently armed live timer.
    pub fn fire(&mut self) {
        let id = *self.timer.live.last().expect("a live timer");
        self.fire_id(id);
    }

    pub fn fire_id(&mut self, id: TimerId) {
        let mut cx = SessionContext::new(&mut self.engine, &mut self.surface, &mut self.timer);
        self.controller.on_timer_fired(id, &mut cx);
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        let mut cx = SessionContext::new(&mut self.engine, &mut self.surface, &mut self.timer);
        self.controller.set_enabled(enabled, &mut cx);
    }

    pub fn reconfigure(&mut self, config: PopupConfig) {
        let mut cx = SessionContext::new(&mut self.engine, &mut self.surface, &mut self.timer);
        self.controller.reconfigure(config, &mut cx);
    }
}
