//! Interface to the host completion engine.
//!
//! The completion engine owns the candidate list, the selection index and the
//! dispatch to completion backends. Quickhelp only reads from it, through the
//! [`CompletionEngine`] trait.

use std::fmt;

use ropey::Rope;

/// One item offered by the completion menu.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Candidate {
    /// Text shown in the menu, used as the candidate identifier.
    pub label: String,
    /// Name of the backend that produced this candidate.
    pub backend: String,
}

impl Candidate {
    pub fn new(label: impl Into<String>, backend: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            backend: backend.into(),
        }
    }
}

/// Documentation capability requested from a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// A short, ready-made documentation string meant for popups.
    QuickhelpString,
    /// The full documentation buffer of the candidate.
    DocBuffer,
}

/// Documentation handed back by a backend.
#[derive(Debug)]
pub enum DocResponse {
    /// A plain string.
    Text(String),
    /// A text buffer, optionally starting at an offset.
    Buffer(DocBuffer),
}

/// A documentation buffer provided by a backend.
///
/// Backends that build temporary buffers attach a release hook with
/// [`DocBuffer::on_release`]; it runs when the buffer is dropped, which the
/// extractor does before returning.
pub struct DocBuffer {
    text: Rope,
    start: Option<usize>,
    release: Option<Box<dyn FnOnce()>>,
}

impl DocBuffer {
    pub fn new(text: Rope) -> Self {
        Self {
            text,
            start: None,
            release: None,
        }
    }

    /// Start reading at `start` (a char index) instead of the beginning.
    #[must_use]
    pub fn with_start(mut self, start: usize) -> Self {
        self.start = Some(start);
        self
    }

    /// Run `release` once the buffer is no longer needed.
    #[must_use]
    pub fn on_release(mut self, release: impl FnOnce() + 'static) -> Self {
        self.release = Some(Box::new(release));
        self
    }

    #[must_use]
    pub fn text(&self) -> &Rope {
        &self.text
    }

    #[must_use]
    pub fn start(&self) -> Option<usize> {
        self.start
    }
}

impl From<&str> for DocBuffer {
    fn from(text: &str) -> Self {
        Self::new(Rope::from_str(text))
    }
}

impl fmt::Debug for DocBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocBuffer")
            .field("len_chars", &self.text.len_chars())
            .field("start", &self.start)
            .field("has_release", &self.release.is_some())
            .finish()
    }
}

impl Drop for DocBuffer {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

/// Strategy used by a backend when several documentation sources match.
///
/// Backends must consult the strategy instead of prompting the user.
pub trait ChooseSource {
    /// Pick one of `options`, returning its index.
    fn choose(&self, options: &[String]) -> Option<usize>;
}

/// Always takes the first option.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstSource;

impl ChooseSource for FirstSource {
    fn choose(&self, options: &[String]) -> Option<usize> {
        if options.is_empty() {
            None
        } else {
            Some(0)
        }
    }
}

/// The host completion engine.
pub trait CompletionEngine {
    /// Candidates currently offered, in menu order.
    fn candidates(&self) -> &[Candidate];

    /// Index of the selected candidate, if any.
    fn selection(&self) -> Option<usize>;

    /// The selected candidate, resolved from [`candidates`](Self::candidates)
    /// and [`selection`](Self::selection).
    fn selected_candidate(&self) -> Option<&Candidate> {
        self.selection().and_then(|idx| self.candidates().get(idx))
    }

    /// Ask the candidate's backend for documentation.
    fn invoke_capability(
        &mut self,
        candidate: &Candidate,
        capability: Capability,
        chooser: &dyn ChooseSource,
    ) -> Option<DocResponse>;

    /// Abort the whole completion session.
    fn cancel_completion(&mut self);
}
