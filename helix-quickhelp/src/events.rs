//! Messages fed into the quickhelp controller.
//!
//! The host translates its completion engine notifications into
//! [`CompletionEvent`]s. Timer expirations arrive as
//! [`QuickhelpCommand::TimerFired`], usually over the channel handed to
//! [`TokioIdleTimer`](crate::timer::TokioIdleTimer).

use crate::timer::TimerId;

/// Completion engine notifications quickhelp reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionEvent {
    /// A command ran while the completion menu was open.
    PostEdit,
    /// The selected candidate changed.
    SelectionChanged,
    /// A candidate was committed.
    Completed,
    /// The completion menu was closed or cancelled.
    MenuHidden,
    /// The editor lost focus.
    FocusLost,
    /// The user asked for documentation right now.
    ManualTrigger,
}

/// Everything the controller processes on the host's event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickhelpCommand {
    Event(CompletionEvent),
    TimerFired(TimerId),
}

impl From<CompletionEvent> for QuickhelpCommand {
    fn from(event: CompletionEvent) -> Self {
        Self::Event(event)
    }
}
