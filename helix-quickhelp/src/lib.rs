//! Helix Quickhelp - documentation popups for the completion menu
//!
//! While the user idles on a completion candidate, this crate fetches the
//! candidate's documentation, bounds it to a popup-sized snippet and shows it
//! next to the completion menu. The popup follows the selection and goes
//! away when the menu closes or the editor loses focus.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::mpsc;
//!
//! use helix_quickhelp::{QuickhelpConfig, QuickhelpController, SessionContext, TokioIdleTimer};
//! # use helix_quickhelp::{CompletionEngine, RenderSurface};
//! # fn host(engine: &mut dyn CompletionEngine, surface: &mut dyn RenderSurface) -> anyhow::Result<()> {
//! let config = QuickhelpConfig::load_default()?;
//! let (command_tx, command_rx) = mpsc::channel();
//! let mut timer = TokioIdleTimer::new(command_tx);
//! let mut controller = QuickhelpController::new(config.popup);
//!
//! // On every iteration of the host event loop:
//! while let Ok(command) = command_rx.try_recv() {
//!     let mut cx = SessionContext::new(engine, surface, &mut timer);
//!     controller.process(command, &mut cx);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The completion engine and the rendering surface belong to the host and
//! are reached through the [`CompletionEngine`] and [`RenderSurface`] traits.
//! Everything runs on the host's UI thread:
//!
//! 1. The host forwards completion notifications as [`CompletionEvent`]s
//! 2. The controller arms a single idle timer ([`IdleTimer`])
//! 3. Timer expirations come back as [`QuickhelpCommand::TimerFired`]
//! 4. On expiry the controller fetches docs ([`DocExtractor`]), picks a
//!    placement ([`decide_placement`]) and writes the popup ([`PopupSink`])

pub mod config;
pub mod controller;
pub mod doc;
pub mod engine;
pub mod error;
pub mod events;
pub mod placement;
pub mod surface;
pub mod timer;

#[cfg(test)]
mod test_helpers;

// Convenience re-exports
pub use config::QuickhelpConfig;
pub use controller::{PopupState, QuickhelpController, SessionContext};
pub use doc::{DocExtractor, DocResult};
pub use engine::{Candidate, Capability, ChooseSource, CompletionEngine, DocBuffer, DocResponse, FirstSource};
pub use error::SurfaceError;
pub use events::{CompletionEvent, QuickhelpCommand};
pub use placement::{decide_placement, Cleanup, PlacementDecision, PlacementMode};
pub use surface::{PopupSink, PopupStyle, RenderSurface, SurfaceHandle};
pub use timer::{IdleTimer, TimerId, TokioIdleTimer};
