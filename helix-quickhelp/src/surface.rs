//! Rendering surface interface and the popup render sink.
//!
//! The host provides a [`RenderSurface`] (a floating window, tooltip or split).
//! [`PopupSink`] is the only code that creates, writes, places or destroys the
//! quickhelp surface on it.

use crate::error::SurfaceError;
use crate::placement::{Cleanup, PlacementDecision, PlacementMode};

/// Name of the quickhelp surface.
pub const SURFACE_ID: &str = "*quickhelp*";

/// Opaque handle to a surface owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(pub u64);

/// Color hints for the popup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopupStyle {
    pub foreground: Option<String>,
    pub background: Option<String>,
    /// The surface may keep styling the backend attached to the docs.
    pub styled_text: bool,
}

/// The host's rendering primitive.
pub trait RenderSurface {
    /// Create the surface named `id`, or return it if it already exists.
    fn create_or_reuse(&mut self, id: &str) -> Result<SurfaceHandle, SurfaceError>;

    /// Replace the surface's content with `text`.
    fn write_text(&mut self, handle: SurfaceHandle, text: &str) -> Result<(), SurfaceError>;

    fn apply_style(&mut self, _handle: SurfaceHandle, _style: &PopupStyle) -> Result<(), SurfaceError> {
        Ok(())
    }

    /// Mark the surface so generic window management leaves it alone.
    fn mark_dedicated(&mut self, _handle: SurfaceHandle) -> Result<(), SurfaceError> {
        Ok(())
    }

    /// Show the surface in a new split of `rows` rows below the cursor.
    fn place_below_cursor(&mut self, handle: SurfaceHandle, rows: usize) -> Result<(), SurfaceError>;

    /// Show the surface over an existing region, marked dedicated.
    fn place_as_dedicated_overlay(&mut self, handle: SurfaceHandle) -> Result<(), SurfaceError>;

    fn destroy(&mut self, handle: SurfaceHandle);

    /// Hand a host-managed surface back without destroying it.
    fn release(&mut self, _handle: SurfaceHandle) {}

    fn cursor_screen_row(&self) -> usize;

    fn viewport_height(&self) -> usize;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ShownPopup {
    handle: SurfaceHandle,
    cleanup: Cleanup,
}

/// Writes documentation into the quickhelp surface and tears it down.
#[derive(Debug, Clone)]
pub struct PopupSink {
    style: PopupStyle,
    shown: Option<ShownPopup>,
}

impl PopupSink {
    pub fn new(style: PopupStyle) -> Self {
        Self { style, shown: None }
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.shown.is_some()
    }

    /// Colors used from the next [`show`](Self::show) on.
    pub fn set_style(&mut self, style: PopupStyle) {
        self.style = style;
    }

    /// Show `text`, replacing whatever the popup displayed before.
    ///
    /// On error the popup may be partially set up; call [`hide`](Self::hide)
    /// to tear it down.
    pub fn show(
        &mut self,
        surface: &mut dyn RenderSurface,
        text: &str,
        placement: &PlacementDecision,
    ) -> Result<(), SurfaceError> {
        let handle = surface.create_or_reuse(SURFACE_ID)?;

        // Record the obligation before anything can fail.
        let cleanup = match self.shown {
            Some(prev) if prev.handle == handle => prev.cleanup.merge(placement.cleanup),
            Some(prev) => {
                // The host handed out a different surface; retire the old one.
                Self::teardown(surface, prev);
                placement.cleanup
            }
            None => placement.cleanup,
        };
        self.shown = Some(ShownPopup { handle, cleanup });

        surface.write_text(handle, text)?;
        surface.apply_style(handle, &self.style)?;
        match placement.mode {
            PlacementMode::Below => {
                surface.place_below_cursor(handle, placement.rows)?;
                if placement.dedicated {
                    surface.mark_dedicated(handle)?;
                }
            }
            PlacementMode::Overlay => surface.place_as_dedicated_overlay(handle)?,
        }
        Ok(())
    }

    /// Tear the popup down. Does nothing when no popup is shown.
    pub fn hide(&mut self, surface: &mut dyn RenderSurface) {
        if let Some(shown) = self.shown.take() {
            Self::teardown(surface, shown);
        }
    }

    fn teardown(surface: &mut dyn RenderSurface, shown: ShownPopup) {
        log::trace!("tearing down quickhelp popup ({:?})", shown.cleanup);
        match shown.cleanup {
            Cleanup::DestroyOnHide => surface.destroy(shown.handle),
            Cleanup::HostManaged => surface.release(shown.handle),
        }
    }
}
