//! Where the documentation popup goes.

/// Rows taken by the completion menu and status chrome between the cursor
/// and the popup area.
pub const FIXED_CHROME_ROWS: usize = 14;

/// Fewer free rows than this below the cursor and the popup is overlaid
/// instead of split off below.
pub const MIN_BELOW_ROWS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementMode {
    /// A new split below the cursor area.
    Below,
    /// An existing window region reused as a dedicated overlay.
    Overlay,
}

/// Teardown obligation for a shown popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Cleanup {
    /// The host reclaims the surface itself; only release it.
    HostManaged,
    /// Quickhelp created the surface and must destroy it on hide.
    DestroyOnHide,
}

impl Cleanup {
    /// The stricter of two obligations.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        self.max(other)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementDecision {
    pub mode: PlacementMode,
    pub rows: usize,
    /// Generic window management must not reuse the surface.
    pub dedicated: bool,
    pub cleanup: Cleanup,
}

/// Decide placement from the cursor's screen row and the viewport height.
#[must_use]
pub fn decide_placement(cursor_screen_row: usize, viewport_height: usize) -> PlacementDecision {
    let remaining = viewport_height
        .saturating_sub(cursor_screen_row)
        .saturating_sub(FIXED_CHROME_ROWS);

    if remaining < MIN_BELOW_ROWS {
        PlacementDecision {
            mode: PlacementMode::Overlay,
            rows: remaining,
            dedicated: true,
            cleanup: Cleanup::HostManaged,
        }
    } else {
        PlacementDecision {
            mode: PlacementMode::Below,
            rows: remaining,
            dedicated: true,
            cleanup: Cleanup::DestroyOnHide,
        }
    }
}
