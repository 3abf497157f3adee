//! Hover-tooltip state.
//!
//! Each view runs a small dwell machine: `Idle` (no hover, timer zero) →
//! `Pending` (hovered with non-empty text, timer accumulating) → `Shown`
//! (overlay spawned under the root). Hover-off or explicit removal returns
//! the view to `Idle`, zeroing the timer and destroying the overlay. The
//! transitions are driven from [`Ui::update`](crate::Ui::update) and the
//! hover events; this module holds the state and the factory contract.

use geom::Vec2;

use crate::{
    Ui,
    id::{FontId, ViewId},
};

/// Hover time before an overlay appears, in seconds.
pub const TOOLTIP_DWELL_SECS: f32 = 1.0;

/// Per-view tooltip state.
#[derive(Default)]
pub(crate) struct TooltipState {
    /// Tooltip text; empty means no tooltip.
    pub(crate) text: String,
    /// Font the overlay should render with.
    pub(crate) font: Option<FontId>,
    /// Accumulated hover time in seconds.
    pub(crate) timer: f32,
    /// The live overlay view, if shown.
    pub(crate) overlay: Option<ViewId>,
}

/// Everything a tooltip factory needs to build an overlay view.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipRequest {
    /// The hovered view the tooltip belongs to.
    pub owner: ViewId,
    /// Tooltip text.
    pub text: String,
    /// Font to render with.
    pub font: FontId,
    /// Suggested overlay position, just below the owner, in root
    /// coordinates.
    pub position: Vec2,
}

/// Builds the overlay widget for a tooltip.
///
/// The factory creates a detached view (typically an external label widget)
/// and returns its id; the controller parents it to the root and positions
/// it. Returning `None` means the overlay could not be built, and the
/// tooltip silently does not appear.
pub type TooltipFactory = Box<dyn FnMut(&mut Ui, &TooltipRequest) -> Option<ViewId>>;
