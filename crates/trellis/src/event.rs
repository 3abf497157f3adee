//! Mouse-event types and per-view handler storage.
//!
//! Dispatch itself lives on [`Ui`](crate::Ui): events bubble from the
//! originating view up the ancestor chain in an explicit loop, each ancestor
//! seeing `from_child = true`. There is no consumption mechanism; bubbling
//! always proceeds to the root.

use geom::Vec2;

use crate::{Ui, id::ViewId};

/// Payload for a dispatched mouse event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventData {
    /// Left click at a cursor position.
    Click {
        /// Cursor position in root coordinates.
        pos: Vec2,
    },
    /// Right click at a cursor position.
    RightClick {
        /// Cursor position in root coordinates.
        pos: Vec2,
    },
    /// A click landed somewhere else after this view was last clicked.
    ClickAway,
    /// The cursor entered the view.
    HoverOn,
    /// The cursor left the view.
    HoverOff,
    /// The scroll wheel moved over the view.
    Scroll {
        /// Wheel delta; positive is away from the user.
        delta: i32,
    },
}

impl EventData {
    /// The handler-list slot this payload dispatches to.
    pub(crate) fn kind(&self) -> EventKind {
        match self {
            Self::Click { .. } => EventKind::Click,
            Self::RightClick { .. } => EventKind::RightClick,
            Self::ClickAway => EventKind::ClickAway,
            Self::HoverOn => EventKind::HoverOn,
            Self::HoverOff => EventKind::HoverOff,
            Self::Scroll { .. } => EventKind::Scroll,
        }
    }
}

/// Handler-list selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EventKind {
    /// Left click.
    Click,
    /// Right click.
    RightClick,
    /// Click-away.
    ClickAway,
    /// Hover enter.
    HoverOn,
    /// Hover leave.
    HoverOff,
    /// Scroll wheel.
    Scroll,
}

/// A mouse event as seen by one view in the bubble chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewEvent {
    /// The view the event originated on.
    pub origin: ViewId,
    /// The view whose handlers are being invoked.
    pub view: ViewId,
    /// False only on the originating view.
    pub from_child: bool,
    /// The event payload.
    pub data: EventData,
}

/// A registered event handler.
///
/// Handlers receive the [`Ui`] mutably; the dispatcher takes a view's
/// handler list out of the arena while it runs, so handlers may mutate the
/// tree, including the list they were registered on.
pub type Handler = Box<dyn FnMut(&mut Ui, &ViewEvent)>;

/// Per-view handler lists, one per event kind.
#[derive(Default)]
pub(crate) struct Handlers {
    /// Left-click handlers.
    click: Vec<Handler>,
    /// Right-click handlers.
    right_click: Vec<Handler>,
    /// Click-away handlers.
    click_away: Vec<Handler>,
    /// Hover-enter handlers.
    hover_on: Vec<Handler>,
    /// Hover-leave handlers.
    hover_off: Vec<Handler>,
    /// Scroll handlers.
    scroll: Vec<Handler>,
}

impl Handlers {
    /// The handler list for an event kind.
    pub(crate) fn list_mut(&mut self, kind: EventKind) -> &mut Vec<Handler> {
        match kind {
            EventKind::Click => &mut self.click,
            EventKind::RightClick => &mut self.right_click,
            EventKind::ClickAway => &mut self.click_away,
            EventKind::HoverOn => &mut self.hover_on,
            EventKind::HoverOff => &mut self.hover_off,
            EventKind::Scroll => &mut self.scroll,
        }
    }
}
