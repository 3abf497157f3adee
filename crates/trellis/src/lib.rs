//! Trellis: a retained-mode view tree for 2D game UIs.
//!
//! Trellis keeps a tree of views in an arena and settles it once per frame:
//! reactive property writes mark the owning parent dirty, a deferred
//! post-update pass runs layout strategies over dirty views, constrained
//! children are clamped into their parent's content box, and mouse events
//! bubble from the originating view up to the root.
//!
//! # Quick start
//!
//! The main entry points are:
//! - [`Ui`] - the root context: view arena, fonts, and frame loop
//! - [`View`] - per-view data, reachable through the context
//! - [`Layout`] - the trait behind stack, grid, and flow strategies
//!
//! A frame is driven as `update(dt)`, then `post_update()`, then
//! `draw(sink)`; input dispatch routes cursor positions through
//! [`Ui::dispatch_mouse_move`] and [`Ui::dispatch_click`].

#![warn(missing_docs)]

/// Convenience re-exports for common trellis types.
pub mod prelude;

/// Core error types.
pub mod error;
/// Mouse-event types and handler storage.
pub mod event;
/// Font registry.
pub mod fonts;
/// Layout strategies.
pub mod layout;
/// Observable sequences.
pub mod list;
/// Reactive cells and bindings.
pub mod property;
/// Tooltip state and factory contract.
pub mod tooltip;

/// Parent-bounds clamping.
mod bounds;
/// Arena id types.
mod id;
/// The root context and frame loop.
mod ui;
/// Per-view arena data.
mod view;

pub use error::{Error, Result};
pub use event::{EventData, Handler, ViewEvent};
pub use fonts::{FontFace, Fonts};
pub use geom::{Insets, Rect, Vec2};
pub use id::{FontId, ViewId};
pub use layout::{Axis, FlowLayout, GridLayout, Layout, StackLayout};
pub use list::{ListEvent, ObservableList};
pub use property::{Binding, Property, Signal, Subscription};
pub use tooltip::{TOOLTIP_DWELL_SECS, TooltipFactory, TooltipRequest};
pub use ui::{DrawData, RenderSink, Ui};
pub use view::View;
