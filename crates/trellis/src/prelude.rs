//! Convenience re-exports for common trellis types.

pub use crate::{
    Binding, DrawData, EventData, FontId, Layout, ListEvent, ObservableList, Property, RenderSink,
    Signal, Subscription, Ui, View, ViewEvent, ViewId,
    error,
    layout::{Axis, FlowLayout, GridLayout, StackLayout},
};
pub use geom::{Insets, Rect, Vec2};

/// Common result alias for trellis operations.
pub type Result<T> = error::Result<T>;
