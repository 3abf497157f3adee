//! Per-view data stored in the arena.

use geom::{Insets, Vec2};

use crate::{
    event::Handlers,
    id::ViewId,
    layout::Layout,
    list::ObservableList,
    property::{Binding, Property, Subscription},
    tooltip::TooltipState,
};

/// Core view data stored in the [`Ui`](crate::Ui) arena.
///
/// Geometry lives in reactive [`Property`] cells: handles are cheap clones
/// sharing one cell, so gameplay code can hold a position handle and write
/// it without going through the arena. Writes to position, size or the
/// active flag land in the context's invalidation ledger and mark the
/// parent dirty before the next layout pass.
pub struct View {
    /// Display name for lookups; not unique.
    pub(crate) name: Option<String>,
    /// Parent in the arena tree. Non-owning; the parent's child list is the
    /// sole ownership edge.
    pub(crate) parent: Option<ViewId>,
    /// Children in z-order and layout order.
    pub(crate) children: ObservableList<ViewId>,

    /// Local position, relative to the parent content origin and own
    /// anchor offset.
    pub position: Property<Vec2>,
    /// Width in pixels.
    pub width: Property<i32>,
    /// Height in pixels.
    pub height: Property<i32>,
    /// Fraction of the size subtracted from the position, in `[0, 1]²`.
    pub anchor_point: Property<Vec2>,
    /// Scroll offset applied to children's real positions.
    pub content_offset: Property<Vec2>,
    /// Own opacity in `[0, 1]`; composed multiplicatively down the tree.
    pub opacity: Property<f32>,
    /// Inactive views are skipped by drawing, hit testing and layouts.
    pub active: Property<bool>,
    /// Mirror of the root's attachment state, propagated top-down.
    pub attached: Property<bool>,
    /// Set by click dispatch; cleared when a click lands elsewhere.
    pub selected: Property<bool>,

    /// Opt out of parent-bounds clamping.
    pub(crate) ignore_parent_bounds: bool,
    /// Treat a parentless view as orphaned rather than a free root.
    pub(crate) enforce_root_attachment: bool,
    /// Whether hit testing may land on this view.
    pub(crate) accepts_mouse: bool,
    /// Whether the rendering sink should clip this view's content.
    pub(crate) scissor: bool,
    /// Child limit; `None` is unlimited.
    pub(crate) children_allowed: Option<usize>,
    /// Insets carving the content box out of the bound box.
    pub(crate) content_inset: Insets,

    /// Set when a direct child's geometry changes; cleared after layouts
    /// run.
    pub(crate) dirty: bool,
    /// Maintained by hover dispatch.
    pub(crate) hovered: bool,

    /// Layout strategies, run in registration order when dirty.
    pub(crate) layouts: Vec<Box<dyn Layout>>,
    /// Per-event handler lists.
    pub(crate) handlers: Handlers,
    /// Tooltip dwell state.
    pub(crate) tooltip: TooltipState,

    /// Geometry wiring into the invalidation ledger.
    pub(crate) subscriptions: Vec<Subscription>,
    /// User bindings retained for the view's lifetime.
    pub(crate) bindings: Vec<Binding>,
}

impl View {
    /// Construct a detached view with default state.
    pub(crate) fn new() -> Self {
        Self {
            name: None,
            parent: None,
            children: ObservableList::new(),
            position: Property::new(Vec2::zero()),
            width: Property::new(0),
            height: Property::new(0),
            anchor_point: Property::new(Vec2::zero()),
            content_offset: Property::new(Vec2::zero()),
            opacity: Property::new(1.0),
            active: Property::new(true),
            attached: Property::new(false),
            selected: Property::new(false),
            ignore_parent_bounds: true,
            enforce_root_attachment: true,
            accepts_mouse: true,
            scissor: true,
            children_allowed: None,
            content_inset: Insets::default(),
            dirty: false,
            hovered: false,
            layouts: Vec::new(),
            handlers: Handlers::default(),
            tooltip: TooltipState::default(),
            subscriptions: Vec::new(),
            bindings: Vec::new(),
        }
    }

    /// The view's name, if set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Replace the view's name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// The parent view, if attached to one.
    pub fn parent(&self) -> Option<ViewId> {
        self.parent
    }

    /// The ordered child collection.
    pub fn children(&self) -> &ObservableList<ViewId> {
        &self.children
    }

    /// True if a layout pass is pending for this view's children.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// True if the cursor is currently over this view.
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Whether parent-bounds clamping is skipped for this view.
    pub fn ignores_parent_bounds(&self) -> bool {
        self.ignore_parent_bounds
    }

    /// Opt in or out of parent-bounds clamping.
    pub fn set_ignore_parent_bounds(&mut self, ignore: bool) {
        self.ignore_parent_bounds = ignore;
    }

    /// Whether a parentless view counts as orphaned.
    pub fn enforces_root_attachment(&self) -> bool {
        self.enforce_root_attachment
    }

    /// Control whether a parentless view counts as orphaned.
    pub fn set_enforce_root_attachment(&mut self, enforce: bool) {
        self.enforce_root_attachment = enforce;
    }

    /// Whether hit testing may land on this view.
    pub fn accepts_mouse(&self) -> bool {
        self.accepts_mouse
    }

    /// Allow or suppress mouse events on this view.
    pub fn set_accepts_mouse(&mut self, accepts: bool) {
        self.accepts_mouse = accepts;
    }

    /// Whether the rendering sink should clip this view's content.
    pub fn scissor(&self) -> bool {
        self.scissor
    }

    /// Control content clipping in the rendering sink.
    pub fn set_scissor(&mut self, scissor: bool) {
        self.scissor = scissor;
    }

    /// The child limit; `None` is unlimited.
    pub fn children_allowed(&self) -> Option<usize> {
        self.children_allowed
    }

    /// Declare a child limit. Existing children are kept even if they
    /// already exceed the new limit; only further additions fail.
    pub fn set_children_allowed(&mut self, limit: Option<usize>) {
        self.children_allowed = limit;
    }

    /// Insets carving the content box out of the bound box.
    pub fn content_inset(&self) -> Insets {
        self.content_inset
    }

    /// Report an inset content area, as scroll containers do.
    pub fn set_content_inset(&mut self, inset: Insets) {
        self.content_inset = inset;
    }
}
