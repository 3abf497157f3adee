//! The arena-backed view tree and its frame loop.
//!
//! [`Ui`] is the root context: it owns every view, the font registry, and
//! the invalidation ledger that geometry writes land in. A frame is driven
//! as `update(dt)` (tooltip dwell, bounds clamping), then `post_update()`
//! (deferred layout settling), then `draw(sink)`.

use std::{cell::RefCell, mem, path::PathBuf, rc::Rc};

use geom::{Rect, Vec2};
use slotmap::SlotMap;
use tracing::{debug, trace};

use crate::{
    bounds,
    error::{Error, Result},
    event::{EventData, EventKind, ViewEvent},
    fonts::Fonts,
    id::{FontId, ViewId},
    layout::Layout,
    property::{Binding, Subscription},
    tooltip::{TOOLTIP_DWELL_SECS, TooltipFactory, TooltipRequest},
    view::View,
};

/// Ledger of views whose geometry-affecting properties changed since the
/// last settle. Shared with the per-view property subscriptions.
type ChangeLedger = Rc<RefCell<Vec<ViewId>>>;

/// Geometry snapshot handed to the rendering sink for one view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawData<'a> {
    /// The view being drawn.
    pub view: ViewId,
    /// The view's name, if set.
    pub name: Option<&'a str>,
    /// Absolute bound box in root coordinates.
    pub bounds: Rect,
    /// Absolute content box in root coordinates.
    pub content_bounds: Rect,
    /// Effective opacity, composed through all ancestors.
    pub opacity: f32,
    /// Whether the sink should clip content to the content box.
    pub scissor: bool,
}

/// Rendering sink the tree draws into.
///
/// The core walks the tree in child order, self before children, and calls
/// both hooks per view; it does not rasterize anything itself.
pub trait RenderSink {
    /// Draw the view's own chrome.
    fn draw(&mut self, view: &DrawData<'_>);

    /// Draw the view's content region, clipped if `scissor` is set.
    fn draw_content(&mut self, view: &DrawData<'_>);
}

/// The UI root context: view arena, fonts, and frame loop.
pub struct Ui {
    /// View storage arena.
    pub(crate) views: SlotMap<ViewId, View>,
    /// Root view id.
    root: ViewId,
    /// Named font handles.
    fonts: Fonts,
    /// Views with geometry writes pending dirty propagation.
    changed: ChangeLedger,
    /// View currently under the cursor.
    hovered: Option<ViewId>,
    /// View that received the last click, for click-away dispatch.
    clicked: Option<ViewId>,
    /// Builds tooltip overlay widgets; a bare view is used when unset.
    tooltip_factory: Option<TooltipFactory>,
    /// Delta time of the current frame, for handlers that need it.
    frame_dt: f32,
}

impl Default for Ui {
    fn default() -> Self {
        Self::new()
    }
}

impl Ui {
    /// Create a context with a fresh root view.
    ///
    /// The root is attached by definition; its attachment value is
    /// authoritative and propagates to everything added under it.
    pub fn new() -> Self {
        let mut views = SlotMap::with_key();
        let root = views.insert(View::new());
        let mut ui = Self {
            views,
            root,
            fonts: Fonts::new(),
            changed: Rc::default(),
            hovered: None,
            clicked: None,
            tooltip_factory: None,
            frame_dt: 0.0,
        };
        ui.wire(root);
        if let Some(view) = ui.views.get_mut(root) {
            view.set_name("root");
            view.attached.set(true);
        }
        ui
    }

    /// Create a detached view owned by this context.
    pub fn create_view(&mut self) -> ViewId {
        let id = self.views.insert(View::new());
        self.wire(id);
        trace!(?id, "created view");
        id
    }

    /// Subscribe the view's geometry-affecting properties to the
    /// invalidation ledger. The parent owns the layout decision for where a
    /// child sits, so these writes end up marking the parent dirty.
    fn wire(&mut self, id: ViewId) {
        let Some(view) = self.views.get_mut(id) else {
            return;
        };
        let mut wiring: Vec<Subscription> = Vec::with_capacity(4);
        let ledger = Rc::clone(&self.changed);
        wiring.push(view.position.subscribe(move |_| ledger.borrow_mut().push(id)));
        let ledger = Rc::clone(&self.changed);
        wiring.push(view.width.subscribe(move |_| ledger.borrow_mut().push(id)));
        let ledger = Rc::clone(&self.changed);
        wiring.push(view.height.subscribe(move |_| ledger.borrow_mut().push(id)));
        let ledger = Rc::clone(&self.changed);
        wiring.push(view.active.subscribe(move |_| ledger.borrow_mut().push(id)));
        view.subscriptions.extend(wiring);
    }

    /// The root view id.
    pub fn root(&self) -> ViewId {
        self.root
    }

    /// A view by id, if live.
    pub fn view(&self, id: ViewId) -> Option<&View> {
        self.views.get(id)
    }

    /// A view by id, mutably, if live.
    pub fn view_mut(&mut self, id: ViewId) -> Option<&mut View> {
        self.views.get_mut(id)
    }

    /// True if the id resolves to a live view.
    pub fn contains(&self, id: ViewId) -> bool {
        self.views.contains_key(id)
    }

    /// Number of live views, including the root.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// True if the arena holds no views. Never the case in practice, since
    /// the root is created with the context and cannot be removed.
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// The font registry.
    pub fn fonts(&self) -> &Fonts {
        &self.fonts
    }

    /// The font registry, mutably.
    pub fn fonts_mut(&mut self) -> &mut Fonts {
        &mut self.fonts
    }

    /// Register a font file under a name.
    pub fn register_font(&mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> FontId {
        self.fonts.register(name, path)
    }

    /// Delta time passed to the current [`update`](Self::update) call.
    pub fn frame_dt(&self) -> f32 {
        self.frame_dt
    }

    /// Snapshot of a view's children, in order.
    pub fn children_of(&self, id: ViewId) -> Vec<ViewId> {
        self.views
            .get(id)
            .map(|view| view.children.iter().copied().collect())
            .unwrap_or_default()
    }

    /// True if the view is parentless, is not the root, and enforces root
    /// attachment: it exists outside the designated tree.
    pub fn is_orphaned(&self, id: ViewId) -> bool {
        self.views.get(id).is_some_and(|view| {
            id != self.root && view.parent.is_none() && view.enforce_root_attachment
        })
    }

    // ------------------------------------------------------------------
    // Hierarchy mutation
    // ------------------------------------------------------------------

    /// Attach `child` under `parent`, re-parenting if necessary.
    ///
    /// Fails with [`Error::CapacityExceeded`] before anything changes when
    /// the parent declares a child limit and is full. A child that already
    /// has a parent is detached from it first; re-parenting never
    /// duplicates. The child inherits the parent's attachment state, which
    /// cascades through its whole subtree.
    pub fn add_child(&mut self, parent: ViewId, child: ViewId) -> Result<()> {
        if !self.views.contains_key(parent) {
            return Err(Error::ViewNotFound(parent));
        }
        if !self.views.contains_key(child) {
            return Err(Error::ViewNotFound(child));
        }
        if child == self.root {
            return Err(Error::RootImmutable);
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(Error::WouldCycle { parent, child });
        }
        let parent_view = &self.views[parent];
        if let Some(limit) = parent_view.children_allowed
            && parent_view.children.len() + 1 > limit
        {
            return Err(Error::CapacityExceeded { parent, limit });
        }

        if let Some(old) = self.views[child].parent {
            self.unlink(old, child);
        }
        if let Some(view) = self.views.get_mut(child) {
            view.parent = Some(parent);
        }
        if let Some(view) = self.views.get_mut(parent) {
            view.children.push(child);
            view.dirty = true;
        }
        let attached = self.views[parent].attached.get();
        self.propagate_attached(child, attached);
        // Both sides of the link are maintained here and in unlink; a view
        // appearing in a children list without the matching parent pointer
        // is a programming error.
        debug_assert!(self.views[parent].children.contains(&child));
        debug_assert_eq!(self.views[child].parent, Some(parent));
        debug!(?parent, ?child, "attached view");
        Ok(())
    }

    /// Detach `child` from `parent`. Removing a view that is not currently
    /// a child of `parent` is a no-op, not an error.
    pub fn remove_child(&mut self, parent: ViewId, child: ViewId) -> Result<()> {
        if !self.views.contains_key(parent) {
            return Err(Error::ViewNotFound(parent));
        }
        if self.views.get(child).is_some_and(|v| v.parent == Some(parent)) {
            self.unlink(parent, child);
        }
        Ok(())
    }

    /// Detach every child of `parent`.
    pub fn remove_all_children(&mut self, parent: ViewId) -> Result<()> {
        if !self.views.contains_key(parent) {
            return Err(Error::ViewNotFound(parent));
        }
        for child in self.children_of(parent) {
            self.unlink(parent, child);
        }
        Ok(())
    }

    /// Re-parent `child` under `parent`, detaching from any current parent.
    pub fn set_parent(&mut self, child: ViewId, parent: ViewId) -> Result<()> {
        self.add_child(parent, child)
    }

    /// Move `child` to the end of `parent`'s child order, in front of its
    /// siblings. Strictly a no-op when already last, so no layout churn.
    pub fn bring_to_front(&mut self, parent: ViewId, child: ViewId) -> Result<()> {
        let view = self
            .views
            .get_mut(parent)
            .ok_or(Error::ViewNotFound(parent))?;
        if view.children.last() == Some(&child) {
            return Ok(());
        }
        if view.children.remove_item(&child) {
            view.children.push(child);
            view.dirty = true;
        }
        Ok(())
    }

    /// Delete a view and its whole subtree, post-order.
    ///
    /// Tooltip overlays owned by deleted views are destroyed as well, and
    /// the old parent's layout is invalidated. Dropping each view drops its
    /// subscriptions and retained bindings.
    pub fn remove(&mut self, id: ViewId) -> Result<()> {
        if id == self.root {
            return Err(Error::RootImmutable);
        }
        if !self.views.contains_key(id) {
            return Err(Error::ViewNotFound(id));
        }

        let order = self.post_order(id);
        // Overlays hang under the root, outside this subtree.
        for view in &order {
            self.remove_tooltip(*view);
        }
        if let Some(parent) = self.views.get(id).and_then(|v| v.parent) {
            self.unlink(parent, id);
        }
        for view in order {
            if self.hovered == Some(view) {
                self.hovered = None;
            }
            if self.clicked == Some(view) {
                self.clicked = None;
            }
            self.views.remove(view);
        }
        debug!(?id, "removed subtree");
        Ok(())
    }

    /// Sever the parent/child link both ways and invalidate the parent's
    /// layout. A detached subtree is no longer attached to the root.
    fn unlink(&mut self, parent: ViewId, child: ViewId) {
        if let Some(view) = self.views.get_mut(parent) {
            view.children.remove_item(&child);
            view.dirty = true;
        }
        if let Some(view) = self.views.get_mut(child) {
            view.parent = None;
        }
        self.propagate_attached(child, false);
    }

    /// True if `ancestor` appears on `view`'s parent chain.
    fn is_ancestor(&self, ancestor: ViewId, view: ViewId) -> bool {
        let mut current = self.views.get(view).and_then(|v| v.parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.views.get(id).and_then(|v| v.parent);
        }
        false
    }

    /// Set a subtree's attachment state, top-down. For the root this value
    /// is authoritative; everywhere else it mirrors the parent.
    pub fn set_attached(&mut self, id: ViewId, attached: bool) -> Result<()> {
        if !self.views.contains_key(id) {
            return Err(Error::ViewNotFound(id));
        }
        self.propagate_attached(id, attached);
        Ok(())
    }

    /// Walk the subtree setting every attachment flag.
    fn propagate_attached(&mut self, id: ViewId, attached: bool) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let Some(view) = self.views.get(id) else {
                continue;
            };
            view.attached.set(attached);
            stack.extend(view.children.iter().copied());
        }
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// All descendants of `root` named `name`, depth-first in insertion
    /// order. `depth` limits recursion levels; `None` is unbounded.
    pub fn find_children_by_name(
        &self,
        root: ViewId,
        name: &str,
        depth: Option<usize>,
    ) -> Vec<ViewId> {
        let mut found = Vec::new();
        self.collect_by_name(root, name, depth, &mut found);
        found
    }

    /// Accumulate matches under `id` into `found`.
    fn collect_by_name(&self, id: ViewId, name: &str, depth: Option<usize>, found: &mut Vec<ViewId>) {
        let next = match depth {
            Some(0) => return,
            Some(levels) => Some(levels - 1),
            None => None,
        };
        for &child in self.views.get(id).map(|v| v.children.as_slice()).unwrap_or_default() {
            if self.views.get(child).is_some_and(|v| v.name.as_deref() == Some(name)) {
                found.push(child);
            }
            self.collect_by_name(child, name, next, found);
        }
    }

    /// The first descendant of `root` named `name`: each child is checked,
    /// then its whole subtree, before moving to the next sibling. Absence
    /// is a normal outcome, not an error.
    pub fn find_first_child_by_name(
        &self,
        root: ViewId,
        name: &str,
        depth: Option<usize>,
    ) -> Option<ViewId> {
        let next = match depth {
            Some(0) => return None,
            Some(levels) => Some(levels - 1),
            None => None,
        };
        for &child in self.views.get(root).map(|v| v.children.as_slice()).unwrap_or_default() {
            if self.views.get(child).is_some_and(|v| v.name.as_deref() == Some(name)) {
                return Some(child);
            }
            if let Some(found) = self.find_first_child_by_name(child, name, next) {
                return Some(found);
            }
        }
        None
    }

    // ------------------------------------------------------------------
    // Derived geometry
    // ------------------------------------------------------------------

    /// The anchor offset: size scaled by the anchor point.
    fn anchor_offset(view: &View) -> Vec2 {
        let anchor = view.anchor_point.get();
        Vec2::new(
            view.width.get() as f32 * anchor.x,
            view.height.get() as f32 * anchor.y,
        )
    }

    /// Local position adjusted for the anchor offset and the parent's
    /// scroll offset: the top-left corner in parent content coordinates.
    pub fn real_position(&self, id: ViewId) -> Vec2 {
        let Some(view) = self.views.get(id) else {
            return Vec2::zero();
        };
        let mut real = view.position.get() - Self::anchor_offset(view);
        if let Some(parent) = view.parent
            && let Some(parent_view) = self.views.get(parent)
        {
            real = real - parent_view.content_offset.get();
        }
        real
    }

    /// Real position accumulated through all ancestors, in root
    /// coordinates.
    pub fn absolute_position(&self, id: ViewId) -> Vec2 {
        let mut position = self.real_position(id);
        let mut current = self.views.get(id).and_then(|v| v.parent);
        while let Some(id) = current {
            position = position + self.real_position(id);
            current = self.views.get(id).and_then(|v| v.parent);
        }
        position
    }

    /// The view's box at its real position, in parent content coordinates.
    pub fn bound_box(&self, id: ViewId) -> Rect {
        let Some(view) = self.views.get(id) else {
            return Rect::zero();
        };
        let real = self.real_position(id);
        Rect::new(real.x as i32, real.y as i32, view.width.get(), view.height.get())
    }

    /// The view's box in root coordinates.
    pub fn absolute_bound_box(&self, id: ViewId) -> Rect {
        let Some(view) = self.views.get(id) else {
            return Rect::zero();
        };
        let absolute = self.absolute_position(id);
        Rect::new(
            absolute.x as i32,
            absolute.y as i32,
            view.width.get(),
            view.height.get(),
        )
    }

    /// The area children may occupy, in parent content coordinates: the
    /// bound box shrunk by the view's content inset.
    pub fn content_bound_box(&self, id: ViewId) -> Rect {
        let inset = self.views.get(id).map(|v| v.content_inset).unwrap_or_default();
        self.bound_box(id).inset(inset)
    }

    /// The content box in root coordinates.
    pub fn absolute_content_bound_box(&self, id: ViewId) -> Rect {
        let inset = self.views.get(id).map(|v| v.content_inset).unwrap_or_default();
        self.absolute_bound_box(id).inset(inset)
    }

    /// Own opacity multiplied through all ancestors.
    pub fn effective_opacity(&self, id: ViewId) -> f32 {
        let mut opacity = 1.0;
        let mut current = Some(id);
        while let Some(id) = current {
            let Some(view) = self.views.get(id) else {
                break;
            };
            opacity *= view.opacity.get();
            current = view.parent;
        }
        opacity
    }

    // ------------------------------------------------------------------
    // Fluent property setters
    // ------------------------------------------------------------------

    /// Set a view's local position.
    pub fn set_position(&mut self, id: ViewId, position: Vec2) -> &mut Self {
        if let Some(view) = self.views.get(id) {
            view.position.set(position);
        }
        self
    }

    /// Set a view's width.
    pub fn set_width(&mut self, id: ViewId, width: i32) -> &mut Self {
        if let Some(view) = self.views.get(id) {
            view.width.set(width);
        }
        self
    }

    /// Set a view's height.
    pub fn set_height(&mut self, id: ViewId, height: i32) -> &mut Self {
        if let Some(view) = self.views.get(id) {
            view.height.set(height);
        }
        self
    }

    /// Set a view's own opacity.
    pub fn set_opacity(&mut self, id: ViewId, opacity: f32) -> &mut Self {
        if let Some(view) = self.views.get(id) {
            view.opacity.set(opacity);
        }
        self
    }

    /// Set a view's anchor point.
    pub fn set_anchor_point(&mut self, id: ViewId, anchor: Vec2) -> &mut Self {
        if let Some(view) = self.views.get(id) {
            view.anchor_point.set(anchor);
        }
        self
    }

    /// Set a view's content scroll offset.
    pub fn set_content_offset(&mut self, id: ViewId, offset: Vec2) -> &mut Self {
        if let Some(view) = self.views.get(id) {
            view.content_offset.set(offset);
        }
        self
    }

    /// Set a view's active flag.
    pub fn set_active(&mut self, id: ViewId, active: bool) -> &mut Self {
        if let Some(view) = self.views.get(id) {
            view.active.set(active);
        }
        self
    }

    /// Set a view's name.
    pub fn set_name(&mut self, id: ViewId, name: impl Into<String>) -> &mut Self {
        if let Some(view) = self.views.get_mut(id) {
            view.set_name(name);
        }
        self
    }

    /// Retain a binding for the view's lifetime; it is dropped with the
    /// view, detaching its callbacks.
    pub fn retain_binding(&mut self, id: ViewId, binding: Binding) -> Result<()> {
        let view = self.views.get_mut(id).ok_or(Error::ViewNotFound(id))?;
        view.bindings.push(binding);
        Ok(())
    }

    /// Retain a bare subscription for the view's lifetime.
    pub fn retain_subscription(&mut self, id: ViewId, subscription: Subscription) -> Result<()> {
        let view = self.views.get_mut(id).ok_or(Error::ViewNotFound(id))?;
        view.subscriptions.push(subscription);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Frame loop
    // ------------------------------------------------------------------

    /// Per-frame update: settle pending dirty marks, then run tooltip
    /// dwell timers and parent-bounds clamping over the active tree.
    pub fn update(&mut self, dt: f32) {
        self.frame_dt = dt;
        self.drain_changes();
        for id in self.pre_order(self.root) {
            if !self.views.get(id).is_some_and(|v| v.active.get()) {
                continue;
            }
            self.tooltip_tick(id, dt);
            bounds::clamp_to_parent(self, id);
        }
    }

    /// Deferred layout pass: runs each dirty view's layout strategies in
    /// registration order, then clears the flag.
    ///
    /// N property writes during a frame still produce exactly one layout
    /// run per dirty view.
    pub fn post_update(&mut self) {
        self.drain_changes();
        for id in self.pre_order(self.root) {
            if !self.views.get(id).is_some_and(|v| v.dirty) {
                continue;
            }
            self.run_layouts(id);
            // The layout's own writes land back in the ledger and would
            // re-mark this view; consume them before clearing so a settle
            // converges in one pass.
            self.drain_changes();
            if let Some(view) = self.views.get_mut(id) {
                view.dirty = false;
            }
            trace!(?id, "layout settled");
        }
    }

    /// Mark the parents of ledgered views dirty. Writes on parentless
    /// views are inert.
    fn drain_changes(&mut self) {
        let changed = mem::take(&mut *self.changed.borrow_mut());
        for id in changed {
            let Some(parent) = self.views.get(id).and_then(|v| v.parent) else {
                continue;
            };
            if let Some(view) = self.views.get_mut(parent) {
                view.dirty = true;
            }
        }
    }

    /// Run a view's layout strategies against its current children. The
    /// strategies are taken out of the arena for the call so they can
    /// reposition children through the context.
    fn run_layouts(&mut self, id: ViewId) {
        let Some(view) = self.views.get_mut(id) else {
            return;
        };
        let mut layouts = mem::take(&mut view.layouts);
        for layout in &mut layouts {
            layout.order_children(self, id);
        }
        if let Some(view) = self.views.get_mut(id) {
            let added = mem::replace(&mut view.layouts, layouts);
            view.layouts.extend(added);
        }
    }

    /// Attach a layout strategy to a view and schedule a settle.
    pub fn add_layout(&mut self, id: ViewId, layout: Box<dyn Layout>) -> Result<()> {
        let view = self.views.get_mut(id).ok_or(Error::ViewNotFound(id))?;
        view.layouts.push(layout);
        view.dirty = true;
        Ok(())
    }

    /// Subtree ids in pre-order, parents before children.
    fn pre_order(&self, root: ViewId) -> Vec<ViewId> {
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(view) = self.views.get(id) else {
                continue;
            };
            order.push(id);
            for &child in view.children.iter().rev() {
                stack.push(child);
            }
        }
        order
    }

    /// Subtree ids in post-order, children before parents.
    fn post_order(&self, root: ViewId) -> Vec<ViewId> {
        let mut order = Vec::new();
        self.collect_post_order(root, &mut order);
        order
    }

    /// Accumulate the subtree under `id` post-order into `order`.
    fn collect_post_order(&self, id: ViewId, order: &mut Vec<ViewId>) {
        let Some(view) = self.views.get(id) else {
            return;
        };
        for &child in view.children.iter() {
            self.collect_post_order(child, order);
        }
        order.push(id);
    }

    // ------------------------------------------------------------------
    // Drawing
    // ------------------------------------------------------------------

    /// Draw the active tree into a rendering sink, self before children,
    /// children in order so later siblings land on top.
    pub fn draw(&self, sink: &mut dyn RenderSink) {
        self.draw_view(self.root, sink);
    }

    /// Draw one view and recurse into its children.
    fn draw_view(&self, id: ViewId, sink: &mut dyn RenderSink) {
        let Some(view) = self.views.get(id) else {
            return;
        };
        if !view.active.get() {
            return;
        }
        let data = DrawData {
            view: id,
            name: view.name.as_deref(),
            bounds: self.absolute_bound_box(id),
            content_bounds: self.absolute_content_bound_box(id),
            opacity: self.effective_opacity(id),
            scissor: view.scissor,
        };
        sink.draw(&data);
        sink.draw_content(&data);
        for &child in view.children.iter() {
            self.draw_view(child, sink);
        }
    }

    // ------------------------------------------------------------------
    // Event dispatch
    // ------------------------------------------------------------------

    /// Register a left-click handler.
    pub fn on_click(
        &mut self,
        id: ViewId,
        handler: impl FnMut(&mut Self, &ViewEvent) + 'static,
    ) -> Result<()> {
        self.push_handler(id, EventKind::Click, handler)
    }

    /// Register a right-click handler.
    pub fn on_right_click(
        &mut self,
        id: ViewId,
        handler: impl FnMut(&mut Self, &ViewEvent) + 'static,
    ) -> Result<()> {
        self.push_handler(id, EventKind::RightClick, handler)
    }

    /// Register a click-away handler.
    pub fn on_click_away(
        &mut self,
        id: ViewId,
        handler: impl FnMut(&mut Self, &ViewEvent) + 'static,
    ) -> Result<()> {
        self.push_handler(id, EventKind::ClickAway, handler)
    }

    /// Register a hover-enter handler.
    pub fn on_hover(
        &mut self,
        id: ViewId,
        handler: impl FnMut(&mut Self, &ViewEvent) + 'static,
    ) -> Result<()> {
        self.push_handler(id, EventKind::HoverOn, handler)
    }

    /// Register a hover-leave handler.
    pub fn on_hover_off(
        &mut self,
        id: ViewId,
        handler: impl FnMut(&mut Self, &ViewEvent) + 'static,
    ) -> Result<()> {
        self.push_handler(id, EventKind::HoverOff, handler)
    }

    /// Register a scroll handler.
    pub fn on_scroll(
        &mut self,
        id: ViewId,
        handler: impl FnMut(&mut Self, &ViewEvent) + 'static,
    ) -> Result<()> {
        self.push_handler(id, EventKind::Scroll, handler)
    }

    /// Append a handler to the list for an event kind.
    fn push_handler(
        &mut self,
        id: ViewId,
        kind: EventKind,
        handler: impl FnMut(&mut Self, &ViewEvent) + 'static,
    ) -> Result<()> {
        let view = self.views.get_mut(id).ok_or(Error::ViewNotFound(id))?;
        view.handlers.list_mut(kind).push(Box::new(handler));
        Ok(())
    }

    /// Drop every left-click handler on a view.
    pub fn clear_click_handlers(&mut self, id: ViewId) {
        if let Some(view) = self.views.get_mut(id) {
            view.handlers.list_mut(EventKind::Click).clear();
        }
    }

    /// Drop every scroll handler on a view.
    pub fn clear_scroll_handlers(&mut self, id: ViewId) {
        if let Some(view) = self.views.get_mut(id) {
            view.handlers.list_mut(EventKind::Scroll).clear();
        }
    }

    /// Dispatch a left click originating on `id`.
    pub fn mouse_click(&mut self, id: ViewId, pos: Vec2) {
        self.bubble(id, EventData::Click { pos });
    }

    /// Dispatch a right click originating on `id`.
    pub fn mouse_right_click(&mut self, id: ViewId, pos: Vec2) {
        self.bubble(id, EventData::RightClick { pos });
    }

    /// Dispatch a click-away originating on `id`.
    pub fn mouse_click_away(&mut self, id: ViewId) {
        self.bubble(id, EventData::ClickAway);
    }

    /// Dispatch a hover-enter originating on `id`.
    pub fn mouse_over(&mut self, id: ViewId) {
        self.bubble(id, EventData::HoverOn);
    }

    /// Dispatch a hover-leave originating on `id`.
    pub fn mouse_off(&mut self, id: ViewId) {
        self.bubble(id, EventData::HoverOff);
    }

    /// Dispatch a scroll originating on `id`.
    pub fn mouse_scroll(&mut self, id: ViewId, delta: i32) {
        self.bubble(id, EventData::Scroll { delta });
    }

    /// Walk the ancestor chain from `origin` to the root, invoking each
    /// view's handlers for the event kind. There is no consumption; every
    /// ancestor is visited. Hover events reset the visited view's tooltip
    /// before its handlers run.
    fn bubble(&mut self, origin: ViewId, data: EventData) {
        let chain = self.ancestor_chain(origin);
        trace!(?origin, kind = ?data.kind(), depth = chain.len(), "bubbling event");
        for (hop, &id) in chain.iter().enumerate() {
            if matches!(data, EventData::HoverOn | EventData::HoverOff) {
                self.remove_tooltip(id);
            }
            let event = ViewEvent {
                origin,
                view: id,
                from_child: hop > 0,
                data,
            };
            self.invoke_handlers(id, &event);
        }
    }

    /// The chain from `origin` to the root, origin first. A snapshot, so
    /// handlers may re-parent views mid-dispatch without affecting the
    /// current walk.
    fn ancestor_chain(&self, origin: ViewId) -> Vec<ViewId> {
        let mut chain = Vec::new();
        let mut current = Some(origin);
        while let Some(id) = current {
            let Some(view) = self.views.get(id) else {
                break;
            };
            chain.push(id);
            current = view.parent;
        }
        chain
    }

    /// Run one view's handler list for the event. The list is taken out of
    /// the arena for the calls; handlers registered during dispatch are
    /// spliced back in without running for this event.
    fn invoke_handlers(&mut self, id: ViewId, event: &ViewEvent) {
        let kind = event.data.kind();
        let Some(view) = self.views.get_mut(id) else {
            return;
        };
        let mut handlers = mem::take(view.handlers.list_mut(kind));
        for handler in &mut handlers {
            handler(self, event);
        }
        if let Some(view) = self.views.get_mut(id) {
            let list = view.handlers.list_mut(kind);
            let added = mem::replace(list, handlers);
            list.extend(added);
        }
    }

    /// Track the view under the cursor, firing hover-leave then
    /// hover-enter exactly on transitions.
    pub fn set_hovered(&mut self, target: Option<ViewId>) {
        let target = target.filter(|id| self.views.contains_key(*id));
        if self.hovered == target {
            return;
        }
        if let Some(old) = self.hovered.take() {
            if let Some(view) = self.views.get_mut(old) {
                view.hovered = false;
            }
            self.mouse_off(old);
        }
        self.hovered = target;
        if let Some(new) = target {
            if let Some(view) = self.views.get_mut(new) {
                view.hovered = true;
            }
            self.mouse_over(new);
        }
    }

    /// The view currently under the cursor, if any.
    pub fn hovered(&self) -> Option<ViewId> {
        self.hovered
    }

    /// The deepest active view whose absolute box contains `pos`,
    /// preferring later siblings, which draw on top. Views that do not
    /// accept mouse events are transparent to the test but their children
    /// are not.
    pub fn view_at(&self, pos: Vec2) -> Option<ViewId> {
        self.hit(self.root, pos)
    }

    /// Recursive hit test, front-most child first.
    fn hit(&self, id: ViewId, pos: Vec2) -> Option<ViewId> {
        let view = self.views.get(id)?;
        if !view.active.get() {
            return None;
        }
        for &child in view.children.iter().rev() {
            if let Some(found) = self.hit(child, pos) {
                return Some(found);
            }
        }
        (view.accepts_mouse && self.absolute_bound_box(id).contains(pos)).then_some(id)
    }

    /// Route a cursor move: updates hover state via hit testing.
    pub fn dispatch_mouse_move(&mut self, pos: Vec2) {
        let target = self.view_at(pos);
        self.set_hovered(target);
    }

    /// Route a left click: the hit view is clicked and selected; the
    /// previously clicked view, if different, gets a click-away and is
    /// deselected.
    pub fn dispatch_click(&mut self, pos: Vec2) {
        let target = self.view_at(pos);
        if let Some(previous) = self.clicked
            && target != Some(previous)
        {
            if let Some(view) = self.views.get(previous) {
                view.selected.set(false);
            }
            self.mouse_click_away(previous);
        }
        self.clicked = target;
        if let Some(id) = target {
            if let Some(view) = self.views.get(id) {
                view.selected.set(true);
            }
            self.mouse_click(id, pos);
        }
    }

    /// Route a right click to the hit view.
    pub fn dispatch_right_click(&mut self, pos: Vec2) {
        if let Some(id) = self.view_at(pos) {
            self.mouse_right_click(id, pos);
        }
    }

    /// Route a scroll to the hit view.
    pub fn dispatch_scroll(&mut self, pos: Vec2, delta: i32) {
        if let Some(id) = self.view_at(pos) {
            self.mouse_scroll(id, delta);
        }
    }

    // ------------------------------------------------------------------
    // Tooltips
    // ------------------------------------------------------------------

    /// Assign tooltip text and a font to a view. Empty text disables the
    /// tooltip.
    pub fn set_tooltip(&mut self, id: ViewId, text: impl Into<String>, font: FontId) -> Result<()> {
        let view = self.views.get_mut(id).ok_or(Error::ViewNotFound(id))?;
        view.tooltip.text = text.into();
        view.tooltip.font = Some(font);
        Ok(())
    }

    /// Install a factory that builds tooltip overlay widgets, replacing
    /// the default bare view.
    pub fn set_tooltip_factory(&mut self, factory: TooltipFactory) {
        self.tooltip_factory = Some(factory);
    }

    /// The view's live tooltip overlay, if shown.
    pub fn tooltip_overlay(&self, id: ViewId) -> Option<ViewId> {
        self.views.get(id).and_then(|v| v.tooltip.overlay)
    }

    /// Reset a view's tooltip: zero the dwell timer and destroy any live
    /// overlay. Safe to call on views without tooltips.
    pub fn remove_tooltip(&mut self, id: ViewId) {
        let Some(view) = self.views.get_mut(id) else {
            return;
        };
        view.tooltip.timer = 0.0;
        let Some(overlay) = view.tooltip.overlay.take() else {
            return;
        };
        self.remove(overlay).ok();
    }

    /// Advance a hovered view's dwell timer and show the overlay once the
    /// threshold passes. A missing or unregistered font means the tooltip
    /// simply never appears.
    fn tooltip_tick(&mut self, id: ViewId, dt: f32) {
        let Some(view) = self.views.get_mut(id) else {
            return;
        };
        if !view.hovered || view.tooltip.text.is_empty() {
            return;
        }
        view.tooltip.timer += dt;
        if view.tooltip.timer < TOOLTIP_DWELL_SECS || view.tooltip.overlay.is_some() {
            return;
        }
        let Some(font) = view.tooltip.font else {
            return;
        };
        if !self.fonts.contains(font) {
            return;
        }
        self.show_tooltip(id, font);
    }

    /// Spawn the overlay for a view, replacing any existing one first so
    /// there is never more than one per view.
    fn show_tooltip(&mut self, id: ViewId, font: FontId) {
        self.remove_tooltip(id);
        let Some(view) = self.views.get(id) else {
            return;
        };
        let below = self.absolute_position(id) + Vec2::new(0.0, view.height.get() as f32);
        let request = TooltipRequest {
            owner: id,
            text: view.tooltip.text.clone(),
            font,
            position: below,
        };

        let overlay = if let Some(mut factory) = self.tooltip_factory.take() {
            let overlay = factory(self, &request);
            if self.tooltip_factory.is_none() {
                self.tooltip_factory = Some(factory);
            }
            overlay
        } else {
            let overlay = self.create_view();
            self.set_name(overlay, "tooltip");
            Some(overlay)
        };
        // A factory that produces nothing degrades to no tooltip.
        let Some(overlay) = overlay else {
            return;
        };
        if self.add_child(self.root, overlay).is_err() {
            self.remove(overlay).ok();
            return;
        }
        self.set_position(overlay, request.position);
        // Keep the overlay inside the root's content box.
        if let Some(view) = self.views.get_mut(overlay) {
            view.ignore_parent_bounds = false;
        }
        if let Some(view) = self.views.get_mut(id) {
            view.tooltip.overlay = Some(overlay);
        }
        debug!(?id, ?overlay, "tooltip shown");
    }
}
