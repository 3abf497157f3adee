//! Layout strategies that reorder a view's children.

use geom::Vec2;

use crate::{Ui, id::ViewId};

/// Repositions a view's children according to a policy.
///
/// Strategies run from the deferred settle pass when their view is dirty.
/// They must be idempotent: running twice with no intervening mutation
/// yields the same positions. Several strategies may be attached to one
/// view; they run in registration order, later ones seeing the results of
/// earlier ones.
pub trait Layout {
    /// Reposition `view`'s children in place.
    fn order_children(&mut self, ui: &mut Ui, view: ViewId);
}

/// Stacking axis for [`StackLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Left to right.
    Horizontal,
    /// Top to bottom.
    Vertical,
}

/// Lays active children out along one axis with fixed spacing.
///
/// Positions are written relative to the parent content origin; children
/// with non-zero anchors will sit offset accordingly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackLayout {
    /// Stacking direction.
    pub axis: Axis,
    /// Gap between consecutive children.
    pub spacing: i32,
    /// Leading offset on both axes.
    pub padding: i32,
}

impl StackLayout {
    /// A top-to-bottom stack.
    pub fn vertical(spacing: i32) -> Self {
        Self {
            axis: Axis::Vertical,
            spacing,
            padding: 0,
        }
    }

    /// A left-to-right stack.
    pub fn horizontal(spacing: i32) -> Self {
        Self {
            axis: Axis::Horizontal,
            spacing,
            padding: 0,
        }
    }

    /// Build with a leading padding offset.
    pub fn with_padding(mut self, padding: i32) -> Self {
        self.padding = padding;
        self
    }
}

impl Layout for StackLayout {
    fn order_children(&mut self, ui: &mut Ui, view: ViewId) {
        let children = ui.children_of(view);
        let mut cursor = self.padding;
        for child in children {
            let Some(node) = ui.view(child) else { continue };
            if !node.active.get() {
                continue;
            }
            let advance = match self.axis {
                Axis::Vertical => {
                    node.position
                        .set(Vec2::new(self.padding as f32, cursor as f32));
                    node.height.get()
                }
                Axis::Horizontal => {
                    node.position
                        .set(Vec2::new(cursor as f32, self.padding as f32));
                    node.width.get()
                }
            };
            cursor += advance + self.spacing;
        }
    }
}

/// Places active children row-major on a fixed-cell grid sized to the
/// parent's content width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    /// Cell width.
    pub cell_width: i32,
    /// Cell height.
    pub cell_height: i32,
    /// Gap between cells on both axes.
    pub spacing: i32,
}

impl GridLayout {
    /// A grid with the given cell size and no spacing.
    pub fn new(cell_width: i32, cell_height: i32) -> Self {
        Self {
            cell_width,
            cell_height,
            spacing: 0,
        }
    }

    /// Build with a gap between cells.
    pub fn with_spacing(mut self, spacing: i32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Columns that fit in a content row of the given width.
    fn columns(&self, content_width: i32) -> i32 {
        let step = self.cell_width + self.spacing;
        if step <= 0 {
            return 1;
        }
        ((content_width + self.spacing) / step).max(1)
    }
}

impl Layout for GridLayout {
    fn order_children(&mut self, ui: &mut Ui, view: ViewId) {
        let columns = self.columns(ui.content_bound_box(view).w);
        let children = ui.children_of(view);
        let mut slot = 0i32;
        for child in children {
            let Some(node) = ui.view(child) else { continue };
            if !node.active.get() {
                continue;
            }
            let col = slot % columns;
            let row = slot / columns;
            node.position.set(Vec2::new(
                (col * (self.cell_width + self.spacing)) as f32,
                (row * (self.cell_height + self.spacing)) as f32,
            ));
            slot += 1;
        }
    }
}

/// Flows active children left to right, wrapping at the parent's content
/// right edge. Each row advances by its tallest child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowLayout {
    /// Gap between children on both axes.
    pub spacing: i32,
}

impl FlowLayout {
    /// A flow with the given gap.
    pub fn new(spacing: i32) -> Self {
        Self { spacing }
    }
}

impl Layout for FlowLayout {
    fn order_children(&mut self, ui: &mut Ui, view: ViewId) {
        let limit = ui.content_bound_box(view).w;
        let children = ui.children_of(view);
        let mut x = 0i32;
        let mut y = 0i32;
        let mut row_height = 0i32;
        for child in children {
            let Some(node) = ui.view(child) else { continue };
            if !node.active.get() {
                continue;
            }
            let w = node.width.get();
            let h = node.height.get();
            if x > 0 && x + w > limit {
                x = 0;
                y += row_height + self.spacing;
                row_height = 0;
            }
            node.position.set(Vec2::new(x as f32, y as f32));
            x += w + self.spacing;
            row_height = row_height.max(h);
        }
    }
}
