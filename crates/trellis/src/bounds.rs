//! Parent-bounds clamping.

use geom::Vec2;
use tracing::trace;

use crate::{Ui, id::ViewId};

/// Shift `view` so its absolute bound box stays inside the parent's
/// absolute content box.
///
/// Axes are corrected independently. On each axis the far (right/bottom)
/// overflow is corrected before the near (left/top) deficit, so a view
/// larger than its parent ends pinned to the near edge. The correction is a
/// fixed point: applying it twice yields the same position as applying it
/// once.
///
/// Positions are written through the view's reactive cell, so a shared
/// context borrow is enough.
pub(crate) fn clamp_to_parent(ui: &Ui, view: ViewId) {
    let Some(node) = ui.view(view) else { return };
    if node.ignore_parent_bounds {
        return;
    }
    let Some(parent) = node.parent else { return };

    let own = ui.absolute_bound_box(view);
    let content = ui.absolute_content_bound_box(parent);

    let dx = axis_shift(own.x, own.right(), content.x, content.right());
    let dy = axis_shift(own.y, own.bottom(), content.y, content.bottom());
    if dx == 0 && dy == 0 {
        return;
    }

    trace!(?view, dx, dy, "clamped to parent bounds");
    let position = node.position.clone();
    let p = position.get();
    position.set(Vec2::new(p.x + dx as f32, p.y + dy as f32));
}

/// Correction along one axis: far overflow first, then near deficit.
fn axis_shift(near: i32, far: i32, content_near: i32, content_far: i32) -> i32 {
    let mut shift = 0;
    let overflow = far - content_far;
    if overflow > 0 {
        shift -= overflow;
    }
    let deficit = (near + shift) - content_near;
    if deficit < 0 {
        shift -= deficit;
    }
    shift
}

#[cfg(test)]
mod tests {
    use geom::Rect;
    use proptest::prelude::*;

    use super::*;

    /// A 100×100 parent at the origin with one constrained child.
    fn fixture(ui: &mut Ui) -> (ViewId, ViewId) {
        let parent = ui.create_view();
        ui.add_child(ui.root(), parent).unwrap();
        ui.set_width(parent, 100).set_height(parent, 100);
        let child = ui.create_view();
        ui.add_child(parent, child).unwrap();
        if let Some(view) = ui.view_mut(child) {
            view.set_ignore_parent_bounds(false);
        }
        (parent, child)
    }

    #[test]
    fn overflow_right_shifts_left() {
        let mut ui = Ui::new();
        let (_, child) = fixture(&mut ui);
        ui.set_width(child, 20)
            .set_height(child, 20)
            .set_position(child, Vec2::new(90.0, 10.0));
        clamp_to_parent(&ui, child);
        assert_eq!(ui.absolute_bound_box(child), Rect::new(80, 10, 20, 20));
    }

    #[test]
    fn deficit_left_shifts_right() {
        let mut ui = Ui::new();
        let (_, child) = fixture(&mut ui);
        ui.set_width(child, 20)
            .set_height(child, 20)
            .set_position(child, Vec2::new(-15.0, -5.0));
        clamp_to_parent(&ui, child);
        assert_eq!(ui.absolute_bound_box(child), Rect::new(0, 0, 20, 20));
    }

    #[test]
    fn oversized_child_pins_to_near_edge() {
        let mut ui = Ui::new();
        let (_, child) = fixture(&mut ui);
        ui.set_width(child, 150)
            .set_height(child, 40)
            .set_position(child, Vec2::new(30.0, 10.0));
        clamp_to_parent(&ui, child);
        let own = ui.absolute_bound_box(child);
        assert_eq!(own.x, 0);
        assert_eq!(own.y, 10);
    }

    #[test]
    fn opted_out_child_is_untouched() {
        let mut ui = Ui::new();
        let (_, child) = fixture(&mut ui);
        if let Some(view) = ui.view_mut(child) {
            view.set_ignore_parent_bounds(true);
        }
        ui.set_width(child, 20)
            .set_height(child, 20)
            .set_position(child, Vec2::new(500.0, 500.0));
        clamp_to_parent(&ui, child);
        assert_eq!(ui.view(child).unwrap().position.get(), Vec2::new(500.0, 500.0));
    }

    proptest! {
        /// Applying the constraint twice equals applying it once, even for
        /// children larger than the parent.
        #[test]
        fn clamp_is_a_fixed_point(
            x in -300i32..300,
            y in -300i32..300,
            w in 0i32..250,
            h in 0i32..250,
        ) {
            let mut ui = Ui::new();
            let (_, child) = fixture(&mut ui);
            ui.set_width(child, w)
                .set_height(child, h)
                .set_position(child, Vec2::new(x as f32, y as f32));

            clamp_to_parent(&ui, child);
            let once = ui.absolute_bound_box(child);
            clamp_to_parent(&ui, child);
            let twice = ui.absolute_bound_box(child);
            prop_assert_eq!(once, twice);
        }

        /// A child that fits always ends inside the parent's content box.
        #[test]
        fn fitting_child_ends_inside(
            x in -300i32..300,
            y in -300i32..300,
            w in 0i32..100,
            h in 0i32..100,
        ) {
            let mut ui = Ui::new();
            let (parent, child) = fixture(&mut ui);
            ui.set_width(child, w)
                .set_height(child, h)
                .set_position(child, Vec2::new(x as f32, y as f32));

            clamp_to_parent(&ui, child);
            let own = ui.absolute_bound_box(child);
            let content = ui.absolute_content_bound_box(parent);
            prop_assert!(own.x >= content.x);
            prop_assert!(own.y >= content.y);
            prop_assert!(own.right() <= content.right());
            prop_assert!(own.bottom() <= content.bottom());
        }
    }
}
