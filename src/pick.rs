//! Pointer hit-testing.
//!
//! Picking walks every layer depth-first (layers in stack order, parents
//! before children) and keeps overwriting its best candidate with each
//! hoverable, non-layer control whose visible rectangle contains the pointer.
//! The last match wins, so deeper controls beat their ancestors and later
//! siblings and layers beat earlier ones.
//!
//! The pointer is moved onto the center of its pixel before testing, which
//! keeps two siblings that share an edge from both claiming the boundary pixel.

use cgmath::Point2;

use crate::data_structures::{
    control::ControlId,
    geometry::pixel_center,
    tree::ControlTree,
};

/// Find the control under `position` (raw client coordinates).
///
/// Returns `None` when nothing hoverable is under the pointer. The result only
/// depends on the tree and the position, so repeated calls agree.
pub fn hit_test(
    tree: &ControlTree,
    layers: &[ControlId],
    position: Point2<f32>,
) -> Option<ControlId> {
    let point = pixel_center(position);
    tree.depth_first(layers)
        .into_iter()
        .filter(|&id| {
            tree.get(id).is_some_and(|control| {
                !control.is_layer()
                    && control.is_hoverable()
                    && control.visible_rect().contains(point)
            })
        })
        .last()
}

/// Whether the control's visible rectangle contains an already centered point.
pub(crate) fn contains(tree: &ControlTree, id: ControlId, point: Point2<f32>) -> bool {
    tree.get(id)
        .is_some_and(|control| control.visible_rect().contains(point))
}
