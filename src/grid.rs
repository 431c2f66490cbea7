//! Fixed-grid layout over one container's direct in-flow children: uniform
//! cell sizing, row-major placement, children past the last cell clipped to
//! it. Grounded in the same teacher-shape as [`crate::flexbox`] — one
//! fallible per-container entry point, children filtered then walked in
//! document order — since azul's own solver has no grid engine to imitate
//! directly.

use crate::layout_table::{Geometry, LayoutTable};
use crate::node_tree::{NodeId, NodeTree};
use crate::style::{Display, StyleTable};
use crate::error::LayoutError;

/// Computes `x, y, width, height` for one grid container's direct in-flow
/// children: `grid_cols * grid_rows` uniform cells, filled row-major in
/// document order. A child past the last cell is placed in the last cell,
/// overlapping whatever already occupies it. Returns
/// [`LayoutError::NotAContainer`] if `container_id`'s `display` is not a
/// grid kind.
pub fn compute_grid_layout(
    tree: &NodeTree,
    style: &StyleTable,
    layout: &mut LayoutTable,
    container_id: NodeId,
) -> Result<(), LayoutError> {
    if !style.display(container_id).is_grid_container() {
        return Err(LayoutError::NotAContainer(container_id));
    }

    let gc = style.grid_container(container_id);
    let container_g = layout.geometry(container_id);
    let container_padding = style.padding(container_id);

    let cols = gc.grid_cols as usize;
    let rows = gc.grid_rows as usize;
    let cell_width = container_g.content_width / cols as f32;
    let cell_height = container_g.content_height / rows as f32;
    let last_cell = cols * rows - 1;

    let children: Vec<NodeId> = tree
        .children(container_id)
        .filter(|&c| style.display(c) != Display::None)
        .filter(|&c| style.position(c).is_in_flow())
        .collect();

    #[cfg(feature = "logging")]
    if children.len() > cols * rows {
        log::debug!(
            "grid container {:?} has {} children for a {}x{} grid; overflow children clip to the last cell",
            container_id, children.len(), cols, rows
        );
    }

    let origin_x = container_g.x + container_padding.left;
    let origin_y = container_g.y + container_padding.top;

    for (i, child) in children.into_iter().enumerate() {
        let cell = i.min(last_cell);
        let col = cell % cols;
        let row = cell / cols;
        let margin = style.margin(child);

        let x = origin_x + col as f32 * cell_width + margin.left;
        let y = origin_y + row as f32 * cell_height + margin.top;
        let size = style.size(child);
        let mut width = (cell_width - margin.left - margin.right).max(0.0);
        if let Some(min_width) = size.min_width.resolved() {
            width = width.max(min_width);
        }
        if let Some(max_width) = size.max_width.resolved() {
            width = width.min(max_width);
        }
        width = width.max(0.0);
        let mut height = (cell_height - margin.top - margin.bottom).max(0.0);
        if let Some(min_height) = size.min_height.resolved() {
            height = height.max(min_height);
        }
        if let Some(max_height) = size.max_height.resolved() {
            height = height.min(max_height);
        }
        height = height.max(0.0);

        let padding = style.padding(child);
        let content_width = (width - padding.left - padding.right).max(0.0);
        let content_height = (height - padding.top - padding.bottom).max(0.0);

        layout.set_geometry(child, Geometry { x, y, width, height, content_width, content_height });
        layout.clear_dirty(child);
        #[cfg(feature = "logging")]
        log::trace!("grid item {:?} placed at cell ({}, {})", child, col, row);
    }

    Ok(())
}
