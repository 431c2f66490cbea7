//! The normal-flow engine (spec §4.1): two passes over the id range that
//! resolve every dirty node's `x, y, width, height, content_width,
//! content_height` — block flow, float placement, clear, and
//! static/relative/absolute/fixed positioning. Containers whose `display` is
//! a flex/grid kind still get their own box placed here; their children's
//! final geometry is overwritten by [`crate::flexbox::compute_flexbox_layout`]
//! / [`crate::grid::compute_grid_layout`] run afterward, the same two-stage
//! split `azul-layout`'s old `layout_solver.rs` makes between "solve box
//! sizes for every node" and "position nodes" as separate sweeps
//! (`position_nodes` in that file runs after the width/height solve exactly
//! the way pass 2 here runs after pass 1).

use crate::layout_table::{Geometry, LayoutTable};
use crate::node_tree::NodeId;
use crate::node_tree::NodeTree;
use crate::style::{AutoValue, Clear, Display, Float, Position, StyleTable};

/// The frame absolutely/fixed-positioned nodes anchor to when no ancestor
/// establishes a containing block (spec §3: "or the viewport if none
/// exists"). Taken as a parameter rather than a global: the layout tables
/// carry no notion of screen size themselves.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Viewport { width, height }
    }

    fn as_geometry(self) -> Geometry {
        Geometry { x: 0.0, y: 0.0, width: self.width, height: self.height, content_width: self.width, content_height: self.height }
    }
}

/// Resolves a size field per spec §4.1: "If the author did not set a
/// concrete width (width was 0/auto), set width = content + padding", else
/// the author's explicit value, clamped into `[min, max]` where those are
/// themselves concrete.
fn resolve_size(value: AutoValue, min: AutoValue, max: AutoValue, content: f32, padding_sum: f32) -> f32 {
    let mut resolved = if value.auto || value.value == 0.0 { content + padding_sum } else { value.value };
    if let Some(min) = min.resolved() {
        resolved = resolved.max(min);
    }
    if let Some(max) = max.resolved() {
        resolved = resolved.min(max);
    }
    resolved.max(0.0)
}

/// Pass 1 (spec §4.1): bottom-up size resolution, `i` from `N` down to `1`.
fn resolve_sizes(tree: &NodeTree, style: &StyleTable, layout: &mut LayoutTable) {
    for id in tree.ids_descending() {
        if !layout.is_dirty(id) {
            continue;
        }
        #[cfg(feature = "logging")]
        log::trace!("normal-flow pass 1: resolving size for {:?}", id);

        if style.display(id) == Display::None {
            layout.set_geometry(id, Geometry::default());
            continue;
        }

        let padding = style.padding(id);
        let mut block_accum = 0.0_f32;
        let mut float_accum = 0.0_f32;
        let mut width_accum = 0.0_f32;

        for child in tree.children(id) {
            if style.display(child) == Display::None {
                continue;
            }
            let margin = style.margin(child);
            let child_g = layout.geometry(child);
            let outer_width = child_g.width + margin.left + margin.right;
            let outer_height = child_g.height + margin.top + margin.bottom;

            if style.float(child) != Float::None {
                float_accum = float_accum.max(outer_height);
            } else if style.position(child).is_in_flow() {
                block_accum += outer_height;
                width_accum = width_accum.max(outer_width);
            }
            // Absolutely/fixed-positioned children contribute no space here
            // (spec §3: "For any in-flow node..." implies out-of-flow nodes
            // are excluded from the parent's intrinsic size).
        }

        let content_width = width_accum;
        let content_height = block_accum.max(float_accum);
        let size = style.size(id);

        let width = resolve_size(size.width, size.min_width, size.max_width, content_width, padding.left + padding.right);
        let height = resolve_size(size.height, size.min_height, size.max_height, content_height, padding.top + padding.bottom);

        let prev = layout.geometry(id);
        layout.set_geometry(
            id,
            Geometry { x: prev.x, y: prev.y, width, height, content_width, content_height },
        );
    }
}

/// Nearest ancestor with `position != static`, or the viewport frame (spec
/// §3, §4.1). `azul`'s `position_nodes` walks an explicit stack of
/// previously-pushed positioned ancestors for the same purpose; here the
/// tree's own `ancestors` iterator does the walk directly since every
/// ancestor's geometry is already resolved (pass 2 runs parents before
/// children).
fn containing_block(tree: &NodeTree, style: &StyleTable, layout: &LayoutTable, id: NodeId, viewport: Viewport) -> Geometry {
    let mut cur = tree.parent(id);
    while let Some(p) = cur {
        if style.position(p).establishes_containing_block() {
            return layout.geometry(p);
        }
        cur = tree.parent(p);
    }
    viewport.as_geometry()
}

/// The static-flow position a node would occupy if it were `position:
/// static` (spec §4.1 "normal block flow", also the basis `relative`
/// offsets from). Out-of-range / rootless nodes sit at the viewport origin.
fn static_flow_position(tree: &NodeTree, style: &StyleTable, layout: &LayoutTable, id: NodeId) -> (f32, f32) {
    let parent = match tree.parent(id) {
        Some(p) => p,
        None => return (0.0, 0.0),
    };
    let parent_g = layout.geometry(parent);
    let parent_padding = style.padding(parent);
    let margin = style.margin(id);

    let x = parent_g.x + parent_padding.left + margin.left;

    let mut y = parent_g.y + parent_padding.top;
    for sibling in tree.preceding_siblings(id) {
        if style.display(sibling) == Display::None {
            continue;
        }
        if style.float(sibling) != Float::None {
            continue;
        }
        if !style.position(sibling).is_in_flow() {
            continue;
        }
        let sibling_g = layout.geometry(sibling);
        let sibling_margin = style.margin(sibling);
        y += sibling_g.height + sibling_margin.top + sibling_margin.bottom;
    }
    y += margin.top;

    let clear = style.clear(id);
    if clear != Clear::None {
        let mut left_bottom = None;
        let mut right_bottom = None;
        for sibling in tree.preceding_siblings(id) {
            if style.display(sibling) == Display::None {
                continue;
            }
            let sibling_g = layout.geometry(sibling);
            let sibling_margin = style.margin(sibling);
            let bottom = sibling_g.y + sibling_g.height + sibling_margin.bottom;
            match style.float(sibling) {
                Float::Left => left_bottom = Some(left_bottom.map_or(bottom, |b: f32| b.max(bottom))),
                Float::Right => right_bottom = Some(right_bottom.map_or(bottom, |b: f32| b.max(bottom))),
                Float::None => {}
            }
        }
        if matches!(clear, Clear::Left | Clear::Both) {
            if let Some(b) = left_bottom {
                y = y.max(b);
            }
        }
        if matches!(clear, Clear::Right | Clear::Both) {
            if let Some(b) = right_bottom {
                y = y.max(b);
            }
        }
    }

    (x, y)
}

/// Float placement for a floated child of `parent` (spec §4.1 "Float
/// placement"): walk preceding floated siblings in document order,
/// advancing the left/right edges past their outer boxes.
fn float_position(tree: &NodeTree, style: &StyleTable, layout: &LayoutTable, id: NodeId, parent: NodeId) -> (f32, f32) {
    let parent_g = layout.geometry(parent);
    let parent_padding = style.padding(parent);
    let mut left_edge = parent_g.x + parent_padding.left;
    let mut right_edge = parent_g.x + parent_g.width - parent_padding.right;
    let mut float_y = parent_g.y + parent_padding.top;

    for sibling in tree.preceding_siblings(id) {
        if style.display(sibling) == Display::None {
            continue;
        }
        let sibling_float = style.float(sibling);
        if sibling_float == Float::None {
            continue;
        }
        let sibling_g = layout.geometry(sibling);
        let sibling_margin = style.margin(sibling);
        match sibling_float {
            Float::Left => left_edge = left_edge.max(sibling_g.x + sibling_g.width + sibling_margin.right),
            Float::Right => right_edge = right_edge.min(sibling_g.x - sibling_margin.left),
            Float::None => {}
        }
        float_y = float_y.max(sibling_g.y);
    }

    let margin = style.margin(id);
    let g = layout.geometry(id);
    match style.float(id) {
        Float::Left => (left_edge + margin.left, float_y + margin.top),
        Float::Right => (right_edge - g.width - margin.right, float_y + margin.top),
        Float::None => unreachable!("float_position called on a non-floated node"),
    }
}

fn resolve_offset(near: AutoValue, far: AutoValue, cb_start: f32, cb_size: f32, size: f32) -> f32 {
    if let Some(near) = near.resolved() {
        cb_start + near
    } else if let Some(far) = far.resolved() {
        cb_start + cb_size - size - far
    } else {
        cb_start
    }
}

/// Pass 2 (spec §4.1): top-down position resolution, `i` from `1` to `N`.
fn resolve_positions(tree: &NodeTree, style: &StyleTable, layout: &mut LayoutTable, viewport: Viewport) {
    for id in tree.ids_ascending() {
        if !layout.is_dirty(id) {
            continue;
        }

        if style.display(id) == Display::None {
            let mut g = layout.geometry(id);
            g.x = 0.0;
            g.y = 0.0;
            layout.set_geometry(id, g);
            layout.clear_dirty(id);
            continue;
        }

        let position = style.position(id);
        let (x, y) = if matches!(position, Position::Absolute | Position::Fixed) {
            #[cfg(feature = "logging")]
            log::trace!("normal-flow pass 2: anchoring {:?} ({:?})", id, position);
            let cb = containing_block(tree, style, layout, id, viewport);
            let offsets = style.offsets(id);
            let g = layout.geometry(id);
            let x = resolve_offset(offsets.left, offsets.right, cb.x, cb.width, g.width);
            let y = resolve_offset(offsets.top, offsets.bottom, cb.y, cb.height, g.height);
            (x, y)
        } else if style.float(id) != Float::None {
            match tree.parent(id) {
                Some(parent) => float_position(tree, style, layout, id, parent),
                None => (0.0, 0.0),
            }
        } else if position == Position::Relative {
            let (sx, sy) = static_flow_position(tree, style, layout, id);
            let offsets = style.offsets(id);
            let dx = offsets.left.resolved().unwrap_or_else(|| -offsets.right.resolved().unwrap_or(0.0));
            let dy = offsets.top.resolved().unwrap_or_else(|| -offsets.bottom.resolved().unwrap_or(0.0));
            (sx + dx, sy + dy)
        } else {
            static_flow_position(tree, style, layout, id)
        };

        let mut g = layout.geometry(id);
        g.x = x;
        g.y = y;
        layout.set_geometry(id, g);
        layout.clear_dirty(id);
    }
}

/// Normal-flow layout pass (spec §4.1): resolves `x, y, width, height,
/// content_width, content_height` for every dirty node and clears `dirty`.
/// Idempotent — calling this twice with no intervening mutation is a no-op
/// on the second call since every node is clean afterward.
pub fn compute_layout(tree: &NodeTree, style: &StyleTable, layout: &mut LayoutTable, viewport: Viewport) {
    resolve_sizes(tree, style, layout);
    resolve_positions(tree, style, layout, viewport);
}
