//! The document façade: a node tree and its parallel style/layout tables,
//! kept in lockstep, with setters that propagate the dirty bit the way a
//! real invalidation pass must — up through ancestors, since a child's size
//! change can change every ancestor's content box. Grounded in
//! `azul_core::styled_dom::StyledDom`, which bundles a node hierarchy with
//! its per-node style and layout-result arrays behind one aggregate type
//! rather than handing callers three collections to keep in sync by hand.
//!
//! [`LayoutCache`](crate::cache::LayoutCache) is deliberately not a field
//! here: the cache is meant to be shared behind an `Arc` across threads
//! while a document's tree/style/layout tables are single-threaded-owned,
//! so callers hold the two separately and invalidate the cache themselves
//! on whatever mutations they consider significant.

use crate::error::LayoutError;
use crate::layout_table::{Geometry, LayoutTable};
use crate::node_tree::{NodeId, NodeTree};
use crate::normal_flow::Viewport;
use crate::style::{
    AutoValue, Background, BorderStyle, Clear, ColorU, Display, Float, FlexContainerStyle,
    FlexItemStyle, GridContainerStyle, Overflow, Position, Sides, SizeConstraints, StyleTable,
};

/// Bundles a [`NodeTree`] with the [`StyleTable`]/[`LayoutTable`] that
/// parallel it, resizing all three together and marking the dirty chain on
/// every style mutation.
#[derive(Debug, Default, Clone)]
pub struct LayoutDocument {
    tree: NodeTree,
    style: StyleTable,
    layout: LayoutTable,
}

macro_rules! dirty_setter {
    ($name:ident, $style_method:ident, $ty:ty) => {
        /// Idempotent: returns whether the value actually changed. On a
        /// real change, marks `id` and every ancestor of `id` dirty.
        pub fn $name(&mut self, id: NodeId, value: $ty) -> bool {
            let changed = self.style.$style_method(id, value);
            if changed {
                self.mark_dirty_with_ancestors(id);
            }
            changed
        }
    };
}

impl LayoutDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Resizes the tree and both parallel tables to exactly `n` nodes,
    /// resetting style fields to defaults and marking new/surviving nodes
    /// dirty (spec §6: "Create/resize to N nodes; reset fields to
    /// defaults").
    pub fn resize(&mut self, n: usize) {
        self.tree.resize(n);
        self.style.resize(n);
        self.layout.resize(n);
    }

    /// Appends a new, parentless, childless node to all three tables and
    /// returns its id.
    pub fn push(&mut self) -> NodeId {
        let id = self.tree.push();
        self.style.resize(self.tree.len());
        self.layout.resize(self.tree.len());
        id
    }

    pub fn tree(&self) -> &NodeTree {
        &self.tree
    }

    pub fn style(&self) -> &StyleTable {
        &self.style
    }

    pub fn layout(&self) -> &LayoutTable {
        &self.layout
    }

    pub fn geometry(&self, id: NodeId) -> Geometry {
        self.layout.geometry(id)
    }

    fn mark_dirty_with_ancestors(&mut self, id: NodeId) {
        self.layout.mark_dirty(id);
        for ancestor in self.tree.ancestors(id).skip(1) {
            self.layout.mark_dirty(ancestor);
        }
    }

    /// Re-parents `child` under `parent`, appending it after `parent`'s
    /// existing children, and dirties the new ancestor chain.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.tree.append_child(parent, child);
        self.mark_dirty_with_ancestors(child);
    }

    dirty_setter!(set_display, set_display, Display);
    dirty_setter!(set_position, set_position, Position);
    dirty_setter!(set_offsets, set_offsets, Sides<AutoValue>);
    dirty_setter!(set_z_index, set_z_index, i32);
    dirty_setter!(set_float, set_float, Float);
    dirty_setter!(set_clear, set_clear, Clear);
    dirty_setter!(set_margin, set_margin, Sides<f32>);
    dirty_setter!(set_padding, set_padding, Sides<f32>);
    dirty_setter!(set_border_width, set_border_width, Sides<f32>);
    dirty_setter!(set_border_style, set_border_style, Sides<BorderStyle>);
    dirty_setter!(set_border_color, set_border_color, Sides<ColorU>);
    dirty_setter!(set_size, set_size, SizeConstraints);
    dirty_setter!(set_background, set_background, Background);
    dirty_setter!(set_visibility, set_visibility, bool);
    dirty_setter!(set_overflow, set_overflow, Overflow);
    dirty_setter!(set_flex_container, set_flex_container, FlexContainerStyle);
    dirty_setter!(set_flex_item, set_flex_item, FlexItemStyle);
    dirty_setter!(set_grid_container, set_grid_container, GridContainerStyle);

    /// Runs the normal-flow engine over every dirty node (spec §4.1).
    pub fn compute_layout(&mut self, viewport: Viewport) {
        crate::normal_flow::compute_layout(&self.tree, &self.style, &mut self.layout, viewport);
    }

    /// Runs the flexbox engine over one container's direct children (spec
    /// §4.2). `container_id` must have a flex `display`.
    pub fn compute_flexbox_layout(&mut self, container_id: NodeId) -> Result<(), LayoutError> {
        crate::flexbox::compute_flexbox_layout(&self.tree, &self.style, &mut self.layout, container_id)
    }

    /// Runs the grid engine over one container's direct children (spec
    /// §4.3). `container_id` must have a grid `display`.
    pub fn compute_grid_layout(&mut self, container_id: NodeId) -> Result<(), LayoutError> {
        crate::grid::compute_grid_layout(&self.tree, &self.style, &mut self.layout, container_id)
    }
}
