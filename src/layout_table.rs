//! The layout table: one resolved-geometry record per node id (spec §3),
//! plus the `dirty` flag the engines read and clear. Shaped after
//! `azul_core::ui_solver::PositionedRectangle` (`bounds` + `content_size`),
//! split into the individual fields the normal-flow/flex/grid passes write
//! directly rather than going through a `LayoutRect` wrapper every time.

use crate::node_tree::NodeId;

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Geometry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub content_width: f32,
    pub content_height: f32,
}

impl Geometry {
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Output table: `x, y, width, height, content_width, content_height, dirty`
/// for every node id, in lockstep with [`crate::style::StyleTable`] and
/// [`crate::node_tree::NodeTree`].
#[derive(Debug, Default, Clone)]
pub struct LayoutTable {
    geometry: Vec<Geometry>,
    dirty: Vec<bool>,
}

impl LayoutTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.geometry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometry.is_empty()
    }

    #[inline]
    fn index(id: NodeId) -> usize {
        (id.get() - 1) as usize
    }

    /// Resizes to `n` entries; new nodes are born dirty (they have never
    /// been through a layout pass) with zeroed geometry.
    pub fn resize(&mut self, n: usize) {
        self.geometry.resize(n, Geometry::default());
        self.dirty.resize(n, true);
    }

    pub fn geometry(&self, id: NodeId) -> Geometry {
        self.geometry.get(Self::index(id)).copied().unwrap_or_default()
    }

    pub fn set_geometry(&mut self, id: NodeId, geometry: Geometry) {
        if let Some(slot) = self.geometry.get_mut(Self::index(id)) {
            *slot = geometry;
        }
    }

    pub fn is_dirty(&self, id: NodeId) -> bool {
        self.dirty.get(Self::index(id)).copied().unwrap_or(false)
    }

    /// Mutating a style field must set `dirty[i] = true` (spec §3
    /// lifecycle). Out-of-range ids are a silent no-op.
    pub fn mark_dirty(&mut self, id: NodeId) {
        if let Some(slot) = self.dirty.get_mut(Self::index(id)) {
            *slot = true;
        }
    }

    pub fn clear_dirty(&mut self, id: NodeId) {
        if let Some(slot) = self.dirty.get_mut(Self::index(id)) {
            *slot = false;
        }
    }

    pub fn dirty_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.dirty
            .iter()
            .enumerate()
            .filter(|(_, d)| **d)
            .map(|(i, _)| NodeId::new(i as u32 + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_nodes_start_dirty_with_zero_geometry() {
        let mut t = LayoutTable::new();
        t.resize(2);
        assert!(t.is_dirty(NodeId::new(1)));
        assert_eq!(t.geometry(NodeId::new(1)), Geometry::default());
    }

    #[test]
    fn clear_dirty_then_mark_dirty_round_trips() {
        let mut t = LayoutTable::new();
        t.resize(1);
        let id = NodeId::new(1);
        t.clear_dirty(id);
        assert!(!t.is_dirty(id));
        t.mark_dirty(id);
        assert!(t.is_dirty(id));
    }

    #[test]
    fn content_box_helpers() {
        let g = Geometry { x: 10.0, y: 20.0, width: 100.0, height: 50.0, content_width: 80.0, content_height: 30.0 };
        assert_eq!(g.right(), 110.0);
        assert_eq!(g.bottom(), 70.0);
    }
}
