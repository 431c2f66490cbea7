//! Parent / first-child / next-sibling arrays over a dense node id space.
//!
//! Mirrors the arena shape in `azul`'s `id_tree.rs` (a `NodeHierarchy` of
//! `Node { parent, first_child, next_sibling, .. }` indexed by a niche-
//! optimized id), but matches this crate's id space directly: ids start at
//! 1, and 0 is the reserved "none" sentinel, so `NodeId` needs no
//! index-shifting on construction. There is no `previous_sibling` /
//! `last_child` field — callers that need the previous sibling walk the
//! child list from the front and remember the last id seen, same as
//! `preceding_siblings` below does generically.

use std::num::NonZeroU32;

/// Identifier for a node in the tree. Valid node ids are `1..=len()`; `0` is
/// reserved to mean "no node" and is never handed out by [`NodeTree::push`].
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(NonZeroU32);

impl NodeId {
    /// Constructs the id for the `n`th node (`n >= 1`). Panics in debug
    /// builds if `n` is 0 — id 0 is the viewport/"none" sentinel, never a
    /// real node.
    #[inline]
    pub fn new(n: u32) -> Self {
        debug_assert!(n != 0, "NodeId::new(0) is reserved for the viewport / none sentinel");
        NodeId(NonZeroU32::new(n).expect("NodeId must be nonzero"))
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0.get()
    }

    #[inline]
    fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl std::fmt::Debug for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "NodeId({})", self.get())
    }
}

/// One entry of tree topology: the three arrays from spec §3, bundled per-id
/// the way `azul::id_tree::Node` bundles `parent`/`first_child`/`next_sibling`.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct TreeLinks {
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
}

/// The node tree: `parent[i]`, `first_child[i]`, `next_sibling[i]` as three
/// logically-parallel arrays (kept as one `Vec<TreeLinks>` internally, same
/// storage shape the SoA framing implies — one cache line's worth of
/// topology per node, read together on every traversal step).
#[derive(Debug, Default, Clone)]
pub struct NodeTree {
    links: Vec<TreeLinks>,
}

impl NodeTree {
    pub fn new() -> Self {
        Self { links: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self { links: Vec::with_capacity(cap) }
    }

    /// Number of nodes currently allocated (ids `1..=len()` are valid).
    #[inline]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Appends a new, parentless, childless node and returns its id.
    pub fn push(&mut self) -> NodeId {
        self.links.push(TreeLinks::default());
        NodeId::new(self.links.len() as u32)
    }

    /// Resizes the tree to exactly `n` nodes, discarding or default-filling
    /// as needed. Matches the "Create/resize to N nodes; reset fields to
    /// defaults" tree operation from spec §6.
    pub fn resize(&mut self, n: usize) {
        self.links.resize(n, TreeLinks::default());
    }

    #[inline]
    fn in_range(&self, id: NodeId) -> bool {
        id.index() < self.links.len()
    }

    pub fn get(&self, id: NodeId) -> Option<TreeLinks> {
        self.links.get(id.index()).copied()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.links.get(id.index()).and_then(|n| n.parent)
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.links.get(id.index()).and_then(|n| n.first_child)
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.links.get(id.index()).and_then(|n| n.next_sibling)
    }

    /// Sets `parent[id]`. Out-of-range ids are a silent no-op (spec §7).
    pub fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        if let Some(n) = self.links.get_mut(id.index()) {
            n.parent = parent;
        }
    }

    pub fn set_first_child(&mut self, id: NodeId, first_child: Option<NodeId>) {
        if let Some(n) = self.links.get_mut(id.index()) {
            n.first_child = first_child;
        }
    }

    pub fn set_next_sibling(&mut self, id: NodeId, next_sibling: Option<NodeId>) {
        if let Some(n) = self.links.get_mut(id.index()) {
            n.next_sibling = next_sibling;
        }
    }

    /// Appends `child` as the last entry of `parent`'s child list in O(children).
    /// A tree-builder convenience; the layout engines only ever read the
    /// three arrays directly.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.set_parent(child, Some(parent));
        self.set_next_sibling(child, None);
        match self.first_child(parent) {
            None => self.set_first_child(parent, Some(child)),
            Some(first) => {
                let mut last = first;
                while let Some(next) = self.next_sibling(last) {
                    last = next;
                }
                self.set_next_sibling(last, Some(child));
            }
        }
    }

    /// All ids `1..=len()` in ascending (id) order — the order pass 2 of the
    /// normal-flow engine must iterate in (spec §5: parents precede
    /// children, which the tree builder guarantees by construction).
    pub fn ids_ascending(&self) -> impl DoubleEndedIterator<Item = NodeId> {
        (1..=self.links.len() as u32).map(NodeId::new)
    }

    /// All ids `len()..=1` in descending order, for pass 1's bottom-up sweep.
    pub fn ids_descending(&self) -> impl Iterator<Item = NodeId> {
        (1..=self.links.len() as u32).rev().map(NodeId::new)
    }

    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children { tree: self, next: self.first_child(id) }
    }

    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors { tree: self, next: Some(id) }
    }

    /// Siblings preceding `id`, nearest first. No `previous_sibling` array
    /// exists (spec §3) so this walks the parent's child list from the
    /// front and stops one short of `id` — O(index-of-id-in-parent), same
    /// cost the `clear`/float placement algorithms already pay when they
    /// scan preceding siblings themselves.
    pub fn preceding_siblings(&self, id: NodeId) -> Vec<NodeId> {
        let parent = match self.parent(id) {
            Some(p) => p,
            None => return Vec::new(),
        };
        let mut out = Vec::new();
        let mut cur = self.first_child(parent);
        while let Some(c) = cur {
            if c == id {
                break;
            }
            out.push(c);
            cur = self.next_sibling(c);
        }
        out
    }

    /// Depth-first pre-order descendants of `id`, `id` itself excluded.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_descendants(id, &mut out);
        out
    }

    fn collect_descendants(&self, id: NodeId, out: &mut Vec<NodeId>) {
        for child in self.children(id) {
            out.push(child);
            self.collect_descendants(child, out);
        }
    }

    /// Debug-only well-formedness check: every node reachable as someone's
    /// `first_child`/`next_sibling` reports that same node as its `parent`.
    /// Malformed trees are undefined behavior at the engine layer (spec §7);
    /// this just helps a caller catch the bug in debug builds, the same way
    /// `azul::id_tree::NodeId::new` panics on overflow only in debug mode.
    #[cfg(debug_assertions)]
    pub fn debug_assert_well_formed(&self) {
        for id in self.ids_ascending() {
            for child in self.children(id) {
                debug_assert_eq!(
                    self.parent(child),
                    Some(id),
                    "node {:?} is a child of {:?} but does not report it as parent",
                    child,
                    id
                );
            }
        }
    }
}

pub struct Children<'a> {
    tree: &'a NodeTree,
    next: Option<NodeId>,
}

impl<'a> Iterator for Children<'a> {
    type Item = NodeId;
    fn next(&mut self) -> Option<NodeId> {
        let cur = self.next.take()?;
        self.next = self.tree.next_sibling(cur);
        Some(cur)
    }
}

pub struct Ancestors<'a> {
    tree: &'a NodeTree,
    next: Option<NodeId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = NodeId;
    fn next(&mut self) -> Option<NodeId> {
        let cur = self.next.take()?;
        self.next = self.tree.parent(cur);
        Some(cur)
    }
}
