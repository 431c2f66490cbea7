//! Errors for the two per-container layout entry points. Every other
//! operation in this crate is infallible by design (spec §7: out-of-range
//! ids are silent no-ops, cache misses are values not errors). Grounded in
//! the `thiserror`-derived error enums the broader layout-engine examples in
//! this pack reach for (e.g. the vulkan-browser-engine layout crate's
//! `LayoutError`), rather than hand-rolling `Display`/`Error` impls.

use crate::node_tree::NodeId;

#[derive(Debug, thiserror::Error, Copy, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// `compute_flexbox_layout`/`compute_grid_layout` was called with a
    /// container id whose `display` is not a flex/grid container. Unlike
    /// `compute_layout`'s whole-tree sweep, these two entry points take a
    /// single caller-supplied id, so a mismatch is a caller bug worth
    /// reporting rather than silently skipping.
    #[error("node {0:?} is not a flex/grid container for this operation")]
    NotAContainer(NodeId),
}
