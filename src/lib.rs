//! A structure-of-arrays layout engine: a node tree plus parallel style and
//! layout tables, three layout engines (normal flow, flexbox, grid) that
//! resolve dirty nodes' geometry, and a concurrent cache for incremental
//! reflow under repeated recomputation.
//!
//! The crate is organized the way `azul-layout` organizes its own solver —
//! one flat `src/`, no workspace split between "core types" and "algorithm"
//! crates — since there is exactly one consumer of these types (the engines
//! in this crate) and no public plugin surface that would justify the split.

#[cfg(feature = "faster-hashing")]
extern crate twox_hash;

pub mod cache;
pub mod error;
pub mod flexbox;
pub mod grid;
pub mod layout_table;
pub mod node_tree;
pub mod normal_flow;
pub mod style;

mod document;

pub use cache::{CacheStats, CachedGeometry, LayoutCache};
pub use document::LayoutDocument;
pub use error::LayoutError;
pub use flexbox::compute_flexbox_layout;
pub use grid::compute_grid_layout;
pub use layout_table::Geometry;
pub use node_tree::NodeId;
pub use normal_flow::{compute_layout, Viewport};

/// Hash map used by the layout cache, swapped to an XxHash-keyed build with
/// the `faster-hashing` feature. Mirrors the `azul` crate's own
/// `FastHashMap` alias in shape: the default std-hasher map is kept unless a
/// caller opts into the faster, non-DoS-resistant hasher explicitly.
#[cfg(feature = "faster-hashing")]
pub type FastHashMap<K, V> = std::collections::HashMap<K, V, std::hash::BuildHasherDefault<twox_hash::XxHash>>;
#[cfg(not(feature = "faster-hashing"))]
pub type FastHashMap<K, V> = std::collections::HashMap<K, V>;
