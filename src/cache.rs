//! The concurrent layout cache (spec §4.4): a bounded, thread-safe store of
//! resolved layouts keyed by node identity, with subtree invalidation, a
//! predictive precache queue, and hit/miss statistics.
//!
//! `azul` itself guards its shared, cross-thread state (the active GL
//! texture table in `compositor.rs`, the thread/timer bookkeeping in
//! `task.rs`) behind a single `std::sync::Mutex` rather than a lock-free
//! structure or a striped map, and spec §5 explicitly says a single
//! reentrant-enough mutex over all cache state is an acceptable design. This
//! cache follows the same shape: one `Mutex<Inner>` guarding the entry map,
//! the precache FIFO and the stats counters together, since the hot path
//! (cache hits) is expected to be dominated by the mutex, not by what's
//! inside it.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::node_tree::NodeId;
use crate::FastHashMap;

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct CachedGeometry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone)]
struct Entry {
    geometry: CachedGeometry,
    parent_id: Option<NodeId>,
    children: Vec<NodeId>,
    last_access: u64,
}

/// A point-in-time snapshot of the cache's counters (spec §4.4: `stats()`).
/// `Copy` so assertions in tests can take it by value without borrowing the
/// cache.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct CacheStats {
    pub size: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

struct Inner {
    capacity: usize,
    entries: FastHashMap<NodeId, Entry>,
    /// Logical clock, ticked on every touch (`put`/`get`). Using a counter
    /// instead of a wall-clock timestamp keeps "least-recently-used" exact
    /// and reproducible under test, at no behavioral cost: spec §4.4 only
    /// requires *an* ordering by last access, not wall-clock precision.
    clock: u64,
    hits: u64,
    misses: u64,
    precache_queue: VecDeque<NodeId>,
}

impl Inner {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn evict_one(&mut self) {
        let victim = self
            .entries
            .iter()
            .min_by_key(|(_, e)| e.last_access)
            .map(|(id, _)| *id);
        if let Some(id) = victim {
            #[cfg(feature = "logging")]
            log::trace!("layout cache evicting {:?} (capacity {})", id, self.capacity);
            self.entries.remove(&id);
        }
    }

    /// Removes `root` and, transitively, every descendant reachable via the
    /// cache's own stored `children` lists (spec §4.4) — not via the live
    /// `NodeTree`, which may have since changed.
    fn invalidate_subtree(&mut self, root: NodeId) {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if let Some(entry) = self.entries.remove(&id) {
                stack.extend(entry.children);
            }
        }
    }
}

/// Bounded, thread-safe cache of resolved per-node geometry. Every method
/// takes `&self`: callers share one `LayoutCache` behind an `Arc` across
/// threads, same as `azul_core::app::AppState::data` is an `Arc<Mutex<T>>`
/// shared with worker tasks.
pub struct LayoutCache {
    inner: Mutex<Inner>,
}

impl LayoutCache {
    pub fn with_capacity(capacity: usize) -> Self {
        LayoutCache {
            inner: Mutex::new(Inner {
                capacity: capacity.max(1),
                entries: FastHashMap::default(),
                clock: 0,
                hits: 0,
                misses: 0,
                precache_queue: VecDeque::new(),
            }),
        }
    }

    /// Inserts or overwrites the entry for `node_id`. Overwriting an
    /// already-present id never evicts (spec §4.4); inserting a new id at
    /// capacity evicts exactly one least-recently-used entry first.
    pub fn put(
        &self,
        node_id: NodeId,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        parent_id: Option<NodeId>,
        children: Vec<NodeId>,
    ) {
        let mut inner = self.inner.lock().unwrap();
        let now = inner.tick();
        let is_new = !inner.entries.contains_key(&node_id);
        if is_new && inner.entries.len() >= inner.capacity {
            inner.evict_one();
        }
        inner.entries.insert(
            node_id,
            Entry { geometry: CachedGeometry { x, y, width, height }, parent_id, children, last_access: now },
        );
        debug_assert!(inner.entries.len() <= inner.capacity);
    }

    /// Looks up `node_id`, recording a hit or a miss. A hit counts as a
    /// touch: it refreshes the entry's last-access time for LRU purposes.
    pub fn get(&self, node_id: NodeId) -> Option<CachedGeometry> {
        let mut inner = self.inner.lock().unwrap();
        let now_tick = {
            let c = inner.clock + 1;
            c
        };
        match inner.entries.get_mut(&node_id) {
            Some(entry) => {
                entry.last_access = now_tick;
                inner.clock = now_tick;
                inner.hits += 1;
                #[cfg(feature = "logging")]
                log::trace!("layout cache hit {:?}", node_id);
                Some(entry.geometry)
            }
            None => {
                inner.clock = now_tick;
                inner.misses += 1;
                #[cfg(feature = "logging")]
                log::trace!("layout cache miss {:?}", node_id);
                None
            }
        }
    }

    /// Membership check that does not affect hit/miss stats (spec §4.4:
    /// "implementation may count as read only" — this implementation does
    /// not touch LRU order either, so a `has` sweep can't itself cause an
    /// eviction ordering side effect).
    pub fn has(&self, node_id: NodeId) -> bool {
        self.inner.lock().unwrap().entries.contains_key(&node_id)
    }

    pub fn invalidate(&self, node_id: NodeId) {
        self.inner.lock().unwrap().entries.remove(&node_id);
    }

    pub fn invalidate_subtree(&self, root_id: NodeId) {
        self.inner.lock().unwrap().invalidate_subtree(root_id);
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.entries.clear();
        inner.hits = 0;
        inner.misses = 0;
        inner.clock = 0;
        inner.precache_queue.clear();
    }

    pub fn enqueue_precache(&self, ids: &[NodeId]) {
        let mut inner = self.inner.lock().unwrap();
        inner.precache_queue.extend(ids.iter().copied());
    }

    /// Atomically removes and returns the current precache queue contents.
    pub fn drain_precache_queue(&self) -> Vec<NodeId> {
        let mut inner = self.inner.lock().unwrap();
        inner.precache_queue.drain(..).collect()
    }

    /// Drains the precache queue and computes each queued node's layout
    /// concurrently via `compute`, inserting the results before returning.
    /// The only place in this crate that reaches for `rayon`: spec §4.4
    /// calls this queue "predictive precaching" — computing likely-soon-
    /// needed layouts ahead of time is exactly the kind of background,
    /// parallel work spec §5 carves out as the caller's responsibility to
    /// partition, so this helper does the partitioning for the one queue
    /// the cache itself owns.
    pub fn drain_and_compute<F>(&self, compute: F)
    where
        F: Fn(NodeId) -> Option<(f32, f32, f32, f32, Option<NodeId>, Vec<NodeId>)> + Sync,
    {
        let queued = self.drain_precache_queue();
        if queued.is_empty() {
            return;
        }
        let results: Vec<_> = {
            use rayon::prelude::*;
            queued.par_iter().map(|&id| (id, compute(id))).collect()
        };
        for (id, result) in results {
            if let Some((x, y, w, h, parent, children)) = result {
                self.put(id, x, y, w, h, parent, children);
            }
        }
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock().unwrap();
        CacheStats { size: inner.entries.len(), capacity: inner.capacity, hits: inner.hits, misses: inner.misses }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn put(cache: &LayoutCache, id: u32, parent: Option<u32>, children: &[u32]) {
        cache.put(
            NodeId::new(id),
            id as f32,
            0.0,
            10.0,
            10.0,
            parent.map(NodeId::new),
            children.iter().map(|c| NodeId::new(*c)).collect(),
        );
    }

    #[test]
    fn put_then_get_round_trips() {
        let cache = LayoutCache::with_capacity(4);
        put(&cache, 1, None, &[]);
        let got = cache.get(NodeId::new(1)).unwrap();
        assert_eq!(got, CachedGeometry { x: 1.0, y: 0.0, width: 10.0, height: 10.0 });
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn get_miss_is_counted_not_an_error() {
        let cache = LayoutCache::with_capacity(4);
        assert!(cache.get(NodeId::new(1)).is_none());
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn invalidate_absent_id_is_silent_no_op() {
        let cache = LayoutCache::with_capacity(4);
        cache.invalidate(NodeId::new(42));
        assert_eq!(cache.stats().size, 0);
    }

    /// Scenario S5: invalidate_subtree(2) removes {2,4,5} and leaves {1,3}.
    #[test]
    fn invalidate_subtree_removes_only_reachable_descendants() {
        let cache = LayoutCache::with_capacity(8);
        put(&cache, 1, None, &[2, 3]);
        put(&cache, 2, Some(1), &[4, 5]);
        put(&cache, 3, Some(1), &[]);
        put(&cache, 4, Some(2), &[]);
        put(&cache, 5, Some(2), &[]);

        cache.invalidate_subtree(NodeId::new(2));

        assert!(cache.has(NodeId::new(1)));
        assert!(cache.has(NodeId::new(3)));
        assert!(!cache.has(NodeId::new(2)));
        assert!(!cache.has(NodeId::new(4)));
        assert!(!cache.has(NodeId::new(5)));
    }

    /// Scenario S6: capacity 3, insert 1,2,3, touch 1, insert 4 evicts 2.
    #[test]
    fn lru_eviction_picks_the_least_recently_touched() {
        let cache = LayoutCache::with_capacity(3);
        put(&cache, 1, None, &[]);
        put(&cache, 2, None, &[]);
        put(&cache, 3, None, &[]);
        assert!(cache.get(NodeId::new(1)).is_some());

        put(&cache, 4, None, &[]);

        assert_eq!(cache.stats().size, 3);
        assert!(cache.has(NodeId::new(1)));
        assert!(!cache.has(NodeId::new(2)));
        assert!(cache.has(NodeId::new(3)));
        assert!(cache.has(NodeId::new(4)));
    }

    #[test]
    fn overwriting_present_id_never_evicts() {
        let cache = LayoutCache::with_capacity(2);
        put(&cache, 1, None, &[]);
        put(&cache, 2, None, &[]);
        put(&cache, 1, None, &[]);
        assert_eq!(cache.stats().size, 2);
        assert!(cache.has(NodeId::new(1)));
        assert!(cache.has(NodeId::new(2)));
    }

    #[test]
    fn clear_resets_entries_and_stats() {
        let cache = LayoutCache::with_capacity(4);
        put(&cache, 1, None, &[]);
        let _ = cache.get(NodeId::new(1));
        let _ = cache.get(NodeId::new(99));
        cache.clear();
        let stats = cache.stats();
        assert_eq!(stats.size, 0);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
    }

    #[test]
    fn precache_queue_drains_fifo_and_atomically() {
        let cache = LayoutCache::with_capacity(4);
        cache.enqueue_precache(&[NodeId::new(1), NodeId::new(2)]);
        cache.enqueue_precache(&[NodeId::new(3)]);
        let drained = cache.drain_precache_queue();
        assert_eq!(drained, vec![NodeId::new(1), NodeId::new(2), NodeId::new(3)]);
        assert!(cache.drain_precache_queue().is_empty());
    }

    #[test]
    fn drain_and_compute_inserts_every_computed_result() {
        let cache = LayoutCache::with_capacity(4);
        cache.enqueue_precache(&[NodeId::new(1), NodeId::new(2)]);
        cache.drain_and_compute(|id| Some((id.get() as f32, 0.0, 5.0, 5.0, None, Vec::new())));
        assert!(cache.has(NodeId::new(1)));
        assert!(cache.has(NodeId::new(2)));
    }

    #[test]
    fn concurrent_access_does_not_corrupt_size_invariant() {
        use std::sync::Arc;
        use std::thread;

        let cache = Arc::new(LayoutCache::with_capacity(16));
        let mut handles = Vec::new();
        for t in 0..8u32 {
            let cache = Arc::clone(&cache);
            handles.push(thread::spawn(move || {
                for i in 0..50u32 {
                    let id = NodeId::new((t * 50 + i) % 32 + 1);
                    cache.put(id, 0.0, 0.0, 1.0, 1.0, None, Vec::new());
                    let _ = cache.get(id);
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        let stats = cache.stats();
        assert!(stats.size <= stats.capacity);
    }
}
