//! Reusable working buffers for hull computation
//!
//! A [`HullScratch`] holds every temporary collection one concave hull run
//! needs. Buffers are cleared between runs but never shrunk, so a caller that
//! computes many hulls in a loop pays for allocation once. Concurrent callers
//! each check a scratch out of a [`ScratchPool`]; a scratch is never shared
//! between two in-flight computations.

use std::sync::{Mutex, PoisonError};

use glam::DVec2;

use crate::geometry::FlatPoints;

/// Index interval on an edge still to be searched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SearchInterval {
    pub left: usize,
    pub right: usize,
    /// Slot in the accepted list of the nearest accepted point to the left
    pub last_left: usize,
    /// Slot in the accepted list of the nearest accepted point to the right
    pub last_right: usize,
}

/// Sample accepted onto an edge, tagged with its subdivision index
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct AcceptedPoint {
    pub index: usize,
    pub point: DVec2,
}

/// Working buffers for one concave hull computation
#[derive(Debug, Default)]
pub struct HullScratch {
    /// Lexicographically sorted copy of the input
    pub(crate) sorted: FlatPoints,
    /// Lower monotone chain, as indexes into `sorted`
    pub(crate) lower: Vec<usize>,
    /// Upper monotone chain, as indexes into `sorted`
    pub(crate) upper: Vec<usize>,
    /// Convex hull vertices
    pub(crate) hull: FlatPoints,
    pub(crate) stack: Vec<SearchInterval>,
    pub(crate) accepted: Vec<AcceptedPoint>,
    /// Unsimplified concave boundary
    pub(crate) boundary: Vec<DVec2>,
}

impl HullScratch {
    /// Empty scratch; buffers grow on first use
    pub fn new() -> Self {
        Self::default()
    }

    /// Scratch pre-sized for inputs of about `points` samples
    pub fn with_capacity(points: usize) -> Self {
        Self {
            sorted: FlatPoints::with_capacity(points),
            lower: Vec::with_capacity(points.min(1024)),
            upper: Vec::with_capacity(points.min(1024)),
            hull: FlatPoints::with_capacity(points.min(1024)),
            stack: Vec::with_capacity(64),
            accepted: Vec::with_capacity(64),
            boundary: Vec::new(),
        }
    }

    /// Clear all buffers, keeping their allocations
    pub fn reset(&mut self) {
        self.sorted.clear();
        self.lower.clear();
        self.upper.clear();
        self.hull.clear();
        self.stack.clear();
        self.accepted.clear();
        self.boundary.clear();
    }

    /// Make room for a boundary of roughly `hull_len * ratio` vertices
    pub(crate) fn reserve_boundary(&mut self, hull_len: usize, ratio: usize) {
        self.boundary.clear();
        self.boundary.reserve(hull_len.saturating_mul(ratio.max(1)));
    }

    /// Capacity of the sorted-input buffer
    pub fn sorted_capacity(&self) -> usize {
        self.sorted.capacity()
    }
}

/// Thread-safe free list of [`HullScratch`] buffers
///
/// # Example
///
/// ```
/// use terrain_kriging::*;
///
/// let pool = ScratchPool::new();
/// {
///     let _a = pool.checkout();
///     let _b = pool.checkout();
/// }
/// // both scratches went back to the pool when their guards dropped
/// assert_eq!(pool.idle(), 2);
/// ```
#[derive(Debug, Default)]
pub struct ScratchPool {
    free: Mutex<Vec<HullScratch>>,
}

impl ScratchPool {
    /// Empty pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Pool pre-filled with `count` scratches sized for `points` samples
    pub fn with_capacity(count: usize, points: usize) -> Self {
        let free = (0..count).map(|_| HullScratch::with_capacity(points)).collect();
        Self {
            free: Mutex::new(free),
        }
    }

    /// Take a scratch out of the pool, creating one if none is idle
    pub fn checkout(&self) -> PooledScratch<'_> {
        let scratch = self
            .free
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop()
            .unwrap_or_default();
        PooledScratch {
            pool: self,
            scratch: Some(scratch),
        }
    }

    /// Number of scratches waiting in the pool
    pub fn idle(&self) -> usize {
        self.free.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn give_back(&self, mut scratch: HullScratch) {
        scratch.reset();
        self.free
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(scratch);
    }
}

/// Exclusive handle to a pooled scratch; returns it to the pool on drop
#[derive(Debug)]
pub struct PooledScratch<'a> {
    pool: &'a ScratchPool,
    scratch: Option<HullScratch>,
}

impl std::ops::Deref for PooledScratch<'_> {
    type Target = HullScratch;

    fn deref(&self) -> &HullScratch {
        // Only `drop` takes the scratch out.
        self.scratch.as_ref().unwrap_or_else(|| unreachable!())
    }
}

impl std::ops::DerefMut for PooledScratch<'_> {
    fn deref_mut(&mut self) -> &mut HullScratch {
        self.scratch.as_mut().unwrap_or_else(|| unreachable!())
    }
}

impl Drop for PooledScratch<'_> {
    fn drop(&mut self) {
        if let Some(scratch) = self.scratch.take() {
            self.pool.give_back(scratch);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_keeps_capacity() {
        let mut scratch = HullScratch::with_capacity(100);
        scratch.sorted.push(1.0, 2.0);
        scratch.boundary.push(DVec2::ONE);
        scratch.reserve_boundary(10, 4);
        assert!(scratch.boundary.capacity() >= 40);

        let before = scratch.sorted_capacity();
        scratch.reset();
        assert!(scratch.sorted.is_empty());
        assert!(scratch.boundary.is_empty());
        assert_eq!(scratch.sorted_capacity(), before);
    }

    #[test]
    fn test_pool_reuses_buffers() {
        let pool = ScratchPool::with_capacity(1, 256);
        assert_eq!(pool.idle(), 1);
        {
            let mut s = pool.checkout();
            assert_eq!(pool.idle(), 0);
            s.sorted.push(3.0, 4.0);
        }
        assert_eq!(pool.idle(), 1);

        // returned scratch comes back cleared
        let s = pool.checkout();
        assert!(s.sorted.is_empty());
        assert!(s.sorted_capacity() >= 256);
    }

    #[test]
    fn test_pool_grows_under_contention() {
        let pool = ScratchPool::new();
        let a = pool.checkout();
        let b = pool.checkout();
        drop(a);
        drop(b);
        assert_eq!(pool.idle(), 2);
    }
}
