//! Concave hull by convex-edge refinement
//!
//! # Algorithm
//!
//! 1. Sort the input lexicographically and, in parallel, build the convex
//!    hull and a nearest-neighbour index over the sorted copy.
//! 2. Walk every convex edge. Each edge is cut into `ceil(length / seglength)`
//!    equal steps and searched by interval halving: at the midpoint of an
//!    interval, the nearest sample that is at least as close as both
//!    bounding accepted points is pulled onto the boundary.
//! 3. Simplify the collected boundary with Douglas-Peucker at `seglength`.
//!
//! The result is a counter-clockwise ring made only of input points. Small
//! `seglength` values hug the data closely; large values approach the convex
//! hull.

use std::time::Instant;

use glam::DVec2;

use super::convex::monotone_chain_into;
use super::simplify::simplify;
use crate::config::HullConfig;
use crate::error::Result;
use crate::geometry::FlatPoints;
use crate::maybe_rayon::join;
use crate::scratch::{AcceptedPoint, HullScratch, ScratchPool, SearchInterval};
use crate::spatial::{NearestWithin, SpatialIndex};

/// Concave hull of `points` with the given configuration
///
/// Convenience wrapper around [`ConcaveHull::new`] and
/// [`ConcaveHull::compute`].
///
/// # Errors
///
/// Returns `InvalidConfig` if `config` fails [`HullConfig::validate`].
///
/// # Example
///
/// ```
/// use terrain_kriging::*;
/// use glam::DVec2;
///
/// let points: Vec<DVec2> = (0..=4)
///     .flat_map(|x| (0..=4).map(move |y| DVec2::new(x as f64, y as f64)))
///     .collect();
///
/// let config = HullConfigBuilder::new().seglength(0.5).unwrap().build().unwrap();
/// let hull = concave_hull(&points, &config).unwrap();
///
/// assert!(hull.iter().all(|v| points.contains(v)));
/// ```
pub fn concave_hull(points: &[DVec2], config: &HullConfig) -> Result<Vec<DVec2>> {
    Ok(ConcaveHull::new(*config)?.compute(points))
}

/// Concave hull engine
///
/// Holds only configuration, so one engine can serve many threads. Each
/// computation needs its own [`HullScratch`]; the `compute*` variants either
/// allocate one, borrow one from the caller, or check one out of a
/// [`ScratchPool`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ConcaveHull {
    config: HullConfig,
}

impl ConcaveHull {
    /// Create an engine
    ///
    /// The configuration is checked once here, so every `compute*` call on
    /// the engine can assume a positive `seglength`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for a non-positive or non-finite `seglength`
    /// or a zero `estimated_ratio`, as [`HullConfig::validate`] does.
    pub fn new(config: HullConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration
    pub fn config(&self) -> &HullConfig {
        &self.config
    }

    /// Concave hull of an unordered point set
    ///
    /// Copies the points into a freshly allocated [`HullScratch`], sorts
    /// them and runs the full pipeline. Use [`compute_pooled`](Self::compute_pooled)
    /// or [`compute_flat_with_scratch`](Self::compute_flat_with_scratch) when
    /// many clouds are processed and the allocations should be reused.
    ///
    /// # Arguments
    ///
    /// * `points` - Sample positions in any order; duplicates are allowed
    ///
    /// # Returns
    ///
    /// Counter-clockwise ring of input points without a repeated closing
    /// vertex. Fewer than three input points are returned unchanged.
    ///
    /// # Example
    ///
    /// ```
    /// use terrain_kriging::*;
    ///
    /// let config = HullConfigBuilder::new().seglength(1.0).unwrap().build().unwrap();
    /// let engine = ConcaveHull::new(config).unwrap();
    ///
    /// // 5x5 lattice on a 2.5 spacing: only the corners survive
    /// let lattice: Vec<DVec2> = (0..25)
    ///     .map(|i| DVec2::new((i % 5) as f64 * 2.5, (i / 5) as f64 * 2.5))
    ///     .collect();
    /// assert_eq!(engine.compute(&lattice).len(), 4);
    /// ```
    pub fn compute(&self, points: &[DVec2]) -> Vec<DVec2> {
        if points.len() < 3 {
            return points.to_vec();
        }
        let mut scratch = HullScratch::with_capacity(points.len());
        self.compute_flat_with_scratch(&FlatPoints::from_points(points), &mut scratch)
    }

    /// Concave hull using a scratch from `pool`
    ///
    /// The scratch is checked out for the duration of the call and returned
    /// to the pool afterwards, so concurrent callers sharing one pool never
    /// see each other's buffers.
    ///
    /// # Arguments
    ///
    /// * `points` - Sample positions in any order
    /// * `pool` - Pool to borrow working buffers from; grows on contention
    ///
    /// # Returns
    ///
    /// The same ring [`compute`](Self::compute) would return.
    pub fn compute_pooled(&self, points: &FlatPoints, pool: &ScratchPool) -> Vec<DVec2> {
        let mut scratch = pool.checkout();
        self.compute_flat_with_scratch(points, &mut scratch)
    }

    /// Concave hull using caller-owned working buffers
    ///
    /// `scratch` is reset first; its allocations are reused.
    ///
    /// # Arguments
    ///
    /// * `points` - Sample positions in any order
    /// * `scratch` - Working buffers; their contents on entry are ignored
    ///
    /// # Returns
    ///
    /// The same ring [`compute`](Self::compute) would return. After the
    /// call `scratch.hull` still holds the convex hull of `points`.
    pub fn compute_flat_with_scratch(&self, points: &FlatPoints, scratch: &mut HullScratch) -> Vec<DVec2> {
        if points.len() < 3 {
            return points.to_points();
        }
        scratch.reset();
        scratch.sorted.assign(points.as_pairs());
        scratch.sorted.sort_lex();
        self.compute_sorted(scratch)
    }

    /// Concave hull of the already-sorted points in `scratch.sorted`
    fn compute_sorted(&self, scratch: &mut HullScratch) -> Vec<DVec2> {
        let total_start = Instant::now();

        let HullScratch {
            sorted,
            lower,
            upper,
            hull,
            ..
        } = scratch;
        let sorted = &*sorted;
        let ((), index) = join(
            || monotone_chain_into(sorted, lower, upper, hull),
            || SpatialIndex::bulk_load(sorted.as_pairs()),
        );
        let convex_time = total_start.elapsed();

        let refine_start = Instant::now();
        let result = self.refine(&index, scratch);
        let refine_time = refine_start.elapsed();

        if self.config.verbose {
            eprintln!(
                "[ConcaveHull] {} points: convex={} vertices ({:?}), concave={} vertices ({:?}), total={:?}",
                scratch.sorted.len(),
                scratch.hull.len(),
                convex_time,
                result.len(),
                refine_time,
                total_start.elapsed()
            );
        }
        result
    }

    /// Refine the convex hull in `scratch.hull` against `index`
    ///
    /// Exposed for callers that bring their own nearest-neighbour structure.
    pub fn refine<I: NearestWithin>(&self, index: &I, scratch: &mut HullScratch) -> Vec<DVec2> {
        let n = scratch.hull.len();
        if n < 3 {
            return scratch.hull.to_points();
        }

        scratch.reserve_boundary(n, self.config.estimated_ratio);
        let HullScratch {
            hull,
            stack,
            accepted,
            boundary,
            ..
        } = scratch;

        boundary.push(hull.point(0));
        for i in 0..n {
            let p1 = hull.point(i);
            let p2 = hull.point((i + 1) % n);
            self.segmentize(index, p1, p2, stack, accepted);
            // slot 0 is p1, already emitted by the previous edge
            boundary.extend(accepted[1..].iter().map(|a| a.point));
        }

        let mut simplified = simplify(boundary, self.config.seglength);
        if simplified.len() > 1 && simplified.first() == simplified.last() {
            simplified.pop();
        }
        simplified
    }

    /// Collect samples along `p1 → p2` into `accepted`, ordered by position
    ///
    /// On return `accepted` starts with `p1` and ends with `p2`.
    fn segmentize<I: NearestWithin>(
        &self,
        index: &I,
        p1: DVec2,
        p2: DVec2,
        stack: &mut Vec<SearchInterval>,
        accepted: &mut Vec<AcceptedPoint>,
    ) {
        stack.clear();
        accepted.clear();

        let steps = ((p2 - p1).length() / self.config.seglength).ceil();
        let steps = if steps.is_finite() { steps as usize } else { 0 };
        accepted.push(AcceptedPoint { index: 0, point: p1 });
        accepted.push(AcceptedPoint {
            index: steps,
            point: p2,
        });
        if steps < 2 {
            return;
        }

        let step = (p2 - p1) / steps as f64;
        stack.push(SearchInterval {
            left: 0,
            right: steps,
            last_left: 0,
            last_right: 1,
        });

        while let Some(interval) = stack.pop() {
            if interval.right - interval.left <= 1 {
                continue;
            }
            let mid = (interval.left + interval.right) / 2;
            let current = p1 + step * mid as f64;

            let left_point = accepted[interval.last_left].point;
            let right_point = accepted[interval.last_right].point;
            let bound = current
                .distance_squared(left_point)
                .min(current.distance_squared(right_point));

            let Some(found) = index.nearest_within(current.x, current.y, bound) else {
                continue;
            };

            let new_left = found != left_point;
            let new_right = found != right_point;
            if new_left && new_right {
                let slot = accepted.len();
                accepted.push(AcceptedPoint {
                    index: mid,
                    point: found,
                });
                stack.push(SearchInterval {
                    right: mid,
                    last_right: slot,
                    ..interval
                });
                stack.push(SearchInterval {
                    left: mid,
                    last_left: slot,
                    ..interval
                });
            } else if new_left {
                stack.push(SearchInterval { right: mid, ..interval });
            } else {
                stack.push(SearchInterval { left: mid, ..interval });
            }
        }

        accepted.sort_by_key(|a| a.index);
    }
}
