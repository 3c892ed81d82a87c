//! Spatial indexing for bounded nearest-neighbour lookups
//!
//! The concave hull engine only needs one capability from an index:
//! "nearest sample within a squared radius of `(x, y)`". That capability is
//! the [`NearestWithin`] trait; [`SpatialIndex`] implements it with an
//! immutable KD-tree.

use glam::DVec2;
use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

/// Bounded nearest-neighbour query
///
/// Implementations must be safe to query from several threads once built.
pub trait NearestWithin: Sync {
    /// Nearest stored point whose squared distance to `(x, y)` is at most
    /// `max_sq_distance`, or `None` when no point is that close
    fn nearest_within(&self, x: f64, y: f64, max_sq_distance: f64) -> Option<DVec2>;
}

/// Wrapper around an immutable KD-tree over planar sample positions
///
/// # Performance
///
/// - Construction: O(n log n)
/// - Query: O(log n)
/// - Memory: the tree plus one copy of the coordinates
#[derive(Clone)]
pub struct SpatialIndex {
    tree: Option<ImmutableKdTree<f64, usize, 2, 32>>,
    points: Vec<[f64; 2]>,
}

impl SpatialIndex {
    /// Bulk-load the index from a point array
    ///
    /// Builds an immutable KD-tree in one pass. The tree stores positions in
    /// `points`, so items returned by queries are indices into that slice.
    /// The hull engine passes its lexicographically sorted working copy, but
    /// any order is accepted.
    ///
    /// # Arguments
    ///
    /// * `points` - `[x, y]` pairs to index; duplicates are allowed
    ///
    /// # Returns
    ///
    /// A read-only index that is safe to query from many threads. An empty
    /// slice yields an index that never finds anything.
    ///
    /// # Performance
    ///
    /// O(n log n) construction, one copy of the coordinates.
    pub fn bulk_load(points: &[[f64; 2]]) -> Self {
        let tree = if points.is_empty() {
            None
        } else {
            Some(ImmutableKdTree::new_from_slice(points))
        };
        Self {
            tree,
            points: points.to_vec(),
        }
    }

    /// Build the index from point vectors
    ///
    /// # Example
    ///
    /// ```
    /// use terrain_kriging::*;
    /// use glam::DVec2;
    ///
    /// let index = SpatialIndex::new(&[
    ///     DVec2::new(0.0, 0.0),
    ///     DVec2::new(10.0, 0.0),
    /// ]);
    ///
    /// assert_eq!(index.find_nearest(DVec2::new(9.0, 1.0)), Some(1));
    /// assert_eq!(index.nearest_within(9.0, 1.0, 1.0), None);
    /// assert_eq!(index.nearest_within(9.0, 1.0, 2.0), Some(DVec2::new(10.0, 0.0)));
    /// ```
    pub fn new(points: &[DVec2]) -> Self {
        let pairs: Vec<[f64; 2]> = points.iter().map(|p| [p.x, p.y]).collect();
        Self::bulk_load(&pairs)
    }

    /// Number of indexed points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// `true` when nothing is indexed
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Position of the point at `item`
    pub fn point(&self, item: usize) -> Option<DVec2> {
        self.points.get(item).map(|&[x, y]| DVec2::new(x, y))
    }

    /// Index of the nearest stored point, unbounded
    ///
    /// # Arguments
    ///
    /// * `position` - Planar position to query
    ///
    /// # Returns
    ///
    /// Index into the slice the tree was loaded from, or `None` for an empty
    /// index. Equidistant points resolve to an unspecified one of them.
    ///
    /// # Performance
    ///
    /// O(log n) lookup.
    pub fn find_nearest(&self, position: DVec2) -> Option<usize> {
        let tree = self.tree.as_ref()?;
        let result = tree.nearest_one::<SquaredEuclidean>(&[position.x, position.y]);
        Some(result.item)
    }
}

impl NearestWithin for SpatialIndex {
    fn nearest_within(&self, x: f64, y: f64, max_sq_distance: f64) -> Option<DVec2> {
        let tree = self.tree.as_ref()?;
        let result = tree.nearest_one::<SquaredEuclidean>(&[x, y]);
        if result.distance <= max_sq_distance {
            self.point(result.item)
        } else {
            None
        }
    }
}

impl std::fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("len", &self.points.len())
            .finish()
    }
}

/// Linear-scan index used to cross-check the KD-tree in tests
#[cfg(test)]
pub(crate) struct BruteForceIndex(pub(crate) Vec<DVec2>);

#[cfg(test)]
impl NearestWithin for BruteForceIndex {
    fn nearest_within(&self, x: f64, y: f64, max_sq_distance: f64) -> Option<DVec2> {
        let q = DVec2::new(x, y);
        self.0
            .iter()
            .copied()
            .map(|p| (p.distance_squared(q), p))
            .filter(|(d, _)| *d <= max_sq_distance)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, p)| p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_spatial_index_basic() {
        let points = vec![
            DVec2::new(1.0, 0.0),
            DVec2::new(0.0, 1.0),
            DVec2::new(-1.0, 0.0),
            DVec2::new(0.0, -1.0),
        ];

        let index = SpatialIndex::new(&points);
        assert_eq!(index.len(), 4);

        assert_eq!(index.find_nearest(DVec2::new(0.9, 0.1)), Some(0));
        assert_eq!(index.find_nearest(DVec2::new(0.0, 0.95)), Some(1));
        assert_eq!(index.find_nearest(DVec2::new(-0.8, 0.0)), Some(2));
        assert_eq!(index.find_nearest(DVec2::new(0.1, -0.7)), Some(3));
    }

    #[test]
    fn test_nearest_within_bound_is_inclusive() {
        let index = SpatialIndex::new(&[DVec2::new(3.0, 4.0)]);

        // squared distance from the origin is exactly 25
        assert_eq!(index.nearest_within(0.0, 0.0, 25.0), Some(DVec2::new(3.0, 4.0)));
        assert_eq!(index.nearest_within(0.0, 0.0, 24.999), None);
    }

    #[test]
    fn test_empty_index() {
        let index = SpatialIndex::bulk_load(&[]);
        assert!(index.is_empty());
        assert_eq!(index.find_nearest(DVec2::ZERO), None);
        assert_eq!(index.nearest_within(0.0, 0.0, f64::MAX), None);
    }

    #[test]
    fn test_matches_brute_force() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let points: Vec<DVec2> = (0..500)
            .map(|_| DVec2::new(rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0)))
            .collect();

        let index = SpatialIndex::new(&points);
        let brute = BruteForceIndex(points.clone());

        for _ in 0..200 {
            let x = rng.gen_range(-10.0..110.0);
            let y = rng.gen_range(-10.0..110.0);
            let r2 = rng.gen_range(0.0..50.0);
            assert_eq!(
                index.nearest_within(x, y, r2),
                brute.nearest_within(x, y, r2),
                "query ({x}, {y}) within {r2}"
            );
        }
    }
}
