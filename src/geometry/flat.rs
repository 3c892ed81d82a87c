//! Contiguous coordinate storage used between hull stages

use glam::DVec2;

use super::lex_cmp;
use crate::error::{KrigingError, Result};

/// Ordered point sequence stored as interleaved `x, y` pairs
///
/// Logical point `i` lives at flat offsets `2i` and `2i + 1`. The backing
/// `[f64; 2]` array layout is what the KD-tree bulk load consumes directly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatPoints(Vec<[f64; 2]>);

impl FlatPoints {
    /// Empty sequence
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Empty sequence with room for `n` points
    pub fn with_capacity(n: usize) -> Self {
        Self(Vec::with_capacity(n))
    }

    /// Build from interleaved coordinates
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the slice length is odd
    pub fn from_interleaved(coords: &[f64]) -> Result<Self> {
        if coords.len() % 2 != 0 {
            return Err(KrigingError::InvalidInput(format!(
                "interleaved coordinates must have even length (got {})",
                coords.len()
            )));
        }
        Ok(Self(coords.chunks_exact(2).map(|c| [c[0], c[1]]).collect()))
    }

    /// Build from point vectors
    pub fn from_points(points: &[DVec2]) -> Self {
        Self(points.iter().map(|p| [p.x, p.y]).collect())
    }

    /// Number of logical points
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` when there are no points
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Points the backing storage can hold without reallocating
    #[inline]
    pub fn capacity(&self) -> usize {
        self.0.capacity()
    }

    /// Point `i` as `(x, y)`
    #[inline]
    pub fn take(&self, i: usize) -> (f64, f64) {
        let [x, y] = self.0[i];
        (x, y)
    }

    /// Point `i` as a vector
    #[inline]
    pub fn point(&self, i: usize) -> DVec2 {
        let [x, y] = self.0[i];
        DVec2::new(x, y)
    }

    /// Append a point
    #[inline]
    pub fn push(&mut self, x: f64, y: f64) {
        self.0.push([x, y]);
    }

    /// Exchange points `i` and `j`
    #[inline]
    pub fn swap(&mut self, i: usize, j: usize) {
        self.0.swap(i, j);
    }

    /// Remove all points, keeping capacity
    #[inline]
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Replace the contents with `other`, reusing capacity
    pub fn assign(&mut self, other: &[[f64; 2]]) {
        self.0.clear();
        self.0.extend_from_slice(other);
    }

    /// Sort lexicographically by x, then y
    pub fn sort_lex(&mut self) {
        self.0.sort_unstable_by(lex_cmp);
    }

    /// `true` when already in lexicographic order
    pub fn is_sorted_lex(&self) -> bool {
        self.0.windows(2).all(|w| lex_cmp(&w[0], &w[1]).is_le())
    }

    /// Interleaved view `x0, y0, x1, y1, ...`
    pub fn as_interleaved(&self) -> &[f64] {
        self.0.as_flattened()
    }

    /// Point pairs
    pub fn as_pairs(&self) -> &[[f64; 2]] {
        &self.0
    }

    /// Iterate the points as vectors
    pub fn iter(&self) -> impl Iterator<Item = DVec2> + '_ {
        self.0.iter().map(|&[x, y]| DVec2::new(x, y))
    }

    /// Copy out as vectors
    pub fn to_points(&self) -> Vec<DVec2> {
        self.iter().collect()
    }
}

impl From<Vec<[f64; 2]>> for FlatPoints {
    fn from(pairs: Vec<[f64; 2]>) -> Self {
        Self(pairs)
    }
}

impl FromIterator<DVec2> for FlatPoints {
    fn from_iter<I: IntoIterator<Item = DVec2>>(iter: I) -> Self {
        Self(iter.into_iter().map(|p| [p.x, p.y]).collect())
    }
}
