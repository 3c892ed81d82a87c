//! Monotone-chain convex hull
//!
//! Andrew's algorithm over a lexicographically sorted point array. The lower
//! and upper chains only read the shared sorted input, so they are built in
//! parallel.

use glam::DVec2;

use crate::geometry::{is_orientation_positive, FlatPoints};
use crate::maybe_rayon::join;

/// Convex hull of an unordered point set
///
/// Returns the hull counter-clockwise, starting from the lexicographically
/// smallest point, with colinear boundary points excluded. Fewer than three
/// input points are returned unchanged.
///
/// # Example
///
/// ```
/// use terrain_kriging::*;
/// use glam::DVec2;
///
/// let hull = convex_hull(&[
///     DVec2::new(0.0, 0.0),
///     DVec2::new(4.0, 0.0),
///     DVec2::new(2.0, 2.0),
///     DVec2::new(4.0, 4.0),
///     DVec2::new(0.0, 4.0),
/// ]);
///
/// assert_eq!(hull, vec![
///     DVec2::new(0.0, 0.0),
///     DVec2::new(4.0, 0.0),
///     DVec2::new(4.0, 4.0),
///     DVec2::new(0.0, 4.0),
/// ]);
/// ```
pub fn convex_hull(points: &[DVec2]) -> Vec<DVec2> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let mut sorted = FlatPoints::from_points(points);
    sorted.sort_lex();
    convex_hull_sorted(&sorted).to_points()
}

/// Convex hull of an unordered flat point set
pub fn convex_hull_flat(points: &FlatPoints) -> FlatPoints {
    if points.len() < 3 {
        return points.clone();
    }
    let mut sorted = points.clone();
    sorted.sort_lex();
    convex_hull_sorted(&sorted)
}

/// Convex hull of points already in lexicographic order
pub fn convex_hull_sorted(sorted: &FlatPoints) -> FlatPoints {
    debug_assert!(sorted.is_sorted_lex());
    let mut lower = Vec::new();
    let mut upper = Vec::new();
    let mut out = FlatPoints::new();
    monotone_chain_into(sorted, &mut lower, &mut upper, &mut out);
    out
}

/// Scratch-backed core: writes the hull of `sorted` into `out`
pub(crate) fn monotone_chain_into(
    sorted: &FlatPoints,
    lower: &mut Vec<usize>,
    upper: &mut Vec<usize>,
    out: &mut FlatPoints,
) {
    out.clear();
    if sorted.len() < 3 {
        out.assign(sorted.as_pairs());
        return;
    }

    join(|| lower_chain(sorted, lower), || upper_chain(sorted, upper));

    // each chain ends where the other starts
    lower.pop();
    upper.pop();

    for &i in lower.iter().chain(upper.iter()) {
        let (x, y) = sorted.take(i);
        out.push(x, y);
    }
}

/// Pop from `chain` until appending point `i` makes a strict left turn
#[inline]
fn push_turning_left(points: &FlatPoints, chain: &mut Vec<usize>, i: usize) {
    let (x, y) = points.take(i);
    while chain.len() > 1 {
        let m = chain.len();
        let (x1, y1) = points.take(chain[m - 2]);
        let (x2, y2) = points.take(chain[m - 1]);
        if is_orientation_positive(x1, y1, x2, y2, x, y) {
            break;
        }
        chain.pop();
    }
    chain.push(i);
}

fn lower_chain(points: &FlatPoints, chain: &mut Vec<usize>) {
    chain.clear();
    chain.extend([0, 1]);
    for i in 2..points.len() {
        push_turning_left(points, chain, i);
    }
}

fn upper_chain(points: &FlatPoints, chain: &mut Vec<usize>) {
    let n = points.len();
    chain.clear();
    chain.extend([n - 1, n - 2]);
    for i in (0..n - 2).rev() {
        push_turning_left(points, chain, i);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{cross, signed_area};
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn random_cloud(seed: u64, n: usize) -> Vec<DVec2> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        (0..n)
            .map(|_| DVec2::new(rng.gen_range(-50.0..50.0), rng.gen_range(-50.0..50.0)))
            .collect()
    }

    #[test]
    fn test_square_with_interior_point() {
        let hull = convex_hull(&[
            DVec2::new(2.0, 2.0),
            DVec2::new(0.0, 4.0),
            DVec2::new(4.0, 0.0),
            DVec2::new(4.0, 4.0),
            DVec2::new(0.0, 0.0),
        ]);
        assert_eq!(
            hull,
            vec![
                DVec2::new(0.0, 0.0),
                DVec2::new(4.0, 0.0),
                DVec2::new(4.0, 4.0),
                DVec2::new(0.0, 4.0),
            ]
        );
    }

    #[test]
    fn test_colinear_boundary_points_dropped() {
        let hull = convex_hull(&[
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(2.0, 2.0),
            DVec2::new(0.0, 2.0),
        ]);
        assert_eq!(hull.len(), 4);
        assert!(!hull.contains(&DVec2::new(1.0, 0.0)));
    }

    #[test]
    fn test_fewer_than_three_unchanged() {
        let two = [DVec2::new(3.0, 1.0), DVec2::new(-1.0, 0.0)];
        assert_eq!(convex_hull(&two), two.to_vec());
        assert!(convex_hull(&[]).is_empty());
    }

    #[test]
    fn test_random_cloud_is_contained() {
        let points = random_cloud(42, 2000);
        let hull = convex_hull(&points);

        assert!(hull.len() >= 3);
        assert!(signed_area(&hull) > 0.0, "hull must be counter-clockwise");

        let n = hull.len();
        for i in 0..n {
            let a = hull[i];
            let b = hull[(i + 1) % n];
            for p in &points {
                assert!(cross(b - a, *p - a) >= -1e-9, "{p} lies outside edge {a} -> {b}");
            }
        }
    }

    #[test]
    fn test_starts_at_lexicographic_minimum() {
        let points = random_cloud(3, 300);
        let hull = convex_hull(&points);
        let min = points
            .iter()
            .copied()
            .min_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)))
            .unwrap();
        assert_eq!(hull[0], min);
    }

    #[test]
    fn test_idempotent() {
        let hull = convex_hull(&random_cloud(11, 500));
        assert_eq!(convex_hull(&hull), hull);
    }

    #[test]
    fn test_flat_and_vector_agree() {
        let points = random_cloud(5, 400);
        let flat = convex_hull_flat(&FlatPoints::from_points(&points));
        assert_eq!(flat.to_points(), convex_hull(&points));
    }
}
