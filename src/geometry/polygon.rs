//! Polygon measures and point-in-polygon tests

use glam::DVec2;

use super::{Edge, Rotator};

/// Ray-casting parity test over vertices produced by `vertex`
fn crossing_parity<F>(n: usize, vertex: F, x: f64, y: f64) -> bool
where
    F: Fn(usize) -> DVec2,
{
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = vertex(i);
        let pj = vertex(j);
        if (pi.y > y) != (pj.y > y) && x < (pj.x - pi.x) * (y - pi.y) / (pj.y - pi.y) + pi.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// `true` when `(x, y)` lies inside `polygon`
///
/// The ring is implicitly closed; a repeated closing vertex is harmless.
/// Works for concave rings of either orientation.
///
/// # Example
///
/// ```
/// use terrain_kriging::geometry::contains;
/// use glam::DVec2;
///
/// let square = [
///     DVec2::new(0.0, 0.0),
///     DVec2::new(4.0, 0.0),
///     DVec2::new(4.0, 4.0),
///     DVec2::new(0.0, 4.0),
/// ];
/// assert!(contains(&square, 2.0, 2.0));
/// assert!(!contains(&square, 5.0, 2.0));
/// ```
pub fn contains(polygon: &[DVec2], x: f64, y: f64) -> bool {
    crossing_parity(polygon.len(), |i| polygon[i], x, y)
}

/// Like [`contains`], with the polygon rotated then translated by `position`
///
/// The transform is applied per vertex during the test; the polygon itself
/// is not copied.
pub fn contains_oriented(polygon: &[DVec2], position: DVec2, rotator: Rotator, x: f64, y: f64) -> bool {
    let m = rotator.rotation_matrix();
    crossing_parity(polygon.len(), |i| position + m * polygon[i], x, y)
}

/// Closed-ring perimeter
pub fn perimeter(polygon: &[DVec2]) -> f64 {
    let n = polygon.len();
    if n < 2 {
        return 0.0;
    }
    (0..n)
        .map(|i| (polygon[(i + 1) % n] - polygon[i]).length())
        .sum()
}

/// Shoelace area, positive for counter-clockwise rings
pub fn signed_area(polygon: &[DVec2]) -> f64 {
    let n = polygon.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n)
        .map(|i| polygon[i].perp_dot(polygon[(i + 1) % n]))
        .sum();
    twice * 0.5
}

/// Directed edges of a closed ring
pub fn edges(polygon: &[DVec2]) -> Vec<Edge> {
    let n = polygon.len();
    (0..n)
        .map(|i| Edge::new(polygon[i], polygon[(i + 1) % n]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<DVec2> {
        vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(4.0, 0.0),
            DVec2::new(4.0, 4.0),
            DVec2::new(0.0, 4.0),
        ]
    }

    #[test]
    fn test_contains_concave() {
        // U shape opening upwards
        let u = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(6.0, 0.0),
            DVec2::new(6.0, 6.0),
            DVec2::new(4.0, 6.0),
            DVec2::new(4.0, 2.0),
            DVec2::new(2.0, 2.0),
            DVec2::new(2.0, 6.0),
            DVec2::new(0.0, 6.0),
        ];
        assert!(contains(&u, 1.0, 5.0));
        assert!(contains(&u, 5.0, 5.0));
        assert!(!contains(&u, 3.0, 5.0));
        assert!(contains(&u, 3.0, 1.0));
    }

    #[test]
    fn test_contains_degenerate() {
        assert!(!contains(&[], 0.0, 0.0));
        assert!(!contains(&[DVec2::ZERO, DVec2::ONE], 0.5, 0.5));
    }

    #[test]
    fn test_contains_oriented() {
        let sq = square();
        // rotate 90 degrees about the origin: square now spans x in [-4, 0]
        let r = Rotator::new(90.0);
        assert!(contains_oriented(&sq, DVec2::ZERO, r, -2.0, 2.0));
        assert!(!contains_oriented(&sq, DVec2::ZERO, r, 2.0, 2.0));
        // then shift back to the right
        assert!(contains_oriented(&sq, DVec2::new(10.0, 0.0), r, 8.0, 2.0));
    }

    #[test]
    fn test_measures() {
        let sq = square();
        assert_eq!(perimeter(&sq), 16.0);
        assert_eq!(signed_area(&sq), 16.0);

        let mut cw = sq.clone();
        cw.reverse();
        assert_eq!(signed_area(&cw), -16.0);
    }

    #[test]
    fn test_edges_wrap() {
        let e = edges(&square());
        assert_eq!(e.len(), 4);
        assert_eq!(e[3].start, DVec2::new(0.0, 4.0));
        assert_eq!(e[3].end, DVec2::new(0.0, 0.0));
        assert_eq!(e[3].normal, DVec2::new(-1.0, 0.0));
    }
}
