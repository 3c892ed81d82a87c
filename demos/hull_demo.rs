//! Demonstration of convex, concave and QuickHull boundaries

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use terrain_kriging::geometry::{perimeter, signed_area};
use terrain_kriging::*;

fn main() -> Result<()> {
    // Crescent-shaped cloud: a disc with a bite taken out of the east side
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut points = Vec::with_capacity(4000);
    while points.len() < 4000 {
        let p = DVec2::new(rng.gen_range(-100.0..100.0), rng.gen_range(-100.0..100.0));
        if p.length() < 100.0 && (p - DVec2::new(60.0, 0.0)).length() > 55.0 {
            points.push(p);
        }
    }
    println!("Generated {} points", points.len());

    let convex = convex_hull(&points);
    println!("\nConvex hull:");
    println!("  vertices: {}", convex.len());
    println!("  area: {:.1}", signed_area(&convex));
    println!("  perimeter: {:.1}", perimeter(&convex));

    let config = HullConfigBuilder::new()
        .seglength(8.0)?
        .verbose(true)
        .build()?;
    let concave = ConcaveHull::new(config)?;

    let boundary = concave.compute(&points);
    println!("\nConcave hull:");
    println!("  vertices: {}", boundary.len());
    println!("  area: {:.1}", signed_area(&boundary).abs());
    println!("  perimeter: {:.1}", perimeter(&boundary));

    // Several clouds through a shared scratch pool
    let pool = ScratchPool::with_capacity(2, points.len());
    let flat = FlatPoints::from_points(&points);
    for _ in 0..3 {
        let again = concave.compute_pooled(&flat, &pool);
        assert_eq!(again, boundary);
    }
    println!("  pooled scratch buffers: {}", pool.idle());

    let simplified = simplify(&boundary, 5.0);
    println!("  simplified to {} vertices at tolerance 5.0", simplified.len());

    // Rigid shape queries
    let shape = QuickHull::new(points.iter().map(|p| p.extend(0.0)).collect());
    let rect = shape.rect();
    println!("\nQuickHull:");
    println!("  vertices: {}", shape.hull().len());
    println!("  bounds: {:?} .. {:?}", rect.min, rect.max);

    let rotator = Rotator::new(30.0);
    let position = DVec2::new(500.0, 250.0);
    if let Some(far) = shape.support(DVec2::X, rotator) {
        println!("  support along +x at 30 degrees: {far:?}");
    }
    for probe in [position, position + DVec2::new(150.0, 0.0)] {
        println!("  {probe:?} inside: {}", shape.in_hull(position, rotator, probe));
    }

    Ok(())
}
