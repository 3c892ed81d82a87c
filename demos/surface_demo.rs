//! Demonstration of gridded surfaces and compositing over a background raster

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use terrain_kriging::blend::{BlendMode, Corners};
use terrain_kriging::kriging::NODATA;
use terrain_kriging::*;

fn main() -> Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let samples: Vec<DVec3> = (0..120)
        .map(|_| {
            let (x, y) = (rng.gen_range(0.0..400.0), rng.gen_range(0.0..200.0));
            DVec3::new(x, y, 80.0 + 0.1 * x + 15.0 * (y / 40.0).sin())
        })
        .collect();

    let mut kriging = Kriging::new(samples.clone());
    let config = KrigingConfigBuilder::new()
        .model(VariogramModel::Spherical)
        .srs(32633)
        .verbose(true)
        .build()?;
    kriging.train_with_config(&config)?;

    // Rectangle over the samples
    let contour = kriging.contour(40, 20)?;
    println!("\nContour {}x{}:", contour.x_width, contour.y_width);
    println!("  resolution: {:.2} x {:.2}", contour.x_resolution, contour.y_resolution);
    println!("  z range of samples: {:?}", contour.zlim);

    let bbox = Rect::new(DVec2::new(100.0, 50.0), DVec2::new(300.0, 150.0));
    let zoomed = kriging.contour_with_bbox(bbox, 25.0)?;
    println!("\nZoomed contour {}x{} over {:?}", zoomed.x_width, zoomed.y_width, zoomed.xlim);
    for row in (0..zoomed.y_width).rev() {
        let line: Vec<String> = (0..zoomed.x_width)
            .filter_map(|col| zoomed.value(col, row))
            .map(|z| format!("{z:5.0}"))
            .collect();
        println!("  {}", line.join(""));
    }

    // Grid masked by the concave boundary of the samples
    let points: Vec<DVec2> = samples.iter().map(|s| s.truncate()).collect();
    let hull_config = HullConfigBuilder::new().seglength(20.0)?.build()?;
    let boundary = concave_hull(&points, &hull_config)?;
    let grid = kriging.grid(&[boundary], 10.0)?;
    println!(
        "\nMasked grid {}x{}: {} of {} cells predicted (srs {:?})",
        grid.cols,
        grid.rows,
        grid.valid_count(),
        grid.cols * grid.rows,
        grid.srs
    );

    // Composite one masked cell against a background raster
    if let Some((col, row)) = (0..grid.rows)
        .flat_map(|row| (0..grid.cols).map(move |col| (col, row)))
        .find(|&(col, row)| grid.value(col, row).is_none())
    {
        let corners = Corners::new(75.0, NODATA, 82.0, 79.0);
        for mode in [BlendMode::Bilinear, BlendMode::Hyperbolic] {
            let z = mode.blend(corners, NODATA, 0.25, 0.75);
            println!("  background at {:?} ({mode}): {z:.3}", grid.node(col, row));
        }
    }

    Ok(())
}
