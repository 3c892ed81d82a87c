//! Demonstration of variogram fitting and point predictions

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use terrain_kriging::kriging::{empirical_variogram, NODATA};
use terrain_kriging::*;

fn terrain(x: f64, y: f64) -> f64 {
    250.0 + 40.0 * (x / 180.0).sin() * (y / 120.0).cos() + 0.05 * x
}

fn main() -> Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let samples: Vec<DVec3> = (0..150)
        .map(|_| {
            let (x, y) = (rng.gen_range(0.0..1000.0), rng.gen_range(0.0..1000.0));
            DVec3::new(x, y, terrain(x, y))
        })
        .collect();
    println!("Loaded {} samples", samples.len());

    let variogram = empirical_variogram(&samples)?;
    println!("\nEmpirical variogram ({} lags):", variogram.len());
    for (lag, gamma) in variogram.lags.iter().zip(&variogram.semivariance).take(5) {
        println!("  h = {lag:>8.2}  gamma = {gamma:>10.3}");
    }

    let probes = [DVec2::new(250.0, 250.0), DVec2::new(500.0, 730.0), DVec2::new(910.0, 80.0)];

    for model in VariogramModel::ALL {
        let mut kriging = Kriging::new(samples.clone());
        let config = KrigingConfigBuilder::new()
            .model(model)
            .sigma2(0.0)?
            .alpha(100.0)?
            .build()?;
        // Gaussian systems on dense clouds can be numerically singular
        let params = match kriging.train_with_config(&config) {
            Ok(params) => *params,
            Err(e) => {
                println!("\n{model}: {e}");
                continue;
            }
        };

        println!("\n{model}:");
        println!(
            "  nugget = {:.3}, sill = {:.3}, range = {:.1}",
            params.nugget, params.sill, params.range
        );
        if let Some(method) = kriging.inverse_method() {
            println!("  covariance inverted with {method:?}");
        }

        let predicted = kriging.predict_many(&probes)?;
        for (p, z) in probes.iter().zip(predicted) {
            println!(
                "  ({:>6.1}, {:>6.1}) -> {:>8.3} (true {:>8.3})",
                p.x,
                p.y,
                z,
                terrain(p.x, p.y)
            );
        }
    }

    // Predictions outside the sample boundary are not trusted
    let mut kriging = Kriging::new(samples.clone());
    kriging.train(VariogramModel::Exponential, 0.0, 100.0)?;
    let points: Vec<DVec2> = samples.iter().map(|s| s.truncate()).collect();
    let hull_config = HullConfigBuilder::new().seglength(25.0)?.build()?;
    let boundary = concave_hull(&points, &hull_config)?;
    let masked = kriging.predict_masked(&boundary, &[DVec2::new(500.0, 500.0), DVec2::new(-50.0, 500.0)])?;
    println!("\nMasked predictions:");
    for z in masked {
        if z == NODATA {
            println!("  outside boundary");
        } else {
            println!("  {z:.3}");
        }
    }

    Ok(())
}
