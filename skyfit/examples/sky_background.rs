//! Example: Sky background removal on a synthetic galaxy field
//!
//! Builds a `g, r, z`-like flux image with a tilted sky, a few stars and a galaxy, picks
//! background regions the way an interactive session would (pairs of clicks), fits a
//! bilinear sky, saves/reloads the model and converts the result to magnitudes.
//!
//! # Usage
//!
//! ```bash
//! cargo run --release --example sky_background -- [model_dir]
//! ```

use std::env;
use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use skyfit::{
    sky_surface_brightness, Buffer2, Config, PhotometricFilter, PhotometryConfig,
    RegionSelector, SelectionEvent,
};

const WIDTH: usize = 400;
const HEIGHT: usize = 300;

fn main() {
    common::log_setup::setup_logging("info");

    let model_dir = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(env::temp_dir);

    let image = synthetic_field(WIDTH, HEIGHT, 7);
    println!("Synthetic image: {}x{}", image.width(), image.height());
    print_stats("Input flux", image.pixels());

    // Corner pairs as they would arrive from mouse releases.
    let clicks = [
        (10, 10),
        (60, 50),
        (340, 12),
        (390, 58),
        (15, 240),
        (70, 290),
        (330, 250),
        (395, 295),
    ];
    let mut selector = RegionSelector::new(clicks.len() / 2);
    for &point in &clicks {
        match selector.click(point) {
            SelectionEvent::Pending(corner) => println!("  first corner at {:?}", corner),
            SelectionEvent::Added(region) => println!("  added region {}", region),
            SelectionEvent::Complete => println!("  selection complete"),
        }
    }
    let regions = selector.finish();

    let config = Config::default()
        .with_sample(regions.sample())
        .with_degrees(1, 1)
        .with_model_name("skyBack")
        .with_model_dir(&model_dir)
        .with_photometry(PhotometryConfig::for_filter(PhotometricFilter::Z));

    match sky_surface_brightness(&image, &regions, &config) {
        Ok(result) => {
            let sky = &result.sky;
            println!("\nFitted {} samples", sky.sample_count);
            for i in 0..=1 {
                println!("  c[{}] = {:?}", i, sky.coefficients.row(i));
            }
            print_stats("Background", sky.background.values());
            print_stats("Corrected flux", sky.corrected.pixels());
            print_stats("Surface brightness", result.magnitudes.pixels());
            println!("\nModel saved under {}", model_dir.display());
        }
        Err(e) => eprintln!("Error: {}", e),
    }
}

/// Tilted sky plus point sources, a galaxy and Gaussian-ish noise.
fn synthetic_field(width: usize, height: usize, seed: u64) -> Buffer2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let stars: Vec<(f64, f64, f64)> = (0..25)
        .map(|_| {
            (
                rng.random_range(80.0..(width as f64 - 80.0)),
                rng.random_range(70.0..(height as f64 - 70.0)),
                rng.random_range(5.0..80.0),
            )
        })
        .collect();
    let (gx, gy) = (width as f64 / 2.0, height as f64 / 2.0);

    Buffer2::from_fn(width, height, |x, y| {
        let (x, y) = (x as f64, y as f64);
        let sky = 0.8 + 0.002 * x - 0.001 * y + 4e-6 * x * y;
        let galaxy = 40.0 * (-((x - gx).powi(2) / 900.0 + (y - gy).powi(2) / 400.0).sqrt()).exp();
        let point_sources: f64 = stars
            .iter()
            .map(|&(sx, sy, flux)| {
                let r2 = (x - sx).powi(2) + (y - sy).powi(2);
                flux * (-r2 / 3.0).exp()
            })
            .sum();
        let noise: f64 = (0..4).map(|_| rng.random_range(-0.02..0.02)).sum();
        sky + galaxy + point_sources + noise
    })
}

fn print_stats(label: &str, values: &[f64]) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    println!(
        "{label}: mean={mean:.4}, std={:.4}, min={min:.4}, max={max:.4}",
        variance.sqrt()
    );
}
