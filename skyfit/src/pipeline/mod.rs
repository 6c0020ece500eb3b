//! End-to-end sky-background removal for one image band.


use common::Buffer2;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::fitting::{PointCloud, PolynomialCoefficients, PolynomialSurfaceFitter};
use crate::photometry::{clamp_floor, to_surface_brightness};
use crate::region::RegionSet;
use crate::store::BackgroundModelStore;
use crate::surface::{evaluate, BackgroundSurface};

/// Output of [`remove_sky_background`].
#[derive(Debug, Clone)]
pub struct SkyBackgroundResult {
    pub coefficients: PolynomialCoefficients,
    /// Background as used for subtraction (the reloaded copy when a model name is set).
    pub background: BackgroundSurface,
    /// `image - background`.
    pub corrected: Buffer2<f64>,
    /// Number of pixels the fit was computed from.
    pub sample_count: usize,
}

/// Output of [`sky_surface_brightness`].
#[derive(Debug, Clone)]
pub struct SurfaceBrightnessResult {
    pub sky: SkyBackgroundResult,
    /// Background-corrected image in magnitudes.
    pub magnitudes: Buffer2<f64>,
}

/// Fits the sky over `regions`, evaluates it over the whole image and subtracts it.
///
/// With `config.model_name` set, the evaluated background is saved to
/// `config.model_dir` and read back before subtraction.
pub fn remove_sky_background(
    image: &Buffer2<f64>,
    regions: &RegionSet,
    config: &Config,
) -> Result<SkyBackgroundResult> {
    let fitter = PolynomialSurfaceFitter::from_config(config)?;

    if !regions.is_complete() {
        tracing::warn!(
            "Fitting with {} of {} requested regions",
            regions.len(),
            regions.sample()
        );
    }

    let cloud = PointCloud::from_regions(regions, image)?;
    if cloud.is_empty() {
        return Err(Error::InsufficientData {
            regions: regions.len(),
        });
    }
    let coefficients = fitter.fit_points(&cloud)?;

    let (height, width) = image.shape();
    let mut background = evaluate(&coefficients, height, width);

    if let Some(name) = &config.model_name {
        let store = BackgroundModelStore::new(&config.model_dir);
        store.save(&background, name)?;
        background = store.load(name)?;
    }

    let corrected = background.subtract_from(image);

    tracing::info!(
        "Removed {}x{} sky background from {}x{} image using {} samples in {} regions",
        fitter.kx(),
        fitter.ky(),
        width,
        height,
        cloud.len(),
        regions.len()
    );

    Ok(SkyBackgroundResult {
        coefficients,
        background,
        corrected,
        sample_count: cloud.len(),
    })
}

/// Full flux to surface-brightness reduction of one band.
///
/// Fluxes below `config.photometry.flux_floor` are raised to it, the sky background is
/// removed with [`remove_sky_background`] and the result is converted to magnitudes.
pub fn sky_surface_brightness(
    image: &Buffer2<f64>,
    regions: &RegionSet,
    config: &Config,
) -> Result<SurfaceBrightnessResult> {
    let floored = clamp_floor(image, config.photometry.flux_floor);
    let sky = remove_sky_background(&floored, regions, config)?;
    let magnitudes = to_surface_brightness(&sky.corrected, &config.photometry);

    Ok(SurfaceBrightnessResult { sky, magnitudes })
}
