//! Skyfit - sky-background estimation and removal for astronomical images.
//!
//! The background is modeled as a 2D polynomial
//! `z(x, y) = Σ c[i][j] · x^i · y^j` fitted by least squares to pixels inside
//! user-selected, source-free rectangular regions. The fitted surface is evaluated over
//! the whole image, optionally persisted, and subtracted.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use skyfit::{remove_sky_background, Config, RegionSet};
//!
//! let mut regions = RegionSet::new(2);
//! regions.add((10, 10), (60, 50));
//! regions.add((400, 300), (450, 360));
//!
//! let config = Config::default().with_degrees(1, 1).without_model();
//! let result = remove_sky_background(&image, &regions, &config)?;
//! println!("c00 = {}", result.coefficients[(0, 0)]);
//! ```

mod config;
mod error;
pub mod fitting;
pub mod photometry;
mod pipeline;
pub mod region;
pub mod store;
pub mod surface;

#[cfg(test)]
pub(crate) mod testing;

pub mod prelude;

pub use common::Buffer2;

// ============================================================================
// Errors and configuration
// ============================================================================

pub use config::{Config, DEFAULT_MODEL_NAME};
pub use error::{Error, Result};

// ============================================================================
// Regions
// ============================================================================

pub use region::{
    Corner, Region, RegionFile, RegionSelector, RegionSet, RegionSource, SelectionEvent,
};

// ============================================================================
// Fitting and evaluation
// ============================================================================

pub use fitting::{fit, PointCloud, PolynomialCoefficients, PolynomialSurfaceFitter};
pub use surface::{evaluate, BackgroundSurface};

// ============================================================================
// Persistence
// ============================================================================

pub use store::BackgroundModelStore;

// ============================================================================
// Photometry
// ============================================================================

pub use photometry::{
    clamp_floor, correct_extinction, flux_to_magnitude, replace_non_finite,
    to_surface_brightness, PhotometricFilter, PhotometryConfig, DEFAULT_FLUX_FLOOR,
};

// ============================================================================
// Pipeline
// ============================================================================

pub use pipeline::{
    remove_sky_background, sky_surface_brightness, SkyBackgroundResult, SurfaceBrightnessResult,
};
