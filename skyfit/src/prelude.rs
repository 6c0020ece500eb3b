//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use skyfit::prelude::*;
//! ```

pub use crate::{Buffer2, Config, Error, Result};

pub use crate::{Corner, Region, RegionSelector, RegionSet, RegionSource, SelectionEvent};

pub use crate::{
    evaluate, fit, BackgroundModelStore, BackgroundSurface, PolynomialCoefficients,
    PolynomialSurfaceFitter,
};

pub use crate::{PhotometricFilter, PhotometryConfig};

pub use crate::{remove_sky_background, sky_surface_brightness, SkyBackgroundResult};
