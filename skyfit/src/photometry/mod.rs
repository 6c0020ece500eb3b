//! Conversion of background-corrected flux images to surface brightness.
//!
//! Fluxes are linear (nanomaggies); magnitudes follow `m = zp - 2.5 · log10(flux)`.


use common::Buffer2;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Lowest flux kept before taking logarithms.
pub const DEFAULT_FLUX_FLOOR: f64 = 0.001;

/// Photometric band of one image plane.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum PhotometricFilter {
    G,
    R,
    #[default]
    Z,
}

impl PhotometricFilter {
    /// Index of this band's plane in a `g, r, z` image cube.
    pub fn plane_index(self) -> usize {
        match self {
            PhotometricFilter::G => 0,
            PhotometricFilter::R => 1,
            PhotometricFilter::Z => 2,
        }
    }

    pub fn from_plane_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(PhotometricFilter::G),
            1 => Some(PhotometricFilter::R),
            2 => Some(PhotometricFilter::Z),
            _ => None,
        }
    }

    /// AB zero point of the band.
    pub fn zero_point(self) -> f64 {
        22.5
    }

    /// Atmospheric extinction coefficient, in magnitudes per airmass.
    pub fn extinction_coefficient(self) -> f64 {
        0.0
    }
}

/// Parameters of the flux to surface-brightness conversion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotometryConfig {
    pub filter: PhotometricFilter,
    pub zero_point: f64,
    pub extinction_coefficient: f64,
    pub zenith_angle_deg: f64,
    pub flux_floor: f64,
}

impl Default for PhotometryConfig {
    fn default() -> Self {
        Self::for_filter(PhotometricFilter::default())
    }
}

impl PhotometryConfig {
    /// Band defaults, observed at zenith.
    pub fn for_filter(filter: PhotometricFilter) -> Self {
        Self {
            filter,
            zero_point: filter.zero_point(),
            extinction_coefficient: filter.extinction_coefficient(),
            zenith_angle_deg: 0.0,
            flux_floor: DEFAULT_FLUX_FLOOR,
        }
    }

    pub fn with_zero_point(mut self, zero_point: f64) -> Self {
        self.zero_point = zero_point;
        self
    }

    pub fn with_extinction(mut self, coefficient: f64, zenith_angle_deg: f64) -> Self {
        self.extinction_coefficient = coefficient;
        self.zenith_angle_deg = zenith_angle_deg;
        self
    }

    pub fn with_flux_floor(mut self, flux_floor: f64) -> Self {
        self.flux_floor = flux_floor;
        self
    }
}

/// Raises every value below `floor` to `floor`. NaN passes through.
pub fn clamp_floor(image: &Buffer2<f64>, floor: f64) -> Buffer2<f64> {
    image.map(|&v| if v < floor { floor } else { v })
}

/// `zero_point - 2.5 · log10(flux)`. Zero flux maps to `+inf`, negative flux to NaN.
pub fn flux_to_magnitude(image: &Buffer2<f64>, zero_point: f64) -> Buffer2<f64> {
    image.map(|&v| zero_point - 2.5 * v.log10())
}

/// Subtracts `coefficient / cos(zenith)` from every magnitude.
pub fn correct_extinction(
    image: &Buffer2<f64>,
    coefficient: f64,
    zenith_angle_deg: f64,
) -> Buffer2<f64> {
    let correction = coefficient / zenith_angle_deg.to_radians().cos();
    image.map(|&m| m - correction)
}

/// NaN becomes `nan_value`, `±inf` becomes the largest finite value of that sign.
pub fn replace_non_finite(image: &Buffer2<f64>, nan_value: f64) -> Buffer2<f64> {
    image.map(|&v| {
        if v.is_nan() {
            nan_value
        } else if v == f64::INFINITY {
            f64::MAX
        } else if v == f64::NEG_INFINITY {
            f64::MIN
        } else {
            v
        }
    })
}

/// Flux image to surface-brightness magnitudes.
///
/// Runs [`flux_to_magnitude`], [`correct_extinction`] and [`replace_non_finite`] in that
/// order; undefined magnitudes are replaced with the zero point. Clamping to the flux floor
/// happens before background fitting, see [`crate::sky_surface_brightness`].
pub fn to_surface_brightness(image: &Buffer2<f64>, config: &PhotometryConfig) -> Buffer2<f64> {
    let magnitudes = flux_to_magnitude(image, config.zero_point);
    let corrected = correct_extinction(
        &magnitudes,
        config.extinction_coefficient,
        config.zenith_angle_deg,
    );
    let result = replace_non_finite(&corrected, config.zero_point);

    tracing::debug!(
        "Converted {}x{} {} image to magnitudes (zp={}, k={}, z={} deg)",
        image.width(),
        image.height(),
        config.filter,
        config.zero_point,
        config.extinction_coefficient,
        config.zenith_angle_deg
    );
    result
}
