//! 2D polynomial least-squares fitting over sampled regions.
//!
//! The fitted surface is
//!
//! ```text
//! z(x, y) = Σ_{i=0..=kx} Σ_{j=0..=ky} c[i][j] · x^i · y^j
//! ```
//!
//! in raw pixel coordinates (`x` = column, `y` = row). With an `order` cap, every term
//! with `i + j > order` is left out of the system and its coefficient is exactly zero.
//!
//! # Example
//!
//! ```ignore
//! use skyfit::{PolynomialSurfaceFitter, RegionSet};
//!
//! let mut regions = RegionSet::new(2);
//! regions.add((0, 0), (40, 30));
//! regions.add((200, 180), (240, 220));
//!
//! let fitter = PolynomialSurfaceFitter::new(1, 1, None)?;
//! let coefficients = fitter.fit(&regions, &image)?;
//! ```

mod coefficients;
mod point_cloud;
mod solver;


use common::Buffer2;
use nalgebra::{DMatrix, DVector};

pub use coefficients::PolynomialCoefficients;
pub(crate) use coefficients::horner;
pub use point_cloud::PointCloud;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::region::RegionSet;

/// Validated polynomial degrees plus the optional total-degree cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolynomialSurfaceFitter {
    kx: usize,
    ky: usize,
    order: Option<usize>,
}

impl PolynomialSurfaceFitter {
    /// # Errors
    /// [`Error::InvalidDegree`] if `kx`, `ky` or `order` is negative.
    pub fn new(kx: i64, ky: i64, order: Option<i64>) -> Result<Self> {
        let invalid = || Error::InvalidDegree { kx, ky, order };

        let kx_u = usize::try_from(kx).map_err(|_| invalid())?;
        let ky_u = usize::try_from(ky).map_err(|_| invalid())?;
        let order_u = order
            .map(|o| usize::try_from(o).map_err(|_| invalid()))
            .transpose()?;

        Ok(Self {
            kx: kx_u,
            ky: ky_u,
            order: order_u,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.kx, config.ky, config.order)
    }

    #[inline]
    pub fn kx(&self) -> usize {
        self.kx
    }

    #[inline]
    pub fn ky(&self) -> usize {
        self.ky
    }

    #[inline]
    pub fn order(&self) -> Option<usize> {
        self.order
    }

    /// Whether term `x^i · y^j` takes part in the fit.
    #[inline]
    pub fn is_active(&self, i: usize, j: usize) -> bool {
        self.order.map_or(true, |order| i + j <= order)
    }

    /// Active `(i, j)` terms, `i` outer and `j` inner.
    pub fn active_terms(&self) -> Vec<(usize, usize)> {
        let mut terms = Vec::with_capacity((self.kx + 1) * (self.ky + 1));
        for i in 0..=self.kx {
            for j in 0..=self.ky {
                if self.is_active(i, j) {
                    terms.push((i, j));
                }
            }
        }
        terms
    }

    /// Samples `regions` from `image` and fits the surface.
    ///
    /// # Errors
    /// * [`Error::InsufficientData`] if the regions cover no pixels.
    /// * [`Error::RegionOutOfBounds`] / [`Error::NonFiniteSample`] from sampling.
    pub fn fit(&self, regions: &RegionSet, image: &Buffer2<f64>) -> Result<PolynomialCoefficients> {
        let cloud = PointCloud::from_regions(regions, image)?;
        if cloud.is_empty() {
            return Err(Error::InsufficientData {
                regions: regions.len(),
            });
        }
        self.fit_points(&cloud)
    }

    /// Fits the surface to an already gathered point cloud.
    pub fn fit_points(&self, cloud: &PointCloud) -> Result<PolynomialCoefficients> {
        if cloud.is_empty() {
            return Err(Error::InsufficientData { regions: 0 });
        }

        let terms = self.active_terms();
        let design = self.design_matrix(cloud, &terms);
        let rhs = DVector::from_column_slice(cloud.z());

        tracing::debug!(
            "Fitting {}x{} polynomial (order {:?}): {} samples, {} active terms",
            self.kx,
            self.ky,
            self.order,
            cloud.len(),
            terms.len()
        );

        let (rows, cols) = design.shape();
        let solution =
            solver::solve_min_norm(design, &rhs).ok_or(Error::SvdNotConverged { rows, cols })?;

        if solution.rank < terms.len() {
            tracing::debug!(
                "Design matrix is rank deficient ({} of {}), using minimum-norm solution",
                solution.rank,
                terms.len()
            );
        }

        let mut values = vec![0.0; (self.kx + 1) * (self.ky + 1)];
        for (&(i, j), &c) in terms.iter().zip(&solution.coefficients) {
            values[i * (self.ky + 1) + j] = c;
        }

        Ok(PolynomialCoefficients::new(self.kx, self.ky, values))
    }

    /// One row per sample, one column per active term: `x^i · y^j`.
    fn design_matrix(&self, cloud: &PointCloud, terms: &[(usize, usize)]) -> DMatrix<f64> {
        let mut design = DMatrix::zeros(cloud.len(), terms.len());
        let mut x_pows = vec![1.0; self.kx + 1];
        let mut y_pows = vec![1.0; self.ky + 1];

        for (row, (&x, &y)) in cloud.x().iter().zip(cloud.y()).enumerate() {
            fill_powers(&mut x_pows, x);
            fill_powers(&mut y_pows, y);
            for (col, &(i, j)) in terms.iter().enumerate() {
                design[(row, col)] = x_pows[i] * y_pows[j];
            }
        }

        design
    }
}

/// Fits `z = Σ c[i][j] x^i y^j` to the pixels inside `regions`.
pub fn fit(
    regions: &RegionSet,
    image: &Buffer2<f64>,
    kx: i64,
    ky: i64,
    order: Option<i64>,
) -> Result<PolynomialCoefficients> {
    PolynomialSurfaceFitter::new(kx, ky, order)?.fit(regions, image)
}

/// `pows[k] = t^k`.
#[inline]
fn fill_powers(pows: &mut [f64], t: f64) {
    let mut acc = 1.0;
    for p in pows.iter_mut() {
        *p = acc;
        acc *= t;
    }
}
