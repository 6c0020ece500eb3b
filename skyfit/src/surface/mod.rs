//! Dense reconstruction of a fitted background over the full image grid.

#[cfg(test)]
mod tests;

use common::Buffer2;
use rayon::prelude::*;

use crate::fitting::{horner, PolynomialCoefficients};

/// Background model sampled at every pixel of an image, shape `(height, width)`.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundSurface {
    grid: Buffer2<f64>,
}

impl BackgroundSurface {
    pub fn new(grid: Buffer2<f64>) -> Self {
        Self { grid }
    }

    /// Wraps row-major values as a `height × width` surface.
    pub fn from_vec(height: usize, width: usize, values: Vec<f64>) -> Self {
        Self {
            grid: Buffer2::new(width, height, values),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// `(height, width)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.grid.shape()
    }

    /// Value at column `x`, row `y`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        *self.grid.get(x, y)
    }

    /// Row-major values.
    #[inline]
    pub fn values(&self) -> &[f64] {
        self.grid.pixels()
    }

    #[inline]
    pub fn grid(&self) -> &Buffer2<f64> {
        &self.grid
    }

    pub fn into_grid(self) -> Buffer2<f64> {
        self.grid
    }

    /// `image - surface`, pixel by pixel.
    ///
    /// # Panics
    /// Panics if `image` does not have the surface's shape.
    pub fn subtract_from(&self, image: &Buffer2<f64>) -> Buffer2<f64> {
        assert!(
            image.same_shape(&self.grid),
            "Image shape {:?} does not match background shape {:?}",
            image.shape(),
            self.shape()
        );
        image.zip_map(&self.grid, |pixel, background| pixel - background)
    }
}

/// Evaluates `coefficients` at every integer pixel of a `height × width` grid.
///
/// Each row first collapses the `y` powers into per-`x^i` weights, then runs Horner in `x`
/// across the row. Rows are processed in parallel.
pub fn evaluate(
    coefficients: &PolynomialCoefficients,
    height: usize,
    width: usize,
) -> BackgroundSurface {
    let (x_terms, _) = coefficients.shape();
    let mut values = vec![0.0f64; width * height];

    if width > 0 {
        values
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                let y = y as f64;
                let x_weights: Vec<f64> = (0..x_terms)
                    .map(|i| horner(coefficients.row(i), y))
                    .collect();
                for (x, pixel) in row.iter_mut().enumerate() {
                    *pixel = horner(&x_weights, x as f64);
                }
            });
    }

    tracing::debug!(
        "Evaluated {}x{} polynomial over {}x{} grid",
        coefficients.kx(),
        coefficients.ky(),
        width,
        height
    );

    BackgroundSurface::from_vec(height, width, values)
}
