//! Synthetic images for tests.

#![allow(dead_code)]

use common::Buffer2;

use crate::fitting::PolynomialCoefficients;

/// Image with the same value everywhere.
pub fn constant_image(width: usize, height: usize, value: f64) -> Buffer2<f64> {
    Buffer2::new_filled(width, height, value)
}

/// Image whose pixel `(x, y)` is `f(x, y)`.
pub fn image_from_fn(width: usize, height: usize, f: impl Fn(f64, f64) -> f64) -> Buffer2<f64> {
    Buffer2::from_fn(width, height, |x, y| f(x as f64, y as f64))
}

/// `z = 2 + 3x - y + 0.5xy`, exactly representable with `kx = ky = 1`.
pub fn bilinear_sky(x: f64, y: f64) -> f64 {
    2.0 + 3.0 * x - y + 0.5 * x * y
}

/// Reference evaluation by explicit powers, independent of the Horner path.
pub fn evaluate_naive(coefficients: &PolynomialCoefficients, x: f64, y: f64) -> f64 {
    let (rows, cols) = coefficients.shape();
    let mut sum = 0.0;
    for i in 0..rows {
        for j in 0..cols {
            sum += coefficients.get(i, j) * x.powi(i as i32) * y.powi(j as i32);
        }
    }
    sum
}

/// Largest `|a - b| / max(1, |b|)` over two equally sized slices.
pub fn max_relative_error(actual: &[f64], expected: &[f64]) -> f64 {
    assert_eq!(actual.len(), expected.len(), "length mismatch");
    actual
        .iter()
        .zip(expected)
        .map(|(&a, &e)| (a - e).abs() / e.abs().max(1.0))
        .fold(0.0, f64::max)
}
