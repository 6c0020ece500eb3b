use super::*;
use crate::fitting::PolynomialSurfaceFitter;
use crate::region::RegionSet;
use crate::testing::{
    bilinear_sky, constant_image, evaluate_naive, image_from_fn, max_relative_error,
};

fn quadratic() -> PolynomialCoefficients {
    PolynomialCoefficients::from_rows(&[
        [1.5, -0.25, 0.01],
        [0.75, 0.002, -0.0003],
        [-0.004, 0.0001, 0.00002],
    ])
}

#[test]
fn test_shape_matches_request() {
    let coeffs = PolynomialCoefficients::from_rows(&[[1.0, 2.0], [3.0, 4.0]]);
    for &h in &[1usize, 10, 500] {
        for &w in &[1usize, 10, 500] {
            let surface = evaluate(&coeffs, h, w);
            assert_eq!(surface.shape(), (h, w));
            assert_eq!(surface.height(), h);
            assert_eq!(surface.width(), w);
            assert_eq!(surface.values().len(), h * w);
        }
    }
}

#[test]
fn test_non_square_orientation() {
    // z = x: values must grow along rows, not down columns.
    let coeffs = PolynomialCoefficients::from_rows(&[[0.0], [1.0]]);
    let surface = evaluate(&coeffs, 3, 5);
    assert_eq!(surface.shape(), (3, 5));
    assert_eq!(surface.get(4, 0), 4.0);
    assert_eq!(surface.get(0, 2), 0.0);
    assert_eq!(surface.grid().row(1), &[0.0, 1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn test_constant_coefficients() {
    let coeffs = PolynomialCoefficients::from_rows(&[[7.25]]);
    let surface = evaluate(&coeffs, 12, 9);
    assert!(surface.values().iter().all(|&v| v == 7.25));
}

#[test]
fn test_matches_naive_evaluation() {
    let coeffs = quadratic();
    let (h, w) = (37, 53);
    let surface = evaluate(&coeffs, h, w);

    let expected: Vec<f64> = (0..h)
        .flat_map(|y| (0..w).map(move |x| (x as f64, y as f64)))
        .map(|(x, y)| evaluate_naive(&coeffs, x, y))
        .collect();

    assert!(max_relative_error(surface.values(), &expected) < 1e-12);
}

#[test]
fn test_matches_evaluate_at() {
    let coeffs = quadratic();
    let surface = evaluate(&coeffs, 20, 30);
    for y in 0..20 {
        for x in 0..30 {
            let direct = coeffs.evaluate_at(x as f64, y as f64);
            assert!((surface.get(x, y) - direct).abs() <= 1e-12 * direct.abs().max(1.0));
        }
    }
}

#[test]
fn test_empty_grid() {
    let coeffs = PolynomialCoefficients::from_rows(&[[1.0]]);
    assert_eq!(evaluate(&coeffs, 0, 10).shape(), (0, 10));
    assert_eq!(evaluate(&coeffs, 10, 0).shape(), (10, 0));
    assert!(evaluate(&coeffs, 0, 0).values().is_empty());
}

#[test]
fn test_finite_for_finite_coefficients() {
    let surface = evaluate(&quadratic(), 500, 500);
    assert!(surface.values().iter().all(|v| v.is_finite()));
}

#[test]
fn test_subtract_from() {
    let image = image_from_fn(4, 3, |x, y| 10.0 + x + 2.0 * y);
    let coeffs = PolynomialCoefficients::from_rows(&[[10.0, 2.0], [1.0, 0.0]]);
    let surface = evaluate(&coeffs, 3, 4);

    let corrected = surface.subtract_from(&image);
    assert_eq!(corrected.shape(), (3, 4));
    assert!(corrected.pixels().iter().all(|&v| v == 0.0));
}

#[test]
#[should_panic(expected = "does not match background shape")]
fn test_subtract_from_shape_mismatch() {
    let surface = evaluate(&PolynomialCoefficients::from_rows(&[[1.0]]), 3, 4);
    let image = constant_image(3, 4, 1.0);
    let _ = surface.subtract_from(&image);
}

#[test]
fn test_constant_image_end_to_end() {
    let image = constant_image(20, 20, 5.0);
    let mut regions = RegionSet::new(2);
    regions.add((0, 0), (5, 5));
    regions.add((10, 10), (15, 15));

    let coeffs = PolynomialSurfaceFitter::new(1, 1, None)
        .unwrap()
        .fit(&regions, &image)
        .unwrap();
    let surface = evaluate(&coeffs, 20, 20);

    assert!(max_relative_error(surface.values(), image.pixels()) < 1e-9);
    let corrected = surface.subtract_from(&image);
    assert!(corrected.pixels().iter().all(|v| v.abs() < 1e-9));
}

#[test]
fn test_bilinear_end_to_end() {
    let (w, h) = (64, 48);
    let image = image_from_fn(w, h, bilinear_sky);
    let mut regions = RegionSet::new(3);
    regions.add((0, 0), (8, 8));
    regions.add((50, 2), (60, 12));
    regions.add((20, 30), (30, 40));

    let coeffs = PolynomialSurfaceFitter::new(1, 1, None)
        .unwrap()
        .fit(&regions, &image)
        .unwrap();
    let surface = evaluate(&coeffs, h, w);

    assert!(max_relative_error(surface.values(), image.pixels()) < 1e-9);
}
