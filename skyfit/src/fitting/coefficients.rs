use std::ops::Index;

/// Dense `(kx + 1) × (ky + 1)` coefficient matrix of
/// `z(x, y) = Σ c[i][j] · x^i · y^j`.
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialCoefficients {
    kx: usize,
    ky: usize,
    /// Row-major by `i`: `c[i][j]` is at `i * (ky + 1) + j`.
    values: Vec<f64>,
}

impl PolynomialCoefficients {
    pub fn new(kx: usize, ky: usize, values: Vec<f64>) -> Self {
        assert_eq!(
            values.len(),
            (kx + 1) * (ky + 1),
            "coefficient count must equal (kx + 1) * (ky + 1)"
        );
        Self { kx, ky, values }
    }

    pub fn zeros(kx: usize, ky: usize) -> Self {
        Self::new(kx, ky, vec![0.0; (kx + 1) * (ky + 1)])
    }

    /// Builds a matrix from nested rows, `rows[i][j] = c[i][j]`.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Self {
        assert!(!rows.is_empty(), "coefficient matrix needs at least one row");
        let cols = rows[0].as_ref().len();
        assert!(cols > 0, "coefficient matrix needs at least one column");

        let mut values = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            let row = row.as_ref();
            assert_eq!(row.len(), cols, "coefficient rows must have equal length");
            values.extend_from_slice(row);
        }
        Self::new(rows.len() - 1, cols - 1, values)
    }

    #[inline]
    pub fn kx(&self) -> usize {
        self.kx
    }

    #[inline]
    pub fn ky(&self) -> usize {
        self.ky
    }

    /// `(kx + 1, ky + 1)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.kx + 1, self.ky + 1)
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * (self.ky + 1) + j]
    }

    /// Coefficients of `x^i`, i.e. `c[i][0..=ky]`.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        let start = i * (self.ky + 1);
        &self.values[start..start + self.ky + 1]
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|c| c.is_finite())
    }

    /// Value of the polynomial at `(x, y)`, Horner in `y` per row then in `x`.
    pub fn evaluate_at(&self, x: f64, y: f64) -> f64 {
        let mut acc = 0.0;
        for i in (0..=self.kx).rev() {
            acc = acc * x + horner(self.row(i), y);
        }
        acc
    }
}

impl Index<(usize, usize)> for PolynomialCoefficients {
    type Output = f64;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        &self.values[i * (self.ky + 1) + j]
    }
}

/// `Σ coeffs[k] · t^k`.
#[inline]
pub(crate) fn horner(coeffs: &[f64], t: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * t + c)
}
