use common::Buffer2;

use crate::error::{Error, Result};
use crate::region::RegionSet;

/// Flattened `(x, y, z)` samples gathered from every region of a [`RegionSet`].
///
/// Samples are concatenated in region order; inside a region they run row by row.
/// Overlapping regions contribute their shared pixels once per region.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<f64>,
}

impl PointCloud {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            x: Vec::with_capacity(capacity),
            y: Vec::with_capacity(capacity),
            z: Vec::with_capacity(capacity),
        }
    }

    /// Reads the pixels of every region from `image`.
    ///
    /// # Errors
    /// * [`Error::RegionOutOfBounds`] if a non-empty region extends past the image.
    /// * [`Error::NonFiniteSample`] if a sampled pixel is NaN or infinite.
    pub fn from_regions(regions: &RegionSet, image: &Buffer2<f64>) -> Result<Self> {
        let mut cloud = Self::with_capacity(regions.total_area());

        for region in regions {
            if region.is_empty() {
                continue;
            }
            if !region.fits_within(image.width(), image.height()) {
                return Err(Error::RegionOutOfBounds {
                    region: *region,
                    width: image.width(),
                    height: image.height(),
                });
            }

            for y in region.y1..region.y2 {
                let row = &image.row(y)[region.x1..region.x2];
                for (x, &value) in (region.x1..region.x2).zip(row) {
                    if !value.is_finite() {
                        return Err(Error::NonFiniteSample { x, y, value });
                    }
                    cloud.push(x as f64, y as f64, value);
                }
            }
        }

        Ok(cloud)
    }

    #[inline]
    pub fn push(&mut self, x: f64, y: f64, z: f64) {
        self.x.push(x);
        self.y.push(y);
        self.z.push(z);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.z.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.z.is_empty()
    }

    #[inline]
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    #[inline]
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    #[inline]
    pub fn z(&self) -> &[f64] {
        &self.z
    }
}
