//! Rectangular background sample regions.
//!
//! A [`Region`] is a half-open rectangle `[x1, x2) × [y1, y2)` in pixel space. Regions
//! are collected into a [`RegionSet`] with a target count; fitting only ever consumes
//! the finished set.

mod selector;
mod source;


use std::fmt;

pub use selector::{RegionSelector, SelectionEvent};
pub use source::{RegionFile, RegionSource};

/// A pixel coordinate `(x, y)`.
pub type Corner = (usize, usize);

/// Axis-aligned rectangle with `x1 <= x2` and `y1 <= y2`.
///
/// The rectangle covers columns `x1..x2` and rows `y1..y2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    pub x1: usize,
    pub y1: usize,
    pub x2: usize,
    pub y2: usize,
}

impl Region {
    /// Builds a region from two corners given in any order.
    pub fn from_corners(a: Corner, b: Corner) -> Self {
        Self {
            x1: a.0,
            y1: a.1,
            x2: b.0,
            y2: b.1,
        }
        .normalized()
    }

    /// Swaps components so that `x1 <= x2` and `y1 <= y2`.
    pub fn normalized(self) -> Self {
        let (x1, x2) = if self.x1 > self.x2 {
            (self.x2, self.x1)
        } else {
            (self.x1, self.x2)
        };
        let (y1, y2) = if self.y1 > self.y2 {
            (self.y2, self.y1)
        } else {
            (self.y1, self.y2)
        };
        Self { x1, y1, x2, y2 }
    }

    #[inline]
    pub fn top_left(&self) -> Corner {
        (self.x1, self.y1)
    }

    #[inline]
    pub fn bottom_right(&self) -> Corner {
        (self.x2, self.y2)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.x2 - self.x1
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.y2 - self.y1
    }

    /// Number of pixels the region contributes to a fit.
    #[inline]
    pub fn area(&self) -> usize {
        self.width() * self.height()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.area() == 0
    }

    /// True when the rectangle lies inside a `width × height` grid.
    pub fn fits_within(&self, width: usize, height: usize) -> bool {
        self.x2 <= width && self.y2 <= height
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[({}, {}), ({}, {})]",
            self.x1, self.y1, self.x2, self.y2
        )
    }
}

/// Ordered collection of regions with a target cardinality.
///
/// Overlapping regions are allowed; pixels covered twice are sampled twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSet {
    regions: Vec<Region>,
    sample: usize,
}

impl RegionSet {
    /// Creates an empty set that is complete once it holds `sample` regions.
    pub fn new(sample: usize) -> Self {
        Self {
            regions: Vec::with_capacity(sample),
            sample,
        }
    }

    /// Creates a complete set from already chosen regions.
    pub fn from_regions(regions: impl IntoIterator<Item = Region>) -> Self {
        let regions: Vec<Region> = regions.into_iter().map(Region::normalized).collect();
        Self {
            sample: regions.len(),
            regions,
        }
    }

    /// Pulls corner pairs from `source` until `sample` regions are collected.
    pub fn from_source<S: RegionSource + ?Sized>(
        source: &S,
        sample: usize,
    ) -> crate::Result<Self> {
        let mut set = Self::new(sample);
        for (a, b) in source.corner_pairs()?.into_iter().take(sample) {
            set.add(a, b);
        }
        if !set.is_complete() {
            tracing::warn!(
                "Region source yielded {} of {} requested regions",
                set.len(),
                sample
            );
        }
        Ok(set)
    }

    /// Normalizes two raw corners into a region, appends it and returns it.
    pub fn add(&mut self, a: Corner, b: Corner) -> Region {
        let region = Region::from_corners(a, b);
        self.push(region);
        region
    }

    /// Appends a region, normalizing it first.
    pub fn push(&mut self, region: Region) {
        if self.is_complete() {
            tracing::warn!(
                "Adding region {} to a set that already holds {} of {} regions",
                region,
                self.regions.len(),
                self.sample
            );
        }
        self.regions.push(region.normalized());
    }

    /// True once exactly `sample` regions have been added.
    pub fn is_complete(&self) -> bool {
        self.regions.len() == self.sample
    }

    /// Regions still expected before the set is complete.
    pub fn remaining(&self) -> usize {
        self.sample.saturating_sub(self.regions.len())
    }

    #[inline]
    pub fn sample(&self) -> usize {
        self.sample
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    #[inline]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Region> {
        self.regions.iter()
    }

    /// Sum of region areas, counting overlaps once per region.
    pub fn total_area(&self) -> usize {
        self.regions.iter().map(Region::area).sum()
    }
}

impl<'a> IntoIterator for &'a RegionSet {
    type Item = &'a Region;
    type IntoIter = std::slice::Iter<'a, Region>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}
