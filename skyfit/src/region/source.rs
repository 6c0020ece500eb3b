//! Producers of raw region corners.

use std::path::{Path, PathBuf};

use super::Corner;
use crate::error::{Error, Result};

/// Supplies region corners in selection order.
///
/// Every call restarts from the first pair, so a source can feed several fits.
pub trait RegionSource {
    fn corner_pairs(&self) -> Result<Vec<(Corner, Corner)>>;
}

impl RegionSource for [(Corner, Corner)] {
    fn corner_pairs(&self) -> Result<Vec<(Corner, Corner)>> {
        Ok(self.to_vec())
    }
}

impl RegionSource for Vec<(Corner, Corner)> {
    fn corner_pairs(&self) -> Result<Vec<(Corner, Corner)>> {
        Ok(self.clone())
    }
}

/// Region list stored as YAML or JSON: a sequence of `[[x1, y1], [x2, y2]]` pairs.
#[derive(Debug, Clone)]
pub struct RegionFile {
    path: PathBuf,
}

impl RegionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `pairs` to `path` in the format implied by its extension.
    pub fn write(path: impl Into<PathBuf>, pairs: &[(Corner, Corner)]) -> Result<Self> {
        let path = path.into();
        let rows: Vec<[Corner; 2]> = pairs.iter().map(|&(a, b)| [a, b]).collect();
        common::serde::write_file(&rows, &path).map_err(|source| Error::Format {
            path: path.clone(),
            source,
        })?;
        Ok(Self { path })
    }
}

impl RegionSource for RegionFile {
    fn corner_pairs(&self) -> Result<Vec<(Corner, Corner)>> {
        if !self.path.exists() {
            return Err(Error::NotFound {
                path: self.path.clone(),
            });
        }
        let rows: Vec<[Corner; 2]> =
            common::serde::read_file(&self.path).map_err(|source| Error::Format {
                path: self.path.clone(),
                source,
            })?;
        tracing::debug!("Read {} region(s) from {:?}", rows.len(), self.path);
        Ok(rows.into_iter().map(|[a, b]| (a, b)).collect())
    }
}
