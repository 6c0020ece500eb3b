//! Error types for sky-background fitting and model persistence.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::region::Region;

/// Errors that can occur while fitting, evaluating or persisting a background model.
#[derive(Debug, Error)]
pub enum Error {
    #[error("No background samples: {regions} region(s) cover zero pixels")]
    InsufficientData { regions: usize },

    #[error("Invalid polynomial degree: kx={kx}, ky={ky}, order={order:?}")]
    InvalidDegree {
        kx: i64,
        ky: i64,
        order: Option<i64>,
    },

    #[error("Region {region} lies outside the {width}x{height} image")]
    RegionOutOfBounds {
        region: Region,
        width: usize,
        height: usize,
    },

    #[error("Sample pixel ({x}, {y}) is not finite: {value}")]
    NonFiniteSample { x: usize, y: usize, value: f64 },

    #[error("Least-squares solve failed: SVD of the {rows}x{cols} design matrix did not converge")]
    SvdNotConverged { rows: usize, cols: usize },

    #[error("Background model artifact '{path}' not found")]
    NotFound { path: PathBuf },

    #[error("Corrupt background model '{path}': {reason}")]
    CorruptModel { path: PathBuf, reason: String },

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse '{path}': {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Maps an I/O failure on `path`, turning `NotFound` into [`Error::NotFound`].
    pub(crate) fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            Error::NotFound { path }
        } else {
            Error::Io { path, source }
        }
    }
}
