//! Sky-background run configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fitting::PolynomialSurfaceFitter;
use crate::photometry::PhotometryConfig;

/// Model name used when none is given.
pub const DEFAULT_MODEL_NAME: &str = "skyBack";

/// Parameters of one fit-evaluate-subtract run.
///
/// Degrees are signed so that out-of-range values read from a file survive parsing and
/// are reported as [`Error::InvalidDegree`] by [`Config::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of background regions to collect.
    pub sample: usize,
    /// Maximum power of `x` (columns).
    pub kx: i64,
    /// Maximum power of `y` (rows).
    pub ky: i64,
    /// Optional cap on the total degree `i + j`.
    pub order: Option<i64>,
    /// When set, the evaluated background is saved under this name and read back before
    /// subtraction.
    pub model_name: Option<String>,
    /// Directory holding saved models.
    pub model_dir: PathBuf,
    pub photometry: PhotometryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample: 10,
            kx: 1,
            ky: 1,
            order: None,
            model_name: Some(DEFAULT_MODEL_NAME.to_string()),
            model_dir: PathBuf::from("."),
            photometry: PhotometryConfig::default(),
        }
    }
}

impl Config {
    pub fn with_sample(mut self, sample: usize) -> Self {
        self.sample = sample;
        self
    }

    pub fn with_degrees(mut self, kx: i64, ky: i64) -> Self {
        self.kx = kx;
        self.ky = ky;
        self
    }

    pub fn with_order(mut self, order: Option<i64>) -> Self {
        self.order = order;
        self
    }

    pub fn with_model_name(mut self, name: impl Into<String>) -> Self {
        self.model_name = Some(name.into());
        self
    }

    /// Skip the save/reload step.
    pub fn without_model(mut self) -> Self {
        self.model_name = None;
        self
    }

    pub fn with_model_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.model_dir = dir.into();
        self
    }

    pub fn with_photometry(mut self, photometry: PhotometryConfig) -> Self {
        self.photometry = photometry;
        self
    }

    /// # Errors
    /// [`Error::InvalidDegree`] if `kx`, `ky` or `order` is negative.
    pub fn validate(&self) -> Result<()> {
        PolynomialSurfaceFitter::from_config(self).map(|_| ())
    }

    /// Reads a YAML (`.yaml`/`.yml`) or JSON (`.json`) config; missing keys take defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::NotFound {
                path: path.to_path_buf(),
            });
        }

        let config: Config = common::serde::read_file(path).map_err(|source| Error::Format {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        tracing::debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        common::serde::write_file(self, path).map_err(|source| Error::Format {
            path: path.to_path_buf(),
            source,
        })
    }
}
