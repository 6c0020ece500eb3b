//! File-backed persistence for background surfaces.
//!
//! A model named `name` is stored as two artifacts next to each other:
//! - `<name>.bin`: raw native-endian `f64` values in row-major order, no header
//!   (`height * width * 8` bytes).
//! - `<name>.shape`: the text `(height, width)`.

#[cfg(test)]
mod tests;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::mem::size_of;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::surface::BackgroundSurface;

const BIN_EXTENSION: &str = "bin";
const SHAPE_EXTENSION: &str = "shape";

/// Saves and loads named background models under a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundModelStore {
    dir: PathBuf,
}

impl BackgroundModelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the current working directory.
    pub fn current_dir() -> Self {
        Self::new(".")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn bin_path(&self, name: &str) -> PathBuf {
        artifact_path(&self.dir.join(name), BIN_EXTENSION)
    }

    pub fn shape_path(&self, name: &str) -> PathBuf {
        artifact_path(&self.dir.join(name), SHAPE_EXTENSION)
    }

    /// Whether both artifacts of `name` exist.
    pub fn contains(&self, name: &str) -> bool {
        self.bin_path(name).is_file() && self.shape_path(name).is_file()
    }

    /// Writes `surface` as `<name>.bin` + `<name>.shape`, replacing existing artifacts.
    pub fn save(&self, surface: &BackgroundSurface, name: &str) -> Result<()> {
        save(surface, self.dir.join(name))
    }

    /// # Errors
    /// * [`Error::NotFound`] if either artifact is missing.
    /// * [`Error::CorruptModel`] if the shape text is malformed or the value count
    ///   does not equal `height * width`.
    pub fn load(&self, name: &str) -> Result<BackgroundSurface> {
        load(self.dir.join(name))
    }
}

/// Saves `surface` under the path prefix `base` (`<base>.bin`, `<base>.shape`).
///
/// Both artifacts are written to `.tmp` siblings first and only then renamed over the
/// existing pair, so a failed write leaves a previously saved model untouched.
pub fn save(surface: &BackgroundSurface, base: impl AsRef<Path>) -> Result<()> {
    let base = base.as_ref();
    let bin_path = artifact_path(base, BIN_EXTENSION);
    let shape_path = artifact_path(base, SHAPE_EXTENSION);
    let bin_staged = staged_path(&bin_path);
    let shape_staged = staged_path(&shape_path);

    let (height, width) = surface.shape();
    let staged = write_values(&bin_staged, surface.values()).and_then(|()| {
        fs::write(&shape_staged, format_shape(height, width))
            .map_err(|e| Error::from_io(&shape_staged, e))
    });
    if let Err(e) = staged {
        discard(&[&bin_staged, &shape_staged]);
        return Err(e);
    }

    fs::rename(&bin_staged, &bin_path).map_err(|e| {
        discard(&[&bin_staged, &shape_staged]);
        Error::from_io(&bin_path, e)
    })?;
    fs::rename(&shape_staged, &shape_path).map_err(|e| {
        discard(&[&shape_staged]);
        Error::from_io(&shape_path, e)
    })?;

    tracing::info!(
        "Saved {}x{} background model to {}",
        width,
        height,
        bin_path.display()
    );
    Ok(())
}

/// Loads the surface stored under the path prefix `base`.
pub fn load(base: impl AsRef<Path>) -> Result<BackgroundSurface> {
    let base = base.as_ref();
    let bin_path = artifact_path(base, BIN_EXTENSION);
    let shape_path = artifact_path(base, SHAPE_EXTENSION);

    let shape_text =
        fs::read_to_string(&shape_path).map_err(|e| Error::from_io(&shape_path, e))?;
    let (height, width) = parse_shape(&shape_text).map_err(|reason| Error::CorruptModel {
        path: shape_path.clone(),
        reason,
    })?;

    let bytes = fs::read(&bin_path).map_err(|e| Error::from_io(&bin_path, e))?;
    if bytes.len() % size_of::<f64>() != 0 {
        return Err(Error::CorruptModel {
            path: bin_path,
            reason: format!(
                "{} bytes is not a whole number of {}-byte values",
                bytes.len(),
                size_of::<f64>()
            ),
        });
    }

    // The byte buffer carries no alignment guarantee for f64.
    let values: Vec<f64> = bytemuck::pod_collect_to_vec(&bytes);

    let expected = height.checked_mul(width).ok_or_else(|| Error::CorruptModel {
        path: shape_path.clone(),
        reason: format!("shape ({height}, {width}) overflows"),
    })?;
    if values.len() != expected {
        return Err(Error::CorruptModel {
            path: bin_path,
            reason: format!(
                "expected {expected} values for shape ({height}, {width}), found {}",
                values.len()
            ),
        });
    }

    tracing::info!(
        "Loaded {}x{} background model from {}",
        width,
        height,
        bin_path.display()
    );
    Ok(BackgroundSurface::from_vec(height, width, values))
}

fn write_values(path: &Path, values: &[f64]) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::from_io(path, e))?;
    let mut writer = BufWriter::new(file);

    let bytes: &[u8] = bytemuck::cast_slice(values);
    writer.write_all(bytes).map_err(|e| Error::from_io(path, e))?;
    writer.flush().map_err(|e| Error::from_io(path, e))?;

    Ok(())
}

fn staged_path(path: &Path) -> PathBuf {
    artifact_path(path, "tmp")
}

fn discard(paths: &[&Path]) {
    for path in paths {
        if let Err(e) = fs::remove_file(path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to remove staged file {}: {}", path.display(), e);
            }
        }
    }
}

/// `<base>.<extension>`, appended rather than replacing any dot already in the name.
fn artifact_path(base: &Path, extension: &str) -> PathBuf {
    let mut path = base.as_os_str().to_owned();
    path.push(".");
    path.push(extension);
    PathBuf::from(path)
}

fn format_shape(height: usize, width: usize) -> String {
    format!("({height}, {width})")
}

/// Parses `(height, width)`.
fn parse_shape(text: &str) -> std::result::Result<(usize, usize), String> {
    let text = text.trim();
    let inner = text
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| format!("shape descriptor {text:?} is not parenthesized"))?;

    let dims = inner
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<usize>()
                .map_err(|e| format!("invalid dimension {part:?}: {e}"))
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    match dims.as_slice() {
        [height, width] => Ok((*height, *width)),
        _ => Err(format!(
            "shape descriptor {text:?} has {} dimension(s), expected 2",
            dims.len()
        )),
    }
}
