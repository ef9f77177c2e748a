//! BIL decoders.
//!
//! This module provides:
//! - [`decode_cube_into`]: sequential full-cube decode into caller storage
//! - [`decode_band_into`]: single-band decode using relative skip-seeks
//! - [`decode_band_at`]: single-band decode using absolute positioned reads
//! - [`read_cube`] / [`read_band`]: file wrappers returning column-major ndarrays
//! - `read_cube_parallel` (feature `parallel`): band-parallel full-cube decode
//!
//! Decoders own nothing beyond the call: the line buffer is dropped and the
//! file closed on every exit path, including errors.

mod band;
mod cube;
#[cfg(feature = "parallel")]
mod parallel;

pub use band::{decode_band_at, decode_band_into, read_band};
pub use cube::{decode_cube_into, read_cube};
#[cfg(feature = "parallel")]
pub use parallel::read_cube_parallel;

use std::fs::File;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, Result};
use crate::layout::{BandIndex, Layout};

/// Behavior switches shared by the file-level decoders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeOptions {
    /// Compare the file length against the layout before reading any sample.
    ///
    /// When disabled, a short file is only detected by the read that runs out
    /// of data, and seeking past the end is not itself an error.
    pub eager_size_check: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            eager_size_check: true,
        }
    }
}

impl DecodeOptions {
    /// Options with the up-front length check disabled.
    pub fn lazy() -> Self {
        Self {
            eager_size_check: false,
        }
    }
}

/// Open `path` for reading and report its length.
///
/// Only regular files qualify: a directory or device has no meaningful
/// length to check the layout against, so it fails as
/// [`DecodeError::FileOpenFailed`] before any read.
pub(crate) fn open(path: &Path) -> Result<(File, u64)> {
    let file = File::open(path).map_err(|e| DecodeError::open(path, e))?;
    let metadata = file.metadata().map_err(|e| DecodeError::open(path, e))?;
    if !metadata.is_file() {
        return Err(DecodeError::open(
            path,
            io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
        ));
    }
    let len = metadata.len();
    log::trace!("Opened {:?} ({} bytes)", path, len);
    Ok((file, len))
}

/// Fail when a file of `len` bytes cannot hold the full cube.
pub(crate) fn check_cube_length(layout: &Layout, len: u64) -> Result<()> {
    let required = layout.required_bytes();
    if len < required {
        return Err(DecodeError::TruncatedFile {
            row: len / layout.line_stride_bytes(),
            expected: required,
            actual: len,
        });
    }
    warn_excess(len, required);
    Ok(())
}

/// Fail when a file of `len` bytes ends before `band`'s run in the last line.
pub(crate) fn check_band_length(layout: &Layout, band: BandIndex, len: u64) -> Result<()> {
    let required = layout.required_bytes_for_band(band);
    if len < required {
        let first_run_end = layout.band_lead_bytes(band) + layout.band_run_bytes();
        let complete_rows = if len >= first_run_end {
            (len - first_run_end) / layout.line_stride_bytes() + 1
        } else {
            0
        };
        return Err(DecodeError::TruncatedFile {
            row: complete_rows,
            expected: required,
            actual: len,
        });
    }
    warn_excess(len, layout.required_bytes());
    Ok(())
}

fn warn_excess(len: u64, cube_bytes: u64) {
    if len > cube_bytes {
        log::warn!(
            "File holds {} bytes beyond the declared cube; trailing data is ignored",
            len - cube_bytes
        );
    }
}

/// Reject caller storage of the wrong size before any I/O.
pub(crate) fn check_output(out: &[f64], expected: usize) -> Result<()> {
    if out.len() != expected {
        return Err(DecodeError::OutputSize {
            expected,
            actual: out.len(),
        });
    }
    Ok(())
}
