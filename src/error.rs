//! Error types for BIL decode operations.

use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Errors that can occur while decoding a BIL stream.
///
/// Every variant is fatal to the decode call that produced it. The output
/// buffer is left in an unspecified, possibly partially written state.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// A cube extent is not a positive integer, or the cube is too large to address
    #[error("Invalid dimension: {name} = {value} ({reason})")]
    InvalidDimension {
        /// Which extent was rejected (`rows`, `cols`, `bands` or `elements`)
        name: &'static str,
        /// The offending value as supplied by the caller
        value: i128,
        /// Why the value was rejected
        reason: &'static str,
    },

    /// Requested band lies outside `[1, bands]`
    #[error("Band {requested} out of range: file has bands 1..={bands}")]
    BandOutOfRange {
        /// The 1-based band the caller asked for
        requested: i64,
        /// Number of bands declared for the file
        bands: u64,
    },

    /// Input file does not exist
    #[error("File not found: {path:?}")]
    FileNotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// Input file exists but could not be opened for reading
    #[error("Failed to open {path:?}: {source}")]
    FileOpenFailed {
        /// Path that failed to open
        path: PathBuf,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// Stream ended before the declared dimensions were satisfied
    #[error("Truncated file at row {row}: expected {expected} bytes, got {actual}")]
    TruncatedFile {
        /// Row (0-based) being read when the shortfall was found
        row: u64,
        /// Bytes that were required
        expected: u64,
        /// Bytes actually available
        actual: u64,
    },

    /// A positioned seek could not be satisfied
    #[error("Seek by {offset} bytes failed: {source}")]
    SeekFailed {
        /// Offset of the failed seek (relative or absolute depending on the call)
        offset: i64,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Caller-supplied output storage has the wrong number of elements
    #[error("Output buffer holds {actual} elements, layout requires {expected}")]
    OutputSize {
        /// Elements required by the layout
        expected: usize,
        /// Elements in the supplied buffer
        actual: usize,
    },

    /// I/O error other than a short read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ndarray rejected the decoded buffer's shape
    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// Decoded array could not be written as `.npy`
    #[error("NPY write error: {0}")]
    Npy(#[from] ndarray_npy::WriteNpyError),

    /// Configuration file could not be read or understood
    #[error("Config error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl DecodeError {
    /// Create an invalid dimension error.
    pub fn invalid_dimension(
        name: &'static str,
        value: impl Into<i128>,
        reason: &'static str,
    ) -> Self {
        Self::InvalidDimension {
            name,
            value: value.into(),
            reason,
        }
    }

    /// Classify an error from opening `path`.
    pub(crate) fn open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound { path }
        } else {
            Self::FileOpenFailed { path, source }
        }
    }

    /// Create a seek error.
    pub(crate) fn seek(offset: i64, source: std::io::Error) -> Self {
        Self::SeekFailed { offset, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_open_not_found_is_classified() {
        let err = DecodeError::open("missing.raw", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, DecodeError::FileNotFound { .. }));
    }

    #[test]
    fn test_open_permission_denied_is_open_failed() {
        let err = DecodeError::open(
            "locked.raw",
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, DecodeError::FileOpenFailed { .. }));
    }

    #[test]
    fn test_display_messages() {
        let err = DecodeError::BandOutOfRange {
            requested: 0,
            bands: 4,
        };
        assert_eq!(err.to_string(), "Band 0 out of range: file has bands 1..=4");

        let err = DecodeError::TruncatedFile {
            row: 3,
            expected: 16,
            actual: 6,
        };
        assert_eq!(
            err.to_string(),
            "Truncated file at row 3: expected 16 bytes, got 6"
        );
    }
}
