//! Layout descriptor: dimension validation and stride arithmetic.
//!
//! A [`Layout`] is derived once per decode call and never touches the file.
//! All byte quantities are computed in checked 64-bit arithmetic; a cube whose
//! element count or byte size cannot be addressed is rejected up front with
//! [`DecodeError::InvalidDimension`], so the decoders never overflow.

use crate::error::{DecodeError, Result};
use crate::sample::{ByteOrder, SampleFormat};

/// Validated extents and encoding of a BIL file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    rows: usize,
    cols: usize,
    bands: usize,
    format: SampleFormat,
    order: ByteOrder,
}

/// A requested band that has been checked against a [`Layout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BandIndex(usize);

impl BandIndex {
    /// 0-based band index.
    pub fn zero_based(self) -> usize {
        self.0
    }

    /// 1-based band number, as the caller supplied it.
    pub fn one_based(self) -> usize {
        self.0 + 1
    }
}

impl Layout {
    /// Validate `rows`, `cols` and `bands` for unsigned 16-bit little-endian samples.
    ///
    /// Extents are taken as signed integers so that negative host values reach
    /// validation instead of wrapping.
    pub fn new(rows: i64, cols: i64, bands: i64) -> Result<Self> {
        Self::with_format(rows, cols, bands, SampleFormat::default(), ByteOrder::default())
    }

    /// Validate extents for an explicit sample encoding.
    pub fn with_format(
        rows: i64,
        cols: i64,
        bands: i64,
        format: SampleFormat,
        order: ByteOrder,
    ) -> Result<Self> {
        let rows = positive("rows", rows)?;
        let cols = positive("cols", cols)?;
        let bands = positive("bands", bands)?;

        let layout = Self {
            rows,
            cols,
            bands,
            format,
            order,
        };
        layout.check_addressable()?;
        Ok(layout)
    }

    /// Element count and total byte size must fit `usize` and a signed seek offset.
    fn check_addressable(&self) -> Result<()> {
        let too_large = || {
            let product = (self.rows as i128)
                .checked_mul(self.cols as i128)
                .and_then(|v| v.checked_mul(self.bands as i128))
                .unwrap_or(i128::MAX);
            DecodeError::invalid_dimension("elements", product, "cube too large to address")
        };

        let elements = self
            .rows
            .checked_mul(self.cols)
            .and_then(|v| v.checked_mul(self.bands))
            .ok_or_else(too_large)?;
        let bytes = (elements as u64)
            .checked_mul(self.format.width() as u64)
            .ok_or_else(too_large)?;
        if i64::try_from(bytes).is_err() {
            return Err(too_large());
        }
        Ok(())
    }

    /// Number of lines (rows) in the file.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of samples per band within one line.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of spectral bands.
    pub fn bands(&self) -> usize {
        self.bands
    }

    /// Stored sample type.
    pub fn sample_format(&self) -> SampleFormat {
        self.format
    }

    /// Stored byte order.
    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }

    /// Bytes per stored sample.
    pub fn sample_width(&self) -> usize {
        self.format.width()
    }

    /// Elements in the full cube.
    pub fn element_count(&self) -> usize {
        self.rows * self.cols * self.bands
    }

    /// Elements in one band slice (`rows * cols`).
    pub fn band_element_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Samples in one interleaved line (`cols * bands`).
    pub fn line_samples(&self) -> usize {
        self.cols * self.bands
    }

    /// Bytes of one band's run within a line (`cols * sample_width`).
    pub fn band_run_bytes(&self) -> u64 {
        (self.cols * self.sample_width()) as u64
    }

    /// Bytes per line: `cols * bands * sample_width`.
    pub fn line_stride_bytes(&self) -> u64 {
        (self.line_samples() * self.sample_width()) as u64
    }

    /// Bytes between the end of one line's wanted band and the start of the
    /// next line's wanted band: `(bands - 1) * cols * sample_width`.
    pub fn band_skip_bytes(&self) -> u64 {
        (self.bands as u64 - 1) * self.band_run_bytes()
    }

    /// Bytes preceding `band` within a line.
    pub fn band_lead_bytes(&self, band: BandIndex) -> u64 {
        band.zero_based() as u64 * self.band_run_bytes()
    }

    /// Absolute offset of `band`'s run in line `row`.
    pub fn band_offset(&self, row: usize, band: BandIndex) -> u64 {
        row as u64 * self.line_stride_bytes() + self.band_lead_bytes(band)
    }

    /// Bytes the full-cube decoder consumes.
    pub fn required_bytes(&self) -> u64 {
        self.rows as u64 * self.line_stride_bytes()
    }

    /// Bytes that must exist for `band` to be decodable: up to the end of
    /// its run in the last line.
    pub fn required_bytes_for_band(&self, band: BandIndex) -> u64 {
        self.band_offset(self.rows - 1, band) + self.band_run_bytes()
    }

    /// Check a 1-based band number against this layout.
    pub fn select_band(&self, requested: i64) -> Result<BandIndex> {
        if requested < 1 || requested as u64 > self.bands as u64 {
            return Err(DecodeError::BandOutOfRange {
                requested,
                bands: self.bands as u64,
            });
        }
        Ok(BandIndex(requested as usize - 1))
    }
}

fn positive(name: &'static str, value: i64) -> Result<usize> {
    if value < 1 {
        return Err(DecodeError::invalid_dimension(
            name,
            value,
            "must be a positive integer",
        ));
    }
    usize::try_from(value)
        .map_err(|_| DecodeError::invalid_dimension(name, value, "exceeds platform address width"))
}
