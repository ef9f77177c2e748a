//! Reusable one-line read buffer.

use std::io::{ErrorKind, Read};

use crate::error::{DecodeError, Result};
use crate::layout::Layout;
use crate::sample::{ByteOrder, SampleFormat};

/// One line (or one band run of a line) of a BIL file, raw and widened.
///
/// Both vectors are allocated once on the heap before the row loop and
/// refilled in place for every row, so their size never depends on stack
/// limits. [`fill`](Self::fill) widens the whole line in one pass.
pub struct LineBuffer {
    bytes: Vec<u8>,
    values: Vec<f64>,
    format: SampleFormat,
    order: ByteOrder,
}

impl LineBuffer {
    /// Buffer holding `samples` samples of the given encoding.
    pub fn new(samples: usize, format: SampleFormat, order: ByteOrder) -> Self {
        Self {
            bytes: vec![0; samples * format.width()],
            values: vec![0.0; samples],
            format,
            order,
        }
    }

    /// Buffer for a full interleaved line: `cols * bands` samples.
    pub fn for_line(layout: &Layout) -> Self {
        Self::new(layout.line_samples(), layout.sample_format(), layout.byte_order())
    }

    /// Buffer for one band's run within a line: `cols` samples.
    pub fn for_band(layout: &Layout) -> Self {
        Self::new(layout.cols(), layout.sample_format(), layout.byte_order())
    }

    /// Number of samples the buffer holds.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw bytes as last read.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Fill the whole buffer from `reader` in one bulk read, then widen it.
    ///
    /// A stream that ends first yields [`DecodeError::TruncatedFile`] for `row`
    /// and leaves the widened values of the previous row untouched.
    pub fn fill<R: Read>(&mut self, reader: &mut R, row: usize) -> Result<()> {
        let mut filled = 0;
        while filled < self.bytes.len() {
            match reader.read(&mut self.bytes[filled..]) {
                Ok(0) => {
                    return Err(DecodeError::TruncatedFile {
                        row: row as u64,
                        expected: self.bytes.len() as u64,
                        actual: filled as u64,
                    });
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        self.format.widen_into(&self.bytes, self.order, &mut self.values);
        Ok(())
    }

    /// Sample `index` of the last filled row, widened to `f64`.
    #[inline]
    pub fn sample(&self, index: usize) -> f64 {
        self.values[index]
    }

    /// All samples of the last filled row in buffer order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}
