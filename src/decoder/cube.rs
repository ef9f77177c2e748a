//! Full-cube decoder: one sequential pass over the whole file.

use std::io::Read;
use std::path::Path;

use ndarray::{Array3, ShapeBuilder};
use web_time::Instant;

use super::{DecodeOptions, check_cube_length, check_output, open};
use crate::error::Result;
use crate::layout::Layout;
use crate::line_buffer::LineBuffer;
use crate::remap::{cube_offset, line_offset};

/// Decode every line of `reader` into `out`, a column-major
/// `rows × cols × bands` buffer.
///
/// `reader` must be positioned at the first byte of the cube. Bytes past the
/// last line are never read.
pub fn decode_cube_into<R: Read>(reader: &mut R, layout: &Layout, out: &mut [f64]) -> Result<()> {
    check_output(out, layout.element_count())?;

    let (rows, cols, bands) = (layout.rows(), layout.cols(), layout.bands());
    let mut line = LineBuffer::for_line(layout);

    for row in 0..rows {
        line.fill(reader, row)?;
        let values = line.values();

        // Write each sample straight to its cube position; no transpose pass.
        for band in 0..bands {
            for col in 0..cols {
                out[cube_offset(rows, cols, row, col, band)] = values[line_offset(cols, band, col)];
            }
        }
    }

    Ok(())
}

/// Decode the BIL file at `path` into a column-major `(rows, cols, bands)` array.
pub fn read_cube(
    path: impl AsRef<Path>,
    layout: &Layout,
    options: DecodeOptions,
) -> Result<Array3<f64>> {
    let path = path.as_ref();
    let started = Instant::now();
    log::debug!(
        "read_cube: {:?} rows={}, cols={}, bands={}, format={}",
        path,
        layout.rows(),
        layout.cols(),
        layout.bands(),
        layout.sample_format().name()
    );

    let (mut file, len) = open(path)?;
    if options.eager_size_check {
        check_cube_length(layout, len)?;
    }

    let mut data = vec![0.0; layout.element_count()];
    decode_cube_into(&mut file, layout, &mut data)?;
    let cube = Array3::from_shape_vec((layout.rows(), layout.cols(), layout.bands()).f(), data)?;

    log::info!(
        "Decoded {}x{}x{} cube in {:.1?}",
        layout.rows(),
        layout.cols(),
        layout.bands(),
        started.elapsed()
    );
    Ok(cube)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;
    use crate::sample::{ByteOrder, SampleFormat};
    use std::io::Cursor;

    fn le_bytes(samples: &[u16]) -> Vec<u8> {
        samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }

    #[test]
    fn test_two_line_cube() {
        let layout = Layout::new(2, 2, 2).unwrap();
        let mut reader = Cursor::new(le_bytes(&[10, 11, 20, 21, 12, 13, 22, 23]));
        let mut out = vec![0.0; 8];
        decode_cube_into(&mut reader, &layout, &mut out).unwrap();

        // Row 0 holds band 0 = [10, 11], band 1 = [20, 21].
        assert_eq!(out, vec![10.0, 12.0, 11.0, 13.0, 20.0, 22.0, 21.0, 23.0]);
    }

    #[test]
    fn test_single_column_single_band() {
        let layout = Layout::new(3, 1, 1).unwrap();
        let mut reader = Cursor::new(le_bytes(&[7, 8, 9]));
        let mut out = vec![0.0; 3];
        decode_cube_into(&mut reader, &layout, &mut out).unwrap();
        assert_eq!(out, vec![7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_excess_bytes_are_not_read() {
        let layout = Layout::new(1, 2, 1).unwrap();
        let mut reader = Cursor::new(le_bytes(&[1, 2, 3, 4]));
        let mut out = vec![0.0; 2];
        decode_cube_into(&mut reader, &layout, &mut out).unwrap();
        assert_eq!(out, vec![1.0, 2.0]);
        assert_eq!(reader.position(), 4);
    }

    #[test]
    fn test_truncation_reported_on_short_row() {
        let layout = Layout::new(3, 2, 2).unwrap();
        // Two complete lines plus half of the third.
        let mut reader = Cursor::new(le_bytes(&[0; 10]));
        let mut out = vec![0.0; 12];
        assert!(matches!(
            decode_cube_into(&mut reader, &layout, &mut out),
            Err(DecodeError::TruncatedFile {
                row: 2,
                expected: 8,
                actual: 4
            })
        ));
    }

    #[test]
    fn test_wrong_output_size_rejected_before_io() {
        let layout = Layout::new(2, 2, 2).unwrap();
        let mut reader = Cursor::new(Vec::new());
        let mut out = vec![0.0; 7];
        assert!(matches!(
            decode_cube_into(&mut reader, &layout, &mut out),
            Err(DecodeError::OutputSize { .. })
        ));
    }

    #[test]
    fn test_big_endian_i16() {
        let layout = Layout::with_format(1, 2, 1, SampleFormat::I16, ByteOrder::Big).unwrap();
        let mut reader = Cursor::new(vec![0xFF, 0xFE, 0x01, 0x00]);
        let mut out = vec![0.0; 2];
        decode_cube_into(&mut reader, &layout, &mut out).unwrap();
        assert_eq!(out, vec![-2.0, 256.0]);
    }
}
