//! Single-band decoders: read one band's run per line and skip the rest.

use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use ndarray::{Array2, ShapeBuilder};
use web_time::Instant;

use super::{DecodeOptions, check_band_length, check_output, open};
use crate::error::{DecodeError, Result};
use crate::layout::{BandIndex, Layout};
use crate::line_buffer::LineBuffer;
use crate::remap::slice_offset;

/// Decode `band` from `reader` into `out`, a column-major `rows × cols` buffer.
///
/// Uses relative seeks from the stream's current position, which must be the
/// first byte of the cube. The initial seek is issued even when it is zero
/// bytes long. Seeking past the end is left to the stream; a short file
/// surfaces as [`DecodeError::TruncatedFile`] on the next read.
pub fn decode_band_into<R: Read + Seek>(
    reader: &mut R,
    layout: &Layout,
    band: BandIndex,
    out: &mut [f64],
) -> Result<()> {
    check_output(out, layout.band_element_count())?;

    let rows = layout.rows();
    let skip = layout.band_skip_bytes() as i64;
    let mut line = LineBuffer::for_band(layout);

    seek_by(reader, layout.band_lead_bytes(band) as i64)?;

    for row in 0..rows {
        line.fill(reader, row)?;
        for (col, &value) in line.values().iter().enumerate() {
            out[slice_offset(rows, row, col)] = value;
        }
        // Rest of this line plus the bands before ours in the next line.
        seek_by(reader, skip)?;
    }

    Ok(())
}

/// Decode `band` using absolute positioned reads.
///
/// Each line's run is located at `row * line_stride + lead` directly, so no
/// state carries over between rows and the starting stream position is
/// irrelevant.
pub fn decode_band_at<R: Read + Seek>(
    reader: &mut R,
    layout: &Layout,
    band: BandIndex,
    out: &mut [f64],
) -> Result<()> {
    check_output(out, layout.band_element_count())?;

    let rows = layout.rows();
    let mut line = LineBuffer::for_band(layout);

    for row in 0..rows {
        let offset = layout.band_offset(row, band);
        reader
            .seek(SeekFrom::Start(offset))
            .map_err(|e| DecodeError::seek(offset as i64, e))?;
        line.fill(reader, row)?;
        for (col, &value) in line.values().iter().enumerate() {
            out[slice_offset(rows, row, col)] = value;
        }
    }

    Ok(())
}

/// Decode one 1-based band of the BIL file at `path` into a column-major
/// `(rows, cols)` array.
pub fn read_band(
    path: impl AsRef<Path>,
    layout: &Layout,
    requested_band: i64,
    options: DecodeOptions,
) -> Result<Array2<f64>> {
    let path = path.as_ref();
    let band = layout.select_band(requested_band)?;
    let started = Instant::now();
    log::debug!(
        "read_band: {:?} band {}/{} rows={}, cols={}",
        path,
        band.one_based(),
        layout.bands(),
        layout.rows(),
        layout.cols()
    );

    let (mut file, len) = open(path)?;
    if options.eager_size_check {
        check_band_length(layout, band, len)?;
    }

    let mut data = vec![0.0; layout.band_element_count()];
    decode_band_into(&mut file, layout, band, &mut data)?;
    let slice = Array2::from_shape_vec((layout.rows(), layout.cols()).f(), data)?;

    log::info!(
        "Decoded band {} ({}x{}) in {:.1?}",
        band.one_based(),
        layout.rows(),
        layout.cols(),
        started.elapsed()
    );
    Ok(slice)
}

fn seek_by<S: Seek>(stream: &mut S, offset: i64) -> Result<()> {
    stream
        .seek(SeekFrom::Current(offset))
        .map_err(|e| DecodeError::seek(offset, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};

    fn le_bytes(samples: &[u16]) -> Vec<u8> {
        samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }

    /// Stream whose seeks always fail.
    struct NoSeek(Cursor<Vec<u8>>);

    impl Read for NoSeek {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.0.read(buf)
        }
    }

    impl Seek for NoSeek {
        fn seek(&mut self, _pos: SeekFrom) -> io::Result<u64> {
            Err(io::Error::new(io::ErrorKind::Unsupported, "not seekable"))
        }
    }

    #[test]
    fn test_second_band_of_two_line_cube() {
        let layout = Layout::new(2, 2, 2).unwrap();
        let band = layout.select_band(2).unwrap();
        let mut reader = Cursor::new(le_bytes(&[10, 11, 20, 21, 12, 13, 22, 23]));
        let mut out = vec![0.0; 4];
        decode_band_into(&mut reader, &layout, band, &mut out).unwrap();
        // (0,0)=20, (1,0)=22, (0,1)=21, (1,1)=23
        assert_eq!(out, vec![20.0, 22.0, 21.0, 23.0]);
    }

    #[test]
    fn test_first_band_zero_length_seek() {
        let layout = Layout::new(2, 2, 2).unwrap();
        let band = layout.select_band(1).unwrap();
        let mut reader = Cursor::new(le_bytes(&[10, 11, 20, 21, 12, 13, 22, 23]));
        let mut out = vec![0.0; 4];
        decode_band_into(&mut reader, &layout, band, &mut out).unwrap();
        assert_eq!(out, vec![10.0, 12.0, 11.0, 13.0]);
    }

    #[test]
    fn test_relative_and_positioned_agree() {
        let layout = Layout::new(3, 2, 4).unwrap();
        let samples: Vec<u16> = (0..24).collect();
        for requested in 1..=4 {
            let band = layout.select_band(requested).unwrap();
            let mut a = vec![0.0; 6];
            let mut b = vec![0.0; 6];
            decode_band_into(&mut Cursor::new(le_bytes(&samples)), &layout, band, &mut a).unwrap();
            let mut positioned = Cursor::new(le_bytes(&samples));
            positioned.set_position(5);
            decode_band_at(&mut positioned, &layout, band, &mut b).unwrap();
            assert_eq!(a, b, "band {requested}");
        }
    }

    #[test]
    fn test_seek_past_end_is_lazy() {
        // Last band of a one-line file: the trailing skip lands past EOF
        // without error, but a short run is still caught on read.
        let layout = Layout::new(1, 2, 3).unwrap();
        let band = layout.select_band(3).unwrap();
        let mut out = vec![0.0; 2];
        let mut reader = Cursor::new(le_bytes(&[1, 2, 3, 4, 5, 6]));
        decode_band_into(&mut reader, &layout, band, &mut out).unwrap();
        assert_eq!(out, vec![5.0, 6.0]);

        let mut short = Cursor::new(le_bytes(&[1, 2, 3]));
        assert!(matches!(
            decode_band_into(&mut short, &layout, band, &mut out),
            Err(DecodeError::TruncatedFile {
                row: 0,
                expected: 4,
                actual: 0
            })
        ));
    }

    #[test]
    fn test_seek_failure_surfaces() {
        let layout = Layout::new(1, 1, 2).unwrap();
        let band = layout.select_band(1).unwrap();
        let mut reader = NoSeek(Cursor::new(le_bytes(&[1, 2])));
        let mut out = vec![0.0; 1];
        assert!(matches!(
            decode_band_into(&mut reader, &layout, band, &mut out),
            Err(DecodeError::SeekFailed { offset: 0, .. })
        ));
    }
}
