//! Band-parallel full-cube decoding.
//!
//! In column-major order every band is one contiguous `rows * cols` block of
//! the output, so bands can be handed to separate workers without sharing any
//! mutable state. Each worker opens its own file handle and uses positioned
//! reads, leaving no shared stream cursor.

use std::fs::File;
use std::path::Path;

use ndarray::{Array3, ShapeBuilder};
use rayon::prelude::*;
use web_time::Instant;

use super::{DecodeOptions, check_cube_length, decode_band_at, open};
use crate::error::{DecodeError, Result};
use crate::layout::Layout;

/// Decode the BIL file at `path` into a column-major `(rows, cols, bands)`
/// array, one band per rayon task.
///
/// Produces the same result as [`read_cube`](super::read_cube). The read
/// pattern is strided rather than sequential, which pays off on storage that
/// serves concurrent random reads well.
pub fn read_cube_parallel(
    path: impl AsRef<Path>,
    layout: &Layout,
    options: DecodeOptions,
) -> Result<Array3<f64>> {
    let path = path.as_ref();
    let started = Instant::now();
    log::debug!(
        "read_cube_parallel: {:?} rows={}, cols={}, bands={}",
        path,
        layout.rows(),
        layout.cols(),
        layout.bands()
    );

    // Open once up front so a missing file is reported before spawning work.
    let (_, len) = open(path)?;
    if options.eager_size_check {
        check_cube_length(layout, len)?;
    }

    let mut data = vec![0.0; layout.element_count()];
    data.par_chunks_mut(layout.band_element_count())
        .enumerate()
        .try_for_each(|(index, slice)| -> Result<()> {
            let band = layout.select_band(index as i64 + 1)?;
            let mut file = File::open(path).map_err(|e| DecodeError::open(path, e))?;
            decode_band_at(&mut file, layout, band, slice)
        })?;

    let cube = Array3::from_shape_vec((layout.rows(), layout.cols(), layout.bands()).f(), data)?;
    log::info!(
        "Decoded {}x{}x{} cube across {} threads in {:.1?}",
        layout.rows(),
        layout.cols(),
        layout.bands(),
        rayon::current_num_threads(),
        started.elapsed()
    );
    Ok(cube)
}
