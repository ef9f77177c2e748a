//! Linear index remapping between BIL lines and column-major arrays.
//!
//! These are the only addressing functions the decoders use. Callers pass
//! in-range indices for extents already validated by a [`Layout`](crate::Layout),
//! which guarantees the results fit `usize`.

/// Offset of `(band, col)` within one interleaved line.
#[inline]
pub const fn line_offset(cols: usize, band: usize, col: usize) -> usize {
    band * cols + col
}

/// Column-major offset of `(row, col, band)` in a `rows × cols × bands` cube.
#[inline]
pub const fn cube_offset(rows: usize, cols: usize, row: usize, col: usize, band: usize) -> usize {
    row + rows * (col + cols * band)
}

/// Column-major offset of `(row, col)` in a `rows × cols` slice.
#[inline]
pub const fn slice_offset(rows: usize, row: usize, col: usize) -> usize {
    row + rows * col
}
