//! Synthetic BIL data generation.
//!
//! Every sample stores its own position in the file, which makes any
//! misplaced element in a decoded cube easy to spot.

use crate::layout::Layout;

/// Value stored at `(row, col, band)`: the sample's ordinal position in the
/// file, wrapped to 16 bits.
pub fn expected_value(layout: &Layout, row: usize, col: usize, band: usize) -> u16 {
    let ordinal = row as u64 * layout.line_samples() as u64
        + band as u64 * layout.cols() as u64
        + col as u64;
    (ordinal % 65536) as u16
}

/// Generate a complete BIL file for `layout` in its sample format and byte order.
pub fn generate_bil(layout: &Layout) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(layout.required_bytes() as usize);
    for row in 0..layout.rows() {
        for band in 0..layout.bands() {
            for col in 0..layout.cols() {
                let value = expected_value(layout, row, col, band);
                layout
                    .sample_format()
                    .encode(u64::from(value), layout.byte_order(), &mut bytes);
            }
        }
    }
    log::trace!(
        "generate_bil: {}x{}x{} -> {} bytes",
        layout.rows(),
        layout.cols(),
        layout.bands(),
        bytes.len()
    );
    bytes
}
