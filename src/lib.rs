//! bilcube - Band-Interleaved-by-Line hyperspectral decoder
//!
//! Decodes headerless BIL files into dense column-major cubes
//! (`rows × cols × bands`), or extracts a single band without reading the
//! rest of the file.
//!
//! ```rust,ignore
//! use bilcube::{DecodeOptions, Layout, read_band, read_cube};
//!
//! let layout = Layout::new(1312, 720, 200)?;
//! let cube = read_cube("scene.raw", &layout, DecodeOptions::default())?;
//! let band = read_band("scene.raw", &layout, 100, DecodeOptions::default())?;
//! ```

pub mod config;
pub mod decoder;
pub mod error;
pub mod export;
pub mod layout;
pub mod line_buffer;
pub mod remap;
pub mod sample;
pub mod synthetic;

pub use config::{ConfigError, DecodeConfig, LogLevel};
pub use decoder::{
    DecodeOptions, decode_band_at, decode_band_into, decode_cube_into, read_band, read_cube,
};
#[cfg(feature = "parallel")]
pub use decoder::read_cube_parallel;
pub use error::{DecodeError, Result};
pub use layout::{BandIndex, Layout};
pub use line_buffer::LineBuffer;
pub use sample::{ByteOrder, SampleFormat};
