//! Sample encodings and widening to `f64`.
//!
//! A BIL file carries no type information of its own, so the sample width and
//! byte order travel with the [`Layout`](crate::Layout). Widening is a plain
//! numeric conversion: no rescaling or normalization is applied.

use byteorder::{BigEndian, ByteOrder as Endian, LittleEndian};
use serde::{Deserialize, Serialize};

/// Numeric type of one stored sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SampleFormat {
    /// Unsigned 8-bit
    U8,
    /// Unsigned 16-bit (the common hyperspectral camera format)
    #[default]
    U16,
    /// Signed 16-bit
    I16,
    /// Unsigned 32-bit
    U32,
    /// Signed 32-bit
    I32,
    /// IEEE 754 single precision
    F32,
    /// IEEE 754 double precision
    F64,
}

impl SampleFormat {
    /// Size of one sample in bytes.
    pub const fn width(self) -> usize {
        match self {
            SampleFormat::U8 => 1,
            SampleFormat::U16 | SampleFormat::I16 => 2,
            SampleFormat::U32 | SampleFormat::I32 | SampleFormat::F32 => 4,
            SampleFormat::F64 => 8,
        }
    }

    /// Lowercase name, matching the serialized form.
    pub fn name(self) -> &'static str {
        match self {
            SampleFormat::U8 => "u8",
            SampleFormat::U16 => "u16",
            SampleFormat::I16 => "i16",
            SampleFormat::U32 => "u32",
            SampleFormat::I32 => "i32",
            SampleFormat::F32 => "f32",
            SampleFormat::F64 => "f64",
        }
    }

    /// All supported formats.
    pub fn all() -> &'static [SampleFormat] {
        &[
            SampleFormat::U8,
            SampleFormat::U16,
            SampleFormat::I16,
            SampleFormat::U32,
            SampleFormat::I32,
            SampleFormat::F32,
            SampleFormat::F64,
        ]
    }

    /// Widen one sample to `f64`.
    ///
    /// `bytes` must be exactly [`width`](Self::width) bytes long.
    pub fn widen(self, bytes: &[u8], order: ByteOrder) -> f64 {
        let mut value = [0.0];
        self.widen_into(bytes, order, &mut value);
        value[0]
    }

    /// Widen a run of packed samples into `out`, one element per sample.
    ///
    /// The format and byte order are resolved once for the whole run.
    /// Converts `min(out.len(), bytes.len() / width)` samples.
    pub fn widen_into(self, bytes: &[u8], order: ByteOrder, out: &mut [f64]) {
        match order {
            ByteOrder::Little => self.widen_run::<LittleEndian>(bytes, out),
            ByteOrder::Big => self.widen_run::<BigEndian>(bytes, out),
        }
    }

    fn widen_run<E: Endian>(self, bytes: &[u8], out: &mut [f64]) {
        fn convert(bytes: &[u8], out: &mut [f64], width: usize, read: impl Fn(&[u8]) -> f64) {
            for (dst, raw) in out.iter_mut().zip(bytes.chunks_exact(width)) {
                *dst = read(raw);
            }
        }

        let width = self.width();
        match self {
            SampleFormat::U8 => convert(bytes, out, width, |raw| f64::from(raw[0])),
            SampleFormat::U16 => convert(bytes, out, width, |raw| f64::from(E::read_u16(raw))),
            SampleFormat::I16 => convert(bytes, out, width, |raw| f64::from(E::read_i16(raw))),
            SampleFormat::U32 => convert(bytes, out, width, |raw| f64::from(E::read_u32(raw))),
            SampleFormat::I32 => convert(bytes, out, width, |raw| f64::from(E::read_i32(raw))),
            SampleFormat::F32 => convert(bytes, out, width, |raw| f64::from(E::read_f32(raw))),
            SampleFormat::F64 => convert(bytes, out, width, E::read_f64),
        }
    }

    /// Encode `value` as one sample, truncating toward the format's range.
    ///
    /// Used for producing test data; decode never calls this.
    pub fn encode(self, value: u64, order: ByteOrder, out: &mut Vec<u8>) {
        let start = out.len();
        out.resize(start + self.width(), 0);
        let raw = &mut out[start..];
        match order {
            ByteOrder::Little => self.encode_word::<LittleEndian>(value, raw),
            ByteOrder::Big => self.encode_word::<BigEndian>(value, raw),
        }
    }

    fn encode_word<E: Endian>(self, value: u64, raw: &mut [u8]) {
        match self {
            SampleFormat::U8 => raw[0] = value as u8,
            SampleFormat::U16 => E::write_u16(raw, value as u16),
            SampleFormat::I16 => E::write_i16(raw, value as i16),
            SampleFormat::U32 => E::write_u32(raw, value as u32),
            SampleFormat::I32 => E::write_i32(raw, value as i32),
            SampleFormat::F32 => E::write_f32(raw, value as f32),
            SampleFormat::F64 => E::write_f64(raw, value as f64),
        }
    }
}

impl std::str::FromStr for SampleFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        SampleFormat::all()
            .iter()
            .copied()
            .find(|f| f.name() == lower)
            .ok_or_else(|| {
                format!(
                    "Invalid sample format: {s}. Valid formats are: u8, u16, i16, u32, i32, f32, f64"
                )
            })
    }
}

/// Byte order of multi-byte samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    /// Least significant byte first
    #[default]
    Little,
    /// Most significant byte first
    Big,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widths() {
        assert_eq!(SampleFormat::U8.width(), 1);
        assert_eq!(SampleFormat::U16.width(), 2);
        assert_eq!(SampleFormat::I32.width(), 4);
        assert_eq!(SampleFormat::F64.width(), 8);
    }

    #[test]
    fn test_u16_little_endian_word_assembly() {
        // 0x1234 stored little-endian
        assert_eq!(SampleFormat::U16.widen(&[0x34, 0x12], ByteOrder::Little), 4660.0);
        assert_eq!(SampleFormat::U16.widen(&[0x34, 0x12], ByteOrder::Big), 13330.0);
    }

    #[test]
    fn test_no_rescaling() {
        assert_eq!(SampleFormat::U16.widen(&[0xFF, 0xFF], ByteOrder::Little), 65535.0);
        assert_eq!(SampleFormat::I16.widen(&[0xFF, 0xFF], ByteOrder::Little), -1.0);
    }

    #[test]
    fn test_encode_then_widen_float() {
        let mut buf = Vec::new();
        SampleFormat::F32.encode(1234, ByteOrder::Big, &mut buf);
        assert_eq!(buf.len(), 4);
        assert_eq!(SampleFormat::F32.widen(&buf, ByteOrder::Big), 1234.0);
    }

    #[test]
    fn test_widen_into_converts_whole_run() {
        // Three big-endian i16 samples: -2, 0, 300
        let bytes = [0xFF, 0xFE, 0x00, 0x00, 0x01, 0x2C];
        let mut out = [f64::NAN; 3];
        SampleFormat::I16.widen_into(&bytes, ByteOrder::Big, &mut out);
        assert_eq!(out, [-2.0, 0.0, 300.0]);
    }

    #[test]
    fn test_widen_into_stops_at_shorter_side() {
        let bytes = [1, 0, 2, 0, 3, 0];
        let mut out = [f64::NAN; 2];
        SampleFormat::U16.widen_into(&bytes, ByteOrder::Little, &mut out);
        assert_eq!(out, [1.0, 2.0]);

        let mut out = [-1.0; 4];
        SampleFormat::U16.widen_into(&bytes, ByteOrder::Little, &mut out);
        assert_eq!(out, [1.0, 2.0, 3.0, -1.0]);
    }

    #[test]
    fn test_encode_matches_std_byte_order() {
        let mut buf = Vec::new();
        SampleFormat::U32.encode(0x0102_0304, ByteOrder::Big, &mut buf);
        SampleFormat::I16.encode(0xFFFE, ByteOrder::Little, &mut buf);
        let mut expected = 0x0102_0304u32.to_be_bytes().to_vec();
        expected.extend_from_slice(&(-2i16).to_le_bytes());
        assert_eq!(buf, expected);
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("U16".parse::<SampleFormat>(), Ok(SampleFormat::U16));
        assert_eq!("f64".parse::<SampleFormat>(), Ok(SampleFormat::F64));
        assert!("u12".parse::<SampleFormat>().is_err());
    }
}
