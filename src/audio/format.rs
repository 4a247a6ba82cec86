//! Sample wire format: width and byte order
//!
//! Table values are i16. Narrower and wider formats are derived by
//! shifting, so full scale stays full scale in every width.

use crate::config::ConfigError;

/// Sample width on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleWidth {
    /// Signed 8-bit
    Bits8,
    /// Signed 16-bit
    Bits16,
    /// Signed 32-bit (left-justified 16-bit)
    Bits32,
}

impl SampleWidth {
    /// Widest supported sample, in bytes
    pub const MAX_BYTES: usize = 4;

    /// Parse a raw bytes-per-sample value
    pub const fn from_bytes(bytes: u8) -> Result<Self, ConfigError> {
        match bytes {
            1 => Ok(Self::Bits8),
            2 => Ok(Self::Bits16),
            4 => Ok(Self::Bits32),
            _ => Err(ConfigError::UnsupportedWidth),
        }
    }

    /// Bytes per sample
    #[inline]
    pub const fn bytes(self) -> usize {
        match self {
            Self::Bits8 => 1,
            Self::Bits16 => 2,
            Self::Bits32 => 4,
        }
    }
}

/// Byte order of multi-byte samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

/// Sample format, fixed at configuration time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleFormat {
    pub width: SampleWidth,
    pub byte_order: ByteOrder,
}

impl SampleFormat {
    /// 16-bit little-endian, the USB audio class default
    pub const PCM16_LE: Self = Self::new(SampleWidth::Bits16, ByteOrder::Little);

    pub const fn new(width: SampleWidth, byte_order: ByteOrder) -> Self {
        Self { width, byte_order }
    }

    #[inline]
    pub const fn bytes_per_sample(&self) -> usize {
        self.width.bytes()
    }

    /// Encode one table value into `out[..bytes_per_sample]`.
    ///
    /// Panics if `out` is shorter than one sample.
    #[inline]
    pub fn encode(&self, sample: i16, out: &mut [u8]) {
        match self.width {
            SampleWidth::Bits8 => out[0] = ((sample >> 8) as i8) as u8,
            SampleWidth::Bits16 => {
                let bytes = match self.byte_order {
                    ByteOrder::Little => sample.to_le_bytes(),
                    ByteOrder::Big => sample.to_be_bytes(),
                };
                out[..2].copy_from_slice(&bytes);
            }
            SampleWidth::Bits32 => {
                let wide = (sample as i32) << 16;
                let bytes = match self.byte_order {
                    ByteOrder::Little => wide.to_le_bytes(),
                    ByteOrder::Big => wide.to_be_bytes(),
                };
                out[..4].copy_from_slice(&bytes);
            }
        }
    }

    /// Decode one sample at its native width, sign-extended.
    ///
    /// Reference decoder for diagnostics and tests.
    #[inline]
    pub fn decode(&self, bytes: &[u8]) -> i32 {
        match self.width {
            SampleWidth::Bits8 => bytes[0] as i8 as i32,
            SampleWidth::Bits16 => {
                let raw = [bytes[0], bytes[1]];
                match self.byte_order {
                    ByteOrder::Little => i16::from_le_bytes(raw) as i32,
                    ByteOrder::Big => i16::from_be_bytes(raw) as i32,
                }
            }
            SampleWidth::Bits32 => {
                let raw = [bytes[0], bytes[1], bytes[2], bytes[3]];
                match self.byte_order {
                    ByteOrder::Little => i32::from_le_bytes(raw),
                    ByteOrder::Big => i32::from_be_bytes(raw),
                }
            }
        }
    }
}

impl Default for SampleFormat {
    fn default() -> Self {
        Self::PCM16_LE
    }
}
