//! Module: config
//!
//! Purpose: Startup configuration for the signal generator and the
//! USB transmit path.
//!
//! Architecture:
//! - `SigGenConfig`: one record per channel, validated once
//! - `StreamConfig`: both channels plus the transport contract
//! - Validation happens in constructors; nothing is defaulted silently
//!
//! Safety: plain `Copy` data, read once at startup.

use core::fmt;

use crate::audio::format::{ByteOrder, SampleFormat, SampleWidth};

/// Stream sample rate negotiated by the USB audio descriptors
pub const DEFAULT_SAMPLE_RATE: u32 = 48_000;

/// Configuration error, fatal to startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// E01: Frequency not in the supported set
    UnsupportedFrequency,
    /// E02: Sample rate is zero
    ZeroSampleRate,
    /// E03: Frequency at or above half the sample rate
    AboveNyquist,
    /// E04: Bytes per sample not 1, 2 or 4
    UnsupportedWidth,
    /// E05: Stereo channels configured with different sample formats
    FormatMismatch,
    /// E06: Channel sample rate differs from the 48 kHz frame rate
    RateMismatch,
}

impl ConfigError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedFrequency => "E01",
            Self::ZeroSampleRate => "E02",
            Self::AboveNyquist => "E03",
            Self::UnsupportedWidth => "E04",
            Self::FormatMismatch => "E05",
            Self::RateMismatch => "E06",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::UnsupportedFrequency => "unsupported frequency",
            Self::ZeroSampleRate => "sample rate is zero",
            Self::AboveNyquist => "frequency above Nyquist",
            Self::UnsupportedWidth => "unsupported sample width",
            Self::FormatMismatch => "channel formats differ",
            Self::RateMismatch => "sample rate differs from stream rate",
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

/// Waveform family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaveSource {
    /// 256-entry sine lookup table
    #[default]
    SineLut,
}

/// Supported tone frequencies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LutFreq {
    Hz220,
    /// Two table entries per sample at 48 kHz
    Hz375,
    Hz440,
    Hz552,
    Hz750,
    Hz1000,
    Hz1500,
    Hz3000,
}

impl LutFreq {
    pub const ALL: [LutFreq; 8] = [
        Self::Hz220,
        Self::Hz375,
        Self::Hz440,
        Self::Hz552,
        Self::Hz750,
        Self::Hz1000,
        Self::Hz1500,
        Self::Hz3000,
    ];

    /// Parse a raw frequency in Hz
    pub fn from_hz(hz: u32) -> Result<Self, ConfigError> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.hz() == hz)
            .ok_or(ConfigError::UnsupportedFrequency)
    }

    #[inline]
    pub const fn hz(self) -> u32 {
        match self {
            Self::Hz220 => 220,
            Self::Hz375 => 375,
            Self::Hz440 => 440,
            Self::Hz552 => 552,
            Self::Hz750 => 750,
            Self::Hz1000 => 1000,
            Self::Hz1500 => 1500,
            Self::Hz3000 => 3000,
        }
    }

    /// Check this frequency is representable at `sample_rate`
    pub const fn check(self, sample_rate: u32) -> Result<(), ConfigError> {
        if sample_rate == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        if self.hz() as u64 * 2 >= sample_rate as u64 {
            return Err(ConfigError::AboveNyquist);
        }
        Ok(())
    }
}

/// Completion callback: receives the bytes of each `generate` call
pub type CompletionFn = fn(&[u8]);

/// How generated samples are delivered
#[derive(Clone, Copy, Default)]
pub enum Delivery {
    /// Caller pulls synchronously; nothing else is notified
    #[default]
    Pull,
    /// Callback invoked after every `generate`
    Notify(CompletionFn),
}

impl fmt::Debug for Delivery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pull => f.write_str("Pull"),
            Self::Notify(_) => f.write_str("Notify(..)"),
        }
    }
}

/// Per-channel generator configuration
#[derive(Debug, Clone, Copy)]
pub struct SigGenConfig {
    pub source: WaveSource,
    pub freq: LutFreq,
    pub sample_rate: u32,
    pub width: SampleWidth,
    pub byte_order: ByteOrder,
    pub delivery: Delivery,
}

impl SigGenConfig {
    pub const fn new(freq: LutFreq) -> Self {
        Self {
            source: WaveSource::SineLut,
            freq,
            sample_rate: DEFAULT_SAMPLE_RATE,
            width: SampleWidth::Bits16,
            byte_order: ByteOrder::Little,
            delivery: Delivery::Pull,
        }
    }

    pub const fn with_frequency(mut self, freq: LutFreq) -> Self {
        self.freq = freq;
        self
    }

    pub const fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub const fn with_width(mut self, width: SampleWidth) -> Self {
        self.width = width;
        self
    }

    pub const fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    pub const fn with_delivery(mut self, delivery: Delivery) -> Self {
        self.delivery = delivery;
        self
    }

    #[inline]
    pub const fn format(&self) -> SampleFormat {
        SampleFormat::new(self.width, self.byte_order)
    }

    pub const fn validate(&self) -> Result<(), ConfigError> {
        self.freq.check(self.sample_rate)
    }
}

impl Default for SigGenConfig {
    fn default() -> Self {
        Self::new(LutFreq::Hz440)
    }
}

/// Which transmit contract the USB transport drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportContract {
    /// `pre_load` hands out a ready frame, `post_load` prepares the next
    #[default]
    Split,
    /// Single `fill` callback generates the frame on demand
    Pull,
}

/// Whole-stream configuration
#[derive(Debug, Clone, Copy)]
pub struct StreamConfig {
    pub contract: TransportContract,
    pub ch1: SigGenConfig,
    pub ch2: SigGenConfig,
}

impl StreamConfig {
    /// Frames are a fixed 48 samples per millisecond, so both channels
    /// must run at [`DEFAULT_SAMPLE_RATE`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ch1.validate()?;
        self.ch2.validate()?;
        if self.ch1.sample_rate != DEFAULT_SAMPLE_RATE
            || self.ch2.sample_rate != DEFAULT_SAMPLE_RATE
        {
            return Err(ConfigError::RateMismatch);
        }
        if self.ch1.format() != self.ch2.format() {
            return Err(ConfigError::FormatMismatch);
        }
        Ok(())
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            contract: TransportContract::Split,
            ch1: SigGenConfig::new(LutFreq::Hz440),
            ch2: SigGenConfig::new(LutFreq::Hz552),
        }
    }
}
