//! Stereo frame assembly for the isochronous IN endpoint
//!
//! One frame = one USB (full-speed) frame period = 1 ms of audio.
//! Channel 1 goes in even sample slots, channel 2 in odd slots.

use crate::config::{ConfigError, DEFAULT_SAMPLE_RATE};

use super::format::{SampleFormat, SampleWidth};
use super::oscillator::Oscillator;

/// Samples per channel per 1 ms frame at 48 kHz
pub const SAMPLES_PER_FRAME: usize = DEFAULT_SAMPLE_RATE as usize / 1000;

/// Interleaved channel count
pub const CHANNELS: usize = 2;

/// Frame period in microseconds
pub const FRAME_PERIOD_US: i64 = 1000;

/// Per-channel scratch size for the widest format
const SCRATCH_BYTES: usize = SAMPLES_PER_FRAME * SampleWidth::MAX_BYTES;

/// Transmit buffer capacity for the widest format
pub const MAX_FRAME_BYTES: usize = SCRATCH_BYTES * CHANNELS;

/// Frame size in bytes for a given sample width
#[inline]
pub const fn frame_bytes(width: SampleWidth) -> usize {
    SAMPLES_PER_FRAME * CHANNELS * width.bytes()
}

/// Interleave two mono sample streams into `out`.
///
/// `left` and `right` hold the same number of `bytes_per_sample`-wide
/// samples; `out` holds both.
#[inline]
pub fn interleave(left: &[u8], right: &[u8], bytes_per_sample: usize, out: &mut [u8]) {
    debug_assert_eq!(left.len(), right.len());
    debug_assert!(out.len() >= left.len() * 2);

    let pairs = out.chunks_exact_mut(bytes_per_sample * 2);
    let l = left.chunks_exact(bytes_per_sample);
    let r = right.chunks_exact(bytes_per_sample);

    for ((slot, l), r) in pairs.zip(l).zip(r) {
        let (slot_l, slot_r) = slot.split_at_mut(bytes_per_sample);
        slot_l.copy_from_slice(l);
        slot_r.copy_from_slice(r);
    }
}

/// Owns both channel oscillators and the transmit buffer.
///
/// The buffer is allocated once (inline) and rewritten in place by
/// [`produce_frame`](Self::produce_frame). Handing it out as `&[u8]`
/// means it cannot be rewritten while the transport holds it.
pub struct FrameAssembler {
    ch1: Oscillator,
    ch2: Oscillator,
    buffer: [u8; MAX_FRAME_BYTES],
    frame_len: usize,
    frames: u32,
}

impl FrameAssembler {
    /// Both channels must emit the same sample format at the stream rate.
    pub fn new(ch1: Oscillator, ch2: Oscillator) -> Result<Self, ConfigError> {
        if ch1.sample_rate() != DEFAULT_SAMPLE_RATE || ch2.sample_rate() != DEFAULT_SAMPLE_RATE {
            return Err(ConfigError::RateMismatch);
        }
        if ch1.format() != ch2.format() {
            return Err(ConfigError::FormatMismatch);
        }

        let frame_len = frame_bytes(ch1.format().width);
        Ok(Self {
            ch1,
            ch2,
            buffer: [0; MAX_FRAME_BYTES],
            frame_len,
            frames: 0,
        })
    }

    /// Generate and interleave one full frame.
    ///
    /// Returns the frame; its length is always
    /// `SAMPLES_PER_FRAME * CHANNELS * bytes_per_sample`.
    pub fn produce_frame(&mut self) -> &[u8] {
        let mut left = [0u8; SCRATCH_BYTES];
        let mut right = [0u8; SCRATCH_BYTES];

        let n = self.ch1.generate(SAMPLES_PER_FRAME, &mut left);
        self.ch2.generate(SAMPLES_PER_FRAME, &mut right);

        interleave(
            &left[..n],
            &right[..n],
            self.format().bytes_per_sample(),
            &mut self.buffer[..self.frame_len],
        );
        self.frames = self.frames.wrapping_add(1);

        &self.buffer[..self.frame_len]
    }

    /// Last produced frame (zeros before the first one)
    #[inline]
    pub fn frame(&self) -> &[u8] {
        &self.buffer[..self.frame_len]
    }

    #[inline]
    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    #[inline]
    pub fn format(&self) -> SampleFormat {
        self.ch1.format()
    }

    /// Frames produced since creation (wraps)
    #[inline]
    pub fn frames_produced(&self) -> u32 {
        self.frames
    }

    pub fn ch1(&self) -> &Oscillator {
        &self.ch1
    }

    pub fn ch2(&self) -> &Oscillator {
        &self.ch2
    }

    /// Mutable access for retuning between frames
    pub fn channels_mut(&mut self) -> (&mut Oscillator, &mut Oscillator) {
        (&mut self.ch1, &mut self.ch2)
    }
}
