//! Lookup-table oscillator with fixed-point phase accumulator
//!
//! One instance per channel. Generation cost is one table read and one
//! add per sample regardless of pitch.

use crate::config::{ConfigError, Delivery, LutFreq, SigGenConfig};

use super::format::SampleFormat;

/// Signal generator for one channel
///
/// The full u32 range of `phase` is one table period, so wraparound
/// is exact and the waveform never drifts.
pub struct Oscillator {
    /// Shared read-only waveform period
    table: &'static [i16],
    /// Shift that turns `phase` into a table index (top bits)
    index_shift: u32,
    /// Phase accumulator (32-bit fixed point)
    phase: u32,
    /// Phase increment per sample (determines frequency)
    phase_inc: u32,
    freq: LutFreq,
    sample_rate: u32,
    format: SampleFormat,
    delivery: Delivery,
}

impl Oscillator {
    /// Create a configured oscillator, phase at 0.
    ///
    /// This is the only way to obtain an `Oscillator`, so generation
    /// can never run unconfigured.
    pub fn new(config: &SigGenConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let table = config.source.table();
        Ok(Self {
            table,
            index_shift: 32 - table.len().trailing_zeros(),
            phase: 0,
            phase_inc: Self::calc_phase_inc(config.freq.hz(), config.sample_rate),
            freq: config.freq,
            sample_rate: config.sample_rate,
            format: config.format(),
            delivery: config.delivery,
        })
    }

    /// phase_inc = (freq * 2^32) / sample_rate
    ///
    /// In table entries this is `freq * table_len / sample_rate`.
    #[inline]
    fn calc_phase_inc(freq_hz: u32, sample_rate: u32) -> u32 {
        ((freq_hz as u64 * (1u64 << 32)) / sample_rate as u64) as u32
    }

    /// Retune without resetting phase (no discontinuity).
    pub fn set_frequency(&mut self, freq: LutFreq) -> Result<(), ConfigError> {
        freq.check(self.sample_rate)?;
        self.freq = freq;
        self.phase_inc = Self::calc_phase_inc(freq.hz(), self.sample_rate);
        Ok(())
    }

    /// Write `count` samples into `out` in the configured format.
    ///
    /// Returns the number of bytes written (`count * bytes_per_sample`).
    /// `out` must hold at least that many bytes; a shorter buffer is a
    /// caller bug and panics.
    #[inline]
    pub fn generate(&mut self, count: usize, out: &mut [u8]) -> usize {
        debug_assert!(count > 0, "generate called with count 0");

        let bps = self.format.bytes_per_sample();
        let len = count * bps;
        assert!(
            out.len() >= len,
            "output buffer too small: {} < {}",
            out.len(),
            len
        );

        for slot in out[..len].chunks_exact_mut(bps) {
            let idx = (self.phase >> self.index_shift) as usize;
            self.format.encode(self.table[idx], slot);
            self.phase = self.phase.wrapping_add(self.phase_inc);
        }

        if let Delivery::Notify(done) = self.delivery {
            done(&out[..len]);
        }

        len
    }

    /// Reset phase to the start of the table
    pub fn reset(&mut self) {
        self.phase = 0;
    }

    /// Raw phase accumulator
    #[inline]
    pub fn phase(&self) -> u32 {
        self.phase
    }

    /// Raw phase increment per sample
    #[inline]
    pub fn phase_step(&self) -> u32 {
        self.phase_inc
    }

    /// Current table index (integer part of the phase)
    #[inline]
    pub fn table_index(&self) -> usize {
        (self.phase >> self.index_shift) as usize
    }

    #[inline]
    pub fn table_len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn format(&self) -> SampleFormat {
        self.format
    }

    #[inline]
    pub fn frequency(&self) -> LutFreq {
        self.freq
    }

    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Samples per waveform period, rounded to nearest
    pub fn period_samples(&self) -> u32 {
        let hz = self.freq.hz();
        (self.sample_rate + hz / 2) / hz
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_inc_exact_for_375() {
        let osc = Oscillator::new(&SigGenConfig::new(LutFreq::Hz375)).unwrap();
        // 375 Hz * 256 / 48000 = 2 entries per sample
        assert_eq!(osc.phase_step(), 2 << 24);
        assert_eq!(osc.period_samples(), 128);
    }

    #[test]
    fn test_retune_keeps_phase() {
        let mut osc = Oscillator::new(&SigGenConfig::default()).unwrap();
        let mut out = [0u8; 64];
        osc.generate(10, &mut out);
        let phase = osc.phase();

        osc.set_frequency(LutFreq::Hz1000).unwrap();
        assert_eq!(osc.phase(), phase);
        assert_eq!(osc.frequency(), LutFreq::Hz1000);
    }

    #[test]
    #[should_panic(expected = "output buffer too small")]
    fn test_undersized_output_panics() {
        let mut osc = Oscillator::new(&SigGenConfig::default()).unwrap();
        let mut out = [0u8; 3];
        osc.generate(2, &mut out);
    }
}
