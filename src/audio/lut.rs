//! Waveform lookup tables
//!
//! One full period per table, i16 full scale. Tables are `'static` and
//! shared read-only by every oscillator selecting the same family.

use crate::config::WaveSource;

/// log2 of the table length
pub const LUT_BITS: u32 = 8;

/// Number of entries in the sine LUT
pub const LUT_SIZE: usize = 1 << LUT_BITS;

// Phase accumulator indexing takes the top LUT_BITS of a u32
const _: () = assert!(LUT_SIZE.is_power_of_two() && LUT_BITS <= 16);

/// Pre-computed sine wave lookup table
///
/// 256 samples covering 0 to 2π, amplitude ±32767.
/// Index 0 = 0°, 64 = 90°, 128 = 180°, 192 = 270°
pub static SINE_LUT: [i16; LUT_SIZE] = {
    let mut table = [0i16; LUT_SIZE];
    let mut i = 0;
    while i < LUT_SIZE {
        let angle = (i as f64) * core::f64::consts::TAU / (LUT_SIZE as f64);
        table[i] = round_to_i16(const_sin(angle) * 32767.0);
        i += 1;
    }
    table
};

impl WaveSource {
    /// Table backing this waveform family
    #[inline]
    pub fn table(self) -> &'static [i16] {
        match self {
            WaveSource::SineLut => &SINE_LUT,
        }
    }
}

/// Round half away from zero (`f64::round` is not const)
const fn round_to_i16(x: f64) -> i16 {
    if x >= 0.0 {
        (x + 0.5) as i16
    } else {
        (x - 0.5) as i16
    }
}

/// Taylor-series sine usable in const context
const fn const_sin(x: f64) -> f64 {
    use core::f64::consts::PI;

    let mut x = x;
    while x > PI {
        x -= 2.0 * PI;
    }
    while x < -PI {
        x += 2.0 * PI;
    }

    // Fold into [-π/2, π/2] where the series converges fast
    if x > PI / 2.0 {
        x = PI - x;
    } else if x < -PI / 2.0 {
        x = -PI - x;
    }

    let x2 = x * x;
    let x3 = x2 * x;
    let x5 = x3 * x2;
    let x7 = x5 * x2;
    let x9 = x7 * x2;
    let x11 = x9 * x2;

    x - x3 / 6.0 + x5 / 120.0 - x7 / 5040.0 + x9 / 362880.0 - x11 / 39916800.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadrant_symmetry() {
        // sin(π - x) == sin(x)
        for i in 1..64 {
            assert_eq!(SINE_LUT[i], SINE_LUT[128 - i]);
        }
        // sin(-x) == -sin(x)
        for i in 1..128 {
            assert_eq!(SINE_LUT[i], -SINE_LUT[LUT_SIZE - i]);
        }
    }

    #[test]
    fn test_source_table() {
        assert_eq!(WaveSource::SineLut.table().len(), LUT_SIZE);
        assert_eq!(WaveSource::SineLut.table()[64], 32767);
    }
}
