//! Audio subsystem: test-tone generation for the USB audio IN stream
//!
//! Architecture:
//! - Oscillator: LUT + 32-bit phase accumulator, one per channel
//! - Frame assembler: 48 samples/channel, interleaved stereo, 1 ms
//! - Frame providers: split (pre/post-load) or pull (fill) contract
//! - No allocation, no locks, O(frame) work per transport callback

pub mod format;
pub mod frame;
pub mod lut;
pub mod oscillator;
pub mod provider;

pub use format::{ByteOrder, SampleFormat, SampleWidth};
pub use frame::{frame_bytes, interleave, FrameAssembler, CHANNELS, MAX_FRAME_BYTES, SAMPLES_PER_FRAME};
pub use lut::{LUT_SIZE, SINE_LUT};
pub use oscillator::Oscillator;
pub use provider::{FrameProvider, Provider, PullProvider, SplitProvider, TxMonitor};
