//! # USB Audio SigGen
//!
//! Two-channel test-tone generator feeding a USB audio class IN
//! endpoint on ESP32-S3.
//!
//! ## Architecture
//!
//! The USB transport drives everything. On each transmit callback a
//! [`FrameProvider`] hands out one 1 ms stereo frame built by the
//! [`FrameAssembler`] from two [`Oscillator`]s:
//! - No component starts work on its own
//! - No allocation, no locks, no blocking in the callback path
//! - Configuration is validated once, at construction
//!
//! Diagnostics leave the callback context only through atomics
//! ([`FaultState`]) and lock-free log rings ([`logging::LogStream`]).

#![cfg_attr(not(test), no_std)]

pub mod audio;
pub mod config;
pub mod fault;
pub mod logging;
pub mod log_globals;
pub mod log_drain;

#[cfg(target_os = "espidf")]
pub mod hal;

pub use audio::{FrameAssembler, FrameProvider, Oscillator, Provider, TxMonitor};
pub use config::{ConfigError, SigGenConfig, StreamConfig, TransportContract};
pub use fault::{FaultCode, FaultState};
pub use log_globals::{BG_LOG_STREAM, RT_LOG_STREAM};
