//! Global log stream instances.
//!
//! One stream per producing context, so each stays single-producer.

use crate::logging::LogStream;

/// Transmit path stream.
///
/// Only the USB transport callbacks (frame providers) push here.
pub static RT_LOG_STREAM: LogStream = LogStream::new();

/// Background stream.
///
/// Startup and the main loop push here.
pub static BG_LOG_STREAM: LogStream = LogStream::new();
