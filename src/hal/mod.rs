//! Hardware Abstraction Layer.
//!
//! Thin glue to ESP-IDF components. Generation logic stays in
//! `audio`, the HAL only moves frames.

pub mod usb_audio;
