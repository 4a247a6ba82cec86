//! Log drain: log streams → UART.
//!
//! Runs in the main loop, never in the USB callbacks. On target the
//! lines go out a TX-only UART so the native USB port stays dedicated
//! to the audio and CDC functions.
//!
//! ```text
//! ESP32-S3 GPIO17 (TX) ──────▶ USB-UART RX
//!                               └─▶ PC Serial Monitor
//! ```

use crate::logging::{format_to_buffer, LogEntry, LogStream};

/// Formatted line buffer size
pub const LINE_BUF_LEN: usize = 160;

/// Interval between dropped-message reports
pub const DROPPED_REPORT_INTERVAL_US: i64 = 10_000_000;

/// UART configuration for logging.
pub struct UartLoggerConfig {
    pub baud_rate: u32,
    pub tx_pin: u8,
}

impl Default for UartLoggerConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115200,
            tx_pin: 17,
        }
    }
}

/// Format: `[timestamp_us] LEVEL: message\n`
pub fn format_log_entry(entry: &LogEntry, buf: &mut [u8]) -> usize {
    format_to_buffer(
        buf,
        format_args!(
            "[{:10}] {}: {}\n",
            entry.timestamp_us,
            entry.level.as_str(),
            entry.text()
        ),
    )
}

/// Drain `rt` first, then `bg`, handing each formatted line to `sink`.
///
/// Returns the number of lines written.
pub fn drain_into<F: FnMut(&[u8])>(rt: &LogStream, bg: &LogStream, mut sink: F) -> usize {
    let mut buf = [0u8; LINE_BUF_LEN];
    let mut lines = 0;

    for stream in [rt, bg] {
        while let Some(entry) = stream.drain() {
            let len = format_log_entry(&entry, &mut buf);
            sink(&buf[..len]);
            lines += 1;
        }
    }

    lines
}

/// Format a dropped-message report and reset both counters.
///
/// Returns `None` when nothing was dropped.
pub fn take_dropped_report(rt: &LogStream, bg: &LogStream, buf: &mut [u8]) -> Option<usize> {
    let rt_dropped = rt.dropped();
    let bg_dropped = bg.dropped();
    if rt_dropped == 0 && bg_dropped == 0 {
        return None;
    }

    rt.reset_dropped();
    bg.reset_dropped();
    Some(format_to_buffer(
        buf,
        format_args!("[WARN] Dropped: RT={}, BG={}\n", rt_dropped, bg_dropped),
    ))
}

#[cfg(target_os = "espidf")]
pub use uart::*;

#[cfg(target_os = "espidf")]
mod uart {
    use esp_idf_svc::hal::gpio;
    use esp_idf_svc::hal::peripheral::Peripheral;
    use esp_idf_svc::hal::uart::{self, UartTxDriver};

    use super::*;
    use crate::{BG_LOG_STREAM, RT_LOG_STREAM};

    /// Initialize UART1 TX-only for log output.
    pub fn init_uart_logger<'d>(
        uart: impl Peripheral<P = uart::UART1> + 'd,
        tx_pin: impl Peripheral<P = impl gpio::OutputPin> + 'd,
        config: &UartLoggerConfig,
    ) -> Result<UartTxDriver<'d>, esp_idf_svc::sys::EspError> {
        let uart_config = uart::config::Config::default()
            .baudrate(esp_idf_svc::hal::units::Hertz(config.baud_rate));

        UartTxDriver::new(
            uart,
            tx_pin,
            Option::<gpio::AnyIOPin>::None, // CTS
            Option::<gpio::AnyIOPin>::None, // RTS
            &uart_config,
        )
    }

    /// Periodic drain state kept by the main loop.
    pub struct UartDrain<'d> {
        uart: UartTxDriver<'d>,
        last_dropped_report: i64,
    }

    impl<'d> UartDrain<'d> {
        pub fn new(uart: UartTxDriver<'d>) -> Self {
            Self {
                uart,
                last_dropped_report: 0,
            }
        }

        /// Flush both global streams. Returns true if anything was written.
        pub fn poll(&mut self, now_us: i64) -> bool {
            let uart = &mut self.uart;
            let lines = drain_into(&RT_LOG_STREAM, &BG_LOG_STREAM, |line| {
                let _ = uart.write(line);
            });

            if now_us - self.last_dropped_report > DROPPED_REPORT_INTERVAL_US {
                let mut buf = [0u8; 64];
                if let Some(len) = take_dropped_report(&RT_LOG_STREAM, &BG_LOG_STREAM, &mut buf) {
                    let _ = self.uart.write(&buf[..len]);
                }
                self.last_dropped_report = now_us;
            }

            lines > 0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogLevel, MAX_MSG_LEN};

    #[test]
    fn test_format_log_entry() {
        let entry = LogEntry {
            timestamp_us: 1234567,
            level: LogLevel::Info,
            len: 11,
            msg: {
                let mut msg = [0u8; MAX_MSG_LEN];
                msg[..11].copy_from_slice(b"frame ready");
                msg
            },
        };

        let mut buf = [0u8; LINE_BUF_LEN];
        let len = format_log_entry(&entry, &mut buf);

        let formatted = core::str::from_utf8(&buf[..len]).unwrap();
        assert_eq!(formatted, "[   1234567] INFO: frame ready\n");
    }

    #[test]
    fn test_drain_order_rt_first() {
        let rt = LogStream::new();
        let bg = LogStream::new();
        bg.push(1, LogLevel::Info, b"bg");
        rt.push(2, LogLevel::Warn, b"rt");

        let mut lines = Vec::new();
        let n = drain_into(&rt, &bg, |line| lines.push(String::from_utf8(line.to_vec()).unwrap()));

        assert_eq!(n, 2);
        assert!(lines[0].ends_with("WARN: rt\n"));
        assert!(lines[1].ends_with("INFO: bg\n"));
    }

    #[test]
    fn test_dropped_report() {
        let rt = LogStream::new();
        let bg = LogStream::new();
        let mut buf = [0u8; 64];

        assert!(take_dropped_report(&rt, &bg, &mut buf).is_none());

        for i in 0..70 {
            rt.push(i, LogLevel::Debug, b"x");
        }
        let len = take_dropped_report(&rt, &bg, &mut buf).unwrap();
        assert_eq!(&buf[..len], b"[WARN] Dropped: RT=6, BG=0\n");
        assert_eq!(rt.dropped(), 0);
    }
}
