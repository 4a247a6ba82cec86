//! USB Audio SigGen - Main entry point
//!
//! On target:
//! 1. Build both oscillators and the frame provider (fail fast)
//! 2. Install TinyUSB; its device task drives the provider
//! 3. Main loop drains logs to UART and reports transmit faults
//!
//! On the host the same provider is driven for one second of frames,
//! which is handy for eyeballing the generated samples.

#![cfg_attr(target_os = "espidf", no_std)]
#![cfg_attr(target_os = "espidf", no_main)]

#[cfg(target_os = "espidf")]
mod firmware {
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::sys as esp_idf_sys;

    use usb_audio_siggen::{
        hal::usb_audio,
        log_drain::{init_uart_logger, UartDrain, UartLoggerConfig},
        rt_info, rt_warn, FaultState, FrameProvider, Provider, StreamConfig, TxMonitor,
        BG_LOG_STREAM, RT_LOG_STREAM,
    };

    static FAULT_STATE: FaultState = FaultState::new();

    #[no_mangle]
    fn main() {
        // Initialize ESP-IDF
        esp_idf_sys::link_patches();

        rt_info!(BG_LOG_STREAM, timestamp_us(), "{}", env!("VERSION_STRING"));
        rt_info!(BG_LOG_STREAM, timestamp_us(), "USB initialization");

        let config = StreamConfig::default();
        let provider = match Provider::from_config(
            &config,
            TxMonitor::new(&FAULT_STATE, &RT_LOG_STREAM),
        ) {
            Ok(provider) => provider,
            Err(e) => panic!("signal generator config: {}", e),
        };

        rt_info!(
            BG_LOG_STREAM,
            timestamp_us(),
            "ch1 {} Hz, ch2 {} Hz, {:?}, {:?}, {} bytes/frame",
            config.ch1.freq.hz(),
            config.ch2.freq.hz(),
            config.ch1.format(),
            provider.contract(),
            provider.frame_len()
        );

        if let Err(e) = usb_audio::start(provider) {
            panic!("tinyusb_driver_install failed: {}", e);
        }
        rt_info!(BG_LOG_STREAM, timestamp_us(), "USB initialization DONE");

        let peripherals = match Peripherals::take() {
            Ok(p) => p,
            Err(e) => panic!("peripherals: {}", e),
        };
        let uart = match init_uart_logger(
            peripherals.uart1,
            peripherals.pins.gpio17,
            &UartLoggerConfig::default(),
        ) {
            Ok(uart) => uart,
            Err(e) => panic!("log uart: {}", e),
        };
        let mut drain = UartDrain::new(uart);
        let mut faults_seen = 0u32;

        loop {
            let now = timestamp_us();

            let snapshot = FAULT_STATE.snapshot();
            if snapshot.count != faults_seen {
                rt_warn!(
                    BG_LOG_STREAM,
                    now,
                    "tx faults: {} total, last {:?} data={}",
                    snapshot.count,
                    snapshot.code,
                    snapshot.data
                );
                faults_seen = snapshot.count;
                FAULT_STATE.clear();
            }

            if !drain.poll(now) {
                // SAFETY: plain FreeRTOS delay from the main task
                unsafe {
                    esp_idf_sys::vTaskDelay(10);
                }
            }
        }
    }

    fn timestamp_us() -> i64 {
        // SAFETY: esp_timer is running before app_main
        unsafe { esp_idf_sys::esp_timer_get_time() }
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    use usb_audio_siggen::{
        audio::SAMPLES_PER_FRAME, log_drain, FaultState, FrameProvider, Provider, StreamConfig,
        TxMonitor, BG_LOG_STREAM, RT_LOG_STREAM,
    };

    const SIM_FRAMES: usize = 1000;

    println!("{}", env!("VERSION_STRING"));

    let fault = FaultState::new();
    let config = StreamConfig::default();
    let mut provider = match Provider::from_config(&config, TxMonitor::new(&fault, &RT_LOG_STREAM)) {
        Ok(provider) => provider,
        Err(e) => {
            eprintln!("signal generator config: {}", e);
            std::process::exit(1);
        }
    };

    for _ in 0..SIM_FRAMES {
        let len = provider.pre_load().len();
        provider.post_load(len);
    }

    let format = provider.assembler().format();
    let bps = format.bytes_per_sample();
    let frame = provider.assembler().frame();
    println!(
        "{} frames sent ({:?}, {} bytes each), faults: {}",
        provider.frames_sent(),
        provider.contract(),
        frame.len(),
        fault.count()
    );
    for pair in frame.chunks_exact(bps * 2).take(SAMPLES_PER_FRAME / 6) {
        println!(
            "{:>7} {:>7}",
            format.decode(&pair[..bps]),
            format.decode(&pair[bps..])
        );
    }

    log_drain::drain_into(&RT_LOG_STREAM, &BG_LOG_STREAM, |line| {
        print!("{}", String::from_utf8_lossy(line));
    });
}
