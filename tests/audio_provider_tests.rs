//! Frame provider (transmit contract) tests

use usb_audio_siggen::audio::{
    FrameAssembler, FrameProvider, Oscillator, Provider, PullProvider, SplitProvider, TxMonitor,
    MAX_FRAME_BYTES,
};
use usb_audio_siggen::config::{LutFreq, SigGenConfig, StreamConfig, TransportContract};
use usb_audio_siggen::fault::{FaultCode, FaultState};
use usb_audio_siggen::logging::{LogLevel, LogStream};

fn assembler() -> FrameAssembler {
    let ch1 = Oscillator::new(&SigGenConfig::new(LutFreq::Hz440)).unwrap();
    let ch2 = Oscillator::new(&SigGenConfig::new(LutFreq::Hz552)).unwrap();
    FrameAssembler::new(ch1, ch2).unwrap()
}

/// Frames straight from an assembler, for comparison
fn reference_frames(n: usize) -> Vec<Vec<u8>> {
    let mut asm = assembler();
    (0..n).map(|_| asm.produce_frame().to_vec()).collect()
}

#[test]
fn test_split_hands_out_prepared_frame() {
    let fault = FaultState::new();
    let log = LogStream::new();
    let mut p = SplitProvider::new(assembler(), TxMonitor::new(&fault, &log));
    let reference = reference_frames(20);

    for expected in &reference {
        assert!(p.is_armed(), "a frame must be ready before pre_load");
        let produced_before = p.assembler().frames_produced();

        let frame = p.pre_load().to_vec();
        assert_eq!(&frame, expected);
        // pre_load never generates when a frame is ready
        assert_eq!(p.assembler().frames_produced(), produced_before);

        p.post_load(frame.len());
    }

    assert_eq!(p.frames_sent(), 20);
    assert!(!fault.is_active());
}

#[test]
fn test_split_prepares_during_post_load() {
    let fault = FaultState::new();
    let log = LogStream::new();
    let mut p = SplitProvider::new(assembler(), TxMonitor::new(&fault, &log));

    let len = p.pre_load().len();
    assert!(!p.is_armed());
    assert_eq!(p.assembler().frames_produced(), 1);

    p.post_load(len);
    assert!(p.is_armed());
    assert_eq!(p.assembler().frames_produced(), 2);
}

#[test]
fn test_split_missed_post_load_sends_fresh_frame() {
    let fault = FaultState::new();
    let log = LogStream::new();
    let mut p = SplitProvider::new(assembler(), TxMonitor::new(&fault, &log));
    let reference = reference_frames(2);

    assert_eq!(p.pre_load(), &reference[0][..]);
    // Second pre_load without post_load
    assert_eq!(p.pre_load(), &reference[1][..], "must not resend frame 0");

    assert!(fault.is_active());
    assert_eq!(fault.code(), FaultCode::MissedPostLoad);
    assert_eq!(fault.data(), 1);

    let entry = log.drain().expect("fault should be logged");
    assert_eq!(entry.level, LogLevel::Warn);
    assert!(entry.text().contains("MissedPostLoad"));
}

#[test]
fn test_split_double_post_load_keeps_unsent_frame() {
    let fault = FaultState::new();
    let log = LogStream::new();
    let mut p = SplitProvider::new(assembler(), TxMonitor::new(&fault, &log));
    let reference = reference_frames(2);

    let len = p.pre_load().len();
    p.post_load(len);
    p.post_load(len);

    assert_eq!(p.assembler().frames_produced(), 2);
    assert_eq!(p.pre_load(), &reference[1][..]);
}

#[test]
fn test_short_transfer_reported() {
    let fault = FaultState::new();
    let log = LogStream::new();
    let mut p = SplitProvider::new(assembler(), TxMonitor::new(&fault, &log));

    p.pre_load();
    p.post_load(100);

    assert_eq!(fault.code(), FaultCode::ShortTransfer);
    assert_eq!(fault.data(), 100);
    // Next frame still prepared
    assert!(p.is_armed());
}

#[test]
fn test_pull_generates_in_callback() {
    let fault = FaultState::new();
    let log = LogStream::new();
    let mut p = PullProvider::new(assembler(), TxMonitor::new(&fault, &log));
    let reference = reference_frames(10);

    let mut dst = [0u8; MAX_FRAME_BYTES];
    for expected in &reference {
        let before = p.assembler().frames_produced();
        let len = p.fill(&mut dst).unwrap();
        assert_eq!(p.assembler().frames_produced(), before + 1);
        assert_eq!(&dst[..len], &expected[..]);
    }
    assert_eq!(p.frames_sent(), 10);
    assert_eq!(fault.count(), 0);
}

#[test]
fn test_pull_fill_then_post_load_generates_once() {
    // USB glue: fill in the pre-load hook, then the post-load hook
    // reports the copied length for the same frame
    let fault = FaultState::new();
    let log = LogStream::new();
    let pull_config = StreamConfig {
        contract: TransportContract::Pull,
        ..StreamConfig::default()
    };
    let mut p = Provider::from_config(&pull_config, TxMonitor::new(&fault, &log)).unwrap();
    let reference = reference_frames(20);

    let mut dst = [0u8; MAX_FRAME_BYTES];
    for expected in &reference {
        let len = p.fill(&mut dst).unwrap();
        p.post_load(len);
        assert_eq!(&dst[..len], &expected[..]);
    }
    assert_eq!(p.frames_sent(), 20);
    assert_eq!(p.assembler().frames_produced(), 20);
    assert_eq!(fault.count(), 0);

    p.fill(&mut dst).unwrap();
    p.post_load(10);
    assert_eq!(fault.code(), FaultCode::ShortTransfer);
    assert_eq!(fault.data(), 10);
}

#[test]
fn test_fill_rejects_undersized_buffer() {
    let fault = FaultState::new();
    let log = LogStream::new();
    let mut p = PullProvider::new(assembler(), TxMonitor::new(&fault, &log));

    let mut dst = [0x55u8; 100];
    assert_eq!(p.fill(&mut dst), None);
    assert!(dst.iter().all(|&b| b == 0x55), "nothing written on failure");
    assert_eq!(fault.code(), FaultCode::UndersizedBuffer);
    assert_eq!(fault.data(), 100);
    assert_eq!(p.assembler().frames_produced(), 0);
}

#[test]
fn test_both_contracts_emit_same_stream() {
    let fault = FaultState::new();
    let log = LogStream::new();
    let config = StreamConfig::default();

    let mut split = Provider::from_config(&config, TxMonitor::new(&fault, &log)).unwrap();
    let pull_config = StreamConfig {
        contract: TransportContract::Pull,
        ..config
    };
    let mut pull = Provider::from_config(&pull_config, TxMonitor::new(&fault, &log)).unwrap();

    assert_eq!(split.contract(), TransportContract::Split);
    assert_eq!(pull.contract(), TransportContract::Pull);

    let mut a = [0u8; MAX_FRAME_BYTES];
    let mut b = [0u8; MAX_FRAME_BYTES];
    for _ in 0..50 {
        let la = split.fill(&mut a).unwrap();
        let lb = pull.fill(&mut b).unwrap();
        assert_eq!(la, lb);
        assert_eq!(&a[..la], &b[..lb]);
    }
    assert_eq!(fault.count(), 0);
}

#[test]
fn test_split_look_ahead_via_fill() {
    let fault = FaultState::new();
    let log = LogStream::new();
    let mut split = Provider::from_config(&StreamConfig::default(), TxMonitor::new(&fault, &log)).unwrap();

    let mut dst = [0u8; MAX_FRAME_BYTES];
    split.fill(&mut dst).unwrap();
    // One frame sent, one prepared
    assert_eq!(split.frames_sent(), 1);
    assert_eq!(split.assembler().frames_produced(), 2);
}
