//! Frame providers: the two USB transmit contracts
//!
//! ```text
//! Split (TinyUSB tx_done callbacks)      Pull (single fill callback)
//! ─────────────────────────────────      ───────────────────────────
//! pre_load  → hand out frame k            fill → generate frame k
//!   [transport sends frame k]                  → copy, return length
//! post_load → generate frame k+1
//! ```
//!
//! Split keeps exactly one frame prepared ahead of `pre_load`; its
//! generation runs inside the transmission window of the previous one.
//! Pull generates inside the call with no look-ahead. Both expose the
//! same [`FrameProvider`] trait, so the transport glue does not care
//! which one was configured.

use crate::config::{ConfigError, StreamConfig, TransportContract};
use crate::fault::{FaultCode, FaultState};
use crate::logging::LogStream;

use super::frame::{FrameAssembler, FRAME_PERIOD_US};
use super::oscillator::Oscillator;

/// Where a provider reports contract violations.
///
/// Callback context only pushes; the main loop reads and drains.
#[derive(Clone, Copy)]
pub struct TxMonitor<'a> {
    pub fault: &'a FaultState,
    pub log: &'a LogStream,
}

impl<'a> TxMonitor<'a> {
    pub fn new(fault: &'a FaultState, log: &'a LogStream) -> Self {
        Self { fault, log }
    }

    fn report(&self, code: FaultCode, data: u32, frames_sent: u32) {
        self.fault.set(code, data);
        crate::rt_warn!(
            self.log,
            frames_sent as i64 * FRAME_PERIOD_US,
            "tx fault {:?} data={}",
            code,
            data
        );
    }
}

/// Supplies frames to the USB transport.
pub trait FrameProvider {
    /// Frame to transmit now.
    fn pre_load(&mut self) -> &[u8];

    /// Transport has taken `bytes_copied` bytes of the last frame.
    fn post_load(&mut self, bytes_copied: usize);

    /// Bytes in every frame this provider hands out.
    fn frame_len(&self) -> usize;

    /// Frames handed to the transport so far (wraps).
    fn frames_sent(&self) -> u32;

    fn monitor(&self) -> TxMonitor<'_>;

    /// Single-callback contract: copy one frame into `dst`.
    ///
    /// Returns the byte count, or `None` (nothing written) when `dst`
    /// cannot hold a whole frame.
    fn fill(&mut self, dst: &mut [u8]) -> Option<usize> {
        let len = self.frame_len();
        if dst.len() < len {
            let sent = self.frames_sent();
            self.monitor().report(FaultCode::UndersizedBuffer, dst.len() as u32, sent);
            return None;
        }

        dst[..len].copy_from_slice(self.pre_load());
        self.post_load(len);
        Some(len)
    }
}

/// Pre-load / post-load contract with one frame of look-ahead.
pub struct SplitProvider<'a> {
    assembler: FrameAssembler,
    monitor: TxMonitor<'a>,
    /// A generated frame is waiting for `pre_load`
    armed: bool,
    sent: u32,
}

impl<'a> SplitProvider<'a> {
    /// Prepares the first frame immediately.
    pub fn new(mut assembler: FrameAssembler, monitor: TxMonitor<'a>) -> Self {
        assembler.produce_frame();
        Self {
            assembler,
            monitor,
            armed: true,
            sent: 0,
        }
    }

    /// True when a frame is prepared and not yet handed out.
    #[inline]
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn assembler(&self) -> &FrameAssembler {
        &self.assembler
    }

    pub fn assembler_mut(&mut self) -> &mut FrameAssembler {
        &mut self.assembler
    }
}

impl FrameProvider for SplitProvider<'_> {
    fn pre_load(&mut self) -> &[u8] {
        if !self.armed {
            // No post_load since the last pre_load. Never resend a frame
            // that already went out; generate a fresh one in-line.
            self.monitor
                .report(FaultCode::MissedPostLoad, self.sent, self.sent);
            self.assembler.produce_frame();
        }

        self.armed = false;
        self.sent = self.sent.wrapping_add(1);
        self.assembler.frame()
    }

    fn post_load(&mut self, bytes_copied: usize) {
        if bytes_copied < self.assembler.frame_len() {
            self.monitor
                .report(FaultCode::ShortTransfer, bytes_copied as u32, self.sent);
        }

        // A second post_load would overwrite a frame nobody has sent
        if !self.armed {
            self.assembler.produce_frame();
            self.armed = true;
        }
    }

    #[inline]
    fn frame_len(&self) -> usize {
        self.assembler.frame_len()
    }

    #[inline]
    fn frames_sent(&self) -> u32 {
        self.sent
    }

    fn monitor(&self) -> TxMonitor<'_> {
        self.monitor
    }
}

/// Single-callback contract: each frame generated on request.
pub struct PullProvider<'a> {
    assembler: FrameAssembler,
    monitor: TxMonitor<'a>,
    sent: u32,
}

impl<'a> PullProvider<'a> {
    pub fn new(assembler: FrameAssembler, monitor: TxMonitor<'a>) -> Self {
        Self {
            assembler,
            monitor,
            sent: 0,
        }
    }

    pub fn assembler(&self) -> &FrameAssembler {
        &self.assembler
    }

    pub fn assembler_mut(&mut self) -> &mut FrameAssembler {
        &mut self.assembler
    }
}

impl FrameProvider for PullProvider<'_> {
    fn pre_load(&mut self) -> &[u8] {
        self.sent = self.sent.wrapping_add(1);
        self.assembler.produce_frame()
    }

    fn post_load(&mut self, bytes_copied: usize) {
        if bytes_copied < self.assembler.frame_len() {
            self.monitor
                .report(FaultCode::ShortTransfer, bytes_copied as u32, self.sent);
        }
    }

    #[inline]
    fn frame_len(&self) -> usize {
        self.assembler.frame_len()
    }

    #[inline]
    fn frames_sent(&self) -> u32 {
        self.sent
    }

    fn monitor(&self) -> TxMonitor<'_> {
        self.monitor
    }
}

/// Provider selected at configuration time.
pub enum Provider<'a> {
    Split(SplitProvider<'a>),
    Pull(PullProvider<'a>),
}

impl<'a> Provider<'a> {
    pub fn new(
        contract: TransportContract,
        assembler: FrameAssembler,
        monitor: TxMonitor<'a>,
    ) -> Self {
        match contract {
            TransportContract::Split => Self::Split(SplitProvider::new(assembler, monitor)),
            TransportContract::Pull => Self::Pull(PullProvider::new(assembler, monitor)),
        }
    }

    /// Build both oscillators, the assembler and the provider.
    ///
    /// Any invalid setting fails here, before the transport starts.
    pub fn from_config(config: &StreamConfig, monitor: TxMonitor<'a>) -> Result<Self, ConfigError> {
        config.validate()?;
        let ch1 = Oscillator::new(&config.ch1)?;
        let ch2 = Oscillator::new(&config.ch2)?;
        let assembler = FrameAssembler::new(ch1, ch2)?;
        Ok(Self::new(config.contract, assembler, monitor))
    }

    pub fn contract(&self) -> TransportContract {
        match self {
            Self::Split(_) => TransportContract::Split,
            Self::Pull(_) => TransportContract::Pull,
        }
    }

    pub fn assembler(&self) -> &FrameAssembler {
        match self {
            Self::Split(p) => p.assembler(),
            Self::Pull(p) => p.assembler(),
        }
    }

    pub fn assembler_mut(&mut self) -> &mut FrameAssembler {
        match self {
            Self::Split(p) => p.assembler_mut(),
            Self::Pull(p) => p.assembler_mut(),
        }
    }
}

impl FrameProvider for Provider<'_> {
    fn pre_load(&mut self) -> &[u8] {
        match self {
            Self::Split(p) => p.pre_load(),
            Self::Pull(p) => p.pre_load(),
        }
    }

    fn post_load(&mut self, bytes_copied: usize) {
        match self {
            Self::Split(p) => p.post_load(bytes_copied),
            Self::Pull(p) => p.post_load(bytes_copied),
        }
    }

    fn frame_len(&self) -> usize {
        match self {
            Self::Split(p) => p.frame_len(),
            Self::Pull(p) => p.frame_len(),
        }
    }

    fn frames_sent(&self) -> u32 {
        match self {
            Self::Split(p) => p.frames_sent(),
            Self::Pull(p) => p.frames_sent(),
        }
    }

    fn monitor(&self) -> TxMonitor<'_> {
        match self {
            Self::Split(p) => p.monitor(),
            Self::Pull(p) => p.monitor(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SigGenConfig;

    fn assembler() -> FrameAssembler {
        let ch1 = Oscillator::new(&SigGenConfig::default()).unwrap();
        let ch2 = Oscillator::new(&SigGenConfig::default()).unwrap();
        FrameAssembler::new(ch1, ch2).unwrap()
    }

    #[test]
    fn test_split_arms_on_creation() {
        let fault = FaultState::new();
        let log = LogStream::new();
        let p = SplitProvider::new(assembler(), TxMonitor::new(&fault, &log));
        assert!(p.is_armed());
        assert_eq!(p.assembler().frames_produced(), 1);
    }

    #[test]
    fn test_pull_has_no_lookahead() {
        let fault = FaultState::new();
        let log = LogStream::new();
        let mut p = PullProvider::new(assembler(), TxMonitor::new(&fault, &log));
        assert_eq!(p.assembler().frames_produced(), 0);
        p.pre_load();
        assert_eq!(p.assembler().frames_produced(), 1);
    }
}
