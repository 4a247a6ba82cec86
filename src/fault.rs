//! Transmit-contract fault tracking.
//!
//! The transport owns deadlines; the generator only detects callbacks
//! arriving out of the expected order or with unexpected sizes. Faults
//! are recorded here (atomically, from the USB task) and reported by
//! the main loop.

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

/// Fault codes for the transmit contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FaultCode {
    /// No fault (normal operation).
    None = 0,

    /// `pre_load` arrived twice with no `post_load` between them.
    /// Data: frames sent so far.
    MissedPostLoad = 1,

    /// Transport copied fewer bytes than the frame holds.
    /// Data: bytes copied.
    ShortTransfer = 2,

    /// `fill` destination smaller than one frame.
    /// Data: destination capacity.
    UndersizedBuffer = 3,
}

impl FaultCode {
    /// Convert from raw u8 value.
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => FaultCode::MissedPostLoad,
            2 => FaultCode::ShortTransfer,
            3 => FaultCode::UndersizedBuffer,
            _ => FaultCode::None,
        }
    }
}

/// Thread-safe fault state.
///
/// Written from the transport callback context, read by the main loop.
pub struct FaultState {
    active: AtomicBool,
    code: AtomicU8,
    /// Code-specific detail (see [`FaultCode`]).
    data: AtomicU32,
    /// Total fault count since boot (never cleared).
    count: AtomicU32,
}

impl FaultState {
    pub const fn new() -> Self {
        Self {
            active: AtomicBool::new(false),
            code: AtomicU8::new(0),
            data: AtomicU32::new(0),
            count: AtomicU32::new(0),
        }
    }

    /// Record a fault and bump the counter.
    #[inline]
    pub fn set(&self, code: FaultCode, data: u32) {
        self.code.store(code as u8, Ordering::Release);
        self.data.store(data, Ordering::Release);
        self.count.fetch_add(1, Ordering::Relaxed);
        self.active.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Most recent fault code (only meaningful while active).
    #[inline]
    pub fn code(&self) -> FaultCode {
        FaultCode::from_u8(self.code.load(Ordering::Acquire))
    }

    #[inline]
    pub fn data(&self) -> u32 {
        self.data.load(Ordering::Acquire)
    }

    #[inline]
    pub fn count(&self) -> u32 {
        self.count.load(Ordering::Relaxed)
    }

    /// Clear the active flag. The counter is kept for diagnostics.
    #[inline]
    pub fn clear(&self) {
        self.active.store(false, Ordering::Release);
    }

    #[inline]
    pub fn snapshot(&self) -> FaultSnapshot {
        FaultSnapshot {
            active: self.is_active(),
            code: self.code(),
            data: self.data(),
            count: self.count(),
        }
    }
}

impl Default for FaultState {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of fault state at a point in time.
#[derive(Clone, Copy, Debug)]
pub struct FaultSnapshot {
    pub active: bool,
    pub code: FaultCode,
    pub data: u32,
    pub count: u32,
}
