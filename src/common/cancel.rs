// src/common/cancel.rs

use core::sync::atomic::{AtomicBool, Ordering};

/// One-shot cancellation flag owned by a sensor handle.
///
/// Once cancelled it stays cancelled; cancelling again is a no-op.
#[derive(Debug, Default)]
pub struct CancelToken {
    cancelled: AtomicBool,
}

impl CancelToken {
    pub const fn new() -> Self {
        Self { cancelled: AtomicBool::new(false) }
    }

    /// Sets the flag. Returns `true` if it was not set before.
    ///
    /// Plain load and store, so targets without atomic read-modify-write
    /// (`thumbv6m`) are supported. Two racing calls may both return `true`.
    pub fn cancel(&self) -> bool {
        let first = !self.cancelled.load(Ordering::Acquire);
        self.cancelled.store(true, Ordering::Release);
        first
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
