// src/common/timing.rs

use core::time::Duration;

// The chip gives no "not ready" handshake: reading before its internal
// window closes returns stale or partial data. These are the minimum waits
// between the end of a command write and the start of the reply read.

/// Wait after a measurement read (`R`) or compensation query (`T`).
pub const PROCESSING_DELAY: Duration = Duration::from_micros(900);

/// Wait after commands that make the chip compute or change mode:
/// calibration, status, info, find, LED, sleep, slope, compensation.
pub const SETTLE_DELAY: Duration = Duration::from_millis(300);

/// Which of the two delays a command needs before its reply is readable.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DelayClass {
    Processing,
    Settle,
}

/// Delay durations used by a driver instance.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Timing {
    pub processing: Duration,
    pub settle: Duration,
}

impl Timing {
    pub const fn new(processing: Duration, settle: Duration) -> Self {
        Self { processing, settle }
    }

    /// Duration to wait for `class`.
    pub const fn delay_for(&self, class: DelayClass) -> Duration {
        match class {
            DelayClass::Processing => self.processing,
            DelayClass::Settle => self.settle,
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::new(PROCESSING_DELAY, SETTLE_DELAY)
    }
}

/// Splits a duration into whole microseconds for `DelayNs::delay_us`,
/// rounding up so the wait is never shorter than requested.
pub(crate) fn as_delay_us(duration: Duration) -> u32 {
    let mut micros = duration.as_micros();
    if duration.subsec_nanos() % 1_000 != 0 {
        micros += 1;
    }
    u32::try_from(micros).unwrap_or(u32::MAX)
}
