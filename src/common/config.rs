// src/common/config.rs

use super::address::EzoAddr;
use super::timing::Timing;
use core::time::Duration;

/// Settings fixed for the lifetime of a [`PhEzo`](crate::driver::PhEzo).
///
/// The defaults match a factory-fresh stamp: address `0x63`, 900 µs
/// processing delay and 300 ms settle delay. Firmware revisions that need
/// longer waits can raise either delay here.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct DriverConfig {
    pub address: EzoAddr,
    pub timing: Timing,
}

impl DriverConfig {
    pub const fn new(address: EzoAddr, timing: Timing) -> Self {
        Self { address, timing }
    }

    pub const fn with_address(mut self, address: EzoAddr) -> Self {
        self.address = address;
        self
    }

    pub const fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    pub const fn with_processing_delay(mut self, delay: Duration) -> Self {
        self.timing.processing = delay;
        self
    }

    pub const fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.timing.settle = delay;
        self
    }
}
