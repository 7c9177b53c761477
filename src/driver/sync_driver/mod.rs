// src/driver/sync_driver/mod.rs

mod calibration;
mod link;
mod transaction;

#[cfg(test)]
pub(crate) mod mock;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::delay::DelayNs;

use crate::common::{
    address::EzoAddr,
    cancel::CancelToken,
    command::{CommandTable, Operation},
    config::DriverConfig,
    error::PhEzoError,
    hal_traits::BusTransport,
    response::{decode_count, decode_numeric, decode_text, InfoString, PhValue},
};
use link::{Port, PortSlot};
use transaction::acknowledge;

/// Blocking driver for one EZO pH stamp.
///
/// All operations take `&self`. Calls on one handle run one at a time; a
/// caller that finds the handle busy waits for the running transaction.
/// `M` guards only the hand-over of the bus, never the chip's delay: use
/// `CriticalSectionRawMutex` to share the handle between threads,
/// `NoopRawMutex` when it never leaves one. Handles do not wait on each
/// other. Each call blocks for the chip's delay plus bus latency.
///
/// Do not call into a handle from an interrupt that may preempt a running
/// transaction on the same handle: the interrupt would wait forever.
pub struct PhEzo<M, B, D>
where
    M: RawMutex,
    B: BusTransport,
    D: DelayNs,
{
    config: DriverConfig,
    table: CommandTable,
    cancel: CancelToken,
    port: PortSlot<M, B, D>,
}

impl<M, B, D> PhEzo<M, B, D>
where
    M: RawMutex,
    B: BusTransport,
    D: DelayNs,
{
    /// Binds a driver to the device at `config.address`.
    ///
    /// `bus` is usually a shared-bus device; the bus itself stays with the
    /// caller.
    pub fn new(bus: B, delay: D, config: DriverConfig) -> Self {
        PhEzo {
            config,
            table: CommandTable::new(),
            cancel: CancelToken::new(),
            port: PortSlot::new(Port { bus, delay }),
        }
    }

    pub fn address(&self) -> EzoAddr {
        self.config.address
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn command_table(&self) -> &CommandTable {
        &self.table
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    // --- Public Blocking Methods ---

    /// Takes a pH measurement.
    pub fn read(&self) -> Result<PhValue, PhEzoError<B::Error>> {
        self.execute_transaction(Operation::Read, decode_numeric)
            .map(PhValue::new)
    }

    /// Temperature (°C) the chip currently compensates readings for.
    pub fn temperature(&self) -> Result<f32, PhEzoError<B::Error>> {
        self.execute_transaction(Operation::Temperature, decode_numeric)
    }

    /// Sets the temperature (°C) used for compensation.
    pub fn set_temperature_compensation(&self, celsius: f32) -> Result<(), PhEzoError<B::Error>> {
        self.execute_transaction(Operation::Compensate { celsius }, acknowledge)
    }

    /// Device type and firmware version, verbatim.
    pub fn info(&self) -> Result<InfoString, PhEzoError<B::Error>> {
        self.execute_transaction(Operation::Info, decode_text)
    }

    /// Restart reason and supply voltage, verbatim.
    pub fn status(&self) -> Result<InfoString, PhEzoError<B::Error>> {
        self.execute_transaction(Operation::Status, decode_text)
    }

    /// Calibration slope against an ideal probe, verbatim.
    pub fn slope(&self) -> Result<InfoString, PhEzoError<B::Error>> {
        self.execute_transaction(Operation::Slope, decode_text)
    }

    /// Number of calibration points the chip holds.
    pub fn calibration_query(&self) -> Result<u8, PhEzoError<B::Error>> {
        self.execute_transaction(Operation::CalibrationQuery, decode_count)
    }

    /// Blinks the indicator LED so the device can be found.
    pub fn find(&self) -> Result<(), PhEzoError<B::Error>> {
        self.execute_transaction(Operation::Find, acknowledge)
    }

    /// Turns the indicator LED on or off.
    pub fn led(&self, on: bool) -> Result<(), PhEzoError<B::Error>> {
        self.execute_transaction(Operation::Led { on }, acknowledge)
    }

    /// Puts the chip into low-power mode. The next command wakes it.
    ///
    /// The status byte is still read after the settle delay, and that read
    /// is itself bus traffic that may wake the chip again.
    pub fn sleep(&self) -> Result<(), PhEzoError<B::Error>> {
        self.execute_transaction(Operation::Sleep, acknowledge)
    }

    // --- Lifecycle ---

    /// Marks the handle closed. Idempotent.
    ///
    /// Operations that have not written their command yet return
    /// [`PhEzoError::Closed`] without touching the bus. One that already
    /// wrote finishes its delay and read first, then returns `Closed`.
    pub fn close(&self) {
        if self.cancel.cancel() {
            log::debug!("{}: closed", self.config.address);
        }
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Consumes the driver and returns the transport and delay provider.
    pub fn release(self) -> (B, D) {
        match self.port.into_inner() {
            Some(Port { bus, delay }) => (bus, delay),
            // Transactions borrow `self`, so none can still hold the port.
            None => unreachable!("port not returned to its slot"),
        }
    }
}

impl<M, B, D> core::fmt::Debug for PhEzo<M, B, D>
where
    M: RawMutex,
    B: BusTransport,
    D: DelayNs,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PhEzo")
            .field("config", &self.config)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}
