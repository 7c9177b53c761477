// src/lib.rs

//! Driver for the Atlas Scientific EZO pH stamp on a shared I²C bus.
//!
//! Every operation is one self-contained transaction: the command is encoded
//! from an immutable table, written to the chip, the chip's processing or
//! settle delay is waited out, and the reply is read back and decoded. The
//! leading status byte of every reply is checked before any payload is used.
//!
//! ```ignore
//! use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
//! use ph_ezo::{DriverConfig, I2cTransport, PhEzo};
//!
//! let sensor: PhEzo<CriticalSectionRawMutex, _, _> =
//!     PhEzo::new(I2cTransport::new(i2c_device), delay, DriverConfig::default());
//! let ph = sensor.read()?;
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod common;
pub mod driver;

// Re-export key types for convenience
pub use common::{
    CalibrationPoint, CancelToken, DecodeError, DriverConfig, EzoAddr, InfoString,
    PhEzoError, PhValue, ResponseCode, Timing, ValidationError,
};
pub use common::hal_traits::{BusTransport, I2cTransport};
pub use driver::PhEzo;
