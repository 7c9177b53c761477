// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod address;
pub mod cancel;
pub mod command;
pub mod config;
pub mod error;
pub mod hal_traits;
pub mod response;
pub mod timing;

// --- Re-export key types/traits/functions for easier access ---

// From address.rs
pub use address::EzoAddr;

// From cancel.rs
pub use cancel::CancelToken;

// From command.rs
pub use command::{CalibrationPoint, Command, CommandTable, Operation, Wire};

// From config.rs
pub use config::DriverConfig;

// From error.rs
pub use error::{DecodeError, PhEzoError, ValidationError};

// From hal_traits.rs
pub use hal_traits::{BusTransport, I2cTransport};

// From response/mod.rs
pub use response::{InfoString, PhValue, Reply, ResponseCode};

// From timing.rs
pub use timing::{DelayClass, Timing};
