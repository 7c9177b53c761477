// src/common/error.rs

use super::command::CalibrationPoint;

/// Errors returned by every [`PhEzo`](crate::driver::PhEzo) operation.
///
/// The variants carry different recovery meanings: fix the call
/// (`Validation`), check the wiring and retry later (`Transport`), wait longer
/// before retrying (`Protocol`), or treat the chip as faulty (`Decode`).
#[derive(Debug, thiserror::Error)]
pub enum PhEzoError<E = ()>
where
    E: core::fmt::Debug,
{
    /// The request was rejected locally; nothing was sent on the bus.
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    /// Underlying I/O error from the bus transport.
    #[error("bus transport error: {0:?}")]
    Transport(E),

    /// The chip answered with a status other than success.
    /// `status` is the raw first reply byte.
    #[error("device reported status {status:#04x}")]
    Protocol { status: u8 },

    /// The chip reported success but the payload was malformed.
    #[error("malformed reply payload: {0}")]
    Decode(#[from] DecodeError),

    /// The handle was closed before or while the operation ran.
    #[error("sensor handle closed")]
    Closed,
}

impl<E: core::fmt::Debug> PhEzoError<E> {
    /// Raw status byte for protocol failures.
    pub fn status(&self) -> Option<u8> {
        match self {
            PhEzoError::Protocol { status } => Some(*status),
            _ => None,
        }
    }
}

/// A malformed request detected before touching the bus.
#[derive(Debug, Copy, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Address falls inside a reserved I²C range.
    #[error("address {0:#04x} is not a usable 7-bit I2C address")]
    InvalidAddress(u8),

    /// Low/mid/high calibration needs a reference value.
    #[error("calibration point {0:?} requires a reference value")]
    MissingReference(CalibrationPoint),

    /// Clear takes no reference value.
    #[error("calibration point {0:?} does not take a reference value")]
    UnexpectedReference(CalibrationPoint),

    /// `Query` is read through `calibration_query`, not applied.
    #[error("calibration point {0:?} cannot be applied")]
    NotApplicable(CalibrationPoint),

    /// Reference outside the pH scale, or not a finite number.
    #[error("reference value {0} is outside the 0-14 pH scale")]
    ReferenceOutOfRange(f32),

    /// Compensation temperature is NaN or infinite.
    #[error("temperature {0} is not a finite number")]
    NonFiniteTemperature(f32),

    /// Encoded command does not fit the frame buffer.
    #[error("command does not fit in the frame buffer")]
    CommandTooLong,
}

/// A reply whose status was success but whose payload could not be used.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum DecodeError {
    /// Not even a status byte came back.
    #[error("reply is empty")]
    EmptyReply,

    /// A value was expected but the payload is blank.
    #[error("reply payload is empty")]
    EmptyPayload,

    /// Payload is not valid UTF-8 text.
    #[error("reply payload is not valid text")]
    InvalidText,

    /// Payload text is not a number.
    #[error("reply payload is not a number")]
    InvalidNumber,

    /// Payload text does not fit the result buffer.
    #[error("reply payload longer than {capacity} bytes")]
    TooLong { capacity: usize },
}

impl From<core::str::Utf8Error> for DecodeError {
    fn from(_: core::str::Utf8Error) -> Self {
        DecodeError::InvalidText
    }
}

impl From<core::num::ParseFloatError> for DecodeError {
    fn from(_: core::num::ParseFloatError) -> Self {
        DecodeError::InvalidNumber
    }
}

impl From<core::num::ParseIntError> for DecodeError {
    fn from(_: core::num::ParseIntError) -> Self {
        DecodeError::InvalidNumber
    }
}
