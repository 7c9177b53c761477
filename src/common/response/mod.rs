// src/common/response/mod.rs

mod code;
pub mod decode;

pub use code::ResponseCode;
pub use decode::{decode_count, decode_numeric, decode_text};

use super::error::{DecodeError, PhEzoError};
use core::fmt;

/// Capacity of the opaque text returned by `info`, `status` and `slope`.
pub const INFO_CAPACITY: usize = 40;

/// Opaque device text such as `?i,pH,2.16` or `P,5.00`.
pub type InfoString = heapless::String<INFO_CAPACITY>;

/// A pH reading as reported by the chip.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct PhValue(f32);

impl PhValue {
    pub fn new(value: f32) -> Self {
        Self(value)
    }

    pub fn as_f32(&self) -> f32 {
        self.0
    }
}

impl From<PhValue> for f32 {
    fn from(value: PhValue) -> Self {
        value.0
    }
}

impl fmt::Display for PhValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

/// A raw reply whose status byte has been checked.
///
/// Only constructed for a success status, so `payload` is always meaningful.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Reply<'buf> {
    payload: &'buf [u8],
}

impl<'buf> Reply<'buf> {
    /// Splits off the status byte and rejects anything but success.
    ///
    /// On a non-success status the payload bytes are not looked at.
    pub fn parse<E: fmt::Debug>(raw: &'buf [u8]) -> Result<Self, PhEzoError<E>> {
        let (&status, rest) = raw.split_first().ok_or(DecodeError::EmptyReply)?;
        if ResponseCode::from(status) != ResponseCode::Success {
            return Err(PhEzoError::Protocol { status });
        }
        Ok(Reply { payload: trim_padding(rest) })
    }

    /// Payload with the status byte, NUL padding and surrounding whitespace removed.
    pub fn payload(&self) -> &'buf [u8] {
        self.payload
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// The chip NUL-terminates its text and pads the remainder of the read.
fn trim_padding(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    bytes[..end].trim_ascii()
}
