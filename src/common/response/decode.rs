// src/common/response/decode.rs

use super::{InfoString, Reply, INFO_CAPACITY};
use crate::common::error::DecodeError;
use core::str::{self, FromStr};

/// Strips a `?KEY,` echo (`?CAL,2`, `?T,25.0`) down to the value after the
/// last comma. Bare values pass through.
fn value_field(text: &str) -> &str {
    if text.starts_with('?') {
        text.rsplit(',').next().unwrap_or(text).trim()
    } else {
        text
    }
}

fn payload_str<'a>(reply: &Reply<'a>) -> Result<&'a str, DecodeError> {
    Ok(str::from_utf8(reply.payload())?)
}

/// Parses a numeric payload (`7.01`, `?T,25.0`).
pub fn decode_numeric(reply: &Reply<'_>) -> Result<f32, DecodeError> {
    let text = payload_str(reply)?;
    if text.is_empty() {
        return Err(DecodeError::EmptyPayload);
    }
    let value = f32::from_str(value_field(text))?;
    // "inf" and "NaN" parse, but the chip never reports them.
    if !value.is_finite() {
        return Err(DecodeError::InvalidNumber);
    }
    Ok(value)
}

/// Parses a small count such as the number of calibration points (`?CAL,2`).
pub fn decode_count(reply: &Reply<'_>) -> Result<u8, DecodeError> {
    let text = payload_str(reply)?;
    if text.is_empty() {
        return Err(DecodeError::EmptyPayload);
    }
    Ok(u8::from_str(value_field(text))?)
}

/// Copies an opaque text payload out of the read buffer.
pub fn decode_text(reply: &Reply<'_>) -> Result<InfoString, DecodeError> {
    let text = payload_str(reply)?;
    let mut out = InfoString::new();
    out.push_str(text)
        .map_err(|_| DecodeError::TooLong { capacity: INFO_CAPACITY })?;
    Ok(out)
}
