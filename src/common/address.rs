// src/common/address.rs

use super::error::ValidationError;
use core::convert::TryFrom;
use core::fmt;

/// 7-bit I²C address of an EZO stamp.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct EzoAddr(u8);

impl EzoAddr {
    /// Factory address of the pH stamp (decimal 99).
    pub const DEFAULT_ADDRESS: EzoAddr = EzoAddr(0x63);

    /// Lowest non-reserved 7-bit address.
    pub const MIN: u8 = 0x08;
    /// Highest non-reserved 7-bit address.
    pub const MAX: u8 = 0x77;

    /// Creates a new `EzoAddr` if `address` is outside the reserved I²C ranges.
    pub fn new(address: u8) -> Result<Self, ValidationError> {
        if Self::is_valid_address(address) {
            Ok(EzoAddr(address))
        } else {
            Err(ValidationError::InvalidAddress(address))
        }
    }

    #[inline]
    pub const fn get(&self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_valid_address(address: u8) -> bool {
        address >= Self::MIN && address <= Self::MAX
    }
}

impl Default for EzoAddr {
    fn default() -> Self {
        Self::DEFAULT_ADDRESS
    }
}

impl TryFrom<u8> for EzoAddr {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EzoAddr> for u8 {
    fn from(value: EzoAddr) -> Self {
        value.0
    }
}

impl fmt::Display for EzoAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}
