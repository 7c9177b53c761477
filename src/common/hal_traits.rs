// src/common/hal_traits.rs

use core::fmt::Debug;
use embedded_hal::i2c::I2c;

/// Byte-level access to a device on a shared bus.
///
/// The driver never arbitrates the bus through this trait; sharing is the
/// implementor's business (e.g. an `embedded-hal-bus` device). Every call
/// addresses the device explicitly.
pub trait BusTransport {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Writes a single command byte.
    fn write_byte(&mut self, address: u8, byte: u8) -> Result<(), Self::Error>;

    /// Writes a multi-byte command frame in one transfer.
    fn write_bytes(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Reads one byte.
    fn read_byte(&mut self, address: u8) -> Result<u8, Self::Error>;

    /// Fills `buffer` from the device's current reply position.
    ///
    /// No register byte is written first: on the EZO a write would be taken
    /// as a new command.
    fn read_bytes(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), Self::Error>;
}

/// Adapts any `embedded_hal::i2c::I2c` to [`BusTransport`].
///
/// Wrap a shared-bus device (`RefCellDevice`, `CriticalSectionDevice`, ...)
/// when other drivers use the same bus.
#[derive(Debug)]
pub struct I2cTransport<I2C> {
    i2c: I2C,
}

impl<I2C: I2c> I2cTransport<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Hands back the wrapped device.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> BusTransport for I2cTransport<I2C> {
    type Error = I2C::Error;

    fn write_byte(&mut self, address: u8, byte: u8) -> Result<(), Self::Error> {
        self.i2c.write(address, &[byte])
    }

    fn write_bytes(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        self.i2c.write(address, bytes)
    }

    fn read_byte(&mut self, address: u8) -> Result<u8, Self::Error> {
        let mut buf = [0u8; 1];
        self.i2c.read(address, &mut buf)?;
        Ok(buf[0])
    }

    fn read_bytes(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c.read(address, buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_bus::i2c::RefCellDevice;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};

    const ADDR: u8 = 0x63;

    #[test]
    fn test_primitives_map_to_plain_i2c_transfers() {
        let expectations = [
            Transaction::write(ADDR, vec![b'R']),
            Transaction::write(ADDR, b"Cal,mid,7.00".to_vec()),
            Transaction::read(ADDR, vec![0x01]),
            Transaction::read(ADDR, vec![0x01, b'7', b'.', b'0', b'0', 0x00]),
        ];
        let mut transport = I2cTransport::new(I2cMock::new(&expectations));

        transport.write_byte(ADDR, b'R').unwrap();
        transport.write_bytes(ADDR, b"Cal,mid,7.00").unwrap();
        assert_eq!(transport.read_byte(ADDR).unwrap(), 0x01);
        let mut buf = [0u8; 6];
        transport.read_bytes(ADDR, &mut buf).unwrap();
        assert_eq!(&buf, b"\x017.00\0");

        transport.release().done();
    }

    #[test]
    fn test_bus_errors_pass_through() {
        let expectations = [Transaction::write(ADDR, vec![b'i']).with_error(ErrorKind::Other)];
        let mut transport = I2cTransport::new(I2cMock::new(&expectations));

        assert_eq!(transport.write_byte(ADDR, b'i'), Err(ErrorKind::Other));
        transport.release().done();
    }

    #[test]
    fn test_shared_bus_device() {
        let expectations = [
            Transaction::write(ADDR, vec![b'R']),
            Transaction::read(ADDR, vec![0x01, b'4']),
        ];
        let bus = RefCell::new(I2cMock::new(&expectations));
        {
            let mut transport = I2cTransport::new(RefCellDevice::new(&bus));
            transport.write_byte(ADDR, b'R').unwrap();
            let mut buf = [0u8; 2];
            transport.read_bytes(ADDR, &mut buf).unwrap();
            assert_eq!(buf, [0x01, b'4']);
        }
        bus.into_inner().done();
    }
}
