// src/driver/sync_driver/transaction.rs

use super::link::{backoff, Link};
use super::PhEzo;
use crate::common::{
    command::{Operation, MAX_REPLY_LEN},
    error::{DecodeError, PhEzoError},
    hal_traits::BusTransport,
    response::{Reply, ResponseCode},
};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::delay::DelayNs;
use log::{debug, warn};

impl<M, B, D> PhEzo<M, B, D>
where
    M: RawMutex,
    B: BusTransport,
    D: DelayNs,
{
    /// Runs one encode → send → wait → receive → decode cycle.
    ///
    /// Validation happens before the port is claimed, so a rejected request
    /// never reaches the bus. The port stays claimed from the write until
    /// the reply has been read; other callers on this handle wait for it.
    /// Once the command has been written the reply is always read, even if
    /// the handle is closed meanwhile; cancellation is reported only after
    /// that.
    pub(super) fn execute_transaction<T, F>(
        &self,
        op: Operation,
        decode: F,
    ) -> Result<T, PhEzoError<B::Error>>
    where
        F: FnOnce(&Reply<'_>) -> Result<T, DecodeError>,
    {
        let command = self.table.encode(&op)?;
        let wait = self.config.timing.delay_for(command.delay);
        let address = self.config.address;

        let mut buffer = [0u8; MAX_REPLY_LEN];
        let len = loop {
            // Checked on every pass so a caller queued behind a busy handle
            // gives up as soon as it is closed.
            if self.cancel.is_cancelled() {
                return Err(PhEzoError::Closed);
            }
            let attempt = self.port.try_with(|port| -> Result<usize, PhEzoError<B::Error>> {
                if self.cancel.is_cancelled() {
                    return Err(PhEzoError::Closed);
                }
                Link::new(port, address)
                    .send(&command)?
                    .settle(wait)
                    .receive(&mut buffer)
                    .map(<[u8]>::len)
            });
            match attempt {
                Some(received) => break received?,
                None => backoff(),
            }
        };

        if self.cancel.is_cancelled() {
            debug!("{}: closed during {:?}, reply discarded", address, op);
            return Err(PhEzoError::Closed);
        }

        let reply = Reply::parse::<B::Error>(&buffer[..len]).inspect_err(|e| {
            if let Some(status) = e.status() {
                warn!("{}: {} answered {:?}", address, command.wire, ResponseCode::from(status));
            }
        })?;
        let value = decode(&reply)?;
        debug!("{}: {} ok", address, command.wire);
        Ok(value)
    }
}

/// Decoder for commands answered with a bare status byte.
pub(super) fn acknowledge(_: &Reply<'_>) -> Result<(), DecodeError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{config::DriverConfig, response::decode_numeric};
    use crate::driver::sync_driver::mock::{Event, MockBus, MockBusError, MockDelay, Recorder};
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    type Sensor = PhEzo<NoopRawMutex, MockBus, MockDelay>;

    fn sensor() -> (Sensor, Recorder) {
        let (bus, recorder) = MockBus::new();
        let delay = MockDelay::new(recorder.clone());
        (PhEzo::new(bus, delay, DriverConfig::default()), recorder)
    }

    #[test]
    fn test_transaction_order() {
        let (sensor, recorder) = sensor();
        recorder.stage(b"R", b"\x016.50");

        let value = sensor.execute_transaction(Operation::Read, decode_numeric).unwrap();
        assert_eq!(value, 6.5);
        let events = recorder.events();
        assert!(matches!(events.as_slice(), [Event::Write(_), Event::Delay { .. }, Event::Read { .. }]));
    }

    #[test]
    fn test_validation_failure_never_touches_bus() {
        let (sensor, recorder) = sensor();
        let op = Operation::Compensate { celsius: f32::NAN };
        let result = sensor.execute_transaction(op, acknowledge);
        assert!(matches!(result, Err(PhEzoError::Validation(_))));
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn test_read_failure_after_send_is_transport_error() {
        let (sensor, recorder) = sensor();
        recorder.fail_reads();
        let result = sensor.execute_transaction(Operation::Read, decode_numeric);
        assert!(matches!(result, Err(PhEzoError::Transport(MockBusError::ArbitrationLoss))));
        // The delay was still honoured before the read was attempted.
        assert!(matches!(recorder.events().as_slice(), [Event::Write(_), Event::Delay { .. }]));
    }

    #[test]
    fn test_closed_before_send() {
        let (sensor, recorder) = sensor();
        sensor.close();
        let result = sensor.execute_transaction(Operation::Read, decode_numeric);
        assert!(matches!(result, Err(PhEzoError::Closed)));
        assert!(recorder.events().is_empty());
    }
}
