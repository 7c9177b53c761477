// src/driver/sync_driver/mock.rs

//! Recording bus and delay mocks shared by the driver tests.

use std::collections::HashMap;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};
use std::time::Duration;

use embedded_hal::delay::DelayNs;

use crate::common::hal_traits::BusTransport;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum MockBusError {
    Nack,
    ArbitrationLoss,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Event {
    Write(Vec<u8>),
    Delay { us: u32 },
    ReadByte,
    Read { len: usize },
}

#[derive(Default)]
struct State {
    events: Vec<(ThreadId, Event)>,
    replies: HashMap<Vec<u8>, Vec<u8>>,
    fallback: Option<Vec<u8>>,
    /// Reply the chip is holding, set by a write and drained by a read.
    pending: Option<Vec<u8>>,
    fail_writes: bool,
    fail_reads: bool,
    delayed_us: u64,
}

/// Handle for staging replies and inspecting what the driver did.
#[derive(Clone, Default)]
pub(crate) struct Recorder {
    state: Arc<Mutex<State>>,
}

impl Recorder {
    fn with<T>(&self, f: impl FnOnce(&mut State) -> T) -> T {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    /// Reply returned after `command` is written.
    pub(crate) fn stage(&self, command: &[u8], reply: &[u8]) {
        self.with(|s| s.replies.insert(command.to_vec(), reply.to_vec()));
    }

    /// Reply returned after any command without a staged reply.
    pub(crate) fn stage_any(&self, reply: &[u8]) {
        self.with(|s| s.fallback = Some(reply.to_vec()));
    }

    pub(crate) fn fail_writes(&self) {
        self.with(|s| s.fail_writes = true);
    }

    pub(crate) fn fail_reads(&self) {
        self.with(|s| s.fail_reads = true);
    }

    pub(crate) fn events(&self) -> Vec<Event> {
        self.with(|s| s.events.iter().map(|(_, e)| e.clone()).collect())
    }

    pub(crate) fn events_by_thread(&self) -> Vec<(ThreadId, Event)> {
        self.with(|s| s.events.clone())
    }

    pub(crate) fn writes(&self) -> usize {
        self.with(|s| s.events.iter().filter(|(_, e)| matches!(e, Event::Write(_))).count())
    }

    pub(crate) fn delayed(&self) -> Duration {
        self.with(|s| Duration::from_micros(s.delayed_us))
    }

    pub(crate) fn has_pending_reply(&self) -> bool {
        self.with(|s| s.pending.is_some())
    }

    fn record(&self, event: Event) {
        self.with(|s| s.events.push((thread::current().id(), event)));
    }
}

/// A chip that answers each written command with its staged reply.
pub(crate) struct MockBus {
    recorder: Recorder,
    address: Option<u8>,
}

impl MockBus {
    pub(crate) fn new() -> (Self, Recorder) {
        let recorder = Recorder::default();
        (MockBus { recorder: recorder.clone(), address: None }, recorder)
    }

    fn accept_write(&mut self, address: u8, bytes: &[u8]) -> Result<(), MockBusError> {
        self.check_address(address);
        let recorder = &self.recorder;
        if recorder.with(|s| s.fail_writes) {
            return Err(MockBusError::Nack);
        }
        recorder.with(|s| {
            let reply = s.replies.get(bytes).cloned().or_else(|| s.fallback.clone());
            s.pending = reply;
        });
        recorder.record(Event::Write(bytes.to_vec()));
        Ok(())
    }

    /// Reply bytes, NUL padded to `len`. Reading with nothing pending
    /// yields zeros, like a chip whose buffer was never filled.
    fn take_reply(&mut self, len: usize) -> Result<Vec<u8>, MockBusError> {
        if self.recorder.with(|s| s.fail_reads) {
            return Err(MockBusError::ArbitrationLoss);
        }
        let mut out = self.recorder.with(|s| s.pending.take()).unwrap_or_default();
        out.resize(len, 0);
        Ok(out)
    }

    fn check_address(&mut self, address: u8) {
        match self.address {
            None => self.address = Some(address),
            Some(bound) => assert_eq!(bound, address, "driver changed device address"),
        }
    }
}

impl BusTransport for MockBus {
    type Error = MockBusError;

    fn write_byte(&mut self, address: u8, byte: u8) -> Result<(), Self::Error> {
        self.accept_write(address, &[byte])
    }

    fn write_bytes(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        self.accept_write(address, bytes)
    }

    fn read_byte(&mut self, address: u8) -> Result<u8, Self::Error> {
        self.check_address(address);
        let reply = self.take_reply(1)?;
        self.recorder.record(Event::ReadByte);
        Ok(reply[0])
    }

    fn read_bytes(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
        self.check_address(address);
        let reply = self.take_reply(buffer.len())?;
        buffer.copy_from_slice(&reply);
        self.recorder.record(Event::Read { len: buffer.len() });
        Ok(())
    }
}

/// Delay that returns at once but records how long it was asked to wait.
///
/// `notify` fires on entry; `sleep` makes the delay real so another thread
/// can act while it is in progress.
pub(crate) struct MockDelay {
    recorder: Recorder,
    notify: Option<Sender<()>>,
    sleep: Option<Duration>,
}

impl MockDelay {
    pub(crate) fn new(recorder: Recorder) -> Self {
        MockDelay { recorder, notify: None, sleep: None }
    }

    pub(crate) fn notifying(mut self, tx: Sender<()>) -> Self {
        self.notify = Some(tx);
        self
    }

    pub(crate) fn sleeping(mut self, sleep: Duration) -> Self {
        self.sleep = Some(sleep);
        self
    }

    fn wait(&mut self, us: u32) {
        if let Some(tx) = &self.notify {
            let _ = tx.send(());
        }
        if let Some(sleep) = self.sleep {
            thread::sleep(sleep);
        }
        self.recorder.with(|s| s.delayed_us += u64::from(us));
        self.recorder.record(Event::Delay { us });
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.wait(ns.div_ceil(1_000));
    }

    fn delay_us(&mut self, us: u32) {
        self.wait(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.wait(ms.saturating_mul(1_000));
    }
}
