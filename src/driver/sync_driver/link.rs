// src/driver/sync_driver/link.rs

//! Transport adapter.
//!
//! The only code that touches the bus. A transaction has to go
//! `Link::send` → `Sent::settle` → `Settled::receive`; the types make a read
//! without a preceding write and delay impossible to express.
//!
//! Exclusive use of the bus comes from [`PortSlot`]: a transaction moves the
//! port out of the slot, runs, and moves it back. The raw mutex is held only
//! for those two moves.

use core::cell::Cell;
use core::time::Duration;
use embassy_sync::blocking_mutex::{raw::RawMutex, Mutex};
use embedded_hal::delay::DelayNs;
use log::trace;

use crate::common::{
    address::EzoAddr,
    command::{Command, Wire, MAX_REPLY_LEN},
    error::PhEzoError,
    hal_traits::BusTransport,
    timing,
};

/// Bus and delay provider, lent out by a [`PortSlot`] one transaction at a time.
#[derive(Debug)]
pub(crate) struct Port<B, D> {
    pub(crate) bus: B,
    pub(crate) delay: D,
}

/// Per-handle home of the [`Port`]. Empty while a transaction owns it.
pub(crate) struct PortSlot<M: RawMutex, B, D> {
    slot: Mutex<M, Cell<Option<Port<B, D>>>>,
}

impl<M: RawMutex, B, D> PortSlot<M, B, D> {
    pub(crate) fn new(port: Port<B, D>) -> Self {
        PortSlot { slot: Mutex::new(Cell::new(Some(port))) }
    }

    /// Runs `f` with exclusive use of the port, or returns `None` at once if
    /// another transaction holds it.
    pub(crate) fn try_with<R>(&self, f: impl FnOnce(&mut Port<B, D>) -> R) -> Option<R> {
        let mut claim = Claim { home: self, port: self.slot.lock(Cell::take) };
        let port = claim.port.as_mut()?;
        Some(f(port))
    }

    pub(crate) fn into_inner(self) -> Option<Port<B, D>> {
        self.slot.into_inner().into_inner()
    }
}

/// Puts a claimed port back, also when the transaction unwinds.
struct Claim<'a, M: RawMutex, B, D> {
    home: &'a PortSlot<M, B, D>,
    port: Option<Port<B, D>>,
}

impl<M: RawMutex, B, D> Drop for Claim<'_, M, B, D> {
    fn drop(&mut self) {
        if let Some(port) = self.port.take() {
            self.home.slot.lock(|cell| cell.set(Some(port)));
        }
    }
}

/// Lets a contender wait for a held slot without hogging the core.
pub(crate) fn backoff() {
    #[cfg(any(test, feature = "std"))]
    std::thread::yield_now();
    #[cfg(not(any(test, feature = "std")))]
    core::hint::spin_loop();
}

/// Idle: nothing written yet.
pub(crate) struct Link<'a, B, D> {
    bus: &'a mut B,
    delay: &'a mut D,
    address: EzoAddr,
}

/// Command written, delay not yet waited out.
pub(crate) struct Sent<'a, B, D> {
    link: Link<'a, B, D>,
    reply_len: usize,
}

/// Delay elapsed; the reply may be read exactly once.
pub(crate) struct Settled<'a, B, D> {
    link: Link<'a, B, D>,
    reply_len: usize,
}

impl<'a, B, D> Link<'a, B, D>
where
    B: BusTransport,
    D: DelayNs,
{
    pub(crate) fn new(port: &'a mut Port<B, D>, address: EzoAddr) -> Self {
        Link { bus: &mut port.bus, delay: &mut port.delay, address }
    }

    /// Writes the command frame.
    pub(crate) fn send(self, command: &Command) -> Result<Sent<'a, B, D>, PhEzoError<B::Error>> {
        trace!("{}: -> {}", self.address, command.wire);
        let addr = self.address.get();
        match &command.wire {
            Wire::Byte(code) => self.bus.write_byte(addr, *code),
            Wire::Ascii(text) => self.bus.write_bytes(addr, text.as_bytes()),
        }
        .map_err(PhEzoError::Transport)?;

        Ok(Sent { link: self, reply_len: command.reply_len })
    }
}

impl<'a, B, D> Sent<'a, B, D>
where
    B: BusTransport,
    D: DelayNs,
{
    /// Blocks for `wait`. Never shortened.
    pub(crate) fn settle(self, wait: Duration) -> Settled<'a, B, D> {
        trace!("{}: waiting {:?}", self.link.address, wait);
        self.link.delay.delay_us(timing::as_delay_us(wait));
        Settled { link: self.link, reply_len: self.reply_len }
    }
}

impl<'a, B, D> Settled<'a, B, D>
where
    B: BusTransport,
    D: DelayNs,
{
    /// Reads the reply into `buffer` and returns the filled part.
    ///
    /// A status-only reply is a single-byte read; anything longer is one
    /// bulk read of `reply_len` bytes.
    pub(crate) fn receive<'buf>(
        self,
        buffer: &'buf mut [u8; MAX_REPLY_LEN],
    ) -> Result<&'buf [u8], PhEzoError<B::Error>> {
        let Link { bus, address, .. } = self.link;
        let len = self.reply_len.clamp(1, MAX_REPLY_LEN);
        let raw = &mut buffer[..len];

        if len == 1 {
            raw[0] = bus.read_byte(address.get()).map_err(PhEzoError::Transport)?;
        } else {
            bus.read_bytes(address.get(), raw).map_err(PhEzoError::Transport)?;
        }
        trace!("{}: <- {:02x?}", address, raw);

        Ok(raw)
    }
}
