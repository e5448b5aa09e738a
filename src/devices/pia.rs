//! 6520 Peripheral Interface Adaptor.
//!
//! The PIA occupies four registers. What the ports mean depends on what is
//! wired to them, so register accesses are forwarded to a `PortHandler`
//! supplied by the machine.

use super::Device;

/// Number of PIA registers.
pub const PIA_PORTS: usize = 4;

/// Behavior behind the four PIA registers.
pub trait PortHandler {
    /// Reads register `port` (0-3).
    fn port_read(&self, port: usize) -> u8;

    /// Writes register `port` (0-3).
    fn port_write(&mut self, port: usize, value: u8);

    /// Returns true if the handler is asserting IRQ.
    fn irq(&mut self) -> bool {
        false
    }
}

/// Plain register latch: reads return the last value written.
#[derive(Debug, Default, Clone)]
pub struct PortLatch {
    ports: [u8; PIA_PORTS],
}

impl PortHandler for PortLatch {
    fn port_read(&self, port: usize) -> u8 {
        self.ports[port]
    }

    fn port_write(&mut self, port: usize, value: u8) {
        self.ports[port] = value;
    }
}

/// A PIA mapped at `base`, forwarding to handler `H`.
///
/// # Examples
///
/// ```rust
/// use pet6502::{Device, Pia, PortLatch};
///
/// let mut pia = Pia::new(0xE820, PortLatch::default());
/// pia.write(0xE822, 0x7F);
///
/// assert_eq!(pia.read(0xE822), 0x7F);
/// assert_eq!(pia.size(), 4);
/// assert!(!pia.check_interrupt());
/// ```
pub struct Pia<H: PortHandler> {
    base: u16,
    handler: H,
}

impl<H: PortHandler> Pia<H> {
    pub fn new(base: u16, handler: H) -> Self {
        Self { base, handler }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    fn port(&self, address: u16) -> Option<usize> {
        let port = address.wrapping_sub(self.base) as usize;
        (port < PIA_PORTS).then_some(port)
    }
}

impl<H: PortHandler> Device for Pia<H> {
    fn base(&self) -> u16 {
        self.base
    }

    fn size(&self) -> u32 {
        PIA_PORTS as u32
    }

    fn read(&self, address: u16) -> u8 {
        match self.port(address) {
            Some(port) => self.handler.port_read(port),
            None => 0,
        }
    }

    fn write(&mut self, address: u16, value: u8) {
        if let Some(port) = self.port(address) {
            self.handler.port_write(port, value);
        }
    }

    fn check_interrupt(&mut self) -> bool {
        self.handler.irq()
    }
}
