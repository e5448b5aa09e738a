//! Memory-mapped device support for the 6502 emulator.
//!
//! This module provides the address-space dispatcher that lets multiple
//! hardware devices (RAM, ROM, PIA, VIA) share the 6502 memory bus.
//!
//! # Architecture
//!
//! - **Device trait**: interface for memory-mapped hardware components
//! - **Bus**: routes reads/writes to mapped devices and ORs their IRQ lines
//! - **Device implementations**: RAM, ROM, PIA (6520) and VIA (6522)
//!
//! # Routing rules
//!
//! - Devices mapped later take priority: `map` inserts at the front.
//! - A read is serviced by the first device whose range contains the
//!   address; an unclaimed read returns 0 (open bus).
//! - A write goes to **every** device whose range contains the address; an
//!   unclaimed write is dropped.
//!
//! # Example
//!
//! ```rust
//! use pet6502::{Bus, MemoryBus, Ram, Rom, CPU};
//!
//! let mut bus = Bus::new();
//!
//! // 16KB RAM at 0x0000-0x3FFF
//! bus.map(Box::new(Ram::new(0x0000, 0x4000)));
//!
//! // 16KB ROM at 0xC000-0xFFFF with the reset vector pointing at 0xC000
//! let mut rom = Rom::new(0xC000, 0x4000);
//! let mut image = vec![0xEA; 0x4000];
//! image[0x3FFC] = 0x00;
//! image[0x3FFD] = 0xC0;
//! rom.load_bytes(&image).unwrap();
//! bus.map(Box::new(rom));
//!
//! let cpu = CPU::new(bus);
//! assert_eq!(cpu.pc(), 0xC000);
//! assert_eq!(cpu.memory().read(0x8000), 0x00); // open bus
//! ```

use crate::MemoryBus;
use log::trace;
use std::cell::RefCell;
use std::rc::Rc;

pub mod pia;
pub mod ram;
pub mod rom;
pub mod via;

pub use pia::{Pia, PortHandler, PortLatch};
pub use ram::Ram;
pub use rom::Rom;
pub use via::Via;

/// Interface for memory-mapped hardware devices.
///
/// A device occupies `[base, base + size - 1]`. `read` and `write` receive the
/// absolute bus address, so a device subtracts its own base.
///
/// # Examples
///
/// ```rust
/// use pet6502::Device;
///
/// struct Latch {
///     value: u8,
/// }
///
/// impl Device for Latch {
///     fn base(&self) -> u16 {
///         0xE800
///     }
///
///     fn size(&self) -> u32 {
///         1
///     }
///
///     fn read(&self, _address: u16) -> u8 {
///         self.value
///     }
///
///     fn write(&mut self, _address: u16, value: u8) {
///         self.value = value;
///     }
/// }
/// ```
pub trait Device {
    /// First bus address claimed by the device.
    fn base(&self) -> u16;

    /// Number of bytes claimed. A `u32` so a device can span all 64 KiB.
    fn size(&self) -> u32;

    /// Reads the byte at absolute `address`.
    fn read(&self, address: u16) -> u8;

    /// Writes `value` at absolute `address`.
    fn write(&mut self, address: u16, value: u8);

    /// Returns true if the device is asserting IRQ.
    ///
    /// May clear edge-triggered request state as a side effect.
    fn check_interrupt(&mut self) -> bool {
        false
    }

    /// Returns true if `address` falls inside the device's range.
    fn contains(&self, address: u16) -> bool {
        let base = self.base() as u32;
        let address = address as u32;
        address >= base && address < base + self.size()
    }
}

/// Shared handle to a device, so the machine can keep a reference to a
/// device after handing it to the bus.
impl<D: Device + ?Sized> Device for Rc<RefCell<D>> {
    fn base(&self) -> u16 {
        self.borrow().base()
    }

    fn size(&self) -> u32 {
        self.borrow().size()
    }

    fn read(&self, address: u16) -> u8 {
        self.borrow().read(address)
    }

    fn write(&mut self, address: u16, value: u8) {
        self.borrow_mut().write(address, value)
    }

    fn check_interrupt(&mut self) -> bool {
        self.borrow_mut().check_interrupt()
    }
}

/// Address-space dispatcher over an ordered list of devices.
///
/// # Examples
///
/// ```rust
/// use pet6502::{Bus, MemoryBus, Ram};
///
/// let mut bus = Bus::new();
/// bus.map(Box::new(Ram::new(0x0000, 0x1000)));
///
/// bus.write(0x0123, 0x42);
/// assert_eq!(bus.read(0x0123), 0x42);
///
/// // Nothing claims 0x2000
/// bus.write(0x2000, 0x99);
/// assert_eq!(bus.read(0x2000), 0x00);
/// ```
pub struct Bus {
    devices: Vec<Box<dyn Device>>,
}

impl Bus {
    /// Creates a bus with no devices.
    pub fn new() -> Self {
        Self {
            devices: Vec::new(),
        }
    }

    /// Maps a device with priority over everything mapped before it.
    pub fn map(&mut self, device: Box<dyn Device>) {
        trace!(
            "map device at ${:04x} (size {} bytes)",
            device.base(),
            device.size()
        );
        self.devices.insert(0, device);
    }

    /// Number of mapped devices.
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Returns true if no device is mapped.
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBus for Bus {
    fn read(&self, addr: u16) -> u8 {
        match self.devices.iter().position(|d| d.contains(addr)) {
            Some(n) => {
                let device = &self.devices[n];
                trace!(
                    "read ${:04x}: selected device {} at ${:04x}",
                    addr,
                    n,
                    device.base()
                );
                device.read(addr)
            }
            None => 0,
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        for (n, device) in self.devices.iter_mut().enumerate() {
            if device.contains(addr) {
                trace!(
                    "write ${:04x}: selected device {} at ${:04x}",
                    addr,
                    n,
                    device.base()
                );
                device.write(addr, value);
            }
        }
    }

    fn check_interrupts(&mut self) -> bool {
        // Every device is polled so each gets to clear its own request
        self.devices
            .iter_mut()
            .fold(false, |irq, device| device.check_interrupt() || irq)
    }
}
