//! 6522 Versatile Interface Adaptor.
//!
//! Register storage only: the port, direction, control and interrupt
//! registers latch what is written; the timer registers read back 0 and
//! never count. The VIA never requests an interrupt.

use super::Device;

/// Number of VIA registers.
pub const VIA_REGISTERS: u32 = 16;

const REG_PORT_B: usize = 0x0;
const REG_PORT_A: usize = 0x1;
const REG_DDR_B: usize = 0x2;
const REG_DDR_A: usize = 0x3;
const REG_PCR: usize = 0xC;
const REG_IFR: usize = 0xD;
const REG_IER: usize = 0xE;
const REG_PORT_A_NH: usize = 0xF;

/// VIA register file mapped at `base`.
///
/// # Examples
///
/// ```rust
/// use pet6502::{Device, Via};
///
/// let mut via = Via::new(0xE840);
/// via.write(0xE84C, 0x02);
///
/// assert_eq!(via.read(0xE84C), 0x02);
/// assert_eq!(via.cb2(), 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct Via {
    base: u16,
    port_a: u8,
    port_b: u8,
    ddr_a: u8,
    ddr_b: u8,
    peripheral: u8,
    ifr: u8,
    ier: u8,
}

impl Via {
    pub fn new(base: u16) -> Self {
        Self {
            base,
            ..Self::default()
        }
    }

    /// State of the CB2 line: bit 1 of the peripheral control register.
    ///
    /// On the PET this selects the character set.
    pub fn cb2(&self) -> u8 {
        (self.peripheral & 0x02) >> 1
    }
}

impl Device for Via {
    fn base(&self) -> u16 {
        self.base
    }

    fn size(&self) -> u32 {
        VIA_REGISTERS
    }

    fn read(&self, address: u16) -> u8 {
        match address.wrapping_sub(self.base) as usize {
            REG_PORT_B => self.port_b,
            REG_PORT_A | REG_PORT_A_NH => self.port_a,
            REG_DDR_B => self.ddr_b,
            REG_DDR_A => self.ddr_a,
            REG_PCR => self.peripheral,
            REG_IFR => self.ifr,
            REG_IER => self.ier,
            _ => 0,
        }
    }

    fn write(&mut self, address: u16, value: u8) {
        match address.wrapping_sub(self.base) as usize {
            REG_PORT_B => self.port_b = value,
            REG_PORT_A | REG_PORT_A_NH => self.port_a = value,
            REG_DDR_B => self.ddr_b = value,
            REG_DDR_A => self.ddr_a = value,
            REG_PCR => self.peripheral = value,
            REG_IFR => self.ifr = value,
            REG_IER => self.ier = value,
            _ => {}
        }
    }
}
