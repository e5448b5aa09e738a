//! # Register File
//!
//! The 6502 programmer-visible state: accumulator, two index registers,
//! stack pointer, program counter and the processor status flags.
//!
//! All register arithmetic wraps silently: 8-bit registers modulo 256 and the
//! program counter modulo 65536.

/// Carry flag bit in the packed status byte.
pub const FLAG_C: u8 = 0b0000_0001;
/// Zero flag bit.
pub const FLAG_Z: u8 = 0b0000_0010;
/// Interrupt disable flag bit.
pub const FLAG_I: u8 = 0b0000_0100;
/// Decimal mode flag bit.
pub const FLAG_D: u8 = 0b0000_1000;
/// Break flag bit.
pub const FLAG_B: u8 = 0b0001_0000;
/// Unused bit, always set when packing.
pub const FLAG_UNUSED: u8 = 0b0010_0000;
/// Overflow flag bit.
pub const FLAG_V: u8 = 0b0100_0000;
/// Negative flag bit.
pub const FLAG_N: u8 = 0b1000_0000;

/// Processor status flags.
///
/// # Packing
///
/// `to_byte` and `set_byte` use the NV-BDIZC layout:
///
/// - Bit 7: N (Negative)
/// - Bit 6: V (Overflow)
/// - Bit 5: (unused, always 1 when packed)
/// - Bit 4: B (Break)
/// - Bit 3: D (Decimal)
/// - Bit 2: I (Interrupt Disable)
/// - Bit 1: Z (Zero)
/// - Bit 0: C (Carry)
///
/// `set_byte` does not restore the Break flag: bit 4 of the incoming byte is
/// ignored and `brk` keeps its current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    /// Carry (unsigned overflow / no borrow)
    pub carry: bool,
    /// Zero result
    pub zero: bool,
    /// Interrupt disable
    pub interrupt: bool,
    /// Decimal mode (tracked, never applied to arithmetic)
    pub decimal: bool,
    /// Break
    pub brk: bool,
    /// Signed overflow
    pub overflow: bool,
    /// Negative result (bit 7)
    pub negative: bool,
}

impl Flags {
    /// Sets the flags to their power-on state: I and B set, D clear.
    ///
    /// C, Z, V and N are left untouched, as on real hardware.
    pub fn reset(&mut self) {
        self.brk = true;
        self.decimal = false;
        self.interrupt = true;
    }

    /// Derives Zero and Negative from a result value.
    ///
    /// # Examples
    ///
    /// ```
    /// use pet6502::Flags;
    ///
    /// let mut p = Flags::default();
    /// p.update(0x80);
    /// assert!(p.negative);
    /// assert!(!p.zero);
    ///
    /// p.update(0x00);
    /// assert!(p.zero);
    /// assert!(!p.negative);
    /// ```
    pub fn update(&mut self, value: u8) {
        self.zero = value == 0;
        self.negative = value & FLAG_N != 0;
    }

    pub fn set_carry(&mut self, value: bool) {
        self.carry = value;
    }

    pub fn set_zero(&mut self, value: bool) {
        self.zero = value;
    }

    pub fn set_interrupt(&mut self, value: bool) {
        self.interrupt = value;
    }

    pub fn set_overflow(&mut self, value: bool) {
        self.overflow = value;
    }

    pub fn set_negative(&mut self, value: bool) {
        self.negative = value;
    }

    /// Packs all flags into a status byte (bit 5 always set).
    pub fn to_byte(&self) -> u8 {
        let mut status = FLAG_UNUSED;

        if self.negative {
            status |= FLAG_N;
        }
        if self.overflow {
            status |= FLAG_V;
        }
        if self.brk {
            status |= FLAG_B;
        }
        if self.decimal {
            status |= FLAG_D;
        }
        if self.interrupt {
            status |= FLAG_I;
        }
        if self.zero {
            status |= FLAG_Z;
        }
        if self.carry {
            status |= FLAG_C;
        }

        status
    }

    /// Unpacks a status byte. The Break flag is left unchanged.
    pub fn set_byte(&mut self, status: u8) {
        self.carry = status & FLAG_C != 0;
        self.zero = status & FLAG_Z != 0;
        self.interrupt = status & FLAG_I != 0;
        self.decimal = status & FLAG_D != 0;
        self.overflow = status & FLAG_V != 0;
        self.negative = status & FLAG_N != 0;
    }
}

impl std::fmt::Display for Flags {
    /// Renders the flags as `NV-BDIZC`, upper case when set.
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let bit = |set: bool, c: char| if set { c } else { c.to_ascii_lowercase() };
        write!(
            f,
            "{}{}-{}{}{}{}{}",
            bit(self.negative, 'N'),
            bit(self.overflow, 'V'),
            bit(self.brk, 'B'),
            bit(self.decimal, 'D'),
            bit(self.interrupt, 'I'),
            bit(self.zero, 'Z'),
            bit(self.carry, 'C'),
        )
    }
}

/// The 6502 register file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Registers {
    /// Accumulator
    pub a: u8,
    /// X index
    pub x: u8,
    /// Y index
    pub y: u8,
    /// Stack pointer (offset within the stack page)
    pub s: u8,
    /// Program counter
    pub pc: u16,
    /// Opcode of the instruction being executed
    pub ir: u8,
    /// Processor status
    pub p: Flags,
}

impl Registers {
    pub fn inc_x(&mut self) {
        self.x = self.x.wrapping_add(1);
    }

    pub fn dec_x(&mut self) {
        self.x = self.x.wrapping_sub(1);
    }

    pub fn inc_y(&mut self) {
        self.y = self.y.wrapping_add(1);
    }

    pub fn dec_y(&mut self) {
        self.y = self.y.wrapping_sub(1);
    }

    pub fn inc_pc(&mut self) {
        self.pc = self.pc.wrapping_add(1);
    }
}
