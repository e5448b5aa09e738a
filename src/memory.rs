//! # Memory Bus Abstraction
//!
//! This module provides the `MemoryBus` trait that decouples the CPU from specific
//! memory implementations. The CPU performs every access through it:
//!
//! - `FlatMemory`: a single 64KB RAM array, used mostly for testing
//! - `Bus` (in `devices`): dispatches accesses to memory-mapped devices
//!
//! ## Design Principles
//!
//! The MemoryBus trait follows 6502 hardware behavior:
//! - No bus errors - reads/writes always succeed
//! - Writes to ROM/unmapped regions may be ignored
//! - 16-bit values are little-endian: low byte at `addr`, high byte at `addr + 1`

/// Memory bus trait for CPU to read/write bytes.
///
/// # Examples
///
/// ```
/// use pet6502::{MemoryBus, FlatMemory};
///
/// let mut mem = FlatMemory::new();
///
/// mem.write(0x1234, 0x42);
/// assert_eq!(mem.read(0x1234), 0x42);
///
/// mem.write_word(0xFFFC, 0xC000);
/// assert_eq!(mem.read(0xFFFC), 0x00);
/// assert_eq!(mem.read(0xFFFD), 0xC0);
/// assert_eq!(mem.read_word(0xFFFC), 0xC000);
/// ```
pub trait MemoryBus {
    /// Reads a byte from the specified 16-bit address.
    ///
    /// This method must never panic. Unmapped addresses return a default value.
    fn read(&self, addr: u16) -> u8;

    /// Writes a byte to the specified 16-bit address.
    ///
    /// This method must never panic. Read-only or unmapped addresses ignore the write.
    fn write(&mut self, addr: u16, value: u8);

    /// Reads a little-endian word as two byte reads, `addr` then `addr + 1`.
    fn read_word(&self, addr: u16) -> u16 {
        let lo = self.read(addr) as u16;
        let hi = self.read(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    /// Writes a little-endian word as two byte writes, `addr` then `addr + 1`.
    fn write_word(&mut self, addr: u16, value: u16) {
        self.write(addr, (value & 0xFF) as u8);
        self.write(addr.wrapping_add(1), (value >> 8) as u8);
    }

    /// Polls the shared IRQ line.
    ///
    /// Returns `true` if any attached device is requesting an interrupt. The
    /// host calls this between instructions and invokes `CPU::interrupt`
    /// when it is asserted. Devices may clear edge-style requests as they
    /// are polled, hence `&mut self`.
    ///
    /// The default has no interrupt sources.
    fn check_interrupts(&mut self) -> bool {
        false
    }
}

/// Simple 64KB flat memory implementation.
///
/// All 65536 addresses are mapped to a single contiguous RAM array
/// initialized to 0x00. There are no interrupt sources.
///
/// # Examples
///
/// ```
/// use pet6502::{CPU, FlatMemory, MemoryBus};
///
/// let mut memory = FlatMemory::new();
/// memory.write(0xFFFC, 0x00); // Reset vector low byte
/// memory.write(0xFFFD, 0x80); // Reset vector high byte (PC = 0x8000)
///
/// let cpu = CPU::new(memory);
/// assert_eq!(cpu.pc(), 0x8000);
/// ```
pub struct FlatMemory {
    /// 64KB contiguous memory array
    data: Box<[u8; 65536]>,
}

impl FlatMemory {
    /// Creates a new FlatMemory instance with all bytes initialized to zero.
    pub fn new() -> Self {
        Self {
            data: Box::new([0; 65536]),
        }
    }

    /// Copies `bytes` into memory starting at `addr`, wrapping at 0xFFFF.
    pub fn load(&mut self, addr: u16, bytes: &[u8]) {
        for (i, &byte) in bytes.iter().enumerate() {
            self.write(addr.wrapping_add(i as u16), byte);
        }
    }
}

impl Default for FlatMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBus for FlatMemory {
    fn read(&self, addr: u16) -> u8 {
        self.data[addr as usize]
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.data[addr as usize] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_memory_read_write() {
        let mut mem = FlatMemory::new();

        // Initially all zeros
        assert_eq!(mem.read(0x0000), 0x00);
        assert_eq!(mem.read(0xFFFF), 0x00);

        // Write and read back
        mem.write(0x1234, 0x42);
        assert_eq!(mem.read(0x1234), 0x42);

        // Verify other addresses unchanged
        assert_eq!(mem.read(0x1233), 0x00);
        assert_eq!(mem.read(0x1235), 0x00);
    }

    #[test]
    fn test_word_is_little_endian() {
        let mut mem = FlatMemory::new();
        mem.write_word(0x0200, 0xBEEF);

        assert_eq!(mem.read(0x0200), 0xEF);
        assert_eq!(mem.read(0x0201), 0xBE);
        assert_eq!(mem.read_word(0x0200), 0xBEEF);
    }

    #[test]
    fn test_word_wraps_at_top_of_memory() {
        let mut mem = FlatMemory::new();
        mem.write_word(0xFFFF, 0x1234);

        assert_eq!(mem.read(0xFFFF), 0x34);
        assert_eq!(mem.read(0x0000), 0x12);
    }

    #[test]
    fn test_load_and_no_interrupts() {
        let mut mem = FlatMemory::new();
        mem.load(0x8000, &[0xA9, 0x42]);

        assert_eq!(mem.read(0x8000), 0xA9);
        assert_eq!(mem.read(0x8001), 0x42);
        assert!(!mem.check_interrupts());
    }
}
