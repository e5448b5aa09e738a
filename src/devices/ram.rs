//! RAM device implementation.
//!
//! Provides readable and writable memory storage via the Device trait.

use super::Device;

/// Simple RAM device with readable and writable storage.
///
/// All addresses within the device's range are readable and writable and
/// start out zeroed.
///
/// # Examples
///
/// ```rust
/// use pet6502::{Device, Ram};
///
/// let mut ram = Ram::new(0x8000, 0x1000); // 4KB screen RAM
///
/// ram.write(0x8042, 0xAA);
/// assert_eq!(ram.read(0x8042), 0xAA);
/// ```
pub struct Ram {
    base: u16,
    data: Vec<u8>,
}

impl Ram {
    /// Creates a zeroed RAM device of `size` bytes at `base`.
    pub fn new(base: u16, size: u32) -> Self {
        Self {
            base,
            data: vec![0; size as usize],
        }
    }

    /// Zeroes the contents.
    pub fn reset(&mut self) {
        self.data.fill(0);
    }

    /// Device contents, offset 0 at `base`.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

impl Device for Ram {
    fn base(&self) -> u16 {
        self.base
    }

    fn size(&self) -> u32 {
        self.data.len() as u32
    }

    fn read(&self, address: u16) -> u8 {
        let offset = address.wrapping_sub(self.base) as usize;
        self.data.get(offset).copied().unwrap_or(0)
    }

    fn write(&mut self, address: u16, value: u8) {
        let offset = address.wrapping_sub(self.base) as usize;
        if let Some(cell) = self.data.get_mut(offset) {
            *cell = value;
        }
    }
}
