//! ROM device implementation.
//!
//! Read-only memory with a fixed declared size, filled from an image file
//! and optionally patched in place before it is mapped.

use super::Device;
use crate::LoadError;
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Read-only memory device.
///
/// Writes through the bus are ignored. An image shorter than the declared
/// size leaves the remainder zeroed; a longer one is rejected.
///
/// # Examples
///
/// ```rust
/// use pet6502::{Device, Rom};
///
/// let mut rom = Rom::new(0xF000, 0x1000);
/// rom.load_bytes(&[0xEA, 0xEA, 0xEA]).unwrap();
///
/// assert_eq!(rom.read(0xF000), 0xEA);
///
/// // Writes are ignored
/// rom.write(0xF000, 0xFF);
/// assert_eq!(rom.read(0xF000), 0xEA);
/// assert_eq!(rom.read(0xF003), 0x00);
/// ```
pub struct Rom {
    base: u16,
    data: Vec<u8>,
}

impl Rom {
    /// Creates a zeroed ROM of `size` bytes at `base`.
    pub fn new(base: u16, size: u32) -> Self {
        Self {
            base,
            data: vec![0; size as usize],
        }
    }

    /// Loads an image file verbatim from offset 0.
    ///
    /// # Errors
    ///
    /// - `LoadError::Io` if the file cannot be read
    /// - `LoadError::TooLarge` if the file exceeds the declared size
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), LoadError> {
        let path = path.as_ref();
        let image = fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.fill(&image, path)?;
        debug!(
            "loaded {} ({} bytes) at ${:04x}",
            path.display(),
            image.len(),
            self.base
        );
        Ok(())
    }

    /// Loads an in-memory image verbatim from offset 0.
    ///
    /// # Errors
    ///
    /// `LoadError::TooLarge` if `image` exceeds the declared size.
    pub fn load_bytes(&mut self, image: &[u8]) -> Result<(), LoadError> {
        self.fill(image, Path::new("<memory>"))
    }

    fn fill(&mut self, image: &[u8], path: &Path) -> Result<(), LoadError> {
        if image.len() > self.data.len() {
            return Err(LoadError::TooLarge {
                path: PathBuf::from(path),
                size: image.len(),
                capacity: self.data.len(),
            });
        }
        self.data[..image.len()].copy_from_slice(image);
        Ok(())
    }

    /// Splices `patch` over the routine a jump vector points at.
    ///
    /// `vector` must hold a `JMP abs` instruction; its operand (the bytes at
    /// `vector + 1` and `vector + 2`) is the target that gets overwritten.
    /// Bytes that would land outside this ROM are dropped with a warning.
    ///
    /// Returns the patched target address.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pet6502::{Device, Rom};
    ///
    /// let mut image = vec![0u8; 0x1000];
    /// // JMP $F100 at $FFD5
    /// image[0xFD5] = 0x4C;
    /// image[0xFD6] = 0x00;
    /// image[0xFD7] = 0xF1;
    ///
    /// let mut rom = Rom::new(0xF000, 0x1000);
    /// rom.load_bytes(&image).unwrap();
    ///
    /// assert_eq!(rom.patch_vector(0xFFD5, &[0xEA, 0x60]), 0xF100);
    /// assert_eq!(rom.read(0xF100), 0xEA);
    /// assert_eq!(rom.read(0xF101), 0x60);
    /// ```
    pub fn patch_vector(&mut self, vector: u16, patch: &[u8]) -> u16 {
        let lo = self.read(vector.wrapping_add(1)) as u16;
        let hi = self.read(vector.wrapping_add(2)) as u16;
        let target = (hi << 8) | lo;

        for (n, &byte) in patch.iter().enumerate() {
            let address = target.wrapping_add(n as u16);
            let offset = address.wrapping_sub(self.base) as usize;
            match self.data.get_mut(offset) {
                Some(cell) => *cell = byte,
                None => {
                    warn!(
                        "patch for vector ${:04x} runs outside ROM at ${:04x}",
                        vector, address
                    );
                    break;
                }
            }
        }

        debug!(
            "patched vector ${:04x} -> ${:04x} ({} bytes)",
            vector,
            target,
            patch.len()
        );
        target
    }
}

impl Device for Rom {
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

    fn write(&mut self, _address: u16, _value: u8) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rom_short_image_zero_fills() {
        let mut rom = Rom::new(0xC000, 0x1000);
        rom.load_bytes(&[0x01, 0x02]).unwrap();

        assert_eq!(rom.size(), 0x1000);
        assert_eq!(rom.read(0xC000), 0x01);
        assert_eq!(rom.read(0xC001), 0x02);
        assert_eq!(rom.read(0xCFFF), 0x00);
    }

    #[test]
    fn test_rom_rejects_oversized_image() {
        let mut rom = Rom::new(0xE000, 0x800);
        let err = rom.load_bytes(&[0u8; 0x801]).unwrap_err();

        match err {
            LoadError::TooLarge { size, capacity, .. } => {
                assert_eq!(size, 0x801);
                assert_eq!(capacity, 0x800);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_rom_missing_file() {
        let mut rom = Rom::new(0xF000, 0x1000);
        let err = rom
            .load_file("/nonexistent/kernal.bin")
            .expect_err("file does not exist");
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_rom_write_ignored() {
        let mut rom = Rom::new(0xF000, 0x10);
        rom.load_bytes(&[0xAA; 0x10]).unwrap();
        rom.write(0xF000, 0xFF);
        assert_eq!(rom.read(0xF000), 0xAA);
    }

    #[test]
    fn test_patch_vector_clipped_at_rom_end() {
        let mut image = vec![0u8; 0x100];
        image[0x10] = 0x4C;
        image[0x11] = 0xFE;
        image[0x12] = 0xF0;

        let mut rom = Rom::new(0xF000, 0x100);
        rom.load_bytes(&image).unwrap();

        assert_eq!(rom.patch_vector(0xF010, &[0x01, 0x02, 0x03, 0x04]), 0xF0FE);
        assert_eq!(rom.read(0xF0FE), 0x01);
        assert_eq!(rom.read(0xF0FF), 0x02);
    }
}
