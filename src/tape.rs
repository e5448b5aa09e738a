//! # PRG Tape Images
//!
//! A PRG file is a 2-byte little-endian load address followed by the raw
//! program bytes. This is the format the PET's LOAD and SAVE traps move in
//! and out of memory.

use crate::LoadError;
use log::info;
use std::fs;
use std::path::Path;

/// Size of the load address header.
pub const HEADER_LEN: usize = 2;

/// A program image and the address it loads at.
///
/// # Examples
///
/// ```
/// use pet6502::Prg;
///
/// let prg = Prg::from_bytes(&[0x01, 0x04, 0xAA, 0xBB]).unwrap();
/// assert_eq!(prg.address, 0x0401);
/// assert_eq!(prg.data, vec![0xAA, 0xBB]);
/// assert_eq!(prg.to_bytes(), vec![0x01, 0x04, 0xAA, 0xBB]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prg {
    /// Load address
    pub address: u16,
    /// Program bytes, header excluded
    pub data: Vec<u8>,
}

impl Prg {
    pub fn new(address: u16, data: Vec<u8>) -> Self {
        Self { address, data }
    }

    /// Parses an image. Size is the image length minus the header.
    ///
    /// # Errors
    ///
    /// `LoadError::TruncatedImage` if the image is shorter than the header.
    pub fn from_bytes(image: &[u8]) -> Result<Self, LoadError> {
        if image.len() < HEADER_LEN {
            return Err(LoadError::TruncatedImage { len: image.len() });
        }
        let address = u16::from_le_bytes([image[0], image[1]]);
        Ok(Self {
            address,
            data: image[HEADER_LEN..].to_vec(),
        })
    }

    /// Serializes the image, header first.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut image = Vec::with_capacity(HEADER_LEN + self.data.len());
        image.extend_from_slice(&self.address.to_le_bytes());
        image.extend_from_slice(&self.data);
        image
    }

    /// Number of program bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Reads and parses a PRG file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let image = fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let prg = Self::from_bytes(&image)?;
        info!(
            "read {} ({} bytes at ${:04x})",
            path.display(),
            prg.len(),
            prg.address
        );
        Ok(prg)
    }

    /// Writes the image to a PRG file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), LoadError> {
        let path = path.as_ref();
        fs::write(path, self.to_bytes()).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            "wrote {} ({} bytes from ${:04x})",
            path.display(),
            self.len(),
            self.address
        );
        Ok(())
    }
}
