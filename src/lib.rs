//! # PET 6502 Emulator Core
//!
//! A MOS 6502 CPU emulator and the address-space bus that connects it to RAM,
//! ROM and memory-mapped peripherals, assembled into a Commodore PET.
//!
//! Instructions execute atomically: there is no cycle timing, and interrupts
//! are sampled only between instructions.
//!
//! ## Quick Start
//!
//! ```rust
//! use pet6502::{FlatMemory, MemoryBus, CPU};
//!
//! // Create 64KB flat memory
//! let mut memory = FlatMemory::new();
//!
//! // Set reset vector to point to program start at 0x8000
//! memory.write(0xFFFC, 0x00); // Low byte
//! memory.write(0xFFFD, 0x80); // High byte
//!
//! // LDA #$42
//! memory.write(0x8000, 0xA9);
//! memory.write(0x8001, 0x42);
//!
//! // Initialize CPU - it will load PC from the reset vector
//! let mut cpu = CPU::new(memory);
//! assert_eq!(cpu.pc(), 0x8000);
//! assert_eq!(cpu.sp(), 0xFF);
//!
//! cpu.step().unwrap();
//! assert_eq!(cpu.a(), 0x42);
//! assert_eq!(cpu.pc(), 0x8002);
//! ```
//!
//! ## Modules
//!
//! - `registers` - Register file and processor status flags
//! - `addressing` - Addressing modes and operand resolution
//! - `opcodes` - Instruction descriptor table
//! - `cpu` - CPU state, step/interrupt and the stack
//! - `memory` - MemoryBus trait and a flat 64KB implementation
//! - `devices` - Device trait, the dispatching `Bus`, RAM/ROM/PIA/VIA
//! - `tape` - PRG tape image format
//! - `pet` - Commodore PET machine assembly and host loop

pub mod addressing;
pub mod cpu;
pub mod devices;
pub mod memory;
pub mod opcodes;
pub mod pet;
pub mod registers;
pub mod tape;

// Internal instruction implementations (not part of public API)
mod instructions;

use std::path::PathBuf;

// Re-export public API
pub use addressing::AddressingMode;
pub use cpu::{TrapHandler, CPU};
pub use devices::{Bus, Device, Pia, PortHandler, PortLatch, Ram, Rom, Via};
pub use memory::{FlatMemory, MemoryBus};
pub use opcodes::{instruction_set, Instruction, Mnemonic};
pub use registers::{Flags, Registers};
pub use tape::Prg;

/// Errors that can occur during CPU execution.
///
/// Both variants are fatal: the CPU makes no attempt to recover, and the
/// host is expected to dump state and stop calling `step`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    /// The opcode byte has no entry in the instruction table.
    UnknownOpcode(u8),

    /// The handler for `opcode` cannot operate in `mode`.
    UnsupportedMode {
        /// Opcode being executed
        opcode: u8,
        /// Addressing mode the handler rejected
        mode: AddressingMode,
    },
}

impl std::fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ExecutionError::UnknownOpcode(opcode) => {
                write!(f, "invalid or unknown instruction 0x{:02X}", opcode)
            }
            ExecutionError::UnsupportedMode { opcode, mode } => {
                write!(
                    f,
                    "addressing mode {:?} is not supported by opcode 0x{:02X}",
                    mode, opcode
                )
            }
        }
    }
}

impl std::error::Error for ExecutionError {}

/// Errors raised while loading ROM and tape images, before execution starts.
#[derive(Debug)]
pub enum LoadError {
    /// The file could not be read or written.
    Io {
        /// File being accessed
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The image does not fit the device it is being loaded into.
    TooLarge {
        /// File being loaded
        path: PathBuf,
        /// Image size in bytes
        size: usize,
        /// Declared device size in bytes
        capacity: usize,
    },

    /// A tape image shorter than its two byte load address header.
    TruncatedImage {
        /// Image length in bytes
        len: usize,
    },
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            LoadError::Io { path, source } => {
                write!(f, "{}: {}", path.display(), source)
            }
            LoadError::TooLarge {
                path,
                size,
                capacity,
            } => write!(
                f,
                "{}: image is {} bytes, device holds {} bytes",
                path.display(),
                size,
                capacity
            ),
            LoadError::TruncatedImage { len } => {
                write!(f, "tape image too short ({} bytes)", len)
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
