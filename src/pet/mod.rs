//! # Commodore PET
//!
//! Assembles the CPU, bus and devices into a PET 2001/4000 series machine and
//! runs the host instruction loop.
//!
//! ## Memory map
//!
//! | Range         | Device                         |
//! |---------------|--------------------------------|
//! | 0x0000-       | Main RAM (configurable size)   |
//! | 0x8000-0x8FFF | Screen RAM                     |
//! | 0xB000-0xDFFF | BASIC ROMs (set dependent)     |
//! | 0xE000-0xE7FF | Editor ROM                     |
//! | 0xE810        | PIA1: keyboard, retrace IRQ    |
//! | 0xE820        | PIA2: IEEE-488 (latched only)  |
//! | 0xE840        | VIA: user port, CB2 charset    |
//! | 0xF000-0xFFFF | KERNAL ROM                     |
//!
//! The KERNAL LOAD and SAVE vectors are patched to execute `TRAP`, which the
//! machine services by moving PRG images between files and memory.

pub mod keyboard;
pub mod patches;

use crate::devices::{Bus, Device, Pia, PortLatch, Ram, Rom, Via};
use crate::tape::Prg;
use crate::{ExecutionError, LoadError, MemoryBus, CPU};
use keyboard::{key_channel, KeySender, KeyboardPorts};
use log::{debug, error, info, warn};
use patches::{
    LOAD_PATCH_V2, LOAD_PATCH_V4, SAVE_PATCH_V2, SAVE_PATCH_V4, TRAP_LOAD, TRAP_SAVE, TXTTAB,
    VARTAB, VEC_LOAD, VEC_SAVE,
};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};

pub const RAM_BASE: u16 = 0x0000;
pub const SCREEN_BASE: u16 = 0x8000;
pub const SCREEN_SIZE: u32 = 0x1000;
pub const PIA1_BASE: u16 = 0xE810;
pub const PIA2_BASE: u16 = 0xE820;
pub const VIA_BASE: u16 = 0xE840;

/// Instructions between retrace interrupts (roughly 60 Hz at 1 MHz).
pub const RETRACE_INTERVAL: u64 = 5_000;
/// Instructions the retrace flag stays raised.
pub const RETRACE_STEPS: u64 = 100;

/// A ROM chip: where it sits and which image fills it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RomSlot {
    pub base: u16,
    pub size: u32,
    pub file: &'static str,
}

const ROMS_DIAGNOSTIC: &[RomSlot] = &[
    RomSlot { base: 0xF000, size: 0x800, file: "U-2 DIA" },
    RomSlot { base: 0xF800, size: 0x800, file: "U-3 DIA" },
];

const ROMS_V2: &[RomSlot] = &[
    RomSlot { base: 0xC000, size: 0x1000, file: "basic-2-c000.901465-01.bin" },
    RomSlot { base: 0xD000, size: 0x1000, file: "basic-2-d000.901465-02.bin" },
    RomSlot { base: 0xE000, size: 0x800, file: "edit-2-n.901447-24.bin" },
    RomSlot { base: 0xF000, size: 0x1000, file: "kernal-2.901465-03.bin" },
];

const ROMS_V4: &[RomSlot] = &[
    RomSlot { base: 0xB000, size: 0x1000, file: "basic-4-b000.901465-23.bin" },
    RomSlot { base: 0xC000, size: 0x1000, file: "basic-4-c000.901465-20.bin" },
    RomSlot { base: 0xD000, size: 0x1000, file: "basic-4-d000.901465-21.bin" },
    RomSlot { base: 0xE000, size: 0x800, file: "edit-4-40-n-50Hz.901498-01.bin" },
    RomSlot { base: 0xF000, size: 0x1000, file: "kernal-4.901465-22.bin" },
];

/// Firmware generation to boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RomSet {
    /// PET diagnostic ROMs (no BASIC, no patches)
    Diagnostic,
    /// BASIC 2
    V2,
    /// BASIC 4
    V4,
}

impl RomSet {
    /// Maps the command-line version number (0, 2 or 4).
    pub fn from_version(version: u8) -> Option<Self> {
        match version {
            0 => Some(RomSet::Diagnostic),
            2 => Some(RomSet::V2),
            4 => Some(RomSet::V4),
            _ => None,
        }
    }

    /// ROM chips in mapping order.
    pub fn layout(self) -> &'static [RomSlot] {
        match self {
            RomSet::Diagnostic => ROMS_DIAGNOSTIC,
            RomSet::V2 => ROMS_V2,
            RomSet::V4 => ROMS_V4,
        }
    }

    /// LOAD and SAVE trap stubs for the KERNAL, if the set is patched.
    pub fn patches(self) -> Option<(&'static [u8], &'static [u8])> {
        match self {
            RomSet::Diagnostic => None,
            RomSet::V2 => Some((LOAD_PATCH_V2, SAVE_PATCH_V2)),
            RomSet::V4 => Some((LOAD_PATCH_V4, SAVE_PATCH_V4)),
        }
    }
}

/// Machine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetConfig {
    pub rom_set: RomSet,
    /// Main RAM in KiB, capped at 64
    pub ram_kib: u32,
    /// Directory holding the ROM images
    pub rom_dir: PathBuf,
    /// Program read by the LOAD trap
    pub load_path: Option<PathBuf>,
    /// Program written by the SAVE trap
    pub save_path: Option<PathBuf>,
    /// Instructions per retrace interrupt; 0 disables retrace
    pub retrace_interval: u64,
}

impl Default for PetConfig {
    fn default() -> Self {
        Self {
            rom_set: RomSet::V2,
            ram_kib: 32,
            rom_dir: PathBuf::from("roms"),
            load_path: None,
            save_path: None,
            retrace_interval: RETRACE_INTERVAL,
        }
    }
}

/// An assembled PET.
pub struct Pet {
    cpu: CPU<Bus>,
    screen: Rc<RefCell<Ram>>,
    pia1: Rc<RefCell<Pia<KeyboardPorts>>>,
    via: Rc<RefCell<Via>>,
    keys: KeySender,
    retrace_interval: u64,
    frame_steps: u64,
}

impl Pet {
    /// Builds the machine, loading ROM images from `config.rom_dir`.
    ///
    /// # Errors
    ///
    /// Any missing or oversized ROM image; nothing is executed in that case.
    pub fn new(config: PetConfig) -> Result<Self, LoadError> {
        let mut roms = Vec::new();
        for slot in config.rom_set.layout() {
            let mut rom = Rom::new(slot.base, slot.size);
            rom.load_file(config.rom_dir.join(slot.file))?;
            roms.push(rom);
        }
        Ok(Self::with_roms(config, roms))
    }

    /// Builds the machine around already loaded ROMs.
    ///
    /// The ROM covering the KERNAL jump table gets the LOAD/SAVE trap
    /// stubs of `config.rom_set`. The CPU is reset once everything is mapped.
    pub fn with_roms(config: PetConfig, mut roms: Vec<Rom>) -> Self {
        let mut bus = Bus::new();

        let ram_size = config.ram_kib.min(64) * 1024;
        bus.map(Box::new(Ram::new(RAM_BASE, ram_size)));

        let screen = Rc::new(RefCell::new(Ram::new(SCREEN_BASE, SCREEN_SIZE)));
        bus.map(Box::new(Rc::clone(&screen)));

        if let Some((load, save)) = config.rom_set.patches() {
            for rom in roms.iter_mut().filter(|rom| rom.contains(VEC_SAVE)) {
                rom.patch_vector(VEC_LOAD, load);
                rom.patch_vector(VEC_SAVE, save);
            }
        }
        for rom in roms {
            bus.map(Box::new(rom));
        }

        let (keys, events) = key_channel();
        let pia1 = Rc::new(RefCell::new(Pia::new(PIA1_BASE, KeyboardPorts::new(events))));
        bus.map(Box::new(Rc::clone(&pia1)));
        bus.map(Box::new(Pia::new(PIA2_BASE, PortLatch::default())));

        let via = Rc::new(RefCell::new(Via::new(VIA_BASE)));
        bus.map(Box::new(Rc::clone(&via)));

        let mut cpu = CPU::new(bus);
        let load_path = config.load_path.clone();
        let save_path = config.save_path.clone();
        cpu.set_trap(move |selector, bus: &mut Bus| {
            handle_trap(selector, bus, load_path.as_deref(), save_path.as_deref())
        });

        info!(
            "PET assembled: {:?} ROMs, {} KiB RAM, reset to ${:04x}",
            config.rom_set,
            ram_size / 1024,
            cpu.pc()
        );

        Self {
            cpu,
            screen,
            pia1,
            via,
            keys,
            retrace_interval: config.retrace_interval,
            frame_steps: 0,
        }
    }

    pub fn cpu(&self) -> &CPU<Bus> {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut CPU<Bus> {
        &mut self.cpu
    }

    /// Handle for feeding key events from another thread.
    pub fn key_sender(&self) -> KeySender {
        self.keys.clone()
    }

    /// Copy of screen RAM (PET screen codes, 40 columns per row).
    pub fn screen(&self) -> Vec<u8> {
        self.screen.borrow().as_slice().to_vec()
    }

    /// Character set selected by VIA CB2: 0 graphics, 1 text.
    pub fn charset(&self) -> u8 {
        self.via.borrow().cb2()
    }

    /// Executes one instruction, advances the retrace timer and services
    /// a pending interrupt.
    pub fn step(&mut self) -> Result<(), ExecutionError> {
        self.cpu.step()?;
        self.tick_retrace();

        if self.cpu.memory_mut().check_interrupts() {
            self.cpu.interrupt();
        }
        Ok(())
    }

    /// Runs until `quit` is set, `max_steps` instructions have executed, or
    /// an instruction fails. Returns the number of instructions executed.
    pub fn run(&mut self, max_steps: Option<u64>, quit: &AtomicBool) -> Result<u64, ExecutionError> {
        let mut steps = 0;
        while !quit.load(Ordering::Relaxed) {
            if max_steps.map_or(false, |max| steps >= max) {
                break;
            }
            self.step()?;
            steps += 1;
        }
        debug!("run stopped after {} instructions", steps);
        Ok(steps)
    }

    /// CPU registers followed by the zero page.
    pub fn dump(&self) -> String {
        format!("{}{}", self.cpu.dump(), self.cpu.dump_memory(0x0000, 256))
    }

    fn tick_retrace(&mut self) {
        if self.retrace_interval == 0 {
            return;
        }
        self.frame_steps += 1;
        if self.frame_steps == retrace_fall(self.retrace_interval) {
            self.pia1.borrow_mut().handler_mut().retrace(false);
        }
        if self.frame_steps >= self.retrace_interval {
            self.frame_steps = 0;
            self.pia1.borrow_mut().handler_mut().retrace(true);
        }
    }
}

/// Instructions after the rising edge at which CB1 falls; short frames
/// fall halfway through.
pub fn retrace_fall(interval: u64) -> u64 {
    RETRACE_STEPS.min(interval / 2).max(1)
}

fn handle_trap(selector: u8, bus: &mut Bus, load: Option<&Path>, save: Option<&Path>) {
    match selector {
        TRAP_LOAD => match load {
            Some(path) => {
                if let Err(err) = trap_load(bus, path) {
                    error!("LOAD failed: {}", err);
                }
            }
            None => warn!("LOAD: no program file configured"),
        },
        TRAP_SAVE => match save {
            Some(path) => {
                if let Err(err) = trap_save(bus, path) {
                    error!("SAVE failed: {}", err);
                }
            }
            None => warn!("SAVE: no program file configured"),
        },
        other => warn!("unknown trap selector ${:02x}", other),
    }
}

/// Copies a PRG file into memory at its load address and sets VARTAB to
/// address + size + 1.
pub fn trap_load<M: MemoryBus>(bus: &mut M, path: &Path) -> Result<Prg, LoadError> {
    let prg = Prg::load(path)?;
    for (n, &byte) in prg.data.iter().enumerate() {
        bus.write(prg.address.wrapping_add(n as u16), byte);
    }

    let size = prg.len() as u16;
    bus.write_word(VARTAB, prg.address.wrapping_add(size).wrapping_add(1));

    info!("load {} bytes to address ${:04x}", size, prg.address);
    Ok(prg)
}

/// Writes the BASIC program between TXTTAB and VARTAB to a PRG file.
pub fn trap_save<M: MemoryBus>(bus: &M, path: &Path) -> Result<Prg, LoadError> {
    let txttab = bus.read_word(TXTTAB);
    let vartab = bus.read_word(VARTAB);
    let size = vartab.wrapping_sub(txttab);

    info!("txttab: ${:04x}, vartab: ${:04x}, size={}", txttab, vartab, size);

    let data = (0..size).map(|n| bus.read(txttab.wrapping_add(n))).collect();
    let prg = Prg::new(txttab, data);
    prg.save(path)?;
    Ok(prg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FlatMemory;

    #[test]
    fn test_rom_set_versions() {
        assert_eq!(RomSet::from_version(0), Some(RomSet::Diagnostic));
        assert_eq!(RomSet::from_version(2), Some(RomSet::V2));
        assert_eq!(RomSet::from_version(4), Some(RomSet::V4));
        assert_eq!(RomSet::from_version(3), None);

        assert_eq!(RomSet::V4.layout().len(), 5);
        assert!(RomSet::Diagnostic.patches().is_none());
    }

    #[test]
    fn test_trap_save_then_load() {
        let path = std::env::temp_dir().join(format!("pet6502-trap-{}.prg", std::process::id()));

        let mut mem = FlatMemory::new();
        mem.write_word(TXTTAB, 0x0401);
        mem.write_word(VARTAB, 0x0404);
        mem.load(0x0401, &[0x10, 0x20, 0x30]);

        let saved = trap_save(&mem, &path).unwrap();
        assert_eq!(saved.address, 0x0401);
        assert_eq!(saved.data, vec![0x10, 0x20, 0x30]);

        let mut fresh = FlatMemory::new();
        let loaded = trap_load(&mut fresh, &path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, saved);
        assert_eq!(fresh.read(0x0403), 0x30);
        assert_eq!(fresh.read_word(VARTAB), 0x0405);
    }

    #[test]
    fn test_missing_rom_is_fatal() {
        let config = PetConfig {
            rom_dir: PathBuf::from("/nonexistent"),
            ..PetConfig::default()
        };
        assert!(matches!(Pet::new(config), Err(LoadError::Io { .. })));
    }
}
