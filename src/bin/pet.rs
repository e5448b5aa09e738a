//! PET emulator command line front end.
//!
//! Boots the selected ROM set and runs the instruction loop on the main
//! thread. Characters typed on stdin are delivered to the PET keyboard as
//! key presses; closing stdin stops the machine.

use clap::Parser;
use log::{Level, LevelFilter, Log, Metadata, Record};
use pet6502::pet::keyboard::{key_for, KeyEvent, KeySender};
use pet6502::pet::{Pet, PetConfig, RomSet, RETRACE_INTERVAL};
use std::io::Read;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Commodore PET emulator
#[derive(Parser, Debug)]
#[command(name = "pet")]
#[command(about = "A Commodore PET emulator", long_about = None)]
struct Args {
    /// Enable CPU disassembly trace on stderr
    #[arg(short, long)]
    debug: bool,

    /// ROM version (0 = diagnostic, 2 or 4)
    #[arg(short = 'r', long = "rom", default_value = "2")]
    rom_version: u8,

    /// RAM size in KiB
    #[arg(short = 'm', long = "memory", default_value = "32")]
    ram_kib: u32,

    /// Directory holding the ROM images
    #[arg(long, default_value = "roms")]
    roms: PathBuf,

    /// PRG file read by LOAD
    #[arg(long)]
    load: Option<PathBuf>,

    /// PRG file written by SAVE
    #[arg(long)]
    save: Option<PathBuf>,

    /// Stop after this many instructions
    #[arg(long)]
    steps: Option<u64>,

    /// Instructions between retrace interrupts
    #[arg(long, default_value_t = RETRACE_INTERVAL)]
    retrace: u64,
}

/// Writes log records to stderr.
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        match record.level() {
            Level::Trace => eprintln!("{}", record.args()),
            level => eprintln!("[{}] {}", level, record.args()),
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

/// Hold time for a key, so the KERNAL scan sees it between retraces.
const KEY_HOLD: Duration = Duration::from_millis(40);
/// Back-off while the handoff buffer is full.
const KEY_RETRY: Duration = Duration::from_millis(5);

fn main() {
    let args = Args::parse();

    let level = if args.debug {
        LevelFilter::Trace
    } else {
        LevelFilter::Info
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }

    let rom_set = match RomSet::from_version(args.rom_version) {
        Some(set) => set,
        None => {
            eprintln!("Invalid ROM version {}", args.rom_version);
            std::process::exit(1);
        }
    };

    let config = PetConfig {
        rom_set,
        ram_kib: args.ram_kib,
        rom_dir: args.roms,
        load_path: args.load,
        save_path: args.save,
        retrace_interval: args.retrace,
    };

    let mut pet = match Pet::new(config) {
        Ok(pet) => pet,
        Err(e) => {
            eprintln!("Failed to load ROMs: {}", e);
            std::process::exit(1);
        }
    };

    let quit = Arc::new(AtomicBool::new(false));
    spawn_input(pet.key_sender(), Arc::clone(&quit));

    match pet.run(args.steps, &quit) {
        Ok(steps) => {
            println!("stopped after {} instructions", steps);
            print!("{}", pet.dump());
        }
        Err(e) => {
            println!("\nexecution stopped: {}", e);
            print!("{}", pet.dump());
            std::process::exit(1);
        }
    }
}

/// Feeds stdin to the keyboard as press/release pairs. Sets `quit` at EOF.
fn spawn_input(keys: KeySender, quit: Arc<AtomicBool>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for byte in stdin.lock().bytes() {
            let Ok(byte) = byte else { break };
            let c = if byte == b'\n' { '\r' } else { byte as char };
            let Some(key) = key_for(c) else { continue };

            deliver(&keys, KeyEvent::down(key));
            thread::sleep(KEY_HOLD);
            deliver(&keys, KeyEvent::up(key));
            thread::sleep(KEY_HOLD);
        }
        quit.store(true, Ordering::Relaxed);
    });
}

fn deliver(keys: &KeySender, mut event: KeyEvent) {
    while let Err(returned) = keys.send(event) {
        event = returned;
        thread::sleep(KEY_RETRY);
    }
}
