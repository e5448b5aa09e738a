//! Fuzz target for programs running on the device bus.
//!
//! Maps RAM, a ROM holding the fuzzed program and a second, overlapping RAM
//! window, then runs up to a bounded number of instructions. Decode errors
//! end the run; the bus must never panic.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pet6502::{Bus, Device, MemoryBus, Ram, Rom, CPU};

const MAX_STEPS: usize = 2_000;

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    program: Vec<u8>,
    ram_kib: u8,
    overlay_base: u16,
    overlay_size: u16,
    irq_every: u8,
}

struct Ticker {
    every: u8,
    count: u8,
}

impl Device for Ticker {
    fn base(&self) -> u16 {
        0xE810
    }

    fn size(&self) -> u32 {
        4
    }

    fn read(&self, _address: u16) -> u8 {
        self.count
    }

    fn write(&mut self, _address: u16, _value: u8) {}

    fn check_interrupt(&mut self) -> bool {
        if self.every == 0 {
            return false;
        }
        self.count = self.count.wrapping_add(1);
        self.count % self.every == 0
    }
}

fuzz_target!(|input: FuzzInput| {
    let mut bus = Bus::new();
    bus.map(Box::new(Ram::new(0x0000, (input.ram_kib as u32 % 65) * 1024)));
    bus.map(Box::new(Ram::new(input.overlay_base, input.overlay_size as u32)));

    let mut rom = Rom::new(0xF000, 0x1000);
    let len = input.program.len().min(0x0FF0);
    if rom.load_bytes(&input.program[..len]).is_err() {
        return;
    }
    bus.map(Box::new(rom));
    bus.map(Box::new(Ticker {
        every: input.irq_every,
        count: 0,
    }));

    // Reset vector points at the start of the ROM unless the program covers it
    let mut cpu = CPU::new(bus);
    if cpu.memory().read_word(0xFFFC) == 0 {
        cpu.set_pc(0xF000);
    }
    cpu.set_trap(|_, _| {});

    for _ in 0..MAX_STEPS {
        if cpu.step().is_err() {
            break;
        }
        if cpu.memory_mut().check_interrupts() {
            cpu.interrupt();
        }
    }
});
