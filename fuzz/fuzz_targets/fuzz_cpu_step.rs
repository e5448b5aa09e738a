//! Fuzz target for CPU step execution.
//!
//! Builds an arbitrary CPU state and memory contents, then executes one
//! instruction. Unknown opcodes are expected errors; panics are bugs.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pet6502::{FlatMemory, MemoryBus, CPU};

#[derive(Debug, Arbitrary)]
struct FuzzCpuState {
    a: u8,
    x: u8,
    y: u8,
    sp: u8,
    flag_c: bool,
    flag_z: bool,
    flag_i: bool,
    flag_d: bool,
    flag_b: bool,
    flag_v: bool,
    flag_n: bool,
    raise_irq: bool,
}

#[derive(Debug, Arbitrary)]
struct FuzzMemory {
    /// Opcode and operands at the reset address
    instruction_bytes: [u8; 3],
    zero_page: [u8; 256],
    stack_page: [u8; 256],
    /// Target area for absolute addressing (0x4000)
    main_memory: [u8; 256],
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    cpu_state: FuzzCpuState,
    memory: FuzzMemory,
}

fuzz_target!(|input: FuzzInput| {
    let mut memory = FlatMemory::new();
    memory.write_word(0xFFFC, 0x8000);
    memory.write_word(0xFFFE, 0x9000);

    memory.load(0x8000, &input.memory.instruction_bytes);
    memory.load(0x0000, &input.memory.zero_page);
    memory.load(0x0100, &input.memory.stack_page);
    memory.load(0x4000, &input.memory.main_memory);

    let mut cpu = CPU::new(memory);
    cpu.set_trap(|_, _| {});

    let state = &input.cpu_state;
    cpu.set_a(state.a);
    cpu.set_x(state.x);
    cpu.set_y(state.y);
    cpu.set_sp(state.sp);
    cpu.set_flag_c(state.flag_c);
    cpu.set_flag_z(state.flag_z);
    cpu.set_flag_i(state.flag_i);
    cpu.set_flag_d(state.flag_d);
    cpu.set_flag_b(state.flag_b);
    cpu.set_flag_v(state.flag_v);
    cpu.set_flag_n(state.flag_n);

    let result = cpu.step();
    assert_eq!(cpu.instruction_count(), result.is_ok() as u64);

    if state.raise_irq {
        let masked = cpu.flag_i() || cpu.in_interrupt();
        let taken = cpu.interrupt();
        assert_eq!(taken, !masked);
        // Never reentered before RTI
        assert!(!cpu.interrupt());
    }
});
