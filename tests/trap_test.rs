//! Integration tests for the TRAP pseudo instruction (opcode 0xF2).

use pet6502::{FlatMemory, MemoryBus, CPU};
use std::cell::RefCell;
use std::rc::Rc;

/// Helper function to create a CPU with reset vector at 0x8000
fn setup_cpu(program: &[u8]) -> CPU<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.write_word(0xFFFC, 0x8000);
    memory.load(0x8000, program);
    CPU::new(memory)
}

#[test]
fn test_trap_passes_accumulator_as_selector() {
    // LDA #$01 ; TRAP ; LDA #$02 ; TRAP
    let mut cpu = setup_cpu(&[0xA9, 0x01, 0xF2, 0xA9, 0x02, 0xF2]);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    cpu.set_trap(move |selector, _| log.borrow_mut().push(selector));

    for _ in 0..4 {
        cpu.step().unwrap();
    }

    assert_eq!(*seen.borrow(), vec![0x01, 0x02]);
    assert_eq!(cpu.pc(), 0x8006);
}

#[test]
fn test_trap_handler_reaches_memory() {
    // TRAP ; LDA $0400
    let mut cpu = setup_cpu(&[0xF2, 0xAD, 0x00, 0x04]);
    cpu.set_trap(|_, memory: &mut FlatMemory| memory.write(0x0400, 0x99));

    cpu.step().unwrap();
    cpu.step().unwrap();

    assert_eq!(cpu.a(), 0x99);
}

#[test]
fn test_trap_preserves_registers_and_flags() {
    let mut cpu = setup_cpu(&[0xF2]);
    cpu.set_trap(|_, _| {});
    cpu.set_a(0x33);
    cpu.set_x(0x44);
    cpu.set_flag_c(true);
    let status = cpu.status();
    let sp = cpu.sp();

    cpu.step().unwrap();

    assert_eq!(cpu.a(), 0x33);
    assert_eq!(cpu.x(), 0x44);
    assert_eq!(cpu.status(), status);
    assert_eq!(cpu.sp(), sp);
    assert_eq!(cpu.pc(), 0x8001);
}

#[test]
fn test_trap_without_handler_continues() {
    // TRAP ; INX
    let mut cpu = setup_cpu(&[0xF2, 0xE8]);

    cpu.step().unwrap();
    cpu.step().unwrap();

    assert_eq!(cpu.x(), 1);
    assert_eq!(cpu.instruction_count(), 2);
}

#[test]
fn test_trap_handler_survives_reset() {
    let mut cpu = setup_cpu(&[0xF2]);
    let count = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&count);
    cpu.set_trap(move |_, _| *counter.borrow_mut() += 1);

    cpu.step().unwrap();
    cpu.reset();
    cpu.step().unwrap();

    assert_eq!(*count.borrow(), 2);
}
