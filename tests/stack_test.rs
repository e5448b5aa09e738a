//! Integration tests for the stack page.
//!
//! Tests cover:
//! - PHA/PLA and PHP/PLP round trips
//! - Status packing on the stack
//! - Stack pointer wraparound inside page 1
//! - TXS/TSX

use pet6502::{FlatMemory, MemoryBus, CPU};

/// Helper function to create a CPU with reset vector at 0x8000
fn setup_cpu(program: &[u8]) -> CPU<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.write_word(0xFFFC, 0x8000);
    memory.load(0x8000, program);
    CPU::new(memory)
}

#[test]
fn test_pha_pla_restores_accumulator_and_sp() {
    // PHA ; LDA #$00 ; PLA
    let mut cpu = setup_cpu(&[0x48, 0xA9, 0x00, 0x68]);
    cpu.set_a(0xAA);
    let sp = cpu.sp();

    cpu.step().unwrap();
    assert_eq!(cpu.sp(), sp.wrapping_sub(1));
    assert_eq!(cpu.memory().read(0x0100 | sp as u16), 0xAA);

    cpu.step().unwrap();
    assert_eq!(cpu.a(), 0x00);

    cpu.step().unwrap();
    assert_eq!(cpu.a(), 0xAA);
    assert_eq!(cpu.sp(), sp);
    assert!(cpu.flag_n());
    assert!(!cpu.flag_z());
}

#[test]
fn test_pla_sets_zero() {
    // PLA from a zeroed stack
    let mut cpu = setup_cpu(&[0x68]);
    cpu.set_sp(0x80);

    cpu.step().unwrap();

    assert_eq!(cpu.a(), 0x00);
    assert!(cpu.flag_z());
    assert_eq!(cpu.sp(), 0x81);
}

#[test]
fn test_php_packs_status() {
    let mut cpu = setup_cpu(&[0x08]);
    cpu.set_flag_n(true);
    cpu.set_flag_v(false);
    cpu.set_flag_b(false);
    cpu.set_flag_d(false);
    cpu.set_flag_i(false);
    cpu.set_flag_z(true);
    cpu.set_flag_c(true);

    cpu.step().unwrap();

    // N, unused bit 5, Z, C
    assert_eq!(cpu.memory().read(0x01FF), 0b1010_0011);
}

#[test]
fn test_plp_replaces_flags_but_not_break() {
    let mut cpu = setup_cpu(&[0x28]);
    cpu.set_sp(0xFE);
    cpu.memory_mut().write(0x01FF, 0b0100_1001);
    cpu.set_flag_b(false);
    cpu.set_flag_n(true);
    cpu.set_flag_i(true);

    cpu.step().unwrap();

    assert!(!cpu.flag_n());
    assert!(cpu.flag_v());
    assert!(cpu.flag_d());
    assert!(!cpu.flag_i());
    assert!(!cpu.flag_z());
    assert!(cpu.flag_c());
    assert!(!cpu.flag_b());
}

#[test]
fn test_push_wraps_within_stack_page() {
    // PHA ; PHA
    let mut cpu = setup_cpu(&[0x48, 0x48]);
    cpu.set_sp(0x00);
    cpu.set_a(0x5A);

    cpu.step().unwrap();
    assert_eq!(cpu.memory().read(0x0100), 0x5A);
    assert_eq!(cpu.sp(), 0xFF);

    cpu.step().unwrap();
    assert_eq!(cpu.memory().read(0x01FF), 0x5A);
    assert_eq!(cpu.memory().read(0x0200), 0x00);
}

#[test]
fn test_pull_wraps_within_stack_page() {
    let mut cpu = setup_cpu(&[0x68]);
    cpu.set_sp(0xFF);
    cpu.memory_mut().write(0x0100, 0x42);

    cpu.step().unwrap();

    assert_eq!(cpu.a(), 0x42);
    assert_eq!(cpu.sp(), 0x00);
}

#[test]
fn test_jsr_return_address_straddles_wrap() {
    // JSR $9000 with SP = 0x00: high byte at $0100, low byte at $01FF
    let mut cpu = setup_cpu(&[0x20, 0x00, 0x90]);
    cpu.memory_mut().write(0x9000, 0x60);
    cpu.set_sp(0x00);

    cpu.step().unwrap();
    assert_eq!(cpu.memory().read(0x0100), 0x80);
    assert_eq!(cpu.memory().read(0x01FF), 0x02);
    assert_eq!(cpu.sp(), 0xFE);

    cpu.step().unwrap();
    assert_eq!(cpu.pc(), 0x8003);
    assert_eq!(cpu.sp(), 0x00);
}

#[test]
fn test_txs_tsx() {
    // LDX #$40 ; TXS ; LDX #$00 ; TSX
    let mut cpu = setup_cpu(&[0xA2, 0x40, 0x9A, 0xA2, 0x00, 0xBA]);

    cpu.step().unwrap();
    cpu.set_flag_z(true);
    cpu.step().unwrap();
    assert_eq!(cpu.sp(), 0x40);
    // TXS leaves flags alone
    assert!(cpu.flag_z());

    cpu.step().unwrap();
    cpu.step().unwrap();
    assert_eq!(cpu.x(), 0x40);
    assert!(!cpu.flag_z());
}
