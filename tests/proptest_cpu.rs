//! Property-based tests for CPU invariants.
//!
//! These tests use proptest to verify that CPU operations maintain
//! fundamental invariants across all possible input combinations.

use pet6502::{instruction_set, Bus, Device, Flags, FlatMemory, MemoryBus, Mnemonic, Ram, CPU};
use proptest::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

/// Helper function to create a CPU with reset vector at 0x8000
fn setup_cpu() -> CPU<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0x80);
    CPU::new(memory)
}

/// Opcodes with a descriptor in the instruction table
fn implemented_opcodes() -> Vec<u8> {
    instruction_set()
        .iter()
        .flatten()
        .map(|instruction| instruction.opcode)
        .collect()
}

fn unknown_opcodes() -> Vec<u8> {
    let table = instruction_set();
    (0..=255u8)
        .filter(|&opcode| table[opcode as usize].is_none())
        .collect()
}

/// Opcodes that don't modify PC in special ways (excludes branches, jumps, calls, returns)
fn non_branching_opcodes() -> Vec<u8> {
    use Mnemonic::*;
    instruction_set()
        .iter()
        .flatten()
        .filter(|instruction| {
            !matches!(
                instruction.mnemonic,
                Bcc | Bcs | Beq | Bmi | Bne | Bpl | Bvc | Bvs | Jmp | Jsr | Rts | Rti | Brk
            )
        })
        .map(|instruction| instruction.opcode)
        .collect()
}

// ========== Decode Property Tests ==========

proptest! {
    /// Property: For non-branching instructions, PC advances by 1 + operand bytes
    #[test]
    fn prop_pc_advances_by_instruction_size(
        opcode in prop::sample::select(non_branching_opcodes()),
        operand1 in 0u8..=255u8,
        operand2 in 0u8..=255u8,
    ) {
        let mut cpu = setup_cpu();
        let instruction = instruction_set()[opcode as usize].unwrap();

        cpu.memory_mut().load(0x8000, &[opcode, operand1, operand2]);

        cpu.step().unwrap();

        prop_assert_eq!(
            cpu.pc(),
            0x8001 + instruction.bytes as u16,
            "opcode 0x{:02X} ({})",
            opcode,
            instruction.mnemonic
        );
    }

    /// Property: Every implemented opcode executes and bumps the instruction count
    #[test]
    fn prop_implemented_opcodes_execute(
        opcode in prop::sample::select(implemented_opcodes()),
        operand1 in 0u8..=255u8,
        operand2 in 0u8..=255u8,
    ) {
        let mut cpu = setup_cpu();
        cpu.memory_mut().load(0x8000, &[opcode, operand1, operand2]);

        prop_assert!(cpu.step().is_ok());
        prop_assert_eq!(cpu.instruction_count(), 1);
        prop_assert_eq!(cpu.ir(), opcode);
    }

    /// Property: Unknown opcodes fail without executing anything
    #[test]
    fn prop_unknown_opcodes_are_fatal(opcode in prop::sample::select(unknown_opcodes())) {
        let mut cpu = setup_cpu();
        cpu.memory_mut().write(0x8000, opcode);
        let registers = cpu.registers();

        prop_assert_eq!(cpu.step(), Err(pet6502::ExecutionError::UnknownOpcode(opcode)));
        prop_assert_eq!(cpu.instruction_count(), 0);
        prop_assert_eq!(cpu.a(), registers.a);
        prop_assert_eq!(cpu.sp(), registers.s);
    }
}

// ========== Flag N/Z Property Tests ==========

proptest! {
    /// Property: update derives Z and N from the value alone
    #[test]
    fn prop_update_sets_zero_and_negative(value in 0u8..=255u8, carry: bool) {
        let mut flags = Flags::default();
        flags.carry = carry;
        flags.update(value);

        prop_assert_eq!(flags.zero, value == 0);
        prop_assert_eq!(flags.negative, value & 0x80 != 0);
        prop_assert_eq!(flags.carry, carry);
    }

    /// Property: status byte round trips through set_byte, except B
    #[test]
    fn prop_status_byte_round_trip(status in 0u8..=255u8, brk: bool) {
        let mut flags = Flags::default();
        flags.brk = brk;
        flags.set_byte(status);

        prop_assert_eq!(flags.brk, brk);
        let packed = flags.to_byte();
        prop_assert_eq!(packed & 0b1100_1111, status & 0b1100_1111);
        prop_assert_eq!(packed & 0x20, 0x20);
    }

    /// Property: LDA immediate sets N and Z from the loaded value
    #[test]
    fn prop_lda_immediate_flags(value in 0u8..=255u8) {
        let mut cpu = setup_cpu();
        cpu.memory_mut().load(0x8000, &[0xA9, value]);

        cpu.step().unwrap();

        prop_assert_eq!(cpu.a(), value);
        prop_assert_eq!(cpu.flag_z(), value == 0);
        prop_assert_eq!(cpu.flag_n(), value & 0x80 != 0);
    }

    /// Property: ORA/AND/EOR compute the bitwise result with matching N/Z
    #[test]
    fn prop_logic_immediate(a in 0u8..=255u8, operand in 0u8..=255u8) {
        for (opcode, expected) in [(0x09, a | operand), (0x29, a & operand), (0x49, a ^ operand)] {
            let mut cpu = setup_cpu();
            cpu.set_a(a);
            cpu.memory_mut().load(0x8000, &[opcode, operand]);

            cpu.step().unwrap();

            prop_assert_eq!(cpu.a(), expected);
            prop_assert_eq!(cpu.flag_z(), expected == 0);
            prop_assert_eq!(cpu.flag_n(), expected & 0x80 != 0);
        }
    }
}

// ========== Arithmetic Property Tests ==========

proptest! {
    /// Property: ADC result, carry and signed overflow
    #[test]
    fn prop_adc_immediate(a in 0u8..=255u8, operand in 0u8..=255u8, carry: bool) {
        let mut cpu = setup_cpu();
        cpu.set_a(a);
        cpu.set_flag_c(carry);
        cpu.memory_mut().load(0x8000, &[0x69, operand]);

        cpu.step().unwrap();

        let sum = a as u16 + operand as u16 + carry as u16;
        let signed = a as i8 as i16 + operand as i8 as i16 + carry as i16;
        prop_assert_eq!(cpu.a(), sum as u8);
        prop_assert_eq!(cpu.flag_c(), sum > 0xFF);
        prop_assert_eq!(cpu.flag_v(), !(-128..=127).contains(&signed));
        prop_assert_eq!(cpu.flag_z(), sum as u8 == 0);
        prop_assert_eq!(cpu.flag_n(), sum & 0x80 != 0);
    }

    /// Property: SBC is subtraction with borrow = !carry
    #[test]
    fn prop_sbc_immediate(a in 0u8..=255u8, operand in 0u8..=255u8, carry: bool) {
        let mut cpu = setup_cpu();
        cpu.set_a(a);
        cpu.set_flag_c(carry);
        cpu.memory_mut().load(0x8000, &[0xE9, operand]);

        cpu.step().unwrap();

        let borrow = !carry as i16;
        let unsigned = a as i16 - operand as i16 - borrow;
        let signed = a as i8 as i16 - operand as i8 as i16 - borrow;
        prop_assert_eq!(cpu.a(), unsigned as u8);
        prop_assert_eq!(cpu.flag_c(), unsigned >= 0);
        prop_assert_eq!(cpu.flag_v(), !(-128..=127).contains(&signed));
    }

    /// Property: CMP sets C on >=, Z on ==, N from the difference
    #[test]
    fn prop_cmp_immediate(a in 0u8..=255u8, operand in 0u8..=255u8) {
        let mut cpu = setup_cpu();
        cpu.set_a(a);
        cpu.memory_mut().load(0x8000, &[0xC9, operand]);

        cpu.step().unwrap();

        prop_assert_eq!(cpu.a(), a);
        prop_assert_eq!(cpu.flag_c(), a >= operand);
        prop_assert_eq!(cpu.flag_z(), a == operand);
        prop_assert_eq!(cpu.flag_n(), a.wrapping_sub(operand) & 0x80 != 0);
    }
}

// ========== Stack Property Tests ==========

proptest! {
    /// Property: PHA then PLA restores A and SP from any starting SP
    #[test]
    fn prop_pha_pla_roundtrip(value in 0u8..=255u8, sp in 0u8..=255u8) {
        let mut cpu = setup_cpu();
        cpu.set_a(value);
        cpu.set_sp(sp);
        cpu.memory_mut().load(0x8000, &[0x48, 0x68]);

        cpu.step().unwrap();
        prop_assert_eq!(cpu.sp(), sp.wrapping_sub(1));
        cpu.set_a(!value);
        cpu.step().unwrap();

        prop_assert_eq!(cpu.a(), value);
        prop_assert_eq!(cpu.sp(), sp);
    }

    /// Property: JSR then RTS resumes 3 bytes after the JSR, whatever the target
    #[test]
    fn prop_jsr_rts_roundtrip(pc in 0x0200u16..=0x7FF0, target in 0x8000u16..=0xFFF0, sp in 0u8..=255u8) {
        let mut cpu = setup_cpu();
        cpu.set_pc(pc);
        cpu.set_sp(sp);
        let [lo, hi] = target.to_le_bytes();
        cpu.memory_mut().load(pc, &[0x20, lo, hi]);
        cpu.memory_mut().write(target, 0x60);

        cpu.step().unwrap();
        prop_assert_eq!(cpu.pc(), target);
        cpu.step().unwrap();

        prop_assert_eq!(cpu.pc(), pc + 3);
        prop_assert_eq!(cpu.sp(), sp);
    }

    /// Property: interrupt then RTI resumes at the interrupted PC
    #[test]
    fn prop_interrupt_rti_roundtrip(pc in 0x0200u16..=0x7FFF, status in 0u8..=255u8) {
        let mut cpu = setup_cpu();
        cpu.memory_mut().write_word(0xFFFE, 0x9000);
        cpu.memory_mut().write(0x9000, 0x40);
        cpu.set_pc(pc);
        cpu.set_flag_i(false);
        cpu.set_flag_c(status & 0x01 != 0);
        cpu.set_flag_v(status & 0x40 != 0);

        prop_assert!(cpu.interrupt());
        cpu.step().unwrap();

        prop_assert_eq!(cpu.pc(), pc);
        prop_assert_eq!(cpu.flag_c(), status & 0x01 != 0);
        prop_assert_eq!(cpu.flag_v(), status & 0x40 != 0);
        prop_assert!(!cpu.in_interrupt());
    }
}

// ========== Memory Property Tests ==========

proptest! {
    /// Property: words are stored little-endian and read back unchanged
    #[test]
    fn prop_word_roundtrip(addr in 0u16..=0xFFFE, word in 0u16..=0xFFFF) {
        let mut memory = FlatMemory::new();
        memory.write_word(addr, word);

        prop_assert_eq!(memory.read(addr), (word & 0xFF) as u8);
        prop_assert_eq!(memory.read(addr + 1), (word >> 8) as u8);
        prop_assert_eq!(memory.read_word(addr), word);

        let mut bus = Bus::new();
        bus.map(Box::new(Ram::new(0x0000, 0x10000)));
        bus.write_word(addr, word);
        prop_assert_eq!(bus.read_word(addr), word);
    }

    /// Property: in an overlap the later device answers reads, both take writes
    #[test]
    fn prop_bus_overlap(offset in 0u16..0x80, value in 0u8..=255u8) {
        let d1 = Rc::new(RefCell::new(Ram::new(0x1000, 0x100)));
        let d2 = Rc::new(RefCell::new(Ram::new(0x1080, 0x100)));
        let mut bus = Bus::new();
        bus.map(Box::new(Rc::clone(&d1)));
        bus.map(Box::new(Rc::clone(&d2)));

        let addr = 0x1080 + offset;
        d1.borrow_mut().write(addr, !value);
        d2.borrow_mut().write(addr, value);
        prop_assert_eq!(bus.read(addr), value);

        bus.write(addr, value ^ 0x55);
        prop_assert_eq!(d1.borrow().read(addr), value ^ 0x55);
        prop_assert_eq!(d2.borrow().read(addr), value ^ 0x55);
    }

    /// Property: unmapped addresses read 0 and swallow writes
    #[test]
    fn prop_open_bus(addr in 0x0400u16..=0xFFFF, value in 0u8..=255u8) {
        let ram = Rc::new(RefCell::new(Ram::new(0x0000, 0x400)));
        let mut bus = Bus::new();
        bus.map(Box::new(Rc::clone(&ram)));

        bus.write(addr, value);

        prop_assert_eq!(bus.read(addr), 0);
        prop_assert!(ram.borrow().as_slice().iter().all(|&b| b == 0));
    }
}
