//! # ALU (Arithmetic Logic Unit) Instructions
//!
//! This module implements arithmetic and logical operations:
//! - ADC, SBC: binary add/subtract with carry
//! - AND, ORA, EOR: bitwise logic into the accumulator
//! - CMP, CPX, CPY: register comparisons
//! - BIT: bit test
//!
//! Decimal mode is tracked in the status register but never applied;
//! ADC and SBC always operate in binary.

use crate::opcodes::Instruction;
use crate::{ExecutionError, MemoryBus, CPU};

/// Executes the ADC (Add with Carry) instruction.
///
/// A = A + M + C. Sets C on unsigned carry out of bit 7, V when both
/// operands share a sign that the result does not, and Z/N from the result.
pub(crate) fn execute_adc<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: &Instruction,
) -> Result<(), ExecutionError> {
    let value = cpu.operand(instruction)?;
    add_with_carry(cpu, value);
    Ok(())
}

/// Executes the SBC (Subtract with Carry) instruction.
///
/// A = A - M - (1 - C). C is set when no borrow occurred. V is set when the
/// operands differ in sign and the result's sign differs from A's.
pub(crate) fn execute_sbc<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: &Instruction,
) -> Result<(), ExecutionError> {
    let value = cpu.operand(instruction)?;
    let a = cpu.regs.a;
    let borrow = if cpu.regs.p.carry { 0 } else { 1 };

    let result16 = (a as u16)
        .wrapping_sub(value as u16)
        .wrapping_sub(borrow);
    let result = result16 as u8;

    cpu.regs.p.set_carry(result16 < 0x100);
    cpu.regs
        .p
        .set_overflow(((a ^ value) & (a ^ result) & 0x80) != 0);
    cpu.regs.a = result;
    cpu.regs.p.update(result);

    Ok(())
}

fn add_with_carry<M: MemoryBus>(cpu: &mut CPU<M>, value: u8) {
    let a = cpu.regs.a;
    let carry_in = cpu.regs.p.carry as u16;

    let result16 = a as u16 + value as u16 + carry_in;
    let result = result16 as u8;

    cpu.regs.p.set_carry(result16 > 0xFF);
    // Same-signed operands producing a result of the other sign
    cpu.regs
        .p
        .set_overflow(((a ^ result) & (value ^ result) & 0x80) != 0);
    cpu.regs.a = result;
    cpu.regs.p.update(result);
}

/// Executes the AND (Logical AND) instruction.
pub(crate) fn execute_and<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: &Instruction,
) -> Result<(), ExecutionError> {
    let value = cpu.operand(instruction)?;
    cpu.regs.a &= value;
    cpu.regs.p.update(cpu.regs.a);
    Ok(())
}

/// Executes the ORA (Logical Inclusive OR) instruction.
pub(crate) fn execute_ora<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: &Instruction,
) -> Result<(), ExecutionError> {
    let value = cpu.operand(instruction)?;
    cpu.regs.a |= value;
    cpu.regs.p.update(cpu.regs.a);
    Ok(())
}

/// Executes the EOR (Exclusive OR) instruction.
pub(crate) fn execute_eor<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: &Instruction,
) -> Result<(), ExecutionError> {
    let value = cpu.operand(instruction)?;
    cpu.regs.a ^= value;
    cpu.regs.p.update(cpu.regs.a);
    Ok(())
}

/// Executes the CMP (Compare Accumulator) instruction.
pub(crate) fn execute_cmp<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: &Instruction,
) -> Result<(), ExecutionError> {
    let value = cpu.operand(instruction)?;
    let register = cpu.regs.a;
    compare(cpu, register, value);
    Ok(())
}

/// Executes the CPX (Compare X Register) instruction.
pub(crate) fn execute_cpx<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: &Instruction,
) -> Result<(), ExecutionError> {
    let value = cpu.operand(instruction)?;
    let register = cpu.regs.x;
    compare(cpu, register, value);
    Ok(())
}

/// Executes the CPY (Compare Y Register) instruction.
pub(crate) fn execute_cpy<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: &Instruction,
) -> Result<(), ExecutionError> {
    let value = cpu.operand(instruction)?;
    let register = cpu.regs.y;
    compare(cpu, register, value);
    Ok(())
}

/// C = reg >= value, Z = reg == value, N = bit 7 of (reg - value).
fn compare<M: MemoryBus>(cpu: &mut CPU<M>, register: u8, value: u8) {
    let result = register.wrapping_sub(value);
    cpu.regs.p.set_carry(register >= value);
    cpu.regs.p.update(result);
}

/// Executes the BIT (Bit Test) instruction.
///
/// Z is set from A & M; N and V are copied from bits 7 and 6 of M.
/// The accumulator is not modified.
pub(crate) fn execute_bit<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: &Instruction,
) -> Result<(), ExecutionError> {
    let value = cpu.operand(instruction)?;
    cpu.regs.p.set_zero(cpu.regs.a & value == 0);
    cpu.regs.p.set_negative(value & 0x80 != 0);
    cpu.regs.p.set_overflow(value & 0x40 != 0);
    Ok(())
}
