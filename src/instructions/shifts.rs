//! # Shift and Rotate Instructions
//!
//! This module implements bit shift and rotate operations:
//! - ASL: Arithmetic Shift Left
//! - LSR: Logical Shift Right
//! - ROL: Rotate Left through carry
//! - ROR: Rotate Right through carry
//!
//! Each works either on the accumulator or read-modify-write on memory and
//! updates C, Z and N.

use crate::addressing::AddressingMode;
use crate::opcodes::Instruction;
use crate::{ExecutionError, MemoryBus, CPU};

/// Applies `op` to the accumulator or to the operand in memory.
///
/// `op` takes the old value and carry, returning the new value and carry.
fn read_modify_write<M, F>(
    cpu: &mut CPU<M>,
    instruction: &Instruction,
    op: F,
) -> Result<(), ExecutionError>
where
    M: MemoryBus,
    F: Fn(u8, bool) -> (u8, bool),
{
    let carry_in = cpu.regs.p.carry;

    let result = if instruction.mode == AddressingMode::Accumulator {
        let (result, carry) = op(cpu.regs.a, carry_in);
        cpu.regs.a = result;
        cpu.regs.p.set_carry(carry);
        result
    } else {
        let address = cpu.effective_address(instruction)?;
        let (result, carry) = op(cpu.memory.read(address), carry_in);
        cpu.memory.write(address, result);
        cpu.regs.p.set_carry(carry);
        result
    };

    cpu.regs.p.update(result);
    Ok(())
}

/// Executes the ASL (Arithmetic Shift Left) instruction.
///
/// Bit 7 goes to carry, bit 0 becomes 0.
pub(crate) fn execute_asl<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: &Instruction,
) -> Result<(), ExecutionError> {
    read_modify_write(cpu, instruction, |value, _| (value << 1, value & 0x80 != 0))
}

/// Executes the LSR (Logical Shift Right) instruction.
///
/// Bit 0 goes to carry, bit 7 becomes 0.
pub(crate) fn execute_lsr<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: &Instruction,
) -> Result<(), ExecutionError> {
    read_modify_write(cpu, instruction, |value, _| (value >> 1, value & 0x01 != 0))
}

/// Executes the ROL (Rotate Left) instruction.
pub(crate) fn execute_rol<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: &Instruction,
) -> Result<(), ExecutionError> {
    read_modify_write(cpu, instruction, |value, carry| {
        ((value << 1) | carry as u8, value & 0x80 != 0)
    })
}

/// Executes the ROR (Rotate Right) instruction.
pub(crate) fn execute_ror<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: &Instruction,
) -> Result<(), ExecutionError> {
    read_modify_write(cpu, instruction, |value, carry| {
        ((value >> 1) | ((carry as u8) << 7), value & 0x01 != 0)
    })
}
