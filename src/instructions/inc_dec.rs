//! # Increment and Decrement Instructions
//!
//! INC/DEC operate on memory; INX/INY/DEX/DEY on the index registers.
//! All wrap modulo 256 and update Z and N.

use crate::opcodes::Instruction;
use crate::{ExecutionError, MemoryBus, CPU};

/// Executes the INC (Increment Memory) instruction.
pub(crate) fn execute_inc<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: &Instruction,
) -> Result<(), ExecutionError> {
    let address = cpu.effective_address(instruction)?;
    let value = cpu.memory.read(address).wrapping_add(1);
    cpu.memory.write(address, value);
    cpu.regs.p.update(value);
    Ok(())
}

/// Executes the DEC (Decrement Memory) instruction.
pub(crate) fn execute_dec<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: &Instruction,
) -> Result<(), ExecutionError> {
    let address = cpu.effective_address(instruction)?;
    let value = cpu.memory.read(address).wrapping_sub(1);
    cpu.memory.write(address, value);
    cpu.regs.p.update(value);
    Ok(())
}

/// Executes the INX (Increment X) instruction.
pub(crate) fn execute_inx<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.regs.inc_x();
    cpu.regs.p.update(cpu.regs.x);
    Ok(())
}

/// Executes the INY (Increment Y) instruction.
pub(crate) fn execute_iny<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.regs.inc_y();
    cpu.regs.p.update(cpu.regs.y);
    Ok(())
}

/// Executes the DEX (Decrement X) instruction.
pub(crate) fn execute_dex<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.regs.dec_x();
    cpu.regs.p.update(cpu.regs.x);
    Ok(())
}

/// Executes the DEY (Decrement Y) instruction.
pub(crate) fn execute_dey<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.regs.dec_y();
    cpu.regs.p.update(cpu.regs.y);
    Ok(())
}
