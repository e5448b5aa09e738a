//! # Load and Store Instructions
//!
//! - LDA, LDX, LDY: Load register from memory (updates Z and N)
//! - STA, STX, STY: Store register to memory (no flags affected)

use crate::opcodes::Instruction;
use crate::{ExecutionError, MemoryBus, CPU};

/// Executes the LDA (Load Accumulator) instruction.
pub(crate) fn execute_lda<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: &Instruction,
) -> Result<(), ExecutionError> {
    let value = cpu.operand(instruction)?;
    cpu.regs.a = value;
    cpu.regs.p.update(value);
    Ok(())
}

/// Executes the LDX (Load X Register) instruction.
pub(crate) fn execute_ldx<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: &Instruction,
) -> Result<(), ExecutionError> {
    let value = cpu.operand(instruction)?;
    cpu.regs.x = value;
    cpu.regs.p.update(value);
    Ok(())
}

/// Executes the LDY (Load Y Register) instruction.
pub(crate) fn execute_ldy<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: &Instruction,
) -> Result<(), ExecutionError> {
    let value = cpu.operand(instruction)?;
    cpu.regs.y = value;
    cpu.regs.p.update(value);
    Ok(())
}

/// Executes the STA (Store Accumulator) instruction.
pub(crate) fn execute_sta<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: &Instruction,
) -> Result<(), ExecutionError> {
    let address = cpu.effective_address(instruction)?;
    cpu.memory.write(address, cpu.regs.a);
    Ok(())
}

/// Executes the STX (Store X Register) instruction.
pub(crate) fn execute_stx<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: &Instruction,
) -> Result<(), ExecutionError> {
    let address = cpu.effective_address(instruction)?;
    cpu.memory.write(address, cpu.regs.x);
    Ok(())
}

/// Executes the STY (Store Y Register) instruction.
pub(crate) fn execute_sty<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: &Instruction,
) -> Result<(), ExecutionError> {
    let address = cpu.effective_address(instruction)?;
    cpu.memory.write(address, cpu.regs.y);
    Ok(())
}
