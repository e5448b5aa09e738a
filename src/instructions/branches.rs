//! # Branch Instructions
//!
//! This module implements conditional branch instructions:
//! - BCC/BCS: Branch if Carry Clear/Set
//! - BEQ/BNE: Branch if Equal/Not Equal (Z flag)
//! - BMI/BPL: Branch if Minus/Plus (N flag)
//! - BVC/BVS: Branch if Overflow Clear/Set
//!
//! The offset byte is always consumed. When the condition holds, PC is set to
//! the target computed relative to the address following the operand.

use crate::{ExecutionError, MemoryBus, CPU};

fn branch_if<M: MemoryBus>(cpu: &mut CPU<M>, condition: bool) -> Result<(), ExecutionError> {
    let target = cpu.relative_target();
    if condition {
        cpu.regs.pc = target;
    }
    Ok(())
}

/// Executes the BCC (Branch if Carry Clear) instruction.
pub(crate) fn execute_bcc<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    let condition = !cpu.regs.p.carry;
    branch_if(cpu, condition)
}

/// Executes the BCS (Branch if Carry Set) instruction.
pub(crate) fn execute_bcs<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    let condition = cpu.regs.p.carry;
    branch_if(cpu, condition)
}

/// Executes the BEQ (Branch if Equal) instruction.
pub(crate) fn execute_beq<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    let condition = cpu.regs.p.zero;
    branch_if(cpu, condition)
}

/// Executes the BNE (Branch if Not Equal) instruction.
pub(crate) fn execute_bne<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    let condition = !cpu.regs.p.zero;
    branch_if(cpu, condition)
}

/// Executes the BMI (Branch if Minus) instruction.
pub(crate) fn execute_bmi<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    let condition = cpu.regs.p.negative;
    branch_if(cpu, condition)
}

/// Executes the BPL (Branch if Positive) instruction.
pub(crate) fn execute_bpl<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    let condition = !cpu.regs.p.negative;
    branch_if(cpu, condition)
}

/// Executes the BVC (Branch if Overflow Clear) instruction.
pub(crate) fn execute_bvc<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    let condition = !cpu.regs.p.overflow;
    branch_if(cpu, condition)
}

/// Executes the BVS (Branch if Overflow Set) instruction.
pub(crate) fn execute_bvs<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    let condition = cpu.regs.p.overflow;
    branch_if(cpu, condition)
}
