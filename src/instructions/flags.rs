//! # Status Flag Instructions
//!
//! CLC/SEC, CLI/SEI, CLD/SED and CLV. Each touches exactly one flag.

use crate::{ExecutionError, MemoryBus, CPU};

/// Executes the CLC (Clear Carry Flag) instruction.
pub(crate) fn execute_clc<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.regs.p.carry = false;
    Ok(())
}

/// Executes the SEC (Set Carry Flag) instruction.
pub(crate) fn execute_sec<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.regs.p.carry = true;
    Ok(())
}

/// Executes the CLI (Clear Interrupt Disable) instruction.
pub(crate) fn execute_cli<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.regs.p.interrupt = false;
    Ok(())
}

/// Executes the SEI (Set Interrupt Disable) instruction.
pub(crate) fn execute_sei<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.regs.p.interrupt = true;
    Ok(())
}

/// Executes the CLD (Clear Decimal Mode) instruction.
pub(crate) fn execute_cld<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.regs.p.decimal = false;
    Ok(())
}

/// Executes the SED (Set Decimal Mode) instruction.
///
/// The flag is recorded but arithmetic stays binary.
pub(crate) fn execute_sed<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.regs.p.decimal = true;
    Ok(())
}

/// Executes the CLV (Clear Overflow Flag) instruction.
pub(crate) fn execute_clv<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.regs.p.overflow = false;
    Ok(())
}
