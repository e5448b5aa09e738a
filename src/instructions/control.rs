//! # Control Flow Instructions
//!
//! This module implements control flow operations:
//! - JMP: Jump to address (absolute or indirect)
//! - JSR/RTS: Subroutine call and return
//! - RTI: Return from interrupt
//! - BRK: Force interrupt
//! - TRAP: Emulator hook (opcode 0xF2)
//!
//! Return addresses are stored on the stack as "last byte of the calling
//! instruction" and incremented on the way back, which is the 6502 convention
//! for JSR/RTS and also how `CPU::interrupt` and RTI cooperate.

use crate::cpu::VEC_INTERRUPT;
use crate::opcodes::Instruction;
use crate::{ExecutionError, MemoryBus, CPU};
use log::{trace, warn};

/// Executes the JMP (Jump) instruction.
///
/// Indirect mode reads the target pointer with a plain word read; a pointer at
/// a page boundary crosses into the next page.
pub(crate) fn execute_jmp<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: &Instruction,
) -> Result<(), ExecutionError> {
    cpu.regs.pc = cpu.effective_address(instruction)?;
    Ok(())
}

/// Executes the JSR (Jump to Subroutine) instruction.
///
/// Pushes the address of the last byte of the JSR (PC - 1 after the operand
/// has been consumed) and jumps to the target.
pub(crate) fn execute_jsr<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: &Instruction,
) -> Result<(), ExecutionError> {
    let target = cpu.effective_address(instruction)?;
    cpu.push_word(cpu.regs.pc.wrapping_sub(1));
    cpu.regs.pc = target;
    Ok(())
}

/// Executes the RTS (Return from Subroutine) instruction.
pub(crate) fn execute_rts<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.regs.pc = cpu.pop_word().wrapping_add(1);
    Ok(())
}

/// Executes the RTI (Return from Interrupt) instruction.
///
/// Pops the status byte (B is forced clear) and the return address, resumes
/// at the popped address + 1 and clears the interrupt-in-service guard.
pub(crate) fn execute_rti<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    let status = cpu.pop_byte();
    cpu.regs.p.set_byte(status);
    cpu.regs.p.brk = false;

    cpu.regs.pc = cpu.pop_word().wrapping_add(1);
    cpu.in_interrupt = false;

    trace!("rti: returning to ${:04x}", cpu.regs.pc);
    Ok(())
}

/// Executes the BRK (Force Interrupt) instruction.
///
/// BRK is one byte long but reserves a padding byte, so the return address
/// is opcode + 2. Pushes it in the same "minus one" form RTI expects, then
/// pushes the status with B set, sets I and jumps through 0xFFFE.
///
/// The interrupt-in-service guard is not touched; only hardware interrupts
/// entered through `CPU::interrupt` set it.
pub(crate) fn execute_brk<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    // PC already points past the opcode
    cpu.push_word(cpu.regs.pc);

    cpu.regs.p.brk = true;
    cpu.push_byte(cpu.regs.p.to_byte());
    cpu.regs.p.set_interrupt(true);

    cpu.regs.pc = cpu.memory.read_word(VEC_INTERRUPT);
    Ok(())
}

/// Executes the TRAP pseudo instruction.
///
/// Invokes the registered trap handler with the accumulator as selector. With
/// no handler registered the trap is logged and execution continues.
pub(crate) fn execute_trap<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    let selector = cpu.regs.a;
    match cpu.trap.as_mut() {
        Some(handler) => handler(selector, &mut cpu.memory),
        None => warn!(
            "trap ${:02x} at ${:04x} with no handler registered",
            selector,
            cpu.regs.pc.wrapping_sub(1)
        ),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{FlatMemory, MemoryBus, CPU};
    use std::cell::Cell;
    use std::rc::Rc;

    fn setup_cpu(program: &[u8]) -> CPU<FlatMemory> {
        let mut memory = FlatMemory::new();
        memory.write_word(0xFFFC, 0x8000);
        memory.load(0x8000, program);
        CPU::new(memory)
    }

    #[test]
    fn test_jsr_pushes_last_byte_of_call() {
        let mut cpu = setup_cpu(&[0x20, 0x00, 0x90]);
        cpu.memory_mut().write(0x9000, 0x60); // RTS

        cpu.step().unwrap();
        assert_eq!(cpu.pc(), 0x9000);
        assert_eq!(cpu.sp(), 0xFD);
        assert_eq!(cpu.memory().read_word(0x01FE), 0x8002);

        cpu.step().unwrap();
        assert_eq!(cpu.pc(), 0x8003);
        assert_eq!(cpu.sp(), 0xFF);
    }

    #[test]
    fn test_brk_then_rti_resumes_after_padding() {
        let mut cpu = setup_cpu(&[0x00, 0xFF, 0xEA]);
        cpu.memory_mut().write_word(0xFFFE, 0x9000);
        cpu.memory_mut().write(0x9000, 0x40); // RTI

        cpu.step().unwrap();
        assert_eq!(cpu.pc(), 0x9000);
        assert!(cpu.flag_i());
        assert!(!cpu.in_interrupt());
        let pushed = cpu.memory().read(0x01FD);
        assert_ne!(pushed & 0x10, 0);

        cpu.step().unwrap();
        assert_eq!(cpu.pc(), 0x8002);
        assert!(!cpu.flag_b());
        assert_eq!(cpu.sp(), 0xFF);
    }

    #[test]
    fn test_trap_invokes_handler_with_accumulator() {
        let mut cpu = setup_cpu(&[0xA9, 0x02, 0xF2]);
        let seen = Rc::new(Cell::new(0u8));
        let sink = Rc::clone(&seen);
        cpu.set_trap(move |selector, memory: &mut FlatMemory| {
            sink.set(selector);
            memory.write(0x0400, 0x55);
        });

        cpu.step().unwrap();
        cpu.step().unwrap();

        assert_eq!(seen.get(), 0x02);
        assert_eq!(cpu.memory().read(0x0400), 0x55);
        assert_eq!(cpu.pc(), 0x8003);
    }

    #[test]
    fn test_trap_without_handler_continues() {
        let mut cpu = setup_cpu(&[0xF2, 0xEA]);
        cpu.step().unwrap();
        assert_eq!(cpu.pc(), 0x8001);
    }
}
