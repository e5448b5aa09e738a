//! # Register Transfer Instructions
//!
//! TAX, TAY, TXA, TYA and TSX copy a register and update Z and N.
//! TXS sets the stack pointer and leaves the flags alone.

use crate::{ExecutionError, MemoryBus, CPU};

/// Executes the TAX (Transfer A to X) instruction.
pub(crate) fn execute_tax<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.regs.x = cpu.regs.a;
    cpu.regs.p.update(cpu.regs.x);
    Ok(())
}

/// Executes the TAY (Transfer A to Y) instruction.
pub(crate) fn execute_tay<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.regs.y = cpu.regs.a;
    cpu.regs.p.update(cpu.regs.y);
    Ok(())
}

/// Executes the TXA (Transfer X to A) instruction.
pub(crate) fn execute_txa<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.regs.a = cpu.regs.x;
    cpu.regs.p.update(cpu.regs.a);
    Ok(())
}

/// Executes the TYA (Transfer Y to A) instruction.
pub(crate) fn execute_tya<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.regs.a = cpu.regs.y;
    cpu.regs.p.update(cpu.regs.a);
    Ok(())
}

/// Executes the TSX (Transfer Stack Pointer to X) instruction.
pub(crate) fn execute_tsx<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.regs.x = cpu.regs.s;
    cpu.regs.p.update(cpu.regs.x);
    Ok(())
}

/// Executes the TXS (Transfer X to Stack Pointer) instruction.
pub(crate) fn execute_txs<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.regs.s = cpu.regs.x;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{FlatMemory, MemoryBus, CPU};

    fn setup_cpu(program: &[u8]) -> CPU<FlatMemory> {
        let mut memory = FlatMemory::new();
        memory.write_word(0xFFFC, 0x8000);
        memory.load(0x8000, program);
        CPU::new(memory)
    }

    #[test]
    fn test_tax_tya_flags() {
        // TAX, TYA
        let mut cpu = setup_cpu(&[0xAA, 0x98]);
        cpu.set_a(0x80);

        cpu.step().unwrap();
        assert_eq!(cpu.x(), 0x80);
        assert!(cpu.flag_n());

        cpu.step().unwrap();
        assert_eq!(cpu.a(), 0x00);
        assert!(cpu.flag_z());
    }

    #[test]
    fn test_txs_leaves_flags_tsx_sets_them() {
        // LDX #$00, TXS, LDX #$01, TSX
        let mut cpu = setup_cpu(&[0xA2, 0x00, 0x9A, 0xA2, 0x01, 0xBA]);

        cpu.step().unwrap();
        assert!(cpu.flag_z());
        cpu.step().unwrap();
        assert_eq!(cpu.sp(), 0x00);
        assert!(cpu.flag_z());

        cpu.step().unwrap();
        assert!(!cpu.flag_z());
        cpu.step().unwrap();
        assert_eq!(cpu.x(), 0x00);
        assert!(cpu.flag_z());
    }
}
