//! # Stack Instructions
//!
//! PHA/PLA move the accumulator, PHP/PLP the packed status byte.

use crate::{ExecutionError, MemoryBus, CPU};

/// Executes the PHA (Push Accumulator) instruction.
pub(crate) fn execute_pha<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.push_byte(cpu.regs.a);
    Ok(())
}

/// Executes the PHP (Push Processor Status) instruction.
///
/// The pushed byte always has bit 5 set; B reflects the current flag.
pub(crate) fn execute_php<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.push_byte(cpu.regs.p.to_byte());
    Ok(())
}

/// Executes the PLA (Pull Accumulator) instruction.
pub(crate) fn execute_pla<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    let value = cpu.pop_byte();
    cpu.regs.a = value;
    cpu.regs.p.update(value);
    Ok(())
}

/// Executes the PLP (Pull Processor Status) instruction.
///
/// The Break flag is not restored from the pulled byte.
pub(crate) fn execute_plp<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    let status = cpu.pop_byte();
    cpu.regs.p.set_byte(status);
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
    fn test_pha_pla_round_trip() {
        // PHA, LDA #$00, PLA
        let mut cpu = setup_cpu(&[0x48, 0xA9, 0x00, 0x68]);
        cpu.set_a(0x80);

        cpu.step().unwrap();
        assert_eq!(cpu.memory().read(0x01FF), 0x80);
        assert_eq!(cpu.sp(), 0xFE);

        cpu.step().unwrap();
        assert!(cpu.flag_z());

        cpu.step().unwrap();
        assert_eq!(cpu.a(), 0x80);
        assert!(cpu.flag_n());
        assert_eq!(cpu.sp(), 0xFF);
    }

    #[test]
    fn test_php_plp_keeps_break() {
        // PHP, PLP
        let mut cpu = setup_cpu(&[0x08, 0x28]);
        cpu.set_flag_c(true);

        cpu.step().unwrap();
        assert_eq!(cpu.memory().read(0x01FF), cpu.status());
        assert_ne!(cpu.memory().read(0x01FF) & 0x20, 0);

        cpu.memory_mut().write(0x01FF, 0x00);
        cpu.step().unwrap();
        assert!(!cpu.flag_c());
        assert!(!cpu.flag_i());
        assert!(cpu.flag_b());
    }
}
