//! # Addressing Modes
//!
//! This module defines the 13 addressing modes supported by the 6502 processor
//! and the resolver that turns an instruction's operand bytes into an effective
//! address or an operand value.
//!
//! Every resolver path consumes exactly `mode.operand_bytes()` bytes from the
//! instruction stream, advancing the program counter as it goes. All memory
//! accesses go through the CPU's `MemoryBus`.

use crate::{ExecutionError, Instruction, MemoryBus, CPU};

/// 6502 addressing mode enumeration.
///
/// # Operand Sizes
///
/// - **0 bytes**: Implicit, Accumulator
/// - **1 byte**: Immediate, ZeroPage, ZeroPageX, ZeroPageY, Relative, IndirectX, IndirectY
/// - **2 bytes**: Absolute, AbsoluteX, AbsoluteY, Indirect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    /// No operand, operation implied by instruction.
    ///
    /// Examples: CLC, RTS, NOP
    Implicit,

    /// Operates directly on the accumulator register.
    ///
    /// Examples: LSR A, ROL A, ASL A
    Accumulator,

    /// 8-bit constant operand in instruction.
    ///
    /// Example: LDA #$10 (load immediate value 0x10 into accumulator)
    Immediate,

    /// 8-bit address in zero page (0x00-0xFF).
    ///
    /// Example: LDA $80 (load from address 0x0080)
    ZeroPage,

    /// Zero page address indexed by X register.
    ///
    /// Example: LDA $80,X (load from address 0x0080 + X, wraps within zero page)
    ZeroPageX,

    /// Zero page address indexed by Y register.
    ///
    /// Example: LDX $80,Y (load from address 0x0080 + Y, wraps within zero page)
    ZeroPageY,

    /// Signed 8-bit offset for branch instructions.
    ///
    /// Example: BEQ label (offset is relative to the address after the operand)
    Relative,

    /// Full 16-bit address.
    ///
    /// Example: JMP $1234 (jump to address 0x1234)
    Absolute,

    /// 16-bit address indexed by X register.
    ///
    /// Example: LDA $1234,X (load from address 0x1234 + X, may cross a page)
    AbsoluteX,

    /// 16-bit address indexed by Y register.
    ///
    /// Example: LDA $1234,Y (load from address 0x1234 + Y, may cross a page)
    AbsoluteY,

    /// Indirect jump through 16-bit pointer.
    ///
    /// Example: JMP ($FFFC) (jump to address stored at 0xFFFC/0xFFFD)
    /// Only used by JMP instruction.
    Indirect,

    /// Indexed indirect: (ZP + X) then dereference.
    ///
    /// Example: LDA ($40,X) (add X to 0x40 within zero page, read 16-bit address there)
    IndirectX,

    /// Indirect indexed: ZP dereference then + Y.
    ///
    /// Example: LDA ($40),Y (read 16-bit address from ZP 0x40, add Y)
    IndirectY,
}

impl AddressingMode {
    /// Number of operand bytes following the opcode.
    pub fn operand_bytes(self) -> u8 {
        match self {
            AddressingMode::Implicit | AddressingMode::Accumulator => 0,
            AddressingMode::Immediate
            | AddressingMode::ZeroPage
            | AddressingMode::ZeroPageX
            | AddressingMode::ZeroPageY
            | AddressingMode::Relative
            | AddressingMode::IndirectX
            | AddressingMode::IndirectY => 1,
            AddressingMode::Absolute
            | AddressingMode::AbsoluteX
            | AddressingMode::AbsoluteY
            | AddressingMode::Indirect => 2,
        }
    }
}

impl<M: MemoryBus> CPU<M> {
    /// Reads the byte at PC and advances PC by one.
    pub(crate) fn fetch_byte(&mut self) -> u8 {
        let value = self.memory.read(self.regs.pc);
        self.regs.inc_pc();
        value
    }

    /// Reads a little-endian word at PC and advances PC by two.
    pub(crate) fn fetch_word(&mut self) -> u16 {
        let lo = self.fetch_byte() as u16;
        let hi = self.fetch_byte() as u16;
        (hi << 8) | lo
    }

    /// Resolves the effective address for a memory-referencing mode.
    ///
    /// Returns `UnsupportedMode` for Implicit, Accumulator, Immediate and
    /// Relative, none of which name a memory location.
    pub(crate) fn effective_address(
        &mut self,
        instruction: &Instruction,
    ) -> Result<u16, ExecutionError> {
        let address = match instruction.mode {
            AddressingMode::ZeroPage => self.fetch_byte() as u16,
            AddressingMode::ZeroPageX => self.fetch_byte().wrapping_add(self.regs.x) as u16,
            AddressingMode::ZeroPageY => self.fetch_byte().wrapping_add(self.regs.y) as u16,
            AddressingMode::Absolute => self.fetch_word(),
            AddressingMode::AbsoluteX => self.fetch_word().wrapping_add(self.regs.x as u16),
            AddressingMode::AbsoluteY => self.fetch_word().wrapping_add(self.regs.y as u16),
            AddressingMode::Indirect => {
                let pointer = self.fetch_word();
                self.memory.read_word(pointer)
            }
            AddressingMode::IndirectX => {
                let pointer = self.fetch_byte().wrapping_add(self.regs.x);
                self.memory.read_word(pointer as u16)
            }
            AddressingMode::IndirectY => {
                let pointer = self.fetch_byte();
                self.memory
                    .read_word(pointer as u16)
                    .wrapping_add(self.regs.y as u16)
            }
            mode => {
                return Err(ExecutionError::UnsupportedMode {
                    opcode: instruction.opcode,
                    mode,
                })
            }
        };

        Ok(address)
    }

    /// Fetches the operand value for a read instruction.
    ///
    /// Immediate mode consumes the operand byte itself; every memory mode
    /// reads through the resolved effective address.
    pub(crate) fn operand(&mut self, instruction: &Instruction) -> Result<u8, ExecutionError> {
        match instruction.mode {
            AddressingMode::Immediate => Ok(self.fetch_byte()),
            _ => {
                let address = self.effective_address(instruction)?;
                Ok(self.memory.read(address))
            }
        }
    }

    /// Consumes a relative offset and returns the branch target.
    ///
    /// Offsets of 128 and above are negative (two's complement). The target
    /// is computed from PC after the operand byte has been consumed.
    pub(crate) fn relative_target(&mut self) -> u16 {
        let offset = self.fetch_byte();
        if offset < 128 {
            self.regs.pc.wrapping_add(offset as u16)
        } else {
            self.regs.pc.wrapping_sub(256 - offset as u16)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcodes::{instruction_set, Mnemonic};
    use crate::FlatMemory;

    fn setup_cpu() -> CPU<FlatMemory> {
        let mut memory = FlatMemory::new();
        memory.write(0xFFFC, 0x00);
        memory.write(0xFFFD, 0x80);
        CPU::new(memory)
    }

    fn descriptor(opcode: u8) -> Instruction {
        instruction_set()[opcode as usize].expect("opcode in table")
    }

    #[test]
    fn test_operand_bytes_per_mode() {
        assert_eq!(AddressingMode::Implicit.operand_bytes(), 0);
        assert_eq!(AddressingMode::Accumulator.operand_bytes(), 0);
        assert_eq!(AddressingMode::Relative.operand_bytes(), 1);
        assert_eq!(AddressingMode::IndirectY.operand_bytes(), 1);
        assert_eq!(AddressingMode::Indirect.operand_bytes(), 2);
        assert_eq!(AddressingMode::AbsoluteY.operand_bytes(), 2);
    }

    #[test]
    fn test_zero_page_x_wraps_within_page() {
        let mut cpu = setup_cpu();
        cpu.memory_mut().write(0x8000, 0xF0);
        cpu.set_x(0x20);

        let lda_zpx = descriptor(0xB5);
        assert_eq!(cpu.effective_address(&lda_zpx), Ok(0x0010));
        assert_eq!(cpu.pc(), 0x8001);
    }

    #[test]
    fn test_absolute_x_crosses_page() {
        let mut cpu = setup_cpu();
        cpu.memory_mut().write(0x8000, 0xF0);
        cpu.memory_mut().write(0x8001, 0x12);
        cpu.set_x(0x20);

        let lda_abx = descriptor(0xBD);
        assert_eq!(cpu.effective_address(&lda_abx), Ok(0x1310));
        assert_eq!(cpu.pc(), 0x8002);
    }

    #[test]
    fn test_indirect_x_and_y() {
        let mut cpu = setup_cpu();
        cpu.memory_mut().write(0x8000, 0x40);
        cpu.memory_mut().write(0x8001, 0x40);
        cpu.memory_mut().write_word(0x0044, 0x2000);
        cpu.memory_mut().write_word(0x0040, 0x30F0);
        cpu.set_x(0x04);
        cpu.set_y(0x20);

        let lda_ix = descriptor(0xA1);
        assert_eq!(cpu.effective_address(&lda_ix), Ok(0x2000));

        let lda_iy = descriptor(0xB1);
        assert_eq!(cpu.effective_address(&lda_iy), Ok(0x3110));
        assert_eq!(cpu.pc(), 0x8002);
    }

    #[test]
    fn test_indirect_reads_pointer() {
        let mut cpu = setup_cpu();
        cpu.memory_mut().write_word(0x8000, 0x0300);
        cpu.memory_mut().write_word(0x0300, 0xC0DE);

        let jmp_ind = descriptor(0x6C);
        assert_eq!(jmp_ind.mnemonic, Mnemonic::Jmp);
        assert_eq!(cpu.effective_address(&jmp_ind), Ok(0xC0DE));
    }

    #[test]
    fn test_relative_target_negative_offset() {
        let mut cpu = setup_cpu();
        cpu.memory_mut().write(0x8000, 0xFE); // -2

        assert_eq!(cpu.relative_target(), 0x7FFF);
    }

    #[test]
    fn test_immediate_has_no_address() {
        let mut cpu = setup_cpu();
        let lda_imm = descriptor(0xA9);

        assert_eq!(
            cpu.effective_address(&lda_imm),
            Err(ExecutionError::UnsupportedMode {
                opcode: 0xA9,
                mode: AddressingMode::Immediate,
            })
        );
    }
}
