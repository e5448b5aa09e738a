//! # 6502 Instruction Implementations
//!
//! This module contains the implementations of all 6502 instructions, organized by category.
//! Each instruction is implemented as a standalone function that takes a mutable reference
//! to the CPU and the decoded instruction descriptor. On entry PC points at the first
//! operand byte; handlers consume exactly the operand bytes their mode defines.
//!
//! ## Categories
//!
//! - **alu**: Arithmetic and logic operations (ADC, SBC, AND, ORA, EOR, CMP, CPX, CPY, BIT)
//! - **branches**: Conditional branch instructions (BCC, BCS, BEQ, BNE, BMI, BPL, BVC, BVS)
//! - **shifts**: Shift and rotate operations (ASL, LSR, ROL, ROR)
//! - **load_store**: Load and store instructions (LDA, LDX, LDY, STA, STX, STY)
//! - **inc_dec**: Increment and decrement operations (INC, DEC, INX, INY, DEX, DEY)
//! - **control**: Control flow instructions (JMP, JSR, RTS, RTI, BRK, NOP, TRAP)
//! - **stack**: Stack operations (PHA, PHP, PLA, PLP)
//! - **flags**: Status flag manipulation (CLC, SEC, CLI, SEI, CLD, SED, CLV)
//! - **transfer**: Register transfer operations (TAX, TAY, TXA, TYA, TSX, TXS)

pub mod alu;
pub mod branches;
pub mod control;
pub mod flags;
pub mod inc_dec;
pub mod load_store;
pub mod shifts;
pub mod stack;
pub mod transfer;

use crate::opcodes::{Instruction, Mnemonic};
use crate::{ExecutionError, MemoryBus, CPU};

/// Dispatches a decoded instruction to its handler.
pub(crate) fn execute<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: &Instruction,
) -> Result<(), ExecutionError> {
    use Mnemonic::*;

    match instruction.mnemonic {
        Adc => alu::execute_adc(cpu, instruction),
        Sbc => alu::execute_sbc(cpu, instruction),
        And => alu::execute_and(cpu, instruction),
        Ora => alu::execute_ora(cpu, instruction),
        Eor => alu::execute_eor(cpu, instruction),
        Cmp => alu::execute_cmp(cpu, instruction),
        Cpx => alu::execute_cpx(cpu, instruction),
        Cpy => alu::execute_cpy(cpu, instruction),
        Bit => alu::execute_bit(cpu, instruction),

        Bcc => branches::execute_bcc(cpu),
        Bcs => branches::execute_bcs(cpu),
        Beq => branches::execute_beq(cpu),
        Bne => branches::execute_bne(cpu),
        Bmi => branches::execute_bmi(cpu),
        Bpl => branches::execute_bpl(cpu),
        Bvc => branches::execute_bvc(cpu),
        Bvs => branches::execute_bvs(cpu),

        Asl => shifts::execute_asl(cpu, instruction),
        Lsr => shifts::execute_lsr(cpu, instruction),
        Rol => shifts::execute_rol(cpu, instruction),
        Ror => shifts::execute_ror(cpu, instruction),

        Lda => load_store::execute_lda(cpu, instruction),
        Ldx => load_store::execute_ldx(cpu, instruction),
        Ldy => load_store::execute_ldy(cpu, instruction),
        Sta => load_store::execute_sta(cpu, instruction),
        Stx => load_store::execute_stx(cpu, instruction),
        Sty => load_store::execute_sty(cpu, instruction),

        Inc => inc_dec::execute_inc(cpu, instruction),
        Dec => inc_dec::execute_dec(cpu, instruction),
        Inx => inc_dec::execute_inx(cpu),
        Iny => inc_dec::execute_iny(cpu),
        Dex => inc_dec::execute_dex(cpu),
        Dey => inc_dec::execute_dey(cpu),

        Jmp => control::execute_jmp(cpu, instruction),
        Jsr => control::execute_jsr(cpu, instruction),
        Rts => control::execute_rts(cpu),
        Rti => control::execute_rti(cpu),
        Brk => control::execute_brk(cpu),
        Nop => Ok(()),
        Trap => control::execute_trap(cpu),

        Pha => stack::execute_pha(cpu),
        Php => stack::execute_php(cpu),
        Pla => stack::execute_pla(cpu),
        Plp => stack::execute_plp(cpu),

        Clc => flags::execute_clc(cpu),
        Sec => flags::execute_sec(cpu),
        Cli => flags::execute_cli(cpu),
        Sei => flags::execute_sei(cpu),
        Cld => flags::execute_cld(cpu),
        Sed => flags::execute_sed(cpu),
        Clv => flags::execute_clv(cpu),

        Tax => transfer::execute_tax(cpu),
        Tay => transfer::execute_tay(cpu),
        Txa => transfer::execute_txa(cpu),
        Tya => transfer::execute_tya(cpu),
        Tsx => transfer::execute_tsx(cpu),
        Txs => transfer::execute_txs(cpu),
    }
}
