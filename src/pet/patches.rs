//! KERNAL patches that route tape LOAD and SAVE through emulator traps.
//!
//! Each stub preserves the caller's registers, loads a trap selector into A,
//! executes TRAP and returns. The BASIC 4 stubs also print the usual tape
//! prompts through KERNAL routines first.

use crate::opcodes::{
    INS_JSR_AB, INS_LDA_IM, INS_LDA_ZP, INS_LDY_IM, INS_ORA_IM, INS_PHA, INS_PHP, INS_PLA,
    INS_PLP, INS_RTS, INS_TAY, INS_TRAP, INS_TYA,
};

/// KERNAL jump vector for LOAD.
pub const VEC_LOAD: u16 = 0xFFD5;
/// KERNAL jump vector for SAVE.
pub const VEC_SAVE: u16 = 0xFFD8;

/// Trap selector for LOAD.
pub const TRAP_LOAD: u8 = 0x01;
/// Trap selector for SAVE.
pub const TRAP_SAVE: u8 = 0x02;

/// Start of BASIC program text (zero page pointer).
pub const TXTTAB: u16 = 0x28;
/// Start of BASIC variables, one past the program (zero page pointer).
pub const VARTAB: u16 = 0x2A;

pub const LOAD_PATCH_V2: &[u8] = &[
    INS_PHP, INS_PHA, INS_LDA_IM, TRAP_LOAD, INS_TRAP, INS_PLA, INS_PLP, INS_RTS,
];

pub const SAVE_PATCH_V2: &[u8] = &[
    INS_PHP, INS_PHA, INS_LDA_IM, TRAP_SAVE, INS_TRAP, INS_PLA, INS_PLP, INS_RTS,
];

// BASIC 4 message printer ($F185, message offset in Y) and character output ($E202)
#[rustfmt::skip]
pub const LOAD_PATCH_V4: &[u8] = &[
    INS_PHP, INS_PHA, INS_TYA, INS_PHA,
    INS_LDY_IM, 0x41, INS_JSR_AB, 0x85, 0xF1, // PRESS PLAY
    INS_LDY_IM, 0x56, INS_JSR_AB, 0x85, 0xF1, // ON TAPE #
    INS_LDA_ZP, 0xD4, INS_ORA_IM, 0x30, INS_JSR_AB, 0x02, 0xE2,
    INS_LDA_IM, TRAP_LOAD, INS_TRAP,
    INS_PLA, INS_TAY, INS_PLA, INS_PLP, INS_RTS,
];

#[rustfmt::skip]
pub const SAVE_PATCH_V4: &[u8] = &[
    INS_PHP, INS_PHA, INS_TYA, INS_PHA,
    INS_LDY_IM, 0x41, INS_JSR_AB, 0x85, 0xF1, // PRESS PLAY
    INS_LDY_IM, 0x4D, INS_JSR_AB, 0x85, 0xF1, // & RECORD
    INS_LDY_IM, 0x56, INS_JSR_AB, 0x85, 0xF1, // ON TAPE #
    INS_LDA_ZP, 0xD4, INS_ORA_IM, 0x30, INS_JSR_AB, 0x02, 0xE2,
    INS_LDY_IM, 0x64, INS_JSR_AB, 0x85, 0xF1, // WRITING
    INS_LDA_IM, TRAP_SAVE, INS_TRAP,
    INS_PLA, INS_TAY, INS_PLA, INS_PLP, INS_RTS,
];
