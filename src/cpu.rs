//! # CPU State and Execution
//!
//! This module contains the CPU struct representing the 6502 processor state,
//! the fetch-decode-execute step, interrupt entry and the stack.
//!
//! ## Execution Model
//!
//! - `step()`: Execute one whole instruction; there is no cycle timing
//! - `interrupt()`: Enter the interrupt service routine if allowed
//!
//! The host loop calls `step`, then polls the bus IRQ line and calls
//! `interrupt` when it is asserted, so interrupts are only ever taken
//! between instructions.
//!
//! ## Stack
//!
//! The stack lives in page one (0x0100-0x01FF). A push writes at
//! `0x0100 + SP` and then decrements SP; a pop increments SP and then
//! reads. SP wraps modulo 256, so overflow and underflow stay inside the
//! page without any fault.

use crate::instructions;
use crate::opcodes::{instruction_set, Instruction};
use crate::registers::{Flags, Registers};
use crate::{ExecutionError, MemoryBus};
use log::trace;

/// Reset vector address.
pub const VEC_RESET: u16 = 0xFFFC;
/// IRQ/BRK vector address.
pub const VEC_INTERRUPT: u16 = 0xFFFE;
/// Base address of the stack page.
pub const STACK_BOTTOM: u16 = 0x0100;

/// Host callback invoked by the `TRAP` pseudo instruction.
///
/// Receives the accumulator as a selector and mutable access to the bus so
/// it can move program images in and out of memory.
pub type TrapHandler<M> = Box<dyn FnMut(u8, &mut M)>;

/// 6502 CPU state and execution context.
///
/// Generic over the memory implementation via the `MemoryBus` trait; the CPU
/// owns its bus and reaches devices only through it.
///
/// # Examples
///
/// ```
/// use pet6502::{CPU, FlatMemory, MemoryBus};
///
/// // Create memory and set reset vector
/// let mut memory = FlatMemory::new();
/// memory.write(0xFFFC, 0x00); // Low byte
/// memory.write(0xFFFD, 0x80); // High byte (PC = 0x8000)
///
/// // Initialize CPU - loads PC from reset vector
/// let cpu = CPU::new(memory);
///
/// // Inspect initial state
/// assert_eq!(cpu.pc(), 0x8000);
/// assert_eq!(cpu.a(), 0xAA);
/// assert_eq!(cpu.sp(), 0xFF);
/// assert_eq!(cpu.flag_i(), true); // Interrupt disable set on reset
/// assert_eq!(cpu.instruction_count(), 0);
/// ```
pub struct CPU<M: MemoryBus> {
    /// Register file
    pub(crate) regs: Registers,

    /// Opcode descriptors, rebuilt on every reset
    instruction_set: [Option<Instruction>; 256],

    /// Number of instructions executed since reset
    pub(crate) instruction_count: u64,

    /// Set while servicing an interrupt; only RTI clears it
    pub(crate) in_interrupt: bool,

    /// Emulator trap callback
    pub(crate) trap: Option<TrapHandler<M>>,

    /// Memory bus implementation
    pub(crate) memory: M,
}

impl<M: MemoryBus> CPU<M> {
    /// Creates a new CPU attached to `memory` and resets it.
    ///
    /// See [`CPU::reset`] for the resulting state.
    pub fn new(memory: M) -> Self {
        let mut cpu = Self {
            regs: Registers::default(),
            instruction_set: [None; 256],
            instruction_count: 0,
            in_interrupt: false,
            trap: None,
            memory,
        };
        cpu.reset();
        cpu
    }

    /// Resets the CPU as though RST had been asserted.
    ///
    /// - A = 0xAA, X = Y = 0, SP = 0xFF
    /// - PC is loaded from the reset vector at 0xFFFC/0xFFFD
    /// - I and B set, D clear
    /// - Instruction table rebuilt, instruction count zeroed, interrupt guard cleared
    ///
    /// Calling it again restarts execution; the trap handler is kept.
    pub fn reset(&mut self) {
        self.regs.a = 0xAA;
        self.regs.x = 0x00;
        self.regs.y = 0x00;

        self.regs.s = 0xFF;
        self.regs.pc = self.memory.read_word(VEC_RESET);
        self.regs.ir = 0x00;

        self.regs.p.reset();

        self.instruction_set = instruction_set();
        self.instruction_count = 0;
        self.in_interrupt = false;
    }

    /// Executes one instruction.
    ///
    /// Fetches the opcode at PC, looks up its descriptor and runs the
    /// handler, which consumes the instruction's operand bytes.
    ///
    /// # Errors
    ///
    /// - `UnknownOpcode` if the byte has no descriptor (PC is left just past it)
    /// - `UnsupportedMode` if a handler rejects its addressing mode
    ///
    /// Both are fatal; the CPU does not attempt recovery.
    ///
    /// # Examples
    ///
    /// ```
    /// use pet6502::{CPU, ExecutionError, FlatMemory, MemoryBus};
    ///
    /// let mut mem = FlatMemory::new();
    /// mem.write(0xFFFC, 0x00);
    /// mem.write(0xFFFD, 0x80);
    /// mem.write(0x8000, 0xEA); // NOP
    /// mem.write(0x8001, 0x02); // not an opcode
    ///
    /// let mut cpu = CPU::new(mem);
    ///
    /// assert!(cpu.step().is_ok());
    /// assert_eq!(cpu.step(), Err(ExecutionError::UnknownOpcode(0x02)));
    /// ```
    pub fn step(&mut self) -> Result<(), ExecutionError> {
        let address = self.regs.pc;
        let opcode = self.fetch_byte();
        self.regs.ir = opcode;

        let instruction = self.instruction_set[opcode as usize]
            .ok_or(ExecutionError::UnknownOpcode(opcode))?;

        if log::log_enabled!(log::Level::Trace) {
            let operand = match instruction.bytes {
                0 => 0,
                1 => self.memory.read(self.regs.pc) as u16,
                _ => self.memory.read_word(self.regs.pc),
            };
            trace!(
                "{}:\t${:04x}:\t${:02x}:\t(S: ${:02x})\t(A: ${:02x}, X: ${:02x}, Y: ${:02x})\t{}",
                self.instruction_count,
                address,
                opcode,
                self.regs.s,
                self.regs.a,
                self.regs.x,
                self.regs.y,
                instruction.disassemble(operand)
            );
        }

        self.instruction_count += 1;

        instructions::execute(self, &instruction)
    }

    /// Enters the interrupt service routine.
    ///
    /// Proceeds only when the I flag is clear and no interrupt is already
    /// being serviced. On entry pushes PC - 1 (RTI resumes at popped + 1)
    /// and the packed flags, sets the in-service guard and loads PC from
    /// the vector at 0xFFFE/0xFFFF.
    ///
    /// Returns `true` if the interrupt was taken.
    pub fn interrupt(&mut self) -> bool {
        if self.regs.p.interrupt || self.in_interrupt {
            return false;
        }

        self.in_interrupt = true;

        self.push_word(self.regs.pc.wrapping_sub(1));
        self.push_byte(self.regs.p.to_byte());

        self.regs.pc = self.memory.read_word(VEC_INTERRUPT);
        trace!("interrupt: entering handler at ${:04x}", self.regs.pc);

        true
    }

    /// Registers the callback invoked by the `TRAP` pseudo instruction.
    pub fn set_trap<F>(&mut self, handler: F)
    where
        F: FnMut(u8, &mut M) + 'static,
    {
        self.trap = Some(Box::new(handler));
    }

    // ========== Stack ==========

    pub(crate) fn push_byte(&mut self, value: u8) {
        let addr = STACK_BOTTOM | self.regs.s as u16;
        self.memory.write(addr, value);
        self.regs.s = self.regs.s.wrapping_sub(1);
    }

    /// Pushes a word: low byte at SP - 1, high byte at SP, then SP -= 2.
    pub(crate) fn push_word(&mut self, value: u16) {
        let lo = STACK_BOTTOM | self.regs.s.wrapping_sub(1) as u16;
        let hi = STACK_BOTTOM | self.regs.s as u16;
        self.memory.write(lo, (value & 0xFF) as u8);
        self.memory.write(hi, (value >> 8) as u8);
        self.regs.s = self.regs.s.wrapping_sub(2);
    }

    pub(crate) fn pop_byte(&mut self) -> u8 {
        self.regs.s = self.regs.s.wrapping_add(1);
        self.memory.read(STACK_BOTTOM | self.regs.s as u16)
    }

    pub(crate) fn pop_word(&mut self) -> u16 {
        self.regs.s = self.regs.s.wrapping_add(2);
        let lo = self.memory.read(STACK_BOTTOM | self.regs.s.wrapping_sub(1) as u16) as u16;
        let hi = self.memory.read(STACK_BOTTOM | self.regs.s as u16) as u16;
        (hi << 8) | lo
    }

    // ========== Diagnostics ==========

    /// Formats the register and flag state for a diagnostic dump.
    pub fn dump(&self) -> String {
        format!(
            "\tPC: ${:04x}\n\tA: ${:02x}\n\tX: ${:02x}\n\tY: ${:02x}\n\tS: ${:02x}\n\tP: {} (${:02x})\n\tinstructions: {}\n\tin interrupt: {}\n",
            self.regs.pc,
            self.regs.a,
            self.regs.x,
            self.regs.y,
            self.regs.s,
            self.regs.p,
            self.regs.p.to_byte(),
            self.instruction_count,
            self.in_interrupt,
        )
    }

    /// Formats `len` bytes starting at `start`, four per line.
    pub fn dump_memory(&self, start: u16, len: usize) -> String {
        (0..len)
            .step_by(4)
            .map(|row| {
                let cells: Vec<String> = (row..len.min(row + 4))
                    .map(|i| {
                        let addr = start.wrapping_add(i as u16);
                        format!("0x{:04x}: 0x{:02x}", addr, self.memory.read(addr))
                    })
                    .collect();
                format!("{}\n", cells.join(",\t"))
            })
            .collect()
    }

    // ========== Register Getters ==========

    /// Returns the accumulator register value.
    pub fn a(&self) -> u8 {
        self.regs.a
    }

    /// Returns the X index register value.
    pub fn x(&self) -> u8 {
        self.regs.x
    }

    /// Returns the Y index register value.
    pub fn y(&self) -> u8 {
        self.regs.y
    }

    /// Returns the program counter value.
    pub fn pc(&self) -> u16 {
        self.regs.pc
    }

    /// Returns the stack pointer value.
    ///
    /// Note: The full stack address is 0x0100 + SP. The stack grows downward from 0x01FF.
    pub fn sp(&self) -> u8 {
        self.regs.s
    }

    /// Returns the opcode of the most recently fetched instruction.
    pub fn ir(&self) -> u8 {
        self.regs.ir
    }

    /// Returns the status register packed as NV-BDIZC (bit 5 always 1).
    pub fn status(&self) -> u8 {
        self.regs.p.to_byte()
    }

    /// Returns the processor flags.
    pub fn flags(&self) -> Flags {
        self.regs.p
    }

    /// Returns a copy of the whole register file.
    pub fn registers(&self) -> Registers {
        self.regs
    }

    /// Returns the number of instructions executed since reset.
    pub fn instruction_count(&self) -> u64 {
        self.instruction_count
    }

    /// Returns true while an interrupt is being serviced (until RTI).
    pub fn in_interrupt(&self) -> bool {
        self.in_interrupt
    }

    /// Returns a shared reference to the memory bus.
    pub fn memory(&self) -> &M {
        &self.memory
    }

    /// Returns a mutable reference to the memory bus.
    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }

    // ========== Status Flag Getters ==========

    /// Returns true if the Negative flag is set.
    pub fn flag_n(&self) -> bool {
        self.regs.p.negative
    }

    /// Returns true if the Overflow flag is set.
    pub fn flag_v(&self) -> bool {
        self.regs.p.overflow
    }

    /// Returns true if the Break flag is set.
    pub fn flag_b(&self) -> bool {
        self.regs.p.brk
    }

    /// Returns true if the Decimal mode flag is set.
    pub fn flag_d(&self) -> bool {
        self.regs.p.decimal
    }

    /// Returns true if the Interrupt Disable flag is set.
    pub fn flag_i(&self) -> bool {
        self.regs.p.interrupt
    }

    /// Returns true if the Zero flag is set.
    pub fn flag_z(&self) -> bool {
        self.regs.p.zero
    }

    /// Returns true if the Carry flag is set.
    pub fn flag_c(&self) -> bool {
        self.regs.p.carry
    }

    // ========== Setters ==========

    pub fn set_a(&mut self, value: u8) {
        self.regs.a = value;
    }

    pub fn set_x(&mut self, value: u8) {
        self.regs.x = value;
    }

    pub fn set_y(&mut self, value: u8) {
        self.regs.y = value;
    }

    pub fn set_pc(&mut self, value: u16) {
        self.regs.pc = value;
    }

    pub fn set_sp(&mut self, value: u8) {
        self.regs.s = value;
    }

    pub fn set_flag_n(&mut self, value: bool) {
        self.regs.p.negative = value;
    }

    pub fn set_flag_v(&mut self, value: bool) {
        self.regs.p.overflow = value;
    }

    pub fn set_flag_b(&mut self, value: bool) {
        self.regs.p.brk = value;
    }

    pub fn set_flag_d(&mut self, value: bool) {
        self.regs.p.decimal = value;
    }

    pub fn set_flag_i(&mut self, value: bool) {
        self.regs.p.interrupt = value;
    }

    pub fn set_flag_z(&mut self, value: bool) {
        self.regs.p.zero = value;
    }

    pub fn set_flag_c(&mut self, value: bool) {
        self.regs.p.carry = value;
    }
}
