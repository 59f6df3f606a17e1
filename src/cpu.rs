// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Decodes and runs instructions

#[cfg(test)]
mod tests;

pub mod behavior;
pub mod flags;
pub mod instruction;
pub mod mode;
pub mod quirks;

use self::{flags::Flags, instruction::Insn};
pub use self::{mode::Mode, quirks::Quirks};
use crate::{
    error::{Error, Result},
    keypad::Keypad,
    mem::{Mem, FONT_OFFSET, LOAD_OFFSET},
    screen::Screen,
    timer::Timers,
};
use imperative_rs::InstructionSet;
use owo_colors::OwoColorize;
use std::fmt::Debug;

type Reg = usize;
type Adr = u16;
type Nib = u8;

/// Call stack capacity, in frames, for either stack discipline.
pub const STACK_DEPTH: usize = 12;

/// Represents the internal state of the CPU interpreter
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CPU {
    /// Flags that control how the CPU behaves, but which aren't inherent to
    /// the chip-8. Includes [quirks::Quirks], pause/halt state, etc.
    pub flags: Flags,
    // memory map info
    font: Adr,
    start: Adr,
    // call stack; `stack` backs the frame-array discipline, `sp` the
    // memory-backed one selected by the `memory_stack` quirk
    stack: Vec<Adr>,
    sp: Adr,
    // registers
    pc: Adr,
    i: Adr,
    v: [u8; 16],
    // peripherals
    timers: Timers,
    keypad: Keypad,
    // Execution data
    cycle: usize,
}

// public interface
impl CPU {
    /// Constructs a new CPU, taking all configurable parameters
    /// # Examples
    /// ```rust
    /// # use sunchip::prelude::*;
    /// let cpu = CPU::new(
    ///     0x000,  // font location
    ///     0x200,  // start of program
    ///     Flags::default(),
    /// );
    /// dbg!(cpu);
    /// ```
    pub fn new(font: Adr, start: Adr, flags: Flags) -> Self {
        let mut cpu = CPU {
            font,
            start,
            flags,
            ..Default::default()
        };
        cpu.pc = start;
        cpu.sp = cpu.stack_base();
        cpu
    }

    /// Presses a key, and reports whether the key's state changed.
    /// If key does not exist, returns [Error::InvalidKey].
    ///
    /// # Examples
    /// ```rust
    /// # use sunchip::prelude::*;
    /// let mut cpu = CPU::default();
    ///
    /// // press key `7`
    /// let did_press = cpu.press(0x7).unwrap();
    /// assert!(did_press);
    ///
    /// // press key `7` again, even though it's already pressed
    /// let did_press = cpu.press(0x7).unwrap();
    /// // it was already pressed, so nothing's changed.
    /// assert!(!did_press);
    /// ```
    pub fn press(&mut self, key: usize) -> Result<bool> {
        self.keypad.press(key)
    }

    /// Releases a key, and reports whether the key's state changed.
    /// If key is outside range `0..=0xF`, returns [Error::InvalidKey].
    ///
    /// The key parks in the Released state until the cycle after the next
    /// completed instruction, so a wait-for-key can observe the edge.
    /// # Examples
    /// ```rust
    /// # use sunchip::prelude::*;
    /// let mut cpu = CPU::default();
    /// // press key `7`
    /// cpu.press(0x7).unwrap();
    /// // release key `7`
    /// let changed = cpu.release(0x7).unwrap();
    /// assert!(changed); // key released
    /// // try releasing `7` again
    /// let changed = cpu.release(0x7).unwrap();
    /// assert!(!changed); // key was not held
    /// ```
    pub fn release(&mut self, key: usize) -> Result<bool> {
        self.keypad.release(key)
    }

    /// Sets a general purpose register in the CPU.
    /// If the register doesn't exist, returns [Error::InvalidRegister]
    /// # Examples
    /// ```rust
    /// # use sunchip::prelude::*;
    /// // Create a new CPU, and set v4 to 0x41
    /// let mut cpu = CPU::default();
    /// cpu.set_v(0x4, 0x41).unwrap();
    /// ```
    pub fn set_v(&mut self, reg: Reg, value: u8) -> Result<()> {
        if let Some(gpr) = self.v.get_mut(reg) {
            *gpr = value;
            Ok(())
        } else {
            Err(Error::InvalidRegister { reg })
        }
    }

    /// Gets a slice of the entire general purpose registers
    /// # Examples
    /// ```rust
    /// # use sunchip::prelude::*;
    /// let mut cpu = CPU::default();
    /// cpu.set_v(0x0, 0x41).unwrap();
    /// assert_eq!(
    ///     cpu.v(),
    ///     [0x41, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]
    /// )
    /// ```
    pub fn v(&self) -> &[u8] {
        self.v.as_slice()
    }

    /// Gets the program counter
    /// # Examples
    /// ```rust
    /// # use sunchip::prelude::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(0x200, cpu.pc());
    /// ```
    pub fn pc(&self) -> Adr {
        self.pc
    }

    /// Gets the I register
    pub fn i(&self) -> Adr {
        self.i
    }

    /// Gets the current call stack depth, whichever discipline is active
    pub fn depth(&self) -> usize {
        if self.flags.quirks.memory_stack {
            (self.sp.saturating_sub(self.stack_base()) / 2) as usize
        } else {
            self.stack.len()
        }
    }

    /// Gets the value in the Delay Timer register
    pub fn delay(&self) -> u8 {
        self.timers.delay()
    }

    /// Gets the value in the Sound Timer register
    pub fn sound(&self) -> u8 {
        self.timers.sound()
    }

    /// Whether the tone signal is asserted, for the host's audio collaborator
    pub fn beeping(&self) -> bool {
        self.timers.beeping()
    }

    /// Gets a read-only view of the keypad
    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    /// Ticks both timers once. The scheduler calls this at the timer rate,
    /// never per instruction, and keeps calling it while the CPU is
    /// stalled on a key-wait.
    pub fn tick_timers(&mut self) {
        self.timers.tick();
    }

    /// Gets the number of cycles the CPU has executed
    /// # Examples
    /// ```rust
    /// # use sunchip::prelude::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(0x0, cpu.cycle());
    /// ```
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    /// Soft resets the CPU, releasing any stall and
    /// reinitializing the program counter to the load offset
    /// # Examples
    /// ```rust
    /// # use sunchip::prelude::*;
    /// let mut cpu = CPU::new(0x000, 0x340, Flags::default());
    /// cpu.flags.keypause = true;
    /// assert_eq!(0x340, cpu.pc());
    /// cpu.soft_reset();
    /// assert_eq!(0x340, cpu.pc());
    /// assert_eq!(false, cpu.flags.keypause);
    /// ```
    pub fn soft_reset(&mut self) {
        self.pc = self.start;
        self.flags.keypause = false;
        self.flags.halt = false;
    }

    /// Resets the machine state: stack, pc, registers, timers, keypad, and
    /// cycle count. Does not touch [quirks::Quirks], [mode::Mode], pause,
    /// or debug.
    ///
    /// Independent of program loading; load and reset can happen in either
    /// order, and both are idempotent.
    pub fn reset(&mut self) {
        self.flags.keypause = false;
        self.flags.halt = false;
        // clear the stack, both disciplines
        self.stack.truncate(0);
        self.sp = self.stack_base();
        // Reset the program counter
        self.pc = self.start;
        // Zero the registers
        self.i = 0;
        self.v = [0; 16];
        // peripherals
        self.timers.reset();
        self.keypad.reset();
        // Execution data
        self.cycle = 0;
    }

    /// Unpauses the emulator for a single step, even if `flags.pause` is
    /// set.
    ///
    /// Like with [CPU::step], this returns the fault if the instruction
    /// misbehaves.
    pub fn singlestep(&mut self, mem: &mut Mem, screen: &mut Screen) -> Result<&mut Self> {
        self.flags.pause = false;
        self.step(mem, screen)?;
        self.flags.pause = true;
        Ok(self)
    }

    /// Executes a single instruction: fetch two bytes at pc, decode,
    /// advance pc, dispatch, then fold consumed key releases.
    ///
    /// Faults ([Error::UnsupportedInstruction], [Error::StackOverflow],
    /// [Error::StackUnderflow], [Error::InvalidAddress],
    /// [Error::ProtectedAddress]) leave the machine consistent and
    /// runnable; the host may log them and keep stepping.
    /// # Examples
    /// ```rust
    /// # use sunchip::prelude::*;
    /// let (mut cpu, mut mem, mut screen) = (CPU::default(), Mem::default(), Screen::default());
    /// mem.load_program(&[
    ///     0x00, 0xe0, // cls
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ]).unwrap();
    /// cpu.step(&mut mem, &mut screen)
    ///     .expect("0x00e0 (cls) should be a valid opcode.");
    /// assert_eq!(0x202, cpu.pc());
    /// assert_eq!(1, cpu.cycle());
    /// ```
    pub fn step(&mut self, mem: &mut Mem, screen: &mut Screen) -> Result<&mut Self> {
        // Do nothing if paused or halted
        if self.flags.is_paused() {
            return Ok(self);
        }
        self.cycle += 1;
        let pc = self.pc;

        // fetch and decode the instruction word
        let word = mem.read_word(pc)?;
        let result = match Insn::decode(&word.to_be_bytes()) {
            Ok((len, insn)) => {
                // Advance pc before dispatch, so control-flow ops that set
                // it absolutely aren't double-advanced
                self.pc = self.pc.wrapping_add(len as Adr);
                if self.flags.debug {
                    std::println!("{:3} {:03x}: {}", self.cycle.bright_black(), pc, insn);
                }
                self.execute(insn, mem, screen)
            }
            Err(_) => {
                // not an instruction we know; report it and move on
                self.pc = self.pc.wrapping_add(2);
                Err(Error::UnsupportedInstruction { word })
            }
        };

        // A stalled key-wait hasn't completed, and its pending release
        // edges must survive until it consumes one
        if !self.flags.keypause {
            self.keypad.sweep();
        }
        result.map(|()| self)
    }

    /// Dumps the current state of all CPU registers, and the cycle count
    /// # Examples
    /// ```rust
    /// # use sunchip::prelude::*;
    /// let mut cpu = CPU::default();
    /// cpu.dump();
    /// ```
    /// outputs
    /// ```text
    /// PC: 0200, SP: 0000, I: 0000
    /// v0: 00 v1: 00 v2: 00 v3: 00
    /// v4: 00 v5: 00 v6: 00 v7: 00
    /// v8: 00 v9: 00 vA: 00 vB: 00
    /// vC: 00 vD: 00 vE: 00 vF: 00
    /// DLY: 0, SND: 0, CYC:      0
    /// ```
    pub fn dump(&self) {
        std::println!(
            "PC: {:04x}, SP: {:04x}, I: {:04x}\n{}DLY: {}, SND: {}, CYC: {:6}",
            self.pc,
            self.depth(),
            self.i,
            self.v
                .into_iter()
                .enumerate()
                .map(|(i, gpr)| {
                    format!(
                        "v{i:X}: {gpr:02x} {}",
                        match i % 4 {
                            3 => "\n",
                            _ => "",
                        }
                    )
                })
                .collect::<String>(),
            self.timers.delay(),
            self.timers.sound(),
            self.cycle,
        );
    }
}

// call stack, both disciplines
impl CPU {
    /// First address of the memory-backed stack window, directly below the
    /// load offset.
    fn stack_base(&self) -> Adr {
        self.start.saturating_sub(2 * STACK_DEPTH as Adr)
    }

    fn push(&mut self, adr: Adr, mem: &mut Mem) -> Result<()> {
        if self.flags.quirks.memory_stack {
            if self.sp >= self.start {
                return Err(Error::StackOverflow { depth: STACK_DEPTH });
            }
            let [hi, lo] = adr.to_be_bytes();
            mem.write(self.sp, hi)?;
            mem.write(self.sp.wrapping_add(1), lo)?;
            self.sp = self.sp.wrapping_add(2);
            Ok(())
        } else if self.stack.len() < STACK_DEPTH {
            self.stack.push(adr);
            Ok(())
        } else {
            Err(Error::StackOverflow { depth: STACK_DEPTH })
        }
    }

    fn pop(&mut self, mem: &Mem) -> Result<Adr> {
        if self.flags.quirks.memory_stack {
            if self.sp <= self.stack_base() {
                return Err(Error::StackUnderflow);
            }
            self.sp = self.sp.wrapping_sub(2);
            mem.read_word(self.sp)
        } else {
            self.stack.pop().ok_or(Error::StackUnderflow)
        }
    }
}

impl Debug for CPU {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CPU")
            .field("flags", &self.flags)
            .field("font", &self.font)
            .field("start", &self.start)
            .field("stack", &self.stack)
            .field("sp", &self.sp)
            .field("pc", &self.pc)
            .field("i", &self.i)
            .field("v", &self.v)
            .field("timers", &self.timers)
            .field("keypad", &self.keypad)
            .field("cycle", &self.cycle)
            .finish_non_exhaustive()
    }
}

impl Default for CPU {
    /// Constructs a new CPU with sane defaults
    ///
    /// | value  | default | description
    /// |--------|---------|------------
    /// | font   |`0x0000` | Location of font memory.
    /// | start  |`0x0200` | Start location. Generally 0x200 or 0x600.
    ///
    /// # Examples
    /// ```rust
    /// use sunchip::prelude::*;
    /// let mut cpu = CPU::default();
    /// ```
    fn default() -> Self {
        CPU {
            flags: Flags::default(),
            font: FONT_OFFSET,
            start: LOAD_OFFSET,
            stack: vec![],
            sp: LOAD_OFFSET - 2 * STACK_DEPTH as Adr,
            pc: LOAD_OFFSET,
            i: 0,
            v: [0; 16],
            timers: Timers::default(),
            keypad: Keypad::default(),
            cycle: 0,
        }
    }
}
