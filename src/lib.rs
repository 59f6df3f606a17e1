// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! This crate implements a Chip-8 interpreter core: the machine state, the
//! fetch-decode-execute engine, the XOR sprite blit, the rate-gated timer
//! pair, the three-state keypad, and the scheduler that keeps instruction
//! rate, timer rate and refresh rate independent of one another.
//!
//! Everything presentational is a host collaborator: the host renders
//! [screen::Screen]'s cells in whatever colors it likes, plays a tone while
//! [Chip8::beeping] holds, maps its native input onto `press`/`release`
//! calls, and hands ROM images in as byte slices.

pub mod cpu;
pub mod error;
pub mod keypad;
pub mod mem;
pub mod sched;
pub mod screen;
pub mod timer;

use crate::{
    cpu::{flags::Flags, CPU},
    error::Result,
    mem::Mem,
    sched::{Rates, Scheduler},
    screen::Screen,
};
use std::{path::Path, time::Duration};

/// A complete machine: CPU, memory, display buffer, and scheduler.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chip8 {
    pub cpu: CPU,
    pub mem: Mem,
    pub screen: Screen,
    pub sched: Scheduler,
}

impl Chip8 {
    /// Constructs a machine with the given rates and flags.
    /// # Examples
    /// ```rust
    /// # use sunchip::prelude::*;
    /// let ch8 = Chip8::new(Rates::default(), Flags::default());
    /// assert_eq!(0x200, ch8.cpu.pc());
    /// ```
    pub fn new(rates: Rates, flags: Flags) -> Self {
        Chip8::with_load_offset(rates, flags, mem::LOAD_OFFSET)
    }

    /// Constructs a machine that loads and starts programs at `offset`
    /// instead of the conventional 0x200.
    pub fn with_load_offset(rates: Rates, flags: Flags, offset: u16) -> Self {
        Chip8 {
            cpu: CPU::new(mem::FONT_OFFSET, offset, flags),
            mem: Mem::new(offset),
            screen: Screen::default(),
            sched: Scheduler::new(rates),
        }
    }

    /// Reads a ROM image from disk into program space.
    ///
    /// I/O failures surface as [error::Error::IoError] and leave the
    /// machine in its pre-load state; oversized images surface as
    /// [error::Error::RomTooLarge].
    pub fn load_rom(&mut self, rom: impl AsRef<Path>) -> Result<&mut Self> {
        self.load_rom_bytes(&std::fs::read(rom)?)
    }

    /// Copies a ROM image into program space. Does not touch the program
    /// counter; pair with [Chip8::reset] in either order.
    pub fn load_rom_bytes(&mut self, rom: &[u8]) -> Result<&mut Self> {
        self.mem.load_program(rom)?;
        Ok(self)
    }

    /// Resets the machine: registers, stack, timers, keypad, display, and
    /// the font table. Loaded program bytes stay put.
    pub fn reset(&mut self) -> &mut Self {
        self.cpu.reset();
        self.mem.load_font();
        self.screen.clear();
        self.sched.reset();
        self
    }

    /// Executes one fetch-decode-execute pass.
    ///
    /// Equivalent to [CPU::step]; timer ticking belongs to [Chip8::run],
    /// which gates it at its own rate.
    pub fn cycle(&mut self) -> Result<&mut Self> {
        self.cpu.step(&mut self.mem, &mut self.screen)?;
        Ok(self)
    }

    /// Advances the machine by an elapsed span of host time: executes the
    /// instructions that fell due, applies the timer ticks that fell due
    /// (even while the CPU is stalled on a key-wait), and reports whether
    /// the display is due for a refresh.
    ///
    /// A fault aborts the rest of the batch's instructions, but the timers
    /// still tick and the machine stays runnable.
    pub fn run(&mut self, elapsed: Duration) -> Result<bool> {
        let batch = self.sched.advance(elapsed);
        let mut result = Ok(());
        for _ in 0..batch.cycles {
            if self.cpu.flags.is_paused() {
                break;
            }
            if let Err(error) = self.cpu.step(&mut self.mem, &mut self.screen) {
                result = Err(error);
                break;
            }
        }
        for _ in 0..batch.timer_ticks {
            self.cpu.tick_timers();
        }
        result.map(|()| batch.refresh)
    }

    /// Whether the host should be producing a tone right now.
    pub fn beeping(&self) -> bool {
        self.cpu.beeping()
    }
}

/// Common imports for sunchip
pub mod prelude {
    pub use super::Chip8;
    pub use crate::cpu::{flags::Flags, mode::Mode, quirks::Quirks, CPU, STACK_DEPTH};
    pub use crate::error::{Error, Result};
    pub use crate::keypad::{Key, Keypad};
    pub use crate::mem::{Mem, FONT, FONT_OFFSET, LOAD_OFFSET, RAM_SIZE};
    pub use crate::sched::{Batch, Rates, Scheduler};
    pub use crate::screen::Screen;
    pub use crate::timer::Timers;
}
