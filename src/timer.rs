//! The delay and sound timers
//!
//! Two 8-bit counters that decrement toward zero once per logical timer
//! tick, at a rate the [Scheduler](crate::sched::Scheduler) keeps
//! independent of instruction rate. While the sound counter is non-zero
//! the tone signal is asserted; it drops the instant the counter hits
//! zero.

/// The two rate-gated countdown registers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timers {
    delay: u8,
    sound: u8,
}

impl Timers {
    /// Decrements each non-zero counter by one. Called once per logical
    /// timer tick, never per instruction.
    pub fn tick(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }

    /// Gets the delay counter (`Fx07`).
    pub fn delay(&self) -> u8 {
        self.delay
    }

    /// Gets the sound counter.
    pub fn sound(&self) -> u8 {
        self.sound
    }

    /// Sets the delay counter (`Fx15`).
    pub fn set_delay(&mut self, value: u8) {
        self.delay = value;
    }

    /// Sets the sound counter (`Fx18`).
    pub fn set_sound(&mut self, value: u8) {
        self.sound = value;
    }

    /// Whether the host should be producing a tone right now.
    pub fn beeping(&self) -> bool {
        self.sound > 0
    }

    /// Zeroes both counters.
    pub fn reset(&mut self) {
        *self = Timers::default();
    }
}
