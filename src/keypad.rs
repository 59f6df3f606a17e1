//! The sixteen-key hexadecimal keypad
//!
//! Every key moves through three states: Up, Down on a host key-press,
//! then Released on the host key-release. Released is transient; the
//! per-cycle [sweep](Keypad::sweep) folds it back to Up, so a completed
//! press-then-release edge stays observable for exactly one engine cycle.

use crate::error::{Error, Result};

/// Number of keys on the pad.
pub const KEYS: usize = 16;

/// One key's position in the press/release lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Key {
    /// Not held, no pending edge
    #[default]
    Up,
    /// Currently held by the host
    Down,
    /// Was Down, now up, not yet consumed by a cycle
    Released,
}

/// Tracks the sixteen [Key] states.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Keypad {
    keys: [Key; KEYS],
}

impl Keypad {
    /// Presses a key, and reports whether the key's state changed.
    /// If the key does not exist, returns [Error::InvalidKey].
    /// # Examples
    /// ```rust
    /// # use sunchip::keypad::*;
    /// let mut keypad = Keypad::default();
    /// assert!(keypad.press(0x7).unwrap());
    /// // pressing a key that's already down changes nothing
    /// assert!(!keypad.press(0x7).unwrap());
    /// ```
    pub fn press(&mut self, key: usize) -> Result<bool> {
        match self.keys.get_mut(key) {
            Some(state) if *state != Key::Down => {
                *state = Key::Down;
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(Error::InvalidKey { key }),
        }
    }

    /// Releases a key, and reports whether the key's state changed.
    /// A key only moves to Released from Down, so spurious host release
    /// events are inert. If the key does not exist, returns
    /// [Error::InvalidKey].
    /// # Examples
    /// ```rust
    /// # use sunchip::keypad::*;
    /// let mut keypad = Keypad::default();
    /// keypad.press(0x7).unwrap();
    /// assert!(keypad.release(0x7).unwrap());
    /// // it's no longer held
    /// assert!(!keypad.release(0x7).unwrap());
    /// ```
    pub fn release(&mut self, key: usize) -> Result<bool> {
        match self.keys.get_mut(key) {
            Some(state) if *state == Key::Down => {
                *state = Key::Released;
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(Error::InvalidKey { key }),
        }
    }

    /// Whether a key is currently held. A Released key is not down.
    pub fn is_down(&self, key: usize) -> bool {
        self.keys.get(key) == Some(&Key::Down)
    }

    /// Whether a key is strictly up. A Released key is not up either, for
    /// the one cycle it remains visible.
    pub fn is_up(&self, key: usize) -> bool {
        self.keys.get(key) == Some(&Key::Up)
    }

    /// Gets the lowest-indexed key with a pending release edge.
    pub fn first_released(&self) -> Option<usize> {
        self.keys.iter().position(|state| *state == Key::Released)
    }

    /// Folds every Released key back to Up. Runs once after each
    /// completed, non-stalled instruction.
    pub fn sweep(&mut self) {
        for state in &mut self.keys {
            if *state == Key::Released {
                *state = Key::Up;
            }
        }
    }

    /// Returns every key to Up.
    pub fn reset(&mut self) {
        self.keys = [Key::Up; KEYS];
    }
}
