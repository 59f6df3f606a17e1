//! Controls the [Quirks] behavior of the CPU on a granular level.

/// Controls the quirk behavior of the CPU on a granular level.
///
/// `false` is Cosmac-VIP-like behavior
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quirks {
    /// Super Chip: Binary ops in `8xy`(`1`, `2`, `3`) shouldn't set vF to 0
    pub bin_ops: bool,
    /// Super Chip: Shift ops in `8xy`(`6`, `E`) shouldn't source from vY instead of vX
    pub shift: bool,
    /// Super Chip: DMA instructions `Fx55`/`Fx65` shouldn't change I to I + x + 1
    pub dma_inc: bool,
    /// Super Chip: Indexed jump `Bnnn` should use v`x` (high nibble of `nnn`) instead of v0
    pub jumps: bool,
    /// XO-Chip: Draw operations should wrap from bottom to top and side to side
    pub screen_wrap: bool,
    /// VIP variant: the call stack lives in RAM below the load offset,
    /// written through SP as two big-endian bytes per frame
    pub memory_stack: bool,
    /// XO-Chip: a taken skip should step over a whole 4-byte `F000` word
    pub wide_skips: bool,
}

impl From<bool> for Quirks {
    fn from(value: bool) -> Self {
        if value {
            Quirks {
                bin_ops: true,
                shift: true,
                dma_inc: true,
                jumps: true,
                screen_wrap: false,
                memory_stack: false,
                wide_skips: false,
            }
        } else {
            Quirks {
                bin_ops: false,
                shift: false,
                dma_inc: false,
                jumps: false,
                screen_wrap: false,
                memory_stack: false,
                wide_skips: false,
            }
        }
    }
}

impl Default for Quirks {
    fn default() -> Self {
        Self::from(true)
    }
}
