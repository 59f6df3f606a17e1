// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Error type for sunchip
//!
//! Execution-time faults ([StackOverflow](Error::StackOverflow),
//! [StackUnderflow](Error::StackUnderflow),
//! [UnsupportedInstruction](Error::UnsupportedInstruction),
//! [InvalidAddress](Error::InvalidAddress),
//! [ProtectedAddress](Error::ProtectedAddress)) abort the offending
//! instruction's effect and leave the machine runnable; the host decides
//! whether to log them, ignore them, or stop.

use thiserror::Error;

/// Result type, equivalent to [std::result::Result]<T, [enum@Error]>
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for sunchip.
#[derive(Debug, Error)]
pub enum Error {
    /// The ROM image does not fit between the load offset and the end of RAM
    #[error("rom is {size} bytes, but only {max} fit above the load offset")]
    RomTooLarge {
        /// Size of the offending ROM image
        size: usize,
        /// Bytes available above the load offset
        max: usize,
    },
    /// A call would push past the stack's fixed capacity
    #[error("call stack exceeded its {depth} frame capacity")]
    StackOverflow {
        /// The stack's frame capacity
        depth: usize,
    },
    /// A return was executed with no frame on the stack
    #[error("return with an empty call stack")]
    StackUnderflow,
    /// The word at the program counter did not decode to a known instruction
    #[error("opcode {word:04x} not recognized")]
    UnsupportedInstruction {
        /// The offending word
        word: u16,
    },
    /// An address fell outside addressable memory
    #[error("address {addr:04x} is outside addressable memory")]
    InvalidAddress {
        /// The offending address
        addr: u16,
    },
    /// A program store targeted the reserved region below the load offset
    #[error("write to {addr:04x} in the reserved region below the load offset")]
    ProtectedAddress {
        /// The offending address
        addr: u16,
    },
    /// Tried to press a key that doesn't exist
    #[error("tried to press key {key:X} which does not exist")]
    InvalidKey {
        /// The offending key
        key: usize,
    },
    /// Tried to get/set an out-of-bounds register
    #[error("tried to access register v{reg:X} which does not exist")]
    InvalidRegister {
        /// The offending register
        reg: usize,
    },
    /// Tried to convert string into mode, but it did not match.
    #[error("no suitable conversion of \"{mode}\" into Mode")]
    InvalidMode {
        /// The string which failed to become a mode
        mode: String,
    },
    /// Error originated in [std::io]
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}
