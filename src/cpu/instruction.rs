// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Contains the definition of a Chip-8 [Insn]
//!
//! Decoding is a flat pattern match over the whole instruction word, so
//! there is no nested-switch fallthrough: a word either names exactly one
//! of these variants or it fails to decode.

use imperative_rs::InstructionSet;
use std::fmt::Display;

#[allow(non_camel_case_types, non_snake_case, missing_docs)]
#[derive(Clone, Copy, Debug, InstructionSet, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// One decoded Chip-8 instruction
pub enum Insn {
    // Base instruction set
    /// | 00e0 | Clear screen memory to 0s
    #[opcode = "0x00e0"]
    cls,
    /// | 00ee | Return from subroutine
    #[opcode = "0x00ee"]
    ret,
    /// | 1aaa | Jumps to an absolute address
    #[opcode = "0x1AAA"]
    jmp { A: u16 },
    /// | 2aaa | Pushes the return address onto the stack, then jumps to a
    #[opcode = "0x2AAA"]
    call { A: u16 },
    /// | 3xbb | Skips next instruction if register X == b
    #[opcode = "0x3xBB"]
    seb { x: usize, B: u8 },
    /// | 4xbb | Skips next instruction if register X != b
    #[opcode = "0x4xBB"]
    sneb { x: usize, B: u8 },
    /// | 5xy0 | Skips next instruction if vX == vY
    #[opcode = "0x5xy0"]
    se { y: usize, x: usize },
    /// | 6xbb | Loads immediate byte b into register vX
    #[opcode = "0x6xBB"]
    movb { x: usize, B: u8 },
    /// | 7xbb | Adds immediate byte b to register vX, no flag
    #[opcode = "0x7xBB"]
    addb { x: usize, B: u8 },
    /// | 8xy0 | Loads the value of vY into vX
    #[opcode = "0x8xy0"]
    mov { y: usize, x: usize },
    /// | 8xy1 | Performs bitwise or of vX and vY, and stores the result in vX
    #[opcode = "0x8xy1"]
    or { y: usize, x: usize },
    /// | 8xy2 | Performs bitwise and of vX and vY, and stores the result in vX
    #[opcode = "0x8xy2"]
    and { y: usize, x: usize },
    /// | 8xy3 | Performs bitwise xor of vX and vY, and stores the result in vX
    #[opcode = "0x8xy3"]
    xor { y: usize, x: usize },
    /// | 8xy4 | Performs addition of vX and vY, and stores the result in vX; vF = carry
    #[opcode = "0x8xy4"]
    add { y: usize, x: usize },
    /// | 8xy5 | Performs subtraction of vY from vX, and stores the result in vX; vF = no borrow
    #[opcode = "0x8xy5"]
    sub { y: usize, x: usize },
    /// | 8xy6 | Performs bitwise right shift of vX (or vY); vF = shifted-out bit
    #[opcode = "0x8xy6"]
    shr { y: usize, x: usize },
    /// | 8xy7 | Performs subtraction of vX from vY, and stores the result in vX; vF = no borrow
    #[opcode = "0x8xy7"]
    bsub { y: usize, x: usize },
    /// | 8xyE | Performs bitwise left shift of vX (or vY); vF = shifted-out bit
    #[opcode = "0x8xye"]
    shl { y: usize, x: usize },
    /// | 9xy0 | Skips next instruction if vX != vY
    #[opcode = "0x9xy0"]
    sne { y: usize, x: usize },
    /// | Aaaa | Loads address #a into register I
    #[opcode = "0xaAAA"]
    movI { A: u16 },
    /// | Baaa | Jumps to &adr + v0 (or vX, under the `jumps` quirk)
    #[opcode = "0xbAAA"]
    jmpr { A: u16 },
    /// | Cxbb | Stores a random byte masked with b into vX
    #[opcode = "0xcxBB"]
    rand { x: usize, B: u8 },
    /// | Dxyn | Draws an n-byte sprite at coordinates (vX, vY); vF = collision
    #[opcode = "0xdxyn"]
    draw { y: usize, x: usize, n: u8 },
    /// | Ex9e | Skips next instruction if the key vX names is down
    #[opcode = "0xex9e"]
    sek { x: usize },
    /// | Exa1 | Skips next instruction if the key vX names is up
    #[opcode = "0xexa1"]
    snek { x: usize },
    /// | Fx07 | Reads the delay timer into vX
    #[opcode = "0xfx07"]
    getdt { x: usize },
    /// | Fx0a | Waits for a key release edge, stores the key in vX
    #[opcode = "0xfx0a"]
    waitk { x: usize },
    /// | Fx15 | Writes vX into the delay timer
    #[opcode = "0xfx15"]
    setdt { x: usize },
    /// | Fx18 | Writes vX into the sound timer
    #[opcode = "0xfx18"]
    setst { x: usize },
    /// | Fx1e | Adds vX into I
    #[opcode = "0xfx1e"]
    addI { x: usize },
    /// | Fx29 | Loads the font sprite address for digit vX into I
    #[opcode = "0xfx29"]
    font { x: usize },
    /// | Fx33 | Decomposes vX into three decimal digits at I, I+1, I+2
    #[opcode = "0xfx33"]
    bcd { x: usize },
    /// | Fx55 | Block-stores v0..=vX into memory at I
    #[opcode = "0xfx55"]
    dmao { x: usize },
    /// | Fx65 | Block-loads memory at I into v0..=vX
    #[opcode = "0xfx65"]
    dmai { x: usize },

    // Super Chip extension
    /// | 00fd | Exit: halt the machine
    #[opcode = "0x00fd"]
    exit,
}

impl Display for Insn {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // Base instruction set
            Insn::cls               => write!(f, "cls    "),
            Insn::ret               => write!(f, "ret    "),
            Insn::jmp { A }         => write!(f, "jmp    {A:03x}"),
            Insn::call { A }        => write!(f, "call   {A:03x}"),
            Insn::seb { x, B }      => write!(f, "se     #{B:02x}, v{x:X}"),
            Insn::sneb { x, B }     => write!(f, "sne    #{B:02x}, v{x:X}"),
            Insn::se { y, x }       => write!(f, "se     v{y:X}, v{x:X}"),
            Insn::movb { x, B }     => write!(f, "mov    #{B:02x}, v{x:X}"),
            Insn::addb { x, B }     => write!(f, "add    #{B:02x}, v{x:X}"),
            Insn::mov { y, x }      => write!(f, "mov    v{y:X}, v{x:X}"),
            Insn::or { y, x }       => write!(f, "or     v{y:X}, v{x:X}"),
            Insn::and { y, x }      => write!(f, "and    v{y:X}, v{x:X}"),
            Insn::xor { y, x }      => write!(f, "xor    v{y:X}, v{x:X}"),
            Insn::add { y, x }      => write!(f, "add    v{y:X}, v{x:X}"),
            Insn::sub { y, x }      => write!(f, "sub    v{y:X}, v{x:X}"),
            Insn::shr { y, x }      => write!(f, "shr    v{y:X}, v{x:X}"),
            Insn::bsub { y, x }     => write!(f, "bsub   v{y:X}, v{x:X}"),
            Insn::shl { y, x }      => write!(f, "shl    v{y:X}, v{x:X}"),
            Insn::sne { y, x }      => write!(f, "sne    v{y:X}, v{x:X}"),
            Insn::movI { A }        => write!(f, "mov    ${A:03x}, I"),
            Insn::jmpr { A }        => write!(f, "jmp    ${A:03x}+v0"),
            Insn::rand { x, B }     => write!(f, "rand   #{B:02x}, v{x:X}"),
            Insn::draw { y, x, n }  => write!(f, "draw   #{n:x}, v{x:X}, v{y:X}"),
            Insn::sek { x }         => write!(f, "sek    v{x:X}"),
            Insn::snek { x }        => write!(f, "snek   v{x:X}"),
            Insn::getdt { x }       => write!(f, "mov    DT, v{x:X}"),
            Insn::waitk { x }       => write!(f, "waitk  v{x:X}"),
            Insn::setdt { x }       => write!(f, "mov    v{x:X}, DT"),
            Insn::setst { x }       => write!(f, "mov    v{x:X}, ST"),
            Insn::addI { x }        => write!(f, "add    v{x:X}, I"),
            Insn::font { x }        => write!(f, "font   v{x:X}, I"),
            Insn::bcd { x }         => write!(f, "bcd    v{x:X}, &I"),
            Insn::dmao { x }        => write!(f, "dmao   v{x:X}"),
            Insn::dmai { x }        => write!(f, "dmai   v{x:X}"),
            // Super Chip extension
            Insn::exit              => write!(f, "exit   "),
        }
    }
}
