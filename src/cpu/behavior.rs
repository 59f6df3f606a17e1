// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Contains implementations for each Chip-8 [Insn]

use super::*;
use rand::random;

impl CPU {
    /// Executes a single [Insn]
    ///
    /// A fallible instruction that returns `Err` has no effect beyond the
    /// program-counter advance the caller already performed.
    #[rustfmt::skip]
    #[inline(always)]
    pub(super) fn execute(&mut self, insn: Insn, mem: &mut Mem, screen: &mut Screen) -> Result<()> {
        match insn {
            // Core Chip-8 instructions
            Insn::cls               => self.clear_screen(screen),
            Insn::ret               => self.ret(mem)?,
            Insn::jmp   {       A } => self.jump(A),
            Insn::call  {       A } => self.call(A, mem)?,
            Insn::seb   {    x, B } => self.skip_equals_immediate(x, B, mem),
            Insn::sneb  {    x, B } => self.skip_not_equals_immediate(x, B, mem),
            Insn::se    { y, x    } => self.skip_equals(x, y, mem),
            Insn::movb  {    x, B } => self.load_immediate(x, B),
            Insn::addb  {    x, B } => self.add_immediate(x, B),
            Insn::mov   { y, x    } => self.load(x, y),
            Insn::or    { y, x    } => self.or(x, y),
            Insn::and   { y, x    } => self.and(x, y),
            Insn::xor   { y, x    } => self.xor(x, y),
            Insn::add   { y, x    } => self.add(x, y),
            Insn::sub   { y, x    } => self.sub(x, y),
            Insn::shr   { y, x    } => self.shift_right(x, y),
            Insn::bsub  { y, x    } => self.backwards_sub(x, y),
            Insn::shl   { y, x    } => self.shift_left(x, y),
            Insn::sne   { y, x    } => self.skip_not_equals(x, y, mem),
            Insn::movI  {       A } => self.load_i_immediate(A),
            Insn::jmpr  {       A } => self.jump_indexed(A),
            Insn::rand  {    x, B } => self.rand(x, B),
            Insn::draw  { y, x, n } => self.draw(x, y, n, mem, screen)?,
            Insn::sek   {    x    } => self.skip_key_equals(x, mem),
            Insn::snek  {    x    } => self.skip_key_not_equals(x, mem),
            Insn::getdt {    x    } => self.load_delay_timer(x),
            Insn::waitk {    x    } => self.wait_for_key(x),
            Insn::setdt {    x    } => self.store_delay_timer(x),
            Insn::setst {    x    } => self.store_sound_timer(x),
            Insn::addI  {    x    } => self.add_i(x),
            Insn::font  {    x    } => self.load_sprite(x),
            Insn::bcd   {    x    } => self.bcd_convert(x, mem)?,
            Insn::dmao  {    x    } => self.store_dma(x, mem)?,
            Insn::dmai  {    x    } => self.load_dma(x, mem)?,
            // Super-Chip extension
            Insn::exit              => self.exit(),
        }
        Ok(())
    }

    /// Advances past the instruction at pc. Under the `wide_skips` quirk a
    /// 4-byte `F000` word is stepped over whole, so the skip can't land in
    /// the middle of it.
    #[inline(always)]
    fn skip(&mut self, mem: &Mem) {
        let wide = self.flags.quirks.wide_skips
            && mem.read_word(self.pc).is_ok_and(|word| word == 0xf000);
        self.pc = self.pc.wrapping_add(if wide { 4 } else { 2 });
    }
}

/// |`0aaa`| Issues a "System call" (ML routine)
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`00e0`| Clear screen memory to all 0       |
/// |`00ee`| Return from subroutine             |
/// |`00fd`| Exit the interpreter               |
impl CPU {
    /// |`00e0`| Clears the screen memory to 0. Does not touch vF.
    #[inline(always)]
    pub(super) fn clear_screen(&mut self, screen: &mut Screen) {
        screen.clear();
    }
    /// |`00ee`| Returns from subroutine.
    ///
    /// Fails with [Error::StackUnderflow] on an empty stack; execution
    /// continues at the instruction after the `ret`.
    #[inline(always)]
    pub(super) fn ret(&mut self, mem: &Mem) -> Result<()> {
        self.pc = self.pop(mem)?;
        Ok(())
    }
    /// |`00fd`| Raises the halt flag. The host decides what to do with it;
    /// nothing in the core ever exits the process.
    #[inline(always)]
    pub(super) fn exit(&mut self) {
        self.flags.halt = true;
    }
}

/// |`1aaa`| Sets pc to an absolute address
impl CPU {
    /// |`1aaa`| Sets the program counter to an absolute address
    #[inline(always)]
    pub(super) fn jump(&mut self, a: Adr) {
        // jump to self == halt
        if a.wrapping_add(2) == self.pc {
            self.flags.pause = true;
        }
        self.pc = a;
    }
}

/// |`2aaa`| Pushes the return address onto the stack, then jumps to a
impl CPU {
    /// |`2aaa`| Pushes the return address onto the stack, then jumps to a
    ///
    /// Fails with [Error::StackOverflow] at capacity; the jump does not
    /// happen and execution continues past the `call`.
    #[inline(always)]
    pub(super) fn call(&mut self, a: Adr, mem: &mut Mem) -> Result<()> {
        self.push(self.pc, mem)?;
        self.pc = a;
        Ok(())
    }
}

/// |`3xbb`|..|`9xy0`| Conditional skip family, all comparing unsigned 8-bit values
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`3xbb`| Skip next instruction if vX == b   |
/// |`4xbb`| Skip next instruction if vX != b   |
/// |`5xy0`| Skip next instruction if vX == vY  |
/// |`9xy0`| Skip next instruction if vX != vY  |
impl CPU {
    /// |`3xbb`| Skips the next instruction if vX == b
    #[inline(always)]
    pub(super) fn skip_equals_immediate(&mut self, x: Reg, b: u8, mem: &Mem) {
        if self.v[x] == b {
            self.skip(mem);
        }
    }
    /// |`4xbb`| Skips the next instruction if vX != b
    #[inline(always)]
    pub(super) fn skip_not_equals_immediate(&mut self, x: Reg, b: u8, mem: &Mem) {
        if self.v[x] != b {
            self.skip(mem);
        }
    }
    /// |`5xy0`| Skips the next instruction if vX == vY
    #[inline(always)]
    pub(super) fn skip_equals(&mut self, x: Reg, y: Reg, mem: &Mem) {
        if self.v[x] == self.v[y] {
            self.skip(mem);
        }
    }
    /// |`9xy0`| Skips the next instruction if vX != vY
    #[inline(always)]
    pub(super) fn skip_not_equals(&mut self, x: Reg, y: Reg, mem: &Mem) {
        if self.v[x] != self.v[y] {
            self.skip(mem);
        }
    }
}

/// |`6xbb`| Loads immediate byte b into register vX
impl CPU {
    /// |`6xbb`| Loads immediate byte b into register vX
    #[inline(always)]
    pub(super) fn load_immediate(&mut self, x: Reg, b: u8) {
        self.v[x] = b;
    }
}

/// |`7xbb`| Adds immediate byte b to register vX
impl CPU {
    /// |`7xbb`| Adds immediate byte b to register vX, wrapping, no flag
    #[inline(always)]
    pub(super) fn add_immediate(&mut self, x: Reg, b: u8) {
        self.v[x] = self.v[x].wrapping_add(b);
    }
}

/// |`8xyn`| Performs ALU operation
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`8xy0`| X = Y                              |
/// |`8xy1`| X = X | Y                          |
/// |`8xy2`| X = X & Y                          |
/// |`8xy3`| X = X ^ Y                          |
/// |`8xy4`| X = X + Y; vF = carry              |
/// |`8xy5`| X = X - Y; vF = !borrow            |
/// |`8xy6`| X = X >> 1; vF = shifted-out bit   |
/// |`8xy7`| X = Y - X; vF = !borrow            |
/// |`8xyE`| X = X << 1; vF = shifted-out bit   |
///
/// Every op that writes vF overwrites whatever flag meaning was there
/// before; there is no separate flags register.
impl CPU {
    /// |`8xy0`| Loads the value of vY into vX
    #[inline(always)]
    pub(super) fn load(&mut self, x: Reg, y: Reg) {
        self.v[x] = self.v[y];
    }
    /// |`8xy1`| Performs bitwise or of vX and vY, and stores the result in vX
    ///
    /// # Quirk
    /// The original chip-8 interpreter will clobber vF for any 8-series instruction
    #[inline(always)]
    pub(super) fn or(&mut self, x: Reg, y: Reg) {
        self.v[x] |= self.v[y];
        if !self.flags.quirks.bin_ops {
            self.v[0xf] = 0;
        }
    }
    /// |`8xy2`| Performs bitwise and of vX and vY, and stores the result in vX
    ///
    /// # Quirk
    /// The original chip-8 interpreter will clobber vF for any 8-series instruction
    #[inline(always)]
    pub(super) fn and(&mut self, x: Reg, y: Reg) {
        self.v[x] &= self.v[y];
        if !self.flags.quirks.bin_ops {
            self.v[0xf] = 0;
        }
    }
    /// |`8xy3`| Performs bitwise xor of vX and vY, and stores the result in vX
    ///
    /// # Quirk
    /// The original chip-8 interpreter will clobber vF for any 8-series instruction
    #[inline(always)]
    pub(super) fn xor(&mut self, x: Reg, y: Reg) {
        self.v[x] ^= self.v[y];
        if !self.flags.quirks.bin_ops {
            self.v[0xf] = 0;
        }
    }
    /// |`8xy4`| Performs addition of vX and vY, and stores the result in vX.
    /// vF = 1 iff the unsigned sum exceeded 255.
    #[inline(always)]
    pub(super) fn add(&mut self, x: Reg, y: Reg) {
        let carry;
        (self.v[x], carry) = self.v[x].overflowing_add(self.v[y]);
        self.v[0xf] = carry.into();
    }
    /// |`8xy5`| Performs subtraction of vY from vX, and stores the result in vX.
    /// vF = 1 iff there was no borrow (vX >= vY).
    #[inline(always)]
    pub(super) fn sub(&mut self, x: Reg, y: Reg) {
        let borrow;
        (self.v[x], borrow) = self.v[x].overflowing_sub(self.v[y]);
        self.v[0xf] = (!borrow).into();
    }
    /// |`8xy6`| Performs bitwise right shift; vF receives the shifted-out bit
    ///
    /// # Quirk
    /// On the original chip-8 interpreter, this shifts vY and stores the result in vX
    #[inline(always)]
    pub(super) fn shift_right(&mut self, x: Reg, y: Reg) {
        let src: Reg = if self.flags.quirks.shift { x } else { y };
        let shift_out = self.v[src] & 1;
        self.v[x] = self.v[src] >> 1;
        self.v[0xf] = shift_out;
    }
    /// |`8xy7`| Performs subtraction of vX from vY, and stores the result in vX.
    /// vF = 1 iff there was no borrow (vY >= vX).
    #[inline(always)]
    pub(super) fn backwards_sub(&mut self, x: Reg, y: Reg) {
        let borrow;
        (self.v[x], borrow) = self.v[y].overflowing_sub(self.v[x]);
        self.v[0xf] = (!borrow).into();
    }
    /// |`8xyE`| Performs bitwise left shift; vF receives the shifted-out bit
    ///
    /// # Quirk
    /// On the original chip-8 interpreter, this shifts vY and stores the result in vX
    #[inline(always)]
    pub(super) fn shift_left(&mut self, x: Reg, y: Reg) {
        let src: Reg = if self.flags.quirks.shift { x } else { y };
        let shift_out: u8 = self.v[src] >> 7;
        self.v[x] = self.v[src] << 1;
        self.v[0xf] = shift_out;
    }
}

/// |`Aaaa`| Load address #a into register I
impl CPU {
    /// |`Aadr`| Load address #adr into register I
    #[inline(always)]
    pub(super) fn load_i_immediate(&mut self, a: Adr) {
        self.i = a;
    }
}

/// |`Baaa`| Jump to &adr + v0
impl CPU {
    /// |`Badr`| Jump to &adr + v0
    ///
    /// # Quirk
    /// On the Super-Chip, the offset register is v`x`, the high nibble of adr
    #[inline(always)]
    pub(super) fn jump_indexed(&mut self, a: Adr) {
        let reg = if self.flags.quirks.jumps {
            a as usize >> 8
        } else {
            0
        };
        self.pc = a.wrapping_add(self.v[reg] as Adr);
    }
}

/// |`Cxbb`| Stores a random number & the provided byte into vX
impl CPU {
    /// |`Cxbb`| Stores a random number & the provided byte into vX
    #[inline(always)]
    pub(super) fn rand(&mut self, x: Reg, b: u8) {
        self.v[x] = random::<u8>() & b;
    }
}

/// |`Dxyn`| Draws n-byte sprite to the screen at coordinates (vX, vY)
impl CPU {
    /// |`Dxyn`| Draws n-byte sprite to the screen at coordinates (vX, vY).
    ///
    /// The sprite is read from memory at I; vF reports collision. Only the
    /// origin wraps; the sprite clips at the screen edges unless the
    /// `screen_wrap` quirk is on.
    #[inline(always)]
    pub(super) fn draw(&mut self, x: Reg, y: Reg, n: Nib, mem: &Mem, screen: &mut Screen) -> Result<()> {
        let sprite = mem.slice(self.i, n as usize)?;
        let collision = screen.blit(self.v[x], self.v[y], sprite, self.flags.quirks.screen_wrap);
        self.v[0xf] = collision.into();
        Ok(())
    }
}

/// |`Exbb`| Skips instruction on value of keypress
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`eX9e`| Skip next instruction if key == vX |
/// |`eXa1`| Skip next instruction if key != vX |
impl CPU {
    /// |`Ex9E`| Skip next instruction if the key vX names is held down.
    /// A key mid-release satisfies neither this nor `ExA1`.
    #[inline(always)]
    pub(super) fn skip_key_equals(&mut self, x: Reg, mem: &Mem) {
        if self.keypad.is_down(self.v[x] as usize & 0xf) {
            self.skip(mem);
        }
    }
    /// |`ExA1`| Skip next instruction if the key vX names is up
    #[inline(always)]
    pub(super) fn skip_key_not_equals(&mut self, x: Reg, mem: &Mem) {
        if self.keypad.is_up(self.v[x] as usize & 0xf) {
            self.skip(mem);
        }
    }
}

/// |`Fxbb`| Performs IO
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`fX07`| Set vX to value in delay timer     |
/// |`fX0a`| Wait for input, store key in vX    |
/// |`fX15`| Set delay timer to the value in vX |
/// |`fX18`| Set sound timer to the value in vX |
/// |`fX1e`| Add vX to I                        |
/// |`fX29`| Load sprite for character x into I |
/// |`fX33`| BCD convert X into I[0..3]         |
/// |`fX55`| DMA Stor from I to registers 0..=X |
/// |`fX65`| DMA Load from I to registers 0..=X |
impl CPU {
    /// |`Fx07`| Get the current DT, and put it in vX
    /// ```py
    /// vX = DT
    /// ```
    #[inline(always)]
    pub(super) fn load_delay_timer(&mut self, x: Reg) {
        self.v[x] = self.timers.delay();
    }
    /// |`Fx0A`| Wait for a key release edge, then vX = K
    ///
    /// The sole blocking primitive: with no key in the Released state the
    /// pc rewinds by 2, so the instruction re-executes next cycle. Timers
    /// keep ticking while stalled. When an edge appears, the
    /// lowest-indexed Released key wins and the post-instruction keypad
    /// sweep folds it back to Up.
    #[inline(always)]
    pub(super) fn wait_for_key(&mut self, x: Reg) {
        match self.keypad.first_released() {
            Some(key) => {
                self.v[x] = key as u8;
                self.flags.keypause = false;
            }
            None => {
                self.pc = self.pc.wrapping_sub(2);
                self.flags.keypause = true;
            }
        }
    }
    /// |`Fx15`| Load vX into DT
    /// ```py
    /// DT = vX
    /// ```
    #[inline(always)]
    pub(super) fn store_delay_timer(&mut self, x: Reg) {
        self.timers.set_delay(self.v[x]);
    }
    /// |`Fx18`| Load vX into ST
    /// ```py
    /// ST = vX
    /// ```
    #[inline(always)]
    pub(super) fn store_sound_timer(&mut self, x: Reg) {
        self.timers.set_sound(self.v[x]);
    }
    /// |`Fx1e`| Add vX to I
    /// ```py
    /// I += vX
    /// ```
    #[inline(always)]
    pub(super) fn add_i(&mut self, x: Reg) {
        self.i = self.i.wrapping_add(self.v[x] as Adr);
    }
    /// |`Fx29`| Load sprite for character x into I
    /// ```py
    /// I = sprite(X)
    /// ```
    #[inline(always)]
    pub(super) fn load_sprite(&mut self, x: Reg) {
        self.i = self.font + 5 * (self.v[x] as Adr % 0x10);
    }
    /// |`Fx33`| BCD convert X into I`[0..3]`: hundreds, tens, units
    #[inline(always)]
    pub(super) fn bcd_convert(&mut self, x: Reg, mem: &mut Mem) -> Result<()> {
        let value = self.v[x];
        let digits = mem.program_slice_mut(self.i, 3)?;
        digits[0] = value / 100 % 10;
        digits[1] = value / 10 % 10;
        digits[2] = value % 10;
        Ok(())
    }
    /// |`Fx55`| DMA Stor from registers 0..=X to memory at I
    ///
    /// # Quirk
    /// The original chip-8 interpreter leaves I as I+X+1 after the transfer
    #[inline(always)]
    pub(super) fn store_dma(&mut self, x: Reg, mem: &mut Mem) -> Result<()> {
        mem.program_slice_mut(self.i, x + 1)?
            .copy_from_slice(&self.v[..=x]);
        if !self.flags.quirks.dma_inc {
            self.i = self.i.wrapping_add(x as Adr + 1);
        }
        Ok(())
    }
    /// |`Fx65`| DMA Load from memory at I to registers 0..=X
    ///
    /// # Quirk
    /// The original chip-8 interpreter leaves I as I+X+1 after the transfer
    #[inline(always)]
    pub(super) fn load_dma(&mut self, x: Reg, mem: &Mem) -> Result<()> {
        self.v[..=x].copy_from_slice(mem.slice(self.i, x + 1)?);
        if !self.flags.quirks.dma_inc {
            self.i = self.i.wrapping_add(x as Adr + 1);
        }
        Ok(())
    }
}
