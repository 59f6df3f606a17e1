//! Testing methods on sunchip's public API

use std::time::Duration;
use sunchip::prelude::*;

/// 0x200: v0 = 0x0a; v1 = 0x05; v0 += v1 with carry
const ADD_ROM: &[u8] = &[0x60, 0x0a, 0x61, 0x05, 0x80, 0x14];

#[test]
fn chip8() {
    let ch8 = Chip8::default(); // Default
    let ch82 = ch8.clone(); // Clone
    assert_eq!(ch8, ch82); // PartialEq
    println!("{ch8:?}"); // Debug
}

/// Three cycles at the unthrottled rate leave v0 == 0x0f with no carry
#[test]
fn add_rom_end_to_end() {
    let mut ch8 = Chip8::default();
    ch8.load_rom_bytes(ADD_ROM).unwrap();
    ch8.reset();
    for _ in 0..3 {
        ch8.cycle().unwrap();
    }
    assert_eq!(0x0f, ch8.cpu.v()[0]);
    assert_eq!(0x00, ch8.cpu.v()[0xf]);
    assert_eq!(0x206, ch8.cpu.pc());
}

/// A rom of just `00e0` clears every cell and leaves vF alone
#[test]
fn cls_rom_end_to_end() {
    let mut ch8 = Chip8::default();
    // light some cells up first
    ch8.screen.blit(0, 0, &[0xff, 0xff], false);
    assert!(ch8.screen.cells().iter().any(|cell| *cell));
    ch8.cpu.set_v(0xf, 0xa5).unwrap();
    ch8.load_rom_bytes(&[0x00, 0xe0]).unwrap();
    ch8.cycle().unwrap();
    assert!(ch8.screen.cells().iter().all(|cell| !cell));
    assert_eq!(0xa5, ch8.cpu.v()[0xf]);
}

/// Load and reset are independent and idempotent, in either order
#[test]
fn load_and_reset_commute() {
    let mut loaded_then_reset = Chip8::default();
    loaded_then_reset.load_rom_bytes(ADD_ROM).unwrap();
    loaded_then_reset.reset();

    let mut reset_then_loaded = Chip8::default();
    reset_then_loaded.reset();
    reset_then_loaded.load_rom_bytes(ADD_ROM).unwrap();

    assert_eq!(loaded_then_reset, reset_then_loaded);

    // loading again overwrites the old program wholesale
    reset_then_loaded.load_rom_bytes(ADD_ROM).unwrap();
    assert_eq!(loaded_then_reset, reset_then_loaded);
}

/// The load offset is configurable; everything keys off it together
#[test]
fn custom_load_offset() {
    let mut ch8 = Chip8::with_load_offset(Rates::default(), Flags::default(), 0x600);
    ch8.load_rom_bytes(ADD_ROM).unwrap();
    assert_eq!(0x600, ch8.cpu.pc());
    for _ in 0..3 {
        ch8.cycle().unwrap();
    }
    assert_eq!(0x0f, ch8.cpu.v()[0]);
    assert_eq!(0x606, ch8.cpu.pc());
}

/// An image bigger than RAM minus the load offset is refused outright
#[test]
fn rom_too_large() {
    let mut ch8 = Chip8::default();
    let too_big = vec![0xff; RAM_SIZE - 0x200 + 1];
    let err = ch8.load_rom_bytes(&too_big).unwrap_err();
    assert!(matches!(err, Error::RomTooLarge { .. }));
    // nothing landed in program space
    assert_eq!(0, ch8.mem.read(0x200).unwrap());
}

/// A missing rom file surfaces as an io error and leaves the machine alone
#[test]
fn rom_file_missing() {
    let mut ch8 = Chip8::default();
    let before = ch8.clone();
    let err = ch8.load_rom("this/path/does/not/exist.ch8").unwrap_err();
    assert!(matches!(err, Error::IoError(_)));
    assert_eq!(before, ch8);
}

/// With no release edge pending, the wait instruction holds pc in place;
/// the edge makes the very next cycle store the key and move on
#[test]
fn key_wait_stalls_and_resumes() {
    let mut ch8 = Chip8::default();
    ch8.load_rom_bytes(&[0xf4, 0x0a]).unwrap(); // waitk v4
    let pc = ch8.cpu.pc();
    for _ in 0..4 {
        ch8.cycle().unwrap();
        assert_eq!(pc, ch8.cpu.pc());
    }
    ch8.cpu.press(0xa).unwrap();
    // still down, not released: one more stalled cycle
    ch8.cycle().unwrap();
    assert_eq!(pc, ch8.cpu.pc());
    ch8.cpu.release(0xa).unwrap();
    ch8.cycle().unwrap();
    assert_eq!(pc + 2, ch8.cpu.pc());
    assert_eq!(0xa, ch8.cpu.v()[4]);
}

/// Timers keep ticking at their own rate while the CPU is stalled
#[test]
fn timers_tick_while_stalled() {
    let mut ch8 = Chip8::new(
        Rates {
            cpu_hz: 600,
            timer_hz: 60,
            refresh_hz: 60,
        },
        Flags::default(),
    );
    ch8.load_rom_bytes(&[
        0x63, 0x10, // v3 = 0x10
        0xf3, 0x15, // delay = v3
        0xf4, 0x0a, // waitk v4 (never satisfied)
    ])
    .unwrap();
    // one second of host time
    for _ in 0..60 {
        ch8.run(Duration::from_millis(1000 / 60)).unwrap();
    }
    assert!(ch8.cpu.flags.keypause);
    // 0x10 = 16 ticks have long since drained the delay timer
    assert_eq!(0, ch8.cpu.delay());
}

/// CALL then RET resumes after the call site through the whole stack range
#[test]
fn call_ret_rom() {
    let mut ch8 = Chip8::default();
    ch8.load_rom_bytes(&[
        0x22, 0x04, // 0x200: call 0x204
        0x00, 0x00, // 0x202: (never decoded)
        0x00, 0xee, // 0x204: ret
    ])
    .unwrap();
    ch8.cycle().unwrap();
    assert_eq!(0x204, ch8.cpu.pc());
    assert_eq!(1, ch8.cpu.depth());
    ch8.cycle().unwrap();
    assert_eq!(0x202, ch8.cpu.pc());
    assert_eq!(0, ch8.cpu.depth());
}

/// The EXIT opcode halts the machine; only the host can restart it
#[test]
fn exit_rom_halts() {
    let mut ch8 = Chip8::default();
    ch8.load_rom_bytes(&[0x00, 0xfd]).unwrap();
    ch8.cycle().unwrap();
    assert!(ch8.cpu.flags.halt);
    // a halted machine executes nothing, however much time passes
    ch8.run(Duration::from_secs(1)).unwrap();
    assert_eq!(1, ch8.cpu.cycle());
    // reset clears the halt
    ch8.reset();
    assert!(!ch8.cpu.flags.halt);
}

mod sched {
    use super::*;

    /// each rate accrues independently over the same elapsed span
    #[test]
    fn rates_decouple() {
        let mut sched = Scheduler::new(Rates {
            cpu_hz: 720,
            timer_hz: 60,
            refresh_hz: 30,
        });
        let batch = sched.advance(Duration::from_secs(1));
        assert_eq!(720, batch.cycles);
        assert_eq!(60, batch.timer_ticks);
        assert!(batch.refresh);
    }

    /// fractional periods carry across calls instead of being dropped
    #[test]
    fn fractions_carry() {
        let mut sched = Scheduler::new(Rates {
            cpu_hz: 60,
            timer_hz: 60,
            refresh_hz: 60,
        });
        // 1/120 s = half a period: due every other call
        let mut cycles = 0;
        for _ in 0..10 {
            cycles += sched.advance(Duration::from_micros(8_333)).cycles;
        }
        assert!((4..=5).contains(&cycles));
    }

    /// cpu_hz == 0 means exactly one instruction per advance call
    #[test]
    fn unthrottled() {
        let mut sched = Scheduler::new(Rates {
            cpu_hz: 0,
            timer_hz: 0,
            refresh_hz: 0,
        });
        for elapsed in [Duration::ZERO, Duration::from_secs(5)] {
            let batch = sched.advance(elapsed);
            assert_eq!(1, batch.cycles);
            // timer_hz == 0 ties ticks to cycles
            assert_eq!(1, batch.timer_ticks);
            assert!(batch.refresh);
        }
    }
}

mod quirks {
    use super::*;

    #[test]
    fn from_true() {
        let quirks_true = Quirks::from(true);
        assert_eq!(
            quirks_true,
            Quirks {
                bin_ops: true,
                shift: true,
                dma_inc: true,
                jumps: true,
                screen_wrap: false,
                memory_stack: false,
                wide_skips: false,
            }
        )
    }

    #[test]
    fn from_false() {
        let quirks_false = Quirks::from(false);
        assert_eq!(
            quirks_false,
            Quirks {
                bin_ops: false,
                shift: false,
                dma_inc: false,
                jumps: false,
                screen_wrap: false,
                memory_stack: false,
                wide_skips: false,
            }
        )
    }

    /// the default profile matches the original interpreter's behavior
    #[test]
    fn default_is_schip() {
        assert_eq!(Quirks::default(), Quirks::from(true));
    }

    #[test]
    fn mode_maps_to_profile() {
        assert_eq!(Quirks::from(Mode::Chip8), Quirks::from(false));
        assert_eq!(Quirks::from(Mode::SChip), Quirks::from(true));
    }
}

mod mode {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn from_str() {
        assert_eq!(Mode::Chip8, Mode::from_str("chip-8").unwrap());
        assert_eq!(Mode::SChip, Mode::from_str("superchip").unwrap());
        assert!(matches!(
            Mode::from_str("chip-eleventy"),
            Err(Error::InvalidMode { .. })
        ));
    }
}

mod keypad {
    use super::*;

    /// the full lifecycle: Up -> Down -> Released -> Up
    #[test]
    fn lifecycle() {
        let mut keypad = Keypad::default();
        assert!(keypad.is_up(0x4));
        keypad.press(0x4).unwrap();
        assert!(keypad.is_down(0x4));
        keypad.release(0x4).unwrap();
        assert!(!keypad.is_down(0x4) && !keypad.is_up(0x4));
        assert_eq!(Some(0x4), keypad.first_released());
        keypad.sweep();
        assert!(keypad.is_up(0x4));
        assert_eq!(None, keypad.first_released());
    }

    /// a release without a press is inert
    #[test]
    fn spurious_release() {
        let mut keypad = Keypad::default();
        assert!(!keypad.release(0x4).unwrap());
        assert_eq!(None, keypad.first_released());
    }

    #[test]
    fn invalid_key() {
        let mut keypad = Keypad::default();
        assert!(matches!(
            keypad.press(0x21345134),
            Err(Error::InvalidKey { .. })
        ));
        assert!(matches!(
            keypad.release(0x21345134),
            Err(Error::InvalidKey { .. })
        ));
    }
}

#[test]
fn error_display() {
    for error in [
        Error::RomTooLarge {
            size: 4000,
            max: 3584,
        },
        Error::StackOverflow { depth: STACK_DEPTH },
        Error::StackUnderflow,
        Error::UnsupportedInstruction { word: 0xffff },
        Error::InvalidAddress { addr: 0x1000 },
        Error::ProtectedAddress { addr: 0x01ff },
        Error::InvalidKey { key: 0x10 },
        Error::InvalidRegister { reg: 0x10 },
    ] {
        // Print it with Display and Debug
        println!("{error} {error:?}");
    }
}

#[test]
fn insn_display() {
    use imperative_rs::InstructionSet;
    use sunchip::cpu::instruction::Insn;
    let (_, insn) = Insn::decode(&[0x81, 0x24]).unwrap();
    assert_eq!("add    v2, v1", format!("{insn}"));
}
