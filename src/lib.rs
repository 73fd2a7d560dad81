//!
//! ## Design
//!
//! * one owned aggregate (`Chip8Interpreter`) holds all machine state, so
//!   several machines can coexist (tests do this constantly)
//! * one instruction per `.cycle()`; timers tick on their own 60Hz cadence
//!   via `.tick_timers()`, never once per instruction
//! * decode is separate from execute: a 16-bit word becomes an
//!   `Instruction` first, so decoding can be tested on its own
//! * abstract display so can plug alternatives; starting with TUI in-console
//! * architectural variants (shift source, jump offset register, sprite
//!   clipping) are configuration, not fixed truths
//! * faults (bad addresses, stack over/underflow) are reported, never
//!   silently corrupt state; unknown opcodes are no-ops
//!
//! Model
//!
//! Environment
//!  |-- display, input, sound, config
//!  |-- interpreter(config.quirks, seed)
//!  |    |-- memory map (glyphs @ 0x050, program @ 0x200)
//!  |    |-- registers, stack, timers, keypad, framebuffer
//!  |    `-- instruction set: decode(word) -> Instruction -> execute
//!  `-- main loop
//!       |-- input.poll(keypad) -- quit?
//!       |-- every ~2ms:     interpreter.cycle()
//!       `-- every ~16.66ms: interpreter.tick_timers(); display.draw(); sound.play()

pub mod alu;
pub mod config;
pub mod display;
pub mod environment;
pub mod error;
pub mod framebuffer;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod memory;
pub mod sound;
pub mod state;

pub use config::{Config, Quirks};
pub use error::{Error, Fault};
pub use interpreter::Chip8Interpreter;
