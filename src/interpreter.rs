//! # interpreter
//!
//! The whole machine lives here: 4K of memory, V0..VF, the index register
//! I, the program counter, a 16-level call stack, delay and sound timers,
//! the keypad snapshot and the framebuffer.
//!
//! Each `.cycle()` fetches the big-endian word at PC, advances PC by 2,
//! decodes it and executes it. Handlers that want the same instruction to
//! run again (wait-for-key) wind PC back by 2; skips add another 2.
//!
//! Timers are *not* touched by `.cycle()`. The host calls `.tick_timers()`
//! at ~60Hz however many instructions ran in between.
use crate::alu::{self, AluResult};
use crate::config::Quirks;
use crate::error::{Error, Fault};
use crate::framebuffer::Framebuffer;
use crate::instruction::Instruction;
use crate::memory::{Chip8MemoryMap, MemoryMap};
use crate::state::{Keypad, Registers, Stack, Timers, KEY_COUNT};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io;
use std::time::{SystemTime, UNIX_EPOCH};

/// keep PC inside the 12-bit address space
const ADDR_MASK: u16 = 0x0fff;

pub struct Chip8Interpreter {
    memory: Chip8MemoryMap,
    registers: Registers,
    i: u16,
    program_counter: u16,
    stack: Stack,
    timers: Timers,
    keypad: Keypad,
    framebuffer: Framebuffer,
    rng: StdRng,
    quirks: Quirks,
}

impl Chip8Interpreter {
    /// fresh machine, RNG seeded from the clock
    pub fn new(quirks: Quirks) -> Self {
        Self::with_seed(quirks, time_seed())
    }

    /// fresh machine with a reproducible RNG
    pub fn with_seed(quirks: Quirks, seed: u64) -> Self {
        let memory = Chip8MemoryMap::new();
        let program_counter = memory.program_addr;
        Chip8Interpreter {
            memory,
            registers: Registers::new(),
            i: 0x0000,
            program_counter,
            stack: Stack::new(),
            timers: Timers::default(),
            keypad: Keypad::new(),
            framebuffer: Framebuffer::new(),
            rng: StdRng::seed_from_u64(seed),
            quirks,
        }
    }

    /// load a chip8 program at 0x200
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<usize, Error> {
        let len = self.memory.load_program(reader)?;
        log::info!("loaded {} byte program at 0x{:03x}", len, self.memory.program_addr);
        Ok(len)
    }

    /// run exactly one instruction
    pub fn cycle(&mut self) -> Result<Instruction, Fault> {
        let pc = self.program_counter;
        let word = self.memory.get_word(pc)?;
        self.program_counter = pc.wrapping_add(2);

        let instruction = Instruction::decode(word);
        log::trace!("{:03x}: {:04x}  {}", pc, word, instruction);
        self.execute(instruction)?;
        Ok(instruction)
    }

    /// carry out one decoded instruction; PC already points past it
    pub fn execute(&mut self, instruction: Instruction) -> Result<(), Fault> {
        use Instruction::*;

        match instruction {
            Sys(_) => {}
            Cls => self.framebuffer.clear(),
            Ret => self.program_counter = self.stack.pop(self.program_counter)?,
            Jp(nnn) => self.program_counter = nnn,
            Call(nnn) => {
                self.stack.push(self.program_counter, self.program_counter)?;
                self.program_counter = nnn;
            }
            SeByte(x, kk) => self.skip_if(self.registers[x] == kk),
            SneByte(x, kk) => self.skip_if(self.registers[x] != kk),
            SeReg(x, y) => self.skip_if(self.registers[x] == self.registers[y]),
            SneReg(x, y) => self.skip_if(self.registers[x] != self.registers[y]),
            LdByte(x, kk) => self.registers[x] = kk,
            AddByte(x, kk) => self.registers[x] = alu::add(self.registers[x], kk).value,
            LdReg(x, y) => self.registers[x] = self.registers[y],
            Or(x, y) => self.registers[x] |= self.registers[y],
            And(x, y) => self.registers[x] &= self.registers[y],
            Xor(x, y) => self.registers[x] ^= self.registers[y],
            AddReg(x, y) => {
                let r = alu::add(self.registers[x], self.registers[y]);
                self.write_with_flag(x, r);
            }
            Sub(x, y) => {
                let r = alu::sub(self.registers[x], self.registers[y]);
                self.write_with_flag(x, r);
            }
            Subn(x, y) => {
                let r = alu::sub(self.registers[y], self.registers[x]);
                self.write_with_flag(x, r);
            }
            Shr(x, y) => {
                let src = self.shift_source(x, y);
                self.write_with_flag(
                    x,
                    AluResult {
                        value: src >> 1,
                        carry: src & 0x01 != 0,
                    },
                );
            }
            Shl(x, y) => {
                let src = self.shift_source(x, y);
                self.write_with_flag(
                    x,
                    AluResult {
                        value: src << 1,
                        carry: src & 0x80 != 0,
                    },
                );
            }
            LdI(nnn) => self.i = nnn,
            JpOffset(x, nnn) => {
                let offset = if self.quirks.jump_uses_vx {
                    self.registers[x]
                } else {
                    self.registers[0]
                };
                self.program_counter = (nnn + offset as u16) & ADDR_MASK;
            }
            Rnd(x, kk) => self.registers[x] = self.rng.random::<u8>() & kk,
            Drw(x, y, n) => self.draw(x, y, n)?,
            Skp(x) => {
                let pressed = self.keypad.is_pressed(self.registers[x])?;
                self.skip_if(pressed);
            }
            Sknp(x) => {
                let pressed = self.keypad.is_pressed(self.registers[x])?;
                self.skip_if(!pressed);
            }
            LdFromDelay(x) => self.registers[x] = self.timers.delay,
            WaitKey(x) => match self.keypad.first_pressed() {
                Some(key) => self.registers[x] = key,
                // go round again next cycle
                None => self.program_counter = self.program_counter.wrapping_sub(2),
            },
            LdDelay(x) => self.timers.delay = self.registers[x],
            LdSound(x) => self.timers.sound = self.registers[x],
            AddI(x) => self.i = self.i.wrapping_add(self.registers[x] as u16),
            LdGlyph(x) => self.i = self.memory.glyph_addr(self.registers[x]),
            Bcd(x) => {
                let value = self.registers[x];
                let digits = self.memory.get_rw_slice(self.i, 3)?;
                digits[0] = value / 100;
                digits[1] = value / 10 % 10;
                digits[2] = value % 10;
            }
            Dump(x) => self
                .memory
                .get_rw_slice(self.i, x + 1)?
                .copy_from_slice(self.registers.up_to(x)),
            Load(x) => {
                let bytes = self.memory.get_ro_slice(self.i, x + 1)?;
                self.registers.up_to_mut(x).copy_from_slice(bytes);
            }
            Unknown(word) => {
                log::debug!(
                    "ignoring unknown opcode {:04x} at {:03x}",
                    word,
                    self.program_counter.wrapping_sub(2)
                );
            }
        }
        Ok(())
    }

    /// count both timers down one step; call at ~60Hz
    pub fn tick_timers(&mut self) {
        self.timers.tick();
    }

    /// should the buzzer be sounding
    pub fn sound_active(&self) -> bool {
        self.timers.sound_active()
    }

    /// replace the keypad snapshot
    pub fn set_keys(&mut self, keys: [bool; KEY_COUNT]) {
        self.keypad.set_all(keys);
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn program_counter(&self) -> u16 {
        self.program_counter
    }

    pub fn index(&self) -> u16 {
        self.i
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn memory(&self) -> &Chip8MemoryMap {
        &self.memory
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.depth()
    }

    fn skip_if(&mut self, cond: bool) {
        if cond {
            self.program_counter = self.program_counter.wrapping_add(2);
        }
    }

    /// flag first, then the result, so with x == F the result is what stays
    fn write_with_flag(&mut self, x: usize, r: AluResult) {
        self.registers.set_flag(r.flag());
        self.registers[x] = r.value;
    }

    fn shift_source(&self, x: usize, y: usize) -> u8 {
        if self.quirks.shift_uses_vy {
            self.registers[y]
        } else {
            self.registers[x]
        }
    }

    fn draw(&mut self, x: usize, y: usize, n: u8) -> Result<(), Fault> {
        let (vx, vy) = (self.registers[x], self.registers[y]);
        let sprite = self.memory.get_ro_slice(self.i, n as usize)?;
        let collision = self
            .framebuffer
            .draw_sprite(vx, vy, sprite, self.quirks.clip_sprites);
        self.registers.set_flag(collision as u8);
        Ok(())
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
