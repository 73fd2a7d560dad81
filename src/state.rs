//! Registers, call stack, timers and keypad.
use crate::error::Fault;
use std::ops::{Index, IndexMut};

pub const REGISTER_COUNT: usize = 16;
pub const STACK_LEVELS: usize = 16;
pub const KEY_COUNT: usize = 16;

/// register 0xF doubles as carry/borrow/shift-out/collision output
pub const VF: usize = 0xf;

/// V0..VF
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Registers([u8; REGISTER_COUNT]);

impl Registers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// V0..=Vx
    pub fn up_to(&self, x: usize) -> &[u8] {
        &self.0[..=x]
    }

    /// V0..=Vx, writable
    pub fn up_to_mut(&mut self, x: usize) -> &mut [u8] {
        &mut self.0[..=x]
    }

    pub fn set_flag(&mut self, flag: u8) {
        self.0[VF] = flag;
    }
}

impl Index<usize> for Registers {
    type Output = u8;

    fn index(&self, reg: usize) -> &u8 {
        &self.0[reg]
    }
}

impl IndexMut<usize> for Registers {
    fn index_mut(&mut self, reg: usize) -> &mut u8 {
        &mut self.0[reg]
    }
}

/// fixed 16-level return address stack
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Stack {
    frames: [u16; STACK_LEVELS],
    sp: usize,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    /// `pc` is only used to label the fault
    pub fn push(&mut self, addr: u16, pc: u16) -> Result<(), Fault> {
        let slot = self
            .frames
            .get_mut(self.sp)
            .ok_or(Fault::StackOverflow { pc })?;
        *slot = addr;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self, pc: u16) -> Result<u16, Fault> {
        if self.sp == 0 {
            return Err(Fault::StackUnderflow { pc });
        }
        self.sp -= 1;
        Ok(self.frames[self.sp])
    }

    pub fn depth(&self) -> usize {
        self.sp
    }
}

/// delay and sound timers; both count down to zero at ~60Hz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
}

impl Timers {
    pub fn tick(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }

    pub fn sound_active(&self) -> bool {
        self.sound > 0
    }
}

/// snapshot of the 16 keys, written wholesale by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Keypad([bool; KEY_COUNT]);

impl Keypad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_all(&mut self, keys: [bool; KEY_COUNT]) {
        self.0 = keys;
    }

    /// keys are indexed by register values, which can exceed 0xF
    pub fn is_pressed(&self, key: u8) -> Result<bool, Fault> {
        self.0
            .get(key as usize)
            .copied()
            .ok_or(Fault::KeyOutOfRange { key })
    }

    /// lowest-numbered key that is down
    pub fn first_pressed(&self) -> Option<u8> {
        self.0.iter().position(|&down| down).map(|k| k as u8)
    }
}
