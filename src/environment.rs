//! The host side: sets everything up and runs the main loop.
//!
//! Two clocks run independently. Instructions execute one per
//! `cycle_period` (~500Hz); timers tick, the screen is redrawn and the
//! buzzer is switched once per `timer_period` (~60Hz). A program blocked on
//! Fx0A keeps re-executing that instruction while the loop carries on
//! polling input and presenting frames.
use crate::config::Config;
use crate::display::Display;
use crate::error::Error;
use crate::framebuffer::HEIGHT;
use crate::input::Input;
use crate::interpreter::Chip8Interpreter;
use crate::sound::Sound;
use crate::state::KEY_COUNT;
use std::time::Instant;

pub struct Environment<'a> {
    interpreter: Chip8Interpreter,
    display: &'a mut dyn Display,
    input: &'a mut dyn Input,
    sound: &'a mut dyn Sound,
    config: Config,
    keys: [bool; KEY_COUNT],
    last_cycle: Instant,
    last_tick: Instant,
    cycles: u64,
    frames: u64,
}

impl<'a> Environment<'a> {
    pub fn new(
        interpreter: Chip8Interpreter,
        display: &'a mut dyn Display,
        input: &'a mut dyn Input,
        sound: &'a mut dyn Sound,
        config: Config,
    ) -> Result<Self, Error> {
        Self::starting_at(interpreter, display, input, sound, config, Instant::now())
    }

    /// as `new`, with both clocks starting at `start`. fails if the display
    /// can't take a whole framebuffer
    pub fn starting_at(
        interpreter: Chip8Interpreter,
        display: &'a mut dyn Display,
        input: &'a mut dyn Input,
        sound: &'a mut dyn Sound,
        config: Config,
        start: Instant,
    ) -> Result<Self, Error> {
        let fb = interpreter.framebuffer();
        let got = fb.pitch() * HEIGHT;
        let want = display.get_display_size_bytes();
        if want != got {
            return Err(Error::DisplaySize { want, got });
        }
        Ok(Environment {
            interpreter,
            display,
            input,
            sound,
            config,
            keys: [false; KEY_COUNT],
            last_cycle: start,
            last_tick: start,
            cycles: 0,
            frames: 0,
        })
    }

    /// one pass of the main loop at time `now`. returns false once the user
    /// has asked to quit; a machine fault ends the run with an error
    pub fn step(&mut self, now: Instant) -> Result<bool, Error> {
        if self.input.poll(&mut self.keys)? {
            log::info!("quit requested after {} cycles", self.cycles);
            return Ok(false);
        }
        self.interpreter.set_keys(self.keys);

        if now.saturating_duration_since(self.last_cycle) >= self.config.cycle_period {
            self.last_cycle = now;
            if let Err(fault) = self.interpreter.cycle() {
                log::error!("{} (after {} cycles)", fault, self.cycles);
                return Err(fault.into());
            }
            self.cycles += 1;
        }

        if now.saturating_duration_since(self.last_tick) >= self.config.timer_period {
            self.last_tick = now;
            let beeping = self.interpreter.sound_active();
            self.interpreter.tick_timers();

            let fb = self.interpreter.framebuffer();
            self.display.draw(fb.as_slice(), fb.pitch())?;
            self.sound.play(beeping)?;
            self.frames += 1;
        }
        Ok(true)
    }

    /// run until quit, a fault, or `max_frames` frames have been shown
    pub fn main_loop(&mut self, max_frames: Option<u64>) -> Result<(), Error> {
        loop {
            if !self.step(Instant::now())? {
                break;
            }
            if max_frames.map_or(false, |max| self.frames >= max) {
                break;
            }

            // nap until whichever clock is due next
            let next = (self.last_cycle + self.config.cycle_period)
                .min(self.last_tick + self.config.timer_period);
            let wait = next.saturating_duration_since(Instant::now());
            if !wait.is_zero() {
                spin_sleep::sleep(wait);
            }
        }
        // leave the buzzer off
        self.sound.play(false)?;
        Ok(())
    }

    pub fn interpreter(&self) -> &Chip8Interpreter {
        &self.interpreter
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
