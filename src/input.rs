use crate::state::KEY_COUNT;
use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal;
use std::collections::HashMap;
use std::io;
use std::time::{Duration, Instant};

/// map of characters read from the keyboard to what the chip8 expects,
/// using the left-hand side of a qwerty keyboard:
///   1 2 3 4      1 2 3 C
///   q w e r  =>  4 5 6 D
///   a s d f      7 8 9 E
///   z x c v      A 0 B F
const CHIP8_CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('x', 0x00),
    ('1', 0x01),
    ('2', 0x02),
    ('3', 0x03),
    ('q', 0x04),
    ('w', 0x05),
    ('e', 0x06),
    ('a', 0x07),
    ('s', 0x08),
    ('d', 0x09),
    ('z', 0x0a),
    ('c', 0x0b),
    ('4', 0x0c),
    ('r', 0x0d),
    ('f', 0x0e),
    ('v', 0x0f),
];

/// reads key state
pub trait Input {
    /// overwrite `keys` with what is held right now. returns true when the
    /// user has asked to quit
    fn poll(&mut self, keys: &mut [bool; KEY_COUNT]) -> Result<bool, io::Error>;
}

/// Terminals report presses (and auto-repeats) but never releases, so a key
/// counts as held for a while after its last press.
pub struct KeyHold {
    last_pressed: [Option<Instant>; KEY_COUNT],
    hold: Duration,
}

impl KeyHold {
    pub fn new(hold: Duration) -> Self {
        KeyHold {
            last_pressed: [None; KEY_COUNT],
            hold,
        }
    }

    pub fn press(&mut self, key: u8, now: Instant) {
        if let Some(slot) = self.last_pressed.get_mut(key as usize) {
            *slot = Some(now);
        }
    }

    pub fn snapshot(&self, now: Instant) -> [bool; KEY_COUNT] {
        let mut keys = [false; KEY_COUNT];
        for (down, pressed) in keys.iter_mut().zip(self.last_pressed.iter()) {
            *down = pressed.map_or(false, |t| now.saturating_duration_since(t) < self.hold);
        }
        keys
    }
}

/// keypad read from the terminal via crossterm
pub struct TermInput {
    keymap: HashMap<char, u8>,
    held: KeyHold,
}

impl TermInput {
    pub fn new(hold: Duration) -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        Ok(TermInput {
            keymap: HashMap::from(CHIP8_CONVENTIONAL_KEYMAP),
            held: KeyHold::new(hold),
        })
    }

    /// drain pending events; true if quit was requested
    fn read_events(&mut self, now: Instant) -> Result<bool, io::Error> {
        let mut quit = false;
        while poll(Duration::from_millis(0))? {
            match read()? {
                Event::Key(KeyEvent {
                    code: KeyCode::Esc, ..
                }) => quit = true,
                Event::Key(KeyEvent {
                    code: KeyCode::Char('c'),
                    modifiers,
                    ..
                }) if modifiers.contains(KeyModifiers::CONTROL) => quit = true,
                Event::Key(KeyEvent {
                    code: KeyCode::Char(c),
                    ..
                }) => match self.keymap.get(&c.to_ascii_lowercase()) {
                    Some(&key) => self.held.press(key, now),
                    None => log::debug!("can't map {:?} to a keypad key", c),
                },
                other => log::trace!("ignoring terminal event {:?}", other),
            }
        }
        Ok(quit)
    }
}

impl Drop for TermInput {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            log::warn!("couldn't restore terminal: {}", e);
        }
    }
}

impl Input for TermInput {
    fn poll(&mut self, keys: &mut [bool; KEY_COUNT]) -> Result<bool, io::Error> {
        let now = Instant::now();
        let quit = self.read_events(now)?;
        *keys = self.held.snapshot(now);
        Ok(quit)
    }
}

/// dummy Input implementation for testing: fixed key state, optional quit
pub struct DummyInput {
    pub keys: [bool; KEY_COUNT],
    pub polls: usize,
    quit_after: Option<usize>,
}

impl DummyInput {
    pub fn new(pressed: &[u8]) -> Self {
        let mut keys = [false; KEY_COUNT];
        for &k in pressed {
            keys[k as usize] = true;
        }
        DummyInput {
            keys,
            polls: 0,
            quit_after: None,
        }
    }

    /// ask to quit on the n-th poll
    pub fn quit_after(mut self, polls: usize) -> Self {
        self.quit_after = Some(polls);
        self
    }
}

impl Input for DummyInput {
    fn poll(&mut self, keys: &mut [bool; KEY_COUNT]) -> Result<bool, io::Error> {
        self.polls += 1;
        *keys = self.keys;
        Ok(self.quit_after.map_or(false, |n| self.polls >= n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keymap_is_a_permutation() {
        let mut seen = [false; KEY_COUNT];
        for (_, key) in CHIP8_CONVENTIONAL_KEYMAP {
            assert!(!seen[key as usize]);
            seen[key as usize] = true;
        }
        let map = HashMap::from(CHIP8_CONVENTIONAL_KEYMAP);
        assert_eq!(map[&'4'], 0xc);
        assert_eq!(map[&'x'], 0x0);
        assert_eq!(map[&'v'], 0xf);
    }

    #[test]
    fn test_key_hold_expires() {
        let t0 = Instant::now();
        let mut h = KeyHold::new(Duration::from_millis(100));
        assert_eq!(h.snapshot(t0), [false; KEY_COUNT]);

        h.press(0x5, t0);
        assert!(h.snapshot(t0)[0x5]);
        assert!(h.snapshot(t0 + Duration::from_millis(99))[0x5]);
        assert!(!h.snapshot(t0 + Duration::from_millis(100))[0x5]);

        // auto-repeat refreshes the hold
        h.press(0x5, t0 + Duration::from_millis(90));
        assert!(h.snapshot(t0 + Duration::from_millis(150))[0x5]);
    }

    #[test]
    fn test_key_hold_ignores_bad_key() {
        let t0 = Instant::now();
        let mut h = KeyHold::new(Duration::from_millis(100));
        h.press(0x10, t0);
        assert_eq!(h.snapshot(t0), [false; KEY_COUNT]);
    }

    #[test]
    fn test_dummy_input() -> Result<(), io::Error> {
        let mut input = DummyInput::new(&[0x1, 0xf]).quit_after(2);
        let mut keys = [false; KEY_COUNT];
        assert!(!input.poll(&mut keys)?);
        assert!(keys[0x1] && keys[0xf] && !keys[0x2]);
        assert!(input.poll(&mut keys)?);
        Ok(())
    }
}
