use crate::error::Error;
use beep::beep;

/// Something that can make (or pretend to make) the buzzer noise
pub trait Sound {
    fn beep(&mut self) -> Result<(), Error>;
    fn stop(&mut self) -> Result<(), Error>;
    fn is_beeping(&self) -> bool;

    /// follow the sound timer; only touches the device on a change
    fn play(&mut self, active: bool) -> Result<(), Error> {
        match (active, self.is_beeping()) {
            (true, false) => self.beep(),
            (false, true) => self.stop(),
            _ => Ok(()),
        }
    }
}

/// PC-speaker style square wave via the `beep` crate
pub struct SimpleBeep {
    pitch: u16,
    is_beeping: bool,
}

impl SimpleBeep {
    pub fn new(pitch: u16) -> Self {
        SimpleBeep {
            pitch,
            is_beeping: false,
        }
    }
}

impl Sound for SimpleBeep {
    fn beep(&mut self) -> Result<(), Error> {
        beep(self.pitch).map_err(|e| Error::Sound(e.to_string()))?;
        self.is_beeping = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Error> {
        beep(0).map_err(|e| Error::Sound(e.to_string()))?;
        self.is_beeping = false;
        Ok(())
    }

    fn is_beeping(&self) -> bool {
        self.is_beeping
    }
}

impl Drop for SimpleBeep {
    fn drop(&mut self) {
        if self.is_beeping {
            let _ = beep(0);
        }
    }
}

/// silence
pub struct Mute {}

impl Mute {
    pub fn new() -> Self {
        Mute {}
    }
}

impl Default for Mute {
    fn default() -> Self {
        Self::new()
    }
}

impl Sound for Mute {
    fn beep(&mut self) -> Result<(), Error> {
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Error> {
        Ok(())
    }

    fn is_beeping(&self) -> bool {
        false
    }
}

/// counts what it was asked to do, for checking the sound gate
#[cfg(test)]
#[derive(Default)]
pub struct CountingSound {
    is_beeping: bool,
    pub starts: usize,
    pub stops: usize,
}

#[cfg(test)]
impl Sound for CountingSound {
    fn beep(&mut self) -> Result<(), Error> {
        self.is_beeping = true;
        self.starts += 1;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Error> {
        self.is_beeping = false;
        self.stops += 1;
        Ok(())
    }

    fn is_beeping(&self) -> bool {
        self.is_beeping
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_is_edge_triggered() -> Result<(), Error> {
        let mut s = CountingSound::default();
        s.play(false)?;
        assert_eq!((s.starts, s.stops), (0, 0));
        s.play(true)?;
        s.play(true)?;
        s.play(true)?;
        assert_eq!((s.starts, s.stops), (1, 0));
        assert!(s.is_beeping());
        s.play(false)?;
        s.play(false)?;
        assert_eq!((s.starts, s.stops), (1, 1));
        assert!(!s.is_beeping());
        Ok(())
    }

    #[test]
    fn test_mute_never_sounds() -> Result<(), Error> {
        let mut s = Mute::new();
        s.play(true)?;
        assert!(!s.is_beeping());
        s.play(false)?;
        Ok(())
    }
}
