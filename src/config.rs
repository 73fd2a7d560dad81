use std::time::Duration;

/// Architectural variants that real programs disagree on. The defaults are
/// the reference behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Quirks {
    /// 8xy6/8xyE shift `Vy` into `Vx` (COSMAC VIP) instead of shifting `Vx` in place
    pub shift_uses_vy: bool,
    /// Bnnn jumps to `nnn + Vx` (SUPER-CHIP) instead of `nnn + V0`
    pub jump_uses_vx: bool,
    /// Dxyn clips sprites at the screen edges instead of wrapping every pixel
    pub clip_sprites: bool,
}

/// Host-side settings for running a machine
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// time between instructions
    pub cycle_period: Duration,
    /// time between timer ticks / frames
    pub timer_period: Duration,
    /// fixed RNG seed; time-based when `None`
    pub seed: Option<u64>,
    /// pitch of the buzzer
    pub tone_hz: u16,
    /// how long a key press counts as held when the host can't see releases
    pub key_hold: Duration,
    pub quirks: Quirks,
}

/// ~500Hz
pub const DEFAULT_CYCLE_PERIOD: Duration = Duration::from_millis(2);
/// ~60Hz
pub const DEFAULT_TIMER_PERIOD: Duration = Duration::from_micros(16_660);
pub const DEFAULT_TONE_HZ: u16 = 440;
pub const DEFAULT_KEY_HOLD: Duration = Duration::from_millis(100);

impl Default for Config {
    fn default() -> Self {
        Config {
            cycle_period: DEFAULT_CYCLE_PERIOD,
            timer_period: DEFAULT_TIMER_PERIOD,
            seed: None,
            tone_hz: DEFAULT_TONE_HZ,
            key_hold: DEFAULT_KEY_HOLD,
            quirks: Quirks::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_quirks_are_reference() {
        let q = Quirks::default();
        assert!(!q.shift_uses_vy);
        assert!(!q.jump_uses_vx);
        assert!(!q.clip_sprites);
    }

    #[test]
    fn test_rates_are_decoupled() {
        let c = Config::default();
        assert_eq!(c.cycle_period, Duration::from_millis(2));
        assert!(c.timer_period > c.cycle_period * 8);
    }
}
