//! Pausable count-up / count-down timer
//!
//! Starts paused. Text output is either whole minutes or `m:s.ss`.

use serde::{Deserialize, Serialize};

/// Direction the timer runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimerFunction {
    #[default]
    CountUp,
    CountDown,
}

/// Text precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimerText {
    #[default]
    Minutes,
    MinutesSeconds,
}

/// Timer tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    pub function: TimerFunction,
    /// Count-down length in seconds
    pub allowed_time: u32,
    pub text: TimerText,
}

#[derive(Debug, Clone)]
pub struct UniversalTimer {
    config: TimerConfig,
    paused: bool,
    current: f32,
}

impl UniversalTimer {
    pub fn new(config: TimerConfig) -> Self {
        let mut timer = Self {
            config,
            paused: true,
            current: 0.0,
        };
        timer.reset(None);
        timer
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn function(&self) -> TimerFunction {
        self.config.function
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Seconds on the clock
    pub fn current(&self) -> f32 {
        self.current
    }

    /// Count-down reached zero
    pub fn expired(&self) -> bool {
        self.config.function == TimerFunction::CountDown && self.current <= 0.0
    }

    /// Advance by `dt` unless paused
    pub fn advance(&mut self, dt: f32) {
        if self.paused {
            return;
        }
        match self.config.function {
            TimerFunction::CountUp => self.current += dt,
            TimerFunction::CountDown => self.current = (self.current - dt).max(0.0),
        }
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Pause and rewind. Count-down restarts from `total` when given and
    /// non-zero, otherwise from the configured allowed time.
    pub fn reset(&mut self, total: Option<u32>) {
        self.paused = true;
        self.current = match self.config.function {
            TimerFunction::CountUp => 0.0,
            TimerFunction::CountDown => match total {
                Some(t) if t > 0 => t as f32,
                _ => self.config.allowed_time as f32,
            },
        };
    }

    /// Pause and swap direction. A new count-down starts at `total`.
    pub fn switch_function(&mut self, total: u32) {
        self.paused = true;
        match self.config.function {
            TimerFunction::CountUp => {
                self.config.function = TimerFunction::CountDown;
                self.current = total as f32;
            }
            TimerFunction::CountDown => {
                self.config.function = TimerFunction::CountUp;
                self.current = 0.0;
            }
        }
        log::debug!("Timer switched to {:?}", self.config.function);
    }

    pub fn minutes(&self) -> u32 {
        self.current as u32 / 60
    }

    pub fn seconds(&self) -> f32 {
        self.current % 60.0
    }

    pub fn text(&self) -> String {
        match self.config.text {
            TimerText::Minutes => self.minutes().to_string(),
            TimerText::MinutesSeconds => format!("{}:{:.2}", self.minutes(), self.seconds()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn countdown(allowed: u32) -> UniversalTimer {
        UniversalTimer::new(TimerConfig {
            function: TimerFunction::CountDown,
            allowed_time: allowed,
            text: TimerText::MinutesSeconds,
        })
    }

    #[test]
    fn test_starts_paused() {
        let mut timer = UniversalTimer::new(TimerConfig::default());
        assert!(timer.is_paused());
        timer.advance(1.0);
        assert_eq!(timer.current(), 0.0);

        timer.toggle_pause();
        timer.advance(1.5);
        assert_eq!(timer.current(), 1.5);
    }

    #[test]
    fn test_countdown_floors_at_zero() {
        let mut timer = countdown(2);
        assert_eq!(timer.current(), 2.0);
        timer.toggle_pause();
        timer.advance(1.5);
        assert!(!timer.expired());
        timer.advance(1.5);
        assert_eq!(timer.current(), 0.0);
        assert!(timer.expired());
    }

    #[test]
    fn test_reset_pauses_and_uses_total() {
        let mut timer = countdown(90);
        timer.toggle_pause();
        timer.advance(10.0);

        timer.reset(Some(30));
        assert!(timer.is_paused());
        assert_eq!(timer.current(), 30.0);

        timer.reset(Some(0));
        assert_eq!(timer.current(), 90.0);
        timer.reset(None);
        assert_eq!(timer.current(), 90.0);
    }

    #[test]
    fn test_switch_function() {
        let mut timer = UniversalTimer::new(TimerConfig::default());
        timer.toggle_pause();
        timer.advance(5.0);

        timer.switch_function(120);
        assert!(timer.is_paused());
        assert_eq!(timer.function(), TimerFunction::CountDown);
        assert_eq!(timer.current(), 120.0);

        timer.switch_function(0);
        assert_eq!(timer.function(), TimerFunction::CountUp);
        assert_eq!(timer.current(), 0.0);
    }

    #[test]
    fn test_text_output() {
        let mut timer = countdown(125);
        assert_eq!(timer.text(), "2:5.00");

        timer = UniversalTimer::new(TimerConfig {
            allowed_time: 125,
            function: TimerFunction::CountDown,
            text: TimerText::Minutes,
        });
        assert_eq!(timer.text(), "2");
    }
}
