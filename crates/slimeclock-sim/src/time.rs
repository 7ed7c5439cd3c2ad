//! Wall-clock access behind a trait, so the simulation never reads the OS
//! clock directly and tests can pin the displayed time.

use chrono::Timelike;

/// Supplies the displayed time. `hhmm` is queried on target rebuilds;
/// `clock_seconds` drives the separator blink only.
pub trait TimeOfDay {
    /// Current time as a zero-padded 24-hour `HHMM` string
    fn hhmm(&self) -> String;

    /// Seconds within the current minute, with sub-second fraction
    fn clock_seconds(&self) -> f64;
}

/// Local-timezone system clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeOfDay;

impl TimeOfDay for SystemTimeOfDay {
    fn hhmm(&self) -> String {
        chrono::Local::now().format("%H%M").to_string()
    }

    fn clock_seconds(&self) -> f64 {
        let now = chrono::Local::now();
        now.second() as f64 + now.nanosecond() as f64 * 1e-9
    }
}

/// Test double with a pinned time
#[derive(Debug, Clone)]
pub struct FixedTimeOfDay {
    pub hhmm: String,
    pub seconds: f64,
}

impl FixedTimeOfDay {
    pub fn new(hhmm: &str, seconds: f64) -> Self {
        Self {
            hhmm: hhmm.to_string(),
            seconds,
        }
    }
}

impl TimeOfDay for FixedTimeOfDay {
    fn hhmm(&self) -> String {
        self.hhmm.clone()
    }

    fn clock_seconds(&self) -> f64 {
        self.seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_hhmm_shape() {
        let s = SystemTimeOfDay.hhmm();
        assert_eq!(s.len(), 4);
        assert!(s.chars().all(|c| c.is_ascii_digit()));
        let hh: u32 = s[0..2].parse().unwrap();
        let mm: u32 = s[2..4].parse().unwrap();
        assert!(hh < 24 && mm < 60);
    }

    #[test]
    fn system_seconds_in_minute() {
        let s = SystemTimeOfDay.clock_seconds();
        assert!((0.0..61.0).contains(&s));
    }
}
