//! Simulated trigger timers

use cadence_hal::{TimerId, TriggerTimer};

/// Simulated bank of trigger timers
///
/// Timers `0..count` exist. Requested frequencies are clamped to
/// `max_frequency_hz`; a bank with a zero ceiling models a converter that
/// cannot be hardware-clocked at all.
#[derive(Debug, Clone, Copy)]
pub struct SimTimer {
    count: u8,
    max_frequency_hz: u32,
    /// Last (timer, achieved frequency) programmed
    last: Option<(TimerId, u32)>,
}

impl SimTimer {
    /// Create a bank of `count` timers limited to `max_frequency_hz`
    pub const fn new(count: u8, max_frequency_hz: u32) -> Self {
        Self {
            count,
            max_frequency_hz,
            last: None,
        }
    }

    /// Create a bank with no usable timers
    pub const fn none() -> Self {
        Self::new(0, 0)
    }

    /// Last timer programmed and the frequency it achieved
    pub fn last_configured(&self) -> Option<(TimerId, u32)> {
        self.last
    }
}

impl TriggerTimer for SimTimer {
    fn is_valid_timer(&self, timer: TimerId) -> bool {
        timer < self.count
    }

    fn configure(&mut self, timer: TimerId, frequency_hz: u32) -> u32 {
        let achieved = frequency_hz.min(self.max_frequency_hz);
        self.last = Some((timer, achieved));
        achieved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamps_to_ceiling() {
        let mut timer = SimTimer::new(2, 10_000);
        assert!(timer.is_valid_timer(1));
        assert!(!timer.is_valid_timer(2));
        assert_eq!(timer.configure(1, 50_000), 10_000);
        assert_eq!(timer.last_configured(), Some((1, 10_000)));
    }

    #[test]
    fn test_no_timers() {
        let mut timer = SimTimer::none();
        assert!(!timer.is_valid_timer(0));
        assert_eq!(timer.configure(0, 1000), 0);
    }
}
