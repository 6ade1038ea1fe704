use std::time::{Duration, Instant};

/// Fixed-cadence spawn timer with a cap on concurrent pings.
///
/// The cap limits how many pings are on screen, not how often the timer
/// fires: a firing while the cap is reached is dropped, never queued.
#[derive(Clone, Debug)]
pub struct Scheduler {
    interval: Duration,
    cap: usize,
    next_fire: Option<Instant>,
}

impl Scheduler {
    pub fn new(interval: Duration, cap: usize) -> Self {
        Self {
            interval,
            cap,
            next_fire: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// True once per elapsed interval. The first call arms the timer, so the
    /// first firing happens one interval after start.
    pub fn due(&mut self, now: Instant) -> bool {
        let Some(next) = self.next_fire else {
            self.next_fire = Some(now + self.interval);
            return false;
        };

        if now < next {
            return false;
        }

        // Missed firings are dropped rather than replayed in a burst
        let mut following = next + self.interval;
        while following <= now && !self.interval.is_zero() {
            following += self.interval;
        }
        self.next_fire = Some(following);
        true
    }

    /// Whether a firing may spawn given the current number of active pings
    pub fn admits(&self, active: usize) -> bool {
        active < self.cap
    }

    /// Disarm; the next `due` call starts a fresh interval
    pub fn reset(&mut self) {
        self.next_fire = None;
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(Duration::from_millis(1500), 3)
    }
}
