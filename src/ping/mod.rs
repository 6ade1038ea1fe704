//! Animated pings: a ripple at the source, a shot along an arc, a ripple at the target.
//!
//! Each ping carries its own phase, progress and phase start time, so the frame
//! tick can advance every ping independently and the renderer only ever needs
//! the current snapshot.

pub mod factory;
pub mod field;
pub mod scheduler;

use std::time::{Duration, Instant};

use crate::geo::{Point, Projection};
use crate::locations::Location;

pub use factory::spawn;
pub use field::PingField;
pub use scheduler::Scheduler;

/// Arc control point is raised by this fraction of the endpoint distance
pub const ARC_RAISE: f64 = 0.4;

/// Length of the fading trail behind a shot, in curve parameter units
pub const TRAIL_LENGTH: f64 = 0.15;

/// Lifecycle stage of a ping, in order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Rippling,
    Shooting,
    TargetRipple,
    Completed,
}

impl Phase {
    /// Following phase; `Completed` is terminal.
    pub fn next(self) -> Phase {
        match self {
            Phase::Rippling => Phase::Shooting,
            Phase::Shooting => Phase::TargetRipple,
            Phase::TargetRipple => Phase::Completed,
            Phase::Completed => Phase::Completed,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Completed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Rippling => "rippling",
            Phase::Shooting => "shooting",
            Phase::TargetRipple => "target-ripple",
            Phase::Completed => "completed",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How long each animated phase lasts
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseDurations {
    pub rippling: Duration,
    pub shooting: Duration,
    pub target_ripple: Duration,
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self {
            rippling: Duration::from_millis(1000),
            shooting: Duration::from_millis(1500),
            target_ripple: Duration::from_millis(1000),
        }
    }
}

impl PhaseDurations {
    /// `None` for the terminal phase, which has no duration.
    pub fn duration(&self, phase: Phase) -> Option<Duration> {
        match phase {
            Phase::Rippling => Some(self.rippling),
            Phase::Shooting => Some(self.shooting),
            Phase::TargetRipple => Some(self.target_ripple),
            Phase::Completed => None,
        }
    }
}

/// A location with its pixel position at the time the ping was created
#[derive(Clone, Debug, PartialEq)]
pub struct Endpoint {
    pub location: Location,
    pub point: Point,
}

impl Endpoint {
    pub fn project(location: &Location, projection: &Projection) -> Option<Self> {
        let point = location.project(projection)?;
        Some(Self {
            location: location.clone(),
            point,
        })
    }
}

/// A simulated network event between two locations
#[derive(Clone, Debug, PartialEq)]
pub struct Ping {
    pub id: u64,
    pub start: Endpoint,
    pub end: Endpoint,
    pub phase: Phase,
    /// Fraction of the current phase completed, in [0, 1) while animated
    pub progress: f64,
    pub phase_started: Instant,
}

impl Ping {
    pub fn new(id: u64, start: Endpoint, end: Endpoint, now: Instant) -> Self {
        Self {
            id,
            start,
            end,
            phase: Phase::Rippling,
            progress: 0.0,
            phase_started: now,
        }
    }

    /// Apply one frame tick.
    ///
    /// At most one phase transition happens per call. On a transition the
    /// progress resets to 0 and the phase clock restarts at `now`, dropping any
    /// time beyond the phase boundary.
    pub fn advance(&mut self, now: Instant, durations: &PhaseDurations) {
        let Some(duration) = durations.duration(self.phase) else {
            return;
        };

        let elapsed = now.saturating_duration_since(self.phase_started);
        let progress = if duration.is_zero() {
            1.0
        } else {
            elapsed.as_secs_f64() / duration.as_secs_f64()
        };

        if progress >= 1.0 {
            self.phase = self.phase.next();
            self.progress = 0.0;
            self.phase_started = now;
        } else {
            self.progress = progress;
        }
    }

    /// Endpoint a ripple is centred on, if the ping is rippling.
    pub fn focus(&self) -> Option<&Endpoint> {
        match self.phase {
            Phase::Rippling => Some(&self.start),
            Phase::TargetRipple => Some(&self.end),
            Phase::Shooting | Phase::Completed => None,
        }
    }

    pub fn arc(&self) -> ArcPath {
        ArcPath::between(self.start.point, self.end.point)
    }
}

/// Quadratic Bezier from one endpoint to the other through a raised midpoint
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcPath {
    pub from: Point,
    pub control: Point,
    pub to: Point,
}

impl ArcPath {
    pub fn between(from: Point, to: Point) -> Self {
        let mid = from.midpoint(to);
        let raise = from.distance(to) * ARC_RAISE;
        Self {
            from,
            control: Point::new(mid.x, mid.y - raise),
            to,
        }
    }

    pub fn point_at(&self, t: f64) -> Point {
        let u = 1.0 - t;
        Point::new(
            u * u * self.from.x + 2.0 * u * t * self.control.x + t * t * self.to.x,
            u * u * self.from.y + 2.0 * u * t * self.control.y + t * t * self.to.y,
        )
    }

    /// Curve parameter where the trail behind `t` begins
    pub fn trail_start(t: f64) -> f64 {
        (t - TRAIL_LENGTH).max(0.0)
    }
}
