//! What a ping looks like at a given phase and progress, independent of the surface.
//!
//! Sizes are in canvas pixels.

use crate::geo::Point;
use crate::ping::{ArcPath, Phase, Ping};

pub const RIPPLE_MAX_RADIUS: f64 = 25.0;
pub const CORE_RADIUS: f64 = 3.0;
pub const HEAD_RADIUS: f64 = 4.0;

/// Expanding ring around a ripple's endpoint
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ripple {
    pub center: Point,
    pub radius: f64,
    pub fill_opacity: f64,
    pub stroke_opacity: f64,
    pub core_radius: f64,
}

/// Head of a shot plus the short trail behind it
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shot {
    pub head: Point,
    pub head_radius: f64,
    pub trail_start: f64,
    pub trail_end: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Sprite {
    Ripple(Ripple),
    Shot { arc: ArcPath, shot: Shot },
}

pub fn ripple(center: Point, progress: f64) -> Ripple {
    let fade = 1.0 - progress;
    Ripple {
        center,
        radius: progress * RIPPLE_MAX_RADIUS,
        fill_opacity: 0.4 * fade,
        stroke_opacity: 0.8 * fade,
        core_radius: CORE_RADIUS,
    }
}

pub fn shot(arc: &ArcPath, progress: f64) -> Shot {
    Shot {
        head: arc.point_at(progress),
        head_radius: HEAD_RADIUS,
        trail_start: ArcPath::trail_start(progress),
        trail_end: progress,
    }
}

/// Sprite for a ping, or `None` once it has completed
pub fn sprite(ping: &Ping) -> Option<Sprite> {
    match ping.phase {
        Phase::Rippling => Some(Sprite::Ripple(ripple(ping.start.point, ping.progress))),
        Phase::TargetRipple => Some(Sprite::Ripple(ripple(ping.end.point, ping.progress))),
        Phase::Shooting => {
            let arc = ping.arc();
            Some(Sprite::Shot { shot: shot(&arc, ping.progress), arc })
        }
        Phase::Completed => None,
    }
}

/// Terminal stand-in for opacity: brighter canvas level for more opaque strokes
pub fn opacity_level(opacity: f64) -> u8 {
    match opacity {
        o if o >= 0.6 => 4,
        o if o >= 0.3 => 3,
        o if o > 0.0 => 2,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locations::Location;
    use crate::ping::Endpoint;
    use std::time::Instant;

    fn ping(phase: Phase, progress: f64) -> Ping {
        let endpoint = |x| Endpoint {
            location: Location::new("X", 0.0, 0.0, "ip"),
            point: Point::new(x, 50.0),
        };
        let mut ping = Ping::new(0, endpoint(10.0), endpoint(110.0), Instant::now());
        ping.phase = phase;
        ping.progress = progress;
        ping
    }

    #[test]
    fn ripple_grows_and_fades() {
        let start = ripple(Point::new(0.0, 0.0), 0.0);
        assert_eq!(start.radius, 0.0);
        assert!((start.stroke_opacity - 0.8).abs() < 1e-9);

        let half = ripple(Point::new(0.0, 0.0), 0.5);
        assert!((half.radius - 12.5).abs() < 1e-9);
        assert!((half.fill_opacity - 0.2).abs() < 1e-9);
        assert_eq!(half.core_radius, CORE_RADIUS);
    }

    #[test]
    fn ripple_centers_on_phase_endpoint() {
        match sprite(&ping(Phase::Rippling, 0.1)) {
            Some(Sprite::Ripple(r)) => assert_eq!(r.center.x, 10.0),
            other => panic!("unexpected {other:?}"),
        }
        match sprite(&ping(Phase::TargetRipple, 0.1)) {
            Some(Sprite::Ripple(r)) => assert_eq!(r.center.x, 110.0),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn shot_head_rides_the_arc() {
        let Some(Sprite::Shot { arc, shot }) = sprite(&ping(Phase::Shooting, 0.5)) else {
            panic!("expected a shot");
        };
        assert_eq!(shot.head, arc.point_at(0.5));
        assert!(shot.head.y < 50.0, "head should be above the endpoints mid-flight");
        assert!((shot.trail_start - 0.35).abs() < 1e-9);
    }

    #[test]
    fn completed_is_not_drawn() {
        assert!(sprite(&ping(Phase::Completed, 0.0)).is_none());
    }

    #[test]
    fn opacity_maps_to_levels() {
        assert_eq!(opacity_level(0.8), 4);
        assert_eq!(opacity_level(0.4), 3);
        assert_eq!(opacity_level(0.05), 2);
        assert_eq!(opacity_level(0.0), 0);
    }
}
