use std::time::Instant;

use rand::Rng;
use tracing::trace;

use super::{Endpoint, Ping};
use crate::geo::Projection;
use crate::locations::Location;

/// Create a ping between two different, randomly chosen locations.
///
/// Returns `None` instead of a ping when there are fewer than two locations or
/// when either endpoint falls outside the projection; the caller just skips
/// this spawn.
pub fn spawn<R: Rng + ?Sized>(
    locations: &[Location],
    projection: &Projection,
    rng: &mut R,
    id: u64,
    now: Instant,
) -> Option<Ping> {
    if locations.len() < 2 {
        return None;
    }

    let start_idx = rng.gen_range(0..locations.len());
    let mut end_idx = rng.gen_range(0..locations.len());
    while end_idx == start_idx {
        end_idx = rng.gen_range(0..locations.len());
    }

    let start = Endpoint::project(&locations[start_idx], projection);
    let end = Endpoint::project(&locations[end_idx], projection);
    let (Some(start), Some(end)) = (start, end) else {
        trace!(
            "Skipping ping {} -> {}: unprojectable",
            locations[start_idx].city,
            locations[end_idx].city
        );
        return None;
    };

    Some(Ping::new(id, start, end, now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Viewport;
    use crate::locations::builtin;
    use crate::ping::Phase;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn projection() -> Projection {
        Projection::equirectangular(Viewport::new(1200.0, 600.0))
    }

    #[test]
    fn endpoints_are_never_the_same_location() {
        let locations = builtin();
        let mut rng = StdRng::seed_from_u64(7);
        let now = Instant::now();

        for id in 0..2000 {
            let ping = spawn(&locations, &projection(), &mut rng, id, now).unwrap();
            assert_ne!(ping.start.location, ping.end.location);
        }
    }

    #[test]
    fn two_locations_yield_both_orderings() {
        let locations = vec![
            Location::new("Oslo", 59.9, 10.8, "a"),
            Location::new("Lima", -12.0, -77.0, "b"),
        ];
        let mut rng = StdRng::seed_from_u64(42);
        let now = Instant::now();

        let mut forward = 0;
        let mut backward = 0;
        for id in 0..200 {
            let ping = spawn(&locations, &projection(), &mut rng, id, now).unwrap();
            match (ping.start.location.city.as_str(), ping.end.location.city.as_str()) {
                ("Oslo", "Lima") => forward += 1,
                ("Lima", "Oslo") => backward += 1,
                other => panic!("unexpected pair {other:?}"),
            }
        }
        assert!(forward > 0 && backward > 0);
    }

    #[test]
    fn new_ping_starts_rippling() {
        let locations = builtin();
        let mut rng = StdRng::seed_from_u64(1);
        let now = Instant::now();
        let ping = spawn(&locations, &projection(), &mut rng, 9, now).unwrap();

        assert_eq!(ping.id, 9);
        assert_eq!(ping.phase, Phase::Rippling);
        assert_eq!(ping.progress, 0.0);
        assert_eq!(ping.phase_started, now);
        assert_eq!(ping.start.location.project(&projection()), Some(ping.start.point));
    }

    #[test]
    fn unprojectable_location_skips_spawn() {
        let locations = vec![
            Location::new("Nowhere", 95.0, 0.0, "a"),
            Location::new("Null Island", 0.0, 0.0, "b"),
        ];
        let mut rng = StdRng::seed_from_u64(3);
        for id in 0..20 {
            assert!(spawn(&locations, &projection(), &mut rng, id, Instant::now()).is_none());
        }
    }

    #[test]
    fn too_few_locations_skips_spawn() {
        let mut rng = StdRng::seed_from_u64(3);
        let one = vec![Location::new("Solo", 0.0, 0.0, "a")];
        assert!(spawn(&one, &projection(), &mut rng, 0, Instant::now()).is_none());
        assert!(spawn(&[], &projection(), &mut rng, 0, Instant::now()).is_none());
    }
}
