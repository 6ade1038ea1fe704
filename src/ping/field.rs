use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use super::{spawn, Phase, PhaseDurations, Ping, Scheduler};
use crate::geo::Projection;
use crate::locations::Location;

/// The set of active pings and everything that mutates it.
///
/// Owned by the map view for its whole lifetime. Two triggers drive it from the
/// same thread: `spawn_tick` on the scheduler cadence and `frame_tick` once per
/// rendered frame. Dropping the field drops both.
pub struct PingField {
    pings: Vec<Ping>,
    durations: PhaseDurations,
    scheduler: Scheduler,
    rng: StdRng,
    next_id: u64,
}

impl PingField {
    pub fn new(durations: PhaseDurations, scheduler: Scheduler, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self {
            pings: Vec::new(),
            durations,
            scheduler,
            rng,
            next_id: 0,
        }
    }

    /// Read-only snapshot for the renderer
    pub fn pings(&self) -> &[Ping] {
        &self.pings
    }

    /// Pings that have not reached the terminal phase
    pub fn active(&self) -> usize {
        self.pings.iter().filter(|p| !p.phase.is_terminal()).count()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// One spawn-timer firing: adds at most one ping, and none at the cap.
    /// Returns the id of the new ping.
    pub fn spawn_tick(
        &mut self,
        now: Instant,
        locations: &[Location],
        projection: &Projection,
    ) -> Option<u64> {
        if !self.scheduler.admits(self.active()) {
            return None;
        }

        let ping = spawn(locations, projection, &mut self.rng, self.next_id, now)?;
        let id = ping.id;
        debug!(
            "Ping {id}: {} -> {}",
            ping.start.location.city, ping.end.location.city
        );
        self.next_id += 1;
        self.pings.push(ping);
        Some(id)
    }

    /// One animation frame: advance every ping and drop the completed ones.
    pub fn frame_tick(&mut self, now: Instant) {
        let durations = self.durations;
        self.pings = std::mem::take(&mut self.pings)
            .into_iter()
            .map(|mut ping| {
                ping.advance(now, &durations);
                ping
            })
            .filter(|ping| ping.phase != Phase::Completed)
            .collect();
    }

    /// Run whichever triggers are due at `now`, spawn first.
    pub fn poll(&mut self, now: Instant, locations: &[Location], projection: &Projection) {
        if self.scheduler.due(now) {
            self.spawn_tick(now, locations, projection);
        }
        self.frame_tick(now);
    }

    /// Forget all pings and restart the spawn timer, e.g. after the projection
    /// changed or the animation was paused.
    pub fn clear(&mut self) {
        self.pings.clear();
        self.scheduler.reset();
    }
}
