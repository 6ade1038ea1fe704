use std::path::PathBuf;
use std::time::Duration;

use crate::ping::{PhaseDurations, Scheduler};

/// Configuration for the animated map view
#[derive(Clone, Debug)]
pub struct MapConfig {
    pub time_step: f32, // seconds per frame
    pub seed: Option<u64>,
    pub durations: PhaseDurations,
    pub spawn_interval: Duration,
    pub max_active: usize,
    pub geojson_url: Option<String>, // None = built-in outlines only
    pub locations: Option<PathBuf>,  // None = built-in city set
    pub color_scheme: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        let scheduler = Scheduler::default();
        Self {
            time_step: 0.03,
            seed: None,
            durations: PhaseDurations::default(),
            spawn_interval: scheduler.interval(),
            max_active: scheduler.cap(),
            geojson_url: None,
            locations: None,
            color_scheme: 2,
        }
    }
}

impl MapConfig {
    pub fn scheduler(&self) -> Scheduler {
        Scheduler::new(self.spawn_interval, self.max_active)
    }
}

/// Configuration for the registrar proxy
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub registrar_url: String,
    pub auth_header: String,
}
