use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use base64::Engine;
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::{MapConfig, ServerConfig};
use crate::error::{Error, Result};
use crate::ping::{PhaseDurations, Scheduler};

pub const DEFAULT_REGISTRAR_URL: &str = "https://api.name.com/core/v1";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_PROXY_URL: &str = "http://localhost:3000";
pub const DEFAULT_GEOJSON_URL: &str =
    "https://raw.githubusercontent.com/holtzy/D3-graph-gallery/master/DATA/world.geojson";

/// Contents of `config.toml`, every field optional
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub registrar: RegistrarSettings,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub map: MapSettings,
}

#[derive(Debug, Default, Deserialize)]
pub struct RegistrarSettings {
    pub url: Option<String>,
    pub auth: Option<String>,     // Pre-encoded Basic credential
    pub username: Option<String>, // Encoded together with `token` when `auth` is unset
    pub token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ServerSettings {
    pub port: Option<u16>,
    pub proxy_url: Option<String>, // Where `search`/`register` send requests
}

#[derive(Debug, Default, Deserialize)]
pub struct MapSettings {
    pub spawn_interval: Option<f32>, // seconds
    pub max_active: Option<usize>,
    pub rippling: Option<f32>,
    pub shooting: Option<f32>,
    pub target_ripple: Option<f32>,
    pub geojson_url: Option<String>,
    pub locations: Option<PathBuf>,
}

impl Settings {
    /// Config file if present, then environment overrides.
    pub fn load() -> Self {
        let path = Self::config_path();
        let mut settings = if path.exists() {
            Self::from_file(&path).unwrap_or_else(|e| {
                warn!("{e}; using defaults");
                Self::default()
            })
        } else {
            Self::default()
        };
        settings.apply_overrides(|key| env::var(key).ok());
        settings
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("domainmap")
            .join("config.toml")
    }

    /// `NAMEDOTCOM_API_URL`, `NAMEDOTCOM_AUTH` and `PORT` win over the file.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("NAMEDOTCOM_API_URL") {
            self.registrar.url = Some(url);
        }
        if let Some(auth) = lookup("NAMEDOTCOM_AUTH") {
            self.registrar.auth = Some(auth);
        }
        if let Some(port) = lookup("PORT") {
            match port.parse() {
                Ok(port) => self.server.port = Some(port),
                Err(e) => warn!("Invalid PORT value {port:?}: {e}"),
            }
        }
    }

    pub fn registrar_url(&self) -> String {
        self.registrar.url.clone().unwrap_or_else(|| {
            info!("Registrar URL not set, using default: {DEFAULT_REGISTRAR_URL}");
            DEFAULT_REGISTRAR_URL.to_string()
        })
    }

    /// `Basic` header value. A missing credential is not an error here; the
    /// registrar will reject the request.
    pub fn auth_header(&self) -> String {
        let credential = match (&self.registrar.auth, &self.registrar.username, &self.registrar.token) {
            (Some(auth), _, _) => auth.clone(),
            (None, Some(user), Some(token)) => {
                base64::engine::general_purpose::STANDARD.encode(format!("{user}:{token}"))
            }
            _ => {
                warn!("No registrar credential configured");
                String::new()
            }
        };
        format!("Basic {credential}")
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            port: self.server.port.unwrap_or(DEFAULT_PORT),
            registrar_url: self.registrar_url(),
            auth_header: self.auth_header(),
        }
    }

    pub fn proxy_url(&self) -> String {
        self.server
            .proxy_url
            .clone()
            .unwrap_or_else(|| DEFAULT_PROXY_URL.to_string())
    }

    /// Map settings with defaults filled in
    pub fn map_config(&self) -> MapConfig {
        let defaults = PhaseDurations::default();
        let secs = |key: &str, value: Option<f32>, fallback: Duration| match value {
            None => fallback,
            Some(s) => seconds(s).unwrap_or_else(|| {
                warn!("Invalid [map] {key} value {s}, using {fallback:?}");
                fallback
            }),
        };
        let scheduler = Scheduler::default();

        MapConfig {
            durations: PhaseDurations {
                rippling: secs("rippling", self.map.rippling, defaults.rippling),
                shooting: secs("shooting", self.map.shooting, defaults.shooting),
                target_ripple: secs(
                    "target_ripple",
                    self.map.target_ripple,
                    defaults.target_ripple,
                ),
            },
            spawn_interval: secs(
                "spawn_interval",
                self.map.spawn_interval,
                scheduler.interval(),
            ),
            max_active: self.map.max_active.unwrap_or(scheduler.cap()),
            geojson_url: Some(
                self.map
                    .geojson_url
                    .clone()
                    .unwrap_or_else(|| DEFAULT_GEOJSON_URL.to_string()),
            ),
            locations: self.map.locations.clone(),
            ..MapConfig::default()
        }
    }
}

/// Non-negative seconds as a `Duration`; `None` for negative, non-finite or
/// out-of-range values.
pub fn seconds(s: f32) -> Option<Duration> {
    Duration::try_from_secs_f32(s).ok()
}
