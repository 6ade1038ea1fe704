//! Points of interest pinged across the map

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::geo::{Point, Projection};

/// Label shown for every node in the hover tooltip
pub const PROVIDER: &str = "Global Backbone";

/// Cursor distance (pixels) within which a city counts as hovered
pub const HOVER_RADIUS: f64 = 10.0;

/// A city node: display name, coordinate in degrees and an illustrative address.
///
/// Field names match the `locations.json` shape (`city`, `lat`, `lng`, `ip`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub lat: f64,
    pub lng: f64,
    pub ip: String,
}

impl Location {
    pub fn new(city: impl Into<String>, lat: f64, lng: f64, ip: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            lat,
            lng,
            ip: ip.into(),
        }
    }

    pub fn project(&self, projection: &Projection) -> Option<Point> {
        projection.project(self.lng, self.lat)
    }

    /// Mock datacenter name, e.g. `DC-TOK-01` for Tokyo
    pub fn datacenter(&self) -> String {
        let prefix: String = self.city.to_uppercase().chars().take(3).collect();
        format!("DC-{prefix}-01")
    }
}

// (city, lat, lng, ip)
const BUILTIN: &[(&str, f64, f64, &str)] = &[
    ("New York", 40.7, -74.0, "192.0.2.10"),
    ("Los Angeles", 34.1, -118.2, "198.51.100.14"),
    ("Chicago", 41.9, -87.6, "203.0.113.18"),
    ("San Francisco", 37.8, -122.4, "203.0.113.30"),
    ("Seattle", 47.6, -122.3, "192.0.2.34"),
    ("Toronto", 43.7, -79.4, "198.51.100.38"),
    ("Montreal", 45.5, -73.6, "203.0.113.42"),
    ("Mexico City", 19.4, -99.1, "192.0.2.46"),
    ("Sao Paulo", -23.5, -46.6, "198.51.100.50"),
    ("Rio de Janeiro", -22.9, -43.2, "203.0.113.54"),
    ("Buenos Aires", -34.6, -58.4, "192.0.2.58"),
    ("Santiago", -33.4, -70.6, "198.51.100.62"),
    ("Lima", -12.0, -77.0, "203.0.113.66"),
    ("Bogota", 4.7, -74.1, "192.0.2.70"),
    ("London", 51.5, -0.1, "198.51.100.74"),
    ("Paris", 48.9, 2.3, "203.0.113.78"),
    ("Berlin", 52.5, 13.4, "192.0.2.82"),
    ("Rome", 41.9, 12.5, "198.51.100.86"),
    ("Madrid", 40.4, -3.7, "203.0.113.90"),
    ("Amsterdam", 52.4, 4.9, "192.0.2.94"),
    ("Oslo", 59.9, 10.8, "198.51.100.98"),
    ("Stockholm", 59.3, 18.1, "203.0.113.102"),
    ("Moscow", 55.8, 37.6, "192.0.2.106"),
    ("Prague", 50.1, 14.4, "198.51.100.110"),
    ("Vienna", 48.2, 16.4, "203.0.113.114"),
    ("Istanbul", 41.0, 29.0, "192.0.2.118"),
    ("Cairo", 30.0, 31.2, "198.51.100.122"),
    ("Cape Town", -33.9, 18.4, "203.0.113.126"),
    ("Nairobi", -1.3, 36.8, "192.0.2.130"),
    ("Lagos", 6.5, 3.4, "198.51.100.134"),
    ("Casablanca", 33.6, -7.6, "203.0.113.138"),
    ("Johannesburg", -26.2, 28.0, "192.0.2.142"),
    ("Tokyo", 35.7, 139.7, "198.51.100.146"),
    ("Shanghai", 31.2, 121.5, "203.0.113.150"),
    ("Beijing", 39.9, 116.4, "192.0.2.154"),
    ("Hong Kong", 22.3, 114.2, "198.51.100.158"),
    ("Singapore", 1.4, 103.8, "203.0.113.162"),
    ("Seoul", 37.6, 127.0, "192.0.2.166"),
    ("Bangkok", 13.8, 100.5, "198.51.100.170"),
    ("Delhi", 28.6, 77.2, "203.0.113.174"),
    ("Mumbai", 19.1, 72.9, "192.0.2.178"),
    ("Taipei", 25.0, 121.5, "198.51.100.182"),
    ("Manila", 14.6, 121.0, "203.0.113.186"),
    ("Jakarta", -6.2, 106.8, "192.0.2.190"),
    ("Dubai", 25.3, 55.3, "198.51.100.194"),
    ("Tel Aviv", 32.1, 34.8, "203.0.113.198"),
    ("Sydney", -33.9, 151.2, "192.0.2.202"),
    ("Melbourne", -37.8, 145.0, "198.51.100.206"),
    ("Auckland", -36.8, 174.8, "203.0.113.210"),
    ("Brisbane", -27.5, 153.0, "192.0.2.214"),
];

/// Reference data set bundled with the binary
pub fn builtin() -> Vec<Location> {
    BUILTIN
        .iter()
        .map(|&(city, lat, lng, ip)| Location::new(city, lat, lng, ip))
        .collect()
}

/// Load a JSON array of locations
pub fn load(path: &Path) -> Result<Vec<Location>> {
    let content = fs::read_to_string(path)?;
    let locations: Vec<Location> = serde_json::from_str(&content)?;
    info!("Loaded {} locations from {}", locations.len(), path.display());
    Ok(locations)
}

/// Pings need two distinct endpoints, so fewer than two locations is a setup error.
pub fn ensure_animatable(locations: &[Location]) -> Result<()> {
    if locations.len() < 2 {
        return Err(Error::TooFewLocations(locations.len()));
    }
    Ok(())
}

/// First location whose projected marker lies within `radius` pixels of `cursor`.
pub fn hovered<'a>(
    locations: &'a [Location],
    projection: &Projection,
    cursor: Point,
    radius: f64,
) -> Option<&'a Location> {
    let found = locations.iter().find(|location| {
        location
            .project(projection)
            .is_some_and(|p| p.distance(cursor) < radius)
    });
    if let Some(location) = found {
        debug!("Hovering {}", location.city);
    }
    found
}
