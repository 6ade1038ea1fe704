//! Land outlines behind the pings.
//!
//! A coarse built-in outline set is always available. A detailed GeoJSON world
//! map can be fetched in the background and swapped in when it arrives; if the
//! fetch fails or never finishes the built-in outlines stay.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use serde_json::Value;
use tracing::{info, warn};

use super::canvas::Canvas;
use crate::geo::Projection;

/// A closed ring of `[lon, lat]` degrees
pub type Ring = Vec<[f64; 2]>;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

// Low-detail continent outlines, [lon, lat]
const OUTLINES: &[&[[f64; 2]]] = &[
    // North America
    &[
        [-90.5, 69.5], [-81.4, 67.1], [-94.7, 58.9], [-79.9, 51.2], [-77.4, 62.6],
        [-67.6, 58.2], [-64.6, 60.3], [-55.8, 53.3], [-71.1, 46.8], [-65.1, 49.2],
        [-59.8, 45.9], [-76.3, 39.2], [-81.3, 31.4], [-80.4, 25.2], [-84.1, 30.1],
        [-97.1, 27.8], [-95.9, 18.8], [-87.1, 21.5], [-88.9, 15.9], [-83.4, 15.3],
        [-82.2, 9.0], [-74.9, 11.1], [-80.9, 7.2], [-105.0, 19.3], [-113.1, 31.2],
        [-109.4, 23.4], [-112.2, 24.7], [-124.4, 40.3], [-122.8, 49.0], [-134.1, 58.1],
        [-150.6, 61.3], [-164.8, 54.4], [-157.0, 58.9], [-166.1, 61.5], [-160.8, 64.8],
        [-168.1, 65.7], [-156.6, 71.4], [-108.9, 67.4], [-96.1, 67.3], [-95.2, 71.9],
        [-90.5, 69.5],
    ],
    // South America
    &[
        [-74.9, 11.1], [-61.9, 10.7], [-51.3, 4.2], [-50.4, -0.1], [-34.7, -7.3],
        [-40.9, -21.9], [-47.6, -24.9], [-53.8, -34.4], [-58.4, -33.9], [-56.8, -36.9],
        [-65.1, -41.1], [-66.0, -48.1], [-71.0, -53.8], [-74.9, -52.3], [-75.6, -46.6],
        [-72.7, -42.4], [-70.4, -18.3], [-76.0, -14.6], [-81.4, -4.7], [-77.1, 3.8],
        [-79.1, 9.0], [-74.9, 11.1],
    ],
    // Europe
    &[
        [29.7, 31.2], [34.3, 31.2], [36.2, 36.7], [27.6, 36.7], [26.2, 39.5],
        [41.6, 41.5], [36.7, 45.2], [39.1, 47.3], [33.9, 44.4], [30.7, 46.6],
        [28.8, 41.1], [22.6, 40.3], [23.2, 36.4], [13.9, 45.6], [18.5, 40.2],
        [15.7, 37.9], [8.9, 44.4], [-5.9, 36.0], [-8.9, 36.9], [-9.4, 43.0],
        [-1.9, 43.4], [-4.6, 48.7], [8.1, 53.5], [8.5, 57.1], [10.9, 54.0],
        [19.7, 54.4], [23.3, 59.2], [29.1, 60.0], [21.3, 60.7], [25.4, 65.1],
        [22.2, 65.7], [12.9, 55.4], [10.4, 59.5], [5.7, 58.6], [5.9, 62.6],
        [19.2, 69.8], [31.3, 70.5], [33.8, 69.3], [29.7, 31.2],
    ],
    // Africa
    &[
        [32.4, 29.9], [42.7, 11.7], [51.0, 10.6], [39.2, -4.7], [40.8, -14.7],
        [34.8, -19.8], [35.5, -24.1], [28.2, -32.8], [19.6, -34.8], [11.8, -18.1],
        [13.7, -10.7], [9.4, 3.7], [4.3, 6.3], [-8.0, 4.4], [-17.6, 14.7],
        [32.4, 29.9],
    ],
    // Asia
    &[
        [107.0, 77.0], [131.3, 70.8], [178.6, 69.4], [179.2, 62.3], [163.5, 59.9],
        [156.8, 51.0], [155.9, 56.8], [164.5, 62.6], [135.1, 54.7], [141.4, 52.2],
        [127.5, 39.8], [129.1, 35.1], [121.6, 40.9], [118.0, 39.2], [122.4, 37.5],
        [119.2, 34.9], [121.7, 28.2], [105.9, 19.8], [109.3, 13.4], [105.2, 8.6],
        [100.1, 13.4], [104.2, 1.3], [91.4, 22.8], [80.3, 15.9], [77.5, 8.0],
        [72.6, 21.4], [48.9, 30.3], [51.8, 24.0], [56.4, 26.4], [59.8, 22.3],
        [43.5, 12.6], [39.1, 21.3], [33.8, 69.3], [41.1, 67.5], [33.2, 66.6],
        [37.0, 63.8], [43.5, 68.6], [68.5, 68.1], [66.7, 71.0], [69.9, 73.0],
        [72.4, 66.2], [74.7, 72.8], [107.0, 77.0],
    ],
    // Australia
    &[
        [143.6, -13.8], [153.1, -26.1], [150.0, -37.4], [140.6, -38.0], [138.2, -34.4],
        [136.8, -35.3], [137.8, -32.9], [136.0, -34.9], [131.3, -31.5], [115.0, -34.2],
        [114.1, -21.8], [120.9, -19.7], [125.7, -14.2], [129.6, -15.0], [132.4, -11.1],
        [136.5, -11.9], [135.5, -15.0], [140.2, -17.7], [142.1, -11.0], [143.6, -13.8],
    ],
    // Greenland
    &[
        [-27.1, 83.5], [-20.8, 82.7], [-31.4, 82.0], [-12.2, 81.3], [-20.0, 80.2],
        [-17.7, 80.1], [-21.7, 76.6], [-19.4, 74.3], [-26.4, 70.2], [-22.3, 70.1],
        [-39.8, 65.5], [-43.4, 60.1], [-51.6, 63.6], [-54.0, 67.2], [-50.9, 69.9],
        [-54.7, 69.6], [-51.4, 70.6], [-58.6, 75.5], [-73.3, 78.0], [-62.7, 81.8],
        [-27.1, 83.5],
    ],
    // Japan
    &[
        [141.0, 37.1], [135.8, 33.5], [131.0, 33.9], [130.2, 31.4], [129.4, 33.3],
        [139.4, 38.2], [140.3, 41.2], [141.0, 37.1],
    ],
    // UK/Ireland
    &[
        [-3.0, 58.6], [1.4, 51.3], [-5.2, 50.0], [-2.9, 54.0], [-6.1, 56.8],
        [-3.0, 58.6],
    ],
    // Antarctica
    &[
        [-58.6, -64.2], [-65.7, -68.0], [-60.8, -73.7], [-78.0, -79.2], [-58.2, -83.2],
        [-28.5, -80.3], [-35.3, -78.1], [-6.9, -70.9], [54.5, -65.8], [69.9, -72.3],
        [88.0, -66.2], [135.1, -65.3], [171.2, -71.7], [159.8, -80.9], [180.0, -84.7],
        [180.0, -90.0], [-180.0, -90.0], [-179.1, -84.1], [-143.1, -85.0], [-158.4, -76.9],
        [-74.9, -73.9], [-58.6, -64.2],
    ],
];

pub fn builtin() -> Vec<Ring> {
    OUTLINES.iter().map(|ring| ring.to_vec()).collect()
}

/// Outer and inner rings of every Polygon / MultiPolygon feature
pub fn parse_geojson(doc: &Value) -> Vec<Ring> {
    let Some(features) = doc.get("features").and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut rings = Vec::new();
    for geometry in features.iter().filter_map(|f| f.get("geometry")) {
        let coordinates = geometry.get("coordinates");
        match geometry.get("type").and_then(Value::as_str) {
            Some("Polygon") => {
                if let Some(polygon) = coordinates {
                    collect_polygon(polygon, &mut rings);
                }
            }
            Some("MultiPolygon") => {
                for polygon in coordinates.and_then(Value::as_array).into_iter().flatten() {
                    collect_polygon(polygon, &mut rings);
                }
            }
            _ => {}
        }
    }
    rings
}

fn collect_polygon(polygon: &Value, rings: &mut Vec<Ring>) {
    for ring in polygon.as_array().into_iter().flatten() {
        let points: Ring = ring
            .as_array()
            .into_iter()
            .flatten()
            .filter_map(|pos| {
                let pos = pos.as_array()?;
                Some([pos.first()?.as_f64()?, pos.get(1)?.as_f64()?])
            })
            .collect();
        if points.len() >= 2 {
            rings.push(points);
        }
    }
}

fn fetch(url: &str) -> Result<Vec<Ring>, String> {
    let doc: Value = ureq::get(url)
        .timeout(FETCH_TIMEOUT)
        .call()
        .map_err(|e| e.to_string())?
        .into_json()
        .map_err(|e| e.to_string())?;

    let rings = parse_geojson(&doc);
    if rings.is_empty() {
        return Err("no polygon features".to_string());
    }
    Ok(rings)
}

/// Outlines currently drawn, plus a pending download if one was requested
pub struct BaseMap {
    rings: Vec<Ring>,
    pending: Option<Receiver<Result<Vec<Ring>, String>>>,
}

impl BaseMap {
    pub fn new(geojson_url: Option<&str>) -> Self {
        let pending = geojson_url.map(|url| {
            let url = url.to_string();
            let (tx, rx) = mpsc::channel();
            thread::spawn(move || {
                // Receiver may be gone if the view closed first
                let _ = tx.send(fetch(&url));
            });
            rx
        });

        Self {
            rings: builtin(),
            pending,
        }
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    /// Swap in downloaded outlines if they arrived. Returns true on swap.
    pub fn poll(&mut self) -> bool {
        let Some(rx) = &self.pending else {
            return false;
        };

        match rx.try_recv() {
            Ok(Ok(rings)) => {
                info!("Loaded {} outline rings from GeoJSON", rings.len());
                self.rings = rings;
                self.pending = None;
                true
            }
            Ok(Err(e)) => {
                warn!("World map fetch failed, keeping built-in outlines: {e}");
                self.pending = None;
                false
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                self.pending = None;
                false
            }
        }
    }

    /// Outline every ring; segments that wrap across the antimeridian are skipped
    pub fn draw(&self, canvas: &mut Canvas, projection: &Projection, level: u8) {
        let max_jump = projection.scale() * std::f64::consts::PI;
        for ring in &self.rings {
            for pair in ring.windows(2) {
                let (Some(a), Some(b)) = (
                    projection.project(pair[0][0], pair[0][1]),
                    projection.project(pair[1][0], pair[1][1]),
                ) else {
                    continue;
                };
                if (a.x - b.x).abs() < max_jump {
                    canvas.line(a, b, level);
                }
            }
        }
    }
}

/// Parallels and meridians every 30 degrees
pub fn draw_graticule(canvas: &mut Canvas, projection: &Projection, level: u8) {
    for lat in (-60..=60).step_by(30) {
        if let (Some(a), Some(b)) = (
            projection.project(-180.0, lat as f64),
            projection.project(180.0, lat as f64),
        ) {
            canvas.line(a, b, level);
        }
    }
    for lon in (-180..=180).step_by(30) {
        if let (Some(a), Some(b)) = (
            projection.project(lon as f64, -90.0),
            projection.project(lon as f64, 90.0),
        ) {
            canvas.line(a, b, level);
        }
    }
}
