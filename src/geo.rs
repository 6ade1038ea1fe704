//! Equirectangular projection from (longitude, latitude) to viewport pixels

/// A position in viewport pixel space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn midpoint(&self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Drawable surface size in pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Viewport of a braille canvas covering `cols` x `rows` terminal cells.
    /// Each cell holds a 2x4 grid of dots.
    pub fn braille(cols: u16, rows: u16) -> Self {
        Self::new(cols as f64 * 2.0, rows as f64 * 4.0)
    }
}

/// World width is scaled so the map spans roughly the viewport width.
pub const SCALE_DIVISOR: f64 = 6.3;

/// Plate carrée projection centred on (0, 0).
///
/// Rebuilt whenever the viewport changes; for an unchanged viewport the same
/// coordinate always lands on the same pixel, which hover hit testing relies on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    scale: f64,
    center: Point,
}

impl Projection {
    pub fn equirectangular(viewport: Viewport) -> Self {
        Self {
            scale: viewport.width / SCALE_DIVISOR,
            center: Point::new(viewport.width / 2.0, viewport.height / 2.0),
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Project degrees to pixels, or `None` outside the valid domain.
    pub fn project(&self, lon: f64, lat: f64) -> Option<Point> {
        if !lon.is_finite() || !lat.is_finite() {
            return None;
        }
        if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
            return None;
        }

        Some(Point::new(
            self.center.x + self.scale * lon.to_radians(),
            self.center.y - self.scale * lat.to_radians(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn origin_maps_to_viewport_center() {
        let projection = Projection::equirectangular(Viewport::new(1260.0, 600.0));
        let p = projection.project(0.0, 0.0).unwrap();
        assert!(close(p.x, 630.0));
        assert!(close(p.y, 300.0));
    }

    #[test]
    fn scale_follows_viewport_width() {
        let projection = Projection::equirectangular(Viewport::new(1260.0, 600.0));
        assert!(close(projection.scale(), 200.0));

        let east = projection.project(90.0, 0.0).unwrap();
        assert!(close(east.x, 630.0 + 200.0 * std::f64::consts::FRAC_PI_2));

        let north = projection.project(0.0, 45.0).unwrap();
        assert!(north.y < 300.0, "north should be drawn above the equator");
    }

    #[test]
    fn out_of_domain_is_unprojectable() {
        let projection = Projection::equirectangular(Viewport::new(800.0, 400.0));
        assert!(projection.project(181.0, 0.0).is_none());
        assert!(projection.project(0.0, -90.5).is_none());
        assert!(projection.project(f64::NAN, 0.0).is_none());
        assert!(projection.project(0.0, f64::INFINITY).is_none());
        assert!(projection.project(180.0, 90.0).is_some());
    }

    #[test]
    fn reprojection_is_stable_for_same_viewport() {
        let viewport = Viewport::braille(120, 40);
        let a = Projection::equirectangular(viewport).project(-74.0, 40.7);
        let b = Projection::equirectangular(viewport).project(-74.0, 40.7);
        assert_eq!(a, b);
    }

    #[test]
    fn braille_viewport_uses_dot_grid() {
        let viewport = Viewport::braille(80, 24);
        assert_eq!(viewport, Viewport::new(160.0, 96.0));
    }
}
