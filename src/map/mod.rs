//! Animated world map with network pings (terminal renderer)
//!
//! One thread drives everything: each loop iteration polls input, fires the
//! spawn timer when due, advances the pings, and draws a frame. The `MapView`
//! owns the ping field, so quitting the loop tears both triggers down with it.

pub mod basemap;
pub mod canvas;
pub mod overlay;
pub mod style;

use std::io;
use std::time::Instant;

use crossterm::event::{Event, KeyCode, KeyEventKind, MouseEventKind};
use tracing::info;

use crate::colors::ColorState;
use crate::config::MapConfig;
use crate::error::Result;
use crate::geo::{Point, Projection, Viewport};
use crate::locations::{self, Location, HOVER_RADIUS, PROVIDER};
use crate::ping::{Ping, PingField};
use crate::terminal::Terminal;
use basemap::{draw_graticule, BaseMap};
use canvas::Canvas;
use style::{opacity_level, Sprite};

const GRATICULE_LEVEL: u8 = 1;
const LAND_LEVEL: u8 = 2;
const MARKER_LEVEL: u8 = 3;
const CORE_LEVEL: u8 = 4;

const HELP: &str = "\
NETWORK MAP
─────────────────
mouse  Hover a city
space  Pause
!@#$)  Color scheme
?      Toggle help
q/Esc  Quit";

/// Everything the map needs between frames
pub struct MapView {
    locations: Vec<Location>,
    field: PingField,
    basemap: BaseMap,
    canvas: Canvas,
    projection: Projection,
    size: (u16, u16),
    cursor: Option<(u16, u16)>,
    colors: ColorState,
    paused: bool,
    show_help: bool,
}

impl MapView {
    pub fn new(config: &MapConfig, locations: Vec<Location>, size: (u16, u16)) -> Result<Self> {
        locations::ensure_animatable(&locations)?;

        Ok(Self {
            locations,
            field: PingField::new(config.durations, config.scheduler(), config.seed),
            basemap: BaseMap::new(config.geojson_url.as_deref()),
            canvas: Canvas::new(size.0, size.1),
            projection: Projection::equirectangular(Viewport::braille(size.0, size.1)),
            size,
            cursor: None,
            colors: ColorState::new(config.color_scheme),
            paused: false,
            show_help: false,
        })
    }

    pub fn pings(&self) -> &[Ping] {
        self.field.pings()
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// New viewport: reproject, keep ticking. Pings in flight keep the pixel
    /// positions they were spawned with, so they are dropped.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        if (cols, rows) == self.size {
            return;
        }
        self.size = (cols, rows);
        self.canvas = Canvas::new(cols, rows);
        self.projection = Projection::equirectangular(Viewport::braille(cols, rows));
        self.field.clear();
    }

    /// Phase clocks run on wall time, so pings caught by a pause would finish
    /// in a burst on resume. Resuming starts from an empty field instead.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        if !self.paused {
            self.field.clear();
        }
    }

    /// Run both triggers for this instant
    pub fn tick(&mut self, now: Instant) {
        self.basemap.poll();
        if !self.paused {
            self.field.poll(now, &self.locations, &self.projection);
        }
    }

    /// Returns true when the user asked to quit
    pub fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                if self.colors.handle_key(key.code) {
                    return false;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return true,
                    KeyCode::Char(' ') => self.toggle_pause(),
                    KeyCode::Char('?') => self.show_help = !self.show_help,
                    _ => {}
                }
            }
            Event::Mouse(mouse) => {
                if matches!(mouse.kind, MouseEventKind::Moved | MouseEventKind::Drag(_)) {
                    self.cursor = Some((mouse.column, mouse.row));
                }
            }
            Event::Resize(cols, rows) => self.resize(cols, rows),
            _ => {}
        }
        false
    }

    /// City under the mouse, if any
    pub fn hovered(&self) -> Option<&Location> {
        let (col, row) = self.cursor?;
        let cursor = Point::new(col as f64 * 2.0 + 1.0, row as f64 * 4.0 + 2.0);
        locations::hovered(&self.locations, &self.projection, cursor, HOVER_RADIUS)
    }

    /// Draw the base map, markers and every live ping onto the canvas
    pub fn paint(&mut self) {
        self.canvas.clear();
        draw_graticule(&mut self.canvas, &self.projection, GRATICULE_LEVEL);
        self.basemap.draw(&mut self.canvas, &self.projection, LAND_LEVEL);

        for location in &self.locations {
            if let Some(p) = location.project(&self.projection) {
                self.canvas.plot(p, MARKER_LEVEL);
            }
        }

        for ping in self.field.pings() {
            if let Some(sprite) = style::sprite(ping) {
                draw_sprite(&mut self.canvas, &sprite);
            }
        }
    }

    fn render(&mut self, term: &mut Terminal) -> io::Result<()> {
        self.paint();
        term.clear();
        self.canvas.render(term, self.colors.scheme);

        let status = format!(
            " {} active / cap {}{} ",
            self.field.active(),
            self.field.scheduler().cap(),
            if self.paused { " [PAUSED]" } else { "" }
        );
        term.set_str(0, self.size.1 as i32 - 1, &status, None, false);

        if let Some(lines) = self.tooltip() {
            let size = overlay::box_size(&lines);
            let anchor = self.cursor.unwrap_or_default();
            let (x, y) = overlay::place_near(anchor, size, self.size);
            overlay::draw_box(term, x, y, &lines);
        }

        if self.show_help {
            let lines: Vec<String> = HELP.lines().map(str::to_string).collect();
            let (x, y) = overlay::place_center(overlay::box_size(&lines), self.size);
            overlay::draw_box(term, x, y, &lines);
        }

        term.present()
    }

    fn tooltip(&self) -> Option<Vec<String>> {
        let city = self.hovered()?;
        Some(vec![
            city.city.clone(),
            format!("IP Address  {}", city.ip),
            format!("Datacenter  {}", city.datacenter()),
            format!("Provider    {PROVIDER}"),
        ])
    }
}

fn draw_sprite(canvas: &mut Canvas, sprite: &Sprite) {
    match sprite {
        Sprite::Ripple(ripple) => {
            let fill = opacity_level(ripple.fill_opacity);
            if fill > 0 {
                canvas.disc(ripple.center, ripple.radius * 0.5, fill.min(MARKER_LEVEL));
            }
            canvas.ring(ripple.center, ripple.radius, opacity_level(ripple.stroke_opacity));
            canvas.disc(ripple.center, ripple.core_radius, CORE_LEVEL);
        }
        Sprite::Shot { arc, shot } => {
            // Trail fades from the tail towards the head
            const SAMPLES: usize = 12;
            let span = shot.trail_end - shot.trail_start;
            for i in 0..=SAMPLES {
                let frac = i as f64 / SAMPLES as f64;
                let level = if frac > 0.66 { 4 } else if frac > 0.33 { 3 } else { 2 };
                canvas.plot(arc.point_at(shot.trail_start + span * frac), level);
            }
            canvas.disc(shot.head, shot.head_radius * 0.5, CORE_LEVEL);
        }
    }
}

/// Open the terminal and animate until the user quits
pub fn run(config: &MapConfig, locations: Vec<Location>) -> Result<()> {
    let mut term = Terminal::new(true)?;
    let mut view = MapView::new(config, locations, term.size())?;
    info!("Map view started with {} locations", view.locations.len());

    loop {
        let (width, height) = crossterm::terminal::size().unwrap_or(term.size());
        if (width, height) != term.size() {
            term.resize(width, height);
            term.clear_screen()?;
            view.resize(width, height);
        }

        let mut quit = false;
        while let Some(event) = term.poll_event()? {
            if view.handle_event(event) {
                quit = true;
                break;
            }
        }
        if quit {
            break;
        }

        view.tick(Instant::now());
        view.render(&mut term)?;
        term.sleep(config.time_step);
    }

    info!("Map view closed");
    Ok(())
}
