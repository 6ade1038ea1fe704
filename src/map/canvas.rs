use crate::colors::level_color;
use crate::geo::Point;
use crate::terminal::Terminal;

/// Off-screen grid of braille dots, each holding a brightness level (0 = off).
/// Brighter levels win when dots overlap.
pub struct Canvas {
    width: usize,
    height: usize,
    dots: Vec<u8>,
}

// Bit for each dot of a 2x4 braille cell, indexed [row][col]
const DOT_BITS: [[u8; 2]; 4] = [[0x01, 0x08], [0x02, 0x10], [0x04, 0x20], [0x40, 0x80]];

impl Canvas {
    /// Canvas covering `cols` x `rows` terminal cells
    pub fn new(cols: u16, rows: u16) -> Self {
        let width = cols as usize * 2;
        let height = rows as usize * 4;
        Self {
            width,
            height,
            dots: vec![0; width * height],
        }
    }

    pub fn clear(&mut self) {
        self.dots.fill(0);
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        if x < self.width && y < self.height {
            self.dots[y * self.width + x]
        } else {
            0
        }
    }

    pub fn plot(&mut self, p: Point, level: u8) {
        if !p.x.is_finite() || !p.y.is_finite() || p.x < 0.0 || p.y < 0.0 {
            return;
        }
        let (x, y) = (p.x as usize, p.y as usize);
        if x < self.width && y < self.height {
            let dot = &mut self.dots[y * self.width + x];
            *dot = (*dot).max(level);
        }
    }

    pub fn line(&mut self, from: Point, to: Point, level: u8) {
        let steps = from.distance(to).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            self.plot(
                Point::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t),
                level,
            );
        }
    }

    pub fn ring(&mut self, center: Point, radius: f64, level: u8) {
        if radius < 0.5 {
            self.plot(center, level);
            return;
        }
        let steps = (radius * std::f64::consts::TAU).ceil().max(8.0) as usize;
        for i in 0..steps {
            let angle = i as f64 / steps as f64 * std::f64::consts::TAU;
            self.plot(
                Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin()),
                level,
            );
        }
    }

    pub fn disc(&mut self, center: Point, radius: f64, level: u8) {
        let r = radius.ceil() as i64;
        for dy in -r..=r {
            for dx in -r..=r {
                if ((dx * dx + dy * dy) as f64) <= radius * radius {
                    self.plot(Point::new(center.x + dx as f64, center.y + dy as f64), level);
                }
            }
        }
    }

    /// Composite into terminal cells, one braille glyph per 2x4 block
    pub fn render(&self, term: &mut Terminal, scheme: u8) {
        let cols = self.width / 2;
        let rows = self.height / 4;

        for cy in 0..rows {
            for cx in 0..cols {
                let mut bits: u8 = 0;
                let mut level: u8 = 0;

                for (row, row_bits) in DOT_BITS.iter().enumerate() {
                    for (col, bit) in row_bits.iter().enumerate() {
                        let value = self.get(cx * 2 + col, cy * 4 + row);
                        if value > 0 {
                            bits |= bit;
                            level = level.max(value);
                        }
                    }
                }

                if bits > 0 {
                    let ch = char::from_u32(0x2800 + bits as u32).unwrap_or(' ');
                    let (color, bold) = level_color(scheme, level);
                    term.set(cx as i32, cy as i32, ch, Some(color), bold);
                }
            }
        }
    }
}
