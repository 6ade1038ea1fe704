use crossterm::style::Color;

use crate::terminal::Terminal;

const BORDER: Color = Color::White;
const TEXT: Color = Color::Grey;

/// Width and height of the box `draw_box` would draw for these lines
pub fn box_size(lines: &[String]) -> (usize, usize) {
    let max_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    (max_width + 4, lines.len() + 2)
}

/// Bordered text box with its top-left corner at (x, y).
/// The first line is drawn bold as a title.
pub fn draw_box(term: &mut Terminal, x: usize, y: usize, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    let (box_width, box_height) = box_size(lines);
    let inner = box_width - 4;

    term.set(x as i32, y as i32, '┌', Some(BORDER), false);
    term.set(x as i32, (y + box_height - 1) as i32, '└', Some(BORDER), false);
    for dx in 1..box_width - 1 {
        term.set((x + dx) as i32, y as i32, '─', Some(BORDER), false);
        term.set((x + dx) as i32, (y + box_height - 1) as i32, '─', Some(BORDER), false);
    }
    term.set((x + box_width - 1) as i32, y as i32, '┐', Some(BORDER), false);
    term.set((x + box_width - 1) as i32, (y + box_height - 1) as i32, '┘', Some(BORDER), false);

    for (i, line) in lines.iter().enumerate() {
        let row = (y + 1 + i) as i32;
        term.set(x as i32, row, '│', Some(BORDER), false);
        let padding = inner.saturating_sub(line.chars().count());
        let padded = format!(" {}{} ", line, " ".repeat(padding));
        term.set_str(x as i32 + 1, row, &padded, Some(TEXT), i == 0);
        term.set((x + box_width - 1) as i32, row, '│', Some(BORDER), false);
    }
}

/// Place a box of `size` near `anchor` (cell coordinates), keeping it on screen
pub fn place_near(anchor: (u16, u16), size: (usize, usize), screen: (u16, u16)) -> (usize, usize) {
    let (ax, ay) = (anchor.0 as usize + 2, anchor.1 as usize + 1);
    let (w, h) = size;
    let (sw, sh) = (screen.0 as usize, screen.1 as usize);

    let x = if ax + w > sw { sw.saturating_sub(w) } else { ax };
    let y = if ay + h > sh { sh.saturating_sub(h) } else { ay };
    (x, y)
}

/// Centred box, as used for the key help
pub fn place_center(size: (usize, usize), screen: (u16, u16)) -> (usize, usize) {
    (
        (screen.0 as usize).saturating_sub(size.0) / 2,
        (screen.1 as usize).saturating_sub(size.1) / 2,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_pads_around_longest_line() {
        let lines = vec!["Tokyo".to_string(), "IP Address  192.0.2.1".to_string()];
        assert_eq!(box_size(&lines), (25, 4));
    }

    #[test]
    fn tooltip_stays_on_screen() {
        assert_eq!(place_near((10, 5), (20, 6), (80, 24)), (12, 6));
        assert_eq!(place_near((75, 22), (20, 6), (80, 24)), (60, 18));
    }

    #[test]
    fn centered_box() {
        assert_eq!(place_center((20, 6), (80, 24)), (30, 9));
    }
}
