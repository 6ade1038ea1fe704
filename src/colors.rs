use crossterm::event::KeyCode;
use crossterm::style::Color;

/// Selected palette for the map, switchable with Shift+digit
#[derive(Clone, Copy)]
pub struct ColorState {
    pub scheme: u8,
}

impl ColorState {
    pub fn new(default_scheme: u8) -> Self {
        Self { scheme: default_scheme }
    }

    /// Returns true if the key selected a scheme
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('!') => self.scheme = 1,  // Shift+1: fire
            KeyCode::Char('@') => self.scheme = 2,  // Shift+2: ice
            KeyCode::Char('#') => self.scheme = 3,  // Shift+3: neon
            KeyCode::Char('$') => self.scheme = 4,  // Shift+4: mono
            KeyCode::Char(')') => self.scheme = 0,  // Shift+0: green
            _ => return false,
        }
        true
    }
}

/// Colour for a canvas level: 1 graticule, 2 land, 3 markers and faded
/// pings, 4 ping cores and heads.
pub fn level_color(scheme: u8, level: u8) -> (Color, bool) {
    match scheme {
        1 => match level {
            0 | 1 => (Color::DarkRed, false),
            2 => (Color::Red, false),
            3 => (Color::DarkYellow, false),
            _ => (Color::Yellow, true),
        },
        2 => match level {
            0 | 1 => (Color::DarkBlue, false),
            2 => (Color::Blue, false),
            3 => (Color::Cyan, false),
            _ => (Color::White, true),
        },
        3 => match level {
            0 | 1 => (Color::DarkMagenta, false),
            2 => (Color::Blue, false),
            3 => (Color::Magenta, false),
            _ => (Color::AnsiValue(13), true),
        },
        4 => match level {
            0 | 1 => (Color::DarkGrey, false),
            2 => (Color::Grey, false),
            3 => (Color::White, false),
            _ => (Color::White, true),
        },
        _ => match level {
            0 | 1 => (Color::DarkGreen, false),
            2 => (Color::Green, false),
            3 => (Color::Green, true),
            _ => (Color::AnsiValue(10), true),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shifted_digits_pick_schemes() {
        let mut colors = ColorState::new(2);
        assert!(colors.handle_key(KeyCode::Char('!')));
        assert_eq!(colors.scheme, 1);
        assert!(!colors.handle_key(KeyCode::Char('q')));
        assert_eq!(colors.scheme, 1);
    }

    #[test]
    fn brightest_level_is_bold() {
        for scheme in 0..5 {
            assert!(level_color(scheme, 4).1);
            assert!(!level_color(scheme, 1).1);
        }
    }
}
