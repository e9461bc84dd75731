//! Color themes selected by the `color_theme` setting

use ratatui::style::{Color, Modifier, Style};

/// Colors used for informational, warning and error output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Titles, prompts and hints
    pub info: Color,
    /// Selection markers and notices
    pub warning: Color,
    /// Error messages, always shown bold
    pub error: Color,
}

impl Theme {
    /// Cyan, magenta and red
    pub const DEFAULT: Theme = Theme {
        info: Color::Cyan,
        warning: Color::Magenta,
        error: Color::Red,
    };

    /// Brighter variants for dark terminals
    pub const DARK: Theme = Theme {
        info: Color::LightCyan,
        warning: Color::LightMagenta,
        error: Color::LightRed,
    };

    /// Theme by name; unknown names get the default theme
    pub fn by_name(name: &str) -> Theme {
        match name {
            "dark" => Theme::DARK,
            _ => Theme::DEFAULT,
        }
    }

    pub fn info_style(&self) -> Style {
        Style::default().fg(self.info)
    }

    pub fn warning_style(&self) -> Style {
        Style::default().fg(self.warning)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error).add_modifier(Modifier::BOLD)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::DEFAULT
    }
}

/// Converts a theme color for styled stdout output
pub fn term_color(color: Color) -> crossterm::style::Color {
    use crossterm::style::Color as Term;
    match color {
        Color::Black => Term::Black,
        Color::Red => Term::DarkRed,
        Color::Green => Term::DarkGreen,
        Color::Yellow => Term::DarkYellow,
        Color::Blue => Term::DarkBlue,
        Color::Magenta => Term::DarkMagenta,
        Color::Cyan => Term::DarkCyan,
        Color::Gray => Term::Grey,
        Color::DarkGray => Term::DarkGrey,
        Color::LightRed => Term::Red,
        Color::LightGreen => Term::Green,
        Color::LightYellow => Term::Yellow,
        Color::LightBlue => Term::Blue,
        Color::LightMagenta => Term::Magenta,
        Color::LightCyan => Term::Cyan,
        Color::White => Term::White,
        Color::Rgb(r, g, b) => Term::Rgb { r, g, b },
        Color::Indexed(i) => Term::AnsiValue(i),
        Color::Reset => Term::Reset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_name_selects_dark() {
        assert_eq!(Theme::by_name("dark"), Theme::DARK);
    }

    #[test]
    fn test_unknown_name_falls_back_to_default() {
        assert_eq!(Theme::by_name("solarized"), Theme::DEFAULT);
        assert_eq!(Theme::by_name("default"), Theme::default());
    }

    #[test]
    fn test_error_style_is_bold() {
        let style = Theme::DARK.error_style();
        assert_eq!(style.fg, Some(Color::LightRed));
        assert!(style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_term_color_maps_bright_variants() {
        assert_eq!(term_color(Color::Cyan), crossterm::style::Color::DarkCyan);
        assert_eq!(term_color(Color::LightCyan), crossterm::style::Color::Cyan);
    }
}
