//! UI rendering module for hncli
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod comments;
pub mod story_list;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, AppState};
use crate::theme::Theme;

/// Renders the UI based on the current application state
pub fn render(frame: &mut Frame, app: &App) {
    match &app.state {
        AppState::Loading => render_loading(frame, "Loading...", &app.theme),
        AppState::Stories => story_list::render(frame, app),
        AppState::Comments => comments::render(frame, app),
    }
}

/// Renders a loading message while data is being fetched
pub fn render_loading(frame: &mut Frame, message: &str, theme: &Theme) {
    let area = frame.area();

    // Center the loading message vertically
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(3),
            Constraint::Percentage(45),
        ])
        .split(area);

    let loading_text = Paragraph::new(message.to_string())
        .style(theme.info_style())
        .alignment(Alignment::Center);

    frame.render_widget(loading_text, chunks[1]);
}

/// A key hint line such as `n Next  p Previous`
pub(crate) fn key_hints(hints: &[(&str, &str)], theme: &Theme) -> Line<'static> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, action) in hints {
        spans.push(Span::styled(key.to_string(), theme.warning_style()));
        spans.push(Span::styled(
            format!(" {action}  "),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

#[cfg(test)]
pub(crate) mod test_support {
    use ratatui::{backend::TestBackend, Terminal};

    use crate::app::App;

    /// Renders `app` on a test backend and returns the buffer as text
    pub(crate) fn render_to_string(app: &App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| super::render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_loading_message_is_rendered() {
        let backend = TestBackend::new(60, 12);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal
            .draw(|frame| render_loading(frame, "Loading page 2...", &Theme::default()))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let buffer_str: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(buffer_str.contains("Loading page 2..."));
    }
}
