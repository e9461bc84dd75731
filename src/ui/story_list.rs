//! Story table screen rendering
//!
//! Renders one page of a listing: a centered heading, a numbered table of
//! stories with inline error lines for items that failed to load, and a footer
//! with the page position, key hints and the input prompt.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::pagination::PageRow;
use crate::text;

/// Column widths: number, title, points, comments, age
const COLUMN_WIDTHS: [Constraint; 5] = [
    Constraint::Length(4),
    Constraint::Min(20),
    Constraint::Length(6),
    Constraint::Length(6),
    Constraint::Length(15),
];

/// Renders the story table screen
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Heading
            Constraint::Min(3),    // Stories
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_heading(frame, app, chunks[0]);
    render_table(frame, app, chunks[1]);
    render_footer(frame, app, chunks[2]);
}

fn render_heading(frame: &mut Frame, app: &App, area: Rect) {
    let title = text::center(&app.title(), area.width as usize);
    let heading = Paragraph::new(Line::from(Span::styled(
        title,
        app.theme.info_style().add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(heading, area);
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    if app.rows.is_empty() {
        let empty = Paragraph::new("No stories to display.").style(app.theme.warning_style());
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(["#", "Title", "Pts", "Cmts", "Age"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let mut number = 0;
    let rows: Vec<Row> = app
        .rows
        .iter()
        .map(|row| match row {
            PageRow::Story(story) => {
                number += 1;
                let mut title = vec![Span::raw(story.display_title().to_string())];
                if let Some(domain) = story.domain() {
                    title.push(Span::styled(
                        format!(" ({domain})"),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
                Row::new(vec![
                    Cell::from(Span::styled(number.to_string(), app.theme.info_style())),
                    Cell::from(Line::from(title)),
                    Cell::from(story.score.unwrap_or(0).to_string()),
                    Cell::from(story.comment_count().to_string()),
                    Cell::from(text::age(story.time)),
                ])
            }
            PageRow::Failed { id, message } => Row::new(vec![
                Cell::from(Span::styled("!", app.theme.error_style())),
                Cell::from(Span::styled(
                    format!("Error loading story {id}: {message}"),
                    app.theme.error_style(),
                )),
                Cell::from(""),
                Cell::from(""),
                Cell::from(""),
            ]),
        })
        .collect();

    let table = Table::new(rows, COLUMN_WIDTHS).header(header);
    frame.render_widget(table, area);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let page = &app.page;
    let position = Line::from(Span::styled(
        format!(
            "Page {}/{} ({} stories total)",
            page.current_page, page.total_pages, page.total_items
        ),
        app.theme.info_style(),
    ));

    let hints = super::key_hints(
        &[
            ("n", "Next"),
            ("p", "Previous"),
            ("number+Enter", "Comments"),
            ("r", "Refresh"),
            ("q", "Quit"),
        ],
        &app.theme,
    );

    let prompt = match &app.message {
        Some(message) if message.is_error => {
            Line::from(Span::styled(message.text.clone(), app.theme.error_style()))
        }
        Some(message) => Line::from(Span::styled(message.text.clone(), app.theme.info_style())),
        None => Line::from(vec![
            Span::styled("> ", app.theme.info_style()),
            Span::raw(app.input.clone()),
        ]),
    };

    frame.render_widget(Paragraph::new(vec![position, hints, prompt]), area);
}

#[cfg(test)]
mod tests {
    use crate::app::{App, AppState, Listing};
    use crate::data::fake::story;
    use crate::data::{Category, Story};
    use crate::pagination::PageRow;
    use crate::theme::Theme;
    use crate::ui::test_support::render_to_string;

    fn app_with_rows(rows: Vec<PageRow>) -> App {
        let mut app = App::browse(
            Listing::Category {
                category: Category::Top,
                ids: (1..=25).collect(),
            },
            Some(10),
            Theme::default(),
            (100, 24),
        );
        app.state = AppState::Stories;
        app.rows = rows;
        app
    }

    #[test]
    fn test_heading_and_footer_show_page_position() {
        let app = app_with_rows(vec![PageRow::Story(story(1, "Hello"))]);

        let screen = render_to_string(&app, 100, 24);

        assert!(screen.contains("Top Stories (Page 1/3)"));
        assert!(screen.contains("Page 1/3 (25 stories total)"));
    }

    #[test]
    fn test_story_row_shows_title_and_domain() {
        let app = app_with_rows(vec![PageRow::Story(Story {
            url: Some("https://example.com/post".to_string()),
            score: Some(42),
            ..story(1, "Rust is fun")
        })]);

        let screen = render_to_string(&app, 100, 24);

        assert!(screen.contains("Rust is fun (example.com)"));
        assert!(screen.contains("42"));
    }

    #[test]
    fn test_failed_row_is_inline_error() {
        let app = app_with_rows(vec![
            PageRow::Story(story(1, "Fine")),
            PageRow::Failed {
                id: 7,
                message: "timed out".to_string(),
            },
        ]);

        let screen = render_to_string(&app, 100, 24);

        assert!(screen.contains("Fine"));
        assert!(screen.contains("Error loading story 7: timed out"));
    }

    #[test]
    fn test_prompt_shows_typed_digits() {
        let mut app = app_with_rows(vec![PageRow::Story(story(1, "Fine"))]);
        app.input = "12".to_string();

        let screen = render_to_string(&app, 100, 24);

        assert!(screen.contains("> 12"));
    }

    #[test]
    fn test_empty_page_message() {
        let app = app_with_rows(Vec::new());
        let screen = render_to_string(&app, 100, 24);
        assert!(screen.contains("No stories to display."));
    }
}
