//! Story and comment screen rendering
//!
//! In the list view the story panel sits above the top-level comments, one
//! summary line each, with an arrow on the selected one. The expanded view
//! fills the screen with the flattened thread of the selected comment.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::comments::{CommentNavigator, LineKind, NavigatorView, SUMMARY_CHARS};
use crate::data::Story;
use crate::text;

/// Marker in front of the selected comment
const SELECTED_MARKER: &str = "→ ";

/// Renders the comment screen for the open story
pub fn render(frame: &mut Frame, app: &App) {
    let Some(navigator) = &app.navigator else {
        return;
    };
    match &navigator.view {
        NavigatorView::List => render_list_view(frame, app, navigator),
        NavigatorView::Expanded { .. } => render_expanded(frame, app, navigator),
    }
}

fn render_list_view(frame: &mut Frame, app: &App, navigator: &CommentNavigator) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Story panel
            Constraint::Min(3),    // Comments
            Constraint::Length(1), // Help text
        ])
        .split(area);

    if let Some(story) = &app.story {
        render_story_panel(frame, app, story, chunks[0]);
    }
    render_comment_list(frame, app, navigator, chunks[1]);

    let hints = super::key_hints(
        &[("↑/↓", "Navigate"), ("Enter", "Expand"), ("b", "Back")],
        &app.theme,
    );
    frame.render_widget(Paragraph::new(hints), chunks[2]);
}

/// Title, link, score line and self-post text of `story`
fn story_lines(app: &App, story: &Story) -> Vec<Line<'static>> {
    let mut title = vec![Span::styled(
        story.display_title().to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some(domain) = story.domain() {
        title.push(Span::styled(
            format!(" ({domain})"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let mut lines = vec![
        Line::from(title),
        Line::from(Span::styled(story.link(), app.theme.info_style())),
        Line::from(format!(
            "{} points by {} {} | {} comments",
            story.score.unwrap_or(0),
            story.author(),
            text::age(story.time),
            story.comment_count()
        )),
    ];
    if let Some(body) = &story.text {
        lines.push(Line::from(text::summary(body, SUMMARY_CHARS * 2)));
    }
    lines
}

fn render_story_panel(frame: &mut Frame, app: &App, story: &Story, area: Rect) {
    let block = Block::default()
        .title(format!(" Story {} ", story.id))
        .borders(Borders::ALL)
        .border_style(app.theme.info_style());

    let panel = Paragraph::new(story_lines(app, story))
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(panel, area);
}

fn render_comment_list(frame: &mut Frame, app: &App, navigator: &CommentNavigator, area: Rect) {
    if navigator.comments.is_empty() {
        let empty = Paragraph::new("No comments yet.").style(app.theme.warning_style());
        frame.render_widget(empty, area);
        return;
    }

    let heading = Line::from(Span::styled(
        format!("Comments ({} shown)", navigator.comments.len()),
        app.theme.info_style().add_modifier(Modifier::BOLD),
    ));

    let mut items = Vec::with_capacity(navigator.comments.len());
    for (index, comment) in navigator.comments.iter().enumerate() {
        let is_selected = index == navigator.selected;
        let marker = if is_selected {
            Span::styled(SELECTED_MARKER, app.theme.warning_style())
        } else {
            Span::raw("  ")
        };
        let author_style = if is_selected {
            app.theme.warning_style().add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        items.push(ListItem::new(Line::from(vec![
            marker,
            Span::raw(format!("[{}] ", index + 1)),
            Span::styled(comment.author().to_string(), author_style),
            Span::styled(
                format!(" {}: ", text::age(comment.time)),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw(text::summary(
                comment.text.as_deref().unwrap_or_default(),
                SUMMARY_CHARS,
            )),
        ])));
    }

    // The list scrolls so the selected comment stays on screen
    let mut state = ListState::default().with_selected(Some(navigator.selected));
    let list = List::new(items).block(Block::default().title(heading));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_expanded(frame: &mut Frame, app: &App, navigator: &CommentNavigator) {
    let area = frame.area();
    let view_height = app.comment_view_height();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    let lines: Vec<Line> = navigator
        .visible_lines(view_height)
        .iter()
        .map(|line| match line.kind {
            LineKind::Header => Line::from(Span::styled(
                line.text.clone(),
                app.theme.warning_style().add_modifier(Modifier::BOLD),
            )),
            LineKind::Body | LineKind::Blank => Line::from(line.text.clone()),
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), chunks[0]);

    let hints = super::key_hints(
        &[("↑/↓", "Scroll"), ("any other key", "Back to comments")],
        &app.theme,
    );
    frame.render_widget(Paragraph::new(hints), chunks[1]);
}
