//! One-shot command handlers
//!
//! Every handler writes its result to `out`. Failures the user should see are
//! printed as styled messages instead of being returned, so the process exits
//! normally after reporting them. Only failures to write output are errors.

use std::io::{self, IsTerminal, Write};

use crossterm::style::{Color as TermColor, Stylize};

use crate::app::Listing;
use crate::browser::{open_link, OpenOutcome};
use crate::cli::parse_config_value;
use crate::config::{display_value, ConfigStore};
use crate::data::{item_url, Category, HnSource, Story, User};
use crate::error::HnError;
use crate::pagination::stories_per_page_for_rows;
use crate::search::search_stories;
use crate::text;
use crate::theme::{term_color, Theme};

/// Styles stdout messages with the theme colors
#[derive(Debug, Clone, Copy)]
pub struct Printer {
    theme: Theme,
    color: bool,
}

impl Printer {
    /// Colors output only when stdout is a terminal
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            color: io::stdout().is_terminal(),
        }
    }

    /// Never emits escape codes
    pub fn plain(theme: Theme) -> Self {
        Self { theme, color: false }
    }

    fn paint(&self, text: &str, color: TermColor, bold: bool) -> String {
        if !self.color {
            return text.to_string();
        }
        let styled = text.with(color);
        if bold {
            styled.bold().to_string()
        } else {
            styled.to_string()
        }
    }

    pub fn info(&self, text: &str) -> String {
        self.paint(text, term_color(self.theme.info), false)
    }

    pub fn warning(&self, text: &str) -> String {
        self.paint(text, term_color(self.theme.warning), false)
    }

    pub fn error(&self, text: &str) -> String {
        self.paint(text, term_color(self.theme.error), true)
    }

    pub fn success(&self, text: &str) -> String {
        self.paint(text, TermColor::DarkGreen, false)
    }

    pub fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }
}

/// Writes `rows` as two left-aligned columns
fn write_table<W: Write>(out: &mut W, rows: &[(String, String)]) -> io::Result<()> {
    let width = rows.iter().map(|(key, _)| key.chars().count()).max().unwrap_or(0);
    for (key, value) in rows {
        let mut value_lines = value.lines();
        writeln!(out, "  {key:<width$}  {}", value_lines.next().unwrap_or_default())?;
        for line in value_lines {
            writeln!(out, "  {:<width$}  {line}", "")?;
        }
    }
    Ok(())
}

/// Fetches the IDs of a category for browsing
pub async fn fetch_listing<S: HnSource, W: Write>(
    source: &mut S,
    category: Category,
    out: &mut W,
    printer: &Printer,
) -> io::Result<Option<Listing>> {
    match source.story_ids(category).await {
        Ok(ids) => Ok(Some(Listing::Category { category, ids })),
        Err(e) => {
            writeln!(out, "{}", printer.error(&format!("Error fetching {category} stories: {e}")))?;
            Ok(None)
        }
    }
}

/// Fetches a single story for the `story` command
pub async fn fetch_story<S: HnSource, W: Write>(
    source: &mut S,
    item_id: u64,
    out: &mut W,
    printer: &Printer,
) -> io::Result<Option<Story>> {
    match source.item(item_id).await {
        Ok(story) => Ok(Some(story)),
        Err(HnError::NotFound(_)) => {
            writeln!(out, "{}", printer.warning(&format!("Story {item_id} not found.")))?;
            Ok(None)
        }
        Err(e) => {
            writeln!(out, "{}", printer.error(&format!("Error fetching story {item_id}: {e}")))?;
            Ok(None)
        }
    }
}

/// Searches the ranked lists and returns the matches as a listing
///
/// Prints the empty result itself, so `None` means there is nothing to browse.
pub async fn search<S: HnSource, W: Write>(
    source: &mut S,
    query: &str,
    out: &mut W,
    printer: &Printer,
) -> io::Result<Option<Listing>> {
    let query = query.to_lowercase();
    writeln!(out, "{}", printer.info(&format!("Searching for '{query}'...")))?;

    let mut failures = Vec::new();
    let stories = search_stories(source, &query, |category, e| {
        failures.push(format!("Error fetching {category} stories: {e}"));
    })
    .await;
    for failure in &failures {
        writeln!(out, "{}", printer.error(failure))?;
    }

    if stories.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", printer.heading(&format!("Search Results for '{query}'")))?;
        writeln!(out)?;
        writeln!(out, "{}", printer.warning("No matching stories found."))?;
        return Ok(None);
    }
    Ok(Some(Listing::Search { query, stories }))
}

/// Writes a user profile as a titled two-column table
pub fn write_user_profile<W: Write>(out: &mut W, user: &User, printer: &Printer) -> io::Result<()> {
    let about = match user.about.as_deref() {
        Some(about) if !about.trim().is_empty() => text::strip_html(about),
        _ => "No information provided.".to_string(),
    };

    writeln!(out, "{}", printer.heading(&format!("User Profile: {}", user.id)))?;
    write_table(
        out,
        &[
            ("Username".to_string(), user.id.clone()),
            ("Created".to_string(), text::age(user.created)),
            ("Karma".to_string(), user.karma.unwrap_or(0).to_string()),
            ("Submissions".to_string(), user.submitted.len().to_string()),
            ("About".to_string(), about),
        ],
    )
}

/// Fetches and prints a user profile
pub async fn show_user<S: HnSource, W: Write>(
    source: &mut S,
    username: &str,
    out: &mut W,
    printer: &Printer,
) -> io::Result<Option<User>> {
    match source.user(username).await {
        Ok(user) => {
            write_user_profile(out, &user, printer)?;
            Ok(Some(user))
        }
        Err(HnError::NotFound(_)) => {
            writeln!(out, "{}", printer.warning(&format!("User {username} not found.")))?;
            Ok(None)
        }
        Err(e) => {
            writeln!(out, "{}", printer.error(&format!("Error fetching user {username}: {e}")))?;
            Ok(None)
        }
    }
}

/// Opens `url` in the browser and reports the outcome
///
/// `opened_message` is printed once the browser was launched.
pub fn open_in_browser<W, C, O>(
    url: &str,
    automatic: bool,
    confirm: C,
    opener: O,
    opened_message: Option<&str>,
    out: &mut W,
    printer: &Printer,
) -> io::Result<OpenOutcome>
where
    W: Write,
    C: FnOnce() -> bool,
    O: FnOnce(&str) -> io::Result<()>,
{
    match open_link(url, automatic, confirm, opener) {
        Ok(OpenOutcome::Opened) => {
            if let Some(message) = opened_message {
                writeln!(out, "{message}")?;
            }
            Ok(OpenOutcome::Opened)
        }
        Ok(OpenOutcome::Declined) => Ok(OpenOutcome::Declined),
        Err(e) => {
            writeln!(out, "{}", printer.error(&format!("Could not open browser: {e}")))?;
            Ok(OpenOutcome::Declined)
        }
    }
}

/// Opens a story's discussion page
pub fn open_story<W, C, O>(
    story_id: u64,
    automatic: bool,
    confirm: C,
    opener: O,
    out: &mut W,
    printer: &Printer,
) -> io::Result<OpenOutcome>
where
    W: Write,
    C: FnOnce() -> bool,
    O: FnOnce(&str) -> io::Result<()>,
{
    let message = format!("Opening story {story_id} in browser...");
    open_in_browser(
        &item_url(story_id),
        automatic,
        confirm,
        opener,
        Some(&message),
        out,
        printer,
    )
}

/// `config-set`: coerces the value and saves it
pub fn config_set<W: Write>(
    store: &ConfigStore,
    key: &str,
    raw: &str,
    out: &mut W,
    printer: &Printer,
) -> io::Result<()> {
    let value = parse_config_value(raw);
    let shown = display_value(&value);
    match store.update_setting(key, value) {
        Ok(()) => writeln!(out, "{}", printer.success(&format!("Updated {key} to {shown}"))),
        Err(e) => writeln!(out, "{}", printer.error(&format!("Error updating setting: {e}"))),
    }
}

/// `config-get`: one setting, or every setting plus the adaptive display values
pub fn config_get<W: Write>(
    store: &ConfigStore,
    key: Option<&str>,
    terminal_size: (u16, u16),
    out: &mut W,
    printer: &Printer,
) -> io::Result<()> {
    if let Some(key) = key {
        let shown = store
            .get_setting(key)
            .map(|value| display_value(&value))
            .unwrap_or_else(|| "None".to_string());
        return writeln!(out, "{key}: {shown}");
    }

    let config = store.load();
    let (columns, rows) = terminal_size;
    let mut table = vec![("Setting".to_string(), "Value".to_string())];
    table.extend(config.iter().map(|(k, v)| (k.clone(), display_value(v))));
    table.push(("Terminal Size".to_string(), format!("{columns}x{rows}")));
    table.push((
        "Current Stories per Page".to_string(),
        stories_per_page_for_rows(rows).to_string(),
    ));

    writeln!(out, "{}", printer.heading("Current Configuration"))?;
    write_table(out, &table)
}

/// `config-reset`: overwrites the file with the defaults
pub fn config_reset<W: Write>(store: &ConfigStore, out: &mut W, printer: &Printer) -> io::Result<()> {
    match store.reset() {
        Ok(()) => writeln!(out, "{}", printer.success("Configuration reset to defaults")),
        Err(e) => writeln!(out, "{}", printer.error(&format!("Error resetting configuration: {e}"))),
    }
}

/// `cache-clear`: drops every cached response
pub fn cache_clear<S: HnSource, W: Write>(source: &mut S, out: &mut W, printer: &Printer) -> io::Result<()> {
    source.clear_cache();
    writeln!(out, "{}", printer.success("Cache cleared"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::COLOR_THEME;
    use crate::data::fake::{story, FakeSource};
    use serde_json::json;
    use tempfile::TempDir;

    fn printer() -> Printer {
        Printer::plain(Theme::default())
    }

    fn output(buffer: Vec<u8>) -> String {
        String::from_utf8(buffer).unwrap()
    }

    fn create_test_store() -> (ConfigStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = ConfigStore::with_path(temp_dir.path().join("config.json"));
        (store, temp_dir)
    }

    #[test]
    fn test_plain_printer_has_no_escape_codes() {
        let printer = printer();
        assert_eq!(printer.error("boom"), "boom");
        assert_eq!(printer.heading("Title"), "Title");
    }

    #[test]
    fn test_colored_printer_wraps_text() {
        let printer = Printer {
            theme: Theme::default(),
            color: true,
        };
        let painted = printer.info("hello");
        assert!(painted.contains("hello"));
        assert!(painted.contains('\u{1b}'));
    }

    #[tokio::test]
    async fn test_fetch_listing_reports_failure() {
        let mut source = FakeSource::new();
        source.failing_lists.insert(Category::Top);
        let mut out = Vec::new();

        let listing = fetch_listing(&mut source, Category::Top, &mut out, &printer())
            .await
            .unwrap();

        assert!(listing.is_none());
        assert!(output(out).starts_with("Error fetching top stories:"));
    }

    #[tokio::test]
    async fn test_fetch_story_not_found() {
        let mut source = FakeSource::new();
        let mut out = Vec::new();

        let found = fetch_story(&mut source, 42, &mut out, &printer()).await.unwrap();

        assert!(found.is_none());
        assert_eq!(output(out), "Story 42 not found.\n");
    }

    #[tokio::test]
    async fn test_fetch_story_request_error() {
        let mut source = FakeSource::new().with_failure(42);
        let mut out = Vec::new();

        fetch_story(&mut source, 42, &mut out, &printer()).await.unwrap();

        assert!(output(out).starts_with("Error fetching story 42:"));
    }

    #[tokio::test]
    async fn test_search_without_matches() {
        let mut source = FakeSource::new()
            .with_list(Category::Top, vec![1])
            .with_item(story(1, "Nothing here"));
        let mut out = Vec::new();

        let listing = search(&mut source, "Zig", &mut out, &printer()).await.unwrap();

        assert!(listing.is_none());
        let text = output(out);
        assert!(text.contains("Search Results for 'zig'"));
        assert!(text.contains("No matching stories found."));
    }

    #[tokio::test]
    async fn test_search_returns_listing() {
        let mut source = FakeSource::new()
            .with_list(Category::Best, vec![1, 2])
            .with_item(story(1, "Zig 1.0"))
            .with_item(story(2, "Other"));
        source.failing_lists.insert(Category::New);
        let mut out = Vec::new();

        let listing = search(&mut source, "zig", &mut out, &printer()).await.unwrap();

        match listing {
            Some(Listing::Search { query, stories }) => {
                assert_eq!(query, "zig");
                assert_eq!(stories.len(), 1);
            }
            other => panic!("unexpected listing {other:?}"),
        }
        assert!(output(out).contains("Error fetching new stories:"));
    }

    #[test]
    fn test_user_profile_table() {
        let user = User {
            id: "pg".to_string(),
            created: Some(0),
            karma: Some(155_000),
            about: Some("Bug fixer.<p>Essayist &amp; investor".to_string()),
            submitted: vec![1, 2, 3],
        };
        let mut out = Vec::new();

        write_user_profile(&mut out, &user, &printer()).unwrap();

        let text = output(out);
        assert!(text.starts_with("User Profile: pg\n"));
        assert!(text.contains("Karma        155000"));
        assert!(text.contains("Submissions  3"));
        assert!(text.contains("Essayist & investor"));
    }

    #[test]
    fn test_user_profile_without_about() {
        let user = User {
            id: "quiet".to_string(),
            ..Default::default()
        };
        let mut out = Vec::new();

        write_user_profile(&mut out, &user, &printer()).unwrap();

        assert!(output(out).contains("No information provided."));
    }

    #[tokio::test]
    async fn test_show_user_not_found() {
        let mut source = FakeSource::new();
        let mut out = Vec::new();

        let user = show_user(&mut source, "ghost", &mut out, &printer()).await.unwrap();

        assert!(user.is_none());
        assert_eq!(output(out), "User ghost not found.\n");
    }

    #[test]
    fn test_open_story_reports_opening() {
        let mut opened = None;
        let mut out = Vec::new();

        let outcome = open_story(
            8863,
            true,
            || false,
            |url| {
                opened = Some(url.to_string());
                Ok(())
            },
            &mut out,
            &printer(),
        )
        .unwrap();

        assert_eq!(outcome, OpenOutcome::Opened);
        assert_eq!(opened.as_deref(), Some("https://news.ycombinator.com/item?id=8863"));
        assert_eq!(output(out), "Opening story 8863 in browser...\n");
    }

    #[test]
    fn test_open_story_declined_prints_nothing() {
        let mut out = Vec::new();

        let outcome = open_story(1, false, || false, |_| Ok(()), &mut out, &printer()).unwrap();

        assert_eq!(outcome, OpenOutcome::Declined);
        assert!(out.is_empty());
    }

    #[test]
    fn test_open_failure_is_reported() {
        let mut out = Vec::new();

        let outcome = open_in_browser(
            "https://example.com",
            true,
            || true,
            |_| Err(io::Error::new(io::ErrorKind::NotFound, "no browser")),
            None,
            &mut out,
            &printer(),
        )
        .unwrap();

        assert_eq!(outcome, OpenOutcome::Declined);
        assert!(output(out).contains("Could not open browser: no browser"));
    }

    #[test]
    fn test_config_set_then_get() {
        let (store, _temp_dir) = create_test_store();
        let mut out = Vec::new();

        config_set(&store, COLOR_THEME, "dark", &mut out, &printer()).unwrap();
        config_get(&store, Some(COLOR_THEME), (80, 24), &mut out, &printer()).unwrap();

        assert_eq!(output(out), "Updated color_theme to dark\ncolor_theme: dark\n");
        assert_eq!(store.get_setting(COLOR_THEME), Some(json!("dark")));
    }

    #[test]
    fn test_config_get_missing_key() {
        let (store, _temp_dir) = create_test_store();
        let mut out = Vec::new();

        config_get(&store, Some("nope"), (80, 24), &mut out, &printer()).unwrap();

        assert_eq!(output(out), "nope: None\n");
    }

    #[test]
    fn test_config_get_table_includes_display_info() {
        let (store, _temp_dir) = create_test_store();
        let mut out = Vec::new();

        config_get(&store, None, (120, 30), &mut out, &printer()).unwrap();

        let text = output(out);
        assert!(text.starts_with("Current Configuration\n"));
        assert!(text.contains("cache_timeout_minutes"));
        assert!(text.contains("120x30"));
        assert!(text.contains("Current Stories per Page  20"));
    }

    #[test]
    fn test_config_reset_restores_defaults() {
        let (store, _temp_dir) = create_test_store();
        let mut out = Vec::new();
        config_set(&store, COLOR_THEME, "dark", &mut out, &printer()).unwrap();

        config_reset(&store, &mut out, &printer()).unwrap();

        assert!(output(out).ends_with("Configuration reset to defaults\n"));
        assert_eq!(store.get_setting(COLOR_THEME), Some(json!("default")));
    }

    #[test]
    fn test_cache_clear_clears_source() {
        let mut source = FakeSource::new();
        let mut out = Vec::new();

        cache_clear(&mut source, &mut out, &printer()).unwrap();

        assert_eq!(source.cache_clears, 1);
        assert_eq!(output(out), "Cache cleared\n");
    }
}
