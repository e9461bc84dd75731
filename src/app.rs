//! Application state management for the interactive session
//!
//! This module contains the state of a browsing session: the listing being
//! paginated, the rows of the current page, and the comment navigator when a
//! story is open. Key handling is synchronous and only records what has to be
//! fetched; the session loop then runs the pending action against a source.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::comments::{
    expanded_view_height, flatten_thread, load_top_level, top_level_limit, CommentNavigator,
    NavigatorAction,
};
use crate::data::{Category, HnSource, Story};
use crate::pagination::{load_page, stories, stories_per_page_for_rows, NavCommand, PageRow, PageState};
use crate::theme::Theme;

/// What is being paginated
#[derive(Debug, Clone, PartialEq)]
pub enum Listing {
    /// A ranked category; items are fetched page by page
    Category {
        category: Category,
        ids: Vec<u64>,
    },
    /// Search results already held in memory
    Search {
        query: String,
        stories: Vec<Story>,
    },
}

impl Listing {
    /// Number of entries in the listing
    pub fn len(&self) -> usize {
        match self {
            Listing::Category { ids, .. } => ids.len(),
            Listing::Search { stories, .. } => stories.len(),
        }
    }

    /// Whether the listing has no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Category name or search query
    pub fn label(&self) -> String {
        match self {
            Listing::Category { category, .. } => category.to_string(),
            Listing::Search { query, .. } => query.clone(),
        }
    }

    /// Heading shown above the story table
    pub fn title(&self, page: &PageState) -> String {
        match self {
            Listing::Category { category, .. } => format!(
                "{} Stories (Page {}/{})",
                category.label(),
                page.current_page,
                page.total_pages
            ),
            Listing::Search { query, .. } => format!(
                "Search Results for '{query}' (Page {}/{})",
                page.current_page, page.total_pages
            ),
        }
    }
}

/// Application state enum representing the current view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    /// Waiting for the first load
    Loading,
    /// Paginated story table
    Stories,
    /// Story panel with its comment navigator
    Comments,
}

/// Work requested by a key press, run by the session loop
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    /// Materialize the current page
    LoadPage,
    /// Clear the cache and reload the listing
    Refresh,
    /// Load the top-level comments of a story
    OpenStory(Story),
    /// Flatten the subtree of the top-level comment at this index
    Expand(usize),
}

/// A one-line message shown in the footer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

/// Main application struct managing state and data
#[derive(Debug)]
pub struct App {
    /// Current application state/view
    pub state: AppState,
    /// Listing being browsed; `None` when a single story was opened directly
    pub listing: Option<Listing>,
    /// Pagination of the listing
    pub page: PageState,
    /// Rows of the current page
    pub rows: Vec<PageRow>,
    /// Digits typed at the page prompt
    pub input: String,
    /// Footer message from the last command
    pub message: Option<StatusMessage>,
    /// Story whose comments are open
    pub story: Option<Story>,
    /// Comment navigator for `story`
    pub navigator: Option<CommentNavigator>,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Colors for rendering
    pub theme: Theme,
    /// Terminal size as (columns, rows)
    pub terminal_size: (u16, u16),
    /// Fixed page size from `--limit`
    page_size_override: Option<usize>,
    /// Fixed top-level comment count from `--comments`
    comment_limit: Option<usize>,
    /// Fetch to run before the next render
    pending: Option<PendingAction>,
    /// The page size changed while comments were open; reload on the way back
    page_stale: bool,
}

impl App {
    fn with_parts(listing: Option<Listing>, theme: Theme, terminal_size: (u16, u16)) -> Self {
        let total = listing.as_ref().map_or(0, Listing::len);
        let label = listing.as_ref().map(Listing::label).unwrap_or_default();
        Self {
            state: AppState::Loading,
            page: PageState::new(label, total, stories_per_page_for_rows(terminal_size.1)),
            listing,
            rows: Vec::new(),
            input: String::new(),
            message: None,
            story: None,
            navigator: None,
            should_quit: false,
            theme,
            terminal_size,
            page_size_override: None,
            comment_limit: None,
            pending: None,
            page_stale: false,
        }
    }

    /// Starts a paginated session over `listing`
    pub fn browse(
        listing: Listing,
        page_size_override: Option<usize>,
        theme: Theme,
        terminal_size: (u16, u16),
    ) -> Self {
        let mut app = Self::with_parts(Some(listing), theme, terminal_size);
        app.page_size_override = page_size_override;
        app.page.resize(app.stories_per_page());
        app.state = AppState::Stories;
        app.pending = Some(PendingAction::LoadPage);
        app
    }

    /// Opens a single story; leaving its comments ends the session
    pub fn single_story(
        story: Story,
        comment_limit: Option<usize>,
        theme: Theme,
        terminal_size: (u16, u16),
    ) -> Self {
        let mut app = Self::with_parts(None, theme, terminal_size);
        app.comment_limit = comment_limit;
        app.pending = Some(PendingAction::OpenStory(story));
        app
    }

    /// Page size for the current terminal, unless `--limit` fixed it
    pub fn stories_per_page(&self) -> usize {
        self.page_size_override
            .unwrap_or_else(|| stories_per_page_for_rows(self.terminal_size.1))
    }

    /// Lines available to the expanded comment view
    pub fn comment_view_height(&self) -> usize {
        expanded_view_height(self.terminal_size.1)
    }

    /// Heading for the story table
    pub fn title(&self) -> String {
        self.listing
            .as_ref()
            .map(|listing| listing.title(&self.page))
            .unwrap_or_default()
    }

    /// Whether a fetch is waiting to run
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Message to show while the pending fetch runs
    pub fn pending_status(&self) -> Option<String> {
        self.pending.as_ref().map(|action| match action {
            PendingAction::LoadPage => format!("Loading page {}...", self.page.current_page),
            PendingAction::Refresh => format!("Refreshing {} stories...", self.page.label),
            PendingAction::OpenStory(story) => format!("Loading comments for story {}...", story.id),
            PendingAction::Expand(_) => "Loading comment thread...".to_string(),
        })
    }

    /// Applies a new terminal size
    ///
    /// The page size is recomputed; when it changes the current page is clamped
    /// and reloaded. With comments open the reload waits until the user goes
    /// back to the story table.
    pub fn resize(&mut self, columns: u16, rows: u16) {
        self.terminal_size = (columns, rows);
        if self.page.resize(self.stories_per_page()) && self.listing.is_some() {
            debug!(stories_per_page = self.page.stories_per_page, "page size changed");
            let opening_story = matches!(self.pending, Some(PendingAction::OpenStory(_)));
            if self.state == AppState::Comments || opening_story {
                self.page_stale = true;
            } else {
                self.pending.get_or_insert(PendingAction::LoadPage);
            }
        }
        let view_height = self.comment_view_height();
        if let Some(navigator) = &mut self.navigator {
            navigator.clamp_offset(view_height);
        }
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// Stories:
    /// - `n` / `p`: Next / previous page
    /// - digits then `Enter`: Open that story's comments
    /// - `Enter` with no digits: Next page
    /// - `r`: Refresh the listing
    /// - `q` or `Esc`: Quit
    ///
    /// Comments: see [`CommentNavigator::handle_key`]. `Ctrl+C` quits anywhere.
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.state {
            AppState::Loading => {
                if key_event.code == KeyCode::Char('q') {
                    self.should_quit = true;
                }
            }
            AppState::Stories => self.handle_stories_key(key_event),
            AppState::Comments => self.handle_comments_key(key_event),
        }
    }

    fn handle_stories_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.input.push(c);
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Enter => {
                let input = std::mem::take(&mut self.input);
                match NavCommand::parse(&input) {
                    Some(command) => self.apply_command(command),
                    None => self.set_error(format!("Unknown command: {input}")),
                }
            }
            KeyCode::Char('n') => self.apply_command(NavCommand::Next),
            KeyCode::Char('p') => self.apply_command(NavCommand::Previous),
            KeyCode::Char('r') => self.apply_command(NavCommand::Refresh),
            KeyCode::Char('q') | KeyCode::Esc => self.apply_command(NavCommand::Quit),
            _ => {}
        }
    }

    fn handle_comments_key(&mut self, key_event: KeyEvent) {
        let view_height = self.comment_view_height();
        let Some(navigator) = &mut self.navigator else {
            self.leave_comments();
            return;
        };
        match navigator.handle_key(key_event, view_height) {
            NavigatorAction::None => {}
            NavigatorAction::Expand(index) => self.pending = Some(PendingAction::Expand(index)),
            NavigatorAction::Exit => self.leave_comments(),
        }
    }

    /// Applies a page navigation command
    pub fn apply_command(&mut self, command: NavCommand) {
        self.input.clear();
        self.message = None;
        match command {
            NavCommand::Next => {
                if self.page.next_page() {
                    self.pending = Some(PendingAction::LoadPage);
                }
            }
            NavCommand::Previous => {
                if self.page.previous_page() {
                    self.pending = Some(PendingAction::LoadPage);
                }
            }
            NavCommand::Refresh => self.pending = Some(PendingAction::Refresh),
            NavCommand::Quit => self.should_quit = true,
            NavCommand::Select(number) => {
                let selectable: Vec<&Story> = stories(&self.rows).collect();
                match self.page.select(number, selectable.len()) {
                    Ok(index) => {
                        let story = selectable[index].clone();
                        self.pending = Some(PendingAction::OpenStory(story));
                    }
                    Err(e) => self.set_error(e.to_string()),
                }
            }
        }
    }

    fn set_error(&mut self, text: String) {
        self.message = Some(StatusMessage {
            text,
            is_error: true,
        });
    }

    fn set_info(&mut self, text: String) {
        self.message = Some(StatusMessage {
            text,
            is_error: false,
        });
    }

    /// Closes the comment view; a directly opened story ends the session
    fn leave_comments(&mut self) {
        self.navigator = None;
        self.story = None;
        if self.listing.is_some() {
            self.state = AppState::Stories;
            if std::mem::take(&mut self.page_stale) {
                self.pending = Some(PendingAction::LoadPage);
            }
        } else {
            self.should_quit = true;
        }
    }

    /// Runs the pending fetch, if any, against `source`
    pub async fn run_pending<S: HnSource>(&mut self, source: &mut S) {
        let Some(action) = self.pending.take() else {
            return;
        };
        match action {
            PendingAction::LoadPage => self.load_current_page(source).await,
            PendingAction::Refresh => self.refresh(source).await,
            PendingAction::OpenStory(story) => self.open_story(source, story).await,
            PendingAction::Expand(index) => self.expand_comment(source, index).await,
        }
    }

    async fn load_current_page<S: HnSource>(&mut self, source: &mut S) {
        self.rows = match &self.listing {
            Some(Listing::Category { ids, .. }) => {
                let page_ids = self.page.slice(ids).to_vec();
                load_page(source, &page_ids).await
            }
            Some(Listing::Search { stories, .. }) => self
                .page
                .slice(stories)
                .iter()
                .cloned()
                .map(PageRow::Story)
                .collect(),
            None => Vec::new(),
        };
        if self.navigator.is_none() {
            self.state = AppState::Stories;
        }
    }

    async fn refresh<S: HnSource>(&mut self, source: &mut S) {
        let Some(Listing::Category { category, .. }) = self.listing else {
            return;
        };
        source.clear_cache();
        match source.story_ids(category).await {
            Ok(ids) => {
                self.page.set_total_items(ids.len());
                self.listing = Some(Listing::Category { category, ids });
                self.load_current_page(source).await;
                self.set_info(format!("Refreshed {category} stories"));
            }
            Err(e) => self.set_error(format!("Error refreshing {category} stories: {e}")),
        }
    }

    async fn open_story<S: HnSource>(&mut self, source: &mut S, story: Story) {
        let limit = top_level_limit(self.comment_limit, self.terminal_size.1);
        let comments = load_top_level(source, &story, limit).await;
        self.navigator = Some(CommentNavigator::new(comments));
        self.story = Some(story);
        self.state = AppState::Comments;
    }

    async fn expand_comment<S: HnSource>(&mut self, source: &mut S, index: usize) {
        let columns = self.terminal_size.0;
        let Some(navigator) = &mut self.navigator else {
            return;
        };
        let Some(root) = navigator.comments.get(index).cloned() else {
            return;
        };
        let lines = flatten_thread(source, &root, columns).await;
        navigator.expand(lines);
    }
}
