//! Full-screen terminal session and the interactive event loop

use std::io::{self, Stdout};
use std::panic;
use std::time::Duration;

use crossterm::{
    cursor::Show,
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::debug;

use crate::app::App;
use crate::data::HnSource;
use crate::error::HnError;
use crate::ui;

/// How long to wait for input before redrawing
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Sets up a panic hook that restores the terminal before printing the panic message.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        restore();
        original_hook(panic_info);
    }));
}

/// Leaves raw mode and the alternate screen, ignoring failures
fn restore() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
}

/// Raw mode plus alternate screen, restored when dropped
pub struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    /// Enters raw mode and the alternate screen
    pub fn start() -> Result<Self, HnError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            restore();
            return Err(e.into());
        }
        match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(e) => {
                restore();
                Err(e.into())
            }
        }
    }

    /// Runs the interactive loop until the app asks to quit
    ///
    /// Pending fetches run between frames; a loading screen is drawn first so
    /// the user sees what is being fetched.
    pub async fn run<S: HnSource>(&mut self, app: &mut App, source: &mut S) -> Result<(), HnError> {
        loop {
            if let Some(status) = app.pending_status() {
                debug!(%status, "running pending fetch");
                self.terminal
                    .draw(|f| ui::render_loading(f, &status, &app.theme))?;
                app.run_pending(source).await;
            }

            self.terminal.draw(|f| ui::render(f, app))?;

            if event::poll(POLL_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                    Event::Resize(columns, rows) => app.resize(columns, rows),
                    _ => {}
                }
            }

            if app.should_quit {
                return Ok(());
            }
        }
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        restore();
    }
}

/// Takes over the terminal and browses until the user quits
pub async fn run_interactive<S: HnSource>(mut app: App, source: &mut S) -> Result<(), HnError> {
    setup_panic_hook();
    let mut session = TerminalSession::start()?;
    session.run(&mut app, source).await
}

/// Current terminal size as (columns, rows), with an 80x24 fallback
pub fn size() -> (u16, u16) {
    crossterm::terminal::size().unwrap_or((80, 24))
}
