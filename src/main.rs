//! hncli - Browse Hacker News from the terminal
//!
//! Browsing commands take over the terminal; every other command prints its
//! result to stdout and exits.

use std::io::{self, Write};

use clap::Parser;
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hncli::app::App;
use hncli::browser::{confirm, system_opener};
use hncli::cache::TtlCache;
use hncli::cli::{Cli, Command};
use hncli::commands::{self, Printer};
use hncli::config::ConfigStore;
use hncli::data::HnClient;
use hncli::terminal;
use hncli::theme::Theme;

/// Logs go to stderr, and only when `RUST_LOG` asks for them
fn init_logging() {
    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_none() {
        return;
    }
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let cli = Cli::parse();

    let store = match ConfigStore::new() {
        Ok(store) => Some(store),
        Err(e) => {
            warn!(error = %e, "configuration unavailable, using defaults");
            None
        }
    };
    let config = store.as_ref().map(ConfigStore::load).unwrap_or_default();
    let theme = Theme::by_name(config.color_theme());
    let printer = Printer::new(theme);
    let mut out = io::stdout();

    let mut cache = TtlCache::new();
    cache.clear_expired(config.cache_ttl());
    let mut client = HnClient::new(cache, config.cache_ttl());

    if let Some((category, limit)) = cli.command.browse_target() {
        if let Some(listing) = commands::fetch_listing(&mut client, category, &mut out, &printer).await? {
            let app = App::browse(listing, limit, theme, terminal::size());
            terminal::run_interactive(app, &mut client).await?;
        }
        return Ok(());
    }

    match cli.command {
        Command::Story { item_id, comments } => {
            if let Some(story) = commands::fetch_story(&mut client, item_id, &mut out, &printer).await? {
                let app = App::single_story(story, comments, theme, terminal::size());
                terminal::run_interactive(app, &mut client).await?;
            }
        }
        Command::User { username } => {
            if let Some(user) = commands::show_user(&mut client, &username, &mut out, &printer).await? {
                commands::open_in_browser(
                    &user.profile_url(),
                    config.open_links_in_browser(),
                    || confirm("Open user profile in browser?"),
                    system_opener,
                    None,
                    &mut out,
                    &printer,
                )?;
            }
        }
        Command::Search { query, limit } => {
            if let Some(listing) = commands::search(&mut client, &query, &mut out, &printer).await? {
                let app = App::browse(listing, limit, theme, terminal::size());
                terminal::run_interactive(app, &mut client).await?;
            }
        }
        Command::Open { story_id } => {
            commands::open_story(
                story_id,
                config.open_links_in_browser(),
                || confirm("Open story in browser?"),
                system_opener,
                &mut out,
                &printer,
            )?;
        }
        Command::ConfigSet { key, value } => match &store {
            Some(store) => commands::config_set(store, &key, &value, &mut out, &printer)?,
            None => no_config_dir(&mut out, &printer)?,
        },
        Command::ConfigGet { key } => match &store {
            Some(store) => {
                commands::config_get(store, key.as_deref(), terminal::size(), &mut out, &printer)?
            }
            None => no_config_dir(&mut out, &printer)?,
        },
        Command::ConfigReset => match &store {
            Some(store) => commands::config_reset(store, &mut out, &printer)?,
            None => no_config_dir(&mut out, &printer)?,
        },
        Command::CacheClear => commands::cache_clear(&mut client, &mut out, &printer)?,
        Command::Top { .. } | Command::New { .. } | Command::Best { .. } => {}
    }

    Ok(())
}

fn no_config_dir(out: &mut impl Write, printer: &Printer) -> io::Result<()> {
    writeln!(
        out,
        "{}",
        printer.error("Could not determine the configuration directory")
    )
}

