//! Opening links in the system browser

use std::io::{self, BufRead, Write};
use tracing::debug;

/// Whether a link was handed to the browser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    Opened,
    Declined,
}

/// Opens `url`, asking first unless `automatic` is set
///
/// `confirm` is only consulted when `automatic` is false. `opener` performs the
/// actual launch.
pub fn open_link<C, O>(url: &str, automatic: bool, confirm: C, opener: O) -> io::Result<OpenOutcome>
where
    C: FnOnce() -> bool,
    O: FnOnce(&str) -> io::Result<()>,
{
    if !automatic && !confirm() {
        return Ok(OpenOutcome::Declined);
    }
    debug!(url, "opening in browser");
    opener(url)?;
    Ok(OpenOutcome::Opened)
}

/// Launches the system browser
pub fn system_opener(url: &str) -> io::Result<()> {
    open::that(url)
}

/// Asks a yes/no question on stdin; anything but y/yes is "no"
pub fn confirm(prompt: &str) -> bool {
    print!("{prompt} [y/N]: ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
