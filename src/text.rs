//! Text helpers for turning API fields into terminal text

/// Converts an HTML comment body to plain text
///
/// `<p>` starts a new paragraph, every other tag is dropped and entities are
/// decoded.
pub fn strip_html(html: &str) -> String {
    let with_breaks = html.replace("<p>", "\n\n").replace("</p>", "");

    let mut plain = String::with_capacity(with_breaks.len());
    let mut inside_tag = false;
    for ch in with_breaks.chars() {
        match ch {
            '<' => inside_tag = true,
            '>' if inside_tag => inside_tag = false,
            _ if inside_tag => {}
            _ => plain.push(ch),
        }
    }

    html_escape::decode_html_entities(plain.trim()).into_owned()
}

/// One-line summary of an HTML body, truncated to `max_chars`
pub fn summary(html: &str, max_chars: usize) -> String {
    let plain = strip_html(html);
    let flat = plain.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate(&flat, max_chars)
}

/// Shortens `text` to at most `max_chars` characters, ending in `...`
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut result: String = text.chars().take(keep).collect();
    result.push_str("...");
    result
}

/// Word-wraps `text` to `width` columns, keeping paragraph breaks
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    textwrap::wrap(text, width.max(1))
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}

/// Formats the age of a timestamp relative to `now`, both in epoch seconds
pub fn format_time_ago(timestamp: i64, now: i64) -> String {
    let seconds = (now - timestamp).max(0);
    if seconds < 60 {
        return format!("{seconds} seconds ago");
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{minutes} minutes ago");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours} hours ago");
    }
    let days = hours / 24;
    if days < 30 {
        return format!("{days} days ago");
    }
    let months = days / 30;
    if months < 12 {
        return format!("{months} months ago");
    }
    format!("{} years ago", months / 12)
}

/// Age of an optional timestamp relative to the current time
pub fn age(timestamp: Option<i64>) -> String {
    format_time_ago(timestamp.unwrap_or(0), chrono::Utc::now().timestamp())
}

/// Centers `title` within `columns`
pub fn center(title: &str, columns: usize) -> String {
    let padding = columns.saturating_sub(title.chars().count() + 2) / 2;
    format!("{}{title}", " ".repeat(padding))
}
