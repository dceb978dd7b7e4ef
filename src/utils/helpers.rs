/// Helper utilities for the dashboard

use chrono::{DateTime, Local, Utc};

/// Format duration to human-readable string
pub fn format_duration(seconds: u64) -> String {
    let days = seconds / 86400;
    let hours = (seconds % 86400) / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

/// "12s ago" style age of a probe timestamp, `None` when never checked
pub fn format_age(checked_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<String> {
    let checked_at = checked_at?;
    let seconds = (now - checked_at).num_seconds().max(0) as u64;
    Some(format!("{} ago", format_duration(seconds)))
}

/// Local wall-clock time of a probe, for tables and the web page
pub fn format_clock(checked_at: DateTime<Utc>) -> String {
    let local: DateTime<Local> = checked_at.into();
    local.format("%H:%M:%S").to_string()
}

/// Escape text for inclusion in HTML element content or attribute values
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
