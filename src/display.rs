//! Terminal formatting helpers shared by the command modules.

/// Format a Unix timestamp relative to `now` (e.g. "3 hours ago").
///
/// Timestamps in the future or older than 30 days fall back to a date.
pub fn format_ts_relative(ts: i64, now: i64) -> String {
    let delta = now - ts;

    if delta < 0 {
        return format_ts_iso(ts);
    }

    if delta < 60 {
        "just now".to_string()
    } else if delta < 3600 {
        let mins = delta / 60;
        format!("{} min{} ago", mins, plural(mins))
    } else if delta < 86400 {
        let hours = delta / 3600;
        format!("{} hour{} ago", hours, plural(hours))
    } else if delta < 86400 * 30 {
        let days = delta / 86400;
        format!("{} day{} ago", days, plural(days))
    } else {
        format_ts_iso(ts)
    }
}

pub fn format_ts_iso(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ts.to_string())
}

fn plural(n: i64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Current time in Unix seconds.
pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}
