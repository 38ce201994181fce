use chrono::{DateTime, Utc};

/// Abbreviate a raw count (views, likes, subscribers) for display.
///
/// Thousands and millions floor to a whole number ("1K", "2M"); billions keep
/// one decimal place ("1.2B"). Negative counts render as "0" — the API never
/// legitimately returns them, so they indicate a parse problem upstream.
pub fn format_count(value: i64) -> String {
    if value <= 0 {
        return "0".to_string();
    }
    if value >= 1_000_000_000 {
        format!("{:.1}B", value as f64 / 1_000_000_000.0)
    } else if value >= 1_000_000 {
        format!("{}M", value / 1_000_000)
    } else if value >= 1_000 {
        format!("{}K", value / 1_000)
    } else {
        value.to_string()
    }
}

/// Convert an ISO-8601 period (`PT1H2M3S`) into clock text (`1:02:03`).
///
/// Only the hour/minute/second designators the video API emits are handled.
/// Malformed or absent input renders as an empty string so callers can simply
/// skip the duration badge.
pub fn format_duration(duration: Option<&str>) -> String {
    let Some(raw) = duration else {
        return String::new();
    };
    let Some(body) = raw.strip_prefix("PT") else {
        return String::new();
    };
    if body.is_empty() {
        return String::new();
    }

    let mut hours: Option<u64> = None;
    let mut minutes: Option<u64> = None;
    let mut seconds: Option<u64> = None;
    let mut digits = String::new();

    for c in body.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        let Ok(value) = digits.parse::<u64>() else {
            return String::new();
        };
        digits.clear();
        match c {
            'H' if hours.is_none() => hours = Some(value),
            'M' if minutes.is_none() => minutes = Some(value),
            'S' if seconds.is_none() => seconds = Some(value),
            _ => return String::new(),
        }
    }
    // Trailing digits without a designator
    if !digits.is_empty() {
        return String::new();
    }

    let m = minutes.unwrap_or(0);
    let s = seconds.unwrap_or(0);
    match hours {
        Some(h) => format!("{}:{:02}:{:02}", h, m, s),
        None => format!("{}:{:02}", m, s),
    }
}

/// Render a published timestamp as "N units ago" relative to now.
///
/// Mirrors the coarse buckets the original UI showed next to every video.
/// Future or absent timestamps render as "just now" / empty respectively.
pub fn format_relative_time(published: Option<DateTime<Utc>>) -> String {
    let Some(then) = published else {
        return String::new();
    };
    let elapsed = Utc::now().signed_duration_since(then);
    let secs = elapsed.num_seconds();

    if secs < 60 {
        return "just now".to_string();
    }

    let (count, unit) = if secs < 3_600 {
        (secs / 60, "minute")
    } else if secs < 86_400 {
        (secs / 3_600, "hour")
    } else if secs < 2_592_000 {
        (secs / 86_400, "day")
    } else if secs < 31_536_000 {
        (secs / 2_592_000, "month")
    } else {
        (secs / 31_536_000, "year")
    };

    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}
