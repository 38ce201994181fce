use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";

/// Strip control characters from API-supplied text before it reaches the
/// terminal. Titles, channel names and comments come from arbitrary remote
/// users and may contain escape sequences the terminal would interpret.
///
/// Tabs and newlines are replaced with a single space; everything else in the
/// control ranges is dropped. Returns `Cow::Borrowed` on the common clean path.
pub fn sanitize_text(s: &str) -> Cow<'_, str> {
    if !s.chars().any(|c| c.is_control()) {
        return Cow::Borrowed(s);
    }
    let cleaned: String = s
        .chars()
        .filter_map(|c| {
            if c == '\n' || c == '\t' || c == '\r' {
                Some(' ')
            } else if c.is_control() {
                None
            } else {
                Some(c)
            }
        })
        .collect();
    Cow::Owned(cleaned)
}

/// Truncate a string to fit a display width, appending "..." when cut.
///
/// Width is measured in terminal columns (CJK and emoji are 2 columns wide).
/// For widths of 3 or less there is no room for content plus ellipsis, so as
/// many whole characters as fit are returned without one.
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if UnicodeWidthStr::width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    let budget = if max_width > ELLIPSIS.len() {
        max_width - ELLIPSIS.len()
    } else {
        max_width
    };

    let mut end = 0;
    let mut used = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        end = idx + c.len_utf8();
    }

    if max_width > ELLIPSIS.len() {
        Cow::Owned(format!("{}{}", &s[..end], ELLIPSIS))
    } else {
        Cow::Owned(s[..end].to_string())
    }
}
