//! Utility functions shared across the client.
//!
//! - **Formatting**: abbreviated counts, ISO-8601 durations, relative times
//! - **Text processing**: width-aware truncation and control-character
//!   stripping for API-supplied titles and comments

mod format;
mod text;

pub use format::{format_count, format_duration, format_relative_time};
pub use text::{sanitize_text, truncate_to_width};

/// Maximum allowed search query length (UI layer validation).
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;
