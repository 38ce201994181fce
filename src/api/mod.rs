//! Client for the video platform's REST API.
//!
//! The module splits three ways:
//!
//! - [`client`] - the request functions (popular chart, detail, channel,
//!   comments, related, search) with their error taxonomy
//! - [`wire`] - serde shapes for the JSON responses and normalization into
//!   domain types
//! - [`types`] - the canonical domain records the rest of the app consumes
//!
//! Everything endpoint-specific (the `items` envelope, string-typed
//! statistics, the search endpoint's nested id objects) is contained here;
//! views only ever see the normalized types.

mod client;
mod types;
mod wire;

pub use client::{ApiError, VideoApiClient};
pub use types::{ChannelSummary, Comment, Video, VideoDetail};
