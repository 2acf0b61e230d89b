//! Twitter/X timeline integration module.
//!
//! This module contains the signed request client for the Twitter API and the
//! pipeline that turns raw timeline payloads into display-ready tweets.

mod api;
mod entities;
mod format;
mod media;
mod text;
mod tweet;
mod types;
mod user;

// Re-export public API
pub use api::{
    fetch_current_user, fetch_timeline, home_timeline_url, OAuthClient, RequestToken,
    SignedRequestClient,
};
pub use entities::{extract_entities, extract_tweet_entities, TweetEntities};
pub use format::{format_counter, format_date, format_date_at, format_duration, TweetDate};
pub use media::{resolve_media, RenderedMedia, SmallestDimension, VideoSources};
pub use text::{profile_url, render_text};
pub use tweet::{project_timeline, project_timeline_at, project_tweet, RenderedTweet};
pub use types::{RawTweet, RawUser};
pub use user::{project_user, RenderedUser};
