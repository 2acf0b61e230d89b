//! Tweet projection: composes entity rendering, media, author and counters
//! into the display-ready shape served to the frontend.

use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;

use super::entities::extract_tweet_entities;
use super::format::{format_counter, format_date_at, TweetDate};
use super::media::{resolve_media, RenderedMedia};
use super::text::{profile_url, render_text};
use super::types::RawTweet;
use super::user::{project_user, RenderedUser};
use crate::error::RenderError;

/// Deepest quote chain accepted before the payload is treated as malformed.
pub const MAX_QUOTE_DEPTH: usize = 32;

/// A tweet ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedTweet {
    pub id: String,
    pub user: RenderedUser,
    pub tweet_url: String,
    pub text: String,
    pub media: Vec<RenderedMedia>,
    pub date: TweetDate,
    pub retweet_count: String,
    pub like_count: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quoted_tweet: Option<Box<RenderedTweet>>,
    /// Set on quoted tweets: the link the quoting tweet carries for them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retweeted_by: Option<RenderedUser>,
}

/// Projects a single tweet. `nested` is true for tweets embedded as quotes,
/// which render without links.
pub fn project_tweet(tweet: &RawTweet, nested: bool) -> Result<RenderedTweet, RenderError> {
    project_tweet_at(tweet, nested, 0, Utc::now())
}

fn project_tweet_at(
    tweet: &RawTweet,
    nested: bool,
    depth: usize,
    now: DateTime<Utc>,
) -> Result<RenderedTweet, RenderError> {
    if depth > MAX_QUOTE_DEPTH {
        return Err(RenderError::QuoteDepthExceeded {
            depth: MAX_QUOTE_DEPTH,
        });
    }

    let extended_media = tweet
        .extended_entities
        .as_ref()
        .and_then(|e| e.media.as_ref());
    let entities = extract_tweet_entities(&tweet.entities, extended_media);

    let quoted_tweet = match &tweet.quoted_status {
        Some(quoted) => {
            let mut rendered = project_tweet_at(quoted, true, depth + 1, now)?;
            rendered.placeholder_url = Some(
                tweet
                    .quoted_status_permalink
                    .as_ref()
                    .map(|p| p.url.clone())
                    .unwrap_or_default(),
            );
            Some(Box::new(rendered))
        }
        None => None,
    };
    let placeholder = quoted_tweet
        .as_ref()
        .and_then(|q| q.placeholder_url.as_deref());

    let text = render_text(&tweet.full_text, &entities, placeholder, nested)?;
    let media = resolve_media(&entities.media);
    let user = project_user(&tweet.user, nested)?;

    debug!(
        "Projected tweet {} by @{} ({} media, quote: {})",
        tweet.id_str,
        tweet.user.screen_name,
        media.len(),
        quoted_tweet.is_some()
    );

    Ok(RenderedTweet {
        id: tweet.id_str.clone(),
        tweet_url: format!(
            "{}/status/{}",
            profile_url(&tweet.user.screen_name),
            tweet.id_str
        ),
        user,
        text,
        media,
        date: format_date_at(&tweet.created_at, now)?,
        retweet_count: format_counter(tweet.retweet_count),
        like_count: format_counter(tweet.favorite_count),
        quoted_tweet,
        placeholder_url: None,
        retweeted_by: None,
    })
}

/// Projects a home timeline page.
///
/// Retweets show the retweeted content under the outer entry's id, with the
/// retweeting user attached as `retweeted_by`.
pub fn project_timeline(tweets: &[RawTweet]) -> Result<Vec<RenderedTweet>, RenderError> {
    project_timeline_at(tweets, Utc::now())
}

/// [`project_timeline`] with the reference instant for relative dates made explicit.
pub fn project_timeline_at(
    tweets: &[RawTweet],
    now: DateTime<Utc>,
) -> Result<Vec<RenderedTweet>, RenderError> {
    tweets
        .iter()
        .map(|tweet| match &tweet.retweeted_status {
            Some(retweet) => {
                let mut rendered = project_tweet_at(retweet, false, 0, now)?;
                rendered.id = tweet.id_str.clone();
                rendered.retweeted_by = Some(project_user(&tweet.user, false)?);
                Ok(rendered)
            }
            None => project_tweet_at(tweet, false, 0, now),
        })
        .collect()
}
