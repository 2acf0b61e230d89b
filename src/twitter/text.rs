//! Entity-aware rewriting of tweet and description text into markup.
//!
//! Entities are rewritten in a fixed order: mentions, hashtags, urls, and
//! finally the trailing media link. Top-level text gets anchors; text inside
//! an embedded quote gets inert spans.

use std::collections::HashSet;

use log::warn;
use regex::{NoExpand, Regex};

use super::api::sanitize_for_logging;
use super::entities::TweetEntities;
use super::types::{HashtagEntity, MediaEntity, MentionEntity, UrlEntity};
use crate::error::RenderError;

/// Base URL for profile and hashtag links.
pub const TWITTER_URL: &str = "https://twitter.com";

/// Builds the profile URL of a screen name.
pub fn profile_url(screen_name: &str) -> String {
    format!("{}/{}", TWITTER_URL, screen_name)
}

/// Wraps `label` in a link that opens in a new tab.
pub(crate) fn anchor(href: &str, label: &str) -> String {
    format!(
        r#"<a href="{}" class="tweet-link" target="_blank">{}</a>"#,
        href, label
    )
}

fn span(label: &str) -> String {
    format!("<span>{}</span>", label)
}

/// End-of-entity assertion. Entities ending in an ASCII word character stop
/// at the next non-ASCII-word character, so `@bob` is found in `@bobさん`;
/// other entities stop at the next non-word character.
fn word_end(entity: &str) -> &'static str {
    match entity.chars().last() {
        Some(c) if c.is_ascii_alphanumeric() || c == '_' => r"(?-u:\b)",
        _ => r"\b{end-half}",
    }
}

/// Renders raw text with its entities into display markup.
///
/// `quote_placeholder` is the permalink the platform appended for a quoted
/// tweet; at top level that link is dropped since the quote is shown as a card.
///
/// # Errors
///
/// Returns [`RenderError::MissingEntity`] when a mention or hashtag entity
/// does not occur in `text`.
pub fn render_text(
    text: &str,
    entities: &TweetEntities,
    quote_placeholder: Option<&str>,
    nested: bool,
) -> Result<String, RenderError> {
    let mut text = text.to_string();

    if !entities.mentions.is_empty() {
        text = replace_mentions(&text, &entities.mentions, nested)?;
    }
    if !entities.hashtags.is_empty() {
        text = replace_hashtags(&text, &entities.hashtags, nested)?;
    }
    if !entities.urls.is_empty() {
        text = replace_urls(&text, &entities.urls, quote_placeholder, nested);
    }
    if !entities.media.is_empty() {
        text = strip_media_link(&text, &entities.media);
    }

    Ok(text.trim().to_string())
}

fn missing_entity(kind: &'static str, claimed: &str, text: &str) -> RenderError {
    warn!(
        "{} entity '{}' not found in text: {}",
        kind,
        claimed,
        sanitize_for_logging(text, 200)
    );
    RenderError::MissingEntity {
        kind,
        text: claimed.to_string(),
    }
}

fn replace_mentions(
    text: &str,
    mentions: &[MentionEntity],
    nested: bool,
) -> Result<String, RenderError> {
    let mut text = text.to_string();
    let mut seen = HashSet::new();

    for MentionEntity { screen_name } in mentions {
        if !seen.insert(screen_name.to_lowercase()) {
            continue;
        }
        let finder = Regex::new(&format!(
            r"(?i)[@＠]{}{}",
            regex::escape(screen_name),
            word_end(screen_name)
        ))?;
        let mention = match finder.find(&text) {
            Some(m) => m.as_str().to_string(),
            None => return Err(missing_entity("mention", screen_name, &text)),
        };

        let replacement = if nested {
            span(&mention)
        } else {
            anchor(&profile_url(screen_name), &mention)
        };
        let exact = Regex::new(&format!(
            r"{}{}",
            regex::escape(&mention),
            word_end(&mention)
        ))?;
        text = exact.replace_all(&text, NoExpand(&replacement)).into_owned();
    }

    Ok(text)
}

fn replace_hashtags(
    text: &str,
    hashtags: &[HashtagEntity],
    nested: bool,
) -> Result<String, RenderError> {
    let mut text = text.to_string();
    let mut seen = HashSet::new();

    for HashtagEntity { text: tag } in hashtags {
        if !seen.insert(tag.as_str()) {
            continue;
        }
        let hashtag = format!("#{}", tag);
        let exact = Regex::new(&format!(
            r"{}{}",
            regex::escape(&hashtag),
            word_end(&hashtag)
        ))?;
        if !exact.is_match(&text) {
            return Err(missing_entity("hashtag", &hashtag, &text));
        }

        let replacement = if nested {
            span(&hashtag)
        } else {
            let href = format!(
                "{}/hashtag/{}?src=hash",
                TWITTER_URL,
                urlencoding::encode(tag)
            );
            anchor(&href, &hashtag)
        };
        text = exact.replace_all(&text, NoExpand(&replacement)).into_owned();
    }

    Ok(text)
}

fn replace_urls(
    text: &str,
    urls: &[UrlEntity],
    quote_placeholder: Option<&str>,
    nested: bool,
) -> String {
    let mut text = text.to_string();
    let mut seen = HashSet::new();

    for UrlEntity { url, display_url } in urls {
        if url.is_empty() || !seen.insert(url.as_str()) {
            continue;
        }
        let replacement = if nested {
            span(display_url)
        } else if quote_placeholder == Some(url.as_str()) {
            String::new()
        } else {
            anchor(url, display_url)
        };
        text = text.replace(url.as_str(), &replacement);
    }

    text.trim().to_string()
}

/// The platform appends one link for all attached media; only the first
/// media entity's link is removed.
fn strip_media_link(text: &str, media: &[MediaEntity]) -> String {
    match media.first() {
        Some(first) if !first.url.is_empty() => text.replacen(&first.url, "", 1).trim().to_string(),
        _ => text.to_string(),
    }
}
