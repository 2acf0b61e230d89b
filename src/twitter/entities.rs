//! Entity extraction for tweets and user descriptions.

use super::types::{HashtagEntity, MediaEntity, MentionEntity, RawEntities, UrlEntity};

/// The four entity collections of a tweet or description, each in upstream order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TweetEntities {
    pub mentions: Vec<MentionEntity>,
    pub hashtags: Vec<HashtagEntity>,
    pub urls: Vec<UrlEntity>,
    pub media: Vec<MediaEntity>,
}

/// Reads the entity collections off a raw entity bag.
///
/// Missing or `null` collections become empty vectors. Never fails.
pub fn extract_entities(raw: &RawEntities) -> TweetEntities {
    TweetEntities {
        mentions: raw.user_mentions.clone().unwrap_or_default(),
        hashtags: raw.hashtags.clone().unwrap_or_default(),
        urls: raw.urls.clone().unwrap_or_default(),
        media: raw.media.clone().unwrap_or_default(),
    }
}

/// Like [`extract_entities`], but with the media collection replaced by the
/// tweet's extended media list, which is the only complete one.
pub fn extract_tweet_entities(
    raw: &RawEntities,
    extended_media: Option<&Vec<MediaEntity>>,
) -> TweetEntities {
    TweetEntities {
        media: extended_media.cloned().unwrap_or_default(),
        ..extract_entities(raw)
    }
}
