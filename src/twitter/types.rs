//! Raw Twitter API v1.1 payload types.
//!
//! Only the fields the rendering pipeline consumes are modelled. Collections
//! that the platform omits or sends as `null` deserialize to empty values;
//! `id_str`, `created_at` and `user` are mandatory and fail deserialization
//! when absent.

use serde::{Deserialize, Deserializer};

/// Treats an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A tweet as returned by `statuses/home_timeline.json` with `tweet_mode=extended`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTweet {
    pub id_str: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub full_text: String,
    pub created_at: String,
    pub user: RawUser,
    #[serde(default, deserialize_with = "null_as_default")]
    pub retweet_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub favorite_count: u64,
    #[serde(default)]
    pub retweeted_status: Option<Box<RawTweet>>,
    #[serde(default)]
    pub quoted_status: Option<Box<RawTweet>>,
    #[serde(default)]
    pub quoted_status_permalink: Option<Permalink>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub entities: RawEntities,
    #[serde(default)]
    pub extended_entities: Option<ExtendedEntities>,
}

/// The short link the platform appends to a tweet that quotes another one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Permalink {
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}

/// A user as embedded in tweets or returned by `account/verify_credentials.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawUser {
    pub screen_name: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub verified: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub followers_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub friends_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub following: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub profile_image_url_https: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub profile_link_color: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub entities: UserEntities,
}

/// Entity bags attached to a user profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserEntities {
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: RawEntities,
}

/// The entity bag of a tweet or a user description. Any key may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEntities {
    #[serde(default)]
    pub user_mentions: Option<Vec<MentionEntity>>,
    #[serde(default)]
    pub hashtags: Option<Vec<HashtagEntity>>,
    #[serde(default)]
    pub urls: Option<Vec<UrlEntity>>,
    #[serde(default)]
    pub media: Option<Vec<MediaEntity>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtendedEntities {
    #[serde(default)]
    pub media: Option<Vec<MediaEntity>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MentionEntity {
    pub screen_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HashtagEntity {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UrlEntity {
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_url: String,
}

/// A photo, gif or video attached to a tweet.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MediaEntity {
    #[serde(rename = "type")]
    pub kind: String,
    /// The t.co link appended to the tweet text for this media.
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub media_url_https: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sizes: MediaSizes,
    #[serde(default)]
    pub video_info: Option<VideoInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MediaSizes {
    #[serde(default)]
    pub medium: Option<MediaSize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct MediaSize {
    pub w: u32,
    pub h: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VideoInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub duration_millis: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub variants: Vec<VideoVariant>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VideoVariant {
    #[serde(default)]
    pub bitrate: Option<u64>,
    pub url: String,
}
