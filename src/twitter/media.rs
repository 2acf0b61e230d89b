//! Media resolution for photos, gifs and videos attached to tweets.

use serde::Serialize;

use super::format::format_duration;
use super::types::{MediaEntity, VideoVariant};

/// Width of the timeline column media are laid out in.
const MAX_MEDIA_WIDTH: f64 = 506.0;
/// Height of a media cell when a tweet carries one or two items.
const MEDIA_CELL_HEIGHT: f64 = 284.0;

/// Which CSS dimension the frontend should pin to fill a photo cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SmallestDimension {
    Width,
    Height,
}

/// Up to three video sources ranked by bitrate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VideoSources {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<String>,
}

/// A display descriptor for one media attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RenderedMedia {
    #[serde(rename_all = "camelCase")]
    Photo {
        url: String,
        smallest_dimension: SmallestDimension,
    },
    #[serde(rename_all = "camelCase")]
    Gif { thumb_url: String, url: String },
    #[serde(rename_all = "camelCase")]
    Video {
        thumb_url: String,
        duration: String,
        duration_in_seconds: u64,
        sources: VideoSources,
    },
}

/// Maps the media entities of a tweet to display descriptors, one per entity.
pub fn resolve_media(media: &[MediaEntity]) -> Vec<RenderedMedia> {
    media
        .iter()
        .enumerate()
        .map(|(index, item)| resolve_item(item, index, media.len()))
        .collect()
}

fn resolve_item(item: &MediaEntity, index: usize, count: usize) -> RenderedMedia {
    let variants = item
        .video_info
        .as_ref()
        .map(|info| info.variants.as_slice())
        .unwrap_or_default();

    match item.kind.as_str() {
        "animated_gif" => RenderedMedia::Gif {
            thumb_url: item.media_url_https.clone(),
            url: variants.first().map(|v| v.url.clone()).unwrap_or_default(),
        },
        "video" => {
            let millis = item
                .video_info
                .as_ref()
                .map(|info| info.duration_millis)
                .unwrap_or(0);
            let duration_in_seconds = (millis as f64 / 1000.0).round() as u64;

            RenderedMedia::Video {
                thumb_url: item.media_url_https.clone(),
                duration: format_duration(duration_in_seconds),
                duration_in_seconds,
                sources: rank_video_sources(variants),
            }
        }
        _ => RenderedMedia::Photo {
            url: item.media_url_https.clone(),
            smallest_dimension: smallest_dimension(item, index, count),
        },
    }
}

/// Keeps the three highest-bitrate variants as high, medium and low.
/// Variants without a bitrate (playlists) are skipped.
pub fn rank_video_sources(variants: &[VideoVariant]) -> VideoSources {
    let mut ranked: Vec<&VideoVariant> = variants
        .iter()
        .filter(|v| v.bitrate.unwrap_or(0) > 0)
        .collect();
    ranked.sort_by(|a, b| b.bitrate.cmp(&a.bitrate));

    let mut tiers = ranked.into_iter().map(|v| v.url.clone());
    VideoSources {
        high: tiers.next(),
        medium: tiers.next(),
        low: tiers.next(),
    }
}

/// Compares the photo's aspect ratio with the cell it is shown in.
///
/// Cells are half the column wide. With more than two items cells are half
/// as tall, except the first of exactly three, which spans both rows.
fn smallest_dimension(item: &MediaEntity, index: usize, count: usize) -> SmallestDimension {
    let Some(size) = item.sizes.medium.filter(|s| s.w > 0 && s.h > 0) else {
        return SmallestDimension::Width;
    };

    let cell_width = MAX_MEDIA_WIDTH / 2.0;
    let mut cell_height = MEDIA_CELL_HEIGHT;
    if count > 2 {
        cell_height /= 2.0;
    }
    if count == 3 && index == 0 {
        cell_height *= 2.0;
    }

    let photo_ratio = f64::from(size.w) / f64::from(size.h);
    if photo_ratio > cell_width / cell_height {
        SmallestDimension::Height
    } else {
        SmallestDimension::Width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn media(value: serde_json::Value) -> Vec<MediaEntity> {
        serde_json::from_value(value).unwrap()
    }

    fn photo(w: u32, h: u32) -> serde_json::Value {
        json!({
            "type": "photo",
            "url": "https://t.co/p",
            "media_url_https": "https://pbs.twimg.com/media/p.jpg",
            "sizes": {"medium": {"w": w, "h": h}}
        })
    }

    #[test]
    fn test_video_tiers_by_bitrate() {
        let variants: Vec<VideoVariant> = serde_json::from_value(json!([
            {"url": "https://video/playlist.m3u8"},
            {"bitrate": 100, "url": "https://video/100.mp4"},
            {"bitrate": 500, "url": "https://video/500.mp4"},
            {"bitrate": 300, "url": "https://video/300.mp4"},
            {"bitrate": 900, "url": "https://video/900.mp4"}
        ]))
        .unwrap();

        let sources = rank_video_sources(&variants);
        assert_eq!(sources.high.as_deref(), Some("https://video/900.mp4"));
        assert_eq!(sources.medium.as_deref(), Some("https://video/500.mp4"));
        assert_eq!(sources.low.as_deref(), Some("https://video/300.mp4"));
    }

    #[test]
    fn test_missing_tiers_are_omitted() {
        let variants: Vec<VideoVariant> = serde_json::from_value(json!([
            {"bitrate": 0, "url": "https://video/zero.mp4"},
            {"bitrate": 832000, "url": "https://video/only.mp4"}
        ]))
        .unwrap();

        let sources = rank_video_sources(&variants);
        assert_eq!(sources.high.as_deref(), Some("https://video/only.mp4"));
        assert_eq!(sources.medium, None);

        let serialized = serde_json::to_value(&sources).unwrap();
        assert_eq!(serialized, json!({"high": "https://video/only.mp4"}));
    }

    #[test]
    fn test_resolve_video_and_gif() {
        let resolved = resolve_media(&media(json!([
            {
                "type": "video",
                "url": "https://t.co/v",
                "media_url_https": "https://pbs.twimg.com/thumb.jpg",
                "video_info": {
                    "duration_millis": 75400,
                    "variants": [{"bitrate": 256000, "url": "https://video/low.mp4"}]
                }
            },
            {
                "type": "animated_gif",
                "url": "https://t.co/g",
                "media_url_https": "https://pbs.twimg.com/gif.jpg",
                "video_info": {"variants": [{"bitrate": 0, "url": "https://video/gif.mp4"}]}
            }
        ])));

        assert_eq!(resolved.len(), 2);
        assert_eq!(
            resolved[0],
            RenderedMedia::Video {
                thumb_url: "https://pbs.twimg.com/thumb.jpg".to_string(),
                duration: "1:15".to_string(),
                duration_in_seconds: 75,
                sources: VideoSources {
                    high: Some("https://video/low.mp4".to_string()),
                    medium: None,
                    low: None,
                },
            }
        );
        assert_eq!(
            resolved[1],
            RenderedMedia::Gif {
                thumb_url: "https://pbs.twimg.com/gif.jpg".to_string(),
                url: "https://video/gif.mp4".to_string(),
            }
        );
    }

    #[test]
    fn test_zero_length_video_has_empty_label() {
        let resolved = resolve_media(&media(json!([
            {"type": "video", "media_url_https": "t.jpg", "video_info": {"duration_millis": 0}}
        ])));
        match &resolved[0] {
            RenderedMedia::Video {
                duration,
                duration_in_seconds,
                sources,
                ..
            } => {
                assert_eq!(duration, "");
                assert_eq!(*duration_in_seconds, 0);
                assert_eq!(*sources, VideoSources::default());
            }
            other => panic!("expected video, got {:?}", other),
        }
    }

    #[test]
    fn test_photo_layout_hint() {
        // A single landscape photo is wider than its tall half-width cell
        let single = resolve_media(&media(json!([photo(1200, 675)])));
        assert_eq!(
            single[0],
            RenderedMedia::Photo {
                url: "https://pbs.twimg.com/media/p.jpg".to_string(),
                smallest_dimension: SmallestDimension::Height,
            }
        );

        // Portrait photos pin their width
        let portrait = resolve_media(&media(json!([photo(600, 900)])));
        assert!(matches!(
            portrait[0],
            RenderedMedia::Photo {
                smallest_dimension: SmallestDimension::Width,
                ..
            }
        ));

        // 3:2 photos: the first of three gets a full-height cell, the rest half-height
        let three = resolve_media(&media(json!([
            photo(600, 400),
            photo(600, 400),
            photo(600, 400)
        ])));
        let hints: Vec<SmallestDimension> = three
            .iter()
            .map(|m| match m {
                RenderedMedia::Photo {
                    smallest_dimension, ..
                } => *smallest_dimension,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(
            hints,
            vec![
                SmallestDimension::Height,
                SmallestDimension::Width,
                SmallestDimension::Width
            ]
        );
    }

    #[test]
    fn test_photo_layout_hint_by_count() {
        let hints = |count: usize| -> Vec<SmallestDimension> {
            let photos: Vec<serde_json::Value> = (0..count).map(|_| photo(600, 500)).collect();
            resolve_media(&media(json!(photos)))
                .into_iter()
                .map(|m| match m {
                    RenderedMedia::Photo {
                        smallest_dimension, ..
                    } => smallest_dimension,
                    _ => unreachable!(),
                })
                .collect()
        };

        // 6:5 photos are wider than a full-height cell (253x284)
        assert_eq!(hints(2), vec![SmallestDimension::Height; 2]);
        // but narrower than the half-height cells (253x142) of four, first included
        assert_eq!(hints(4), vec![SmallestDimension::Width; 4]);
    }

    #[test]
    fn test_photo_serialization() {
        let resolved = resolve_media(&media(json!([photo(1200, 675)])));
        assert_eq!(
            serde_json::to_value(&resolved[0]).unwrap(),
            json!({
                "type": "photo",
                "url": "https://pbs.twimg.com/media/p.jpg",
                "smallestDimension": "height"
            })
        );
    }
}
