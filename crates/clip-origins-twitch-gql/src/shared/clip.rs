use serde::{Deserialize, Serialize};

use crate::timestamp::format_timestamp;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TwitchClip {
    pub title: String,
    pub id: String,
    pub url: String,
    #[serde(rename = "embedURL")]
    pub embed_url: String,
    pub video_offset_seconds: u64,
    pub view_count: u64,
}

/// A clip plus the `HHhMMmSSs` offset at which it starts in the source video.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotatedClip {
    #[serde(flatten)]
    pub clip: TwitchClip,
    pub formatted_timestamp: String,
}

impl From<TwitchClip> for AnnotatedClip {
    fn from(clip: TwitchClip) -> Self {
        let formatted_timestamp = format_timestamp(clip.video_offset_seconds);

        Self {
            clip,
            formatted_timestamp,
        }
    }
}
