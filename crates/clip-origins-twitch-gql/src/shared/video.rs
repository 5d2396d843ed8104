use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TwitchVideo {
    pub id: String,
    pub title: String,
    pub owner: VideoOwner,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoOwner {
    pub login: String,
    pub display_name: String,
}
