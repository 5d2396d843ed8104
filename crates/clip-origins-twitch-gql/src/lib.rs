use serde::{Deserialize, Serialize};
use serde_json::json;
use shared::RawQueryResponse;

/// This is the public client ID used by the first-party web player. Requests
/// carrying it don't need a user token.
const TWITCH_CLIENT_ID: &str = "kimne78kx3ncx6brgo4mv6wki5h1ko";

const GQL_ENDPOINT: &str = "https://gql.twitch.tv/gql";

/// One fixed document, three entry points. Every request sends the whole
/// document and picks an operation via `operationName`.
///
/// VOD URL format: https://www.twitch.tv/videos/1214580885?t=00h00m04s
const QUERY_DOCUMENT: &str = r"
query VideoInfo($id: ID!) {
	video(id: $id) {
		title
		id
		owner {
			login
			displayName
		}
	}
}

query InitialClips($id: ID!) {
	video(id: $id) {
		clips {
			...ClipInfo
		}
	}
}

query PaginateClips($id: ID!, $after: Cursor) {
	video(id: $id) {
		clips(after: $after) {
			...ClipInfo
		}
	}
}

fragment ClipInfo on ClipConnection {
	edges {
		cursor
		node {
			title
			id
			url
			embedURL
			videoOffsetSeconds
			viewCount
		}
	}
	pageInfo {
		hasNextPage
	}
}
";

mod clips;
mod error;
mod shared;
mod timestamp;

pub use clips::{ClipPageSource, SortKey, clip_stream, collect_clips};
pub use error::{Error, Result};
pub use shared::clip::{AnnotatedClip, TwitchClip};
pub use shared::video::{TwitchVideo, VideoOwner};
pub use shared::{QueryConnection, QueryEdge, QueryPageInfo};
pub use timestamp::format_timestamp;

pub struct TwitchGqlClient {
    client: reqwest::Client,
}
impl TwitchGqlClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert("Client-ID", TWITCH_CLIENT_ID.parse().unwrap());

                headers
            })
            .build()
            .unwrap();

        Self { client }
    }

    /// Executes one named operation from the fixed document and returns its
    /// deserialized `data` object.
    async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        operation_name: &str,
        variables: serde_json::Value,
    ) -> Result<T> {
        let body = self
            .client
            .post(GQL_ENDPOINT)
            .json(&GqlRequest {
                query: QUERY_DOCUMENT,
                operation_name,
                variables,
            })
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let res: RawQueryResponse = serde_json::from_slice(&body)?;

        res.into_data()
    }

    /// Fetches a video's title and owner. One round trip, no pagination.
    pub async fn get_video_info(&self, video_id: &str) -> Result<TwitchVideo> {
        let res: VideoQueryResponse<TwitchVideo> =
            self.execute("VideoInfo", json!({ "id": video_id })).await?;

        Ok(res.video)
    }
}

impl ClipPageSource for TwitchGqlClient {
    async fn initial_page(&self, video_id: &str) -> Result<QueryConnection<TwitchClip>> {
        let res: VideoQueryResponse<VideoClips> = self
            .execute("InitialClips", json!({ "id": video_id }))
            .await?;

        Ok(res.video.clips)
    }

    async fn next_page(&self, video_id: &str, after: &str) -> Result<QueryConnection<TwitchClip>> {
        let res: VideoQueryResponse<VideoClips> = self
            .execute("PaginateClips", json!({ "id": video_id, "after": after }))
            .await?;

        Ok(res.video.clips)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GqlRequest<'a> {
    query: &'a str,
    operation_name: &'a str,
    variables: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct VideoQueryResponse<T> {
    video: T,
}

#[derive(Debug, Deserialize)]
struct VideoClips {
    clips: QueryConnection<TwitchClip>,
}
