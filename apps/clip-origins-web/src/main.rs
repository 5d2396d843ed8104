use std::sync::Arc;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use clip_origins_twitch_gql::{
    AnnotatedClip, Error as GqlError, SortKey, TwitchGqlClient, TwitchVideo, collect_clips,
};
use eyre::Context as _;
use serde::{Deserialize, Serialize};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt::init();

    let client = Arc::new(TwitchGqlClient::new());

    let app = Router::new().route("/clips", get(clips)).with_state(client);

    let addr = std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("Failed to bind {addr}"))?;

    tracing::info!("Listening on {addr}");
    axum::serve(listener, app).await?;

    Ok(())
}

#[derive(Debug, Deserialize)]
struct ClipsParams {
    id: String,
    /// Can be "chrono" or "popular", default is "chrono".
    #[serde(rename = "sort-type")]
    sort_type: Option<String>,
    /// Strict boolean: only the literals "true" and "false" are accepted, so
    /// `reversed=false` means false rather than "non-empty, therefore true".
    reversed: Option<bool>,
}

#[derive(Debug, Serialize)]
struct ClipsResponse {
    video: TwitchVideo,
    clips: Vec<AnnotatedClip>,
}

async fn clips(
    State(client): State<Arc<TwitchGqlClient>>,
    Query(params): Query<ClipsParams>,
) -> Result<Json<ClipsResponse>, ApiError> {
    let sort = params
        .sort_type
        .as_deref()
        .unwrap_or("chrono")
        .parse::<SortKey>()?;
    let reversed = params.reversed.unwrap_or(false);

    let video = client.get_video_info(&params.id).await?;
    let clips = collect_clips(client.as_ref(), &params.id, sort, reversed).await?;

    Ok(Json(ClipsResponse { video, clips }))
}

struct ApiError(GqlError);
impl From<GqlError> for ApiError {
    fn from(err: GqlError) -> Self {
        Self(err)
    }
}
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            GqlError::UnknownSortKey(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::BAD_GATEWAY,
        };

        if status.is_server_error() {
            tracing::error!("Clip lookup failed: {}", self.0);
        }

        (status, self.0.to_string()).into_response()
    }
}
