//! Course media: video streaming with HTTP range requests and inline PDFs.
//!
//! Range parsing, `206 Partial Content` and `Content-Range` are delegated to
//! `tower_http::services::ServeFile`; we only resolve the path and then
//! enforce that video requests carry a `Range` header.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Request, State},
    http::{
        header::{CONTENT_DISPOSITION, RANGE},
        HeaderValue,
    },
    response::{IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::{debug, instrument};

use crate::domain::ContentKind;
use crate::error::ApiError;
use crate::state::AppState;

#[instrument(level = "info", skip(state, req))]
pub async fn http_stream_video(
    State(state): State<Arc<AppState>>,
    Path((course, filename)): Path<(String, String)>,
    req: Request,
) -> Result<Response, ApiError> {
    let path = state.resolve_media(&course, &filename, ContentKind::Video).await?;
    if !req.headers().contains_key(RANGE) {
        return Err(ApiError::RangeRequired);
    }
    debug!(target: "learnquest", path = %path.display(), range = ?req.headers().get(RANGE), "Streaming video");
    Ok(serve(path, req).await)
}

#[instrument(level = "info", skip(state, req))]
pub async fn http_get_pdf(
    State(state): State<Arc<AppState>>,
    Path((course, filename)): Path<(String, String)>,
    req: Request,
) -> Result<Response, ApiError> {
    let path = state.resolve_media(&course, &filename, ContentKind::Pdf).await?;
    let mut res = serve(path, req).await;
    if res.status().is_success() {
        res.headers_mut()
            .insert(CONTENT_DISPOSITION, HeaderValue::from_static("inline"));
    }
    Ok(res)
}

async fn serve(path: std::path::PathBuf, req: Request) -> Response {
    match ServeFile::new(path).oneshot(req).await {
        Ok(res) => res.map(Body::new).into_response(),
        Err(never) => match never {},
    }
}
