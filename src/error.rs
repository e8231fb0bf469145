//! HTTP-facing error type. Every handler returns `Result<_, ApiError>`; the
//! response is the status code plus `{"error": "<message>"}`.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  BadRequest(String),

  #[error("Requires Range header")]
  RangeRequired,

  #[error(transparent)]
  Store(#[from] StoreError),

  #[error("catalog scan failed: {0}")]
  Scan(String),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::RangeRequired => StatusCode::RANGE_NOT_SATISFIABLE,
      ApiError::Store(_) | ApiError::Scan(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      error!(target: "learnquest", error = %self, "Request failed");
    }
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
