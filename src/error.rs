//! Error types for the store seam and the HTTP surface.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use thiserror::Error;

use crate::protocol::ErrorOut;

/// The only message users ever see for store failures.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

#[derive(Error, Debug)]
pub enum StoreError {
  #[error("store transport error: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("store HTTP {status}: {body}")]
  Status { status: u16, body: String },
}

#[derive(Error, Debug)]
pub enum AppError {
  #[error("{0}")]
  Validation(String),

  #[error("store failure: {0}")]
  Store(#[from] StoreError),
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
      AppError::Store(_) => (StatusCode::BAD_GATEWAY, GENERIC_FAILURE.to_string()),
    };
    (status, Json(ErrorOut { error: message })).into_response()
  }
}
