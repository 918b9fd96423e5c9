//! Unified server error type.
//!
//! Task API failures never reach this type: handlers turn them into a
//! rendered page. What is left are failures of the server itself (a template
//! that does not render) and request bodies the handlers cannot read.
//! [`ServerError`] implements [`axum::response::IntoResponse`] so handlers can
//! use `?` on them.

use axum::extract::rejection::FormRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ServerError {
    /// A view failed to render.
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    /// The browser sent a body the handler cannot decode.
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl From<FormRejection> for ServerError {
    fn from(rejection: FormRejection) -> Self {
        ServerError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            ServerError::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            // Template errors carry file names and source snippets; keep them
            // in the logs only.
            ServerError::Template(e) => {
                error!(error = %e, detail = ?e, "failed to render view");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                )
                    .into_response()
            }
        }
    }
}
