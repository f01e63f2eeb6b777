use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::services::labels::render::RenderError;

/// Failures of one label generation, as seen by the HTTP caller.
#[derive(Debug, Error)]
pub enum LabelError {
    /// The body parsed but breaks a field rule (e.g. `box_count` of zero).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Drawing or encoding the document failed; nothing was written.
    #[error("PDF Generation Error: {0}")]
    Generation(#[from] RenderError),

    /// The rendered bytes could not be stored in the output directory.
    #[error("PDF Generation Error: {0}")]
    Output(#[from] std::io::Error),

    /// The record insert failed; the file is left on disk.
    #[error("Database error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// The blocking worker running the generation went away.
    #[error("PDF Generation Error: {0}")]
    Worker(String),
}

impl ResponseError for LabelError {
    fn status_code(&self) -> StatusCode {
        match self {
            LabelError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "detail": self.to_string() }))
    }
}
