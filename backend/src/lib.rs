//! Box label server: renders per-box shipping labels as PDF, keeps the files in
//! an output directory and logs every generation in SQLite.

pub mod config;
pub mod db;
pub mod errors;
pub mod output;
pub mod services;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{web, HttpResponse};
use log::warn;
use serde_json::json;
use std::path::Path;

/// Registers every route of the application.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(services::health::configure_routes())
        .service(services::labels::configure_routes());
}

/// Mounts `dir` under `/static` when a directory is configured.
pub fn configure_static(cfg: &mut web::ServiceConfig, dir: Option<&Path>) {
    if let Some(dir) = dir {
        cfg.service(Files::new("/static", dir).index_file("index.html"));
    }
}

/// Cross-origin policy: any origin, method and header, so a page served from
/// elsewhere can call the API.
pub fn cors() -> Cors {
    Cors::permissive()
}

/// JSON extractor settings: body size limit, and `{"detail": ...}` error bodies
/// for payloads that cannot be decoded.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| {
            let detail = err.to_string();
            warn!("Rejected request body: {}", detail);
            let mut response = match &err {
                JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
                    HttpResponse::PayloadTooLarge()
                }
                JsonPayloadError::ContentType => HttpResponse::UnsupportedMediaType(),
                _ => HttpResponse::UnprocessableEntity(),
            };
            InternalError::from_response(err, response.json(json!({ "detail": detail }))).into()
        })
}
