//! # Box Label Module
//!
//! Everything behind the label endpoint:
//! - `render`: lays out and draws the multi-page PDF, one page per box.
//! - `generate`: the `LabelService` pipeline (render, write, record) and its
//!   HTTP handler.

pub mod generate;
pub mod render;

use actix_web::web::{post, resource};
use actix_web::Resource;

const API_PATH: &str = "/generate_box_label/";

/// Configures and returns the Actix `Resource` for label generation.
///
/// *   **`POST /generate_box_label/`**:
///     - **Handler**: `generate::process`
///     - **Description**: Renders the label document for a JSON
///       `BoxLabelRequest`, stores and records it, and returns it as a PDF
///       attachment named after the vendor.
pub fn configure_routes() -> Resource {
    resource(API_PATH).route(post().to(generate::process))
}
