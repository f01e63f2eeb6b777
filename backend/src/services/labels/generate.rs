//! # Box Label Generation Service
//!
//! Provides the `POST /generate_box_label/` endpoint and the `LabelService`
//! behind it.
//!
//! ## Workflow
//!
//! 1.  **HTTP Request**: `process` receives a JSON `BoxLabelRequest`. Bodies that
//!     do not decode are rejected by the JSON extractor with `422`.
//!
//! 2.  **Blocking Work**: the whole generation runs inside `web::block`, since
//!     rendering, file I/O and the SQLite insert are synchronous.
//!
//! 3.  **Generation**: `LabelService::generate` validates the request, derives
//!     the file name from the vendor, renders the document, stores it in the
//!     output directory and appends a record. A render failure leaves disk and
//!     database untouched; an insert failure leaves the file on disk.
//!
//! 4.  **HTTP Response**: the rendered bytes are returned as a PDF attachment.

use crate::db::RecordStore;
use crate::errors::LabelError;
use crate::output::OutputDir;
use crate::services::labels::render;
use actix_web::http::header::{
    self, Charset, ContentDisposition, DispositionParam, DispositionType, ExtendedValue,
    HeaderValue, TryIntoHeaderValue,
};
use actix_web::{web, HttpResponse};
use common::requests::BoxLabelRequest;
use log::{error, info};
use std::path::PathBuf;
use validator::Validate;

/// A rendered label document that has been written to the output directory.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub file_name: String,
    pub file_path: PathBuf,
    pub bytes: Vec<u8>,
    /// `Content-Disposition` value offering the document as a download.
    pub disposition: HeaderValue,
    /// Id of the record appended for this generation.
    pub record_id: i64,
}

/// Runs one label generation end to end. Shared by all workers as `web::Data`.
#[derive(Debug, Clone)]
pub struct LabelService {
    output: OutputDir,
    records: RecordStore,
}

impl LabelService {
    pub fn new(output: OutputDir, records: RecordStore) -> Self {
        Self { output, records }
    }

    pub fn generate(&self, request: &BoxLabelRequest) -> Result<GeneratedDocument, LabelError> {
        request
            .validate()
            .map_err(|e| LabelError::Validation(e.to_string()))?;

        let file_name = label_file_name(&request.vendor_name);
        // Resolved before any side effect so a bad header cannot follow a stored file.
        let disposition = attachment_for(&file_name)
            .try_into_value()
            .map_err(|e| LabelError::Validation(format!("unusable file name: {}", e)))?;
        info!(
            "Generating {} for vendor {:?}, case {:?}, {} box(es)",
            file_name, request.vendor_name, request.case_id, request.box_count
        );

        let bytes = render::render(request).map_err(|e| {
            error!(
                "PDF Generation Error for case {:?} (vendor {:?}): {}",
                request.case_id, request.vendor_name, e
            );
            LabelError::from(e)
        })?;

        let file_path = self.output.write(&file_name, &bytes).map_err(|e| {
            error!("PDF Generation Error writing {}: {}", file_name, e);
            LabelError::from(e)
        })?;
        info!("Multi-page PDF successfully created: {}", file_path.display());

        let record_id = self
            .records
            .insert(&file_name, &file_path.to_string_lossy(), request)
            .map_err(|e| {
                error!(
                    "Database error recording {} for case {:?}: {}",
                    file_path.display(),
                    request.case_id,
                    e
                );
                LabelError::from(e)
            })?;
        info!(
            "Multi-page PDF saved to database: {} (record {})",
            file_path.display(),
            record_id
        );

        Ok(GeneratedDocument {
            file_name,
            file_path,
            bytes,
            disposition,
            record_id,
        })
    }
}

/// Replaces spaces and slashes so the vendor name is usable as a file name.
pub fn sanitize_vendor_name(vendor_name: &str) -> String {
    vendor_name.replace([' ', '/'], "_")
}

/// `Box_Label_<sanitized vendor>.pdf`
pub fn label_file_name(vendor_name: &str) -> String {
    format!("Box_Label_{}.pdf", sanitize_vendor_name(vendor_name))
}

/// `attachment; filename="<file_name>"`.
///
/// Names with characters that cannot appear in a header (control characters,
/// non-ASCII text) get an ASCII fallback with those characters replaced by `_`,
/// plus the exact name as a UTF-8 `filename*` parameter.
pub fn attachment_for(file_name: &str) -> ContentDisposition {
    let plain = |c: char| c.is_ascii_graphic() || c == ' ';
    if file_name.chars().all(plain) {
        return ContentDisposition::attachment(file_name);
    }

    let fallback: String = file_name
        .chars()
        .map(|c| if plain(c) { c } else { '_' })
        .collect();
    ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![
            DispositionParam::Filename(fallback),
            DispositionParam::FilenameExt(ExtendedValue {
                charset: Charset::Ext("UTF-8".to_owned()),
                language_tag: None,
                value: file_name.as_bytes().to_vec(),
            }),
        ],
    }
}

/// Actix web handler for `POST /generate_box_label/`.
///
/// # Returns
/// - `200 OK` with the PDF as an attachment on success.
/// - `422 Unprocessable Entity` when a field breaks a validation rule.
/// - `500 Internal Server Error` with a `{"detail": ...}` body when rendering,
///   writing or recording fails.
pub async fn process(
    service: web::Data<LabelService>,
    payload: web::Json<BoxLabelRequest>,
) -> Result<HttpResponse, LabelError> {
    let request = payload.into_inner();
    let service = service.into_inner();

    let document = web::block(move || service.generate(&request))
        .await
        .map_err(|e| {
            error!("Label generation worker failed: {}", e);
            LabelError::Worker(e.to_string())
        })??;

    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header((header::CONTENT_DISPOSITION, document.disposition))
        .body(document.bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaces_and_slashes_become_underscores() {
        assert_eq!(sanitize_vendor_name("Acme Corp"), "Acme_Corp");
        assert_eq!(sanitize_vendor_name("Acme/West"), "Acme_West");
        assert_eq!(sanitize_vendor_name("a / b"), "a___b");
        assert_eq!(label_file_name("Acme Corp"), "Box_Label_Acme_Corp.pdf");
    }

    #[test]
    fn sanitizing_is_idempotent_and_total() {
        for name in ["", " ", "//", "Acme Corp/West Side", "Zoë & Co", "tab\tkept"] {
            let once = sanitize_vendor_name(name);
            assert_eq!(sanitize_vendor_name(&once), once);
            assert!(!once.contains(' ') && !once.contains('/'));
            assert!(!label_file_name(name).contains(['/', ' ']));
        }
    }

    #[test]
    fn plain_names_get_a_quoted_filename() {
        let value = attachment_for("Box_Label_Acme_Corp.pdf")
            .try_into_value()
            .unwrap();
        assert_eq!(value, "attachment; filename=\"Box_Label_Acme_Corp.pdf\"");
    }

    #[test]
    fn control_characters_fall_back_to_extended_filename() {
        let name = label_file_name("Acme\nCorp");
        let value = attachment_for(&name).try_into_value().unwrap();
        let value = value.to_str().unwrap();
        assert!(value.starts_with("attachment; "));
        assert!(value.contains("filename=\"Box_Label_Acme_Corp.pdf\""));
        assert!(value.contains("filename*=UTF-8''"));
        assert!(!value.contains('\n'));
    }

    #[test]
    fn colliding_vendors_share_a_file_name() {
        assert_eq!(label_file_name("Acme/West"), label_file_name("Acme West"));
    }
}
