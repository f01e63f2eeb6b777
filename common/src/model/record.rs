use crate::requests::BoxLabelRequest;
use serde::{Deserialize, Serialize};

/// One row of the `generated_pdfs` table.
///
/// A record is appended for every successful generation and never updated.
/// Several records may point at the same `file_path` when vendors share a
/// sanitized name, since the newest generation overwrites the file on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Surrogate key assigned by the store.
    pub id: i64,
    pub file_name: String,
    pub file_path: String,
    /// Insert timestamp as written by the database (`YYYY-MM-DD HH:MM:SS`, UTC).
    pub created_at: String,
    /// Copy of the request the document was generated from.
    #[serde(flatten)]
    pub label: BoxLabelRequest,
}
