//! # Record Store
//!
//! Append-only log of generated documents, kept in the `generated_pdfs` table
//! of a SQLite file. The store only knows the file location (`DatabaseConfig`)
//! and opens a fresh connection for each operation, so it can be shared
//! between request workers without locking.
//!
//! `initialize` must run once at startup; it is idempotent.

use crate::config::DatabaseConfig;
use common::model::record::DocumentRecord;
use common::requests::BoxLabelRequest;
use rusqlite::{params, Connection};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS generated_pdfs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    file_name TEXT NOT NULL,
    file_path TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    vendor_name TEXT,
    po_number TEXT,
    store_code TEXT,
    delivery_date TEXT,
    sku_barcode TEXT,
    quantity INTEGER,
    case_id TEXT,
    box_count INTEGER,
    area_code TEXT
)";

#[derive(Debug, Clone)]
pub struct RecordStore {
    config: DatabaseConfig,
}

impl RecordStore {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }

    fn connect(&self) -> rusqlite::Result<Connection> {
        Connection::open(&self.config.path)
    }

    /// Creates the `generated_pdfs` table when missing.
    pub fn initialize(&self) -> rusqlite::Result<()> {
        let conn = self.connect()?;
        conn.execute(CREATE_TABLE, [])?;
        Ok(())
    }

    /// Appends a record for a generated file and returns its id.
    pub fn insert(
        &self,
        file_name: &str,
        file_path: &str,
        label: &BoxLabelRequest,
    ) -> rusqlite::Result<i64> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO generated_pdfs
             (file_name, file_path, vendor_name, po_number, store_code, delivery_date,
              sku_barcode, quantity, case_id, box_count, area_code)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                file_name,
                file_path,
                &label.vendor_name,
                &label.po_number,
                &label.store_code,
                &label.delivery_date,
                &label.sku_barcode,
                label.quantity,
                &label.case_id,
                label.box_count,
                &label.area_code,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Returns every record, oldest first.
    ///
    /// No route reads records back; this serves inspection from tests.
    pub fn records(&self) -> rusqlite::Result<Vec<DocumentRecord>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, file_name, file_path, created_at, vendor_name, po_number, store_code,
                    delivery_date, sku_barcode, quantity, case_id, box_count, area_code
             FROM generated_pdfs ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(DocumentRecord {
                id: row.get(0)?,
                file_name: row.get(1)?,
                file_path: row.get(2)?,
                created_at: row.get(3)?,
                label: BoxLabelRequest {
                    vendor_name: row.get(4)?,
                    po_number: row.get(5)?,
                    store_code: row.get(6)?,
                    delivery_date: row.get(7)?,
                    sku_barcode: row.get(8)?,
                    quantity: row.get(9)?,
                    case_id: row.get(10)?,
                    box_count: row.get(11)?,
                    area_code: row.get(12)?,
                },
            })
        })?;
        rows.collect()
    }
}
