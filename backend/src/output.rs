//! File-system side of label generation: the directory that receives the
//! generated PDFs.
//!
//! Files are written through a temporary file in the same directory and then
//! renamed onto their final name, so a reader never sees a half-written PDF.
//! Two requests targeting the same name simply replace one another.

use log::{error, info};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Debug, Clone)]
pub struct OutputDir {
    path: PathBuf,
}

/// Outcome of a cleanup run.
#[derive(Debug, Default)]
pub struct PurgeReport {
    pub deleted: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, io::Error)>,
}

impl OutputDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the directory (and parents) when it does not exist yet.
    pub fn ensure(&self) -> io::Result<()> {
        fs::create_dir_all(&self.path)
    }

    pub fn file_path(&self, file_name: &str) -> PathBuf {
        self.path.join(file_name)
    }

    /// Stores `bytes` under `file_name`, replacing any previous file.
    pub fn write(&self, file_name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        self.ensure()?;
        let target = self.file_path(file_name);

        let mut tmp = NamedTempFile::new_in(&self.path)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&target).map_err(|e| e.error)?;

        Ok(target)
    }

    /// Deletes every `*.pdf` file directly inside the directory.
    ///
    /// A failure on one file is recorded and the sweep goes on.
    pub fn purge_pdfs(&self) -> io::Result<PurgeReport> {
        let mut report = PurgeReport::default();
        if !self.path.is_dir() {
            return Ok(report);
        }

        for entry in fs::read_dir(&self.path)? {
            let path = entry?.path();
            let is_pdf = path
                .extension()
                .map(|ext| ext == "pdf")
                .unwrap_or(false);
            if !is_pdf || !path.is_file() {
                continue;
            }
            match fs::remove_file(&path) {
                Ok(()) => {
                    info!("Deleted: {}", path.display());
                    report.deleted.push(path);
                }
                Err(e) => {
                    error!("Error deleting {}: {}", path.display(), e);
                    report.failed.push((path, e));
                }
            }
        }

        Ok(report)
    }
}
