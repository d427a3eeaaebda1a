//! Document export boundary.
//!
//! Rendering produces plain text. Exporting packages that text as a named
//! byte payload and hands it to a [`DocumentSink`]; where the bytes end up
//! (a directory, memory, a browser download) is the sink's business.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::Serialize;

use crate::error::FanisiResult;

/// Media type of exported documents.
pub const TEXT_MEDIA_TYPE: &str = "text/plain";

/// A packaged document ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedDocument {
    /// Suggested file name
    pub filename: String,

    /// Media type of `bytes`
    pub media_type: &'static str,

    /// Document payload
    #[serde(skip)]
    pub bytes: Vec<u8>,

    /// Where the sink stored it, if on disk
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Package rendered text under a filename.
pub fn export_document(content: &str, filename: &str) -> ExportedDocument {
    ExportedDocument {
        filename: filename.to_string(),
        media_type: TEXT_MEDIA_TYPE,
        bytes: content.as_bytes().to_vec(),
        path: None,
    }
}

/// Destination for exported documents.
pub trait DocumentSink: Send + Sync {
    /// Save the content under `filename`.
    fn save(&self, content: &str, filename: &str) -> FanisiResult<ExportedDocument>;
}

/// Writes documents into a directory.
#[derive(Debug, Clone)]
pub struct DirectoryExporter {
    dir: PathBuf,
}

impl DirectoryExporter {
    /// Export into `dir`, creating it on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DocumentSink for DirectoryExporter {
    fn save(&self, content: &str, filename: &str) -> FanisiResult<ExportedDocument> {
        // Only the final component is honoured so a filename cannot escape the directory.
        let name = Path::new(filename)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document.txt".to_string());

        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(&name);
        std::fs::write(&path, content)?;
        tracing::debug!(path = %path.display(), "Exported document");

        let mut doc = export_document(content, &name);
        doc.path = Some(path);
        Ok(doc)
    }
}

/// Keeps exported documents in memory.
#[derive(Debug, Default)]
pub struct MemoryExporter {
    documents: Mutex<Vec<ExportedDocument>>,
}

impl MemoryExporter {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything saved so far.
    pub fn documents(&self) -> Vec<ExportedDocument> {
        self.documents.lock().clone()
    }
}

impl DocumentSink for MemoryExporter {
    fn save(&self, content: &str, filename: &str) -> FanisiResult<ExportedDocument> {
        let doc = export_document(content, filename);
        self.documents.lock().push(doc.clone());
        Ok(doc)
    }
}
