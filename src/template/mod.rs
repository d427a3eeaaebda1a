//! Document template engine.
//!
//! Holds the template catalog, renders templates from `{{key}}` bindings and
//! packages the result for export.

mod catalog;
mod export;
mod render;

pub use catalog::{DocumentTemplate, TemplateCatalog, COMPLETION_REPORT_ID, LEASE_AGREEMENT_ID};
pub use export::{
    export_document, DirectoryExporter, DocumentSink, ExportedDocument, MemoryExporter,
    TEXT_MEDIA_TYPE,
};
pub use render::{placeholder, placeholders, render_content, DocumentVariable, RenderedDocument};
