//! Error types for the quote-forge pipeline.
//!
//! Only serialization and configuration problems surface as errors. Markdown
//! that does not parse, malformed frontmatter and missing assets all degrade
//! silently (with a `log::warn!` where useful) instead.

use std::io;
use thiserror::Error;

/// Result type alias for quote-forge operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Errors surfaced at the export boundary.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The PDF could not be serialized. No partial output is produced.
    #[error("PDF rendering failed: {0}")]
    Render(String),

    /// Font bytes could not be parsed as a TTF/OTF face.
    #[error("Font error: {0}")]
    Font(String),

    /// A template violates one of its invariants (bad color token, zero
    /// validity period, ...).
    #[error("Invalid template: {0}")]
    Template(String),

    /// I/O error when reading inputs or writing the output file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A template or layout JSON document could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
