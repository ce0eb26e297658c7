//! # quote-forge – Markdown quotes → branded PDF documents
//!
//! The pipeline stages are:
//!
//! 1. **Frontmatter** – split off cover-page metadata ([`frontmatter`])
//! 2. **Parse** – Markdown dialect → content blocks ([`markdown`], [`inline`])
//! 3. **Style** – template → flat style map ([`style`])
//! 4. **Paginate** – measure, group and flow blocks onto pages ([`layout`],
//!    [`regions`], [`pagination`])
//! 5. **Render** – emit PDF bytes via printpdf ([`render`]) or an HTML
//!    preview ([`preview`])
//!
//! [`pipeline`] runs all of them for one [`ExportJob`].

pub mod assets;
pub mod catalog;
pub mod document;
pub mod error;
pub mod fonts;
pub mod frontmatter;
pub mod inline;
pub mod layout;
pub mod markdown;
pub mod page;
pub mod pagination;
pub mod pipeline;
pub mod preview;
pub mod regions;
pub mod render;
pub mod style;
pub mod template;

// Re-exports for convenience
pub use document::{CaseStudyRef, ContentBlock, CoverPageData, RichText, Span};
pub use error::{ExportError, Result};
pub use page::{Page, PageKind};
pub use pipeline::{compute_pages, generate_html, generate_pdf, Export, ExportJob};
pub use template::{ExportConfig, Orientation, PageSize, Quality, TemplateConfig};

#[cfg(feature = "async")]
pub use pipeline::generate_pdf_async;
