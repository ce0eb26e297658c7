//! Pipeline – ties together parsing, styling, pagination and rendering into a
//! single function call.

use crate::assets::{prepare_logo, AssetLoader};
use crate::document::{CaseStudyRef, ContentBlock, CoverPageData};
use crate::error::Result;
use crate::fonts::{FontAsset, FontManager};
use crate::frontmatter::extract_cover;
use crate::markdown::parse_blocks;
use crate::page::Page;
use crate::pagination::paginate;
use crate::preview::render_html;
use crate::render::render_pdf;
use crate::style::resolve_styles;
use crate::template::{ExportConfig, TemplateConfig};

/// Everything one export needs. Owned, so later edits to the caller's
/// template do not affect an export in flight.
#[derive(Debug, Clone, Default)]
pub struct ExportJob {
    pub template: TemplateConfig,
    pub export: ExportConfig,
    pub case_studies: Vec<CaseStudyRef>,
    /// Raw logo bytes. Falls back to the template's `logoUrl` when loaded
    /// through [`ExportJob::load_logo`].
    pub logo: Option<Vec<u8>>,
    pub fonts: Vec<FontAsset>,
}

impl ExportJob {
    pub fn new(template: TemplateConfig, export: ExportConfig) -> Self {
        Self {
            template,
            export,
            ..Self::default()
        }
    }

    /// Fill `logo` from the template's logo location when none was given.
    pub fn load_logo(&mut self, loader: &impl AssetLoader) {
        if self.logo.is_none() && !self.template.logo_url.trim().is_empty() {
            self.logo = loader.load(&self.template.logo_url);
        }
    }

    fn font_manager(&self) -> FontManager {
        let mut fonts = FontManager::default();
        fonts.load_assets(&self.fonts);
        fonts
    }
}

/// Result of a successful export.
#[derive(Debug, Clone)]
pub struct Export {
    pub pdf: Vec<u8>,
    pub pages: Vec<Page>,
}

/// Parsed input text: optional cover data and the body blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    pub cover: Option<CoverPageData>,
    pub blocks: Vec<ContentBlock>,
}

pub fn parse_document(markdown: &str) -> ParsedDocument {
    let (cover, body) = extract_cover(markdown);
    let blocks = parse_blocks(body);
    log::debug!(
        "Parsed {} block(s), cover: {}",
        blocks.len(),
        cover.as_ref().is_some_and(CoverPageData::has_title)
    );
    ParsedDocument { cover, blocks }
}

fn pages_for(doc: &ParsedDocument, job: &ExportJob, fonts: &FontManager) -> Vec<Page> {
    let styles = resolve_styles(&job.template);
    paginate(
        &doc.blocks,
        doc.cover.as_ref(),
        &job.case_studies,
        &styles,
        &job.export,
        fonts,
    )
}

/// Generate only the page layout (no PDF rendering) – useful for testing.
pub fn compute_pages(markdown: &str, job: &ExportJob) -> Vec<Page> {
    pages_for(&parse_document(markdown), job, &job.font_manager())
}

/// Full pipeline: markdown → PDF bytes plus the pages they were drawn from.
pub fn generate_pdf(markdown: &str, job: ExportJob) -> Result<Export> {
    let fonts = job.font_manager();
    let doc = parse_document(markdown);
    let pages = pages_for(&doc, &job, &fonts);

    let logo = job
        .logo
        .as_deref()
        .and_then(|bytes| prepare_logo(bytes, job.export.quality));
    let styles = resolve_styles(&job.template);
    let pdf = render_pdf(&pages, &styles, logo.as_deref(), &fonts)?;

    log::info!(
        "Exported {} ({} page(s), {} bytes)",
        job.export.output_filename(),
        pages.len(),
        pdf.len()
    );
    Ok(Export { pdf, pages })
}

/// HTML preview of the same document.
pub fn generate_html(markdown: &str, job: &ExportJob) -> String {
    let doc = parse_document(markdown);
    let styles = resolve_styles(&job.template);
    render_html(&doc.blocks, doc.cover.as_ref(), &styles, &job.export)
}

/// [`generate_pdf`], loading the logo without blocking first.
#[cfg(feature = "async")]
pub async fn generate_pdf_async(
    markdown: String,
    mut job: ExportJob,
    loader: crate::assets::FsAssetLoader,
) -> Result<Export> {
    if job.logo.is_none() && !job.template.logo_url.trim().is_empty() {
        job.logo = crate::assets::load_asset_async(&loader, &job.template.logo_url).await;
    }
    tokio::task::spawn_blocking(move || generate_pdf(&markdown, job))
        .await
        .map_err(|e| crate::error::ExportError::Render(format!("export task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::PageKind;

    #[test]
    fn generate_pdf_minimal() {
        let export = generate_pdf("Hello, world!", ExportJob::default()).expect("pipeline should succeed");
        assert!(!export.pdf.is_empty());
        assert_eq!(&export.pdf[0..5], b"%PDF-");
        assert_eq!(export.pages.len(), 1);
    }

    #[test]
    fn empty_input_gives_one_page() {
        let pages = compute_pages("", &ExportJob::default());
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].kind, PageKind::Body);
    }

    #[test]
    fn cover_comes_from_frontmatter() {
        let doc = parse_document("---\ntitle: Hi\n---\nBody");
        assert_eq!(doc.cover.map(|c| c.title), Some("Hi".to_string()));
        assert_eq!(doc.blocks.len(), 1);
    }

    #[test]
    fn bad_logo_still_exports() {
        let job = ExportJob {
            logo: Some(b"garbage".to_vec()),
            ..ExportJob::default()
        };
        let export = generate_pdf("---\ntitle: Cover\n---\n", job).unwrap();
        assert_eq!(export.pages[0].kind, PageKind::Cover);
        assert_eq!(&export.pdf[0..5], b"%PDF-");
    }

    #[test]
    fn logo_falls_back_to_template_location() {
        struct Fixed;
        impl AssetLoader for Fixed {
            fn load(&self, location: &str) -> Option<Vec<u8>> {
                Some(location.as_bytes().to_vec())
            }
        }
        let mut job = ExportJob::default();
        job.template.logo_url = "logo.png".into();
        job.load_logo(&Fixed);
        assert_eq!(job.logo.as_deref(), Some(&b"logo.png"[..]));
    }

    #[test]
    fn sample_document_exports() {
        let mut job = ExportJob::default();
        job.case_studies = crate::catalog::by_ids(&crate::catalog::default_ids());
        job.export.quote_number = job.template.quote_number(1);
        let export = generate_pdf(crate::template::sample_document(), job).unwrap();
        assert_eq!(export.pages[0].kind, PageKind::Cover);
        assert_eq!(export.pages.last().map(|p| p.kind), Some(PageKind::Showcase));
    }
}
