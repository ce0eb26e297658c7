//! Integration tests for the quote-forge pipeline.
//!
//! These tests validate:
//! - Cover, header, body, footer and showcase pages come out as expected
//! - PDF output exists and has valid format
//! - Layout and PDF bytes are deterministic for fixed input
//! - The HTML preview escapes text and mirrors the PDF regions

use std::path::PathBuf;

use sha2::{Digest, Sha256};

use quote_forge::catalog;
use quote_forge::document::Span;
use quote_forge::markdown::parse_blocks;
use quote_forge::page::{pages_to_json, BreakClass, PageKind};
use quote_forge::render::{render_page_ops, RenderResources};
use quote_forge::template::sample_document;
use quote_forge::{compute_pages, generate_html, generate_pdf, ContentBlock, ExportJob, RichText};

// =====================================================================
// Helper
// =====================================================================

fn assert_valid_pdf(bytes: &[u8]) {
    assert!(bytes.len() > 100, "PDF too small: {} bytes", bytes.len());
    assert_eq!(&bytes[0..5], b"%PDF-", "Missing PDF header");
}

fn job_with_footer(show_footer: bool) -> ExportJob {
    let mut job = ExportJob::default();
    job.template.show_footer = show_footer;
    job
}

// =====================================================================
// End to end
// =====================================================================

#[test]
fn cover_then_body_page() {
    let src = "---\ntitle: Test Quote\n---\n## Summary\nHello **world**.";
    let export = generate_pdf(src, ExportJob::default()).unwrap();
    assert_valid_pdf(&export.pdf);

    let kinds: Vec<_> = export.pages.iter().map(|p| p.kind).collect();
    assert_eq!(kinds, [PageKind::Cover, PageKind::Body]);

    let body = &export.pages[1];
    let unit = &body.blocks[0];
    assert_eq!(unit.class, BreakClass::HeadingWithParagraph);
    assert_eq!(
        unit.blocks,
        vec![
            ContentBlock::Heading {
                level: 2,
                text: RichText::from("Summary"),
            },
            ContentBlock::Paragraph {
                text: RichText::new(vec![
                    Span::plain("Hello "),
                    Span::bold("world"),
                    Span::plain("."),
                ]),
            },
        ]
    );
    assert!(body.text_lines().iter().any(|l| l == "Hello world."));
}

#[test]
fn cover_only_document_is_one_page() {
    let pages = compute_pages("---\ntitle: Only a cover\n---\n", &ExportJob::default());
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].kind, PageKind::Cover);
    assert!(pages[0].footer.is_none());
}

#[test]
fn sample_document_renders() {
    let mut job = ExportJob::default();
    job.case_studies = catalog::by_ids(&catalog::default_ids());
    let export = generate_pdf(sample_document(), job).unwrap();
    assert_valid_pdf(&export.pdf);
    assert!(export.pages.len() >= 3);
    assert_eq!(export.pages[0].kind, PageKind::Cover);
    assert_eq!(export.pages.last().unwrap().kind, PageKind::Showcase);
}

// =====================================================================
// Regions
// =====================================================================

#[test]
fn header_only_without_cover() {
    let pages = compute_pages("Just a paragraph.", &ExportJob::default());
    assert_eq!(pages[0].blocks[0].class, BreakClass::Header);
    assert!(pages[0].text_lines().iter().any(|l| l == "BrokenRubik Inc."));

    let pages = compute_pages("---\ntitle: Cover\n---\nJust a paragraph.", &ExportJob::default());
    let body = &pages[1];
    assert!(body.blocks.iter().all(|b| b.class != BreakClass::Header));
}

#[test]
fn footer_on_every_body_page_iff_enabled() {
    let long: String = (0..60)
        .map(|i| format!("Paragraph {i} with enough text to take up some vertical space on the page.\n\n"))
        .collect();

    let pages = compute_pages(&long, &job_with_footer(true));
    assert!(pages.len() > 1, "expected multiple pages, got {}", pages.len());
    assert!(pages.iter().all(|p| p.footer.is_some()));

    let pages = compute_pages(&long, &job_with_footer(false));
    assert!(pages.iter().all(|p| p.footer.is_none()));
}

#[test]
fn showcase_entries_are_numbered_and_never_split() {
    let mut job = ExportJob::default();
    job.case_studies = catalog::all();
    let pages = compute_pages("Intro.", &job);

    let showcase: Vec<_> = pages.iter().filter(|p| p.kind == PageKind::Showcase).collect();
    assert!(!showcase.is_empty());

    let entries: Vec<_> = showcase
        .iter()
        .flat_map(|p| p.blocks.iter())
        .filter(|b| b.class == BreakClass::ShowcaseEntry)
        .collect();
    assert_eq!(entries.len(), job.case_studies.len());
    assert!(entries.iter().all(|e| !e.continued));

    let lines: Vec<String> = showcase.iter().flat_map(|p| p.text_lines()).collect();
    assert!(lines.iter().any(|l| l == "01"));
    assert!(lines.iter().any(|l| l == "21"));
}

#[test]
fn no_case_studies_no_showcase() {
    let pages = compute_pages("Intro.", &ExportJob::default());
    assert!(pages.iter().all(|p| p.kind != PageKind::Showcase));
}

// =====================================================================
// Pagination
// =====================================================================

#[test]
fn list_stays_together() {
    let mut src: String = (0..38).map(|i| format!("Filler line {i}\n\n")).collect();
    src.push_str("- one\n- two\n- three\n- four\n- five\n");
    let pages = compute_pages(&src, &ExportJob::default());

    let lists: Vec<_> = pages
        .iter()
        .flat_map(|p| p.blocks.iter())
        .filter(|b| b.class == BreakClass::List)
        .collect();
    assert_eq!(lists.len(), 1, "list must not be split");
}

#[test]
fn single_paragraph_fits_one_page() {
    assert_eq!(compute_pages("Short", &ExportJob::default()).len(), 1);
}

// =====================================================================
// Golden-sample stability test
// =====================================================================

fn layout_hash(src: &str) -> String {
    let mut job = ExportJob::default();
    job.case_studies = catalog::by_ids(&["klim-b2b", "amp-tab"]);
    let json = pages_to_json(&compute_pages(src, &job)).unwrap();
    format!("{:x}", Sha256::digest(json.as_bytes()))
}

fn golden_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("golden")
        .join(name)
}

/// Compare `actual` with the digest stored in `tests/golden/<name>`. The file
/// is written when it does not exist yet or when `UPDATE_GOLDEN` is set.
fn assert_golden_digest(name: &str, actual: &str) {
    let path = golden_path(name);
    if std::env::var_os("UPDATE_GOLDEN").is_some() || !path.exists() {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, format!("{actual}\n")).unwrap();
        eprintln!("recorded golden digest {}", path.display());
        return;
    }
    let expected = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        actual,
        expected.trim(),
        "layout of the sample document changed; rerun with UPDATE_GOLDEN=1 if intended"
    );
}

#[test]
fn sample_layout_matches_golden_digest() {
    let digest = layout_hash(sample_document());
    assert_eq!(digest, layout_hash(sample_document()));
    assert_golden_digest("sample_layout.sha256", &digest);
}

#[test]
fn pdf_bytes_are_identical_for_identical_input() {
    let mut job = ExportJob::default();
    job.case_studies = catalog::by_ids(&catalog::default_ids());
    job.export.issued_on = chrono::NaiveDate::from_ymd_opt(2026, 1, 15);

    let a = generate_pdf(sample_document(), job.clone()).unwrap();
    let b = generate_pdf(sample_document(), job).unwrap();
    assert_valid_pdf(&a.pdf);
    assert!(a.pdf == b.pdf, "two exports of the same input differ");

    let trailer = String::from_utf8_lossy(&a.pdf[a.pdf.len().saturating_sub(400)..]).into_owned();
    assert!(trailer.contains("/ID"), "trailer should still carry a document id");
}

#[test]
fn page_ops_are_deterministic() {
    let job = ExportJob::default();
    let a = compute_pages(sample_document(), &job);
    let b = compute_pages(sample_document(), &job);
    let resources = RenderResources::default();
    for (pa, pb) in a.iter().zip(&b) {
        assert_eq!(
            format!("{:?}", render_page_ops(pa, &resources)),
            format!("{:?}", render_page_ops(pb, &resources))
        );
    }
}

// =====================================================================
// Preview
// =====================================================================

#[test]
fn preview_escapes_and_matches_blocks() {
    let src = "## Costs & <fees>\n\n| Item | Price |\n|---|---|\n| Build | $1 |";
    let html = generate_html(src, &ExportJob::default());
    assert!(html.contains("Costs &amp; &lt;fees&gt;"));
    assert!(html.contains("<table"));
    assert!(html.contains("<header"));
    assert_eq!(parse_blocks(src).len(), 2);
}
