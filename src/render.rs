//! PDF renderer – takes laid-out [`Page`]s and produces PDF bytes using
//! `printpdf` (v0.8 ops-based API).
//!
//! Colors arrive as template tokens and are resolved here. Embedded fonts and
//! the logo are registered once per document; anything that fails to load is
//! replaced by a builtin font or an empty placeholder box.

use std::collections::HashMap;

use printpdf::*;
use sha2::{Digest, Sha256};

use crate::error::{ExportError, Result};
use crate::fonts::{FontKey, FontManager};
use crate::page::{Element, ImageSlot, Page, TextRun};
use crate::style::{Color as TokenColor, StyleMap};

const PT_TO_MM: f32 = 0.352778;

/// Outline of the box drawn where the logo would go.
const PLACEHOLDER_STROKE: &str = "#94a3b8";

/// A printpdf XObject together with the pixel dimensions of the source image.
struct ImageResource {
    xobj_id: XObjectId,
    px_width: u32,
    px_height: u32,
}

/// Document-level resources shared by every page.
#[derive(Default)]
pub struct RenderResources {
    fonts: HashMap<FontKey, FontId>,
    logo: Option<ImageResource>,
}

impl RenderResources {
    /// Register the logo and embedded fonts with `doc`, degrading on failure.
    fn register(doc: &mut PdfDocument, logo: Option<&[u8]>, fonts: &FontManager) -> Self {
        let mut resources = Self::default();
        let mut warnings: Vec<PdfWarnMsg> = Vec::new();

        if let Some(bytes) = logo {
            resources.logo = register_image(doc, bytes, &mut warnings);
        }

        // printpdf's `add_font`/`add_image` draw random ids, which end up as
        // resource names in the file. Numbered ids keep the output stable.
        for (n, (key, bytes)) in fonts.embedded().into_iter().enumerate() {
            match ParsedFont::from_bytes(bytes, 0, &mut warnings) {
                Some(parsed) => {
                    let id = FontId(format!("F{}", n + 1));
                    doc.resources.fonts.map.insert(id.clone(), parsed);
                    resources.fonts.insert(key.clone(), id);
                }
                None => log::warn!(
                    "Font {} could not be embedded, falling back to a builtin face",
                    key.family
                ),
            }
        }
        resources
    }
}

fn register_image(
    doc: &mut PdfDocument,
    bytes: &[u8],
    warnings: &mut Vec<PdfWarnMsg>,
) -> Option<ImageResource> {
    // Decode with the `image` crate to obtain pixel dimensions.
    let dyn_img = match ::image::load_from_memory(bytes) {
        Ok(img) => img,
        Err(e) => {
            log::warn!("Skipping logo — decode error: {e}");
            return None;
        }
    };
    let raw = match RawImage::decode_from_bytes(bytes, warnings) {
        Ok(r) => r,
        Err(e) => {
            log::warn!("Skipping logo — PDF encode error: {e}");
            return None;
        }
    };
    let xobj_id = XObjectId("Logo".to_string());
    doc.resources
        .xobjects
        .map
        .insert(xobj_id.clone(), XObject::Image(raw));
    Some(ImageResource {
        xobj_id,
        px_width: dyn_img.width(),
        px_height: dyn_img.height(),
    })
}

/// Render pages into PDF bytes.
///
/// Fails only when there is nothing valid to render: an empty page list or
/// a page with non-finite or non-positive dimensions.
pub fn render_pdf(
    pages: &[Page],
    styles: &StyleMap,
    logo: Option<&[u8]>,
    fonts: &FontManager,
) -> Result<Vec<u8>> {
    if pages.is_empty() {
        return Err(ExportError::Render("no pages to render".into()));
    }
    if let Some(bad) = pages.iter().find(|p| !valid_dimension(p.width_pt) || !valid_dimension(p.height_pt)) {
        return Err(ExportError::Render(format!(
            "page {} has invalid dimensions {}x{}pt",
            bad.index, bad.width_pt, bad.height_pt
        )));
    }

    let title = match styles.identity.company_name.trim() {
        "" => "Quote",
        name => name,
    };
    let mut doc = PdfDocument::new(title);
    let resources = RenderResources::register(&mut doc, logo, fonts);

    let pdf_pages: Vec<PdfPage> = pages
        .iter()
        .map(|page| {
            PdfPage::new(
                Mm(page.width_pt * PT_TO_MM),
                Mm(page.height_pt * PT_TO_MM),
                render_page_ops(page, &resources),
            )
        })
        .collect();

    doc.with_pages(pdf_pages);
    let mut bytes = doc.save(&PdfSaveOptions::default(), &mut Vec::new());
    pin_document_id(&mut bytes);
    log::debug!("Rendered {} page(s), {} bytes", pages.len(), bytes.len());
    Ok(bytes)
}

fn valid_dimension(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

/// Replace the random strings of the trailer `/ID` array with characters of
/// a SHA-256 over the rest of the file. The strings keep their length, so no
/// byte offset in the cross-reference table moves.
fn pin_document_id(bytes: &mut [u8]) {
    let Some(start) = bytes.windows(4).rposition(|w| w == b"/ID[") else {
        log::debug!("No trailer /ID found, leaving the document id as written");
        return;
    };
    let Some(len) = bytes[start..].iter().position(|&b| b == b']') else {
        return;
    };
    let id = start..start + len;

    let mut hasher = Sha256::new();
    hasher.update(&bytes[..id.start]);
    hasher.update(&bytes[id.end..]);
    let digest = format!("{:X}", hasher.finalize());
    let mut fill = digest.bytes().cycle();

    let mut inside = false;
    for b in &mut bytes[id] {
        match *b {
            b'(' | b'<' => inside = true,
            b')' | b'>' => inside = false,
            _ if inside => {
                if let Some(c) = fill.next() {
                    *b = c;
                }
            }
            _ => {}
        }
    }
}

/// Drawing operations for one page. Pure: the same page and resources always
/// give the same ops.
pub fn render_page_ops(page: &Page, resources: &RenderResources) -> Vec<Op> {
    let mut ops = Vec::new();
    let h = page.height_pt;

    if let Some(bg) = page.background.as_deref() {
        let color = TokenColor::resolve(bg);
        if color != TokenColor::WHITE {
            fill_rect(&mut ops, 0.0, 0.0, page.width_pt, h, color, h);
        }
    }

    for element in page.elements() {
        match element {
            Element::Rect {
                x,
                y,
                width,
                height,
                fill,
            } => fill_rect(&mut ops, *x, *y, *width, *height, TokenColor::resolve(fill), h),
            Element::Line {
                x1,
                y1,
                x2,
                y2,
                width,
                color,
            } => stroke_path(
                &mut ops,
                &[(*x1, *y1), (*x2, *y2)],
                false,
                *width,
                TokenColor::resolve(color),
                h,
            ),
            Element::Text { baseline, runs } => {
                for run in runs {
                    render_run(&mut ops, run, *baseline, h, resources);
                }
            }
            Element::Image {
                x,
                y,
                width,
                height,
                slot: ImageSlot::Logo,
            } => render_logo(&mut ops, *x, *y, *width, *height, h, resources),
        }
    }
    ops
}

fn pdf_color(c: TokenColor) -> printpdf::Color {
    printpdf::Color::Rgb(Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
        icc_profile: None,
    })
}

fn point(x: f32, y: f32) -> LinePoint {
    LinePoint {
        p: Point { x: Pt(x), y: Pt(y) },
        bezier: false,
    }
}

/// Filled rectangle; `y` is the top edge in layout coordinates.
fn fill_rect(ops: &mut Vec<Op>, x: f32, y: f32, width: f32, height: f32, color: TokenColor, page_h: f32) {
    if color.is_transparent() || width <= 0.0 || height <= 0.0 {
        return;
    }
    // PDF coordinate system: origin at bottom-left.
    let top = page_h - y;
    let bottom = top - height;
    ops.push(Op::SetFillColor {
        col: pdf_color(color),
    });
    ops.push(Op::DrawPolygon {
        polygon: Polygon {
            rings: vec![PolygonRing {
                points: vec![
                    point(x, bottom),
                    point(x + width, bottom),
                    point(x + width, top),
                    point(x, top),
                ],
            }],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        },
    });
}

fn stroke_path(
    ops: &mut Vec<Op>,
    points: &[(f32, f32)],
    closed: bool,
    thickness: f32,
    color: TokenColor,
    page_h: f32,
) {
    if color.is_transparent() || thickness <= 0.0 {
        return;
    }
    ops.push(Op::SetOutlineColor {
        col: pdf_color(color),
    });
    ops.push(Op::SetOutlineThickness { pt: Pt(thickness) });
    ops.push(Op::DrawLine {
        line: Line {
            points: points.iter().map(|&(x, y)| point(x, page_h - y)).collect(),
            is_closed: closed,
        },
    });
}

fn builtin_font(key: &FontKey) -> BuiltinFont {
    match (key.is_mono(), key.bold, key.italic) {
        (true, true, true) => BuiltinFont::CourierBoldOblique,
        (true, true, false) => BuiltinFont::CourierBold,
        (true, false, true) => BuiltinFont::CourierOblique,
        (true, false, false) => BuiltinFont::Courier,
        (false, true, true) => BuiltinFont::HelveticaBoldOblique,
        (false, true, false) => BuiltinFont::HelveticaBold,
        (false, false, true) => BuiltinFont::HelveticaOblique,
        (false, false, false) => BuiltinFont::Helvetica,
    }
}

fn render_run(ops: &mut Vec<Op>, run: &TextRun, baseline: f32, page_h: f32, resources: &RenderResources) {
    if run.text.is_empty() {
        return;
    }
    if let Some(bg) = &run.background {
        // Highlight box from just above the cap height to below the baseline.
        let top = baseline - run.size * 0.85;
        fill_rect(ops, run.x - 1.5, top, run.width + 3.0, run.size * 1.1, TokenColor::resolve(bg), page_h);
    }

    ops.push(Op::StartTextSection);
    ops.push(Op::SetTextCursor {
        pos: Point {
            x: Pt(run.x),
            y: Pt(page_h - baseline),
        },
    });
    ops.push(Op::SetFillColor {
        col: pdf_color(TokenColor::resolve(&run.color)),
    });
    match resources.fonts.get(&run.font) {
        Some(font) => {
            ops.push(Op::SetFontSize {
                size: Pt(run.size),
                font: font.clone(),
            });
            ops.push(Op::WriteText {
                items: vec![TextItem::Text(run.text.clone())],
                font: font.clone(),
            });
        }
        None => {
            ops.push(Op::SetFontSizeBuiltinFont {
                size: Pt(run.size),
                font: builtin_font(&run.font),
            });
            ops.push(Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(to_winlatin(&run.text))],
                font: builtin_font(&run.font),
            });
        }
    }
    ops.push(Op::EndTextSection);
}

/// Logo scaled to fit the slot, centred; an empty box when there is no logo.
fn render_logo(ops: &mut Vec<Op>, x: f32, y: f32, width: f32, height: f32, page_h: f32, resources: &RenderResources) {
    let Some(res) = resources.logo.as_ref().filter(|r| r.px_width > 0 && r.px_height > 0) else {
        let corners = [(x, y), (x + width, y), (x + width, y + height), (x, y + height)];
        stroke_path(ops, &corners, true, 0.75, TokenColor::resolve(PLACEHOLDER_STROKE), page_h);
        return;
    };

    // At dpi=72 printpdf renders 1 px = 1 pt, so scale = desired_pt / px_dim.
    let scale = f32::min(width / res.px_width as f32, height / res.px_height as f32);
    let draw_w = res.px_width as f32 * scale;
    let draw_h = res.px_height as f32 * scale;
    let left = x + (width - draw_w) / 2.0;
    let bottom = page_h - (y + (height + draw_h) / 2.0);

    ops.push(Op::UseXobject {
        id: res.xobj_id.clone(),
        transform: XObjectTransform {
            translate_x: Some(Pt(left)),
            translate_y: Some(Pt(bottom)),
            dpi: Some(72.0),
            scale_x: Some(scale),
            scale_y: Some(scale),
            rotate: None,
        },
    });
}

/// Convert a UTF-8 string to raw Windows-1252 bytes then wrap in a String so
/// printpdf writes the bytes unchanged into the PDF stream (builtin fonts use
/// WinAnsiEncoding, so each glyph is one byte 0x00–0xFF).
fn to_winlatin(s: &str) -> String {
    let bytes: Vec<u8> = s
        .chars()
        .map(|c| match c {
            '\u{20AC}' => 0x80, // euro
            '\u{2026}' => 0x85, // ellipsis
            '\u{2018}' => 0x91, // left single quote
            '\u{2019}' => 0x92, // right single quote
            '\u{201C}' => 0x93, // left double quote
            '\u{201D}' => 0x94, // right double quote
            '\u{2022}' => 0x95, // bullet
            '\u{2013}' => 0x96, // en-dash
            '\u{2014}' => 0x97, // em-dash
            '\u{2122}' => 0x99, // trademark
            '\u{00A0}' => 0x20, // non-breaking space -> space
            c if (c as u32) < 256 => c as u8,
            _ => b'?',
        })
        .collect();
    // SAFETY: intentionally non-UTF-8 for 0x80-0xFF; printpdf passes these
    // bytes straight to the PDF stream, decoded by WinAnsiEncoding.
    #[allow(unsafe_code)]
    unsafe {
        String::from_utf8_unchecked(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::PageKind;
    use crate::style::resolve_styles;
    use crate::template::TemplateConfig;

    fn styles() -> StyleMap {
        resolve_styles(&TemplateConfig::default())
    }

    #[test]
    fn render_blank_page() {
        let pages = vec![Page::new(PageKind::Body, 595.28, 841.89)];
        let bytes = render_pdf(&pages, &styles(), None, &FontManager::default()).unwrap();
        assert!(bytes.len() > 100, "PDF should have content");
        assert_eq!(&bytes[0..5], b"%PDF-");
    }

    #[test]
    fn empty_page_list_is_an_error() {
        let err = render_pdf(&[], &styles(), None, &FontManager::default());
        assert!(matches!(err, Err(ExportError::Render(_))));
    }

    #[test]
    fn invalid_dimensions_are_an_error() {
        let pages = vec![Page::new(PageKind::Body, f32::NAN, 841.89)];
        let err = render_pdf(&pages, &styles(), None, &FontManager::default());
        assert!(matches!(err, Err(ExportError::Render(_))));
    }

    #[test]
    fn undecodable_logo_draws_placeholder() {
        let mut page = Page::new(PageKind::Cover, 595.28, 841.89);
        page.decorations.push(Element::Image {
            x: 50.0,
            y: 50.0,
            width: 48.0,
            height: 48.0,
            slot: ImageSlot::Logo,
        });
        let bytes = render_pdf(
            std::slice::from_ref(&page),
            &styles(),
            Some(&b"definitely not an image"[..]),
            &FontManager::default(),
        )
        .unwrap();
        assert_eq!(&bytes[0..5], b"%PDF-");

        let ops = render_page_ops(&page, &RenderResources::default());
        assert!(ops.iter().any(|op| matches!(op, Op::DrawLine { .. })));
    }

    #[test]
    fn rendering_twice_gives_identical_bytes() {
        let mut png = Vec::new();
        ::image::DynamicImage::new_rgb8(4, 4)
            .write_to(&mut std::io::Cursor::new(&mut png), ::image::ImageFormat::Png)
            .unwrap();

        let mut page = Page::new(PageKind::Cover, 595.28, 841.89);
        page.decorations.push(Element::Image {
            x: 50.0,
            y: 50.0,
            width: 48.0,
            height: 48.0,
            slot: ImageSlot::Logo,
        });
        let pages = vec![page, Page::new(PageKind::Body, 595.28, 841.89)];

        let a = render_pdf(&pages, &styles(), Some(png.as_slice()), &FontManager::default()).unwrap();
        let b = render_pdf(&pages, &styles(), Some(png.as_slice()), &FontManager::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn document_id_is_rewritten_in_place() {
        let original = b"1 0 obj\n<<>>\nendobj\ntrailer\n<</ID[(ABCDEFGH)(HGFEDCBA)]>>\n%%EOF".to_vec();
        let mut pinned = original.clone();
        pin_document_id(&mut pinned);

        assert_eq!(pinned.len(), original.len());
        let text = String::from_utf8(pinned.clone()).unwrap();
        assert!(text.starts_with("1 0 obj\n<<>>\nendobj\ntrailer\n<</ID[("));
        assert!(text.ends_with(")]>>\n%%EOF"));
        assert!(!text.contains("ABCDEFGH"));

        let mut other = original.clone();
        other[..8].copy_from_slice(b"2 0 obj\n");
        pin_document_id(&mut other);
        assert_ne!(other[other.len() - 30..], pinned[pinned.len() - 30..]);

        let mut again = original;
        pin_document_id(&mut again);
        assert_eq!(again, pinned);
    }

    #[test]
    fn winlatin_maps_typographic_characters() {
        assert_eq!(to_winlatin("\u{2022} a").as_bytes(), &[0x95, b' ', b'a']);
        assert_eq!(to_winlatin("\u{4e2d}").as_bytes(), b"?");
    }
}
