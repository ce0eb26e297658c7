//! Pagination – groups content blocks into break-avoidance units and flows
//! them onto sized pages.
//!
//! Handles:
//! - A4 / Letter / Legal pages in either orientation
//! - Keeping lists, tables, quotes and heading + paragraph pairs together
//! - Splitting units taller than a page at line/row granularity
//! - Slices taller than a page (placed overflowing, never looping)
//! - The repeated footer band and the showcase page furniture

use crate::document::{CaseStudyRef, ContentBlock, CoverPageData};
use crate::fonts::FontManager;
use crate::layout::{Column, Typesetter, Unit};
use crate::page::{BreakClass, Element, Page, PageKind, PlacedBlock};
use crate::regions;
use crate::style::{resolve_styles, StyleMap};
use crate::template::{ExportConfig, TemplateConfig};

/// Padding of the dark cover and showcase pages.
const FEATURE_PADDING: f32 = 50.0;

/// Space kept between the last body unit and the footer rule.
const FOOTER_GAP: f32 = 12.0;

const EPSILON: f32 = 0.01;

/// Lay out a document with the builtin fonts.
pub fn layout_pages(
    blocks: &[ContentBlock],
    cover: Option<&CoverPageData>,
    case_studies: &[CaseStudyRef],
    template: &TemplateConfig,
    export: &ExportConfig,
) -> Vec<Page> {
    layout_pages_with_fonts(
        blocks,
        cover,
        case_studies,
        template,
        export,
        &FontManager::default(),
    )
}

/// Lay out a document, measuring text with `fonts`.
pub fn layout_pages_with_fonts(
    blocks: &[ContentBlock],
    cover: Option<&CoverPageData>,
    case_studies: &[CaseStudyRef],
    template: &TemplateConfig,
    export: &ExportConfig,
    fonts: &FontManager,
) -> Vec<Page> {
    let styles = resolve_styles(template);
    paginate(blocks, cover, case_studies, &styles, export, fonts)
}

/// Pagination over an already resolved style map.
pub fn paginate(
    blocks: &[ContentBlock],
    cover: Option<&CoverPageData>,
    case_studies: &[CaseStudyRef],
    styles: &StyleMap,
    export: &ExportConfig,
    fonts: &FontManager,
) -> Vec<Page> {
    let ts = Typesetter::new(fonts, styles);
    let (width, height) = export.page_dimensions();
    let mut pages = Vec::new();

    let cover = cover.filter(|c| c.has_title());
    if let Some(cover) = cover {
        pages.push(regions::cover_page(&ts, cover, export, width, height));
    }

    // Body
    let pad = styles.page_padding();
    let col = Column {
        x: pad.left,
        width: width - pad.horizontal(),
    };
    let footer = regions::footer_block(&ts, col, height - pad.bottom);
    let body_bottom = match &footer {
        Some(f) => f.y - FOOTER_GAP,
        None => height - pad.bottom,
    };
    let mut units = Vec::new();
    if cover.is_none() {
        units.extend(regions::header_unit(&ts, export, col));
    }
    units.extend(group_units(&ts, blocks, col));

    let mut template = Page::new(PageKind::Body, width, height);
    template.background = Some(styles.page.background.clone());
    template.footer = footer;
    let mut flow = Flow::new(template, pad.top, body_bottom);
    for unit in units {
        flow.place(unit);
    }
    pages.extend(flow.finish());

    // Showcase
    if !case_studies.is_empty() {
        let col = Column {
            x: FEATURE_PADDING,
            width: width - 2.0 * FEATURE_PADDING,
        };
        let mut template = Page::new(PageKind::Showcase, width, height);
        template.background = Some(styles.showcase.background.clone());
        template.decorations = regions::showcase_footer(&ts, col, height);
        let bottom = height - regions::showcase_footer_reserve(&ts);
        let mut flow = Flow::new(template, FEATURE_PADDING, bottom);

        flow.place(regions::showcase_intro(&ts, col));
        let total = case_studies.len();
        for (i, study) in case_studies.iter().enumerate() {
            let index = regions::showcase_index(i, total);
            flow.place(regions::showcase_entry(&ts, study, &index, i + 1 == total, col));
        }
        flow.place(regions::showcase_cta(&ts, col));
        pages.extend(flow.finish());
    }

    if pages.is_empty() {
        // Only reachable when the header region is disabled and there is
        // nothing else to show.
        let mut page = Page::new(PageKind::Body, width, height);
        page.background = Some(styles.page.background.clone());
        pages.push(page);
    }
    for (index, page) in pages.iter_mut().enumerate() {
        page.index = index;
    }
    log::debug!("Laid out {} page(s)", pages.len());
    pages
}

/// Group blocks into units: a heading followed directly by a paragraph is
/// one unit, every other block is its own.
pub fn group_units(ts: &Typesetter, blocks: &[ContentBlock], col: Column) -> Vec<Unit> {
    let mut units = Vec::with_capacity(blocks.len());
    let mut i = 0;
    while i < blocks.len() {
        match (&blocks[i], blocks.get(i + 1)) {
            (heading @ ContentBlock::Heading { .. }, Some(para @ ContentBlock::Paragraph { .. })) => {
                units.push(ts.heading_with_paragraph(heading, para, col));
                i += 2;
            }
            (block, _) => {
                let unit = ts.block_unit(block, col);
                if !unit.slices.is_empty() {
                    units.push(unit);
                } else {
                    log::debug!("Skipping empty {}", block.kind_name());
                }
                i += 1;
            }
        }
    }
    units
}

// ---------------------------------------------------------------------------
// Flow
// ---------------------------------------------------------------------------

/// Places units top to bottom, opening pages cloned from `template`.
struct Flow {
    template: Page,
    top: f32,
    bottom: f32,
    pages: Vec<Page>,
    current: Page,
    cursor: f32,
    /// Bottom margin of the last placed unit.
    pending_margin: f32,
}

impl Flow {
    fn new(template: Page, top: f32, bottom: f32) -> Self {
        Self {
            current: template.clone(),
            template,
            top,
            bottom,
            pages: Vec::new(),
            cursor: top,
            pending_margin: 0.0,
        }
    }

    fn at_top(&self) -> bool {
        self.current.blocks.is_empty()
    }

    fn capacity(&self) -> f32 {
        self.bottom - self.top
    }

    fn break_page(&mut self) {
        let next = self.template.clone();
        self.pages.push(std::mem::replace(&mut self.current, next));
        self.cursor = self.top;
        self.pending_margin = 0.0;
    }

    /// Vertical gap before a unit with the given top margin.
    fn gap(&self, margin_top: f32) -> f32 {
        if self.at_top() {
            0.0
        } else {
            self.pending_margin.max(margin_top)
        }
    }

    fn place(&mut self, unit: Unit) {
        let height = unit.height();
        let fits_here = self.cursor + self.gap(unit.margin_top) + height <= self.bottom + EPSILON;
        let fits_page = height <= self.capacity() + EPSILON;

        if !fits_here && fits_page && unit.class.avoids_break() && !self.at_top() {
            log::debug!("Moving {:?} unit ({height:.1}pt) to a new page", unit.class);
            self.break_page();
        }
        self.place_slices(unit);
    }

    /// Fill pages slice by slice. A unit that fits is committed in one piece.
    fn place_slices(&mut self, unit: Unit) {
        let Unit {
            class,
            blocks,
            margin_top,
            margin_bottom,
            slices,
        } = unit;

        let mut piece_top = self.cursor + self.gap(margin_top);
        let mut elements: Vec<Element> = Vec::new();
        let mut used = 0.0;
        let mut continued = false;
        let mut overflow = false;

        for slice in slices {
            if piece_top + used + slice.height > self.bottom + EPSILON {
                if used > 0.0 || !self.at_top() {
                    if used > 0.0 {
                        self.commit(class, &blocks, piece_top, used, std::mem::take(&mut elements), continued, overflow);
                        continued = true;
                        overflow = false;
                    }
                    self.break_page();
                    piece_top = self.top;
                    used = 0.0;
                }
                if slice.height > self.capacity() + EPSILON {
                    log::warn!(
                        "{class:?} slice of {:.1}pt exceeds the page body ({:.1}pt), placing it overflowing",
                        slice.height,
                        self.capacity()
                    );
                    overflow = true;
                }
            }
            for mut element in slice.elements {
                element.translate(0.0, piece_top + used);
                elements.push(element);
            }
            used += slice.height;
        }

        if used > 0.0 || !elements.is_empty() {
            self.commit(class, &blocks, piece_top, used, elements, continued, overflow);
        }
        self.pending_margin = margin_bottom;
    }

    #[allow(clippy::too_many_arguments)]
    fn commit(
        &mut self,
        class: BreakClass,
        blocks: &[ContentBlock],
        y: f32,
        height: f32,
        elements: Vec<Element>,
        continued: bool,
        overflow: bool,
    ) {
        self.current.blocks.push(PlacedBlock {
            class,
            y,
            height,
            blocks: blocks.to_vec(),
            elements,
            continued,
            overflow,
        });
        self.cursor = y + height;
    }

    /// Pages with at least one placed unit.
    fn finish(mut self) -> Vec<Page> {
        if !self.current.blocks.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::RichText;
    use crate::layout::Slice;

    fn unit(class: BreakClass, heights: &[f32]) -> Unit {
        let mut u = Unit::new(class, Vec::new());
        u.slices = heights
            .iter()
            .map(|&h| Slice {
                height: h,
                elements: Vec::new(),
            })
            .collect();
        u
    }

    fn flow() -> Flow {
        Flow::new(Page::new(PageKind::Body, 600.0, 800.0), 100.0, 700.0)
    }

    #[test]
    fn avoid_unit_moves_whole() {
        let mut f = flow();
        f.place(unit(BreakClass::Paragraph, &[500.0]));
        f.place(unit(BreakClass::List, &[50.0, 50.0, 50.0]));
        let pages = f.finish();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].blocks[0].height, 150.0);
        assert_eq!(pages[1].blocks[0].y, 100.0);
        assert!(!pages[1].blocks[0].continued);
    }

    #[test]
    fn paragraph_splits_by_line() {
        let mut f = flow();
        f.place(unit(BreakClass::Paragraph, &[500.0]));
        f.place(unit(BreakClass::Paragraph, &[40.0; 5]));
        let pages = f.finish();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].blocks[1].height, 80.0);
        assert_eq!(pages[1].blocks[0].height, 120.0);
        assert!(pages[1].blocks[0].continued);
    }

    #[test]
    fn oversized_avoid_unit_splits() {
        let mut f = flow();
        f.place(unit(BreakClass::Table, &[100.0; 9]));
        let pages = f.finish();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].blocks[0].height, 600.0);
        assert_eq!(pages[1].blocks[0].height, 300.0);
    }

    #[test]
    fn oversized_slice_overflows_and_terminates() {
        let mut f = flow();
        f.place(unit(BreakClass::Paragraph, &[10.0]));
        f.place(unit(BreakClass::Table, &[2000.0]));
        f.place(unit(BreakClass::Paragraph, &[10.0]));
        let pages = f.finish();
        assert_eq!(pages.len(), 3);
        assert!(pages[1].blocks[0].overflow);
        assert!(!pages[2].blocks[0].overflow);
    }

    #[test]
    fn overflow_flag_stays_on_the_oversized_piece() {
        let mut f = flow();
        f.place(unit(BreakClass::Table, &[10.0, 2000.0, 10.0]));
        let pages = f.finish();
        let pieces: Vec<_> = pages.iter().map(|p| (p.blocks[0].height, p.blocks[0].overflow)).collect();
        assert_eq!(pieces, vec![(10.0, false), (2000.0, true), (10.0, false)]);
        assert!(pages[1].blocks[0].continued);
        assert!(pages[2].blocks[0].continued);
    }

    #[test]
    fn heading_keeps_its_paragraph() {
        let fonts = FontManager::default();
        let styles = resolve_styles(&TemplateConfig::default());
        let ts = Typesetter::new(&fonts, &styles);
        let blocks = vec![
            ContentBlock::Heading {
                level: 2,
                text: RichText::from("A"),
            },
            ContentBlock::Paragraph {
                text: RichText::from("b"),
            },
            ContentBlock::Heading {
                level: 3,
                text: RichText::from("C"),
            },
            ContentBlock::Rule,
        ];
        let units = group_units(&ts, &blocks, Column { x: 0.0, width: 400.0 });
        let classes: Vec<_> = units.iter().map(|u| u.class).collect();
        assert_eq!(
            classes,
            vec![
                BreakClass::HeadingWithParagraph,
                BreakClass::Heading,
                BreakClass::Rule
            ]
        );
    }
}
