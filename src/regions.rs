//! Generated page regions: the body header, the repeated footer, the cover
//! page and the showcase entries.

use chrono::{Days, NaiveDate};

use crate::document::{CaseStudyRef, CoverPageData};
use crate::layout::{Align, Column, Slice, Typesetter, Unit};
use crate::page::{BreakClass, Element, ImageSlot, Page, PageKind, PlacedBlock};
use crate::style::{StyleKey, StyleMap};
use crate::template::ExportConfig;

const COVER_PADDING: f32 = 50.0;
const COVER_LOGO: f32 = 48.0;
const CARD_GAP: f32 = 16.0;
const ICON_BOX: f32 = 40.0;
const INDEX_BOX: f32 = 28.0;

/// Inset of the showcase footer from the bottom edge.
pub const SHOWCASE_FOOTER_INSET: f32 = 30.0;

/// `January 5, 2025`
pub fn long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// `Jan 5, 2025`
pub fn short_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

fn rect(x: f32, y: f32, width: f32, height: f32, fill: &str) -> Element {
    Element::Rect {
        x,
        y,
        width,
        height,
        fill: fill.to_string(),
    }
}

fn hline(x1: f32, x2: f32, y: f32, width: f32, color: &str) -> Element {
    Element::Line {
        x1,
        y1: y,
        x2,
        y2: y,
        width,
        color: color.to_string(),
    }
}

fn logo(x: f32, y: f32, size: f32) -> Element {
    Element::Image {
        x,
        y,
        width: size,
        height: size,
        slot: ImageSlot::Logo,
    }
}

/// Lines of `text` stacked at `top`; returns the elements and the height.
fn text_block(
    ts: &Typesetter,
    text: &str,
    key: StyleKey,
    x: f32,
    width: f32,
    top: f32,
    align: Align,
) -> (Vec<Element>, f32) {
    let lines = ts.wrap_plain(text, key, width);
    let height = lines.len() as f32 * ts.line_height(key);
    (ts.line_elements(lines, key, x, width, top, align), height)
}

// ---------------------------------------------------------------------------
// Body header and footer
// ---------------------------------------------------------------------------

/// Company block on the left, quote metadata on the right, rule below.
/// `None` when the header region is disabled.
pub fn header_unit(ts: &Typesetter, export: &ExportConfig, col: Column) -> Option<Unit> {
    let region = ts.styles.header.as_ref()?;
    let identity = &ts.styles.identity;
    let half = col.width / 2.0;

    let (mut elements, company_h) = text_block(
        ts,
        &identity.company_name,
        StyleKey::HeaderCompany,
        col.x,
        half,
        0.0,
        Align::Left,
    );
    let (tagline, tagline_h) = text_block(
        ts,
        &identity.tagline,
        StyleKey::HeaderTagline,
        col.x,
        half,
        company_h,
        Align::Left,
    );
    elements.extend(tagline);

    let mut meta = Vec::new();
    if region.show_quote_number && !export.quote_number.is_empty() {
        meta.push((export.quote_number.clone(), StyleKey::HeaderQuoteNumber));
    }
    if let Some(issued) = export.issued_on {
        if export.include_date && region.show_date {
            meta.push((format!("Date: {}", long_date(issued)), StyleKey::HeaderMeta));
        }
        if region.show_validity_period {
            match issued.checked_add_days(Days::new(region.validity_days.into())) {
                Some(until) => meta.push((
                    format!("Valid until: {}", long_date(until)),
                    StyleKey::HeaderMeta,
                )),
                None => log::warn!("Validity period overflows the calendar, omitting it"),
            }
        }
    }
    let mut right_h = 0.0;
    for (text, key) in meta {
        let (lines, h) = text_block(ts, &text, key, col.x + half, half, right_h, Align::Right);
        elements.extend(lines);
        right_h += h + ts.styles.get(key).margin_bottom;
    }

    let content_h = f32::max(company_h + tagline_h, right_h);
    let rule_y = content_h + 24.0;
    elements.push(hline(col.x, col.x + col.width, rule_y + 1.0, 2.0, &region.rule_color));

    let mut unit = Unit::new(BreakClass::Header, Vec::new());
    unit.margin_bottom = 32.0;
    unit.slices.push(Slice {
        height: rule_y + 2.0,
        elements,
    });
    Some(unit)
}

/// Footer band, positioned so that its bottom edge sits at `bottom`.
/// `None` when the footer is switched off.
pub fn footer_block(ts: &Typesetter, col: Column, bottom: f32) -> Option<PlacedBlock> {
    let footer = ts.styles.footer.as_ref()?;
    let style = ts.styles.get(StyleKey::Footer);
    let lh = ts.line_height(StyleKey::Footer);

    let contact = [footer.contact_email.as_str(), footer.website.as_str()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" | ");
    let contact_w = ts.width_of(&contact, StyleKey::Footer);
    let text_w = ts.width_of(&footer.text, StyleKey::Footer);
    // Side by side when both fit on one line, stacked otherwise.
    let stacked = contact_w + text_w + 16.0 > col.width;
    let rows = if stacked { 2.0 } else { 1.0 };
    let height = style.padding.top + rows * lh;
    let top = bottom - height;

    let mut elements = vec![hline(col.x, col.x + col.width, 0.0, 1.0, &footer.rule_color)];
    let (left, _) = text_block(
        ts,
        &contact,
        StyleKey::Footer,
        col.x,
        col.width,
        style.padding.top,
        Align::Left,
    );
    elements.extend(left);
    let right_top = style.padding.top + if stacked { lh } else { 0.0 };
    let align = if stacked { Align::Left } else { Align::Right };
    let (right, _) = text_block(ts, &footer.text, StyleKey::Footer, col.x, col.width, right_top, align);
    elements.extend(right);
    for e in &mut elements {
        e.translate(0.0, top);
    }

    Some(PlacedBlock {
        class: BreakClass::Footer,
        y: top,
        height,
        blocks: Vec::new(),
        elements,
        continued: false,
        overflow: false,
    })
}

// ---------------------------------------------------------------------------
// Cover page
// ---------------------------------------------------------------------------

/// The single cover page. Content is laid out top-down; the info cards are
/// anchored to the bottom edge.
pub fn cover_page(
    ts: &Typesetter,
    cover: &CoverPageData,
    export: &ExportConfig,
    width: f32,
    height: f32,
) -> Page {
    let styles: &StyleMap = ts.styles;
    let x = COVER_PADDING;
    let cw = width - 2.0 * COVER_PADDING;
    let mut elements = vec![logo(x, COVER_PADDING, COVER_LOGO)];

    // Estimate badge, right-aligned on the logo row.
    let badge_text = format!("ESTIMATE #{}", export.quote_number);
    let badge = styles.get(StyleKey::CoverBadge);
    let badge_w = ts.width_of(&badge_text, StyleKey::CoverBadge) + badge.padding.horizontal();
    let badge_h = ts.line_height(StyleKey::CoverBadge) + badge.padding.vertical();
    let badge_x = x + cw - badge_w;
    let badge_y = COVER_PADDING + (COVER_LOGO - badge_h) / 2.0;
    if let Some(bg) = &badge.background {
        elements.push(rect(badge_x, badge_y, badge_w, badge_h, bg));
    }
    let (badge_line, _) = text_block(
        ts,
        &badge_text,
        StyleKey::CoverBadge,
        badge_x + badge.padding.left,
        f32::INFINITY,
        badge_y + badge.padding.top,
        Align::Left,
    );
    elements.extend(badge_line);

    // Titles and subtitle.
    let mut y = COVER_PADDING + COVER_LOGO + 64.0;
    for (text, key) in [
        (&cover.title, StyleKey::CoverTitle),
        (&cover.title_accent, StyleKey::CoverTitleAccent),
    ] {
        if text.is_empty() {
            continue;
        }
        let (lines, h) = text_block(ts, text, key, x, cw, y, Align::Left);
        elements.extend(lines);
        y += h + styles.get(key).margin_bottom;
    }
    if !cover.subtitle.is_empty() {
        y += styles.get(StyleKey::CoverSubtitle).margin_top;
        let (lines, h) = text_block(
            ts,
            &cover.subtitle,
            StyleKey::CoverSubtitle,
            x,
            cw.min(320.0),
            y,
            Align::Left,
        );
        elements.extend(lines);
        y += h;
    }

    // Info cards.
    let card_w = (cw - CARD_GAP) / 2.0;
    let client = [
        or_placeholder(&cover.client_name, "Client Name"),
        or_placeholder(&cover.client_address, "Address"),
        or_placeholder(&cover.client_city, "City, State ZIP"),
    ];
    let identity = &styles.identity;
    let issued = export
        .issued_on
        .filter(|_| export.include_date)
        .map(|d| format!("Issued: {}", short_date(d)));
    let for_card = info_card(
        ts,
        "PREPARED FOR",
        &client,
        None,
        &styles.cover.client_icon,
        false,
        card_w,
    );
    let by_card = info_card(
        ts,
        "PREPARED BY",
        &[identity.company_name.as_str(), identity.tagline.as_str()],
        issued.as_deref(),
        &styles.cover.company_icon,
        true,
        card_w,
    );
    let cards_h = for_card.height.max(by_card.height);
    let cards_top = height - COVER_PADDING - cards_h;
    let card_fill = styles
        .get(StyleKey::CoverCard)
        .background
        .clone()
        .unwrap_or_default();
    for (i, card) in [for_card, by_card].into_iter().enumerate() {
        let card_x = x + i as f32 * (card_w + CARD_GAP);
        elements.push(rect(card_x, cards_top, card_w, cards_h, &card_fill));
        elements.extend(card.elements.into_iter().map(|mut e| {
            e.translate(card_x, cards_top);
            e
        }));
    }

    let overflow = y > cards_top;
    if overflow {
        log::warn!("Cover text runs into the info cards ({y:.1}pt > {cards_top:.1}pt)");
    }

    let mut page = Page::new(PageKind::Cover, width, height);
    page.background = Some(styles.cover.background.clone());
    page.blocks.push(PlacedBlock {
        class: BreakClass::Cover,
        y: 0.0,
        height,
        blocks: Vec::new(),
        elements,
        continued: false,
        overflow,
    });
    page
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

/// Card content relative to the card's top-left corner.
fn info_card(
    ts: &Typesetter,
    label: &str,
    lines: &[&str],
    footnote: Option<&str>,
    icon_fill: &str,
    logo_in_icon: bool,
    width: f32,
) -> Slice {
    let pad = ts.styles.get(StyleKey::CoverCard).padding;
    let inner_w = width - pad.horizontal();
    let mut elements = Vec::new();

    let (label_el, label_h) = text_block(ts, label, StyleKey::CoverLabel, pad.left, inner_w, pad.top, Align::Left);
    elements.extend(label_el);
    let row_top = pad.top + label_h + ts.styles.get(StyleKey::CoverLabel).margin_bottom;

    elements.push(rect(pad.left, row_top, ICON_BOX, ICON_BOX, icon_fill));
    if logo_in_icon {
        elements.push(logo(pad.left + 8.0, row_top + 8.0, 24.0));
    }

    let text_x = pad.left + ICON_BOX + 12.0;
    let text_w = inner_w - ICON_BOX - 12.0;
    let mut y = row_top;
    for (i, line) in lines.iter().enumerate() {
        let key = if i == 0 {
            StyleKey::CoverName
        } else {
            StyleKey::CoverDetail
        };
        if i > 0 {
            y += ts.styles.get(key).margin_top;
        }
        let (el, h) = text_block(ts, line, key, text_x, text_w, y, Align::Left);
        elements.extend(el);
        y += h;
    }
    let mut bottom = y.max(row_top + ICON_BOX);

    if let Some(note) = footnote {
        let style = ts.styles.get(StyleKey::CoverDate);
        let rule_y = bottom + style.margin_top;
        if let Some(border) = &style.border {
            elements.push(hline(pad.left, pad.left + inner_w, rule_y, border.width, &border.color));
        }
        let text_top = rule_y + style.padding.top;
        let (el, h) = text_block(ts, note, StyleKey::CoverDate, pad.left, inner_w, text_top, Align::Left);
        elements.extend(el);
        bottom = text_top + h;
    }

    Slice {
        height: bottom + pad.bottom,
        elements,
    }
}

// ---------------------------------------------------------------------------
// Showcase
// ---------------------------------------------------------------------------

/// Zero-padded entry index: two digits, more when `total` needs them.
pub fn showcase_index(i: usize, total: usize) -> String {
    let width = total.to_string().len().max(2);
    format!("{:0width$}", i + 1)
}

/// Badge, title and subtitle at the top of the first showcase page.
pub fn showcase_intro(ts: &Typesetter, col: Column) -> Unit {
    let region = &ts.styles.showcase;
    let badge = ts.styles.get(StyleKey::ShowcaseBadge);
    let badge_w = ts.width_of(&region.badge, StyleKey::ShowcaseBadge) + badge.padding.horizontal();
    let badge_h = ts.line_height(StyleKey::ShowcaseBadge) + badge.padding.vertical();

    let mut elements = Vec::new();
    if let Some(bg) = &badge.background {
        elements.push(rect(col.x, 0.0, badge_w, badge_h, bg));
    }
    let (el, _) = text_block(
        ts,
        &region.badge,
        StyleKey::ShowcaseBadge,
        col.x + badge.padding.left,
        f32::INFINITY,
        badge.padding.top,
        Align::Left,
    );
    elements.extend(el);
    let mut y = badge_h + badge.margin_bottom;

    let (el, h) = text_block(ts, &region.title, StyleKey::ShowcaseTitle, col.x, col.width, y, Align::Left);
    elements.extend(el);
    y += h + ts.styles.get(StyleKey::ShowcaseTitle).margin_bottom;

    let (el, h) = text_block(
        ts,
        &region.subtitle,
        StyleKey::ShowcaseSubtitle,
        col.x,
        col.width.min(320.0),
        y,
        Align::Left,
    );
    elements.extend(el);
    y += h;

    let mut unit = Unit::new(BreakClass::ShowcaseIntro, Vec::new());
    unit.margin_bottom = ts.styles.get(StyleKey::ShowcaseSubtitle).margin_bottom;
    unit.slices.push(Slice { height: y, elements });
    unit
}

/// One unbreakable entry row.
pub fn showcase_entry(ts: &Typesetter, study: &CaseStudyRef, index: &str, last: bool, col: Column) -> Unit {
    let row = ts.styles.get(StyleKey::ShowcaseSummary);
    let pad = row.padding;
    let index_style = ts.styles.get(StyleKey::ShowcaseIndex);

    let mut elements = Vec::new();
    if let Some(bg) = &index_style.background {
        elements.push(rect(col.x, pad.top, INDEX_BOX, INDEX_BOX, bg));
    }
    let idx_lh = ts.line_height(StyleKey::ShowcaseIndex);
    let (el, _) = text_block(
        ts,
        index,
        StyleKey::ShowcaseIndex,
        col.x,
        INDEX_BOX,
        pad.top + (INDEX_BOX - idx_lh) / 2.0,
        Align::Center,
    );
    elements.extend(el);

    let text_x = col.x + INDEX_BOX + 12.0;
    let text_w = col.width - INDEX_BOX - 12.0;
    let (el, title_h) = text_block(
        ts,
        &study.title,
        StyleKey::ShowcaseEntryTitle,
        text_x,
        text_w,
        pad.top,
        Align::Left,
    );
    elements.extend(el);
    let summary_top = pad.top + title_h + ts.styles.get(StyleKey::ShowcaseEntryTitle).margin_bottom;
    let (el, summary_h) = text_block(
        ts,
        &study.summary,
        StyleKey::ShowcaseSummary,
        text_x,
        text_w,
        summary_top,
        Align::Left,
    );
    elements.extend(el);

    let content_bottom = (summary_top + summary_h).max(pad.top + INDEX_BOX);
    let mut height = content_bottom + pad.bottom;
    if !last {
        if let Some(border) = &row.border {
            elements.push(hline(col.x, col.x + col.width, height, border.width, &border.color));
            height += border.width;
        }
    }

    let mut unit = Unit::new(BreakClass::ShowcaseEntry, Vec::new());
    unit.slices.push(Slice { height, elements });
    unit
}

/// "View all case studies at <site>/case-studies", centered under a rule.
pub fn showcase_cta(ts: &Typesetter, col: Column) -> Unit {
    let region = &ts.styles.showcase;
    let style = ts.styles.get(StyleKey::ShowcaseCta);
    let mut elements = Vec::new();
    if let Some(border) = &style.border {
        elements.push(hline(col.x, col.x + col.width, 0.0, border.width, &border.color));
    }

    let lead_w = ts.width_of(&region.cta_text, StyleKey::ShowcaseCta);
    let link_w = ts.width_of(&region.cta_link, StyleKey::ShowcaseCtaLink);
    let start = col.x + ((col.width - lead_w - link_w) / 2.0).max(0.0);
    let top = style.padding.top;
    let (lead, lead_h) = text_block(ts, &region.cta_text, StyleKey::ShowcaseCta, start, f32::INFINITY, top, Align::Left);
    let (link, _) = text_block(
        ts,
        &region.cta_link,
        StyleKey::ShowcaseCtaLink,
        start + lead_w,
        f32::INFINITY,
        top,
        Align::Left,
    );
    elements.extend(lead);
    elements.extend(link);

    let mut unit = Unit::new(BreakClass::ShowcaseCta, Vec::new());
    unit.margin_top = style.margin_top;
    unit.slices.push(Slice {
        height: top + lead_h,
        elements,
    });
    unit
}

/// Logo and company name on the left, website on the right, at the bottom
/// of every showcase page.
pub fn showcase_footer(ts: &Typesetter, col: Column, page_height: f32) -> Vec<Element> {
    let identity = &ts.styles.identity;
    let lh = ts.line_height(StyleKey::ShowcaseFooter);
    let size = 16.0;
    let row_h = lh.max(size);
    let top = page_height - SHOWCASE_FOOTER_INSET - row_h;

    let mut elements = vec![logo(col.x, top + (row_h - size) / 2.0, size)];
    let text_top = top + (row_h - lh) / 2.0;
    let (left, _) = text_block(
        ts,
        &identity.company_name,
        StyleKey::ShowcaseFooter,
        col.x + size + 8.0,
        col.width / 2.0,
        text_top,
        Align::Left,
    );
    let (right, _) = text_block(
        ts,
        &identity.website,
        StyleKey::ShowcaseFooter,
        col.x + col.width / 2.0,
        col.width / 2.0,
        text_top,
        Align::Right,
    );
    elements.extend(left);
    elements.extend(right);
    elements
}

/// Height reserved at the bottom of showcase pages for [`showcase_footer`].
pub fn showcase_footer_reserve(ts: &Typesetter) -> f32 {
    SHOWCASE_FOOTER_INSET + ts.line_height(StyleKey::ShowcaseFooter).max(16.0) + 16.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::FontManager;
    use crate::style::resolve_styles;
    use crate::template::TemplateConfig;

    #[test]
    fn index_padding_grows_with_total() {
        assert_eq!(showcase_index(0, 6), "01");
        assert_eq!(showcase_index(9, 12), "10");
        assert_eq!(showcase_index(4, 120), "005");
    }

    #[test]
    fn dates_are_formatted_in_english() {
        let d = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(long_date(d), "January 5, 2025");
        assert_eq!(short_date(d), "Jan 5, 2025");
    }

    #[test]
    fn header_lists_enabled_metadata() {
        let fonts = FontManager::default();
        let styles = resolve_styles(&TemplateConfig::default());
        let ts = Typesetter::new(&fonts, &styles);
        let export = ExportConfig {
            quote_number: "BR-0001".into(),
            issued_on: NaiveDate::from_ymd_opt(2025, 1, 15),
            ..ExportConfig::default()
        };
        let col = Column { x: 42.0, width: 500.0 };
        let unit = header_unit(&ts, &export, col).unwrap();
        let text: Vec<String> = unit.slices[0].elements.iter().map(Element::text).collect();
        assert!(text.contains(&"BR-0001".to_string()), "{text:?}");
        assert!(text.contains(&"Date: January 15, 2025".to_string()));
        assert!(text.contains(&"Valid until: February 14, 2025".to_string()));

        let no_date = ExportConfig {
            include_date: false,
            ..export
        };
        let unit = header_unit(&ts, &no_date, col).unwrap();
        let text: Vec<String> = unit.slices[0].elements.iter().map(Element::text).collect();
        assert!(!text.iter().any(|t| t.starts_with("Date:")));
    }

    #[test]
    fn cover_uses_placeholders() {
        let fonts = FontManager::default();
        let styles = resolve_styles(&TemplateConfig::default());
        let ts = Typesetter::new(&fonts, &styles);
        let cover = CoverPageData {
            title: "Test Quote".into(),
            ..CoverPageData::default()
        };
        let page = cover_page(&ts, &cover, &ExportConfig::default(), 595.28, 841.89);
        let text = page.text_lines();
        assert!(text.contains(&"Test Quote".to_string()));
        assert!(text.contains(&"Client Name".to_string()));
        assert!(text.contains(&"PREPARED BY".to_string()));
        assert!(!page.blocks[0].overflow);
    }
}
