//! HTML preview backend. Draws the same document as the PDF renderer, using
//! inline styles derived from the shared [`StyleMap`].

use std::fmt::Write as _;

use crate::document::{ContentBlock, CoverPageData, RichText, Span};
use crate::regions::{long_date, short_date};
use crate::style::{BlockStyle, BorderSide, Edges, StyleKey, StyleMap};
use crate::template::ExportConfig;

/// Escape `&`, `<` and `>`. Applied exactly once, to raw text.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

/// CSS declarations for one style entry.
fn css(style: &BlockStyle, base: f32) -> String {
    let mut out = String::new();
    if !style.font_family.is_empty() {
        let _ = write!(out, "font-family:{};", style.font_family.replace('"', "'"));
    }
    let _ = write!(out, "font-size:{:.1}pt;", style.font_size(base));
    if style.bold {
        out.push_str("font-weight:700;");
    }
    if style.italic {
        out.push_str("font-style:italic;");
    }
    if !style.color.is_empty() {
        let _ = write!(out, "color:{};", style.color);
    }
    if let Some(bg) = &style.background {
        let _ = write!(out, "background:{bg};");
    }
    if let Some(border) = &style.border {
        let side = match border.side {
            BorderSide::Top => "border-top",
            BorderSide::Bottom => "border-bottom",
            BorderSide::Left => "border-left",
            BorderSide::All => "border",
        };
        let _ = write!(out, "{side}:{}pt solid {};", border.width, border.color);
    }
    let _ = write!(out, "line-height:{};", style.line_height);
    if style.margin_top != 0.0 || style.margin_bottom != 0.0 {
        let _ = write!(out, "margin:{}pt 0 {}pt 0;", style.margin_top, style.margin_bottom);
    }
    let p = style.padding;
    if p != Edges::ZERO {
        let _ = write!(out, "padding:{}pt {}pt {}pt {}pt;", p.top, p.right, p.bottom, p.left);
    }
    if style.indent > 0.0 {
        let _ = write!(out, "padding-left:{}pt;", style.indent);
    }
    out
}

struct Html<'a> {
    styles: &'a StyleMap,
    base: f32,
    out: String,
}

impl<'a> Html<'a> {
    fn style(&self, key: StyleKey) -> String {
        css(self.styles.get(key), self.base)
    }

    fn open(&mut self, tag: &str, key: StyleKey) {
        let style = self.style(key);
        let _ = write!(self.out, "<{tag} style=\"{style}\">");
    }

    fn element(&mut self, tag: &str, key: StyleKey, text: &str) {
        self.open(tag, key);
        self.out.push_str(&escape_html(text));
        let _ = write!(self.out, "</{tag}>");
    }

    fn rich(&mut self, text: &RichText) {
        for span in &text.spans {
            self.span(span);
        }
    }

    fn span(&mut self, span: &Span) {
        let mut body = escape_html(&span.text).replace('\n', "<br>");
        if span.code {
            let style = self.style(StyleKey::Code);
            body = format!("<code style=\"{style}\">{body}</code>");
        }
        if span.italic {
            body = format!("<em>{body}</em>");
        }
        if span.bold {
            body = format!("<strong>{body}</strong>");
        }
        if let Some(url) = &span.link {
            let style = self.style(StyleKey::Link);
            body = format!("<a href=\"{}\" style=\"{style}\">{body}</a>", escape_html(url));
        }
        self.out.push_str(&body);
    }

    fn block(&mut self, block: &ContentBlock) {
        match block {
            ContentBlock::Heading { level, text } => {
                let tag = format!("h{}", (*level).clamp(1, 3));
                self.open(&tag, StyleKey::heading(*level));
                self.rich(text);
                let _ = write!(self.out, "</{tag}>");
            }
            ContentBlock::Paragraph { text } => {
                self.open("p", StyleKey::Paragraph);
                self.rich(text);
                self.out.push_str("</p>");
            }
            ContentBlock::List { ordered, items } => {
                let tag = if *ordered { "ol" } else { "ul" };
                self.open(tag, StyleKey::List);
                for item in items {
                    self.open("li", StyleKey::ListItem);
                    self.rich(item);
                    self.out.push_str("</li>");
                }
                let _ = write!(self.out, "</{tag}>");
            }
            ContentBlock::Table { headers, rows } => {
                self.open("table", StyleKey::Table);
                self.out.push_str("<thead><tr>");
                for cell in headers {
                    self.open("th", StyleKey::TableHeader);
                    self.rich(cell);
                    self.out.push_str("</th>");
                }
                self.out.push_str("</tr></thead><tbody>");
                for (i, row) in rows.iter().enumerate() {
                    if i % 2 == 1 {
                        self.open("tr", StyleKey::TableStripe);
                    } else {
                        self.out.push_str("<tr>");
                    }
                    for cell in row {
                        self.open("td", StyleKey::TableCell);
                        self.rich(cell);
                        self.out.push_str("</td>");
                    }
                    self.out.push_str("</tr>");
                }
                self.out.push_str("</tbody></table>");
            }
            ContentBlock::Quote { text } => {
                self.open("blockquote", StyleKey::Quote);
                self.rich(text);
                self.out.push_str("</blockquote>");
            }
            ContentBlock::Rule => {
                let style = self.style(StyleKey::Rule);
                let _ = write!(self.out, "<hr style=\"{style}\">");
            }
        }
    }

    fn cover(&mut self, cover: &CoverPageData, export: &ExportConfig) {
        let _ = write!(
            self.out,
            "<section class=\"cover\" style=\"background:{};padding:50pt;\">",
            self.styles.cover.background
        );
        self.element("div", StyleKey::CoverBadge, &format!("ESTIMATE #{}", export.quote_number));
        self.element("h1", StyleKey::CoverTitle, &cover.title);
        if !cover.title_accent.is_empty() {
            self.element("h1", StyleKey::CoverTitleAccent, &cover.title_accent);
        }
        if !cover.subtitle.is_empty() {
            self.element("p", StyleKey::CoverSubtitle, &cover.subtitle);
        }

        let client = [
            (cover.client_name.as_str(), "Client Name"),
            (cover.client_address.as_str(), "Address"),
            (cover.client_city.as_str(), "City, State ZIP"),
        ];
        self.open("div", StyleKey::CoverCard);
        self.element("div", StyleKey::CoverLabel, "PREPARED FOR");
        for (i, (value, placeholder)) in client.into_iter().enumerate() {
            let text = if value.trim().is_empty() { placeholder } else { value };
            let key = if i == 0 { StyleKey::CoverName } else { StyleKey::CoverDetail };
            self.element("div", key, text);
        }
        self.out.push_str("</div>");

        let identity = &self.styles.identity;
        let (company, tagline) = (identity.company_name.clone(), identity.tagline.clone());
        self.open("div", StyleKey::CoverCard);
        self.element("div", StyleKey::CoverLabel, "PREPARED BY");
        self.element("div", StyleKey::CoverName, &company);
        self.element("div", StyleKey::CoverDetail, &tagline);
        if let Some(date) = export.issued_on.filter(|_| export.include_date) {
            self.element("div", StyleKey::CoverDate, &format!("Issued: {}", short_date(date)));
        }
        self.out.push_str("</div></section>");
    }

    fn header(&mut self, export: &ExportConfig) {
        let Some(region) = self.styles.header.clone() else {
            return;
        };
        let identity = self.styles.identity.clone();
        let _ = write!(
            self.out,
            "<header style=\"display:flex;justify-content:space-between;border-bottom:2pt solid {};padding-bottom:24pt;margin-bottom:32pt;\"><div>",
            region.rule_color
        );
        self.element("div", StyleKey::HeaderCompany, &identity.company_name);
        self.element("div", StyleKey::HeaderTagline, &identity.tagline);
        self.out.push_str("</div><div style=\"text-align:right;\">");
        if region.show_quote_number && !export.quote_number.is_empty() {
            self.element("div", StyleKey::HeaderQuoteNumber, &export.quote_number);
        }
        if let Some(issued) = export.issued_on {
            if export.include_date && region.show_date {
                self.element("div", StyleKey::HeaderMeta, &format!("Date: {}", long_date(issued)));
            }
            if region.show_validity_period {
                if let Some(until) = issued.checked_add_days(chrono::Days::new(region.validity_days.into())) {
                    self.element("div", StyleKey::HeaderMeta, &format!("Valid until: {}", long_date(until)));
                }
            }
        }
        self.out.push_str("</div></header>");
    }

    fn footer(&mut self) {
        let Some(footer) = self.styles.footer.clone() else {
            return;
        };
        let contact = [footer.contact_email.as_str(), footer.website.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" | ");
        let style = self.style(StyleKey::Footer);
        let _ = write!(
            self.out,
            "<footer style=\"{style}display:flex;justify-content:space-between;\"><span>{}</span><span>{}</span></footer>",
            escape_html(&contact),
            escape_html(&footer.text)
        );
    }
}

/// Render the document as a standalone HTML page. The cover section replaces
/// the body header, as in the PDF.
pub fn render_html(
    blocks: &[ContentBlock],
    cover: Option<&CoverPageData>,
    styles: &StyleMap,
    export: &ExportConfig,
) -> String {
    let mut html = Html {
        styles,
        base: styles.base_size(),
        out: String::new(),
    };
    let title = escape_html(&styles.identity.company_name);
    let _ = write!(
        html.out,
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body style=\"margin:0;background:{};color:{};font-family:{};\">",
        styles.page.background,
        styles.page.text_color,
        styles.page.font_family.replace('"', "'"),
    );

    let cover = cover.filter(|c| c.has_title());
    if let Some(cover) = cover {
        html.cover(cover, export);
    }
    let _ = write!(html.out, "<main style=\"padding:{};\">", styles.page.padding);
    if cover.is_none() {
        html.header(export);
    }
    for block in blocks {
        html.block(block);
    }
    html.footer();
    html.out.push_str("</main></body></html>\n");
    html.out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::parse_blocks;
    use crate::style::resolve_styles;
    use crate::template::TemplateConfig;

    fn styles() -> StyleMap {
        resolve_styles(&TemplateConfig::default())
    }

    #[test]
    fn escapes_text_once() {
        let blocks = parse_blocks("Fish & chips <b>now</b>");
        let html = render_html(&blocks, None, &styles(), &ExportConfig::default());
        assert!(html.contains("Fish &amp; chips &lt;b&gt;now&lt;/b&gt;"), "{html}");
        assert!(!html.contains("&amp;amp;"));
    }

    #[test]
    fn styles_come_from_the_style_map() {
        let mut template = TemplateConfig::default();
        template.primary_color = "#ff0000".into();
        let blocks = parse_blocks("# Title");
        let html = render_html(&blocks, None, &resolve_styles(&template), &ExportConfig::default());
        assert!(html.contains("<h1 style=\""));
        assert!(html.contains("color:#ff0000;"));
    }

    #[test]
    fn cover_replaces_header() {
        let cover = CoverPageData {
            title: "Website Rebuild".into(),
            ..Default::default()
        };
        let map = styles();
        let with_cover = render_html(&[], Some(&cover), &map, &ExportConfig::default());
        assert!(with_cover.contains("class=\"cover\""));
        assert!(with_cover.contains("Client Name"));
        assert!(!with_cover.contains("<header"));

        let without = render_html(&[], None, &map, &ExportConfig::default());
        assert!(without.contains("<header"));
    }

    #[test]
    fn footer_follows_template_switch() {
        let mut template = TemplateConfig::default();
        template.show_footer = false;
        let html = render_html(&[], None, &resolve_styles(&template), &ExportConfig::default());
        assert!(!html.contains("<footer"));
        assert!(render_html(&[], None, &styles(), &ExportConfig::default()).contains("<footer"));
    }

    #[test]
    fn inline_marks_nest() {
        let blocks = parse_blocks("See **[docs](https://x.io)** and `a<b`");
        let html = render_html(&blocks, None, &styles(), &ExportConfig::default());
        assert!(html.contains("<a href=\"https://x.io\""), "{html}");
        assert!(html.contains("><strong>docs</strong></a>"));
        assert!(html.contains("a&lt;b</code>"));
    }
}
