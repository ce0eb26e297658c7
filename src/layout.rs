//! Layout – wraps rich text with the font context and turns each body unit
//! into a stack of slices, ready to be flowed onto pages.
//!
//! A [`Slice`] is the smallest piece pagination may move on its own: one
//! paragraph line, one list item, one table row, a heading. Element
//! coordinates inside a slice are relative to the slice top; x is already
//! absolute.

use crate::document::{ContentBlock, RichText, Span};
use crate::fonts::{FontKey, FontManager};
use crate::page::{BreakClass, Element, TextRun};
use crate::style::{BorderSide, StyleKey, StyleMap};

// ---------------------------------------------------------------------------
// Units and slices
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Slice {
    pub height: f32,
    pub elements: Vec<Element>,
}

/// A break-avoidance unit: one or more source blocks laid out as slices.
#[derive(Debug, Clone)]
pub struct Unit {
    pub class: BreakClass,
    pub blocks: Vec<ContentBlock>,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub slices: Vec<Slice>,
}

impl Unit {
    pub fn new(class: BreakClass, blocks: Vec<ContentBlock>) -> Self {
        Self {
            class,
            blocks,
            margin_top: 0.0,
            margin_bottom: 0.0,
            slices: Vec::new(),
        }
    }

    pub fn height(&self) -> f32 {
        self.slices.iter().map(|s| s.height).sum()
    }
}

// ---------------------------------------------------------------------------
// Typesetter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// One wrapped line. Run x offsets start at 0.
#[derive(Debug, Clone, Default)]
pub struct Line {
    pub runs: Vec<TextRun>,
    pub width: f32,
}

/// A glyph cluster of one span between whitespace.
struct Fragment {
    text: String,
    source: usize,
}

enum Piece {
    Word(Vec<Fragment>),
    Break,
}

/// Text measurement and wrapping bound to one style map and font context.
pub struct Typesetter<'a> {
    pub fonts: &'a FontManager,
    pub styles: &'a StyleMap,
    base: f32,
}

impl<'a> Typesetter<'a> {
    pub fn new(fonts: &'a FontManager, styles: &'a StyleMap) -> Self {
        Self {
            fonts,
            styles,
            base: styles.base_size(),
        }
    }

    pub fn size(&self, key: StyleKey) -> f32 {
        self.styles.get(key).font_size(self.base)
    }

    pub fn line_height(&self, key: StyleKey) -> f32 {
        self.size(key) * self.styles.get(key).line_height
    }

    /// Run attributes of `span` inside a block styled with `key`. Only the
    /// text, x and width fields are left to fill in.
    fn run_template(&self, span: &Span, key: StyleKey) -> TextRun {
        let block = self.styles.get(key);
        let mut size = self.size(key);
        let mut color = block.color.clone();
        let mut background = None;
        let family = if span.code {
            let code = self.styles.get(StyleKey::Code);
            size *= code.font_scale;
            color = code.color.clone();
            background = code.background.clone();
            code.font_family.as_str()
        } else {
            block.font_family.as_str()
        };
        if span.link.is_some() {
            color = self.styles.get(StyleKey::Link).color.clone();
        } else if span.italic && !span.code && key != StyleKey::TableHeader {
            color = self.styles.get(StyleKey::Emphasis).color.clone();
        }
        let font = self
            .fonts
            .resolve(family, block.bold || span.bold, block.italic || span.italic);
        TextRun {
            text: String::new(),
            x: 0.0,
            width: 0.0,
            font,
            size,
            color,
            background,
            link: span.link.clone(),
        }
    }

    fn measure(&self, run: &TextRun, text: &str) -> f32 {
        self.fonts.measure(&run.font, text, run.size)
    }

    /// Greedy word wrap of rich text. Whitespace collapses; `'\n'` forces a
    /// break. A word wider than `max_width` gets a line of its own.
    pub fn wrap(&self, text: &RichText, key: StyleKey, max_width: f32) -> Vec<Line> {
        let templates: Vec<TextRun> = text
            .spans
            .iter()
            .map(|span| self.run_template(span, key))
            .collect();

        let mut pieces = Vec::new();
        let mut word: Vec<Fragment> = Vec::new();
        for (source, span) in text.spans.iter().enumerate() {
            for ch in span.text.chars() {
                if ch == '\n' || ch.is_whitespace() {
                    if !word.is_empty() {
                        pieces.push(Piece::Word(std::mem::take(&mut word)));
                    }
                    if ch == '\n' {
                        pieces.push(Piece::Break);
                    }
                    continue;
                }
                match word.last_mut() {
                    Some(frag) if frag.source == source => frag.text.push(ch),
                    _ => word.push(Fragment {
                        text: ch.to_string(),
                        source,
                    }),
                }
            }
        }
        if !word.is_empty() {
            pieces.push(Piece::Word(word));
        }

        let mut lines = Vec::new();
        let mut current = Line::default();
        for piece in pieces {
            let frags = match piece {
                Piece::Break => {
                    lines.push(std::mem::take(&mut current));
                    continue;
                }
                Piece::Word(frags) => frags,
            };
            let word_width: f32 = frags
                .iter()
                .map(|f| self.measure(&templates[f.source], &f.text))
                .sum();
            let space = match current.runs.last() {
                Some(last) => self.measure(last, " "),
                None => 0.0,
            };
            if !current.runs.is_empty() && current.width + space + word_width > max_width {
                lines.push(std::mem::take(&mut current));
            } else if let Some(last) = current.runs.last_mut() {
                last.text.push(' ');
                last.width += space;
                current.width += space;
            }
            for frag in frags {
                let width = self.measure(&templates[frag.source], &frag.text);
                let template = &templates[frag.source];
                match current.runs.last_mut() {
                    Some(last) if same_attrs(last, template) => {
                        last.text.push_str(&frag.text);
                        last.width += width;
                    }
                    _ => current.runs.push(TextRun {
                        text: frag.text,
                        x: current.width,
                        width,
                        ..template.clone()
                    }),
                }
                current.width += width;
            }
        }
        if !current.runs.is_empty() {
            lines.push(current);
        }
        lines
    }

    /// Wrap unstyled text.
    pub fn wrap_plain(&self, text: &str, key: StyleKey, max_width: f32) -> Vec<Line> {
        self.wrap(&RichText::from(text), key, max_width)
    }

    /// Text elements for `lines` stacked from `top`, each `line_height` tall.
    pub fn line_elements(
        &self,
        lines: Vec<Line>,
        key: StyleKey,
        x: f32,
        width: f32,
        top: f32,
        align: Align,
    ) -> Vec<Element> {
        let lh = self.line_height(key);
        lines
            .into_iter()
            .enumerate()
            .filter(|(_, line)| !line.runs.is_empty())
            .map(|(i, line)| {
                let dx = match align {
                    Align::Left => x,
                    Align::Center => x + (width - line.width).max(0.0) / 2.0,
                    Align::Right => x + (width - line.width).max(0.0),
                };
                self.text_line(line, key, dx, top + i as f32 * lh)
            })
            .collect()
    }

    /// A single text element whose line box starts at `top`.
    pub fn text_line(&self, line: Line, key: StyleKey, x: f32, top: f32) -> Element {
        let size = self.size(key);
        let lh = self.line_height(key);
        let font = line
            .runs
            .first()
            .map(|r| r.font.clone())
            .unwrap_or_else(|| FontKey::new(crate::fonts::SANS, false, false));
        let baseline = top + (lh - size) / 2.0 + self.fonts.ascent(&font, size);
        let mut runs = line.runs;
        for run in &mut runs {
            run.x += x;
        }
        Element::Text { baseline, runs }
    }

    /// Width of a single unwrapped string in the style of `key`.
    pub fn width_of(&self, text: &str, key: StyleKey) -> f32 {
        self.wrap_plain(text, key, f32::INFINITY)
            .iter()
            .map(|l| l.width)
            .fold(0.0, f32::max)
    }
}

fn same_attrs(a: &TextRun, b: &TextRun) -> bool {
    a.font == b.font
        && a.size == b.size
        && a.color == b.color
        && a.background == b.background
        && a.link == b.link
}

// ---------------------------------------------------------------------------
// Block units
// ---------------------------------------------------------------------------

/// Horizontal extent of the body column.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub x: f32,
    pub width: f32,
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

impl Typesetter<'_> {
    /// Heading slice: wrapped lines plus the optional rule under them. The
    /// heading's bottom margin is part of the slice so that a following
    /// paragraph keeps its distance.
    pub fn heading_slice(&self, level: u8, text: &RichText, col: Column) -> Slice {
        let key = StyleKey::heading(level);
        let style = self.styles.get(key);
        let lines = self.wrap(text, key, col.width);
        let text_height = lines.len().max(1) as f32 * self.line_height(key);
        let mut elements = self.line_elements(lines, key, col.x, col.width, 0.0, Align::Left);
        let mut height = text_height + style.padding.vertical();
        if let Some(border) = style.border.as_ref().filter(|b| b.side == BorderSide::Bottom) {
            let y = height + border.width / 2.0;
            elements.push(hline(col.x, col.x + col.width, y, border.width, &border.color));
            height += border.width;
        }
        Slice {
            height: height + style.margin_bottom,
            elements,
        }
    }

    /// One slice per wrapped line.
    pub fn paragraph_slices(&self, text: &RichText, key: StyleKey, col: Column) -> Vec<Slice> {
        let lh = self.line_height(key);
        self.wrap(text, key, col.width)
            .into_iter()
            .map(|line| Slice {
                height: lh,
                elements: vec![self.text_line(line, key, col.x, 0.0)],
            })
            .collect()
    }

    /// One slice per item: marker in the gutter, text indented.
    pub fn list_slices(&self, ordered: bool, items: &[RichText], col: Column) -> Vec<Slice> {
        let item = self.styles.get(StyleKey::ListItem);
        let lh = self.line_height(StyleKey::ListItem);
        let indent = item.indent;
        items
            .iter()
            .enumerate()
            .map(|(n, text)| {
                let marker = if ordered {
                    format!("{}.", n + 1)
                } else {
                    "\u{2022}".to_string()
                };
                let mut elements = self.line_elements(
                    self.wrap_plain(&marker, StyleKey::ListMarker, indent),
                    StyleKey::ListMarker,
                    col.x,
                    indent,
                    0.0,
                    Align::Left,
                );
                let lines = self.wrap(text, StyleKey::ListItem, col.width - indent);
                let height = lines.len().max(1) as f32 * lh;
                elements.extend(self.line_elements(
                    lines,
                    StyleKey::ListItem,
                    col.x + indent,
                    col.width - indent,
                    0.0,
                    Align::Left,
                ));
                Slice {
                    height: height + item.margin_bottom,
                    elements,
                }
            })
            .collect()
    }

    /// Header row slice followed by one slice per body row.
    pub fn table_slices(&self, headers: &[RichText], rows: &[Vec<RichText>], col: Column) -> Vec<Slice> {
        let columns = headers.len().max(1);
        let cell_width = col.width / columns as f32;
        let mut slices = vec![self.table_row(headers, StyleKey::TableHeader, None, col, cell_width)];
        for (i, row) in rows.iter().enumerate() {
            let stripe = (i % 2 == 1)
                .then(|| self.styles.get(StyleKey::TableStripe).background.clone())
                .flatten();
            slices.push(self.table_row(row, StyleKey::TableCell, stripe, col, cell_width));
        }
        slices
    }

    fn table_row(
        &self,
        cells: &[RichText],
        key: StyleKey,
        stripe: Option<String>,
        col: Column,
        cell_width: f32,
    ) -> Slice {
        let style = self.styles.get(key);
        let pad = style.padding;
        let lh = self.line_height(key);
        let wrapped: Vec<Vec<Line>> = cells
            .iter()
            .map(|c| self.wrap(c, key, cell_width - pad.horizontal()))
            .collect();
        let tallest = wrapped.iter().map(Vec::len).max().unwrap_or(0).max(1);
        let height = tallest as f32 * lh + pad.vertical();

        let mut elements = Vec::new();
        if let Some(fill) = style.background.as_ref().or(stripe.as_ref()) {
            elements.push(rect(col.x, 0.0, col.width, height, fill));
        }
        for (i, lines) in wrapped.into_iter().enumerate() {
            let x = col.x + i as f32 * cell_width + pad.left;
            elements.extend(self.line_elements(
                lines,
                key,
                x,
                cell_width - pad.horizontal(),
                pad.top,
                Align::Left,
            ));
        }
        if let Some(border) = &style.border {
            elements.push(hline(col.x, col.x + col.width, height, border.width, &border.color));
        }
        Slice { height, elements }
    }

    /// One slice per line; the first and last carry the box padding. Every
    /// slice paints its own band of the background and left border.
    pub fn quote_slices(&self, text: &RichText, col: Column) -> Vec<Slice> {
        let style = self.styles.get(StyleKey::Quote);
        let pad = style.padding;
        let lh = self.line_height(StyleKey::Quote);
        let border_width = style.border.as_ref().map_or(0.0, |b| b.width);
        let inner_x = col.x + border_width + pad.left;
        let inner_width = col.width - border_width - pad.horizontal();

        let lines = self.wrap(text, StyleKey::Quote, inner_width);
        let count = lines.len();
        lines
            .into_iter()
            .enumerate()
            .map(|(i, line)| {
                let top = if i == 0 { pad.top } else { 0.0 };
                let bottom = if i + 1 == count { pad.bottom } else { 0.0 };
                let height = top + lh + bottom;
                let mut elements = Vec::new();
                if let Some(bg) = &style.background {
                    elements.push(rect(col.x, 0.0, col.width, height, bg));
                }
                if let Some(border) = &style.border {
                    elements.push(rect(col.x, 0.0, border.width, height, &border.color));
                }
                elements.push(self.text_line(line, StyleKey::Quote, inner_x, top));
                Slice { height, elements }
            })
            .collect()
    }

    pub fn rule_slice(&self, col: Column) -> Slice {
        let style = self.styles.get(StyleKey::Rule);
        let width = style.border.as_ref().map_or(1.0, |b| b.width);
        Slice {
            height: width,
            elements: vec![rect(col.x, 0.0, col.width, width, &style.color)],
        }
    }

    /// Lay out one source block as a unit of its own class.
    pub fn block_unit(&self, block: &ContentBlock, col: Column) -> Unit {
        let mut unit = Unit::new(class_of(block), vec![block.clone()]);
        let key = match block {
            ContentBlock::Heading { level, text } => {
                unit.slices.push(self.heading_slice(*level, text, col));
                StyleKey::heading(*level)
            }
            ContentBlock::Paragraph { text } => {
                unit.slices = self.paragraph_slices(text, StyleKey::Paragraph, col);
                StyleKey::Paragraph
            }
            ContentBlock::List { ordered, items } => {
                unit.slices = self.list_slices(*ordered, items, col);
                StyleKey::List
            }
            ContentBlock::Table { headers, rows } => {
                unit.slices = self.table_slices(headers, rows, col);
                StyleKey::Table
            }
            ContentBlock::Quote { text } => {
                unit.slices = self.quote_slices(text, col);
                StyleKey::Quote
            }
            ContentBlock::Rule => {
                unit.slices.push(self.rule_slice(col));
                StyleKey::Rule
            }
        };
        let style = self.styles.get(key);
        unit.margin_top = style.margin_top;
        // Headings carry their bottom margin inside the slice.
        if !matches!(block, ContentBlock::Heading { .. }) {
            unit.margin_bottom = style.margin_bottom;
        }
        unit
    }

    /// Heading immediately followed by its paragraph, kept together.
    pub fn heading_with_paragraph(&self, heading: &ContentBlock, paragraph: &ContentBlock, col: Column) -> Unit {
        let head = self.block_unit(heading, col);
        let body = self.block_unit(paragraph, col);
        let mut unit = Unit::new(
            BreakClass::HeadingWithParagraph,
            vec![heading.clone(), paragraph.clone()],
        );
        unit.margin_top = head.margin_top;
        unit.margin_bottom = body.margin_bottom;
        unit.slices = head.slices.into_iter().chain(body.slices).collect();
        unit
    }
}

fn class_of(block: &ContentBlock) -> BreakClass {
    match block {
        ContentBlock::Heading { .. } => BreakClass::Heading,
        ContentBlock::Paragraph { .. } => BreakClass::Paragraph,
        ContentBlock::List { .. } => BreakClass::List,
        ContentBlock::Table { .. } => BreakClass::Table,
        ContentBlock::Quote { .. } => BreakClass::Quote,
        ContentBlock::Rule => BreakClass::Rule,
    }
}
