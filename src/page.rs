//! Page model – the frozen output of pagination and the only input the
//! renderer needs. Coordinates are points from the page's top-left corner.

use serde::Serialize;

use crate::document::ContentBlock;
use crate::error::Result;
use crate::fonts::FontKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    Cover,
    Body,
    Showcase,
}

/// Break-avoidance class of a placed unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakClass {
    Cover,
    Header,
    HeadingWithParagraph,
    Heading,
    Paragraph,
    List,
    Table,
    Quote,
    Rule,
    Footer,
    ShowcaseIntro,
    ShowcaseEntry,
    ShowcaseCta,
}

impl BreakClass {
    /// Units of these classes move whole to the next page when they fit on
    /// an empty one.
    pub fn avoids_break(self) -> bool {
        !matches!(self, BreakClass::Paragraph | BreakClass::Rule)
    }
}

/// A run of text with uniform font and color. `x` is absolute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    pub text: String,
    pub x: f32,
    pub width: f32,
    pub font: FontKey,
    pub size: f32,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSlot {
    Logo,
}

/// Drawing primitive.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Element {
    /// One line of text; `baseline` is the y of the text baseline.
    Text { baseline: f32, runs: Vec<TextRun> },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: String,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
        color: String,
    },
    /// Placeholder for a binary asset supplied at render time.
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        slot: ImageSlot,
    },
}

impl Element {
    pub fn translate(&mut self, dx: f32, dy: f32) {
        match self {
            Element::Text { baseline, runs } => {
                *baseline += dy;
                for run in runs {
                    run.x += dx;
                }
            }
            Element::Rect { x, y, .. } | Element::Image { x, y, .. } => {
                *x += dx;
                *y += dy;
            }
            Element::Line { x1, y1, x2, y2, .. } => {
                *x1 += dx;
                *x2 += dx;
                *y1 += dy;
                *y2 += dy;
            }
        }
    }

    /// Text content of a text line, empty for other primitives.
    pub fn text(&self) -> String {
        match self {
            Element::Text { runs, .. } => runs.iter().map(|r| r.text.as_str()).collect(),
            _ => String::new(),
        }
    }
}

/// A unit (or a slice range of one) placed on a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedBlock {
    pub class: BreakClass,
    pub y: f32,
    pub height: f32,
    /// Source blocks this unit was built from. Empty for generated regions.
    pub blocks: Vec<ContentBlock>,
    pub elements: Vec<Element>,
    /// True for the second and later pieces of a split unit.
    pub continued: bool,
    /// True when a single slice was taller than the page.
    pub overflow: bool,
}

impl PlacedBlock {
    pub fn text_lines(&self) -> Vec<String> {
        self.elements
            .iter()
            .filter(|e| matches!(e, Element::Text { .. }))
            .map(Element::text)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub index: usize,
    pub kind: PageKind,
    pub width_pt: f32,
    pub height_pt: f32,
    /// Full-bleed background token, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    pub blocks: Vec<PlacedBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<PlacedBlock>,
    /// Repeated page furniture (showcase footer).
    pub decorations: Vec<Element>,
}

impl Page {
    pub fn new(kind: PageKind, width_pt: f32, height_pt: f32) -> Self {
        Self {
            index: 0,
            kind,
            width_pt,
            height_pt,
            background: None,
            blocks: Vec::new(),
            footer: None,
            decorations: Vec::new(),
        }
    }

    /// All primitives in paint order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.decorations
            .iter()
            .chain(self.blocks.iter().flat_map(|b| b.elements.iter()))
            .chain(self.footer.iter().flat_map(|f| f.elements.iter()))
    }

    /// Every text line on the page, top to bottom in paint order.
    pub fn text_lines(&self) -> Vec<String> {
        self.elements()
            .filter(|e| matches!(e, Element::Text { .. }))
            .map(Element::text)
            .collect()
    }
}

/// Serialise a page list for inspection (`--layout-json`).
pub fn pages_to_json(pages: &[Page]) -> Result<String> {
    Ok(serde_json::to_string_pretty(pages)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str, x: f32) -> TextRun {
        TextRun {
            text: text.into(),
            x,
            width: 10.0,
            font: FontKey::new("Helvetica", false, false),
            size: 11.0,
            color: "#000".into(),
            background: None,
            link: None,
        }
    }

    #[test]
    fn translate_moves_every_coordinate() {
        let mut text = Element::Text {
            baseline: 10.0,
            runs: vec![run("a", 1.0), run("b", 11.0)],
        };
        text.translate(5.0, 100.0);
        let Element::Text { baseline, runs } = &text else {
            unreachable!()
        };
        assert_eq!(*baseline, 110.0);
        assert_eq!(runs[1].x, 16.0);
        assert_eq!(text.text(), "ab");
    }

    #[test]
    fn paragraphs_and_rules_may_split() {
        assert!(!BreakClass::Paragraph.avoids_break());
        assert!(BreakClass::Table.avoids_break());
        assert!(BreakClass::ShowcaseEntry.avoids_break());
    }

    #[test]
    fn json_tags_elements() {
        let mut page = Page::new(PageKind::Body, 595.28, 841.89);
        page.decorations.push(Element::Line {
            x1: 0.0,
            y1: 0.0,
            x2: 10.0,
            y2: 0.0,
            width: 1.0,
            color: "#e5e7eb".into(),
        });
        let json = pages_to_json(&[page]).unwrap();
        assert!(json.contains("\"kind\": \"line\""), "{json}");
        assert!(json.contains("\"body\""));
    }
}
