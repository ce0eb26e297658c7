//! Document model shared by every pipeline stage: cover metadata, inline
//! rich text, content blocks and case-study references.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Cover page
// ---------------------------------------------------------------------------

/// Cover-page metadata taken from the frontmatter block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverPageData {
    pub title: String,
    pub title_accent: String,
    pub subtitle: String,
    pub client_name: String,
    pub client_address: String,
    pub client_city: String,
}

impl CoverPageData {
    /// A cover page is only generated when at least one title line is set.
    pub fn has_title(&self) -> bool {
        !self.title.is_empty() || !self.title_accent.is_empty()
    }

    /// Assign a frontmatter value by key. Returns `false` for unknown keys.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        let slot = match key {
            "title" => &mut self.title,
            "titleAccent" => &mut self.title_accent,
            "subtitle" => &mut self.subtitle,
            "clientName" => &mut self.client_name,
            "clientAddress" => &mut self.client_address,
            "clientCity" => &mut self.client_city,
            _ => return false,
        };
        *slot = value.to_string();
        true
    }
}

// ---------------------------------------------------------------------------
// Inline text
// ---------------------------------------------------------------------------

/// A run of inline text with uniform emphasis.
///
/// A `'\n'` inside `text` is a hard line break.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub text: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub code: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
            ..Self::default()
        }
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            italic: true,
            ..Self::default()
        }
    }

    /// True when both spans carry the same emphasis and link target.
    pub fn same_marks(&self, other: &Span) -> bool {
        self.bold == other.bold
            && self.italic == other.italic
            && self.code == other.code
            && self.link == other.link
    }
}

/// Inline-styled text: an ordered sequence of spans.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RichText {
    pub spans: Vec<Span>,
}

impl RichText {
    pub fn new(spans: Vec<Span>) -> Self {
        let mut text = Self::default();
        for span in spans {
            text.push(span);
        }
        text
    }

    /// Append a span, merging it into the previous one when the marks match.
    pub fn push(&mut self, span: Span) {
        if span.text.is_empty() {
            return;
        }
        if let Some(last) = self.spans.last_mut() {
            if last.same_marks(&span) {
                last.text.push_str(&span.text);
                return;
            }
        }
        self.spans.push(span);
    }

    /// The text without any markup.
    pub fn plain(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(|s| s.text.is_empty())
    }
}

impl From<&str> for RichText {
    fn from(text: &str) -> Self {
        Self::new(vec![Span::plain(text)])
    }
}

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

/// One structural unit of the parsed document body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Heading { level: u8, text: RichText },
    Paragraph { text: RichText },
    List { ordered: bool, items: Vec<RichText> },
    Table {
        headers: Vec<RichText>,
        rows: Vec<Vec<RichText>>,
    },
    Quote { text: RichText },
    Rule,
}

impl ContentBlock {
    /// Short name used in log messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ContentBlock::Heading { .. } => "heading",
            ContentBlock::Paragraph { .. } => "paragraph",
            ContentBlock::List { .. } => "list",
            ContentBlock::Table { .. } => "table",
            ContentBlock::Quote { .. } => "quote",
            ContentBlock::Rule => "rule",
        }
    }
}

// ---------------------------------------------------------------------------
// Showcase entries
// ---------------------------------------------------------------------------

/// A portfolio entry listed on the trailing showcase page(s).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseStudyRef {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub link: String,
    pub category: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cover_requires_a_title_line() {
        let mut cover = CoverPageData::default();
        assert!(!cover.has_title());
        assert!(cover.set("titleAccent", "Accent"));
        assert!(cover.has_title());
        assert!(!cover.set("author", "nobody"));
    }

    #[test]
    fn rich_text_merges_matching_spans() {
        let mut text = RichText::default();
        text.push(Span::plain("Hello "));
        text.push(Span::plain("there "));
        text.push(Span::bold("world"));
        text.push(Span::plain(""));
        assert_eq!(text.spans.len(), 2);
        assert_eq!(text.plain(), "Hello there world");
    }

    #[test]
    fn blocks_serialize_with_type_tag() {
        let block = ContentBlock::Heading {
            level: 2,
            text: RichText::from("Summary"),
        };
        let json = serde_json::to_string(&block).unwrap();
        assert!(json.contains("\"type\":\"heading\""), "{json}");
        let back: ContentBlock = serde_json::from_str(&json).unwrap();
        assert_eq!(back, block);
    }
}
