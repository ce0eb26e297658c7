//! Inline Markdown – emphasis, code spans and links inside a block's text.
//!
//! The scanner walks the text once. At each marker it tries, in order:
//! a backtick code span, a `[text](url)` link, and an emphasis run where the
//! longest marker (`***`, then `**`, then `*`, same for `_`) wins. Anything
//! that does not close is kept as literal text.

use crate::document::{RichText, Span};

/// Inherited emphasis while descending into nested markers.
#[derive(Debug, Clone, Copy, Default)]
struct Marks {
    bold: bool,
    italic: bool,
}

impl Marks {
    fn span(self, text: &str) -> Span {
        Span {
            text: text.to_string(),
            bold: self.bold,
            italic: self.italic,
            ..Span::default()
        }
    }

    fn with_delimiter(self, width: usize) -> Self {
        match width {
            3 => Self {
                bold: true,
                italic: true,
            },
            2 => Self { bold: true, ..self },
            _ => Self {
                italic: true,
                ..self
            },
        }
    }
}

/// What a marker at the scan position turned out to be.
enum Inline<'a> {
    Code(&'a str),
    Link { label: &'a str, href: &'a str },
    Emphasis { width: usize, inner: &'a str },
}

/// Parse inline markup into [`RichText`].
pub fn parse_inline(text: &str) -> RichText {
    let mut out = RichText::default();
    parse_into(text, Marks::default(), &mut out);
    out
}

fn parse_into(text: &str, marks: Marks, out: &mut RichText) {
    let bytes = text.as_bytes();
    let mut literal_start = 0;
    let mut i = 0;

    // Markers are ASCII, so every index we slice at is a char boundary.
    while i < bytes.len() {
        let matched = match bytes[i] {
            b'`' => match_code(text, i),
            b'[' => match_link(text, i),
            b'*' | b'_' => match_emphasis(text, i),
            _ => None,
        };
        let Some((inline, next)) = matched else {
            i += 1;
            continue;
        };

        out.push(marks.span(&text[literal_start..i]));
        match inline {
            Inline::Code(code) => out.push(Span {
                code: true,
                ..marks.span(code)
            }),
            Inline::Link { label, href } => out.push(Span {
                link: Some(href.to_string()),
                ..marks.span(label)
            }),
            Inline::Emphasis { width, inner } => {
                parse_into(inner, marks.with_delimiter(width), out)
            }
        }
        i = next;
        literal_start = next;
    }
    out.push(marks.span(&text[literal_start..]));
}

/// `` `code` `` – content must be non-empty and contain no backtick.
fn match_code(text: &str, start: usize) -> Option<(Inline<'_>, usize)> {
    let body = start + 1;
    let close = body + text[body..].find('`')?;
    if close == body {
        return None;
    }
    Some((Inline::Code(&text[body..close]), close + 1))
}

/// `[label](href)` – both parts non-empty; the label cannot contain `]` and
/// the href cannot contain `)`.
fn match_link(text: &str, start: usize) -> Option<(Inline<'_>, usize)> {
    let label_start = start + 1;
    let label_end = label_start + text[label_start..].find(']')?;
    if label_end == label_start || !text[label_end..].starts_with("](") {
        return None;
    }
    let href_start = label_end + 2;
    let href_end = href_start + text[href_start..].find(')')?;
    if href_end == href_start {
        return None;
    }
    let inline = Inline::Link {
        label: &text[label_start..label_end],
        href: &text[href_start..href_end],
    };
    Some((inline, href_end + 1))
}

/// Emphasis opened at `start`. The closing delimiter is searched lazily on
/// the same line, after at least one character of content.
fn match_emphasis(text: &str, start: usize) -> Option<(Inline<'_>, usize)> {
    let marker = text.as_bytes()[start];
    let run = text.as_bytes()[start..]
        .iter()
        .take_while(|&&b| b == marker)
        .count();

    for width in (1..=run.min(3)).rev() {
        let delimiter = &text[start..start + width];
        let content_start = start + width;
        let first = text[content_start..].chars().next()?;
        if first == '\n' {
            continue;
        }
        let search_from = content_start + first.len_utf8();
        let line_end = text[search_from..]
            .find('\n')
            .map_or(text.len(), |p| search_from + p);
        if let Some(pos) = text[search_from..line_end].find(delimiter) {
            let close = search_from + pos;
            let inline = Inline::Emphasis {
                width,
                inner: &text[content_start..close],
            };
            return Some((inline, close + width));
        }
    }
    None
}
