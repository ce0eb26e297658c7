//! Block-level Markdown – a line tokenizer followed by a single-pass grouper
//! that turns the token stream into [`ContentBlock`]s.
//!
//! Supported dialect: `#`–`###` headings, paragraphs, `-` and `1.` lists
//! (not nested), pipe tables, `>` quotes and `---` / `***` rules. Inline
//! markup inside blocks is handled by [`crate::inline`].

use crate::document::{ContentBlock, RichText, Span};
use crate::inline::parse_inline;

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

/// Classification of one source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    Heading { level: u8, text: &'a str },
    Rule,
    Quote(&'a str),
    ListItem { ordered: bool, text: &'a str },
    TableRow,
    TableSeparator,
    Text,
}

/// A classified line together with its raw content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineToken<'a> {
    pub kind: LineKind<'a>,
    pub raw: &'a str,
}

/// Split `body` into classified line tokens.
pub fn tokenize(body: &str) -> Vec<LineToken<'_>> {
    body.split('\n')
        .map(|line| {
            let raw = line.strip_suffix('\r').unwrap_or(line);
            LineToken {
                kind: classify(raw),
                raw,
            }
        })
        .collect()
}

fn classify(line: &str) -> LineKind<'_> {
    if line.trim().is_empty() {
        return LineKind::Blank;
    }
    if line == "---" || line == "***" {
        return LineKind::Rule;
    }
    if let Some(heading) = heading(line) {
        return heading;
    }
    if let Some(text) = non_empty_after(line, "> ") {
        return LineKind::Quote(text);
    }
    if let Some(text) = non_empty_after(line, "- ") {
        return LineKind::ListItem {
            ordered: false,
            text,
        };
    }
    if let Some(text) = ordered_item(line) {
        return LineKind::ListItem {
            ordered: true,
            text,
        };
    }
    if is_table_row(line) {
        if is_separator_row(line) {
            return LineKind::TableSeparator;
        }
        return LineKind::TableRow;
    }
    LineKind::Text
}

fn heading(line: &str) -> Option<LineKind<'_>> {
    let level = line.bytes().take_while(|&b| b == b'#').count();
    if !(1..=3).contains(&level) {
        return None;
    }
    let text = non_empty_after(&line[level..], " ")?;
    Some(LineKind::Heading {
        level: level as u8,
        text,
    })
}

/// `prefix` followed by at least one non-blank character.
fn non_empty_after<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let text = line.strip_prefix(prefix)?.trim();
    (!text.is_empty()).then_some(text)
}

fn ordered_item(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    non_empty_after(&line[digits..], ". ")
}

fn is_table_row(line: &str) -> bool {
    let t = line.trim();
    t.len() >= 2 && t.starts_with('|') && t.ends_with('|')
}

fn is_separator_row(line: &str) -> bool {
    let inner = line.trim();
    inner.contains('-')
        && inner
            .chars()
            .all(|c| matches!(c, '-' | ':' | '|') || c.is_whitespace())
}

/// Cells of a pipe row: split on `|`, trimmed, with the empty artifacts
/// before the first and after the last pipe dropped.
pub fn split_cells(row: &str) -> Vec<&str> {
    let t = row.trim();
    let t = t.strip_prefix('|').unwrap_or(t);
    let t = t.strip_suffix('|').unwrap_or(t);
    t.split('|').map(str::trim).collect()
}

// ---------------------------------------------------------------------------
// Grouper
// ---------------------------------------------------------------------------

/// Parse a Markdown body into ordered content blocks. Never fails.
pub fn parse_blocks(body: &str) -> Vec<ContentBlock> {
    let tokens = tokenize(body);
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        match &tokens[i].kind {
            LineKind::Blank => i += 1,
            LineKind::Heading { level, text } => {
                blocks.push(ContentBlock::Heading {
                    level: *level,
                    text: parse_inline(text),
                });
                i += 1;
            }
            LineKind::Rule => {
                blocks.push(ContentBlock::Rule);
                i += 1;
            }
            LineKind::Quote(_) => {
                let mut lines = Vec::new();
                while let Some(LineKind::Quote(text)) = tokens.get(i).map(|t| &t.kind) {
                    lines.push(*text);
                    i += 1;
                }
                blocks.push(ContentBlock::Quote {
                    text: parse_inline(&lines.join("\n")),
                });
            }
            LineKind::ListItem { ordered, .. } => {
                let ordered = *ordered;
                let mut items = Vec::new();
                while let Some(LineKind::ListItem { ordered: o, text }) =
                    tokens.get(i).map(|t| &t.kind)
                {
                    if *o != ordered {
                        break;
                    }
                    items.push(parse_inline(text));
                    i += 1;
                }
                blocks.push(ContentBlock::List { ordered, items });
            }
            LineKind::TableRow => match group_table(&tokens[i..]) {
                Some((table, consumed)) => {
                    blocks.push(table);
                    i += consumed;
                }
                None => i = group_paragraph(&tokens, i, &mut blocks),
            },
            LineKind::TableSeparator | LineKind::Text => {
                i = group_paragraph(&tokens, i, &mut blocks);
            }
        }
    }
    blocks
}

/// Header row, separator row, then one or more body rows.
fn group_table(tokens: &[LineToken<'_>]) -> Option<(ContentBlock, usize)> {
    if tokens.get(1)?.kind != LineKind::TableSeparator {
        return None;
    }
    let headers: Vec<&str> = split_cells(tokens[0].raw);
    if headers.iter().all(|h| h.is_empty()) {
        return None;
    }

    let mut rows = Vec::new();
    let mut consumed = 2;
    while let Some(token) = tokens.get(consumed) {
        if token.kind != LineKind::TableRow {
            break;
        }
        let mut cells: Vec<RichText> = split_cells(token.raw)
            .into_iter()
            .take(headers.len())
            .map(parse_inline)
            .collect();
        cells.resize(headers.len(), RichText::default());
        rows.push(cells);
        consumed += 1;
    }
    if rows.is_empty() {
        return None;
    }

    let headers = headers.into_iter().map(parse_inline).collect();
    Some((ContentBlock::Table { headers, rows }, consumed))
}

/// Collect text lines up to a blank line or the next structural line.
/// Returns the index of the first unconsumed token.
fn group_paragraph(tokens: &[LineToken<'_>], start: usize, blocks: &mut Vec<ContentBlock>) -> usize {
    let mut lines = vec![tokens[start].raw.trim()];
    let mut i = start + 1;
    while let Some(token) = tokens.get(i) {
        let joins = match token.kind {
            LineKind::Text | LineKind::TableSeparator => true,
            LineKind::TableRow => group_table(&tokens[i..]).is_none(),
            _ => false,
        };
        if !joins {
            break;
        }
        lines.push(token.raw.trim());
        i += 1;
    }
    blocks.push(ContentBlock::Paragraph {
        text: parse_inline(&lines.join("\n")),
    });
    i
}

// ---------------------------------------------------------------------------
// Serializer
// ---------------------------------------------------------------------------

/// Serialize blocks back to the Markdown dialect. Blocks are separated by a
/// blank line so that adjacent lists or quotes stay distinct.
pub fn to_markdown(blocks: &[ContentBlock]) -> String {
    let mut parts = Vec::with_capacity(blocks.len());
    for block in blocks {
        let part = match block {
            ContentBlock::Heading { level, text } => {
                format!("{} {}", "#".repeat(*level as usize), inline_markdown(text))
            }
            ContentBlock::Paragraph { text } => inline_markdown(text),
            ContentBlock::List { ordered, items } => items
                .iter()
                .enumerate()
                .map(|(n, item)| match ordered {
                    true => format!("{}. {}", n + 1, inline_markdown(item)),
                    false => format!("- {}", inline_markdown(item)),
                })
                .collect::<Vec<_>>()
                .join("\n"),
            ContentBlock::Table { headers, rows } => {
                let mut lines = vec![table_row(headers)];
                lines.push(format!("|{}", "---|".repeat(headers.len())));
                lines.extend(rows.iter().map(|r| table_row(r)));
                lines.join("\n")
            }
            ContentBlock::Quote { text } => inline_markdown(text)
                .split('\n')
                .map(|line| format!("> {line}"))
                .collect::<Vec<_>>()
                .join("\n"),
            ContentBlock::Rule => "---".to_string(),
        };
        parts.push(part);
    }
    parts.join("\n\n")
}

fn table_row(cells: &[RichText]) -> String {
    let inner: Vec<String> = cells.iter().map(inline_markdown).collect();
    format!("| {} |", inner.join(" | "))
}

/// Serialize rich text with the dialect's inline markers. Neighbouring spans
/// with the same emphasis share one pair of markers, so code spans and links
/// inside bold or italic text keep their emphasis when parsed again.
pub fn inline_markdown(text: &RichText) -> String {
    let mut out = String::new();
    let mut spans = text.spans.iter().peekable();
    while let Some(first) = spans.next() {
        let mut body = span_body(first);
        while let Some(next) = spans.next_if(|s| s.bold == first.bold && s.italic == first.italic) {
            body.push_str(&span_body(next));
        }
        let marker = match (first.bold, first.italic) {
            (true, true) => "***",
            (true, false) => "**",
            (false, true) => "*",
            (false, false) => "",
        };
        out.push_str(marker);
        out.push_str(&body);
        out.push_str(marker);
    }
    out
}

fn span_body(span: &Span) -> String {
    let text = match span.code {
        true => format!("`{}`", span.text),
        false => span.text.clone(),
    };
    match &span.link {
        Some(href) if !span.code => format!("[{text}]({href})"),
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &str) -> RichText {
        RichText::from(text)
    }

    #[test]
    fn empty_input_yields_no_blocks() {
        assert!(parse_blocks("").is_empty());
        assert!(parse_blocks("\n\n   \n").is_empty());
    }

    #[test]
    fn headings_levels() {
        let blocks = parse_blocks("# One\n## Two\n### Three\n#### Four");
        assert_eq!(blocks.len(), 4);
        assert_eq!(
            blocks[1],
            ContentBlock::Heading {
                level: 2,
                text: plain("Two")
            }
        );
        // Four hashes is not a heading in this dialect.
        assert_eq!(
            blocks[3],
            ContentBlock::Paragraph {
                text: plain("#### Four")
            }
        );
    }

    #[test]
    fn list_kind_change_splits_lists() {
        let blocks = parse_blocks("- a\n- b\n1. c");
        assert_eq!(
            blocks,
            vec![
                ContentBlock::List {
                    ordered: false,
                    items: vec![plain("a"), plain("b")]
                },
                ContentBlock::List {
                    ordered: true,
                    items: vec![plain("c")]
                },
            ]
        );
    }

    #[test]
    fn consecutive_quotes_merge() {
        let blocks = parse_blocks("> first\n> second\n\n> third");
        assert_eq!(blocks.len(), 2);
        assert_eq!(
            blocks[0],
            ContentBlock::Quote {
                text: plain("first\nsecond")
            }
        );
    }

    #[test]
    fn rules() {
        let blocks = parse_blocks("above\n\n---\n\n***\n\nbelow");
        assert_eq!(blocks[1], ContentBlock::Rule);
        assert_eq!(blocks[2], ContentBlock::Rule);
        assert_eq!(blocks.len(), 4);
    }

    #[test]
    fn table_with_rows() {
        let src = "| Phase | Hours |\n|-------|:-----:|\n| One | 24 |\n| Two | 48 |";
        let blocks = parse_blocks(src);
        assert_eq!(blocks.len(), 1);
        let ContentBlock::Table { headers, rows } = &blocks[0] else {
            panic!("expected table, got {:?}", blocks[0]);
        };
        assert_eq!(headers, &vec![plain("Phase"), plain("Hours")]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec![plain("Two"), plain("48")]);
    }

    #[test]
    fn table_rows_are_normalized_to_header_width() {
        let src = "| a | b |\n|---|---|\n| 1 | 2 | 3 |\n| only |";
        let ContentBlock::Table { rows, .. } = &parse_blocks(src)[0] else {
            panic!("expected table");
        };
        assert_eq!(rows[0], vec![plain("1"), plain("2")]);
        assert_eq!(rows[1], vec![plain("only"), RichText::default()]);
    }

    #[test]
    fn table_without_body_rows_degrades_to_paragraph() {
        let blocks = parse_blocks("| a | b |\n|---|---|");
        assert_eq!(
            blocks,
            vec![ContentBlock::Paragraph {
                text: plain("| a | b |\n|---|---|")
            }]
        );
    }

    #[test]
    fn paragraph_keeps_single_newlines_as_breaks() {
        let blocks = parse_blocks("line one\nline two\n\nnext para");
        assert_eq!(
            blocks,
            vec![
                ContentBlock::Paragraph {
                    text: plain("line one\nline two")
                },
                ContentBlock::Paragraph {
                    text: plain("next para")
                },
            ]
        );
    }

    #[test]
    fn structural_line_ends_paragraph() {
        let blocks = parse_blocks("intro\n## Next\n- item");
        assert_eq!(blocks.len(), 3);
        assert!(matches!(blocks[0], ContentBlock::Paragraph { .. }));
        assert!(matches!(blocks[1], ContentBlock::Heading { level: 2, .. }));
        assert!(matches!(blocks[2], ContentBlock::List { .. }));
    }

    #[test]
    fn angle_brackets_are_text() {
        let blocks = parse_blocks("a <b> & c\n>not a quote");
        assert_eq!(
            blocks,
            vec![ContentBlock::Paragraph {
                text: plain("a <b> & c\n>not a quote")
            }]
        );
    }

    #[test]
    fn markdown_round_trip() {
        let src = "# Title\n\nHello **world** and *you*.\n\n**run `x` now**\n\n- one\n- `two`\n\n1. first\n2. [link](https://x.y)\n\n| A | B |\n|---|---|\n| 1 | 2 |\n\n> quoted\n> twice\n\n---\n\n### End";
        let blocks = parse_blocks(src);
        assert_eq!(blocks.len(), 9);
        let again = parse_blocks(&to_markdown(&blocks));
        assert_eq!(again, blocks);
    }
}
