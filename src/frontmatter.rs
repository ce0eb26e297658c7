//! Frontmatter extraction – splits a raw document into optional cover-page
//! metadata and the Markdown body.
//!
//! ```text
//! ---
//! title: NetSuite ERP Optimization &
//! titleAccent: Shopify Integration.
//! clientName: Acme Industries Inc.
//! ---
//! ## Executive Summary
//! ```

use crate::document::CoverPageData;

const FENCE: &str = "---";

/// Detect a leading frontmatter block and parse it into [`CoverPageData`].
///
/// Returns `(None, text)` when there is no block at the very start of the
/// text or when neither `title` nor `titleAccent` ends up non-empty. Never
/// fails: malformed lines are skipped.
pub fn extract_cover(text: &str) -> (Option<CoverPageData>, &str) {
    let Some((block, body)) = split_frontmatter(text) else {
        return (None, text);
    };

    let mut cover = CoverPageData::default();
    for line in block.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if !cover.set(key, value.trim()) {
            log::debug!("ignoring unknown frontmatter key {key:?}");
        }
    }

    if cover.has_title() {
        (Some(cover), body)
    } else {
        (None, text)
    }
}

/// Split `text` into `(frontmatter lines, body)` if it opens with a fenced
/// block. The closing fence must be a line of its own.
fn split_frontmatter(text: &str) -> Option<(&str, &str)> {
    let rest = text.strip_prefix(FENCE)?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\n', '\r']) == FENCE {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_known_keys() {
        let src = "---\ntitle: Test Quote\ntitleAccent: Phase 2\nclientName: Acme: West\nfoo: bar\n---\n## Summary\n";
        let (cover, body) = extract_cover(src);
        let cover = cover.expect("cover expected");
        assert_eq!(cover.title, "Test Quote");
        assert_eq!(cover.title_accent, "Phase 2");
        // Only the first colon splits.
        assert_eq!(cover.client_name, "Acme: West");
        assert_eq!(body, "## Summary\n");
    }

    #[test]
    fn no_title_means_no_cover() {
        let src = "---\nsubtitle: Only a subtitle\n---\nBody";
        let (cover, body) = extract_cover(src);
        assert!(cover.is_none());
        assert_eq!(body, src);
    }

    #[test]
    fn block_must_start_the_document() {
        let src = "\n---\ntitle: Late\n---\nBody";
        let (cover, body) = extract_cover(src);
        assert!(cover.is_none());
        assert_eq!(body, src);
    }

    #[test]
    fn unclosed_block_is_body() {
        let src = "---\ntitle: Open ended\nBody";
        assert_eq!(extract_cover(src), (None, src));
    }

    #[test]
    fn closing_fence_at_end_of_text() {
        let (cover, body) = extract_cover("---\ntitle: Only cover\n---");
        assert_eq!(cover.unwrap().title, "Only cover");
        assert_eq!(body, "");
    }

    #[test]
    fn crlf_line_endings() {
        let (cover, body) = extract_cover("---\r\ntitle: Windows\r\n---\r\nText");
        assert_eq!(cover.unwrap().title, "Windows");
        assert_eq!(body, "Text");
    }

    #[test]
    fn body_does_not_yield_a_second_cover() {
        let src = "---\ntitle: Once\n---\n## Heading\n\n---\n\nMore";
        let (_, body) = extract_cover(src);
        assert!(extract_cover(body).0.is_none());
    }

    #[test]
    fn empty_input() {
        assert_eq!(extract_cover(""), (None, ""));
    }
}
