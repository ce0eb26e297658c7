//! Font resource context and text measurement.
//!
//! A [`FontManager`] is created per export and passed down explicitly. It
//! always knows the two builtin PDF families (Helvetica and Courier, with AFM
//! advance widths below); TTF/OTF faces registered with
//! [`FontManager::load_font`] are measured with `ttf-parser` and embedded by
//! the renderer.

use std::collections::HashMap;

use crate::error::{ExportError, Result};

pub const SANS: &str = "Helvetica";
pub const MONO: &str = "Courier";

/// A loaded font face with metrics. Builtin faces carry no bytes.
#[derive(Clone)]
pub struct FontData {
    /// Raw font bytes (kept alive for ttf-parser's zero-copy API).
    pub bytes: Vec<u8>,
    pub units_per_em: f32,
    pub ascender: f32,
    pub descender: f32,
}

impl FontData {
    fn builtin() -> Self {
        Self {
            bytes: Vec::new(),
            units_per_em: 1000.0,
            ascender: 718.0,
            descender: -207.0,
        }
    }

    pub fn is_embedded(&self) -> bool {
        !self.bytes.is_empty()
    }
}

#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
pub struct FontKey {
    pub family: String,
    pub bold: bool,
    pub italic: bool,
}

impl FontKey {
    pub fn new(family: &str, bold: bool, italic: bool) -> Self {
        Self {
            family: family.to_string(),
            bold,
            italic,
        }
    }

    pub fn is_mono(&self) -> bool {
        self.family == MONO
    }
}

/// A face supplied by the caller, e.g. `--font Inter=Inter.ttf`.
#[derive(Debug, Clone)]
pub struct FontAsset {
    pub family: String,
    pub bold: bool,
    pub italic: bool,
    pub bytes: Vec<u8>,
}

/// Manages loaded fonts.
#[derive(Clone)]
pub struct FontManager {
    fonts: HashMap<FontKey, FontData>,
}

impl FontManager {
    pub fn new() -> Self {
        Self {
            fonts: HashMap::new(),
        }
    }

    /// Register the builtin families. Safe to call any number of times.
    pub fn ensure_default(&mut self) {
        for family in [SANS, MONO] {
            for (bold, italic) in [(false, false), (true, false), (false, true), (true, true)] {
                self.fonts
                    .entry(FontKey::new(family, bold, italic))
                    .or_insert_with(FontData::builtin);
            }
        }
    }

    /// Load a TTF/OTF font from bytes. Loading the same face twice replaces
    /// the earlier bytes.
    pub fn load_font(&mut self, family: &str, bold: bool, italic: bool, bytes: Vec<u8>) -> Result<()> {
        let face = ttf_parser::Face::parse(&bytes, 0)
            .map_err(|e| ExportError::Font(format!("{family}: {e}")))?;

        let data = FontData {
            units_per_em: face.units_per_em() as f32,
            ascender: face.ascender() as f32,
            descender: face.descender() as f32,
            bytes,
        };
        log::debug!("Loaded font {family} (bold={bold}, italic={italic})");
        self.fonts.insert(FontKey::new(family, bold, italic), data);
        Ok(())
    }

    /// Register caller-supplied faces, skipping the ones that do not parse.
    pub fn load_assets(&mut self, assets: &[FontAsset]) {
        for asset in assets {
            if let Err(e) = self.load_font(&asset.family, asset.bold, asset.italic, asset.bytes.clone()) {
                log::warn!("Skipping font — {e}");
            }
        }
    }

    fn has_embedded_family(&self, family: &str) -> bool {
        self.fonts
            .iter()
            .any(|(k, d)| d.is_embedded() && k.family.eq_ignore_ascii_case(family))
    }

    /// Pick a face for a CSS-like family list (`"Inter, sans-serif"`): the
    /// first family with a loaded face wins, otherwise a builtin one.
    pub fn resolve(&self, family_token: &str, bold: bool, italic: bool) -> FontKey {
        let mut monospace = false;
        for candidate in family_token.split(',') {
            let name = candidate.trim().trim_matches(|c| c == '"' || c == '\'');
            if name.is_empty() {
                continue;
            }
            if self.has_embedded_family(name) {
                return self.closest_variant(name, bold, italic);
            }
            monospace |= matches!(
                name.to_ascii_lowercase().as_str(),
                "monospace" | "courier" | "courier new" | "monaco" | "sf mono" | "menlo"
            );
        }
        let family = if monospace { MONO } else { SANS };
        FontKey::new(family, bold, italic)
    }

    /// Exact variant if loaded, else the regular face, else any face of the
    /// family.
    fn closest_variant(&self, family: &str, bold: bool, italic: bool) -> FontKey {
        let mut faces: Vec<&FontKey> = self
            .fonts
            .iter()
            .filter(|(k, d)| d.is_embedded() && k.family.eq_ignore_ascii_case(family))
            .map(|(k, _)| k)
            .collect();
        faces.sort();
        let exact = faces.iter().find(|k| k.bold == bold && k.italic == italic);
        let regular = faces.iter().find(|k| !k.bold && !k.italic);
        match exact.or(regular).or(faces.first()) {
            Some(key) => (*key).clone(),
            None => FontKey::new(SANS, bold, italic),
        }
    }

    /// Font data for a key; unknown keys measure as builtin Helvetica.
    pub fn get(&self, key: &FontKey) -> Option<&FontData> {
        self.fonts.get(key)
    }

    /// Measure the width of a string at a given font size (in points).
    pub fn measure(&self, key: &FontKey, text: &str, font_size: f32) -> f32 {
        if let Some(data) = self.get(key).filter(|d| d.is_embedded()) {
            if let Ok(face) = ttf_parser::Face::parse(&data.bytes, 0) {
                let scale = font_size / data.units_per_em;
                return text
                    .chars()
                    .map(|ch| match face.glyph_index(ch) {
                        Some(gid) => face.glyph_hor_advance(gid).unwrap_or(0) as f32 * scale,
                        None => font_size * 0.5,
                    })
                    .sum();
            }
        }
        let units: u32 = text.chars().map(|ch| builtin_advance(key, ch) as u32).sum();
        units as f32 * font_size / 1000.0
    }

    /// Ascender in points for the given face.
    pub fn ascent(&self, key: &FontKey, font_size: f32) -> f32 {
        match self.get(key) {
            Some(data) => data.ascender * font_size / data.units_per_em,
            None => 0.718 * font_size,
        }
    }

    /// Embedded faces in a stable order, for the renderer.
    pub fn embedded(&self) -> Vec<(&FontKey, &[u8])> {
        let mut out: Vec<(&FontKey, &[u8])> = self
            .fonts
            .iter()
            .filter(|(_, d)| d.is_embedded())
            .map(|(k, d)| (k, d.bytes.as_slice()))
            .collect();
        out.sort_by(|a, b| a.0.cmp(b.0));
        out
    }
}

impl Default for FontManager {
    fn default() -> Self {
        let mut mgr = Self::new();
        mgr.ensure_default();
        mgr
    }
}

// ---------------------------------------------------------------------------
// Builtin metrics
// ---------------------------------------------------------------------------

/// Helvetica advance widths for ASCII 32..=126 (the oblique face shares them).
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // digits
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, 667, 778, 722,
    667, 611, 722, 667, 944, 667, 667, 611, // 'A'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333,
    500, 278, 556, 500, 722, 500, 500, 500, // 'a'..'z'
    334, 260, 334, 584, // '{'..'~'
];

const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, 667, 778, 722,
    667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, 611, 611, 389,
    556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

fn builtin_advance(key: &FontKey, ch: char) -> u16 {
    if key.is_mono() {
        return 600;
    }
    let table = if key.bold { &HELVETICA_BOLD } else { &HELVETICA };
    match ch as u32 {
        code @ 32..=126 => table[(code - 32) as usize],
        // Latin-1 and beyond: roughly an average lowercase glyph.
        _ => {
            if key.bold {
                611
            } else {
                556
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_text_width() {
        let mgr = FontManager::default();
        let key = FontKey::new(SANS, false, false);
        // H(722) e(556) l(222) l(222) o(556) = 2278 units
        let w = mgr.measure(&key, "Hello", 10.0);
        assert!((w - 22.78).abs() < 0.01, "{w}");
        let bold = mgr.measure(&FontKey::new(SANS, true, false), "Hello", 10.0);
        assert!(bold > w);
    }

    #[test]
    fn courier_is_fixed_pitch() {
        let mgr = FontManager::default();
        let key = FontKey::new(MONO, false, false);
        assert_eq!(mgr.measure(&key, "iiii", 10.0), mgr.measure(&key, "WWWW", 10.0));
        assert!((mgr.measure(&key, "ab", 10.0) - 12.0).abs() < 0.001);
    }

    #[test]
    fn ensure_default_is_idempotent() {
        let mut mgr = FontManager::new();
        mgr.ensure_default();
        let count = mgr.fonts.len();
        mgr.ensure_default();
        assert_eq!(mgr.fonts.len(), count);
        assert_eq!(count, 8);
    }

    #[test]
    fn invalid_font_bytes_are_rejected() {
        let mut mgr = FontManager::default();
        let err = mgr.load_font("Broken", false, false, vec![0, 1, 2, 3]);
        assert!(matches!(err, Err(ExportError::Font(_))));
        mgr.load_assets(&[FontAsset {
            family: "Broken".into(),
            bold: false,
            italic: false,
            bytes: vec![9; 16],
        }]);
        assert!(mgr.embedded().is_empty());
    }

    #[test]
    fn family_list_falls_back_to_builtin() {
        let mgr = FontManager::default();
        let key = mgr.resolve(r#"Inter, -apple-system, "Segoe UI", sans-serif"#, true, false);
        assert_eq!(key, FontKey::new(SANS, true, false));
        let mono = mgr.resolve("'SF Mono', Monaco, monospace", false, false);
        assert!(mono.is_mono());
    }
}
