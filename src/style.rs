//! Style resolver – maps a [`TemplateConfig`] onto a flat [`StyleMap`] of
//! presentation attributes shared by the PDF and HTML backends.
//!
//! Color, font and spacing values stay opaque tokens here; the resolver only
//! substitutes a default when a token is empty. Interpreting a token is up to
//! the consumer, via [`Color::parse`], [`parse_length`] and [`Edges::parse`].

use std::collections::BTreeMap;

use serde::Serialize;

use crate::template::TemplateConfig;

/// Sizes below are authored against this base and stored as ratios.
const REFERENCE_SIZE: f32 = 11.0;

const HAIRLINE: &str = "#e5e7eb";
const MONO_FAMILY: &str = "'SF Mono', Monaco, monospace";

// Fixed palette of the dark cover and showcase pages.
const DARK_BACKGROUND: &str = "#0A0A0A";
const DARK_CARD: &str = "#141414";
const DARK_DIVIDER: &str = "#1e1e2e";
const BADGE_BACKGROUND: &str = "#1a1a2e";
const BADGE_TEXT: &str = "#9547FF";
const HIGHLIGHT: &str = "#DFF95F";
const SLATE_LIGHT: &str = "#94A3B8";
const SLATE_MUTED: &str = "#64748B";

// ---------------------------------------------------------------------------
// Style map
// ---------------------------------------------------------------------------

/// Every styled element the backends know how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleKey {
    Heading1,
    Heading2,
    Heading3,
    Paragraph,
    List,
    ListItem,
    ListMarker,
    Table,
    TableHeader,
    TableCell,
    TableStripe,
    Quote,
    Rule,
    Code,
    Link,
    Emphasis,
    Strong,
    HeaderCompany,
    HeaderTagline,
    HeaderQuoteNumber,
    HeaderMeta,
    Footer,
    CoverBadge,
    CoverTitle,
    CoverTitleAccent,
    CoverSubtitle,
    CoverCard,
    CoverLabel,
    CoverName,
    CoverDetail,
    CoverDate,
    ShowcaseBadge,
    ShowcaseTitle,
    ShowcaseSubtitle,
    ShowcaseIndex,
    ShowcaseEntryTitle,
    ShowcaseSummary,
    ShowcaseCta,
    ShowcaseCtaLink,
    ShowcaseFooter,
}

impl StyleKey {
    pub fn heading(level: u8) -> Self {
        match level {
            1 => StyleKey::Heading1,
            2 => StyleKey::Heading2,
            _ => StyleKey::Heading3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderSide {
    Top,
    Bottom,
    Left,
    All,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Border {
    pub width: f32,
    pub color: String,
    pub side: BorderSide,
}

/// Presentation attributes of one element. Sizes are in points except
/// `font_scale`, which multiplies the template's base font size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockStyle {
    pub font_family: String,
    pub font_scale: f32,
    pub bold: bool,
    pub italic: bool,
    pub mono: bool,
    pub color: String,
    pub background: Option<String>,
    pub border: Option<Border>,
    pub line_height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub padding: Edges,
    pub indent: f32,
}

impl BlockStyle {
    fn text(family: &str, size: f32, color: &str) -> Self {
        Self {
            font_family: family.to_string(),
            font_scale: size / REFERENCE_SIZE,
            bold: false,
            italic: false,
            mono: false,
            color: color.to_string(),
            background: None,
            border: None,
            line_height: 1.4,
            margin_top: 0.0,
            margin_bottom: 0.0,
            padding: Edges::default(),
            indent: 0.0,
        }
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn line_height(mut self, lh: f32) -> Self {
        self.line_height = lh;
        self
    }

    fn margins(mut self, top: f32, bottom: f32) -> Self {
        self.margin_top = top;
        self.margin_bottom = bottom;
        self
    }

    fn padding(mut self, padding: Edges) -> Self {
        self.padding = padding;
        self
    }

    fn background(mut self, color: &str) -> Self {
        self.background = Some(color.to_string());
        self
    }

    fn border(mut self, width: f32, color: &str, side: BorderSide) -> Self {
        self.border = Some(Border {
            width,
            color: color.to_string(),
            side,
        });
        self
    }

    /// Font size in points for the given base size.
    pub fn font_size(&self, base: f32) -> f32 {
        self.font_scale * base
    }
}

/// Body page attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageStyle {
    pub background: String,
    pub text_color: String,
    pub font_family: String,
    pub base_font_size: String,
    pub padding: String,
}

/// Header shown above the body when there is no cover page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderRegion {
    pub show_quote_number: bool,
    pub show_date: bool,
    pub show_validity_period: bool,
    pub validity_days: u32,
    pub rule_color: String,
}

/// Footer repeated on every body page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FooterRegion {
    pub contact_email: String,
    pub website: String,
    pub text: String,
    pub rule_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverRegion {
    pub background: String,
    pub divider: String,
    pub client_icon: String,
    pub company_icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShowcaseRegion {
    pub background: String,
    pub divider: String,
    pub badge: String,
    pub title: String,
    pub subtitle: String,
    pub cta_text: String,
    pub cta_link: String,
}

/// Company identity strings shared by every region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identity {
    pub company_name: String,
    pub tagline: String,
    pub contact_email: String,
    pub website: String,
}

/// Output of [`resolve_styles`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleMap {
    pub page: PageStyle,
    pub styles: BTreeMap<StyleKey, BlockStyle>,
    pub header: Option<HeaderRegion>,
    pub footer: Option<FooterRegion>,
    pub cover: CoverRegion,
    pub showcase: ShowcaseRegion,
    pub identity: Identity,
}

impl StyleMap {
    /// Style for `key`. Every key is populated by [`resolve_styles`]; the
    /// paragraph style stands in for maps built by hand.
    pub fn get(&self, key: StyleKey) -> &BlockStyle {
        self.styles
            .get(&key)
            .or_else(|| self.styles.get(&StyleKey::Paragraph))
            .unwrap_or(&FALLBACK_STYLE)
    }

    /// Base font size in points.
    pub fn base_size(&self) -> f32 {
        parse_length(&self.page.base_font_size, REFERENCE_SIZE)
            .filter(|s| *s > 0.0)
            .unwrap_or(REFERENCE_SIZE)
    }

    /// Body page padding in points.
    pub fn page_padding(&self) -> Edges {
        Edges::parse(&self.page.padding).unwrap_or(Edges::symmetric(36.0, 42.0))
    }
}

static FALLBACK_STYLE: BlockStyle = BlockStyle {
    font_family: String::new(),
    font_scale: 1.0,
    bold: false,
    italic: false,
    mono: false,
    color: String::new(),
    background: None,
    border: None,
    line_height: 1.4,
    margin_top: 0.0,
    margin_bottom: 0.0,
    padding: Edges::ZERO,
    indent: 0.0,
};

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

fn token_or<'a>(token: &'a str, default: &'a str) -> &'a str {
    if token.trim().is_empty() {
        default
    } else {
        token
    }
}

/// Map a template onto presentation attributes. Pure: equal templates give
/// equal maps.
pub fn resolve_styles(template: &TemplateConfig) -> StyleMap {
    let defaults = TemplateConfig::default();
    let primary = token_or(&template.primary_color, &defaults.primary_color);
    let secondary = token_or(&template.secondary_color, &defaults.secondary_color);
    let text = token_or(&template.text_color, &defaults.text_color);
    let muted = token_or(&template.muted_color, &defaults.muted_color);
    let background = token_or(&template.background_color, &defaults.background_color);
    let accent = token_or(&template.accent_color, &defaults.accent_color);
    let body_font = token_or(&template.font_family, &defaults.font_family);
    let heading_font = format!("Poppins, {body_font}");
    let heading_font = heading_font.as_str();

    let mut styles = BTreeMap::new();
    let mut put = |key, style| {
        styles.insert(key, style);
    };

    // Body blocks
    put(
        StyleKey::Heading1,
        BlockStyle::text(heading_font, 22.0, primary)
            .bold()
            .line_height(1.3)
            .margins(20.0, 14.0),
    );
    put(
        StyleKey::Heading2,
        BlockStyle::text(heading_font, 16.0, secondary)
            .bold()
            .line_height(1.3)
            .margins(24.0, 10.0)
            .padding(Edges::new(0.0, 0.0, 6.0, 0.0))
            .border(1.0, HAIRLINE, BorderSide::Bottom),
    );
    put(
        StyleKey::Heading3,
        BlockStyle::text(heading_font, 13.0, text)
            .bold()
            .line_height(1.3)
            .margins(16.0, 8.0),
    );
    put(
        StyleKey::Paragraph,
        BlockStyle::text(body_font, 11.0, text)
            .line_height(1.7)
            .margins(0.0, 10.0),
    );
    put(
        StyleKey::List,
        BlockStyle::text(body_font, 11.0, text).margins(0.0, 12.0),
    );
    put(StyleKey::ListItem, {
        let mut s = BlockStyle::text(body_font, 11.0, text)
            .line_height(1.6)
            .margins(0.0, 4.0);
        s.indent = 16.0;
        s
    });
    put(
        StyleKey::ListMarker,
        BlockStyle::text(body_font, 11.0, text).line_height(1.6),
    );
    put(
        StyleKey::Table,
        BlockStyle::text(body_font, 10.0, text).margins(12.0, 12.0),
    );
    put(
        StyleKey::TableHeader,
        BlockStyle::text(body_font, 10.0, "#ffffff")
            .bold()
            .background(primary)
            .padding(Edges::uniform(8.0)),
    );
    put(
        StyleKey::TableCell,
        BlockStyle::text(body_font, 10.0, text)
            .padding(Edges::uniform(8.0))
            .border(1.0, HAIRLINE, BorderSide::Bottom),
    );
    put(
        StyleKey::TableStripe,
        BlockStyle::text(body_font, 10.0, text).background("#f9fafb"),
    );
    put(
        StyleKey::Quote,
        BlockStyle::text(body_font, 11.0, primary)
            .bold()
            .line_height(1.5)
            .margins(12.0, 12.0)
            .padding(Edges::uniform(14.0))
            .background("#f8fafc")
            .border(3.0, primary, BorderSide::Left),
    );
    put(
        StyleKey::Rule,
        BlockStyle::text(body_font, 11.0, HAIRLINE)
            .margins(20.0, 20.0)
            .border(1.0, HAIRLINE, BorderSide::Top),
    );

    // Inline marks
    put(StyleKey::Code, {
        let mut s = BlockStyle::text(MONO_FAMILY, 9.9, text).background("#f3f4f6");
        s.mono = true;
        s
    });
    put(StyleKey::Link, BlockStyle::text(body_font, 11.0, primary));
    put(StyleKey::Emphasis, {
        let mut s = BlockStyle::text(body_font, 11.0, muted);
        s.italic = true;
        s
    });
    put(StyleKey::Strong, BlockStyle::text(body_font, 11.0, text).bold());

    // Header and footer
    put(
        StyleKey::HeaderCompany,
        BlockStyle::text(heading_font, 20.0, primary)
            .bold()
            .line_height(1.2),
    );
    put(StyleKey::HeaderTagline, BlockStyle::text(body_font, 11.0, muted));
    put(
        StyleKey::HeaderQuoteNumber,
        BlockStyle::text(body_font, 14.0, primary)
            .bold()
            .margins(0.0, 4.0),
    );
    put(StyleKey::HeaderMeta, BlockStyle::text(body_font, 11.0, muted));
    put(
        StyleKey::Footer,
        BlockStyle::text(body_font, 9.0, muted)
            .padding(Edges::new(10.0, 0.0, 0.0, 0.0))
            .border(1.0, HAIRLINE, BorderSide::Top),
    );

    // Cover page
    put(
        StyleKey::CoverBadge,
        BlockStyle::text(body_font, 10.0, BADGE_TEXT)
            .bold()
            .background(BADGE_BACKGROUND)
            .padding(Edges::symmetric(8.0, 14.0)),
    );
    put(
        StyleKey::CoverTitle,
        BlockStyle::text(heading_font, 42.0, "#FFFFFF")
            .bold()
            .line_height(1.1)
            .margins(0.0, 8.0),
    );
    put(
        StyleKey::CoverTitleAccent,
        BlockStyle::text(heading_font, 42.0, accent)
            .bold()
            .line_height(1.1)
            .margins(0.0, 8.0),
    );
    put(
        StyleKey::CoverSubtitle,
        BlockStyle::text(body_font, 13.0, SLATE_LIGHT)
            .line_height(1.6)
            .margins(16.0, 0.0),
    );
    put(
        StyleKey::CoverCard,
        BlockStyle::text(body_font, 10.0, SLATE_MUTED)
            .background(DARK_CARD)
            .padding(Edges::uniform(20.0)),
    );
    put(
        StyleKey::CoverLabel,
        BlockStyle::text(body_font, 9.0, SLATE_MUTED)
            .bold()
            .margins(0.0, 16.0),
    );
    put(
        StyleKey::CoverName,
        BlockStyle::text(body_font, 12.0, "#FFFFFF").bold(),
    );
    put(
        StyleKey::CoverDetail,
        BlockStyle::text(body_font, 10.0, SLATE_MUTED).margins(2.0, 0.0),
    );
    put(
        StyleKey::CoverDate,
        BlockStyle::text(body_font, 10.0, SLATE_LIGHT)
            .margins(16.0, 0.0)
            .padding(Edges::new(12.0, 0.0, 0.0, 0.0))
            .border(1.0, DARK_DIVIDER, BorderSide::Top),
    );

    // Showcase pages
    put(
        StyleKey::ShowcaseBadge,
        BlockStyle::text(body_font, 9.0, BADGE_TEXT)
            .bold()
            .background(BADGE_BACKGROUND)
            .padding(Edges::symmetric(5.0, 10.0))
            .margins(0.0, 12.0),
    );
    put(
        StyleKey::ShowcaseTitle,
        BlockStyle::text(heading_font, 28.0, "#FFFFFF")
            .bold()
            .line_height(1.2)
            .margins(0.0, 8.0),
    );
    put(
        StyleKey::ShowcaseSubtitle,
        BlockStyle::text(body_font, 11.0, SLATE_MUTED).margins(0.0, 40.0),
    );
    put(
        StyleKey::ShowcaseIndex,
        BlockStyle::text(body_font, 10.0, BADGE_TEXT)
            .bold()
            .background(BADGE_BACKGROUND),
    );
    put(
        StyleKey::ShowcaseEntryTitle,
        BlockStyle::text(body_font, 11.0, "#FFFFFF")
            .bold()
            .margins(0.0, 3.0),
    );
    put(
        StyleKey::ShowcaseSummary,
        BlockStyle::text(body_font, 9.0, SLATE_MUTED)
            .line_height(1.4)
            .padding(Edges::symmetric(14.0, 0.0))
            .border(1.0, DARK_DIVIDER, BorderSide::Bottom),
    );
    put(
        StyleKey::ShowcaseCta,
        BlockStyle::text(body_font, 11.0, SLATE_MUTED)
            .margins(24.0, 0.0)
            .padding(Edges::new(16.0, 0.0, 0.0, 0.0))
            .border(1.0, DARK_DIVIDER, BorderSide::Top),
    );
    put(
        StyleKey::ShowcaseCtaLink,
        BlockStyle::text(body_font, 11.0, HIGHLIGHT).bold(),
    );
    put(
        StyleKey::ShowcaseFooter,
        BlockStyle::text(body_font, 9.0, SLATE_MUTED),
    );

    let website = template.website.trim().trim_end_matches('/');

    StyleMap {
        page: PageStyle {
            background: background.to_string(),
            text_color: text.to_string(),
            font_family: body_font.to_string(),
            base_font_size: token_or(&template.base_font_size, &defaults.base_font_size)
                .to_string(),
            padding: token_or(&template.page_padding, &defaults.page_padding).to_string(),
        },
        styles,
        header: Some(HeaderRegion {
            show_quote_number: template.show_quote_number,
            show_date: template.show_date,
            show_validity_period: template.show_validity_period,
            validity_days: template.validity_days,
            rule_color: primary.to_string(),
        }),
        footer: template.show_footer.then(|| FooterRegion {
            contact_email: template.contact_email.clone(),
            website: template.website.clone(),
            text: template.footer_text.clone(),
            rule_color: HAIRLINE.to_string(),
        }),
        cover: CoverRegion {
            background: DARK_BACKGROUND.to_string(),
            divider: DARK_DIVIDER.to_string(),
            client_icon: "#2a1a1c".to_string(),
            company_icon: BADGE_TEXT.to_string(),
        },
        showcase: ShowcaseRegion {
            background: DARK_BACKGROUND.to_string(),
            divider: DARK_DIVIDER.to_string(),
            badge: "PORTFOLIO".to_string(),
            title: "Our Work Speaks".to_string(),
            subtitle: "Explore how we've helped businesses transform their operations."
                .to_string(),
            cta_text: "View all case studies at ".to_string(),
            cta_link: format!("{website}/case-studies"),
        },
        identity: Identity {
            company_name: template.company_name.clone(),
            tagline: template.company_tagline.clone(),
            contact_email: template.contact_email.clone(),
            website: template.website.clone(),
        },
    }
}

// ---------------------------------------------------------------------------
// Token interpretation
// ---------------------------------------------------------------------------

/// RGBA colour (0.0 – 1.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const TRANSPARENT: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn is_transparent(&self) -> bool {
        self.a < 0.001
    }

    /// Parse a hex (`#rgb`, `#rrggbb`, `#rrggbbaa`) or named color token.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        if let Some(hex) = token.strip_prefix('#') {
            return Self::from_hex(hex);
        }
        let named = match token.to_ascii_lowercase().as_str() {
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "transparent" => Self::TRANSPARENT,
            "red" => Self::rgb(1.0, 0.0, 0.0),
            "green" => Self::rgb(0.0, 128.0 / 255.0, 0.0),
            "blue" => Self::rgb(0.0, 0.0, 1.0),
            "gray" | "grey" => Self::rgb(128.0 / 255.0, 128.0 / 255.0, 128.0 / 255.0),
            "navy" => Self::rgb(0.0, 0.0, 128.0 / 255.0),
            "orange" => Self::rgb(1.0, 165.0 / 255.0, 0.0),
            "purple" => Self::rgb(128.0 / 255.0, 0.0, 128.0 / 255.0),
            "teal" => Self::rgb(0.0, 128.0 / 255.0, 128.0 / 255.0),
            _ => return None,
        };
        Some(named)
    }

    /// Resolve a token, falling back to black for anything unparseable.
    pub fn resolve(token: &str) -> Self {
        Self::parse(token).unwrap_or_else(|| {
            log::warn!("Unknown color token {token:?}, using black");
            Self::BLACK
        })
    }

    fn from_hex(hex: &str) -> Option<Self> {
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f32 / 255.0);
        let doubled = |i: usize| channel(&hex[i..i + 1].repeat(2));
        match hex.len() {
            3 => Some(Self::rgb(doubled(0)?, doubled(1)?, doubled(2)?)),
            6 | 8 => Some(Self {
                r: channel(&hex[0..2])?,
                g: channel(&hex[2..4])?,
                b: channel(&hex[4..6])?,
                a: if hex.len() == 8 { channel(&hex[6..8])? } else { 1.0 },
            }),
            _ => None,
        }
    }
}

/// Parse a length token into points. Accepts `pt`, `px` (at 96 dpi), `em`
/// (relative to `base`) and bare numbers (points).
pub fn parse_length(token: &str, base: f32) -> Option<f32> {
    let t = token.trim();
    let (number, factor) = if let Some(n) = t.strip_suffix("pt") {
        (n, 1.0)
    } else if let Some(n) = t.strip_suffix("px") {
        (n, 0.75)
    } else if let Some(n) = t.strip_suffix("em") {
        (n, base)
    } else {
        (t, 1.0)
    };
    let value: f32 = number.trim().parse().ok()?;
    value.is_finite().then_some(value * factor)
}

/// Four-sided spacing in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Edges {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Edges {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub const fn uniform(v: f32) -> Self {
        Self::new(v, v, v, v)
    }

    pub const fn symmetric(vertical: f32, horizontal: f32) -> Self {
        Self::new(vertical, horizontal, vertical, horizontal)
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    /// Parse CSS shorthand (1 to 4 lengths).
    pub fn parse(token: &str) -> Option<Self> {
        let parts = token
            .split_whitespace()
            .map(|p| parse_length(p, REFERENCE_SIZE))
            .collect::<Option<Vec<f32>>>()?;
        match parts[..] {
            [all] => Some(Self::uniform(all)),
            [v, h] => Some(Self::symmetric(v, h)),
            [t, h, b] => Some(Self::new(t, h, b, h)),
            [t, r, b, l] => Some(Self::new(t, r, b, l)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_from_hex() {
        let c = Color::parse("#ff8800").unwrap();
        assert!((c.r - 1.0).abs() < 0.01);
        assert!((c.g - 0.533).abs() < 0.01);
        assert_eq!(Color::parse("#fff"), Some(Color::WHITE));
        let translucent = Color::parse("#00000080").unwrap();
        assert!((translucent.a - 0.5).abs() < 0.01);
        assert_eq!(Color::parse("Navy").map(|c| c.b > 0.0), Some(true));
        assert_eq!(Color::parse("#12345"), None);
        assert_eq!(Color::parse("cornflower"), None);
    }

    #[test]
    fn unknown_color_resolves_to_black() {
        assert_eq!(Color::resolve("nope"), Color::BLACK);
    }

    #[test]
    fn lengths_and_shorthand() {
        assert_eq!(parse_length("11pt", 11.0), Some(11.0));
        assert_eq!(parse_length("48px", 11.0), Some(36.0));
        assert_eq!(parse_length("2em", 10.0), Some(20.0));
        assert_eq!(parse_length("wide", 10.0), None);
        assert_eq!(
            Edges::parse("48px 56px"),
            Some(Edges::new(36.0, 42.0, 36.0, 42.0))
        );
        assert_eq!(Edges::parse("10pt"), Some(Edges::uniform(10.0)));
        assert_eq!(Edges::parse(""), None);
    }

    #[test]
    fn resolution_is_pure() {
        let t = TemplateConfig::default();
        assert_eq!(resolve_styles(&t), resolve_styles(&t));
    }

    #[test]
    fn tokens_pass_through_unresolved() {
        let t = TemplateConfig {
            primary_color: "teal".into(),
            ..TemplateConfig::default()
        };
        let map = resolve_styles(&t);
        assert_eq!(map.get(StyleKey::Heading1).color, "teal");
        assert_eq!(map.get(StyleKey::TableHeader).background.as_deref(), Some("teal"));
    }

    #[test]
    fn accent_color_reaches_cover_title_accent() {
        let t = TemplateConfig {
            accent_color: "#ff0000".into(),
            ..TemplateConfig::default()
        };
        assert_eq!(resolve_styles(&t).get(StyleKey::CoverTitleAccent).color, "#ff0000");

        let t = TemplateConfig {
            accent_color: String::new(),
            ..TemplateConfig::default()
        };
        assert_eq!(resolve_styles(&t).get(StyleKey::CoverTitleAccent).color, "#64748b");
    }

    #[test]
    fn empty_tokens_get_defaults() {
        let t = TemplateConfig {
            text_color: "  ".into(),
            page_padding: String::new(),
            ..TemplateConfig::default()
        };
        let map = resolve_styles(&t);
        assert_eq!(map.page.text_color, "#334155");
        assert_eq!(map.page.padding, "48px 56px");
    }

    #[test]
    fn footer_toggle_gates_region() {
        let t = TemplateConfig {
            show_footer: false,
            ..TemplateConfig::default()
        };
        assert!(resolve_styles(&t).footer.is_none());
        assert!(resolve_styles(&TemplateConfig::default()).footer.is_some());
    }

    #[test]
    fn headings_shrink_with_level() {
        let map = resolve_styles(&TemplateConfig::default());
        let sizes: Vec<f32> = (1..=3)
            .map(|l| map.get(StyleKey::heading(l)).font_size(map.base_size()))
            .collect();
        assert!(sizes[0] > sizes[1] && sizes[1] > sizes[2], "{sizes:?}");
        assert_eq!(map.base_size(), 11.0);
    }
}
