//! Template and export configuration, plus the bundled sample document.
//!
//! `TemplateConfig` is stored as camelCase JSON by the editor, so the serde
//! attributes mirror that shape. Missing fields fall back to the default
//! template.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ExportError, Result};
use crate::style::Color;

// ---------------------------------------------------------------------------
// Template
// ---------------------------------------------------------------------------

/// User-editable presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TemplateConfig {
    // Company identity
    pub company_name: String,
    pub company_tagline: String,
    pub contact_email: String,
    pub website: String,
    pub logo_url: String,

    // Color tokens
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
    pub text_color: String,
    pub muted_color: String,
    pub background_color: String,

    // Typography
    pub font_family: String,
    pub base_font_size: String,

    // Header
    pub show_quote_number: bool,
    pub show_date: bool,
    pub show_validity_period: bool,
    pub validity_days: u32,
    pub quote_prefix: String,

    // Footer
    pub footer_text: String,
    pub show_footer: bool,

    // Spacing
    pub page_padding: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            company_name: "BrokenRubik Inc.".into(),
            company_tagline: "Specialized NetSuite Engineering".into(),
            contact_email: "contact@brokenrubik.co".into(),
            website: "brokenrubik.com".into(),
            logo_url: "/logo.webp".into(),
            primary_color: "#1e293b".into(),
            secondary_color: "#334155".into(),
            accent_color: "#64748b".into(),
            text_color: "#334155".into(),
            muted_color: "#64748b".into(),
            background_color: "#ffffff".into(),
            font_family: r#"Inter, -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif"#
                .into(),
            base_font_size: "11pt".into(),
            show_quote_number: true,
            show_date: true,
            show_validity_period: true,
            validity_days: 30,
            quote_prefix: "BR".into(),
            footer_text: "Thank you for considering BrokenRubik for your project.".into(),
            show_footer: true,
            page_padding: "48px 56px".into(),
        }
    }
}

impl TemplateConfig {
    /// Load a template from its JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        let template: Self = serde_json::from_str(json)?;
        template.validate()?;
        Ok(template)
    }

    /// Every color field must be a color token and the validity period
    /// must be positive.
    pub fn validate(&self) -> Result<()> {
        let colors = [
            ("primaryColor", &self.primary_color),
            ("secondaryColor", &self.secondary_color),
            ("accentColor", &self.accent_color),
            ("textColor", &self.text_color),
            ("mutedColor", &self.muted_color),
            ("backgroundColor", &self.background_color),
        ];
        for (name, token) in colors {
            if Color::parse(token).is_none() {
                return Err(ExportError::Template(format!(
                    "{name} is not a color: {token:?}"
                )));
            }
        }
        if self.validity_days == 0 {
            return Err(ExportError::Template(
                "validityDays must be a positive number of days".into(),
            ));
        }
        Ok(())
    }

    /// Quote identifier for the `sequence`-th quote, e.g. `BR-0007`.
    pub fn quote_number(&self, sequence: u32) -> String {
        format!("{}-{:04}", self.quote_prefix, sequence)
    }
}

// ---------------------------------------------------------------------------
// Export settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    A4,
    Letter,
    Legal,
}

impl PageSize {
    /// Portrait `(width, height)` in points.
    pub fn dimensions_pt(self) -> (f32, f32) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Raster budget for embedded images.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Draft,
    #[default]
    Standard,
    High,
}

impl Quality {
    /// Longest edge, in pixels, an embedded image may keep. `None` keeps
    /// the source resolution.
    pub fn max_image_edge(self) -> Option<u32> {
        match self {
            Quality::Draft => Some(256),
            Quality::Standard => Some(512),
            Quality::High => None,
        }
    }
}

/// Per-export settings. Dates and numbering are supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportConfig {
    pub page_size: PageSize,
    pub orientation: Orientation,
    pub filename: String,
    pub quality: Quality,
    pub include_date: bool,
    pub quote_number: String,
    pub issued_on: Option<NaiveDate>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            orientation: Orientation::Portrait,
            filename: "quote".into(),
            quality: Quality::Standard,
            include_date: true,
            quote_number: String::new(),
            issued_on: None,
        }
    }
}

impl ExportConfig {
    /// Page `(width, height)` in points after applying the orientation.
    pub fn page_dimensions(&self) -> (f32, f32) {
        let (w, h) = self.page_size.dimensions_pt();
        match self.orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }

    /// Output file name with the `.pdf` suffix.
    pub fn output_filename(&self) -> String {
        let stem = self.filename.trim();
        let stem = if stem.is_empty() { "quote" } else { stem };
        format!("{stem}.pdf")
    }
}

// ---------------------------------------------------------------------------
// Sample document
// ---------------------------------------------------------------------------

/// The starter document shown to new users. Exercises every block type.
pub fn sample_document() -> &'static str {
    r#"---
title: NetSuite ERP Optimization &
titleAccent: Shopify Integration.
subtitle: A comprehensive proposal to stabilize your ERP environment, automate order-to-cash workflows, and implement a scalable B2B portal.
clientName: Acme Industries Inc.
clientAddress: 100 Innovation Dr, Suite 500
clientCity: San Francisco, CA 94105
---

## Executive Summary

This proposal outlines a comprehensive solution to optimize your NetSuite ERP environment and integrate it seamlessly with your Shopify e-commerce platform. Our approach focuses on three key areas:

- **ERP Stabilization**: Address performance bottlenecks and data integrity issues
- **Workflow Automation**: Streamline order-to-cash and procure-to-pay processes
- **B2B Portal Implementation**: Create a scalable self-service portal for your wholesale customers

## Scope of Work

### Phase 1: Discovery & Assessment

During the discovery phase, we will conduct a thorough analysis of your current NetSuite environment:

- Comprehensive audit of existing customizations and scripts
- Performance analysis and bottleneck identification
- Data integrity review and cleanup recommendations
- Integration architecture assessment
- Stakeholder interviews to understand pain points

### Phase 2: ERP Optimization

Based on our findings, we will implement the following optimizations:

- Script refactoring for improved performance
- Saved search optimization
- Role and permission restructuring
- Custom record cleanup and consolidation
- Scheduled script efficiency improvements

### Phase 3: Shopify Integration

Our integration approach ensures real-time synchronization between platforms:

- Bidirectional inventory sync
- Order import with custom field mapping
- Customer data synchronization
- Product information management
- Fulfillment status updates

### Phase 4: B2B Portal Development

A custom SuiteCommerce implementation tailored to your wholesale business:

- Customer-specific pricing and catalogs
- Quick order functionality
- Order history and reordering
- Account statement access
- Credit limit management

## Investment Summary

| Phase | Description | Hours | Rate | Total |
|-------|-------------|-------|------|-------|
| Phase 1 | Discovery & Assessment | 24 | $175 | $4,200 |
| Phase 2 | ERP Optimization | 48 | $175 | $8,400 |
| Phase 3 | Shopify Integration | 64 | $175 | $11,200 |
| Phase 4 | B2B Portal | 80 | $175 | $14,000 |
| - | Project Management | 20 | $150 | $3,000 |
| - | QA & Testing | 24 | $150 | $3,600 |

> **Total Investment: $44,400 USD**

## Project Timeline

The project will be delivered over a 12-week period:

1. **Weeks 1-2**: Discovery & Assessment
2. **Weeks 3-5**: ERP Optimization
3. **Weeks 6-9**: Shopify Integration Development
4. **Weeks 10-12**: B2B Portal Development & Go-Live

## Deliverables

Upon project completion, you will receive:

- Fully optimized NetSuite environment
- Real-time Shopify integration
- Custom B2B portal with wholesale features
- Complete technical documentation
- Admin training sessions (4 hours)
- End-user training sessions (8 hours)
- 30 days of post-launch support

## Terms & Conditions

- 50% deposit required to commence work
- Remaining balance due upon project completion
- Change requests quoted separately
- This proposal is valid for 30 days

## Next Steps

1. Review and approve this proposal
2. Sign Statement of Work
3. Submit initial deposit
4. Schedule project kickoff meeting

---

*Questions? Contact us at contact@brokenrubik.co*
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_is_valid() {
        TemplateConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_uses_defaults() {
        let t = TemplateConfig::from_json(r##"{"companyName":"Acme","primaryColor":"#ff0000"}"##)
            .unwrap();
        assert_eq!(t.company_name, "Acme");
        assert_eq!(t.primary_color, "#ff0000");
        assert_eq!(t.validity_days, 30);
    }

    #[test]
    fn invalid_color_is_rejected() {
        let t = TemplateConfig {
            muted_color: "not-a-color".into(),
            ..TemplateConfig::default()
        };
        assert!(matches!(t.validate(), Err(ExportError::Template(_))));
    }

    #[test]
    fn zero_validity_is_rejected() {
        let t = TemplateConfig {
            validity_days: 0,
            ..TemplateConfig::default()
        };
        assert!(t.validate().is_err());
    }

    #[test]
    fn quote_number_is_zero_padded() {
        assert_eq!(TemplateConfig::default().quote_number(7), "BR-0007");
        assert_eq!(TemplateConfig::default().quote_number(12345), "BR-12345");
    }

    #[test]
    fn landscape_swaps_dimensions() {
        let export = ExportConfig {
            page_size: PageSize::Letter,
            orientation: Orientation::Landscape,
            ..ExportConfig::default()
        };
        assert_eq!(export.page_dimensions(), (792.0, 612.0));
    }

    #[test]
    fn export_config_json_shape() {
        let export: ExportConfig = serde_json::from_str(
            r#"{"pageSize":"legal","quality":"draft","issuedOn":"2025-01-15"}"#,
        )
        .unwrap();
        assert_eq!(export.page_size, PageSize::Legal);
        assert_eq!(export.quality, Quality::Draft);
        assert_eq!(export.issued_on, NaiveDate::from_ymd_opt(2025, 1, 15));
        assert_eq!(export.output_filename(), "quote.pdf");
    }
}
