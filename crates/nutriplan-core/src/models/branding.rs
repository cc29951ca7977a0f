// ABOUTME: Dietitian branding settings applied to exported diet plans
// ABOUTME: Defaults match the onboarding wizard's fallback values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Disclaimer printed in the footer when the dietitian has not written one
pub const DEFAULT_DISCLAIMER: &str = "This meal plan is personalized for your specific needs. \
Consult your healthcare provider before making dietary changes.";

/// Horizontal placement of the logo in the document header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoAlignment {
    /// Left aligned
    #[default]
    Left,
    /// Centered
    Center,
    /// Right aligned
    Right,
}

impl LogoAlignment {
    /// CSS `text-align` value
    #[must_use]
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// Header options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeaderSettings {
    /// Render the logo image
    pub show_logo: bool,
    /// Logo placement
    pub logo_alignment: LogoAlignment,
    /// Render the business name
    pub show_business_name: bool,
}

impl Default for HeaderSettings {
    fn default() -> Self {
        Self {
            show_logo: true,
            logo_alignment: LogoAlignment::Left,
            show_business_name: true,
        }
    }
}

/// Social profile links
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialLinks {
    /// Instagram handle or URL
    pub instagram: String,
    /// Facebook page
    pub facebook: String,
    /// `LinkedIn` profile
    pub linkedin: String,
}

/// Footer options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FooterSettings {
    /// Contact phone
    pub phone: String,
    /// Contact email
    pub email: String,
    /// Website URL
    pub website: String,
    /// Social links
    pub social_links: SocialLinks,
    /// Disclaimer paragraph
    pub disclaimer_text: String,
}

impl Default for FooterSettings {
    fn default() -> Self {
        Self {
            phone: String::new(),
            email: String::new(),
            website: String::new(),
            social_links: SocialLinks::default(),
            disclaimer_text: DEFAULT_DISCLAIMER.to_owned(),
        }
    }
}

/// Complete branding document for one dietitian
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Branding {
    /// Practice name
    pub business_name: String,
    /// Short tagline
    pub tagline: String,
    /// Public logo URL
    pub logo_url: String,
    /// Primary color as `#rrggbb`
    pub primary_color: String,
    /// Secondary color as `#rrggbb`
    pub secondary_color: String,
    /// Font family name
    pub font_family: String,
    /// Header options
    pub header_settings: HeaderSettings,
    /// Footer options
    pub footer_settings: FooterSettings,
    /// Last save time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            business_name: String::new(),
            tagline: String::new(),
            logo_url: String::new(),
            primary_color: "#22c55e".to_owned(),
            secondary_color: "#16a34a".to_owned(),
            font_family: "Inter".to_owned(),
            header_settings: HeaderSettings::default(),
            footer_settings: FooterSettings::default(),
            updated_at: None,
        }
    }
}

impl Branding {
    /// Check a color is a `#rgb` or `#rrggbb` hex literal safe to embed in CSS
    #[must_use]
    pub fn is_valid_color(value: &str) -> bool {
        value.strip_prefix('#').is_some_and(|hex| {
            matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
        })
    }
}
