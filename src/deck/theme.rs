//! Theme palette and its resolution into renderer colors.

use serde::{Deserialize, Serialize};

use crate::common::RGBColor;

/// Named palette attached to a deck (or to a single slide via
/// `style.theme`). Colors are hex strings on the wire; parsing and
/// fallback happen at render time so a malformed persisted color can
/// never fail an export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Theme {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
}

/// Per-field fallback used when a theme color is absent or unparseable.
pub const DEFAULT_PRIMARY: RGBColor = RGBColor::new(0x1a, 0x36, 0x5d);
pub const DEFAULT_TEXT: RGBColor = RGBColor::new(0x1a, 0x20, 0x2c);
pub const DEFAULT_BACKGROUND: RGBColor = RGBColor::new(0xff, 0xff, 0xff);

/// Theme resolved into concrete colors, as consumed by the layout
/// renderers. Only the fields the renderers read are carried.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTheme {
    pub primary: RGBColor,
    pub text: RGBColor,
    pub background: RGBColor,
    pub font_family: Option<String>,
}

impl ResolvedTheme {
    /// Resolve a slide-level theme against the deck default.
    ///
    /// Each field independently prefers the slide theme, then the deck
    /// theme, then the fixed default.
    pub fn resolve(slide_theme: Option<&Theme>, deck_theme: &Theme) -> Self {
        let pick = |f: fn(&Theme) -> Option<&String>, fallback: RGBColor| -> RGBColor {
            slide_theme
                .and_then(f)
                .or_else(|| f(deck_theme))
                .and_then(|hex| RGBColor::from_hex(hex))
                .unwrap_or(fallback)
        };

        Self {
            primary: pick(|t| t.primary_color.as_ref(), DEFAULT_PRIMARY),
            text: pick(|t| t.text_color.as_ref(), DEFAULT_TEXT),
            background: pick(|t| t.background_color.as_ref(), DEFAULT_BACKGROUND),
            font_family: slide_theme
                .and_then(|t| t.font_family.clone())
                .or_else(|| deck_theme.font_family.clone()),
        }
    }
}

impl Default for ResolvedTheme {
    fn default() -> Self {
        Self {
            primary: DEFAULT_PRIMARY,
            text: DEFAULT_TEXT,
            background: DEFAULT_BACKGROUND,
            font_family: None,
        }
    }
}
