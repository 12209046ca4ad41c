//! Font Name Resolver — maps editor font tokens onto the closed set both renderers can draw.
//!
//! The document engine only has the standard core faces (Helvetica, Times, Courier in
//! regular and bold). The preview canvas requests the same faces through a CSS font
//! shorthand with metric-compatible fallbacks, so both sides resolve through this module.

use serde::{Deserialize, Serialize};
use tracing::debug;

// ────────────────────────────────────────────────────────────────────────────
// Font types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    Sans,
    Serif,
    Mono,
}

/// Substituted for any token the resolver does not recognise.
pub const DEFAULT_FAMILY: FontFamily = FontFamily::Sans;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// A weight as sent by the editor: either a CSS keyword or a numeric weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FontWeightInput {
    Numeric(f64),
    Named(String),
}

impl Default for FontWeightInput {
    fn default() -> Self {
        FontWeightInput::Named("normal".to_string())
    }
}

/// A family/weight pair from the closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedFont {
    pub family: FontFamily,
    pub weight: FontWeight,
}

impl ResolvedFont {
    pub fn resolve(token: &str, weight: &FontWeightInput) -> Self {
        ResolvedFont {
            family: resolve_font(token),
            weight: normalize_weight(weight),
        }
    }

    /// The PDF standard font name for this face.
    pub fn pdf_base_font(&self) -> &'static str {
        match (self.family, self.weight) {
            (FontFamily::Sans, FontWeight::Normal) => "Helvetica",
            (FontFamily::Sans, FontWeight::Bold) => "Helvetica-Bold",
            (FontFamily::Serif, FontWeight::Normal) => "Times-Roman",
            (FontFamily::Serif, FontWeight::Bold) => "Times-Bold",
            (FontFamily::Mono, FontWeight::Normal) => "Courier",
            (FontFamily::Mono, FontWeight::Bold) => "Courier-Bold",
        }
    }

    /// CSS family list; every entry is metric-compatible with the PDF face.
    pub fn css_family_list(&self) -> &'static str {
        match self.family {
            FontFamily::Sans => "Helvetica, Arial, sans-serif",
            FontFamily::Serif => "\"Times New Roman\", Times, serif",
            FontFamily::Mono => "\"Courier New\", Courier, monospace",
        }
    }

    /// CSS font shorthand for a canvas context, e.g. `bold 24px Helvetica, Arial, sans-serif`.
    pub fn css_font(&self, size_px: f64) -> String {
        let weight = match self.weight {
            FontWeight::Normal => "normal",
            FontWeight::Bold => "bold",
        };
        format!("{weight} {size_px}px {}", self.css_family_list())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Resolution
// ────────────────────────────────────────────────────────────────────────────

/// Resolves a font token (or a CSS family list) to a family in the closed set.
///
/// Matching is case-insensitive and ignores quotes; for a list, the first recognised
/// entry wins. Unknown tokens silently fall back to [`DEFAULT_FAMILY`].
pub fn resolve_font(token: &str) -> FontFamily {
    let resolved = token
        .split(',')
        .map(|name| {
            name.trim()
                .trim_matches(['"', '\''])
                .to_ascii_lowercase()
        })
        .find_map(|name| family_for_name(&name));

    match resolved {
        Some(family) => family,
        None => {
            debug!("font token {token:?} not recognised, using {DEFAULT_FAMILY:?}");
            DEFAULT_FAMILY
        }
    }
}

/// Collapses any weight representation to normal or bold.
///
/// Numeric weights ≥ 600 are bold, as are the keywords `bold` and `bolder`.
/// Numeric strings (`"700"`) are read as numbers. Everything else is normal.
pub fn normalize_weight(weight: &FontWeightInput) -> FontWeight {
    match weight {
        FontWeightInput::Numeric(n) => weight_from_number(*n),
        FontWeightInput::Named(name) => {
            let name = name.trim();
            if name.eq_ignore_ascii_case("bold") || name.eq_ignore_ascii_case("bolder") {
                FontWeight::Bold
            } else if let Ok(n) = name.parse::<f64>() {
                weight_from_number(n)
            } else {
                FontWeight::Normal
            }
        }
    }
}

fn weight_from_number(n: f64) -> FontWeight {
    if n >= 600.0 {
        FontWeight::Bold
    } else {
        FontWeight::Normal
    }
}

fn family_for_name(name: &str) -> Option<FontFamily> {
    match name {
        "helvetica" | "arial" | "sans-serif" | "sans" | "base-sans" | "liberation sans" => {
            Some(FontFamily::Sans)
        }
        "times" | "times new roman" | "times-roman" | "serif" | "base-serif" | "georgia"
        | "liberation serif" => Some(FontFamily::Serif),
        "courier" | "courier new" | "monospace" | "mono" | "base-mono" | "liberation mono" => {
            Some(FontFamily::Mono)
        }
        _ => None,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
