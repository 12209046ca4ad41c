use serde::{Deserialize, Serialize};

use crate::errors::CertificateError;
use crate::layout::{CanvasSize, FontWeightInput, PageSize, PixelBox, TextAlign};

/// Requested font: a logical family token, a weight, and the largest size to try.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    #[serde(default = "default_family_token")]
    pub family_token: String,
    #[serde(default)]
    pub weight: FontWeightInput,
    #[serde(default = "default_max_size_pt")]
    pub max_size_pt: f64,
}

impl Default for FontSpec {
    fn default() -> Self {
        FontSpec {
            family_token: default_family_token(),
            weight: FontWeightInput::default(),
            max_size_pt: default_max_size_pt(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    #[serde(default = "default_color_hex")]
    pub color_hex: String,
    #[serde(default)]
    pub align: TextAlign,
}

impl Default for TextStyle {
    fn default() -> Self {
        TextStyle {
            color_hex: default_color_hex(),
            align: TextAlign::default(),
        }
    }
}

/// Everything the editor sends to preview or generate one certificate.
///
/// The page is not part of the request: every certificate is A4 landscape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateRequest {
    pub participant_name: String,
    pub name_box: Option<PixelBox>,
    pub canvas: CanvasSize,
    /// Display density of the editor; 1.0 when the client does not report one.
    #[serde(default)]
    pub device_pixel_ratio: Option<f64>,
    #[serde(default)]
    pub font: FontSpec,
    #[serde(default)]
    pub style: TextStyle,
}

impl CertificateRequest {
    pub fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio.unwrap_or(1.0)
    }

    /// Rejects inputs that cannot produce a positioned name at all.
    ///
    /// Only an empty name, a missing box, a negative page, or non-numeric values fail.
    /// Zero-sized boxes, a zero device pixel ratio and tiny maximum sizes are accepted;
    /// they end in a degraded fit at the minimum size.
    ///
    /// Returns the name box on success so callers never re-check the `Option`.
    pub fn validate(&self, page: PageSize) -> Result<PixelBox, CertificateError> {
        if self.participant_name.trim().is_empty() {
            return Err(invalid("participant_name must not be empty"));
        }

        let name_box = self
            .name_box
            .ok_or_else(|| invalid("name_box is required"))?;
        if ![name_box.x, name_box.y, name_box.width, name_box.height]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(invalid("name_box coordinates must be finite"));
        }

        if !page.width_mm.is_finite()
            || !page.height_mm.is_finite()
            || page.width_mm < 0.0
            || page.height_mm < 0.0
        {
            return Err(invalid("page dimensions must not be negative"));
        }
        if !self.canvas.width_px.is_finite() || !self.canvas.height_px.is_finite() {
            return Err(invalid("canvas dimensions must be finite"));
        }
        if !self.device_pixel_ratio().is_finite() {
            return Err(invalid("device_pixel_ratio must be finite"));
        }
        if !self.font.max_size_pt.is_finite() {
            return Err(invalid("font.max_size_pt must be finite"));
        }

        Ok(name_box)
    }
}

fn invalid(msg: &str) -> CertificateError {
    CertificateError::InvalidArgument(msg.to_string())
}

fn default_family_token() -> String {
    "helvetica".to_string()
}

fn default_max_size_pt() -> f64 {
    32.0
}

fn default_color_hex() -> String {
    "#000000".to_string()
}
