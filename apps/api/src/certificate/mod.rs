// Certificate pipeline
// Implements: request → mm name box → fitted, positioned name → PDF document or preview layout.
// Preview and document share `layout_name`; only the TextMeasurer differs.

pub mod assembler;
pub mod backdrop;
pub mod color;
pub mod handlers;
pub mod preview;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::CertificateError;
use crate::layout::font_metrics::printable_text;
use crate::layout::transform::px_to_mm;
use crate::layout::{
    fit_text_in_box, position_lines, FitParams, FitResult, MillimeterBox, PageSize, PlacedLine,
    ResolvedFont, TextMeasurer,
};
use crate::models::certificate::CertificateRequest;

/// The name, fitted and positioned in page millimeters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameLayout {
    pub name_box_mm: MillimeterBox,
    pub font: ResolvedFont,
    pub fit: FitResult,
    pub lines: Vec<PlacedLine>,
}

/// Non-fatal conditions met while producing a certificate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum GenerationWarning {
    /// Nothing fit; the name was set at the minimum size and may be clipped.
    FitDegraded,
    /// The backdrop was missing or unreadable; the page is text-only.
    AssetUnavailable(String),
    /// The colour was not a hex RGB string; black was used.
    InvalidColor(String),
}

impl GenerationWarning {
    pub fn code(&self) -> &'static str {
        match self {
            GenerationWarning::FitDegraded => "fit_degraded",
            GenerationWarning::AssetUnavailable(_) => "asset_unavailable",
            GenerationWarning::InvalidColor(_) => "invalid_color",
        }
    }
}

/// Validates the request, converts the name box to millimeters, then fits and positions
/// the name with `measurer`.
pub fn layout_name<M: TextMeasurer + ?Sized>(
    request: &CertificateRequest,
    page: PageSize,
    params: &FitParams,
    measurer: &M,
) -> Result<NameLayout, CertificateError> {
    let name_box = request.validate(page)?;
    let name_box_mm = px_to_mm(
        name_box,
        request.canvas,
        page,
        request.device_pixel_ratio(),
    );
    // A zero canvas converts to infinite sentinels; there is no page position to draw at.
    if ![
        name_box_mm.x_mm,
        name_box_mm.y_mm,
        name_box_mm.width_mm,
        name_box_mm.height_mm,
    ]
    .iter()
    .all(|v| v.is_finite())
    {
        return Err(CertificateError::InvalidArgument(format!(
            "name_box cannot be placed on the page from a {}x{} canvas",
            request.canvas.width_px, request.canvas.height_px
        )));
    }

    let font = ResolvedFont::resolve(&request.font.family_token, &request.font.weight);
    let text = printable_text(request.participant_name.trim());
    let fit = fit_text_in_box(
        &text,
        &name_box_mm,
        font,
        request.font.max_size_pt,
        params,
        measurer,
    );
    if fit.degraded {
        warn!(
            "name {:?} does not fit {:?} even at {}pt; text may be clipped",
            request.participant_name, name_box_mm, fit.font_size_pt
        );
    }

    let lines = position_lines(&fit, &name_box_mm, request.style.align, font, params);
    Ok(NameLayout {
        name_box_mm,
        font,
        fit,
        lines,
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::layout::{CanvasSize, PixelBox};
    use crate::models::certificate::{CertificateRequest, FontSpec, TextStyle};

    /// A 200×100px box on an 800×600 canvas: 74.25×35mm on the page.
    pub fn request(name: &str) -> CertificateRequest {
        CertificateRequest {
            participant_name: name.to_string(),
            name_box: Some(PixelBox {
                x: 100.0,
                y: 50.0,
                width: 200.0,
                height: 100.0,
            }),
            canvas: CanvasSize {
                width_px: 800.0,
                height_px: 600.0,
            },
            device_pixel_ratio: None,
            font: FontSpec::default(),
            style: TextStyle::default(),
        }
    }
}
