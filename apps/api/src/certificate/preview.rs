//! Preview layout in editor canvas pixels.
//!
//! The font size and line breaks are decided once, with the document measurer, so the
//! editor and the PDF can never disagree on them. The canvas measurer then supplies what
//! the editor will actually draw: each line's width in canvas pixels and the alignment
//! offset that follows from it.

use serde::{Deserialize, Serialize};

use crate::certificate::{layout_name, NameLayout};
use crate::errors::CertificateError;
use crate::layout::transform::pt_to_mm;
use crate::layout::{
    CanvasMeasurer, DocumentMeasurer, FitParams, FitResult, MillimeterBox, PageSize,
    RasterSurface, TextAlign, TextMeasurer,
};
use crate::models::certificate::CertificateRequest;

/// One name line in CSS pixels of the editor canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewLine {
    pub text: String,
    pub x_px: f64,
    pub top_px: f64,
    pub baseline_px: f64,
    /// Width as the canvas measures it; may differ from the document by a sub-pixel amount.
    pub width_px: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewLayout {
    /// CSS font shorthand to assign to the canvas context before `fillText`.
    pub font_css: String,
    pub font_size_px: f64,
    pub line_height_px: f64,
    pub lines: Vec<PreviewLine>,
    pub name_box_mm: MillimeterBox,
    /// The document's fit, unchanged.
    pub fit: FitResult,
    pub text_may_be_clipped: bool,
}

/// Computes the preview layout for `request` on the A4 landscape page.
pub fn compute_preview(
    request: &CertificateRequest,
    params: &FitParams,
) -> Result<PreviewLayout, CertificateError> {
    let page = PageSize::A4_LANDSCAPE;
    let dpr = request.device_pixel_ratio();
    let layout = layout_name(request, page, params, &DocumentMeasurer)?;
    let canvas = CanvasMeasurer::new(RasterSurface::new(dpr), request.canvas, page, dpr);

    Ok(to_canvas_space(layout, request, page, &canvas))
}

/// Maps the millimeter layout onto the canvas without the whole-pixel rounding of
/// `mm_to_px`; glyph placement needs sub-pixel positions.
fn to_canvas_space(
    layout: NameLayout,
    request: &CertificateRequest,
    page: PageSize,
    canvas: &CanvasMeasurer<RasterSurface>,
) -> PreviewLayout {
    let px_per_mm = canvas.px_per_mm();
    let scale_y = (request.canvas.height_px / request.device_pixel_ratio()) / page.height_mm;
    let px_per_mm_y = if scale_y.is_finite() && scale_y > 0.0 {
        scale_y
    } else {
        px_per_mm
    };
    let size_pt = f64::from(layout.fit.font_size_pt);

    let lines = layout
        .lines
        .iter()
        .map(|line| {
            let canvas_width_mm = canvas.measure_width(&line.text, layout.font, size_pt);
            // Re-align on the canvas width so the drawn run sits where the PDF's does.
            let slack = line.width_mm - canvas_width_mm;
            let x_mm = match request.style.align {
                TextAlign::Left => line.x_mm,
                TextAlign::Center => line.x_mm + slack / 2.0,
                TextAlign::Right => line.x_mm + slack,
            };
            PreviewLine {
                text: line.text.clone(),
                x_px: x_mm * px_per_mm,
                top_px: line.top_mm * px_per_mm_y,
                baseline_px: line.baseline_mm * px_per_mm_y,
                width_px: canvas_width_mm * px_per_mm,
            }
        })
        .collect();

    let font_size_px = pt_to_mm(size_pt) * px_per_mm;
    let text_may_be_clipped = layout.fit.degraded;

    PreviewLayout {
        font_css: layout.font.css_font(font_size_px),
        font_size_px,
        line_height_px: layout.fit.line_height_mm * px_per_mm_y,
        lines,
        name_box_mm: layout.name_box_mm,
        fit: layout.fit,
        text_may_be_clipped,
    }
}
