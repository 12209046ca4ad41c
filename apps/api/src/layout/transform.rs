//! Coordinate Transform — converts name boxes between the editing canvas (px) and the printed page (mm).
//!
//! Scale factors are `page.dim / (canvas.dim / dpr)` for px → mm and the algebraic inverse
//! for mm → px. Millimeter outputs are rounded to 2 decimals, pixel outputs to whole pixels.
//!
//! # Degenerate inputs
//! This layer never fails. A zero canvas dimension yields an infinite sentinel on the
//! px → mm path; a zero page dimension yields zero. The mm → px path mirrors both.
//! Callers that need stricter behavior validate before converting.

use serde::{Deserialize, Serialize};

pub const MM_PER_INCH: f64 = 25.4;
pub const PT_PER_INCH: f64 = 72.0;

// ────────────────────────────────────────────────────────────────────────────
// Geometry types
// ────────────────────────────────────────────────────────────────────────────

/// A region on the editing canvas, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A region on the printed page, in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MillimeterBox {
    pub x_mm: f64,
    pub y_mm: f64,
    pub width_mm: f64,
    pub height_mm: f64,
}

/// Dimensions of the editing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width_px: f64,
    pub height_px: f64,
}

/// Dimensions of the physical page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl PageSize {
    /// A4 landscape, the only page every certificate is printed on.
    pub const A4_LANDSCAPE: PageSize = PageSize {
        width_mm: 297.0,
        height_mm: 210.0,
    };

    pub fn width_pt(&self) -> f64 {
        mm_to_pt(self.width_mm)
    }

    pub fn height_pt(&self) -> f64 {
        mm_to_pt(self.height_mm)
    }
}

/// Effective raster resolution of an image stretched over a page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dpi {
    pub x: f64,
    pub y: f64,
}

// ────────────────────────────────────────────────────────────────────────────
// Conversions
// ────────────────────────────────────────────────────────────────────────────

/// Converts a canvas box into page millimeters.
pub fn px_to_mm(px: PixelBox, canvas: CanvasSize, page: PageSize, dpr: f64) -> MillimeterBox {
    MillimeterBox {
        x_mm: axis_px_to_mm(px.x, canvas.width_px, page.width_mm, dpr),
        y_mm: axis_px_to_mm(px.y, canvas.height_px, page.height_mm, dpr),
        width_mm: axis_px_to_mm(px.width, canvas.width_px, page.width_mm, dpr),
        height_mm: axis_px_to_mm(px.height, canvas.height_px, page.height_mm, dpr),
    }
}

/// Converts a page box back onto the canvas.
pub fn mm_to_px(mm: MillimeterBox, canvas: CanvasSize, page: PageSize, dpr: f64) -> PixelBox {
    PixelBox {
        x: axis_mm_to_px(mm.x_mm, canvas.width_px, page.width_mm, dpr),
        y: axis_mm_to_px(mm.y_mm, canvas.height_px, page.height_mm, dpr),
        width: axis_mm_to_px(mm.width_mm, canvas.width_px, page.width_mm, dpr),
        height: axis_mm_to_px(mm.height_mm, canvas.height_px, page.height_mm, dpr),
    }
}

/// Unrounded horizontal canvas pixels per page millimeter.
///
/// Used where sub-pixel precision matters (text measurement, preview line placement).
pub fn px_per_mm(canvas: CanvasSize, page: PageSize, dpr: f64) -> f64 {
    (canvas.width_px / dpr) / page.width_mm
}

/// Resolution of an image of `width_px × height_px` when stretched over `page`.
///
/// A zero page dimension reports 0 on that axis.
pub fn calculate_dpi(width_px: f64, height_px: f64, page: PageSize) -> Dpi {
    let axis = |px: f64, mm: f64| {
        if mm == 0.0 {
            0.0
        } else {
            px * MM_PER_INCH / mm
        }
    };
    Dpi {
        x: axis(width_px, page.width_mm),
        y: axis(height_px, page.height_mm),
    }
}

pub fn pt_to_mm(pt: f64) -> f64 {
    pt * MM_PER_INCH / PT_PER_INCH
}

pub fn mm_to_pt(mm: f64) -> f64 {
    mm * PT_PER_INCH / MM_PER_INCH
}

// ────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ────────────────────────────────────────────────────────────────────────────

fn axis_px_to_mm(value: f64, canvas_px: f64, page_mm: f64, dpr: f64) -> f64 {
    if page_mm == 0.0 {
        return 0.0;
    }
    let css_px = canvas_px / dpr;
    if css_px == 0.0 || css_px.is_nan() {
        return f64::INFINITY.copysign(value);
    }
    // Multiply before dividing so exact inputs stay exact (100 * 297 / 800 = 37.125).
    round_to_hundredths(value * page_mm / css_px)
}

fn axis_mm_to_px(value: f64, canvas_px: f64, page_mm: f64, dpr: f64) -> f64 {
    let css_px = canvas_px / dpr;
    if css_px == 0.0 || css_px.is_nan() {
        return 0.0;
    }
    if page_mm == 0.0 || css_px.is_infinite() {
        return f64::INFINITY.copysign(value);
    }
    (value * css_px / page_mm).round()
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
