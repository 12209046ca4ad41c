//! Text measurement back ends.
//!
//! The fitter is written against [`TextMeasurer`] only. Two adapters exist:
//! - [`DocumentMeasurer`] reads the core-font metrics the PDF is written with.
//! - [`CanvasMeasurer`] asks a [`DrawingSurface`] (the preview canvas) for `measureText`
//!   widths using a CSS font shorthand, then converts canvas pixels back to millimeters.
//!
//! Both resolve fonts through `layout::fonts` and read `layout::font_metrics`, so
//! their results differ only by the surface's sub-pixel quantisation.

use crate::layout::font_metrics::{
    encode_win_ansi, get_metrics, win_ansi_code, REPLACEMENT_CODE,
};
use crate::layout::fonts::{
    normalize_weight, resolve_font, FontWeight, FontWeightInput, ResolvedFont, DEFAULT_FAMILY,
};
use crate::layout::transform::{pt_to_mm, px_per_mm, CanvasSize, PageSize};

/// Measures rendered text width. Implementations must be deterministic.
pub trait TextMeasurer {
    /// Width of `text` set in `font` at `size_pt`, in millimeters.
    fn measure_width(&self, text: &str, font: ResolvedFont, size_pt: f64) -> f64;
}

// ────────────────────────────────────────────────────────────────────────────
// Document engine
// ────────────────────────────────────────────────────────────────────────────

/// Measures with the PDF core-font widths of the exact bytes the document will contain.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentMeasurer;

impl TextMeasurer for DocumentMeasurer {
    fn measure_width(&self, text: &str, font: ResolvedFont, size_pt: f64) -> f64 {
        let units = get_metrics(font).measure_codes(&encode_win_ansi(text));
        f64::from(units) / 1000.0 * pt_to_mm(size_pt)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Drawing surface
// ────────────────────────────────────────────────────────────────────────────

/// The subset of a 2D canvas context the preview needs.
pub trait DrawingSurface {
    /// Width in CSS pixels of `text` drawn with the CSS font shorthand `font`.
    fn measure_text(&self, font: &str, text: &str) -> f64;
}

/// Measures through a drawing surface that renders the page at canvas scale.
#[derive(Debug, Clone)]
pub struct CanvasMeasurer<S> {
    surface: S,
    px_per_mm: f64,
}

impl<S: DrawingSurface> CanvasMeasurer<S> {
    pub fn new(surface: S, canvas: CanvasSize, page: PageSize, dpr: f64) -> Self {
        let scale = px_per_mm(canvas, page, dpr);
        CanvasMeasurer {
            surface,
            // Unusable scales only arise from unvalidated canvases; measure at 1px/mm.
            px_per_mm: if scale.is_finite() && scale > 0.0 {
                scale
            } else {
                1.0
            },
        }
    }

    pub fn px_per_mm(&self) -> f64 {
        self.px_per_mm
    }
}

impl<S: DrawingSurface> TextMeasurer for CanvasMeasurer<S> {
    fn measure_width(&self, text: &str, font: ResolvedFont, size_pt: f64) -> f64 {
        let size_px = pt_to_mm(size_pt) * self.px_per_mm;
        let width_px = self.surface.measure_text(&font.css_font(size_px), text);
        width_px / self.px_per_mm
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Raster surface
// ────────────────────────────────────────────────────────────────────────────

/// Canvas font used when a shorthand cannot be parsed, matching the HTML canvas default.
const DEFAULT_CANVAS_FONT: &str = "10px sans-serif";

/// Sub-pixel grid glyph advances snap to (26.6 fixed point).
const SUBPIXEL_STEPS: f64 = 64.0;

/// A headless stand-in for the browser canvas.
///
/// Resolves the CSS shorthand to a metric-compatible face and accumulates glyph advances
/// snapped to 1/64 of a device pixel, the way a hinting rasteriser reports them.
#[derive(Debug, Clone, Copy)]
pub struct RasterSurface {
    device_pixel_ratio: f64,
}

impl RasterSurface {
    pub fn new(device_pixel_ratio: f64) -> Self {
        RasterSurface {
            device_pixel_ratio: if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
                device_pixel_ratio
            } else {
                1.0
            },
        }
    }
}

impl DrawingSurface for RasterSurface {
    fn measure_text(&self, font: &str, text: &str) -> f64 {
        let (face, size_px) = parse_css_font(font)
            .or_else(|| parse_css_font(DEFAULT_CANVAS_FONT))
            .unwrap_or_else(|| {
                let face = ResolvedFont {
                    family: DEFAULT_FAMILY,
                    weight: FontWeight::Normal,
                };
                (face, 10.0)
            });
        let metrics = get_metrics(face);
        let device_px = size_px * self.device_pixel_ratio;

        let snapped: i64 = text
            .chars()
            .map(|c| {
                let units = metrics.advance(win_ansi_code(c).unwrap_or(REPLACEMENT_CODE));
                (f64::from(units) / 1000.0 * device_px * SUBPIXEL_STEPS).round() as i64
            })
            .sum();

        snapped as f64 / SUBPIXEL_STEPS / self.device_pixel_ratio
    }
}

/// Parses `[style] [weight] <size>px <family list>` into a face and a pixel size.
fn parse_css_font(font: &str) -> Option<(ResolvedFont, f64)> {
    let tokens: Vec<&str> = font.split_whitespace().collect();
    let size_idx = tokens.iter().position(|t| t.ends_with("px"))?;
    let size_px: f64 = tokens[size_idx].trim_end_matches("px").parse().ok()?;
    if !size_px.is_finite() || size_px <= 0.0 {
        return None;
    }

    let family_list = tokens[size_idx + 1..].join(" ");
    if family_list.is_empty() {
        return None;
    }

    // Anything before the size is style/variant/weight; the last weight keyword wins.
    let weight = tokens[..size_idx]
        .iter()
        .rev()
        .find(|t| !t.eq_ignore_ascii_case("italic") && !t.eq_ignore_ascii_case("oblique"))
        .map(|t| FontWeightInput::Named((*t).to_string()))
        .unwrap_or_default();

    let face = ResolvedFont {
        family: resolve_font(&family_list),
        weight: normalize_weight(&weight),
    };
    Some((face, size_px))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::fonts::FontFamily;

    const SANS: ResolvedFont = ResolvedFont {
        family: FontFamily::Sans,
        weight: FontWeight::Normal,
    };
    const CANVAS: CanvasSize = CanvasSize {
        width_px: 800.0,
        height_px: 600.0,
    };

    fn canvas_measurer(dpr: f64) -> CanvasMeasurer<RasterSurface> {
        let canvas = CanvasSize {
            width_px: CANVAS.width_px * dpr,
            height_px: CANVAS.height_px * dpr,
        };
        CanvasMeasurer::new(RasterSurface::new(dpr), canvas, PageSize::A4_LANDSCAPE, dpr)
    }

    #[test]
    fn test_document_measurer_uses_core_metrics() {
        // "John Doe" = 4280/1000 em; at 72pt one em is 25.4mm.
        let width = DocumentMeasurer.measure_width("John Doe", SANS, 72.0);
        assert!((width - 4.28 * 25.4).abs() < 1e-9, "got {width}");
    }

    #[test]
    fn test_document_measurer_scales_linearly_with_size() {
        let small = DocumentMeasurer.measure_width("Volunteer", SANS, 12.0);
        let large = DocumentMeasurer.measure_width("Volunteer", SANS, 24.0);
        assert!((large - 2.0 * small).abs() < 1e-9);
    }

    #[test]
    fn test_document_measurer_is_deterministic() {
        let a = DocumentMeasurer.measure_width("Grace Hopper", SANS, 31.0);
        let b = DocumentMeasurer.measure_width("Grace Hopper", SANS, 31.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_canvas_measurer_within_subpixel_of_document() {
        let names = ["John Doe", "Ada Lovelace", "Zoë Saldaña-Ruiz", "W. W. Wallace"];
        for dpr in [1.0, 2.0] {
            let canvas = canvas_measurer(dpr);
            for name in names {
                for size in [8.0, 17.0, 32.0, 72.0] {
                    let doc = DocumentMeasurer.measure_width(name, SANS, size);
                    let preview = canvas.measure_width(name, SANS, size);
                    let diff_px = (doc - preview).abs() * canvas.px_per_mm();
                    assert!(
                        diff_px < 1.0,
                        "{name} @ {size}pt dpr {dpr}: doc {doc}mm vs canvas {preview}mm"
                    );
                }
            }
        }
    }

    #[test]
    fn test_raster_surface_snaps_to_subpixel_grid() {
        let surface = RasterSurface::new(1.0);
        let width = surface.measure_text("normal 13px Helvetica, Arial, sans-serif", "i");
        // i = 222/1000 em → 2.886px → 184.7/64 → 185/64
        assert_eq!(width, 185.0 / 64.0);
    }

    #[test]
    fn test_raster_surface_honours_weight_and_family() {
        let surface = RasterSurface::new(1.0);
        let regular = surface.measure_text("normal 20px Helvetica", "Certificate");
        let bold = surface.measure_text("bold 20px Helvetica", "Certificate");
        let mono = surface.measure_text("normal 20px \"Courier New\", monospace", "iiii");
        assert!(bold > regular);
        assert_eq!(mono, 4.0 * 12.0);
    }

    #[test]
    fn test_unparseable_font_uses_canvas_default() {
        let surface = RasterSurface::new(1.0);
        let fallback = surface.measure_text("not a font", "abc");
        let default = surface.measure_text(DEFAULT_CANVAS_FONT, "abc");
        assert_eq!(fallback, default);
    }

    #[test]
    fn test_parse_css_font() {
        let (face, size) = parse_css_font("italic bold 24.5px Georgia, serif").unwrap();
        assert_eq!(face.family, FontFamily::Serif);
        assert_eq!(face.weight, FontWeight::Bold);
        assert_eq!(size, 24.5);
        assert!(parse_css_font("24px").is_none());
        assert!(parse_css_font("bold Helvetica").is_none());
    }
}
