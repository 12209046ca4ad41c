//! Box Text Fitter — picks the largest font size at which a name fits its box.
//!
//! # Algorithm
//! - Binary search over integer point sizes in `[min_font_size_pt, min(max, 72)]`.
//! - Each candidate size is greedily word-wrapped against the box width (minus padding).
//! - A candidate is accepted when every line fits the width and the stacked lines
//!   (`lines × size × line_height_multiplier`) fit the height.
//! - If no size is accepted, the minimum size is used anyway and the result is marked
//!   `degraded`: the text may overflow, but it is never dropped.
//!
//! Everything is measured in millimeters through a [`TextMeasurer`], so the preview and
//! the document run this exact code with their own back end.

use serde::{Deserialize, Serialize};

use crate::layout::font_metrics::get_metrics;
use crate::layout::fonts::ResolvedFont;
use crate::layout::measure::TextMeasurer;
use crate::layout::transform::{pt_to_mm, MillimeterBox};

pub const MAX_FONT_SIZE_CAP_PT: u8 = 72;
pub const DEFAULT_MIN_FONT_SIZE_PT: u8 = 8;
pub const DEFAULT_PADDING_MM: f64 = 2.0;
pub const DEFAULT_LINE_HEIGHT_MULTIPLIER: f64 = 1.2;

// ────────────────────────────────────────────────────────────────────────────
// Parameters and results
// ────────────────────────────────────────────────────────────────────────────

/// Fixed knobs of the fitting search, passed in rather than read from globals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitParams {
    /// Floor of the search; also the degraded fallback size.
    pub min_font_size_pt: u8,
    /// Hard ceiling regardless of the requested maximum.
    pub max_font_size_cap_pt: u8,
    /// Inset applied on all four sides of the box.
    pub padding_mm: f64,
    pub line_height_multiplier: f64,
}

impl Default for FitParams {
    fn default() -> Self {
        FitParams {
            min_font_size_pt: DEFAULT_MIN_FONT_SIZE_PT,
            max_font_size_cap_pt: MAX_FONT_SIZE_CAP_PT,
            padding_mm: DEFAULT_PADDING_MM,
            line_height_multiplier: DEFAULT_LINE_HEIGHT_MULTIPLIER,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Outcome of fitting one text into one box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub font_size_pt: u8,
    pub lines: Vec<String>,
    /// Measured width of each entry in `lines`, in millimeters.
    pub line_widths_mm: Vec<f64>,
    pub line_height_mm: f64,
    /// True when nothing in range fit and the minimum size was used regardless.
    pub degraded: bool,
}

/// A fitted line positioned on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedLine {
    pub text: String,
    /// Left edge of the line's ink run.
    pub x_mm: f64,
    /// Top of the line box.
    pub top_mm: f64,
    pub baseline_mm: f64,
    pub width_mm: f64,
}

/// One wrap of the text at a single candidate size.
struct Candidate {
    lines: Vec<String>,
    widths: Vec<f64>,
    fits: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Fitting
// ────────────────────────────────────────────────────────────────────────────

/// Fits `text` into `target` at the largest accepted integer size.
///
/// `max_font_size_pt` below the floor collapses the search to the floor.
/// Pure: identical inputs (and measurer) give identical results.
pub fn fit_text_in_box<M: TextMeasurer + ?Sized>(
    text: &str,
    target: &MillimeterBox,
    font: ResolvedFont,
    max_font_size_pt: f64,
    params: &FitParams,
    measurer: &M,
) -> FitResult {
    let words: Vec<&str> = text.split_whitespace().collect();
    let available_width = target.width_mm - 2.0 * params.padding_mm;
    let available_height = target.height_mm - 2.0 * params.padding_mm;

    let floor = params.min_font_size_pt.max(1);
    let ceiling = search_ceiling(max_font_size_pt, floor, params.max_font_size_cap_pt);

    let try_size = |size_pt: u8| {
        wrap_at_size(
            &words,
            font,
            size_pt,
            available_width,
            available_height,
            params.line_height_multiplier,
            measurer,
        )
    };

    let mut best: Option<(u8, Candidate)> = None;
    let mut lo = floor;
    let mut hi = ceiling;
    while lo <= hi {
        let mid = lo + (hi - lo) / 2;
        let candidate = try_size(mid);
        if candidate.fits {
            best = Some((mid, candidate));
            match mid.checked_add(1) {
                Some(next) => lo = next,
                None => break,
            }
        } else {
            match mid.checked_sub(1) {
                Some(prev) => hi = prev,
                None => break,
            }
        }
    }

    let (font_size_pt, candidate, degraded) = match best {
        Some((size, candidate)) => (size, candidate, false),
        None => (floor, try_size(floor), true),
    };

    FitResult {
        font_size_pt,
        lines: candidate.lines,
        line_widths_mm: candidate.widths,
        line_height_mm: pt_to_mm(f64::from(font_size_pt)) * params.line_height_multiplier,
        degraded,
    }
}

/// Places fitted lines inside `target`.
///
/// The text block is centred vertically in the padded box (an overflowing block spills
/// evenly above and below); each line is aligned using its own measured width. Baselines
/// centre the face's ascender–descender span within each line box.
pub fn position_lines(
    fit: &FitResult,
    target: &MillimeterBox,
    align: TextAlign,
    font: ResolvedFont,
    params: &FitParams,
) -> Vec<PlacedLine> {
    let inner_x = target.x_mm + params.padding_mm;
    let inner_y = target.y_mm + params.padding_mm;
    let available_width = target.width_mm - 2.0 * params.padding_mm;
    let available_height = target.height_mm - 2.0 * params.padding_mm;

    let block_height = fit.lines.len() as f64 * fit.line_height_mm;
    let block_top = inner_y + (available_height - block_height) / 2.0;

    let metrics = get_metrics(font);
    let size_mm = pt_to_mm(f64::from(fit.font_size_pt));
    let ascent = f64::from(metrics.ascender) / 1000.0 * size_mm;
    let descent = -f64::from(metrics.descender) / 1000.0 * size_mm;
    let half_leading = (fit.line_height_mm - (ascent + descent)) / 2.0;

    fit.lines
        .iter()
        .zip(&fit.line_widths_mm)
        .enumerate()
        .map(|(i, (text, &width_mm))| {
            let top_mm = block_top + i as f64 * fit.line_height_mm;
            let x_mm = match align {
                TextAlign::Left => inner_x,
                TextAlign::Center => inner_x + (available_width - width_mm) / 2.0,
                TextAlign::Right => inner_x + available_width - width_mm,
            };
            PlacedLine {
                text: text.clone(),
                x_mm,
                top_mm,
                baseline_mm: top_mm + half_leading + ascent,
                width_mm,
            }
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ────────────────────────────────────────────────────────────────────────────

fn search_ceiling(max_font_size_pt: f64, floor: u8, cap: u8) -> u8 {
    let requested = max_font_size_pt.min(f64::from(cap)).floor();
    if requested.is_nan() || requested < f64::from(floor) {
        floor
    } else {
        requested as u8
    }
}

/// Greedy word wrap at one size, plus the acceptance check.
///
/// Each extension is measured as a whole line (`current + " " + word`), never by summing
/// word widths, so kerning-free back ends and canvas back ends agree on what a line is.
fn wrap_at_size<M: TextMeasurer + ?Sized>(
    words: &[&str],
    font: ResolvedFont,
    size_pt: u8,
    available_width: f64,
    available_height: f64,
    line_height_multiplier: f64,
    measurer: &M,
) -> Candidate {
    let size = f64::from(size_pt);
    let mut lines: Vec<String> = Vec::new();
    let mut widths: Vec<f64> = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0_f64;

    for word in words {
        if current.is_empty() {
            current.push_str(word);
            current_width = measurer.measure_width(&current, font, size);
            continue;
        }

        let extended = format!("{current} {word}");
        let extended_width = measurer.measure_width(&extended, font, size);
        if extended_width <= available_width {
            current = extended;
            current_width = extended_width;
        } else {
            // Close the line; an overlong word still gets a line of its own.
            lines.push(std::mem::take(&mut current));
            widths.push(current_width);
            current.push_str(word);
            current_width = measurer.measure_width(&current, font, size);
        }
    }
    if !current.is_empty() {
        lines.push(current);
        widths.push(current_width);
    }

    let total_height = lines.len() as f64 * pt_to_mm(size) * line_height_multiplier;
    let fits = total_height <= available_height && widths.iter().all(|&w| w <= available_width);

    Candidate {
        lines,
        widths,
        fits,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::fonts::{FontFamily, FontWeight};
    use crate::layout::measure::DocumentMeasurer;

    const SANS: ResolvedFont = ResolvedFont {
        family: FontFamily::Sans,
        weight: FontWeight::Normal,
    };

    /// Every character, spaces included, is 0.5em wide.
    struct HalfEmMeasurer;

    impl TextMeasurer for HalfEmMeasurer {
        fn measure_width(&self, text: &str, _font: ResolvedFont, size_pt: f64) -> f64 {
            text.chars().count() as f64 * 0.5 * pt_to_mm(size_pt)
        }
    }

    fn mm_box(x_mm: f64, y_mm: f64, width_mm: f64, height_mm: f64) -> MillimeterBox {
        MillimeterBox {
            x_mm,
            y_mm,
            width_mm,
            height_mm,
        }
    }

    /// The 200×100px name box on an 800×600 canvas, converted to A4 landscape.
    fn name_box() -> MillimeterBox {
        mm_box(37.13, 17.5, 74.25, 35.0)
    }

    #[test]
    fn test_short_name_single_line_at_requested_max() {
        let params = FitParams::default();
        let fit = fit_text_in_box("John Doe", &name_box(), SANS, 32.0, &params, &DocumentMeasurer);

        assert_eq!(fit.lines, vec!["John Doe".to_string()]);
        assert!(fit.font_size_pt <= 32);
        assert_eq!(fit.font_size_pt, 32);
        assert!(!fit.degraded);

        let available = name_box().width_mm - 2.0 * params.padding_mm;
        let measured = DocumentMeasurer.measure_width("John Doe", SANS, 32.0);
        assert!(measured <= available);
        assert_eq!(fit.line_widths_mm, vec![measured]);
    }

    #[test]
    fn test_unbreakable_text_degrades_to_floor() {
        let params = FitParams::default();
        let narrow = mm_box(10.0, 10.0, 20.0, 8.0);
        let text = "Wolfeschlegelsteinhausenbergerdorff-Supercalifragilistic";
        let fit = fit_text_in_box(text, &narrow, SANS, 72.0, &params, &DocumentMeasurer);

        assert_eq!(fit.font_size_pt, 8);
        assert!(fit.degraded);
        assert_eq!(fit.lines, vec![text.to_string()], "overlong word must not be dropped");
        assert!(fit.line_widths_mm[0] > narrow.width_mm);
    }

    #[test]
    fn test_long_name_wraps_onto_several_lines() {
        let params = FitParams::default();
        let tall = mm_box(0.0, 0.0, 60.0, 60.0);
        let name = "Maria de los Angeles Fernandez Villanueva";
        let fit = fit_text_in_box(name, &tall, SANS, 72.0, &params, &DocumentMeasurer);

        assert!(fit.lines.len() >= 2, "expected wrapping, got {:?}", fit.lines);
        assert_eq!(fit.lines.join(" "), name, "wrap must preserve every word in order");
        let available = tall.width_mm - 2.0 * params.padding_mm;
        for w in &fit.line_widths_mm {
            assert!(*w <= available);
        }
        let block = fit.lines.len() as f64 * fit.line_height_mm;
        assert!(block <= tall.height_mm - 2.0 * params.padding_mm);
    }

    #[test]
    fn test_search_finds_largest_accepted_size() {
        // 10 chars at 0.5em → 5em wide. Available width 50mm → 10mm em → 28.35pt.
        let params = FitParams::default();
        let target = mm_box(0.0, 0.0, 54.0, 100.0);
        let fit = fit_text_in_box("abcdefghij", &target, SANS, 72.0, &params, &HalfEmMeasurer);
        assert_eq!(fit.font_size_pt, 28);
        assert_eq!(fit.lines.len(), 1);
    }

    #[test]
    fn test_height_limits_size_when_width_is_ample() {
        // One line; available height 10mm → size × 1.2 ≤ 10mm → 8.33mm → 23.6pt.
        let params = FitParams::default();
        let target = mm_box(0.0, 0.0, 500.0, 14.0);
        let fit = fit_text_in_box("Ada", &target, SANS, 72.0, &params, &HalfEmMeasurer);
        assert_eq!(fit.font_size_pt, 23);
    }

    #[test]
    fn test_max_font_size_is_capped_at_72() {
        let params = FitParams::default();
        let huge = mm_box(0.0, 0.0, 297.0, 210.0);
        let fit = fit_text_in_box("Al", &huge, SANS, 400.0, &params, &DocumentMeasurer);
        assert_eq!(fit.font_size_pt, 72);
    }

    #[test]
    fn test_fractional_max_rounds_down() {
        let params = FitParams::default();
        let huge = mm_box(0.0, 0.0, 297.0, 210.0);
        let fit = fit_text_in_box("Al", &huge, SANS, 20.9, &params, &DocumentMeasurer);
        assert_eq!(fit.font_size_pt, 20);
    }

    #[test]
    fn test_max_below_floor_collapses_to_floor() {
        let params = FitParams::default();
        let fit = fit_text_in_box("Al", &name_box(), SANS, 4.0, &params, &DocumentMeasurer);
        assert_eq!(fit.font_size_pt, params.min_font_size_pt);
        assert!(!fit.degraded);
    }

    #[test]
    fn test_box_smaller_than_padding_is_degraded_not_fatal() {
        let params = FitParams::default();
        let sliver = mm_box(5.0, 5.0, 3.0, 3.0);
        let fit = fit_text_in_box("Lin", &sliver, SANS, 24.0, &params, &DocumentMeasurer);
        assert!(fit.degraded);
        assert_eq!(fit.font_size_pt, 8);
        assert_eq!(fit.lines, vec!["Lin".to_string()]);
    }

    #[test]
    fn test_larger_max_never_shrinks_result() {
        let params = FitParams::default();
        let target = mm_box(20.0, 20.0, 60.0, 20.0);
        let name = "Maria de los Angeles Fernandez";
        let mut previous = 0u8;
        for max in 1..=100u32 {
            let fit = fit_text_in_box(
                name,
                &target,
                SANS,
                f64::from(max),
                &params,
                &DocumentMeasurer,
            );
            assert!(
                fit.font_size_pt >= previous,
                "max {max}: size {} dropped below {previous}",
                fit.font_size_pt
            );
            previous = fit.font_size_pt;
        }
    }

    #[test]
    fn test_identical_inputs_give_identical_results() {
        let params = FitParams::default();
        let target = mm_box(12.5, 40.0, 80.0, 25.0);
        let a = fit_text_in_box("Dr. Amara Okafor-Nwosu", &target, SANS, 40.0, &params, &DocumentMeasurer);
        let b = fit_text_in_box("Dr. Amara Okafor-Nwosu", &target, SANS, 40.0, &params, &DocumentMeasurer);
        assert_eq!(a, b);
    }

    #[test]
    fn test_collapses_runs_of_whitespace() {
        let params = FitParams::default();
        let fit = fit_text_in_box("  John \t  Doe  ", &name_box(), SANS, 32.0, &params, &DocumentMeasurer);
        assert_eq!(fit.lines, vec!["John Doe".to_string()]);
    }

    // ── position_lines ──────────────────────────────────────────────────────

    fn two_line_fit() -> FitResult {
        FitResult {
            font_size_pt: 20,
            lines: vec!["Grace".to_string(), "Hopper".to_string()],
            line_widths_mm: vec![20.0, 30.0],
            line_height_mm: 10.0,
            degraded: false,
        }
    }

    #[test]
    fn test_lines_are_centred_vertically() {
        let params = FitParams::default();
        let target = mm_box(10.0, 20.0, 100.0, 44.0);
        let placed = position_lines(&two_line_fit(), &target, TextAlign::Center, SANS, &params);
        // Inner box y ∈ [22, 62], block 20mm tall → top at 32.
        assert!((placed[0].top_mm - 32.0).abs() < 1e-9);
        assert!((placed[1].top_mm - 42.0).abs() < 1e-9);
        for line in &placed {
            assert!(line.baseline_mm > line.top_mm);
            assert!(line.baseline_mm < line.top_mm + 10.0);
        }
    }

    #[test]
    fn test_horizontal_alignment_uses_each_line_width() {
        let params = FitParams::default();
        let target = mm_box(10.0, 20.0, 100.0, 44.0);
        let fit = two_line_fit();

        let left = position_lines(&fit, &target, TextAlign::Left, SANS, &params);
        assert_eq!(left[0].x_mm, 12.0);
        assert_eq!(left[1].x_mm, 12.0);

        let center = position_lines(&fit, &target, TextAlign::Center, SANS, &params);
        assert!((center[0].x_mm - 50.0).abs() < 1e-9);
        assert!((center[1].x_mm - 45.0).abs() < 1e-9);

        let right = position_lines(&fit, &target, TextAlign::Right, SANS, &params);
        assert!((right[0].x_mm + 20.0 - 108.0).abs() < 1e-9);
        assert!((right[1].x_mm + 30.0 - 108.0).abs() < 1e-9);
    }

    #[test]
    fn test_overflowing_block_spills_evenly() {
        let params = FitParams::default();
        let target = mm_box(0.0, 0.0, 100.0, 14.0);
        let placed = position_lines(&two_line_fit(), &target, TextAlign::Left, SANS, &params);
        // Inner height 10mm, block 20mm → 5mm above the inner top.
        assert!((placed[0].top_mm - (-3.0)).abs() < 1e-9);
    }
}
