// Certificate layout engine
// Implements: px ↔ mm conversion, font resolution, text measurement, box text fitting.
// Everything here is synchronous and side-effect free; handlers run it inside
// tokio::task::spawn_blocking.

pub mod fitter;
pub mod font_metrics;
pub mod fonts;
pub mod measure;
pub mod transform;

// Re-export the public API consumed by the certificate pipeline and handlers.
pub use fitter::{fit_text_in_box, position_lines, FitParams, FitResult, PlacedLine, TextAlign};
pub use fonts::{FontWeightInput, ResolvedFont};
pub use measure::{CanvasMeasurer, DocumentMeasurer, RasterSurface, TextMeasurer};
pub use transform::{CanvasSize, MillimeterBox, PageSize, PixelBox};
