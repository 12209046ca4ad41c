//! Document Assembler — writes the one-page certificate PDF.
//!
//! Page content, back to front:
//! 1. the backdrop image stretched over the full 297×210mm page (if it decoded),
//! 2. the fitted name lines in the resolved core font and the requested colour.
//!
//! Every failure past request validation is value-level: the document is always produced,
//! and what went wrong is reported as [`GenerationWarning`]s.

use chrono::{DateTime, Datelike, Timelike, Utc};
use pdf_writer::{Content, Date, Filter, Finish, Name, Pdf, Rect, Ref, Str, TextStr};
use tracing::{info, warn};
use uuid::Uuid;

use crate::certificate::backdrop::{Backdrop, DEFAULT_MAX_BACKDROP_BYTES};
use crate::certificate::color::Rgb;
use crate::certificate::{layout_name, GenerationWarning, NameLayout};
use crate::errors::CertificateError;
use crate::layout::font_metrics::encode_win_ansi;
use crate::layout::transform::mm_to_pt;
use crate::layout::{DocumentMeasurer, FitParams, PageSize};
use crate::models::certificate::CertificateRequest;

const FONT_NAME: Name<'static> = Name(b"F1");
const BACKDROP_NAME: Name<'static> = Name(b"Im1");
const PRODUCER: &str = concat!("certgen ", env!("CARGO_PKG_VERSION"));

/// The finished artifact of one generation request.
#[derive(Debug, Clone)]
pub struct GeneratedCertificate {
    pub id: Uuid,
    pub pdf: Vec<u8>,
    pub layout: NameLayout,
    pub warnings: Vec<GenerationWarning>,
}

impl GeneratedCertificate {
    pub fn text_may_be_clipped(&self) -> bool {
        self.layout.fit.degraded
    }
}

/// Object ids of the single-page document.
struct ObjectIds {
    catalog: Ref,
    page_tree: Ref,
    page: Ref,
    content: Ref,
    font: Ref,
    info: Ref,
    backdrop: Ref,
    backdrop_mask: Ref,
}

impl ObjectIds {
    fn new() -> Self {
        ObjectIds {
            catalog: Ref::new(1),
            page_tree: Ref::new(2),
            page: Ref::new(3),
            content: Ref::new(4),
            font: Ref::new(5),
            info: Ref::new(6),
            backdrop: Ref::new(7),
            backdrop_mask: Ref::new(8),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DocumentAssembler {
    page: PageSize,
    params: FitParams,
    max_backdrop_bytes: usize,
}

impl DocumentAssembler {
    pub fn new(params: FitParams) -> Self {
        DocumentAssembler {
            page: PageSize::A4_LANDSCAPE,
            params,
            max_backdrop_bytes: DEFAULT_MAX_BACKDROP_BYTES,
        }
    }

    /// Backdrops larger than this are skipped like undecodable ones.
    pub fn with_max_backdrop_bytes(mut self, max_backdrop_bytes: usize) -> Self {
        self.max_backdrop_bytes = max_backdrop_bytes;
        self
    }

    /// Fits the participant name with the document measurer and writes the PDF.
    ///
    /// Only an invalid request fails; a missing, oversized or undecodable backdrop, an
    /// unusable colour, or a degraded fit are returned as warnings.
    pub fn assemble(
        &self,
        request: &CertificateRequest,
        backdrop: Option<&[u8]>,
    ) -> Result<GeneratedCertificate, CertificateError> {
        let layout = layout_name(request, self.page, &self.params, &DocumentMeasurer)?;
        let mut warnings = Vec::new();

        if layout.fit.degraded {
            warnings.push(GenerationWarning::FitDegraded);
        }

        let color = Rgb::from_hex(&request.style.color_hex).unwrap_or_else(|| {
            warn!("invalid text colour {:?}, using black", request.style.color_hex);
            warnings.push(GenerationWarning::InvalidColor(
                request.style.color_hex.clone(),
            ));
            Rgb::BLACK
        });

        let backdrop = match backdrop {
            None => {
                warn!("no backdrop supplied, generating text-only certificate");
                warnings.push(GenerationWarning::AssetUnavailable(
                    "backdrop image missing".to_string(),
                ));
                None
            }
            Some(bytes) => match Backdrop::decode(bytes, self.max_backdrop_bytes) {
                Ok(decoded) => Some(decoded),
                Err(e) => {
                    warn!("{e}; generating text-only certificate");
                    warnings.push(GenerationWarning::AssetUnavailable(e.to_string()));
                    None
                }
            },
        };

        let id = Uuid::new_v4();
        let title = format!("Certificate: {}", request.participant_name.trim());
        let pdf = write_pdf(
            self.page,
            &layout,
            color,
            backdrop.as_ref(),
            &title,
            Utc::now(),
        );

        info!(
            "certificate {id} generated: {}pt, {} line(s), {} bytes, {} warning(s)",
            layout.fit.font_size_pt,
            layout.fit.lines.len(),
            pdf.len(),
            warnings.len()
        );

        Ok(GeneratedCertificate {
            id,
            pdf,
            layout,
            warnings,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// PDF writing
// ────────────────────────────────────────────────────────────────────────────

fn write_pdf(
    page: PageSize,
    layout: &NameLayout,
    color: Rgb,
    backdrop: Option<&Backdrop>,
    title: &str,
    generated_at: DateTime<Utc>,
) -> Vec<u8> {
    let ids = ObjectIds::new();
    let page_width_pt = page.width_pt() as f32;
    let page_height_pt = page.height_pt() as f32;

    let mut pdf = Pdf::new();
    pdf.catalog(ids.catalog).pages(ids.page_tree);
    pdf.pages(ids.page_tree).kids([ids.page]).count(1);

    {
        let mut page_writer = pdf.page(ids.page);
        page_writer
            .media_box(Rect::new(0.0, 0.0, page_width_pt, page_height_pt))
            .parent(ids.page_tree)
            .contents(ids.content);
        let mut resources = page_writer.resources();
        resources.fonts().pair(FONT_NAME, ids.font);
        if backdrop.is_some() {
            resources.x_objects().pair(BACKDROP_NAME, ids.backdrop);
        }
        resources.finish();
        page_writer.finish();
    }

    pdf.type1_font(ids.font)
        .base_font(Name(layout.font.pdf_base_font().as_bytes()))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    if let Some(image) = backdrop {
        write_backdrop(&mut pdf, &ids, image);
    }

    let mut content = Content::new();
    if backdrop.is_some() {
        // The unit square scaled to the page: the image is stretched to fill it.
        content.save_state();
        content.transform([page_width_pt, 0.0, 0.0, page_height_pt, 0.0, 0.0]);
        content.x_object(BACKDROP_NAME);
        content.restore_state();
    }

    content.set_fill_rgb(color.r, color.g, color.b);
    let font_size = f32::from(layout.fit.font_size_pt);
    for line in &layout.lines {
        // PDF space is y-up from the bottom edge; layout space is y-down from the top.
        let x = mm_to_pt(line.x_mm) as f32;
        let y = (page.height_pt() - mm_to_pt(line.baseline_mm)) as f32;
        content.begin_text();
        content.set_font(FONT_NAME, font_size);
        content.next_line(x, y);
        content.show(Str(&encode_win_ansi(&line.text)));
        content.end_text();
    }
    pdf.stream(ids.content, &content.finish());

    pdf.document_info(ids.info)
        .title(TextStr(title))
        .producer(TextStr(PRODUCER))
        .creation_date(pdf_date(generated_at));

    pdf.finish()
}

fn write_backdrop(pdf: &mut Pdf, ids: &ObjectIds, image: &Backdrop) {
    let width = image.width as i32;
    let height = image.height as i32;

    if let Some(alpha) = &image.alpha {
        let mut mask = pdf.image_xobject(ids.backdrop_mask, alpha);
        mask.filter(Filter::FlateDecode);
        mask.width(width);
        mask.height(height);
        mask.color_space().device_gray();
        mask.bits_per_component(8);
    }

    let mut xobject = pdf.image_xobject(ids.backdrop, &image.rgb);
    xobject.filter(Filter::FlateDecode);
    xobject.width(width);
    xobject.height(height);
    xobject.color_space().device_rgb();
    xobject.bits_per_component(8);
    if image.alpha.is_some() {
        xobject.s_mask(ids.backdrop_mask);
    }
}

fn pdf_date(at: DateTime<Utc>) -> Date {
    Date::new(at.year().clamp(0, 9999) as u16)
        .month(at.month() as u8)
        .day(at.day() as u8)
        .hour(at.hour() as u8)
        .minute(at.minute() as u8)
        .second(at.second() as u8)
        .utc_offset_hour(0)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
