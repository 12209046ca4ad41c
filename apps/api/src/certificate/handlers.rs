//! Axum route handlers for the layout and certificate APIs.

use anyhow::Context;
use axum::{
    body::Body,
    extract::{Multipart, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::Response,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::certificate::preview::{compute_preview, PreviewLayout};
use crate::errors::AppError;
use crate::layout::transform::{calculate_dpi, mm_to_px, px_to_mm, Dpi};
use crate::layout::{CanvasSize, MillimeterBox, PageSize, PixelBox};
use crate::models::certificate::CertificateRequest;
use crate::state::AppState;

const TEXT_MAY_BE_CLIPPED: HeaderName = HeaderName::from_static("x-text-may-be-clipped");
const CERTIFICATE_WARNINGS: HeaderName = HeaderName::from_static("x-certificate-warnings");
const CERTIFICATE_ID: HeaderName = HeaderName::from_static("x-certificate-id");

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

fn default_page() -> PageSize {
    PageSize::A4_LANDSCAPE
}

fn default_device_pixel_ratio() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
pub struct PxToMmRequest {
    pub px: PixelBox,
    pub canvas: CanvasSize,
    #[serde(default = "default_page")]
    pub page: PageSize,
    #[serde(default = "default_device_pixel_ratio")]
    pub device_pixel_ratio: f64,
}

#[derive(Debug, Serialize)]
pub struct PxToMmResponse {
    pub mm: MillimeterBox,
}

#[derive(Debug, Deserialize)]
pub struct MmToPxRequest {
    pub mm: MillimeterBox,
    pub canvas: CanvasSize,
    #[serde(default = "default_page")]
    pub page: PageSize,
    #[serde(default = "default_device_pixel_ratio")]
    pub device_pixel_ratio: f64,
}

#[derive(Debug, Serialize)]
pub struct MmToPxResponse {
    pub px: PixelBox,
}

#[derive(Debug, Deserialize)]
pub struct DpiRequest {
    pub width_px: f64,
    pub height_px: f64,
    #[serde(default = "default_page")]
    pub page: PageSize,
}

// ────────────────────────────────────────────────────────────────────────────
// Conversion handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/layout/px-to-mm
///
/// Degenerate canvases are not rejected: infinite results serialize as `null`.
pub async fn handle_px_to_mm(Json(request): Json<PxToMmRequest>) -> Json<PxToMmResponse> {
    let mm = px_to_mm(
        request.px,
        request.canvas,
        request.page,
        request.device_pixel_ratio,
    );
    Json(PxToMmResponse { mm })
}

/// POST /api/v1/layout/mm-to-px
pub async fn handle_mm_to_px(Json(request): Json<MmToPxRequest>) -> Json<MmToPxResponse> {
    let px = mm_to_px(
        request.mm,
        request.canvas,
        request.page,
        request.device_pixel_ratio,
    );
    Json(MmToPxResponse { px })
}

/// POST /api/v1/layout/dpi
///
/// Effective resolution of a backdrop of the given size printed on the page.
pub async fn handle_dpi(Json(request): Json<DpiRequest>) -> Json<Dpi> {
    Json(calculate_dpi(request.width_px, request.height_px, request.page))
}

// ────────────────────────────────────────────────────────────────────────────
// Certificate handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/certificates/preview
///
/// Returns the fitted name layout in editor canvas pixels.
pub async fn handle_preview(
    State(state): State<AppState>,
    Json(request): Json<CertificateRequest>,
) -> Result<Json<PreviewLayout>, AppError> {
    let params = state.fit_params;
    let preview = tokio::task::spawn_blocking(move || compute_preview(&request, &params))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in preview: {e}")))??;

    Ok(Json(preview))
}

/// POST /api/v1/certificates/generate
///
/// Multipart body: a `request` part holding the JSON request and an optional `backdrop`
/// file part (PNG or JPEG). Responds with the PDF; degraded outcomes are reported in the
/// `x-text-may-be-clipped` and `x-certificate-warnings` headers, never as errors.
pub async fn handle_generate(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut request: Option<CertificateRequest> = None;
    let mut backdrop: Option<Bytes> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("request") => {
                let raw = field.bytes().await.map_err(multipart_error)?;
                let parsed = serde_json::from_slice(&raw)
                    .map_err(|e| AppError::Validation(format!("invalid request part: {e}")))?;
                request = Some(parsed);
            }
            Some("backdrop") => {
                // Size is enforced by the assembler, which skips an oversized backdrop.
                let bytes = field.bytes().await.map_err(multipart_error)?;
                debug!("received backdrop of {} bytes", bytes.len());
                backdrop = Some(bytes);
            }
            other => debug!("ignoring unexpected multipart field {other:?}"),
        }
    }

    let request =
        request.ok_or_else(|| AppError::Validation("multipart part 'request' is required".to_string()))?;

    let assembler = state.assembler.clone();
    let generated =
        tokio::task::spawn_blocking(move || assembler.assemble(&request, backdrop.as_deref()))
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!(
                    "spawn_blocking failed in certificate generation: {e}"
                ))
            })??;

    let clipped = generated.text_may_be_clipped();
    let warnings = generated
        .warnings
        .iter()
        .map(|w| w.code())
        .collect::<Vec<_>>()
        .join(",");
    let disposition = format!("attachment; filename=\"certificate-{}.pdf\"", generated.id);

    let mut response = Response::new(Body::from(generated.pdf));
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition).context("invalid content-disposition header")?,
    );
    headers.insert(
        CERTIFICATE_ID,
        HeaderValue::from_str(&generated.id.to_string()).context("invalid certificate id header")?,
    );
    headers.insert(
        TEXT_MAY_BE_CLIPPED,
        HeaderValue::from_static(if clipped { "true" } else { "false" }),
    );
    if !warnings.is_empty() {
        headers.insert(
            CERTIFICATE_WARNINGS,
            HeaderValue::from_str(&warnings).context("invalid warnings header")?,
        );
    }

    Ok(response)
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::Validation(err.body_text())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
