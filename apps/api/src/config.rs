use std::str::FromStr;

use anyhow::{ensure, Context, Result};

use crate::certificate::backdrop::DEFAULT_MAX_BACKDROP_BYTES;
use crate::layout::fitter::{
    FitParams, DEFAULT_LINE_HEIGHT_MULTIPLIER, DEFAULT_MIN_FONT_SIZE_PT, DEFAULT_PADDING_MM,
    MAX_FONT_SIZE_CAP_PT,
};

/// Application configuration loaded from environment variables.
/// Every variable is optional; startup fails only on values that do not parse or are out of range.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Floor of the font-size search and the degraded fallback size (6–8pt).
    pub min_font_size_pt: u8,
    pub name_box_padding_mm: f64,
    pub line_height_multiplier: f64,
    /// Larger backdrops are skipped and the certificate is generated text-only.
    pub max_backdrop_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let config = Config {
            port: parse_or(&get, "PORT", 8080)?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            min_font_size_pt: parse_or(&get, "MIN_FONT_SIZE_PT", DEFAULT_MIN_FONT_SIZE_PT)?,
            name_box_padding_mm: parse_or(&get, "NAME_BOX_PADDING_MM", DEFAULT_PADDING_MM)?,
            line_height_multiplier: parse_or(
                &get,
                "LINE_HEIGHT_MULTIPLIER",
                DEFAULT_LINE_HEIGHT_MULTIPLIER,
            )?,
            max_backdrop_bytes: parse_or(&get, "MAX_BACKDROP_BYTES", DEFAULT_MAX_BACKDROP_BYTES)?,
        };

        ensure!(
            (6..=8).contains(&config.min_font_size_pt),
            "MIN_FONT_SIZE_PT must be between 6 and 8, got {}",
            config.min_font_size_pt
        );
        ensure!(
            config.name_box_padding_mm.is_finite() && config.name_box_padding_mm >= 0.0,
            "NAME_BOX_PADDING_MM must be a non-negative number"
        );
        ensure!(
            config.line_height_multiplier.is_finite() && config.line_height_multiplier >= 1.0,
            "LINE_HEIGHT_MULTIPLIER must be at least 1.0"
        );
        ensure!(
            config.max_backdrop_bytes > 0,
            "MAX_BACKDROP_BYTES must be positive"
        );

        Ok(config)
    }

    pub fn fit_params(&self) -> FitParams {
        FitParams {
            min_font_size_pt: self.min_font_size_pt,
            max_font_size_cap_pt: MAX_FONT_SIZE_CAP_PT,
            padding_mm: self.name_box_padding_mm,
            line_height_multiplier: self.line_height_multiplier,
        }
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
