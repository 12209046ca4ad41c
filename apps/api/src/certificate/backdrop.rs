//! Backdrop decoding for the document engine.
//!
//! The template image is decoded once, split into RGB and (if present) an alpha soft mask,
//! and both planes are Flate-compressed ready to become PDF image XObjects.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::GenericImageView;
use thiserror::Error;

/// Largest backdrop the document engine will decode.
pub const DEFAULT_MAX_BACKDROP_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum BackdropError {
    #[error("backdrop image is empty")]
    Empty,

    #[error("backdrop image is {len} bytes; the limit is {limit}")]
    TooLarge { len: usize, limit: usize },

    #[error("failed to decode backdrop image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("failed to compress backdrop image: {0}")]
    Compress(#[from] std::io::Error),
}

/// A decoded backdrop, with pixel planes already compressed for `FlateDecode`.
#[derive(Debug, Clone)]
pub struct Backdrop {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
    pub alpha: Option<Vec<u8>>,
}

impl Backdrop {
    /// Decodes PNG or JPEG bytes (format sniffed from the data), refusing inputs over
    /// `max_bytes` before any decoding work.
    pub fn decode(bytes: &[u8], max_bytes: usize) -> Result<Self, BackdropError> {
        if bytes.is_empty() {
            return Err(BackdropError::Empty);
        }
        if bytes.len() > max_bytes {
            return Err(BackdropError::TooLarge {
                len: bytes.len(),
                limit: max_bytes,
            });
        }

        let image = image::load_from_memory(bytes)?;
        let (width, height) = image.dimensions();

        let (rgb, alpha) = if image.color().has_alpha() {
            let rgba = image.to_rgba8().into_raw();
            let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
            let mut alpha = Vec::with_capacity(rgba.len() / 4);
            for px in rgba.chunks_exact(4) {
                rgb.extend_from_slice(&px[..3]);
                alpha.push(px[3]);
            }
            (rgb, Some(alpha))
        } else {
            (image.to_rgb8().into_raw(), None)
        };

        Ok(Backdrop {
            width,
            height,
            rgb: deflate(&rgb)?,
            alpha: alpha.as_deref().map(deflate).transpose()?,
        })
    }
}

fn deflate(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::Cursor;

    use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage, Rgba, RgbaImage};

    pub fn png_rgb(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([240, 230, 200]));
        encode(DynamicImage::ImageRgb8(img), ImageOutputFormat::Png)
    }

    pub fn png_rgba(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 128]));
        encode(DynamicImage::ImageRgba8(img), ImageOutputFormat::Png)
    }

    pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([0, 64, 128]));
        encode(DynamicImage::ImageRgb8(img), ImageOutputFormat::Jpeg(90))
    }

    fn encode(img: DynamicImage, format: ImageOutputFormat) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }
}
