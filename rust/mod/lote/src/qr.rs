//! QR rendering: payload JSON → QR symbol (error correction H) → PNG.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use tracing::debug;

use crate::error::LoteError;
use crate::model::QrPayload;

/// Edge length of the exported image in pixels.
pub const DEFAULT_QR_SIZE: u32 = 200;

/// A rendered QR code, ready to show or save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedQr {
    content: String,
    png: Vec<u8>,
    size: u32,
}

impl RenderedQr {
    /// Text encoded in the symbol (the payload JSON).
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn png(&self) -> &[u8] {
        &self.png
    }

    /// Edge length in pixels; the image is square.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// `data:image/png;base64,...`, for embedding the image inline.
    pub fn data_url(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png))
    }
}

/// QrEncoder renders payloads at a fixed size.
///
/// Modules are whole pixels and the symbol keeps its quiet zone; it is
/// centred on a white square of `size` pixels. A payload too long to fit at
/// one pixel per module gets a larger square instead of an unreadable one.
#[derive(Debug, Clone, Copy)]
pub struct QrEncoder {
    size: u32,
}

impl Default for QrEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_QR_SIZE)
    }
}

impl QrEncoder {
    pub fn new(size: u32) -> Self {
        Self { size: size.max(1) }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn render(&self, payload: &QrPayload) -> Result<RenderedQr, LoteError> {
        let content = payload.to_json()?;

        let code = QrCode::with_error_correction_level(content.as_bytes(), EcLevel::H)
            .map_err(|e| LoteError::Render(e.to_string()))?;
        let symbol = code
            .render::<Luma<u8>>()
            .quiet_zone(true)
            .max_dimensions(self.size, self.size)
            .build();

        let side = self.size.max(symbol.width()).max(symbol.height());
        let mut canvas = GrayImage::from_pixel(side, side, Luma([255u8]));
        let x = (side - symbol.width()) / 2;
        let y = (side - symbol.height()) / 2;
        image::imageops::overlay(&mut canvas, &symbol, i64::from(x), i64::from(y));

        let mut png = Vec::new();
        DynamicImage::ImageLuma8(canvas)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| LoteError::Render(e.to_string()))?;

        debug!(
            "rendered QR v{:?} for {} bytes of payload into {}px PNG ({} bytes)",
            code.version(),
            content.len(),
            side,
            png.len()
        );

        Ok(RenderedQr {
            content,
            png,
            size: side,
        })
    }
}
