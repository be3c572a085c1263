use crate::error::ServiceError;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// File extensions offered by the upload control.
pub const ACCEPTED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Encodings the app accepts for uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
    WebP,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::WebP => "image/webp",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    fn to_image_crate(self) -> image::ImageFormat {
        match self {
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::WebP => image::ImageFormat::WebP,
        }
    }

    /// Sniffs the encoding from the leading bytes.
    pub fn detect(bytes: &[u8]) -> Result<Self, ServiceError> {
        match image::guess_format(bytes)? {
            image::ImageFormat::Jpeg => Ok(ImageFormat::Jpeg),
            image::ImageFormat::Png => Ok(ImageFormat::Png),
            image::ImageFormat::WebP => Ok(ImageFormat::WebP),
            other => Err(ServiceError::UnsupportedFormat(format!("{:?}", other))),
        }
    }
}

/// Raw bytes as received from the upload control, not yet decoded.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub filename: Option<String>,
}

impl ImageUpload {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            filename: None,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("len", &self.bytes.len())
            .field("filename", &self.filename)
            .finish()
    }
}

/// An upload that decoded cleanly, with its pixel dimensions.
///
/// The original encoded bytes are kept: they are what gets sent to the service
/// and embedded in the rendered page.
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    bytes: Vec<u8>,
}

impl DecodedImage {
    pub fn decode(upload: &ImageUpload) -> Result<Self, ServiceError> {
        let format = ImageFormat::detect(&upload.bytes)?;
        let decoded = image::load_from_memory_with_format(&upload.bytes, format.to_image_crate())?;

        log::debug!(
            "Decoded {:?} upload {:?}: {}x{}",
            format,
            upload.filename.as_deref().unwrap_or("<unnamed>"),
            decoded.width(),
            decoded.height()
        );

        Ok(Self {
            format,
            width: decoded.width(),
            height: decoded.height(),
            bytes: upload.bytes.clone(),
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }

    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.format.mime_type(), self.to_base64())
    }
}

impl std::fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedImage")
            .field("format", &self.format)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Test fixtures shared by other modules' tests.
#[cfg(test)]
pub(crate) mod fixtures {
    use image::{Rgb, RgbImage};
    use std::io::Cursor;

    fn encode(width: u32, height: u32, format: image::ImageFormat) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 40) as u8, (y * 40) as u8, 128])
        });
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), format)
            .expect("encode test image");
        bytes
    }

    pub fn png(width: u32, height: u32) -> Vec<u8> {
        encode(width, height, image::ImageFormat::Png)
    }

    pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
        encode(width, height, image::ImageFormat::Jpeg)
    }

    /// Lossless, the only WEBP encoding the `image` crate writes.
    pub fn webp(width: u32, height: u32) -> Vec<u8> {
        encode(width, height, image::ImageFormat::WebP)
    }
}
