//! Image resolution for slide media references.
//!
//! An `imageUrl` is either an inline payload (a `data:image/...;base64,`
//! URI, or a bare base64 blob) or a remote http(s) URL. Resolution is
//! best-effort: any failure degrades the slide to its no-image variant
//! instead of failing the render.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

/// Per-image fetch budget for remote URLs.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Image format, detected from magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
        }
    }

    /// Detect image format from bytes (magic number detection).
    pub fn detect_from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 4 {
            return None;
        }

        // PNG: 89 50 4E 47
        if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(Self::Png);
        }

        // JPEG: FF D8 FF
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        // GIF: 47 49 46 38 (GIF8)
        if bytes.starts_with(&[0x47, 0x49, 0x46, 0x38]) {
            return Some(Self::Gif);
        }

        // BMP: 42 4D (BM)
        if bytes.starts_with(&[0x42, 0x4D]) {
            return Some(Self::Bmp);
        }

        None
    }
}

/// Image bytes ready for embedding.
#[derive(Debug, Clone)]
pub struct ResolvedImage {
    pub data: Vec<u8>,
    pub format: ImageFormat,
}

impl ResolvedImage {
    /// Pixel width/height ratio, when the header carries dimensions.
    pub fn aspect_ratio(&self) -> Option<f64> {
        let (w, h) = match self.format {
            ImageFormat::Png => png_dimensions(&self.data)?,
            ImageFormat::Jpeg => jpeg_dimensions(&self.data)?,
            ImageFormat::Gif => gif_dimensions(&self.data)?,
            ImageFormat::Bmp => return None,
        };
        if h == 0 {
            return None;
        }
        Some(w as f64 / h as f64)
    }
}

/// Whether the reference carries an inline payload rather than a URL.
pub fn is_inline(source: &str) -> bool {
    source.starts_with("data:image") || (source.len() > 100 && !source.starts_with("http"))
}

/// Decode an inline payload: the base64 tail of a data URI, or a bare
/// base64 blob.
pub fn decode_inline(source: &str) -> Option<Vec<u8>> {
    let payload = if source.starts_with("data:image") {
        source.split_once(";base64,").map(|(_, tail)| tail)?
    } else {
        source
    };
    BASE64.decode(payload.trim()).ok()
}

/// Resolve an image reference to bytes, sniffing the format.
///
/// Returns `None` on decode failure, fetch failure, timeout, or
/// unrecognised bytes; the caller renders the no-image variant.
pub async fn resolve_image(source: &str, client: &reqwest::Client) -> Option<ResolvedImage> {
    let bytes = if is_inline(source) {
        decode_inline(source)?
    } else if source.starts_with("http") {
        match fetch(source, client).await {
            Ok(bytes) => bytes,
            Err(err) => {
                log::warn!("image fetch failed for {source}: {err}");
                return None;
            }
        }
    } else {
        return None;
    };

    match ImageFormat::detect_from_bytes(&bytes) {
        Some(format) => Some(ResolvedImage {
            data: bytes,
            format,
        }),
        None => {
            log::warn!("unrecognised image bytes for {source}");
            None
        }
    }
}

async fn fetch(url: &str, client: &reqwest::Client) -> reqwest::Result<Vec<u8>> {
    let response = client.get(url).timeout(FETCH_TIMEOUT).send().await?;
    let response = response.error_for_status()?;
    Ok(response.bytes().await?.to_vec())
}

fn png_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    // IHDR is always the first chunk: width/height at offsets 16/20.
    if bytes.len() < 24 || &bytes[12..16] != b"IHDR" {
        return None;
    }
    let w = u32::from_be_bytes(bytes[16..20].try_into().ok()?);
    let h = u32::from_be_bytes(bytes[20..24].try_into().ok()?);
    Some((w, h))
}

fn jpeg_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    // Walk the marker segments until a start-of-frame carries dimensions.
    let mut i = 2;
    while i + 9 < bytes.len() {
        if bytes[i] != 0xFF {
            return None;
        }
        let marker = bytes[i + 1];
        // SOF0..SOF15, excluding DHT/JPG/DAC
        if (0xC0..=0xCF).contains(&marker) && !matches!(marker, 0xC4 | 0xC8 | 0xCC) {
            let h = u16::from_be_bytes([bytes[i + 5], bytes[i + 6]]);
            let w = u16::from_be_bytes([bytes[i + 7], bytes[i + 8]]);
            return Some((w as u32, h as u32));
        }
        let len = u16::from_be_bytes([bytes[i + 2], bytes[i + 3]]) as usize;
        i += 2 + len;
    }
    None
}

fn gif_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    if bytes.len() < 10 {
        return None;
    }
    let w = u16::from_le_bytes([bytes[6], bytes[7]]);
    let h = u16::from_le_bytes([bytes[8], bytes[9]]);
    Some((w as u32, h as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1x1 transparent PNG
    const TINY_PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    #[test]
    fn test_detect_formats() {
        assert_eq!(
            ImageFormat::detect_from_bytes(&[0x89, 0x50, 0x4E, 0x47, 0x0D]),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::detect_from_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageFormat::detect_from_bytes(b"GIF89a"),
            Some(ImageFormat::Gif)
        );
        assert_eq!(ImageFormat::detect_from_bytes(b"BMxx"), Some(ImageFormat::Bmp));
        assert_eq!(ImageFormat::detect_from_bytes(b"nope"), None);
        assert_eq!(ImageFormat::detect_from_bytes(&[0x89]), None);
    }

    #[test]
    fn test_decode_data_uri() {
        let uri = format!("data:image/png;base64,{TINY_PNG}");
        let bytes = decode_inline(&uri).unwrap();
        assert_eq!(ImageFormat::detect_from_bytes(&bytes), Some(ImageFormat::Png));
    }

    #[test]
    fn test_decode_bare_base64() {
        let bytes = decode_inline(TINY_PNG).unwrap();
        assert_eq!(ImageFormat::detect_from_bytes(&bytes), Some(ImageFormat::Png));
    }

    #[test]
    fn test_is_inline() {
        assert!(is_inline("data:image/png;base64,xxx"));
        assert!(!is_inline("http://example.com/a.png"));
        assert!(!is_inline("https://example.com/a.png"));
        // Long non-URL blobs are treated as bare base64
        assert!(is_inline(&"A".repeat(200)));
    }

    #[test]
    fn test_png_dimensions() {
        let bytes = decode_inline(TINY_PNG).unwrap();
        let img = ResolvedImage {
            data: bytes,
            format: ImageFormat::Png,
        };
        assert_eq!(img.aspect_ratio(), Some(1.0));
    }

    #[test]
    fn test_gif_dimensions() {
        let mut bytes = b"GIF89a".to_vec();
        bytes.extend_from_slice(&[0x40, 0x00, 0x20, 0x00]); // 64 x 32
        assert_eq!(gif_dimensions(&bytes), Some((64, 32)));
    }
}
