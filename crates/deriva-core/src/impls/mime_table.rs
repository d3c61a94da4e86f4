//! TableMimeRegistry - MIME type と拡張子の対応表

use crate::ports::{FALLBACK_EXTENSION, MimeRegistry};

/// (MIME type, extension). The first row for an extension is its canonical
/// MIME type.
const TABLE: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/jpg", "jpg"),
    ("image/pjpeg", "jpg"),
    ("image/png", "png"),
    ("image/gif", "gif"),
    ("image/tiff", "tif"),
    ("image/x-tiff", "tif"),
    ("image/bmp", "bmp"),
    ("image/x-ms-bmp", "bmp"),
    ("image/webp", "webp"),
    ("image/jp2", "jp2"),
    ("image/jpx", "jpx"),
    ("image/x-icon", "ico"),
    ("image/x-portable-anymap", "pnm"),
    ("image/x-targa", "tga"),
    ("application/pdf", "pdf"),
    ("application/octet-stream", "bin"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct TableMimeRegistry;

impl TableMimeRegistry {
    pub fn new() -> Self {
        Self
    }

    /// Canonical MIME type for a file extension (`JPEG` and `jpg` both map to
    /// `image/jpeg`).
    pub fn mime_for_extension(&self, extension: &str) -> Option<&'static str> {
        let ext = match extension.to_ascii_lowercase().as_str() {
            "jpeg" | "jpe" => "jpg".to_string(),
            "tiff" => "tif".to_string(),
            other => other.to_string(),
        };
        TABLE
            .iter()
            .find(|(_, e)| *e == ext)
            .map(|(mime, _)| *mime)
    }
}

impl MimeRegistry for TableMimeRegistry {
    fn extension_for(&self, mime_type: &str) -> String {
        // `image/jpeg; charset=binary` → `image/jpeg`
        let essence = mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        TABLE
            .iter()
            .find(|(mime, _)| *mime == essence)
            .map(|(_, ext)| *ext)
            .unwrap_or(FALLBACK_EXTENSION)
            .to_string()
    }
}
