//! MimeRegistry port - MIME type から拡張子への変換

/// Extension used when a MIME type is unknown.
pub const FALLBACK_EXTENSION: &str = "bin";

pub trait MimeRegistry: Send + Sync {
    /// File-name safe extension (no leading dot) for `mime_type`.
    fn extension_for(&self, mime_type: &str) -> String;
}
