//! ImageCodec port - 画像のデコード・リサイズ・保存
//!
//! デコードや拡大縮小の実装は外部サービス（`image` クレートなど）に任せます。
//!
//! # 実装
//! - **ImageRsCodec**: `image` クレート

use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("failed to open image {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image {}: {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },

    #[error("failed to save image {}: {reason}", .path.display())]
    Save { path: PathBuf, reason: String },

    #[error("invalid target size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
}

/// A decoded image bound to the file it was loaded from.
pub trait ScalableImage {
    fn dimensions(&self) -> (u32, u32);

    /// Fit the image inside `width` x `height`, keeping its aspect ratio.
    ///
    /// With `allow_upscale` false an image already inside the box is left
    /// as it is. Returns the resulting dimensions.
    fn scale_to_fit(
        &mut self,
        width: u32,
        height: u32,
        allow_upscale: bool,
    ) -> Result<(u32, u32), CodecError>;

    /// Write the image back to the path it was loaded from.
    fn save(&self) -> Result<(), CodecError>;
}

pub trait ImageCodec: Send + Sync {
    /// `Ok(None)` when the file holds no recognisable image.
    fn load(&self, path: &Path) -> Result<Option<Box<dyn ScalableImage>>, CodecError>;
}
