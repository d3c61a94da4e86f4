//! ImageRsCodec - `image` クレートによる ImageCodec 実装
//!
//! フォーマットはファイルの内容から判定し、保存時も同じフォーマットで
//! 書き戻します（拡張子が `bin` でも PNG は PNG のまま）。

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::ports::{CodecError, ImageCodec, ScalableImage};

#[derive(Debug, Clone, Copy, Default)]
pub struct ImageRsCodec;

impl ImageRsCodec {
    pub fn new() -> Self {
        Self
    }
}

impl ImageCodec for ImageRsCodec {
    fn load(&self, path: &Path) -> Result<Option<Box<dyn ScalableImage>>, CodecError> {
        let open_error = |source| CodecError::Open {
            path: path.to_path_buf(),
            source,
        };
        let reader = image::io::Reader::open(path)
            .map_err(open_error)?
            .with_guessed_format()
            .map_err(open_error)?;

        let Some(format) = reader.format() else {
            debug!(path = %path.display(), "no recognisable image format");
            return Ok(None);
        };

        let image = reader.decode().map_err(|e| CodecError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(Some(Box::new(LoadedImage {
            path: path.to_path_buf(),
            image,
            format,
        })))
    }
}

struct LoadedImage {
    path: PathBuf,
    image: DynamicImage,
    format: ImageFormat,
}

impl ScalableImage for LoadedImage {
    fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn scale_to_fit(
        &mut self,
        width: u32,
        height: u32,
        allow_upscale: bool,
    ) -> Result<(u32, u32), CodecError> {
        if width == 0 || height == 0 {
            return Err(CodecError::InvalidSize { width, height });
        }

        let (orig_w, orig_h) = self.image.dimensions();
        let (new_w, new_h) = fit_within(orig_w, orig_h, width, height, allow_upscale);
        if (new_w, new_h) == (orig_w, orig_h) {
            debug!(width = orig_w, height = orig_h, "image already fits, leaving as-is");
            return Ok((orig_w, orig_h));
        }

        self.image = self.image.resize_exact(new_w, new_h, FilterType::Triangle);
        debug!(
            original_width = orig_w,
            original_height = orig_h,
            width = new_w,
            height = new_h,
            "image scaled"
        );
        Ok((new_w, new_h))
    }

    fn save(&self) -> Result<(), CodecError> {
        self.image
            .save_with_format(&self.path, self.format)
            .map_err(|e| CodecError::Save {
                path: self.path.clone(),
                reason: e.to_string(),
            })
    }
}

/// Dimensions of `width` x `height` fitted inside `box_w` x `box_h` with the
/// aspect ratio kept.
///
/// Without `allow_upscale` an image that already fits keeps its size.
pub fn fit_within(
    width: u32,
    height: u32,
    box_w: u32,
    box_h: u32,
    allow_upscale: bool,
) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width, height);
    }

    let ratio = f64::min(
        f64::from(box_w) / f64::from(width),
        f64::from(box_h) / f64::from(height),
    );
    if ratio >= 1.0 && !allow_upscale {
        return (width, height);
    }

    let scaled = |dim: u32| (f64::from(dim) * ratio).round().max(1.0) as u32;
    (scaled(width), scaled(height))
}
