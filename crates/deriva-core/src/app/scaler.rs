//! ImageScaler: resize a file in place.
//!
//! Codec errors stop here. They are logged and reported as `false`, so the
//! caller only has to decide between "scaled" and "not scaled".

use std::path::Path;

use tracing::{debug, error, warn};

use crate::domain::error_chain;
use crate::ports::ImageCodec;

pub struct ImageScaler<'a> {
    pub codec: &'a dyn ImageCodec,
}

impl ImageScaler<'_> {
    /// Fit the image at `path` inside `width` x `height` and save it back.
    ///
    /// True only if the image decoded, scaled and saved.
    pub fn scale(&self, path: &Path, width: u32, height: u32, allow_upscale: bool) -> bool {
        let mut image = match self.codec.load(path) {
            Ok(Some(image)) => image,
            Ok(None) => {
                warn!(path = %path.display(), "file is not a decodable image");
                return false;
            }
            Err(e) => {
                error!(path = %path.display(), error = %error_chain(&e), "image load failed");
                return false;
            }
        };

        let (source_w, source_h) = image.dimensions();
        let scaled = image
            .scale_to_fit(width, height, allow_upscale)
            .and_then(|dims| image.save().map(|()| dims));
        match scaled {
            Ok((w, h)) => {
                debug!(
                    path = %path.display(),
                    from = ?(source_w, source_h),
                    to = ?(w, h),
                    allow_upscale,
                    "image scaled and saved"
                );
                true
            }
            Err(e) => {
                error!(path = %path.display(), error = %error_chain(&e), "image scale failed");
                false
            }
        }
    }
}
