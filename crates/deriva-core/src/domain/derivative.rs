//! Derivative kinds: which datastream is produced, and at what size.

use serde::{Deserialize, Serialize};

use super::ids::DatastreamId;

/// Config key gating upscaling of the medium-size rendition.
pub const UPSCALE_IMAGES_KEY: &str = "basic_image.upscale_images";

/// Whether an image smaller than the target box may be enlarged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpscalePolicy {
    Always,
    /// Read the flag from the config source on every run.
    FromConfig(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivativeKind {
    Thumbnail,
    MediumSize,
}

impl DerivativeKind {
    /// Every kind, in the order a full run produces them.
    pub const ALL: [DerivativeKind; 2] = [DerivativeKind::Thumbnail, DerivativeKind::MediumSize];

    pub fn datastream_id(self) -> DatastreamId {
        match self {
            DerivativeKind::Thumbnail => DatastreamId::TN,
            DerivativeKind::MediumSize => DatastreamId::MEDIUM_SIZE,
        }
    }

    /// Bounding box (width, height) the rendition is fitted into.
    pub fn target_size(self) -> (u32, u32) {
        match self {
            DerivativeKind::Thumbnail => (200, 200),
            DerivativeKind::MediumSize => (500, 700),
        }
    }

    pub fn upscale(self) -> UpscalePolicy {
        match self {
            DerivativeKind::Thumbnail => UpscalePolicy::Always,
            DerivativeKind::MediumSize => UpscalePolicy::FromConfig(UPSCALE_IMAGES_KEY),
        }
    }
}
