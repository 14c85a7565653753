//! Scale policy for decoding straight into the requested size

use crate::codec::BitstreamFeatures;

/// Caller-supplied target size. Not validated here, libwebp rejects what it cannot honour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeRequest {
    pub width: i32,
    pub height: i32,
}

impl DecodeRequest {
    pub fn new(width: i32, height: i32) -> Self {
        DecodeRequest { width, height }
    }
}

/// Per-axis multipliers applied to the requested size.
///
/// Only one axis is ever adjusted: the longer natural side keeps the requested value as-is
/// and the shorter side is multiplied by `short / long`. Square images fall on the landscape
/// side, which leaves both ratios at 1.0. A ratio is only computed when its divisor is
/// positive, so a zero-sized image keeps 1.0 on both axes while a zero short side scales
/// its axis down to nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleRatios {
    pub horizontal: f32,
    pub vertical: f32,
}

impl ScaleRatios {
    pub const IDENTITY: ScaleRatios = ScaleRatios {
        horizontal: 1.0,
        vertical: 1.0,
    };

    pub fn for_features(features: &BitstreamFeatures) -> Self {
        let (width, height) = (features.width, features.height);

        if width >= height && width > 0 {
            ScaleRatios {
                horizontal: 1.0,
                vertical: height as f32 / width as f32,
            }
        } else if width < height && height > 0 {
            ScaleRatios {
                horizontal: width as f32 / height as f32,
                vertical: 1.0,
            }
        } else {
            Self::IDENTITY
        }
    }

    /// Target size handed to the decoder. Float to int conversion truncates toward zero.
    pub fn apply(&self, request: DecodeRequest) -> (i32, i32) {
        (
            (request.width as f32 * self.horizontal) as i32,
            (request.height as f32 * self.vertical) as i32,
        )
    }
}
