use crate::codec::BitstreamFeatures;
use crate::scale::{DecodeRequest, ScaleRatios};

/// Decoder configuration for one call.
///
/// Output is always BGRA, 8 bits per channel with alpha, which reads back as Android's
/// `ARGB_8888` color ints on little-endian targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderOptions {
    pub use_scaling: bool,
    // Fancy upsampling smooths chroma but costs a pass per row
    pub fancy_upsampling: bool,
    pub scaled_width: i32,
    pub scaled_height: i32,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            use_scaling: true,
            fancy_upsampling: false,
            scaled_width: 0,
            scaled_height: 0,
        }
    }
}

impl DecoderOptions {
    pub fn for_request(features: &BitstreamFeatures, request: DecodeRequest) -> Self {
        let ratios = ScaleRatios::for_features(features);
        let (scaled_width, scaled_height) = ratios.apply(request);

        log::debug!(
            "natural {}x{}, requested {}x{}, ratios {:.3}x{:.3}, target {}x{}",
            features.width,
            features.height,
            request.width,
            request.height,
            ratios.horizontal,
            ratios.vertical,
            scaled_width,
            scaled_height
        );

        Self {
            scaled_width,
            scaled_height,
            ..Self::default()
        }
    }
}

#[test]
fn request_sets_scaled_target() {
    let features = BitstreamFeatures {
        width: 1000,
        height: 500,
        ..Default::default()
    };
    let options = DecoderOptions::for_request(&features, DecodeRequest::new(300, 300));

    assert!(options.use_scaling);
    assert!(!options.fancy_upsampling);
    assert_eq!((options.scaled_width, options.scaled_height), (300, 150));
}
