//! Seam between the decode flow and the WebP codec doing the work

use crate::error::Result;
use crate::image::DecodedImage;
use crate::options::DecoderOptions;

/// Header information read without decoding any pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BitstreamFeatures {
    pub width: i32,
    pub height: i32,
    pub has_alpha: bool,
    pub has_animation: bool,
}

/// A one-shot WebP decoder.
///
/// Implementations must be callable from several threads at once with independent buffers,
/// which libwebp's simple decoding API already is.
pub trait WebpCodec {
    /// Pixel buffer owned by the codec. Dropping it hands the memory back.
    type Pixels: DecodedPixels;

    /// Read the natural dimensions from the bitstream header.
    fn features(&self, data: &[u8]) -> Result<BitstreamFeatures>;

    /// Decode `data` according to `options`.
    ///
    /// Anything allocated before a failure must be released before returning the error.
    fn decode(&self, data: &[u8], options: &DecoderOptions) -> Result<Self::Pixels>;
}

pub trait DecodedPixels {
    /// `None` when the decode succeeded without producing a pixel buffer.
    fn image(&self) -> Option<DecodedImage<'_>>;
}
