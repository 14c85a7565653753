//! Scaled decoding: probe, configure, decode, hand the pixels to the caller

use crate::codec::{DecodedPixels, WebpCodec};
use crate::error::Result;
use crate::image::DecodedImage;
use crate::options::DecoderOptions;
use crate::scale::DecodeRequest;

/// Decode `input` straight into the size described by `request` and pass the pixels to
/// `into_bitmap` while the codec still owns them.
///
/// Returns `Ok(None)` when the codec succeeds without producing a pixel buffer.
///
/// `input` is taken by value so whatever pins the bytes (a JNI array guard, a mapped file)
/// is released when this returns, on every path. The codec's pixel buffer is released
/// before `input`.
#[tracing::instrument(level = "debug", skip_all, fields(width = request.width, height = request.height))]
pub fn decode_scaled<C, I, F, B>(
    codec: &C,
    input: I,
    request: DecodeRequest,
    into_bitmap: F,
) -> Result<Option<B>>
where
    C: WebpCodec,
    I: AsRef<[u8]>,
    F: FnOnce(&DecodedImage<'_>) -> Result<B>,
{
    let data = input.as_ref();

    let features = codec.features(data)?;
    let options = DecoderOptions::for_request(&features, request);

    let pixels = codec.decode(data, &options)?;

    let bitmap = match pixels.image() {
        Some(image) => {
            log::trace!("decoded {}x{}", image.width(), image.height());
            Some(into_bitmap(&image)?)
        }
        None => {
            log::debug!("decode produced no pixel buffer");
            None
        }
    };

    drop(pixels);
    Ok(bitmap)
}
