//! [`WebpCodec`] backed by libwebp's advanced decoding API

use std::mem;
use std::slice;

use libwebp_sys::{
    WebPBitstreamFeatures, WebPDecode, WebPDecoderConfig, WebPFreeDecBuffer,
    WebPGetDecoderVersion, WebPGetFeatures, WebPInitDecoderConfig, WEBP_CSP_MODE,
};

use crate::codec::{BitstreamFeatures, DecodedPixels, WebpCodec};
use crate::error::{DecodeError, Result, StatusCode};
use crate::image::DecodedImage;
use crate::options::DecoderOptions;

/// The system (or bundled) libwebp.
#[derive(Debug, Default, Clone, Copy)]
pub struct Libwebp;

impl WebpCodec for Libwebp {
    type Pixels = LibwebpPixels;

    fn features(&self, data: &[u8]) -> Result<BitstreamFeatures> {
        // Safety: all-zero is a valid bit pattern for this plain C struct
        let mut features: WebPBitstreamFeatures = unsafe { mem::zeroed() };

        // Safety: `data` is valid for `data.len()` bytes and `features` is a valid out pointer
        let status = unsafe { WebPGetFeatures(data.as_ptr(), data.len(), &mut features) };
        StatusCode::check(status as i32).map_err(DecodeError::Probe)?;

        Ok(BitstreamFeatures {
            width: features.width,
            height: features.height,
            has_alpha: features.has_alpha != 0,
            has_animation: features.has_animation != 0,
        })
    }

    fn decode(&self, data: &[u8], options: &DecoderOptions) -> Result<LibwebpPixels> {
        // Safety: zeroed is a valid starting point, WebPInitDecoderConfig overwrites it
        let mut config: WebPDecoderConfig = unsafe { mem::zeroed() };

        // Safety: `config` is a valid, exclusively borrowed WebPDecoderConfig
        if !unsafe { WebPInitDecoderConfig(&mut config) } {
            return Err(DecodeError::Init);
        }

        config.options.no_fancy_upsampling = (!options.fancy_upsampling).into();
        config.options.use_scaling = options.use_scaling.into();
        config.options.scaled_width = options.scaled_width;
        config.options.scaled_height = options.scaled_height;
        config.output.colorspace = WEBP_CSP_MODE::MODE_BGRA;

        // Safety: `data` is valid for `data.len()` bytes and `config` was initialized above
        let status = unsafe { WebPDecode(data.as_ptr(), data.len(), &mut config) };

        // Take ownership before looking at the status so a failed decode still frees
        let pixels = LibwebpPixels { config };
        StatusCode::check(status as i32).map_err(DecodeError::Decode)?;

        Ok(pixels)
    }
}

/// Output buffer of a finished [`WebPDecode`], freed on drop.
pub struct LibwebpPixels {
    config: WebPDecoderConfig,
}

impl DecodedPixels for LibwebpPixels {
    fn image(&self) -> Option<DecodedImage<'_>> {
        let output = &self.config.output;
        // Safety: colorspace is MODE_BGRA so the RGBA arm of the union is the live one
        let rgba = unsafe { &output.u.RGBA };

        if rgba.rgba.is_null() {
            return None;
        }

        let width = u32::try_from(output.width).ok()?;
        let height = u32::try_from(output.height).ok()?;
        let stride = usize::try_from(rgba.stride).ok()?;

        // Safety: libwebp allocated `size` bytes at `rgba` and they live until
        // WebPFreeDecBuffer runs in `drop`, which needs `&mut self`
        let data = unsafe { slice::from_raw_parts(rgba.rgba, rgba.size) };

        Some(DecodedImage::new(width, height, stride, data))
    }
}

impl Drop for LibwebpPixels {
    fn drop(&mut self) {
        // Safety: `output` came from WebPInitDecoderConfig/WebPDecode and is freed only here
        unsafe { WebPFreeDecBuffer(&mut self.config.output) };
    }
}

/// libwebp decoder version as `(major, minor, patch)`.
pub fn decoder_version() -> (u32, u32, u32) {
    // Safety: no arguments, no preconditions
    let v = unsafe { WebPGetDecoderVersion() } as u32;
    ((v >> 16) & 0xff, (v >> 8) & 0xff, v & 0xff)
}
