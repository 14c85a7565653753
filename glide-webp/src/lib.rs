//! Scaled WebP decoding for Glide.
//!
//! Probes a WebP buffer, asks libwebp to decode straight into a size derived from the
//! requested one, and hands the BGRA pixels to a caller-provided bitmap constructor before
//! freeing them. The JNI glue lives in the `glide-webp-jni` crate.

pub mod codec;
mod decode;
pub mod error;
mod image;
mod libwebp;
mod options;
pub mod scale;
#[cfg(test)]
mod testing;

pub use codec::{BitstreamFeatures, DecodedPixels, WebpCodec};
pub use decode::decode_scaled;
pub use error::{DecodeError, Result, StatusCode};
pub use image::DecodedImage;
pub use libwebp::{decoder_version, Libwebp, LibwebpPixels};
pub use options::DecoderOptions;
pub use scale::{DecodeRequest, ScaleRatios};
