//! Native half of `WebpDecoder.nativeDecodeBitmapScaled`

use std::panic::{self, AssertUnwindSafe};
use std::{ptr, slice};

use anyhow::Context;
use glide_webp::{decode_scaled, DecodeError, DecodeRequest, Libwebp};
use jni::{
    objects::{AutoElements, JByteArray, JObject, ReleaseMode},
    sys::{jbyte, jint, jobject},
    JNIEnv,
};

use crate::{bitmap, LOG_TAG};

/// Java array elements held for the duration of a decode. Released (without copying back,
/// the decoder only reads) when dropped.
struct PinnedBytes<'local, 'other_local, 'array> {
    elements: AutoElements<'local, 'other_local, 'array, jbyte>,
}

impl<'local, 'other_local, 'array> PinnedBytes<'local, 'other_local, 'array> {
    fn pin(
        env: &mut JNIEnv<'local>,
        array: &'array JByteArray<'other_local>,
    ) -> jni::errors::Result<Self> {
        // Safety: nothing else in this call reads or writes the array while it is pinned,
        // and NoCopyBack means the decoder's read-only access never leaks back into Java
        let elements = unsafe { env.get_array_elements(array, ReleaseMode::NoCopyBack) }?;
        Ok(Self { elements })
    }
}

impl AsRef<[u8]> for PinnedBytes<'_, '_, '_> {
    fn as_ref(&self) -> &[u8] {
        let bytes: &[jbyte] = &self.elements;
        // Safety: i8 and u8 have the same size and alignment
        unsafe { slice::from_raw_parts(bytes.as_ptr().cast::<u8>(), bytes.len()) }
    }
}

/// `native Bitmap nativeDecodeBitmapScaled(byte[] data, int requestedWidth, int requestedHeight)`
///
/// Returns `null` both on failure (after logging a warning) and when libwebp decodes
/// successfully without producing pixels.
pub(crate) extern "system" fn native_decode_bitmap_scaled<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    data: JByteArray<'local>,
    requested_width: jint,
    requested_height: jint,
) -> jobject {
    let request = DecodeRequest::new(requested_width, requested_height);

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        decode_bitmap(&mut env, &data, request)
    }));

    match result {
        Ok(Ok(Some(bitmap))) => bitmap.into_raw(),
        Ok(Ok(None)) => ptr::null_mut(),
        Ok(Err(e)) => {
            log::warn!(target: LOG_TAG, "{e:#}");
            ptr::null_mut()
        }
        Err(_) => {
            log::error!(target: LOG_TAG, "panicked decoding {request:?}");
            ptr::null_mut()
        }
    }
}

fn decode_bitmap<'local>(
    env: &mut JNIEnv<'local>,
    data: &JByteArray<'_>,
    request: DecodeRequest,
) -> anyhow::Result<Option<JObject<'local>>> {
    let input = PinnedBytes::pin(env, data).context("GetByteArrayElements")?;

    let bitmap = decode_scaled(&Libwebp, input, request, |image| {
        bitmap::create_bitmap(env, image).map_err(DecodeError::bitmap)
    })?;

    Ok(bitmap)
}
