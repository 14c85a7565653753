//! JNI bindings for `org.signal.glide.webp.WebpDecoder`.
//!
//! Loading the library registers `nativeDecodeBitmapScaled` on the decoder class, installs
//! the platform logger and resolves the `android.graphics.Bitmap` handles up front so the
//! first decode doesn't pay for the lookups.

// Named lifetimes are being used to match jni crate conventions.
// See: https://docs.rs/jni/latest/jni/struct.JNIEnv.html#lifetime-names
#![allow(clippy::needless_lifetimes)]

mod bitmap;
mod decoder;
mod logging;

use std::ffi::c_void;

use anyhow::{Context, Result};
use jni::{
    errors::{Error as JniError, JniError as JniStatus},
    sys::{self, jint},
    JNIEnv, JavaVM, NativeMethod,
};

/// Class the native method table is registered on.
pub const DECODER_CLASS: &str = "org/signal/glide/webp/WebpDecoder";
const DECODE_METHOD: &str = "nativeDecodeBitmapScaled";
const DECODE_METHOD_SIG: &str = "([BII)Landroid/graphics/Bitmap;";

/// Log target for decode diagnostics, doubles as the logcat tag.
pub const LOG_TAG: &str = "WebpResourceDecoder";

/// Called by the JVM when the library is loaded.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "system" fn JNI_OnLoad(vm: *mut sys::JavaVM, _reserved: *mut c_void) -> jint {
    logging::init();

    // Safety: the JVM hands us a valid pointer to itself
    let vm = match unsafe { JavaVM::from_raw(vm) } {
        Ok(vm) => vm,
        Err(e) => {
            log::error!(target: LOG_TAG, "JavaVM: {e}");
            return sys::JNI_ERR;
        }
    };

    let mut env = match vm.get_env() {
        Ok(env) => env,
        Err(e) => {
            log::error!(target: LOG_TAG, "GetEnv: {e}");
            return sys::JNI_ERR;
        }
    };

    match on_load(&mut env) {
        Ok(()) => sys::JNI_VERSION_1_6,
        Err(e) => {
            log::error!(target: LOG_TAG, "{e:#}");
            status_code(&e)
        }
    }
}

fn on_load(env: &mut JNIEnv<'_>) -> Result<()> {
    let (major, minor, patch) = glide_webp::decoder_version();
    log::info!(target: LOG_TAG, "libwebp {major}.{minor}.{patch}");

    register_natives(env)?;

    // Not fatal: a miss here is retried on the first decode
    if let Err(e) = bitmap::BitmapHandles::get(env) {
        log::warn!(target: LOG_TAG, "resolving android.graphics.Bitmap: {e}");
        let _ = env.exception_clear();
    }

    Ok(())
}

fn register_natives(env: &mut JNIEnv<'_>) -> Result<()> {
    let class = env
        .find_class(DECODER_CLASS)
        .with_context(|| format!("FindClass {DECODER_CLASS}"))?;

    let methods = [NativeMethod {
        name: DECODE_METHOD.into(),
        sig: DECODE_METHOD_SIG.into(),
        fn_ptr: decoder::native_decode_bitmap_scaled as *mut c_void,
    }];

    // `fn_ptr` must be an `extern "system"` fn whose parameters match DECODE_METHOD_SIG
    env.register_native_methods(&class, &methods)
        .with_context(|| format!("RegisterNatives {DECODER_CLASS}.{DECODE_METHOD}"))?;

    env.delete_local_ref(class)?;
    Ok(())
}

/// JNI status code to hand back from `JNI_OnLoad` for a failed load.
fn status_code(err: &anyhow::Error) -> jint {
    match err.downcast_ref::<JniError>() {
        Some(JniError::JniCall(status)) => match status {
            JniStatus::Unknown => sys::JNI_ERR,
            JniStatus::ThreadDetached => sys::JNI_EDETACHED,
            JniStatus::WrongVersion => sys::JNI_EVERSION,
            JniStatus::NoMemory => sys::JNI_ENOMEM,
            JniStatus::AlreadyCreated => sys::JNI_EEXIST,
            JniStatus::InvalidArguments => sys::JNI_EINVAL,
            JniStatus::Other(code) => *code,
        },
        _ => sys::JNI_ERR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jni_call_failures_keep_their_code() {
        let err = anyhow::Error::new(JniError::JniCall(JniStatus::NoMemory))
            .context("RegisterNatives");
        assert_eq!(status_code(&err), sys::JNI_ENOMEM);

        let err = anyhow::Error::new(JniError::JniCall(JniStatus::Other(-42)));
        assert_eq!(status_code(&err), -42);
    }

    #[test]
    fn other_failures_are_jni_err() {
        let err = anyhow::Error::new(JniError::NullPtr("find_class")).context("FindClass");
        assert_eq!(status_code(&err), sys::JNI_ERR);

        assert_eq!(status_code(&anyhow::anyhow!("no class")), sys::JNI_ERR);
    }
}
