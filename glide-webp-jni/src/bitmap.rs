//! `android.graphics.Bitmap` construction from decoded pixels

use anyhow::{Context, Result};
use glide_webp::DecodedImage;
use jni::{
    objects::{GlobalRef, JClass, JObject, JStaticFieldID, JStaticMethodID},
    signature::{JavaType, ReturnType},
    sys::{jint, jvalue},
    JNIEnv,
};
use once_cell::sync::OnceCell;

const BITMAP_CLASS: &str = "android/graphics/Bitmap";
const BITMAP_CONFIG_CLASS: &str = "android/graphics/Bitmap$Config";
const ARGB_8888_FIELD: &str = "ARGB_8888";
const BITMAP_CONFIG_SIG: &str = "Landroid/graphics/Bitmap$Config;";
const CREATE_BITMAP_METHOD: &str = "createBitmap";
/// `createBitmap(int[] colors, int offset, int stride, int width, int height, Config config)`
const CREATE_BITMAP_SIG: &str = "([IIIIILandroid/graphics/Bitmap$Config;)Landroid/graphics/Bitmap;";

static HANDLES: OnceCell<BitmapHandles> = OnceCell::new();

/// Class and member ids needed to build a Bitmap, resolved once per process.
pub(crate) struct BitmapHandles {
    bitmap_class: GlobalRef,
    config_class: GlobalRef,
    argb_8888: JStaticFieldID,
    create_bitmap: JStaticMethodID,
}

impl BitmapHandles {
    /// Resolve on first use. Concurrent first callers block until one of them finishes; a
    /// failed lookup leaves the cache empty and the next call tries again.
    pub(crate) fn get<'local>(env: &mut JNIEnv<'local>) -> jni::errors::Result<&'static Self> {
        HANDLES.get_or_try_init(|| Self::resolve(env))
    }

    fn resolve<'local>(env: &mut JNIEnv<'local>) -> jni::errors::Result<Self> {
        let config_class = env.find_class(BITMAP_CONFIG_CLASS)?;
        let argb_8888 = env.get_static_field_id(&config_class, ARGB_8888_FIELD, BITMAP_CONFIG_SIG)?;
        let config_class = env.new_global_ref(config_class)?;

        let bitmap_class = env.find_class(BITMAP_CLASS)?;
        let create_bitmap =
            env.get_static_method_id(&bitmap_class, CREATE_BITMAP_METHOD, CREATE_BITMAP_SIG)?;
        let bitmap_class = env.new_global_ref(bitmap_class)?;

        log::debug!("resolved {BITMAP_CLASS} handles");

        Ok(Self {
            bitmap_class,
            config_class,
            argb_8888,
            create_bitmap,
        })
    }

    fn bitmap_class(&self) -> &JClass<'static> {
        <&JClass>::from(self.bitmap_class.as_obj())
    }

    fn config_class(&self) -> &JClass<'static> {
        <&JClass>::from(self.config_class.as_obj())
    }
}

/// Java-side dimensions of a Bitmap and the length of its backing `int[]`.
#[derive(Debug, PartialEq, Eq)]
struct BitmapSize {
    width: jint,
    height: jint,
    len: jint,
}

impl BitmapSize {
    fn of(width: u32, height: u32) -> Result<Self> {
        let width = jint::try_from(width).context("bitmap width does not fit a jint")?;
        let height = jint::try_from(height).context("bitmap height does not fit a jint")?;
        let len = width
            .checked_mul(height)
            .with_context(|| format!("{width}x{height} pixels do not fit an int[]"))?;
        Ok(Self { width, height, len })
    }
}

/// Copy `image` into a new `ARGB_8888` Bitmap of exactly its size.
pub(crate) fn create_bitmap<'local>(
    env: &mut JNIEnv<'local>,
    image: &DecodedImage<'_>,
) -> Result<JObject<'local>> {
    let BitmapSize { width, height, len } = BitmapSize::of(image.width(), image.height())?;

    let handles = BitmapHandles::get(env).context("resolving android.graphics.Bitmap")?;

    let pixels = image.to_argb();
    let colors = env.new_int_array(len).context("NewIntArray")?;
    env.set_int_array_region(&colors, 0, &pixels)
        .context("SetIntArrayRegion")?;

    let config = env
        .get_static_field_unchecked(
            handles.config_class(),
            handles.argb_8888,
            JavaType::Object(BITMAP_CONFIG_CLASS.into()),
        )
        .and_then(|value| value.l())
        .context("Bitmap.Config.ARGB_8888")?;

    let args = [
        jvalue { l: colors.as_raw() },
        jvalue { i: 0 },
        jvalue { i: width },
        jvalue { i: width },
        jvalue { i: height },
        jvalue { l: config.as_raw() },
    ];

    // Safety: `args` matches CREATE_BITMAP_SIG in count, order and type
    let bitmap = unsafe {
        env.call_static_method_unchecked(
            handles.bitmap_class(),
            handles.create_bitmap,
            ReturnType::Object,
            &args,
        )
    }
    .and_then(|value| value.l())
    .context("Bitmap.createBitmap")?;

    env.delete_local_ref(config)?;
    env.delete_local_ref(colors)?;

    Ok(bitmap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_fits_an_int_array() {
        assert_eq!(
            BitmapSize::of(640, 480).unwrap(),
            BitmapSize {
                width: 640,
                height: 480,
                len: 307_200
            }
        );
        assert_eq!(BitmapSize::of(0, 10).unwrap().len, 0);
    }

    #[test]
    fn pixel_count_overflow_is_an_error() {
        let err = BitmapSize::of(65_536, 65_536).unwrap_err();
        assert_eq!(err.to_string(), "65536x65536 pixels do not fit an int[]");

        // 46341^2 is just past i32::MAX
        assert!(BitmapSize::of(46_341, 46_341).is_err());
        assert!(BitmapSize::of(46_340, 46_340).is_ok());
    }

    #[test]
    fn dimension_beyond_jint_is_an_error() {
        let err = BitmapSize::of(u32::MAX, 1).unwrap_err();
        assert_eq!(err.to_string(), "bitmap width does not fit a jint");
    }
}
