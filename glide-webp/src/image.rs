/// A decoded BGRA frame, borrowed from whichever codec owns the memory.
#[derive(Debug, Clone, Copy)]
pub struct DecodedImage<'a> {
    width: u32,
    height: u32,
    stride: usize,
    data: &'a [u8],
}

impl<'a> DecodedImage<'a> {
    /// `stride` is the distance in bytes between the starts of two rows.
    pub fn new(width: u32, height: u32, stride: usize, data: &'a [u8]) -> Self {
        debug_assert!(stride >= width as usize * 4);
        DecodedImage {
            width,
            height,
            stride,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Pack the pixels into `0xAARRGGBB` color ints with no row padding.
    ///
    /// BGRA bytes read as a little-endian `i32` are exactly that layout, which is what
    /// `Bitmap.createBitmap(int[], ...)` expects for `ARGB_8888`.
    pub fn to_argb(&self) -> Vec<i32> {
        let row_bytes = self.width as usize * 4;
        let mut argb = Vec::with_capacity(self.pixel_count());

        for row in self.data.chunks(self.stride.max(1)).take(self.height as usize) {
            let row = &row[..row_bytes.min(row.len())];
            argb.extend(
                row.chunks_exact(4)
                    .map(|px| i32::from_le_bytes([px[0], px[1], px[2], px[3]])),
            );
        }

        argb
    }
}
