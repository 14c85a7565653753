//! Instrumented codec and input for checking what gets released on each path

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::codec::{BitstreamFeatures, DecodedPixels, WebpCodec};
use crate::error::{DecodeError, Result, StatusCode};
use crate::image::DecodedImage;
use crate::options::DecoderOptions;

#[derive(Default)]
struct Inner {
    clock: AtomicUsize,
    pixels_acquired: AtomicUsize,
    pixels_released: AtomicUsize,
    inputs_released: AtomicUsize,
    // clock value at the last release, 0 if never
    last_pixels_release: AtomicUsize,
    last_input_release: AtomicUsize,
}

impl Inner {
    fn tick(&self) -> usize {
        self.clock.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[derive(Clone, Default)]
pub struct Counters(Arc<Inner>);

impl Counters {
    pub fn pixels_acquired(&self) -> usize {
        self.0.pixels_acquired.load(Ordering::SeqCst)
    }

    pub fn pixels_released(&self) -> usize {
        self.0.pixels_released.load(Ordering::SeqCst)
    }

    pub fn inputs_released(&self) -> usize {
        self.0.inputs_released.load(Ordering::SeqCst)
    }

    /// One input released, `pixels` buffers acquired and the same number released.
    #[track_caller]
    pub fn assert_balanced(&self, pixels: usize) {
        assert_eq!(self.inputs_released(), 1, "input releases");
        assert_eq!(self.pixels_acquired(), pixels, "pixel acquisitions");
        assert_eq!(self.pixels_released(), pixels, "pixel releases");
    }

    pub fn pixels_released_before_input(&self) -> bool {
        let pixels = self.0.last_pixels_release.load(Ordering::SeqCst);
        let input = self.0.last_input_release.load(Ordering::SeqCst);
        pixels != 0 && input != 0 && pixels < input
    }
}

/// Stands in for a pinned view over caller memory.
pub struct CountingInput {
    bytes: Vec<u8>,
    counters: Counters,
}

impl CountingInput {
    pub fn new(bytes: Vec<u8>, counters: &Counters) -> Self {
        Self {
            bytes,
            counters: counters.clone(),
        }
    }
}

impl AsRef<[u8]> for CountingInput {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl Drop for CountingInput {
    fn drop(&mut self) {
        let inner = &self.counters.0;
        inner.inputs_released.fetch_add(1, Ordering::SeqCst);
        inner.last_input_release.store(inner.tick(), Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Outcome {
    Pixels,
    Empty,
    InitFailure,
    DecodeFailure(StatusCode),
}

pub struct MockCodec {
    counters: Counters,
    features: BitstreamFeatures,
    probe_failure: Option<StatusCode>,
    outcome: Outcome,
    last_options: Mutex<Option<DecoderOptions>>,
}

impl MockCodec {
    pub fn new(counters: &Counters, width: i32, height: i32, outcome: Outcome) -> Self {
        Self {
            counters: counters.clone(),
            features: BitstreamFeatures {
                width,
                height,
                ..Default::default()
            },
            probe_failure: None,
            outcome,
            last_options: Mutex::new(None),
        }
    }

    pub fn failing_probe(mut self, status: StatusCode) -> Self {
        self.probe_failure = Some(status);
        self
    }

    pub fn last_options(&self) -> Option<DecoderOptions> {
        *self.last_options.lock().unwrap()
    }

    fn acquire(&self, image: Option<(u32, u32)>) -> MockPixels {
        self.counters.0.pixels_acquired.fetch_add(1, Ordering::SeqCst);
        let image = image.map(|(width, height)| {
            let data = vec![0x7f; width as usize * height as usize * 4];
            (width, height, data)
        });
        MockPixels {
            counters: self.counters.clone(),
            image,
        }
    }
}

impl WebpCodec for MockCodec {
    type Pixels = MockPixels;

    fn features(&self, _data: &[u8]) -> Result<BitstreamFeatures> {
        match self.probe_failure {
            Some(status) => Err(DecodeError::Probe(status)),
            None => Ok(self.features),
        }
    }

    fn decode(&self, _data: &[u8], options: &DecoderOptions) -> Result<MockPixels> {
        *self.last_options.lock().unwrap() = Some(*options);

        match self.outcome {
            Outcome::Pixels => {
                let width = options.scaled_width.max(0) as u32;
                let height = options.scaled_height.max(0) as u32;
                Ok(self.acquire(Some((width, height))))
            }
            Outcome::Empty => Ok(self.acquire(None)),
            Outcome::InitFailure => Err(DecodeError::Init),
            Outcome::DecodeFailure(status) => {
                // partially decoded output is still released
                let _pixels = self.acquire(None);
                Err(DecodeError::Decode(status))
            }
        }
    }
}

pub struct MockPixels {
    counters: Counters,
    image: Option<(u32, u32, Vec<u8>)>,
}

impl DecodedPixels for MockPixels {
    fn image(&self) -> Option<DecodedImage<'_>> {
        self.image
            .as_ref()
            .map(|(width, height, data)| DecodedImage::new(*width, *height, *width as usize * 4, data))
    }
}

impl Drop for MockPixels {
    fn drop(&mut self) {
        let inner = &self.counters.0;
        inner.pixels_released.fetch_add(1, Ordering::SeqCst);
        inner.last_pixels_release.store(inner.tick(), Ordering::SeqCst);
    }
}
