#![allow(dead_code)]

use blend_fill::execute::ExecutionMode;
use blend_fill::{FillEngine, PixelFormat};
use sweep_gen::Case;

/// Number of sentinel words before and after the fill area.
pub const CANARY_WORDS: usize = 4;
/// Non-zero, so a stray write of black is caught too.
pub const CANARY_VALUE: u8 = 0xA5;

pub fn get_engine() -> FillEngine<'static> {
    init_logging();

    #[allow(unused_mut)]
    let mut execution_mode = ExecutionMode::default();

    #[cfg(all(target_arch = "aarch64", feature = "simd"))]
    if option_env!("NEON").is_some() {
        execution_mode = ExecutionMode::Neon;
    }

    #[cfg(all(target_arch = "x86_64", feature = "simd"))]
    if option_env!("AVX2").is_some() {
        execution_mode = ExecutionMode::Avx2;
    }

    FillEngine::new_with_execution_mode(execution_mode)
}

/// Route the crate's logs to the test output.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// A destination buffer whose first pixel sits `unalign` bytes past a 16-byte boundary,
/// bracketed by sentinel words.
///
/// The area between the sentinels is `height * stride` bytes, so the padding after the
/// last row is covered as well. Each word of it is initialised to its index.
pub struct Canvas {
    buf: Vec<u8>,
    start: usize,
    len: usize,
    bpp: usize,
    canary_value: u8,
}

impl Canvas {
    pub fn new(format: PixelFormat, case: &Case) -> Self {
        Self::with_geometry(format, case.height, case.stride(format.bytes_per_pixel()), case.unalign)
    }

    pub fn with_geometry(format: PixelFormat, height: usize, stride: usize, unalign: usize) -> Self {
        Self::with_canary(format, height, stride, unalign, CANARY_VALUE)
    }

    pub fn with_canary(
        format: PixelFormat,
        height: usize,
        stride: usize,
        unalign: usize,
        canary_value: u8,
    ) -> Self {
        let bpp = format.bytes_per_pixel();
        let canary = CANARY_WORDS * bpp;
        let len = height * stride;

        let lead = canary.next_multiple_of(16);

        let mut buf = vec![canary_value; 16 + lead + unalign + len + canary];
        let aligned = buf.as_ptr().align_offset(16);
        assert!(aligned < 16);

        // The leading canary ends right before the first pixel.
        let start = aligned + lead + unalign;
        buf[start..start + len].copy_from_slice(&Self::index_pattern(len, bpp));

        Self {
            buf,
            start,
            len,
            bpp,
            canary_value,
        }
    }

    pub fn dest(&mut self) -> &mut [u8] {
        &mut self.buf[self.start..self.start + self.len]
    }

    pub fn interior(&self) -> &[u8] {
        &self.buf[self.start..self.start + self.len]
    }

    /// The address of the first pixel, modulo 16.
    pub fn misalignment(&self) -> usize {
        self.interior().as_ptr() as usize % 16
    }

    pub fn assert_canaries(&self, context: &str) {
        let canary = CANARY_WORDS * self.bpp;
        let before = &self.buf[self.start - canary..self.start];
        let after = &self.buf[self.start + self.len..][..canary];

        assert!(
            before.iter().all(|b| *b == self.canary_value),
            "leading canary overwritten: {context}"
        );
        assert!(
            after.iter().all(|b| *b == self.canary_value),
            "trailing canary overwritten: {context}"
        );
    }

    /// The sentinel words after the fill area.
    pub fn trailing_canary_mut(&mut self) -> &mut [u8] {
        let canary = CANARY_WORDS * self.bpp;
        &mut self.buf[self.start + self.len..][..canary]
    }

    /// Check that nothing past `row_bytes` in any row was written.
    pub fn assert_padding_untouched(&self, stride: usize, row_bytes: usize, context: &str) {
        let pristine = Self::index_pattern(self.len, self.bpp);

        for (y, (row, expected)) in self
            .interior()
            .chunks(stride)
            .zip(pristine.chunks(stride))
            .enumerate()
        {
            assert_eq!(
                &row[row_bytes..],
                &expected[row_bytes..],
                "padding of row {y} overwritten: {context}"
            );
        }
    }

    fn index_pattern(len: usize, bpp: usize) -> Vec<u8> {
        let mut out = vec![0; len];

        for (i, word) in out.chunks_mut(bpp).enumerate() {
            let bytes = (i as u32).to_le_bytes();
            word.copy_from_slice(&bytes[..word.len()]);
        }

        out
    }
}

/// The pixels of a rectangle, row by row, without padding.
pub fn pixels(interior: &[u8], stride: usize, row_bytes: usize, bpp: usize) -> Vec<&[u8]> {
    interior
        .chunks(stride)
        .flat_map(|row| row[..row_bytes].chunks(bpp))
        .collect()
}
