use crate::codec::PixelFormat;
use crate::fine;
use crate::paint::Paint;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// The execution mode used for the accelerated path.
pub enum ExecutionMode {
    /// Never accelerate. Every fill runs the portable path, even if the descriptor
    /// asks for acceleration. This is the only option if you disabled the `simd` feature.
    Scalar,
    /// Select the best kernels according to what is available on the host system.
    /// This is the recommended option for highest performance.
    #[cfg(feature = "simd")]
    Auto,
    /// Force the usage of neon SIMD instructions. This will lead to panics in case
    /// the CPU doesn't support neon.
    #[cfg(all(target_arch = "aarch64", feature = "simd"))]
    Neon,
    /// Force the usage of AVX2 SIMD instructions. This will lead to panics in case
    /// the CPU doesn't support AVX2.
    #[cfg(all(target_arch = "x86_64", feature = "simd"))]
    Avx2,
}

#[cfg(feature = "simd")]
impl Default for ExecutionMode {
    fn default() -> Self {
        Self::Auto
    }
}

#[cfg(not(feature = "simd"))]
impl Default for ExecutionMode {
    fn default() -> Self {
        Self::Scalar
    }
}

/// The narrowest row the SIMD kernels accept. Narrower rectangles take the portable path.
#[cfg(feature = "simd")]
pub const SIMD_MIN_WIDTH: usize = 8;

/// Row kernels of one target.
///
/// Every implementation must produce exactly the bytes the [`Scalar`] kernels produce.
pub(crate) trait KernelExecutor {
    const NAME: &'static str;

    /// The minimum row width for which this executor has an accelerated kernel for
    /// `format`, or `None` if it has none.
    fn min_width(format: PixelFormat) -> Option<usize>;

    /// Overwrite every pixel of the row with the paint.
    fn fill_row(target: &mut [u8], paint: &Paint);

    /// Blend the paint with its global opacity, which is neither 0 nor 255.
    fn blend_row(target: &mut [u8], paint: &Paint);

    /// Blend the paint with its global opacity scaled by one mask byte per pixel.
    fn blend_row_masked(target: &mut [u8], paint: &Paint, mask: &[u8]);
}

pub(crate) struct Scalar;

#[cfg(all(target_arch = "aarch64", feature = "simd"))]
pub(crate) struct Neon;

#[cfg(all(target_arch = "x86_64", feature = "simd"))]
pub(crate) struct Avx2;

impl KernelExecutor for Scalar {
    const NAME: &'static str = "scalar";

    fn min_width(_: PixelFormat) -> Option<usize> {
        None
    }

    fn fill_row(target: &mut [u8], paint: &Paint) {
        fine::scalar::fill_row(target, paint);
    }

    fn blend_row(target: &mut [u8], paint: &Paint) {
        fine::scalar::blend_row(target, paint);
    }

    fn blend_row_masked(target: &mut [u8], paint: &Paint, mask: &[u8]) {
        fine::scalar::blend_row_masked(target, paint, mask);
    }
}

#[cfg(all(target_arch = "x86_64", feature = "simd"))]
impl KernelExecutor for Avx2 {
    const NAME: &'static str = "avx2";

    fn min_width(format: PixelFormat) -> Option<usize> {
        match format {
            PixelFormat::Argb8888 | PixelFormat::Rgb565 | PixelFormat::Rgb888 => {
                Some(SIMD_MIN_WIDTH)
            }
            PixelFormat::Al88 | PixelFormat::L8 => None,
        }
    }

    fn fill_row(target: &mut [u8], paint: &Paint) {
        // SAFETY: We are guaranteed to be running on a CPU that supports `avx2`.
        unsafe {
            match paint.format {
                PixelFormat::Argb8888 => fine::avx2::fill_argb8888(target, paint),
                PixelFormat::Rgb565 => fine::avx2::fill_rgb565(target, paint),
                PixelFormat::Rgb888 => fine::avx2::fill_rgb888(target, paint),
                PixelFormat::Al88 | PixelFormat::L8 => fine::scalar::fill_row(target, paint),
            }
        }
    }

    fn blend_row(target: &mut [u8], paint: &Paint) {
        match paint.format {
            // SAFETY: We are guaranteed to be running on a CPU that supports `avx2`.
            PixelFormat::Argb8888 => unsafe { fine::avx2::blend_argb8888(target, paint) },
            // For those, we just fall back to scalar, since blending requires a full
            // decode/encode round trip per pixel.
            _ => fine::scalar::blend_row(target, paint),
        }
    }

    fn blend_row_masked(target: &mut [u8], paint: &Paint, mask: &[u8]) {
        match paint.format {
            // SAFETY: We are guaranteed to be running on a CPU that supports `avx2`.
            PixelFormat::Argb8888 => unsafe {
                fine::avx2::blend_argb8888_masked(target, paint, mask)
            },
            _ => fine::scalar::blend_row_masked(target, paint, mask),
        }
    }
}

#[cfg(all(target_arch = "aarch64", feature = "simd"))]
impl KernelExecutor for Neon {
    const NAME: &'static str = "neon";

    fn min_width(format: PixelFormat) -> Option<usize> {
        match format {
            PixelFormat::Argb8888 | PixelFormat::Rgb565 | PixelFormat::Rgb888 => {
                Some(SIMD_MIN_WIDTH)
            }
            PixelFormat::Al88 | PixelFormat::L8 => None,
        }
    }

    fn fill_row(target: &mut [u8], paint: &Paint) {
        // SAFETY: We are guaranteed to be running on a CPU that supports `neon`.
        unsafe {
            match paint.format {
                PixelFormat::Argb8888 => fine::neon::fill_argb8888(target, paint),
                PixelFormat::Rgb565 => fine::neon::fill_rgb565(target, paint),
                PixelFormat::Rgb888 => fine::neon::fill_rgb888(target, paint),
                PixelFormat::Al88 | PixelFormat::L8 => fine::scalar::fill_row(target, paint),
            }
        }
    }

    fn blend_row(target: &mut [u8], paint: &Paint) {
        match paint.format {
            // SAFETY: We are guaranteed to be running on a CPU that supports `neon`.
            PixelFormat::Argb8888 => unsafe { fine::neon::blend_argb8888(target, paint) },
            _ => fine::scalar::blend_row(target, paint),
        }
    }

    fn blend_row_masked(target: &mut [u8], paint: &Paint, mask: &[u8]) {
        match paint.format {
            // SAFETY: We are guaranteed to be running on a CPU that supports `neon`.
            PixelFormat::Argb8888 => unsafe {
                fine::neon::blend_argb8888_masked(target, paint, mask)
            },
            _ => fine::scalar::blend_row_masked(target, paint, mask),
        }
    }
}
