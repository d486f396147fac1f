// Copyright 2024 the Piet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatch between the portable and the accelerated path.

use crate::accel::Accelerator;
use crate::descriptor::FillDescriptor;
use crate::error::{FillError, FillResult, Ineligible};
use crate::execute::{ExecutionMode, KernelExecutor, Scalar};
use crate::fine;
use crate::surface::Surface;

#[cfg(all(target_arch = "x86_64", feature = "simd"))]
static AVX2: crate::accel::SimdAccelerator<crate::execute::Avx2> =
    crate::accel::SimdAccelerator::new();

#[cfg(all(target_arch = "aarch64", feature = "simd"))]
static NEON: crate::accel::SimdAccelerator<crate::execute::Neon> =
    crate::accel::SimdAccelerator::new();

/// Fills rectangles, accelerated where possible.
///
/// The engine holds no state besides its accelerator, so a single instance can be shared
/// between threads and reused for any number of fills.
#[derive(Clone, Copy)]
pub struct FillEngine<'a> {
    accelerator: Option<&'a dyn Accelerator>,
}

impl Default for FillEngine<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl FillEngine<'static> {
    /// Create an engine with the default execution mode.
    pub fn new() -> Self {
        Self::new_with_execution_mode(ExecutionMode::default())
    }

    /// Create an engine with a specific execution mode.
    ///
    /// Panics when attempting to choose an execution mode not supported by the
    /// current CPU.
    pub fn new_with_execution_mode(execution_mode: ExecutionMode) -> Self {
        let accelerator = select_accelerator(execution_mode);

        tracing::debug!(
            ?execution_mode,
            accelerator = accelerator.map(|a| a.name()),
            "selected fill accelerator"
        );

        Self { accelerator }
    }

    /// An engine that always runs the portable path.
    pub fn portable() -> Self {
        Self { accelerator: None }
    }
}

impl<'a> FillEngine<'a> {
    /// Create an engine that accelerates with an external backend.
    pub fn with_accelerator(accelerator: &'a dyn Accelerator) -> Self {
        Self {
            accelerator: Some(accelerator),
        }
    }

    /// The accelerator, if any.
    pub fn accelerator(&self) -> Option<&'a dyn Accelerator> {
        self.accelerator
    }

    /// The name of the accelerator, if any.
    pub fn accelerator_name(&self) -> Option<&'static str> {
        self.accelerator.map(|a| a.name())
    }

    /// Fill the rectangle described by `desc`.
    ///
    /// The accelerated path is taken if the descriptor allows it and the accelerator
    /// supports the format and width, otherwise the portable path is taken silently.
    /// A failure reported by the accelerator is returned as is, without retrying.
    pub fn fill(&self, desc: FillDescriptor<'_>) -> FillResult {
        let use_accelerated = desc.use_accelerated;
        let Some(mut surface) = desc.into_surface() else {
            return Ok(());
        };

        if use_accelerated {
            match self.eligible(&surface) {
                Ok(accelerator) => return run_accelerated(accelerator, &mut surface),
                Err(reason) => tracing::trace!(%reason, "taking the portable path"),
            }
        }

        run_portable(&mut surface);

        Ok(())
    }

    /// Fill the rectangle with the portable path, regardless of `use_accelerated`.
    pub fn fill_portable(&self, desc: FillDescriptor<'_>) {
        if let Some(mut surface) = desc.into_surface() {
            run_portable(&mut surface);
        }
    }

    /// Fill the rectangle with the accelerated path only.
    ///
    /// Returns [`FillError::Unsupported`] without touching the destination if the
    /// accelerated path can't be taken. Empty rectangles always succeed.
    pub fn try_fill_accelerated(&self, desc: FillDescriptor<'_>) -> FillResult {
        let Some(mut surface) = desc.into_surface() else {
            return Ok(());
        };

        let accelerator = self.eligible(&surface)?;

        run_accelerated(accelerator, &mut surface)
    }

    /// Check whether the accelerated path can take the rectangle.
    fn eligible(&self, surface: &Surface<'_>) -> Result<&'a dyn Accelerator, Ineligible> {
        let accelerator = self.accelerator.ok_or(Ineligible::NoAccelerator)?;
        let format = surface.format();

        let min_width = accelerator.min_width(format).ok_or(Ineligible::Format {
            accelerator: accelerator.name(),
            format,
        })?;

        if surface.width() < min_width {
            return Err(Ineligible::Width {
                accelerator: accelerator.name(),
                width: surface.width(),
                min_width,
            });
        }

        Ok(accelerator)
    }
}

/// Fill the rectangle with an engine of the default execution mode.
pub fn fill(desc: FillDescriptor<'_>) -> FillResult {
    FillEngine::new().fill(desc)
}

fn run_portable(surface: &mut Surface<'_>) {
    tracing::trace!(
        kernel = Scalar::NAME,
        width = surface.width(),
        height = surface.height(),
        "fill"
    );

    fine::run::<Scalar>(surface);
}

fn run_accelerated(accelerator: &dyn Accelerator, surface: &mut Surface<'_>) -> FillResult {
    tracing::trace!(
        kernel = accelerator.name(),
        width = surface.width(),
        height = surface.height(),
        "fill"
    );

    accelerator.fill(surface).map_err(|err| {
        tracing::warn!(%err, "accelerated fill failed");
        FillError::from(err)
    })
}

macro_rules! avx2 {
    ($e:expr) => {
        #[cfg(all(target_arch = "x86_64", feature = "simd"))]
        if std::arch::is_x86_feature_detected!("avx2") {
            return $e;
        }
    };
}

macro_rules! neon {
    ($e:expr) => {
        #[cfg(all(target_arch = "aarch64", feature = "simd"))]
        if std::arch::is_aarch64_feature_detected!("neon") {
            return $e;
        }
    };
}

/// NOTE: BE CAREFUL WHEN CHANGING THIS METHOD! We need to make sure to only choose an
/// accelerator when the target CPU actually supports it. Unsafe code relies on the
/// correctness of this method!
fn select_accelerator(execution_mode: ExecutionMode) -> Option<&'static dyn Accelerator> {
    match execution_mode {
        ExecutionMode::Scalar => None,
        #[cfg(feature = "simd")]
        ExecutionMode::Auto => {
            neon!(Some(&NEON));
            avx2!(Some(&AVX2));

            // Fallback.
            None
        }
        #[cfg(all(target_arch = "aarch64", feature = "simd"))]
        ExecutionMode::Neon => {
            neon!(Some(&NEON));

            panic!(
                "attempted to force execution mode NEON, but CPU doesn't support NEON instructions"
            );
        }
        #[cfg(all(target_arch = "x86_64", feature = "simd"))]
        ExecutionMode::Avx2 => {
            avx2!(Some(&AVX2));

            panic!(
                "attempted to force execution mode AVX2, but CPU doesn't support AVX2 instructions"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::PixelFormat;
    use crate::color::Color;
    use crate::error::KernelError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const COLOR: Color = Color::new(0x12, 0x34, 0x56);

    struct Faulty;

    impl Accelerator for Faulty {
        fn name(&self) -> &'static str {
            "faulty"
        }

        fn min_width(&self, _: PixelFormat) -> Option<usize> {
            Some(1)
        }

        fn fill(&self, _: &mut Surface<'_>) -> Result<(), KernelError> {
            Err(KernelError::new("faulty", -1))
        }
    }

    /// Accepts only RGB565 from 4 pixels on, and counts its calls.
    #[derive(Default)]
    struct Counting(AtomicUsize);

    impl Accelerator for Counting {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn min_width(&self, format: PixelFormat) -> Option<usize> {
            (format == PixelFormat::Rgb565).then_some(4)
        }

        fn fill(&self, surface: &mut Surface<'_>) -> Result<(), KernelError> {
            self.0.fetch_add(1, Ordering::Relaxed);
            surface.composite_portable();

            Ok(())
        }
    }

    #[test]
    fn kernel_failure_is_propagated_untouched() {
        let engine = FillEngine::with_accelerator(&Faulty);
        let mut buf = [0xAA; 64];

        let result = engine.fill(FillDescriptor::new(
            &mut buf,
            PixelFormat::Argb8888,
            4,
            4,
            16,
            COLOR,
        ));

        assert_eq!(
            result,
            Err(FillError::Kernel(KernelError::new("faulty", -1)))
        );
        assert_eq!(buf, [0xAA; 64]);
    }

    #[test]
    fn portable_request_skips_failing_accelerator() {
        let engine = FillEngine::with_accelerator(&Faulty);
        let mut buf = [0; 16];

        let desc = FillDescriptor::new(&mut buf, PixelFormat::Argb8888, 4, 1, 16, COLOR)
            .with_accelerated(false);

        assert_eq!(engine.fill(desc), Ok(()));
        assert_eq!(&buf[..4], &[0x56, 0x34, 0x12, 0xFF]);
    }

    #[test]
    fn eligibility_uses_format_and_width() {
        let counting = Counting::default();
        let engine = FillEngine::with_accelerator(&counting);
        let mut buf = [0; 64];

        let accelerator = engine.accelerator().unwrap();
        assert_eq!(accelerator.min_width(PixelFormat::Rgb565), Some(4));
        assert_eq!(accelerator.min_width(PixelFormat::L8), None);

        // Too narrow, silently portable.
        let desc = FillDescriptor::new(&mut buf, PixelFormat::Rgb565, 3, 2, 8, COLOR);
        assert_eq!(engine.fill(desc), Ok(()));
        assert_eq!(counting.0.load(Ordering::Relaxed), 0);

        // Unsupported format, silently portable.
        let desc = FillDescriptor::new(&mut buf, PixelFormat::L8, 8, 2, 8, COLOR);
        assert_eq!(engine.fill(desc), Ok(()));
        assert_eq!(counting.0.load(Ordering::Relaxed), 0);

        let desc = FillDescriptor::new(&mut buf, PixelFormat::Rgb565, 4, 2, 8, COLOR);
        assert_eq!(engine.fill(desc), Ok(()));
        assert_eq!(counting.0.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn try_fill_accelerated_reports_ineligibility() {
        let counting = Counting::default();
        let engine = FillEngine::with_accelerator(&counting);
        let mut buf = [0xAA; 64];

        let desc = FillDescriptor::new(&mut buf, PixelFormat::Rgb565, 3, 2, 8, COLOR);
        assert_eq!(
            engine.try_fill_accelerated(desc),
            Err(FillError::Unsupported(Ineligible::Width {
                accelerator: "counting",
                width: 3,
                min_width: 4,
            }))
        );

        let desc = FillDescriptor::new(&mut buf, PixelFormat::Argb8888, 8, 2, 32, COLOR);
        assert_eq!(
            engine.try_fill_accelerated(desc),
            Err(FillError::Unsupported(Ineligible::Format {
                accelerator: "counting",
                format: PixelFormat::Argb8888,
            }))
        );
        assert_eq!(buf, [0xAA; 64]);

        let desc = FillDescriptor::new(&mut buf, PixelFormat::Rgb565, 0, 2, 8, COLOR);
        assert_eq!(engine.try_fill_accelerated(desc), Ok(()));
        assert_eq!(counting.0.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn portable_engine_has_no_accelerator() {
        let engine = FillEngine::portable();
        assert!(engine.accelerator().is_none());
        assert_eq!(engine.accelerator_name(), None);

        let mut buf = [0; 32];
        let desc = FillDescriptor::new(&mut buf, PixelFormat::Argb8888, 8, 1, 32, COLOR);
        assert_eq!(
            engine.try_fill_accelerated(desc),
            Err(FillError::Unsupported(Ineligible::NoAccelerator))
        );
        assert_eq!(buf, [0; 32]);

        assert_eq!(
            FillEngine::new_with_execution_mode(ExecutionMode::Scalar).accelerator_name(),
            None
        );
    }

    #[test]
    fn zero_opacity_is_a_no_op() {
        let mut buf = [0x5A; 48];
        let desc =
            FillDescriptor::new(&mut buf, PixelFormat::Rgb888, 16, 1, 48, COLOR).with_opa(0);

        assert_eq!(fill(desc), Ok(()));
        assert_eq!(buf, [0x5A; 48]);
    }
}
