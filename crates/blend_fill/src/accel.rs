// Copyright 2024 the Piet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Accelerated fill backends.

use crate::codec::PixelFormat;
use crate::error::KernelError;
use crate::surface::Surface;
#[cfg(feature = "simd")]
use crate::{execute::KernelExecutor, fine};
#[cfg(feature = "simd")]
use std::marker::PhantomData;

/// A backend that fills whole rectangles, usually with hardware-specific code.
///
/// The built-in SIMD backends implement this, and so can external ones, for example a
/// 2D engine driven through a vendor driver.
pub trait Accelerator: Send + Sync {
    /// A short name for logs and errors.
    fn name(&self) -> &'static str;

    /// The minimum width this backend handles for `format`, or `None` if it has no
    /// kernel for `format` at all.
    fn min_width(&self, format: PixelFormat) -> Option<usize>;

    /// Fill the surface.
    ///
    /// The result must be byte-identical to [`Surface::composite_portable`]. An
    /// implementation that returns an error must not have written to the surface.
    fn fill(&self, surface: &mut Surface<'_>) -> Result<(), KernelError>;
}

/// Adapts the row kernels of an executor to the [`Accelerator`] interface.
///
/// Only ever instantiated for executors whose CPU features have been detected.
#[cfg(feature = "simd")]
pub(crate) struct SimdAccelerator<KE>(PhantomData<KE>);

#[cfg(feature = "simd")]
impl<KE> SimdAccelerator<KE> {
    pub(crate) const fn new() -> Self {
        Self(PhantomData)
    }
}

#[cfg(feature = "simd")]
impl<KE: KernelExecutor + Send + Sync> Accelerator for SimdAccelerator<KE> {
    fn name(&self) -> &'static str {
        KE::NAME
    }

    fn min_width(&self, format: PixelFormat) -> Option<usize> {
        KE::min_width(format)
    }

    fn fill(&self, surface: &mut Surface<'_>) -> Result<(), KernelError> {
        fine::run::<KE>(surface);

        Ok(())
    }
}
