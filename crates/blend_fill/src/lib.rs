// Copyright 2024 the Piet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Solid color rectangle fills with optional opacity and per-pixel masks.
//!
//! A fill is described by a [`FillDescriptor`] and executed by a [`FillEngine`]. The
//! engine runs either the portable kernels or an [`Accelerator`], and both produce the
//! exact same bytes for every input.
//!
//! ```
//! use blend_fill::{Color, FillDescriptor, FillEngine, PixelFormat};
//!
//! let mut buf = vec![0; 4 * 4 * 4];
//! let engine = FillEngine::new();
//!
//! engine
//!     .fill(FillDescriptor::new(&mut buf, PixelFormat::Argb8888, 4, 4, 16, Color::new(255, 0, 0)))
//!     .unwrap();
//!
//! assert_eq!(&buf[..4], &[0, 0, 255, 255]);
//! ```

#![cfg_attr(not(feature = "simd"), forbid(unsafe_code))]

mod accel;
pub mod codec;
mod color;
mod descriptor;
mod engine;
mod error;
pub mod execute;
pub(crate) mod fine;
mod paint;
mod surface;
pub(crate) mod util;

pub use accel::Accelerator;
pub use codec::{Encoded, Pixel, PixelFormat};
pub use color::Color;
pub use descriptor::FillDescriptor;
pub use engine::{fill, FillEngine};
pub use error::{FillError, FillResult, Ineligible, KernelError};
pub use execute::ExecutionMode;
pub use surface::Surface;

pub use peniko;

/// Fully transparent, nothing is written.
pub const OPA_TRANSP: u8 = 0;
/// Fully opaque, pixels are overwritten.
pub const OPA_COVER: u8 = 255;
