// Copyright 2024 the Piet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A solid color prepared for one destination format.

use crate::codec::{Encoded, Pixel, PixelFormat};
use crate::color::Color;

#[derive(Copy, Clone, Debug)]
pub(crate) struct Paint {
    pub(crate) format: PixelFormat,
    pub(crate) color: Color,
    /// The color in destination encoding, written as-is wherever the effective opacity is 255.
    pub(crate) encoded: Encoded,
    pub(crate) opa: u8,
}

impl Paint {
    pub(crate) fn new(format: PixelFormat, color: Color, opa: u8) -> Self {
        Self {
            format,
            color,
            encoded: Encoded::new(Pixel::opaque(color), format),
            opa,
        }
    }

    #[inline(always)]
    pub(crate) fn bytes_per_pixel(&self) -> usize {
        self.format.bytes_per_pixel()
    }
}
