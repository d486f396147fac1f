// Copyright 2024 the Piet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The source color of a fill.

use peniko::color::{AlphaColor, Rgba8, Srgb};

/// An opaque 24-bit sRGB color, 8 bits per channel.
///
/// Fills always draw an opaque color. Translucency comes from the global
/// opacity and the optional mask of a [`FillDescriptor`](crate::FillDescriptor),
/// so any alpha carried by a converted color is dropped.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// The luma of the color, used by the grayscale formats.
    ///
    /// Integer weights (77, 151, 28) sum to 256, so white maps to 255 and black to 0.
    #[inline(always)]
    pub const fn luminance(self) -> u8 {
        ((self.red as u16 * 77 + self.green as u16 * 151 + self.blue as u16 * 28) >> 8) as u8
    }
}

impl From<Rgba8> for Color {
    fn from(value: Rgba8) -> Self {
        Self::new(value.r, value.g, value.b)
    }
}

impl From<AlphaColor<Srgb>> for Color {
    fn from(value: AlphaColor<Srgb>) -> Self {
        value.to_rgba8().into()
    }
}

impl From<[u8; 3]> for Color {
    fn from([red, green, blue]: [u8; 3]) -> Self {
        Self::new(red, green, blue)
    }
}
