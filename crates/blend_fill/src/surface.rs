// Copyright 2024 the Piet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A validated fill rectangle.

use crate::codec::PixelFormat;
use crate::color::Color;
use crate::execute::Scalar;
use crate::fine;
use crate::paint::Paint;

/// The rectangle of a [`FillDescriptor`](crate::FillDescriptor) after its geometry has
/// been checked, as handed to an [`Accelerator`](crate::Accelerator).
///
/// The destination slice starts at the first pixel of the first row and ends right
/// after the last pixel of the last row, so it always covers
/// `(height - 1) * stride + row_bytes` bytes.
pub struct Surface<'a> {
    pub(crate) dest: &'a mut [u8],
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) stride: usize,
    pub(crate) mask: Option<&'a [u8]>,
    pub(crate) mask_stride: usize,
    pub(crate) paint: Paint,
}

impl Surface<'_> {
    pub fn format(&self) -> PixelFormat {
        self.paint.format
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes between the starts of two destination rows.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Bytes written per row.
    pub fn row_bytes(&self) -> usize {
        self.width * self.paint.bytes_per_pixel()
    }

    pub fn color(&self) -> Color {
        self.paint.color
    }

    /// The color in the destination encoding.
    pub fn encoded_color(&self) -> &[u8] {
        self.paint.encoded.as_bytes()
    }

    pub fn opa(&self) -> u8 {
        self.paint.opa
    }

    /// The mask bytes, covering `(height - 1) * mask_stride + width` bytes.
    pub fn mask(&self) -> Option<&[u8]> {
        self.mask
    }

    /// Bytes between the starts of two mask rows.
    pub fn mask_stride(&self) -> usize {
        self.mask_stride
    }

    /// The destination memory.
    ///
    /// Bytes between the end of one row and the start of the next belong to the caller
    /// and must not be written.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut *self.dest
    }

    /// Composite the whole rectangle with the portable kernels.
    pub fn composite_portable(&mut self) {
        fine::run::<Scalar>(self);
    }
}
