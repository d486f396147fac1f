// Copyright 2024 the Piet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The description of a single fill.

use crate::codec::PixelFormat;
use crate::color::Color;
use crate::paint::Paint;
use crate::surface::Surface;
use crate::OPA_COVER;

/// Everything needed for one fill. It is consumed by the fill and borrows all memory
/// it refers to.
///
/// The caller must guarantee that
/// - `dest_stride >= dest_w * format.bytes_per_pixel()`,
/// - `dest_buf` holds at least `(dest_h - 1) * dest_stride + dest_w * bytes_per_pixel` bytes,
/// - `mask_buf`, if present, holds at least `(dest_h - 1) * mask_stride + dest_w` bytes.
///
/// Violating any of these is a programming error: the fill panics before writing anything.
/// Rectangles with `dest_w == 0` or `dest_h == 0` are never checked and never touch memory.
#[derive(Debug)]
pub struct FillDescriptor<'a> {
    pub dest_buf: &'a mut [u8],
    pub dest_w: usize,
    pub dest_h: usize,
    /// Bytes between the starts of two destination rows.
    pub dest_stride: usize,
    pub color: Color,
    /// One opacity byte per destination pixel, `None` for a fully opaque mask.
    pub mask_buf: Option<&'a [u8]>,
    /// Bytes between the starts of two mask rows. `0` means `dest_w`.
    pub mask_stride: usize,
    /// Global opacity, 255 means opaque.
    pub opa: u8,
    pub format: PixelFormat,
    /// Whether the accelerated path may be used.
    pub use_accelerated: bool,
}

impl<'a> FillDescriptor<'a> {
    /// An opaque, unmasked fill that may be accelerated.
    pub fn new(
        dest_buf: &'a mut [u8],
        format: PixelFormat,
        dest_w: usize,
        dest_h: usize,
        dest_stride: usize,
        color: Color,
    ) -> Self {
        Self {
            dest_buf,
            dest_w,
            dest_h,
            dest_stride,
            color,
            mask_buf: None,
            mask_stride: 0,
            opa: OPA_COVER,
            format,
            use_accelerated: true,
        }
    }

    pub fn with_opa(mut self, opa: u8) -> Self {
        self.opa = opa;
        self
    }

    /// Attach a mask whose rows are `dest_w` bytes apart.
    pub fn with_mask(mut self, mask: &'a [u8]) -> Self {
        self.mask_buf = Some(mask);
        self
    }

    pub fn with_mask_stride(mut self, mask_stride: usize) -> Self {
        self.mask_stride = mask_stride;
        self
    }

    pub fn with_accelerated(mut self, use_accelerated: bool) -> Self {
        self.use_accelerated = use_accelerated;
        self
    }

    /// Check the geometry and narrow the buffers to the rectangle.
    ///
    /// Returns `None` for an empty rectangle.
    pub(crate) fn into_surface(self) -> Option<Surface<'a>> {
        if self.dest_w == 0 || self.dest_h == 0 {
            return None;
        }

        let row_bytes = self.dest_w * self.format.bytes_per_pixel();
        assert!(
            self.dest_stride >= row_bytes,
            "destination stride ({}) is smaller than a row ({row_bytes} bytes)",
            self.dest_stride
        );

        let dest_len = (self.dest_h - 1) * self.dest_stride + row_bytes;
        assert!(
            self.dest_buf.len() >= dest_len,
            "destination buffer holds {} bytes, the rectangle needs {dest_len}",
            self.dest_buf.len()
        );

        let mask_stride = match self.mask_stride {
            0 => self.dest_w,
            stride => stride,
        };

        let mask = self.mask_buf.map(|mask| {
            assert!(
                mask_stride >= self.dest_w,
                "mask stride ({mask_stride}) is smaller than the width ({})",
                self.dest_w
            );

            let mask_len = (self.dest_h - 1) * mask_stride + self.dest_w;
            assert!(
                mask.len() >= mask_len,
                "mask buffer holds {} bytes, the rectangle needs {mask_len}",
                mask.len()
            );

            &mask[..mask_len]
        });

        let dest = self.dest_buf;

        Some(Surface {
            dest: &mut dest[..dest_len],
            width: self.dest_w,
            height: self.dest_h,
            stride: self.dest_stride,
            mask,
            mask_stride,
            paint: Paint::new(self.format, self.color, self.opa),
        })
    }
}
