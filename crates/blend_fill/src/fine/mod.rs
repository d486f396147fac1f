// Copyright 2024 the Piet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Row compositing

#[cfg(all(target_arch = "x86_64", feature = "simd"))]
pub(crate) mod avx2;
#[cfg(all(target_arch = "aarch64", feature = "simd"))]
pub(crate) mod neon;
pub(crate) mod scalar;

use crate::codec::{decode, encode, Pixel};
use crate::color::Color;
use crate::execute::KernelExecutor;
use crate::paint::Paint;
use crate::surface::Surface;
use crate::util::scalar::div_255;
use crate::{OPA_COVER, OPA_TRANSP};

/// The opacity of a single pixel: the global opacity scaled by its mask value.
#[inline(always)]
pub(crate) const fn effective_opa(opa: u8, mask: u8) -> u8 {
    div_255(opa as u16 * mask as u16) as u8
}

/// `(Cs * e + Cb * (255 - e)) / 255` for every channel, with the source treated as opaque.
#[inline(always)]
pub(crate) fn mix(color: Color, prior: Pixel, e: u8) -> Pixel {
    let e = e as u16;
    let inv_e = 255 - e;
    let channel = |cs: u8, cb: u8| div_255(cs as u16 * e + cb as u16 * inv_e) as u8;

    Pixel {
        r: channel(color.red, prior.r),
        g: channel(color.green, prior.g),
        b: channel(color.blue, prior.b),
        a: channel(255, prior.a),
    }
}

/// Composite the paint onto a single destination pixel with effective opacity `e`.
#[inline(always)]
pub(crate) fn composite_pixel(dst: &mut [u8], paint: &Paint, e: u8) {
    match e {
        OPA_TRANSP => {}
        // A full-coverage pixel is overwritten, the prior value doesn't matter.
        OPA_COVER => dst.copy_from_slice(paint.encoded.as_bytes()),
        _ => {
            let prior = decode(dst, paint.format);
            encode(mix(paint.color, prior, e), paint.format, dst);
        }
    }
}

/// Walk every row of the surface and composite it with the kernels of `KE`.
pub(crate) fn run<KE: KernelExecutor>(surface: &mut Surface<'_>) {
    let paint = surface.paint;

    if paint.opa == OPA_TRANSP {
        return;
    }

    let row_bytes = surface.row_bytes();
    let (width, height, stride) = (surface.width, surface.height, surface.stride);

    match surface.mask {
        None => {
            for y in 0..height {
                // Stride padding past `row_bytes` is never touched.
                let row = &mut surface.dest[y * stride..][..row_bytes];

                if paint.opa == OPA_COVER {
                    KE::fill_row(row, &paint);
                } else {
                    KE::blend_row(row, &paint);
                }
            }
        }
        Some(mask) => {
            let mask_stride = surface.mask_stride;

            for y in 0..height {
                let row = &mut surface.dest[y * stride..][..row_bytes];
                let mask_row = &mask[y * mask_stride..][..width];

                KE::blend_row_masked(row, &paint, mask_row);
            }
        }
    }
}
