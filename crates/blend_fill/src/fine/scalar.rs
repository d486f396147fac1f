use crate::fine::{composite_pixel, effective_opa};
use crate::paint::Paint;

/// Fill with `Cs`.
pub(crate) fn fill_row(target: &mut [u8], paint: &Paint) {
    let px = paint.encoded.as_bytes();

    if px.iter().all(|b| *b == px[0]) {
        // All bytes are the same, so we can use memset instead.
        target.fill(px[0]);
    } else {
        for dst in target.chunks_exact_mut(px.len()) {
            dst.copy_from_slice(px);
        }
    }
}

/// Blend with `Cs * opa + Cb * (1 - opa)`.
pub(crate) fn blend_row(target: &mut [u8], paint: &Paint) {
    for dst in target.chunks_exact_mut(paint.bytes_per_pixel()) {
        composite_pixel(dst, paint, paint.opa);
    }
}

/// Blend with `Cs * opa * am + Cb * (1 - opa * am)`, `am` being the mask value of the pixel.
pub(crate) fn blend_row_masked(target: &mut [u8], paint: &Paint, mask: &[u8]) {
    debug_assert!(mask.len() * paint.bytes_per_pixel() >= target.len());

    for (dst, am) in target.chunks_exact_mut(paint.bytes_per_pixel()).zip(mask) {
        composite_pixel(dst, paint, effective_opa(paint.opa, *am));
    }
}
