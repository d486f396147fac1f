use crate::fine::scalar;
use crate::paint::Paint;
use crate::util::neon::div_255;
use crate::util::scalar::splat_x4;
use std::arch::aarch64::*;

/// Bytes per 128-bit vector.
const LANE_BYTES: usize = 16;

/// SAFETY: The CPU needs to support the target feature `neon`.
pub(crate) unsafe fn fill_argb8888(target: &mut [u8], paint: &Paint) {
    let cs = vreinterpretq_u8_u32(vdupq_n_u32(u32::from_le_bytes(paint.encoded.raw())));
    let mut chunks = target.chunks_exact_mut(LANE_BYTES);

    for cb in &mut chunks {
        vst1q_u8(cb.as_mut_ptr(), cs);
    }

    scalar::fill_row(chunks.into_remainder(), paint);
}

/// SAFETY: The CPU needs to support the target feature `neon`.
pub(crate) unsafe fn fill_rgb565(target: &mut [u8], paint: &Paint) {
    let [lo, hi, ..] = paint.encoded.raw();
    let cs = vreinterpretq_u8_u16(vdupq_n_u16(u16::from_le_bytes([lo, hi])));
    let mut chunks = target.chunks_exact_mut(LANE_BYTES);

    for cb in &mut chunks {
        vst1q_u8(cb.as_mut_ptr(), cs);
    }

    scalar::fill_row(chunks.into_remainder(), paint);
}

/// SAFETY: The CPU needs to support the target feature `neon`.
pub(crate) unsafe fn fill_rgb888(target: &mut [u8], paint: &Paint) {
    let [b, g, r, _] = paint.encoded.raw();
    // `vst3q` interleaves the three planes into B, G, R triples.
    let planes = uint8x16x3_t(vdupq_n_u8(b), vdupq_n_u8(g), vdupq_n_u8(r));
    let mut chunks = target.chunks_exact_mut(3 * LANE_BYTES);

    for cb in &mut chunks {
        vst3q_u8(cb.as_mut_ptr(), planes);
    }

    scalar::fill_row(chunks.into_remainder(), paint);
}

/// Blend with `Cs * opa + Cb * (1 - opa)`, 4 pixels at a time.
///
/// SAFETY: The CPU needs to support the target feature `neon`.
pub(crate) unsafe fn blend_argb8888(target: &mut [u8], paint: &Paint) {
    let cs = vld1q_u8(splat_x4(&paint.encoded.raw()).as_ptr());
    let opa = vdupq_n_u8(paint.opa);
    let inv_opa = vdupq_n_u8(255 - paint.opa);
    // Cs * opa is the same for every pixel.
    let cs_opa_low = vmull_u8(vget_low_u8(cs), vget_low_u8(opa));
    let cs_opa_high = vmull_high_u8(cs, opa);
    let mut chunks = target.chunks_exact_mut(LANE_BYTES);

    for cb in &mut chunks {
        let cb_vals = vld1q_u8(cb.as_ptr());

        let low = div_255(vmlal_u8(cs_opa_low, vget_low_u8(cb_vals), vget_low_u8(inv_opa)));
        let high = div_255(vmlal_high_u8(cs_opa_high, cb_vals, inv_opa));
        let res = vcombine_u8(vmovn_u16(low), vmovn_u16(high));

        vst1q_u8(cb.as_mut_ptr(), res);
    }

    scalar::blend_row(chunks.into_remainder(), paint);
}

/// Blend with `Cs * e + Cb * (1 - e)` where `e = opa * am`, 4 pixels at a time.
///
/// SAFETY: The CPU needs to support the target feature `neon`.
pub(crate) unsafe fn blend_argb8888_masked(target: &mut [u8], paint: &Paint, mask: &[u8]) {
    // Broadcast the opacity of pixel `i` to its 4 channel bytes.
    let spread = vld1q_u8([0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3].as_ptr());
    let cs = vld1q_u8(splat_x4(&paint.encoded.raw()).as_ptr());
    let opa = vdup_n_u8(paint.opa);
    let full = vdupq_n_u8(255);

    let mut chunks = target.chunks_exact_mut(LANE_BYTES);
    let mut masks = mask.chunks_exact(LANE_BYTES / 4);

    for (cb, am) in (&mut chunks).zip(&mut masks) {
        let am = vreinterpret_u8_u32(vdup_n_u32(u32::from_le_bytes([am[0], am[1], am[2], am[3]])));
        let e = vmovn_u16(div_255(vmull_u8(am, opa)));
        let e = vqtbl1q_u8(vcombine_u8(e, e), spread);
        let inv_e = vsubq_u8(full, e);

        let cb_vals = vld1q_u8(cb.as_ptr());

        let low = div_255(vmlal_u8(
            vmull_u8(vget_low_u8(cs), vget_low_u8(e)),
            vget_low_u8(cb_vals),
            vget_low_u8(inv_e),
        ));
        let high = div_255(vmlal_high_u8(vmull_high_u8(cs, e), cb_vals, inv_e));
        let res = vcombine_u8(vmovn_u16(low), vmovn_u16(high));

        vst1q_u8(cb.as_mut_ptr(), res);
    }

    scalar::blend_row_masked(chunks.into_remainder(), paint, masks.remainder());
}
