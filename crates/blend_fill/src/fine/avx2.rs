//! AVX2 row kernels.
//!
//! All loads and stores are unaligned, so rows may start at any byte offset. The tail of a
//! row that doesn't fill a whole vector is handled by the scalar kernels, which share the
//! same arithmetic.

use crate::fine::scalar;
use crate::paint::Paint;
use crate::util::avx2::{div_255, div_255_x8, splat_x8};
use std::arch::x86_64::*;

/// Bytes per 256-bit vector.
const LANE_BYTES: usize = 32;

/// SAFETY: The CPU needs to support the target feature `avx2`.
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn fill_argb8888(target: &mut [u8], paint: &Paint) {
    let cs = _mm256_set1_epi32(i32::from_le_bytes(paint.encoded.raw()));
    let mut chunks = target.chunks_exact_mut(LANE_BYTES);

    for cb in &mut chunks {
        _mm256_storeu_si256(cb.as_mut_ptr() as *mut __m256i, cs);
    }

    scalar::fill_row(chunks.into_remainder(), paint);
}

/// SAFETY: The CPU needs to support the target feature `avx2`.
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn fill_rgb565(target: &mut [u8], paint: &Paint) {
    let [lo, hi, ..] = paint.encoded.raw();
    let cs = _mm256_set1_epi16(i16::from_le_bytes([lo, hi]));
    let mut chunks = target.chunks_exact_mut(LANE_BYTES);

    for cb in &mut chunks {
        _mm256_storeu_si256(cb.as_mut_ptr() as *mut __m256i, cs);
    }

    scalar::fill_row(chunks.into_remainder(), paint);
}

/// SAFETY: The CPU needs to support the target feature `avx2`.
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn fill_rgb888(target: &mut [u8], paint: &Paint) {
    // 16 pixels of 3 bytes line up with three 128-bit stores.
    let mut pattern = [0u8; 48];
    for px in pattern.chunks_exact_mut(3) {
        px.copy_from_slice(paint.encoded.as_bytes());
    }

    let p0 = _mm_loadu_si128(pattern.as_ptr() as *const __m128i);
    let p1 = _mm_loadu_si128(pattern.as_ptr().add(16) as *const __m128i);
    let p2 = _mm_loadu_si128(pattern.as_ptr().add(32) as *const __m128i);
    let mut chunks = target.chunks_exact_mut(pattern.len());

    for cb in &mut chunks {
        let ptr = cb.as_mut_ptr();
        _mm_storeu_si128(ptr as *mut __m128i, p0);
        _mm_storeu_si128(ptr.add(16) as *mut __m128i, p1);
        _mm_storeu_si128(ptr.add(32) as *mut __m128i, p2);
    }

    scalar::fill_row(chunks.into_remainder(), paint);
}

/// Blend with `Cs * opa + Cb * (1 - opa)`, 8 pixels at a time.
///
/// SAFETY: The CPU needs to support the target feature `avx2`.
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn blend_argb8888(target: &mut [u8], paint: &Paint) {
    let opa = _mm256_set1_epi16(paint.opa as i16);
    let inv_opa = _mm256_set1_epi16(255 - paint.opa as i16);
    // Cs * opa is the same for every pixel.
    let cs_opa = _mm256_mullo_epi16(splat_x8(&paint.encoded.raw()), opa);
    let mut chunks = target.chunks_exact_mut(LANE_BYTES);

    for cb in &mut chunks {
        let cb_vals = _mm256_loadu_si256(cb.as_ptr() as *const __m256i);
        let lo = _mm256_cvtepu8_epi16(_mm256_extracti128_si256::<0>(cb_vals));
        let hi = _mm256_cvtepu8_epi16(_mm256_extracti128_si256::<1>(cb_vals));

        let res_lo = div_255(_mm256_add_epi16(cs_opa, _mm256_mullo_epi16(lo, inv_opa)));
        let res_hi = div_255(_mm256_add_epi16(cs_opa, _mm256_mullo_epi16(hi, inv_opa)));
        let packed = _mm256_packus_epi16(res_lo, res_hi);
        // `packus` interleaves the 128-bit lanes, restore pixel order.
        let res = _mm256_permute4x64_epi64::<0b11011000>(packed);

        _mm256_storeu_si256(cb.as_mut_ptr() as *mut __m256i, res);
    }

    scalar::blend_row(chunks.into_remainder(), paint);
}

/// Blend with `Cs * e + Cb * (1 - e)` where `e = opa * am`, 8 pixels at a time.
///
/// SAFETY: The CPU needs to support the target feature `avx2`.
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn blend_argb8888_masked(target: &mut [u8], paint: &Paint, mask: &[u8]) {
    // Broadcast the opacity of pixel `i` to its 4 channel bytes.
    let spread_lo = _mm_set_epi8(3, 3, 3, 3, 2, 2, 2, 2, 1, 1, 1, 1, 0, 0, 0, 0);
    let spread_hi = _mm_set_epi8(7, 7, 7, 7, 6, 6, 6, 6, 5, 5, 5, 5, 4, 4, 4, 4);
    let opa = _mm_set1_epi16(paint.opa as i16);
    let full = _mm256_set1_epi16(255);
    let cs = splat_x8(&paint.encoded.raw());

    let mut chunks = target.chunks_exact_mut(LANE_BYTES);
    let mut masks = mask.chunks_exact(LANE_BYTES / 4);

    for (cb, am) in (&mut chunks).zip(&mut masks) {
        let am = _mm_cvtepu8_epi16(_mm_loadl_epi64(am.as_ptr() as *const __m128i));
        let e = div_255_x8(_mm_mullo_epi16(am, opa));
        let e = _mm_packus_epi16(e, e);
        let e_lo = _mm256_cvtepu8_epi16(_mm_shuffle_epi8(e, spread_lo));
        let e_hi = _mm256_cvtepu8_epi16(_mm_shuffle_epi8(e, spread_hi));

        let cb_vals = _mm256_loadu_si256(cb.as_ptr() as *const __m256i);
        let lo = _mm256_cvtepu8_epi16(_mm256_extracti128_si256::<0>(cb_vals));
        let hi = _mm256_cvtepu8_epi16(_mm256_extracti128_si256::<1>(cb_vals));

        let res_lo = div_255(_mm256_add_epi16(
            _mm256_mullo_epi16(cs, e_lo),
            _mm256_mullo_epi16(lo, _mm256_sub_epi16(full, e_lo)),
        ));
        let res_hi = div_255(_mm256_add_epi16(
            _mm256_mullo_epi16(cs, e_hi),
            _mm256_mullo_epi16(hi, _mm256_sub_epi16(full, e_hi)),
        ));
        let packed = _mm256_packus_epi16(res_lo, res_hi);
        let res = _mm256_permute4x64_epi64::<0b11011000>(packed);

        _mm256_storeu_si256(cb.as_mut_ptr() as *mut __m256i, res);
    }

    scalar::blend_row_masked(chunks.into_remainder(), paint, masks.remainder());
}
