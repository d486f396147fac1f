pub(crate) mod scalar {
    /// Truncating division by 255.
    ///
    /// Exact (equal to `val / 255`) for every `val <= 255 * 255`, which covers the product
    /// or blended sum of two 8-bit values. The SIMD variants use the same identity, so
    /// all kernels round identically.
    #[inline(always)]
    pub(crate) const fn div_255(val: u16) -> u16 {
        (val + 1 + (val >> 8)) >> 8
    }

    #[inline(always)]
    #[cfg(feature = "simd")]
    pub(crate) fn splat_x4(val: &[u8; 4]) -> [u8; 16] {
        let mut buf = [0; 16];

        for i in 0..4 {
            buf[i * 4..((i + 1) * 4)].copy_from_slice(val);
        }

        buf
    }

}

#[cfg(all(target_arch = "x86_64", feature = "simd"))]
pub(crate) mod avx2 {
    use crate::util::scalar::splat_x4;
    use std::arch::x86_64::{
        __m128i, __m256i, _mm256_add_epi16, _mm256_cvtepu8_epi16, _mm256_set1_epi16,
        _mm256_srli_epi16, _mm_add_epi16, _mm_loadu_si128, _mm_set1_epi16, _mm_srli_epi16,
    };

    /// SAFETY: The CPU needs to support the target feature `avx2`.
    #[target_feature(enable = "avx2")]
    pub(crate) unsafe fn div_255(val: __m256i) -> __m256i {
        _mm256_srli_epi16::<8>(_mm256_add_epi16(
            _mm256_add_epi16(val, _mm256_set1_epi16(1)),
            _mm256_srli_epi16::<8>(val),
        ))
    }

    /// Same as [`div_255`], for 8 lanes.
    ///
    /// SAFETY: The CPU needs to support the target feature `avx2`.
    #[target_feature(enable = "avx2")]
    pub(crate) unsafe fn div_255_x8(val: __m128i) -> __m128i {
        _mm_srli_epi16::<8>(_mm_add_epi16(
            _mm_add_epi16(val, _mm_set1_epi16(1)),
            _mm_srli_epi16::<8>(val),
        ))
    }

    /// Splat one 4-byte pixel into 16x u16 (4 pixels).
    ///
    /// SAFETY: The CPU needs to support the target feature `avx2`.
    #[target_feature(enable = "avx2")]
    pub(crate) unsafe fn splat_x8(val: &[u8; 4]) -> __m256i {
        let cs = splat_x4(val);

        _mm256_cvtepu8_epi16(_mm_loadu_si128(cs.as_ptr() as *const __m128i))
    }
}

#[cfg(all(target_arch = "aarch64", feature = "simd"))]
pub(crate) mod neon {
    use std::arch::aarch64::*;

    /// SAFETY: The CPU needs to support the target feature `neon`.
    #[inline]
    pub(crate) unsafe fn div_255(val: uint16x8_t) -> uint16x8_t {
        let val_shifted = vshrq_n_u16::<8>(val);
        let one = vdupq_n_u16(1);
        let added = vaddq_u16(val, one);
        let added = vaddq_u16(added, val_shifted);

        vshrq_n_u16::<8>(added)
    }
}
