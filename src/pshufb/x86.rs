// Copyright 2026 simdprune Authors. Licensed under MIT or Apache-2.0.

//! x86/x86_64 implementation of the byte-shuffle pruning.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;
use std::ops::BitOr;

#[repr(transparent)]
#[derive(Copy, Clone, Debug)]
pub struct Simd(__m128i);

impl super::SimdExt for Simd {
    fn is_supported() -> bool {
        is_x86_feature_detected!("ssse3") // _mm_shuffle_epi8
            && is_x86_feature_detected!("sse2") // (all other _mm_*)
    }

    #[inline]
    #[target_feature(enable = "sse2")]
    unsafe fn load(bytes: &[u8; 16]) -> Self {
        Self(_mm_loadu_si128(bytes.as_ptr() as *const __m128i))
    }

    #[inline]
    #[target_feature(enable = "sse2")]
    unsafe fn load_low(bytes: &[u8; 8]) -> Self {
        Self(_mm_loadl_epi64(bytes.as_ptr() as *const __m128i))
    }

    #[inline]
    #[target_feature(enable = "ssse3")]
    unsafe fn shuffle(self, control: Self) -> Self {
        Self(_mm_shuffle_epi8(self.0, control.0))
    }

    #[inline]
    #[target_feature(enable = "sse2")]
    unsafe fn add_bytes(self, n: u8) -> Self {
        Self(_mm_add_epi8(self.0, _mm_set1_epi8(n as i8)))
    }

    #[inline]
    #[target_feature(enable = "sse2")]
    unsafe fn shift_left_bytes(self, count: usize) -> Self {
        // _mm_slli_si128 wants an immediate, so shift the 64-bit halves and
        // carry the low half into the high one.
        let bits = (count * 8) as i32;
        let p1 = _mm_sll_epi64(self.0, _mm_cvtsi32_si128(bits));
        let p2 = _mm_srl_epi64(
            _mm_unpacklo_epi64(_mm_setzero_si128(), self.0),
            _mm_cvtsi32_si128(64 - bits),
        );
        Self(_mm_or_si128(p1, p2))
    }

    #[inline]
    #[target_feature(enable = "sse2")]
    unsafe fn store(self) -> [u8; 16] {
        let mut out = [0u8; 16];
        _mm_storeu_si128(out.as_mut_ptr() as *mut __m128i, self.0);
        out
    }
}

impl BitOr for Simd {
    type Output = Self;

    fn bitor(self, other: Self) -> Self {
        Self(unsafe { _mm_or_si128(self.0, other.0) })
    }
}
