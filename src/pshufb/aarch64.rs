// Copyright 2026 simdprune Authors. Licensed under MIT or Apache-2.0.

//! AArch64 implementation of the byte-shuffle pruning.
//!
//! `tbl` yields zero for any index of 16 or more, a superset of the x86
//! high-bit rule, so the same tables work unchanged.

use std::arch::aarch64::*;
use std::arch::is_aarch64_feature_detected;
use std::ops::BitOr;

const IOTA: [u8; 16] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];

#[repr(transparent)]
#[derive(Copy, Clone, Debug)]
pub struct Simd(uint8x16_t);

impl super::SimdExt for Simd {
    fn is_supported() -> bool {
        is_aarch64_feature_detected!("neon")
    }

    #[inline]
    #[target_feature(enable = "neon")]
    unsafe fn load(bytes: &[u8; 16]) -> Self {
        Self(vld1q_u8(bytes.as_ptr()))
    }

    #[inline]
    #[target_feature(enable = "neon")]
    unsafe fn load_low(bytes: &[u8; 8]) -> Self {
        Self(vcombine_u8(vld1_u8(bytes.as_ptr()), vdup_n_u8(0)))
    }

    #[inline]
    #[target_feature(enable = "neon")]
    unsafe fn shuffle(self, control: Self) -> Self {
        Self(vqtbl1q_u8(self.0, control.0))
    }

    #[inline]
    #[target_feature(enable = "neon")]
    unsafe fn add_bytes(self, n: u8) -> Self {
        Self(vaddq_u8(self.0, vdupq_n_u8(n)))
    }

    #[inline]
    #[target_feature(enable = "neon")]
    unsafe fn shift_left_bytes(self, count: usize) -> Self {
        // indices below `count` wrap past 15 and read as zero
        let idx = vsubq_u8(vld1q_u8(IOTA.as_ptr()), vdupq_n_u8(count as u8));
        Self(vqtbl1q_u8(self.0, idx))
    }

    #[inline]
    #[target_feature(enable = "neon")]
    unsafe fn store(self) -> [u8; 16] {
        let mut out = [0u8; 16];
        vst1q_u8(out.as_mut_ptr(), self.0);
        out
    }
}

impl BitOr for Simd {
    type Output = Self;

    fn bitor(self, other: Self) -> Self {
        Self(unsafe { vorrq_u8(self.0, other.0) })
    }
}
