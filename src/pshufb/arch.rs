// Copyright 2026 simdprune Authors. Licensed under MIT or Apache-2.0.

//! A platform-agnostic implementation of the byte-shuffle pruning.
//!
//! This is used to compare against the platform-specific implementations.
//! Enable the `fake-simd` feature to use this. It is much slower than a real
//! SIMD shuffle and should never be used in production code.

use std::ops::BitOr;

#[repr(align(16))]
#[derive(Copy, Clone, Debug)]
pub struct Simd([u8; 16]);

impl super::SimdExt for Simd {
    fn is_supported() -> bool {
        cfg!(feature = "fake-simd")
    }

    unsafe fn load(bytes: &[u8; 16]) -> Self {
        Self(*bytes)
    }

    unsafe fn load_low(bytes: &[u8; 8]) -> Self {
        let mut out = [0u8; 16];
        out[..8].copy_from_slice(bytes);
        Self(out)
    }

    unsafe fn shuffle(self, control: Self) -> Self {
        let mut out = [0u8; 16];
        for (o, &c) in out.iter_mut().zip(&control.0) {
            if c & 0x80 == 0 {
                *o = self.0[usize::from(c & 0x0f)];
            }
        }
        Self(out)
    }

    unsafe fn add_bytes(self, n: u8) -> Self {
        Self(self.0.map(|b| b.wrapping_add(n)))
    }

    unsafe fn shift_left_bytes(self, count: usize) -> Self {
        let mut out = [0u8; 16];
        out[count..].copy_from_slice(&self.0[..16 - count]);
        Self(out)
    }

    unsafe fn store(self) -> [u8; 16] {
        self.0
    }
}

impl BitOr for Simd {
    type Output = Self;

    fn bitor(self, other: Self) -> Self {
        let mut out = self.0;
        for (o, b) in out.iter_mut().zip(other.0) {
            *o |= b;
        }
        Self(out)
    }
}
