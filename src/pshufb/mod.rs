// Copyright 2026 simdprune Authors. Licensed under MIT or Apache-2.0.

//! Byte-shuffle based pruning.
//!
//! A row of one of the [`table`](super::table) masks is fed as the control
//! vector of a single byte shuffle (`pshufb` on x86, `tbl` on AArch64). Both
//! instructions write a zero byte for indices with the high bit set, which
//! is what the all-removed rows rely on.

#[cfg(not(feature = "fake-simd"))]
#[cfg_attr(any(target_arch = "x86", target_arch = "x86_64"), path = "x86.rs")]
#[cfg_attr(all(target_arch = "aarch64"), path = "aarch64.rs")]
mod arch;

#[cfg(feature = "fake-simd")]
mod arch;

use self::arch::Simd;
use super::{table, Pruner};
use std::{fmt::Debug, ops::BitOr};

/// This trait must be implemented on `self::arch::Simd` to provide the
/// platform-specific SIMD implementations.
trait SimdExt: Copy + Debug + BitOr<Output = Self> {
    /// Returns whether a SIMD byte shuffle is supported.
    fn is_supported() -> bool;

    /// Loads 16 bytes from memory.
    unsafe fn load(bytes: &[u8; 16]) -> Self;

    /// Loads 8 bytes into the low half, zeroing the high half.
    unsafe fn load_low(bytes: &[u8; 8]) -> Self;

    /// Performs a byte shuffle of `self` controlled by `control`.
    ///
    /// Byte `i` of the result is `self[control[i] & 0x0f]`, or zero when
    /// `control[i] & 0x80` is set.
    unsafe fn shuffle(self, control: Self) -> Self;

    /// Adds `n` to every byte, wrapping.
    unsafe fn add_bytes(self, n: u8) -> Self;

    /// Moves every byte `count` positions up, shifting in zeros.
    /// `count` is at most 8.
    unsafe fn shift_left_bytes(self, count: usize) -> Self;

    /// Stores the 16 bytes back into memory.
    unsafe fn store(self) -> [u8; 16];
}

impl PartialEq for Simd {
    fn eq(&self, other: &Self) -> bool {
        unsafe { self.store() == other.store() }
    }
}

impl Eq for Simd {}

pub fn get_pruner() -> Pruner {
    if Simd::is_supported() {
        Pruner {
            epi16: prune,
            epi32: prune_epi32,
            epi8: thinprune_epi8,
        }
    } else {
        Pruner::new_table()
    }
}

fn prune(values: [u16; 8], mask: u8) -> [u16; 8] {
    unsafe { prune_simd(values, mask) }
}

fn prune_epi32(values: [u32; 4], mask: u8) -> [u32; 4] {
    unsafe { prune_epi32_simd(values, mask) }
}

fn thinprune_epi8(values: [u8; 16], mask: u16) -> [u8; 16] {
    unsafe { thinprune_simd(values, mask) }
}

#[cfg_attr(
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature(enable = "sse2", enable = "ssse3")
)]
#[cfg_attr(all(target_arch = "aarch64"), target_feature(enable = "neon"))]
unsafe fn prune_simd(values: [u16; 8], mask: u8) -> [u16; 8] {
    let x = Simd::load(&table::lanes_to_bytes(values));
    let control = Simd::load(&table::MASK128_EPI16[usize::from(mask)]);
    table::bytes_to_lanes(x.shuffle(control).store())
}

#[cfg_attr(
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature(enable = "sse2", enable = "ssse3")
)]
#[cfg_attr(all(target_arch = "aarch64"), target_feature(enable = "neon"))]
unsafe fn prune_epi32_simd(values: [u32; 4], mask: u8) -> [u32; 4] {
    let x = Simd::load(&table::words_to_bytes(values));
    let control = Simd::load(&table::MASK128_EPI32[usize::from(mask & 0x0f)]);
    table::bytes_to_words(x.shuffle(control).store())
}

#[cfg_attr(
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature(enable = "sse2", enable = "ssse3")
)]
#[cfg_attr(all(target_arch = "aarch64"), target_feature(enable = "neon"))]
unsafe fn thinprune_simd(values: [u8; 16], mask: u16) -> [u8; 16] {
    let [lo, hi] = mask.to_le_bytes();
    let pop = 8 - lo.count_ones() as usize;
    let m1 = Simd::load_low(&table::THINTABLE_EPI8[usize::from(lo)]);
    let m2 = Simd::load_low(&table::THINTABLE_EPI8[usize::from(hi)])
        .add_bytes(8)
        .shift_left_bytes(pop);
    Simd::load(&values).shuffle(m1 | m2).store()
}

#[test]
fn test_size_and_alignment() {
    assert_eq!(std::mem::size_of::<Simd>(), 16);
    assert_eq!(std::mem::align_of::<Simd>(), 16);
}

#[test]
fn test_load_store() {
    let bytes = [
        0x3d, 0x72, 0xe9, 0x2a, 0x96, 0xc7, 0x4c, 0x63, 0xe4, 0x50, 0x87, 0xf9, 0xb0, 0x31, 0x0d,
        0x47,
    ];
    unsafe {
        let x = Simd::load(&bytes);
        assert_eq!(x.store(), bytes);
        assert_eq!(x, Simd::load(&bytes));
        assert_ne!(x, Simd::load(&[0; 16]));
        assert_eq!(
            Simd::load_low(&[1, 2, 3, 4, 5, 6, 7, 8]).store(),
            [1, 2, 3, 4, 5, 6, 7, 8, 0, 0, 0, 0, 0, 0, 0, 0]
        );
    }
}

#[test]
fn test_shuffle() {
    let bytes: [u8; 16] = [
        0xa0, 0xa1, 0xa2, 0xa3, 0xa4, 0xa5, 0xa6, 0xa7, 0xa8, 0xa9, 0xaa, 0xab, 0xac, 0xad, 0xae,
        0xaf,
    ];
    let control: [u8; 16] = [15, 0, 0x80, 7, 0x8f, 1, 2, 3, 0xff, 14, 9, 9, 0, 0, 4, 5];
    unsafe {
        let out = Simd::load(&bytes).shuffle(Simd::load(&control)).store();
        assert_eq!(
            out,
            [
                0xaf, 0xa0, 0x00, 0xa7, 0x00, 0xa1, 0xa2, 0xa3, 0x00, 0xae, 0xa9, 0xa9, 0xa0, 0xa0,
                0xa4, 0xa5,
            ]
        );
    }
}

#[test]
fn test_add_or() {
    unsafe {
        let x = Simd::load(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 0xfc]);
        assert_eq!(
            x.add_bytes(8).store(),
            [8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 4]
        );
        let y = Simd::load(&[0x10; 16]);
        assert_eq!(
            (x | y).store(),
            [
                0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17, 0x18, 0x19, 0x1a, 0x1b, 0x1c, 0x1d,
                0x1e, 0xfc,
            ]
        );
    }
}

#[test]
fn test_shift_left_bytes() {
    let bytes: [u8; 16] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16];
    unsafe {
        let x = Simd::load(&bytes);
        assert_eq!(x.shift_left_bytes(0).store(), bytes);
        assert_eq!(
            x.shift_left_bytes(3).store(),
            [0, 0, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13]
        );
        assert_eq!(
            x.shift_left_bytes(8).store(),
            [0, 0, 0, 0, 0, 0, 0, 0, 1, 2, 3, 4, 5, 6, 7, 8]
        );
    }
}

#[test]
fn test_prune_simd_all_removed() {
    if Simd::is_supported() {
        assert_eq!(prune([9, 8, 7, 6, 5, 4, 3, 2], 0xff), [0; 8]);
        assert_eq!(prune_epi32([9, 8, 7, 6], 0x0f), [0; 4]);
        assert_eq!(thinprune_epi8([7; 16], 0xffff), [7; 16]);
    }
}
