// Copyright 2026 simdprune Authors. Licensed under MIT or Apache-2.0.

//! `simdprune`
//! ===========
//!
//! Removes selected 16-bit lanes from a 128-bit vector with a single byte
//! shuffle, driven by a precomputed 4 kB table. 32-bit lanes and bytes are
//! handled the same way with smaller tables.
//!
//! ## Usage
//!
//! ```
//! use simdprune::Pruner;
//!
//! let p = Pruner::new();
//! // bits set in the mask mark lanes for removal
//! let out = p.prune([0, 1, 2, 3, 4, 5, 6, 7], 0b1010_1010);
//! assert_eq!(out, [0, 2, 4, 6, 6, 6, 6, 6]);
//! ```
//!
//! Kept lanes are packed to the front in order and the remainder repeats the
//! last kept lane. Removing every lane yields zeros.

#[cfg(any(
    target_arch = "x86",
    target_arch = "x86_64",
    target_arch = "aarch64",
    feature = "fake-simd"
))]
mod pshufb;
pub mod table;

pub use table::kept_lanes;

type Prune16Fn = fn([u16; 8], u8) -> [u16; 8];
type Prune32Fn = fn([u32; 4], u8) -> [u32; 4];
type Prune8Fn = fn([u8; 16], u16) -> [u8; 16];

/// Prunes lanes of a 128-bit vector using the fastest implementation
/// available.
#[derive(Clone, Copy)]
pub struct Pruner {
    epi16: Prune16Fn,
    epi32: Prune32Fn,
    epi8: Prune8Fn,
}

impl Pruner {
    /// Creates a new `Pruner`.
    ///
    /// It will perform runtime CPU feature detection to determine which
    /// algorithm to choose.
    pub fn new() -> Self {
        #[cfg(any(
            target_arch = "x86",
            target_arch = "x86_64",
            target_arch = "aarch64",
            feature = "fake-simd"
        ))]
        return pshufb::get_pruner();
        #[cfg(not(any(
            target_arch = "x86",
            target_arch = "x86_64",
            target_arch = "aarch64",
            feature = "fake-simd"
        )))]
        return Self::new_table();
    }

    /// Creates a new `Pruner` using the portable table lookup.
    pub fn new_table() -> Self {
        Self {
            epi16: table::prune,
            epi32: table::prune_epi32,
            epi8: table::thinprune_epi8,
        }
    }

    /// Removes every 16-bit lane of `values` whose bit in `mask` is set.
    pub fn prune(&self, values: [u16; 8], mask: u8) -> [u16; 8] {
        (self.epi16)(values, mask)
    }

    /// Removes every 32-bit lane of `values` whose bit in `mask` is set.
    ///
    /// Only the low four bits of `mask` are used.
    pub fn prune_epi32(&self, values: [u32; 4], mask: u8) -> [u32; 4] {
        (self.epi32)(values, mask)
    }

    /// Removes every byte of `values` whose bit in `mask` is set.
    ///
    /// The kept bytes come first, in order. The bytes after them all hold
    /// `values[8]` rather than the last kept byte.
    pub fn thinprune_epi8(&self, values: [u8; 16], mask: u16) -> [u8; 16] {
        (self.epi8)(values, mask)
    }
}

impl Default for Pruner {
    fn default() -> Self {
        Self::new()
    }
}

/// Shorthand for `Pruner::new().prune(values, mask)`.
///
/// Repeated callers should keep a [`Pruner`] around instead, as this repeats
/// the CPU feature detection on every call.
pub fn prune_epi16(values: [u16; 8], mask: u8) -> [u16; 8] {
    Pruner::new().prune(values, mask)
}

/// Shorthand for `Pruner::new().prune_epi32(values, mask)`.
pub fn prune_epi32(values: [u32; 4], mask: u8) -> [u32; 4] {
    Pruner::new().prune_epi32(values, mask)
}

/// Shorthand for `Pruner::new().thinprune_epi8(values, mask)`.
pub fn thinprune_epi8(values: [u8; 16], mask: u16) -> [u8; 16] {
    Pruner::new().thinprune_epi8(values, mask)
}
