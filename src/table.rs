// Copyright 2026 simdprune Authors. Licensed under MIT or Apache-2.0.

//! Shuffle-control tables for pruning lanes of a 128-bit vector.
//!
//! Row `mask` of [`MASK128_EPI16`] is a byte shuffle mask which moves every
//! 16-bit lane whose bit in `mask` is clear to the front of the vector, in
//! ascending lane order. The tail is filled with the last kept lane. When
//! every lane is removed the row is all `0xff`, which makes a byte shuffle
//! write zeros. [`MASK128_EPI32`] is the same for four 32-bit lanes.
//!
//! [`THINTABLE_EPI8`] only covers eight bytes. Two rows are combined at run
//! time to prune sixteen bytes, see [`thinprune_epi8`].

use std::io::{self, Write};

/// Number of 16-bit lanes in a 128-bit vector.
pub const LANES: usize = 8;

/// Filler used when no lane survives. The high bit zeroes the output byte.
pub const EMPTY: u8 = 0xff;

/// Packs the bytes of every kept `WIDTH`-byte lane to the front, then
/// repeats the last kept lane.
const fn pack_row<const WIDTH: usize>(mask: u8) -> [u8; 16] {
    let mut row = [0u8; 16];
    let mut len = 0;
    let mut last_kept: Option<usize> = None;

    let mut lane = 0;
    while lane < 16 / WIDTH {
        if mask >> lane & 1 == 0 {
            let mut b = 0;
            while b < WIDTH {
                row[len] = (lane * WIDTH + b) as u8;
                len += 1;
                b += 1;
            }
            last_kept = Some(lane);
        }
        lane += 1;
    }

    while len < row.len() {
        match last_kept {
            Some(lane) => {
                let mut b = 0;
                while b < WIDTH {
                    row[len] = (lane * WIDTH + b) as u8;
                    len += 1;
                    b += 1;
                }
            }
            None => {
                row[len] = EMPTY;
                len += 1;
            }
        }
    }
    row
}

/// Builds the 16-bit shuffle row for `mask`.
pub const fn shuffle_row(mask: u8) -> [u8; 16] {
    pack_row::<2>(mask)
}

/// Builds the 8-byte thin row for `mask`: kept byte indices first, zeros
/// after.
pub const fn thin_row(mask: u8) -> [u8; 8] {
    let mut row = [0u8; 8];
    let mut len = 0;
    let mut i = 0;
    while i < 8 {
        if mask >> i & 1 == 0 {
            row[len] = i;
            len += 1;
        }
        i += 1;
    }
    row
}

const fn build_table() -> [[u8; 16]; 256] {
    let mut table = [[0u8; 16]; 256];
    let mut mask = 0;
    while mask < table.len() {
        table[mask] = shuffle_row(mask as u8);
        mask += 1;
    }
    table
}

const fn build_epi32() -> [[u8; 16]; 16] {
    let mut table = [[0u8; 16]; 16];
    let mut mask = 0;
    while mask < table.len() {
        table[mask] = pack_row::<4>(mask as u8);
        mask += 1;
    }
    table
}

const fn build_thin() -> [[u8; 8]; 256] {
    let mut table = [[0u8; 8]; 256];
    let mut mask = 0;
    while mask < table.len() {
        table[mask] = thin_row(mask as u8);
        mask += 1;
    }
    table
}

pub static MASK128_EPI16: [[u8; 16]; 256] = build_table();

pub static MASK128_EPI32: [[u8; 16]; 16] = build_epi32();

pub static THINTABLE_EPI8: [[u8; 8]; 256] = build_thin();

/// Number of lanes kept when pruning with `mask`.
#[inline]
pub fn kept_lanes(mask: u8) -> usize {
    LANES - mask.count_ones() as usize
}

/// Writes every row of [`MASK128_EPI16`] as a line of `0x..,` literals.
pub fn write_rows<W: Write>(out: &mut W) -> io::Result<()> {
    for row in &MASK128_EPI16 {
        for byte in row {
            write!(out, "{:#x},", byte)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Software byte shuffle.
///
/// An index with the high bit set produces a zero byte, otherwise the low
/// four bits select the source byte.
pub(crate) fn shuffle_bytes(bytes: [u8; 16], control: &[u8; 16]) -> [u8; 16] {
    let mut out = [0u8; 16];
    for (o, &i) in out.iter_mut().zip(control) {
        if i & 0x80 == 0 {
            *o = bytes[usize::from(i & 0x0f)];
        }
    }
    out
}

/// Portable pruning of 16-bit lanes through the table.
pub fn prune(values: [u16; 8], mask: u8) -> [u16; 8] {
    let out = shuffle_bytes(lanes_to_bytes(values), &MASK128_EPI16[usize::from(mask)]);
    bytes_to_lanes(out)
}

/// Portable pruning of 32-bit lanes. Only the low four bits of `mask` count.
pub fn prune_epi32(values: [u32; 4], mask: u8) -> [u32; 4] {
    let out = shuffle_bytes(
        words_to_bytes(values),
        &MASK128_EPI32[usize::from(mask & 0x0f)],
    );
    bytes_to_words(out)
}

/// Shuffle control for [`thinprune_epi8`].
///
/// The high half's row is shifted up by one byte per byte kept in the low
/// half and OR'd in. Every byte not covered by a kept index selects byte 8.
pub(crate) fn thin_control(mask: u16) -> [u8; 16] {
    let [lo, hi] = mask.to_le_bytes();
    let pop = 8 - lo.count_ones() as usize;

    let mut high = [8u8; 16];
    for (h, &i) in high.iter_mut().zip(&THINTABLE_EPI8[usize::from(hi)]) {
        *h = i + 8;
    }

    let mut control = [0u8; 16];
    control[..8].copy_from_slice(&THINTABLE_EPI8[usize::from(lo)]);
    for (c, &h) in control[pop..].iter_mut().zip(&high) {
        *c |= h;
    }
    control
}

/// Portable pruning of bytes using the two-step thin table.
///
/// Bytes whose bit in `mask` is set are removed and the rest packed to the
/// front. Unlike the wide tables the tail is not padded with the last kept
/// byte; it repeats `values[8]`.
pub fn thinprune_epi8(values: [u8; 16], mask: u16) -> [u8; 16] {
    shuffle_bytes(values, &thin_control(mask))
}

/// Lays out eight lanes the way a 128-bit register holds them in memory.
pub(crate) fn lanes_to_bytes(values: [u16; 8]) -> [u8; 16] {
    let mut bytes = [0u8; 16];
    for (chunk, value) in bytes.chunks_exact_mut(2).zip(&values) {
        chunk.copy_from_slice(&value.to_le_bytes());
    }
    bytes
}

pub(crate) fn bytes_to_lanes(bytes: [u8; 16]) -> [u16; 8] {
    let mut values = [0u16; 8];
    for (value, chunk) in values.iter_mut().zip(bytes.chunks_exact(2)) {
        *value = u16::from_le_bytes([chunk[0], chunk[1]]);
    }
    values
}

pub(crate) fn words_to_bytes(values: [u32; 4]) -> [u8; 16] {
    let mut bytes = [0u8; 16];
    for (chunk, value) in bytes.chunks_exact_mut(4).zip(&values) {
        chunk.copy_from_slice(&value.to_le_bytes());
    }
    bytes
}

pub(crate) fn bytes_to_words(bytes: [u8; 16]) -> [u32; 4] {
    let mut values = [0u32; 4];
    for (value, chunk) in values.iter_mut().zip(bytes.chunks_exact(4)) {
        *value = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rendered() -> String {
        let mut buf = Vec::new();
        write_rows(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    /// Accepts `remaining` bytes, then fails every write.
    struct FailAfter {
        remaining: usize,
    }

    impl Write for FailAfter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.remaining == 0 {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
            }
            let n = buf.len().min(self.remaining);
            self.remaining -= n;
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_propagates() {
        for &limit in &[0, 1, 100, 4096] {
            let err = write_rows(&mut FailAfter { remaining: limit }).unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::BrokenPipe, "limit {}", limit);
        }
        let total = rendered().len();
        assert!(write_rows(&mut FailAfter { remaining: total }).is_ok());
        assert!(write_rows(&mut FailAfter { remaining: total - 1 }).is_err());
    }

    #[test]
    fn test_line_count_and_width() {
        let text = rendered();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 256);
        assert!(text.ends_with('\n'));
        for line in lines {
            let tokens: Vec<&str> = line.split_terminator(',').collect();
            assert_eq!(tokens.len(), 16, "line {:?}", line);
            assert!(line.ends_with(','));
            for token in tokens {
                let digits = token.strip_prefix("0x").unwrap();
                assert!(!digits.is_empty());
                assert!(digits.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
            }
        }
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(rendered(), rendered());
    }

    #[test]
    fn test_known_rows() {
        let text = rendered();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "0x0,0x1,0x2,0x3,0x4,0x5,0x6,0x7,0x8,0x9,0xa,0xb,0xc,0xd,0xe,0xf,"
        );
        assert_eq!(
            lines[1],
            "0x2,0x3,0x4,0x5,0x6,0x7,0x8,0x9,0xa,0xb,0xc,0xd,0xe,0xf,0xe,0xf,"
        );
        assert_eq!(lines[255], "0xff,".repeat(16));
        assert_eq!(
            lines[0b1010_1010],
            "0x0,0x1,0x4,0x5,0x8,0x9,0xc,0xd,0xc,0xd,0xc,0xd,0xc,0xd,0xc,0xd,"
        );
    }

    #[test]
    fn test_token_bound() {
        for (mask, row) in MASK128_EPI16.iter().enumerate() {
            for &b in row {
                if mask == 255 {
                    assert_eq!(b, EMPTY);
                } else {
                    assert!(b < 16, "mask {:#x} has {:#x}", mask, b);
                }
            }
        }
    }

    #[test]
    fn test_table_matches_rows() {
        for mask in 0..=255u8 {
            assert_eq!(MASK128_EPI16[usize::from(mask)], shuffle_row(mask));
        }
    }

    #[test]
    fn test_epi32_rows() {
        assert_eq!(MASK128_EPI32[0], shuffle_row(0));
        assert_eq!(
            MASK128_EPI32[0b1010],
            [0, 1, 2, 3, 8, 9, 10, 11, 8, 9, 10, 11, 8, 9, 10, 11]
        );
        assert_eq!(
            MASK128_EPI32[0b0111],
            [12, 13, 14, 15, 12, 13, 14, 15, 12, 13, 14, 15, 12, 13, 14, 15]
        );
        assert_eq!(MASK128_EPI32[0b1111], [EMPTY; 16]);
    }

    #[test]
    fn test_thin_rows() {
        assert_eq!(THINTABLE_EPI8[0], [0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(THINTABLE_EPI8[1], [1, 2, 3, 4, 5, 6, 7, 0]);
        assert_eq!(THINTABLE_EPI8[0b1010_1010], [0, 2, 4, 6, 0, 0, 0, 0]);
        assert_eq!(THINTABLE_EPI8[0xff], [0; 8]);
    }

    #[test]
    fn test_thin_control() {
        assert_eq!(
            thin_control(0),
            [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15]
        );
        assert_eq!(
            thin_control(0b1010_1010_1010_1010),
            [0, 2, 4, 6, 8, 10, 12, 14, 8, 8, 8, 8, 8, 8, 8, 8]
        );
        assert_eq!(thin_control(0xffff), [8; 16]);
    }

    #[test]
    fn test_prune_all_removed() {
        assert_eq!(prune([1, 2, 3, 4, 5, 6, 7, 8], 0xff), [0; 8]);
        assert_eq!(prune_epi32([1, 2, 3, 4], 0x0f), [0; 4]);
    }

    #[test]
    fn test_prune_every_other() {
        let x = [0, 1, 2, 3, 4, 5, 6, 7];
        assert_eq!(prune(x, 0b1010_1010), [0, 2, 4, 6, 6, 6, 6, 6]);
        assert_eq!(prune(x, 0), x);
        assert_eq!(prune_epi32([0, 1, 2, 3], 0b1010), [0, 2, 2, 2]);
        assert_eq!(prune_epi32([0, 1, 2, 3], 0b1111_1010), [0, 2, 2, 2]);
    }

    proptest! {
        #[test]
        fn kept_pairs_then_padding(mask in any::<u8>()) {
            let row = shuffle_row(mask);
            let kept = kept_lanes(mask);
            let lanes: Vec<u8> = (0..8u8).filter(|b| mask >> b & 1 == 0).collect();
            prop_assert_eq!(lanes.len(), kept);
            for (pair, &lane) in row.chunks_exact(2).zip(&lanes) {
                prop_assert_eq!(pair, [2 * lane, 2 * lane + 1]);
            }
            let tail = match lanes.last() {
                Some(&lane) => [2 * lane, 2 * lane + 1],
                None => [EMPTY, EMPTY],
            };
            for pair in row.chunks_exact(2).skip(kept) {
                prop_assert_eq!(pair, tail);
            }
        }

        #[test]
        fn prune_packs_kept_lanes(values in any::<[u16; 8]>(), mask in any::<u8>()) {
            let out = prune(values, mask);
            let kept: Vec<u16> = (0..8)
                .filter(|&b| mask >> b & 1 == 0)
                .map(|b| values[b])
                .collect();
            prop_assert_eq!(&out[..kept.len()], &kept[..]);
            let fill = kept.last().copied().unwrap_or(0);
            prop_assert!(out[kept.len()..].iter().all(|&v| v == fill));
        }

        #[test]
        fn prune_epi32_packs_kept_lanes(values in any::<[u32; 4]>(), mask in 0..16u8) {
            let out = prune_epi32(values, mask);
            let kept: Vec<u32> = (0..4)
                .filter(|&b| mask >> b & 1 == 0)
                .map(|b| values[b])
                .collect();
            prop_assert_eq!(&out[..kept.len()], &kept[..]);
            let fill = kept.last().copied().unwrap_or(0);
            prop_assert!(out[kept.len()..].iter().all(|&v| v == fill));
        }

        #[test]
        fn thinprune_packs_kept_bytes(values in any::<[u8; 16]>(), mask in any::<u16>()) {
            let out = thinprune_epi8(values, mask);
            let kept: Vec<u8> = (0..16)
                .filter(|&b| mask >> b & 1 == 0)
                .map(|b| values[b])
                .collect();
            prop_assert_eq!(&out[..kept.len()], &kept[..]);
            prop_assert!(out[kept.len()..].iter().all(|&v| v == values[8]));
        }
    }
}
