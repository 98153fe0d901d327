#[macro_use]
extern crate afl;
extern crate simdprune;

use simdprune::Pruner;

fn main() {
    let simd = Pruner::new();
    let table = Pruner::new_table();
    fuzz!(|data: &[u8]| {
        for chunk in data.chunks_exact(17) {
            let mut values = [0u16; 8];
            for (v, b) in values.iter_mut().zip(chunk[..16].chunks_exact(2)) {
                *v = u16::from_le_bytes([b[0], b[1]]);
            }
            let mask = chunk[16];
            assert_eq!(simd.prune(values, mask), table.prune(values, mask));

            let mut words = [0u32; 4];
            for (w, b) in words.iter_mut().zip(chunk[..16].chunks_exact(4)) {
                *w = u32::from_le_bytes([b[0], b[1], b[2], b[3]]);
            }
            assert_eq!(
                simd.prune_epi32(words, mask),
                table.prune_epi32(words, mask)
            );

            let mut bytes = [0u8; 16];
            bytes.copy_from_slice(&chunk[..16]);
            let mask = u16::from_le_bytes([chunk[16], chunk[0]]);
            assert_eq!(
                simd.thinprune_epi8(bytes, mask),
                table.thinprune_epi8(bytes, mask)
            );
        }
    });
}
