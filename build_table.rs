// Copyright 2026 simdprune Authors. Licensed under MIT or Apache-2.0.

use std::io::{self, BufWriter, Write};

// usage:
//
//  ./build_table > mask128_epi16.txt
//
// Prints one row of MASK128_EPI16 per line, 256 lines in mask order.

fn main() -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    simdprune::table::write_rows(&mut out)?;
    out.flush()
}
