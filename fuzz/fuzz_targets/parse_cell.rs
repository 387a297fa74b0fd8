#![no_main]

use libfuzzer_sys::fuzz_target;
use s57chart::{parse_chart, ParseOptions};

// Arbitrary bytes must produce either a chart or an error, never a panic.
fuzz_target!(|data: &[u8]| {
    let _ = parse_chart(data, &[], &ParseOptions::default());
    let _ = parse_chart(data, &[], &ParseOptions::strict());
});
