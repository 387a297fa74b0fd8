#![no_main]

use libfuzzer_sys::fuzz_target;
use s57chart::RecordReader;

// The reader must always terminate and every field must stay inside the buffer.
fuzz_target!(|data: &[u8]| {
    for record in RecordReader::new(data).take(10_000) {
        if let Ok(record) = record {
            for field in record.fields() {
                assert!(field.bytes.len() <= data.len());
            }
        }
    }
});
