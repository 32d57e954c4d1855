#![no_main]

use libfuzzer_sys::fuzz_target;
use wire_router::core::skip::skip_field;

fuzz_target!(|data: &[u8]| {
    // Skipping must stay in bounds and always make progress
    let mut pos = 0;
    while pos < data.len() {
        match skip_field(data, pos) {
            Ok(next) => {
                assert!(next > pos && next <= data.len());
                pos = next;
            }
            Err(_) => break,
        }
    }
});
