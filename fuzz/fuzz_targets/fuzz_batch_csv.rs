#![no_main]

use libfuzzer_sys::fuzz_target;
use payg_core::KEY_LENGTH_BYTES_MINIMUM;
use payg_csv::decode_batch;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must decode or fail cleanly
    if let Ok(entries) = decode_batch(data) {
        for entry in &entries {
            assert!(!entry.device_id.is_empty());
            assert!(entry.key.len() >= KEY_LENGTH_BYTES_MINIMUM);
        }
    }
});
