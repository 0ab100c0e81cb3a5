#![no_main]

use libfuzzer_sys::fuzz_target;
use payg_core::{parse_counter, Error};

fuzz_target!(|data: &str| {
    match parse_counter(data) {
        Ok(counter) => assert_eq!(data.parse::<u64>().ok(), Some(u64::from(counter))),
        Err(Error::InvalidCounter(value)) => assert!(value > 255),
        Err(Error::CounterNotANumber(text)) => assert_eq!(text, data),
        Err(e) => panic!("unexpected error: {}", e),
    }
});
