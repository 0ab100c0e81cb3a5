#![no_main]

use libfuzzer_sys::fuzz_target;
use payg_core::{Code, CODE_STR_WIDTH_DIGITS};

fuzz_target!(|data: &str| {
    // Try to parse - should not panic
    if let Ok(code) = data.parse::<Code>() {
        // Accepted input is exactly the canonical rendering
        let rendered = code.to_string();
        assert_eq!(rendered.len(), CODE_STR_WIDTH_DIGITS);
        assert_eq!(rendered, data);

        // Fields reassemble the value
        let rebuilt = Code::new(
            u32::from(code.period_id()) << 21
                | u32::from(code.counter()) << 13
                | u32::from(code.sign()),
        );
        assert_eq!(rebuilt.ok(), Some(code));
    }
});
