#![no_main]

use devirgo::GroupParameters;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(json) = std::str::from_utf8(data) {
        if let Ok(params) = serde_json::from_str::<GroupParameters>(json) {
            assert!(params.is_element(params.generator()));
        }
    }
});
