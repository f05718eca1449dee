#![no_main]

use libfuzzer_sys::fuzz_target;
use rfm_oec::rates_ratio::HypothesisInput;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Parsing and normalization must never panic
        if let Ok(hypo) = input.parse::<HypothesisInput>() {
            let _ = hypo.normalize();
        }
    }
});
