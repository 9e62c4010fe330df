#![no_main]

use libfuzzer_sys::fuzz_target;
use zugferd_invoice::core::TotalPolicy;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = zugferd_invoice::source::parse_line_items(s, TotalPolicy::Strict);
        let _ = zugferd_invoice::source::parse_line_items(s, TotalPolicy::Tolerant);
    }
});
