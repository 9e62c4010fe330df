#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes as PDF input must not panic.
    let _ = zugferd_invoice::zugferd::extract_zugferd_xml(data);
});
