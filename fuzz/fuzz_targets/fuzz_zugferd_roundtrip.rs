#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Parse, export, parse again: no step may panic.
        if let Ok(invoice) = zugferd_invoice::zugferd::from_xml(s) {
            if let Ok(xml) = zugferd_invoice::zugferd::to_xml(&invoice) {
                let _ = zugferd_invoice::zugferd::from_xml(&xml);
            }
        }
    }
});
