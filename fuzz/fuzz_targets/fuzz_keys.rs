//! Fuzz the domain-key parsers (range labels, bands, months).

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = qp_common::SfiRange::from_label(text);
        let _ = text.parse::<qp_common::Band>();
        let _ = qp_common::MonthKey::from_label(text);
    }
});
