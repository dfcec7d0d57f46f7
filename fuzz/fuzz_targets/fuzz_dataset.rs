//! Fuzz the dataset loader: arbitrary input must produce Ok or a structured
//! error, never a panic.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = qp_core::dataset::parse_dataset(text);
    }
});
