#![no_main]

use libfuzzer_sys::fuzz_target;
use oracle_transactions::{format_exchange_rate_tuples, parse_exchange_rate_tuples};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Anything that parses must re-parse to the same tuples once formatted.
    if let Ok(tuples) = parse_exchange_rate_tuples(text) {
        let formatted = format_exchange_rate_tuples(&tuples);
        let reparsed = parse_exchange_rate_tuples(&formatted).expect("formatted tuples must parse");
        assert_eq!(reparsed, tuples);
    }
    let _ = text.parse::<oracle_types::Dec>();
});
