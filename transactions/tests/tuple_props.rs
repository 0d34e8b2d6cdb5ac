//! Property tests for exchange-rate tuple parsing.

use oracle_transactions::{format_exchange_rate_tuples, parse_exchange_rate_tuples};
use oracle_types::{Dec, ExchangeRateTuple};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn arb_tuples() -> impl Strategy<Value = Vec<ExchangeRateTuple>> {
    prop::collection::btree_map("[a-z][a-z0-9]{2,8}", 0i64..1_000_000_000_000, 1..8).prop_map(
        |m: BTreeMap<String, i64>| {
            m.into_iter()
                .map(|(denom, raw)| ExchangeRateTuple::new(denom, Dec::from_raw(raw as i128 * 1_000)))
                .collect()
        },
    )
}

proptest! {
    #[test]
    fn formatted_tuples_parse_back(tuples in arb_tuples()) {
        let s = format_exchange_rate_tuples(&tuples);
        prop_assert_eq!(parse_exchange_rate_tuples(&s).unwrap(), tuples);
    }

    #[test]
    fn parser_never_panics(s in "\\PC{0,64}") {
        let _ = parse_exchange_rate_tuples(&s);
    }

    #[test]
    fn repeated_denom_always_rejected(tuples in arb_tuples()) {
        let mut doubled = tuples.clone();
        doubled.push(tuples[0].clone());
        prop_assert!(parse_exchange_rate_tuples(&format_exchange_rate_tuples(&doubled)).is_err());
    }
}
