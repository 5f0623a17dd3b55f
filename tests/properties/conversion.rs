use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::properties::strategies::{amount_strategy, rate_strategy};
use utxo_gateway::services::rates::{from_base_units, parse_amount, to_base_units};

proptest! {
	#[test]
	fn prop_to_base_units_truncates(amount in amount_strategy(), rate in rate_strategy()) {
		let exact = amount * Decimal::from(rate);
		let units = Decimal::from(to_base_units(amount, rate).unwrap());

		prop_assert!(units <= exact);
		prop_assert!(exact - units < Decimal::ONE);
	}

	#[test]
	fn prop_formatted_amount_never_rounds_up(
		units in 0u64..=2_100_000_000_000_000,
		rate in rate_strategy(),
		precision in 0u32..=8,
	) {
		let exact = Decimal::from(units) / Decimal::from(rate);
		let formatted = from_base_units(units, rate, precision).unwrap();
		let shown = Decimal::from_str(&formatted).unwrap();

		prop_assert!(!formatted.contains('e') && !formatted.contains('E'));
		prop_assert!(shown <= exact);
		prop_assert!(exact - shown < Decimal::new(1, precision));
	}

	#[test]
	fn prop_plain_decimal_text_parses_exactly(amount in amount_strategy()) {
		prop_assert_eq!(parse_amount(&amount.to_string()).unwrap(), amount);
	}
}
