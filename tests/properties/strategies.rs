use proptest::prelude::*;
use rust_decimal::Decimal;

use utxo_gateway::services::codec::{AddressKind, CashAddress, Network};

pub fn network_strategy() -> impl Strategy<Value = Network> {
	prop_oneof![Just(Network::Main), Just(Network::Test)]
}

pub fn cash_address_strategy() -> impl Strategy<Value = CashAddress> {
	(
		network_strategy(),
		prop_oneof![Just(AddressKind::P2pkh), Just(AddressKind::P2sh)],
		any::<[u8; 20]>(),
	)
		.prop_map(|(network, kind, hash)| CashAddress {
			network,
			kind,
			hash,
		})
}

/// Non-negative decimals with up to eight fractional digits, small enough that any rate
/// keeps the satoshi value within u64
pub fn amount_strategy() -> impl Strategy<Value = Decimal> {
	(0i64..100_000_000_000, 0u32..=8)
		.prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale))
}

pub fn rate_strategy() -> impl Strategy<Value = u64> {
	1u64..=100_000_000
}
