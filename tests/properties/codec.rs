use proptest::prelude::*;

use crate::properties::strategies::{cash_address_strategy, network_strategy};
use utxo_gateway::services::codec::{
	bytes_to_wif, cash_to_legacy, is_cash_address, legacy_to_cash, wif_checksum_check,
	wif_to_bytes, CashAddress,
};

const CHARSET: &[u8] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

proptest! {
	#[test]
	fn prop_cash_and_legacy_forms_agree(address in cash_address_strategy()) {
		let cash = address.encode();
		let legacy = address.to_legacy();

		prop_assert!(is_cash_address(&cash));
		prop_assert_eq!(CashAddress::decode(&cash).unwrap(), address.clone());
		prop_assert_eq!(cash_to_legacy(&cash).unwrap(), legacy.clone());
		prop_assert_eq!(legacy_to_cash(&legacy).unwrap(), cash);
	}

	#[test]
	fn prop_single_substitution_is_detected(
		address in cash_address_strategy(),
		position in any::<prop::sample::Index>(),
		replacement in 0usize..CHARSET.len(),
	) {
		let encoded = address.encode();
		let (prefix, payload) = encoded.split_once(':').unwrap();
		let mut payload = payload.as_bytes().to_vec();
		let index = position.index(payload.len());
		prop_assume!(payload[index] != CHARSET[replacement]);
		payload[index] = CHARSET[replacement];

		let corrupted = format!("{}:{}", prefix, String::from_utf8(payload).unwrap());
		prop_assert!(CashAddress::decode(&corrupted).is_err());
	}

	#[test]
	fn prop_wif_keeps_key_and_flags(
		key in any::<[u8; 32]>(),
		network in network_strategy(),
		compressed in any::<bool>(),
	) {
		let wif = bytes_to_wif(&key, network, compressed).unwrap();
		prop_assert!(wif_checksum_check(&wif));

		let decoded = wif_to_bytes(&wif).unwrap();
		prop_assert_eq!(decoded.key.as_slice(), &key[..]);
		prop_assert_eq!(decoded.compressed, compressed);
		prop_assert_eq!(decoded.network, network);
	}
}
