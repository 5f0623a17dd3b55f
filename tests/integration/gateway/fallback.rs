use mockall::predicate::eq;
use std::sync::Arc;

use crate::integration::mocks::{
	status_error, timeout_error, MockAdapter, MockBalanceProvider, MockBlockHeightProvider,
	MockBroadcastProvider, MockUnspentProvider,
};
use utxo_gateway::{
	models::{Chain, Operation, Unspent},
	services::{
		gateway::{DispatchTable, Gateway, GatewayError},
		providers::{ProviderAdapter, ProviderError},
	},
	utils::tests::UnspentBuilder,
};

const ADDRESS: &str = "bitcoincash:qrtest";
const TX_HEX: &str = "0100000001abcdef";

fn gateway(chain: Chain, operation: Operation, adapters: Vec<Arc<dyn ProviderAdapter>>) -> Gateway {
	Gateway::default().with_table(chain, DispatchTable::new().with_route(operation, adapters))
}

fn balance_returning(result: fn() -> Result<u64, ProviderError>) -> MockBalanceProvider {
	let mut mock = MockBalanceProvider::new();
	mock.expect_get_balance()
		.with(eq(ADDRESS))
		.times(1)
		.returning(move |_| result());
	mock
}

fn unused_balance() -> MockBalanceProvider {
	let mut mock = MockBalanceProvider::new();
	mock.expect_get_balance().never();
	mock
}

fn broadcast_returning(result: fn() -> Result<(), ProviderError>) -> MockBroadcastProvider {
	let mut mock = MockBroadcastProvider::new();
	mock.expect_broadcast()
		.with(eq(TX_HEX))
		.times(1)
		.returning(move |_| result());
	mock
}

#[tokio::test]
async fn test_balance_falls_back_after_transient_failures() {
	let adapters = vec![
		MockAdapter::new("bitcore", Chain::Bch)
			.with_balance(balance_returning(|| Err(timeout_error())))
			.shared(),
		MockAdapter::new("bitcoin.com", Chain::Bch)
			.with_balance(balance_returning(|| Err(status_error(503))))
			.shared(),
		MockAdapter::new("blockchair", Chain::Bch)
			.with_balance(balance_returning(|| Ok(150_000)))
			.shared(),
		MockAdapter::new("btc.com", Chain::Bch)
			.with_balance(unused_balance())
			.shared(),
	];
	let gateway = gateway(Chain::Bch, Operation::GetBalance, adapters);

	assert_eq!(gateway.get_balance(Chain::Bch, ADDRESS).await.unwrap(), 150_000);
}

#[tokio::test]
async fn test_all_transient_failures_exhaust_the_route() {
	let adapters = vec![
		MockAdapter::new("a", Chain::Bch)
			.with_balance(balance_returning(|| Err(timeout_error())))
			.shared(),
		MockAdapter::new("b", Chain::Bch)
			.with_balance(balance_returning(|| Err(status_error(429))))
			.shared(),
	];
	let gateway = gateway(Chain::Bch, Operation::GetBalance, adapters);

	match gateway.get_balance(Chain::Bch, ADDRESS).await {
		Err(GatewayError::Exhausted {
			chain, operation, ..
		}) => {
			assert_eq!(chain, Chain::Bch);
			assert_eq!(operation, Operation::GetBalance);
		}
		other => panic!("expected exhaustion, got {:?}", other),
	}
}

#[tokio::test]
async fn test_invalid_address_stops_fallback() {
	let adapters = vec![
		MockAdapter::new("a", Chain::Bch)
			.with_balance(balance_returning(|| {
				Err(ProviderError::invalid_address("checksum mismatch", None, None))
			}))
			.shared(),
		MockAdapter::new("b", Chain::Bch)
			.with_balance(unused_balance())
			.shared(),
	];
	let gateway = gateway(Chain::Bch, Operation::GetBalance, adapters);

	assert!(matches!(
		gateway.get_balance(Chain::Bch, ADDRESS).await,
		Err(GatewayError::InvalidAddressFormat(_))
	));
}

#[tokio::test]
async fn test_unconfigured_chain_is_exhausted() {
	let gateway = Gateway::default();
	assert!(matches!(
		gateway.get_block_number(Chain::Btc).await,
		Err(GatewayError::Exhausted { .. })
	));
}

#[tokio::test]
async fn test_adapters_without_the_operation_are_skipped() {
	let mut height = MockBlockHeightProvider::new();
	height.expect_get_block_number().times(1).returning(|| Ok(840_000));

	let adapters = vec![
		MockAdapter::new("balance-only", Chain::Btc)
			.with_balance(unused_balance())
			.shared(),
		MockAdapter::new("blockstream", Chain::Btc)
			.with_block_height(height)
			.shared(),
	];
	let gateway = gateway(Chain::Btc, Operation::GetBlockNumber, adapters);

	assert_eq!(gateway.get_block_number(Chain::Btc).await.unwrap(), 840_000);
}

#[tokio::test]
async fn test_unspent_keeps_distinct_outputs_of_one_transaction() {
	let mut unspent = MockUnspentProvider::new();
	unspent.expect_get_unspent().times(1).returning(|_| {
		Ok(vec![
			UnspentBuilder::new().txid("aa").txindex(0).amount(500).build(),
			UnspentBuilder::new().txid("aa").txindex(1).amount(500).build(),
		])
	});
	let gateway = gateway(
		Chain::Bch,
		Operation::GetUnspent,
		vec![MockAdapter::new("bitcore", Chain::Bch)
			.with_unspent(unspent)
			.shared()],
	);

	let outputs: Vec<Unspent> = gateway.get_unspent(Chain::Bch, ADDRESS).await.unwrap();
	assert_eq!(outputs.len(), 2);
	assert_ne!(outputs[0], outputs[1]);
	assert!(outputs[0].same_amount_and_txid(&outputs[1]));
}

#[tokio::test]
async fn test_broadcast_rejection_is_reported_when_no_provider_accepts() {
	let adapters = vec![
		MockAdapter::new("bitcore", Chain::Bch)
			.with_broadcaster(broadcast_returning(|| {
				Err(ProviderError::rejected("insufficient priority", None, None))
			}))
			.shared(),
		MockAdapter::new("blockchair", Chain::Bch)
			.with_broadcaster(broadcast_returning(|| Err(timeout_error())))
			.shared(),
	];
	let gateway = gateway(Chain::Bch, Operation::Broadcast, adapters);

	match gateway.broadcast(Chain::Bch, TX_HEX).await {
		Err(GatewayError::BroadcastRejected { reason, .. }) => {
			assert_eq!(reason, "insufficient priority")
		}
		other => panic!("expected rejection, got {:?}", other),
	}
}

#[tokio::test]
async fn test_broadcast_accepted_after_rejection() {
	let adapters = vec![
		MockAdapter::new("a", Chain::Btc)
			.with_broadcaster(broadcast_returning(|| {
				Err(ProviderError::rejected("min relay fee not met", None, None))
			}))
			.shared(),
		MockAdapter::new("b", Chain::Btc)
			.with_broadcaster(broadcast_returning(|| Ok(())))
			.shared(),
	];
	let gateway = gateway(Chain::Btc, Operation::Broadcast, adapters);

	assert!(gateway.broadcast(Chain::Btc, TX_HEX).await.is_ok());
}

#[tokio::test]
async fn test_broadcast_of_invalid_hex_calls_no_provider() {
	let mut never = MockBroadcastProvider::new();
	never.expect_broadcast().never();
	let gateway = gateway(
		Chain::Btc,
		Operation::Broadcast,
		vec![MockAdapter::new("a", Chain::Btc)
			.with_broadcaster(never)
			.shared()],
	);

	for bad in ["", "abc", "zz00"] {
		assert!(matches!(
			gateway.broadcast(Chain::Btc, bad).await,
			Err(GatewayError::PermanentRequest(_))
		));
	}
}
