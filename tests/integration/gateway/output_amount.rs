use serde_json::json;

use crate::integration::mocks::{timeout_error, MockAdapter, MockTransactionProvider};
use utxo_gateway::{
	models::{Chain, Operation, TransactionDetail},
	services::gateway::{DispatchTable, Gateway, GatewayError},
	utils::tests::TransactionBuilder,
};

const TXID: &str = "9f2c45a12db0144909b5db269415f7319179105982ac70ed80d76ea79d923ebf";

fn normalized() -> TransactionDetail {
	TransactionDetail::Normalized(
		TransactionBuilder::new()
			.txid(TXID)
			.block_height(600_000)
			.input(Some("1BoatSLRHtKNngkdXEeobR76b53LETtpyT"), 80_000, "")
			.output(Some("1BoatSLRHtKNngkdXEeobR76b53LETtpyT"), 50_000, "76a9")
			.output(None, 29_000, "6a")
			.fee(1_000)
			.build(),
	)
}

fn gateway(adapters: Vec<MockAdapter>) -> Gateway {
	Gateway::default().with_table(
		Chain::Btc,
		DispatchTable::new().with_route(
			Operation::GetTransaction,
			adapters.into_iter().map(MockAdapter::shared).collect(),
		),
	)
}

#[tokio::test]
async fn test_output_amount_skips_raw_only_providers() {
	let mut raw = MockTransactionProvider::new();
	raw.expect_get_transaction()
		.times(1)
		.returning(|_| Ok(TransactionDetail::Raw(json!({ "txid": TXID }))));
	let mut flaky = MockTransactionProvider::new();
	flaky
		.expect_get_transaction()
		.times(1)
		.returning(|_| Err(timeout_error()));
	let mut full = MockTransactionProvider::new();
	full.expect_get_transaction()
		.times(1)
		.returning(|_| Ok(normalized()));

	let gateway = gateway(vec![
		MockAdapter::new("btc.com", Chain::Btc).with_transaction(raw),
		MockAdapter::new("flaky", Chain::Btc).with_transaction(flaky),
		MockAdapter::new("blockstream", Chain::Btc).with_transaction(full),
	]);

	assert_eq!(
		gateway.get_output_amount(Chain::Btc, TXID, 1).await.unwrap(),
		29_000
	);
}

#[tokio::test]
async fn test_output_index_out_of_range_fails_fast() {
	let mut full = MockTransactionProvider::new();
	full.expect_get_transaction()
		.times(1)
		.returning(|_| Ok(normalized()));
	let mut unused = MockTransactionProvider::new();
	unused.expect_get_transaction().never();

	let gateway = gateway(vec![
		MockAdapter::new("blockstream", Chain::Btc).with_transaction(full),
		MockAdapter::new("mempool.space", Chain::Btc).with_transaction(unused),
	]);

	assert!(matches!(
		gateway.get_output_amount(Chain::Btc, TXID, 5).await,
		Err(GatewayError::PermanentRequest(_))
	));
}

#[tokio::test]
async fn test_get_transaction_returns_raw_detail_as_is() {
	let mut raw = MockTransactionProvider::new();
	raw.expect_get_transaction()
		.times(1)
		.returning(|_| Ok(TransactionDetail::Raw(json!({ "hash": TXID, "fee": 1000 }))));

	let gateway = gateway(vec![MockAdapter::new("btc.com", Chain::Btc).with_transaction(raw)]);
	let detail = gateway.get_transaction(Chain::Btc, TXID).await.unwrap();

	assert!(detail.is_raw());
	assert!(detail.as_normalized().is_none());
}
