//! End-to-end tests: services built from configuration against mocked HTTP providers.

use mockito::{Matcher, Server};
use serde_json::json;

use utxo_gateway::{
	bootstrap::initialize_gateway,
	models::{Chain, Currency, Operation, ProviderKind, RateSourceConfig, RateSourceKind},
	services::gateway::GatewayError,
	utils::tests::GatewayConfigBuilder,
};

const ADDRESS: &str = "qpm2qsznhks23z7629mms6s4cwef74vcwvy22gdx6a";

#[tokio::test]
async fn test_balance_fails_over_to_second_provider() {
	let mut down = Server::new_async().await;
	let mut up = Server::new_async().await;
	let down_mock = down
		.mock("GET", format!("/address/{}/balance", ADDRESS).as_str())
		.with_status(503)
		.create_async()
		.await;
	let up_mock = up
		.mock("GET", format!("/address/{}/balance", ADDRESS).as_str())
		.with_status(200)
		.with_body(r#"{"confirmed": 120000, "unconfirmed": -20000, "balance": 100000}"#)
		.create_async()
		.await;

	let config = GatewayConfigBuilder::new()
		.provider(Chain::Bch, "down", ProviderKind::Bitcore, Some(down.url().as_str()))
		.provider(Chain::Bch, "up", ProviderKind::Bitcore, Some(up.url().as_str()))
		.build();
	let services = initialize_gateway(&config).unwrap();

	let balance = services
		.gateway
		.get_balance(Chain::Bch, ADDRESS)
		.await
		.unwrap();
	assert_eq!(balance, 100_000);
	down_mock.assert_async().await;
	up_mock.assert_async().await;
}

#[tokio::test]
async fn test_broadcast_rejection_from_bitcore_node() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/tx/send")
		.match_body(Matcher::Json(json!({ "rawTx": "0200beef" })))
		.with_status(400)
		.with_body("16: bad-txns-inputs-missingorspent")
		.create_async()
		.await;

	let config = GatewayConfigBuilder::new()
		.provider(Chain::Btc, "node", ProviderKind::Bitcore, Some(server.url().as_str()))
		.build();
	let services = initialize_gateway(&config).unwrap();

	match services.gateway.broadcast(Chain::Btc, "0200beef").await {
		Err(GatewayError::BroadcastRejected { reason, .. }) => {
			assert!(reason.contains("missingorspent"))
		}
		other => panic!("expected rejection, got {:?}", other),
	}
	mock.assert_async().await;
}

#[tokio::test]
async fn test_operation_order_override() {
	let mut first = Server::new_async().await;
	let mut second = Server::new_async().await;
	let skipped = first
		.mock("GET", "/blocks/tip/height")
		.expect(0)
		.create_async()
		.await;
	let used = second
		.mock("GET", "/blocks/tip/height")
		.with_status(200)
		.with_body("871234")
		.create_async()
		.await;

	let config = GatewayConfigBuilder::new()
		.provider(Chain::Btc, "first", ProviderKind::Esplora, Some(first.url().as_str()))
		.provider(Chain::Btc, "second", ProviderKind::Esplora, Some(second.url().as_str()))
		.operation(Chain::Btc, Operation::GetBlockNumber, &["second", "first"])
		.build();
	let services = initialize_gateway(&config).unwrap();

	assert_eq!(
		services.gateway.get_block_number(Chain::Btc).await.unwrap(),
		871_234
	);
	skipped.assert_async().await;
	used.assert_async().await;
}

#[tokio::test]
async fn test_public_balance_in_fiat() {
	let mut provider = Server::new_async().await;
	let mut rates = Server::new_async().await;
	provider
		.mock("GET", format!("/address/{}?unspent=true", ADDRESS).as_str())
		.with_status(200)
		.with_body(
			json!([
				{ "mintTxid": "aa", "mintIndex": 0, "value": 300000, "confirmations": 4, "script": "76a9" },
				{ "mintTxid": "aa", "mintIndex": 1, "value": 100000, "confirmations": 4, "script": "76a9" }
			])
			.to_string(),
		)
		.create_async()
		.await;
	let rate_mock = rates
		.mock("GET", "/rates/bch/usd")
		.with_status(200)
		.with_body(r#"{"code": "USD", "rate": 250}"#)
		.expect(1)
		.create_async()
		.await;

	let config = GatewayConfigBuilder::new()
		.provider(Chain::Bch, "bitcore", ProviderKind::Bitcore, Some(provider.url().as_str()))
		.rate_source(
			Currency::Usd,
			RateSourceConfig {
				kind: RateSourceKind::Bitpay,
				base_url: Some(rates.url()),
			},
		)
		.build();
	let services = initialize_gateway(&config).unwrap();

	// 400000 satoshi at 400000 satoshi per dollar
	assert_eq!(
		services
			.public_info
			.get_balance(Chain::Bch, ADDRESS, "USD")
			.await
			.unwrap(),
		"1"
	);
	assert_eq!(
		services
			.public_info
			.get_balance(Chain::Bch, ADDRESS, "mbch")
			.await
			.unwrap(),
		"4"
	);
	// The second fiat lookup is served from the cache.
	services
		.public_info
		.get_balance(Chain::Bch, ADDRESS, "usd")
		.await
		.unwrap();
	rate_mock.assert_async().await;
}

#[test]
fn test_unknown_provider_in_operation_order_fails() {
	let config = GatewayConfigBuilder::new()
		.provider(Chain::Bch, "a", ProviderKind::Bitcore, None)
		.operation(Chain::Bch, Operation::GetBalance, &["missing"])
		.build();
	assert!(initialize_gateway(&config).is_err());
}
