//! Bitcore node API (BCH and BTC).
//!
//! Supports every operation. Transactions come back as provider JSON.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::{
	models::{Chain, TransactionDetail, Unspent},
	services::providers::{
		adapters::common::{
			combine_balance, dedup_txids, i64_from_json, join_url, provider_metadata,
			rejection_reason, require_array, require_u64, segment, unspent_from_json,
			UnspentFields,
		},
		BalanceProvider, BlockHeightProvider, BroadcastProvider, HttpTransport, ProviderAdapter,
		ProviderError, RawTransactionProvider, TransactionProvider, TransactionsProvider,
		UnspentProvider,
	},
};

const UNSPENT_FIELDS: UnspentFields<'static> = UnspentFields {
	txid: &["mintTxid"],
	index: &["mintIndex"],
	amount: &["value"],
	confirmations: &["confirmations"],
	script: &["script"],
};

pub struct BitcoreAdapter {
	name: String,
	chain: Chain,
	base_url: String,
	transport: HttpTransport,
}

impl BitcoreAdapter {
	pub fn new(
		name: impl Into<String>,
		chain: Chain,
		base_url: Option<String>,
		transport: HttpTransport,
	) -> Self {
		Self {
			name: name.into(),
			chain,
			base_url: base_url.unwrap_or_else(|| Self::default_base_url(chain).to_string()),
			transport,
		}
	}

	pub fn default_base_url(chain: Chain) -> &'static str {
		match chain {
			Chain::Bch => "https://api.bitcore.io/api/BCH/mainnet",
			Chain::Btc => "https://api.bitcore.io/api/BTC/mainnet",
		}
	}

	fn url(&self, path: &str) -> String {
		join_url(&self.base_url, path)
	}
}

impl ProviderAdapter for BitcoreAdapter {
	fn name(&self) -> &str {
		&self.name
	}

	fn chain(&self) -> Chain {
		self.chain
	}

	fn balance(&self) -> Option<&dyn BalanceProvider> {
		Some(self)
	}

	fn unspent(&self) -> Option<&dyn UnspentProvider> {
		Some(self)
	}

	fn transactions(&self) -> Option<&dyn TransactionsProvider> {
		Some(self)
	}

	fn transaction(&self) -> Option<&dyn TransactionProvider> {
		Some(self)
	}

	fn raw_transaction(&self) -> Option<&dyn RawTransactionProvider> {
		Some(self)
	}

	fn broadcaster(&self) -> Option<&dyn BroadcastProvider> {
		Some(self)
	}

	fn block_height(&self) -> Option<&dyn BlockHeightProvider> {
		Some(self)
	}
}

#[async_trait]
impl BalanceProvider for BitcoreAdapter {
	#[tracing::instrument(skip(self), fields(provider = %self.name))]
	async fn get_balance(&self, address: &str) -> Result<u64, ProviderError> {
		let url = self.url(&format!("address/{}/balance", segment(address)));
		let body: Value = self.transport.get_json(&url).await?;

		let field = |name: &str| body.get(name).and_then(i64_from_json);
		let confirmed = field("confirmed").ok_or_else(|| {
			ProviderError::malformed("missing confirmed balance", provider_metadata(&self.name, &url))
		})?;
		combine_balance(confirmed, field("unconfirmed").unwrap_or(0), &self.name, &url)
	}
}

#[async_trait]
impl UnspentProvider for BitcoreAdapter {
	#[tracing::instrument(skip(self), fields(provider = %self.name))]
	async fn get_unspent(&self, address: &str) -> Result<Vec<Unspent>, ProviderError> {
		let url = self.url(&format!("address/{}?unspent=true", segment(address)));
		let body: Value = self.transport.get_json(&url).await?;

		require_array(&body, "unspent list", &self.name, &url)?
			.iter()
			.map(|item| unspent_from_json(item, &UNSPENT_FIELDS, &self.name, &url))
			.collect()
	}
}

#[async_trait]
impl TransactionsProvider for BitcoreAdapter {
	#[tracing::instrument(skip(self), fields(provider = %self.name))]
	async fn get_transactions(&self, address: &str) -> Result<Vec<String>, ProviderError> {
		let url = self.url(&format!("address/{}/txs", segment(address)));
		let body: Value = self.transport.get_json(&url).await?;

		// Each coin names the transaction that created it and, if spent, the one spending it.
		let coins = require_array(&body, "transaction list", &self.name, &url)?;
		Ok(dedup_txids(coins.iter().flat_map(|coin| {
			["mintTxid", "spentTxid"]
				.into_iter()
				.filter_map(|field| coin.get(field).and_then(Value::as_str))
				.map(str::to_string)
				.collect::<Vec<_>>()
		})))
	}
}

#[async_trait]
impl TransactionProvider for BitcoreAdapter {
	#[tracing::instrument(skip(self), fields(provider = %self.name))]
	async fn get_transaction(&self, txid: &str) -> Result<TransactionDetail, ProviderError> {
		self.get_raw_transaction(txid)
			.await
			.map(TransactionDetail::Raw)
	}
}

#[async_trait]
impl RawTransactionProvider for BitcoreAdapter {
	#[tracing::instrument(skip(self), fields(provider = %self.name))]
	async fn get_raw_transaction(&self, txid: &str) -> Result<Value, ProviderError> {
		let url = self.url(&format!("tx/{}", segment(txid)));
		self.transport.get_json(&url).await
	}
}

#[async_trait]
impl BroadcastProvider for BitcoreAdapter {
	#[tracing::instrument(skip(self, tx_hex), fields(provider = %self.name))]
	async fn broadcast(&self, tx_hex: &str) -> Result<(), ProviderError> {
		let url = self.url("tx/send");
		let reply = self
			.transport
			.post_json(&url, &json!({ "rawTx": tx_hex }))
			.await?;

		// The node answers 400 with its mempool rejection reason as plain text.
		if reply.status == 400 {
			if let Some(reason) = rejection_reason(&reply.body) {
				return Err(ProviderError::rejected(
					reason,
					None,
					provider_metadata(&self.name, &url),
				));
			}
		}
		reply.into_success(&url).map(|_| ())
	}
}

#[async_trait]
impl BlockHeightProvider for BitcoreAdapter {
	#[tracing::instrument(skip(self), fields(provider = %self.name))]
	async fn get_block_number(&self) -> Result<u64, ProviderError> {
		let url = self.url("block/tip");
		let body: Value = self.transport.get_json(&url).await?;
		require_u64(&body, &["height"], &self.name, &url)
	}
}
