//! Blockchair dashboards API (BCH and BTC).

use async_trait::async_trait;
use serde_json::Value;

use crate::{
	models::{Chain, TransactionDetail, Unspent},
	services::providers::{
		adapters::common::{
			dedup_txids, first_u64, i64_from_json, join_url, provider_metadata, require_str,
			require_u64, segment,
		},
		BalanceProvider, BlockHeightProvider, BroadcastProvider, HttpTransport, ProviderAdapter,
		ProviderError, RawTransactionProvider, TransactionProvider, TransactionsProvider,
		UnspentProvider,
	},
};

const CASH_PREFIX: &str = "bitcoincash:";

pub struct BlockchairAdapter {
	name: String,
	chain: Chain,
	base_url: String,
	transport: HttpTransport,
}

impl BlockchairAdapter {
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
			Chain::Bch => "https://api.blockchair.com/bitcoin-cash",
			Chain::Btc => "https://api.blockchair.com/bitcoin",
		}
	}

	fn url(&self, path: &str) -> String {
		join_url(&self.base_url, path)
	}

	fn malformed(&self, msg: impl Into<String>, url: &str) -> ProviderError {
		ProviderError::malformed(msg, provider_metadata(&self.name, url))
	}

	/// Dashboard of one address: the single entry under `data`, plus the chain tip.
	async fn dashboard(&self, address: &str) -> Result<(Value, Option<i64>, String), ProviderError> {
		let address = address.strip_prefix(CASH_PREFIX).unwrap_or(address);
		let url = self.url(&format!("dashboards/address/{}", segment(address)));
		let body: Value = self.transport.get_json(&url).await?;

		let entry = body
			.get("data")
			.and_then(Value::as_object)
			.and_then(|data| data.values().next())
			.cloned()
			.ok_or_else(|| self.malformed("dashboard has no data entry", &url))?;
		let tip = body.pointer("/context/state").and_then(i64_from_json);
		Ok((entry, tip, url))
	}
}

/// Confirmations of an output mined in `block_id`; -1 marks the mempool.
fn confirmations(block_id: i64, tip: Option<i64>) -> u64 {
	match tip {
		Some(tip) if block_id >= 0 && tip >= block_id => (tip - block_id + 1) as u64,
		_ => 0,
	}
}

impl ProviderAdapter for BlockchairAdapter {
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
impl BalanceProvider for BlockchairAdapter {
	#[tracing::instrument(skip(self), fields(provider = %self.name))]
	async fn get_balance(&self, address: &str) -> Result<u64, ProviderError> {
		let (entry, _, url) = self.dashboard(address).await?;
		require_u64(
			entry.get("address").unwrap_or(&Value::Null),
			&["balance"],
			&self.name,
			&url,
		)
	}
}

#[async_trait]
impl UnspentProvider for BlockchairAdapter {
	#[tracing::instrument(skip(self), fields(provider = %self.name))]
	async fn get_unspent(&self, address: &str) -> Result<Vec<Unspent>, ProviderError> {
		let (entry, tip, url) = self.dashboard(address).await?;
		let utxos = match entry.get("utxo") {
			None | Some(Value::Null) => return Ok(Vec::new()),
			Some(Value::Array(items)) => items,
			Some(_) => return Err(self.malformed("expected utxo to be an array", &url)),
		};

		utxos
			.iter()
			.map(|item| {
				let txid = require_str(item, &["transaction_hash"], &self.name, &url)?;
				let index = require_u64(item, &["index"], &self.name, &url)?;
				let index = u32::try_from(index)
					.map_err(|_| self.malformed(format!("output index {} out of range", index), &url))?;
				let amount = require_u64(item, &["value"], &self.name, &url)?;
				let block_id = item.get("block_id").and_then(i64_from_json).unwrap_or(-1);
				Ok(Unspent::new(
					amount,
					confirmations(block_id, tip),
					None,
					txid,
					index,
				))
			})
			.collect()
	}
}

#[async_trait]
impl TransactionsProvider for BlockchairAdapter {
	#[tracing::instrument(skip(self), fields(provider = %self.name))]
	async fn get_transactions(&self, address: &str) -> Result<Vec<String>, ProviderError> {
		let (entry, _, _) = self.dashboard(address).await?;
		let txids = entry
			.get("transactions")
			.and_then(Value::as_array)
			.map(|items| {
				items
					.iter()
					.filter_map(Value::as_str)
					.map(str::to_string)
					.collect::<Vec<_>>()
			})
			.unwrap_or_default();
		Ok(dedup_txids(txids))
	}
}

#[async_trait]
impl TransactionProvider for BlockchairAdapter {
	#[tracing::instrument(skip(self), fields(provider = %self.name))]
	async fn get_transaction(&self, txid: &str) -> Result<TransactionDetail, ProviderError> {
		let url = self.url(&format!("dashboards/transaction/{}", segment(txid)));
		let body: Value = self.transport.get_json(&url).await?;
		match body.get("data").and_then(|data| data.get(txid)) {
			Some(entry) if !entry.is_null() => Ok(TransactionDetail::Raw(entry.clone())),
			_ => Err(self.malformed("transaction not found in dashboard", &url)),
		}
	}
}

#[async_trait]
impl RawTransactionProvider for BlockchairAdapter {
	#[tracing::instrument(skip(self), fields(provider = %self.name))]
	async fn get_raw_transaction(&self, txid: &str) -> Result<Value, ProviderError> {
		let url = self.url(&format!("raw/transaction/{}", segment(txid)));
		let body: Value = self.transport.get_json(&url).await?;
		match body.get("data").and_then(|data| data.get(txid)) {
			Some(entry) if !entry.is_null() => Ok(entry.clone()),
			_ => Err(self.malformed("raw transaction not found", &url)),
		}
	}
}

#[async_trait]
impl BroadcastProvider for BlockchairAdapter {
	#[tracing::instrument(skip(self, tx_hex), fields(provider = %self.name))]
	async fn broadcast(&self, tx_hex: &str) -> Result<(), ProviderError> {
		let url = self.url("push/transaction");
		let form = format!("data={}", urlencoding::encode(tx_hex));
		let reply = self
			.transport
			.post_body(&url, "application/x-www-form-urlencoded", form)
			.await?;

		if reply.status == 400 {
			let reason = serde_json::from_str::<Value>(&reply.body)
				.ok()
				.and_then(|v| {
					v.pointer("/context/error")
						.and_then(Value::as_str)
						.map(str::to_string)
				});
			if let Some(reason) = reason {
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
impl BlockHeightProvider for BlockchairAdapter {
	#[tracing::instrument(skip(self), fields(provider = %self.name))]
	async fn get_block_number(&self) -> Result<u64, ProviderError> {
		let url = self.url("stats");
		let body: Value = self.transport.get_json(&url).await?;
		body.get("data")
			.and_then(|data| first_u64(data, &["best_block_height", "blocks"]))
			.ok_or_else(|| self.malformed("missing best_block_height", &url))
	}
}
