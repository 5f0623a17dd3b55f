//! Esplora REST API (BTC), as served by blockstream.info and mempool.space.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::{
	models::{Chain, Transaction, TransactionDetail, TxPart, Unspent},
	services::providers::{
		adapters::common::{
			combine_balance, dedup_txids, i64_from_json, join_url, provider_metadata,
			rejection_reason, require_array, require_str, require_u64, segment,
		},
		BalanceProvider, BlockHeightProvider, BroadcastProvider, HttpTransport, ProviderAdapter,
		ProviderError, RawTransactionProvider, TransactionProvider, TransactionsProvider,
		UnspentProvider,
	},
};

pub struct EsploraAdapter {
	name: String,
	chain: Chain,
	base_url: String,
	transport: HttpTransport,
}

impl EsploraAdapter {
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

	pub fn default_base_url(_chain: Chain) -> &'static str {
		"https://blockstream.info/api"
	}

	fn url(&self, path: &str) -> String {
		join_url(&self.base_url, path)
	}

	fn malformed(&self, msg: impl Into<String>, url: &str) -> ProviderError {
		ProviderError::malformed(msg, provider_metadata(&self.name, url))
	}

	/// Funded minus spent over one of the `*_stats` objects.
	fn net_funded(&self, stats: Option<&Value>, url: &str) -> Result<i64, ProviderError> {
		let Some(stats) = stats else {
			return Ok(0);
		};
		let field = |name: &str| {
			stats
				.get(name)
				.and_then(i64_from_json)
				.ok_or_else(|| self.malformed(format!("missing {}", name), url))
		};
		field("funded_txo_sum")?
			.checked_sub(field("spent_txo_sum")?)
			.ok_or_else(|| self.malformed("funded and spent sums overflow", url))
	}

	fn part(&self, item: &Value, url: &str) -> Result<TxPart, ProviderError> {
		let address = item
			.get("scriptpubkey_address")
			.and_then(Value::as_str)
			.map(str::to_string);
		let script = item
			.get("scriptpubkey")
			.and_then(Value::as_str)
			.unwrap_or_default();
		let amount = require_u64(item, &["value"], &self.name, url)?;
		Ok(TxPart::new(address, amount, script))
	}

	fn normalize(&self, body: &Value, url: &str) -> Result<Transaction, ProviderError> {
		let txid = require_str(body, &["txid"], &self.name, url)?;
		let block_height = match body.pointer("/status/confirmed").and_then(Value::as_bool) {
			Some(true) => body
				.pointer("/status/block_height")
				.and_then(Value::as_u64),
			_ => None,
		};

		let mut inputs = Vec::new();
		for vin in require_array(body.get("vin").unwrap_or(&Value::Null), "vin", &self.name, url)? {
			match vin.get("prevout") {
				Some(prevout) if !prevout.is_null() => inputs.push(self.part(prevout, url)?),
				// Coinbase
				_ => inputs.push(TxPart::new(None, 0, "")),
			}
		}
		let mut outputs = Vec::new();
		for vout in require_array(body.get("vout").unwrap_or(&Value::Null), "vout", &self.name, url)? {
			outputs.push(self.part(vout, url)?);
		}

		let sum = |parts: &[TxPart]| {
			parts
				.iter()
				.try_fold(0u64, |acc, part| acc.checked_add(part.amount))
				.ok_or_else(|| self.malformed("transaction amounts overflow", url))
		};
		let value_in = sum(inputs.as_slice())?;
		let value_out = sum(outputs.as_slice())?;
		let fee = require_u64(body, &["fee"], &self.name, url)?;

		let mut tx = Transaction::new(txid, block_height, value_in, value_out, fee);
		inputs.into_iter().for_each(|part| tx.add_input(part));
		outputs.into_iter().for_each(|part| tx.add_output(part));
		Ok(tx)
	}
}

impl ProviderAdapter for EsploraAdapter {
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
impl BalanceProvider for EsploraAdapter {
	#[tracing::instrument(skip(self), fields(provider = %self.name))]
	async fn get_balance(&self, address: &str) -> Result<u64, ProviderError> {
		let url = self.url(&format!("address/{}", segment(address)));
		let body: Value = self.transport.get_json(&url).await?;

		let confirmed = self.net_funded(body.get("chain_stats"), &url)?;
		let unconfirmed = self.net_funded(body.get("mempool_stats"), &url)?;
		combine_balance(confirmed, unconfirmed, &self.name, &url)
	}
}

#[async_trait]
impl UnspentProvider for EsploraAdapter {
	#[tracing::instrument(skip(self), fields(provider = %self.name))]
	async fn get_unspent(&self, address: &str) -> Result<Vec<Unspent>, ProviderError> {
		let url = self.url(&format!("address/{}/utxo", segment(address)));
		let body: Value = self.transport.get_json(&url).await?;
		let items = require_array(&body, "utxo list", &self.name, &url)?;

		let mined_at = |item: &Value| match item.pointer("/status/confirmed").and_then(Value::as_bool) {
			Some(true) => item.pointer("/status/block_height").and_then(Value::as_u64),
			_ => None,
		};

		// Confirmations are relative to the tip, fetched only when something is mined.
		let tip = if items.iter().any(|item| mined_at(item).is_some()) {
			Some(self.get_block_number().await?)
		} else {
			None
		};

		items
			.iter()
			.map(|item| {
				let txid = require_str(item, &["txid"], &self.name, &url)?;
				let vout = require_u64(item, &["vout"], &self.name, &url)?;
				let vout = u32::try_from(vout)
					.map_err(|_| self.malformed(format!("output index {} out of range", vout), &url))?;
				let amount = require_u64(item, &["value"], &self.name, &url)?;
				let confirmations = match (mined_at(item), tip) {
					(Some(height), Some(tip)) if tip >= height => tip - height + 1,
					_ => 0,
				};
				Ok(Unspent::new(amount, confirmations, None, txid, vout))
			})
			.collect()
	}
}

#[async_trait]
impl TransactionsProvider for EsploraAdapter {
	#[tracing::instrument(skip(self), fields(provider = %self.name))]
	async fn get_transactions(&self, address: &str) -> Result<Vec<String>, ProviderError> {
		let url = self.url(&format!("address/{}/txs", segment(address)));
		let body: Value = self.transport.get_json(&url).await?;
		let items = require_array(&body, "transaction list", &self.name, &url)?;

		Ok(dedup_txids(
			items
				.iter()
				.filter_map(|item| item.get("txid").and_then(Value::as_str))
				.map(str::to_string),
		))
	}
}

#[async_trait]
impl TransactionProvider for EsploraAdapter {
	#[tracing::instrument(skip(self), fields(provider = %self.name))]
	async fn get_transaction(&self, txid: &str) -> Result<TransactionDetail, ProviderError> {
		let url = self.url(&format!("tx/{}", segment(txid)));
		let body: Value = self.transport.get_json(&url).await?;
		self.normalize(&body, &url).map(TransactionDetail::Normalized)
	}
}

#[async_trait]
impl RawTransactionProvider for EsploraAdapter {
	#[tracing::instrument(skip(self), fields(provider = %self.name))]
	async fn get_raw_transaction(&self, txid: &str) -> Result<Value, ProviderError> {
		let url = self.url(&format!("tx/{}/hex", segment(txid)));
		let hex = self.transport.get_text(&url).await?;
		let hex = hex.trim();
		if hex.is_empty() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
			return Err(self.malformed("transaction hex is not hexadecimal", &url));
		}
		Ok(json!({ "txid": txid, "hex": hex }))
	}
}

#[async_trait]
impl BroadcastProvider for EsploraAdapter {
	#[tracing::instrument(skip(self, tx_hex), fields(provider = %self.name))]
	async fn broadcast(&self, tx_hex: &str) -> Result<(), ProviderError> {
		let url = self.url("tx");
		let reply = self
			.transport
			.post_body(&url, "text/plain", tx_hex.to_string())
			.await?;

		// Node RPC errors come back as 400 with the reason in the body.
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
impl BlockHeightProvider for EsploraAdapter {
	#[tracing::instrument(skip(self), fields(provider = %self.name))]
	async fn get_block_number(&self) -> Result<u64, ProviderError> {
		let url = self.url("blocks/tip/height");
		let text = self.transport.get_text(&url).await?;
		text.trim()
			.parse()
			.map_err(|_| self.malformed("tip height is not a number", &url))
	}
}
