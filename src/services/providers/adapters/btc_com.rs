//! BTC.com chain API (BCH and BTC).
//!
//! Only understands legacy addresses, so BCH CashAddrs are converted before the request.
//! Offers no broadcast and no raw transaction lookup.

use async_trait::async_trait;
use serde_json::Value;

use crate::{
	models::{Chain, TransactionDetail, Unspent},
	services::{
		codec::{cash_to_legacy, is_cash_address},
		providers::{
			adapters::common::{
				dedup_txids, join_url, provider_metadata, require_u64, segment, unspent_from_json,
				UnspentFields,
			},
			BalanceProvider, BlockHeightProvider, HttpTransport, ProviderAdapter, ProviderError,
			TransactionProvider, TransactionsProvider, UnspentProvider,
		},
	},
};

const UNSPENT_FIELDS: UnspentFields<'static> = UnspentFields {
	txid: &["tx_hash"],
	index: &["tx_output_n"],
	amount: &["value"],
	confirmations: &["confirmations"],
	script: &["script"],
};

pub struct BtcComAdapter {
	name: String,
	chain: Chain,
	base_url: String,
	transport: HttpTransport,
}

impl BtcComAdapter {
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
			Chain::Bch => "https://bch-chain.api.btc.com/v3",
			Chain::Btc => "https://chain.api.btc.com/v3",
		}
	}

	fn url(&self, path: &str) -> String {
		join_url(&self.base_url, path)
	}

	/// Address in the legacy form the API expects.
	fn legacy_address(&self, address: &str) -> Result<String, ProviderError> {
		if self.chain == Chain::Bch && (address.contains(':') || is_cash_address(address)) {
			return Ok(cash_to_legacy(address)?);
		}
		Ok(address.to_string())
	}

	/// The `data` member of a response envelope; a non-zero `err_no` is a provider failure.
	async fn data(&self, url: &str) -> Result<Value, ProviderError> {
		let body: Value = self.transport.get_json(url).await?;
		match body.get("err_no").and_then(Value::as_i64) {
			None | Some(0) => Ok(body.get("data").cloned().unwrap_or(Value::Null)),
			Some(code) => Err(ProviderError::malformed(
				format!(
					"provider error {}: {}",
					code,
					body.get("err_msg").and_then(Value::as_str).unwrap_or_default()
				),
				provider_metadata(&self.name, url),
			)),
		}
	}

	/// `data.list`, where a missing list means the address has no history yet.
	async fn list(&self, url: &str) -> Result<Vec<Value>, ProviderError> {
		let data = self.data(url).await?;
		match data.get("list") {
			None | Some(Value::Null) => Ok(Vec::new()),
			Some(Value::Array(items)) => Ok(items.clone()),
			Some(_) => Err(ProviderError::malformed(
				"expected data.list to be an array",
				provider_metadata(&self.name, url),
			)),
		}
	}
}

impl ProviderAdapter for BtcComAdapter {
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

	fn block_height(&self) -> Option<&dyn BlockHeightProvider> {
		Some(self)
	}
}

#[async_trait]
impl BalanceProvider for BtcComAdapter {
	#[tracing::instrument(skip(self), fields(provider = %self.name))]
	async fn get_balance(&self, address: &str) -> Result<u64, ProviderError> {
		let address = self.legacy_address(address)?;
		let url = self.url(&format!("address/{}", segment(&address)));
		let data = self.data(&url).await?;

		// Unknown addresses come back with null data.
		if data.is_null() {
			return Ok(0);
		}
		require_u64(&data, &["balance"], &self.name, &url)
	}
}

#[async_trait]
impl UnspentProvider for BtcComAdapter {
	#[tracing::instrument(skip(self), fields(provider = %self.name))]
	async fn get_unspent(&self, address: &str) -> Result<Vec<Unspent>, ProviderError> {
		let address = self.legacy_address(address)?;
		let url = self.url(&format!("address/{}/unspent", segment(&address)));

		self.list(&url)
			.await?
			.iter()
			.map(|item| unspent_from_json(item, &UNSPENT_FIELDS, &self.name, &url))
			.collect()
	}
}

#[async_trait]
impl TransactionsProvider for BtcComAdapter {
	#[tracing::instrument(skip(self), fields(provider = %self.name))]
	async fn get_transactions(&self, address: &str) -> Result<Vec<String>, ProviderError> {
		let address = self.legacy_address(address)?;
		let url = self.url(&format!("address/{}/tx", segment(&address)));

		let items = self.list(&url).await?;
		Ok(dedup_txids(
			items
				.iter()
				.filter_map(|item| item.get("hash").and_then(Value::as_str))
				.map(str::to_string),
		))
	}
}

#[async_trait]
impl TransactionProvider for BtcComAdapter {
	#[tracing::instrument(skip(self), fields(provider = %self.name))]
	async fn get_transaction(&self, txid: &str) -> Result<TransactionDetail, ProviderError> {
		let url = self.url(&format!("tx/{}", segment(txid)));
		let data = self.data(&url).await?;
		if data.is_null() {
			return Err(ProviderError::malformed(
				"transaction not found",
				provider_metadata(&self.name, &url),
			));
		}
		Ok(TransactionDetail::Raw(data))
	}
}

#[async_trait]
impl BlockHeightProvider for BtcComAdapter {
	#[tracing::instrument(skip(self), fields(provider = %self.name))]
	async fn get_block_number(&self) -> Result<u64, ProviderError> {
		let url = self.url("block/latest");
		let data = self.data(&url).await?;
		require_u64(&data, &["height"], &self.name, &url)
	}
}
