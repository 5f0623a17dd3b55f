//! rest.bitcoin.com (BCH only).
//!
//! Transaction lookups are normalized from its Insight-style JSON.

use async_trait::async_trait;
use serde_json::Value;

use crate::{
	models::{Chain, Transaction, TransactionDetail, TxPart, Unspent},
	services::providers::{
		adapters::common::{
			coins_to_satoshi, combine_balance, dedup_txids, first_str, first_u64, i64_from_json,
			join_url, provider_metadata, rejection_reason, require_array, require_str,
			require_u64, segment, u64_from_json,
		},
		BalanceProvider, BlockHeightProvider, BroadcastProvider, HttpTransport, ProviderAdapter,
		ProviderError, RawTransactionProvider, TransactionProvider, TransactionsProvider,
		UnspentProvider,
	},
};

pub struct BitcoinComAdapter {
	name: String,
	chain: Chain,
	base_url: String,
	transport: HttpTransport,
}

impl BitcoinComAdapter {
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
		"https://rest.bitcoin.com/v2"
	}

	fn url(&self, path: &str) -> String {
		join_url(&self.base_url, path)
	}

	fn malformed(&self, msg: impl Into<String>, url: &str) -> ProviderError {
		ProviderError::malformed(msg, provider_metadata(&self.name, url))
	}

	/// Satoshi amount from a `*Sat` integer field or a decimal coin field.
	fn amount(
		&self,
		item: &Value,
		sat_field: &str,
		coin_field: &str,
		url: &str,
	) -> Result<u64, ProviderError> {
		first_u64(item, &[sat_field])
			.or_else(|| item.get(coin_field).and_then(coins_to_satoshi))
			.ok_or_else(|| self.malformed(format!("missing amount {}", coin_field), url))
	}

	fn input(&self, vin: &Value, url: &str) -> Result<TxPart, ProviderError> {
		let address = vin.get("addr").and_then(Value::as_str).map(str::to_string);
		let script = vin
			.pointer("/scriptSig/asm")
			.and_then(Value::as_str)
			.unwrap_or_default();

		// Coinbase inputs carry no value.
		let amount = if vin.get("coinbase").is_some() {
			0
		} else {
			self.amount(vin, "valueSat", "value", url)?
		};
		Ok(TxPart::new(address, amount, script))
	}

	fn output(&self, vout: &Value, url: &str) -> Result<TxPart, ProviderError> {
		let address = vout
			.pointer("/scriptPubKey/addresses/0")
			.and_then(Value::as_str)
			.map(str::to_string);
		let script = vout
			.pointer("/scriptPubKey/asm")
			.or_else(|| vout.pointer("/scriptPubKey/hex"))
			.and_then(Value::as_str)
			.unwrap_or_default();
		let amount = self.amount(vout, "valueSat", "value", url)?;
		Ok(TxPart::new(address, amount, script))
	}

	fn normalize(&self, body: &Value, url: &str) -> Result<Transaction, ProviderError> {
		let txid = require_str(body, &["txid"], &self.name, url)?;
		let block_height = body
			.get("blockheight")
			.and_then(i64_from_json)
			.and_then(|h| u64::try_from(h).ok());

		let coins = |field: &str| -> Result<u64, ProviderError> {
			match body.get(field) {
				None | Some(Value::Null) => Ok(0),
				Some(value) => coins_to_satoshi(value)
					.ok_or_else(|| self.malformed(format!("invalid amount {}", field), url)),
			}
		};

		let mut tx = Transaction::new(
			txid,
			block_height,
			coins("valueIn")?,
			coins("valueOut")?,
			coins("fees")?,
		);
		for vin in require_array(body.get("vin").unwrap_or(&Value::Null), "vin", &self.name, url)? {
			tx.add_input(self.input(vin, url)?);
		}
		for vout in require_array(body.get("vout").unwrap_or(&Value::Null), "vout", &self.name, url)? {
			tx.add_output(self.output(vout, url)?);
		}
		Ok(tx)
	}
}

impl ProviderAdapter for BitcoinComAdapter {
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
impl BalanceProvider for BitcoinComAdapter {
	#[tracing::instrument(skip(self), fields(provider = %self.name))]
	async fn get_balance(&self, address: &str) -> Result<u64, ProviderError> {
		let url = self.url(&format!("address/details/{}", segment(address)));
		let body: Value = self.transport.get_json(&url).await?;

		let confirmed = body
			.get("balanceSat")
			.and_then(i64_from_json)
			.ok_or_else(|| self.malformed("missing balanceSat", &url))?;
		let unconfirmed = body
			.get("unconfirmedBalanceSat")
			.and_then(i64_from_json)
			.unwrap_or(0);
		combine_balance(confirmed, unconfirmed, &self.name, &url)
	}
}

#[async_trait]
impl UnspentProvider for BitcoinComAdapter {
	#[tracing::instrument(skip(self), fields(provider = %self.name))]
	async fn get_unspent(&self, address: &str) -> Result<Vec<Unspent>, ProviderError> {
		let url = self.url(&format!("address/utxo/{}", segment(address)));
		let body: Value = self.transport.get_json(&url).await?;

		// The locking script is reported once for the whole address.
		let script = first_str(&body, &["scriptPubKey"]);
		let utxos = require_array(
			body.get("utxos").unwrap_or(&Value::Null),
			"utxos",
			&self.name,
			&url,
		)?;

		utxos
			.iter()
			.map(|item| {
				let txid = require_str(item, &["txid"], &self.name, &url)?;
				let vout = require_u64(item, &["vout"], &self.name, &url)?;
				let vout = u32::try_from(vout)
					.map_err(|_| self.malformed(format!("output index {} out of range", vout), &url))?;
				let amount = self.amount(item, "satoshis", "amount", &url)?;
				let confirmations = item
					.get("confirmations")
					.and_then(i64_from_json)
					.map(|c| c.max(0) as u64)
					.unwrap_or(0);
				Ok(Unspent::new(
					amount,
					confirmations,
					script.map(str::to_string),
					txid,
					vout,
				))
			})
			.collect()
	}
}

#[async_trait]
impl TransactionsProvider for BitcoinComAdapter {
	#[tracing::instrument(skip(self), fields(provider = %self.name))]
	async fn get_transactions(&self, address: &str) -> Result<Vec<String>, ProviderError> {
		let url = self.url(&format!("address/details/{}", segment(address)));
		let body: Value = self.transport.get_json(&url).await?;

		let txids = require_array(
			body.get("transactions").unwrap_or(&Value::Null),
			"transactions",
			&self.name,
			&url,
		)?;
		Ok(dedup_txids(
			txids
				.iter()
				.filter_map(Value::as_str)
				.map(str::to_string),
		))
	}
}

#[async_trait]
impl TransactionProvider for BitcoinComAdapter {
	#[tracing::instrument(skip(self), fields(provider = %self.name))]
	async fn get_transaction(&self, txid: &str) -> Result<TransactionDetail, ProviderError> {
		let url = self.url(&format!("transaction/details/{}", segment(txid)));
		let body: Value = self.transport.get_json(&url).await?;
		self.normalize(&body, &url).map(TransactionDetail::Normalized)
	}
}

#[async_trait]
impl RawTransactionProvider for BitcoinComAdapter {
	#[tracing::instrument(skip(self), fields(provider = %self.name))]
	async fn get_raw_transaction(&self, txid: &str) -> Result<Value, ProviderError> {
		let url = self.url(&format!(
			"rawtransactions/getRawTransaction/{}?verbose=true",
			segment(txid)
		));
		self.transport.get_json(&url).await
	}
}

#[async_trait]
impl BroadcastProvider for BitcoinComAdapter {
	#[tracing::instrument(skip(self, tx_hex), fields(provider = %self.name))]
	async fn broadcast(&self, tx_hex: &str) -> Result<(), ProviderError> {
		let url = self.url(&format!("rawtransactions/sendRawTransaction/{}", segment(tx_hex)));
		let reply = self.transport.get(&url).await?;

		if reply.status == 400 {
			let reason = serde_json::from_str::<Value>(&reply.body)
				.ok()
				.and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
				.or_else(|| rejection_reason(&reply.body).map(str::to_string));
			if let Some(reason) = reason.filter(|reason| !reason.trim().is_empty()) {
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
impl BlockHeightProvider for BitcoinComAdapter {
	#[tracing::instrument(skip(self), fields(provider = %self.name))]
	async fn get_block_number(&self) -> Result<u64, ProviderError> {
		let url = self.url("blockchain/getBlockCount");
		let body: Value = self.transport.get_json(&url).await?;
		u64_from_json(&body)
			.ok_or_else(|| self.malformed("block count is not a number", &url))
	}
}
