//! Multi-provider gateway.
//!
//! Every public operation resolves the `(chain, operation)` route of its dispatch
//! tables and hands it to [`execute`], which tries the adapters in order.
//!
//! - `dispatch`: dispatch tables, attempt classification and the fallback loop
//! - `error`: caller-visible errors

use futures::{future::BoxFuture, FutureExt};
use serde_json::Value;
use std::{collections::HashMap, sync::Arc};

use crate::{
	models::{Chain, Operation, TransactionDetail, Unspent},
	services::providers::{ProviderAdapter, ProviderError},
};

mod dispatch;
mod error;

pub use dispatch::{execute, AttemptOutcome, DispatchTable};
pub use error::GatewayError;

fn missing(operation: Operation) -> ProviderError {
	ProviderError::unsupported(format!("{} is not offered", operation), None, None)
}

/// Fallback-aware entry point for every chain query and broadcast
#[derive(Clone, Default)]
pub struct Gateway {
	tables: HashMap<Chain, DispatchTable>,
}

impl Gateway {
	pub fn new(tables: HashMap<Chain, DispatchTable>) -> Self {
		Self { tables }
	}

	pub fn with_table(mut self, chain: Chain, table: DispatchTable) -> Self {
		self.tables.insert(chain, table);
		self
	}

	/// Adapters tried for `operation` on `chain`, in order.
	pub fn route(&self, chain: Chain, operation: Operation) -> &[Arc<dyn ProviderAdapter>] {
		self.tables
			.get(&chain)
			.map(|table| table.route(operation))
			.unwrap_or_default()
	}

	async fn run<T, F>(
		&self,
		chain: Chain,
		operation: Operation,
		call: F,
	) -> Result<T, GatewayError>
	where
		F: Fn(Arc<dyn ProviderAdapter>) -> BoxFuture<'static, Result<T, ProviderError>>,
	{
		execute(chain, operation, self.route(chain, operation), call).await
	}

	/// Confirmed plus unconfirmed balance of `address`, in satoshi.
	#[tracing::instrument(skip(self))]
	pub async fn get_balance(&self, chain: Chain, address: &str) -> Result<u64, GatewayError> {
		let address = address.to_string();
		self.run(chain, Operation::GetBalance, move |adapter| {
			let address = address.clone();
			async move {
				match adapter.balance() {
					Some(provider) => provider.get_balance(&address).await,
					None => Err(missing(Operation::GetBalance)),
				}
			}
			.boxed()
		})
		.await
	}

	#[tracing::instrument(skip(self))]
	pub async fn get_unspent(
		&self,
		chain: Chain,
		address: &str,
	) -> Result<Vec<Unspent>, GatewayError> {
		let address = address.to_string();
		self.run(chain, Operation::GetUnspent, move |adapter| {
			let address = address.clone();
			async move {
				match adapter.unspent() {
					Some(provider) => provider.get_unspent(&address).await,
					None => Err(missing(Operation::GetUnspent)),
				}
			}
			.boxed()
		})
		.await
	}

	/// Ids of the transactions touching `address`.
	#[tracing::instrument(skip(self))]
	pub async fn get_transactions(
		&self,
		chain: Chain,
		address: &str,
	) -> Result<Vec<String>, GatewayError> {
		let address = address.to_string();
		self.run(chain, Operation::GetTransactions, move |adapter| {
			let address = address.clone();
			async move {
				match adapter.transactions() {
					Some(provider) => provider.get_transactions(&address).await,
					None => Err(missing(Operation::GetTransactions)),
				}
			}
			.boxed()
		})
		.await
	}

	/// Transaction detail, raw or normalized depending on the answering provider.
	#[tracing::instrument(skip(self))]
	pub async fn get_transaction(
		&self,
		chain: Chain,
		txid: &str,
	) -> Result<TransactionDetail, GatewayError> {
		let txid = txid.to_string();
		self.run(chain, Operation::GetTransaction, move |adapter| {
			let txid = txid.clone();
			async move {
				match adapter.transaction() {
					Some(provider) => provider.get_transaction(&txid).await,
					None => Err(missing(Operation::GetTransaction)),
				}
			}
			.boxed()
		})
		.await
	}

	#[tracing::instrument(skip(self))]
	pub async fn get_raw_transaction(
		&self,
		chain: Chain,
		txid: &str,
	) -> Result<Value, GatewayError> {
		let txid = txid.to_string();
		self.run(chain, Operation::GetRawTransaction, move |adapter| {
			let txid = txid.clone();
			async move {
				match adapter.raw_transaction() {
					Some(provider) => provider.get_raw_transaction(&txid).await,
					None => Err(missing(Operation::GetRawTransaction)),
				}
			}
			.boxed()
		})
		.await
	}

	/// Submits a signed transaction.
	///
	/// A provider refusal is remembered while the remaining providers are tried; if none
	/// accepts, the result is [`GatewayError::BroadcastRejected`].
	#[tracing::instrument(skip(self, tx_hex))]
	pub async fn broadcast(&self, chain: Chain, tx_hex: &str) -> Result<(), GatewayError> {
		let tx_hex = tx_hex.trim().to_string();
		if tx_hex.is_empty() || tx_hex.len() % 2 != 0 || hex::decode(&tx_hex).is_err() {
			return Err(GatewayError::permanent_request(
				"transaction is not valid hex",
				None,
				Some(HashMap::from([("chain".to_string(), chain.to_string())])),
			));
		}

		self.run(chain, Operation::Broadcast, move |adapter| {
			let tx_hex = tx_hex.clone();
			async move {
				match adapter.broadcaster() {
					Some(provider) => provider.broadcast(&tx_hex).await,
					None => Err(missing(Operation::Broadcast)),
				}
			}
			.boxed()
		})
		.await
	}

	#[tracing::instrument(skip(self))]
	pub async fn get_block_number(&self, chain: Chain) -> Result<u64, GatewayError> {
		self.run(chain, Operation::GetBlockNumber, |adapter| {
			async move {
				match adapter.block_height() {
					Some(provider) => provider.get_block_number().await,
					None => Err(missing(Operation::GetBlockNumber)),
				}
			}
			.boxed()
		})
		.await
	}

	/// Value in satoshi of output `index` of `txid`.
	///
	/// Uses the transaction route, skipping providers that only return raw JSON.
	#[tracing::instrument(skip(self))]
	pub async fn get_output_amount(
		&self,
		chain: Chain,
		txid: &str,
		index: usize,
	) -> Result<u64, GatewayError> {
		let txid = txid.to_string();
		self.run(chain, Operation::GetTransaction, move |adapter| {
			let txid = txid.clone();
			async move {
				let provider = adapter
					.transaction()
					.ok_or_else(|| missing(Operation::GetTransaction))?;
				match provider.get_transaction(&txid).await? {
					TransactionDetail::Normalized(tx) => tx.output_amount(index).ok_or_else(|| {
						ProviderError::invalid_argument(
							format!("transaction has no output {}", index),
							None,
							Some(HashMap::from([("txid".to_string(), txid.clone())])),
						)
					}),
					TransactionDetail::Raw(_) => Err(ProviderError::unsupported(
						"provider returns raw transactions only",
						None,
						None,
					)),
				}
			}
			.boxed()
		})
		.await
	}
}
