//! Provider adapters: one remote API on one chain, mapped onto canonical records.
//!
//! Every operation is its own small trait. An adapter advertises what it can do through
//! the capability accessors of [`ProviderAdapter`]; an operation it lacks simply returns
//! `None` and the gateway never calls it.
//!
//! - `adapters`: concrete provider APIs
//! - `error`: failure classification shared with the gateway
//! - `transport`: HTTP access, timeouts and response limits

use async_trait::async_trait;
use serde_json::Value;

use crate::models::{Chain, Operation, TransactionDetail, Unspent};

pub mod adapters;
mod error;
pub mod transport;

pub use adapters::{
	BitcoinComAdapter, BitcoreAdapter, BlockchairAdapter, BtcComAdapter, EsploraAdapter,
};
pub use error::{ProviderError, TransientKind};
pub use transport::{HttpReply, HttpTransport, MAX_RESPONSE_BYTES};

/// Confirmed plus unconfirmed balance, in satoshi
#[async_trait]
pub trait BalanceProvider: Send + Sync {
	async fn get_balance(&self, address: &str) -> Result<u64, ProviderError>;
}

#[async_trait]
pub trait UnspentProvider: Send + Sync {
	async fn get_unspent(&self, address: &str) -> Result<Vec<Unspent>, ProviderError>;
}

/// Transaction ids touching an address
#[async_trait]
pub trait TransactionsProvider: Send + Sync {
	async fn get_transactions(&self, address: &str) -> Result<Vec<String>, ProviderError>;
}

#[async_trait]
pub trait TransactionProvider: Send + Sync {
	async fn get_transaction(&self, txid: &str) -> Result<TransactionDetail, ProviderError>;
}

/// Provider JSON (or hex wrapped in JSON) for one transaction
#[async_trait]
pub trait RawTransactionProvider: Send + Sync {
	async fn get_raw_transaction(&self, txid: &str) -> Result<Value, ProviderError>;
}

#[async_trait]
pub trait BroadcastProvider: Send + Sync {
	/// Submits a signed transaction; a refusal is [`ProviderError::Rejected`].
	async fn broadcast(&self, tx_hex: &str) -> Result<(), ProviderError>;
}

#[async_trait]
pub trait BlockHeightProvider: Send + Sync {
	async fn get_block_number(&self) -> Result<u64, ProviderError>;
}

/// A provider on one chain and the operations it supports
pub trait ProviderAdapter: Send + Sync {
	/// Name used in logs, metrics and configuration
	fn name(&self) -> &str;

	fn chain(&self) -> Chain;

	fn balance(&self) -> Option<&dyn BalanceProvider> {
		None
	}

	fn unspent(&self) -> Option<&dyn UnspentProvider> {
		None
	}

	fn transactions(&self) -> Option<&dyn TransactionsProvider> {
		None
	}

	fn transaction(&self) -> Option<&dyn TransactionProvider> {
		None
	}

	fn raw_transaction(&self) -> Option<&dyn RawTransactionProvider> {
		None
	}

	fn broadcaster(&self) -> Option<&dyn BroadcastProvider> {
		None
	}

	fn block_height(&self) -> Option<&dyn BlockHeightProvider> {
		None
	}

	fn supports(&self, operation: Operation) -> bool {
		match operation {
			Operation::GetBalance => self.balance().is_some(),
			Operation::GetUnspent => self.unspent().is_some(),
			Operation::GetTransactions => self.transactions().is_some(),
			Operation::GetTransaction => self.transaction().is_some(),
			Operation::GetRawTransaction => self.raw_transaction().is_some(),
			Operation::Broadcast => self.broadcaster().is_some(),
			Operation::GetBlockNumber => self.block_height().is_some(),
		}
	}
}
