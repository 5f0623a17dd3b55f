//! Mock implementations of provider operations.
//!
//! - [`MockBalanceProvider`], [`MockUnspentProvider`], [`MockTransactionProvider`],
//!   [`MockBroadcastProvider`], [`MockBlockHeightProvider`]: one mock per operation trait
//! - [`MockAdapter`]: a named adapter exposing whichever operation mocks it was given

use async_trait::async_trait;
use mockall::mock;
use std::sync::Arc;

use utxo_gateway::{
	models::{Chain, TransactionDetail, Unspent},
	services::providers::{
		BalanceProvider, BlockHeightProvider, BroadcastProvider, ProviderAdapter, ProviderError,
		TransactionProvider, TransientKind, UnspentProvider,
	},
};

mock! {
	pub BalanceProvider {}

	#[async_trait]
	impl BalanceProvider for BalanceProvider {
		async fn get_balance(&self, address: &str) -> Result<u64, ProviderError>;
	}
}

mock! {
	pub UnspentProvider {}

	#[async_trait]
	impl UnspentProvider for UnspentProvider {
		async fn get_unspent(&self, address: &str) -> Result<Vec<Unspent>, ProviderError>;
	}
}

mock! {
	pub TransactionProvider {}

	#[async_trait]
	impl TransactionProvider for TransactionProvider {
		async fn get_transaction(&self, txid: &str) -> Result<TransactionDetail, ProviderError>;
	}
}

mock! {
	pub BroadcastProvider {}

	#[async_trait]
	impl BroadcastProvider for BroadcastProvider {
		async fn broadcast(&self, tx_hex: &str) -> Result<(), ProviderError>;
	}
}

mock! {
	pub BlockHeightProvider {}

	#[async_trait]
	impl BlockHeightProvider for BlockHeightProvider {
		async fn get_block_number(&self) -> Result<u64, ProviderError>;
	}
}

/// Adapter built from operation mocks; operations without a mock are unsupported.
pub struct MockAdapter {
	name: String,
	chain: Chain,
	balance: Option<MockBalanceProvider>,
	unspent: Option<MockUnspentProvider>,
	transaction: Option<MockTransactionProvider>,
	broadcaster: Option<MockBroadcastProvider>,
	block_height: Option<MockBlockHeightProvider>,
}

impl MockAdapter {
	pub fn new(name: &str, chain: Chain) -> Self {
		Self {
			name: name.to_string(),
			chain,
			balance: None,
			unspent: None,
			transaction: None,
			broadcaster: None,
			block_height: None,
		}
	}

	pub fn with_balance(mut self, mock: MockBalanceProvider) -> Self {
		self.balance = Some(mock);
		self
	}

	pub fn with_unspent(mut self, mock: MockUnspentProvider) -> Self {
		self.unspent = Some(mock);
		self
	}

	pub fn with_transaction(mut self, mock: MockTransactionProvider) -> Self {
		self.transaction = Some(mock);
		self
	}

	pub fn with_broadcaster(mut self, mock: MockBroadcastProvider) -> Self {
		self.broadcaster = Some(mock);
		self
	}

	pub fn with_block_height(mut self, mock: MockBlockHeightProvider) -> Self {
		self.block_height = Some(mock);
		self
	}

	pub fn shared(self) -> Arc<dyn ProviderAdapter> {
		Arc::new(self)
	}
}

impl ProviderAdapter for MockAdapter {
	fn name(&self) -> &str {
		&self.name
	}

	fn chain(&self) -> Chain {
		self.chain
	}

	fn balance(&self) -> Option<&dyn BalanceProvider> {
		self.balance.as_ref().map(|m| m as &dyn BalanceProvider)
	}

	fn unspent(&self) -> Option<&dyn UnspentProvider> {
		self.unspent.as_ref().map(|m| m as &dyn UnspentProvider)
	}

	fn transaction(&self) -> Option<&dyn TransactionProvider> {
		self.transaction.as_ref().map(|m| m as &dyn TransactionProvider)
	}

	fn broadcaster(&self) -> Option<&dyn BroadcastProvider> {
		self.broadcaster.as_ref().map(|m| m as &dyn BroadcastProvider)
	}

	fn block_height(&self) -> Option<&dyn BlockHeightProvider> {
		self.block_height.as_ref().map(|m| m as &dyn BlockHeightProvider)
	}
}

pub fn timeout_error() -> ProviderError {
	ProviderError::transient(TransientKind::Timeout, "request timed out", None, None)
}

pub fn status_error(status: u16) -> ProviderError {
	ProviderError::transient(TransientKind::HttpStatus(status), "bad status", None, None)
}
