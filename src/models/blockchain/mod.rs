//! Chain identifiers, gateway operations and the provider-agnostic records they return.

use serde::{Deserialize, Serialize};
use std::fmt;

mod transaction;
mod unspent;

pub use transaction::{Transaction, TransactionDetail, TxPart};
pub use unspent::{Unspent, TX_TRUST_HIGH, TX_TRUST_LOW, TX_TRUST_MEDIUM};

/// Chains served by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
	/// Bitcoin Cash
	Bch,
	/// Bitcoin
	Btc,
}

impl Chain {
	pub const ALL: [Chain; 2] = [Chain::Bch, Chain::Btc];

	pub fn as_str(&self) -> &'static str {
		match self {
			Chain::Bch => "bch",
			Chain::Btc => "btc",
		}
	}
}

impl fmt::Display for Chain {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Logical operations a provider adapter may support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
	GetBalance,
	GetUnspent,
	GetTransactions,
	GetTransaction,
	GetRawTransaction,
	Broadcast,
	GetBlockNumber,
}

impl Operation {
	pub const ALL: [Operation; 7] = [
		Operation::GetBalance,
		Operation::GetUnspent,
		Operation::GetTransactions,
		Operation::GetTransaction,
		Operation::GetRawTransaction,
		Operation::Broadcast,
		Operation::GetBlockNumber,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			Operation::GetBalance => "get_balance",
			Operation::GetUnspent => "get_unspent",
			Operation::GetTransactions => "get_transactions",
			Operation::GetTransaction => "get_transaction",
			Operation::GetRawTransaction => "get_raw_transaction",
			Operation::Broadcast => "broadcast",
			Operation::GetBlockNumber => "get_block_number",
		}
	}
}

impl fmt::Display for Operation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
