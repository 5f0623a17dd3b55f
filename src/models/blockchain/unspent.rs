use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// One confirmation
pub const TX_TRUST_LOW: u64 = 1;
/// Six confirmations
pub const TX_TRUST_MEDIUM: u64 = 6;
/// Thirty confirmations
pub const TX_TRUST_HIGH: u64 = 30;

/// An unspent transaction output.
///
/// Identity is the outpoint `(txid, txindex)`: two outputs of the same transaction
/// stay distinct even when their amounts are equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unspent {
	/// Value in satoshi
	pub amount: u64,
	pub confirmations: u64,
	/// Hex locking script, when the provider reports it
	#[serde(default)]
	pub script: Option<String>,
	pub txid: String,
	/// Output index within `txid` (`vout`)
	pub txindex: u32,
}

impl Unspent {
	pub fn new(
		amount: u64,
		confirmations: u64,
		script: Option<String>,
		txid: impl Into<String>,
		txindex: u32,
	) -> Self {
		Self {
			amount,
			confirmations,
			script,
			txid: txid.into(),
			txindex,
		}
	}

	/// `txid:txindex`
	pub fn outpoint(&self) -> String {
		format!("{}:{}", self.txid, self.txindex)
	}

	/// Whether the output has at least `level` confirmations.
	pub fn is_trusted(&self, level: u64) -> bool {
		self.confirmations >= level
	}

	/// Looser comparison on amount and txid only, ignoring the output index.
	pub fn same_amount_and_txid(&self, other: &Self) -> bool {
		self.amount == other.amount && self.txid == other.txid
	}
}

impl PartialEq for Unspent {
	fn eq(&self, other: &Self) -> bool {
		self.txid == other.txid && self.txindex == other.txindex
	}
}

impl Eq for Unspent {}

impl Hash for Unspent {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.txid.hash(state);
		self.txindex.hash(state);
	}
}
