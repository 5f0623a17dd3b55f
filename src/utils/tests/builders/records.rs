//! Test helper utilities for canonical records
//!
//! - `UnspentBuilder`: Builder for creating test Unspent instances
//! - `TransactionBuilder`: Builder for creating test Transaction instances

use crate::models::{Transaction, TxPart, Unspent};

/// Builder for creating test Unspent instances
pub struct UnspentBuilder {
	amount: u64,
	confirmations: u64,
	script: Option<String>,
	txid: String,
	txindex: u32,
}

impl Default for UnspentBuilder {
	fn default() -> Self {
		Self {
			amount: 10_000,
			confirmations: 1,
			script: None,
			txid: "ab".repeat(32),
			txindex: 0,
		}
	}
}

impl UnspentBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn amount(mut self, amount: u64) -> Self {
		self.amount = amount;
		self
	}

	pub fn confirmations(mut self, confirmations: u64) -> Self {
		self.confirmations = confirmations;
		self
	}

	pub fn script(mut self, script: &str) -> Self {
		self.script = Some(script.to_string());
		self
	}

	pub fn txid(mut self, txid: &str) -> Self {
		self.txid = txid.to_string();
		self
	}

	pub fn txindex(mut self, txindex: u32) -> Self {
		self.txindex = txindex;
		self
	}

	pub fn build(self) -> Unspent {
		Unspent::new(
			self.amount,
			self.confirmations,
			self.script,
			self.txid,
			self.txindex,
		)
	}
}

/// Builder for creating test Transaction instances.
///
/// `value_in` and `value_out` follow the added parts unless set explicitly.
pub struct TransactionBuilder {
	txid: String,
	block_height: Option<u64>,
	fee: u64,
	value_in: Option<u64>,
	value_out: Option<u64>,
	inputs: Vec<TxPart>,
	outputs: Vec<TxPart>,
}

impl Default for TransactionBuilder {
	fn default() -> Self {
		Self {
			txid: "cd".repeat(32),
			block_height: None,
			fee: 0,
			value_in: None,
			value_out: None,
			inputs: Vec::new(),
			outputs: Vec::new(),
		}
	}
}

impl TransactionBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn txid(mut self, txid: &str) -> Self {
		self.txid = txid.to_string();
		self
	}

	pub fn block_height(mut self, height: u64) -> Self {
		self.block_height = Some(height);
		self
	}

	pub fn fee(mut self, fee: u64) -> Self {
		self.fee = fee;
		self
	}

	pub fn value_in(mut self, value: u64) -> Self {
		self.value_in = Some(value);
		self
	}

	pub fn value_out(mut self, value: u64) -> Self {
		self.value_out = Some(value);
		self
	}

	pub fn input(mut self, address: Option<&str>, amount: u64, script: &str) -> Self {
		self.inputs
			.push(TxPart::new(address.map(str::to_string), amount, script));
		self
	}

	pub fn output(mut self, address: Option<&str>, amount: u64, script: &str) -> Self {
		self.outputs
			.push(TxPart::new(address.map(str::to_string), amount, script));
		self
	}

	pub fn build(self) -> Transaction {
		let value_in = self
			.value_in
			.unwrap_or_else(|| self.inputs.iter().map(|p| p.amount).sum());
		let value_out = self
			.value_out
			.unwrap_or_else(|| self.outputs.iter().map(|p| p.amount).sum());
		let mut tx = Transaction::new(self.txid, self.block_height, value_in, value_out, self.fee);
		for part in self.inputs {
			tx.add_input(part);
		}
		for part in self.outputs {
			tx.add_output(part);
		}
		tx
	}
}
