use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One input or output of a normalized transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxPart {
	/// None for non-standard scripts or coinbase inputs
	pub address: Option<String>,
	/// Value in satoshi
	pub amount: u64,
	/// Script in the provider's rendering (asm or hex)
	pub script: String,
}

impl TxPart {
	pub fn new(address: Option<String>, amount: u64, script: impl Into<String>) -> Self {
		Self {
			address,
			amount,
			script: script.into(),
		}
	}
}

/// Provider-agnostic transaction detail, amounts in satoshi
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
	pub txid: String,
	/// None while unconfirmed
	pub block_height: Option<u64>,
	pub value_in: u64,
	pub value_out: u64,
	pub fee: u64,
	pub inputs: Vec<TxPart>,
	pub outputs: Vec<TxPart>,
}

impl Transaction {
	pub fn new(
		txid: impl Into<String>,
		block_height: Option<u64>,
		value_in: u64,
		value_out: u64,
		fee: u64,
	) -> Self {
		Self {
			txid: txid.into(),
			block_height,
			value_in,
			value_out,
			fee,
			inputs: Vec::new(),
			outputs: Vec::new(),
		}
	}

	pub fn add_input(&mut self, part: TxPart) {
		self.inputs.push(part);
	}

	pub fn add_output(&mut self, part: TxPart) {
		self.outputs.push(part);
	}

	/// `value_in - value_out == fee`
	pub fn is_balanced(&self) -> bool {
		self.value_in.checked_sub(self.value_out) == Some(self.fee)
	}

	/// Value of the output at `index`, if present.
	pub fn output_amount(&self, index: usize) -> Option<u64> {
		self.outputs.get(index).map(|part| part.amount)
	}
}

/// Transaction lookup result; the shape depends on the adapter that answered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", content = "payload", rename_all = "lowercase")]
pub enum TransactionDetail {
	/// Provider JSON, untouched
	Raw(Value),
	Normalized(Transaction),
}

impl TransactionDetail {
	pub fn as_normalized(&self) -> Option<&Transaction> {
		match self {
			TransactionDetail::Normalized(tx) => Some(tx),
			TransactionDetail::Raw(_) => None,
		}
	}

	pub fn is_raw(&self) -> bool {
		matches!(self, TransactionDetail::Raw(_))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_is_balanced() {
		let tx = Transaction::new("aa", Some(10), 10_000, 9_000, 1_000);
		assert!(tx.is_balanced());

		let tx = Transaction::new("aa", Some(10), 10_000, 9_000, 999);
		assert!(!tx.is_balanced());

		let tx = Transaction::new("aa", None, 0, 9_000, 0);
		assert!(!tx.is_balanced());
	}

	#[test]
	fn test_detail_tagging() {
		let raw = TransactionDetail::Raw(json!({"txid": "aa"}));
		assert_eq!(
			serde_json::to_value(&raw).unwrap(),
			json!({"shape": "raw", "payload": {"txid": "aa"}})
		);

		let mut tx = Transaction::new("bb", None, 0, 0, 0);
		tx.add_output(TxPart::new(None, 5, "OP_RETURN"));
		let normalized = TransactionDetail::Normalized(tx.clone());
		let value = serde_json::to_value(&normalized).unwrap();
		assert_eq!(value["shape"], "normalized");
		assert_eq!(value["payload"]["outputs"][0]["amount"], 5);

		let decoded: TransactionDetail = serde_json::from_value(value).unwrap();
		assert_eq!(decoded.as_normalized(), Some(&tx));
		assert!(raw.is_raw());
	}
}
