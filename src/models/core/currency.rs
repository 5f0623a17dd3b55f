use serde::{Deserialize, Serialize};
use std::fmt;

/// Denominations accepted by the converter.
///
/// Units of BCH/BTC have a fixed satoshi value; fiat currencies are priced by rate sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
	Satoshi,
	Ubch,
	Mbch,
	Bch,
	Ubtc,
	Mbtc,
	Btc,
	Usd,
}

impl Currency {
	/// Every supported currency, in listing order
	pub const ALL: [Currency; 8] = [
		Currency::Satoshi,
		Currency::Ubch,
		Currency::Mbch,
		Currency::Bch,
		Currency::Ubtc,
		Currency::Mbtc,
		Currency::Btc,
		Currency::Usd,
	];

	/// Case-insensitive lookup by code.
	pub fn from_code(code: &str) -> Option<Self> {
		let code = code.trim().to_ascii_lowercase();
		Self::ALL.into_iter().find(|c| c.code() == code)
	}

	pub fn code(&self) -> &'static str {
		match self {
			Currency::Satoshi => "satoshi",
			Currency::Ubch => "ubch",
			Currency::Mbch => "mbch",
			Currency::Bch => "bch",
			Currency::Ubtc => "ubtc",
			Currency::Mbtc => "mbtc",
			Currency::Btc => "btc",
			Currency::Usd => "usd",
		}
	}

	pub fn display_name(&self) -> &'static str {
		match self {
			Currency::Satoshi => "Satoshi",
			Currency::Ubch => "Microbitcoincash",
			Currency::Mbch => "Millibitcoincash",
			Currency::Bch => "BitcoinCash",
			Currency::Ubtc => "Microbitcoin",
			Currency::Mbtc => "Millibitcoin",
			Currency::Btc => "Bitcoin",
			Currency::Usd => "United States Dollar",
		}
	}

	/// Decimal places kept when formatting amounts in this currency
	pub fn precision(&self) -> u32 {
		match self {
			Currency::Satoshi => 0,
			Currency::Ubch | Currency::Ubtc | Currency::Usd => 2,
			Currency::Mbch | Currency::Mbtc => 5,
			Currency::Bch | Currency::Btc => 8,
		}
	}

	/// Satoshi per unit for denominations with a fixed value.
	pub fn fixed_satoshis(&self) -> Option<u64> {
		match self {
			Currency::Satoshi => Some(1),
			Currency::Ubch | Currency::Ubtc => Some(100),
			Currency::Mbch | Currency::Mbtc => Some(100_000),
			Currency::Bch | Currency::Btc => Some(100_000_000),
			Currency::Usd => None,
		}
	}

	pub fn is_fixed(&self) -> bool {
		self.fixed_satoshis().is_some()
	}
}

impl fmt::Display for Currency {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.code())
	}
}

/// `(code, display name)` for every supported currency.
pub fn supported_currencies() -> Vec<(&'static str, &'static str)> {
	Currency::ALL
		.iter()
		.map(|c| (c.code(), c.display_name()))
		.collect()
}
