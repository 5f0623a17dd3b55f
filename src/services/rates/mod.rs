//! Exchange rates and currency conversion.
//!
//! - `cache`: per-currency TTL cache over ordered rate sources
//! - `converter`: satoshi to currency amounts and back
//! - `error`: currency and conversion errors
//! - `source`: fixed units and remote price APIs

mod cache;
mod converter;
mod error;
mod source;

pub use cache::{CachedRate, RateCache};
pub use converter::{
	from_base_units, parse_amount, parse_currency, to_base_units, AmountInput, CurrencyConverter,
};
pub use error::CurrencyError;
pub use source::{satoshis_for_price, BitpayRates, CoinGeckoRates, FixedRate, RateSource};
