//! Exchange-rate sources.
//!
//! A source answers one question: how many satoshi of the chain's native coin one unit
//! of a currency is worth right now. Failures use [`ProviderError`] so the cache can
//! apply the same fallback classification as the gateway.

use async_trait::async_trait;
use rust_decimal::{prelude::ToPrimitive, Decimal};
use serde_json::Value;

use crate::{
	models::{Chain, Currency},
	services::providers::{
		adapters::common::{decimal_from_json, join_url, provider_metadata, segment},
		HttpTransport, ProviderError,
	},
};

const SATOSHI_PER_COIN: u64 = 100_000_000;

#[async_trait]
pub trait RateSource: Send + Sync {
	fn name(&self) -> &str;

	/// Satoshi value of one unit of `currency`.
	async fn satoshis_per_unit(&self, currency: Currency) -> Result<u64, ProviderError>;
}

/// Satoshi bought by one currency unit at `price` currency units per coin, truncated.
pub fn satoshis_for_price(price: Decimal) -> Option<u64> {
	if price <= Decimal::ZERO {
		return None;
	}
	Decimal::from(SATOSHI_PER_COIN)
		.checked_div(price)?
		.trunc()
		.to_u64()
		.filter(|satoshis| *satoshis > 0)
}

/// Denomination with a constant satoshi value; never touches the network
#[derive(Debug, Clone, Copy)]
pub struct FixedRate {
	satoshis: u64,
}

impl FixedRate {
	pub fn new(satoshis: u64) -> Self {
		Self { satoshis }
	}

	/// Fixed source for `currency`, if it is a fixed unit.
	pub fn for_currency(currency: Currency) -> Option<Self> {
		currency.fixed_satoshis().map(Self::new)
	}
}

#[async_trait]
impl RateSource for FixedRate {
	fn name(&self) -> &str {
		"fixed"
	}

	async fn satoshis_per_unit(&self, _currency: Currency) -> Result<u64, ProviderError> {
		Ok(self.satoshis)
	}
}

fn coin_code(chain: Chain) -> &'static str {
	match chain {
		Chain::Bch => "bch",
		Chain::Btc => "btc",
	}
}

fn price_to_satoshis(
	price: Option<Decimal>,
	source: &str,
	url: &str,
) -> Result<u64, ProviderError> {
	price.and_then(satoshis_for_price).ok_or_else(|| {
		ProviderError::malformed(
			"rate is missing or not a positive number",
			provider_metadata(source, url),
		)
	})
}

/// BitPay single-rate endpoint
pub struct BitpayRates {
	chain: Chain,
	base_url: String,
	transport: HttpTransport,
}

impl BitpayRates {
	pub const DEFAULT_BASE_URL: &'static str = "https://bitpay.com/api";

	pub fn new(chain: Chain, base_url: Option<String>, transport: HttpTransport) -> Self {
		Self {
			chain,
			base_url: base_url.unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string()),
			transport,
		}
	}
}

#[async_trait]
impl RateSource for BitpayRates {
	fn name(&self) -> &str {
		"bitpay"
	}

	#[tracing::instrument(skip(self), fields(source = "bitpay"))]
	async fn satoshis_per_unit(&self, currency: Currency) -> Result<u64, ProviderError> {
		let url = join_url(
			&self.base_url,
			&format!("rates/{}/{}", coin_code(self.chain), segment(currency.code())),
		);
		let body: Value = self.transport.get_json(&url).await?;

		let rate = body
			.get("rate")
			.or_else(|| body.pointer("/data/rate"))
			.and_then(decimal_from_json);
		price_to_satoshis(rate, self.name(), &url)
	}
}

/// CoinGecko simple price endpoint
pub struct CoinGeckoRates {
	chain: Chain,
	base_url: String,
	transport: HttpTransport,
}

impl CoinGeckoRates {
	pub const DEFAULT_BASE_URL: &'static str = "https://api.coingecko.com/api/v3";

	pub fn new(chain: Chain, base_url: Option<String>, transport: HttpTransport) -> Self {
		Self {
			chain,
			base_url: base_url.unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string()),
			transport,
		}
	}

	fn coin_id(&self) -> &'static str {
		match self.chain {
			Chain::Bch => "bitcoin-cash",
			Chain::Btc => "bitcoin",
		}
	}
}

#[async_trait]
impl RateSource for CoinGeckoRates {
	fn name(&self) -> &str {
		"coingecko"
	}

	#[tracing::instrument(skip(self), fields(source = "coingecko"))]
	async fn satoshis_per_unit(&self, currency: Currency) -> Result<u64, ProviderError> {
		let url = join_url(
			&self.base_url,
			&format!(
				"simple/price?ids={}&vs_currencies={}",
				self.coin_id(),
				segment(currency.code())
			),
		);
		let body: Value = self.transport.get_json(&url).await?;

		let price = body
			.get(self.coin_id())
			.and_then(|prices| prices.get(currency.code()))
			.and_then(decimal_from_json);
		price_to_satoshis(price, self.name(), &url)
	}
}
