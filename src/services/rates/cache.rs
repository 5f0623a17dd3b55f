//! Per-currency exchange-rate cache.
//!
//! Each currency has its own async mutex; the staleness check, the refresh and the
//! store happen under it, so concurrent callers of one currency trigger a single
//! refresh while other currencies proceed independently.

use std::{collections::HashMap, sync::Arc};
use tokio::{sync::Mutex, time::Instant};

use crate::{
	models::{Chain, Currency},
	services::{
		providers::ProviderError,
		rates::{CurrencyError, FixedRate, RateSource},
		settings::ServiceSettings,
	},
	utils::{logging::error::BoxedSource, metrics::RATE_REFRESHES},
};

/// Last fetched rate of one currency
#[derive(Debug, Clone, Copy)]
pub struct CachedRate {
	/// None until the first successful fetch
	pub satoshis_per_unit: Option<u64>,
	pub last_update: Instant,
}

/// Memoized rate lookups for one chain's native coin
pub struct RateCache {
	chain: Chain,
	entries: HashMap<Currency, Mutex<CachedRate>>,
	sources: HashMap<Currency, Vec<Arc<dyn RateSource>>>,
	settings: Arc<ServiceSettings>,
}

impl RateCache {
	/// Creates a cache over `sources`; fixed units without sources get a [`FixedRate`].
	pub fn new(
		chain: Chain,
		mut sources: HashMap<Currency, Vec<Arc<dyn RateSource>>>,
		settings: Arc<ServiceSettings>,
	) -> Self {
		for currency in Currency::ALL {
			if let Some(fixed) = FixedRate::for_currency(currency) {
				sources
					.entry(currency)
					.or_insert_with(|| vec![Arc::new(fixed) as Arc<dyn RateSource>]);
			}
		}

		let now = Instant::now();
		let entries = Currency::ALL
			.into_iter()
			.map(|currency| {
				(
					currency,
					Mutex::new(CachedRate {
						satoshis_per_unit: None,
						last_update: now,
					}),
				)
			})
			.collect();

		Self {
			chain,
			entries,
			sources,
			settings,
		}
	}

	pub fn chain(&self) -> Chain {
		self.chain
	}

	/// Changes the time-to-live for later lookups.
	pub fn set_ttl(&self, seconds: u64) {
		self.settings.set_rate_cache_time(seconds);
	}

	/// Snapshot of a currency's cache entry.
	pub async fn cached(&self, currency: Currency) -> Option<CachedRate> {
		match self.entries.get(&currency) {
			Some(entry) => Some(*entry.lock().await),
			None => None,
		}
	}

	/// Satoshi per unit of `currency`, refreshed when absent or older than the TTL.
	pub async fn get_rate(&self, currency: Currency) -> Result<u64, CurrencyError> {
		let entry = self.entries.get(&currency).ok_or_else(|| {
			CurrencyError::unsupported_currency(
				format!("no cache entry for {}", currency),
				None,
				None,
			)
		})?;

		let mut cached = entry.lock().await;
		let ttl = self.settings.rate_cache_ttl();
		let now = Instant::now();
		if let Some(rate) = cached.satoshis_per_unit {
			if now.duration_since(cached.last_update) <= ttl {
				return Ok(rate);
			}
		}

		let rate = self.fetch_rate(currency).await?;
		tracing::info!(
			chain = %self.chain,
			currency = %currency,
			satoshis_per_unit = rate,
			"exchange rate refreshed"
		);
		RATE_REFRESHES.with_label_values(&[currency.code()]).inc();
		*cached = CachedRate {
			satoshis_per_unit: Some(rate),
			last_update: now,
		};
		Ok(rate)
	}

	/// Asks the currency's sources in order, bypassing the cache.
	pub async fn fetch_rate(&self, currency: Currency) -> Result<u64, CurrencyError> {
		let sources = self
			.sources
			.get(&currency)
			.filter(|sources| !sources.is_empty())
			.ok_or_else(|| {
				CurrencyError::unsupported_currency(
					format!("no rate source configured for {}", currency),
					None,
					None,
				)
			})?;

		let mut last_error: Option<ProviderError> = None;
		for source in sources {
			match source.satoshis_per_unit(currency).await {
				Ok(rate) => return Ok(rate),
				Err(err @ (ProviderError::Transient { .. } | ProviderError::Unsupported(_))) => {
					tracing::debug!(
						source = source.name(),
						currency = %currency,
						error = %err,
						"rate source failed, trying next"
					);
					last_error = Some(err);
				}
				Err(err) => {
					return Err(CurrencyError::rate_unavailable(
						format!("rate source {} failed for {}", source.name(), currency),
						Some(Box::new(err)),
						None,
					));
				}
			}
		}

		Err(CurrencyError::rate_unavailable(
			format!("every rate source failed for {}", currency),
			last_error.map(|err| -> BoxedSource { Box::new(err) }),
			None,
		))
	}
}
