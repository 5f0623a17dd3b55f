use std::{collections::HashMap, sync::Arc, time::Duration};

use crate::integration::mocks::MockRateSource;
use utxo_gateway::{
	models::{Chain, Currency},
	services::{
		providers::{ProviderError, TransientKind},
		rates::{CurrencyConverter, CurrencyError, RateCache, RateSource},
		settings::ServiceSettings,
	},
};

fn source(
	name: &'static str,
	calls: usize,
	result: fn() -> Result<u64, ProviderError>,
) -> MockRateSource {
	let mut mock = MockRateSource::new();
	mock.expect_name().return_const(name.to_string());
	mock.expect_satoshis_per_unit()
		.times(calls)
		.returning(move |_| result());
	mock
}

fn converter(sources: Vec<MockRateSource>, settings: Arc<ServiceSettings>) -> CurrencyConverter {
	let sources: Vec<Arc<dyn RateSource>> = sources
		.into_iter()
		.map(|s| Arc::new(s) as Arc<dyn RateSource>)
		.collect();
	let cache = RateCache::new(Chain::Btc, HashMap::from([(Currency::Usd, sources)]), settings);
	CurrencyConverter::new(Arc::new(cache))
}

#[tokio::test]
async fn test_rate_falls_back_to_second_source() {
	let converter = converter(
		vec![
			source("bitpay", 1, || {
				Err(ProviderError::transient(
					TransientKind::HttpStatus(502),
					"bad gateway",
					None,
					None,
				))
			}),
			source("coingecko", 1, || Ok(2_000)),
		],
		Arc::new(ServiceSettings::default()),
	);

	// 2000 satoshi per cent-precision dollar: $12.345 -> 24690 satoshi
	assert_eq!(
		converter
			.convert_to_base_units("12.345", Currency::Usd)
			.await
			.unwrap(),
		24_690
	);
	assert_eq!(
		converter
			.format_from_base_units(24_690, Currency::Usd)
			.await
			.unwrap(),
		"12.34"
	);
}

#[tokio::test]
async fn test_no_working_source_is_rate_unavailable() {
	let converter = converter(
		vec![source("bitpay", 1, || {
			Err(ProviderError::transient(TransientKind::Timeout, "timeout", None, None))
		})],
		Arc::new(ServiceSettings::default()),
	);
	assert!(matches!(
		converter.convert_to_base_units(1u64, Currency::Usd).await,
		Err(CurrencyError::RateUnavailable(_))
	));
}

#[tokio::test(start_paused = true)]
async fn test_rate_refreshes_after_ttl() {
	let settings = Arc::new(ServiceSettings::new(30, 60));
	let converter = converter(vec![source("bitpay", 2, || Ok(1_000))], settings.clone());

	converter.convert_to_base_units(1u64, Currency::Usd).await.unwrap();
	tokio::time::advance(Duration::from_secs(30)).await;
	converter.convert_to_base_units(1u64, Currency::Usd).await.unwrap();
	tokio::time::advance(Duration::from_secs(31)).await;
	converter.convert_to_base_units(1u64, Currency::Usd).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_shorter_ttl_applies_immediately() {
	let settings = Arc::new(ServiceSettings::default());
	let converter = converter(vec![source("bitpay", 2, || Ok(1_000))], settings.clone());

	converter.convert_to_base_units(1u64, Currency::Usd).await.unwrap();
	settings.set_rate_cache_time(5);
	tokio::time::advance(Duration::from_secs(6)).await;
	converter.convert_to_base_units(1u64, Currency::Usd).await.unwrap();
}

#[tokio::test]
async fn test_fixed_units_need_no_source() {
	let converter = converter(Vec::new(), Arc::new(ServiceSettings::default()));
	assert_eq!(
		converter
			.convert_to_base_units("1.5", Currency::Mbtc)
			.await
			.unwrap(),
		150_000
	);
	assert_eq!(
		converter
			.format_from_base_units(123_456_789, Currency::Btc)
			.await
			.unwrap(),
		"1.23456789"
	);
	assert!(matches!(
		converter.convert_to_base_units("-1", Currency::Satoshi).await,
		Err(CurrencyError::InvalidAmount(_))
	));
}
