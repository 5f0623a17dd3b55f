//! Mock implementation of an exchange-rate source.

use async_trait::async_trait;
use mockall::mock;

use utxo_gateway::{
	models::Currency,
	services::{providers::ProviderError, rates::RateSource},
};

mock! {
	pub RateSource {}

	#[async_trait]
	impl RateSource for RateSource {
		fn name(&self) -> &str;
		async fn satoshis_per_unit(&self, currency: Currency) -> Result<u64, ProviderError>;
	}
}
