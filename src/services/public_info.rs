//! Address lookups expressed in a display currency.

use std::{collections::HashMap, sync::Arc};

use crate::{
	models::Chain,
	services::{
		gateway::{Gateway, GatewayError},
		rates::{parse_currency, CurrencyConverter, CurrencyError},
	},
};

/// Balance and history of an address, composed from the gateway and the converters
#[derive(Clone)]
pub struct PublicInformation {
	gateway: Arc<Gateway>,
	converters: HashMap<Chain, CurrencyConverter>,
}

impl PublicInformation {
	pub fn new(gateway: Arc<Gateway>, converters: HashMap<Chain, CurrencyConverter>) -> Self {
		Self {
			gateway,
			converters,
		}
	}

	/// Sum of the address's unspent outputs, formatted in `currency` (case-insensitive).
	#[tracing::instrument(skip(self))]
	pub async fn get_balance(
		&self,
		chain: Chain,
		address: &str,
		currency: &str,
	) -> Result<String, GatewayError> {
		let currency = parse_currency(currency)?;
		let converter = self.converters.get(&chain).ok_or_else(|| {
			GatewayError::permanent_request(
				"no currency converter for chain",
				None,
				Some(HashMap::from([("chain".to_string(), chain.to_string())])),
			)
		})?;

		let unspent = self.gateway.get_unspent(chain, address).await?;
		let total = unspent
			.iter()
			.try_fold(0u64, |acc, utxo| acc.checked_add(utxo.amount))
			.ok_or_else(|| {
				CurrencyError::amount_overflow("unspent total exceeds u64", None, None)
			})?;

		Ok(converter.format_from_base_units(total, currency).await?)
	}

	pub async fn get_transactions(
		&self,
		chain: Chain,
		address: &str,
	) -> Result<Vec<String>, GatewayError> {
		self.gateway.get_transactions(chain, address).await
	}
}
