//! Conversion between satoshi and decimal currency amounts.
//!
//! Conversions always truncate toward zero: an amount is never rounded up to more
//! satoshi, and a formatted amount never shows more than the satoshi are worth.

use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};
use std::{collections::HashMap, str::FromStr, sync::Arc};

use crate::{
	models::Currency,
	services::rates::{CurrencyError, RateCache},
};

fn amount_metadata(amount: &str) -> Option<HashMap<String, String>> {
	Some(HashMap::from([("amount".to_string(), amount.to_string())]))
}

/// Parses a currency code, case-insensitively.
pub fn parse_currency(code: &str) -> Result<Currency, CurrencyError> {
	Currency::from_code(code).ok_or_else(|| {
		CurrencyError::unsupported_currency(
			"unknown currency code",
			None,
			Some(HashMap::from([("currency".to_string(), code.to_string())])),
		)
	})
}

/// Parses a decimal amount in plain or scientific notation.
pub fn parse_amount(amount: &str) -> Result<Decimal, CurrencyError> {
	let trimmed = amount.trim();
	Decimal::from_str(trimmed)
		.or_else(|_| Decimal::from_scientific(trimmed))
		.map_err(|e| {
			CurrencyError::invalid_amount(
				"amount is not a decimal number",
				Some(Box::new(e)),
				amount_metadata(amount),
			)
		})
}

/// `floor(satoshis_per_unit * amount)`.
pub fn to_base_units(amount: Decimal, satoshis_per_unit: u64) -> Result<u64, CurrencyError> {
	if amount.is_sign_negative() && !amount.is_zero() {
		return Err(CurrencyError::invalid_amount(
			"amount is negative",
			None,
			amount_metadata(&amount.to_string()),
		));
	}

	let overflow = || {
		CurrencyError::amount_overflow(
			"amount exceeds the base unit range",
			None,
			amount_metadata(&amount.to_string()),
		)
	};
	Decimal::from(satoshis_per_unit)
		.checked_mul(amount)
		.ok_or_else(overflow)?
		.trunc()
		.to_u64()
		.ok_or_else(overflow)
}

/// `base_units / satoshis_per_unit`, truncated to `precision` places, in plain notation
/// without trailing zeros.
pub fn from_base_units(
	base_units: u64,
	satoshis_per_unit: u64,
	precision: u32,
) -> Result<String, CurrencyError> {
	let value = Decimal::from(base_units)
		.checked_div(Decimal::from(satoshis_per_unit))
		.ok_or_else(|| {
			CurrencyError::invalid_amount(
				"exchange rate is zero",
				None,
				amount_metadata(&base_units.to_string()),
			)
		})?;

	Ok(value
		.round_dp_with_strategy(precision, RoundingStrategy::ToZero)
		.normalize()
		.to_string())
}

/// Values usable as a decimal amount
pub trait AmountInput {
	fn to_amount(&self) -> Result<Decimal, CurrencyError>;
}

impl AmountInput for &str {
	fn to_amount(&self) -> Result<Decimal, CurrencyError> {
		parse_amount(self)
	}
}

impl AmountInput for String {
	fn to_amount(&self) -> Result<Decimal, CurrencyError> {
		parse_amount(self)
	}
}

impl AmountInput for Decimal {
	fn to_amount(&self) -> Result<Decimal, CurrencyError> {
		Ok(*self)
	}
}

impl AmountInput for u64 {
	fn to_amount(&self) -> Result<Decimal, CurrencyError> {
		Ok(Decimal::from(*self))
	}
}

/// Amount conversion priced through a [`RateCache`]
#[derive(Clone)]
pub struct CurrencyConverter {
	cache: Arc<RateCache>,
}

impl CurrencyConverter {
	pub fn new(cache: Arc<RateCache>) -> Self {
		Self { cache }
	}

	pub fn cache(&self) -> &Arc<RateCache> {
		&self.cache
	}

	/// Satoshi worth of `amount` units of `currency`, using the cached rate.
	pub async fn convert_to_base_units(
		&self,
		amount: impl AmountInput,
		currency: Currency,
	) -> Result<u64, CurrencyError> {
		let amount = amount.to_amount()?;
		let rate = self.cache.get_rate(currency).await?;
		to_base_units(amount, rate)
	}

	/// Like [`Self::convert_to_base_units`], always fetching a fresh rate.
	pub async fn convert_to_base_units_uncached(
		&self,
		amount: impl AmountInput,
		currency: Currency,
	) -> Result<u64, CurrencyError> {
		let amount = amount.to_amount()?;
		let rate = self.cache.fetch_rate(currency).await?;
		to_base_units(amount, rate)
	}

	/// `base_units` rendered in `currency`, using the cached rate.
	pub async fn format_from_base_units(
		&self,
		base_units: u64,
		currency: Currency,
	) -> Result<String, CurrencyError> {
		let rate = self.cache.get_rate(currency).await?;
		from_base_units(base_units, rate, currency.precision())
	}

	pub async fn format_from_base_units_uncached(
		&self,
		base_units: u64,
		currency: Currency,
	) -> Result<String, CurrencyError> {
		let rate = self.cache.fetch_rate(currency).await?;
		from_base_units(base_units, rate, currency.precision())
	}
}
