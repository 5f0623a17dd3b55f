//! Error types for exchange rates and amount conversion.

use crate::utils::logging::error::{BoxedSource, ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CurrencyError {
	#[error("Unsupported currency: {0}")]
	UnsupportedCurrency(ErrorContext),

	/// Negative, non-numeric or otherwise unusable amount
	#[error("Invalid amount: {0}")]
	InvalidAmount(ErrorContext),

	/// Result does not fit in 64-bit base units
	#[error("Amount overflow: {0}")]
	AmountOverflow(ErrorContext),

	/// Every rate source for the currency failed
	#[error("Rate unavailable: {0}")]
	RateUnavailable(ErrorContext),
}

impl CurrencyError {
	pub fn unsupported_currency(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::UnsupportedCurrency(ErrorContext::new(msg, source, metadata))
	}

	pub fn invalid_amount(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::InvalidAmount(ErrorContext::new(msg, source, metadata))
	}

	pub fn amount_overflow(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::AmountOverflow(ErrorContext::new(msg, source, metadata))
	}

	pub fn rate_unavailable(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::RateUnavailable(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn context(&self) -> &ErrorContext {
		match self {
			Self::UnsupportedCurrency(ctx)
			| Self::InvalidAmount(ctx)
			| Self::AmountOverflow(ctx)
			| Self::RateUnavailable(ctx) => ctx,
		}
	}
}

impl TraceableError for CurrencyError {
	fn trace_id(&self) -> String {
		self.context().trace_id.clone()
	}
}
