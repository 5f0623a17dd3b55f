//! Prometheus metrics for provider fallback and rate refreshes.
//!
//! - `REGISTRY` holds every metric defined here.
//! - [`gather_metrics`] encodes them in the text exposition format; serving them is
//!   left to the embedding application.

use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

lazy_static! {
	/// Global Prometheus registry.
	pub static ref REGISTRY: Registry = Registry::new();

	/// Provider attempts per chain, operation, provider and outcome.
	///
	/// Outcome is one of `success`, `unsupported`, `transient`, `rejected` or `fatal`.
	pub static ref PROVIDER_ATTEMPTS: IntCounterVec = {
		let counter = IntCounterVec::new(
			Opts::new("provider_attempts_total", "Provider attempts by outcome"),
			&["chain", "operation", "provider", "outcome"],
		).expect("metric definition is valid");
		REGISTRY.register(Box::new(counter.clone())).expect("metric registered once");
		counter
	};

	/// Operations that ran out of providers without a success.
	pub static ref GATEWAY_EXHAUSTED: IntCounterVec = {
		let counter = IntCounterVec::new(
			Opts::new("gateway_exhausted_total", "Operations that exhausted every provider"),
			&["chain", "operation"],
		).expect("metric definition is valid");
		REGISTRY.register(Box::new(counter.clone())).expect("metric registered once");
		counter
	};

	/// Exchange-rate cache refreshes per currency.
	pub static ref RATE_REFRESHES: IntCounterVec = {
		let counter = IntCounterVec::new(
			Opts::new("rate_refreshes_total", "Exchange rate cache refreshes"),
			&["currency"],
		).expect("metric definition is valid");
		REGISTRY.register(Box::new(counter.clone())).expect("metric registered once");
		counter
	};
}

/// Records one provider attempt.
pub fn record_provider_attempt(chain: &str, operation: &str, provider: &str, outcome: &str) {
	PROVIDER_ATTEMPTS
		.with_label_values(&[chain, operation, provider, outcome])
		.inc();
}

/// Gather all metrics and encode them in the text format.
pub fn gather_metrics() -> Result<Vec<u8>, Box<dyn std::error::Error>> {
	let encoder = TextEncoder::new();
	let metric_families = REGISTRY.gather();
	let mut buffer = Vec::new();
	encoder.encode(&metric_families, &mut buffer)?;
	Ok(buffer)
}
