//! Process-wide knobs read on every call.
//!
//! Updates affect later requests and cache lookups only; calls already in flight keep
//! the value they started with.

use std::{
	sync::atomic::{AtomicU64, Ordering},
	time::Duration,
};

use crate::models::{GatewayConfig, DEFAULT_RATE_CACHE_TTL_SECS, DEFAULT_REQUEST_TIMEOUT_SECS};

/// A zero timeout would fail every provider call before it is sent.
const MIN_REQUEST_TIMEOUT_SECS: u64 = 1;

#[derive(Debug)]
pub struct ServiceSettings {
	request_timeout_secs: AtomicU64,
	rate_cache_ttl_secs: AtomicU64,
}

impl ServiceSettings {
	pub fn new(request_timeout_secs: u64, rate_cache_ttl_secs: u64) -> Self {
		let request_timeout_secs = request_timeout_secs.max(MIN_REQUEST_TIMEOUT_SECS);
		Self {
			request_timeout_secs: AtomicU64::new(request_timeout_secs),
			rate_cache_ttl_secs: AtomicU64::new(rate_cache_ttl_secs),
		}
	}

	pub fn from_config(config: &GatewayConfig) -> Self {
		Self::new(config.request_timeout_secs, config.rate_cache_ttl_secs)
	}

	pub fn request_timeout(&self) -> Duration {
		Duration::from_secs(self.request_timeout_secs.load(Ordering::Relaxed))
	}

	/// Sets the per-request timeout of every provider call, at least one second.
	pub fn set_service_timeout(&self, seconds: u64) {
		if seconds < MIN_REQUEST_TIMEOUT_SECS {
			tracing::warn!(
				seconds,
				minimum = MIN_REQUEST_TIMEOUT_SECS,
				"service timeout below minimum, clamping"
			);
		}
		let seconds = seconds.max(MIN_REQUEST_TIMEOUT_SECS);
		tracing::debug!(seconds, "service timeout updated");
		self.request_timeout_secs.store(seconds, Ordering::Relaxed);
	}

	pub fn rate_cache_ttl(&self) -> Duration {
		Duration::from_secs(self.rate_cache_ttl_secs.load(Ordering::Relaxed))
	}

	/// Sets how long a fetched exchange rate stays fresh.
	pub fn set_rate_cache_time(&self, seconds: u64) {
		tracing::debug!(seconds, "rate cache time updated");
		self.rate_cache_ttl_secs.store(seconds, Ordering::Relaxed);
	}
}

impl Default for ServiceSettings {
	fn default() -> Self {
		Self::new(DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_RATE_CACHE_TTL_SECS)
	}
}
