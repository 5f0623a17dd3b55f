//! Test helper utilities for gateway configuration
//!
//! - `GatewayConfigBuilder`: Builder for creating test GatewayConfig instances

use std::collections::BTreeMap;

use crate::models::{
	Chain, ChainConfig, Currency, GatewayConfig, Operation, ProviderConfig, ProviderKind,
	RateSourceConfig,
};

/// Builder for creating test GatewayConfig instances.
///
/// Starts from a valid configuration without chains or rate sources; chains are added
/// when their first provider or operation is set.
pub struct GatewayConfigBuilder {
	config: GatewayConfig,
}

impl Default for GatewayConfigBuilder {
	fn default() -> Self {
		Self {
			config: GatewayConfig {
				chains: BTreeMap::new(),
				rate_sources: BTreeMap::new(),
				..GatewayConfig::default()
			},
		}
	}
}

impl GatewayConfigBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	fn chain(&mut self, chain: Chain) -> &mut ChainConfig {
		self.config.chains.entry(chain).or_insert_with(|| ChainConfig {
			providers: Vec::new(),
			operations: BTreeMap::new(),
		})
	}

	pub fn request_timeout_secs(mut self, secs: u64) -> Self {
		self.config.request_timeout_secs = secs;
		self
	}

	pub fn rate_cache_ttl_secs(mut self, secs: u64) -> Self {
		self.config.rate_cache_ttl_secs = secs;
		self
	}

	pub fn provider(
		mut self,
		chain: Chain,
		name: &str,
		kind: ProviderKind,
		base_url: Option<&str>,
	) -> Self {
		self.chain(chain).providers.push(ProviderConfig {
			name: name.to_string(),
			kind,
			base_url: base_url.map(str::to_string),
		});
		self
	}

	/// Explicit provider order for `operation`.
	pub fn operation(mut self, chain: Chain, operation: Operation, names: &[&str]) -> Self {
		self.chain(chain)
			.operations
			.insert(operation, names.iter().map(|n| n.to_string()).collect());
		self
	}

	/// Appends a rate source for `currency`.
	pub fn rate_source(mut self, currency: Currency, source: RateSourceConfig) -> Self {
		self.config
			.rate_sources
			.entry(currency)
			.or_default()
			.push(source);
		self
	}

	pub fn build(self) -> GatewayConfig {
		self.config
	}
}
