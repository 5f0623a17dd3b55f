//! Gateway configuration loading and validation.
//!
//! Implements [`ConfigLoader`] for [`GatewayConfig`]: reads one JSON file, applies
//! `GATEWAY_*` environment overrides and checks provider references.

use async_trait::async_trait;
use std::{collections::HashMap, collections::HashSet, path::Path};
use url::Url;

use crate::models::{
	config::{error::ConfigError, ConfigLoader},
	GatewayConfig,
};

/// Overrides `request_timeout_secs`
pub const ENV_REQUEST_TIMEOUT: &str = "GATEWAY_REQUEST_TIMEOUT_SECS";
/// Overrides `rate_cache_ttl_secs`
pub const ENV_RATE_CACHE_TTL: &str = "GATEWAY_RATE_CACHE_TTL_SECS";

fn path_metadata(path: &Path) -> Option<HashMap<String, String>> {
	Some(HashMap::from([(
		"path".to_string(),
		path.display().to_string(),
	)]))
}

fn parse_secs(name: &str, raw: &str) -> Result<u64, ConfigError> {
	raw.trim().parse::<u64>().map_err(|e| {
		ConfigError::parse_error(
			format!("{} must be a whole number of seconds, got '{}'", name, raw),
			Some(Box::new(e)),
			None,
		)
	})
}

fn validate_base_url(owner: &str, raw: &str) -> Result<(), ConfigError> {
	let url = Url::parse(raw).map_err(|e| {
		ConfigError::validation_error(
			format!("{} has an invalid base_url '{}'", owner, raw),
			Some(Box::new(e)),
			None,
		)
	})?;
	if !matches!(url.scheme(), "http" | "https") {
		return Err(ConfigError::validation_error(
			format!("{} base_url must use http or https", owner),
			None,
			None,
		));
	}
	Ok(())
}

impl GatewayConfig {
	/// Applies overrides from `lookup`, which maps a variable name to its value.
	pub fn apply_overrides_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT) {
			self.request_timeout_secs = parse_secs(ENV_REQUEST_TIMEOUT, &raw)?;
		}
		if let Some(raw) = lookup(ENV_RATE_CACHE_TTL) {
			self.rate_cache_ttl_secs = parse_secs(ENV_RATE_CACHE_TTL, &raw)?;
		}
		Ok(self)
	}
}

#[async_trait]
impl ConfigLoader for GatewayConfig {
	async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
		if !Self::is_json_file(path) {
			return Err(ConfigError::file_error(
				"configuration file must have a .json extension",
				None,
				path_metadata(path),
			));
		}

		let file = std::fs::File::open(path).map_err(|e| {
			ConfigError::file_error(
				format!("failed to open gateway config file: {}", e),
				Some(Box::new(e)),
				path_metadata(path),
			)
		})?;
		let config: GatewayConfig = serde_json::from_reader(file).map_err(|e| {
			ConfigError::parse_error(
				format!("failed to parse gateway config: {}", e),
				Some(Box::new(e)),
				path_metadata(path),
			)
		})?;

		let config = config.apply_env_overrides()?;
		config.validate()?;
		Ok(config)
	}

	/// Ensures that:
	/// - the request timeout is positive
	/// - provider names are unique per chain and their kind serves that chain
	/// - every base URL is an http(s) URL
	/// - operation orders only name declared providers
	/// - rate sources are only configured for fiat currencies
	fn validate(&self) -> Result<(), ConfigError> {
		if self.request_timeout_secs == 0 {
			return Err(ConfigError::validation_error(
				"request_timeout_secs must be greater than zero",
				None,
				None,
			));
		}

		for (chain, chain_config) in &self.chains {
			let mut seen = HashSet::new();
			for provider in &chain_config.providers {
				let owner = format!("provider '{}' on {}", provider.name, chain);
				if provider.name.trim().is_empty() {
					return Err(ConfigError::validation_error(
						format!("provider name on {} must not be empty", chain),
						None,
						None,
					));
				}
				if !seen.insert(provider.name.as_str()) {
					return Err(ConfigError::validation_error(
						format!("duplicate {}", owner),
						None,
						None,
					));
				}
				if !provider.kind.supports_chain(*chain) {
					return Err(ConfigError::validation_error(
						format!("{} uses an API that does not serve this chain", owner),
						None,
						Some(HashMap::from([(
							"kind".to_string(),
							format!("{:?}", provider.kind),
						)])),
					));
				}
				if let Some(base_url) = &provider.base_url {
					validate_base_url(&owner, base_url)?;
				}
			}

			for (operation, names) in &chain_config.operations {
				if let Some(unknown) = names.iter().find(|n| !seen.contains(n.as_str())) {
					return Err(ConfigError::validation_error(
						format!(
							"{} on {} references undeclared provider '{}'",
							operation, chain, unknown
						),
						None,
						None,
					));
				}
			}
		}

		for (currency, sources) in &self.rate_sources {
			if currency.is_fixed() {
				return Err(ConfigError::validation_error(
					format!("{} has a fixed value and takes no rate sources", currency),
					None,
					None,
				));
			}
			for source in sources {
				if let Some(base_url) = &source.base_url {
					validate_base_url(&format!("{:?} rate source", source.kind), base_url)?;
				}
			}
		}

		Ok(())
	}

	fn apply_env_overrides(self) -> Result<Self, ConfigError> {
		// A missing .env file is not an error.
		let _ = dotenvy::dotenv();
		self.apply_overrides_from(|name| std::env::var(name).ok())
	}
}
