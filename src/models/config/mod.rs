//! Configuration loading and validation.
//!
//! [`ConfigLoader`] reads a JSON file, applies environment overrides and validates
//! the result before anything is built from it.

#![allow(clippy::result_large_err)]

use async_trait::async_trait;
use std::path::Path;

mod error;
mod gateway_config;

pub use error::ConfigError;
pub use gateway_config::{ENV_RATE_CACHE_TTL, ENV_REQUEST_TIMEOUT};

/// Common interface for loading configuration files
#[async_trait]
pub trait ConfigLoader: Sized {
	/// Load, override from the environment, then validate
	async fn load_from_path(path: &Path) -> Result<Self, ConfigError>;

	/// Returns Ok(()) if the configuration can be used to build services.
	fn validate(&self) -> Result<(), ConfigError>;

	/// Apply overrides read from the process environment (and `.env`, if present)
	fn apply_env_overrides(self) -> Result<Self, ConfigError>;

	fn is_json_file(path: &Path) -> bool {
		path.extension()
			.map(|ext| ext.to_string_lossy().to_lowercase() == "json")
			.unwrap_or(false)
	}
}
