//! Core domain models shared by the gateway and the converter.
//!
//! - `currency`: supported denominations, their precision and fixed unit values
//! - `gateway`: provider, dispatch and rate-source configuration

mod currency;
mod gateway;

pub use currency::{supported_currencies, Currency};
pub use gateway::{
	ChainConfig, GatewayConfig, ProviderConfig, ProviderKind, RateSourceConfig, RateSourceKind,
	DEFAULT_RATE_CACHE_TTL_SECS, DEFAULT_REQUEST_TIMEOUT_SECS,
};
