//! Domain models and data structures for the gateway.
//!
//! - `blockchain`: chains, operations and the canonical records providers are mapped into
//! - `config`: configuration loading and validation
//! - `core`: currencies and the gateway configuration model

mod blockchain;
mod config;
mod core;

pub use blockchain::{
	Chain, Operation, Transaction, TransactionDetail, TxPart, Unspent, TX_TRUST_HIGH,
	TX_TRUST_LOW, TX_TRUST_MEDIUM,
};

pub use config::{ConfigError, ConfigLoader, ENV_RATE_CACHE_TTL, ENV_REQUEST_TIMEOUT};

pub use core::{
	supported_currencies, ChainConfig, Currency, GatewayConfig, ProviderConfig, ProviderKind,
	RateSourceConfig, RateSourceKind, DEFAULT_RATE_CACHE_TTL_SECS, DEFAULT_REQUEST_TIMEOUT_SECS,
};
