use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{
	models::{Chain, Currency, Operation},
	utils::http::RetryConfig,
};

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_RATE_CACHE_TTL_SECS: u64 = 60;

fn default_request_timeout_secs() -> u64 {
	DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_rate_cache_ttl_secs() -> u64 {
	DEFAULT_RATE_CACHE_TTL_SECS
}

/// Top-level gateway configuration.
///
/// Provider order within a chain is the fallback order: the first provider listed for
/// an operation is tried first.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
	/// Per-request timeout applied to every provider call
	#[serde(default = "default_request_timeout_secs")]
	pub request_timeout_secs: u64,

	/// Maximum age of a cached exchange rate
	#[serde(default = "default_rate_cache_ttl_secs")]
	pub rate_cache_ttl_secs: u64,

	/// Retry policy of the HTTP middleware (no retries by default)
	#[serde(default)]
	pub http_retry: RetryConfig,

	/// Providers and dispatch order per chain
	pub chains: BTreeMap<Chain, ChainConfig>,

	/// Ordered price sources per fiat currency
	#[serde(default)]
	pub rate_sources: BTreeMap<Currency, Vec<RateSourceConfig>>,
}

/// Providers available on one chain
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ChainConfig {
	/// Declared providers, in default fallback order
	pub providers: Vec<ProviderConfig>,

	/// Explicit provider order per operation; operations not listed use `providers` order
	#[serde(default)]
	pub operations: BTreeMap<Operation, Vec<String>>,
}

impl ChainConfig {
	/// Provider names tried for `operation`, in order.
	pub fn provider_order(&self, operation: Operation) -> Vec<&str> {
		match self.operations.get(&operation) {
			Some(names) => names.iter().map(String::as_str).collect(),
			None => self.providers.iter().map(|p| p.name.as_str()).collect(),
		}
	}

	pub fn provider(&self, name: &str) -> Option<&ProviderConfig> {
		self.providers.iter().find(|p| p.name == name)
	}
}

/// One remote data provider
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
	/// Unique name within the chain; used in logs and metrics
	pub name: String,

	pub kind: ProviderKind,

	/// Overrides the adapter's public endpoint
	#[serde(default)]
	pub base_url: Option<String>,
}

/// Supported provider APIs
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
	Bitcore,
	BitcoinCom,
	BtcCom,
	Blockchair,
	Esplora,
}

impl ProviderKind {
	/// Chains this API can serve
	pub fn supports_chain(&self, chain: Chain) -> bool {
		match self {
			ProviderKind::BitcoinCom => chain == Chain::Bch,
			ProviderKind::Esplora => chain == Chain::Btc,
			ProviderKind::Bitcore | ProviderKind::BtcCom | ProviderKind::Blockchair => true,
		}
	}
}

/// One exchange-rate source
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RateSourceConfig {
	pub kind: RateSourceKind,

	#[serde(default)]
	pub base_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RateSourceKind {
	Bitpay,
	Coingecko,
}

fn provider(name: &str, kind: ProviderKind, base_url: Option<&str>) -> ProviderConfig {
	ProviderConfig {
		name: name.to_string(),
		kind,
		base_url: base_url.map(str::to_string),
	}
}

impl Default for GatewayConfig {
	/// Public endpoints, complete-data providers first
	fn default() -> Self {
		let bch = ChainConfig {
			providers: vec![
				provider("bitcore", ProviderKind::Bitcore, None),
				provider("bitcoin.com", ProviderKind::BitcoinCom, None),
				provider("blockchair", ProviderKind::Blockchair, None),
				provider("btc.com", ProviderKind::BtcCom, None),
			],
			operations: BTreeMap::new(),
		};

		let btc = ChainConfig {
			providers: vec![
				provider(
					"blockstream",
					ProviderKind::Esplora,
					Some("https://blockstream.info/api"),
				),
				provider(
					"mempool.space",
					ProviderKind::Esplora,
					Some("https://mempool.space/api"),
				),
				provider("bitcore", ProviderKind::Bitcore, None),
				provider("blockchair", ProviderKind::Blockchair, None),
				provider("btc.com", ProviderKind::BtcCom, None),
			],
			operations: BTreeMap::new(),
		};

		Self {
			request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
			rate_cache_ttl_secs: DEFAULT_RATE_CACHE_TTL_SECS,
			http_retry: RetryConfig::default(),
			chains: BTreeMap::from([(Chain::Bch, bch), (Chain::Btc, btc)]),
			rate_sources: BTreeMap::from([(
				Currency::Usd,
				vec![
					RateSourceConfig {
						kind: RateSourceKind::Bitpay,
						base_url: None,
					},
					RateSourceConfig {
						kind: RateSourceKind::Coingecko,
						base_url: None,
					},
				],
			)]),
		}
	}
}
