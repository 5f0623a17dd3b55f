//! Bootstrap module for building the gateway services from configuration.
//!
//! [`initialize_gateway`] validates a [`GatewayConfig`] and wires everything an
//! application needs: runtime settings, the shared HTTP transport, one adapter per
//! configured provider, the per-chain dispatch tables, and a rate cache plus converter
//! per chain.

use std::{collections::HashMap, error::Error, sync::Arc};

use crate::{
	models::{
		Chain, ChainConfig, ConfigError, ConfigLoader, Currency, GatewayConfig, Operation,
		ProviderConfig, ProviderKind, RateSourceConfig, RateSourceKind,
	},
	services::{
		gateway::{DispatchTable, Gateway},
		providers::{
			BitcoinComAdapter, BitcoreAdapter, BlockchairAdapter, BtcComAdapter, EsploraAdapter,
			HttpTransport, ProviderAdapter,
		},
		public_info::PublicInformation,
		rates::{BitpayRates, CoinGeckoRates, CurrencyConverter, RateCache, RateSource},
		settings::ServiceSettings,
	},
	utils::create_http_client,
};

/// Type alias for bootstrap results
pub type Result<T> = std::result::Result<T, Box<dyn Error + Send + Sync>>;

/// Everything built from one configuration
#[derive(Clone)]
pub struct GatewayServices {
	pub settings: Arc<ServiceSettings>,
	pub gateway: Arc<Gateway>,
	pub converters: HashMap<Chain, CurrencyConverter>,
	pub public_info: PublicInformation,
}

impl GatewayServices {
	pub fn converter(&self, chain: Chain) -> Option<&CurrencyConverter> {
		self.converters.get(&chain)
	}
}

/// Builds the adapter for one configured provider.
pub fn create_adapter(
	chain: Chain,
	config: &ProviderConfig,
	transport: HttpTransport,
) -> Arc<dyn ProviderAdapter> {
	let name = config.name.clone();
	let base_url = config.base_url.clone();
	match config.kind {
		ProviderKind::Bitcore => Arc::new(BitcoreAdapter::new(name, chain, base_url, transport)),
		ProviderKind::BitcoinCom => {
			Arc::new(BitcoinComAdapter::new(name, chain, base_url, transport))
		}
		ProviderKind::BtcCom => Arc::new(BtcComAdapter::new(name, chain, base_url, transport)),
		ProviderKind::Blockchair => {
			Arc::new(BlockchairAdapter::new(name, chain, base_url, transport))
		}
		ProviderKind::Esplora => Arc::new(EsploraAdapter::new(name, chain, base_url, transport)),
	}
}

/// Builds a rate source quoting `chain`'s native coin.
pub fn create_rate_source(
	chain: Chain,
	config: &RateSourceConfig,
	transport: HttpTransport,
) -> Arc<dyn RateSource> {
	let base_url = config.base_url.clone();
	match config.kind {
		RateSourceKind::Bitpay => Arc::new(BitpayRates::new(chain, base_url, transport)),
		RateSourceKind::Coingecko => Arc::new(CoinGeckoRates::new(chain, base_url, transport)),
	}
}

/// Dispatch table of one chain: every operation routed through the configured order.
pub fn create_dispatch_table(
	chain: Chain,
	config: &ChainConfig,
	transport: &HttpTransport,
) -> std::result::Result<DispatchTable, ConfigError> {
	let adapters: HashMap<&str, Arc<dyn ProviderAdapter>> = config
		.providers
		.iter()
		.map(|provider| {
			(
				provider.name.as_str(),
				create_adapter(chain, provider, transport.clone()),
			)
		})
		.collect();

	let mut table = DispatchTable::new();
	for operation in Operation::ALL {
		let route = config
			.provider_order(operation)
			.into_iter()
			.map(|name| {
				adapters.get(name).cloned().ok_or_else(|| {
					ConfigError::validation_error(
						format!("{} {} references unknown provider {}", chain, operation, name),
						None,
						None,
					)
				})
			})
			.collect::<std::result::Result<Vec<_>, _>>()?;
		table.set_route(operation, route);
	}
	Ok(table)
}

/// Rate cache for `chain`, with the configured sources per fiat currency.
pub fn create_rate_cache(
	chain: Chain,
	config: &GatewayConfig,
	transport: &HttpTransport,
	settings: Arc<ServiceSettings>,
) -> RateCache {
	let sources: HashMap<Currency, Vec<Arc<dyn RateSource>>> = config
		.rate_sources
		.iter()
		.map(|(currency, sources)| {
			(
				*currency,
				sources
					.iter()
					.map(|source| create_rate_source(chain, source, transport.clone()))
					.collect(),
			)
		})
		.collect();
	RateCache::new(chain, sources, settings)
}

/// Validates `config` and builds the gateway services from it.
pub fn initialize_gateway(config: &GatewayConfig) -> Result<GatewayServices> {
	config.validate()?;

	let settings = Arc::new(ServiceSettings::from_config(config));
	let client = create_http_client(&config.http_retry)?;
	let transport = HttpTransport::new(client, settings.clone());

	let mut tables = HashMap::new();
	let mut converters = HashMap::new();
	for (chain, chain_config) in &config.chains {
		tables.insert(
			*chain,
			create_dispatch_table(*chain, chain_config, &transport)?,
		);
		let cache = create_rate_cache(*chain, config, &transport, settings.clone());
		converters.insert(*chain, CurrencyConverter::new(Arc::new(cache)));
		tracing::debug!(
			chain = %chain,
			providers = chain_config.providers.len(),
			"chain initialized"
		);
	}

	let gateway = Arc::new(Gateway::new(tables));
	let public_info = PublicInformation::new(gateway.clone(), converters.clone());
	tracing::info!(chains = config.chains.len(), "gateway initialized");

	Ok(GatewayServices {
		settings,
		gateway,
		converters,
		public_info,
	})
}
