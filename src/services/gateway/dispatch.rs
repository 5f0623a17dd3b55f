//! Ordered provider fallback.
//!
//! [`execute`] walks an adapter list in order and classifies every attempt as an
//! [`AttemptOutcome`]. The first success wins; transient failures and unsupported
//! adapters move on to the next entry; anything else stops the walk.

use futures::future::BoxFuture;
use std::{collections::HashMap, sync::Arc};

use crate::{
	models::{Chain, Operation},
	services::{
		gateway::GatewayError,
		providers::{ProviderAdapter, ProviderError},
	},
	utils::{logging::error::BoxedSource, metrics},
};

/// Adapters per operation for one chain, in fallback order
#[derive(Clone, Default)]
pub struct DispatchTable {
	routes: HashMap<Operation, Vec<Arc<dyn ProviderAdapter>>>,
}

impl DispatchTable {
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the adapters tried for `operation`, replacing any previous list.
	pub fn set_route(&mut self, operation: Operation, adapters: Vec<Arc<dyn ProviderAdapter>>) {
		self.routes.insert(operation, adapters);
	}

	pub fn with_route(
		mut self,
		operation: Operation,
		adapters: Vec<Arc<dyn ProviderAdapter>>,
	) -> Self {
		self.set_route(operation, adapters);
		self
	}

	/// Adapters for `operation`; empty when none are configured.
	pub fn route(&self, operation: Operation) -> &[Arc<dyn ProviderAdapter>] {
		self.routes
			.get(&operation)
			.map(Vec::as_slice)
			.unwrap_or_default()
	}
}

/// Classified result of one adapter call
#[derive(Debug)]
pub enum AttemptOutcome<T> {
	Success(T),
	/// Adapter lacks the operation or cannot serve this input
	Unsupported(Option<ProviderError>),
	Transient(ProviderError),
	/// Well-formed refusal of a broadcast
	Rejected(ProviderError),
	Fatal(ProviderError),
}

impl<T> AttemptOutcome<T> {
	pub fn classify(result: Result<T, ProviderError>) -> Self {
		match result {
			Ok(value) => Self::Success(value),
			Err(err @ ProviderError::Transient { .. }) => Self::Transient(err),
			Err(err @ ProviderError::Unsupported(_)) => Self::Unsupported(Some(err)),
			Err(err @ ProviderError::Rejected { .. }) => Self::Rejected(err),
			Err(err) => Self::Fatal(err),
		}
	}

	/// Metric label
	pub fn label(&self) -> &'static str {
		match self {
			Self::Success(_) => "success",
			Self::Unsupported(_) => "unsupported",
			Self::Transient(_) => "transient",
			Self::Rejected(_) => "rejected",
			Self::Fatal(_) => "fatal",
		}
	}
}

fn fatal_error(
	chain: Chain,
	operation: Operation,
	provider: &str,
	err: ProviderError,
) -> GatewayError {
	let metadata = Some(HashMap::from([
		("chain".to_string(), chain.to_string()),
		("operation".to_string(), operation.to_string()),
		("provider".to_string(), provider.to_string()),
	]));
	match err {
		ProviderError::InvalidAddress(_) => GatewayError::invalid_address_format(
			"address rejected by provider",
			Some(Box::new(err)),
			metadata,
		),
		_ => GatewayError::permanent_request(
			"provider failed permanently",
			Some(Box::new(err)),
			metadata,
		),
	}
}

/// Runs `call` against `adapters` in order until one succeeds.
///
/// `call` receives an adapter that supports `operation`; adapters that don't are
/// skipped without being called.
pub async fn execute<T, F>(
	chain: Chain,
	operation: Operation,
	adapters: &[Arc<dyn ProviderAdapter>],
	call: F,
) -> Result<T, GatewayError>
where
	F: Fn(Arc<dyn ProviderAdapter>) -> BoxFuture<'static, Result<T, ProviderError>>,
{
	let mut attempts = 0;
	let mut last_transient: Option<ProviderError> = None;
	let mut last_rejection: Option<ProviderError> = None;

	for adapter in adapters {
		let provider = adapter.name().to_string();

		let outcome = if adapter.supports(operation) {
			attempts += 1;
			AttemptOutcome::classify(call(adapter.clone()).await)
		} else {
			AttemptOutcome::Unsupported(None)
		};
		metrics::record_provider_attempt(
			chain.as_str(),
			operation.as_str(),
			&provider,
			outcome.label(),
		);

		match outcome {
			AttemptOutcome::Success(value) => {
				tracing::debug!(%chain, %operation, provider = %provider, "provider succeeded");
				return Ok(value);
			}
			AttemptOutcome::Unsupported(reason) => {
				tracing::debug!(
					%chain,
					%operation,
					provider = %provider,
					reason = %reason.as_ref().map(|e| e.to_string()).unwrap_or_default(),
					"provider skipped"
				);
			}
			AttemptOutcome::Transient(err) => {
				tracing::debug!(%chain, %operation, provider = %provider, "trying next provider");
				last_transient = Some(err);
			}
			AttemptOutcome::Rejected(err) => {
				tracing::warn!(
					%chain,
					%operation,
					provider = %provider,
					error = %err,
					"provider rejected request"
				);
				last_rejection = Some(err);
			}
			AttemptOutcome::Fatal(err) => {
				return Err(fatal_error(chain, operation, &provider, err));
			}
		}
	}

	if let Some(rejection) = last_rejection {
		let reason = match &rejection {
			ProviderError::Rejected { reason, .. } => reason.clone(),
			other => other.to_string(),
		};
		return Err(GatewayError::broadcast_rejected(
			chain,
			reason,
			Some(Box::new(rejection)),
		));
	}

	metrics::GATEWAY_EXHAUSTED
		.with_label_values(&[chain.as_str(), operation.as_str()])
		.inc();
	Err(GatewayError::exhausted(
		chain,
		operation,
		attempts,
		last_transient.map(|err| -> BoxedSource { Box::new(err) }),
	))
}
