//! Errors returned to gateway callers.

use crate::{
	models::{Chain, Operation},
	services::rates::CurrencyError,
	utils::logging::error::{BoxedSource, ErrorContext, TraceableError},
};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
	/// Every provider for the operation failed transiently or was skipped
	#[error("All providers exhausted for {operation} on {chain}: {context}")]
	Exhausted {
		chain: Chain,
		operation: Operation,
		context: ErrorContext,
	},

	/// At least one provider refused the transaction and none accepted it
	#[error("Broadcast rejected: {reason}")]
	BroadcastRejected {
		reason: String,
		context: ErrorContext,
	},

	/// A provider reported a failure that no other provider would fix
	#[error("Permanent request failure: {0}")]
	PermanentRequest(ErrorContext),

	#[error("Invalid address format: {0}")]
	InvalidAddressFormat(ErrorContext),

	#[error(transparent)]
	Currency(#[from] CurrencyError),
}

fn operation_metadata(chain: Chain, operation: Operation) -> HashMap<String, String> {
	HashMap::from([
		("chain".to_string(), chain.to_string()),
		("operation".to_string(), operation.to_string()),
	])
}

impl GatewayError {
	pub fn exhausted(
		chain: Chain,
		operation: Operation,
		attempts: usize,
		source: Option<BoxedSource>,
	) -> Self {
		let mut metadata = operation_metadata(chain, operation);
		metadata.insert("attempts".to_string(), attempts.to_string());
		Self::Exhausted {
			chain,
			operation,
			context: ErrorContext::new_with_log("no provider succeeded", source, Some(metadata)),
		}
	}

	pub fn broadcast_rejected(
		chain: Chain,
		reason: impl Into<String>,
		source: Option<BoxedSource>,
	) -> Self {
		let reason = reason.into();
		Self::BroadcastRejected {
			context: ErrorContext::new(
				format!("transaction rejected: {}", reason),
				source,
				Some(operation_metadata(chain, Operation::Broadcast)),
			),
			reason,
		}
	}

	pub fn permanent_request(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::PermanentRequest(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn invalid_address_format(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::InvalidAddressFormat(ErrorContext::new(msg, source, metadata))
	}
}

impl TraceableError for GatewayError {
	fn trace_id(&self) -> String {
		match self {
			Self::Exhausted { context, .. } | Self::BroadcastRejected { context, .. } => {
				context.trace_id.clone()
			}
			Self::PermanentRequest(ctx) | Self::InvalidAddressFormat(ctx) => ctx.trace_id.clone(),
			Self::Currency(err) => err.trace_id(),
		}
	}
}
