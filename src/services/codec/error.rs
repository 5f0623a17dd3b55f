//! Error types for the address and key codec.

use crate::utils::logging::error::{BoxedSource, ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error;

/// Structural failures while decoding addresses, keys or WIF strings
#[derive(Debug, Error)]
pub enum CodecError {
	#[error("Invalid address format: {0}")]
	InvalidAddressFormat(ErrorContext),

	#[error("Invalid public key: {0}")]
	InvalidPublicKey(ErrorContext),

	#[error("Invalid WIF: {0}")]
	InvalidWif(ErrorContext),

	/// Version byte or address type not supported
	#[error("Invalid version: {0}")]
	InvalidVersion(ErrorContext),
}

impl CodecError {
	// Codec failures come from caller input, so they are not logged at error level here.
	pub fn invalid_address_format(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::InvalidAddressFormat(ErrorContext::new(msg, source, metadata))
	}

	pub fn invalid_public_key(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::InvalidPublicKey(ErrorContext::new(msg, source, metadata))
	}

	pub fn invalid_wif(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::InvalidWif(ErrorContext::new(msg, source, metadata))
	}

	pub fn invalid_version(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::InvalidVersion(ErrorContext::new(msg, source, metadata))
	}
}

impl TraceableError for CodecError {
	fn trace_id(&self) -> String {
		match self {
			Self::InvalidAddressFormat(ctx)
			| Self::InvalidPublicKey(ctx)
			| Self::InvalidWif(ctx)
			| Self::InvalidVersion(ctx) => ctx.trace_id.clone(),
		}
	}
}
