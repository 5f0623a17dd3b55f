//! Error types for provider adapters and rate sources.
//!
//! Each variant is one classification the gateway acts on: transient failures move on
//! to the next adapter, `Unsupported` skips the adapter, `Rejected` records a broadcast
//! rejection, everything else stops the operation.

use crate::{
	services::codec::CodecError,
	utils::logging::error::{BoxedSource, ErrorContext, TraceableError},
};
use std::{collections::HashMap, fmt};
use thiserror::Error;

/// Network-level failure kinds that justify trying the next provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransientKind {
	Timeout,
	Connect,
	Tls,
	/// Unparseable, unexpected or oversized body
	MalformedResponse,
	/// HTTP 429
	RateLimited,
	RedirectLoop,
	Proxy,
	/// Any other non-2xx status
	HttpStatus(u16),
}

impl fmt::Display for TransientKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TransientKind::Timeout => f.write_str("timeout"),
			TransientKind::Connect => f.write_str("connection failed"),
			TransientKind::Tls => f.write_str("tls failure"),
			TransientKind::MalformedResponse => f.write_str("malformed response"),
			TransientKind::RateLimited => f.write_str("rate limited"),
			TransientKind::RedirectLoop => f.write_str("redirect loop"),
			TransientKind::Proxy => f.write_str("proxy failure"),
			TransientKind::HttpStatus(code) => write!(f, "http status {}", code),
		}
	}
}

#[derive(Debug, Error)]
pub enum ProviderError {
	#[error("Transient provider failure ({kind}): {context}")]
	Transient {
		kind: TransientKind,
		context: ErrorContext,
	},

	/// The provider cannot serve this request (e.g. an address format it does not accept)
	#[error("Unsupported by provider: {0}")]
	Unsupported(ErrorContext),

	/// Caller-supplied input is unusable with any provider
	#[error("Invalid argument: {0}")]
	InvalidArgument(ErrorContext),

	#[error("Invalid address: {0}")]
	InvalidAddress(ErrorContext),

	/// Well-formed refusal of a broadcast transaction
	#[error("Transaction rejected: {reason}")]
	Rejected {
		reason: String,
		context: ErrorContext,
	},

	#[error("Internal provider error: {0}")]
	Internal(ErrorContext),
}

impl ProviderError {
	pub fn transient(
		kind: TransientKind,
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		let context = ErrorContext::new(msg, source, metadata);
		tracing::warn!(
			kind = %kind,
			trace_id = %context.trace_id,
			"{}",
			context.format_with_metadata()
		);
		Self::Transient { kind, context }
	}

	pub fn unsupported(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Unsupported(ErrorContext::new(msg, source, metadata))
	}

	pub fn invalid_argument(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::InvalidArgument(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn invalid_address(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::InvalidAddress(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn rejected(
		reason: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		let reason = reason.into();
		let context = ErrorContext::new(format!("rejected: {}", reason), source, metadata);
		Self::Rejected { reason, context }
	}

	pub fn internal(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Internal(ErrorContext::new_with_log(msg, source, metadata))
	}

	/// Shorthand for a body that does not have the expected shape
	pub fn malformed(msg: impl Into<String>, metadata: Option<HashMap<String, String>>) -> Self {
		Self::transient(TransientKind::MalformedResponse, msg, None, metadata)
	}

	pub fn is_transient(&self) -> bool {
		matches!(self, Self::Transient { .. })
	}

	pub fn transient_kind(&self) -> Option<TransientKind> {
		match self {
			Self::Transient { kind, .. } => Some(*kind),
			_ => None,
		}
	}

	pub fn context(&self) -> &ErrorContext {
		match self {
			Self::Transient { context, .. } | Self::Rejected { context, .. } => context,
			Self::Unsupported(ctx)
			| Self::InvalidArgument(ctx)
			| Self::InvalidAddress(ctx)
			| Self::Internal(ctx) => ctx,
		}
	}
}

impl TraceableError for ProviderError {
	fn trace_id(&self) -> String {
		self.context().trace_id.clone()
	}
}

impl From<CodecError> for ProviderError {
	fn from(err: CodecError) -> Self {
		Self::invalid_address("address could not be decoded", Some(Box::new(err)), None)
	}
}
