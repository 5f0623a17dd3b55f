//! HTTP transport shared by every adapter.
//!
//! Wraps the retryable client with the runtime timeout, a response size cap and the
//! mapping from `reqwest` failures to [`TransientKind`]s. Callers never see a raw
//! `reqwest` error.

use reqwest_middleware::{ClientWithMiddleware, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{collections::HashMap, sync::Arc};

use crate::services::{
	providers::{ProviderError, TransientKind},
	settings::ServiceSettings,
};

/// Responses larger than this are treated as malformed
pub const MAX_RESPONSE_BYTES: usize = 16 * 1024 * 1024;

/// Status codes reported as [`TransientKind::RateLimited`]
pub const RATE_LIMIT_STATUS_CODES: [u16; 1] = [429];

const BODY_SNIPPET_CHARS: usize = 256;

fn url_metadata(url: &str) -> Option<HashMap<String, String>> {
	Some(HashMap::from([("url".to_string(), url.to_string())]))
}

/// Transient kind for a non-2xx status.
pub fn status_kind(status: u16) -> TransientKind {
	if RATE_LIMIT_STATUS_CODES.contains(&status) {
		TransientKind::RateLimited
	} else {
		TransientKind::HttpStatus(status)
	}
}

/// Status and body of a completed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
	pub status: u16,
	pub body: String,
}

impl HttpReply {
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Body of a 2xx reply; any other status is a transient failure.
	pub fn into_success(self, url: &str) -> Result<String, ProviderError> {
		if self.is_success() {
			return Ok(self.body);
		}

		let snippet: String = self.body.chars().take(BODY_SNIPPET_CHARS).collect();
		let mut metadata = url_metadata(url).unwrap_or_default();
		metadata.insert("body".to_string(), snippet);
		Err(ProviderError::transient(
			status_kind(self.status),
			format!("provider returned status {}", self.status),
			None,
			Some(metadata),
		))
	}
}

/// Parses a JSON body; failures are malformed responses.
pub fn parse_json<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, ProviderError> {
	serde_json::from_str(body).map_err(|e| {
		ProviderError::transient(
			TransientKind::MalformedResponse,
			"response body is not the expected JSON",
			Some(Box::new(e)),
			url_metadata(url),
		)
	})
}

fn connect_kind(err: &reqwest::Error) -> TransientKind {
	let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
	while let Some(current) = source {
		let text = current.to_string().to_lowercase();
		if text.contains("proxy") {
			return TransientKind::Proxy;
		}
		if text.contains("certificate") || text.contains("tls") || text.contains("ssl") {
			return TransientKind::Tls;
		}
		source = current.source();
	}
	TransientKind::Connect
}

fn classify_reqwest_error(err: reqwest::Error, url: &str) -> ProviderError {
	if err.is_builder() {
		return ProviderError::internal(
			"request could not be built",
			Some(Box::new(err)),
			url_metadata(url),
		);
	}

	let kind = if err.is_timeout() {
		TransientKind::Timeout
	} else if err.is_redirect() {
		TransientKind::RedirectLoop
	} else if err.is_decode() || err.is_body() {
		TransientKind::MalformedResponse
	} else if err.is_connect() {
		connect_kind(&err)
	} else if let Some(status) = err.status() {
		status_kind(status.as_u16())
	} else {
		TransientKind::Connect
	};

	ProviderError::transient(kind, "request failed", Some(Box::new(err)), url_metadata(url))
}

fn classify_send_error(err: reqwest_middleware::Error, url: &str) -> ProviderError {
	match err {
		reqwest_middleware::Error::Reqwest(e) => classify_reqwest_error(e, url),
		reqwest_middleware::Error::Middleware(e) => ProviderError::transient(
			TransientKind::Connect,
			"request failed in middleware",
			Some(e.into()),
			url_metadata(url),
		),
	}
}

async fn read_limited(mut response: reqwest::Response, url: &str) -> Result<String, ProviderError> {
	let oversized = || {
		ProviderError::transient(
			TransientKind::MalformedResponse,
			format!("response exceeds {} bytes", MAX_RESPONSE_BYTES),
			None,
			url_metadata(url),
		)
	};

	if response
		.content_length()
		.is_some_and(|len| len > MAX_RESPONSE_BYTES as u64)
	{
		return Err(oversized());
	}

	let mut buf = Vec::new();
	while let Some(chunk) = response
		.chunk()
		.await
		.map_err(|e| classify_reqwest_error(e, url))?
	{
		if buf.len() + chunk.len() > MAX_RESPONSE_BYTES {
			return Err(oversized());
		}
		buf.extend_from_slice(&chunk);
	}

	String::from_utf8(buf).map_err(|e| {
		ProviderError::transient(
			TransientKind::MalformedResponse,
			"response body is not UTF-8",
			Some(Box::new(e)),
			url_metadata(url),
		)
	})
}

/// Shared HTTP access for adapters and rate sources
#[derive(Clone, Debug)]
pub struct HttpTransport {
	client: ClientWithMiddleware,
	settings: Arc<ServiceSettings>,
}

impl HttpTransport {
	pub fn new(client: ClientWithMiddleware, settings: Arc<ServiceSettings>) -> Self {
		Self { client, settings }
	}

	pub fn settings(&self) -> &Arc<ServiceSettings> {
		&self.settings
	}

	async fn send(&self, request: RequestBuilder, url: &str) -> Result<HttpReply, ProviderError> {
		let timeout = self.settings.request_timeout();
		tracing::debug!(url = %url, timeout_secs = timeout.as_secs(), "sending provider request");

		let response = request
			.timeout(timeout)
			.send()
			.await
			.map_err(|e| classify_send_error(e, url))?;
		let status = response.status().as_u16();
		let body = read_limited(response, url).await?;
		Ok(HttpReply { status, body })
	}

	/// GET returning the reply whatever its status
	pub async fn get(&self, url: &str) -> Result<HttpReply, ProviderError> {
		self.send(self.client.get(url), url).await
	}

	/// GET expecting a 2xx text body
	pub async fn get_text(&self, url: &str) -> Result<String, ProviderError> {
		self.get(url).await?.into_success(url)
	}

	/// GET expecting a 2xx JSON body of shape `T`
	pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ProviderError> {
		let body = self.get_text(url).await?;
		parse_json(url, &body)
	}

	pub async fn post_json(&self, url: &str, body: &Value) -> Result<HttpReply, ProviderError> {
		self.send(self.client.post(url).json(body), url).await
	}

	pub async fn post_body(
		&self,
		url: &str,
		content_type: &str,
		body: String,
	) -> Result<HttpReply, ProviderError> {
		let request = self
			.client
			.post(url)
			.header(reqwest::header::CONTENT_TYPE, content_type)
			.body(body);
		self.send(request, url).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_status_kind() {
		assert_eq!(status_kind(429), TransientKind::RateLimited);
		assert_eq!(status_kind(502), TransientKind::HttpStatus(502));
		assert_eq!(status_kind(404), TransientKind::HttpStatus(404));
	}

	#[test]
	fn test_into_success() {
		let ok = HttpReply {
			status: 204,
			body: String::new(),
		};
		assert_eq!(ok.into_success("http://p").unwrap(), "");

		let failed = HttpReply {
			status: 503,
			body: "x".repeat(1000),
		};
		match failed.into_success("http://p") {
			Err(ProviderError::Transient { kind, context }) => {
				assert_eq!(kind, TransientKind::HttpStatus(503));
				let metadata = context.metadata.unwrap();
				assert_eq!(metadata["body"].len(), BODY_SNIPPET_CHARS);
				assert_eq!(metadata["url"], "http://p");
			}
			other => panic!("unexpected result: {:?}", other),
		}
	}

	#[test]
	fn test_parse_json() {
		let value: Value = parse_json("http://p", r#"{"a": 1}"#).unwrap();
		assert_eq!(value["a"], 1);

		let err = parse_json::<Value>("http://p", "<html>").unwrap_err();
		assert_eq!(err.transient_kind(), Some(TransientKind::MalformedResponse));
	}
}
