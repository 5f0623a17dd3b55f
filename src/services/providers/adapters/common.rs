//! Mapping helpers shared by the adapters.
//!
//! Adapters compose these instead of inheriting a base adapter: URL building, tolerant
//! numeric field access and the provider-JSON to record conversions several APIs share.

use rust_decimal::{prelude::ToPrimitive, Decimal};
use serde_json::Value;
use std::{collections::HashMap, str::FromStr};

use crate::{
	models::{Currency, Unspent},
	services::{providers::ProviderError, rates::to_base_units},
};

/// `base/path` with exactly one slash between them.
pub fn join_url(base: &str, path: &str) -> String {
	format!(
		"{}/{}",
		base.trim_end_matches('/'),
		path.trim_start_matches('/')
	)
}

/// Percent-encodes a caller-supplied path segment.
pub fn segment(value: &str) -> String {
	urlencoding::encode(value).into_owned()
}

pub fn provider_metadata(provider: &str, url: &str) -> Option<HashMap<String, String>> {
	Some(HashMap::from([
		("provider".to_string(), provider.to_string()),
		("url".to_string(), url.to_string()),
	]))
}

/// Reads a JSON number or numeric string as a decimal.
pub fn decimal_from_json(value: &Value) -> Option<Decimal> {
	let text = match value {
		Value::Number(n) => n.to_string(),
		Value::String(s) => s.trim().to_string(),
		_ => return None,
	};
	Decimal::from_str(&text)
		.or_else(|_| Decimal::from_scientific(&text))
		.ok()
}

/// Reads a non-negative integer, also accepting integral floats and numeric strings.
pub fn u64_from_json(value: &Value) -> Option<u64> {
	if let Some(n) = value.as_u64() {
		return Some(n);
	}
	let decimal = decimal_from_json(value)?;
	if decimal.is_sign_negative() || !decimal.fract().is_zero() {
		return None;
	}
	decimal.to_u64()
}

pub fn i64_from_json(value: &Value) -> Option<i64> {
	value
		.as_i64()
		.or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

/// First of `fields` present on `object` as an unsigned integer.
pub fn first_u64(object: &Value, fields: &[&str]) -> Option<u64> {
	fields
		.iter()
		.find_map(|field| object.get(*field).and_then(u64_from_json))
}

pub fn first_str<'a>(object: &'a Value, fields: &[&str]) -> Option<&'a str> {
	fields
		.iter()
		.find_map(|field| object.get(*field).and_then(Value::as_str))
}

/// Decimal coin amount (e.g. `"0.01001"`) to satoshi, truncating below one satoshi.
pub fn coins_to_satoshi(value: &Value) -> Option<u64> {
	let amount = decimal_from_json(value)?;
	let per_unit = Currency::Bch.fixed_satoshis()?;
	to_base_units(amount, per_unit).ok()
}

/// Required unsigned field, or a malformed-response error naming it.
pub fn require_u64(
	object: &Value,
	fields: &[&str],
	provider: &str,
	url: &str,
) -> Result<u64, ProviderError> {
	first_u64(object, fields).ok_or_else(|| {
		ProviderError::malformed(
			format!("missing numeric field {}", fields.join("/")),
			provider_metadata(provider, url),
		)
	})
}

pub fn require_str<'a>(
	object: &'a Value,
	fields: &[&str],
	provider: &str,
	url: &str,
) -> Result<&'a str, ProviderError> {
	first_str(object, fields).ok_or_else(|| {
		ProviderError::malformed(
			format!("missing string field {}", fields.join("/")),
			provider_metadata(provider, url),
		)
	})
}

pub fn require_array<'a>(
	value: &'a Value,
	what: &str,
	provider: &str,
	url: &str,
) -> Result<&'a Vec<Value>, ProviderError> {
	value.as_array().ok_or_else(|| {
		ProviderError::malformed(
			format!("expected {} to be an array", what),
			provider_metadata(provider, url),
		)
	})
}

/// Sum of a confirmed and an unconfirmed (possibly negative) balance.
pub fn combine_balance(
	confirmed: i64,
	unconfirmed: i64,
	provider: &str,
	url: &str,
) -> Result<u64, ProviderError> {
	confirmed
		.checked_add(unconfirmed)
		.and_then(|total| u64::try_from(total).ok())
		.ok_or_else(|| {
			ProviderError::malformed(
				format!(
					"inconsistent balance: confirmed {} unconfirmed {}",
					confirmed, unconfirmed
				),
				provider_metadata(provider, url),
			)
		})
}

/// Field names one API uses for an unspent output
pub struct UnspentFields<'a> {
	pub txid: &'a [&'a str],
	pub index: &'a [&'a str],
	pub amount: &'a [&'a str],
	pub confirmations: &'a [&'a str],
	pub script: &'a [&'a str],
}

/// Maps one provider UTXO object; missing confirmations count as zero.
pub fn unspent_from_json(
	item: &Value,
	fields: &UnspentFields<'_>,
	provider: &str,
	url: &str,
) -> Result<Unspent, ProviderError> {
	let txid = require_str(item, fields.txid, provider, url)?;
	let index = require_u64(item, fields.index, provider, url)?;
	let index = u32::try_from(index).map_err(|_| {
		ProviderError::malformed(
			format!("output index {} out of range", index),
			provider_metadata(provider, url),
		)
	})?;
	let amount = require_u64(item, fields.amount, provider, url)?;
	let confirmations = fields
		.confirmations
		.iter()
		.find_map(|f| item.get(*f).and_then(i64_from_json))
		.map(|c| c.max(0) as u64)
		.unwrap_or(0);
	let script = first_str(item, fields.script).map(str::to_string);

	Ok(Unspent::new(amount, confirmations, script, txid, index))
}

/// Txids in first-seen order without duplicates.
pub fn dedup_txids<I>(txids: I) -> Vec<String>
where
	I: IntoIterator<Item = String>,
{
	let mut seen = std::collections::HashSet::new();
	txids
		.into_iter()
		.filter(|txid| !txid.is_empty() && seen.insert(txid.clone()))
		.collect()
}

/// Longest plain-text 400 body still read as a node rejection reason.
const MAX_REJECTION_LEN: usize = 200;

/// The rejection reason carried by a 400 broadcast reply, if the body is one.
///
/// Nodes answer with a short plain-text line (`16: bad-txns-inputs-missingorspent`) or an
/// RPC error object. Markup or multi-line bodies come from proxies and load balancers and
/// are not a verdict on the transaction.
pub fn rejection_reason(body: &str) -> Option<&str> {
	let body = body.trim();
	if body.is_empty() || body.contains('<') || body.eq_ignore_ascii_case("bad request") {
		return None;
	}
	let rpc_error = body.contains("RPC error") || body.contains("\"code\":");
	let short_line = body.len() <= MAX_REJECTION_LEN && !body.contains('\n');
	(rpc_error || short_line).then_some(body)
}
