//! CashAddr base32 encoding with its BCH-code checksum.

use crate::services::codec::CodecError;

const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";
const CHECKSUM_LEN: usize = 8;

fn polymod(values: impl IntoIterator<Item = u8>) -> u64 {
	const GENERATORS: [u64; 5] = [
		0x98f2bc8e61,
		0x79b76d99e2,
		0xf33e5fb3c4,
		0xae2eabe2a8,
		0x1e4f43e470,
	];

	let mut c: u64 = 1;
	for d in values {
		let c0 = (c >> 35) as u8;
		c = ((c & 0x07_ffff_ffff) << 5) ^ u64::from(d);
		for (bit, generator) in GENERATORS.iter().enumerate() {
			if (c0 >> bit) & 1 == 1 {
				c ^= generator;
			}
		}
	}
	c ^ 1
}

fn expand_prefix(prefix: &str) -> impl Iterator<Item = u8> + '_ {
	prefix.bytes().map(|b| b & 0x1f).chain(std::iter::once(0))
}

/// Regroups bits; `pad` appends zero bits to fill the last group.
fn convert_bits(data: &[u8], from: u32, to: u32, pad: bool) -> Option<Vec<u8>> {
	let mut acc: u32 = 0;
	let mut bits: u32 = 0;
	let max_value = (1u32 << to) - 1;
	let max_acc = (1u32 << (from + to - 1)) - 1;
	let mut out = Vec::with_capacity(data.len() * from as usize / to as usize + 1);

	for &value in data {
		let value = u32::from(value);
		if value >> from != 0 {
			return None;
		}
		acc = ((acc << from) | value) & max_acc;
		bits += from;
		while bits >= to {
			bits -= to;
			out.push(((acc >> bits) & max_value) as u8);
		}
	}

	if pad {
		if bits > 0 {
			out.push(((acc << (to - bits)) & max_value) as u8);
		}
	} else if bits >= from || ((acc << (to - bits)) & max_value) != 0 {
		return None;
	}

	Some(out)
}

/// Encodes `version ‖ payload` under `prefix`, e.g. `bitcoincash:q...`.
pub fn encode(prefix: &str, version: u8, payload: &[u8]) -> String {
	let mut data = Vec::with_capacity(payload.len() + 1);
	data.push(version);
	data.extend_from_slice(payload);

	// 8-bit input always regroups into 5-bit values when padding is allowed
	let mut values = convert_bits(&data, 8, 5, true).unwrap_or_default();

	let checksum = polymod(
		expand_prefix(prefix)
			.chain(values.iter().copied())
			.chain([0u8; CHECKSUM_LEN]),
	);
	values.extend((0..CHECKSUM_LEN).map(|i| ((checksum >> (5 * (7 - i))) & 0x1f) as u8));

	let body: String = values
		.into_iter()
		.map(|v| CHARSET[v as usize] as char)
		.collect();
	format!("{}:{}", prefix, body)
}

/// Decodes a prefixed CashAddr into `(prefix, version, payload)`.
///
/// The prefix is returned lowercased. Mixed-case input is rejected.
pub fn decode(address: &str) -> Result<(String, u8, Vec<u8>), CodecError> {
	let invalid = |msg: &str| CodecError::invalid_address_format(msg.to_string(), None, None);

	let has_lower = address.bytes().any(|b| b.is_ascii_lowercase());
	let has_upper = address.bytes().any(|b| b.is_ascii_uppercase());
	if has_lower && has_upper {
		return Err(invalid("cash address mixes upper and lower case"));
	}
	let address = address.to_ascii_lowercase();

	let (prefix, body) = address
		.rsplit_once(':')
		.ok_or_else(|| invalid("cash address requires a prefix followed by ':'"))?;
	if prefix.is_empty() || body.len() <= CHECKSUM_LEN {
		return Err(invalid("cash address is too short"));
	}

	let values = body
		.bytes()
		.map(|b| CHARSET.iter().position(|&c| c == b).map(|p| p as u8))
		.collect::<Option<Vec<u8>>>()
		.ok_or_else(|| invalid("cash address contains a character outside the base32 set"))?;

	if polymod(expand_prefix(prefix).chain(values.iter().copied())) != 0 {
		return Err(invalid("cash address checksum mismatch"));
	}

	let data = convert_bits(&values[..values.len() - CHECKSUM_LEN], 5, 8, false)
		.ok_or_else(|| invalid("cash address has non-zero padding"))?;
	let (&version, payload) = data
		.split_first()
		.ok_or_else(|| invalid("cash address has no version byte"))?;

	Ok((prefix.to_string(), version, payload.to_vec()))
}
