//! CashAddr and legacy base58 address handling.

use bitcoin::{
	base58,
	hashes::{hash160, Hash},
};
use std::{collections::HashMap, fmt};

use crate::services::codec::{cashaddr, keys::validate_public_key, CodecError};

pub const MAIN_PUBKEY_HASH: u8 = 0x00;
pub const MAIN_SCRIPT_HASH: u8 = 0x05;
pub const TEST_PUBKEY_HASH: u8 = 0x6f;
pub const TEST_SCRIPT_HASH: u8 = 0xc4;

pub const MAINNET_PREFIX: &str = "bitcoincash";
pub const TESTNET_PREFIX: &str = "bchtest";

const HASH160_LEN: usize = 20;

/// Network an address or key belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
	Main,
	Test,
}

impl Network {
	pub fn as_str(&self) -> &'static str {
		match self {
			Network::Main => "main",
			Network::Test => "test",
		}
	}

	pub fn cash_prefix(&self) -> &'static str {
		match self {
			Network::Main => MAINNET_PREFIX,
			Network::Test => TESTNET_PREFIX,
		}
	}

	fn from_cash_prefix(prefix: &str) -> Option<Self> {
		match prefix {
			MAINNET_PREFIX => Some(Network::Main),
			TESTNET_PREFIX => Some(Network::Test),
			_ => None,
		}
	}
}

impl fmt::Display for Network {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressKind {
	/// Pay to public key hash
	P2pkh,
	/// Pay to script hash
	P2sh,
}

/// Decoded 160-bit address
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CashAddress {
	pub network: Network,
	pub kind: AddressKind,
	pub hash: [u8; HASH160_LEN],
}

fn address_metadata(address: &str) -> Option<HashMap<String, String>> {
	Some(HashMap::from([(
		"address".to_string(),
		address.to_string(),
	)]))
}

impl CashAddress {
	/// Decodes a CashAddr; the `prefix:` part is required.
	pub fn decode(address: &str) -> Result<Self, CodecError> {
		if !address.contains(':') {
			return Err(CodecError::invalid_address_format(
				"cash address must include its network prefix",
				None,
				address_metadata(address),
			));
		}

		let (prefix, version, payload) = cashaddr::decode(address)?;
		let network = Network::from_cash_prefix(&prefix).ok_or_else(|| {
			CodecError::invalid_address_format(
				format!("unknown cash address prefix '{}'", prefix),
				None,
				address_metadata(address),
			)
		})?;

		// Only the 160-bit size class is used by P2PKH and P2SH.
		let kind = match version {
			0x00 => AddressKind::P2pkh,
			0x08 => AddressKind::P2sh,
			other => {
				return Err(CodecError::invalid_version(
					format!("unsupported cash address version byte {:#04x}", other),
					None,
					address_metadata(address),
				))
			}
		};

		let hash = <[u8; HASH160_LEN]>::try_from(payload.as_slice()).map_err(|_| {
			CodecError::invalid_address_format(
				format!("cash address payload must be {} bytes", HASH160_LEN),
				None,
				address_metadata(address),
			)
		})?;

		Ok(Self {
			network,
			kind,
			hash,
		})
	}

	/// Like [`decode`](Self::decode), assuming the mainnet prefix when none is given.
	pub fn decode_lenient(address: &str) -> Result<Self, CodecError> {
		if address.contains(':') {
			Self::decode(address)
		} else {
			Self::decode(&format!("{}:{}", MAINNET_PREFIX, address))
		}
	}

	/// Decodes a base58check legacy address.
	pub fn from_legacy(address: &str) -> Result<Self, CodecError> {
		let data = base58::decode_check(address).map_err(|e| {
			CodecError::invalid_address_format(
				"legacy address failed base58check decoding",
				Some(Box::new(e)),
				address_metadata(address),
			)
		})?;

		let (&version, payload) = data.split_first().ok_or_else(|| {
			CodecError::invalid_address_format("empty legacy address", None, address_metadata(address))
		})?;
		let (network, kind) = match version {
			MAIN_PUBKEY_HASH => (Network::Main, AddressKind::P2pkh),
			MAIN_SCRIPT_HASH => (Network::Main, AddressKind::P2sh),
			TEST_PUBKEY_HASH => (Network::Test, AddressKind::P2pkh),
			TEST_SCRIPT_HASH => (Network::Test, AddressKind::P2sh),
			other => {
				return Err(CodecError::invalid_version(
					format!("unsupported legacy version byte {:#04x}", other),
					None,
					address_metadata(address),
				))
			}
		};
		let hash = <[u8; HASH160_LEN]>::try_from(payload).map_err(|_| {
			CodecError::invalid_address_format(
				"legacy address payload must be 20 bytes",
				None,
				address_metadata(address),
			)
		})?;

		Ok(Self {
			network,
			kind,
			hash,
		})
	}

	pub fn encode(&self) -> String {
		let version = match self.kind {
			AddressKind::P2pkh => 0x00,
			AddressKind::P2sh => 0x08,
		};
		cashaddr::encode(self.network.cash_prefix(), version, &self.hash)
	}

	pub fn to_legacy(&self) -> String {
		let version = match (self.network, self.kind) {
			(Network::Main, AddressKind::P2pkh) => MAIN_PUBKEY_HASH,
			(Network::Main, AddressKind::P2sh) => MAIN_SCRIPT_HASH,
			(Network::Test, AddressKind::P2pkh) => TEST_PUBKEY_HASH,
			(Network::Test, AddressKind::P2sh) => TEST_SCRIPT_HASH,
		};
		let mut data = Vec::with_capacity(HASH160_LEN + 1);
		data.push(version);
		data.extend_from_slice(&self.hash);
		base58::encode_check(&data)
	}
}

/// Whether `address` parses as a CashAddr, with or without prefix.
pub fn is_cash_address(address: &str) -> bool {
	CashAddress::decode_lenient(address).is_ok()
}

/// Converts a CashAddr (prefix optional) to its legacy base58 form.
pub fn cash_to_legacy(address: &str) -> Result<String, CodecError> {
	CashAddress::decode_lenient(address).map(|a| a.to_legacy())
}

/// Converts a legacy base58 address to a prefixed CashAddr.
pub fn legacy_to_cash(address: &str) -> Result<String, CodecError> {
	CashAddress::from_legacy(address).map(|a| a.encode())
}

/// P2PKH CashAddr for a serialized public key (33 or 65 bytes).
pub fn public_key_to_address(public_key: &[u8], network: Network) -> Result<String, CodecError> {
	validate_public_key(public_key)?;
	let address = CashAddress {
		network,
		kind: AddressKind::P2pkh,
		hash: hash160::Hash::hash(public_key).to_byte_array(),
	};
	Ok(address.encode())
}

/// Public key hash and network of a prefixed P2PKH CashAddr.
pub fn address_to_public_key_hash(address: &str) -> Result<([u8; 20], Network), CodecError> {
	let decoded = CashAddress::decode(address)?;
	if decoded.kind != AddressKind::P2pkh {
		return Err(CodecError::invalid_version(
			"address is not pay-to-public-key-hash",
			None,
			address_metadata(address),
		));
	}
	Ok((decoded.hash, decoded.network))
}

/// Network of a prefixed P2PKH CashAddr.
pub fn get_version(address: &str) -> Result<Network, CodecError> {
	address_to_public_key_hash(address).map(|(_, network)| network)
}
