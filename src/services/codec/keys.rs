//! WIF private keys and SEC1 public keys.

use bitcoin::{base58, secp256k1::PublicKey};
use zeroize::Zeroizing;

use crate::services::codec::{address::Network, CodecError};

pub const MAIN_PRIVATE_KEY: u8 = 0x80;
pub const TEST_PRIVATE_KEY: u8 = 0xef;

pub const PUBLIC_KEY_UNCOMPRESSED: u8 = 0x04;
pub const PUBLIC_KEY_COMPRESSED_EVEN_Y: u8 = 0x02;
pub const PUBLIC_KEY_COMPRESSED_ODD_Y: u8 = 0x03;
pub const PRIVATE_KEY_COMPRESSED_PUBKEY: u8 = 0x01;

const PRIVATE_KEY_LEN: usize = 32;
const COORDINATE_LEN: usize = 32;

/// Private key bytes decoded from a WIF string
#[derive(Debug)]
pub struct DecodedWif {
	pub key: Zeroizing<Vec<u8>>,
	/// Whether the matching public key is serialized compressed
	pub compressed: bool,
	pub network: Network,
}

/// `base58check(version ‖ key ‖ [0x01 if compressed])`
pub fn bytes_to_wif(
	private_key: &[u8],
	network: Network,
	compressed: bool,
) -> Result<String, CodecError> {
	if private_key.len() != PRIVATE_KEY_LEN {
		return Err(CodecError::invalid_wif(
			format!("private key must be {} bytes", PRIVATE_KEY_LEN),
			None,
			None,
		));
	}

	let version = match network {
		Network::Main => MAIN_PRIVATE_KEY,
		Network::Test => TEST_PRIVATE_KEY,
	};

	let mut data = Zeroizing::new(Vec::with_capacity(PRIVATE_KEY_LEN + 2));
	data.push(version);
	data.extend_from_slice(private_key);
	if compressed {
		data.push(PRIVATE_KEY_COMPRESSED_PUBKEY);
	}
	Ok(base58::encode_check(&data))
}

pub fn wif_to_bytes(wif: &str) -> Result<DecodedWif, CodecError> {
	let data = Zeroizing::new(base58::decode_check(wif).map_err(|e| {
		CodecError::invalid_wif("WIF failed base58check decoding", Some(Box::new(e)), None)
	})?);

	let network = match data.first() {
		Some(&MAIN_PRIVATE_KEY) => Network::Main,
		Some(&TEST_PRIVATE_KEY) => Network::Test,
		Some(other) => {
			return Err(CodecError::invalid_version(
				format!("unknown WIF version byte {:#04x}", other),
				None,
				None,
			))
		}
		None => return Err(CodecError::invalid_wif("empty WIF payload", None, None)),
	};

	let (key, compressed) = match data.len() {
		n if n == PRIVATE_KEY_LEN + 2 && data[n - 1] == PRIVATE_KEY_COMPRESSED_PUBKEY => {
			(&data[1..n - 1], true)
		}
		n if n == PRIVATE_KEY_LEN + 1 => (&data[1..], false),
		n => {
			return Err(CodecError::invalid_wif(
				format!("unexpected WIF payload length {}", n),
				None,
				None,
			))
		}
	};

	Ok(DecodedWif {
		key: Zeroizing::new(key.to_vec()),
		compressed,
		network,
	})
}

/// Whether `wif` carries a valid base58check checksum.
pub fn wif_checksum_check(wif: &str) -> bool {
	base58::decode_check(wif).is_ok()
}

/// Checks length and prefix of a serialized public key.
pub fn validate_public_key(public_key: &[u8]) -> Result<(), CodecError> {
	match (public_key.len(), public_key.first()) {
		(33, Some(&PUBLIC_KEY_COMPRESSED_EVEN_Y | &PUBLIC_KEY_COMPRESSED_ODD_Y)) => Ok(()),
		(65, Some(&PUBLIC_KEY_UNCOMPRESSED)) => Ok(()),
		(len, _) => Err(CodecError::invalid_public_key(
			format!(
				"expected 33 bytes with prefix 02/03 or 65 bytes with prefix 04, got {} bytes",
				len
			),
			None,
			None,
		)),
	}
}

/// Affine `(x, y)` of a serialized public key, decompressing if needed.
pub fn public_key_to_coords(public_key: &[u8]) -> Result<([u8; 32], [u8; 32]), CodecError> {
	validate_public_key(public_key)?;
	let point = PublicKey::from_slice(public_key).map_err(|e| {
		CodecError::invalid_public_key("public key is not on the curve", Some(Box::new(e)), None)
	})?;

	let serialized = point.serialize_uncompressed();
	let mut x = [0u8; COORDINATE_LEN];
	let mut y = [0u8; COORDINATE_LEN];
	x.copy_from_slice(&serialized[1..1 + COORDINATE_LEN]);
	y.copy_from_slice(&serialized[1 + COORDINATE_LEN..]);
	Ok((x, y))
}

/// Serializes affine coordinates; compressed keys keep only the parity of `y`.
pub fn coords_to_public_key(x: &[u8; 32], y: &[u8; 32], compressed: bool) -> Vec<u8> {
	if compressed {
		let prefix = if y[COORDINATE_LEN - 1] & 1 == 0 {
			PUBLIC_KEY_COMPRESSED_EVEN_Y
		} else {
			PUBLIC_KEY_COMPRESSED_ODD_Y
		};
		let mut out = Vec::with_capacity(33);
		out.push(prefix);
		out.extend_from_slice(x);
		out
	} else {
		let mut out = Vec::with_capacity(65);
		out.push(PUBLIC_KEY_UNCOMPRESSED);
		out.extend_from_slice(x);
		out.extend_from_slice(y);
		out
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const G_COMPRESSED: &str = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
	const G_X: &str = "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
	const G_Y: &str = "483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8";

	fn key_one() -> Vec<u8> {
		let mut key = vec![0u8; 32];
		key[31] = 1;
		key
	}

	#[test]
	fn test_wif_known_vectors() {
		assert_eq!(
			bytes_to_wif(&key_one(), Network::Main, true).unwrap(),
			"KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn"
		);
		assert_eq!(
			bytes_to_wif(&key_one(), Network::Main, false).unwrap(),
			"5HpHagT65TZzG1PH3CSu63k8DbpvD8s5ip4nEB3kEsreAnchuDf"
		);
	}

	#[test]
	fn test_wif_to_bytes_flags() {
		let compressed = wif_to_bytes("KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn").unwrap();
		assert_eq!(compressed.key.as_slice(), key_one().as_slice());
		assert!(compressed.compressed);
		assert_eq!(compressed.network, Network::Main);

		let testnet = bytes_to_wif(&key_one(), Network::Test, false).unwrap();
		let decoded = wif_to_bytes(&testnet).unwrap();
		assert!(!decoded.compressed);
		assert_eq!(decoded.network, Network::Test);
	}

	#[test]
	fn test_wif_rejects_bad_input() {
		assert!(!wif_checksum_check("KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWo"));
		assert!(wif_checksum_check("KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn"));
		assert!(matches!(
			wif_to_bytes("KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWo"),
			Err(CodecError::InvalidWif(_))
		));
		assert!(bytes_to_wif(&[1u8; 31], Network::Main, true).is_err());

		// Valid base58check with an address version byte instead of a key version
		let mut payload = vec![0x00];
		payload.extend_from_slice(&key_one());
		let foreign = base58::encode_check(&payload);
		assert!(matches!(
			wif_to_bytes(&foreign),
			Err(CodecError::InvalidVersion(_))
		));
	}

	#[test]
	fn test_public_key_coords() {
		let pubkey = hex::decode(G_COMPRESSED).unwrap();
		let (x, y) = public_key_to_coords(&pubkey).unwrap();
		assert_eq!(hex::encode(x), G_X);
		assert_eq!(hex::encode(y), G_Y);

		assert_eq!(coords_to_public_key(&x, &y, true), pubkey);

		let uncompressed = coords_to_public_key(&x, &y, false);
		assert_eq!(uncompressed.len(), 65);
		assert_eq!(uncompressed[0], PUBLIC_KEY_UNCOMPRESSED);
		assert_eq!(public_key_to_coords(&uncompressed).unwrap(), (x, y));
	}

	#[test]
	fn test_validate_public_key() {
		let mut pubkey = hex::decode(G_COMPRESSED).unwrap();
		assert!(validate_public_key(&pubkey).is_ok());
		pubkey[0] = 0x04;
		assert!(validate_public_key(&pubkey).is_err());
		assert!(validate_public_key(&[]).is_err());
	}
}
