//! Address and key codec.
//!
//! Primitive cryptography (base58check, hash160, secp256k1) comes from the `bitcoin`
//! crate. This module defines the encodings the gateway and wallets exchange:
//!
//! - `address`: CashAddr and legacy base58 addresses, public key to address
//! - `keys`: WIF private keys, public key coordinates
//! - `signature`: ECDSA verification over SHA-256

mod address;
mod cashaddr;
mod error;
mod keys;
mod signature;

pub use address::{
	address_to_public_key_hash, cash_to_legacy, get_version, is_cash_address, legacy_to_cash,
	public_key_to_address, AddressKind, CashAddress, Network, MAINNET_PREFIX, MAIN_PUBKEY_HASH,
	MAIN_SCRIPT_HASH, TESTNET_PREFIX, TEST_PUBKEY_HASH, TEST_SCRIPT_HASH,
};
pub use error::CodecError;
pub use keys::{
	bytes_to_wif, coords_to_public_key, public_key_to_coords, validate_public_key,
	wif_checksum_check, wif_to_bytes, DecodedWif, MAIN_PRIVATE_KEY, TEST_PRIVATE_KEY,
};
pub use signature::verify_sig;
