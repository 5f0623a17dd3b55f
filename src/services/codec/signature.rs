use bitcoin::secp256k1::{ecdsa::Signature, Message, PublicKey, Secp256k1};
use sha2::{Digest, Sha256};

use crate::services::codec::{keys::validate_public_key, CodecError};

/// Verifies a DER-encoded ECDSA signature over `sha256(data)`.
///
/// A malformed signature verifies as `false`; a malformed public key is an error.
pub fn verify_sig(signature_der: &[u8], data: &[u8], public_key: &[u8]) -> Result<bool, CodecError> {
	validate_public_key(public_key)?;
	let public_key = PublicKey::from_slice(public_key).map_err(|e| {
		CodecError::invalid_public_key("public key is not on the curve", Some(Box::new(e)), None)
	})?;

	let Ok(mut signature) = Signature::from_der(signature_der) else {
		return Ok(false);
	};
	signature.normalize_s();

	let digest: [u8; 32] = Sha256::digest(data).into();
	let message = Message::from_digest(digest);

	let secp = Secp256k1::verification_only();
	Ok(secp.verify_ecdsa(&message, &signature, &public_key).is_ok())
}
