//! Ed25519 signer

use super::Signer;
use crate::error::{JwsError, JwsResult};
use crate::key::Key;
use ed25519_dalek::{
    KEYPAIR_LENGTH, PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH, Signature, SigningKey, VerifyingKey,
};
use ed25519_dalek::Signer as _;
use tracing::warn;

/// EdDSA over Ed25519
///
/// Signing keys are 32-byte seeds or 64-byte `seed ‖ public` keypairs;
/// verification keys are 32-byte public keys or the same 64-byte keypairs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Eddsa;

impl Eddsa {
    /// Wire `alg` identifier
    pub const ID: &'static str = "EdDSA";

    fn signing_key(key: &Key) -> JwsResult<SigningKey> {
        let contents = key.contents();
        if let Ok(seed) = <&[u8; SECRET_KEY_LENGTH]>::try_from(contents) {
            return Ok(SigningKey::from_bytes(seed));
        }
        if let Ok(keypair) = <&[u8; KEYPAIR_LENGTH]>::try_from(contents) {
            return SigningKey::from_keypair_bytes(keypair)
                .map_err(|e| JwsError::key_cannot_be_parsed(&e.to_string()));
        }
        warn!(alg = Self::ID, len = contents.len(), "rejected Ed25519 signing key");
        Err(JwsError::invalid_key(&format!(
            "Ed25519 signing key must be {SECRET_KEY_LENGTH} or {KEYPAIR_LENGTH} bytes, {} provided",
            contents.len()
        )))
    }

    fn verifying_key(key: &Key) -> JwsResult<VerifyingKey> {
        let contents = key.contents();
        if let Ok(public) = <&[u8; PUBLIC_KEY_LENGTH]>::try_from(contents) {
            return VerifyingKey::from_bytes(public)
                .map_err(|e| JwsError::key_cannot_be_parsed(&e.to_string()));
        }
        if contents.len() == KEYPAIR_LENGTH {
            return Self::signing_key(key).map(|signing| signing.verifying_key());
        }
        warn!(alg = Self::ID, len = contents.len(), "rejected Ed25519 verification key");
        Err(JwsError::invalid_key(&format!(
            "Ed25519 verification key must be {PUBLIC_KEY_LENGTH} or {KEYPAIR_LENGTH} bytes, {} provided",
            contents.len()
        )))
    }
}

impl Signer for Eddsa {
    fn algorithm_id(&self) -> &'static str {
        Self::ID
    }

    fn sign(&self, payload: &[u8], key: &Key) -> JwsResult<Vec<u8>> {
        let signing_key = Self::signing_key(key)?;
        Ok(signing_key.sign(payload).to_bytes().to_vec())
    }

    fn verify(&self, expected: &[u8], payload: &[u8], key: &Key) -> JwsResult<bool> {
        let verifying_key = Self::verifying_key(key)?;
        let Ok(signature) = Signature::from_slice(expected) else {
            return Ok(false);
        };
        Ok(verifying_key.verify_strict(payload, &signature).is_ok())
    }
}
