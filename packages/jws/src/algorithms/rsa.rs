//! RSASSA-PKCS1-v1_5 signers (RS256, RS384, RS512)

use super::keys::{PrivateKey, PublicKey, load_private_key, load_public_key};
use super::Signer;
use crate::error::{JwsError, JwsResult};
use crate::key::Key;
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::sha2::{Sha256, Sha384, Sha512};
use rsa::signature::{SignatureEncoding, Signer as _, Verifier as _};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use tracing::warn;

const MINIMUM_KEY_LENGTH: usize = 2048;

/// RSA PKCS#1 v1.5 with the SHA-2 digest matching the algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rsa {
    /// RS256
    Sha256,
    /// RS384
    Sha384,
    /// RS512
    Sha512,
}

impl Rsa {
    /// Wire `alg` identifier
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Rsa::Sha256 => "RS256",
            Rsa::Sha384 => "RS384",
            Rsa::Sha512 => "RS512",
        }
    }

    fn guard_modulus(self, key: &impl PublicKeyParts) -> JwsResult<()> {
        let bits = key.n().bits();
        if bits < MINIMUM_KEY_LENGTH {
            warn!(alg = self.id(), bits, "rejected short RSA key");
            return Err(JwsError::key_too_short(MINIMUM_KEY_LENGTH, bits));
        }
        Ok(())
    }

    fn private_key(self, key: &Key) -> JwsResult<RsaPrivateKey> {
        match load_private_key(key)? {
            PrivateKey::Rsa(private) => {
                self.guard_modulus(&private)?;
                Ok(private)
            }
            other => {
                warn!(alg = self.id(), "rejected EC key for RSA signer");
                Err(JwsError::incompatible_key_type("RSA", other.type_name()))
            }
        }
    }

    fn public_key(self, key: &Key) -> JwsResult<RsaPublicKey> {
        match load_public_key(key)? {
            PublicKey::Rsa(public) => {
                self.guard_modulus(&public)?;
                Ok(public)
            }
            other => {
                warn!(alg = self.id(), "rejected EC key for RSA signer");
                Err(JwsError::incompatible_key_type("RSA", other.type_name()))
            }
        }
    }
}

fn signing_failed(error: rsa::signature::Error) -> JwsError {
    JwsError::invalid_key(&format!("RSA signing failed: {error}"))
}

impl Signer for Rsa {
    fn algorithm_id(&self) -> &'static str {
        self.id()
    }

    fn sign(&self, payload: &[u8], key: &Key) -> JwsResult<Vec<u8>> {
        let private = self.private_key(key)?;
        let signature = match self {
            Rsa::Sha256 => SigningKey::<Sha256>::new(private).try_sign(payload),
            Rsa::Sha384 => SigningKey::<Sha384>::new(private).try_sign(payload),
            Rsa::Sha512 => SigningKey::<Sha512>::new(private).try_sign(payload),
        }
        .map_err(signing_failed)?;
        Ok(signature.to_vec())
    }

    fn verify(&self, expected: &[u8], payload: &[u8], key: &Key) -> JwsResult<bool> {
        let public = self.public_key(key)?;
        let Ok(signature) = Signature::try_from(expected) else {
            return Ok(false);
        };
        let verified = match self {
            Rsa::Sha256 => VerifyingKey::<Sha256>::new(public).verify(payload, &signature),
            Rsa::Sha384 => VerifyingKey::<Sha384>::new(public).verify(payload, &signature),
            Rsa::Sha512 => VerifyingKey::<Sha512>::new(public).verify(payload, &signature),
        };
        Ok(verified.is_ok())
    }
}
