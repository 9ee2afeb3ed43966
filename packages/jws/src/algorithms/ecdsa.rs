//! ECDSA signers (ES256, ES384, ES512)
//!
//! The curve primitives produce and consume DER; the wire carries the
//! fixed-width `R ‖ S` form, bridged by [`super::asn1`].

use super::asn1::{from_asn1, to_asn1};
use super::keys::{Curve, PrivateKey, PublicKey, load_private_key, load_public_key};
use super::Signer;
use crate::error::{JwsError, JwsResult};
use crate::key::Key;
use p256::ecdsa::signature::{Signer as _, Verifier as _};
use tracing::warn;

/// ECDSA over the NIST curve matching the digest size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ecdsa {
    /// ES256: P-256 and SHA-256
    Sha256,
    /// ES384: P-384 and SHA-384
    Sha384,
    /// ES512: P-521 and SHA-512
    Sha512,
}

impl Ecdsa {
    /// Wire `alg` identifier
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Ecdsa::Sha256 => "ES256",
            Ecdsa::Sha384 => "ES384",
            Ecdsa::Sha512 => "ES512",
        }
    }

    /// Width of one of the two integers in a raw signature, in bytes
    #[must_use]
    pub const fn point_length(self) -> usize {
        match self {
            Ecdsa::Sha256 => 32,
            Ecdsa::Sha384 => 48,
            Ecdsa::Sha512 => 66,
        }
    }

    const fn curve(self) -> Curve {
        match self {
            Ecdsa::Sha256 => Curve::P256,
            Ecdsa::Sha384 => Curve::P384,
            Ecdsa::Sha512 => Curve::P521,
        }
    }

    fn curve_mismatch(self, actual: Curve) -> JwsError {
        warn!(alg = self.id(), curve = actual.name(), "rejected EC key on another curve");
        JwsError::incompatible_key_type(self.curve().name(), actual.name())
    }

    fn sign_der(self, payload: &[u8], private: PrivateKey) -> JwsResult<Vec<u8>> {
        let der = match (self, private) {
            (Ecdsa::Sha256, PrivateKey::P256(secret)) => {
                let signing_key = p256::ecdsa::SigningKey::from(secret);
                let signature: p256::ecdsa::Signature =
                    signing_key.try_sign(payload).map_err(signing_failed)?;
                signature.to_der().as_bytes().to_vec()
            }
            (Ecdsa::Sha384, PrivateKey::P384(secret)) => {
                let signing_key = p384::ecdsa::SigningKey::from(secret);
                let signature: p384::ecdsa::Signature =
                    signing_key.try_sign(payload).map_err(signing_failed)?;
                signature.to_der().as_bytes().to_vec()
            }
            (Ecdsa::Sha512, PrivateKey::P521(secret)) => {
                let signing_key = p521::ecdsa::SigningKey::from_bytes(&secret.to_bytes())
                    .map_err(|e| JwsError::key_cannot_be_parsed(&e.to_string()))?;
                let signature: p521::ecdsa::Signature =
                    signing_key.try_sign(payload).map_err(signing_failed)?;
                signature.to_der().as_bytes().to_vec()
            }
            (_, PrivateKey::Rsa(_)) => {
                warn!(alg = self.id(), "rejected RSA key for ECDSA signer");
                return Err(JwsError::incompatible_key_type("EC", "RSA"));
            }
            (_, PrivateKey::P256(_)) => return Err(self.curve_mismatch(Curve::P256)),
            (_, PrivateKey::P384(_)) => return Err(self.curve_mismatch(Curve::P384)),
            (_, PrivateKey::P521(_)) => return Err(self.curve_mismatch(Curve::P521)),
        };
        Ok(der)
    }

    fn verify_der(self, der: &[u8], payload: &[u8], public: PublicKey) -> JwsResult<bool> {
        let verified = match (self, public) {
            (Ecdsa::Sha256, PublicKey::P256(key)) => p256::ecdsa::Signature::from_der(der)
                .is_ok_and(|signature| key.verify(payload, &signature).is_ok()),
            (Ecdsa::Sha384, PublicKey::P384(key)) => p384::ecdsa::Signature::from_der(der)
                .is_ok_and(|signature| key.verify(payload, &signature).is_ok()),
            (Ecdsa::Sha512, PublicKey::P521(key)) => p521::ecdsa::Signature::from_der(der)
                .is_ok_and(|signature| key.verify(payload, &signature).is_ok()),
            (_, PublicKey::Rsa(_)) => {
                warn!(alg = self.id(), "rejected RSA key for ECDSA signer");
                return Err(JwsError::incompatible_key_type("EC", "RSA"));
            }
            (_, PublicKey::P256(_)) => return Err(self.curve_mismatch(Curve::P256)),
            (_, PublicKey::P384(_)) => return Err(self.curve_mismatch(Curve::P384)),
            (_, PublicKey::P521(_)) => return Err(self.curve_mismatch(Curve::P521)),
        };
        Ok(verified)
    }
}

fn signing_failed(error: p256::ecdsa::Error) -> JwsError {
    JwsError::invalid_key(&format!("ECDSA signing failed: {error}"))
}

impl Signer for Ecdsa {
    fn algorithm_id(&self) -> &'static str {
        self.id()
    }

    fn sign(&self, payload: &[u8], key: &Key) -> JwsResult<Vec<u8>> {
        let private = load_private_key(key)?;
        let der = self.sign_der(payload, private)?;
        Ok(from_asn1(&der, self.point_length())?)
    }

    fn verify(&self, expected: &[u8], payload: &[u8], key: &Key) -> JwsResult<bool> {
        let public = load_public_key(key)?;
        let der = to_asn1(expected, self.point_length())?;
        self.verify_der(&der, payload, public)
    }
}
