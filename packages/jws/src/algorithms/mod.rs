//! Signing algorithms
//!
//! Every algorithm implements [`Signer`]. [`Algorithm`] is the closed registry
//! mapping wire `alg` identifiers to implementations; it never resolves the
//! unsecured `none` algorithm from a string.

pub mod asn1;
mod blake2b;
mod ecdsa;
mod eddsa;
mod hmac;
mod keys;
mod none;
mod rsa;

pub use blake2b::Blake2b;
pub use ecdsa::Ecdsa;
pub use eddsa::Eddsa;
pub use hmac::Hmac;
pub use none::Unsecured;
pub use rsa::Rsa;

use crate::error::{JwsError, JwsResult};
use crate::key::Key;
use std::fmt;
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Signing algorithm interface
///
/// Implementations hold no mutable state and must be thread-safe.
pub trait Signer: Send + Sync {
    /// Header `alg` value
    fn algorithm_id(&self) -> &'static str;

    /// Sign the `header.payload` signing input
    ///
    /// # Errors
    /// Returns [`JwsError::InvalidKeyProvided`] when the key is unusable for
    /// this algorithm, or [`JwsError::ConversionFailed`] for a malformed
    /// ECDSA primitive output.
    fn sign(&self, payload: &[u8], key: &Key) -> JwsResult<Vec<u8>>;

    /// Check `expected` against the signing input
    ///
    /// A signature that is merely wrong yields `Ok(false)`; errors are
    /// reserved for unusable keys.
    ///
    /// # Errors
    /// Same conditions as [`Signer::sign`].
    fn verify(&self, expected: &[u8], payload: &[u8], key: &Key) -> JwsResult<bool>;
}

impl<T: Signer + ?Sized> Signer for Arc<T> {
    fn algorithm_id(&self) -> &'static str {
        (**self).algorithm_id()
    }

    fn sign(&self, payload: &[u8], key: &Key) -> JwsResult<Vec<u8>> {
        (**self).sign(payload, key)
    }

    fn verify(&self, expected: &[u8], payload: &[u8], key: &Key) -> JwsResult<bool> {
        (**self).verify(expected, payload, key)
    }
}

/// Every supported algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// HMAC using SHA-256
    Hs256,
    /// HMAC using SHA-384
    Hs384,
    /// HMAC using SHA-512
    Hs512,
    /// RSASSA-PKCS1-v1_5 using SHA-256
    Rs256,
    /// RSASSA-PKCS1-v1_5 using SHA-384
    Rs384,
    /// RSASSA-PKCS1-v1_5 using SHA-512
    Rs512,
    /// ECDSA using P-256 and SHA-256
    Es256,
    /// ECDSA using P-384 and SHA-384
    Es384,
    /// ECDSA using P-521 and SHA-512
    Es512,
    /// Ed25519
    EdDsa,
    /// Keyed BLAKE2b with a 256-bit output
    Blake2b,
    /// Unsecured `none`
    Unsecured,
}

impl Algorithm {
    /// Registry of every algorithm, in declaration order
    pub const ALL: [Algorithm; 12] = [
        Algorithm::Hs256,
        Algorithm::Hs384,
        Algorithm::Hs512,
        Algorithm::Rs256,
        Algorithm::Rs384,
        Algorithm::Rs512,
        Algorithm::Es256,
        Algorithm::Es384,
        Algorithm::Es512,
        Algorithm::EdDsa,
        Algorithm::Blake2b,
        Algorithm::Unsecured,
    ];

    /// Resolve a wire `alg` identifier
    ///
    /// `none` is refused; unsecured tokens must be opted into through
    /// [`Algorithm::Unsecured`] directly.
    ///
    /// # Errors
    /// Returns [`JwsError::UnsupportedAlgorithm`] for unknown identifiers and
    /// for `none`.
    pub fn from_id(id: &str) -> JwsResult<Self> {
        Self::ALL
            .into_iter()
            .filter(|algorithm| *algorithm != Algorithm::Unsecured)
            .find(|algorithm| algorithm.id() == id)
            .ok_or_else(|| JwsError::unsupported_algorithm(id))
    }

    /// Wire `alg` identifier
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Algorithm::Hs256 => Hmac::Sha256.id(),
            Algorithm::Hs384 => Hmac::Sha384.id(),
            Algorithm::Hs512 => Hmac::Sha512.id(),
            Algorithm::Rs256 => Rsa::Sha256.id(),
            Algorithm::Rs384 => Rsa::Sha384.id(),
            Algorithm::Rs512 => Rsa::Sha512.id(),
            Algorithm::Es256 => Ecdsa::Sha256.id(),
            Algorithm::Es384 => Ecdsa::Sha384.id(),
            Algorithm::Es512 => Ecdsa::Sha512.id(),
            Algorithm::EdDsa => Eddsa::ID,
            Algorithm::Blake2b => Blake2b::ID,
            Algorithm::Unsecured => Unsecured::ID,
        }
    }

    fn signer(self) -> &'static dyn Signer {
        match self {
            Algorithm::Hs256 => &Hmac::Sha256,
            Algorithm::Hs384 => &Hmac::Sha384,
            Algorithm::Hs512 => &Hmac::Sha512,
            Algorithm::Rs256 => &Rsa::Sha256,
            Algorithm::Rs384 => &Rsa::Sha384,
            Algorithm::Rs512 => &Rsa::Sha512,
            Algorithm::Es256 => &Ecdsa::Sha256,
            Algorithm::Es384 => &Ecdsa::Sha384,
            Algorithm::Es512 => &Ecdsa::Sha512,
            Algorithm::EdDsa => &Eddsa,
            Algorithm::Blake2b => &Blake2b,
            Algorithm::Unsecured => &Unsecured,
        }
    }
}

impl Signer for Algorithm {
    fn algorithm_id(&self) -> &'static str {
        self.id()
    }

    fn sign(&self, payload: &[u8], key: &Key) -> JwsResult<Vec<u8>> {
        self.signer().sign(payload, key)
    }

    fn verify(&self, expected: &[u8], payload: &[u8], key: &Key) -> JwsResult<bool> {
        self.signer().verify(expected, payload, key)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Constant-time comparison of a recomputed MAC with the presented one
#[inline]
pub(crate) fn constant_time_eq(expected: &[u8], computed: &[u8]) -> bool {
    expected.ct_eq(computed).into()
}
