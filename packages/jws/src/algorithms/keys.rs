//! PEM key loading for the RSA and ECDSA signers

use crate::error::{JwsError, JwsResult};
use crate::key::Key;
use p256::elliptic_curve::sec1::ToEncodedPoint;
use pkcs8::{DecodePrivateKey, DecodePublicKey, EncryptedPrivateKeyInfo};
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};

/// Elliptic curves backing the ECDSA signers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Curve {
    P256,
    P384,
    P521,
}

impl Curve {
    pub(crate) const fn name(self) -> &'static str {
        match self {
            Curve::P256 => "P-256",
            Curve::P384 => "P-384",
            Curve::P521 => "P-521",
        }
    }
}

pub(crate) enum PrivateKey {
    Rsa(RsaPrivateKey),
    P256(p256::SecretKey),
    P384(p384::SecretKey),
    P521(p521::SecretKey),
}

impl PrivateKey {
    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            PrivateKey::Rsa(_) => "RSA",
            _ => "EC",
        }
    }
}

pub(crate) enum PublicKey {
    Rsa(RsaPublicKey),
    P256(p256::ecdsa::VerifyingKey),
    P384(p384::ecdsa::VerifyingKey),
    P521(p521::ecdsa::VerifyingKey),
}

impl PublicKey {
    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            PublicKey::Rsa(_) => "RSA",
            _ => "EC",
        }
    }
}

/// Load a signing key from `PRIVATE KEY`, `ENCRYPTED PRIVATE KEY`,
/// `RSA PRIVATE KEY` or `EC PRIVATE KEY` PEM
pub(crate) fn load_private_key(key: &Key) -> JwsResult<PrivateKey> {
    let block = parse_pem(key)?;
    match block.tag() {
        "PRIVATE KEY" => parse_pkcs8_private(block.contents()),
        "ENCRYPTED PRIVATE KEY" => {
            let passphrase = key.passphrase().ok_or_else(|| {
                JwsError::key_cannot_be_parsed("a passphrase is required for an encrypted key")
            })?;
            let encrypted = EncryptedPrivateKeyInfo::try_from(block.contents())
                .map_err(|e| JwsError::key_cannot_be_parsed(&e.to_string()))?;
            let document = encrypted
                .decrypt(passphrase)
                .map_err(|e| JwsError::key_cannot_be_parsed(&e.to_string()))?;
            parse_pkcs8_private(document.as_bytes())
        }
        "RSA PRIVATE KEY" => RsaPrivateKey::from_pkcs1_der(block.contents())
            .map(PrivateKey::Rsa)
            .map_err(|e| JwsError::key_cannot_be_parsed(&e.to_string())),
        "EC PRIVATE KEY" => parse_sec1_private(block.contents()),
        other => Err(unsupported_label(other)),
    }
}

/// Load a verification key from `PUBLIC KEY` or `RSA PUBLIC KEY` PEM
///
/// Private key PEM is accepted too; its public half is used.
pub(crate) fn load_public_key(key: &Key) -> JwsResult<PublicKey> {
    let block = parse_pem(key)?;
    match block.tag() {
        "PUBLIC KEY" => parse_spki(block.contents()),
        "RSA PUBLIC KEY" => RsaPublicKey::from_pkcs1_der(block.contents())
            .map(PublicKey::Rsa)
            .map_err(|e| JwsError::key_cannot_be_parsed(&e.to_string())),
        _ => load_private_key(key).and_then(public_half),
    }
}

fn parse_pem(key: &Key) -> JwsResult<pem::Pem> {
    if key.contents().is_empty() {
        return Err(JwsError::invalid_key("Key cannot be empty"));
    }
    pem::parse(key.contents()).map_err(|e| JwsError::key_cannot_be_parsed(&e.to_string()))
}

fn unsupported_label(label: &str) -> JwsError {
    JwsError::key_cannot_be_parsed(&format!("unsupported PEM label \"{label}\""))
}

fn parse_pkcs8_private(der: &[u8]) -> JwsResult<PrivateKey> {
    if let Ok(key) = RsaPrivateKey::from_pkcs8_der(der) {
        return Ok(PrivateKey::Rsa(key));
    }
    if let Ok(secret) = p256::SecretKey::from_pkcs8_der(der) {
        return Ok(PrivateKey::P256(secret));
    }
    if let Ok(secret) = p384::SecretKey::from_pkcs8_der(der) {
        return Ok(PrivateKey::P384(secret));
    }
    if let Ok(secret) = p521::SecretKey::from_pkcs8_der(der) {
        return Ok(PrivateKey::P521(secret));
    }
    Err(JwsError::key_cannot_be_parsed(
        "unsupported PKCS#8 private key algorithm",
    ))
}

fn parse_sec1_private(der: &[u8]) -> JwsResult<PrivateKey> {
    if let Ok(secret) = p256::SecretKey::from_sec1_der(der) {
        return Ok(PrivateKey::P256(secret));
    }
    if let Ok(secret) = p384::SecretKey::from_sec1_der(der) {
        return Ok(PrivateKey::P384(secret));
    }
    if let Ok(secret) = p521::SecretKey::from_sec1_der(der) {
        return Ok(PrivateKey::P521(secret));
    }
    Err(JwsError::key_cannot_be_parsed("unsupported EC private key curve"))
}

fn parse_spki(der: &[u8]) -> JwsResult<PublicKey> {
    if let Ok(key) = RsaPublicKey::from_public_key_der(der) {
        return Ok(PublicKey::Rsa(key));
    }
    if let Ok(public_key) = p256::PublicKey::from_public_key_der(der) {
        return ec_public(public_key, Curve::P256);
    }
    if let Ok(public_key) = p384::PublicKey::from_public_key_der(der) {
        return ec_public(public_key, Curve::P384);
    }
    if let Ok(public_key) = p521::PublicKey::from_public_key_der(der) {
        return ec_public(public_key, Curve::P521);
    }
    Err(JwsError::key_cannot_be_parsed(
        "unsupported public key algorithm",
    ))
}

fn public_half(private: PrivateKey) -> JwsResult<PublicKey> {
    match private {
        PrivateKey::Rsa(key) => Ok(PublicKey::Rsa(key.to_public_key())),
        PrivateKey::P256(secret) => ec_public(secret.public_key(), Curve::P256),
        PrivateKey::P384(secret) => ec_public(secret.public_key(), Curve::P384),
        PrivateKey::P521(secret) => ec_public(secret.public_key(), Curve::P521),
    }
}

trait IntoVerifyingKey {
    fn into_verifying_key(self) -> Result<PublicKey, String>;
}

impl IntoVerifyingKey for p256::PublicKey {
    fn into_verifying_key(self) -> Result<PublicKey, String> {
        p256::ecdsa::VerifyingKey::from_encoded_point(&self.to_encoded_point(false))
            .map(PublicKey::P256)
            .map_err(|e| e.to_string())
    }
}

impl IntoVerifyingKey for p384::PublicKey {
    fn into_verifying_key(self) -> Result<PublicKey, String> {
        p384::ecdsa::VerifyingKey::from_encoded_point(&self.to_encoded_point(false))
            .map(PublicKey::P384)
            .map_err(|e| e.to_string())
    }
}

impl IntoVerifyingKey for p521::PublicKey {
    fn into_verifying_key(self) -> Result<PublicKey, String> {
        p521::ecdsa::VerifyingKey::from_encoded_point(&self.to_encoded_point(false))
            .map(PublicKey::P521)
            .map_err(|e| e.to_string())
    }
}

fn ec_public(public_key: impl IntoVerifyingKey, curve: Curve) -> JwsResult<PublicKey> {
    public_key.into_verifying_key().map_err(|reason| {
        JwsError::key_cannot_be_parsed(&format!("{} public key error: {reason}", curve.name()))
    })
}
