//! Key material holder

use crate::error::{JwsError, JwsResult};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Opaque key material plus an optional passphrase
///
/// Contents are raw secret bytes for symmetric signers and PEM text for
/// RSA/ECDSA. EdDSA takes raw 32-byte seeds, 64-byte keypairs or 32-byte
/// public keys. Both fields are wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Key {
    contents: Vec<u8>,
    passphrase: Option<String>,
}

impl Key {
    /// Wrap raw key material
    ///
    /// # Errors
    /// Returns [`JwsError::InvalidKeyProvided`] when `contents` is empty.
    pub fn plain_text(
        contents: impl Into<Vec<u8>>,
        passphrase: Option<&str>,
    ) -> JwsResult<Self> {
        let contents = contents.into();
        if contents.is_empty() {
            return Err(JwsError::invalid_key("Key cannot be empty"));
        }
        Ok(Self {
            contents,
            passphrase: passphrase.map(str::to_owned),
        })
    }

    /// Decode standard-alphabet base64 key material
    ///
    /// # Errors
    /// Returns [`JwsError::CannotDecodeContent`] on malformed base64, or
    /// [`JwsError::InvalidKeyProvided`] when it decodes to nothing.
    pub fn base64_encoded(contents: &str, passphrase: Option<&str>) -> JwsResult<Self> {
        let decoded = STANDARD
            .decode(contents)
            .map_err(|_| JwsError::invalid_base64())?;
        Self::plain_text(decoded, passphrase)
    }

    /// Key with no material, only meaningful for the unsecured signer
    #[must_use]
    pub fn empty() -> Self {
        Self {
            contents: Vec::new(),
            passphrase: None,
        }
    }

    /// Raw key bytes
    #[must_use]
    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    /// Passphrase protecting the key material, if any
    #[must_use]
    pub fn passphrase(&self) -> Option<&str> {
        self.passphrase.as_deref()
    }

    pub(crate) fn bit_len(&self) -> usize {
        self.contents.len() * 8
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("contents", &format_args!("[{} bytes redacted]", self.contents.len()))
            .field("passphrase", &self.passphrase.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
