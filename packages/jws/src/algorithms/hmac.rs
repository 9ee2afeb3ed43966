//! HMAC-SHA signers (HS256, HS384, HS512)

use super::{Signer, constant_time_eq};
use crate::error::{JwsError, JwsResult};
use crate::key::Key;
use hmac::{Mac, SimpleHmac};
use sha2::{Sha256, Sha384, Sha512};
use tracing::warn;

/// HMAC with the SHA-2 digest matching the algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hmac {
    /// HS256
    Sha256,
    /// HS384
    Sha384,
    /// HS512
    Sha512,
}

impl Hmac {
    /// Wire `alg` identifier
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Hmac::Sha256 => "HS256",
            Hmac::Sha384 => "HS384",
            Hmac::Sha512 => "HS512",
        }
    }

    /// Shortest accepted key, in bits
    #[must_use]
    pub const fn minimum_bits_length_for_key(self) -> usize {
        match self {
            Hmac::Sha256 => 256,
            Hmac::Sha384 => 384,
            Hmac::Sha512 => 512,
        }
    }

    fn mac(self, payload: &[u8], secret: &[u8]) -> JwsResult<Vec<u8>> {
        match self {
            Hmac::Sha256 => compute::<Sha256>(payload, secret),
            Hmac::Sha384 => compute::<Sha384>(payload, secret),
            Hmac::Sha512 => compute::<Sha512>(payload, secret),
        }
    }

    fn guard_key(self, key: &Key) -> JwsResult<()> {
        let required = self.minimum_bits_length_for_key();
        let actual = key.bit_len();
        if actual == 0 {
            return Err(JwsError::invalid_key("Key cannot be empty"));
        }
        if actual < required {
            warn!(alg = self.id(), required, actual, "rejected short HMAC key");
            return Err(JwsError::key_too_short(required, actual));
        }
        Ok(())
    }
}

fn compute<D>(payload: &[u8], secret: &[u8]) -> JwsResult<Vec<u8>>
where
    D: sha2::Digest + sha2::digest::core_api::BlockSizeUser,
{
    let mut mac = <SimpleHmac<D> as Mac>::new_from_slice(secret)
        .map_err(|_| JwsError::invalid_key("Invalid HMAC key"))?;
    mac.update(payload);
    Ok(mac.finalize().into_bytes().to_vec())
}

impl Signer for Hmac {
    fn algorithm_id(&self) -> &'static str {
        self.id()
    }

    fn sign(&self, payload: &[u8], key: &Key) -> JwsResult<Vec<u8>> {
        self.guard_key(key)?;
        self.mac(payload, key.contents())
    }

    fn verify(&self, expected: &[u8], payload: &[u8], key: &Key) -> JwsResult<bool> {
        let computed = self.sign(payload, key)?;
        Ok(constant_time_eq(expected, &computed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_rejects_key_below_minimum() {
        let key = Key::plain_text([0x0bu8; 16], None).unwrap();
        let err = Hmac::Sha256.sign(b"payload", &key).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Key provided is shorter than 256 bits, only 128 bits provided"
        );
    }

    #[test]
    fn test_minimum_grows_with_digest() {
        let key = Key::plain_text([0x0bu8; 32], None).unwrap();
        assert!(Hmac::Sha256.sign(b"payload", &key).is_ok());
        assert!(Hmac::Sha384.sign(b"payload", &key).is_err());
        assert!(Hmac::Sha512.sign(b"payload", &key).is_err());
    }

    #[test]
    fn test_rfc4231_larger_than_block_size_key() {
        let key = Key::plain_text([0xaau8; 131], None).unwrap();
        let mac = Hmac::Sha256
            .sign(b"Test Using Larger Than Block-Size Key - Hash Key First", &key)
            .unwrap();
        assert_eq!(
            mac,
            hex!("60e431591ee0b67f0d8a26aacbf5b77f8e0bc6213728c5140546040f0ee37f54").to_vec()
        );
    }

    #[test]
    fn test_verify_detects_flipped_bit() {
        let key = Key::plain_text([0x42u8; 64], None).unwrap();
        let mut mac = Hmac::Sha512.sign(b"payload", &key).unwrap();
        assert!(Hmac::Sha512.verify(&mac, b"payload", &key).unwrap());
        mac[10] ^= 0x01;
        assert!(!Hmac::Sha512.verify(&mac, b"payload", &key).unwrap());
    }
}
