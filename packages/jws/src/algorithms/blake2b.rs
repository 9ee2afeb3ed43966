//! Keyed BLAKE2b MAC signer

use super::{Signer, constant_time_eq};
use crate::error::{JwsError, JwsResult};
use crate::key::Key;
use blake2b_simd::Params;
use tracing::warn;

const MINIMUM_KEY_LENGTH_IN_BITS: usize = 256;
const MAXIMUM_KEY_LENGTH_IN_BITS: usize = blake2b_simd::KEYBYTES * 8;
const DIGEST_LENGTH: usize = 32;

/// BLAKE2b in keyed mode with a 256-bit digest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Blake2b;

impl Blake2b {
    /// Wire `alg` identifier
    pub const ID: &'static str = "BLAKE2B";

    fn guard_key(key: &Key) -> JwsResult<()> {
        let actual = key.bit_len();
        if actual == 0 {
            return Err(JwsError::invalid_key("Key cannot be empty"));
        }
        if actual < MINIMUM_KEY_LENGTH_IN_BITS {
            warn!(alg = Self::ID, actual, "rejected short BLAKE2b key");
            return Err(JwsError::key_too_short(MINIMUM_KEY_LENGTH_IN_BITS, actual));
        }
        if actual > MAXIMUM_KEY_LENGTH_IN_BITS {
            warn!(alg = Self::ID, actual, "rejected oversized BLAKE2b key");
            return Err(JwsError::invalid_key(&format!(
                "Key provided is longer than {MAXIMUM_KEY_LENGTH_IN_BITS} bits, {actual} bits provided"
            )));
        }
        Ok(())
    }
}

impl Signer for Blake2b {
    fn algorithm_id(&self) -> &'static str {
        Self::ID
    }

    fn sign(&self, payload: &[u8], key: &Key) -> JwsResult<Vec<u8>> {
        Self::guard_key(key)?;
        let hash = Params::new()
            .hash_length(DIGEST_LENGTH)
            .key(key.contents())
            .hash(payload);
        Ok(hash.as_bytes().to_vec())
    }

    fn verify(&self, expected: &[u8], payload: &[u8], key: &Key) -> JwsResult<bool> {
        let computed = self.sign(payload, key)?;
        Ok(constant_time_eq(expected, &computed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_256_bits() {
        let key = Key::plain_text([7u8; 32], None).unwrap();
        assert_eq!(Blake2b.sign(b"payload", &key).unwrap().len(), 32);
    }

    #[test]
    fn test_key_bounds() {
        let short = Key::plain_text([7u8; 31], None).unwrap();
        assert_eq!(
            Blake2b.sign(b"payload", &short).unwrap_err().to_string(),
            "Key provided is shorter than 256 bits, only 248 bits provided"
        );

        let long = Key::plain_text([7u8; 65], None).unwrap();
        assert!(matches!(
            Blake2b.sign(b"payload", &long),
            Err(JwsError::InvalidKeyProvided(_))
        ));
    }

    #[test]
    fn test_different_keys_produce_different_macs() {
        let first = Key::plain_text([1u8; 32], None).unwrap();
        let second = Key::plain_text([2u8; 32], None).unwrap();
        let mac = Blake2b.sign(b"payload", &first).unwrap();
        assert!(Blake2b.verify(&mac, b"payload", &first).unwrap());
        assert!(!Blake2b.verify(&mac, b"payload", &second).unwrap());
    }
}
