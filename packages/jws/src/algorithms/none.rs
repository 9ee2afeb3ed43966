//! Unsecured `none` algorithm

use super::Signer;
use crate::error::JwsResult;
use crate::key::Key;

/// Produces and accepts only empty signatures
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Unsecured;

impl Unsecured {
    /// Wire `alg` identifier
    pub const ID: &'static str = "none";
}

impl Signer for Unsecured {
    fn algorithm_id(&self) -> &'static str {
        Self::ID
    }

    fn sign(&self, _payload: &[u8], _key: &Key) -> JwsResult<Vec<u8>> {
        Ok(Vec::new())
    }

    fn verify(&self, expected: &[u8], _payload: &[u8], _key: &Key) -> JwsResult<bool> {
        Ok(expected.is_empty())
    }
}
