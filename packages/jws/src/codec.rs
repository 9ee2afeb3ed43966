//! JSON and base64url codec for token segments
//!
//! The codec is the only place that touches `serde_json` and `base64`
//! directly, so every failure crossing it is one of exactly two kinds:
//! [`JwsError::CannotEncodeContent`] or [`JwsError::CannotDecodeContent`].

use crate::error::{JwsError, JwsResult};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde_json::Value;

/// Turns values into segment bytes
pub trait Encoder: Send + Sync {
    /// Encode a JSON value. `/` and non-ASCII characters are written as-is.
    ///
    /// # Errors
    /// Returns [`JwsError::CannotEncodeContent`] if serialization fails.
    fn json_encode(&self, value: &Value) -> JwsResult<Vec<u8>>;

    /// Unpadded RFC 4648 §5 encoding
    fn base64_url_encode(&self, data: &[u8]) -> String;
}

/// Turns segment bytes back into values
pub trait Decoder: Send + Sync {
    /// Decode JSON bytes
    ///
    /// # Errors
    /// Returns [`JwsError::CannotDecodeContent`] on malformed JSON.
    fn json_decode(&self, json: &[u8]) -> JwsResult<Value>;

    /// Strict unpadded RFC 4648 §5 decoding
    ///
    /// # Errors
    /// Returns [`JwsError::CannotDecodeContent`] on any character outside the
    /// url-safe alphabet, on padding, or on non-canonical trailing bits.
    fn base64_url_decode(&self, data: &str) -> JwsResult<Vec<u8>>;
}

/// Default codec following JOSE conventions
#[derive(Debug, Clone, Copy, Default)]
pub struct JoseCodec;

impl Encoder for JoseCodec {
    #[inline]
    fn json_encode(&self, value: &Value) -> JwsResult<Vec<u8>> {
        serde_json::to_vec(value).map_err(|e| JwsError::cannot_encode(&e.to_string()))
    }

    #[inline]
    fn base64_url_encode(&self, data: &[u8]) -> String {
        URL_SAFE_NO_PAD.encode(data)
    }
}

impl Decoder for JoseCodec {
    #[inline]
    fn json_decode(&self, json: &[u8]) -> JwsResult<Value> {
        serde_json::from_slice(json).map_err(|e| JwsError::json_issues(&e.to_string()))
    }

    #[inline]
    fn base64_url_decode(&self, data: &str) -> JwsResult<Vec<u8>> {
        URL_SAFE_NO_PAD
            .decode(data)
            .map_err(|_| JwsError::invalid_base64())
    }
}
