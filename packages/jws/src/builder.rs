//! Token builder
//!
//! Accumulates headers and claims, then [`Builder::get_token`] encodes both
//! segments, signs `header.payload` and consumes the builder.

use crate::algorithms::{Signer, Unsecured};
use crate::codec::{Encoder, JoseCodec};
use crate::error::{JwsError, JwsResult};
use crate::formatter::ChainedFormatter;
use crate::key::Key;
use crate::token::Token;
use crate::types::{ClaimValue, Claims, DataSet, Signature, registered_claims};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Builder for signed tokens
#[derive(Clone)]
pub struct Builder {
    encoder: Arc<dyn Encoder>,
    formatter: ChainedFormatter,
    headers: Claims,
    claims: Claims,
}

impl Builder {
    /// Create a builder with `typ: JWT` as its only header
    #[must_use]
    pub fn new(encoder: Arc<dyn Encoder>, formatter: ChainedFormatter) -> Self {
        let mut headers = Claims::new();
        headers.insert("typ".to_owned(), ClaimValue::from("JWT"));
        Self {
            encoder,
            formatter,
            headers,
            claims: Claims::new(),
        }
    }

    /// Append audiences to `aud`, skipping ones already present
    #[must_use]
    pub fn permitted_for<I, S>(mut self, audiences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entry = self
            .claims
            .entry(registered_claims::AUDIENCE.to_owned())
            .or_insert_with(|| ClaimValue::Value(Value::Array(Vec::new())));
        if !matches!(entry, ClaimValue::Value(Value::Array(_))) {
            *entry = ClaimValue::Value(Value::Array(Vec::new()));
        }
        if let ClaimValue::Value(Value::Array(current)) = entry {
            for audience in audiences {
                let audience = Value::String(audience.into());
                if !current.contains(&audience) {
                    current.push(audience);
                }
            }
        }
        self
    }

    /// Set `exp`
    #[inline]
    #[must_use]
    pub fn expires_at(self, expiration: DateTime<Utc>) -> Self {
        self.set_registered(registered_claims::EXPIRATION_TIME, expiration)
    }

    /// Set `jti`
    #[inline]
    #[must_use]
    pub fn identified_by(self, id: &str) -> Self {
        self.set_registered(registered_claims::ID, id)
    }

    /// Set `iat`
    #[inline]
    #[must_use]
    pub fn issued_at(self, issued_at: DateTime<Utc>) -> Self {
        self.set_registered(registered_claims::ISSUED_AT, issued_at)
    }

    /// Set `iss`
    #[inline]
    #[must_use]
    pub fn issued_by(self, issuer: &str) -> Self {
        self.set_registered(registered_claims::ISSUER, issuer)
    }

    /// Set `nbf`
    #[inline]
    #[must_use]
    pub fn can_only_be_used_after(self, not_before: DateTime<Utc>) -> Self {
        self.set_registered(registered_claims::NOT_BEFORE, not_before)
    }

    /// Set `sub`
    #[inline]
    #[must_use]
    pub fn related_to(self, subject: &str) -> Self {
        self.set_registered(registered_claims::SUBJECT, subject)
    }

    /// Set a header entry; `alg` is always overwritten by the signer
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.headers
            .insert(name.to_owned(), ClaimValue::Value(value.into()));
        self
    }

    /// Set a private claim
    ///
    /// # Errors
    /// Returns [`JwsError::RegisteredClaimGiven`] for registered names, which
    /// have dedicated setters, and [`JwsError::CannotEncodeContent`] for an
    /// empty name.
    pub fn with_claim(mut self, name: &str, value: impl Into<ClaimValue>) -> JwsResult<Self> {
        if name.is_empty() {
            return Err(JwsError::cannot_encode("Claim name cannot be empty"));
        }
        if registered_claims::is_registered(name) {
            return Err(JwsError::RegisteredClaimGiven(name.to_owned()));
        }
        self.claims.insert(name.to_owned(), value.into());
        Ok(self)
    }

    /// Encode, sign and return the finished token
    ///
    /// # Errors
    /// Propagates codec failures and any signer error, such as a key that is
    /// too short or of the wrong family.
    pub fn get_token(self, signer: &dyn Signer, key: &Key) -> JwsResult<Token> {
        let mut headers = self.headers;
        headers.insert("alg".to_owned(), ClaimValue::from(signer.algorithm_id()));
        if headers.keys().any(String::is_empty) {
            return Err(JwsError::cannot_encode("Header name cannot be empty"));
        }

        let encoded_headers = encode(self.encoder.as_ref(), &headers)?;
        let encoded_claims =
            encode(self.encoder.as_ref(), &self.formatter.format(self.claims.clone()))?;

        let signing_input = format!("{encoded_headers}.{encoded_claims}");
        let hash = signer.sign(signing_input.as_bytes(), key)?;
        let signature = if signer.algorithm_id() == Unsecured::ID {
            None
        } else {
            let encoded = self.encoder.base64_url_encode(&hash);
            Some(Signature::new(hash, encoded))
        };

        debug!(
            alg = signer.algorithm_id(),
            headers = headers.len(),
            claims = self.claims.len(),
            "issued token"
        );

        Ok(Token::new(
            DataSet::new(headers, encoded_headers),
            DataSet::new(self.claims, encoded_claims),
            signature,
        ))
    }

    fn set_registered(mut self, name: &str, value: impl Into<ClaimValue>) -> Self {
        self.claims.insert(name.to_owned(), value.into());
        self
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new(Arc::new(JoseCodec), ChainedFormatter::default())
    }
}

fn encode(encoder: &dyn Encoder, entries: &Claims) -> JwsResult<String> {
    let json =
        serde_json::to_value(entries).map_err(|e| JwsError::cannot_encode(&e.to_string()))?;
    let bytes = encoder.json_encode(&json)?;
    Ok(encoder.base64_url_encode(&bytes))
}
