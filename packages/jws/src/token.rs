//! Immutable token model

use crate::types::{ClaimValue, DataSet, Signature, registered_claims};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fmt;

/// A built or parsed token
///
/// Holds the decoded headers and claims, the optional signature (absent for
/// unsecured tokens) and the `header.payload` signing input exactly as it
/// appears on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    headers: DataSet,
    claims: DataSet,
    signature: Option<Signature>,
}

impl Token {
    pub(crate) fn new(headers: DataSet, claims: DataSet, signature: Option<Signature>) -> Self {
        Self {
            headers,
            claims,
            signature,
        }
    }

    /// Decoded header entries
    #[must_use]
    pub fn headers(&self) -> &DataSet {
        &self.headers
    }

    /// Decoded claim entries
    #[must_use]
    pub fn claims(&self) -> &DataSet {
        &self.claims
    }

    /// Signature, `None` for unsecured tokens
    #[must_use]
    pub fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    /// `header.payload`, the exact bytes the signature covers
    #[must_use]
    pub fn signing_input(&self) -> String {
        format!("{}.{}", self.headers.encoded(), self.claims.encoded())
    }

    /// Value of the `alg` header
    #[must_use]
    pub fn algorithm(&self) -> Option<&str> {
        self.headers.get("alg").and_then(ClaimValue::as_str)
    }

    /// Whether `audience` is listed in the `aud` claim
    #[must_use]
    pub fn is_permitted_for(&self, audience: &str) -> bool {
        match self.claims.get(registered_claims::AUDIENCE) {
            Some(ClaimValue::Value(Value::Array(audiences))) => audiences
                .iter()
                .any(|candidate| candidate.as_str() == Some(audience)),
            Some(ClaimValue::Value(Value::String(single))) => single == audience,
            _ => false,
        }
    }

    /// Whether the `jti` claim equals `id`
    #[must_use]
    pub fn is_identified_by(&self, id: &str) -> bool {
        self.string_claim(registered_claims::ID) == Some(id)
    }

    /// Whether the `sub` claim equals `subject`
    #[must_use]
    pub fn is_related_to(&self, subject: &str) -> bool {
        self.string_claim(registered_claims::SUBJECT) == Some(subject)
    }

    /// Whether the `iss` claim is one of `issuers`
    #[must_use]
    pub fn has_been_issued_by<S: AsRef<str>>(&self, issuers: &[S]) -> bool {
        self.string_claim(registered_claims::ISSUER)
            .is_some_and(|issuer| issuers.iter().any(|candidate| candidate.as_ref() == issuer))
    }

    /// Whether `iat` is at or before `now`; an absent claim counts as issued
    #[must_use]
    pub fn has_been_issued_before(&self, now: DateTime<Utc>) -> bool {
        self.date_claim(registered_claims::ISSUED_AT)
            .is_none_or(|issued_at| now >= issued_at)
    }

    /// Whether `nbf` is at or before `now`; an absent claim counts as usable
    #[must_use]
    pub fn is_minimum_time_before(&self, now: DateTime<Utc>) -> bool {
        self.date_claim(registered_claims::NOT_BEFORE)
            .is_none_or(|not_before| now >= not_before)
    }

    /// Whether `exp` is at or before `now`; tokens without `exp` never expire
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.date_claim(registered_claims::EXPIRATION_TIME)
            .is_some_and(|expires_at| now >= expires_at)
    }

    fn string_claim(&self, name: &str) -> Option<&str> {
        self.claims.get(name).and_then(ClaimValue::as_str)
    }

    fn date_claim(&self, name: &str) -> Option<DateTime<Utc>> {
        self.claims.get(name).and_then(ClaimValue::as_timestamp)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.", self.headers, self.claims)?;
        if let Some(signature) = &self.signature {
            write!(f, "{signature}")?;
        }
        Ok(())
    }
}
