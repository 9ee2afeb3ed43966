//! Core data types: claim values, data sets and signatures

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Registered claim names with dedicated semantics
pub mod registered_claims {
    /// Audience
    pub const AUDIENCE: &str = "aud";
    /// Expiration time
    pub const EXPIRATION_TIME: &str = "exp";
    /// Token identifier
    pub const ID: &str = "jti";
    /// Issued at
    pub const ISSUED_AT: &str = "iat";
    /// Issuer
    pub const ISSUER: &str = "iss";
    /// Not before
    pub const NOT_BEFORE: &str = "nbf";
    /// Subject
    pub const SUBJECT: &str = "sub";

    /// Every registered claim name
    pub const ALL: [&str; 7] = [
        AUDIENCE,
        EXPIRATION_TIME,
        ID,
        ISSUED_AT,
        ISSUER,
        NOT_BEFORE,
        SUBJECT,
    ];

    /// Claims holding a point in time
    pub const DATE_CLAIMS: [&str; 3] = [ISSUED_AT, NOT_BEFORE, EXPIRATION_TIME];

    /// Whether `name` is one of the registered claim names
    #[must_use]
    pub fn is_registered(name: &str) -> bool {
        ALL.contains(&name)
    }
}

/// A header or claim value
///
/// Date claims are held as timestamps so that time constraints can compare
/// them directly; everything else is plain JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimValue {
    /// Any JSON value
    Value(Value),
    /// Point in time with microsecond precision on the wire
    Timestamp(DateTime<Utc>),
}

impl ClaimValue {
    /// String content, if this is a JSON string
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ClaimValue::Value(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Timestamp content, if this is a date
    #[must_use]
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            ClaimValue::Timestamp(at) => Some(*at),
            ClaimValue::Value(_) => None,
        }
    }

    /// JSON content, if this is not a date
    #[must_use]
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            ClaimValue::Value(value) => Some(value),
            ClaimValue::Timestamp(_) => None,
        }
    }

    /// JSON rendering; dates become integer Unix seconds
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            ClaimValue::Value(value) => value.clone(),
            ClaimValue::Timestamp(at) => Value::from(at.timestamp()),
        }
    }
}

impl Serialize for ClaimValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ClaimValue::Value(value) => value.serialize(serializer),
            ClaimValue::Timestamp(at) => serializer.serialize_i64(at.timestamp()),
        }
    }
}

impl From<Value> for ClaimValue {
    fn from(value: Value) -> Self {
        ClaimValue::Value(value)
    }
}

impl From<&str> for ClaimValue {
    fn from(value: &str) -> Self {
        ClaimValue::Value(Value::String(value.to_owned()))
    }
}

impl From<String> for ClaimValue {
    fn from(value: String) -> Self {
        ClaimValue::Value(Value::String(value))
    }
}

impl From<bool> for ClaimValue {
    fn from(value: bool) -> Self {
        ClaimValue::Value(Value::Bool(value))
    }
}

impl From<i64> for ClaimValue {
    fn from(value: i64) -> Self {
        ClaimValue::Value(Value::from(value))
    }
}

impl From<DateTime<Utc>> for ClaimValue {
    fn from(value: DateTime<Utc>) -> Self {
        ClaimValue::Timestamp(value)
    }
}

/// Ordered claim or header entries keyed by name
pub type Claims = IndexMap<String, ClaimValue>;

/// Decoded header or claims segment together with its wire form
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    entries: Claims,
    encoded: String,
}

impl DataSet {
    /// Pair decoded entries with the base64url segment they came from
    #[must_use]
    pub fn new(entries: Claims, encoded: String) -> Self {
        Self { entries, encoded }
    }

    /// Value stored under `name`
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ClaimValue> {
        self.entries.get(name)
    }

    /// Whether `name` is present
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Every entry, in encoding order
    #[must_use]
    pub fn all(&self) -> &Claims {
        &self.entries
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Base64url segment exactly as it appeared in the token
    #[must_use]
    pub fn encoded(&self) -> &str {
        &self.encoded
    }
}

impl fmt::Display for DataSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

/// Signature bytes and their wire form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    hash: Vec<u8>,
    encoded: String,
}

impl Signature {
    /// Pair raw signature bytes with their base64url encoding
    #[must_use]
    pub fn new(hash: Vec<u8>, encoded: String) -> Self {
        Self { hash, encoded }
    }

    /// Raw bytes handed to `Signer::verify`
    #[must_use]
    pub fn hash(&self) -> &[u8] {
        &self.hash
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}
