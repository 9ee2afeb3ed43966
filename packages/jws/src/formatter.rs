//! Claim formatters applied before the claims segment is encoded
//!
//! A formatter is a pure `Claims -> Claims` function. [`ChainedFormatter`]
//! applies its list left to right.

use crate::types::{ClaimValue, Claims, registered_claims};
use serde_json::Value;

/// Pure transformation of the claim set
pub type ClaimsFormatter = fn(Claims) -> Claims;

/// Collapse a single-element `aud` array into a bare string
#[must_use]
pub fn unify_audience(mut claims: Claims) -> Claims {
    if let Some(ClaimValue::Value(Value::Array(audiences))) =
        claims.get_mut(registered_claims::AUDIENCE)
    {
        if audiences.len() == 1 {
            let single = audiences.remove(0);
            claims.insert(registered_claims::AUDIENCE.to_owned(), ClaimValue::Value(single));
        }
    }
    claims
}

/// Render date claims as integer Unix seconds
#[must_use]
pub fn unix_timestamp_dates(claims: Claims) -> Claims {
    format_dates(claims, |at| Value::from(at.timestamp()))
}

/// Render date claims as integer seconds, or `"seconds.micros"` when the
/// timestamp carries a sub-second part
#[must_use]
pub fn microsecond_dates(claims: Claims) -> Claims {
    format_dates(claims, |at| {
        let micros = at.timestamp_micros();
        if micros % 1_000_000 == 0 {
            return Value::from(at.timestamp());
        }
        let sign = if micros < 0 { "-" } else { "" };
        let magnitude = micros.unsigned_abs();
        Value::String(format!(
            "{sign}{}.{:06}",
            magnitude / 1_000_000,
            magnitude % 1_000_000
        ))
    })
}

fn format_dates(
    mut claims: Claims,
    render: impl Fn(chrono::DateTime<chrono::Utc>) -> Value,
) -> Claims {
    for name in registered_claims::DATE_CLAIMS {
        if let Some(value) = claims.get_mut(name) {
            if let ClaimValue::Timestamp(at) = *value {
                *value = ClaimValue::Value(render(at));
            }
        }
    }
    claims
}

/// Ordered list of formatters
#[derive(Debug, Clone)]
pub struct ChainedFormatter {
    formatters: Vec<ClaimsFormatter>,
}

impl ChainedFormatter {
    /// Chain the given formatters in order
    #[must_use]
    pub fn new(formatters: Vec<ClaimsFormatter>) -> Self {
        Self { formatters }
    }

    /// Audience unification with integer-second dates
    #[must_use]
    pub fn with_unix_timestamp_dates() -> Self {
        Self::new(vec![unify_audience, unix_timestamp_dates])
    }

    /// Append a formatter to the end of the chain
    #[must_use]
    pub fn push(mut self, formatter: ClaimsFormatter) -> Self {
        self.formatters.push(formatter);
        self
    }

    /// Run every formatter over `claims`
    #[must_use]
    pub fn format(&self, claims: Claims) -> Claims {
        self.formatters
            .iter()
            .fold(claims, |claims, formatter| formatter(claims))
    }
}

impl Default for ChainedFormatter {
    /// Audience unification with microsecond-precision dates
    fn default() -> Self {
        Self::new(vec![unify_audience, microsecond_dates])
    }
}
