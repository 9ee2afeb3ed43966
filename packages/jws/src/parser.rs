//! Compact serialization parser

use crate::codec::{Decoder, JoseCodec};
use crate::error::{JwsError, JwsResult};
use crate::token::Token;
use crate::types::{ClaimValue, Claims, DataSet, Signature, registered_claims};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

const MICROS_PER_SECOND: i64 = 1_000_000;

/// Turns `header.payload[.signature]` strings into [`Token`]s
///
/// Parsing checks structure only; signatures and claims are checked by the
/// validator.
#[derive(Clone)]
pub struct Parser {
    decoder: Arc<dyn Decoder>,
}

impl Parser {
    /// Parser using the given decoder
    #[must_use]
    pub fn new(decoder: Arc<dyn Decoder>) -> Self {
        Self { decoder }
    }

    /// Parse a compact token
    ///
    /// # Errors
    /// - [`JwsError::InvalidTokenStructure`] for a wrong segment count,
    ///   non-object segments, empty names or malformed date claims
    /// - [`JwsError::UnsupportedHeaderFound`] for encrypted tokens or
    ///   critical header extensions
    /// - [`JwsError::CannotDecodeContent`] for malformed base64 or JSON
    pub fn parse(&self, jwt: &str) -> JwsResult<Token> {
        let segments: Vec<&str> = jwt.split('.').collect();
        let (header, claims, signature) = match segments.as_slice() {
            [header, claims] => (*header, *claims, None),
            [header, claims, signature] => (*header, *claims, Some(*signature)),
            _ => {
                return Err(JwsError::invalid_structure(
                    "The JWT string must have one or two dots",
                ));
            }
        };

        let headers = self.parse_header(header)?;
        let claims_set = self.parse_claims(claims)?;
        let signature = match signature {
            Some(encoded) if !encoded.is_empty() => Some(Signature::new(
                self.decoder.base64_url_decode(encoded)?,
                encoded.to_owned(),
            )),
            _ => None,
        };

        debug!(
            alg = headers.get("alg").and_then(ClaimValue::as_str),
            claims = claims_set.len(),
            signed = signature.is_some(),
            "parsed token"
        );

        Ok(Token::new(
            DataSet::new(headers, header.to_owned()),
            DataSet::new(claims_set, claims.to_owned()),
            signature,
        ))
    }

    fn decode_object(&self, segment: &str, what: &str) -> JwsResult<Map<String, Value>> {
        let bytes = self.decoder.base64_url_decode(segment)?;
        match self.decoder.json_decode(&bytes)? {
            Value::Object(object) => {
                if object.keys().any(String::is_empty) {
                    return Err(JwsError::invalid_structure(&format!(
                        "{what} names must be non-empty strings"
                    )));
                }
                Ok(object)
            }
            _ => Err(JwsError::invalid_structure(&format!(
                "{what} must be a JSON object"
            ))),
        }
    }

    fn parse_header(&self, segment: &str) -> JwsResult<Claims> {
        let header = self.decode_object(segment, "Header")?;

        if header.contains_key("enc") {
            return Err(JwsError::UnsupportedHeaderFound(
                "Encryption is not supported yet".to_owned(),
            ));
        }
        if let Some(critical) = header.get("crit") {
            let Value::Array(extensions) = critical else {
                return Err(JwsError::invalid_structure(
                    "The \"crit\" header must be a list of names",
                ));
            };
            if let Some(extension) = extensions.first() {
                return Err(JwsError::UnsupportedHeaderFound(format!(
                    "Critical header extension {extension} is not supported"
                )));
            }
        }

        Ok(header
            .into_iter()
            .map(|(name, value)| (name, ClaimValue::Value(value)))
            .collect())
    }

    fn parse_claims(&self, segment: &str) -> JwsResult<Claims> {
        let claims = self.decode_object(segment, "Claims")?;
        claims
            .into_iter()
            .map(|(name, value)| -> JwsResult<(String, ClaimValue)> {
                let value = match (name.as_str(), value) {
                    (registered_claims::AUDIENCE, Value::String(audience)) => {
                        ClaimValue::Value(Value::Array(vec![Value::String(audience)]))
                    }
                    (date, value) if registered_claims::DATE_CLAIMS.contains(&date) => {
                        ClaimValue::Timestamp(convert_date(&value)?)
                    }
                    (_, value) => ClaimValue::Value(value),
                };
                Ok((name, value))
            })
            .collect()
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(Arc::new(JoseCodec))
    }
}

/// Integer seconds, fractional seconds as a JSON float, or either as a string
fn convert_date(value: &Value) -> JwsResult<DateTime<Utc>> {
    let text = match value {
        Value::Number(number) => match number.as_i64() {
            Some(seconds) => return timestamp(seconds, 0, false, value),
            None => format!("{:.6}", number.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(text) => text.clone(),
        _ => return Err(invalid_date(value)),
    };

    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.as_str()),
    };
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let all_digits = |part: &str| part.bytes().all(|byte| byte.is_ascii_digit());
    if whole.is_empty()
        || !all_digits(whole)
        || !all_digits(fraction)
        || (unsigned.contains('.') && fraction.is_empty())
    {
        return Err(invalid_date(value));
    }

    let seconds: i64 = whole.parse().map_err(|_| invalid_date(value))?;
    let micros = fraction
        .bytes()
        .chain(std::iter::repeat(b'0'))
        .take(6)
        .fold(0i64, |acc, digit| acc * 10 + i64::from(digit - b'0'));
    timestamp(seconds, micros, negative, value)
}

fn timestamp(seconds: i64, micros: i64, negative: bool, raw: &Value) -> JwsResult<DateTime<Utc>> {
    let magnitude = seconds
        .checked_mul(MICROS_PER_SECOND)
        .and_then(|total| total.checked_add(micros))
        .ok_or_else(|| invalid_date(raw))?;
    let total = if negative { -magnitude } else { magnitude };
    DateTime::from_timestamp_micros(total).ok_or_else(|| invalid_date(raw))
}

fn invalid_date(value: &Value) -> JwsError {
    JwsError::invalid_structure(&format!(
        "Value is not in the allowed date format: {value}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_date_formats() {
        let expected = Utc.timestamp_opt(1_700_000_000, 250_000_000).unwrap();
        assert_eq!(convert_date(&json!("1700000000.250000")).unwrap(), expected);
        assert_eq!(convert_date(&json!("1700000000.25")).unwrap(), expected);
        assert_eq!(convert_date(&json!(1_700_000_000.25)).unwrap(), expected);
        assert_eq!(
            convert_date(&json!(1_700_000_000)).unwrap(),
            Utc.timestamp_opt(1_700_000_000, 0).unwrap()
        );
        assert_eq!(
            convert_date(&json!("-1.500000")).unwrap(),
            Utc.timestamp_opt(-2, 500_000_000).unwrap()
        );
    }

    #[test]
    fn test_rejected_date_formats() {
        for value in [
            json!("tomorrow"),
            json!(""),
            json!("1."),
            json!("1e9"),
            json!(true),
            json!(["1"]),
        ] {
            let err = convert_date(&value).unwrap_err();
            assert!(
                err.to_string().starts_with("Value is not in the allowed date format"),
                "{value} -> {err}"
            );
        }
    }
}
