//! JWS error types
//!
//! Every failure surfaced by this crate is one of the closed set of kinds
//! below. Codec, signer and parser errors propagate untouched; only the
//! validator aggregates, into [`JwsError::RequiredConstraintsViolated`].

use crate::validation::ConstraintViolation;
use std::fmt;
use thiserror::Error;

/// JWS operation result type
pub type JwsResult<T> = Result<T, JwsError>;

/// Reason an ECDSA signature could not be bridged between its raw and DER forms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionFailure {
    /// Input or a declared ASN.1 length does not match the expected size
    InvalidLength,
    /// DER input does not start with a SEQUENCE tag
    IncorrectStartSequence,
    /// A SEQUENCE member is not an INTEGER
    IntegerExpected,
}

impl fmt::Display for ConversionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionFailure::InvalidLength => write!(f, "Invalid signature length."),
            ConversionFailure::IncorrectStartSequence => {
                write!(f, "Invalid data. Should start with a sequence.")
            }
            ConversionFailure::IntegerExpected => {
                write!(f, "Invalid data. Should contain an integer.")
            }
        }
    }
}

/// Every violation collected by a failed `Validator::assert`, in evaluation order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredConstraintsViolated {
    violations: Vec<ConstraintViolation>,
}

impl RequiredConstraintsViolated {
    pub(crate) fn from_violations(violations: Vec<ConstraintViolation>) -> Self {
        Self { violations }
    }

    /// Individual violations, in the order their constraints were given
    #[must_use]
    pub fn violations(&self) -> &[ConstraintViolation] {
        &self.violations
    }
}

impl fmt::Display for RequiredConstraintsViolated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "The token violates some mandatory constraints, details:")?;
        for violation in &self.violations {
            write!(f, "\n- {}", violation.message())?;
        }
        Ok(())
    }
}

/// JWS error types
#[derive(Debug, Error)]
pub enum JwsError {
    /// Value could not be serialized to JSON
    #[error("Error while encoding to JSON: {0}")]
    CannotEncodeContent(String),

    /// Malformed JSON or malformed base64
    #[error("{0}")]
    CannotDecodeContent(String),

    /// Key is empty, too short, unparseable or of the wrong family
    #[error("{0}")]
    InvalidKeyProvided(String),

    /// ECDSA signature could not be converted between raw and DER forms
    #[error("{0}")]
    ConversionFailed(ConversionFailure),

    /// Token string is not a well-formed compact serialization
    #[error("{0}")]
    InvalidTokenStructure(String),

    /// Header declares a feature this crate does not implement
    #[error("{0}")]
    UnsupportedHeaderFound(String),

    /// One or more constraints failed during `Validator::assert`
    #[error("{0}")]
    RequiredConstraintsViolated(RequiredConstraintsViolated),

    /// `Validator` was called without any constraint
    #[error("No constraint given.")]
    NoConstraintsGiven,

    /// Time constraint built with a negative leeway
    #[error("Leeway cannot be negative")]
    LeewayCannotBeNegative,

    /// Generic claim constraint pointed at a registered claim
    #[error(
        "The claim \"{0}\" is a registered claim, another constraint must be used to validate its value"
    )]
    CannotValidateARegisteredClaim(String),

    /// `Builder::with_claim` called with a registered claim name
    #[error(
        "Builder::with_claim() is meant to be used for non-registered claims, check the documentation on how to set claim \"{0}\""
    )]
    RegisteredClaimGiven(String),

    /// `alg` value not present in the algorithm registry
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Background task dropped its result channel
    #[error("Background task failed")]
    TaskFailed,
}

impl JwsError {
    /// Create a JSON encoding error
    #[inline]
    #[must_use]
    pub fn cannot_encode(msg: &str) -> Self {
        JwsError::CannotEncodeContent(msg.to_string())
    }

    /// Create a malformed JSON error
    #[inline]
    #[must_use]
    pub fn json_issues(msg: &str) -> Self {
        JwsError::CannotDecodeContent(format!("Error while decoding from JSON: {msg}"))
    }

    /// Create a malformed base64 error
    #[inline]
    #[must_use]
    pub fn invalid_base64() -> Self {
        JwsError::CannotDecodeContent("Error while decoding from Base64Url, invalid base64 characters detected".to_string())
    }

    /// Create an invalid key error
    #[inline]
    #[must_use]
    pub fn invalid_key(msg: &str) -> Self {
        JwsError::InvalidKeyProvided(msg.to_string())
    }

    /// Key shorter than the algorithm's minimum
    #[inline]
    #[must_use]
    pub fn key_too_short(expected_bits: usize, actual_bits: usize) -> Self {
        JwsError::InvalidKeyProvided(format!(
            "Key provided is shorter than {expected_bits} bits, only {actual_bits} bits provided"
        ))
    }

    /// Key belongs to another algorithm family
    #[inline]
    #[must_use]
    pub fn incompatible_key_type(expected: &str, actual: &str) -> Self {
        JwsError::InvalidKeyProvided(format!(
            "The type of the provided key is not \"{expected}\", \"{actual}\" provided"
        ))
    }

    /// Key material could not be parsed
    #[inline]
    #[must_use]
    pub fn key_cannot_be_parsed(details: &str) -> Self {
        JwsError::InvalidKeyProvided(format!(
            "It was not possible to parse your key, reason: {details}"
        ))
    }

    /// Create an invalid token structure error
    #[inline]
    #[must_use]
    pub fn invalid_structure(msg: &str) -> Self {
        JwsError::InvalidTokenStructure(msg.to_string())
    }

    /// Create an unsupported algorithm error
    #[inline]
    #[must_use]
    pub fn unsupported_algorithm(alg: &str) -> Self {
        JwsError::UnsupportedAlgorithm(alg.to_string())
    }

    /// Violations collected by the validator, if this is an aggregate failure
    #[must_use]
    pub fn violations(&self) -> Option<&[ConstraintViolation]> {
        match self {
            JwsError::RequiredConstraintsViolated(aggregate) => Some(aggregate.violations()),
            _ => None,
        }
    }
}

impl From<ConversionFailure> for JwsError {
    fn from(reason: ConversionFailure) -> Self {
        JwsError::ConversionFailed(reason)
    }
}
