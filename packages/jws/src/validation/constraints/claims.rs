//! Registered and private claim constraints

use crate::error::{JwsError, JwsResult};
use crate::token::Token;
use crate::types::{ClaimValue, registered_claims};
use crate::validation::{Constraint, ConstraintResult, ConstraintViolation, require};

/// `iss` is one of the accepted issuers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedBy {
    issuers: Vec<String>,
}

impl IssuedBy {
    /// Accept any of `issuers`
    #[must_use]
    pub fn new<I, S>(issuers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            issuers: issuers.into_iter().map(Into::into).collect(),
        }
    }
}

impl Constraint for IssuedBy {
    fn assert(&self, token: &Token) -> ConstraintResult {
        require(
            token.has_been_issued_by(self.issuers.as_slice()),
            "The token was not issued by the given issuers",
            "IssuedBy",
        )
    }
}

/// `aud` lists the given audience
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermittedFor {
    audience: String,
}

impl PermittedFor {
    /// Require `audience`
    #[must_use]
    pub fn new(audience: impl Into<String>) -> Self {
        Self {
            audience: audience.into(),
        }
    }
}

impl Constraint for PermittedFor {
    fn assert(&self, token: &Token) -> ConstraintResult {
        require(
            token.is_permitted_for(&self.audience),
            "The token is not allowed to be used by this audience",
            "PermittedFor",
        )
    }
}

/// `jti` equals the given identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifiedBy {
    id: String,
}

impl IdentifiedBy {
    /// Require `id`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl Constraint for IdentifiedBy {
    fn assert(&self, token: &Token) -> ConstraintResult {
        require(
            token.is_identified_by(&self.id),
            "The token is not identified with the expected ID",
            "IdentifiedBy",
        )
    }
}

/// `sub` equals the given subject
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedTo {
    subject: String,
}

impl RelatedTo {
    /// Require `subject`
    #[must_use]
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }
}

impl Constraint for RelatedTo {
    fn assert(&self, token: &Token) -> ConstraintResult {
        require(
            token.is_related_to(&self.subject),
            "The token is not related to the expected subject",
            "RelatedTo",
        )
    }
}

fn private_claim_name(name: &str) -> JwsResult<String> {
    if registered_claims::is_registered(name) {
        return Err(JwsError::CannotValidateARegisteredClaim(name.to_owned()));
    }
    Ok(name.to_owned())
}

/// A private claim is present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HasClaim {
    claim: String,
}

impl HasClaim {
    /// Require `claim` to be present
    ///
    /// # Errors
    /// Returns [`JwsError::CannotValidateARegisteredClaim`] for registered
    /// claim names.
    pub fn new(claim: &str) -> JwsResult<Self> {
        Ok(Self {
            claim: private_claim_name(claim)?,
        })
    }
}

impl Constraint for HasClaim {
    fn assert(&self, token: &Token) -> ConstraintResult {
        require(
            token.claims().has(&self.claim),
            format!("The token does not have the claim \"{}\"", self.claim),
            "HasClaim",
        )
    }
}

/// A private claim is present with exactly the given value
///
/// Comparison is strict: `"1"` and `1` are different values.
#[derive(Debug, Clone, PartialEq)]
pub struct HasClaimWithValue {
    claim: String,
    expected: ClaimValue,
}

impl HasClaimWithValue {
    /// Require `claim` to equal `expected`
    ///
    /// # Errors
    /// Returns [`JwsError::CannotValidateARegisteredClaim`] for registered
    /// claim names.
    pub fn new(claim: &str, expected: impl Into<ClaimValue>) -> JwsResult<Self> {
        Ok(Self {
            claim: private_claim_name(claim)?,
            expected: expected.into(),
        })
    }
}

impl Constraint for HasClaimWithValue {
    fn assert(&self, token: &Token) -> ConstraintResult {
        let Some(actual) = token.claims().get(&self.claim) else {
            return Ok(Err(ConstraintViolation::error(
                format!("The token does not have the claim \"{}\"", self.claim),
                "HasClaimWithValue",
            )));
        };
        require(
            *actual == self.expected,
            format!(
                "The claim \"{}\" does not have the expected value",
                self.claim
            ),
            "HasClaimWithValue",
        )
    }
}
