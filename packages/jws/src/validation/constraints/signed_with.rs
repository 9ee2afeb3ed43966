//! Signature constraints

use crate::algorithms::Signer;
use crate::clock::Clock;
use crate::key::Key;
use crate::token::Token;
use crate::types::Signature;
use crate::validation::{
    Constraint, ConstraintResult, ConstraintViolation, SignedWithConstraint, require,
};
use chrono::{DateTime, SecondsFormat, Utc};
use std::sync::Arc;
use tracing::debug;

/// Token declares the signer's `alg` and its signature verifies with `key`
#[derive(Clone)]
pub struct SignedWith {
    signer: Arc<dyn Signer>,
    key: Key,
}

impl SignedWith {
    const NAME: &'static str = "SignedWith";

    /// Verify with `signer` and `key`
    #[must_use]
    pub fn new(signer: impl Signer + 'static, key: Key) -> Self {
        Self::from_shared(Arc::new(signer), key)
    }

    /// Verify with an already shared signer
    #[must_use]
    pub fn from_shared(signer: Arc<dyn Signer>, key: Key) -> Self {
        Self { signer, key }
    }
}

impl Constraint for SignedWith {
    /// # Errors
    /// Returns the signer's error when `key` cannot be used to verify.
    fn assert(&self, token: &Token) -> ConstraintResult {
        if token.algorithm() != Some(self.signer.algorithm_id()) {
            return Ok(Err(ConstraintViolation::error(
                "Token signer mismatch",
                Self::NAME,
            )));
        }

        let expected = token.signature().map_or(&[][..], Signature::hash);
        let verified = self
            .signer
            .verify(expected, token.signing_input().as_bytes(), &self.key)
            .inspect_err(|error| {
                debug!(alg = self.signer.algorithm_id(), %error, "signature could not be checked");
            })?;
        require(verified, "Token signature mismatch", Self::NAME)
    }
}

impl SignedWithConstraint for SignedWith {}

/// [`SignedWith`] that can only be satisfied up to a given instant
///
/// Used to keep accepting a retired key for a grace period during rotation.
#[derive(Clone)]
pub struct SignedWithUntilDate {
    verify_signature: SignedWith,
    valid_until: DateTime<Utc>,
    clock: Arc<dyn Clock>,
}

impl SignedWithUntilDate {
    const NAME: &'static str = "SignedWithUntilDate";

    /// Verify with `signer` and `key` while `clock` reports at most `valid_until`
    #[must_use]
    pub fn new(
        signer: impl Signer + 'static,
        key: Key,
        valid_until: DateTime<Utc>,
        clock: impl Clock + 'static,
    ) -> Self {
        Self {
            verify_signature: SignedWith::new(signer, key),
            valid_until,
            clock: Arc::new(clock),
        }
    }
}

impl Constraint for SignedWithUntilDate {
    fn assert(&self, token: &Token) -> ConstraintResult {
        if self.clock.now() > self.valid_until {
            return Ok(Err(ConstraintViolation::error(
                format!(
                    "This constraint was only usable until {}",
                    self.valid_until.to_rfc3339_opts(SecondsFormat::Secs, false)
                ),
                Self::NAME,
            )));
        }
        self.verify_signature.assert(token)
    }
}

impl SignedWithConstraint for SignedWithUntilDate {}

/// Satisfied when at least one inner signature constraint is
pub struct SignedWithOneInSet {
    constraints: Vec<Box<dyn SignedWithConstraint>>,
}

impl SignedWithOneInSet {
    const NAME: &'static str = "SignedWithOneInSet";

    /// Try each constraint in order
    #[must_use]
    pub fn new(constraints: Vec<Box<dyn SignedWithConstraint>>) -> Self {
        Self { constraints }
    }
}

impl Constraint for SignedWithOneInSet {
    fn assert(&self, token: &Token) -> ConstraintResult {
        let mut message =
            String::from("It was not possible to verify the signature of the token, reasons:");
        for constraint in &self.constraints {
            match constraint.assert(token)? {
                Ok(()) => return Ok(Ok(())),
                Err(violation) => {
                    message.push_str("\n- ");
                    message.push_str(violation.message());
                }
            }
        }
        Ok(Err(ConstraintViolation::error(message, Self::NAME)))
    }
}

impl SignedWithConstraint for SignedWithOneInSet {}
