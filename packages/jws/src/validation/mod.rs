//! Constraint-based token validation
//!
//! A [`Constraint`] is an independent, side-effect-free check against a
//! [`Token`]. [`Validator::assert`] runs every constraint and reports all
//! violations in the order the constraints were given.

pub mod constraints;
mod violation;

pub use violation::ConstraintViolation;

use crate::error::{JwsError, JwsResult, RequiredConstraintsViolated};
use crate::token::Token;
use tracing::debug;

/// Outcome of one constraint check
///
/// The inner `Err` is a violation by the token. The outer `Err` means the
/// check itself could not run, such as a verification key the signer cannot
/// use, and is never turned into a violation.
pub type ConstraintResult = JwsResult<Result<(), ConstraintViolation>>;

/// A single validation rule
pub trait Constraint: Send + Sync {
    /// Check the token, returning the first violation found
    ///
    /// # Errors
    /// Returns codec and signer errors raised while checking, unchanged.
    fn assert(&self, token: &Token) -> ConstraintResult;

    /// Every violation this constraint finds, in check order
    ///
    /// Constraints made of several independent checks report each failing
    /// check separately.
    ///
    /// # Errors
    /// Same as [`Constraint::assert`].
    fn violations(&self, token: &Token) -> JwsResult<Vec<ConstraintViolation>> {
        Ok(self.assert(token)?.err().into_iter().collect())
    }
}

/// Pass when `satisfied`, otherwise report `message` for `constraint`
pub(crate) fn require(
    satisfied: bool,
    message: impl Into<String>,
    constraint: &'static str,
) -> ConstraintResult {
    if satisfied {
        return Ok(Ok(()));
    }
    Ok(Err(ConstraintViolation::error(message, constraint)))
}

/// Constraints that verify the token signature
pub trait SignedWithConstraint: Constraint {}

/// Constraints that check the token's time claims
pub trait ValidAtConstraint: Constraint {}

/// Runs constraint lists against tokens
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator;

impl Validator {
    /// Run every constraint, collecting all violations
    ///
    /// # Errors
    /// Returns [`JwsError::NoConstraintsGiven`] for an empty list and
    /// [`JwsError::RequiredConstraintsViolated`] when any constraint fails.
    /// Errors raised while checking, such as
    /// [`JwsError::InvalidKeyProvided`], are returned as they are.
    pub fn assert(&self, token: &Token, constraints: &[&dyn Constraint]) -> JwsResult<()> {
        if constraints.is_empty() {
            return Err(JwsError::NoConstraintsGiven);
        }

        let mut violations = Vec::new();
        for constraint in constraints {
            violations.extend(constraint.violations(token)?);
        }

        if violations.is_empty() {
            return Ok(());
        }
        debug!(
            constraints = constraints.len(),
            violations = violations.len(),
            "token violates required constraints"
        );
        Err(JwsError::RequiredConstraintsViolated(
            RequiredConstraintsViolated::from_violations(violations),
        ))
    }

    /// Whether every constraint holds; stops at the first failure
    ///
    /// # Errors
    /// Returns [`JwsError::NoConstraintsGiven`] for an empty list, and any
    /// error raised while checking.
    pub fn validate(&self, token: &Token, constraints: &[&dyn Constraint]) -> JwsResult<bool> {
        if constraints.is_empty() {
            return Err(JwsError::NoConstraintsGiven);
        }
        for constraint in constraints {
            if constraint.assert(token)?.is_err() {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
