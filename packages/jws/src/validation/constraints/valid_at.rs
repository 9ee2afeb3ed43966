//! Time constraints
//!
//! Leeway widens every window: it is added to "now" when checking `iat` and
//! `nbf`, and subtracted when checking `exp`.

use crate::clock::Clock;
use crate::error::{JwsError, JwsResult};
use crate::token::Token;
use crate::types::registered_claims;
use crate::validation::{Constraint, ConstraintResult, ConstraintViolation, ValidAtConstraint};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

/// All three time claims must be present and satisfied
#[derive(Clone)]
pub struct StrictValidAt {
    checks: TimeChecks,
}

/// Time claims are checked when present; absent ones are satisfied
#[derive(Clone)]
pub struct LooseValidAt {
    checks: TimeChecks,
}

#[derive(Clone)]
struct TimeChecks {
    clock: Arc<dyn Clock>,
    leeway: Duration,
}

impl TimeChecks {
    fn new(clock: Arc<dyn Clock>, leeway: Duration) -> JwsResult<Self> {
        if leeway < Duration::zero() {
            return Err(JwsError::LeewayCannotBeNegative);
        }
        Ok(Self { clock, leeway })
    }

    fn run(
        &self,
        token: &Token,
        require_claims: bool,
        name: &'static str,
    ) -> Vec<ConstraintViolation> {
        let now = self.clock.now();
        let later = now.checked_add_signed(self.leeway).unwrap_or(DateTime::<Utc>::MAX_UTC);
        let earlier = now.checked_sub_signed(self.leeway).unwrap_or(DateTime::<Utc>::MIN_UTC);
        let claims = token.claims();
        let mut violations = Vec::new();

        let mut check = |claim: &str, label: &str, satisfied: bool, failure: &str| {
            if !claims.has(claim) {
                if require_claims {
                    violations.push(ConstraintViolation::error(
                        format!("\"{label}\" claim missing"),
                        name,
                    ));
                }
            } else if !satisfied {
                violations.push(ConstraintViolation::error(failure, name));
            }
        };

        check(
            registered_claims::ISSUED_AT,
            "Issued At",
            token.has_been_issued_before(later),
            "The token was issued in the future",
        );
        check(
            registered_claims::NOT_BEFORE,
            "Not Before",
            token.is_minimum_time_before(later),
            "The token cannot be used yet",
        );
        check(
            registered_claims::EXPIRATION_TIME,
            "Expiration Time",
            !token.is_expired(earlier),
            "The token is expired",
        );

        violations
    }
}

macro_rules! valid_at_constraint {
    ($constraint:ident, $require_claims:expr) => {
        impl $constraint {
            const NAME: &'static str = stringify!($constraint);

            /// Check against `clock` with no leeway
            #[must_use]
            pub fn new(clock: impl Clock + 'static) -> Self {
                Self {
                    checks: TimeChecks {
                        clock: Arc::new(clock),
                        leeway: Duration::zero(),
                    },
                }
            }

            /// Check against `clock`, tolerating `leeway` of clock skew
            ///
            /// # Errors
            /// Returns [`JwsError::LeewayCannotBeNegative`] for a negative leeway.
            pub fn with_leeway(clock: impl Clock + 'static, leeway: Duration) -> JwsResult<Self> {
                Ok(Self {
                    checks: TimeChecks::new(Arc::new(clock), leeway)?,
                })
            }
        }

        impl Constraint for $constraint {
            fn assert(&self, token: &Token) -> ConstraintResult {
                match self
                    .checks
                    .run(token, $require_claims, Self::NAME)
                    .into_iter()
                    .next()
                {
                    Some(violation) => Ok(Err(violation)),
                    None => Ok(Ok(())),
                }
            }

            fn violations(&self, token: &Token) -> JwsResult<Vec<ConstraintViolation>> {
                Ok(self.checks.run(token, $require_claims, Self::NAME))
            }
        }

        impl ValidAtConstraint for $constraint {}
    };
}

valid_at_constraint!(StrictValidAt, true);
valid_at_constraint!(LooseValidAt, false);
