//! Single constraint failure

use std::fmt;

/// One failed check, tagged with the constraint that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    message: String,
    constraint: &'static str,
}

impl ConstraintViolation {
    /// Violation raised by `constraint`
    #[must_use]
    pub fn error(message: impl Into<String>, constraint: &'static str) -> Self {
        Self {
            message: message.into(),
            constraint,
        }
    }

    /// Operator-facing description
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Name of the failing constraint
    #[must_use]
    pub fn constraint(&self) -> &'static str {
        self.constraint
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ConstraintViolation {}
