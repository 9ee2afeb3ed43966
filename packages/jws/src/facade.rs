//! One-call issuing and parsing with the mandatory checks built in

use crate::algorithms::Signer;
use crate::builder::Builder;
use crate::clock::{Clock, SystemClock};
use crate::codec::JoseCodec;
use crate::error::JwsResult;
use crate::formatter::ChainedFormatter;
use crate::futures::AsyncJwsResult;
use crate::key::Key;
use crate::parser::Parser;
use crate::token::Token;
use crate::validation::{Constraint, SignedWithConstraint, ValidAtConstraint, Validator};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

/// Lifetime given to tokens issued through the facade, in minutes
pub const DEFAULT_TOKEN_LIFETIME_MINUTES: i64 = 5;

/// Issues short-lived tokens and parses tokens that must be signed and
/// currently valid
#[derive(Clone)]
pub struct JwtFacade {
    parser: Parser,
    clock: Arc<dyn Clock>,
}

impl JwtFacade {
    /// Facade using the wall clock and the default codec
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    /// Facade reading time from `clock`
    #[must_use]
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            parser: Parser::default(),
            clock: Arc::new(clock),
        }
    }

    /// Replace the parser
    #[must_use]
    pub fn with_parser(mut self, parser: Parser) -> Self {
        self.parser = parser;
        self
    }

    /// Issue a token with `iat` and `nbf` set to now and `exp` five minutes
    /// later
    ///
    /// Dates are written as whole Unix seconds.
    ///
    /// `customise` receives the pre-filled builder and the issuing instant
    /// and may override any of those claims.
    ///
    /// # Errors
    /// Propagates errors from `customise` and from signing.
    pub fn issue<F>(&self, signer: &dyn Signer, key: &Key, customise: F) -> JwsResult<Token>
    where
        F: FnOnce(Builder, DateTime<Utc>) -> JwsResult<Builder>,
    {
        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(Duration::minutes(DEFAULT_TOKEN_LIFETIME_MINUTES))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let builder = Builder::new(
            Arc::new(JoseCodec),
            ChainedFormatter::with_unix_timestamp_dates(),
        )
        .issued_at(now)
        .can_only_be_used_after(now)
        .expires_at(expires_at);
        customise(builder, now)?.get_token(signer, key)
    }

    /// Parse `jwt` and assert the signature, time and any extra constraints
    ///
    /// # Errors
    /// Propagates parse errors and returns
    /// [`crate::JwsError::RequiredConstraintsViolated`] listing every failed
    /// constraint.
    pub fn parse<S, V>(
        &self,
        jwt: &str,
        signed_with: &S,
        valid_at: &V,
        extra: &[&dyn Constraint],
    ) -> JwsResult<Token>
    where
        S: SignedWithConstraint,
        V: ValidAtConstraint,
    {
        let token = self.parser.parse(jwt)?;
        let mut constraints: Vec<&dyn Constraint> = Vec::with_capacity(extra.len() + 2);
        constraints.push(signed_with);
        constraints.push(valid_at);
        constraints.extend_from_slice(extra);
        Validator.assert(&token, &constraints)?;
        Ok(token)
    }

    /// [`JwtFacade::issue`] on the tokio blocking pool
    ///
    /// Must be called from within a tokio runtime; otherwise the returned
    /// future resolves to [`crate::JwsError::TaskFailed`].
    pub fn issue_async<S, F>(&self, signer: S, key: Key, customise: F) -> AsyncJwsResult<Token>
    where
        S: Signer + 'static,
        F: FnOnce(Builder, DateTime<Utc>) -> JwsResult<Builder> + Send + 'static,
    {
        let facade = self.clone();
        AsyncJwsResult::spawn(move || facade.issue(&signer, &key, customise))
    }

    /// [`JwtFacade::parse`] on the tokio blocking pool
    ///
    /// Same runtime requirement as [`JwtFacade::issue_async`].
    pub fn parse_async<S, V>(
        &self,
        jwt: String,
        signed_with: S,
        valid_at: V,
        extra: Vec<Arc<dyn Constraint>>,
    ) -> AsyncJwsResult<Token>
    where
        S: SignedWithConstraint + 'static,
        V: ValidAtConstraint + 'static,
    {
        let facade = self.clone();
        AsyncJwsResult::spawn(move || {
            let extra: Vec<&dyn Constraint> = extra.iter().map(Arc::as_ref).collect();
            facade.parse(&jwt, &signed_with, &valid_at, &extra)
        })
    }
}

impl Default for JwtFacade {
    fn default() -> Self {
        Self::new()
    }
}
