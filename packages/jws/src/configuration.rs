//! Bundled issuing and validation settings
//!
//! A [`Configuration`] ties one signer to its keys, codec, claims formatter
//! and the constraints every parsed token must satisfy.

use crate::algorithms::Signer;
use crate::builder::Builder;
use crate::codec::{Decoder, Encoder, JoseCodec};
use crate::error::JwsResult;
use crate::formatter::ChainedFormatter;
use crate::key::Key;
use crate::parser::Parser;
use crate::token::Token;
use crate::validation::constraints::SignedWith;
use crate::validation::{Constraint, Validator};
use std::sync::Arc;

/// Signer, keys and defaults for one token issuer
#[derive(Clone)]
pub struct Configuration {
    signer: Arc<dyn Signer>,
    signing_key: Key,
    verification_key: Key,
    encoder: Arc<dyn Encoder>,
    decoder: Arc<dyn Decoder>,
    formatter: ChainedFormatter,
    validation_constraints: Vec<Arc<dyn Constraint>>,
}

impl Configuration {
    /// Symmetric signer using the same key both ways
    #[must_use]
    pub fn for_symmetric_signer(signer: impl Signer + 'static, key: Key) -> Self {
        Self::for_asymmetric_signer(signer, key.clone(), key)
    }

    /// Asymmetric signer with separate signing and verification keys
    #[must_use]
    pub fn for_asymmetric_signer(
        signer: impl Signer + 'static,
        signing_key: Key,
        verification_key: Key,
    ) -> Self {
        let codec = Arc::new(JoseCodec);
        Self {
            signer: Arc::new(signer),
            signing_key,
            verification_key,
            encoder: codec.clone(),
            decoder: codec,
            formatter: ChainedFormatter::default(),
            validation_constraints: Vec::new(),
        }
    }

    /// Replace the JSON/base64url codec
    #[must_use]
    pub fn with_codec<C>(mut self, codec: C) -> Self
    where
        C: Encoder + Decoder + 'static,
    {
        let codec = Arc::new(codec);
        self.encoder = codec.clone();
        self.decoder = codec;
        self
    }

    /// Replace the claims formatter chain
    #[must_use]
    pub fn with_formatter(mut self, formatter: ChainedFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Add a constraint checked by [`Configuration::parse_and_validate`]
    #[must_use]
    pub fn with_validation_constraint(mut self, constraint: impl Constraint + 'static) -> Self {
        self.validation_constraints.push(Arc::new(constraint));
        self
    }

    /// Configured signer
    #[must_use]
    pub fn signer(&self) -> &dyn Signer {
        self.signer.as_ref()
    }

    /// Key used to sign
    #[must_use]
    pub fn signing_key(&self) -> &Key {
        &self.signing_key
    }

    /// Key used to verify
    #[must_use]
    pub fn verification_key(&self) -> &Key {
        &self.verification_key
    }

    /// Fresh builder using this configuration's codec and formatter
    #[must_use]
    pub fn builder(&self) -> Builder {
        Builder::new(self.encoder.clone(), self.formatter.clone())
    }

    /// Parser using this configuration's codec
    #[must_use]
    pub fn parser(&self) -> Parser {
        Parser::new(self.decoder.clone())
    }

    /// Validator
    #[must_use]
    pub fn validator(&self) -> Validator {
        Validator
    }

    /// Signature constraint for this configuration's signer and verification key
    #[must_use]
    pub fn signed_with(&self) -> SignedWith {
        SignedWith::from_shared(self.signer.clone(), self.verification_key.clone())
    }

    /// Constraints added with [`Configuration::with_validation_constraint`]
    #[must_use]
    pub fn validation_constraints(&self) -> Vec<&dyn Constraint> {
        self.validation_constraints
            .iter()
            .map(|constraint| constraint.as_ref() as &dyn Constraint)
            .collect()
    }

    /// Customise a builder and sign the result
    ///
    /// # Errors
    /// Propagates errors from `customise` and from signing.
    pub fn issue<F>(&self, customise: F) -> JwsResult<Token>
    where
        F: FnOnce(Builder) -> JwsResult<Builder>,
    {
        customise(self.builder())?.get_token(self.signer.as_ref(), &self.signing_key)
    }

    /// Parse a token and assert the configured constraints
    ///
    /// # Errors
    /// Propagates parse errors, returns [`crate::JwsError::NoConstraintsGiven`]
    /// when no constraint is configured, and
    /// [`crate::JwsError::RequiredConstraintsViolated`] when any fails.
    pub fn parse_and_validate(&self, jwt: &str) -> JwsResult<Token> {
        let token = self.parser().parse(jwt)?;
        self.validator()
            .assert(&token, &self.validation_constraints())?;
        Ok(token)
    }
}
