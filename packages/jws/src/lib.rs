//! Signed JOSE tokens (JWS compact serialization)
//!
//! This crate provides:
//! - A [`Builder`] that encodes headers and claims and signs them
//! - A [`Parser`] that turns `header.payload.signature` strings into [`Token`]s
//! - A constraint-based [`Validator`] reporting every violated rule at once
//! - HMAC, RSA, ECDSA, EdDSA, keyed BLAKE2b and unsecured signers
//! - [`JwtFacade`] for one-call issuing and parsing, with async variants
//!
//! ```no_run
//! use cryypt_jws::{Hmac, JwtFacade, Key, StrictValidAt, SignedWith, SystemClock};
//!
//! # fn main() -> cryypt_jws::JwsResult<()> {
//! let key = Key::plain_text([7u8; 32], None)?;
//! let facade = JwtFacade::new();
//! let token = facade.issue(&Hmac::Sha256, &key, |builder, _| {
//!     Ok(builder.issued_by("api.example.com").related_to("user-1"))
//! })?;
//!
//! let parsed = facade.parse(
//!     &token.to_string(),
//!     &SignedWith::new(Hmac::Sha256, key),
//!     &StrictValidAt::new(SystemClock),
//!     &[],
//! )?;
//! assert!(parsed.is_related_to("user-1"));
//! # Ok(())
//! # }
//! ```

pub mod algorithms;
mod builder;
pub mod codec;
mod clock;
mod configuration;
mod error;
mod facade;
pub mod formatter;
mod futures;
mod key;
mod parser;
mod token;
mod types;
pub mod validation;

pub use algorithms::{Algorithm, Blake2b, Ecdsa, Eddsa, Hmac, Rsa, Signer, Unsecured};
pub use builder::Builder;
pub use clock::{Clock, FrozenClock, SystemClock};
pub use codec::{Decoder, Encoder, JoseCodec};
pub use configuration::Configuration;
pub use error::*;
pub use facade::{DEFAULT_TOKEN_LIFETIME_MINUTES, JwtFacade};
pub use formatter::{ChainedFormatter, ClaimsFormatter};
pub use futures::AsyncJwsResult;
pub use key::Key;
pub use parser::Parser;
pub use token::Token;
pub use types::*;
pub use validation::constraints::{
    HasClaim, HasClaimWithValue, IdentifiedBy, IssuedBy, LooseValidAt, PermittedFor, RelatedTo,
    SignedWith, SignedWithOneInSet, SignedWithUntilDate, StrictValidAt,
};
pub use validation::{
    Constraint, ConstraintResult, ConstraintViolation, SignedWithConstraint, ValidAtConstraint,
    Validator,
};
