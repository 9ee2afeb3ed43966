//! Built-in constraints

mod claims;
mod signed_with;
mod valid_at;

pub use claims::{HasClaim, HasClaimWithValue, IdentifiedBy, IssuedBy, PermittedFor, RelatedTo};
pub use signed_with::{SignedWith, SignedWithOneInSet, SignedWithUntilDate};
pub use valid_at::{LooseValidAt, StrictValidAt};
