//! The Settlement Builder and Match Validator (§4.5, §4.6): turning a
//! matching-engine event into a signed, self-validating settlement
//! record, and re-checking one against its embedded orders and history.

pub mod builder;
pub mod transaction;
pub mod validator;

pub use builder::{build, BalanceDelta, BuildError};
pub use transaction::ExchangeTransaction;
pub use validator::{validate, validate_against, InMemoryPriorMatches, PriorMatches};
