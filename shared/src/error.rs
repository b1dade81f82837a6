use model::order::OrderValidationError;
use model::Asset;

/// §7's error taxonomy — kinds, not type names. This is the one error type
/// that crosses the `model`/`orderbook`/`matcher`/`settlement` boundary;
/// `anyhow` stays at test/binary edges only, mirroring the teacher's split
/// between `thiserror` in library crates and `anyhow` everywhere else.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("domain error: {0}")]
    Domain(#[from] DomainErrorKind),

    #[error("order rejected: {0}")]
    OrderRejected(OrderRejectionReason),

    #[error("insufficient balance of {asset}: required {required}, available {available}")]
    BalanceInsufficient {
        asset: Asset,
        required: u64,
        available: u64,
    },

    #[error("validation error: {0}")]
    Validation(ValidationErrorKind),

    #[error("not found")]
    NotFound,

    #[error("duplicate submission")]
    Conflict,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainErrorKind {
    #[error("arithmetic overflow")]
    Overflow,
    #[error("invalid decimals combination")]
    InvalidDecimals,
    #[error("malformed asset pair")]
    MalformedAssetPair,
    #[error("division by zero")]
    DivisionByZero,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderRejectionReason {
    #[error("order failed structural validation: {0}")]
    Invalid(OrderValidationError),
    #[error("order amount is below the dust floor for its price")]
    BelowDustFloor,
    #[error("order is expired")]
    Expired,
}

impl From<OrderValidationError> for Error {
    fn from(e: OrderValidationError) -> Self {
        Error::OrderRejected(OrderRejectionReason::Invalid(e))
    }
}

/// The specific predicate that failed during Match Validator review (§4.6).
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    #[error("fee, amount or price is not positive")]
    NonPositiveField,
    #[error("orders do not share a matcher")]
    MatcherMismatch,
    #[error("orders' asset pairs are not opposite sides of the same trade")]
    AssetMismatch,
    #[error("buy price is below sell price")]
    NotCrossing,
    #[error("settlement price matches neither order's price")]
    PriceMismatch,
    #[error("buy or sell order fails isValid at the settlement timestamp")]
    OrderInvalid,
    #[error("cumulative matched amount would exceed an order's amount")]
    OverFill,
    #[error("matcherFee does not equal the proportional sum of both orders' fees")]
    FeeMismatch,
    #[error("signature does not verify against the matcher's public key")]
    SignatureInvalid,
}
