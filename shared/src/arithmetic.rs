//! Money Arithmetic (§4.1): fixed-point conversions between a presentation
//! decimal value and the integer amounts/prices the rest of the system
//! carries, plus the integer-only helpers (`cost`, `correct`,
//! `min_amount_for_price`, `partial_fee`) used on the hot matching path.
//!
//! Every integer computation here widens to `u128` before multiplying and
//! narrows back via `u64::try_from`, the way the teacher widens to `U256`
//! in `shared::conversions` before a potentially-overflowing multiply.
//! Division always truncates toward zero (Rust's integer division), which
//! is also "round down" for the non-negative values this module only ever
//! sees — there is no banker's rounding anywhere in this crate.

use model::PRICE_CONSTANT;

use crate::error::{DomainErrorKind, Error};

fn to_u64(v: u128) -> Result<u64, Error> {
    u64::try_from(v).map_err(|_| Error::Domain(DomainErrorKind::Overflow))
}

/// `floor(value * 10^amountAssetDecimals)`. `value` is a decimal-valued
/// presentation amount (e.g. "1.5" tokens); this is the only place in the
/// workspace that accepts a floating-point quantity, and it exists solely
/// at the system boundary — nothing on the matching path uses `f64`.
pub fn normalize_amount(value: f64, amount_asset_decimals: u8) -> Result<u64, Error> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::Domain(DomainErrorKind::InvalidDecimals));
    }
    let scaled = value * 10f64.powi(amount_asset_decimals as i32);
    if !scaled.is_finite() || scaled < 0.0 || scaled > u64::MAX as f64 {
        return Err(Error::Domain(DomainErrorKind::Overflow));
    }
    Ok(scaled.trunc() as u64)
}

/// `floor(value * 10^(8 + priceAssetDecimals - amountAssetDecimals))`.
pub fn normalize_price(
    value: f64,
    amount_asset_decimals: u8,
    price_asset_decimals: u8,
) -> Result<u64, Error> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::Domain(DomainErrorKind::InvalidDecimals));
    }
    let exponent = 8i32 + price_asset_decimals as i32 - amount_asset_decimals as i32;
    let scaled = value * 10f64.powi(exponent);
    if !scaled.is_finite() || scaled < 0.0 || scaled > u64::MAX as f64 {
        return Err(Error::Domain(DomainErrorKind::Overflow));
    }
    Ok(scaled.trunc() as u64)
}

/// Inverse of `normalize_amount`, for presentation only.
pub fn denormalize_amount(amount: u64, amount_asset_decimals: u8) -> f64 {
    amount as f64 / 10f64.powi(amount_asset_decimals as i32)
}

/// Inverse of `normalize_price`, for presentation only.
pub fn denormalize_price(price: u64, amount_asset_decimals: u8, price_asset_decimals: u8) -> f64 {
    let exponent = 8i32 + price_asset_decimals as i32 - amount_asset_decimals as i32;
    price as f64 / 10f64.powi(exponent)
}

/// `floor(amount * price / PRICE_CONSTANT)` — the price-asset cost of
/// trading `amount` units of the amount asset at `price`.
pub fn cost(amount: u64, price: u64) -> Result<u64, Error> {
    let product = amount as u128 * price as u128;
    to_u64(product / PRICE_CONSTANT as u128)
}

/// Adjusts `amount` down to the largest value whose `cost` at `price`
/// still equals `cost(amount, price)` — i.e. rounds off the "dust" that
/// would otherwise be spent but never accounted for in the settled total.
/// `ceil(cost(amount, price) * PRICE_CONSTANT / price)`.
pub fn correct(amount: u64, price: u64) -> Result<u64, Error> {
    if price == 0 {
        return Err(Error::Domain(DomainErrorKind::DivisionByZero));
    }
    let settled = cost(amount, price)? as u128 * PRICE_CONSTANT as u128;
    let price = price as u128;
    to_u64((settled + price - 1) / price)
}

/// `ceil(PRICE_CONSTANT / price)` — the smallest amount whose cost at
/// `price` is at least one unit of the price asset.
pub fn min_amount_for_price(price: u64) -> Result<u64, Error> {
    if price == 0 {
        return Err(Error::Domain(DomainErrorKind::DivisionByZero));
    }
    let constant = PRICE_CONSTANT as u128;
    let price = price as u128;
    to_u64((constant + price - 1) / price)
}

/// `floor(fee * partial_amount / total_amount)` — the fee owed for filling
/// `partial_amount` out of an order whose full amount is `total_amount`.
pub fn partial_fee(fee: u64, total_amount: u64, partial_amount: u64) -> Result<u64, Error> {
    if total_amount == 0 {
        return Err(Error::Domain(DomainErrorKind::DivisionByZero));
    }
    let product = fee as u128 * partial_amount as u128;
    to_u64(product / total_amount as u128)
}
