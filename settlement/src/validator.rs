//! The Match Validator (§4.6): checks that a candidate
//! `ExchangeTransaction` is internally consistent with its embedded
//! orders and with the history of prior matches against those orders.

use std::collections::BTreeMap;

use model::signature::PublicKey;
use shared::arithmetic::partial_fee;
use shared::error::ValidationErrorKind;

use crate::transaction::ExchangeTransaction;

/// A projection of prior matches against a given order, identified by its
/// canonical id (§3 "Ownership": the validator never sees the live book).
pub trait PriorMatches {
    /// Sum of `amount` across all previously accepted matches against the
    /// order with this id.
    fn matched_amount(&self, order_id: [u8; 32]) -> u64;
}

/// In-memory accumulator suitable for tests and for a single-process
/// deployment; a node would back this with its transaction history.
#[derive(Default)]
pub struct InMemoryPriorMatches {
    matched: BTreeMap<[u8; 32], u64>,
}

impl InMemoryPriorMatches {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, order_id: [u8; 32], amount: u64) {
        *self.matched.entry(order_id).or_insert(0) += amount;
    }
}

impl PriorMatches for InMemoryPriorMatches {
    fn matched_amount(&self, order_id: [u8; 32]) -> u64 {
        self.matched.get(&order_id).copied().unwrap_or(0)
    }
}

/// Checks `tx` against every predicate in §4.6, in order, short-circuiting
/// at the first failure; `now` is the validation timestamp used for the
/// embedded orders' `isValid` check.
pub fn validate(
    tx: &ExchangeTransaction,
    prior: &dyn PriorMatches,
    now: u64,
) -> Result<(), ValidationErrorKind> {
    let buy = &tx.order1;
    let sell = &tx.order2;

    if tx.fee == 0 || tx.amount == 0 || tx.price == 0 {
        return Err(ValidationErrorKind::NonPositiveField);
    }

    if buy.matcher != sell.matcher {
        return Err(ValidationErrorKind::MatcherMismatch);
    }
    if buy.spent_asset() != sell.receive_asset() || sell.spent_asset() != buy.receive_asset() {
        return Err(ValidationErrorKind::AssetMismatch);
    }
    if buy.pair.price_asset != sell.pair.price_asset {
        return Err(ValidationErrorKind::AssetMismatch);
    }
    if buy.price < sell.price {
        return Err(ValidationErrorKind::NotCrossing);
    }

    if tx.price != buy.price && tx.price != sell.price {
        return Err(ValidationErrorKind::PriceMismatch);
    }

    if buy.is_expired(now) || sell.is_expired(now) {
        return Err(ValidationErrorKind::OrderInvalid);
    }

    let buy_prior = prior.matched_amount(buy.id());
    if buy_prior + tx.amount > buy.amount {
        return Err(ValidationErrorKind::OverFill);
    }
    let sell_prior = prior.matched_amount(sell.id());
    if sell_prior + tx.amount > sell.amount {
        return Err(ValidationErrorKind::OverFill);
    }

    let expected_fee = partial_fee(buy.matcher_fee, buy.amount, tx.amount)
        .ok()
        .zip(partial_fee(sell.matcher_fee, sell.amount, tx.amount).ok())
        .map(|(a, b)| a + b);
    if expected_fee != Some(tx.matcher_fee) {
        return Err(ValidationErrorKind::FeeMismatch);
    }

    if !tx.verify_signature(&buy.matcher) {
        return Err(ValidationErrorKind::SignatureInvalid);
    }

    Ok(())
}

/// Convenience wrapper bundling `validate` with the matcher public key the
/// signature must verify against — useful when the caller already knows
/// which matcher is expected, independent of what the transaction claims.
pub fn validate_against(
    tx: &ExchangeTransaction,
    expected_matcher: &PublicKey,
    prior: &dyn PriorMatches,
    now: u64,
) -> Result<(), ValidationErrorKind> {
    if tx.order1.matcher != *expected_matcher {
        return Err(ValidationErrorKind::MatcherMismatch);
    }
    validate(tx, prior, now)
}
