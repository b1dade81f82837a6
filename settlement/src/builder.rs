//! The Settlement Builder (§4.5): turns an `OrderExecuted` match event
//! between two limit orders into a signed `ExchangeTransaction` plus the
//! balance-change projection that justifies it.

use ed25519_dalek::{Signer, SigningKey};

use matcher::MatchEvent;
use model::signature::{PublicKey, Signature};
use model::Asset;

use crate::transaction::ExchangeTransaction;

#[derive(thiserror::Error, Debug)]
pub enum BuildError {
    #[error("settlement only builds from OrderExecuted events between two limit orders")]
    NotLimitLimit,
}

/// A single asset balance change on one account; `delta` is signed so a
/// projection can be summed per `(account, asset)` pair by callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BalanceDelta {
    pub account: PublicKey,
    pub asset: Asset,
    pub delta: i64,
}

/// Builds the transaction and its balance projection from `event`,
/// signing over the canonical encoding with `signing_key`. `network_fee`
/// is the node-chosen `fee` field (§4.5) — not derived from the orders.
pub fn build(
    event: &MatchEvent,
    network_fee: u64,
    signing_key: &SigningKey,
) -> Result<(ExchangeTransaction, Vec<BalanceDelta>), BuildError> {
    let MatchEvent::OrderExecuted {
        submitted,
        counter,
        price,
        executed_amount,
        executed_amount_of_price_asset,
        submitted_executed_fee,
        counter_executed_fee,
        timestamp,
        ..
    } = event
    else {
        return Err(BuildError::NotLimitLimit);
    };

    if !submitted.is_limit() || !counter.is_limit() {
        return Err(BuildError::NotLimitLimit);
    }

    let (buy, buy_fee, sell, sell_fee) = if submitted.order().side == model::order::OrderSide::Buy {
        (submitted, *submitted_executed_fee, counter, *counter_executed_fee)
    } else {
        (counter, *counter_executed_fee, submitted, *submitted_executed_fee)
    };

    let matcher_fee = submitted_executed_fee + counter_executed_fee;
    let unsigned = ExchangeTransaction {
        order1: buy.order().clone(),
        order2: sell.order().clone(),
        price: *price,
        amount: *executed_amount,
        matcher_fee,
        fee: network_fee,
        timestamp: *timestamp,
        signature: Signature([0; 64]),
    };
    let signature = signing_key.sign(&unsigned.to_sign_bytes());
    let transaction = ExchangeTransaction {
        signature: Signature(signature.to_bytes()),
        ..unsigned
    };

    let amount_asset = buy.order().pair.amount_asset;
    let price_asset = buy.order().pair.price_asset;

    let deltas = vec![
        BalanceDelta {
            account: buy.order().sender,
            asset: amount_asset,
            delta: i64::try_from(*executed_amount).unwrap_or(i64::MAX),
        },
        BalanceDelta {
            account: buy.order().sender,
            asset: price_asset,
            delta: -i64::try_from(*executed_amount_of_price_asset).unwrap_or(i64::MAX),
        },
        BalanceDelta {
            account: buy.order().sender,
            asset: buy.order().fee_asset,
            delta: -i64::try_from(buy_fee).unwrap_or(i64::MAX),
        },
        BalanceDelta {
            account: sell.order().sender,
            asset: price_asset,
            delta: i64::try_from(*executed_amount_of_price_asset).unwrap_or(i64::MAX),
        },
        BalanceDelta {
            account: sell.order().sender,
            asset: amount_asset,
            delta: -i64::try_from(*executed_amount).unwrap_or(i64::MAX),
        },
        BalanceDelta {
            account: sell.order().sender,
            asset: sell.order().fee_asset,
            delta: -i64::try_from(sell_fee).unwrap_or(i64::MAX),
        },
        BalanceDelta {
            account: buy.order().matcher,
            asset: Asset::Native,
            delta: i64::try_from(matcher_fee).unwrap_or(i64::MAX) - i64::try_from(network_fee).unwrap_or(i64::MAX),
        },
    ];

    Ok((transaction, deltas))
}
