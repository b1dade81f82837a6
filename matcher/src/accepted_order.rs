//! The Order Model's dynamic wrapper (§4.2, §9 "Polymorphism over
//! limit/market"): `AcceptedOrder` tags a submitted or resting `Order` as
//! `Limit` or `Market` and tracks its remaining executable amount and fee
//! independently of the immutable order it wraps.

use std::collections::BTreeMap;

use model::order::OrderSide;
use model::{Asset, Order, MAX_AMOUNT};
use shared::arithmetic::{correct, cost, min_amount_for_price};
use shared::error::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LimitOrder {
    pub amount: u64,
    pub fee: u64,
    pub order: Order,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarketOrder {
    pub amount: u64,
    pub fee: u64,
    pub order: Order,
    pub available_for_spending: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AcceptedOrder {
    Limit(LimitOrder),
    Market(MarketOrder),
}

impl AcceptedOrder {
    pub fn limit(order: Order) -> Self {
        AcceptedOrder::Limit(LimitOrder {
            amount: order.amount,
            fee: order.matcher_fee,
            order,
        })
    }

    /// `MarketOrder.of(order, availableForSpending)`.
    pub fn market(order: Order, available_for_spending: u64) -> Self {
        AcceptedOrder::Market(MarketOrder {
            amount: order.amount,
            fee: order.matcher_fee,
            order,
            available_for_spending,
        })
    }

    /// `MarketOrder.of(order, tradableBalanceLookup)`:
    /// `availableForSpending = min(tradableBalance(spentAsset), LimitOrder.of(order).requiredBalance[spentAsset])`.
    pub fn market_from_tradable_balance(order: Order, tradable_balance: u64) -> Self {
        let spent_cap = Self::limit(order.clone()).required_balance_of(order.spent_asset());
        Self::market(order, tradable_balance.min(spent_cap))
    }

    pub fn order(&self) -> &Order {
        match self {
            AcceptedOrder::Limit(l) => &l.order,
            AcceptedOrder::Market(m) => &m.order,
        }
    }

    pub fn amount(&self) -> u64 {
        match self {
            AcceptedOrder::Limit(l) => l.amount,
            AcceptedOrder::Market(m) => m.amount,
        }
    }

    pub fn fee(&self) -> u64 {
        match self {
            AcceptedOrder::Limit(l) => l.fee,
            AcceptedOrder::Market(m) => m.fee,
        }
    }

    pub fn is_limit(&self) -> bool {
        matches!(self, AcceptedOrder::Limit(_))
    }

    pub fn available_for_spending(&self) -> Option<u64> {
        match self {
            AcceptedOrder::Limit(_) => None,
            AcceptedOrder::Market(m) => Some(m.available_for_spending),
        }
    }

    pub fn spent_asset(&self) -> Asset {
        self.order().spent_asset()
    }

    pub fn receive_asset(&self) -> Asset {
        self.order().receive_asset()
    }

    pub fn fee_asset(&self) -> Asset {
        self.order().fee_asset
    }

    /// `correct(amount, order.price)`.
    pub fn amount_of_amount_asset(&self) -> Result<u64, Error> {
        self.amount_of_amount_asset_at(self.order().price)
    }

    /// `⌊price·amount/PriceConstant⌋` at `order.price`.
    pub fn amount_of_price_asset(&self) -> Result<u64, Error> {
        self.amount_of_price_asset_at(self.order().price)
    }

    pub fn amount_of_amount_asset_at(&self, price: u64) -> Result<u64, Error> {
        correct(self.amount(), price)
    }

    pub fn amount_of_price_asset_at(&self, price: u64) -> Result<u64, Error> {
        cost(self.amount(), price)
    }

    fn spent_amount_at(&self, price: u64) -> Result<u64, Error> {
        match self.order().side {
            OrderSide::Buy => self.amount_of_price_asset_at(price),
            OrderSide::Sell => self.amount_of_amount_asset_at(price),
        }
    }

    fn receive_amount_at(&self, price: u64) -> Result<u64, Error> {
        match self.order().side {
            OrderSide::Buy => self.amount_of_amount_asset_at(price),
            OrderSide::Sell => self.amount_of_price_asset_at(price),
        }
    }

    /// `feeAsset == receiveAsset ? max(0, fee − receiveAmount) : fee`.
    pub fn required_fee(&self) -> Result<u64, Error> {
        if self.fee_asset() == self.receive_asset() {
            let receive_amount = self.receive_amount_at(self.order().price)?;
            Ok(self.fee().saturating_sub(receive_amount))
        } else {
            Ok(self.fee())
        }
    }

    fn required_balance_of(&self, asset: Asset) -> u64 {
        // Used only for the market-order AFS cap derivation, where overflow
        // on a single-order quantity is not expected; falls back to the
        // order's full amount on arithmetic failure rather than panicking.
        if asset == self.spent_asset() {
            self.spent_amount_at(self.order().price).unwrap_or(self.amount())
        } else {
            0
        }
    }

    /// `{spentAsset → spentAmount} ⊕ {feeAsset → requiredFee}`, merged by
    /// asset. A `BTreeMap` so two independently-computed balance maps sort
    /// and compare identically regardless of which side of the merge each
    /// asset arrived on — needed for bit-identical event encoding.
    pub fn required_balance(&self) -> Result<BTreeMap<Asset, u64>, Error> {
        let spent = (self.spent_asset(), self.spent_amount_at(self.order().price)?);
        let fee = (self.fee_asset(), self.required_fee()?);
        Ok(merge_balances(spent, fee))
    }

    /// Identical to `required_balance` for limit orders; for market orders
    /// the spent-asset entry is replaced by `availableForSpending`.
    pub fn reservable_balance(&self) -> Result<BTreeMap<Asset, u64>, Error> {
        match self {
            AcceptedOrder::Limit(_) => self.required_balance(),
            AcceptedOrder::Market(m) => {
                let spent = (self.spent_asset(), m.available_for_spending);
                let fee = (self.fee_asset(), self.required_fee()?);
                Ok(merge_balances(spent, fee))
            }
        }
    }

    /// `amount > 0 ∧ amount ≥ minAmountForPrice(price) ∧ amount < MaxAmount
    /// ∧ spentAmount > 0 ∧ receiveAmount > 0`, evaluated at `price` (the
    /// counter order's price when checking a prospective match, or the
    /// order's own price for the pre-match admission check).
    pub fn is_valid(&self, price: u64) -> bool {
        let amount = self.amount();
        if amount == 0 || amount >= MAX_AMOUNT {
            return false;
        }
        let Ok(min_amount) = min_amount_for_price(price) else {
            return false;
        };
        if amount < min_amount {
            return false;
        }
        let Ok(spent) = self.spent_amount_at(price) else {
            return false;
        };
        let Ok(receive) = self.receive_amount_at(price) else {
            return false;
        };
        spent > 0 && receive > 0
    }

    /// Returns a new `AcceptedOrder` with reduced remainders; the wrapped
    /// `Order` is untouched.
    pub fn partial(&self, new_amount: u64, new_fee: u64, new_afs: Option<u64>) -> Self {
        match self {
            AcceptedOrder::Limit(l) => AcceptedOrder::Limit(LimitOrder {
                amount: new_amount,
                fee: new_fee,
                order: l.order.clone(),
            }),
            AcceptedOrder::Market(m) => AcceptedOrder::Market(MarketOrder {
                amount: new_amount,
                fee: new_fee,
                order: m.order.clone(),
                available_for_spending: new_afs.unwrap_or(m.available_for_spending),
            }),
        }
    }
}

fn merge_balances(a: (Asset, u64), b: (Asset, u64)) -> BTreeMap<Asset, u64> {
    let mut balances = BTreeMap::new();
    balances.insert(a.0, a.1);
    *balances.entry(b.0).or_insert(0) += b.1;
    balances
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::asset::AssetPair;
    use model::signature::{PublicKey, Signature};

    fn pair() -> AssetPair {
        AssetPair::new(Asset::Native, Asset::Issued([9; 32])).unwrap()
    }

    fn order(side: OrderSide, price: u64, amount: u64, fee_asset: Asset, fee: u64) -> Order {
        Order::new(
            PublicKey([1; 32]),
            PublicKey([2; 32]),
            pair(),
            side,
            price,
            amount,
            0,
            1_000_000,
            fee,
            fee_asset,
            3,
            Signature([0; 64]),
        )
        .unwrap()
    }

    #[test]
    fn limit_order_starts_with_full_remaining_amount_and_fee() {
        let o = order(OrderSide::Buy, 100_000_000, 1_000_000, Asset::Native, 300_000);
        let accepted = AcceptedOrder::limit(o.clone());
        assert_eq!(accepted.amount(), o.amount);
        assert_eq!(accepted.fee(), o.matcher_fee);
        assert!(accepted.is_limit());
    }

    #[test]
    fn market_order_caps_afs_via_tradable_balance() {
        let o = order(OrderSide::Buy, 100_000_000, 1_000_000, Asset::Native, 300_000);
        let accepted = AcceptedOrder::market_from_tradable_balance(o, 500);
        assert_eq!(accepted.available_for_spending(), Some(500));
    }

    #[test]
    fn required_fee_is_zero_when_fee_exceeds_receive_amount_in_same_asset() {
        // Buy order receives the amount asset; set feeAsset = amountAsset.
        let o = order(OrderSide::Buy, 100_000_000, 1, Asset::Issued([9; 32]), 1_000_000);
        let accepted = AcceptedOrder::limit(o);
        assert_eq!(accepted.required_fee().unwrap(), 0);
    }

    #[test]
    fn partial_preserves_the_underlying_order() {
        let o = order(OrderSide::Sell, 100_000_000, 1_000_000, Asset::Native, 300_000);
        let accepted = AcceptedOrder::limit(o.clone());
        let reduced = accepted.partial(400_000, 120_000, None);
        assert_eq!(reduced.amount(), 400_000);
        assert_eq!(reduced.fee(), 120_000);
        assert_eq!(reduced.order(), &o);
    }

    #[test]
    fn is_valid_rejects_amount_below_dust_floor() {
        let o = order(OrderSide::Buy, 1, 1, Asset::Native, 0);
        let accepted = AcceptedOrder::limit(o);
        assert!(!accepted.is_valid(1));
    }

    #[test]
    fn required_balance_keeps_spent_and_fee_assets_separate_when_they_differ() {
        // Buy spends the price asset (Issued); fee is charged in Native, set
        // large enough relative to the receive amount that `required_fee`
        // doesn't round it away to zero.
        let o = order(OrderSide::Buy, 100_000_000, 1_000_000, Asset::Native, 1_000_000_000);
        let accepted = AcceptedOrder::limit(o.clone());
        let balance = accepted.required_balance().unwrap();
        assert_eq!(balance.len(), 2);
        assert_eq!(balance[&o.spent_asset()], cost(o.amount, o.price).unwrap());
        let required_fee = accepted.required_fee().unwrap();
        assert!(required_fee > 0);
        assert_eq!(balance[&Asset::Native], required_fee);
    }

    #[test]
    fn required_balance_merges_spent_and_fee_when_they_are_the_same_asset() {
        // Buy spends the price asset; charge the fee in that same asset.
        let o = order(OrderSide::Buy, 100_000_000, 1_000_000, Asset::Issued([9; 32]), 300_000);
        let accepted = AcceptedOrder::limit(o.clone());
        let balance = accepted.required_balance().unwrap();
        assert_eq!(balance.len(), 1);
        let spent = cost(o.amount, o.price).unwrap();
        assert_eq!(balance[&o.spent_asset()], spent + accepted.required_fee().unwrap());
    }

    #[test]
    fn reservable_balance_uses_available_for_spending_for_market_orders() {
        let o = order(OrderSide::Buy, 100_000_000, 1_000_000, Asset::Native, 300_000);
        let accepted = AcceptedOrder::market(o.clone(), 500);
        let balance = accepted.reservable_balance().unwrap();
        assert_eq!(balance[&o.spent_asset()], 500);
        assert_eq!(balance[&Asset::Native], accepted.required_fee().unwrap());
    }
}
