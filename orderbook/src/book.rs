//! A single asset pair's resting-order book (§4.2): two price-time
//! priority queues, one per side, ordered by `(price, insertion sequence)`
//! — never by wall-clock timestamp, which a submitter controls and could
//! otherwise use to jump the queue.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use model::order::OrderSide;
use model::Order;
use shared::error::{DomainErrorKind, Error};

/// A limit order resting in the book, tracking how much of its original
/// amount remains unfilled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RestingOrder {
    pub order: Order,
    pub remaining: u64,
    sequence: u64,
}

impl RestingOrder {
    pub fn id(&self) -> [u8; 32] {
        self.order.id()
    }

    pub fn price(&self) -> u64 {
        self.order.price
    }
}

/// Price/aggregate-amount pair for a book level, used by `levels`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelAgg {
    pub price: u64,
    pub amount: u64,
}

/// Resting orders for one `AssetPair`, split into bids (buy side) and
/// asks (sell side). Bids are keyed by `(Reverse(price), sequence)` so the
/// best bid — highest price, earliest at that price — sorts first; asks
/// are keyed by `(price, sequence)` so the best ask — lowest price,
/// earliest — sorts first.
#[derive(Default)]
pub struct OrderBook {
    bids: BTreeMap<(Reverse<u64>, u64), RestingOrder>,
    asks: BTreeMap<(u64, u64), RestingOrder>,
    next_sequence: u64,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a limit order as a new resting order with `remaining` equal
    /// to its full amount. Rejects an order whose remaining amount is
    /// already below the dust floor for its own price — it could never
    /// execute even fully alone.
    pub fn add(&mut self, order: Order) -> Result<(), Error> {
        let amount = order.amount;
        self.add_partial(order, amount)
    }

    /// Inserts a limit order as a new resting order with an explicit
    /// `remaining` amount, for a submitted order that already absorbed
    /// partial fills before resting.
    pub fn add_partial(&mut self, order: Order, remaining: u64) -> Result<(), Error> {
        let min_amount = shared::arithmetic::min_amount_for_price(order.price)?;
        if remaining < min_amount {
            return Err(Error::Domain(DomainErrorKind::Overflow));
        }
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        let resting = RestingOrder {
            remaining,
            sequence,
            order,
        };
        match resting.order.side {
            OrderSide::Buy => {
                self.bids.insert((Reverse(resting.price()), sequence), resting);
            }
            OrderSide::Sell => {
                self.asks.insert((resting.price(), sequence), resting);
            }
        }
        Ok(())
    }

    /// The best resting order on `side`, if any.
    pub fn best(&self, side: OrderSide) -> Option<&RestingOrder> {
        match side {
            OrderSide::Buy => self.bids.values().next(),
            OrderSide::Sell => self.asks.values().next(),
        }
    }

    /// Removes and returns the best resting order on `side`.
    pub fn pop_best(&mut self, side: OrderSide) -> Option<RestingOrder> {
        match side {
            OrderSide::Buy => {
                let key = *self.bids.keys().next()?;
                self.bids.remove(&key)
            }
            OrderSide::Sell => {
                let key = *self.asks.keys().next()?;
                self.asks.remove(&key)
            }
        }
    }

    /// Reinserts the best resting order on `side` with an updated
    /// remaining amount, keeping its original price/sequence key so a
    /// partial fill does not lose its place in the queue. Panics if
    /// `side` has no resting orders — callers only call this right after
    /// `best`/`pop_best` confirmed one exists.
    pub fn replace_best_remaining(&mut self, side: OrderSide, remaining: u64) {
        let mut popped = self.pop_best(side).expect("side has a best order");
        popped.remaining = remaining;
        let sequence = popped.sequence;
        match side {
            OrderSide::Buy => {
                self.bids.insert((Reverse(popped.price()), sequence), popped);
            }
            OrderSide::Sell => {
                self.asks.insert((popped.price(), sequence), popped);
            }
        }
    }

    /// Removes a resting order by id, searching both sides. Returns the
    /// removed order, if found.
    pub fn cancel(&mut self, id: [u8; 32]) -> Option<RestingOrder> {
        if let Some(key) = self
            .bids
            .iter()
            .find(|(_, resting)| resting.id() == id)
            .map(|(key, _)| *key)
        {
            return self.bids.remove(&key);
        }
        if let Some(key) = self
            .asks
            .iter()
            .find(|(_, resting)| resting.id() == id)
            .map(|(key, _)| *key)
        {
            return self.asks.remove(&key);
        }
        None
    }

    /// All resting orders, bids first in priority order, then asks.
    pub fn snapshot(&self) -> Vec<RestingOrder> {
        self.bids
            .values()
            .chain(self.asks.values())
            .cloned()
            .collect()
    }

    /// Aggregated `(price, total remaining amount)` levels for `side`, in
    /// priority order.
    pub fn levels(&self, side: OrderSide) -> Vec<LevelAgg> {
        let mut levels: Vec<LevelAgg> = Vec::new();
        let mut push = |price: u64, amount: u64| {
            if let Some(last) = levels.last_mut() {
                if last.price == price {
                    last.amount += amount;
                    return;
                }
            }
            levels.push(LevelAgg { price, amount });
        };
        match side {
            OrderSide::Buy => {
                for resting in self.bids.values() {
                    push(resting.price(), resting.remaining);
                }
            }
            OrderSide::Sell => {
                for resting in self.asks.values() {
                    push(resting.price(), resting.remaining);
                }
            }
        }
        levels
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::asset::AssetPair;
    use model::signature::{PublicKey, Signature};
    use model::Asset;

    fn pair() -> AssetPair {
        AssetPair::new(Asset::Native, Asset::Issued([9; 32])).unwrap()
    }

    fn order(side: OrderSide, price: u64, amount: u64) -> Order {
        Order::new(
            PublicKey([1; 32]),
            PublicKey([2; 32]),
            pair(),
            side,
            price,
            amount,
            0,
            1_000_000,
            1000,
            Asset::Native,
            3,
            Signature([0; 64]),
        )
        .unwrap()
    }

    #[test]
    fn best_bid_is_highest_price_then_earliest() {
        let mut book = OrderBook::new();
        book.add(order(OrderSide::Buy, 100, 10_000_000)).unwrap();
        book.add(order(OrderSide::Buy, 300, 10_000_000)).unwrap();
        book.add(order(OrderSide::Buy, 300, 10_000_000)).unwrap();
        assert_eq!(book.best(OrderSide::Buy).unwrap().price(), 300);
        let first = book.pop_best(OrderSide::Buy).unwrap();
        assert_eq!(book.best(OrderSide::Buy).unwrap().price(), 300);
        assert!(first.sequence < book.best(OrderSide::Buy).unwrap().sequence);
    }

    #[test]
    fn best_ask_is_lowest_price_then_earliest() {
        let mut book = OrderBook::new();
        book.add(order(OrderSide::Sell, 300, 10_000_000)).unwrap();
        book.add(order(OrderSide::Sell, 100, 10_000_000)).unwrap();
        assert_eq!(book.best(OrderSide::Sell).unwrap().price(), 100);
    }

    #[test]
    fn replace_best_remaining_preserves_priority_slot() {
        let mut book = OrderBook::new();
        book.add(order(OrderSide::Buy, 200, 10_000_000)).unwrap();
        book.add(order(OrderSide::Buy, 200, 10_000_000)).unwrap();
        let first_id = book.best(OrderSide::Buy).unwrap().id();
        book.replace_best_remaining(OrderSide::Buy, 1_000_000);
        let best = book.best(OrderSide::Buy).unwrap();
        assert_eq!(best.id(), first_id);
        assert_eq!(best.remaining, 1_000_000);
    }

    #[test]
    fn cancel_removes_from_either_side() {
        let mut book = OrderBook::new();
        book.add(order(OrderSide::Buy, 200, 10_000_000)).unwrap();
        let id = book.best(OrderSide::Buy).unwrap().id();
        assert!(book.cancel(id).is_some());
        assert!(book.is_empty());
    }

    #[test]
    fn levels_aggregates_equal_prices() {
        let mut book = OrderBook::new();
        book.add(order(OrderSide::Buy, 200, 10_000_000)).unwrap();
        book.add(order(OrderSide::Buy, 200, 5_000_000)).unwrap();
        book.add(order(OrderSide::Buy, 100, 1_000_000)).unwrap();
        let levels = book.levels(OrderSide::Buy);
        assert_eq!(levels[0], LevelAgg { price: 200, amount: 15_000_000 });
        assert_eq!(levels[1], LevelAgg { price: 100, amount: 1_000_000 });
    }

    #[test]
    fn rejects_orders_below_the_dust_floor() {
        let mut book = OrderBook::new();
        // At price 1, the minimum amount for nonzero cost is PRICE_CONSTANT.
        let tiny_order = order(OrderSide::Buy, 1, 1);
        assert!(book.add(tiny_order).is_err());
    }
}
