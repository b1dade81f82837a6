//! The Matching Engine (§4.4): pairs a submitted accepted order against
//! the order book's opposite side, cascading through resting orders at
//! counter-order priority until the submission is exhausted, rested, or
//! system-cancelled.

use model::order::OrderSide;
use model::PRICE_CONSTANT;
use orderbook::OrderBook;
use shared::arithmetic::{correct, cost, min_amount_for_price, partial_fee};
use shared::error::{DomainErrorKind, Error};

use crate::accepted_order::{AcceptedOrder, LimitOrder};
use crate::events::{CancelReason, MatchEvent};

fn to_u64(v: u128) -> Result<u64, Error> {
    u64::try_from(v).map_err(|_| Error::Domain(DomainErrorKind::Overflow))
}

fn prices_cross(submitted_side: OrderSide, submitted_price: u64, counter_price: u64) -> bool {
    match submitted_side {
        OrderSide::Buy => submitted_price >= counter_price,
        OrderSide::Sell => submitted_price <= counter_price,
    }
}

/// `executedAmount(submitted, counter)` from §4.4. The trading price is
/// always `counter.order.price`.
fn executed_amount(submitted: &AcceptedOrder, counter: &AcceptedOrder) -> Result<u64, Error> {
    let counter_price = counter.order().price;
    let submitted_corrected = correct(submitted.amount(), counter_price)?;
    let counter_amount_asset = counter.amount_of_amount_asset()?;
    let matched = submitted_corrected.min(counter_amount_asset);

    let market = match submitted {
        AcceptedOrder::Limit(_) => return Ok(matched),
        AcceptedOrder::Market(m) => m,
    };

    let a = market.order.amount as u128;
    let afs = market.available_for_spending as u128;
    let fee = market.order.matcher_fee as u128;
    let price = counter_price as u128;
    let price_constant = PRICE_CONSTANT as u128;
    let same_asset_fee = submitted.fee_asset() == submitted.spent_asset();

    let cap = match market.order.side {
        OrderSide::Buy => {
            if same_asset_fee {
                let denom = (price * a) / price_constant + fee;
                if denom == 0 {
                    0
                } else {
                    correct(to_u64((afs * a) / denom)?, counter_price)?
                }
            } else {
                if price == 0 {
                    return Err(Error::Domain(DomainErrorKind::DivisionByZero));
                }
                correct(to_u64((afs * price_constant) / price)?, counter_price)?
            }
        }
        OrderSide::Sell => {
            if same_asset_fee {
                let denom = a + fee;
                if denom == 0 {
                    0
                } else {
                    to_u64((afs * a) / denom)?
                }
            } else {
                to_u64(afs)?
            }
        }
    };

    Ok(matched.min(cap))
}

/// Either inserts `current` as a new resting order (if it is a still-valid
/// limit remainder) or emits a system-cancel event — the tail shared by
/// "no counter / prices don't cross" and "submission exhausted" paths.
/// `error` is `Some` when this tail was reached because an arithmetic step
/// failed (§7: "the error attached to the event"); `None` for the plain
/// dust/unfillable-market cases, which get their own `CancelReason`.
fn rest_or_cancel(
    current: AcceptedOrder,
    book: &mut OrderBook,
    now: u64,
    events: &mut Vec<MatchEvent>,
    error: Option<Error>,
) {
    match &current {
        AcceptedOrder::Limit(LimitOrder { amount, order, .. }) => {
            let restable = min_amount_for_price(order.price)
                .map(|min_amount| *amount >= min_amount)
                .unwrap_or(false);
            if restable && *amount > 0 {
                events.push(MatchEvent::OrderAdded {
                    order: current.clone(),
                    timestamp: now,
                });
                let _ = book.add_partial(order.clone(), *amount);
            } else if *amount > 0 {
                let reason = error.map(CancelReason::Arithmetic).unwrap_or(CancelReason::DustResidue);
                events.push(MatchEvent::OrderCanceled {
                    order: current,
                    is_system_cancel: true,
                    reason,
                    timestamp: now,
                });
            }
        }
        AcceptedOrder::Market(_) => {
            let reason = error.map(CancelReason::Arithmetic).unwrap_or(CancelReason::Unfillable);
            events.push(MatchEvent::OrderCanceled {
                order: current,
                is_system_cancel: true,
                reason,
                timestamp: now,
            });
        }
    }
}

/// Runs `submitted` against `book` to completion, returning every event
/// the submission produced (possibly several `OrderExecuted` events from
/// cascading fills, followed by a rest or cancel of the final remainder).
pub fn process(submitted: AcceptedOrder, book: &mut OrderBook, now: u64) -> Vec<MatchEvent> {
    let mut events = Vec::new();

    if !submitted.is_valid(submitted.order().price) {
        events.push(MatchEvent::OrderCanceled {
            order: submitted,
            is_system_cancel: true,
            reason: CancelReason::Invalid,
            timestamp: now,
        });
        return events;
    }

    let mut current = submitted;
    loop {
        let opposite = current.order().side.opposite();
        let best = book.best(opposite).cloned();

        let crosses = match &best {
            Some(resting) => prices_cross(current.order().side, current.order().price, resting.price()),
            None => false,
        };

        if !crosses {
            rest_or_cancel(current, book, now, &mut events, None);
            break;
        }

        let resting = best.expect("crosses implies a best counter exists");
        let counter_fee = match partial_fee(resting.order.matcher_fee, resting.order.amount, resting.remaining) {
            Ok(fee) => fee,
            Err(e) => {
                rest_or_cancel(current, book, now, &mut events, Some(e));
                break;
            }
        };
        let counter = AcceptedOrder::Limit(LimitOrder {
            amount: resting.remaining,
            fee: counter_fee,
            order: resting.order.clone(),
        });

        let executed = match executed_amount(&current, &counter) {
            Ok(e) => e,
            Err(e) => {
                rest_or_cancel(current, book, now, &mut events, Some(e));
                break;
            }
        };

        if executed == 0 {
            rest_or_cancel(current, book, now, &mut events, None);
            break;
        }

        let counter_price = counter.order().price;
        let executed_cost = match cost(executed, counter_price) {
            Ok(c) => c,
            Err(e) => {
                rest_or_cancel(current, book, now, &mut events, Some(e));
                break;
            }
        };
        let counter_executed_fee =
            partial_fee(counter.order().matcher_fee, counter.order().amount, executed).unwrap_or(0);
        let submitted_executed_fee =
            partial_fee(current.order().matcher_fee, current.order().amount, executed).unwrap_or(0);

        let counter_new_amount = counter.amount() - executed;
        let counter_new_fee = counter.fee().saturating_sub(counter_executed_fee);
        let counter_remaining = counter.partial(counter_new_amount, counter_new_fee, None);
        let counter_restable = counter_new_amount > 0
            && min_amount_for_price(counter_price)
                .map(|min_amount| counter_new_amount >= min_amount)
                .unwrap_or(false);
        if counter_restable {
            // Keeps the counter's original insertion sequence so a partial
            // fill never costs it its place in the price-time queue.
            book.replace_best_remaining(opposite, counter_new_amount);
        } else {
            book.pop_best(opposite);
        }

        let new_amount = current.amount() - executed;
        let new_fee = current.fee().saturating_sub(submitted_executed_fee);
        let new_afs = match &current {
            AcceptedOrder::Market(m) => {
                let decrement = match current.order().side {
                    OrderSide::Sell => executed,
                    OrderSide::Buy => executed_cost,
                };
                let mut afs = m.available_for_spending.saturating_sub(decrement);
                if current.fee_asset() == current.spent_asset() {
                    afs = afs.saturating_sub(submitted_executed_fee);
                }
                Some(afs)
            }
            AcceptedOrder::Limit(_) => None,
        };
        let submitted_remaining = current.partial(new_amount, new_fee, new_afs);

        events.push(MatchEvent::OrderExecuted {
            submitted: current.clone(),
            counter: counter.clone(),
            price: counter_price,
            executed_amount: executed,
            executed_amount_of_price_asset: executed_cost,
            submitted_executed_fee,
            counter_executed_fee,
            submitted_remaining: submitted_remaining.clone(),
            counter_remaining,
            timestamp: now,
        });

        if submitted_remaining.amount() > 0 && submitted_remaining.is_valid(submitted_remaining.order().price) {
            current = submitted_remaining;
            continue;
        }

        if submitted_remaining.amount() > 0 {
            // Already failed `is_valid` above for a reason beyond the dust
            // floor (e.g. a market order's exhausted `availableForSpending`
            // driving its receive amount to zero) — cancel outright rather
            // than re-deriving a resting decision from `rest_or_cancel`.
            events.push(MatchEvent::OrderCanceled {
                order: submitted_remaining,
                is_system_cancel: true,
                reason: CancelReason::Unfillable,
                timestamp: now,
            });
        }
        break;
    }

    events
}

/// Processes a client-initiated cancel (§5: "a control submission processed
/// in the same serialized queue; it is always accepted if the order is
/// still present; it has no timeout"). Returns `None` if `order_id` is not
/// resting in `book` — the caller maps that to `OrderStatus::NotFound`
/// rather than this function raising `Error::NotFound` itself, since a
/// pure lookup miss is not an arithmetic or domain failure.
pub fn cancel(order_id: [u8; 32], book: &mut OrderBook, now: u64) -> Option<MatchEvent> {
    let resting = book.cancel(order_id)?;
    Some(MatchEvent::OrderCanceled {
        order: AcceptedOrder::Limit(LimitOrder {
            amount: resting.remaining,
            fee: partial_fee(resting.order.matcher_fee, resting.order.amount, resting.remaining).unwrap_or(0),
            order: resting.order,
        }),
        is_system_cancel: false,
        reason: CancelReason::ClientRequested,
        timestamp: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::asset::AssetPair;
    use model::signature::{PublicKey, Signature};
    use model::{Asset, Order};

    fn pair() -> AssetPair {
        AssetPair::new(Asset::Native, Asset::Issued([9; 32])).unwrap()
    }

    fn limit(side: OrderSide, price: u64, amount: u64, fee: u64) -> Order {
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
            Asset::Native,
            3,
            Signature([0; 64]),
        )
        .unwrap()
    }

    // S1: limit crosses, full fill.
    #[test]
    fn full_fill_against_a_matching_resting_order() {
        let mut book = OrderBook::new();
        book.add(limit(OrderSide::Sell, 1000, 1_000_000, 300_000)).unwrap();

        let buy = AcceptedOrder::limit(limit(OrderSide::Buy, 1000, 1_000_000, 300_000));
        let events = process(buy, &mut book, 42);

        assert_eq!(events.len(), 1);
        match &events[0] {
            MatchEvent::OrderExecuted {
                executed_amount,
                submitted_remaining,
                counter_remaining,
                ..
            } => {
                assert_eq!(*executed_amount, 1_000_000);
                assert_eq!(submitted_remaining.amount(), 0);
                assert_eq!(counter_remaining.amount(), 0);
            }
            other => panic!("expected OrderExecuted, got {other:?}"),
        }
        assert!(book.is_empty());
    }

    // S2: limit crosses, partial fill on submitted — remainder rests.
    #[test]
    fn partial_fill_rests_the_remainder() {
        let mut book = OrderBook::new();
        book.add(limit(OrderSide::Sell, 1000, 400_000, 120_000)).unwrap();

        let buy = AcceptedOrder::limit(limit(OrderSide::Buy, 1000, 1_000_000, 300_000));
        let events = process(buy, &mut book, 42);

        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], MatchEvent::OrderExecuted { executed_amount: 400_000, .. }));
        assert!(matches!(events[1], MatchEvent::OrderAdded { .. }));
        assert_eq!(book.best(OrderSide::Buy).unwrap().remaining, 600_000);
    }

    #[test]
    fn non_crossing_limit_order_rests_without_a_fill() {
        let mut book = OrderBook::new();
        book.add(limit(OrderSide::Sell, 2000, 1_000_000, 300_000)).unwrap();

        let buy = AcceptedOrder::limit(limit(OrderSide::Buy, 1000, 1_000_000, 300_000));
        let events = process(buy, &mut book, 42);

        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], MatchEvent::OrderAdded { .. }));
        assert_eq!(book.best(OrderSide::Buy).unwrap().price(), 1000);
    }

    #[test]
    fn unfillable_market_order_is_system_cancelled() {
        let mut book = OrderBook::new();
        let order = limit(OrderSide::Buy, 1000, 1_000_000, 300_000);
        let market = AcceptedOrder::market(order, 0);
        let events = process(market, &mut book, 42);
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            MatchEvent::OrderCanceled { is_system_cancel: true, .. }
        ));
    }

    // S4: a submission whose own amount is below the dust floor at its own
    // price (99 units at a price whose dust floor is 100) is rejected by
    // `is_valid` before ever reaching the book and system-cancelled outright.
    #[test]
    fn invalid_submission_is_cancelled_immediately() {
        let mut book = OrderBook::new();
        let tiny = limit(OrderSide::Buy, 1, 1, 0);
        let events = process(AcceptedOrder::limit(tiny), &mut book, 7);
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            MatchEvent::OrderCanceled { is_system_cancel: true, .. }
        ));
    }

    #[test]
    fn dust_sized_order_below_its_own_minimum_is_system_cancelled() {
        let mut book = OrderBook::new();
        // min_amount_for_price(1_000_000) = ceil(PRICE_CONSTANT / 1_000_000) = 100.
        let dust = limit(OrderSide::Buy, 1_000_000, 99, 0);
        let events = process(AcceptedOrder::limit(dust), &mut book, 7);
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            MatchEvent::OrderCanceled { is_system_cancel: true, .. }
        ));
    }

    // S3: market buy whose available-for-spending, not the resting ask's
    // depth, is the binding constraint, with the matcher fee charged in the
    // spent (price) asset — the buy side spends `pair.price_asset`, so the
    // order's `fee_asset` is set to that same asset to trigger the
    // `same_asset_fee` branch of `executed_amount`. Worked by hand against
    // §4.4's formula:
    // denom = price*a/PRICE_CONSTANT + fee = 1000*10_000_000/1e8 + 10_000 = 10_100
    // cap_before_correct = floor(AFS*a / denom) = floor(5_000*10_000_000 / 10_100) = 4_950_495
    // cap = correct(4_950_495, 1000) = 4_900_000
    #[test]
    fn market_buy_capped_by_available_for_spending_with_fee_in_spent_asset() {
        let mut book = OrderBook::new();
        book.add(limit(OrderSide::Sell, 1000, 10_000_000, 0)).unwrap();

        let order = Order::new(
            PublicKey([1; 32]),
            PublicKey([2; 32]),
            pair(),
            OrderSide::Buy,
            1000,
            10_000_000,
            0,
            1_000_000,
            10_000,
            Asset::Issued([9; 32]),
            3,
            Signature([0; 64]),
        )
        .unwrap();
        let market = AcceptedOrder::market(order, 5_000);
        let events = process(market, &mut book, 99);

        assert_eq!(events.len(), 2, "partial fill then a system cancel of the exhausted AFS remainder");
        match &events[0] {
            MatchEvent::OrderExecuted {
                executed_amount,
                submitted_remaining,
                ..
            } => {
                assert_eq!(*executed_amount, 4_900_000);
                // 49 price-asset units of cost plus 4_900 of fee leave 51 of
                // the original 5_000 AFS — too little to fund another unit.
                assert_eq!(submitted_remaining.available_for_spending(), Some(51));
            }
            other => panic!("expected OrderExecuted, got {other:?}"),
        }
        assert!(matches!(
            events[1],
            MatchEvent::OrderCanceled { is_system_cancel: true, .. }
        ));
    }

    #[test]
    fn cancel_removes_a_resting_order_and_reports_it_as_client_requested() {
        let mut book = OrderBook::new();
        book.add(limit(OrderSide::Buy, 1000, 1_000_000, 300_000)).unwrap();
        let id = book.best(OrderSide::Buy).unwrap().id();

        let event = cancel(id, &mut book, 5).expect("order is resting");
        assert!(book.is_empty());
        match event {
            MatchEvent::OrderCanceled {
                is_system_cancel,
                reason,
                ..
            } => {
                assert!(!is_system_cancel);
                assert_eq!(reason, CancelReason::ClientRequested);
            }
            other => panic!("expected OrderCanceled, got {other:?}"),
        }
    }

    #[test]
    fn cancel_of_an_unknown_order_returns_none() {
        let mut book = OrderBook::new();
        assert!(cancel([7; 32], &mut book, 5).is_none());
    }

    // S4: a crossing match whose executed amount floors to zero via
    // `correct()` at the counter's (much lower) price, even though both
    // orders are independently valid at their own price. The submission is
    // a market order, so `rest_or_cancel` always cancels it outright rather
    // than resting — and the untouched resting counter is never popped.
    #[test]
    fn crossing_match_that_floors_to_zero_system_cancels_the_market_submission() {
        let mut book = OrderBook::new();
        book.add(limit(OrderSide::Sell, 1, 100_000_000, 0)).unwrap();

        let order = limit(OrderSide::Buy, 100_000_000, 1, 0);
        let market = AcceptedOrder::market(order, 1000);
        let events = process(market, &mut book, 3);

        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            MatchEvent::OrderCanceled { is_system_cancel: true, .. }
        ));
        assert!(!book.is_empty(), "the untouched resting counter stays in the book");
    }

    // A partial fill against the first of two same-priced resting asks must
    // not cost it its place ahead of the second — regression test for using
    // `replace_best_remaining` (which preserves insertion sequence) rather
    // than `add_partial` (which assigns a new one) when re-resting a
    // partially-filled counter order.
    #[test]
    fn partial_fill_preserves_the_counters_original_time_priority() {
        // Distinct senders so the two same-priced asks get distinct ids —
        // otherwise the test couldn't tell them apart by id at all.
        fn ask(sender: [u8; 32]) -> Order {
            Order::new(
                PublicKey(sender),
                PublicKey([2; 32]),
                pair(),
                OrderSide::Sell,
                1000,
                1_000_000,
                0,
                1_000_000,
                0,
                Asset::Native,
                3,
                Signature([0; 64]),
            )
            .unwrap()
        }

        let mut book = OrderBook::new();
        book.add(ask([10; 32])).unwrap();
        let first_id = book.best(OrderSide::Sell).unwrap().id();
        book.add(ask([11; 32])).unwrap();

        let buy = AcceptedOrder::limit(limit(OrderSide::Buy, 1000, 400_000, 0));
        let events = process(buy, &mut book, 1);
        assert!(matches!(events[0], MatchEvent::OrderExecuted { executed_amount: 400_000, .. }));

        let best = book.best(OrderSide::Sell).unwrap();
        assert_eq!(best.id(), first_id, "the partially-filled order must still be first at its price");
        assert_eq!(best.remaining, 600_000);
    }
}
