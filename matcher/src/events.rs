//! Match events (§3, §9 "Cyclic references"): self-contained value
//! records carrying everything a downstream consumer needs, rather than
//! references back into the order book.

use shared::Error;

use crate::accepted_order::AcceptedOrder;

/// Why a system cancel happened. §7: "any internal overflow becomes
/// DomainError and the submission is system-cancelled with the error
/// attached to the event" — `Arithmetic` carries that error; the other
/// variants cover the cancels that never raised one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CancelReason {
    /// Failed the pre-match `isValid` check (dust, expired, zero amount).
    Invalid,
    /// A limit remainder too small to rest at its own price.
    DustResidue,
    /// A market order with no crossing counter, or AFS exhausted.
    Unfillable,
    /// An arithmetic operation over the submission's own fields failed.
    Arithmetic(Error),
    /// An explicit client-initiated cancel request (§5).
    ClientRequested,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchEvent {
    OrderAdded {
        order: AcceptedOrder,
        timestamp: u64,
    },
    OrderExecuted {
        submitted: AcceptedOrder,
        counter: AcceptedOrder,
        price: u64,
        executed_amount: u64,
        executed_amount_of_price_asset: u64,
        submitted_executed_fee: u64,
        counter_executed_fee: u64,
        submitted_remaining: AcceptedOrder,
        counter_remaining: AcceptedOrder,
        timestamp: u64,
    },
    OrderCanceled {
        order: AcceptedOrder,
        is_system_cancel: bool,
        reason: CancelReason,
        timestamp: u64,
    },
}

impl MatchEvent {
    pub fn timestamp(&self) -> u64 {
        match self {
            MatchEvent::OrderAdded { timestamp, .. }
            | MatchEvent::OrderExecuted { timestamp, .. }
            | MatchEvent::OrderCanceled { timestamp, .. } => *timestamp,
        }
    }
}
