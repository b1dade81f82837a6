//! Per-order state machine (§4.7): `Accepted → PartiallyFilled → Filled`,
//! or `→ Cancelled` from any non-terminal state. `NotFound` is a query
//! response only, never a stored state.

use serde::{Deserialize, Serialize};

/// Serializable so an embedding node can answer an order-status query
/// without this crate knowing anything about its wire shape (the REST
/// layer itself is out of scope; only the projection is ours to provide).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum OrderStatus {
    Accepted,
    PartiallyFilled { filled: u64 },
    Filled { filled: u64 },
    Cancelled { filled: u64 },
    NotFound,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Filled { .. } | OrderStatus::Cancelled { .. }
        )
    }

    /// Applies the effect of an `OrderExecuted` event that filled
    /// `just_filled` additional units, leaving `residue` unfilled.
    pub fn on_executed(self, just_filled: u64, residue: u64) -> Self {
        if self.is_terminal() {
            return self;
        }
        let filled = self.filled_so_far() + just_filled;
        if residue == 0 {
            OrderStatus::Filled { filled }
        } else {
            OrderStatus::PartiallyFilled { filled }
        }
    }

    pub fn on_cancelled(self) -> Self {
        if self.is_terminal() {
            return self;
        }
        OrderStatus::Cancelled {
            filled: self.filled_so_far(),
        }
    }

    fn filled_so_far(&self) -> u64 {
        match self {
            OrderStatus::Accepted => 0,
            OrderStatus::PartiallyFilled { filled }
            | OrderStatus::Filled { filled }
            | OrderStatus::Cancelled { filled } => *filled,
            OrderStatus::NotFound => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_execution_with_residue_moves_to_partially_filled() {
        let status = OrderStatus::Accepted.on_executed(400_000, 600_000);
        assert_eq!(status, OrderStatus::PartiallyFilled { filled: 400_000 });
    }

    #[test]
    fn execution_with_no_residue_moves_to_filled() {
        let status = OrderStatus::Accepted.on_executed(1_000_000, 0);
        assert_eq!(status, OrderStatus::Filled { filled: 1_000_000 });
    }

    #[test]
    fn cancelling_a_partial_fill_keeps_the_filled_amount() {
        let status = OrderStatus::PartiallyFilled { filled: 200_000 }.on_cancelled();
        assert_eq!(status, OrderStatus::Cancelled { filled: 200_000 });
    }

    #[test]
    fn serde_round_trips_through_json() {
        let status = OrderStatus::PartiallyFilled { filled: 12345 };
        let json = serde_json::to_string(&status).unwrap();
        let back: OrderStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(status, back);
    }

    #[test]
    fn terminal_states_ignore_further_transitions() {
        let status = OrderStatus::Filled { filled: 1_000_000 };
        assert_eq!(status.on_executed(1, 0), status);
        assert_eq!(status.on_cancelled(), status);
    }
}
