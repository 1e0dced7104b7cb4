use super::cart::{CartLine, CartState};
use super::money::Money;
use super::pricing::CartTotals;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
}

/// What the cart hands over at checkout: a copy of its lines.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct OrderDraft {
    pub lines: Vec<CartLine>,
}

impl From<&CartState> for OrderDraft {
    fn from(state: &CartState) -> Self {
        Self {
            lines: state.lines.clone(),
        }
    }
}

/// An order as returned by the order service.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    /// Unix timestamp in seconds. Fixed once the order exists.
    pub created_at: u64,
    pub status: OrderStatus,
    pub lines: Vec<CartLine>,
    #[serde(flatten)]
    pub totals: CartTotals,
}

impl Order {
    pub fn is_cancelled(&self) -> bool {
        self.status == OrderStatus::Cancelled
    }

    pub fn grand_total(&self) -> Money {
        self.totals.grand_total
    }
}
