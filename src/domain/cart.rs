use super::money::Money;
use super::pricing::CartTotals;
use crate::error::{CartError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tags which catalog a line was picked from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Product,
    #[serde(alias = "pet")]
    Livestock,
}

/// A catalog record as handed to the cart by the storefront.
///
/// Only `id` and `price` matter to the cart; the full record travels along as
/// `payload` so the UI can render the line without another lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    pub id: String,
    pub price: Option<Money>,
    pub payload: Value,
}

impl CatalogItem {
    pub fn new(id: impl Into<String>, price: Option<Money>, payload: Value) -> Self {
        Self {
            id: id.into(),
            price,
            payload,
        }
    }

    /// Builds an item from a raw catalog record.
    ///
    /// The identifier is read from `_id` (falling back to `id`), either as a
    /// string or a number. A price that is missing, negative or fractional is
    /// treated as absent.
    pub fn from_record(record: Value) -> Result<Self> {
        let id = ["_id", "id"]
            .iter()
            .filter_map(|key| record.get(key))
            .find_map(|value| match value {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .ok_or_else(|| CartError::Validation("Catalog record has no id".to_string()))?;

        let price = record.get("price").and_then(Value::as_u64).map(Money);

        Ok(Self {
            id,
            price,
            payload: record,
        })
    }
}

/// One distinct entry in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: String,
    pub kind: ItemKind,
    pub unit_price: Money,
    pub quantity: u32,
    #[serde(default)]
    pub payload: Value,
}

impl CartLine {
    pub fn matches(&self, id: &str, kind: ItemKind) -> bool {
        self.id == id && self.kind == kind
    }

    pub fn line_total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

/// The cart as the storefront sees it: ordered lines plus derived totals.
///
/// This is also the exact layout of the persisted snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    pub lines: Vec<CartLine>,
    #[serde(flatten)]
    pub totals: CartTotals,
}

impl CartState {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, id: &str, kind: ItemKind) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.matches(id, kind))
    }
}
