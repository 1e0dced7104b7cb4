use crate::domain::action::CartAction;
use crate::domain::cart::{CatalogItem, ItemKind};
use crate::domain::money::Money;
use crate::error::{CartError, Result};
use serde::Deserialize;
use serde_json::json;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Add,
    Remove,
    Update,
    Clear,
}

/// One row of an actions file: `type, id, kind, price, quantity`.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct ActionRecord {
    pub r#type: ActionType,
    pub id: Option<String>,
    pub kind: Option<ItemKind>,
    pub price: Option<u64>,
    pub quantity: Option<i64>,
}

impl ActionRecord {
    fn require_id(&self) -> Result<String> {
        self.id
            .clone()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| CartError::Validation(format!("{:?} requires an id", self.r#type)))
    }
}

impl TryFrom<ActionRecord> for CartAction {
    type Error = CartError;

    fn try_from(record: ActionRecord) -> Result<Self> {
        match record.r#type {
            ActionType::Add => {
                let id = record.require_id()?;
                let quantity = u32::try_from(record.quantity.unwrap_or(1)).map_err(|_| {
                    let quantity = record.quantity;
                    CartError::Validation(format!("Invalid quantity for add: {quantity:?}"))
                })?;
                let payload = match record.price {
                    Some(price) => json!({ "_id": id, "price": price }),
                    None => json!({ "_id": id }),
                };
                Ok(CartAction::AddItem {
                    item: CatalogItem::new(id, record.price.map(Money), payload),
                    kind: record.kind.unwrap_or(ItemKind::Product),
                    quantity,
                })
            }
            ActionType::Remove => Ok(CartAction::RemoveItem {
                id: record.require_id()?,
            }),
            ActionType::Update => {
                let id = record.require_id()?;
                let quantity = record.quantity.ok_or_else(|| {
                    CartError::Validation("Update requires a quantity".to_string())
                })?;
                Ok(CartAction::UpdateQuantity { id, quantity })
            }
            ActionType::Clear => Ok(CartAction::ClearCart),
        }
    }
}

/// Reads cart actions from a CSV source.
///
/// Wraps `csv::Reader` and yields one `Result<CartAction>` per row, trimming
/// whitespace and tolerating short rows.
pub struct ActionReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> ActionReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily reads and converts rows, in file order.
    pub fn actions(self) -> impl Iterator<Item = Result<CartAction>> {
        self.reader
            .into_deserialize::<ActionRecord>()
            .map(|result| result.map_err(CartError::from).and_then(CartAction::try_from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(data: &str) -> Vec<Result<CartAction>> {
        ActionReader::new(data.as_bytes()).actions().collect()
    }

    #[test]
    fn test_reader_valid_stream() {
        let data = "type, id, kind, price, quantity\n\
                    add, P, product, 1200000, 2\n\
                    add, L, pet, 6900000,\n\
                    update, P, , , 1\n\
                    remove, L, , ,\n\
                    clear, , , ,";
        let results = read(data);
        assert_eq!(results.len(), 5);

        match results[0].as_ref().unwrap() {
            CartAction::AddItem {
                item,
                kind,
                quantity,
            } => {
                assert_eq!(item.id, "P");
                assert_eq!(item.price, Some(Money(1_200_000)));
                assert_eq!(item.payload["price"], 1_200_000);
                assert_eq!(*kind, ItemKind::Product);
                assert_eq!(*quantity, 2);
            }
            other => panic!("unexpected action {other:?}"),
        }

        assert!(matches!(
            results[1].as_ref().unwrap(),
            CartAction::AddItem {
                kind: ItemKind::Livestock,
                quantity: 1,
                ..
            }
        ));
        assert_eq!(
            results[2].as_ref().unwrap(),
            &CartAction::UpdateQuantity {
                id: "P".to_string(),
                quantity: 1
            }
        );
        assert_eq!(
            results[3].as_ref().unwrap(),
            &CartAction::RemoveItem {
                id: "L".to_string()
            }
        );
        assert_eq!(results[4].as_ref().unwrap(), &CartAction::ClearCart);
    }

    #[test]
    fn test_reader_malformed_lines() {
        let data = "type, id, kind, price, quantity\n\
                    explode, 1, product, 1, 1\n\
                    add, , product, 1, 1\n\
                    add, X, product, abc, 1\n\
                    add, X, product, 1, -2\n\
                    update, X, , ,";
        let results = read(data);
        assert_eq!(results.len(), 5);
        assert!(results.iter().all(|r| r.is_err()));
        assert!(matches!(results[1], Err(CartError::Validation(_))));
        assert!(matches!(results[2], Err(CartError::Csv(_))));
    }
}
