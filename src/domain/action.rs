use super::cart::{CartLine, CartState, CatalogItem, ItemKind};
use super::money::Money;
use super::pricing::PricingPolicy;

/// Every way the cart can change.
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    /// Merge into the `(id, kind)` line if present, otherwise append.
    AddItem {
        item: CatalogItem,
        kind: ItemKind,
        quantity: u32,
    },
    /// Drop every line with this id, whatever its kind.
    RemoveItem { id: String },
    /// Set the exact quantity; zero or less removes the line.
    UpdateQuantity { id: String, quantity: i64 },
    ClearCart,
    /// Replace the whole state with a snapshot, totals included.
    LoadCart(CartState),
}

impl CartAction {
    pub fn add(item: CatalogItem, kind: ItemKind) -> Self {
        Self::AddItem {
            item,
            kind,
            quantity: 1,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::AddItem { .. } => "add_item",
            Self::RemoveItem { .. } => "remove_item",
            Self::UpdateQuantity { .. } => "update_quantity",
            Self::ClearCart => "clear_cart",
            Self::LoadCart(_) => "load_cart",
        }
    }
}

/// Applies `action` to `state` and returns the next state.
///
/// [`CartAction::LoadCart`] keeps the snapshot totals and
/// [`CartAction::ClearCart`] resets to [`CartState::empty`]. Every other action
/// rebuilds the totals from the resulting lines.
pub fn reduce(state: &CartState, action: CartAction, policy: &PricingPolicy) -> CartState {
    let lines = match action {
        CartAction::LoadCart(snapshot) => return snapshot,
        CartAction::ClearCart => return CartState::empty(),
        CartAction::AddItem { quantity: 0, .. } => return state.clone(),
        CartAction::AddItem {
            item,
            kind,
            quantity,
        } => add_item(&state.lines, item, kind, quantity),
        CartAction::RemoveItem { id } => remove_item(&state.lines, &id),
        CartAction::UpdateQuantity { id, quantity } => {
            if quantity <= 0 {
                remove_item(&state.lines, &id)
            } else {
                let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
                state
                    .lines
                    .iter()
                    .cloned()
                    .map(|mut line| {
                        if line.id == id {
                            line.quantity = quantity;
                        }
                        line
                    })
                    .collect()
            }
        }
    };

    let totals = policy.totals(&lines);
    CartState { lines, totals }
}

fn add_item(lines: &[CartLine], item: CatalogItem, kind: ItemKind, quantity: u32) -> Vec<CartLine> {
    let mut lines = lines.to_vec();
    if let Some(existing) = lines.iter_mut().find(|line| line.matches(&item.id, kind)) {
        existing.quantity = existing.quantity.saturating_add(quantity);
    } else {
        lines.push(CartLine {
            id: item.id,
            kind,
            unit_price: item.price.unwrap_or(Money::ZERO),
            quantity,
            payload: item.payload,
        });
    }
    lines
}

fn remove_item(lines: &[CartLine], id: &str) -> Vec<CartLine> {
    lines.iter().filter(|line| line.id != id).cloned().collect()
}
