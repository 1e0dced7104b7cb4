use crate::domain::action::{CartAction, reduce};
use crate::domain::cart::{CartState, CatalogItem, ItemKind};
use crate::domain::order::{Order, OrderDraft};
use crate::domain::ports::{OrderService, SnapshotStorageBox};
use crate::domain::pricing::PricingPolicy;
use crate::error::{CartError, Result};
use tracing::{debug, info, warn};

/// Storage key the cart snapshot lives under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "pawcart.cart";

/// The single owner of the session cart.
///
/// `CartStore` holds the authoritative [`CartState`], routes every change
/// through [`reduce`] and mirrors the result to its storage port right after
/// the transition. None of its cart operations fail: storage problems are
/// logged and the in-memory cart carries on.
pub struct CartStore {
    state: CartState,
    storage: SnapshotStorageBox,
    key: String,
    policy: PricingPolicy,
}

impl CartStore {
    /// Creates the store and rehydrates it from `storage` if a readable
    /// snapshot exists under `key`.
    ///
    /// # Arguments
    ///
    /// * `storage` - Durable mirror for the cart snapshot.
    /// * `key` - Key the snapshot is read from and written to.
    /// * `policy` - Tax and shipping rules used on every recomputation.
    pub fn open(
        storage: SnapshotStorageBox,
        key: impl Into<String>,
        policy: PricingPolicy,
    ) -> Self {
        let mut store = Self {
            state: CartState::empty(),
            storage,
            key: key.into(),
            policy,
        };

        if let Some(snapshot) = store.read_snapshot() {
            info!(
                key = %store.key,
                lines = snapshot.lines.len(),
                "Rehydrated cart from snapshot"
            );
            store.dispatch(CartAction::LoadCart(snapshot));
        }
        store
    }

    pub fn state(&self) -> &CartState {
        &self.state
    }

    /// Applies `action` and persists the new state (except for loads).
    pub fn dispatch(&mut self, action: CartAction) -> &CartState {
        let name = action.name();
        let persist = !matches!(action, CartAction::LoadCart(_));

        self.state = reduce(&self.state, action, &self.policy);
        debug!(
            action = name,
            lines = self.state.lines.len(),
            grand_total = %self.state.totals.grand_total,
            "Cart transition applied"
        );

        if persist {
            self.persist();
        }
        &self.state
    }

    pub fn add_item(&mut self, item: CatalogItem, kind: ItemKind, quantity: u32) -> &CartState {
        self.dispatch(CartAction::AddItem {
            item,
            kind,
            quantity,
        })
    }

    pub fn remove_item(&mut self, id: &str) -> &CartState {
        self.dispatch(CartAction::RemoveItem { id: id.to_string() })
    }

    pub fn update_quantity(&mut self, id: &str, quantity: i64) -> &CartState {
        self.dispatch(CartAction::UpdateQuantity {
            id: id.to_string(),
            quantity,
        })
    }

    pub fn clear_cart(&mut self) -> &CartState {
        self.dispatch(CartAction::ClearCart)
    }

    pub fn load_cart(&mut self, snapshot: CartState) -> &CartState {
        self.dispatch(CartAction::LoadCart(snapshot))
    }

    /// Hands a copy of the lines to the order service and empties the cart
    /// once the order exists. The cart is left untouched on failure.
    pub async fn checkout(&mut self, orders: &dyn OrderService) -> Result<Order> {
        if self.state.is_empty() {
            return Err(CartError::Validation(
                "Cannot check out an empty cart".to_string(),
            ));
        }

        let order = orders.create_order(OrderDraft::from(&self.state)).await?;
        info!(order_id = %order.id, grand_total = %order.grand_total(), "Order created from cart");
        self.clear_cart();
        Ok(order)
    }

    fn read_snapshot(&self) -> Option<CartState> {
        let raw = match self.storage.read(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Could not read cart snapshot, starting empty");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Discarding malformed cart snapshot");
                None
            }
        }
    }

    fn persist(&self) {
        let result = serde_json::to_string(&self.state)
            .map_err(CartError::from)
            .and_then(|raw| self.storage.write(&self.key, &raw));

        if let Err(e) = result {
            warn!(key = %self.key, error = %e, "Failed to persist cart snapshot");
        }
    }
}
