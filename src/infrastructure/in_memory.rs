use super::clock::SystemClock;
use crate::domain::order::{Order, OrderDraft, OrderStatus};
use crate::domain::ports::{ClockHandle, OrderService, SnapshotStorage};
use crate::domain::pricing::PricingPolicy;
use crate::error::{CartError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::RwLock as AsyncRwLock;

/// A shared in-memory snapshot store.
///
/// Clones share the same map, so a test can keep one clone to inspect what
/// the cart wrote through another.
#[derive(Default, Clone)]
pub struct InMemorySnapshotStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemorySnapshotStorage {
    /// Creates a new, empty in-memory snapshot store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> CartError {
    CartError::Internal(format!("Snapshot store lock poisoned: {e}").into())
}

impl SnapshotStorage for InMemorySnapshotStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A thread-safe in-memory order backend.
///
/// Totals are priced with [`PricingPolicy::ORDER_GENERATION`]. Ids are
/// sequential (`order-1`, `order-2`, ...).
#[derive(Clone)]
pub struct InMemoryOrderService {
    orders: Arc<AsyncRwLock<HashMap<String, Order>>>,
    next_id: Arc<AtomicU64>,
    clock: ClockHandle,
    policy: PricingPolicy,
}

impl Default for InMemoryOrderService {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryOrderService {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: ClockHandle) -> Self {
        Self {
            orders: Arc::default(),
            next_id: Arc::new(AtomicU64::new(1)),
            clock,
            policy: PricingPolicy::ORDER_GENERATION,
        }
    }

    /// Stores an existing order as-is, replacing any order with the same id.
    pub async fn insert(&self, order: Order) {
        self.orders.write().await.insert(order.id.clone(), order);
    }
}

#[async_trait]
impl OrderService for InMemoryOrderService {
    async fn create_order(&self, draft: OrderDraft) -> Result<Order> {
        if draft.lines.is_empty() {
            return Err(CartError::Validation(
                "Order must contain at least one line".to_string(),
            ));
        }

        let id = format!("order-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let order = Order {
            id: id.clone(),
            created_at: self.clock.now(),
            status: OrderStatus::Pending,
            totals: self.policy.totals(&draft.lines),
            lines: draft.lines,
        };

        self.orders.write().await.insert(id, order.clone());
        Ok(order)
    }

    async fn cancel_order(&self, order_id: &str) -> Result<Order> {
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(order_id)
            .ok_or_else(|| CartError::NotFound(format!("order {order_id}")))?;

        match order.status {
            OrderStatus::Pending | OrderStatus::Cancelled => {
                order.status = OrderStatus::Cancelled;
                Ok(order.clone())
            }
            status => Err(CartError::OrderService(format!(
                "Order {order_id} cannot be cancelled while {status:?}"
            ))),
        }
    }

    async fn get_order(&self, order_id: &str) -> Result<Option<Order>> {
        Ok(self.orders.read().await.get(order_id).cloned())
    }
}
