use super::order::{Order, OrderDraft};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Durable key-value mirror for cart snapshots.
///
/// Synchronous: the cart writes its snapshot inline with every mutation.
/// Writers are not coordinated; the last write wins.
pub trait SnapshotStorage: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> Result<()>;
}

/// The backend that owns orders.
#[async_trait]
pub trait OrderService: Send + Sync {
    async fn create_order(&self, draft: OrderDraft) -> Result<Order>;
    /// Cancelling an already-cancelled order returns it unchanged.
    async fn cancel_order(&self, order_id: &str) -> Result<Order>;
    async fn get_order(&self, order_id: &str) -> Result<Option<Order>>;
}

/// Wall clock in unix seconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

/// User-facing notifications (toasts).
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);
}

pub type SnapshotStorageBox = Box<dyn SnapshotStorage>;
pub type OrderServiceHandle = Arc<dyn OrderService>;
pub type ClockHandle = Arc<dyn Clock>;
pub type NotifierHandle = Arc<dyn Notifier>;
pub type SnapshotStorageFactory = Box<dyn Fn() -> SnapshotStorageBox + Send + Sync>;
