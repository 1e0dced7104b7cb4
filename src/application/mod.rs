//! Application layer wiring the domain rules to their ports.
//!
//! `CartStore` owns the session cart and its durable mirror; `PaymentCountdown`
//! runs per-order payment timers on `tokio` and issues the one cancellation
//! each expired order is owed.

pub mod cart_store;
pub mod countdown;
