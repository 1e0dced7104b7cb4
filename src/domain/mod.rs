//! Pure cart, pricing, order and countdown rules, plus the ports the
//! application layer talks to.

pub mod action;
pub mod cart;
pub mod countdown;
pub mod money;
pub mod order;
pub mod ports;
pub mod pricing;
