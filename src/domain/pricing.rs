use super::cart::CartLine;
use super::money::Money;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Totals derived from a set of cart lines.
///
/// Always produced by [`PricingPolicy::totals`]; never patched in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub line_count: u64,
    pub subtotal: Money,
    pub tax: Money,
    pub shipping: Money,
    pub grand_total: Money,
}

/// Tax and shipping rules applied to a cart.
///
/// Two presets exist and they disagree on the flat shipping fee: the cart
/// charges [`PricingPolicy::CART`] while the order-generation path charges
/// [`PricingPolicy::ORDER_GENERATION`]. Which one is canonical is a product
/// decision, so both are kept as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingPolicy {
    pub tax_rate: Decimal,
    /// Shipping is free only when the subtotal is strictly above this.
    pub free_shipping_threshold: Money,
    pub flat_shipping_fee: Money,
}

impl PricingPolicy {
    pub const CART: Self = Self {
        tax_rate: dec!(0.10),
        free_shipping_threshold: Money(5_000_000),
        flat_shipping_fee: Money(30_000),
    };

    pub const ORDER_GENERATION: Self = Self {
        tax_rate: dec!(0.10),
        free_shipping_threshold: Money(5_000_000),
        flat_shipping_fee: Money(150_000),
    };

    pub fn with_flat_shipping_fee(self, fee: Money) -> Self {
        Self {
            flat_shipping_fee: fee,
            ..self
        }
    }

    /// Tax on `subtotal`, rounded half away from zero to a whole unit.
    pub fn tax(&self, subtotal: Money) -> Money {
        let tax = Decimal::from(subtotal.value())
            .checked_mul(self.tax_rate)
            .unwrap_or(Decimal::MAX)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        Money(tax.to_u64().unwrap_or(if tax.is_sign_negative() {
            0
        } else {
            u64::MAX
        }))
    }

    pub fn shipping(&self, subtotal: Money) -> Money {
        if subtotal > self.free_shipping_threshold {
            Money::ZERO
        } else {
            self.flat_shipping_fee
        }
    }

    /// Recomputes every derived total from `lines`.
    ///
    /// No line set is special-cased: with no lines the subtotal is zero, so the
    /// flat shipping fee still applies.
    pub fn totals(&self, lines: &[CartLine]) -> CartTotals {
        let line_count = lines.iter().map(|l| u64::from(l.quantity)).sum();
        let subtotal: Money = lines.iter().map(CartLine::line_total).sum();
        let tax = self.tax(subtotal);
        let shipping = self.shipping(subtotal);

        CartTotals {
            line_count,
            subtotal,
            tax,
            shipping,
            grand_total: subtotal + tax + shipping,
        }
    }
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self::CART
    }
}
