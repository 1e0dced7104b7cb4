use crate::application::cart_store::DEFAULT_STORAGE_KEY;
use crate::domain::countdown::DEFAULT_WINDOW_SECONDS;
use crate::domain::money::Money;
use crate::domain::pricing::PricingPolicy;
use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

pub const STORAGE_KEY_VAR: &str = "PAWCART_STORAGE_KEY";
pub const PAYMENT_WINDOW_VAR: &str = "PAWCART_PAYMENT_WINDOW_SECS";
pub const SHIPPING_FEE_VAR: &str = "PAWCART_FLAT_SHIPPING_FEE";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub storage_key: String,
    pub payment_window_seconds: u64,
    pub pricing: PricingPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            payment_window_seconds: DEFAULT_WINDOW_SECONDS,
            pricing: PricingPolicy::CART,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let fee: u64 = try_load(
            &lookup,
            SHIPPING_FEE_VAR,
            defaults.pricing.flat_shipping_fee.value(),
        );

        Self {
            storage_key: try_load(&lookup, STORAGE_KEY_VAR, defaults.storage_key),
            payment_window_seconds: try_load(
                &lookup,
                PAYMENT_WINDOW_VAR,
                defaults.payment_window_seconds,
            ),
            pricing: defaults.pricing.with_flat_shipping_fee(Money(fee)),
        }
    }
}

fn try_load<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        info!("{key} not set, using default: {default}");
        return default;
    };

    raw.trim().parse().unwrap_or_else(|e| {
        warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
        default
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(Config::from_lookup(lookup(&[])), Config::default());
    }

    #[test]
    fn test_overrides_from_vars() {
        let config = Config::from_lookup(lookup(&[
            (STORAGE_KEY_VAR, "shop.cart"),
            (PAYMENT_WINDOW_VAR, " 60 "),
            (SHIPPING_FEE_VAR, "150000"),
        ]));
        assert_eq!(config.storage_key, "shop.cart");
        assert_eq!(config.payment_window_seconds, 60);
        assert_eq!(config.pricing.flat_shipping_fee, Money(150_000));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = Config::from_lookup(lookup(&[(PAYMENT_WINDOW_VAR, "soon")]));
        assert_eq!(config.payment_window_seconds, DEFAULT_WINDOW_SECONDS);
    }
}
