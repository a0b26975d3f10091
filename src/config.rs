use std::time::Duration;
use thiserror::Error;

use crate::cart::{CartOptions, LinePolicy};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub catalog_base_url: String,
    pub database_url: String,
    pub bind_address: String,
    pub cart: CartOptions,
    pub default_page_limit: u64,
    pub request_timeout: Duration,
}

impl AppConfig {
    /// Reads the process environment; call `dotenvy::dotenv()` first to pick
    /// up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());

        let line_policy = match lookup("CART_LINE_POLICY").as_deref() {
            None | Some("append") => LinePolicy::Append,
            Some("merge") => LinePolicy::Merge,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "CART_LINE_POLICY",
                    value: other.to_owned(),
                })
            }
        };

        Ok(Self {
            catalog_base_url: text("CATALOG_BASE_URL", "https://dummyjson.com"),
            database_url: text("DATABASE_URL", "sqlite://storefront.db?mode=rwc"),
            bind_address: text("BIND_ADDRESS", "127.0.0.1:3000"),
            cart: CartOptions {
                line_policy,
                seed_cart_id: number(&lookup, "SEED_CART_ID", 1)?,
            },
            default_page_limit: number(&lookup, "DEFAULT_PAGE_LIMIT", 30)?,
            request_timeout: Duration::from_secs(number(&lookup, "REQUEST_TIMEOUT_SECS", 10)?),
        })
    }
}

fn number<F>(lookup: &F, key: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.catalog_base_url, "https://dummyjson.com");
        assert_eq!(config.cart, CartOptions::default());
        assert_eq!(config.default_page_limit, 30);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("CART_LINE_POLICY", "merge"),
            ("SEED_CART_ID", "5"),
            ("DEFAULT_PAGE_LIMIT", "10"),
            ("BIND_ADDRESS", "0.0.0.0:8080"),
        ])
        .unwrap();
        assert_eq!(config.cart.line_policy, LinePolicy::Merge);
        assert_eq!(config.cart.seed_cart_id, 5);
        assert_eq!(config.default_page_limit, 10);
        assert_eq!(config.bind_address, "0.0.0.0:8080");
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            config(&[("CART_LINE_POLICY", "dedupe")]).unwrap_err(),
            ConfigError::Invalid {
                key: "CART_LINE_POLICY",
                value: "dedupe".into()
            }
        );
        assert!(config(&[("SEED_CART_ID", "one")]).is_err());
    }
}
