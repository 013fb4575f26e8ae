//! Request/response schemas for the item endpoints.

use serde::{Deserialize, Serialize};

/// Payload for creating an item.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemCreate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
}

impl ItemCreate {
    /// Field-level validation; returns the first failure message.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("Item name must not be empty".to_string());
        }
        if self.name.chars().count() > 100 {
            return Err("Item name must be at most 100 characters".to_string());
        }
        if let Some(description) = &self.description {
            if description.chars().count() > 500 {
                return Err("Item description must be at most 500 characters".to_string());
            }
        }
        if !(self.price > 0.0) {
            return Err("Item price must be positive".to_string());
        }
        Ok(())
    }
}

/// An item as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    pub available: bool,
}

/// Pagination parameters for the item list.
#[derive(Debug, Clone, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    10
}

/// Parameters for the slow test endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SlowParams {
    #[serde(default = "default_delay")]
    pub delay: u64,
}

fn default_delay() -> u64 {
    5
}

/// Parameters for the error test endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorParams {
    #[serde(default = "default_error_type")]
    pub error_type: String,
}

fn default_error_type() -> String {
    "500".to_string()
}

/// Parameters for the cache test endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheParams {
    #[serde(default = "default_use_cache")]
    pub use_cache: bool,
}

fn default_use_cache() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_payload() -> ItemCreate {
        ItemCreate {
            name: "Widget".to_string(),
            description: Some("A widget".to_string()),
            price: 9.99,
        }
    }

    #[test]
    fn valid_payload_passes() {
        assert!(valid_payload().validate().is_ok());
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut payload = valid_payload();
        payload.name.clear();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn oversized_name_is_rejected() {
        let mut payload = valid_payload();
        payload.name = "x".repeat(101);
        assert!(payload.validate().is_err());
    }

    #[test]
    fn oversized_description_is_rejected() {
        let mut payload = valid_payload();
        payload.description = Some("x".repeat(501));
        assert!(payload.validate().is_err());
    }

    #[test]
    fn non_positive_price_is_rejected() {
        let mut payload = valid_payload();
        payload.price = 0.0;
        assert!(payload.validate().is_err());
        payload.price = -1.0;
        assert!(payload.validate().is_err());
    }

    #[test]
    fn list_params_defaults() {
        let params: ListParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.skip, 0);
        assert_eq!(params.limit, 10);
    }
}
