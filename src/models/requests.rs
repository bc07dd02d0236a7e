//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;
use serde_json::Value;

/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Validates a logical key taken from the request path.
///
/// Returns an error message if validation fails, None if valid.
pub fn validate_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("Key cannot be empty".to_string());
    }
    if key.len() > MAX_KEY_LENGTH {
        return Some(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        ));
    }
    None
}

/// Request body for the write operation (PUT /entries/:key)
///
/// # Fields
/// - `value`: Any JSON value to store
/// - `expires_in`: Optional backend TTL in seconds
#[derive(Debug, Clone, Deserialize)]
pub struct WriteRequest {
    /// The value to store
    pub value: Value,
    /// Optional TTL in seconds
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Request body for increment and decrement
#[derive(Debug, Clone, Deserialize)]
pub struct CounterRequest {
    /// Amount to add or subtract
    #[serde(default = "default_amount")]
    pub amount: i64,
}

fn default_amount() -> i64 {
    1
}

/// Query string for DELETE /entries
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatternQuery {
    /// Glob pattern; without it the whole namespace is cleared
    pub pattern: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_request_deserialize() {
        let json = r#"{"value": {"name": "porpoise", "fins": 2}}"#;
        let req: WriteRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.value["name"], "porpoise");
        assert!(req.expires_in.is_none());
    }

    #[test]
    fn test_write_request_with_ttl() {
        let json = r#"{"value": 6, "expires_in": 60}"#;
        let req: WriteRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.value, Value::from(6));
        assert_eq!(req.expires_in, Some(60));
    }

    #[test]
    fn test_counter_request_default_amount() {
        let req: CounterRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.amount, 1);

        let req: CounterRequest = serde_json::from_str(r#"{"amount": -4}"#).unwrap();
        assert_eq!(req.amount, -4);
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("").is_some());
        assert!(validate_key(&"x".repeat(MAX_KEY_LENGTH + 1)).is_some());
        assert!(validate_key("valid_key").is_none());
    }
}
