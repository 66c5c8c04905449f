//! Small utility helpers shared across the crate.

use std::env;

use serde_json::Value;

/// Return the first non-empty environment variable from `keys`, or `None`.
pub fn env_first(keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Ok(value) = env::var(key) {
            if !value.trim().is_empty() {
                return Some(value);
            }
        }
    }
    None
}

/// Mask a secret for display, keeping only a short prefix and suffix.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// Loose truthiness for flags that callers may send as bools, numbers, or strings.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mask_key() {
        let masked = mask_key("gsk_1234567890abcdefghijklmnop");
        assert_eq!(masked, "gsk_...mnop");
        assert_eq!(mask_key("short"), "****");
    }

    #[test]
    fn test_is_truthy() {
        assert!(is_truthy(Some(&json!(true))));
        assert!(is_truthy(Some(&json!(1))));
        assert!(is_truthy(Some(&json!("yes"))));
        assert!(!is_truthy(None));
        assert!(!is_truthy(Some(&json!(false))));
        assert!(!is_truthy(Some(&json!(0))));
        assert!(!is_truthy(Some(&json!(""))));
        assert!(!is_truthy(Some(&json!(null))));
        assert!(!is_truthy(Some(&json!([]))));
    }
}
