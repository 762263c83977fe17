//! Built-in rule defaults applied beneath every other config layer.

use super::ConfigMap;
use serde_json::json;

/// Rule settings used when no other source says otherwise.
///
/// All rules stay enabled except line length, which is mostly noise while
/// editing prose.
pub fn builtin_defaults() -> ConfigMap {
    let mut rules = ConfigMap::new();
    rules.insert("default".to_string(), json!(true));
    rules.insert("MD013".to_string(), json!(false));
    rules
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_defaults() {
        let rules = builtin_defaults();
        assert_eq!(rules.get("default"), Some(&json!(true)));
        assert_eq!(rules.get("MD013"), Some(&json!(false)));
        assert_eq!(rules.len(), 2);
    }
}
