//! Editor settings carried in `initializationOptions`
//!
//! Expected shape:
//!
//! ```json
//! { "markdownlint": { "config": { "MD033": false } } }
//! ```

use super::ConfigMap;
use crate::types::{Error, Result};
use serde::Deserialize;
use serde_json::Value;

/// Settings namespace sent by the client
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditorSettings {
    /// The `markdownlint` section
    #[serde(default)]
    pub markdownlint: MarkdownlintSettings,
}

/// The `markdownlint` section of the editor settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarkdownlintSettings {
    /// Rule override merged above every config file
    #[serde(default)]
    pub config: Option<ConfigMap>,
}

impl EditorSettings {
    /// Parse settings from the raw JSON value the client sent
    pub fn from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value).map_err(|e| Error::Settings(e.to_string()))
    }

    /// Consume the settings, returning the rule override if one was given
    pub fn into_config_override(self) -> Option<ConfigMap> {
        self.markdownlint.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_override_present() {
        let settings =
            EditorSettings::from_value(json!({"markdownlint": {"config": {"MD033": false}}}))
                .unwrap();
        let rules = settings.into_config_override().unwrap();
        assert_eq!(rules.get("MD033"), Some(&json!(false)));
    }

    #[test]
    fn test_missing_section_is_empty() {
        let settings = EditorSettings::from_value(json!({"other": 1})).unwrap();
        assert!(settings.into_config_override().is_none());

        let settings = EditorSettings::from_value(Value::Null).unwrap();
        assert!(settings.into_config_override().is_none());
    }

    #[test]
    fn test_non_object_override_is_rejected() {
        let err = EditorSettings::from_value(json!({"markdownlint": {"config": [1, 2]}}))
            .unwrap_err();
        assert!(matches!(err, Error::Settings(_)));
    }
}
