//! Rule engine backed by the `mkdlint` crate

use super::RuleEngine;
use crate::config::EffectiveConfig;
use crate::types::{Error, FixDescriptor, LintResult, Result};
use mkdlint::types::FixInfo;
use mkdlint::{Config, LintError, LintOptions, lint_sync};

/// Lints in-memory text with mkdlint's built-in rules
#[derive(Debug, Clone, Copy, Default)]
pub struct MkdlintEngine;

impl MkdlintEngine {
    /// Create the engine
    pub fn new() -> Self {
        Self
    }

    /// Translate the effective config into mkdlint's config type
    fn engine_config(config: &EffectiveConfig) -> Result<Config> {
        serde_json::from_value(config.to_value())
            .map_err(|e| Error::Engine(format!("invalid rule configuration: {}", e)))
    }
}

impl RuleEngine for MkdlintEngine {
    fn lint(&self, name: &str, text: &str, config: &EffectiveConfig) -> Result<Vec<LintResult>> {
        let mut options = LintOptions::default();
        options.strings.insert(name.to_string(), text.to_string());
        options.config = Some(Self::engine_config(config)?);

        let results = lint_sync(&options).map_err(|e| Error::Engine(e.to_string()))?;

        let mut converted: Vec<LintResult> = results
            .get(name)
            .unwrap_or(&[])
            .iter()
            .map(convert_error)
            .collect();
        converted.sort_by_key(|r| r.line_number);
        Ok(converted)
    }
}

fn convert_error(error: &LintError) -> LintResult {
    LintResult {
        line_number: error.line_number,
        rule_names: error.rule_names.iter().map(|n| n.to_string()).collect(),
        rule_description: error.rule_description.to_string(),
        error_detail: error.error_detail.clone(),
        error_range: error.error_range,
        fix: error.fix_info.as_ref().map(convert_fix),
    }
}

fn convert_fix(fix: &FixInfo) -> FixDescriptor {
    FixDescriptor {
        line_number: fix.line_number,
        edit_column: fix.edit_column,
        delete_count: fix.delete_count.map(i64::from),
        insert_text: fix.insert_text.clone(),
    }
}
