//! Lint result types

use serde::{Deserialize, Serialize};
use std::fmt;

/// One rule violation reported by the lint engine
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LintResult {
    /// Line number (1-based) where the violation occurs
    pub line_number: usize,

    /// Rule names (e.g., ["MD009", "no-trailing-spaces"])
    pub rule_names: Vec<String>,

    /// Rule description
    pub rule_description: String,

    /// Additional detail about the violation
    pub error_detail: Option<String>,

    /// Column range for the violation [start (1-based), length]
    pub error_range: Option<(usize, usize)>,

    /// Fix information for automatic correction
    pub fix: Option<FixDescriptor>,
}

impl LintResult {
    /// Primary rule name, if the engine reported any
    pub fn primary_name(&self) -> Option<&str> {
        self.rule_names.first().map(String::as_str)
    }

    /// Line that a fix for this result targets (1-based)
    pub fn fix_line(&self) -> Option<usize> {
        self.fix
            .as_ref()
            .map(|fix| fix.line_number.unwrap_or(self.line_number))
    }
}

impl fmt::Display for LintResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} {}",
            self.line_number,
            self.rule_names.join("/"),
            self.rule_description
        )?;

        if let Some(detail) = &self.error_detail {
            write!(f, " [{}]", detail)?;
        }

        Ok(())
    }
}

/// Information for automatically fixing a violation
///
/// Travels with a diagnostic through the editor in the diagnostic's `data`
/// field, so the field names are part of the wire format.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixDescriptor {
    /// Line number to apply the fix (defaults to the violation line if None)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<usize>,

    /// 1-based column to start the edit (None = start of line)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_column: Option<usize>,

    /// Number of characters to delete (-1 = delete entire line)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_count: Option<i64>,

    /// Text to insert at the edit position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insert_text: Option<String>,
}

impl FixDescriptor {
    /// Whether this fix removes its whole line
    pub fn deletes_line(&self) -> bool {
        self.delete_count == Some(-1)
    }
}
