//! Convert lint results to LSP diagnostics

use crate::types::{FixDescriptor, LintResult};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, NumberOrString, Position, Range, Url};

use super::utils::{line_at, to_range, utf16_column};

/// Source tag put on every diagnostic this server publishes
pub const SOURCE: &str = "mkdlint";

/// Payload stored in [`Diagnostic::data`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticData {
    /// Fix carried over from the lint result
    pub fix: FixDescriptor,
}

/// Convert a LintResult to an LSP Diagnostic
///
/// `content` is the linted text; byte columns are mapped to UTF-16 through
/// the reported line.
pub fn lint_result_to_diagnostic(result: &LintResult, content: &str) -> Diagnostic {
    let code = result
        .primary_name()
        .map(|name| NumberOrString::String(name.to_string()));
    let data = result.fix.clone().and_then(|fix| {
        serde_json::to_value(DiagnosticData { fix }).ok()
    });

    Diagnostic {
        range: calculate_range(result, content),
        severity: Some(DiagnosticSeverity::WARNING),
        code,
        source: Some(SOURCE.to_string()),
        message: format_message(result),
        data,
        ..Default::default()
    }
}

/// Convert every result, preserving order
pub fn to_diagnostics(results: &[LintResult], content: &str) -> Vec<Diagnostic> {
    results
        .iter()
        .map(|result| lint_result_to_diagnostic(result, content))
        .collect()
}

/// Fix attached to a diagnostic published by this server, if any
pub fn fix_descriptor(diagnostic: &Diagnostic) -> Option<FixDescriptor> {
    if diagnostic.source.as_deref() != Some(SOURCE) {
        return None;
    }
    let data = diagnostic.data.clone()?;
    serde_json::from_value::<DiagnosticData>(data)
        .ok()
        .map(|data| data.fix)
}

/// Calculate the LSP Range for a result
fn calculate_range(result: &LintResult, content: &str) -> Range {
    let line = result.line_number.saturating_sub(1);
    match (result.error_range, line_at(content, line)) {
        (Some((start_col, length)), Some(text)) => {
            let start = start_col.saturating_sub(1);
            Range {
                start: Position::new(line as u32, utf16_column(text, start)),
                end: Position::new(line as u32, utf16_column(text, start.saturating_add(length))),
            }
        }
        (Some((start_col, length)), None) => to_range(result.line_number, start_col, length),
        (None, _) => {
            // Zero-width marker at the start of the line
            let start = Position::new(line as u32, 0);
            Range { start, end: start }
        }
    }
}

/// Format the diagnostic message
fn format_message(result: &LintResult) -> String {
    let mut message = format!(
        "{}: {}",
        result.rule_names.join("/"),
        result.rule_description
    );

    if let Some(detail) = &result.error_detail {
        message.push_str(&format!(" [{}]", detail));
    }

    message
}

/// Diagnostics currently shown for each document
#[derive(Debug, Default)]
pub struct DiagnosticCollection {
    entries: DashMap<Url, Vec<Diagnostic>>,
}

impl DiagnosticCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every diagnostic held for `uri`
    pub fn clear(&self, uri: &Url) {
        self.entries.remove(uri);
    }

    /// Replace the diagnostics held for `uri`
    pub fn set(&self, uri: Url, diagnostics: Vec<Diagnostic>) {
        self.entries.insert(uri, diagnostics);
    }

    /// Diagnostics held for `uri` (empty if none)
    pub fn get(&self, uri: &Url) -> Vec<Diagnostic> {
        self.entries
            .get(uri)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_result(line: usize, error_range: Option<(usize, usize)>) -> LintResult {
        LintResult {
            line_number: line,
            rule_names: vec!["MD009".to_string(), "no-trailing-spaces".to_string()],
            rule_description: "Trailing spaces".to_string(),
            error_detail: Some("Expected: 0; Actual: 3".to_string()),
            error_range,
            fix: None,
        }
    }

    #[test]
    fn test_diagnostic_with_error_range() {
        let result = create_test_result(10, Some((5, 3)));
        let diagnostic = lint_result_to_diagnostic(&result, "");

        assert_eq!(diagnostic.range.start, Position::new(9, 4));
        assert_eq!(diagnostic.range.end, Position::new(9, 7));
        assert_eq!(diagnostic.severity, Some(DiagnosticSeverity::WARNING));
        assert_eq!(diagnostic.source, Some("mkdlint".to_string()));
    }

    #[test]
    fn test_error_range_follows_line_text() {
        let content = "# Title\n\nsome text   \n";
        let result = create_test_result(3, Some((10, 3)));
        let diagnostic = lint_result_to_diagnostic(&result, content);

        assert_eq!(diagnostic.range.start, Position::new(2, 9));
        assert_eq!(diagnostic.range.end, Position::new(2, 12));
    }

    #[test]
    fn test_error_range_counts_utf16() {
        // mkdlint reports byte columns: "héllo" is 6 bytes but 5 UTF-16 units
        let content = "héllo   \n😀 x  \n";
        let diagnostic = lint_result_to_diagnostic(&create_test_result(1, Some((7, 3))), content);
        assert_eq!(diagnostic.range.start, Position::new(0, 5));
        assert_eq!(diagnostic.range.end, Position::new(0, 8));

        let diagnostic = lint_result_to_diagnostic(&create_test_result(2, Some((7, 2))), content);
        assert_eq!(diagnostic.range.start, Position::new(1, 4));
        assert_eq!(diagnostic.range.end, Position::new(1, 6));
    }

    #[test]
    fn test_diagnostic_without_error_range() {
        let result = create_test_result(10, None);
        let diagnostic = lint_result_to_diagnostic(&result, "");

        assert_eq!(diagnostic.range.start, Position::new(9, 0));
        assert_eq!(diagnostic.range.end, Position::new(9, 0));
    }

    #[test]
    fn test_message_formatting() {
        let result = create_test_result(1, None);
        let diagnostic = lint_result_to_diagnostic(&result, "");
        assert_eq!(
            diagnostic.message,
            "MD009/no-trailing-spaces: Trailing spaces [Expected: 0; Actual: 3]"
        );
    }

    #[test]
    fn test_message_no_detail() {
        let mut result = create_test_result(1, None);
        result.error_detail = None;
        result.rule_names.truncate(1);
        assert_eq!(format_message(&result), "MD009: Trailing spaces");
    }

    #[test]
    fn test_diagnostic_code() {
        let diagnostic = lint_result_to_diagnostic(&create_test_result(1, None), "");
        assert_eq!(
            diagnostic.code,
            Some(NumberOrString::String("MD009".to_string()))
        );
    }

    #[test]
    fn test_fix_travels_in_data() {
        let mut result = create_test_result(2, Some((6, 3)));
        let fix = FixDescriptor {
            edit_column: Some(6),
            delete_count: Some(3),
            ..Default::default()
        };
        result.fix = Some(fix.clone());

        let diagnostic = lint_result_to_diagnostic(&result, "");
        assert!(diagnostic.data.is_some());
        assert_eq!(fix_descriptor(&diagnostic), Some(fix));
    }

    #[test]
    fn test_no_fix_no_data() {
        let diagnostic = lint_result_to_diagnostic(&create_test_result(1, None), "");
        assert!(diagnostic.data.is_none());
        assert_eq!(fix_descriptor(&diagnostic), None);
    }

    #[test]
    fn test_foreign_diagnostic_has_no_fix() {
        let mut result = create_test_result(1, None);
        result.fix = Some(FixDescriptor::default());
        let mut diagnostic = lint_result_to_diagnostic(&result, "");
        diagnostic.source = Some("other-linter".to_string());
        assert_eq!(fix_descriptor(&diagnostic), None);
    }

    #[test]
    fn test_collection_clear_then_set() {
        let collection = DiagnosticCollection::new();
        let uri = Url::parse("file:///tmp/test.md").unwrap();
        let other = Url::parse("file:///tmp/other.md").unwrap();

        collection.set(uri.clone(), to_diagnostics(&[create_test_result(1, None)], ""));
        collection.set(other.clone(), to_diagnostics(&[create_test_result(2, None)], ""));
        assert_eq!(collection.get(&uri).len(), 1);

        collection.clear(&uri);
        assert!(collection.get(&uri).is_empty());
        assert_eq!(collection.get(&other).len(), 1);
    }
}
