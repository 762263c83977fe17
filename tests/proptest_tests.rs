//! Property-based tests for mkdlint-lsp using proptest
//!
//! Tests invariants that must hold for *all* valid inputs, not just hand-picked examples.

use mkdlint_lsp::config::{ConfigMap, deep_merge};
use mkdlint_lsp::engine::fix::apply_fix;
use mkdlint_lsp::engine::fix_until_stable;
use mkdlint_lsp::lsp::diagnostics::lint_result_to_diagnostic;
use mkdlint_lsp::{EffectiveConfig, FixDescriptor, LintResult, Result, RuleEngine};
use proptest::prelude::*;
use serde_json::{Value, json};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// A markdown-ish line, sometimes with trailing spaces
fn md_line() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 ,.!?]{0,60}".prop_map(|s| s),
        (1..=6u8, "[a-zA-Z0-9 ]{0,30}")
            .prop_map(|(level, text)| format!("{} {}", "#".repeat(level as usize), text)),
        "[a-zA-Z0-9 ]{1,30}".prop_map(|text| format!("- {}", text)),
        Just(String::new()),
    ]
}

fn md_document() -> impl Strategy<Value = String> {
    (prop::collection::vec(md_line(), 0..20), prop::bool::ANY).prop_map(|(lines, crlf)| {
        let line_ending = if crlf { "\r\n" } else { "\n" };
        let mut doc = lines.join(line_ending);
        doc.push_str(line_ending);
        doc
    })
}

/// Flat rule map with scalar settings
fn rule_map() -> impl Strategy<Value = ConfigMap> {
    prop::collection::btree_map("MD0[0-5][0-9]", prop::bool::ANY, 0..12).prop_map(|rules| {
        rules
            .into_iter()
            .map(|(name, enabled)| (name, Value::Bool(enabled)))
            .collect()
    })
}

/// Trailing-space violations, shaped the way MD009 reports them
fn trailing_space_results(content: &str) -> Vec<LintResult> {
    content
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .enumerate()
        .filter_map(|(idx, line)| {
            let kept = line.trim_end_matches(' ').chars().count();
            let trailing = line.chars().count() - kept;
            (trailing > 0).then(|| LintResult {
                line_number: idx + 1,
                rule_names: vec!["MD009".to_string()],
                rule_description: "Trailing spaces".to_string(),
                error_range: Some((kept + 1, trailing)),
                fix: Some(FixDescriptor {
                    edit_column: Some(kept + 1),
                    delete_count: Some(trailing as i64),
                    ..Default::default()
                }),
                ..Default::default()
            })
        })
        .collect()
}

struct TrailingSpaces;

impl RuleEngine for TrailingSpaces {
    fn lint(&self, _: &str, text: &str, _: &EffectiveConfig) -> Result<Vec<LintResult>> {
        Ok(trailing_space_results(text))
    }
}

fn fix_all(doc: &str) -> String {
    fix_until_stable(&TrailingSpaces, "doc.md", doc, &EffectiveConfig::builtin()).unwrap()
}

// ---------------------------------------------------------------------------
// Fixes
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn fix_all_is_idempotent(doc in md_document()) {
        let once = fix_all(&doc);
        prop_assert!(trailing_space_results(&once).is_empty());
        prop_assert_eq!(fix_all(&once), once);
    }

    #[test]
    fn fix_all_preserves_line_count(doc in md_document()) {
        let fixed = fix_all(&doc);
        prop_assert_eq!(doc.lines().count(), fixed.lines().count());
    }

    #[test]
    fn fix_all_without_violations_is_identity(doc in md_document()) {
        let mut clean = doc.lines().map(str::trim_end).collect::<Vec<_>>().join("\n");
        clean.push('\n');
        prop_assert_eq!(fix_all(&clean), clean);
    }

    #[test]
    fn apply_fix_never_panics(
        line in "[a-zA-Zé ]{0,40}",
        column in prop::option::of(0usize..80),
        count in prop::option::of(-1i64..80),
        insert in prop::option::of("[a-z ]{0,5}"),
    ) {
        let fix = FixDescriptor {
            line_number: None,
            edit_column: column,
            delete_count: count,
            insert_text: insert,
        };
        let _ = apply_fix(&line, &fix, "\n");
    }
}

// ---------------------------------------------------------------------------
// Config merging
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn overlay_always_wins(base in rule_map(), overlay in rule_map()) {
        let mut merged = base.clone();
        deep_merge(&mut merged, overlay.clone());

        for (name, value) in &overlay {
            prop_assert_eq!(merged.get(name), Some(value));
        }
        for (name, value) in &base {
            if !overlay.contains_key(name) {
                prop_assert_eq!(merged.get(name), Some(value));
            }
        }
        prop_assert!(merged.len() <= base.len() + overlay.len());
    }

    #[test]
    fn nested_settings_merge_per_key(a in 0u64..200, b in 0u64..200) {
        let mut base = ConfigMap::new();
        base.insert("MD013".to_string(), json!({"line_length": a, "tables": false}));
        let mut overlay = ConfigMap::new();
        overlay.insert("MD013".to_string(), json!({"line_length": b}));

        deep_merge(&mut base, overlay);
        prop_assert_eq!(
            base.get("MD013"),
            Some(&json!({"line_length": b, "tables": false}))
        );
    }
}

// ---------------------------------------------------------------------------
// Diagnostic translation
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn diagnostic_range_is_well_formed(
        line in 0usize..500,
        range in prop::option::of((0usize..200, 0usize..200)),
        text in "[a-zé😀 ]{0,30}",
    ) {
        let content = format!("{}{}\n", "\n".repeat(line.saturating_sub(1)), text);
        let result = LintResult {
            line_number: line,
            rule_names: vec!["MD001".to_string()],
            rule_description: "Heading levels".to_string(),
            error_range: range,
            ..Default::default()
        };
        let diagnostic = lint_result_to_diagnostic(&result, &content);

        prop_assert_eq!(diagnostic.range.start.line, diagnostic.range.end.line);
        prop_assert!(diagnostic.range.start.character <= diagnostic.range.end.character);
        prop_assert_eq!(diagnostic.range.start.line as usize, line.saturating_sub(1));
    }
}
