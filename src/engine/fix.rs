//! Fix application through mkdlint's batch-fix routine
//!
//! Columns are 1-based byte offsets into the line and a `delete_count` of
//! `-1` removes the whole line. A panic inside mkdlint leaves the text
//! unchanged.

use crate::types::{FixDescriptor, LintResult};
use mkdlint::LintError;
use mkdlint::types::FixInfo;
use std::panic::{self, AssertUnwindSafe};

/// Line ending used by `content` (`\r\n` if present anywhere, else `\n`)
pub fn line_ending(content: &str) -> &'static str {
    if content.contains("\r\n") { "\r\n" } else { "\n" }
}

/// Apply one fix to a single line (without its line ending)
///
/// Returns `None` when the fix deletes the whole line. `\n` in the result
/// is rewritten to `line_ending`.
pub fn apply_fix(line: &str, fix: &FixDescriptor, line_ending: &str) -> Option<String> {
    if fix.deletes_line() {
        return None;
    }

    let single = LintError {
        line_number: 1,
        fix_info: Some(FixInfo {
            line_number: Some(1),
            ..to_fix_info(fix)
        }),
        ..Default::default()
    };
    let fixed = run_batch_fix(line, std::slice::from_ref(&single));

    if line_ending == "\n" {
        Some(fixed)
    } else {
        Some(fixed.replace('\n', line_ending))
    }
}

/// Apply every fix carried by `results` to `content` in one pass
pub fn apply_fixes(content: &str, results: &[LintResult]) -> String {
    let errors: Vec<LintError> = results.iter().filter_map(to_lint_error).collect();
    if errors.is_empty() {
        return content.to_string();
    }
    run_batch_fix(content, &errors)
}

fn run_batch_fix(content: &str, errors: &[LintError]) -> String {
    match panic::catch_unwind(AssertUnwindSafe(|| mkdlint::apply_fixes(content, errors))) {
        Ok(fixed) => fixed,
        Err(_) => {
            log::error!("mkdlint panicked while applying fixes; text left unchanged");
            content.to_string()
        }
    }
}

fn to_lint_error(result: &LintResult) -> Option<LintError> {
    let fix = result.fix.as_ref()?;
    Some(LintError {
        line_number: result.line_number,
        fix_info: Some(to_fix_info(fix)),
        ..Default::default()
    })
}

fn to_fix_info(fix: &FixDescriptor) -> FixInfo {
    FixInfo {
        line_number: fix.line_number,
        edit_column: fix.edit_column,
        delete_count: fix
            .delete_count
            .map(|n| n.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32),
        insert_text: fix.insert_text.clone(),
    }
}
