//! Turn fix descriptors into LSP code actions and edits

use crate::engine::{RuleEngine, fix::line_ending};
use crate::types::FixDescriptor;
use std::collections::HashMap;

use super::diagnostics::fix_descriptor;
use super::utils::{full_range, line_at, line_range};

// Import all LSP types from tower-lsp which re-exports lsp-types
use tower_lsp::lsp_types::{
    CodeAction, CodeActionKind, CodeActionOrCommand, Diagnostic, TextEdit, Url, WorkspaceEdit,
};

/// Command that fixes every violation in a document
pub const FIX_ALL_COMMAND: &str = "mkdlint.fixAll";

/// Title of the whole-document fix action
pub const FIX_ALL_TITLE: &str = "Fix all supported mkdlint violations";

/// One quick fix per diagnostic in `context` that carries a fix
///
/// Every action references the whole `context`, the diagnostics the editor
/// sent with the request.
pub fn quick_fix_actions(
    uri: &Url,
    content: &str,
    context: &[Diagnostic],
    engine: &dyn RuleEngine,
) -> Vec<CodeActionOrCommand> {
    let line_ending = line_ending(content);

    context
        .iter()
        .filter_map(|diagnostic| {
            let fix = fix_descriptor(diagnostic)?;
            let text_edit = calculate_text_edit(diagnostic, &fix, content, line_ending, engine)?;

            let action = CodeAction {
                title: rule_title(&diagnostic.message).to_string(),
                kind: Some(CodeActionKind::QUICKFIX),
                diagnostics: Some(context.to_vec()),
                edit: Some(workspace_edit(uri, vec![text_edit])),
                ..Default::default()
            };
            Some(CodeActionOrCommand::CodeAction(action))
        })
        .collect()
}

/// Calculate the TextEdit for one diagnostic's fix
///
/// The fix is applied to the current text of its target line. A fix that
/// leaves no text behind deletes the diagnostic's range instead.
fn calculate_text_edit(
    diagnostic: &Diagnostic,
    fix: &FixDescriptor,
    content: &str,
    line_ending: &str,
    engine: &dyn RuleEngine,
) -> Option<TextEdit> {
    let target_line = fix
        .line_number
        .map(|line| line.saturating_sub(1) as u32)
        .unwrap_or(diagnostic.range.start.line);
    let line = line_at(content, target_line as usize)?;

    let text_edit = match engine.apply_fix(line, fix, line_ending) {
        Some(new_text) => TextEdit {
            range: line_range(target_line, line),
            new_text,
        },
        None => TextEdit {
            range: diagnostic.range,
            new_text: String::new(),
        },
    };
    Some(text_edit)
}

/// Rule name portion of a diagnostic message (`"MD009/no-trailing-spaces"`)
fn rule_title(message: &str) -> &str {
    message
        .split_once(": ")
        .map_or(message, |(rule_names, _)| rule_names)
}

/// Single edit replacing the whole document with its fixed text
///
/// `None` when fixing changes nothing.
pub fn fix_all_edit(content: &str, fixed: String) -> Option<TextEdit> {
    if fixed == content {
        return None;
    }

    Some(TextEdit {
        range: full_range(content),
        new_text: fixed,
    })
}

/// `source.fixAll` action wrapping a whole-document edit
pub fn fix_all_action(uri: &Url, text_edit: TextEdit) -> CodeActionOrCommand {
    CodeActionOrCommand::CodeAction(CodeAction {
        title: FIX_ALL_TITLE.to_string(),
        kind: Some(CodeActionKind::SOURCE_FIX_ALL),
        edit: Some(workspace_edit(uri, vec![text_edit])),
        ..Default::default()
    })
}

/// Workspace edit touching a single document
pub fn workspace_edit(uri: &Url, edits: Vec<TextEdit>) -> WorkspaceEdit {
    let mut changes = HashMap::new();
    changes.insert(uri.clone(), edits);

    WorkspaceEdit {
        changes: Some(changes),
        ..Default::default()
    }
}
