//! Lint engine seam
//!
//! The server never inspects markdown itself. Everything it knows about a
//! document comes from a [`RuleEngine`]: the violations, and the text a fix
//! turns a line (or the whole document) into.

pub mod fix;
mod mkdlint_adapter;

pub use mkdlint_adapter::MkdlintEngine;

use crate::config::EffectiveConfig;
use crate::types::{Error, FixDescriptor, LintResult, Result};
use std::panic::{self, AssertUnwindSafe};

/// Call contract of the external rule engine
pub trait RuleEngine: Send + Sync {
    /// Lint `text`, identified by `name`, under `config`
    ///
    /// Results are ordered by line.
    fn lint(&self, name: &str, text: &str, config: &EffectiveConfig) -> Result<Vec<LintResult>>;

    /// Text of `line` after applying `fix`, or `None` when the fix deletes
    /// the line
    ///
    /// Both fix routines default to mkdlint's batch-fix routine.
    fn apply_fix(&self, line: &str, fix: &FixDescriptor, line_ending: &str) -> Option<String> {
        fix::apply_fix(line, fix, line_ending)
    }

    /// Text of the whole document after applying every fix in `results`
    fn apply_fixes(&self, text: &str, results: &[LintResult]) -> String {
        fix::apply_fixes(text, results)
    }
}

/// Upper bound on lint-and-fix passes in [`fix_until_stable`]
pub const MAX_FIX_PASSES: usize = 10;

/// Lint and batch-fix `text` repeatedly until a pass changes nothing
///
/// Each pass is one batch fix over the whole text. Stops after
/// [`MAX_FIX_PASSES`] passes.
pub fn fix_until_stable(
    engine: &dyn RuleEngine,
    name: &str,
    text: &str,
    config: &EffectiveConfig,
) -> Result<String> {
    let mut current = text.to_string();
    for _ in 0..MAX_FIX_PASSES {
        let results = invoke(engine, name, &current, config)?;
        let next = engine.apply_fixes(&current, &results);
        if next == current {
            break;
        }
        current = next;
    }
    Ok(current)
}

/// Run `engine` once, turning both errors and panics into [`Error::Engine`]
///
/// Never unwinds into the caller. There is no caching between calls.
pub fn invoke(
    engine: &dyn RuleEngine,
    name: &str,
    text: &str,
    config: &EffectiveConfig,
) -> Result<Vec<LintResult>> {
    match panic::catch_unwind(AssertUnwindSafe(|| engine.lint(name, text, config))) {
        Ok(Ok(results)) => Ok(results),
        Ok(Err(Error::Engine(message))) => Err(Error::Engine(message)),
        Ok(Err(other)) => Err(Error::Engine(other.to_string())),
        Err(payload) => Err(Error::Engine(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("engine panicked: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("engine panicked: {}", message)
    } else {
        "engine panicked".to_string()
    }
}
