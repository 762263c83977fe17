//! Configuration discovery and merging
//!
//! The effective config is built once, from four layers applied in order:
//!
//! 1. built-in defaults
//! 2. the global user config
//! 3. the project config found by walking up from the workspace root
//! 4. the editor settings override
//!
//! Later layers win. Objects are merged key by key, recursively; any other
//! value is replaced outright.

mod defaults;
mod settings;

pub use defaults::builtin_defaults;
pub use settings::{EditorSettings, MarkdownlintSettings};

use crate::types::{Error, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Rule identifier to rule settings
pub type ConfigMap = serde_json::Map<String, Value>;

/// Project config file names, in priority order
pub const CONFIG_FILE_NAMES: [&str; 3] = [
    ".markdownlint.json",
    ".markdownlint.yaml",
    ".markdownlint.yml",
];

/// Directory under the platform config dir that holds the global config
pub const GLOBAL_CONFIG_DIR: &str = "mkdlint-lsp";

/// The merged rule configuration used for every lint call
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EffectiveConfig {
    rules: ConfigMap,
}

impl EffectiveConfig {
    /// Wrap an already merged rule map
    pub fn new(rules: ConfigMap) -> Self {
        Self { rules }
    }

    /// Config made of the built-in defaults only
    pub fn builtin() -> Self {
        Self::new(builtin_defaults())
    }

    /// All rule settings
    pub fn rules(&self) -> &ConfigMap {
        &self.rules
    }

    /// Settings for a single rule (or for `default`)
    pub fn get(&self, rule: &str) -> Option<&Value> {
        self.rules.get(rule)
    }

    /// The config as a JSON object
    pub fn to_value(&self) -> Value {
        Value::Object(self.rules.clone())
    }
}

/// Overlay `overlay` onto `base`; values from `overlay` win
pub fn deep_merge(base: &mut ConfigMap, overlay: ConfigMap) {
    for (key, value) in overlay {
        match base.get_mut(&key) {
            Some(existing) => merge_value(existing, value),
            None => {
                base.insert(key, value);
            }
        }
    }
}

fn merge_value(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => deep_merge(base, overlay),
        (slot, overlay) => *slot = overlay,
    }
}

/// Read and parse one config file, picking the parser by extension
pub fn read_config_file(path: impl AsRef<Path>) -> Result<ConfigMap> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let parse_error = |message: String| Error::Parse {
        path: path.to_path_buf(),
        message,
    };

    let value: Value = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => {
            serde_yaml_ng::from_str(&content).map_err(|e| parse_error(e.to_string()))?
        }
        _ => serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))?,
    };

    match value {
        Value::Object(rules) => Ok(rules),
        Value::Null => Ok(ConfigMap::new()),
        other => Err(parse_error(format!(
            "expected a mapping of rule names to settings, found {}",
            value_kind(&other)
        ))),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

/// First candidate config file present in `dir`, in priority order
pub fn find_config_file(dir: impl AsRef<Path>) -> Option<PathBuf> {
    let dir = dir.as_ref();
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Walk up from `root` looking for a project config file
///
/// The nearest directory holding any candidate wins. Only the first
/// candidate in priority order is parsed there; the others are ignored.
pub fn discover_project_config(root: impl AsRef<Path>) -> Result<Option<(PathBuf, ConfigMap)>> {
    let mut dir = root.as_ref().to_path_buf();
    loop {
        if let Some(path) = find_config_file(&dir) {
            let rules = read_config_file(&path)?;
            return Ok(Some((path, rules)));
        }
        if !dir.pop() {
            return Ok(None);
        }
    }
}

/// Platform location of the global config directory
pub fn global_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(GLOBAL_CONFIG_DIR))
}

/// Outcome of a config load: the merged config plus everything that went
/// wrong on the way
#[derive(Debug, Default)]
pub struct ConfigLoad {
    /// The effective config
    pub config: EffectiveConfig,
    /// Config files that were merged, in merge order
    pub sources: Vec<PathBuf>,
    /// Failures that were skipped over
    pub failures: Vec<Error>,
}

/// Builds the effective config from its layers
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    global_dir: Option<PathBuf>,
    workspace_root: Option<PathBuf>,
    settings: Option<Value>,
}

impl ConfigLoader {
    /// Loader with no sources beyond the built-in defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader for a workspace, using the platform global config directory
    pub fn for_workspace(workspace_root: Option<PathBuf>, settings: Option<Value>) -> Self {
        Self {
            global_dir: global_config_dir(),
            workspace_root,
            settings,
        }
    }

    /// Set the directory holding the global config
    pub fn with_global_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.global_dir = Some(dir.into());
        self
    }

    /// Set the workspace root the project config search starts from
    pub fn with_workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace_root = Some(root.into());
        self
    }

    /// Set the raw editor settings
    pub fn with_settings(mut self, settings: Value) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Merge every layer; never fails, problems end up in `failures`
    pub fn load(&self) -> ConfigLoad {
        let mut rules = builtin_defaults();
        let mut sources = Vec::new();
        let mut failures = Vec::new();

        if let Some(path) = self.global_dir.as_deref().and_then(|dir| find_config_file(dir)) {
            match read_config_file(&path) {
                Ok(global) => {
                    deep_merge(&mut rules, global);
                    sources.push(path);
                }
                Err(e) => failures.push(e),
            }
        }

        match self.workspace_root.as_deref() {
            Some(root) => match discover_project_config(root) {
                Ok(Some((path, project))) => {
                    deep_merge(&mut rules, project);
                    sources.push(path);
                }
                Ok(None) => {}
                Err(e) => failures.push(e),
            },
            None => failures.push(Error::MissingRoot),
        }

        if let Some(settings) = self.settings.clone() {
            match EditorSettings::from_value(settings) {
                Ok(settings) => {
                    if let Some(overrides) = settings.into_config_override() {
                        deep_merge(&mut rules, overrides);
                    }
                }
                Err(e) => failures.push(e),
            }
        }

        ConfigLoad {
            config: EffectiveConfig::new(rules),
            sources,
            failures,
        }
    }
}
