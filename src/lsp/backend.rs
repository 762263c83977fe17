//! LSP backend implementation
//!
//! This module provides the main Language Server implementation.

use super::code_actions::{self, FIX_ALL_COMMAND};
use super::diagnostics::{self, DiagnosticCollection};
use super::document::DocumentManager;
use super::output::OutputChannel;
use super::utils::uri_to_path;
use crate::config::{ConfigLoader, EffectiveConfig};
use crate::engine::{self, MkdlintEngine, RuleEngine};
use crate::types::LintResult;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

/// The mkdlint Language Server
#[derive(Clone)]
pub struct MkdlintLanguageServer {
    client: Client,
    output: OutputChannel,
    engine: Arc<dyn RuleEngine>,
    document_manager: Arc<DocumentManager>,
    diagnostics: Arc<DiagnosticCollection>,
    config: Arc<RwLock<Arc<EffectiveConfig>>>,
    pending_loader: Arc<Mutex<Option<ConfigLoader>>>,
}

impl MkdlintLanguageServer {
    /// Create a new language server instance backed by mkdlint
    pub fn new(client: Client) -> Self {
        Self::with_engine(client, Arc::new(MkdlintEngine::new()))
    }

    /// Create a language server that lints with `engine`
    pub fn with_engine(client: Client, engine: Arc<dyn RuleEngine>) -> Self {
        Self {
            output: OutputChannel::new(client.clone()),
            client,
            engine,
            document_manager: Arc::new(DocumentManager::new()),
            diagnostics: Arc::new(DiagnosticCollection::new()),
            config: Arc::new(RwLock::new(Arc::new(EffectiveConfig::builtin()))),
            pending_loader: Arc::new(Mutex::new(None)),
        }
    }

    /// Diagnostics currently held for `uri`
    pub fn diagnostics(&self, uri: &Url) -> Vec<Diagnostic> {
        self.diagnostics.get(uri)
    }

    /// The effective config in use
    pub async fn effective_config(&self) -> Arc<EffectiveConfig> {
        Arc::clone(&*self.config.read().await)
    }

    /// Build the effective config once, logging every skipped failure
    async fn load_config(&self) {
        let loader = self.pending_loader.lock().await.take().unwrap_or_default();
        let load = loader.load();

        for failure in &load.failures {
            self.output.error(failure.to_string()).await;
        }
        for source in &load.sources {
            self.output
                .info(format!("Loaded config from {}", source.display()))
                .await;
        }

        *self.config.write().await = Arc::new(load.config);
    }

    /// Run the engine over `content`; failures are logged and yield nothing
    async fn lint_results(&self, uri: &Url, content: &str) -> Vec<LintResult> {
        let config = self.effective_config().await;
        match engine::invoke(self.engine.as_ref(), uri.as_str(), content, &config) {
            Ok(results) => results,
            Err(e) => {
                self.output
                    .error(format!("Linting {} failed: {}", uri, e))
                    .await;
                Vec::new()
            }
        }
    }

    /// Lint a document and publish diagnostics
    ///
    /// Diagnostics for the document are always cleared first; only markdown
    /// documents get new ones.
    async fn lint_and_publish(&self, uri: Url) {
        let doc = match self.document_manager.snapshot(&uri) {
            Some(doc) => doc,
            None => return,
        };

        self.diagnostics.clear(&uri);

        if doc.is_markdown() {
            let results = self.lint_results(&uri, &doc.content).await;
            self.diagnostics
                .set(uri.clone(), diagnostics::to_diagnostics(&results, &doc.content));
        }

        self.client
            .publish_diagnostics(uri.clone(), self.diagnostics.get(&uri), Some(doc.version))
            .await;
    }

    /// Whole-document fix edit for `uri`, if fixing changes anything
    ///
    /// Lint-and-fix passes repeat until the text settles, so running the
    /// fix again on the result yields no edit.
    pub async fn fix_all_edit(&self, uri: &Url) -> Option<TextEdit> {
        let doc = self.document_manager.snapshot(uri)?;
        if !doc.is_markdown() {
            return None;
        }

        let config = self.effective_config().await;
        match engine::fix_until_stable(self.engine.as_ref(), uri.as_str(), &doc.content, &config) {
            Ok(fixed) => code_actions::fix_all_edit(&doc.content, fixed),
            Err(e) => {
                self.output
                    .error(format!("Fixing {} failed: {}", uri, e))
                    .await;
                None
            }
        }
    }

    /// Apply every available fix to `uri` through `workspace/applyEdit`
    async fn fix_all(&self, uri: Url) {
        let Some(text_edit) = self.fix_all_edit(&uri).await else {
            return;
        };

        let edit = code_actions::workspace_edit(&uri, vec![text_edit]);
        match self.client.apply_edit(edit).await {
            Ok(response) if response.applied => {}
            Ok(response) => {
                self.output
                    .error(format!(
                        "Editor rejected fixes for {}: {}",
                        uri,
                        response.failure_reason.unwrap_or_default()
                    ))
                    .await;
            }
            Err(e) => {
                self.output
                    .error(format!("Failed to apply fixes for {}: {}", uri, e))
                    .await;
            }
        }
    }
}

/// Workspace root from the initialize request
fn workspace_root(params: &InitializeParams) -> Option<PathBuf> {
    if let Some(folder) = params.workspace_folders.as_ref().and_then(|f| f.first())
        && let Some(path) = uri_to_path(&folder.uri)
    {
        return Some(path);
    }
    #[allow(deprecated)]
    let root_uri = params.root_uri.as_ref();
    root_uri.and_then(uri_to_path)
}

#[tower_lsp::async_trait]
impl LanguageServer for MkdlintLanguageServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let loader =
            ConfigLoader::for_workspace(workspace_root(&params), params.initialization_options);
        *self.pending_loader.lock().await = Some(loader);

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Options(
                    TextDocumentSyncOptions {
                        open_close: Some(true),
                        change: Some(TextDocumentSyncKind::FULL),
                        save: Some(TextDocumentSyncSaveOptions::Supported(true)),
                        ..Default::default()
                    },
                )),
                code_action_provider: Some(CodeActionProviderCapability::Options(
                    CodeActionOptions {
                        code_action_kinds: Some(vec![
                            CodeActionKind::QUICKFIX,
                            CodeActionKind::SOURCE_FIX_ALL,
                        ]),
                        resolve_provider: Some(false),
                        work_done_progress_options: Default::default(),
                    },
                )),
                execute_command_provider: Some(ExecuteCommandOptions {
                    commands: vec![FIX_ALL_COMMAND.to_string()],
                    work_done_progress_options: Default::default(),
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "mkdlint-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.load_config().await;
        self.output.info("mkdlint LSP server initialized").await;
    }

    async fn shutdown(&self) -> Result<()> {
        self.output.info("mkdlint LSP server shutting down").await;
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        self.document_manager
            .insert(doc.uri.clone(), doc.language_id, doc.text, doc.version);

        self.lint_and_publish(doc.uri).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        // Full sync: the last change holds the whole text
        if let Some(change) = params.content_changes.into_iter().last() {
            self.document_manager.update(&uri, change.text, version);
            self.lint_and_publish(uri).await;
        }
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        self.lint_and_publish(params.text_document.uri).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;

        self.document_manager.remove(&uri);
        self.diagnostics.clear(&uri);
        self.client.publish_diagnostics(uri, vec![], None).await;
    }

    async fn code_action(&self, params: CodeActionParams) -> Result<Option<CodeActionResponse>> {
        let uri = params.text_document.uri;
        let content = match self.document_manager.snapshot(&uri) {
            Some(doc) => doc.content,
            None => return Ok(None),
        };

        let (wants_fix_all, wants_quickfix) = match &params.context.only {
            Some(only) => (
                only.contains(&CodeActionKind::SOURCE_FIX_ALL)
                    || only.contains(&CodeActionKind::SOURCE),
                only.contains(&CodeActionKind::QUICKFIX),
            ),
            None => (false, true),
        };

        let mut actions = Vec::new();
        if wants_quickfix {
            actions.extend(code_actions::quick_fix_actions(
                &uri,
                &content,
                &params.context.diagnostics,
                self.engine.as_ref(),
            ));
        }
        if wants_fix_all && let Some(text_edit) = self.fix_all_edit(&uri).await {
            actions.push(code_actions::fix_all_action(&uri, text_edit));
        }

        if actions.is_empty() {
            Ok(None)
        } else {
            Ok(Some(actions))
        }
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        if params.command != FIX_ALL_COMMAND {
            self.output
                .error(format!("Unknown command: {}", params.command))
                .await;
            return Ok(None);
        }

        let uri = params
            .arguments
            .into_iter()
            .next()
            .and_then(|arg| serde_json::from_value::<Url>(arg).ok());
        match uri {
            Some(uri) => self.fix_all(uri).await,
            None => {
                self.output
                    .error(format!("{} expects a document URI argument", FIX_ALL_COMMAND))
                    .await;
            }
        }

        Ok(None)
    }
}
