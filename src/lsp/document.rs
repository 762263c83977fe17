//! Document management for LSP server

use dashmap::DashMap;
use tower_lsp::lsp_types::Url;

/// Language id of the documents that get linted
pub const MARKDOWN_LANGUAGE_ID: &str = "markdown";

/// Represents a single document in the LSP server
#[derive(Debug, Clone)]
pub struct Document {
    /// Language id reported by the client on open
    pub language_id: String,
    /// Document content
    pub content: String,
    /// Document version (incremented on each change)
    pub version: i32,
}

impl Document {
    /// Create a new document
    pub fn new(language_id: String, content: String, version: i32) -> Self {
        Self {
            language_id,
            content,
            version,
        }
    }

    /// Update the document content and version
    pub fn update(&mut self, content: String, version: i32) {
        self.content = content;
        self.version = version;
    }

    /// Whether the document should be linted
    pub fn is_markdown(&self) -> bool {
        self.language_id == MARKDOWN_LANGUAGE_ID
    }
}

/// Manages all open documents in the LSP server
pub struct DocumentManager {
    documents: DashMap<Url, Document>,
}

impl DocumentManager {
    /// Create a new document manager
    pub fn new() -> Self {
        Self {
            documents: DashMap::new(),
        }
    }

    /// Insert or replace a document
    pub fn insert(&self, uri: Url, language_id: String, content: String, version: i32) {
        let doc = Document::new(language_id, content, version);
        self.documents.insert(uri, doc);
    }

    /// Owned copy of a document
    ///
    /// Handlers work on copies so no map guard is held across an `.await`.
    pub fn snapshot(&self, uri: &Url) -> Option<Document> {
        self.documents.get(uri).map(|entry| entry.value().clone())
    }

    /// Update a document's content
    pub fn update(&self, uri: &Url, content: String, version: i32) {
        if let Some(mut entry) = self.documents.get_mut(uri) {
            entry.update(content, version);
        }
    }

    /// Remove a document
    pub fn remove(&self, uri: &Url) -> Option<Document> {
        self.documents.remove(uri).map(|(_, doc)| doc)
    }
}

impl Default for DocumentManager {
    fn default() -> Self {
        Self::new()
    }
}
