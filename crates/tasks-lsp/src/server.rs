//! LSP server implementation

use std::collections::HashMap;
use std::sync::Arc;

use jsonc_tree::{ParseError, parse_tree};
use tasks_completion::{CompletionProvider, position_at};
use tokio::sync::RwLock;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};
use tracing::{debug, warn};

use crate::config::{DocumentFilter, TasksLspConfig, load_config};

/// Document state tracked by the server
struct DocumentState {
    /// Document content
    content: String,
    /// Document version
    #[allow(dead_code)]
    version: i32,
}

/// The tasks.json language server
pub struct TasksLanguageServer {
    /// LSP client for sending notifications
    client: Client,
    /// Open documents that pass the filter
    documents: Arc<RwLock<HashMap<Url, DocumentState>>>,
    filter: DocumentFilter,
    provider: CompletionProvider,
}

impl TasksLanguageServer {
    /// A server with the default configuration.
    pub fn new(client: Client) -> Self {
        Self::with_config(client, &TasksLspConfig::default())
    }

    pub fn with_config(client: Client, config: &TasksLspConfig) -> Self {
        Self {
            client,
            documents: Arc::new(RwLock::new(HashMap::new())),
            filter: DocumentFilter::new(config),
            provider: CompletionProvider::default(),
        }
    }

    /// Parse, publish diagnostics and store a document.
    async fn update_document(&self, uri: Url, content: String, version: i32) {
        if !self.filter.matches(&uri) {
            debug!(%uri, "Ignoring document outside the file patterns");
            return;
        }

        let diagnostics = compute_diagnostics(&content, parse_tree(&content).errors());
        self.client
            .publish_diagnostics(uri.clone(), diagnostics, Some(version))
            .await;

        let mut docs = self.documents.write().await;
        docs.insert(uri, DocumentState { content, version });
    }
}

/// Turn parse errors into diagnostics, with ranges in the client's
/// UTF-16 positions.
fn compute_diagnostics(content: &str, errors: &[ParseError]) -> Vec<Diagnostic> {
    errors
        .iter()
        .map(|error| Diagnostic {
            range: to_range(content, error),
            severity: Some(DiagnosticSeverity::ERROR),
            source: Some("tasks-lsp".to_string()),
            message: error.kind.to_string(),
            ..Default::default()
        })
        .collect()
}

fn to_range(content: &str, error: &ParseError) -> Range {
    let start = position_at(content, error.span.start as usize);
    let end = position_at(content, error.span.end as usize);
    Range {
        start: Position::new(start.line, start.character),
        end: Position::new(end.line, end.character),
    }
}

fn to_lsp_item(item: &tasks_completion::CompletionItem) -> CompletionItem {
    CompletionItem {
        label: item.label.to_string(),
        kind: Some(CompletionItemKind::SNIPPET),
        documentation: Some(Documentation::String(item.documentation.to_string())),
        insert_text: Some(item.insert_text.to_string()),
        insert_text_format: Some(InsertTextFormat::PLAIN_TEXT),
        ..Default::default()
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for TasksLanguageServer {
    async fn initialize(&self, _params: InitializeParams) -> Result<InitializeResult> {
        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                // Full document sync - we get the whole document on each change
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                completion_provider: Some(CompletionOptions {
                    resolve_provider: Some(false),
                    ..Default::default()
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "tasks-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "Camel tasks language server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        self.update_document(doc.uri, doc.text, doc.version).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        // With FULL sync, the last change carries the entire document
        if let Some(change) = params.content_changes.into_iter().last() {
            self.update_document(uri, change.text, version).await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;

        let removed = {
            let mut docs = self.documents.write().await;
            docs.remove(&uri).is_some()
        };

        if removed {
            self.client.publish_diagnostics(uri, vec![], None).await;
        }
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;

        if !self.filter.matches(&uri) {
            return Ok(None);
        }

        let docs = self.documents.read().await;
        let Some(doc) = docs.get(&uri) else {
            warn!(%uri, "Completion requested for a document that is not open");
            return Ok(None);
        };

        let items = self.provider.provide_completion_items(
            &doc.content,
            tasks_completion::Position::new(position.line, position.character),
        );
        debug!(
            %uri,
            line = position.line,
            character = position.character,
            items = items.len(),
            "Completion"
        );

        Ok(Some(CompletionResponse::Array(
            items.iter().map(to_lsp_item).collect(),
        )))
    }
}

/// Run the LSP server on stdin/stdout
pub async fn run() -> eyre::Result<()> {
    // Set up logging; stdout is the LSP channel
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match load_config() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            warn!(error = %e, "Using default config");
            TasksLspConfig::default()
        }
    };

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) =
        LspService::new(move |client| TasksLanguageServer::with_config(client, &config));
    Server::new(stdin, stdout, socket).serve(service).await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    #[test]
    fn test_diagnostics_for_unclosed_array() {
        let content = "{\n  \"tasks\": [\n";
        let parsed = parse_tree(content);
        let diagnostics = compute_diagnostics(content, parsed.errors());
        assert!(!diagnostics.is_empty());
        assert!(
            diagnostics
                .iter()
                .any(|d| d.message == "closing bracket expected")
        );
        assert!(
            diagnostics
                .iter()
                .all(|d| d.severity == Some(DiagnosticSeverity::ERROR))
        );
    }

    #[test]
    fn test_no_diagnostics_for_valid_document() {
        let content = "{\n  // comment\n  \"tasks\": []\n}";
        assert!(compute_diagnostics(content, parse_tree(content).errors()).is_empty());
    }

    #[test]
    fn test_diagnostic_range_uses_utf16() {
        // `😀` is two UTF-16 units; the stray `x` follows it
        let content = "{\"😀\": 1 x}";
        let parsed = parse_tree(content);
        let diagnostics = compute_diagnostics(content, parsed.errors());
        let symbol = diagnostics
            .iter()
            .find(|d| d.message == "invalid symbol")
            .expect("invalid symbol diagnostic");
        assert_eq!(symbol.range.start, Position::new(0, 9));
        assert_eq!(symbol.range.end, Position::new(0, 10));
    }

    #[test]
    fn test_lsp_item() {
        let item = to_lsp_item(&tasks_completion::CAMEL_TASK_SNIPPETS[2]);
        assert_eq!(
            item.label,
            "Start Camel application with JBang with camel-debug"
        );
        assert_eq!(item.kind, Some(CompletionItemKind::SNIPPET));
        assert_eq!(item.insert_text_format, Some(InsertTextFormat::PLAIN_TEXT));
        assert!(item.insert_text.unwrap().contains("${relativeFile}"));
        assert!(matches!(item.documentation, Some(Documentation::String(_))));
    }
}
