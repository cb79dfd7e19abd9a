//! In-process LSP integration tests.
//!
//! These tests drive the server through tower-lsp's in-process service,
//! without spawning a subprocess.

use futures::StreamExt;
use serde_json::{Value, json};
use tokio::sync::mpsc::Receiver;
use tokio::task::JoinHandle;
use tower::Service;
use tower_lsp::LspService;
use tower_lsp::jsonrpc::Request;

use tasks_lsp::TasksLanguageServer;

const TASKS_URI: &str = "file:///workspace/.vscode/tasks.json";

const TASKS_DOCUMENT: &str = r#"{
    // See https://go.microsoft.com/fwlink/?LinkId=733558
    "version": "2.0.0",
    "tasks": [

        {
            "label": "build",
            "type": "shell",
            "command": "mvn package"
        }
    ]
}"#;

/// An initialized server with its notifications drained into a channel.
struct TestServer {
    service: LspService<TasksLanguageServer>,
    notifications: Receiver<Request>,
    drain_task: JoinHandle<()>,
    next_id: i64,
}

impl TestServer {
    async fn start() -> Self {
        let (service, socket) = LspService::new(TasksLanguageServer::new);
        let (mut notifications, _responses) = socket.split();

        // Drain notifications so the server never blocks on sending
        let (tx, rx) = tokio::sync::mpsc::channel::<Request>(32);
        let drain_task = tokio::spawn(async move {
            while let Some(notification) = notifications.next().await {
                let _ = tx.send(notification).await;
            }
        });

        let mut server = Self {
            service,
            notifications: rx,
            drain_task,
            next_id: 1,
        };

        let response = server
            .request(
                "initialize",
                json!({
                    "processId": null,
                    "capabilities": {},
                    "rootUri": null
                }),
            )
            .await;
        assert_eq!(
            response["result"]["capabilities"]["textDocumentSync"],
            json!(1),
            "server should ask for full sync"
        );
        assert!(response["result"]["capabilities"]["completionProvider"].is_object());

        server.notify("initialized", json!({})).await;
        server
    }

    async fn request(&mut self, method: &str, params: Value) -> Value {
        let id = self.next_id;
        self.next_id += 1;
        let response = self
            .service
            .call(make_request(id, method, params))
            .await
            .expect("request failed")
            .expect("request should have a response");
        serde_json::to_value(&response).expect("response serializes")
    }

    async fn notify(&mut self, method: &str, params: Value) {
        let _ = self.service.call(make_notification(method, params)).await;
    }

    async fn open(&mut self, uri: &str, text: &str) {
        self.notify(
            "textDocument/didOpen",
            json!({
                "textDocument": {
                    "uri": uri,
                    "languageId": "jsonc",
                    "version": 1,
                    "text": text
                }
            }),
        )
        .await;
    }

    async fn complete(&mut self, uri: &str, line: u32, character: u32) -> Value {
        let response = self
            .request(
                "textDocument/completion",
                json!({
                    "textDocument": { "uri": uri },
                    "position": { "line": line, "character": character }
                }),
            )
            .await;
        response["result"].clone()
    }

    /// Wait for the next diagnostics published for `uri`.
    async fn diagnostics_for(&mut self, uri: &str) -> Option<Vec<Value>> {
        let timeout = tokio::time::sleep(tokio::time::Duration::from_secs(1));
        tokio::pin!(timeout);

        loop {
            tokio::select! {
                Some(notification) = self.notifications.recv() => {
                    if notification.method() != "textDocument/publishDiagnostics" {
                        continue;
                    }
                    let Some(params) = notification.params() else {
                        continue;
                    };
                    if params.get("uri").and_then(|u| u.as_str()) == Some(uri) {
                        return params
                            .get("diagnostics")
                            .and_then(|d| d.as_array())
                            .cloned();
                    }
                }
                _ = &mut timeout => {
                    return None;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.drain_task.abort();
    }
}

fn labels(result: &Value) -> Vec<&str> {
    result
        .as_array()
        .expect("completion result should be an array")
        .iter()
        .map(|item| item["label"].as_str().unwrap_or(""))
        .collect()
}

#[tokio::test]
async fn test_completion_in_tasks_array() {
    let mut server = TestServer::start().await;
    server.open(TASKS_URI, TASKS_DOCUMENT).await;

    // The blank line before the first task
    let result = server.complete(TASKS_URI, 4, 8).await;
    assert_eq!(
        labels(&result),
        vec![
            "Start Camel application with Maven with camel.debug profile",
            "Start Camel application with Maven Quarkus Dev with camel.debug profile",
            "Start Camel application with JBang with camel-debug",
        ]
    );

    let item = &result[0];
    // SNIPPET
    assert_eq!(item["kind"], json!(15));
    // PLAIN_TEXT
    assert_eq!(item["insertTextFormat"], json!(1));
    assert!(item["documentation"].is_string());
    let insert_text = item["insertText"].as_str().unwrap();
    assert!(insert_text.contains("\"label\": \"Start Camel application with camel.debug profile\""));
}

#[tokio::test]
async fn test_completion_outside_tasks_array() {
    let mut server = TestServer::start().await;
    server.open(TASKS_URI, TASKS_DOCUMENT).await;

    // Inside the `"version"` value
    let result = server.complete(TASKS_URI, 2, 17).await;
    assert_eq!(result, json!([]));

    // Inside the first task object
    let result = server.complete(TASKS_URI, 6, 12).await;
    assert_eq!(result, json!([]));
}

#[tokio::test]
async fn test_completion_for_other_file_is_null() {
    let mut server = TestServer::start().await;
    let uri = "file:///workspace/.vscode/launch.json";
    server.open(uri, r#"{"tasks": [  ]}"#).await;

    let result = server.complete(uri, 0, 12).await;
    assert_eq!(result, Value::Null);
}

#[tokio::test]
async fn test_completion_for_unknown_document_is_null() {
    let mut server = TestServer::start().await;
    let result = server.complete(TASKS_URI, 0, 0).await;
    assert_eq!(result, Value::Null);
}

#[tokio::test]
async fn test_completion_follows_changes() {
    let mut server = TestServer::start().await;
    server.open(TASKS_URI, r#"{"version": "2.0.0"}"#).await;
    assert_eq!(server.complete(TASKS_URI, 0, 12).await, json!([]));

    server
        .notify(
            "textDocument/didChange",
            json!({
                "textDocument": { "uri": TASKS_URI, "version": 2 },
                "contentChanges": [{ "text": "{\"version\": \"2.0.0\", \"tasks\": [  ]}" }]
            }),
        )
        .await;

    // Between the brackets of the new array
    let result = server.complete(TASKS_URI, 0, 32).await;
    assert_eq!(labels(&result).len(), 3);
}

#[tokio::test]
async fn test_diagnostics_published_for_parse_error() {
    let mut server = TestServer::start().await;
    server.open(TASKS_URI, "{\n  \"tasks\": [\n").await;

    let diagnostics = server
        .diagnostics_for(TASKS_URI)
        .await
        .expect("diagnostics should be published");
    assert!(
        diagnostics
            .iter()
            .any(|d| d["message"] == json!("closing bracket expected")),
        "expected an unclosed array diagnostic, got: {diagnostics:?}"
    );

    // Completion still works in the unclosed array
    let result = server.complete(TASKS_URI, 1, 12).await;
    assert_eq!(labels(&result).len(), 3);
}

#[tokio::test]
async fn test_diagnostics_cleared_on_close() {
    let mut server = TestServer::start().await;
    server.open(TASKS_URI, "{\"tasks\": [").await;
    let diagnostics = server.diagnostics_for(TASKS_URI).await.unwrap();
    assert!(!diagnostics.is_empty());

    server
        .notify(
            "textDocument/didClose",
            json!({ "textDocument": { "uri": TASKS_URI } }),
        )
        .await;
    let diagnostics = server.diagnostics_for(TASKS_URI).await.unwrap();
    assert!(diagnostics.is_empty());

    assert_eq!(server.complete(TASKS_URI, 0, 11).await, Value::Null);
}

#[tokio::test]
async fn test_valid_document_has_no_diagnostics() {
    let mut server = TestServer::start().await;
    server.open(TASKS_URI, TASKS_DOCUMENT).await;

    let diagnostics = server.diagnostics_for(TASKS_URI).await.unwrap();
    assert!(diagnostics.is_empty(), "got: {diagnostics:?}");
}

/// Helper to create a JSON-RPC request
fn make_request(id: i64, method: &str, params: Value) -> Request {
    let req = json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params
    });
    serde_json::from_value(req).expect("valid request")
}

/// Helper to create a JSON-RPC notification (no id)
fn make_notification(method: &str, params: Value) -> Request {
    let req = json!({
        "jsonrpc": "2.0",
        "method": method,
        "params": params
    });
    serde_json::from_value(req).expect("valid notification")
}
