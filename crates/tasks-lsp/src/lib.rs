//! Camel tasks language server
//!
//! LSP server for VS Code style `tasks.json` files, providing:
//! - Completions (Camel launcher tasks inside the `"tasks"` array)
//! - Diagnostics (JSONC parse errors)

mod config;
mod server;

pub use config::{
    DEFAULT_FILE_PATTERN, DocumentFilter, LoadConfigError, TasksLspConfig, config_path,
    load_config,
};
pub use server::{TasksLanguageServer, run};
