//! Completions for the `tasks` array of a `tasks.json` document.
//!
//! Given the text of a document and a cursor position, the provider parses
//! the text, finds the node enclosing the cursor and, when that node is the
//! array value of a `"tasks"` property, offers three ready-made tasks that
//! start an Apache Camel application in debug mode (Maven, Maven Quarkus
//! Dev, JBang).
//!
//! ```
//! use tasks_completion::{Position, provide_completion_items};
//!
//! let items = provide_completion_items(r#"{"tasks": [  ]}"#, Position::new(0, 11));
//! assert_eq!(items.len(), 3);
//!
//! let items = provide_completion_items(r#"{"other": [  ]}"#, Position::new(0, 11));
//! assert!(items.is_empty());
//! ```

mod classifier;
mod position;
mod provider;
mod snippets;

pub use classifier::{
    ContextClassifier, TASKS_PROPERTY, is_in_array, is_in_tasks_array, is_parent_tasks,
    parent_has_string_child,
};
pub use position::{Position, offset_at, position_at};
pub use provider::{CompletionProvider, provide_at_offset, provide_completion_items};
pub use snippets::{CAMEL_TASK_SNIPPETS, CompletionItem};
