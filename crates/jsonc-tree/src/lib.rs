//! Syntax tree for JSON with comments (JSONC).
//!
//! The parser is error tolerant: malformed input still yields a best-effort
//! tree plus a list of [`ParseError`]s, which is what editor tooling needs
//! while the user is in the middle of typing.
//!
//! Nodes live in an arena owned by [`SyntaxTree`]. Children are stored as
//! indices in source order and every node keeps the index of its parent, so
//! walking up from a node found by offset is a single lookup.
//!
//! # Example
//!
//! ```
//! use jsonc_tree::{NodeKind, parse_tree};
//!
//! let source = r#"{ "tasks": [ ] }"#;
//! let parsed = parse_tree(source);
//! let tree = parsed.tree().unwrap();
//!
//! let node = tree.find_node_at_offset(12, false).unwrap();
//! assert_eq!(node.kind(), &NodeKind::Array);
//! assert_eq!(node.parent().and_then(|p| p.key()), Some("tasks"));
//! ```

mod error;
mod node;
mod parser;

pub use error::{ParseError, ParseErrorKind};
pub use jsonc_tokenizer::Span;
pub use node::{Children, Node, NodeData, NodeId, NodeKind, Segment, SyntaxTree};
pub use parser::{Parse, ParseOptions, parse_tree, parse_tree_with};
