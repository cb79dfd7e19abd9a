//! A tokenizer for JSON with comments (JSONC)

mod span;
pub use span::Span;

mod token;
pub use token::{ScanError, Token, TokenKind};

mod tokenizer;
pub use tokenizer::Tokenizer;
