//! Token types for the JSONC scanner.

use crate::Span;

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Structural tokens
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `:`
    Colon,
    /// `,`
    Comma,

    // Literal tokens
    /// Quoted string: `"hello"`
    String,
    /// Number: `-12.5e3`
    Number,
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,

    // Comment tokens
    /// Line comment: `// ...`
    LineComment,
    /// Block comment: `/* ... */`
    BlockComment,

    // Trivia
    /// Horizontal whitespace: spaces and tabs
    Whitespace,
    /// Newline: `\n`, `\r\n` or a lone `\r`
    Newline,

    // Special tokens
    /// End of file
    Eof,
    /// Unrecognized input (bare words, stray characters)
    Unknown,
}

impl TokenKind {
    /// Whether this token is a comment.
    pub fn is_comment(&self) -> bool {
        matches!(self, TokenKind::LineComment | TokenKind::BlockComment)
    }
}

/// A problem found while scanning a single token.
///
/// The token is still produced; the error only qualifies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanError {
    /// A block comment without its closing `*/`.
    UnexpectedEndOfComment,
    /// A string without its closing quote.
    UnexpectedEndOfString,
    /// A number that stops after `.` or an exponent marker.
    UnexpectedEndOfNumber,
    /// A `\u` escape not followed by four hex digits.
    InvalidUnicode,
    /// A backslash followed by a character that is not an escape.
    InvalidEscapeCharacter,
    /// A control character inside a string.
    InvalidCharacter,
}

/// A token with its kind, span, and source text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'src> {
    /// The kind of token.
    pub kind: TokenKind,
    /// The span in the source text.
    pub span: Span,
    /// The source text of this token.
    pub text: &'src str,
    /// Scan error attached to this token, if any.
    pub error: Option<ScanError>,
}

impl<'src> Token<'src> {
    /// Create a new token.
    pub fn new(kind: TokenKind, span: Span, text: &'src str) -> Self {
        Self {
            kind,
            span,
            text,
            error: None,
        }
    }

    /// Attach a scan error to this token.
    pub fn with_error(mut self, error: Option<ScanError>) -> Self {
        self.error = error;
        self
    }
}
