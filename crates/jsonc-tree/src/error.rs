//! Parse errors reported alongside the tree.

use std::fmt;

use jsonc_tokenizer::{ScanError, Span};

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    InvalidSymbol,
    InvalidNumberFormat,
    PropertyNameExpected,
    ValueExpected,
    ColonExpected,
    CommaExpected,
    CloseBraceExpected,
    CloseBracketExpected,
    EndOfFileExpected,
    InvalidCommentToken,
    UnexpectedEndOfComment,
    UnexpectedEndOfString,
    UnexpectedEndOfNumber,
    InvalidUnicode,
    InvalidEscapeCharacter,
    InvalidCharacter,
}

impl From<ScanError> for ParseErrorKind {
    fn from(error: ScanError) -> Self {
        match error {
            ScanError::UnexpectedEndOfComment => ParseErrorKind::UnexpectedEndOfComment,
            ScanError::UnexpectedEndOfString => ParseErrorKind::UnexpectedEndOfString,
            ScanError::UnexpectedEndOfNumber => ParseErrorKind::UnexpectedEndOfNumber,
            ScanError::InvalidUnicode => ParseErrorKind::InvalidUnicode,
            ScanError::InvalidEscapeCharacter => ParseErrorKind::InvalidEscapeCharacter,
            ScanError::InvalidCharacter => ParseErrorKind::InvalidCharacter,
        }
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            ParseErrorKind::InvalidSymbol => "invalid symbol",
            ParseErrorKind::InvalidNumberFormat => "invalid number format",
            ParseErrorKind::PropertyNameExpected => "property name expected",
            ParseErrorKind::ValueExpected => "value expected",
            ParseErrorKind::ColonExpected => "colon expected",
            ParseErrorKind::CommaExpected => "comma expected",
            ParseErrorKind::CloseBraceExpected => "closing brace expected",
            ParseErrorKind::CloseBracketExpected => "closing bracket expected",
            ParseErrorKind::EndOfFileExpected => "end of file expected",
            ParseErrorKind::InvalidCommentToken => "comments are not permitted",
            ParseErrorKind::UnexpectedEndOfComment => "unexpected end of comment",
            ParseErrorKind::UnexpectedEndOfString => "unexpected end of string",
            ParseErrorKind::UnexpectedEndOfNumber => "unexpected end of number",
            ParseErrorKind::InvalidUnicode => "invalid unicode sequence in string",
            ParseErrorKind::InvalidEscapeCharacter => "invalid escape character in string",
            ParseErrorKind::InvalidCharacter => "invalid character in string",
        };
        f.write_str(message)
    }
}

/// A parse error with location information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Span of the token the error was reported on.
    pub span: Span,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}..{}", self.kind, self.span.start, self.span.end)
    }
}

impl std::error::Error for ParseError {}
