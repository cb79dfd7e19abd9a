//! Tokenizer for JSON with comments.

use crate::{ScanError, Span, Token, TokenKind};
use tracing::trace;

/// A tokenizer that produces tokens from JSONC source text.
///
/// Every byte of the input ends up in exactly one token, trivia included,
/// so concatenating the token texts reproduces the source.
#[derive(Clone)]
pub struct Tokenizer<'src> {
    /// The source text being tokenized.
    source: &'src str,
    /// The remaining source text (suffix of `source`).
    remaining: &'src str,
    /// Current byte position in `source`.
    pos: u32,
}

impl<'src> Tokenizer<'src> {
    /// Create a new tokenizer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            remaining: source,
            pos: 0,
        }
    }

    /// Peek at the next character without consuming it.
    #[inline]
    fn peek(&self) -> Option<char> {
        self.remaining.chars().next()
    }

    /// Peek at the nth character (0-indexed) without consuming.
    #[inline]
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.remaining.chars().nth(n)
    }

    /// Advance by one character and return it.
    #[inline]
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8() as u32;
        self.remaining = &self.remaining[c.len_utf8()..];
        Some(c)
    }

    /// Check if the remaining text starts with the given prefix.
    #[inline]
    fn starts_with(&self, prefix: &str) -> bool {
        self.remaining.starts_with(prefix)
    }

    /// Consume characters while `pred` holds.
    fn advance_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        let mut count = 0;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.advance();
            count += 1;
        }
        count
    }

    /// Create a token from the given start position to current position.
    fn token(&self, kind: TokenKind, start: u32) -> Token<'src> {
        let span = Span::new(start, self.pos);
        let text = &self.source[start as usize..self.pos as usize];
        trace!("Token {:?} at {:?}: {:?}", kind, span, text);
        Token::new(kind, span, text)
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Token<'src> {
        let start = self.pos;
        let Some(c) = self.peek() else {
            return self.token(TokenKind::Eof, start);
        };

        match c {
            // Structural tokens
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            ':' => self.single(TokenKind::Colon),
            ',' => self.single(TokenKind::Comma),

            '"' => self.tokenize_string(),

            '/' if self.starts_with("//") => self.tokenize_line_comment(),
            '/' if self.starts_with("/*") => self.tokenize_block_comment(),
            // A lone slash is never valid
            '/' => self.single(TokenKind::Unknown),

            '-' if matches!(self.peek_nth(1), Some(d) if d.is_ascii_digit()) => {
                self.tokenize_number()
            }
            '-' => self.single(TokenKind::Unknown),
            '0'..='9' => self.tokenize_number(),

            '\n' => self.single(TokenKind::Newline),
            '\r' => {
                self.advance();
                if self.peek() == Some('\n') {
                    self.advance();
                }
                self.token(TokenKind::Newline, start)
            }
            _ if is_whitespace(c) => {
                self.advance_while(is_whitespace);
                self.token(TokenKind::Whitespace, start)
            }

            _ => self.tokenize_word(),
        }
    }

    /// Consume a single character as a token of the given kind.
    fn single(&mut self, kind: TokenKind) -> Token<'src> {
        let start = self.pos;
        self.advance();
        self.token(kind, start)
    }

    /// Tokenize a quoted string, recording the first problem found.
    fn tokenize_string(&mut self) -> Token<'src> {
        let start = self.pos;
        self.advance(); // opening quote

        let mut error = None;
        loop {
            match self.peek() {
                None | Some('\n' | '\r') => {
                    // Strings never span lines; the break belongs to the next token
                    error = Some(ScanError::UnexpectedEndOfString);
                    break;
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    match self.peek() {
                        Some('"' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't') => {
                            self.advance();
                        }
                        Some('u') => {
                            self.advance();
                            let digits = self.remaining.chars().take(4);
                            let hex = digits.take_while(|d| d.is_ascii_hexdigit()).count();
                            for _ in 0..hex {
                                self.advance();
                            }
                            if hex < 4 {
                                error.get_or_insert(ScanError::InvalidUnicode);
                            }
                        }
                        Some('\n' | '\r') | None => {
                            error = Some(ScanError::UnexpectedEndOfString);
                            break;
                        }
                        Some(_) => {
                            self.advance();
                            error.get_or_insert(ScanError::InvalidEscapeCharacter);
                        }
                    }
                }
                Some(c) if (c as u32) < 0x20 => {
                    self.advance();
                    error.get_or_insert(ScanError::InvalidCharacter);
                }
                Some(_) => {
                    self.advance();
                }
            }
        }

        self.token(TokenKind::String, start).with_error(error)
    }

    /// Tokenize a number: `-? (0 | [1-9][0-9]*) (. [0-9]+)? ([eE] [+-]? [0-9]+)?`
    fn tokenize_number(&mut self) -> Token<'src> {
        let start = self.pos;
        let mut error = None;

        if self.peek() == Some('-') {
            self.advance();
        }
        if self.peek() == Some('0') {
            self.advance();
        } else {
            self.advance_while(|c| c.is_ascii_digit());
        }

        if self.peek() == Some('.') {
            self.advance();
            if self.advance_while(|c| c.is_ascii_digit()) == 0 {
                error = Some(ScanError::UnexpectedEndOfNumber);
            }
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            self.advance();
            if matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
            if self.advance_while(|c| c.is_ascii_digit()) == 0 {
                error.get_or_insert(ScanError::UnexpectedEndOfNumber);
            }
        }

        self.token(TokenKind::Number, start).with_error(error)
    }

    /// Tokenize a line comment: `// ...`.
    fn tokenize_line_comment(&mut self) -> Token<'src> {
        let start = self.pos;
        self.advance_while(|c| c != '\n' && c != '\r');
        self.token(TokenKind::LineComment, start)
    }

    /// Tokenize a block comment: `/* ... */`.
    fn tokenize_block_comment(&mut self) -> Token<'src> {
        let start = self.pos;

        // Consume `/*`
        self.advance();
        self.advance();

        let error = match self.remaining.find("*/") {
            Some(idx) => {
                self.pos += idx as u32 + 2;
                self.remaining = &self.remaining[idx + 2..];
                None
            }
            None => {
                self.pos = self.source.len() as u32;
                self.remaining = "";
                Some(ScanError::UnexpectedEndOfComment)
            }
        };

        self.token(TokenKind::BlockComment, start).with_error(error)
    }

    /// Tokenize a bare word: one of the keywords, or unknown content.
    fn tokenize_word(&mut self) -> Token<'src> {
        let start = self.pos;
        self.advance_while(is_word_char);
        if self.pos == start {
            // Control characters and the like end up here
            self.advance();
            return self.token(TokenKind::Unknown, start);
        }

        let kind = match &self.source[start as usize..self.pos as usize] {
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            _ => TokenKind::Unknown,
        };
        self.token(kind, start)
    }
}

impl<'src> Iterator for Tokenizer<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}

impl Token<'_> {
    /// The decoded value of a string token, without quotes and with escapes
    /// resolved. Returns `None` for any other kind of token.
    pub fn string_value(&self) -> Option<String> {
        if self.kind != TokenKind::String {
            return None;
        }
        let inner = &self.text[1..];
        let inner = if self.error == Some(ScanError::UnexpectedEndOfString) {
            inner
        } else {
            inner.strip_suffix('"').unwrap_or(inner)
        };
        Some(unescape(inner))
    }
}

/// Resolve JSON escape sequences. Malformed escapes are kept as written and
/// unpaired surrogates become U+FFFD.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('u') => {
                let Some(unit) = read_hex4(&mut chars) else {
                    out.push_str("\\u");
                    continue;
                };
                if (0xD800..0xDC00).contains(&unit) {
                    // High surrogate: try to pair it with a following `\uDC00..DFFF`
                    let mut lookahead = chars.clone();
                    let low = match (lookahead.next(), lookahead.next()) {
                        (Some('\\'), Some('u')) => read_hex4(&mut lookahead)
                            .filter(|low| (0xDC00..0xE000).contains(low)),
                        _ => None,
                    };
                    match low {
                        Some(low) => {
                            chars = lookahead;
                            let code = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                            out.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
                        }
                        None => out.push('\u{FFFD}'),
                    }
                } else {
                    out.push(char::from_u32(unit).unwrap_or('\u{FFFD}'));
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}

fn read_hex4(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<u32> {
    let mut value = 0;
    for _ in 0..4 {
        let digit = chars.peek()?.to_digit(16)?;
        chars.next();
        value = value * 16 + digit;
    }
    Some(value)
}

/// Horizontal whitespace, including the BOM and non-breaking spaces.
fn is_whitespace(c: char) -> bool {
    c != '\n' && c != '\r' && (c.is_whitespace() || c == '\u{FEFF}')
}

/// Characters that can continue a bare word.
fn is_word_char(c: char) -> bool {
    !matches!(c, '{' | '}' | '[' | ']' | ',' | ':' | '"' | '/')
        && !is_whitespace(c)
        && !matches!(c, '\n' | '\r')
        && !c.is_control()
}
