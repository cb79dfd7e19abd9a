//! Error-tolerant recursive descent parser building the arena tree.

use jsonc_tokenizer::{Span, Token, TokenKind, Tokenizer};
use tracing::debug;

use crate::error::{ParseError, ParseErrorKind};
use crate::node::{NodeData, NodeId, NodeKind, SyntaxTree};

/// Knobs for what the parser accepts without reporting an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseOptions {
    /// Report comments as [`ParseErrorKind::InvalidCommentToken`].
    pub disallow_comments: bool,
    /// Accept a comma before a closing `}` or `]`.
    pub allow_trailing_comma: bool,
    /// Accept a document with no value at all.
    pub allow_empty_content: bool,
}

/// Result of parsing a document.
#[derive(Debug, Clone)]
pub struct Parse {
    tree: Option<SyntaxTree>,
    errors: Vec<ParseError>,
}

impl Parse {
    /// The tree, unless the document held no value at all (empty, only
    /// comments, or nothing that starts a value).
    pub fn tree(&self) -> Option<&SyntaxTree> {
        self.tree.as_ref()
    }

    pub fn into_tree(self) -> Option<SyntaxTree> {
        self.tree
    }

    /// Get parse errors.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Check if parsing succeeded without errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parse JSONC source into a tree with the default options.
pub fn parse_tree(source: &str) -> Parse {
    parse_tree_with(source, ParseOptions::default())
}

/// Parse JSONC source into a tree.
pub fn parse_tree_with(source: &str, options: ParseOptions) -> Parse {
    TreeParser::new(source, options).parse()
}

struct TreeParser<'src> {
    tokenizer: Tokenizer<'src>,
    /// Current significant token; trivia never lands here.
    current: Token<'src>,
    options: ParseOptions,
    nodes: Vec<NodeData>,
    errors: Vec<ParseError>,
}

impl<'src> TreeParser<'src> {
    fn new(source: &'src str, options: ParseOptions) -> Self {
        Self {
            tokenizer: Tokenizer::new(source),
            current: Token::new(TokenKind::Eof, Span::empty(0), ""),
            options,
            nodes: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn parse(mut self) -> Parse {
        self.scan_next();

        let has_root = if self.at(TokenKind::Eof) {
            if !self.options.allow_empty_content {
                self.error(ParseErrorKind::ValueExpected, &[], &[]);
            }
            false
        } else if self.parse_value(None) {
            if !self.at(TokenKind::Eof) {
                self.error(ParseErrorKind::EndOfFileExpected, &[], &[]);
            }
            true
        } else {
            self.error(ParseErrorKind::ValueExpected, &[], &[]);
            false
        };

        debug!(
            nodes = self.nodes.len(),
            errors = self.errors.len(),
            "parsed JSONC document"
        );

        Parse {
            tree: has_root.then(|| SyntaxTree::new(self.nodes)),
            errors: self.errors,
        }
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    /// Advance to the next significant token, reporting scan errors,
    /// stray symbols and (optionally) comments on the way.
    fn scan_next(&mut self) -> TokenKind {
        loop {
            let token = self.tokenizer.next_token();
            if let Some(error) = token.error {
                self.errors.push(ParseError::new(error.into(), token.span));
            }
            match token.kind {
                kind if kind.is_comment() => {
                    if self.options.disallow_comments {
                        self.errors.push(ParseError::new(
                            ParseErrorKind::InvalidCommentToken,
                            token.span,
                        ));
                    }
                }
                TokenKind::Unknown => {
                    self.errors
                        .push(ParseError::new(ParseErrorKind::InvalidSymbol, token.span));
                }
                TokenKind::Whitespace | TokenKind::Newline => {}
                kind => {
                    self.current = token;
                    return kind;
                }
            }
        }
    }

    /// Record an error at the current token, then skip ahead.
    ///
    /// Tokens are skipped until one in `skip_until_after` (which is consumed)
    /// or `skip_until` (which is not) is reached. With both empty nothing is
    /// skipped.
    fn error(
        &mut self,
        kind: ParseErrorKind,
        skip_until_after: &[TokenKind],
        skip_until: &[TokenKind],
    ) {
        self.errors.push(ParseError::new(kind, self.current.span));
        if skip_until_after.is_empty() && skip_until.is_empty() {
            return;
        }

        let mut token = self.current.kind;
        while token != TokenKind::Eof {
            if skip_until_after.contains(&token) {
                self.scan_next();
                break;
            }
            if skip_until.contains(&token) {
                break;
            }
            token = self.scan_next();
        }
    }

    /// Allocate a node and link it into its parent.
    fn push_node(&mut self, kind: NodeKind, span: Span, parent: Option<NodeId>) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            span,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.index()].children.push(id);
        }
        id
    }

    fn close_node(&mut self, id: NodeId, end: u32) {
        let span = &mut self.nodes[id.index()].span;
        span.end = end.max(span.start);
    }

    fn parse_value(&mut self, parent: Option<NodeId>) -> bool {
        match self.current.kind {
            TokenKind::LBrace => {
                self.parse_object(parent);
                true
            }
            TokenKind::LBracket => {
                self.parse_array(parent);
                true
            }
            _ => self.parse_literal(parent),
        }
    }

    fn parse_literal(&mut self, parent: Option<NodeId>) -> bool {
        let token = self.current.clone();
        let kind = match token.kind {
            TokenKind::String => NodeKind::String(token.string_value().unwrap_or_default()),
            TokenKind::Number => {
                let number = match token.text.parse::<f64>() {
                    Ok(number) => number,
                    Err(_) => {
                        self.errors.push(ParseError::new(
                            ParseErrorKind::InvalidNumberFormat,
                            token.span,
                        ));
                        0.0
                    }
                };
                NodeKind::Number(number)
            }
            TokenKind::True => NodeKind::Boolean(true),
            TokenKind::False => NodeKind::Boolean(false),
            TokenKind::Null => NodeKind::Null,
            _ => return false,
        };
        self.push_node(kind, token.span, parent);
        self.scan_next();
        true
    }

    fn parse_object(&mut self, parent: Option<NodeId>) {
        let id = self.push_node(NodeKind::Object, Span::empty(self.current.span.start), parent);
        self.scan_next(); // `{`

        let mut needs_comma = false;
        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            if self.at(TokenKind::Comma) {
                if !needs_comma {
                    self.error(ParseErrorKind::ValueExpected, &[], &[]);
                }
                self.scan_next();
                if self.at(TokenKind::RBrace) && self.options.allow_trailing_comma {
                    break;
                }
            } else if needs_comma {
                self.error(ParseErrorKind::CommaExpected, &[], &[]);
            }
            if !self.parse_property(id) {
                self.error(
                    ParseErrorKind::ValueExpected,
                    &[],
                    &[TokenKind::RBrace, TokenKind::Comma],
                );
            }
            needs_comma = true;
        }

        // Unclosed objects run up to the token that stopped them.
        self.close_node(id, self.current.span.end);
        if self.at(TokenKind::RBrace) {
            self.scan_next();
        } else {
            self.error(ParseErrorKind::CloseBraceExpected, &[TokenKind::RBrace], &[]);
        }
    }

    fn parse_property(&mut self, object: NodeId) -> bool {
        if !self.at(TokenKind::String) {
            self.error(
                ParseErrorKind::PropertyNameExpected,
                &[],
                &[TokenKind::RBrace, TokenKind::Comma],
            );
            return false;
        }

        let key_span = self.current.span;
        let property = self.push_node(NodeKind::Property { colon: None }, key_span, Some(object));
        let key = self.current.string_value().unwrap_or_default();
        self.push_node(NodeKind::String(key), key_span, Some(property));
        self.scan_next();

        let mut value = None;
        if self.at(TokenKind::Colon) {
            self.nodes[property.index()].kind = NodeKind::Property {
                colon: Some(self.current.span.start),
            };
            self.scan_next();
            let next = NodeId::new(self.nodes.len());
            if self.parse_value(Some(property)) {
                value = Some(next);
            } else {
                self.error(
                    ParseErrorKind::ValueExpected,
                    &[],
                    &[TokenKind::RBrace, TokenKind::Comma],
                );
            }
        } else {
            self.error(
                ParseErrorKind::ColonExpected,
                &[],
                &[TokenKind::RBrace, TokenKind::Comma],
            );
        }

        // A property ends with its value. Without one it stops before the
        // next comma, or runs through whatever token ended the object.
        let end = match value {
            Some(value) => self.nodes[value.index()].span.end,
            None if self.at(TokenKind::Comma) => self.current.span.start,
            None => self.current.span.end,
        };
        self.close_node(property, end);
        true
    }

    fn parse_array(&mut self, parent: Option<NodeId>) {
        let id = self.push_node(NodeKind::Array, Span::empty(self.current.span.start), parent);
        self.scan_next(); // `[`

        let mut needs_comma = false;
        while !self.at(TokenKind::RBracket) && !self.at(TokenKind::Eof) {
            if self.at(TokenKind::Comma) {
                if !needs_comma {
                    self.error(ParseErrorKind::ValueExpected, &[], &[]);
                }
                self.scan_next();
                if self.at(TokenKind::RBracket) && self.options.allow_trailing_comma {
                    break;
                }
            } else if needs_comma {
                self.error(ParseErrorKind::CommaExpected, &[], &[]);
            }
            if !self.parse_value(Some(id)) {
                self.error(
                    ParseErrorKind::ValueExpected,
                    &[],
                    &[TokenKind::RBracket, TokenKind::Comma],
                );
            }
            needs_comma = true;
        }

        self.close_node(id, self.current.span.end);
        if self.at(TokenKind::RBracket) {
            self.scan_next();
        } else {
            self.error(
                ParseErrorKind::CloseBracketExpected,
                &[TokenKind::RBracket],
                &[],
            );
        }
    }
}
