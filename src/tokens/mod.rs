//! Host token stream adapter.
//!
//! The linter never tokenizes PHP itself.  The host hands over a flat list
//! of [`Token`]s (kind, raw content, line) and either supplies the
//! structural links itself via [`TokenStream::new`] or lets
//! [`TokenStream::annotated`] compute them.
//!
//! All access is index based and bounds checked: out-of-range lookups
//! resolve to a sentinel token instead of panicking, and neighbour
//! navigation goes through [`TokenStream::step`] / [`TokenStream::next`] /
//! [`TokenStream::prev`] rather than raw offset arithmetic.
//!
//! # Submodules
//!
//! - [`structure`]: bracket pairing, parenthesis owners, scope
//!   opener/closer detection and doc comment tag collection.

mod structure;

use serde::Serialize;

/// Position of a token inside a [`TokenStream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TokenIndex(pub usize);

impl TokenIndex {
    /// The raw position.
    pub fn get(self) -> usize {
        self.0
    }
}

impl From<usize> for TokenIndex {
    fn from(value: usize) -> Self {
        TokenIndex(value)
    }
}

/// Lexical category of a token, modelled on the PHP_CodeSniffer token set.
///
/// Doc comments are split into their parts (`/**`, whitespace, `*`, tags,
/// free-text strings and `*/`), which is what the tag extractor relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    OpenTag,
    CloseTag,
    InlineHtml,
    Whitespace,
    /// A `//`, `#` or `/* */` comment.
    Comment,
    DocCommentOpenTag,
    DocCommentCloseTag,
    DocCommentWhitespace,
    DocCommentStar,
    /// An `@tag` inside a doc comment.
    DocCommentTag,
    /// Free text inside a doc comment.
    DocCommentString,
    /// `function` introducing a named function or method.
    Function,
    /// `function` introducing an anonymous function.
    Closure,
    /// `fn` introducing an arrow function.
    Fn,
    Class,
    Interface,
    Trait,
    Enum,
    Public,
    Protected,
    Private,
    Static,
    Abstract,
    Final,
    Readonly,
    /// `#[` opening an attribute group.
    AttributeStart,
    Return,
    Throw,
    New,
    SelfKeyword,
    /// A bare identifier (`T_STRING`), including qualified names.
    Identifier,
    Variable,
    StringLiteral,
    Number,
    OpenParen,
    CloseParen,
    OpenCurly,
    CloseCurly,
    OpenSquare,
    CloseSquare,
    Semicolon,
    Comma,
    Ellipsis,
    Ampersand,
    /// `?` in a nullable type.
    Nullable,
    Colon,
    DoubleArrow,
    /// `=` and every compound assignment (`+=`, `.=`, `??=`, ...).
    Assignment,
    /// Any other operator or punctuation.
    Operator,
    /// Returned for out-of-range lookups.
    Sentinel,
}

impl TokenKind {
    /// Tokens that carry no code: whitespace and all comment parts.
    pub fn is_empty(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace
                | TokenKind::Comment
                | TokenKind::DocCommentOpenTag
                | TokenKind::DocCommentCloseTag
                | TokenKind::DocCommentWhitespace
                | TokenKind::DocCommentStar
                | TokenKind::DocCommentTag
                | TokenKind::DocCommentString
        )
    }

    /// Modifiers that may sit between a doc comment and `function`.
    pub fn is_method_prefix(self) -> bool {
        matches!(
            self,
            TokenKind::Public
                | TokenKind::Protected
                | TokenKind::Private
                | TokenKind::Static
                | TokenKind::Abstract
                | TokenKind::Final
                | TokenKind::Readonly
        )
    }

    pub fn is_opening_bracket(self) -> bool {
        matches!(
            self,
            TokenKind::OpenParen
                | TokenKind::OpenCurly
                | TokenKind::OpenSquare
                | TokenKind::AttributeStart
        )
    }

    pub fn is_closing_bracket(self) -> bool {
        matches!(
            self,
            TokenKind::CloseParen | TokenKind::CloseCurly | TokenKind::CloseSquare
        )
    }
}

/// Structural metadata attached to a token.
///
/// Which fields are populated depends on the token kind, mirroring the
/// arrays PHP_CodeSniffer attaches to its tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Links {
    /// The matching bracket, on every bracket token.
    pub bracket_pair: Option<TokenIndex>,
    /// The keyword owning a parenthesis pair, on `(` and `)`.
    pub parenthesis_owner: Option<TokenIndex>,
    /// On owners (`function`, closures, `fn`): their parenthesis pair.
    pub parenthesis_opener: Option<TokenIndex>,
    pub parenthesis_closer: Option<TokenIndex>,
    /// Enclosing parenthesis pairs, outermost first.
    pub nested_parentheses: Vec<(TokenIndex, TokenIndex)>,
    /// On scope owners: the body boundaries.
    pub scope_opener: Option<TokenIndex>,
    pub scope_closer: Option<TokenIndex>,
    /// On `/**`: the matching `*/`. On `*/`: the matching `/**`.
    pub comment_closer: Option<TokenIndex>,
    pub comment_opener: Option<TokenIndex>,
    /// On `/**`: every `@tag` inside the block, in order.
    pub comment_tags: Vec<TokenIndex>,
}

/// A single lexical unit owned by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub content: String,
    /// 1-based source line.
    pub line: u32,
    pub links: Links,
}

static SENTINEL: Token = Token {
    kind: TokenKind::Sentinel,
    content: String::new(),
    line: 0,
    links: Links {
        bracket_pair: None,
        parenthesis_owner: None,
        parenthesis_opener: None,
        parenthesis_closer: None,
        nested_parentheses: Vec::new(),
        scope_opener: None,
        scope_closer: None,
        comment_closer: None,
        comment_opener: None,
        comment_tags: Vec::new(),
    },
};

impl Token {
    pub fn new(kind: TokenKind, content: impl Into<String>, line: u32) -> Self {
        Self {
            kind,
            content: content.into(),
            line,
            links: Links::default(),
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.kind == TokenKind::Sentinel
    }
}

/// Random-access, bounds-checked token sequence.
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Wrap tokens whose [`Links`] were already filled in by the host.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// Wrap raw tokens and compute their structural links.
    pub fn annotated(tokens: Vec<Token>) -> Self {
        let mut stream = Self { tokens };
        structure::annotate(&mut stream.tokens);
        stream
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: TokenIndex) -> Option<&Token> {
        self.tokens.get(index.0)
    }

    /// The token at `index`, or the sentinel when out of range.
    pub fn token(&self, index: TokenIndex) -> &Token {
        self.tokens.get(index.0).unwrap_or(&SENTINEL)
    }

    pub fn kind(&self, index: TokenIndex) -> TokenKind {
        self.token(index).kind
    }

    pub fn content(&self, index: TokenIndex) -> &str {
        &self.token(index).content
    }

    pub fn line(&self, index: TokenIndex) -> u32 {
        self.token(index).line
    }

    pub fn links(&self, index: TokenIndex) -> &Links {
        &self.token(index).links
    }

    /// Move `delta` tokens from `index`, staying inside the stream.
    pub fn step(&self, index: TokenIndex, delta: isize) -> Option<TokenIndex> {
        let target = index.0.checked_add_signed(delta)?;
        (target < self.tokens.len()).then_some(TokenIndex(target))
    }

    pub fn next(&self, index: TokenIndex) -> Option<TokenIndex> {
        self.step(index, 1)
    }

    pub fn prev(&self, index: TokenIndex) -> Option<TokenIndex> {
        self.step(index, -1)
    }

    /// The successor token, or the sentinel at the end of the stream.
    pub fn successor(&self, index: TokenIndex) -> &Token {
        match self.next(index) {
            Some(next) => self.token(next),
            None => &SENTINEL,
        }
    }

    /// The predecessor token, or the sentinel at the start of the stream.
    pub fn predecessor(&self, index: TokenIndex) -> &Token {
        match self.prev(index) {
            Some(prev) => self.token(prev),
            None => &SENTINEL,
        }
    }

    pub fn indices(&self) -> impl Iterator<Item = TokenIndex> + use<> {
        (0..self.tokens.len()).map(TokenIndex)
    }

    /// First token at or after `start` and before `end` (exclusive, defaults
    /// to the end of the stream) satisfying `predicate`.
    pub fn find_next(
        &self,
        start: TokenIndex,
        end: Option<TokenIndex>,
        predicate: impl Fn(&Token) -> bool,
    ) -> Option<TokenIndex> {
        let end = end.map_or(self.tokens.len(), |e| e.0.min(self.tokens.len()));
        (start.0..end)
            .map(TokenIndex)
            .find(|&i| predicate(self.token(i)))
    }

    /// Last token at or before `start` and at or after `end` (inclusive,
    /// defaults to the start of the stream) satisfying `predicate`.
    pub fn find_previous(
        &self,
        start: TokenIndex,
        end: Option<TokenIndex>,
        predicate: impl Fn(&Token) -> bool,
    ) -> Option<TokenIndex> {
        if self.tokens.is_empty() {
            return None;
        }
        let start = start.0.min(self.tokens.len() - 1);
        let end = end.map_or(0, |e| e.0);
        if end > start {
            return None;
        }
        (end..=start)
            .rev()
            .map(TokenIndex)
            .find(|&i| predicate(self.token(i)))
    }

    /// First token at or after `start` whose kind is one of `kinds`.
    pub fn find_next_kind(
        &self,
        kinds: &[TokenKind],
        start: TokenIndex,
        end: Option<TokenIndex>,
    ) -> Option<TokenIndex> {
        self.find_next(start, end, |t| kinds.contains(&t.kind))
    }

    /// Last token at or before `start` whose kind is one of `kinds`.
    pub fn find_previous_kind(
        &self,
        kinds: &[TokenKind],
        start: TokenIndex,
        end: Option<TokenIndex>,
    ) -> Option<TokenIndex> {
        self.find_previous(start, end, |t| kinds.contains(&t.kind))
    }

    /// Concatenated content of the tokens in `start..=end`.
    pub fn text_between(&self, start: TokenIndex, end: TokenIndex) -> String {
        if self.tokens.is_empty() || start > end {
            return String::new();
        }
        let end = end.0.min(self.tokens.len() - 1);
        self.tokens[start.0.min(end)..=end]
            .iter()
            .map(|t| t.content.as_str())
            .collect()
    }

    /// The full source text the stream represents.
    pub fn to_source(&self) -> String {
        self.tokens.iter().map(|t| t.content.as_str()).collect()
    }

    /// Replace the content of one token.  Kinds and links stay untouched,
    /// so callers must only write text of the same lexical category.
    pub(crate) fn set_content(&mut self, index: TokenIndex, content: String) -> bool {
        match self.tokens.get_mut(index.0) {
            Some(token) => {
                token.content = content;
                true
            }
            None => false,
        }
    }
}
