#![allow(dead_code)]

use phpdoc_lint::{
    FixOutcome, FunctionCommentCheck, Linter, PhpVersion, Report, StrictParamStrategy, Token,
    TokenKind, TokenSignatureReflector, TokenStream,
};

pub const PHP56: u32 = 50600;
pub const PHP70: u32 = 70000;
pub const PHP72: u32 = 70200;
pub const PHP80: u32 = 80000;

/// Route `tracing` output through the test harness.  Filtered by
/// `RUST_LOG`, silent by default.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ─── Lexer ──────────────────────────────────────────────────────────────────
//
// Just enough PHP to drive the linter: the token kinds it relies on, doc
// comments split into opener / whitespace / star / tag / string / closer
// parts, and correct line numbers.  Not a general-purpose tokenizer.

pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).run()
}

pub fn stream(source: &str) -> TokenStream {
    TokenStream::annotated(tokenize(source))
}

const PUNCTUATION: &[(&str, TokenKind)] = &[
    ("...", TokenKind::Ellipsis),
    ("<<=", TokenKind::Assignment),
    (">>=", TokenKind::Assignment),
    ("**=", TokenKind::Assignment),
    ("??=", TokenKind::Assignment),
    ("===", TokenKind::Operator),
    ("!==", TokenKind::Operator),
    ("<=>", TokenKind::Operator),
    ("?->", TokenKind::Operator),
    ("=>", TokenKind::DoubleArrow),
    ("==", TokenKind::Operator),
    ("!=", TokenKind::Operator),
    ("<=", TokenKind::Operator),
    (">=", TokenKind::Operator),
    ("->", TokenKind::Operator),
    ("::", TokenKind::Operator),
    ("??", TokenKind::Operator),
    ("&&", TokenKind::Operator),
    ("||", TokenKind::Operator),
    ("++", TokenKind::Operator),
    ("--", TokenKind::Operator),
    ("+=", TokenKind::Assignment),
    ("-=", TokenKind::Assignment),
    ("*=", TokenKind::Assignment),
    ("/=", TokenKind::Assignment),
    (".=", TokenKind::Assignment),
    ("%=", TokenKind::Assignment),
    ("|=", TokenKind::Assignment),
    ("&=", TokenKind::Assignment),
    ("^=", TokenKind::Assignment),
    ("=", TokenKind::Assignment),
    ("&", TokenKind::Ampersand),
    ("?", TokenKind::Nullable),
    ("(", TokenKind::OpenParen),
    (")", TokenKind::CloseParen),
    ("{", TokenKind::OpenCurly),
    ("}", TokenKind::CloseCurly),
    ("[", TokenKind::OpenSquare),
    ("]", TokenKind::CloseSquare),
    (";", TokenKind::Semicolon),
    (",", TokenKind::Comma),
    (":", TokenKind::Colon),
];

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: u32,
    in_php: bool,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            in_php: false,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Token> {
        while self.pos < self.src.len() {
            if self.in_php {
                self.php_token();
            } else {
                self.inline_html();
            }
        }
        self.tokens
    }

    fn push(&mut self, kind: TokenKind, len: usize) {
        let text = &self.src[self.pos..self.pos + len];
        self.tokens.push(Token::new(kind, text, self.line));
        self.line += text.matches('\n').count() as u32;
        self.pos += len;
    }

    fn inline_html(&mut self) {
        let rest = &self.src[self.pos..];
        match rest.find("<?php") {
            Some(0) => {
                self.push(TokenKind::OpenTag, 5);
                self.in_php = true;
            }
            Some(n) => self.push(TokenKind::InlineHtml, n),
            None => self.push(TokenKind::InlineHtml, rest.len()),
        }
    }

    fn php_token(&mut self) {
        let src = self.src;
        let rest = &src[self.pos..];
        let Some(c) = rest.chars().next() else {
            return;
        };

        if c.is_whitespace() {
            let n = rest.find(|c: char| !c.is_whitespace()).unwrap_or(rest.len());
            return self.push(TokenKind::Whitespace, n);
        }
        if rest.starts_with("?>") {
            self.in_php = false;
            return self.push(TokenKind::CloseTag, 2);
        }
        if rest.starts_with("/**") && !rest.starts_with("/**/") {
            return self.doc_comment();
        }
        if rest.starts_with("/*") {
            let n = rest.find("*/").map_or(rest.len(), |e| e + 2);
            return self.push(TokenKind::Comment, n);
        }
        if rest.starts_with("#[") {
            return self.push(TokenKind::AttributeStart, 2);
        }
        if rest.starts_with("//") || c == '#' {
            let n = rest.find('\n').unwrap_or(rest.len());
            return self.push(TokenKind::Comment, n);
        }
        if c == '$' && rest[1..].starts_with(is_name_start) {
            return self.push(TokenKind::Variable, 1 + name_len(&rest[1..]));
        }
        if is_name_start(c) || c == '\\' {
            let n = name_len(rest);
            let kind = self.word_kind(&rest[..n]);
            return self.push(kind, n);
        }
        if c.is_ascii_digit() {
            let n = rest
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '.' || c == '_'))
                .unwrap_or(rest.len());
            return self.push(TokenKind::Number, n);
        }
        if c == '\'' || c == '"' {
            return self.push(TokenKind::StringLiteral, quoted_len(rest, c));
        }

        for &(text, kind) in PUNCTUATION {
            if rest.starts_with(text) {
                let kind = if kind == TokenKind::Nullable && !self.in_type_position() {
                    TokenKind::Operator
                } else {
                    kind
                };
                return self.push(kind, text.len());
            }
        }
        self.push(TokenKind::Operator, c.len_utf8());
    }

    fn last_code(&self) -> Option<&Token> {
        self.tokens.iter().rev().find(|t| !t.kind.is_empty())
    }

    /// `?` is a nullable marker after `(`, `,` and `:`.
    fn in_type_position(&self) -> bool {
        self.last_code().is_some_and(|t| {
            matches!(
                t.kind,
                TokenKind::OpenParen | TokenKind::Comma | TokenKind::Colon
            )
        })
    }

    fn word_kind(&self, word: &str) -> TokenKind {
        // Member names after `->` are never keywords.
        if self
            .last_code()
            .is_some_and(|t| t.content == "->" || t.content == "?->")
        {
            return TokenKind::Identifier;
        }
        match word.to_ascii_lowercase().as_str() {
            "function" => TokenKind::Function,
            "fn" => TokenKind::Fn,
            "return" => TokenKind::Return,
            "throw" => TokenKind::Throw,
            "new" => TokenKind::New,
            "self" => TokenKind::SelfKeyword,
            "class" => TokenKind::Class,
            "interface" => TokenKind::Interface,
            "trait" => TokenKind::Trait,
            "enum" => TokenKind::Enum,
            "public" => TokenKind::Public,
            "protected" => TokenKind::Protected,
            "private" => TokenKind::Private,
            "static" => TokenKind::Static,
            "abstract" => TokenKind::Abstract,
            "final" => TokenKind::Final,
            "readonly" => TokenKind::Readonly,
            _ => TokenKind::Identifier,
        }
    }

    /// `/** … */` split the way PHP_CodeSniffer splits it.
    fn doc_comment(&mut self) {
        let src = self.src;
        let end = src[self.pos..]
            .find("*/")
            .map_or(src.len(), |e| self.pos + e + 2);
        let body_end = if src[..end].ends_with("*/") && end - self.pos >= 5 {
            end - 2
        } else {
            end
        };

        self.push(TokenKind::DocCommentOpenTag, 3);
        let mut expect_star = false;
        let mut line_has_content = false;
        while self.pos < body_end {
            let rest = &src[self.pos..body_end];
            let Some(c) = rest.chars().next() else {
                break;
            };
            if c == '\n' {
                self.push(TokenKind::DocCommentWhitespace, 1);
                expect_star = true;
                line_has_content = false;
                continue;
            }
            if c.is_whitespace() {
                let n = rest
                    .find(|c: char| !c.is_whitespace() || c == '\n')
                    .unwrap_or(rest.len());
                self.push(TokenKind::DocCommentWhitespace, n);
                continue;
            }
            if expect_star && c == '*' {
                self.push(TokenKind::DocCommentStar, 1);
                expect_star = false;
                continue;
            }
            expect_star = false;

            let line = &rest[..rest.find('\n').unwrap_or(rest.len())];
            if c == '@' && !line_has_content {
                let n = line.find(char::is_whitespace).unwrap_or(line.len());
                self.push(TokenKind::DocCommentTag, n);
            } else {
                self.push(TokenKind::DocCommentString, line.trim_end().len());
            }
            line_has_content = true;
        }
        if end > body_end {
            self.push(TokenKind::DocCommentCloseTag, 2);
        }
    }
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn name_len(text: &str) -> usize {
    text.find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '\\'))
        .unwrap_or(text.len())
}

fn quoted_len(text: &str, quote: char) -> usize {
    let mut escaped = false;
    for (i, c) in text.char_indices().skip(1) {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return i + 1;
        }
    }
    text.len()
}

// ─── Linting helpers ────────────────────────────────────────────────────────

/// Run every default sniff.
pub fn lint(source: &str, version: u32) -> Report {
    init_tracing();
    let tokens = stream(source);
    Linter::with_default_sniffs(PhpVersion::from_id(version))
        .process(&tokens, &TokenSignatureReflector)
}

/// Run only the function comment check.
pub fn lint_comments(source: &str, version: u32) -> Report {
    init_tracing();
    let tokens = stream(source);
    comment_linter(version).process(&tokens, &TokenSignatureReflector)
}

/// Fix with the function comment check and return the rewritten source.
pub fn fix(source: &str, version: u32) -> (String, FixOutcome) {
    init_tracing();
    let mut tokens = stream(source);
    let outcome = comment_linter(version).fix(&mut tokens, &TokenSignatureReflector);
    (tokens.to_source(), outcome)
}

fn comment_linter(version: u32) -> Linter {
    Linter::new(PhpVersion::from_id(version)).with_sniff(FunctionCommentCheck::new(StrictParamStrategy))
}

/// Finding codes in emission order, as strings for readable assertions.
pub fn codes(report: &Report) -> Vec<&'static str> {
    report.codes().into_iter().map(|c| c.as_str()).collect()
}

/// The rendered message of every finding with the given code.
pub fn messages(report: &Report, code: &str) -> Vec<String> {
    report
        .findings()
        .iter()
        .filter(|f| f.code.as_str() == code)
        .map(|f| f.message())
        .collect()
}
