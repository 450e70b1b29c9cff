//! Signature reflection.
//!
//! The parameter checks need the real parameter list of a declaration.
//! Hosts that already reflect signatures implement [`SignatureReflector`];
//! [`TokenSignatureReflector`] reads it from the token stream, using the
//! parenthesis pair the structure pass attached to the `function` token.

use crate::tokens::{TokenIndex, TokenKind, TokenStream};

/// A parameter of the real signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealParameter {
    /// The name including the `$` prefix (e.g. `"$text"`).
    pub name: String,
    /// The declared type hint as written, without whitespace (e.g.
    /// `"?int"`, `"\\App\\User"`); empty when undeclared.
    pub type_hint: String,
    /// Whether the parameter is variadic (`...$rest`).
    pub is_variadic: bool,
    /// Whether the parameter is passed by reference (`&$out`).
    pub is_reference: bool,
    /// Whether the parameter has a default value.
    pub has_default: bool,
}

impl RealParameter {
    pub fn new(name: impl Into<String>, type_hint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_hint: type_hint.into(),
            is_variadic: false,
            is_reference: false,
            has_default: false,
        }
    }

    pub fn variadic(mut self) -> Self {
        self.is_variadic = true;
        self
    }
}

/// Supplies the ordered parameter list of a declaration.
pub trait SignatureReflector {
    fn parameters(&self, tokens: &TokenStream, declaration: TokenIndex) -> Vec<RealParameter>;
}

/// Reads parameters straight from the declaration's parenthesis pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenSignatureReflector;

impl SignatureReflector for TokenSignatureReflector {
    fn parameters(&self, tokens: &TokenStream, declaration: TokenIndex) -> Vec<RealParameter> {
        let links = tokens.links(declaration);
        let (Some(open), Some(close)) = (links.parenthesis_opener, links.parenthesis_closer) else {
            return Vec::new();
        };

        let mut params = Vec::new();
        let mut current = ParamBuilder::default();
        let mut i = tokens.next(open);
        while let Some(idx) = i {
            if idx >= close {
                break;
            }
            let token = tokens.token(idx);
            match token.kind {
                // Nested brackets (defaults like `[1, 2]`, attributes) are
                // skipped wholesale so their commas don't split the list.
                kind if kind.is_opening_bracket() => {
                    if current.in_default || kind == TokenKind::AttributeStart {
                        i = token.links.bracket_pair.and_then(|p| tokens.next(p));
                        continue;
                    }
                    // `(A&B)|null` DNF types.
                    current.type_hint.push_str(&token.content);
                }
                TokenKind::Comma => {
                    if let Some(param) = current.finish() {
                        params.push(param);
                    }
                    current = ParamBuilder::default();
                }
                _ if current.in_default => {}
                TokenKind::Assignment => current.in_default = true,
                TokenKind::Ellipsis => current.is_variadic = true,
                TokenKind::Ampersand if current.name.is_none() && !current.type_hint.is_empty() => {
                    // `A&B $x` intersection vs `A &$x` by-reference: decided
                    // by what follows.
                    let next_code = tokens.find_next(
                        tokens.next(idx).unwrap_or(close),
                        Some(close),
                        |t| !t.kind.is_empty(),
                    );
                    if next_code.is_some_and(|n| {
                        matches!(tokens.kind(n), TokenKind::Variable | TokenKind::Ellipsis)
                    }) {
                        current.is_reference = true;
                    } else {
                        current.type_hint.push('&');
                    }
                }
                TokenKind::Ampersand => current.is_reference = true,
                TokenKind::Variable => current.name = Some(token.content.clone()),
                kind if kind.is_empty() || kind.is_method_prefix() => {}
                _ if current.name.is_none() => current.type_hint.push_str(&token.content),
                _ => {}
            }
            i = tokens.next(idx);
        }
        if let Some(param) = current.finish() {
            params.push(param);
        }
        params
    }
}

#[derive(Default)]
struct ParamBuilder {
    name: Option<String>,
    type_hint: String,
    is_variadic: bool,
    is_reference: bool,
    in_default: bool,
}

impl ParamBuilder {
    fn finish(self) -> Option<RealParameter> {
        Some(RealParameter {
            name: self.name?,
            type_hint: self.type_hint,
            is_variadic: self.is_variadic,
            is_reference: self.is_reference,
            has_default: self.in_default,
        })
    }
}

/// The declared name of a function (`function &name(`), if any.
pub fn declaration_name(tokens: &TokenStream, declaration: TokenIndex) -> Option<String> {
    let end = tokens.links(declaration).parenthesis_opener;
    let start = tokens.next(declaration)?;
    let name = tokens.find_next(start, end, |t| {
        matches!(t.kind, TokenKind::Identifier | TokenKind::SelfKeyword)
    })?;
    Some(tokens.content(name).to_string())
}
