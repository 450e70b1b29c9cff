//! The return gate: does a function body return a value?
//!
//! Only `return <expr>;` counts.  A bare `return;` does not, and neither
//! does anything returned from a closure or arrow function nested in the
//! body: their bodies are jumped over as a whole.

use crate::tokens::{TokenIndex, TokenKind, TokenStream};

/// The first `return` in the body of `declaration` that carries a value.
///
/// Declarations without a body (abstract and interface methods) never
/// return a value.
pub fn first_value_return(tokens: &TokenStream, declaration: TokenIndex) -> Option<TokenIndex> {
    let links = tokens.links(declaration);
    let (opener, closer) = (links.scope_opener?, links.scope_closer?);

    let mut cursor = tokens.next(opener);
    while let Some(i) = cursor {
        if i >= closer {
            break;
        }
        match tokens.kind(i) {
            TokenKind::Closure | TokenKind::Fn => {
                if let Some(end) = tokens.links(i).scope_closer {
                    cursor = tokens.next(end);
                    continue;
                }
            }
            TokenKind::Return if returns_value(tokens, i) => return Some(i),
            _ => {}
        }
        cursor = tokens.next(i);
    }
    None
}

/// Whether anything but whitespace follows `ret` before the statement ends.
fn returns_value(tokens: &TokenStream, ret: TokenIndex) -> bool {
    let Some(after) = tokens.next(ret) else {
        return false;
    };
    tokens
        .find_next(after, None, |t| t.kind != TokenKind::Whitespace)
        .is_some_and(|next| !matches!(tokens.kind(next), TokenKind::Semicolon | TokenKind::CloseTag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::Token;

    fn tok(kind: TokenKind, content: &str) -> Token {
        Token::new(kind, content, 1)
    }

    fn body(inner: Vec<Token>) -> TokenStream {
        let mut tokens = vec![
            tok(TokenKind::Function, "function"),
            tok(TokenKind::Whitespace, " "),
            tok(TokenKind::Identifier, "f"),
            tok(TokenKind::OpenParen, "("),
            tok(TokenKind::CloseParen, ")"),
            tok(TokenKind::Whitespace, " "),
            tok(TokenKind::OpenCurly, "{"),
        ];
        tokens.extend(inner);
        tokens.push(tok(TokenKind::CloseCurly, "}"));
        TokenStream::annotated(tokens)
    }

    #[test]
    fn bare_return_is_not_a_value() {
        let tokens = body(vec![
            tok(TokenKind::Return, "return"),
            tok(TokenKind::Whitespace, " "),
            tok(TokenKind::Semicolon, ";"),
        ]);
        assert_eq!(first_value_return(&tokens, TokenIndex(0)), None);
    }

    #[test]
    fn value_return_is_found() {
        let tokens = body(vec![
            tok(TokenKind::Return, "return"),
            tok(TokenKind::Whitespace, " "),
            tok(TokenKind::Number, "1"),
            tok(TokenKind::Semicolon, ";"),
        ]);
        assert_eq!(first_value_return(&tokens, TokenIndex(0)), Some(TokenIndex(7)));
    }

    #[test]
    fn comment_after_return_counts_as_a_value() {
        let tokens = body(vec![
            tok(TokenKind::Return, "return"),
            tok(TokenKind::Whitespace, " "),
            tok(TokenKind::Comment, "/* none */"),
            tok(TokenKind::Semicolon, ";"),
        ]);
        assert!(first_value_return(&tokens, TokenIndex(0)).is_some());
    }

    #[test]
    fn closure_returns_are_skipped() {
        // $f = function () { return 1; };
        let tokens = body(vec![
            tok(TokenKind::Variable, "$f"),
            tok(TokenKind::Assignment, "="),
            tok(TokenKind::Function, "function"),
            tok(TokenKind::OpenParen, "("),
            tok(TokenKind::CloseParen, ")"),
            tok(TokenKind::OpenCurly, "{"),
            tok(TokenKind::Return, "return"),
            tok(TokenKind::Whitespace, " "),
            tok(TokenKind::Number, "1"),
            tok(TokenKind::Semicolon, ";"),
            tok(TokenKind::CloseCurly, "}"),
            tok(TokenKind::Semicolon, ";"),
        ]);
        assert_eq!(tokens.kind(TokenIndex(9)), TokenKind::Closure);
        assert_eq!(first_value_return(&tokens, TokenIndex(0)), None);
    }

    #[test]
    fn no_body_means_no_return() {
        let tokens = TokenStream::annotated(vec![
            tok(TokenKind::Function, "function"),
            tok(TokenKind::Whitespace, " "),
            tok(TokenKind::Identifier, "f"),
            tok(TokenKind::OpenParen, "("),
            tok(TokenKind::CloseParen, ")"),
            tok(TokenKind::Semicolon, ";"),
        ]);
        assert_eq!(first_value_return(&tokens, TokenIndex(0)), None);
    }
}
