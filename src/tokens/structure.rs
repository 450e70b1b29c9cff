//! Structural annotation of a flat token list.
//!
//! Computes the same metadata PHP_CodeSniffer attaches to its tokens:
//!
//! 1. bracket pairs (`()`, `{}`, `[]`, and `#[` … `]`),
//! 2. the nested parenthesis stack of every token,
//! 3. parenthesis owners (`function`, closures, `fn`),
//! 4. scope opener/closer for functions, closures, arrow functions and
//!    class-likes,
//! 5. doc comment openers, closers and `@tag` lists.
//!
//! A `function` keyword directly followed by `(` (optionally through `&`)
//! is reclassified as [`TokenKind::Closure`].

use super::{Token, TokenIndex, TokenKind};

pub(super) fn annotate(tokens: &mut [Token]) {
    reclassify_closures(tokens);
    pair_brackets(tokens);
    nest_parentheses(tokens);
    assign_parenthesis_owners(tokens);
    assign_scopes(tokens);
    link_doc_comments(tokens);
}

fn next_code(tokens: &[Token], from: usize) -> Option<usize> {
    (from..tokens.len()).find(|&i| !tokens[i].kind.is_empty())
}

fn prev_code(tokens: &[Token], before: usize) -> Option<usize> {
    (0..before).rev().find(|&i| !tokens[i].kind.is_empty())
}

fn reclassify_closures(tokens: &mut [Token]) {
    for i in 0..tokens.len() {
        if tokens[i].kind != TokenKind::Function {
            continue;
        }
        let mut next = next_code(tokens, i + 1);
        if let Some(n) = next
            && tokens[n].kind == TokenKind::Ampersand
        {
            next = next_code(tokens, n + 1);
        }
        if let Some(n) = next
            && tokens[n].kind == TokenKind::OpenParen
        {
            tokens[i].kind = TokenKind::Closure;
        }
    }
}

fn pair_brackets(tokens: &mut [Token]) {
    let mut stack: Vec<usize> = Vec::new();
    for i in 0..tokens.len() {
        let kind = tokens[i].kind;
        if kind.is_opening_bracket() {
            stack.push(i);
            continue;
        }
        if !kind.is_closing_bracket() {
            continue;
        }
        // Unbalanced input: drop openers that cannot close here.
        while let Some(&open) = stack.last() {
            if closes(tokens[open].kind, kind) {
                stack.pop();
                tokens[open].links.bracket_pair = Some(TokenIndex(i));
                tokens[i].links.bracket_pair = Some(TokenIndex(open));
                break;
            }
            if stack.iter().any(|&o| closes(tokens[o].kind, kind)) {
                stack.pop();
            } else {
                break;
            }
        }
    }
}

fn closes(open: TokenKind, close: TokenKind) -> bool {
    matches!(
        (open, close),
        (TokenKind::OpenParen, TokenKind::CloseParen)
            | (TokenKind::OpenCurly, TokenKind::CloseCurly)
            | (TokenKind::OpenSquare, TokenKind::CloseSquare)
            | (TokenKind::AttributeStart, TokenKind::CloseSquare)
    )
}

fn nest_parentheses(tokens: &mut [Token]) {
    let mut stack: Vec<(TokenIndex, TokenIndex)> = Vec::new();
    for i in 0..tokens.len() {
        match tokens[i].kind {
            TokenKind::OpenParen => {
                tokens[i].links.nested_parentheses = stack.clone();
                if let Some(close) = tokens[i].links.bracket_pair {
                    stack.push((TokenIndex(i), close));
                }
            }
            TokenKind::CloseParen => {
                if stack.last().is_some_and(|&(_, close)| close.0 == i) {
                    stack.pop();
                }
                tokens[i].links.nested_parentheses = stack.clone();
            }
            _ => tokens[i].links.nested_parentheses = stack.clone(),
        }
    }
}

fn assign_parenthesis_owners(tokens: &mut [Token]) {
    for i in 0..tokens.len() {
        if tokens[i].kind != TokenKind::OpenParen {
            continue;
        }
        let Some(close) = tokens[i].links.bracket_pair else {
            continue;
        };
        let Some(owner) = parenthesis_owner(tokens, i) else {
            continue;
        };
        tokens[i].links.parenthesis_owner = Some(TokenIndex(owner));
        tokens[close.0].links.parenthesis_owner = Some(TokenIndex(owner));
        tokens[owner].links.parenthesis_opener = Some(TokenIndex(i));
        tokens[owner].links.parenthesis_closer = Some(close);
    }
}

/// `function name(`, `function &name(`, `function (`, `fn (` and `fn&(`.
fn parenthesis_owner(tokens: &[Token], open: usize) -> Option<usize> {
    let mut prev = prev_code(tokens, open)?;
    match tokens[prev].kind {
        TokenKind::Closure | TokenKind::Fn => return Some(prev),
        TokenKind::Ampersand => {
            prev = prev_code(tokens, prev)?;
            return matches!(tokens[prev].kind, TokenKind::Closure | TokenKind::Fn)
                .then_some(prev);
        }
        TokenKind::Identifier | TokenKind::SelfKeyword => {}
        _ => return None,
    }
    let mut keyword = prev_code(tokens, prev)?;
    if tokens[keyword].kind == TokenKind::Ampersand {
        keyword = prev_code(tokens, keyword)?;
    }
    (tokens[keyword].kind == TokenKind::Function).then_some(keyword)
}

fn assign_scopes(tokens: &mut [Token]) {
    for i in 0..tokens.len() {
        let scope = match tokens[i].kind {
            TokenKind::Function | TokenKind::Closure => function_scope(tokens, i),
            TokenKind::Fn => arrow_scope(tokens, i),
            TokenKind::Class | TokenKind::Interface | TokenKind::Trait | TokenKind::Enum => {
                class_scope(tokens, i)
            }
            _ => None,
        };
        if let Some((opener, closer)) = scope {
            tokens[i].links.scope_opener = Some(TokenIndex(opener));
            tokens[i].links.scope_closer = Some(TokenIndex(closer));
        }
    }
}

/// Body of a function: the first `{` after the parameter list, unless a
/// `;` (abstract / interface method) comes first.
fn function_scope(tokens: &[Token], owner: usize) -> Option<(usize, usize)> {
    let mut i = tokens[owner].links.parenthesis_closer?.0 + 1;
    while i < tokens.len() {
        match tokens[i].kind {
            TokenKind::OpenCurly => {
                let close = tokens[i].links.bracket_pair?;
                return Some((i, close.0));
            }
            TokenKind::Semicolon => return None,
            // `use (...)` clauses and return types like `array|(A&B)`.
            TokenKind::OpenParen | TokenKind::OpenSquare | TokenKind::AttributeStart => {
                i = tokens[i].links.bracket_pair?.0 + 1;
            }
            _ => i += 1,
        }
    }
    None
}

/// Arrow function: opens at `=>`, closes on the `;` or `,` that ends the
/// expression, or on the last token before an unmatched closing bracket.
fn arrow_scope(tokens: &[Token], owner: usize) -> Option<(usize, usize)> {
    let params_close = tokens[owner].links.parenthesis_closer?.0;
    let arrow = (params_close + 1..tokens.len()).find(|&i| tokens[i].kind == TokenKind::DoubleArrow)?;
    let mut i = arrow + 1;
    while i < tokens.len() {
        let kind = tokens[i].kind;
        if kind.is_opening_bracket() {
            i = tokens[i].links.bracket_pair?.0 + 1;
            continue;
        }
        if matches!(kind, TokenKind::Semicolon | TokenKind::Comma) {
            return Some((arrow, i));
        }
        if kind.is_closing_bracket() {
            return Some((arrow, prev_code(tokens, i)?));
        }
        i += 1;
    }
    None
}

fn class_scope(tokens: &[Token], owner: usize) -> Option<(usize, usize)> {
    let mut i = owner + 1;
    while i < tokens.len() {
        match tokens[i].kind {
            TokenKind::OpenCurly => {
                let close = tokens[i].links.bracket_pair?;
                return Some((i, close.0));
            }
            TokenKind::Semicolon => return None,
            TokenKind::OpenParen => i = tokens[i].links.bracket_pair?.0 + 1,
            _ => i += 1,
        }
    }
    None
}

fn link_doc_comments(tokens: &mut [Token]) {
    let mut i = 0;
    while i < tokens.len() {
        if tokens[i].kind != TokenKind::DocCommentOpenTag {
            i += 1;
            continue;
        }
        let mut tags = Vec::new();
        let mut j = i + 1;
        let mut closer = None;
        while j < tokens.len() {
            match tokens[j].kind {
                TokenKind::DocCommentTag => tags.push(TokenIndex(j)),
                TokenKind::DocCommentCloseTag => {
                    closer = Some(j);
                    break;
                }
                TokenKind::DocCommentWhitespace
                | TokenKind::DocCommentStar
                | TokenKind::DocCommentString => {}
                // Unterminated block.
                _ => break,
            }
            j += 1;
        }
        tokens[i].links.comment_tags = tags;
        if let Some(close) = closer {
            tokens[i].links.comment_closer = Some(TokenIndex(close));
            tokens[close].links.comment_opener = Some(TokenIndex(i));
        }
        i = j.max(i + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::TokenStream;

    fn tok(kind: TokenKind, content: &str) -> Token {
        Token::new(kind, content, 1)
    }

    #[test]
    fn pairs_and_owns_function_parentheses() {
        // function foo($a) { return; }
        let stream = TokenStream::annotated(vec![
            tok(TokenKind::Function, "function"),
            tok(TokenKind::Whitespace, " "),
            tok(TokenKind::Identifier, "foo"),
            tok(TokenKind::OpenParen, "("),
            tok(TokenKind::Variable, "$a"),
            tok(TokenKind::CloseParen, ")"),
            tok(TokenKind::Whitespace, " "),
            tok(TokenKind::OpenCurly, "{"),
            tok(TokenKind::Return, "return"),
            tok(TokenKind::Semicolon, ";"),
            tok(TokenKind::CloseCurly, "}"),
        ]);
        let function = stream.links(TokenIndex(0));
        assert_eq!(function.parenthesis_opener, Some(TokenIndex(3)));
        assert_eq!(function.parenthesis_closer, Some(TokenIndex(5)));
        assert_eq!(function.scope_opener, Some(TokenIndex(7)));
        assert_eq!(function.scope_closer, Some(TokenIndex(10)));
        assert_eq!(
            stream.links(TokenIndex(4)).nested_parentheses,
            vec![(TokenIndex(3), TokenIndex(5))]
        );
        assert_eq!(
            stream.links(TokenIndex(3)).parenthesis_owner,
            Some(TokenIndex(0))
        );
    }

    #[test]
    fn anonymous_function_is_reclassified() {
        let stream = TokenStream::annotated(vec![
            tok(TokenKind::Function, "function"),
            tok(TokenKind::Whitespace, " "),
            tok(TokenKind::OpenParen, "("),
            tok(TokenKind::CloseParen, ")"),
            tok(TokenKind::OpenCurly, "{"),
            tok(TokenKind::CloseCurly, "}"),
        ]);
        assert_eq!(stream.kind(TokenIndex(0)), TokenKind::Closure);
        assert_eq!(
            stream.links(TokenIndex(0)).scope_closer,
            Some(TokenIndex(5))
        );
    }

    #[test]
    fn abstract_method_has_no_scope() {
        let stream = TokenStream::annotated(vec![
            tok(TokenKind::Abstract, "abstract"),
            tok(TokenKind::Function, "function"),
            tok(TokenKind::Identifier, "run"),
            tok(TokenKind::OpenParen, "("),
            tok(TokenKind::CloseParen, ")"),
            tok(TokenKind::Semicolon, ";"),
        ]);
        assert_eq!(stream.links(TokenIndex(1)).scope_opener, None);
    }

    #[test]
    fn doc_comment_tags_are_collected() {
        let stream = TokenStream::annotated(vec![
            tok(TokenKind::DocCommentOpenTag, "/**"),
            tok(TokenKind::DocCommentWhitespace, " "),
            tok(TokenKind::DocCommentTag, "@param"),
            tok(TokenKind::DocCommentWhitespace, " "),
            tok(TokenKind::DocCommentString, "int $a"),
            tok(TokenKind::DocCommentWhitespace, " "),
            tok(TokenKind::DocCommentTag, "@return"),
            tok(TokenKind::DocCommentWhitespace, " "),
            tok(TokenKind::DocCommentCloseTag, "*/"),
        ]);
        let open = stream.links(TokenIndex(0));
        assert_eq!(open.comment_tags, vec![TokenIndex(2), TokenIndex(6)]);
        assert_eq!(open.comment_closer, Some(TokenIndex(8)));
        assert_eq!(
            stream.links(TokenIndex(8)).comment_opener,
            Some(TokenIndex(0))
        );
    }

    #[test]
    fn arrow_function_closes_on_semicolon() {
        // fn($x) => $x;
        let stream = TokenStream::annotated(vec![
            tok(TokenKind::Fn, "fn"),
            tok(TokenKind::OpenParen, "("),
            tok(TokenKind::Variable, "$x"),
            tok(TokenKind::CloseParen, ")"),
            tok(TokenKind::Whitespace, " "),
            tok(TokenKind::DoubleArrow, "=>"),
            tok(TokenKind::Whitespace, " "),
            tok(TokenKind::Variable, "$x"),
            tok(TokenKind::Semicolon, ";"),
        ]);
        let links = stream.links(TokenIndex(0));
        assert_eq!(links.scope_opener, Some(TokenIndex(5)));
        assert_eq!(links.scope_closer, Some(TokenIndex(8)));
    }
}
