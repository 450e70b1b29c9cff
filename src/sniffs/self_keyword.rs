//! `self` where late static binding is expected.
//!
//! `self::` always resolves to the declaring class; `static::` resolves
//! to the called class.  Signatures are exempt: `static` is not valid in
//! a parameter list.

use crate::report::FindingCode;
use crate::tokens::{TokenIndex, TokenKind, TokenStream};

use super::{Sniff, SniffContext};

#[derive(Debug, Clone, Copy, Default)]
pub struct SelfKeywordSniff;

impl Sniff for SelfKeywordSniff {
    fn name(&self) -> &'static str {
        "Constant.SelfKeyword"
    }

    fn register(&self) -> &'static [TokenKind] {
        &[TokenKind::SelfKeyword]
    }

    fn process(&self, ctx: &mut SniffContext<'_>, ptr: TokenIndex) {
        if in_function_signature(ctx.tokens, ptr) {
            return;
        }
        ctx.sink.add_warning(
            "Please use STATIC instead of SELF",
            ptr,
            FindingCode::Invalid,
            Vec::new(),
        );
    }
}

/// Whether `ptr` sits inside the outermost parenthesis pair and that pair
/// belongs to a named function declaration.
fn in_function_signature(tokens: &TokenStream, ptr: TokenIndex) -> bool {
    let Some(&(open, close)) = tokens.links(ptr).nested_parentheses.first() else {
        return false;
    };
    open < ptr
        && ptr < close
        && tokens
            .links(open)
            .parenthesis_owner
            .is_some_and(|owner| tokens.kind(owner) == TokenKind::Function)
}
