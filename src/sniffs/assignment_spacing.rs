//! Whitespace around assignment operators.

use crate::report::FindingCode;
use crate::tokens::{TokenIndex, TokenKind};

use super::{Sniff, SniffContext};

#[derive(Debug, Clone, Copy, Default)]
pub struct AssignmentSpacingSniff;

impl Sniff for AssignmentSpacingSniff {
    fn name(&self) -> &'static str {
        "WhiteSpace.AssignmentSpacing"
    }

    fn register(&self) -> &'static [TokenKind] {
        &[TokenKind::Assignment]
    }

    fn process(&self, ctx: &mut SniffContext<'_>, ptr: TokenIndex) {
        let tokens = ctx.tokens;
        let spaced = tokens.predecessor(ptr).kind == TokenKind::Whitespace
            && tokens.successor(ptr).kind == TokenKind::Whitespace;
        if !spaced {
            ctx.sink.add_error(
                "Add a single space around assignment operators",
                ptr,
                FindingCode::Invalid,
                Vec::new(),
            );
        }
    }
}
