//! Throwing the generic SPL base exceptions directly.

use crate::report::FindingCode;
use crate::tokens::{TokenIndex, TokenKind};

use super::{Sniff, SniffContext};

/// Exception classes too broad for callers to handle meaningfully.
pub const GENERIC_EXCEPTIONS: &[&str] = &["ErrorException", "RuntimeException", "Exception"];

#[derive(Debug, Clone, Copy, Default)]
pub struct GenericExceptionsSniff;

impl Sniff for GenericExceptionsSniff {
    fn name(&self) -> &'static str {
        "Exceptions.GenericExceptions"
    }

    fn register(&self) -> &'static [TokenKind] {
        &[TokenKind::Throw]
    }

    fn process(&self, ctx: &mut SniffContext<'_>, ptr: TokenIndex) {
        let tokens = ctx.tokens;
        let Some(start) = tokens.next(ptr) else {
            return;
        };
        let end = tokens.find_next_kind(&[TokenKind::Semicolon], start, None);
        let Some(class) = tokens.find_next_kind(&[TokenKind::Identifier], start, end) else {
            return;
        };

        // `throw new \Exception()` names the same class.
        let name = tokens.content(class).trim_start_matches('\\');
        if GENERIC_EXCEPTIONS.contains(&name) {
            ctx.sink.add_error(
                "Generic exceptions ErrorException, RuntimeException and Exception should not be thrown",
                ptr,
                FindingCode::GenericExceptionsShouldNotBeThrown,
                Vec::new(),
            );
        }
    }
}
