//! Sniffs: token-triggered checks.
//!
//! A sniff registers the token kinds it listens on; the
//! [`Linter`](crate::Linter) calls [`Sniff::process`] for every matching
//! token, in stream order.
//!
//! - [`function_comment`]: the doc comment check for functions and methods
//!   (location, `@return`, `@throws`, `@see`, and the `@param` pipeline).
//! - [`self_keyword`]: `self` used where `static` is expected.
//! - [`generic_exceptions`]: throwing `Exception`, `RuntimeException` or
//!   `ErrorException` directly.
//! - [`assignment_spacing`]: assignment operators without surrounding
//!   whitespace.

pub mod assignment_spacing;
pub mod function_comment;
pub mod generic_exceptions;
pub mod self_keyword;

use crate::config::PhpVersion;
use crate::fixer::TextEditor;
use crate::report::DiagnosticSink;
use crate::signature::SignatureReflector;
use crate::tokens::{TokenIndex, TokenKind, TokenStream};

pub use assignment_spacing::AssignmentSpacingSniff;
pub use function_comment::{
    CommentStrategy, FunctionCommentCheck, LenientStrategy, StrictParamStrategy,
};
pub use generic_exceptions::GenericExceptionsSniff;
pub use self_keyword::SelfKeywordSniff;

/// Everything a sniff sees while processing one token.
pub struct SniffContext<'a> {
    pub tokens: &'a TokenStream,
    pub reflector: &'a dyn SignatureReflector,
    /// The session's effective PHP version.
    pub version: PhpVersion,
    pub sink: &'a mut dyn DiagnosticSink,
    pub editor: &'a mut dyn TextEditor,
}

pub trait Sniff {
    /// Dotted name used to qualify finding codes, e.g.
    /// `"Commenting.FunctionComment"`.
    fn name(&self) -> &'static str;

    /// Token kinds this sniff is called for.
    fn register(&self) -> &'static [TokenKind];

    fn process(&self, ctx: &mut SniffContext<'_>, ptr: TokenIndex);
}
