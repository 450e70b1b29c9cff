//! PHPDoc function comment validation and fixing.
//!
//! The crate checks that the doc comment of every PHP function and method
//! agrees with the real signature: one `@param` per parameter, in order,
//! with matching names, type hints derivable from the documented type,
//! aligned columns and well-formed descriptions; a `@return` tag when the
//! body returns a value.  Alignment problems come with a transactional
//! fix.
//!
//! Tokenizing PHP is the host's job.  It hands over a [`TokenStream`] and
//! a [`SignatureReflector`], and receives findings through a
//! [`DiagnosticSink`] and edits through a [`TextEditor`]:
//!
//! ```text
//! tokens ─▶ Linter ─▶ sniffs ─▶ Report
//!                        └─────▶ Fixer ─▶ tokens (next pass)
//! ```
//!
//! # Modules
//!
//! - [`tokens`]: the token stream adapter and its structural links.
//! - [`docblock`]: comment location, `@param` extraction, type hints.
//! - [`signature`]: real parameter lists.
//! - [`sniffs`]: the function comment check and three token rules.
//! - [`linter`]: sniff dispatch and the fix loop.
//! - [`report`], [`fixer`]: the diagnostic and editing surfaces.
//! - [`config`]: the `php_version` option.

pub mod config;
pub mod docblock;
pub mod fixer;
pub mod linter;
pub mod report;
pub mod signature;
pub mod sniffs;
pub mod tokens;

// ─── Re-exports ─────────────────────────────────────────────────────────────

pub use config::{ConfigError, LintConfig, PhpVersion};
pub use fixer::{Changeset, Fixer, TextEditor};
pub use linter::{FixOutcome, Linter, MAX_FIX_PASSES};
pub use report::{DiagnosticSink, Finding, FindingCode, Report, Severity};
pub use signature::{RealParameter, SignatureReflector, TokenSignatureReflector};
pub use sniffs::{
    CommentStrategy, FunctionCommentCheck, LenientStrategy, Sniff, SniffContext,
    StrictParamStrategy,
};
pub use tokens::{Links, Token, TokenIndex, TokenKind, TokenStream};
