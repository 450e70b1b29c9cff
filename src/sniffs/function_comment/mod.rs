//! Function and method doc comment checks.
//!
//! [`FunctionCommentCheck`] is the generic check: it locates the doc
//! comment of every `function` declaration and validates the parts every
//! coding standard agrees on (presence and style of the comment, `@see`
//! and `@throws` content, the `@return` tag).  Two decisions are delegated
//! to an injected [`CommentStrategy`]:
//!
//!   - whether the declaration needs a `@return` tag at all, and
//!   - how `@param` tags are validated.
//!
//! [`StrictParamStrategy`] is the full implementation: the return gate in
//! [`returns`], and the positional `@param` validation in [`params`] with
//! the alignment fixer in [`spacing`].  [`LenientStrategy`] asks every function
//! with a body for a `@return` tag and leaves parameters alone.
//!
//! A block containing `{@inheritdoc}` skips every check after the comment
//! has been located.

pub mod params;
pub mod returns;
pub mod spacing;

use crate::docblock::{CommentLocation, DocBlock, locate_comment};
use crate::report::FindingCode;
use crate::signature::declaration_name;
use crate::tokens::{TokenIndex, TokenKind, TokenStream};

use super::{Sniff, SniffContext};

/// The hooks a coding standard customises.
pub trait CommentStrategy {
    /// Whether `declaration` must document its return value.
    fn requires_return_tag(&self, tokens: &TokenStream, declaration: TokenIndex) -> bool;

    /// Validate the `@param` tags of `block` against the real signature.
    fn validate_params(&self, ctx: &mut SniffContext<'_>, declaration: TokenIndex, block: &DocBlock);
}

/// Positional `@param` validation with type hint inference, plus a
/// `@return` requirement only for functions that return a value.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictParamStrategy;

impl CommentStrategy for StrictParamStrategy {
    fn requires_return_tag(&self, tokens: &TokenStream, declaration: TokenIndex) -> bool {
        match returns::first_value_return(tokens, declaration) {
            Some(ret) => {
                tracing::debug!(
                    declaration = declaration.get(),
                    line = tokens.line(ret),
                    "value return found, @return required"
                );
                true
            }
            None => false,
        }
    }

    fn validate_params(&self, ctx: &mut SniffContext<'_>, declaration: TokenIndex, block: &DocBlock) {
        params::validate_params(ctx, declaration, block);
    }
}

/// Require `@return` on every declaration with a body; no parameter
/// checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct LenientStrategy;

impl CommentStrategy for LenientStrategy {
    fn requires_return_tag(&self, tokens: &TokenStream, declaration: TokenIndex) -> bool {
        tokens.links(declaration).scope_opener.is_some()
    }

    fn validate_params(&self, _ctx: &mut SniffContext<'_>, _declaration: TokenIndex, _block: &DocBlock) {}
}

/// The generic function comment check, parameterised by its strategy.
#[derive(Debug, Clone, Default)]
pub struct FunctionCommentCheck<S = StrictParamStrategy> {
    strategy: S,
}

impl<S: CommentStrategy> FunctionCommentCheck<S> {
    pub fn new(strategy: S) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }
}

impl<S: CommentStrategy> Sniff for FunctionCommentCheck<S> {
    fn name(&self) -> &'static str {
        "Commenting.FunctionComment"
    }

    fn register(&self) -> &'static [TokenKind] {
        &[TokenKind::Function]
    }

    fn process(&self, ctx: &mut SniffContext<'_>, ptr: TokenIndex) {
        let block = match locate_comment(ctx.tokens, ptr) {
            CommentLocation::Doc(block) => block,
            CommentLocation::WrongStyle(_) => {
                ctx.sink.add_error(
                    "You must use \"/**\" style comments for a function comment",
                    ptr,
                    FindingCode::WrongStyle,
                    Vec::new(),
                );
                return;
            }
            CommentLocation::Missing => {
                let name = declaration_name(ctx.tokens, ptr).unwrap_or_default();
                ctx.sink.add_error(
                    "Missing doc comment for function %s()",
                    ptr,
                    FindingCode::Missing,
                    vec![name],
                );
                return;
            }
        };

        check_spacing_after_comment(ctx, &block);

        if block.is_inherited(ctx.tokens) {
            tracing::debug!(declaration = ptr.get(), "inherited doc comment, skipping");
            return;
        }

        check_sees(ctx, &block);
        if self.strategy.requires_return_tag(ctx.tokens, ptr) {
            check_return_tag(ctx, ptr, &block);
        }
        check_throws(ctx, &block);
        self.strategy.validate_params(ctx, ptr, &block);
    }
}

/// The first code token after the comment must be on the next line.
fn check_spacing_after_comment(ctx: &mut SniffContext<'_>, block: &DocBlock) {
    let tokens = ctx.tokens;
    let Some(after) = tokens.next(block.closer) else {
        return;
    };
    let Some(code) = tokens.find_next(after, None, |t| t.kind != TokenKind::Whitespace) else {
        return;
    };
    if tokens.line(code) != tokens.line(block.closer) + 1 {
        ctx.sink.add_error(
            "There must be no blank lines after the function comment",
            block.closer,
            FindingCode::SpacingAfter,
            Vec::new(),
        );
    }
}

fn check_sees(ctx: &mut SniffContext<'_>, block: &DocBlock) {
    let tokens = ctx.tokens;
    for tag in block.tags_named(tokens, "@see") {
        let content = tokens.find_next_kind(&[TokenKind::DocCommentString], tag, Some(block.closer));
        let on_same_line = content.is_some_and(|c| tokens.line(c) == tokens.line(tag));
        if !on_same_line {
            ctx.sink.add_error(
                "Content missing for @see tag in function comment",
                tag,
                FindingCode::EmptySees,
                Vec::new(),
            );
        }
    }
}

fn check_throws(ctx: &mut SniffContext<'_>, block: &DocBlock) {
    let tokens = ctx.tokens;
    for tag in block.tags_named(tokens, "@throws") {
        let exception = tokens
            .step(tag, 2)
            .filter(|&t| tokens.kind(t) == TokenKind::DocCommentString)
            .and_then(|t| tokens.content(t).split_whitespace().next());
        if exception.is_none() {
            ctx.sink.add_error(
                "Exception type missing for @throws tag in function comment",
                tag,
                FindingCode::InvalidThrows,
                Vec::new(),
            );
        }
    }
}

/// The `@return` tag checks shared by every strategy.
pub fn check_return_tag(ctx: &mut SniffContext<'_>, declaration: TokenIndex, block: &DocBlock) {
    let tokens = ctx.tokens;
    let mut found = None;
    for tag in block.tags_named(tokens, "@return") {
        if found.is_some() {
            ctx.sink.add_error(
                "Only 1 @return tag is allowed in a function comment",
                tag,
                FindingCode::DuplicateReturn,
                Vec::new(),
            );
            return;
        }
        found = Some(tag);
    }

    let name = declaration_name(tokens, declaration);
    if matches!(name.as_deref(), Some("__construct" | "__destruct")) {
        return;
    }

    match found {
        Some(tag) => {
            let has_type = tokens
                .step(tag, 2)
                .is_some_and(|t| {
                    tokens.kind(t) == TokenKind::DocCommentString && !tokens.content(t).is_empty()
                });
            if !has_type {
                ctx.sink.add_error(
                    "Return type missing for @return tag in function comment",
                    tag,
                    FindingCode::MissingReturnType,
                    Vec::new(),
                );
            }
        }
        None => ctx.sink.add_error(
            "Missing @return tag in function comment",
            block.closer,
            FindingCode::MissingReturn,
            Vec::new(),
        ),
    }
}
