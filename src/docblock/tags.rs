//! `@param` tag extraction.
//!
//! Each `@param` tag is followed (after one whitespace token) by a single
//! free-text token such as
//!
//! ```text
//! @param string[]  $names   The names to greet, one per
//!                           line of output.
//! ```
//!
//! [`parse_param_text`] splits that text into named captures:
//!
//! ```text
//! type      := everything up to the first '$', '&' or '.'
//! variable  := ['...'] ('$' | '&') non-whitespace+
//! gap       := whitespace+
//! rest      := description
//! ```
//!
//! [`extract_param_tags`] runs it over every tag in a block and gathers the
//! continuation lines of each description together with their indent, so
//! the spacing fixer can re-indent them later.

use crate::report::FindingCode;
use crate::tokens::{TokenIndex, TokenKind, TokenStream};

use super::locator::DocBlock;
use super::types::{TypeMember, split_union};

/// The tag keyword this module extracts.
pub const PARAM_TAG: &str = "@param";

/// Named captures of one `@param` text token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParamText<'a> {
    /// The type expression, without surrounding whitespace.
    pub type_expression: &'a str,
    /// Whitespace width between the type and the variable.
    pub type_spacing: usize,
    /// The variable including its sigil and optional `...` prefix.
    pub variable: Option<&'a str>,
    /// Whitespace width between the variable and the description.
    pub variable_spacing: usize,
    pub description: Option<&'a str>,
}

/// Split `@param` free text into type, variable and description.
///
/// Never fails: text that does not follow the expected shape yields a
/// record with the missing parts left empty.
pub fn parse_param_text(text: &str) -> ParamText<'_> {
    let type_end = text.find(['$', '&', '.']).unwrap_or(text.len());
    let type_run = &text[..type_end];
    let type_expression = type_run.trim();
    let type_spacing = width(type_run) - width(type_expression);

    let mut parsed = ParamText {
        type_expression,
        type_spacing,
        ..ParamText::default()
    };

    let rest = &text[type_end..];
    let Some(variable_len) = variable_length(rest) else {
        return parsed;
    };
    let (variable, after) = rest.split_at(variable_len);
    parsed.variable = Some(variable);

    let description = after.trim_start();
    if !description.is_empty() && description.len() < after.len() {
        parsed.variable_spacing = width(&after[..after.len() - description.len()]);
        parsed.description = Some(description.trim_end());
    }
    parsed
}

/// Length in bytes of a `['...'] ('$' | '&') non-whitespace+` prefix.
fn variable_length(text: &str) -> Option<usize> {
    let ellipsis = if text.starts_with("...") { 3 } else { 0 };
    let after_ellipsis = &text[ellipsis..];
    let sigil = after_ellipsis.chars().next().filter(|c| matches!(c, '$' | '&'))?;
    let name = &after_ellipsis[sigil.len_utf8()..];
    let name_len = name.find(char::is_whitespace).unwrap_or(name.len());
    (name_len > 0).then_some(ellipsis + sigil.len_utf8() + name_len)
}

/// Display width used for column alignment.
pub fn width(text: &str) -> usize {
    text.chars().count()
}

/// One physical line of a parameter description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionLine {
    pub text: String,
    /// The doc comment string token holding the line.
    pub token: TokenIndex,
    /// Width of the whitespace before the line's text.
    pub indent: usize,
}

/// A `@param` tag as extracted from the block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamTag {
    pub tag: TokenIndex,
    /// The free-text token after the tag, when there is one.
    pub text_token: Option<TokenIndex>,
    pub type_expression: String,
    pub type_members: Vec<TypeMember>,
    pub type_spacing: usize,
    pub variable: String,
    pub variable_spacing: usize,
    /// All description lines joined with a single space.
    pub description: String,
    pub description_lines: Vec<DescriptionLine>,
}

impl ParamTag {
    fn blank(tag: TokenIndex) -> Self {
        Self {
            tag,
            text_token: None,
            type_expression: String::new(),
            type_members: Vec::new(),
            type_spacing: 0,
            variable: String::new(),
            variable_spacing: 0,
            description: String::new(),
            description_lines: Vec::new(),
        }
    }

    pub fn type_width(&self) -> usize {
        width(&self.type_expression)
    }

    /// A tag with no type is treated as an empty line and skipped.
    pub fn is_blank(&self) -> bool {
        self.type_expression.is_empty()
    }
}

/// All `@param` tags of one block plus the problems found extracting them.
#[derive(Debug, Clone, Default)]
pub struct ExtractedParams {
    pub tags: Vec<ParamTag>,
    pub max_type_width: usize,
    pub max_variable_width: usize,
    /// `MissingParamType` / `MissingParamName`, anchored on the tag.
    pub problems: Vec<(TokenIndex, FindingCode)>,
}

/// Extract every `@param` tag of `block`, in source order.
pub fn extract_param_tags(tokens: &TokenStream, block: &DocBlock) -> ExtractedParams {
    let mut out = ExtractedParams::default();

    for (position, &tag) in block.tags.iter().enumerate() {
        if tokens.content(tag) != PARAM_TAG {
            continue;
        }

        let mut param = ParamTag::blank(tag);
        let text_token = tokens
            .step(tag, 2)
            .filter(|&t| tokens.kind(t) == TokenKind::DocCommentString);

        let Some(text_token) = text_token else {
            out.problems.push((tag, FindingCode::MissingParamType));
            out.tags.push(param);
            continue;
        };
        param.text_token = Some(text_token);

        let text = parse_param_text(tokens.content(text_token));
        if text.type_expression.is_empty() {
            out.problems.push((tag, FindingCode::MissingParamType));
            out.tags.push(param);
            continue;
        }

        param.type_expression = text.type_expression.to_string();
        param.type_members = split_union(text.type_expression);
        param.type_spacing = text.type_spacing;
        out.max_type_width = out.max_type_width.max(param.type_width());

        match text.variable {
            Some(variable) => {
                param.variable = variable.to_string();
                out.max_variable_width = out.max_variable_width.max(width(variable));
                if let Some(description) = text.description {
                    param.variable_spacing = text.variable_spacing;
                    param.description = description.to_string();
                    param.description_lines.push(DescriptionLine {
                        text: description.to_string(),
                        token: text_token,
                        indent: text.variable_spacing,
                    });
                    collect_continuation(tokens, block, position, text_token, &mut param);
                }
                // A missing description is deliberately not reported.
            }
            None => out.problems.push((tag, FindingCode::MissingParamName)),
        }

        out.tags.push(param);
    }

    out
}

/// Append every string up to the next tag (or the block end) to the
/// description of `param`.
fn collect_continuation(
    tokens: &TokenStream,
    block: &DocBlock,
    position: usize,
    text_token: TokenIndex,
    param: &mut ParamTag,
) {
    let end = block.tag_end(position);
    let Some(start) = tokens.next(text_token) else {
        return;
    };
    let mut cursor = Some(start);
    while let Some(i) = cursor {
        if i >= end {
            break;
        }
        if tokens.kind(i) == TokenKind::DocCommentString {
            let before = tokens.predecessor(i);
            let indent = if before.kind == TokenKind::DocCommentWhitespace {
                width(&before.content)
            } else {
                0
            };
            let text = tokens.content(i);
            param.description.push(' ');
            param.description.push_str(text);
            param.description_lines.push(DescriptionLine {
                text: text.to_string(),
                token: i,
                indent,
            });
        }
        cursor = tokens.next(i);
    }
}
