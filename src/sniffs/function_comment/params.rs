//! Positional `@param` validation.
//!
//! Tags are matched to the real parameters by position, not by name: the
//! n-th `@param` documents the n-th parameter.  Every tag is checked in
//! order for its native type hint, its column alignment, its variable
//! name and its description.  Parameters nobody documented are reported
//! last, anchored on the comment opener.

use crate::docblock::{DocBlock, ExpectedHint, ParamTag, expected_hint, extract_param_tags};
use crate::docblock::types::{SCALAR_HINTS, strip_namespace_prefix};
use crate::report::FindingCode;
use crate::signature::RealParameter;
use crate::tokens::TokenIndex;

use super::super::SniffContext;
use super::spacing;

/// Run the whole `@param` pipeline for one declaration.
pub fn validate_params(ctx: &mut SniffContext<'_>, declaration: TokenIndex, block: &DocBlock) {
    let extracted = extract_param_tags(ctx.tokens, block);
    for &(tag, code) in &extracted.problems {
        let template = match code {
            FindingCode::MissingParamType => "Missing parameter type",
            _ => "Missing parameter name",
        };
        ctx.sink.add_error(template, tag, code, Vec::new());
    }

    let real = ctx.reflector.parameters(ctx.tokens, declaration);
    let real_names: Vec<String> = real.iter().map(documented_name).collect();
    tracing::trace!(
        declaration = declaration.get(),
        tags = extracted.tags.len(),
        parameters = real.len(),
        "validating @param tags"
    );

    let mut found: Vec<&str> = Vec::with_capacity(extracted.tags.len());
    for (position, param) in extracted.tags.iter().enumerate() {
        if param.is_blank() {
            continue;
        }

        if let Some(real_param) = real.get(position) {
            check_type_hint(ctx, declaration, param, real_param);
        }

        if param.variable.is_empty() {
            continue;
        }
        found.push(&param.variable);

        spacing::check_type_spacing(ctx, param, extracted.max_type_width);
        check_name(ctx, param, real_names.get(position).map(String::as_str));

        if !param.description.is_empty() {
            check_description(ctx, param);
        }
    }

    for name in &real_names {
        if !found.contains(&name.as_str()) {
            ctx.sink.add_error(
                "Doc comment for parameter \"%s\" missing",
                block.opener,
                FindingCode::MissingParamTag,
                vec![name.clone()],
            );
        }
    }
}

/// The name a tag must use for `param`: variadics carry a `...` prefix.
fn documented_name(param: &RealParameter) -> String {
    if param.is_variadic {
        format!("...{}", param.name)
    } else {
        param.name.clone()
    }
}

fn check_type_hint(
    ctx: &mut SniffContext<'_>,
    declaration: TokenIndex,
    param: &ParamTag,
    real: &RealParameter,
) {
    let declared = real.type_hint.as_str();
    match expected_hint(&param.type_expression, ctx.version) {
        ExpectedHint::Exempt => {}
        ExpectedHint::Hint(hint) => {
            let hint = strip_namespace_prefix(&hint, declared.chars().count());
            if declared.is_empty() {
                let code = if SCALAR_HINTS.contains(&hint) {
                    FindingCode::ScalarTypeHintMissing
                } else {
                    FindingCode::TypeHintMissing
                };
                ctx.sink.add_error(
                    "Type hint \"%s\" missing for %s",
                    declaration,
                    code,
                    vec![hint.to_string(), param.variable.clone()],
                );
            } else if declared != hint && declared.strip_prefix('?') != Some(hint) {
                ctx.sink.add_error(
                    "Expected type hint \"%s\"; found \"%s\" for %s",
                    declaration,
                    FindingCode::IncorrectTypeHint,
                    vec![hint.to_string(), declared.to_string(), param.variable.clone()],
                );
            }
        }
        ExpectedHint::Unhinted => {
            if !declared.is_empty() {
                ctx.sink.add_error(
                    "Unknown type hint \"%s\" found for %s",
                    declaration,
                    FindingCode::InvalidTypeHint,
                    vec![declared.to_string(), param.variable.clone()],
                );
            }
        }
    }
}

fn check_name(ctx: &mut SniffContext<'_>, param: &ParamTag, real_name: Option<&str>) {
    let Some(real_name) = real_name else {
        if !param.variable.ends_with(",...") {
            ctx.sink.add_error(
                "Superfluous parameter comment",
                param.tag,
                FindingCode::ExtraParamComment,
                Vec::new(),
            );
        }
        return;
    };

    if real_name == param.variable {
        return;
    }

    let data = vec![param.variable.clone(), real_name.to_string()];
    if real_name.to_lowercase() == param.variable.to_lowercase() {
        ctx.sink.add_error(
            "Doc comment for parameter %s does not match case of actual variable name %s",
            param.tag,
            FindingCode::ParamNameNoCaseMatch,
            data,
        );
    } else {
        ctx.sink.add_error(
            "Doc comment for parameter %s does not match actual variable name %s",
            param.tag,
            FindingCode::ParamNameNoMatch,
            data,
        );
    }
}

fn check_description(ctx: &mut SniffContext<'_>, param: &ParamTag) {
    if param.description.chars().next().is_some_and(char::is_lowercase) {
        ctx.sink.add_error(
            "Parameter comment must start with a capital letter",
            param.tag,
            FindingCode::ParamCommentNotCapital,
            Vec::new(),
        );
    }
    if !param.description.ends_with('.') {
        ctx.sink.add_error(
            "Parameter comment must end with a full stop",
            param.tag,
            FindingCode::ParamCommentFullStop,
            Vec::new(),
        );
    }
}
