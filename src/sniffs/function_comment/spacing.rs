//! Column alignment of `@param` variables.
//!
//! Within one block the variable names line up one column after the
//! widest type:
//!
//! ```text
//! @param int    $a First.
//! @param string $b Second,
//!                  continued.
//! ```
//!
//! The fix rewrites the tag's text token and shifts every continuation
//! line by the same amount, all in one changeset so a partially applied
//! fix can never misalign the description.

use crate::docblock::ParamTag;
use crate::fixer::Changeset;
use crate::report::FindingCode;
use crate::tokens::TokenStream;

use super::super::SniffContext;

/// Spaces between the widest type and its variable.
pub const TYPE_GAP: usize = 1;

/// Spaces required after a type of `type_width` in a block whose widest
/// type is `max_type_width`.
pub fn required_type_spacing(max_type_width: usize, type_width: usize) -> usize {
    max_type_width.saturating_sub(type_width) + TYPE_GAP
}

/// Build the edits that realign `param` to `required` spaces.
///
/// Continuation lines move left or right by the difference between the
/// current and the required spacing, never past column zero.  Lines
/// without any indent are left alone.
pub fn plan_spacing_fix(tokens: &TokenStream, param: &ParamTag, required: usize) -> Changeset {
    let mut change = Changeset::new();
    let Some(text_token) = param.text_token else {
        return change;
    };

    let mut content = format!(
        "{}{}{}",
        param.type_expression,
        " ".repeat(required),
        param.variable
    );
    if let Some(first) = param.description_lines.first() {
        content.push_str(&" ".repeat(param.variable_spacing));
        content.push_str(&first.text);
    }
    change.replace(text_token, content);

    let shift = param.type_spacing as isize - required as isize;
    for line in param.description_lines.iter().skip(1) {
        if line.indent == 0 {
            continue;
        }
        let Some(whitespace) = tokens.prev(line.token) else {
            continue;
        };
        let indent = (line.indent as isize - shift).max(0) as usize;
        change.replace(whitespace, " ".repeat(indent));
    }
    change
}

pub(super) fn check_type_spacing(ctx: &mut SniffContext<'_>, param: &ParamTag, max_type_width: usize) {
    let required = required_type_spacing(max_type_width, param.type_width());
    if param.type_spacing == required {
        return;
    }

    let fix = ctx.sink.add_fixable_error(
        "Expected %s spaces after parameter type; %s found",
        param.tag,
        FindingCode::SpacingAfterParamType,
        vec![required.to_string(), param.type_spacing.to_string()],
    );
    if !fix {
        return;
    }

    if let Some(edits) = plan_spacing_fix(ctx.tokens, param, required).commit(ctx.editor) {
        tracing::debug!(tag = param.tag.get(), edits, "realigned @param");
    }
}
