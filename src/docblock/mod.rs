//! PHPDoc block handling.
//!
//! This module finds the doc comment attached to a declaration and pulls
//! structured `@param` records out of its tokens.  Nothing here reports
//! findings; the sniffs decide what the extracted data means.
//!
//! # Submodules
//!
//! - [`locator`]: finding the block before a declaration and the
//!   `{@inheritdoc}` short-circuit.
//! - [`tags`]: `@param` text parsing and extraction with description
//!   continuation lines.
//! - [`types`]: union splitting, canonical type names and native hint
//!   derivation.

pub mod locator;
pub mod tags;
pub mod types;

pub use locator::{CommentLocation, DocBlock, INHERIT_DOC_MARKER, locate_comment};
pub use tags::{
    DescriptionLine, ExtractedParams, PARAM_TAG, ParamTag, ParamText, extract_param_tags,
    parse_param_text,
};
pub use types::{ExpectedHint, TypeMember, expected_hint, hint_for, split_union, suggest_type};
