//! Type name canonicalisation and native hint derivation.
//!
//! This submodule turns the raw type expression of a `@param` tag into the
//! native type hint the real signature is expected to declare:
//!
//!   1. [`split_union`] splits on `|` (outside `<…>`, `(…)` and `{…}`) and
//!      strips one leading `?` per member,
//!   2. [`suggest_type`] maps each member to its canonical docblock name
//!      (`int` → `integer`, `bool` → `boolean`, `array()` → `array`, …),
//!   3. [`expected_hint`] derives the hint for single-member expressions,
//!      gated on the target [`PhpVersion`].

use crate::config::PhpVersion;

/// Canonical docblock type names that are not, by themselves, a native
/// type hint (before the scalar and `object` hint eras).
pub const ALLOWED_TYPES: &[&str] = &[
    "array", "boolean", "float", "integer", "mixed", "object", "string", "resource", "callable",
];

/// Hints that get the scalar sub-code when missing.
pub(crate) const SCALAR_HINTS: &[&str] = &["string", "int", "float", "bool"];

/// One member of a union type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMember {
    /// The member with its nullability marker removed.
    pub name: String,
    /// Whether the member carried a leading `?`.
    pub nullable: bool,
}

/// What the real signature should declare for a parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpectedHint {
    /// Multi-member unions are not checked.
    Exempt,
    /// The type has no native hint (e.g. `mixed`, or `string` before 7.0).
    Unhinted,
    /// The native hint to expect.
    Hint(String),
}

/// Split a type expression on `|`, respecting `<…>`, `(…)` and `{…}`
/// nesting, and strip one leading `?` from each member.
///
/// - `"int"`                  → `[int]`
/// - `"?Foo|null"`            → `[Foo (nullable), null]`
/// - `"array<int|string, X>"` → `[array<int|string, X>]`
pub fn split_union(expression: &str) -> Vec<TypeMember> {
    let mut members = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in expression.char_indices() {
        match c {
            '<' | '(' | '{' => depth += 1,
            '>' | ')' | '}' => depth -= 1,
            '|' if depth <= 0 => {
                members.push(member(&expression[start..i]));
                start = i + 1;
            }
            _ => {}
        }
    }
    members.push(member(&expression[start..]));
    members
}

fn member(raw: &str) -> TypeMember {
    match raw.strip_prefix('?') {
        Some(name) => TypeMember {
            name: name.to_string(),
            nullable: true,
        },
        None => TypeMember {
            name: raw.to_string(),
            nullable: false,
        },
    }
}

/// Map a docblock type name to its canonical spelling.
///
/// Aliases collapse (`bool` → `boolean`, `double`/`real` → `float`,
/// `int` → `integer`), allowed names are lowercased, `array(K => V)` is
/// normalised recursively, and anything else is returned unchanged.
pub fn suggest_type(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }
    if ALLOWED_TYPES.contains(&name) {
        return name.to_string();
    }

    let lower = name.to_lowercase();
    match lower.as_str() {
        "bool" | "boolean" => return "boolean".to_string(),
        "double" | "real" | "float" => return "float".to_string(),
        "int" | "integer" => return "integer".to_string(),
        "array()" | "array" => return "array".to_string(),
        _ => {}
    }

    if lower.contains("array(") {
        return suggest_array_type(name);
    }
    if ALLOWED_TYPES.contains(&lower.as_str()) {
        return lower;
    }
    name.to_string()
}

/// `array(type)` and `array(key => value)` forms.  Anything that does not
/// start with a well-formed `array(` collapses to plain `array`.
fn suggest_array_type(name: &str) -> String {
    let fallback = || "array".to_string();
    let Some(prefix) = name.get(..6) else {
        return fallback();
    };
    if !prefix.eq_ignore_ascii_case("array(") {
        return fallback();
    }

    let inner = name[6..].trim_start();
    let run_len = inner
        .find(|c: char| c.is_whitespace() || matches!(c, '^' | '=' | '>'))
        .unwrap_or(inner.len());
    let (run, rest) = inner.split_at(run_len);

    // `array(K => V)`: the value runs up to the last `)`.
    if let Some(after_arrow) = rest.trim_start().strip_prefix("=>")
        && let Some(close) = after_arrow.rfind(')')
    {
        let key = suggest_type(run);
        let value = suggest_type(after_arrow[..close].trim());
        return if value.is_empty() {
            format!("array({key})")
        } else {
            format!("array({key} => {value})")
        };
    }

    // `array(T)`: the element type is the longest prefix of the run that
    // is followed by `)`.
    let element = if rest.trim_start().starts_with(')') {
        run
    } else if let Some(close) = run.rfind(')') {
        &run[..close]
    } else {
        return fallback();
    };
    format!("array({})", suggest_type(element))
}

/// Derive the native hint a single type expression calls for.
pub fn expected_hint(expression: &str, version: PhpVersion) -> ExpectedHint {
    let members = split_union(expression);
    let [member] = members.as_slice() else {
        return ExpectedHint::Exempt;
    };
    let suggested = suggest_type(&member.name);
    match hint_for(&suggested, version) {
        Some(hint) => ExpectedHint::Hint(hint),
        None => ExpectedHint::Unhinted,
    }
}

/// The native hint for an already canonicalised type name.
pub fn hint_for(suggested: &str, version: PhpVersion) -> Option<String> {
    let mut hint = if suggested.contains("array") || suggested.ends_with("[]") {
        Some("array".to_string())
    } else if suggested.contains("callable") || suggested.contains("callback") {
        Some("callable".to_string())
    } else if !ALLOWED_TYPES.contains(&suggested) {
        (!suggested.is_empty()).then(|| suggested.to_string())
    } else {
        None
    };

    if version >= PhpVersion::SCALAR_HINTS {
        let scalar = match suggested {
            "string" => Some("string"),
            "int" | "integer" => Some("int"),
            "float" => Some("float"),
            "bool" | "boolean" => Some("bool"),
            _ => None,
        };
        if let Some(scalar) = scalar {
            hint = Some(scalar.to_string());
        }
    }

    if version >= PhpVersion::OBJECT_HINT && suggested == "object" {
        hint = Some("object".to_string());
    }

    hint
}

/// Keep only the last `width` chars of `hint`, the way a declared
/// unqualified hint is compared against a namespace-qualified docblock
/// type.  A zero or over-long width keeps the whole hint.
pub(crate) fn strip_namespace_prefix(hint: &str, width: usize) -> &str {
    let len = hint.chars().count();
    if width == 0 || width >= len {
        return hint;
    }
    match hint.char_indices().nth(len - width) {
        Some((offset, _)) => &hint[offset..],
        None => hint,
    }
}
