//! Findings and the diagnostic sink.
//!
//! Sniffs never format messages themselves: they hand a message template
//! (with `%s` placeholders), a [`FindingCode`] and the placeholder data to
//! a [`DiagnosticSink`].  [`Report`] is the sink the [`Linter`](crate::Linter)
//! uses; hosts with their own diagnostic pipeline can implement the trait
//! directly.

use serde::Serialize;
use serde_json::{Value, json};

use crate::tokens::{TokenIndex, TokenStream};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Every code a sniff in this crate can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FindingCode {
    // ── Comment location ────────────────────────────────────────────
    Missing,
    WrongStyle,
    SpacingAfter,
    // ── Other tags ──────────────────────────────────────────────────
    EmptySees,
    InvalidThrows,
    // ── @return ─────────────────────────────────────────────────────
    DuplicateReturn,
    MissingReturn,
    MissingReturnType,
    // ── @param ──────────────────────────────────────────────────────
    MissingParamType,
    MissingParamName,
    TypeHintMissing,
    ScalarTypeHintMissing,
    IncorrectTypeHint,
    InvalidTypeHint,
    ParamNameNoMatch,
    ParamNameNoCaseMatch,
    ExtraParamComment,
    MissingParamTag,
    ParamCommentNotCapital,
    ParamCommentFullStop,
    SpacingAfterParamType,
    // ── Token rules ─────────────────────────────────────────────────
    Invalid,
    GenericExceptionsShouldNotBeThrown,
}

impl FindingCode {
    pub fn as_str(self) -> &'static str {
        match self {
            FindingCode::Missing => "Missing",
            FindingCode::WrongStyle => "WrongStyle",
            FindingCode::SpacingAfter => "SpacingAfter",
            FindingCode::EmptySees => "EmptySees",
            FindingCode::InvalidThrows => "InvalidThrows",
            FindingCode::DuplicateReturn => "DuplicateReturn",
            FindingCode::MissingReturn => "MissingReturn",
            FindingCode::MissingReturnType => "MissingReturnType",
            FindingCode::MissingParamType => "MissingParamType",
            FindingCode::MissingParamName => "MissingParamName",
            FindingCode::TypeHintMissing => "TypeHintMissing",
            FindingCode::ScalarTypeHintMissing => "ScalarTypeHintMissing",
            FindingCode::IncorrectTypeHint => "IncorrectTypeHint",
            FindingCode::InvalidTypeHint => "InvalidTypeHint",
            FindingCode::ParamNameNoMatch => "ParamNameNoMatch",
            FindingCode::ParamNameNoCaseMatch => "ParamNameNoCaseMatch",
            FindingCode::ExtraParamComment => "ExtraParamComment",
            FindingCode::MissingParamTag => "MissingParamTag",
            FindingCode::ParamCommentNotCapital => "ParamCommentNotCapital",
            FindingCode::ParamCommentFullStop => "ParamCommentFullStop",
            FindingCode::SpacingAfterParamType => "SpacingAfterParamType",
            FindingCode::Invalid => "Invalid",
            FindingCode::GenericExceptionsShouldNotBeThrown => {
                "GenericExceptionsShouldNotBeThrown"
            }
        }
    }
}

/// A single diagnostic raised by a sniff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// The emitting sniff, e.g. `"Commenting.FunctionComment"`.
    pub source: &'static str,
    pub severity: Severity,
    pub code: FindingCode,
    /// Message with `%s` placeholders, filled from `data` in order.
    pub template: &'static str,
    pub data: Vec<String>,
    pub anchor: TokenIndex,
    pub fixable: bool,
}

impl Finding {
    pub fn message(&self) -> String {
        render_template(self.template, &self.data)
    }

    /// Fully-qualified code, e.g. `"Commenting.FunctionComment.MissingParamTag"`.
    pub fn qualified_code(&self) -> String {
        format!("{}.{}", self.source, self.code.as_str())
    }
}

fn render_template(template: &str, data: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut values = data.iter();
    let mut rest = template;
    while let Some(pos) = rest.find("%s") {
        out.push_str(&rest[..pos]);
        match values.next() {
            Some(v) => out.push_str(v),
            None => out.push_str("%s"),
        }
        rest = &rest[pos + 2..];
    }
    out.push_str(rest);
    out
}

/// Receiver for findings raised while processing one file.
pub trait DiagnosticSink {
    fn add_error(
        &mut self,
        template: &'static str,
        anchor: TokenIndex,
        code: FindingCode,
        data: Vec<String>,
    );

    fn add_warning(
        &mut self,
        template: &'static str,
        anchor: TokenIndex,
        code: FindingCode,
        data: Vec<String>,
    );

    /// Record a fixable error.  Returns `true` when the caller should
    /// compute and commit the fix.
    fn add_fixable_error(
        &mut self,
        template: &'static str,
        anchor: TokenIndex,
        code: FindingCode,
        data: Vec<String>,
    ) -> bool;
}

/// Findings collected for one file, in emission order.
#[derive(Debug, Clone, Default)]
pub struct Report {
    findings: Vec<Finding>,
    source: &'static str,
    fixing: bool,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// A report whose fixable findings ask the caller to apply the fix.
    pub(crate) fn for_fixing() -> Self {
        Self {
            fixing: true,
            ..Self::default()
        }
    }

    /// Attribute subsequent findings to `source`.
    pub(crate) fn set_source(&mut self, source: &'static str) {
        self.source = source;
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn into_findings(self) -> Vec<Finding> {
        self.findings
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn codes(&self) -> Vec<FindingCode> {
        self.findings.iter().map(|f| f.code).collect()
    }

    pub fn count(&self, code: FindingCode) -> usize {
        self.findings.iter().filter(|f| f.code == code).count()
    }

    pub fn error_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
            .count()
    }

    pub fn fixable_count(&self) -> usize {
        self.findings.iter().filter(|f| f.fixable).count()
    }

    /// JSON rendering for hosts, with rendered messages and source lines.
    pub fn to_json(&self, tokens: &TokenStream) -> Value {
        let findings: Vec<Value> = self
            .findings
            .iter()
            .map(|f| {
                json!({
                    "source": f.qualified_code(),
                    "severity": f.severity,
                    "message": f.message(),
                    "line": tokens.line(f.anchor),
                    "token": f.anchor,
                    "fixable": f.fixable,
                    "data": f.data,
                })
            })
            .collect();
        json!({
            "errors": self.error_count(),
            "warnings": self.warning_count(),
            "fixable": self.fixable_count(),
            "findings": findings,
        })
    }

    fn push(
        &mut self,
        severity: Severity,
        template: &'static str,
        anchor: TokenIndex,
        code: FindingCode,
        data: Vec<String>,
        fixable: bool,
    ) {
        self.findings.push(Finding {
            source: self.source,
            severity,
            code,
            template,
            data,
            anchor,
            fixable,
        });
    }
}

impl DiagnosticSink for Report {
    fn add_error(
        &mut self,
        template: &'static str,
        anchor: TokenIndex,
        code: FindingCode,
        data: Vec<String>,
    ) {
        self.push(Severity::Error, template, anchor, code, data, false);
    }

    fn add_warning(
        &mut self,
        template: &'static str,
        anchor: TokenIndex,
        code: FindingCode,
        data: Vec<String>,
    ) {
        self.push(Severity::Warning, template, anchor, code, data, false);
    }

    fn add_fixable_error(
        &mut self,
        template: &'static str,
        anchor: TokenIndex,
        code: FindingCode,
        data: Vec<String>,
    ) -> bool {
        self.push(Severity::Error, template, anchor, code, data, true);
        self.fixing
    }
}
