//! Sniff registry and per-file dispatch.
//!
//! The [`Linter`] owns a list of sniffs and the session's effective
//! [`PhpVersion`].  [`Linter::process`] walks the token stream once and
//! hands every token to the sniffs registered for its kind, in
//! registration order.  [`Linter::fix`] repeats that walk with fixing
//! enabled, applying the committed changesets between passes until a
//! pass changes nothing.

use std::collections::HashMap;

use crate::config::PhpVersion;
use crate::fixer::{Fixer, TextEditor};
use crate::report::Report;
use crate::signature::SignatureReflector;
use crate::sniffs::{
    AssignmentSpacingSniff, FunctionCommentCheck, GenericExceptionsSniff, SelfKeywordSniff, Sniff,
    SniffContext, StrictParamStrategy,
};
use crate::tokens::{TokenKind, TokenStream};

/// Upper bound on fix passes over one file.
pub const MAX_FIX_PASSES: usize = 50;

/// Result of [`Linter::fix`].
#[derive(Debug, Clone)]
pub struct FixOutcome {
    /// Passes run, including the final one that found nothing to change.
    pub passes: usize,
    /// Whether a pass finished without committing any change.
    pub converged: bool,
    /// Findings still present after the last pass.
    pub report: Report,
}

pub struct Linter {
    sniffs: Vec<Box<dyn Sniff>>,
    version: PhpVersion,
}

impl Linter {
    /// A linter with no sniffs.
    pub fn new(version: PhpVersion) -> Self {
        Self {
            sniffs: Vec::new(),
            version,
        }
    }

    /// The function comment check plus the three token rules.
    pub fn with_default_sniffs(version: PhpVersion) -> Self {
        Self::new(version)
            .with_sniff(FunctionCommentCheck::new(StrictParamStrategy))
            .with_sniff(SelfKeywordSniff)
            .with_sniff(GenericExceptionsSniff)
            .with_sniff(AssignmentSpacingSniff)
    }

    pub fn with_sniff(mut self, sniff: impl Sniff + 'static) -> Self {
        self.add_sniff(Box::new(sniff));
        self
    }

    pub fn add_sniff(&mut self, sniff: Box<dyn Sniff>) {
        tracing::trace!(sniff = sniff.name(), "registered sniff");
        self.sniffs.push(sniff);
    }

    pub fn version(&self) -> PhpVersion {
        self.version
    }

    pub fn sniff_names(&self) -> Vec<&'static str> {
        self.sniffs.iter().map(|s| s.name()).collect()
    }

    /// Run every sniff over `tokens` and collect the findings.
    pub fn process(&self, tokens: &TokenStream, reflector: &dyn SignatureReflector) -> Report {
        let mut report = Report::new();
        // Fixable findings never ask for a fix here, so nothing reaches
        // this editor.
        let mut editor = Fixer::new(tokens);
        self.run(tokens, reflector, &mut report, &mut editor);
        report
    }

    /// Apply fixes until a pass commits nothing, or [`MAX_FIX_PASSES`] is
    /// reached.
    pub fn fix(&self, tokens: &mut TokenStream, reflector: &dyn SignatureReflector) -> FixOutcome {
        for pass in 1..=MAX_FIX_PASSES {
            let mut report = Report::for_fixing();
            let mut fixer = Fixer::new(tokens);
            self.run(tokens, reflector, &mut report, &mut fixer);

            if !fixer.has_changes() {
                tracing::debug!(pass, remaining = report.findings().len(), "fix loop converged");
                return FixOutcome {
                    passes: pass,
                    converged: true,
                    report,
                };
            }

            let accepted = fixer.accepted();
            let rejected = fixer.rejected();
            let written = fixer.apply(tokens);
            tracing::debug!(pass, accepted, rejected, written, "applied fix pass");
        }

        tracing::warn!(passes = MAX_FIX_PASSES, "fix loop did not converge");
        FixOutcome {
            passes: MAX_FIX_PASSES,
            converged: false,
            report: self.process(tokens, reflector),
        }
    }

    fn run(
        &self,
        tokens: &TokenStream,
        reflector: &dyn SignatureReflector,
        report: &mut Report,
        editor: &mut dyn TextEditor,
    ) {
        let listeners = self.listeners();
        for ptr in tokens.indices() {
            let Some(sniffs) = listeners.get(&tokens.kind(ptr)) else {
                continue;
            };
            for &sniff in sniffs {
                report.set_source(sniff.name());
                let mut ctx = SniffContext {
                    tokens,
                    reflector,
                    version: self.version,
                    sink: &mut *report,
                    editor: &mut *editor,
                };
                sniff.process(&mut ctx, ptr);
            }
        }
    }

    /// Sniffs by the token kinds they registered for.
    fn listeners(&self) -> HashMap<TokenKind, Vec<&dyn Sniff>> {
        let mut listeners: HashMap<TokenKind, Vec<&dyn Sniff>> = HashMap::new();
        for sniff in &self.sniffs {
            for &kind in sniff.register() {
                listeners.entry(kind).or_default().push(sniff.as_ref());
            }
        }
        listeners
    }
}

impl std::fmt::Debug for Linter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Linter")
            .field("sniffs", &self.sniff_names())
            .field("version", &self.version)
            .finish()
    }
}
