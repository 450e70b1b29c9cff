//! Transactional token rewriting.
//!
//! A fix is computed up front as a [`Changeset`] (a list of whole-token
//! replacements) and then committed through a [`TextEditor`] inside one
//! `begin_changeset` / `end_changeset` pair.  The [`Fixer`] only makes a
//! changeset visible when every replacement in it is valid and none of
//! them collides with a change already committed in the same pass; a
//! rejected changeset leaves no trace.

use std::collections::BTreeMap;

use crate::tokens::{TokenIndex, TokenStream};

/// Host-facing editing surface.
pub trait TextEditor {
    fn begin_changeset(&mut self);
    /// Stage a replacement.  Returns `false` if the index is unknown.
    fn replace_token(&mut self, index: TokenIndex, content: String) -> bool;
    /// Commit the staged replacements.  Returns `false` if the changeset
    /// was rejected and nothing was applied.
    fn end_changeset(&mut self) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenEdit {
    pub index: TokenIndex,
    pub content: String,
}

/// A fix computed without touching the stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changeset {
    edits: Vec<TokenEdit>,
}

impl Changeset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, index: TokenIndex, content: impl Into<String>) {
        self.edits.push(TokenEdit {
            index,
            content: content.into(),
        });
    }

    pub fn edits(&self) -> &[TokenEdit] {
        &self.edits
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Apply every edit as one transaction, returning the edit count when
    /// the editor accepts it.
    pub fn commit(self, editor: &mut dyn TextEditor) -> Option<usize> {
        let count = self.edits.len();
        editor.begin_changeset();
        for edit in self.edits {
            if !editor.replace_token(edit.index, edit.content) {
                break;
            }
        }
        editor.end_changeset().then_some(count)
    }
}

/// Collects committed changesets for one pass over a token stream.
#[derive(Debug)]
pub struct Fixer {
    token_count: usize,
    staged: Option<Staged>,
    committed: BTreeMap<TokenIndex, String>,
    accepted: usize,
    rejected: usize,
}

#[derive(Debug, Default)]
struct Staged {
    edits: Vec<TokenEdit>,
    poisoned: bool,
}

impl Fixer {
    pub fn new(tokens: &TokenStream) -> Self {
        Self {
            token_count: tokens.len(),
            staged: None,
            committed: BTreeMap::new(),
            accepted: 0,
            rejected: 0,
        }
    }

    /// Whether any changeset was committed.
    pub fn has_changes(&self) -> bool {
        !self.committed.is_empty()
    }

    pub fn accepted(&self) -> usize {
        self.accepted
    }

    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// The committed replacement for a token, if any.
    pub fn replacement(&self, index: TokenIndex) -> Option<&str> {
        self.committed.get(&index).map(String::as_str)
    }

    /// Write all committed replacements into `tokens`.  Returns the number
    /// of tokens rewritten.
    pub fn apply(self, tokens: &mut TokenStream) -> usize {
        let mut written = 0;
        for (index, content) in self.committed {
            if tokens.set_content(index, content) {
                written += 1;
            }
        }
        written
    }

    fn conflicts(&self, edit: &TokenEdit) -> bool {
        self.committed
            .get(&edit.index)
            .is_some_and(|existing| *existing != edit.content)
    }
}

impl TextEditor for Fixer {
    fn begin_changeset(&mut self) {
        if self.staged.is_some() {
            tracing::warn!("changeset started while another was open; discarding the open one");
        }
        self.staged = Some(Staged::default());
    }

    fn replace_token(&mut self, index: TokenIndex, content: String) -> bool {
        let valid = index.get() < self.token_count;
        match self.staged.as_mut() {
            Some(staged) => {
                if valid {
                    staged.edits.push(TokenEdit { index, content });
                } else {
                    staged.poisoned = true;
                }
            }
            // Outside a changeset a replacement is its own transaction.
            None => {
                if !valid {
                    return false;
                }
                self.begin_changeset();
                if let Some(staged) = self.staged.as_mut() {
                    staged.edits.push(TokenEdit { index, content });
                }
                return self.end_changeset();
            }
        }
        valid
    }

    fn end_changeset(&mut self) -> bool {
        let Some(staged) = self.staged.take() else {
            return false;
        };
        if staged.poisoned || staged.edits.iter().any(|e| self.conflicts(e)) {
            self.rejected += 1;
            tracing::warn!(
                edits = staged.edits.len(),
                poisoned = staged.poisoned,
                "changeset rejected"
            );
            return false;
        }
        for edit in staged.edits {
            self.committed.insert(edit.index, edit.content);
        }
        self.accepted += 1;
        true
    }
}
