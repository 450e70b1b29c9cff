//! Finding the doc comment that belongs to a declaration.

use crate::tokens::{TokenIndex, TokenKind, TokenStream};

/// Marker that makes a block inherit its documentation wholesale.
pub const INHERIT_DOC_MARKER: &str = "{@inheritdoc}";

/// A `/** … */` block attached to a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocBlock {
    pub opener: TokenIndex,
    pub closer: TokenIndex,
    /// Every `@tag` in the block, in order.
    pub tags: Vec<TokenIndex>,
}

/// Where the comment preceding a declaration stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentLocation {
    Doc(DocBlock),
    /// A `//` or `/* */` comment where a doc comment was expected.
    WrongStyle(TokenIndex),
    Missing,
}

impl DocBlock {
    /// Build the block from either of its boundary tokens.
    pub fn from_boundary(tokens: &TokenStream, boundary: TokenIndex) -> Option<Self> {
        let (opener, closer) = match tokens.kind(boundary) {
            TokenKind::DocCommentOpenTag => (boundary, tokens.links(boundary).comment_closer?),
            TokenKind::DocCommentCloseTag => (tokens.links(boundary).comment_opener?, boundary),
            _ => return None,
        };
        Some(Self {
            opener,
            closer,
            tags: tokens.links(opener).comment_tags.clone(),
        })
    }

    /// Positions of the tags whose content equals `name`.
    pub fn tags_named<'a>(
        &'a self,
        tokens: &'a TokenStream,
        name: &'a str,
    ) -> impl Iterator<Item = TokenIndex> + 'a {
        self.tags
            .iter()
            .copied()
            .filter(move |&t| tokens.content(t) == name)
    }

    /// The token that ends the tag at `position` in [`Self::tags`]: the
    /// next tag, or the close tag for the last one.
    pub fn tag_end(&self, position: usize) -> TokenIndex {
        self.tags.get(position + 1).copied().unwrap_or(self.closer)
    }

    pub fn text(&self, tokens: &TokenStream) -> String {
        tokens.text_between(self.opener, self.closer)
    }

    /// Whether the block contains `{@inheritdoc}` in any letter case.
    pub fn is_inherited(&self, tokens: &TokenStream) -> bool {
        self.text(tokens)
            .to_lowercase()
            .contains(INHERIT_DOC_MARKER)
    }
}

/// Locate the comment directly preceding `declaration`, skipping
/// whitespace, method modifiers and attribute groups.
pub fn locate_comment(tokens: &TokenStream, declaration: TokenIndex) -> CommentLocation {
    let mut cursor = tokens.prev(declaration);
    while let Some(i) = cursor {
        let token = tokens.token(i);
        match token.kind {
            TokenKind::Whitespace => {}
            kind if kind.is_method_prefix() => {}
            TokenKind::CloseSquare => {
                match token.links.bracket_pair {
                    Some(open) if tokens.kind(open) == TokenKind::AttributeStart => {
                        cursor = tokens.prev(open);
                        continue;
                    }
                    _ => return CommentLocation::Missing,
                }
            }
            TokenKind::DocCommentCloseTag => {
                return match DocBlock::from_boundary(tokens, i) {
                    Some(block) => CommentLocation::Doc(block),
                    None => CommentLocation::Missing,
                };
            }
            TokenKind::Comment => return CommentLocation::WrongStyle(i),
            _ => return CommentLocation::Missing,
        }
        cursor = tokens.prev(i);
    }
    CommentLocation::Missing
}
