//! Span-checked tree construction.
//!
//! The parser collaborator normally hands the emitter a finished tree through
//! JSON. Tools and tests build trees by hand instead; `TreeBuilder` locates
//! spans by searching the source for a needle so offsets can't drift when the
//! source text is edited.

use crate::error::TreeError;
use crate::node_kind::NodeKind;
use crate::tree::{Node, NodeIndex, SyntaxTree};

pub struct TreeBuilder<'a> {
    source: &'a str,
    tree: SyntaxTree,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(source: &'a str) -> TreeBuilder<'a> {
        TreeBuilder {
            source,
            tree: SyntaxTree::new(),
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Byte range of the `occurrence`th (zero-based) match of `needle`.
    pub fn find(&self, needle: &str, occurrence: usize) -> Result<(u32, u32), TreeError> {
        self.source
            .match_indices(needle)
            .nth(occurrence)
            .map(|(start, matched)| (start as u32, (start + matched.len()) as u32))
            .ok_or_else(|| TreeError::NeedleNotFound {
                needle: needle.to_string(),
                occurrence,
            })
    }

    /// Add a childless node with an explicit range.
    pub fn leaf(&mut self, kind: NodeKind, start: u32, end: u32, text: Option<&str>) -> NodeIndex {
        self.tree
            .push(Node::new(kind, start, end, text.map(str::to_string)))
    }

    /// Add a leaf spanning the `occurrence`th match of `needle`, whose text is
    /// the needle itself.
    pub fn token(
        &mut self,
        kind: NodeKind,
        needle: &str,
        occurrence: usize,
    ) -> Result<NodeIndex, TreeError> {
        let (start, end) = self.find(needle, occurrence)?;
        Ok(self.leaf(kind, start, end, Some(needle)))
    }

    /// Add a node with an explicit range and the given children.
    pub fn branch(
        &mut self,
        kind: NodeKind,
        start: u32,
        end: u32,
        children: &[NodeIndex],
    ) -> NodeIndex {
        let index = self.tree.push(Node::new(kind, start, end, None));
        self.tree.attach(index, children);
        index
    }

    /// Add a node spanning from its first child's start to its last child's
    /// end.
    pub fn wrap(&mut self, kind: NodeKind, children: &[NodeIndex]) -> NodeIndex {
        let start = children
            .first()
            .map_or(0, |&child| self.tree.start(child));
        let end = children.last().map_or(start, |&child| self.tree.end(child));
        self.branch(kind, start, end, children)
    }

    /// Range of a node already added.
    pub fn range(&self, index: NodeIndex) -> (u32, u32) {
        (self.tree.start(index), self.tree.end(index))
    }

    /// Set the text of a node already added.
    pub fn with_text(&mut self, index: NodeIndex, text: &str) -> NodeIndex {
        self.tree.node_mut(index).text = Some(text.to_string());
        index
    }

    /// Seal the tree, validating every range against the source.
    pub fn finish(mut self, root: NodeIndex) -> Result<SyntaxTree, TreeError> {
        self.tree.set_root(root);
        self.tree.validate(self.source.len())?;
        Ok(self.tree)
    }
}

#[cfg(test)]
#[path = "../tests/builder.rs"]
mod tests;
