//! JSON interchange with the external parser.
//!
//! The parser serializes its tree as nested objects:
//!
//! ```json
//! { "kind": "DOT", "start": 0, "end": 9, "children": [ ... ] }
//! ```
//!
//! Loading flattens the nesting into the arena and assigns parent indices.

use crate::error::TreeError;
use crate::node_kind::NodeKind;
use crate::tree::{Node, NodeIndex, SyntaxTree};
use serde::{Deserialize, Serialize};

/// One node as the parser writes it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNode {
    pub kind: NodeKind,
    pub start: u32,
    pub end: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RawNode>,
}

impl SyntaxTree {
    /// Decode a parser JSON document and validate it against `source`.
    pub fn from_json(json: &str, source: &str) -> Result<SyntaxTree, TreeError> {
        let raw: RawNode = serde_json::from_str(json)?;
        SyntaxTree::from_raw(&raw, source)
    }

    /// Flatten a nested tree into an arena and validate it against `source`.
    pub fn from_raw(raw: &RawNode, source: &str) -> Result<SyntaxTree, TreeError> {
        let mut tree = SyntaxTree::new();
        let root = flatten(raw, &mut tree);
        tree.set_root(root);
        tree.validate(source.len())?;
        Ok(tree)
    }

    /// Nested view of the tree, the inverse of `from_raw`.
    pub fn to_raw(&self) -> Result<RawNode, TreeError> {
        Ok(self.raw_of(self.root()?))
    }

    fn raw_of(&self, index: NodeIndex) -> RawNode {
        let node = self.node(index);
        RawNode {
            kind: node.kind,
            start: node.start,
            end: node.end,
            text: node.text.clone(),
            children: node
                .children
                .iter()
                .map(|&child| self.raw_of(child))
                .collect(),
        }
    }
}

fn flatten(raw: &RawNode, tree: &mut SyntaxTree) -> NodeIndex {
    let index = tree.push(Node::new(raw.kind, raw.start, raw.end, raw.text.clone()));
    let children: Vec<NodeIndex> = raw
        .children
        .iter()
        .map(|child| flatten(child, tree))
        .collect();
    tree.attach(index, &children);
    index
}

#[cfg(test)]
#[path = "../tests/json.rs"]
mod tests;
