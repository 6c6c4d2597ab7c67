use super::{ArticleCode, Quantity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One entry of a resolved bill of materials
///
/// `quantity` is the multiplicity of this node inside its parent, taken from
/// the parent edge; roots carry `Quantity::Unspecified`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomNode {
    pub code: ArticleCode,
    #[serde(default)]
    pub quantity: Quantity,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub revision_letter: String,
    pub level: usize,
    #[serde(default)]
    pub children: Vec<BomNode>,
}

impl BomNode {
    pub fn new(code: ArticleCode, quantity: Quantity, level: usize) -> Self {
        Self {
            code,
            quantity,
            description: String::new(),
            revision_letter: String::new(),
            level,
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Pre-order walk over this node and all of its descendants
    pub fn iter(&self) -> PreorderIter<'_> {
        PreorderIter { stack: vec![self] }
    }
}

/// Pre-order iterator over a forest of nodes, driven by an explicit stack
pub struct PreorderIter<'a> {
    stack: Vec<&'a BomNode>,
}

impl<'a> PreorderIter<'a> {
    pub fn over(roots: &'a [BomNode]) -> Self {
        Self {
            stack: roots.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for PreorderIter<'a> {
    type Item = &'a BomNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// A cut made by the cycle guard: `repeated` is a child of `parent` that was
/// already on the path from the root and was therefore left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleTruncation {
    pub parent: ArticleCode,
    pub repeated: ArticleCode,
    pub level: usize,
}

/// The component tree resolved (or imported) for one article code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedStructure {
    pub origin_code: ArticleCode,
    pub roots: Vec<BomNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub truncated_cycles: Vec<CycleTruncation>,
}

impl ResolvedStructure {
    pub fn new(origin_code: ArticleCode, roots: Vec<BomNode>) -> Self {
        Self {
            origin_code,
            roots,
            truncated_cycles: Vec::new(),
        }
    }

    pub fn empty(origin_code: ArticleCode) -> Self {
        Self::new(origin_code, Vec::new())
    }

    pub fn with_truncations(mut self, truncations: Vec<CycleTruncation>) -> Self {
        self.truncated_cycles = truncations;
        self
    }

    pub fn nodes(&self) -> PreorderIter<'_> {
        PreorderIter::over(&self.roots)
    }

    /// Every distinct code appearing anywhere in the structure
    pub fn codes(&self) -> BTreeSet<ArticleCode> {
        self.nodes().map(|node| node.code.clone()).collect()
    }

    pub fn node_count(&self) -> usize {
        self.nodes().count()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}
