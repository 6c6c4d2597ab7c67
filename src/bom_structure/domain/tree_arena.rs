use super::{ArticleAttributes, ArticleCode, BomNode, Quantity};
use std::collections::{BTreeSet, HashMap};

/// Index of a node inside a [`TreeArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct ArenaSlot {
    code: ArticleCode,
    quantity: Quantity,
    level: usize,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Flat storage for a tree under construction
///
/// Nodes are addressed by index and only ever appended, so a child always has a
/// larger index than its parent. Parent links make the path from the root
/// available without recursion.
#[derive(Debug, Clone)]
pub struct TreeArena {
    slots: Vec<ArenaSlot>,
}

impl TreeArena {
    pub const ROOT: NodeId = NodeId(0);

    pub fn with_root(code: ArticleCode) -> Self {
        Self {
            slots: vec![ArenaSlot {
                code,
                quantity: Quantity::Unspecified,
                level: 0,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Appends `code` as the last child of `parent`
    pub fn push_child(&mut self, parent: NodeId, code: ArticleCode, quantity: Quantity) -> NodeId {
        let id = NodeId(self.slots.len());
        let level = self.slots[parent.0].level + 1;
        self.slots.push(ArenaSlot {
            code,
            quantity,
            level,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.slots[parent.0].children.push(id);
        id
    }

    pub fn code(&self, id: NodeId) -> &ArticleCode {
        &self.slots[id.0].code
    }

    pub fn level(&self, id: NodeId) -> usize {
        self.slots[id.0].level
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.slots[id.0].children
    }

    /// True if `code` is `id` itself or any of its ancestors
    pub fn path_contains(&self, id: NodeId, code: &ArticleCode) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let slot = &self.slots[current.0];
            if &slot.code == code {
                return true;
            }
            cursor = slot.parent;
        }
        false
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn codes(&self) -> BTreeSet<ArticleCode> {
        self.slots.iter().map(|slot| slot.code.clone()).collect()
    }

    /// Materializes the owned tree, filling attributes by code
    ///
    /// Slots are consumed from the highest index down, so every child is built
    /// before its parent and no recursion is needed.
    pub fn into_tree(self, attributes: &HashMap<ArticleCode, ArticleAttributes>) -> BomNode {
        let root_code = self.slots[Self::ROOT.0].code.clone();
        let mut built: Vec<Option<BomNode>> = vec![None; self.slots.len()];

        for (index, slot) in self.slots.into_iter().enumerate().rev() {
            let mut node = BomNode::new(slot.code, slot.quantity, slot.level);
            if let Some(found) = attributes.get(&node.code) {
                node.description = found.description.clone();
                node.revision_letter = found.revision_letter.clone();
            }
            node.children = slot
                .children
                .iter()
                .filter_map(|child| built[child.0].take())
                .collect();
            built[index] = Some(node);
        }

        built
            .into_iter()
            .next()
            .flatten()
            .unwrap_or_else(|| BomNode::new(root_code, Quantity::Unspecified, 0))
    }
}
