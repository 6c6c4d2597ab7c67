use super::{ArticleCode, Quantity};
use serde::{Deserialize, Serialize};

/// Status of a node relative to the structure it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NodeStatus {
    #[default]
    Normal,
    /// Present here, absent from at least one other compared structure
    New,
    /// Referenced as missing for this structure's origin
    Removed,
}

impl std::fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeStatus::Normal => write!(f, "Normal"),
            NodeStatus::New => write!(f, "New"),
            NodeStatus::Removed => write!(f, "Removed"),
        }
    }
}

/// A code that is not present in every compared structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffEntry {
    pub code: ArticleCode,
    /// Origins containing the code, in comparison order
    pub present_in: Vec<ArticleCode>,
    /// Origins lacking the code, in comparison order
    pub missing_in: Vec<ArticleCode>,
}

/// A resolved node carrying its comparison status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedNode {
    pub code: ArticleCode,
    pub quantity: Quantity,
    pub description: String,
    pub revision_letter: String,
    pub level: usize,
    pub status: NodeStatus,
    pub children: Vec<AnnotatedNode>,
}

impl AnnotatedNode {
    /// Pre-order walk over this node and its descendants
    pub fn iter(&self) -> impl Iterator<Item = &AnnotatedNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedStructure {
    pub origin_code: ArticleCode,
    pub roots: Vec<AnnotatedNode>,
}

impl AnnotatedStructure {
    pub fn nodes(&self) -> impl Iterator<Item = &AnnotatedNode> {
        self.roots.iter().flat_map(AnnotatedNode::iter)
    }
}

/// Result of comparing several structures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffReport {
    /// Origin codes in the order they were compared
    pub compared: Vec<ArticleCode>,
    /// Sorted by code
    pub differences: Vec<DiffEntry>,
    pub structures: Vec<AnnotatedStructure>,
}

impl DiffReport {
    pub fn has_differences(&self) -> bool {
        !self.differences.is_empty()
    }

    pub fn difference_for(&self, code: &str) -> Option<&DiffEntry> {
        self.differences.iter().find(|entry| entry.code.as_str() == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotated(raw: &str, status: NodeStatus, children: Vec<AnnotatedNode>) -> AnnotatedNode {
        AnnotatedNode {
            code: ArticleCode::new(raw).unwrap(),
            quantity: Quantity::Unspecified,
            description: String::new(),
            revision_letter: String::new(),
            level: 0,
            status,
            children,
        }
    }

    #[test]
    fn test_status_display_and_default() {
        assert_eq!(NodeStatus::default(), NodeStatus::Normal);
        assert_eq!(NodeStatus::New.to_string(), "New");
        assert_eq!(NodeStatus::Removed.to_string(), "Removed");
    }

    #[test]
    fn test_annotated_structure_nodes_preorder() {
        let structure = AnnotatedStructure {
            origin_code: ArticleCode::new("A").unwrap(),
            roots: vec![annotated(
                "A",
                NodeStatus::Normal,
                vec![
                    annotated("X", NodeStatus::New, vec![annotated("Y", NodeStatus::Normal, vec![])]),
                    annotated("Z", NodeStatus::Normal, vec![]),
                ],
            )],
        };

        let order: Vec<&str> = structure.nodes().map(|n| n.code.as_str()).collect();
        assert_eq!(order, vec!["A", "X", "Y", "Z"]);
    }

    #[test]
    fn test_status_serializes_as_variant_name() {
        assert_eq!(serde_json::to_string(&NodeStatus::Removed).unwrap(), "\"Removed\"");
    }
}
