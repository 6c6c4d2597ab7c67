pub mod article_code;
pub mod bom_node;
pub mod quantity;
pub mod reconciliation;
pub mod relation;
pub mod structure_diff;
pub mod tree_arena;

pub use article_code::ArticleCode;
pub use bom_node::{BomNode, CycleTruncation, PreorderIter, ResolvedStructure};
pub use quantity::Quantity;
pub use reconciliation::{saturating_total, CodeCounts, ReconciliationReport};
pub use relation::{ArticleAttributes, ChildEdge, ParentEdge, RelationEdge};
pub use structure_diff::{AnnotatedNode, AnnotatedStructure, DiffEntry, DiffReport, NodeStatus};
pub use tree_arena::{NodeId, TreeArena};
