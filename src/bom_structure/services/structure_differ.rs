use crate::bom_structure::domain::{
    AnnotatedNode, AnnotatedStructure, ArticleCode, BomNode, DiffEntry, DiffReport, NodeStatus,
    ResolvedStructure,
};
use crate::shared::error::ComparisonError;
use std::collections::{BTreeMap, BTreeSet};

/// StructureDiffer service for comparing several structures
///
/// Pure algorithm: collects the code set of every structure, reports the codes
/// that are not present everywhere, and tags every node with its status from
/// the point of view of the structure it belongs to.
pub struct StructureDiffer;

impl StructureDiffer {
    /// Compares two or more structures
    ///
    /// # Errors
    /// `ComparisonError::InsufficientInput` when fewer than two structures are given
    pub fn compare(structures: &[ResolvedStructure]) -> Result<DiffReport, ComparisonError> {
        if structures.len() < 2 {
            return Err(ComparisonError::InsufficientInput {
                given: structures.len(),
            });
        }

        let code_sets: Vec<BTreeSet<ArticleCode>> =
            structures.iter().map(ResolvedStructure::codes).collect();
        let differences = Self::collect_differences(structures, &code_sets);

        let lookup: BTreeMap<&ArticleCode, &DiffEntry> =
            differences.iter().map(|entry| (&entry.code, entry)).collect();

        let annotated = structures
            .iter()
            .map(|structure| AnnotatedStructure {
                origin_code: structure.origin_code.clone(),
                roots: structure
                    .roots
                    .iter()
                    .map(|root| Self::annotate(root, &structure.origin_code, &lookup))
                    .collect(),
            })
            .collect();

        tracing::debug!(
            target: "bom_trace::differ",
            structures = structures.len(),
            differences = differences.len(),
            "Structures compared"
        );

        Ok(DiffReport {
            compared: structures.iter().map(|s| s.origin_code.clone()).collect(),
            differences,
            structures: annotated,
        })
    }

    /// Builds one entry per code that some structure lacks, sorted by code
    fn collect_differences(
        structures: &[ResolvedStructure],
        code_sets: &[BTreeSet<ArticleCode>],
    ) -> Vec<DiffEntry> {
        let union: BTreeSet<&ArticleCode> = code_sets.iter().flatten().collect();

        union
            .into_iter()
            .filter_map(|code| {
                let mut present_in = Vec::new();
                let mut missing_in = Vec::new();

                for (structure, codes) in structures.iter().zip(code_sets) {
                    let bucket = if codes.contains(code) {
                        &mut present_in
                    } else {
                        &mut missing_in
                    };
                    if !bucket.contains(&structure.origin_code) {
                        bucket.push(structure.origin_code.clone());
                    }
                }

                if missing_in.is_empty() {
                    return None;
                }

                Some(DiffEntry {
                    code: code.clone(),
                    present_in,
                    missing_in,
                })
            })
            .collect()
    }

    /// Status of a code for one origin; a node never inherits its children's status
    pub fn status_for(entry: Option<&DiffEntry>, origin: &ArticleCode) -> NodeStatus {
        let Some(entry) = entry else {
            return NodeStatus::Normal;
        };

        let present = entry.present_in.contains(origin);
        let missing = entry.missing_in.contains(origin);

        if present && !missing && !entry.missing_in.is_empty() {
            NodeStatus::New
        } else if missing {
            NodeStatus::Removed
        } else {
            NodeStatus::Normal
        }
    }

    fn annotate(
        node: &BomNode,
        origin: &ArticleCode,
        lookup: &BTreeMap<&ArticleCode, &DiffEntry>,
    ) -> AnnotatedNode {
        AnnotatedNode {
            code: node.code.clone(),
            quantity: node.quantity.clone(),
            description: node.description.clone(),
            revision_letter: node.revision_letter.clone(),
            level: node.level,
            status: Self::status_for(lookup.get(&node.code).copied(), origin),
            children: node
                .children
                .iter()
                .map(|child| Self::annotate(child, origin, lookup))
                .collect(),
        }
    }
}
