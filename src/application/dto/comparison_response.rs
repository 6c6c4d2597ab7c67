use crate::bom_structure::domain::{ArticleCode, DiffReport};
use serde::Serialize;

/// ComparisonResponse - a diff report plus the requested codes that did not resolve
///
/// Unresolved codes take part in the comparison as empty structures, so every
/// component of the other structures is reported missing from them.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonResponse {
    #[serde(flatten)]
    pub report: DiffReport,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unresolved: Vec<ArticleCode>,
}

impl ComparisonResponse {
    pub fn has_differences(&self) -> bool {
        self.report.has_differences()
    }
}
