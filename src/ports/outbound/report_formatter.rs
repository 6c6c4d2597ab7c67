use crate::application::dto::{AncestorsResponse, ComparisonResponse, DocumentCheckResponse};
use crate::bom_structure::domain::ResolvedStructure;
use crate::shared::Result;

/// ReportFormatter port for rendering results
///
/// This port abstracts the output format (JSON, Markdown, ...) of each of the
/// results the application produces.
pub trait ReportFormatter {
    /// Formats a resolved structure
    fn format_structure(&self, structure: &ResolvedStructure) -> Result<String>;

    /// Formats direct parents or terminal ancestors of a code
    fn format_ancestors(&self, ancestors: &AncestorsResponse) -> Result<String>;

    /// Formats a structure comparison
    fn format_comparison(&self, comparison: &ComparisonResponse) -> Result<String>;

    /// Formats a document reconciliation
    fn format_document_check(&self, check: &DocumentCheckResponse) -> Result<String>;
}
