mod reconciler;
mod report_structure_parser;
mod structure_differ;

pub use reconciler::Reconciler;
pub use report_structure_parser::{ReportRow, ReportStructureParser};
pub use structure_differ::StructureDiffer;
