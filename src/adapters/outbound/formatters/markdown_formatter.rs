use crate::application::dto::{
    AncestorKind, AncestorsResponse, ComparisonResponse, DocumentCheckResponse,
};
use crate::bom_structure::domain::{AnnotatedNode, ArticleCode, CodeCounts, ResolvedStructure};
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;

/// Markdown table header for structure rows
const STRUCTURE_HEADER: &str = "| Level | Code | Quantity | Description | Revision |\n";
const STRUCTURE_SEPARATOR: &str = "|-------|------|----------|-------------|----------|\n";

const ANNOTATED_HEADER: &str = "| Level | Code | Quantity | Description | Status |\n";
const ANNOTATED_SEPARATOR: &str = "|-------|------|----------|-------------|--------|\n";

const DIFF_HEADER: &str = "| Code | Present in | Missing in |\n";
const DIFF_SEPARATOR: &str = "|------|------------|------------|\n";

const COUNT_HEADER: &str = "| Code | Units |\n";
const COUNT_SEPARATOR: &str = "|------|-------|\n";

/// MarkdownFormatter adapter rendering results as Markdown documents
///
/// Trees are rendered as tables in pre-order, with the depth shown by leading
/// dots on the code the way printed structure reports do.
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Escapes pipe characters and newlines for safe Markdown table rendering
    fn escape_markdown_table_cell(text: &str) -> String {
        text.replace('|', "\\|").replace('\n', " ")
    }

    fn indented_code(code: &ArticleCode, level: usize) -> String {
        format!("{}{}", ".".repeat(level), code)
    }

    fn join_codes(codes: &[ArticleCode]) -> String {
        codes
            .iter()
            .map(ArticleCode::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper methods for rendering sections
impl MarkdownFormatter {
    fn render_structure_table(&self, output: &mut String, structure: &ResolvedStructure) {
        output.push_str(STRUCTURE_HEADER);
        output.push_str(STRUCTURE_SEPARATOR);

        for node in structure.nodes() {
            output.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                node.level,
                Self::indented_code(&node.code, node.level),
                node.quantity,
                Self::escape_markdown_table_cell(&node.description),
                Self::escape_markdown_table_cell(&node.revision_letter)
            ));
        }
        output.push('\n');
    }

    fn render_truncations(&self, output: &mut String, structure: &ResolvedStructure) {
        if structure.truncated_cycles.is_empty() {
            return;
        }

        output.push_str("## Truncated Cycles\n\n");
        output.push_str(
            "The relation table loops back on itself; these repeated codes were not expanded.\n\n",
        );
        for truncation in &structure.truncated_cycles {
            output.push_str(&format!(
                "- {} → {} (level {})\n",
                truncation.parent, truncation.repeated, truncation.level
            ));
        }
        output.push('\n');
    }

    fn render_annotated_table(&self, output: &mut String, roots: &[AnnotatedNode]) {
        output.push_str(ANNOTATED_HEADER);
        output.push_str(ANNOTATED_SEPARATOR);

        for node in roots.iter().flat_map(|root| root.iter()) {
            output.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                node.level,
                Self::indented_code(&node.code, node.level),
                node.quantity,
                Self::escape_markdown_table_cell(&node.description),
                node.status
            ));
        }
        output.push('\n');
    }

    fn render_counts(&self, output: &mut String, title: &str, counts: &CodeCounts) {
        output.push_str(&format!("## {}\n\n", title));
        if counts.is_empty() {
            output.push_str("*None*\n\n");
            return;
        }

        output.push_str(COUNT_HEADER);
        output.push_str(COUNT_SEPARATOR);
        for (code, units) in counts {
            output.push_str(&format!("| {} | {} |\n", code, units));
        }
        output.push('\n');
    }
}

impl ReportFormatter for MarkdownFormatter {
    fn format_structure(&self, structure: &ResolvedStructure) -> Result<String> {
        let mut output = String::new();
        output.push_str(&format!(
            "# Bill of Materials: {}\n\n",
            structure.origin_code
        ));
        self.render_structure_table(&mut output, structure);
        self.render_truncations(&mut output, structure);
        Ok(output)
    }

    fn format_ancestors(&self, ancestors: &AncestorsResponse) -> Result<String> {
        let title = match ancestors.kind {
            AncestorKind::DirectParents => "Direct Parents",
            AncestorKind::TerminalAncestors => "Terminal Ancestors",
        };

        let mut output = format!("# {} of {}\n\n", title, ancestors.code);
        if ancestors.ancestors.is_empty() {
            output.push_str("*No parent articles use this code*\n");
        } else {
            for code in &ancestors.ancestors {
                output.push_str(&format!("- {}\n", code));
            }
        }
        Ok(output)
    }

    fn format_comparison(&self, comparison: &ComparisonResponse) -> Result<String> {
        let report = &comparison.report;
        let mut output = String::from("# Structure Comparison\n\n");
        output.push_str(&format!(
            "Compared: {}\n\n",
            Self::join_codes(&report.compared)
        ));

        if !comparison.unresolved.is_empty() {
            output.push_str(&format!(
                "⚠️ Not found, compared as empty: {}\n\n",
                Self::join_codes(&comparison.unresolved)
            ));
        }

        output.push_str("## Differences\n\n");
        if report.differences.is_empty() {
            output.push_str("*All structures contain the same codes*\n\n");
        } else {
            output.push_str(DIFF_HEADER);
            output.push_str(DIFF_SEPARATOR);
            for entry in &report.differences {
                output.push_str(&format!(
                    "| {} | {} | {} |\n",
                    entry.code,
                    Self::join_codes(&entry.present_in),
                    Self::join_codes(&entry.missing_in)
                ));
            }
            output.push('\n');
        }

        for structure in &report.structures {
            output.push_str(&format!("## Structure {}\n\n", structure.origin_code));
            if structure.roots.is_empty() {
                output.push_str("*Empty structure*\n\n");
                continue;
            }
            self.render_annotated_table(&mut output, &structure.roots);
        }

        Ok(output)
    }

    fn format_document_check(&self, check: &DocumentCheckResponse) -> Result<String> {
        let report = &check.report;
        let mut output = format!("# Document Check: {}\n\n", report.main_code);
        output.push_str(&format!("- Analysis: `{}`\n", check.analysis_id));
        output.push_str(&format!(
            "- Checked at: {}\n",
            check.checked_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        output.push_str(&format!("- Expected units: {}\n", report.total_expected));
        output.push_str(&format!("- Observed units: {}\n\n", report.total_observed));

        if check.has_discrepancies() {
            output.push_str("**Result:** ⚠️ Discrepancies found\n\n");
        } else {
            output.push_str("**Result:** ✅ Document matches the structure\n\n");
        }

        self.render_counts(&mut output, "Missing", &report.missing);
        self.render_counts(&mut output, "Extra", &report.extra);
        self.render_counts(&mut output, "Matched", &report.matched);
        Ok(output)
    }
}
