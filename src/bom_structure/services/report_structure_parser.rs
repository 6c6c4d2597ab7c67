use crate::bom_structure::domain::{ArticleCode, BomNode, Quantity, ResolvedStructure};
use crate::shared::error::ResolutionError;
use regex::Regex;
use std::sync::OnceLock;

/// First cell of a structure report row: sequence number, one dot per level, code
fn row_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d+)\s*(\.*)\s*([A-Z0-9\-/]+)")
            .expect("Failed to compile structure report row pattern")
    })
}

/// One usable row of an externally produced structure report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub code: ArticleCode,
    pub level: usize,
    pub quantity: Quantity,
    pub description: String,
}

/// ReportStructureParser service for structures that come from a printed or
/// scraped report instead of the relation table
///
/// Reports list one component per row in manufacturing order, with the depth
/// encoded as leading dots (`10 ..AX-12`). The tree is rebuilt with a stack.
pub struct ReportStructureParser;

impl ReportStructureParser {
    /// Parses the cells of one report row; rows that are not components yield `None`
    pub fn parse_row(cells: &[&str]) -> Option<ReportRow> {
        let first = cells.first()?.trim().to_uppercase();
        if first.is_empty() {
            return None;
        }

        let Some(captures) = row_pattern().captures(&first) else {
            tracing::debug!(target: "bom_trace::report", row = first.as_str(), "Row is not a component");
            return None;
        };

        let level = captures.get(2).map_or(0, |dots| dots.as_str().len());
        let code = ArticleCode::new(captures.get(3)?.as_str()).ok()?;

        Some(ReportRow {
            code,
            level,
            quantity: Quantity::parse(cells.get(1).copied()),
            description: cells.get(2).map(|d| d.trim().to_string()).unwrap_or_default(),
        })
    }

    /// Rebuilds the tree of rows listed in pre-order
    ///
    /// # Errors
    /// `ResolutionError::NotFound` when the report only echoes the requested
    /// code back with no description, which is how the report renders an
    /// unknown article.
    pub fn build(origin: ArticleCode, rows: Vec<ReportRow>) -> Result<ResolvedStructure, ResolutionError> {
        let mut roots: Vec<BomNode> = Vec::new();
        let mut open: Vec<BomNode> = Vec::new();

        for row in rows {
            while open.last().is_some_and(|top| top.level >= row.level) {
                if let Some(done) = open.pop() {
                    Self::attach(done, &mut open, &mut roots);
                }
            }

            let mut node = BomNode::new(row.code, row.quantity, row.level);
            node.description = row.description;
            open.push(node);
        }

        while let Some(done) = open.pop() {
            Self::attach(done, &mut open, &mut roots);
        }

        if let [only] = roots.as_slice() {
            if only.code == origin && only.is_leaf() && only.description.trim().is_empty() {
                return Err(ResolutionError::NotFound {
                    code: origin.to_string(),
                });
            }
        }

        Ok(ResolvedStructure::new(origin, roots))
    }

    /// Parses a tab-separated report (code cell, quantity, description per line)
    pub fn parse_tsv(origin: ArticleCode, text: &str) -> Result<ResolvedStructure, ResolutionError> {
        let rows = text
            .lines()
            .filter_map(|line| {
                let cells: Vec<&str> = line.split('\t').collect();
                Self::parse_row(&cells)
            })
            .collect();

        Self::build(origin, rows)
    }

    fn attach(done: BomNode, open: &mut [BomNode], roots: &mut Vec<BomNode>) {
        match open.last_mut() {
            Some(parent) => parent.children.push(done),
            None => roots.push(done),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(raw: &str) -> ArticleCode {
        ArticleCode::new(raw).unwrap()
    }

    #[test]
    fn test_parse_row_reads_level_and_cells() {
        let row = ReportStructureParser::parse_row(&["20 ..ax-12/b", "4", " Spacer "]).unwrap();
        assert_eq!(row.code.as_str(), "AX-12/B");
        assert_eq!(row.level, 2);
        assert_eq!(row.quantity, Quantity::Amount(4.0));
        assert_eq!(row.description, "Spacer");
    }

    #[test]
    fn test_parse_row_rejects_headers_and_blank() {
        assert!(ReportStructureParser::parse_row(&["Code", "Qty"]).is_none());
        assert!(ReportStructureParser::parse_row(&["   "]).is_none());
        assert!(ReportStructureParser::parse_row(&[]).is_none());
    }

    #[test]
    fn test_parse_row_root_without_dots() {
        let row = ReportStructureParser::parse_row(&["1 A100"]).unwrap();
        assert_eq!(row.level, 0);
        assert!(row.quantity.is_unspecified());
    }

    #[test]
    fn test_parse_tsv_rebuilds_nesting() {
        let report = "Code\tQty\tDescription\n\
                      1 A100\t\tFrame\n\
                      2 .B200\t2\tSide panel\n\
                      3 ..D400\t3\tRivet\n\
                      4 .C300\t1\tCross bar\n";

        let structure = ReportStructureParser::parse_tsv(code("A100"), report).unwrap();

        assert_eq!(structure.roots.len(), 1);
        let root = &structure.roots[0];
        assert_eq!(root.description, "Frame");
        let children: Vec<&str> = root.children.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(children, vec!["B200", "C300"]);
        assert_eq!(root.children[0].children[0].code.as_str(), "D400");
        assert_eq!(root.children[0].children[0].quantity, Quantity::Amount(3.0));
    }

    #[test]
    fn test_sibling_after_deep_branch_returns_to_right_parent() {
        let rows = vec![
            ReportStructureParser::parse_row(&["1 A"]).unwrap(),
            ReportStructureParser::parse_row(&["2 .B"]).unwrap(),
            ReportStructureParser::parse_row(&["3 ..C"]).unwrap(),
            ReportStructureParser::parse_row(&["4 ...D"]).unwrap(),
            ReportStructureParser::parse_row(&["5 .E"]).unwrap(),
        ];

        let structure = ReportStructureParser::build(code("A"), rows).unwrap();
        let root = &structure.roots[0];
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[1].code.as_str(), "E");
        assert_eq!(structure.node_count(), 5);
    }

    #[test]
    fn test_echoed_code_without_description_is_not_found() {
        let result = ReportStructureParser::parse_tsv(code("ZZ-1"), "1 ZZ-1\t\t\n");
        assert!(matches!(result, Err(ResolutionError::NotFound { code }) if code == "ZZ-1"));
    }

    #[test]
    fn test_single_described_article_is_valid() {
        let structure = ReportStructureParser::parse_tsv(code("ZZ-1"), "1 ZZ-1\t\tBolt\n").unwrap();
        assert_eq!(structure.node_count(), 1);
    }
}
