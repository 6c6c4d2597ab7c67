use crate::application::dto::{AncestorsResponse, ComparisonResponse, DocumentCheckResponse};
use crate::bom_structure::domain::ResolvedStructure;
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;
use anyhow::Context;
use serde::Serialize;

/// JsonFormatter adapter rendering results as pretty-printed JSON
///
/// Every document carries the tool version so stored reports can be traced
/// back to the release that produced them.
pub struct JsonFormatter;

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    tool: &'static str,
    version: &'static str,
    report: &'static str,
    #[serde(flatten)]
    body: &'a T,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }

    fn render<T: Serialize>(kind: &'static str, body: &T) -> Result<String> {
        let envelope = Envelope {
            tool: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            report: kind,
            body,
        };
        serde_json::to_string_pretty(&envelope)
            .with_context(|| format!("Failed to serialize {} as JSON", kind))
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonFormatter {
    fn format_structure(&self, structure: &ResolvedStructure) -> Result<String> {
        Self::render("structure", structure)
    }

    fn format_ancestors(&self, ancestors: &AncestorsResponse) -> Result<String> {
        Self::render("ancestors", ancestors)
    }

    fn format_comparison(&self, comparison: &ComparisonResponse) -> Result<String> {
        Self::render("comparison", comparison)
    }

    fn format_document_check(&self, check: &DocumentCheckResponse) -> Result<String> {
        Self::render("document_check", check)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::AncestorKind;
    use crate::bom_structure::domain::{ArticleCode, BomNode, Quantity};
    use crate::bom_structure::policies::QuantityMode;
    use crate::bom_structure::services::{Reconciler, StructureDiffer};
    use serde_json::Value;

    fn code(raw: &str) -> ArticleCode {
        ArticleCode::new(raw).unwrap()
    }

    fn structure() -> ResolvedStructure {
        let mut root = BomNode::new(code("A"), Quantity::Unspecified, 0);
        root.description = "Frame".to_string();
        root.children
            .push(BomNode::new(code("B"), Quantity::Amount(2.0), 1));
        ResolvedStructure::new(code("A"), vec![root])
    }

    #[test]
    fn test_structure_json_shape() {
        let json = JsonFormatter::new().format_structure(&structure()).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["report"], "structure");
        assert_eq!(value["tool"], "bom-trace");
        assert_eq!(value["origin_code"], "A");
        assert_eq!(value["roots"][0]["description"], "Frame");
        assert_eq!(value["roots"][0]["quantity"], Value::Null);
        assert_eq!(value["roots"][0]["children"][0]["quantity"], "2");
        assert!(value.get("truncated_cycles").is_none());
    }

    #[test]
    fn test_ancestors_json() {
        let response = AncestorsResponse::new(
            code("D"),
            AncestorKind::TerminalAncestors,
            vec![code("A"), code("E")],
        );
        let value: Value =
            serde_json::from_str(&JsonFormatter::new().format_ancestors(&response).unwrap()).unwrap();

        assert_eq!(value["report"], "ancestors");
        assert_eq!(value["kind"], "terminal_ancestors");
        assert_eq!(value["code"], "D");
        assert_eq!(value["ancestors"], serde_json::json!(["A", "E"]));
    }

    #[test]
    fn test_comparison_json_lists_differences_and_unresolved() {
        let other = ResolvedStructure::empty(code("Z"));
        let report = StructureDiffer::compare(&[structure(), other]).unwrap();
        let response = ComparisonResponse {
            report,
            unresolved: vec![code("Z")],
        };

        let value: Value =
            serde_json::from_str(&JsonFormatter::new().format_comparison(&response).unwrap())
                .unwrap();

        assert_eq!(value["compared"], serde_json::json!(["A", "Z"]));
        assert_eq!(value["unresolved"], serde_json::json!(["Z"]));
        assert_eq!(value["differences"][0]["code"], "A");
        assert_eq!(value["structures"][0]["roots"][0]["status"], "New");
    }

    #[test]
    fn test_document_check_json_counts() {
        let report = Reconciler::reconcile(
            code("A"),
            &structure(),
            &["B", "X"],
            QuantityMode::PerInstance,
        );
        let response = DocumentCheckResponse::new(report, QuantityMode::PerInstance);

        let value: Value = serde_json::from_str(
            &JsonFormatter::new()
                .format_document_check(&response)
                .unwrap(),
        )
        .unwrap();

        assert_eq!(value["main_code"], "A");
        assert_eq!(value["missing"]["B"], 1);
        assert_eq!(value["extra"]["X"], 1);
        assert_eq!(value["quantity_mode"], "per_instance");
        assert_eq!(value["analysis_id"].as_str().unwrap().len(), 36);
    }
}
