use crate::bom_structure::domain::{
    saturating_total, ArticleCode, BomNode, CodeCounts, Quantity, ReconciliationReport,
    ResolvedStructure,
};
use crate::bom_structure::policies::QuantityMode;

/// Reconciler service comparing a BOM against codes observed in a document
///
/// The expected side is the flattened BOM (one entry per required unit), the
/// observed side is the list of codes an external extraction produced. Both
/// become multisets and are compared code by code.
pub struct Reconciler;

impl Reconciler {
    /// Flattens the components of a structure into an expected multiset
    ///
    /// Roots are the article being checked and are not counted; every node
    /// below them is, once per occurrence in the tree. Blank quantities count as
    /// one, malformed ones are logged and count as one. Counts saturate at
    /// `u64::MAX`.
    pub fn flatten(structure: &ResolvedStructure, mode: QuantityMode) -> CodeCounts {
        let mut counts = CodeCounts::new();
        let mut stack: Vec<(&BomNode, u64)> = structure
            .roots
            .iter()
            .rev()
            .flat_map(|root| root.children.iter().rev().map(|child| (child, 1)))
            .collect();

        while let Some((node, inherited)) = stack.pop() {
            let own = Self::multiplicity(node);
            let (count, passed_down) = mode.apply(own, inherited);

            if count > 0 {
                let total = counts.entry(node.code.clone()).or_insert(0);
                *total = total.saturating_add(count);
            }

            stack.extend(node.children.iter().rev().map(|child| (child, passed_down)));
        }

        counts
    }

    /// Counts observed codes, normalizing each one and skipping blanks
    pub fn count_observed<S: AsRef<str>>(extracted_codes: &[S]) -> CodeCounts {
        let mut counts = CodeCounts::new();
        for raw in extracted_codes {
            match ArticleCode::new(raw.as_ref()) {
                Ok(code) => *counts.entry(code).or_insert(0) += 1,
                Err(e) => {
                    tracing::warn!(
                        target: "bom_trace::reconciler",
                        raw = raw.as_ref(),
                        error = %e,
                        "Ignoring unusable extracted code"
                    );
                }
            }
        }
        counts
    }

    /// Compares an expected multiset against an observed one
    pub fn compare_counts(
        main_code: ArticleCode,
        expected: &CodeCounts,
        observed: &CodeCounts,
    ) -> ReconciliationReport {
        let mut matched = CodeCounts::new();
        let mut missing = CodeCounts::new();
        let mut extra = CodeCounts::new();

        for (code, &want) in expected {
            let seen = observed.get(code).copied().unwrap_or(0);
            if seen < want {
                missing.insert(code.clone(), want - seen);
            } else if seen > want {
                extra.insert(code.clone(), seen - want);
            } else {
                matched.insert(code.clone(), want);
            }
        }

        for (code, &seen) in observed {
            if !expected.contains_key(code) {
                extra.insert(code.clone(), seen);
            }
        }

        ReconciliationReport {
            main_code,
            total_expected: saturating_total(expected),
            total_observed: saturating_total(observed),
            matched,
            missing,
            extra,
        }
    }

    /// Flattens `structure` and reconciles it against `extracted_codes`
    pub fn reconcile<S: AsRef<str>>(
        main_code: ArticleCode,
        structure: &ResolvedStructure,
        extracted_codes: &[S],
        mode: QuantityMode,
    ) -> ReconciliationReport {
        let expected = Self::flatten(structure, mode);
        let observed = Self::count_observed(extracted_codes);

        tracing::debug!(
            target: "bom_trace::reconciler",
            main_code = %main_code,
            expected_codes = expected.len(),
            observed_codes = observed.len(),
            "Reconciling document against structure"
        );

        let report = Self::compare_counts(main_code, &expected, &observed);

        tracing::info!(
            target: "bom_trace::reconciler",
            main_code = %report.main_code,
            matched = report.matched.len(),
            missing = report.missing.len(),
            extra = report.extra.len(),
            "Reconciliation finished"
        );

        report
    }

    fn multiplicity(node: &BomNode) -> u64 {
        match node.quantity.multiplicity() {
            Some(value) => value,
            None => {
                if let Quantity::Malformed(raw) = &node.quantity {
                    tracing::warn!(
                        target: "bom_trace::reconciler",
                        code = %node.code,
                        quantity = raw.as_str(),
                        "Malformed quantity, counting one unit"
                    );
                }
                QuantityMode::multiplicity_or_default(&node.quantity)
            }
        }
    }
}
