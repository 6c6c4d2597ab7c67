use super::ResolveStructureUseCase;
use crate::application::dto::{DocumentCheckResponse, ResolverSettings};
use crate::bom_structure::services::Reconciler;
use crate::ports::outbound::{ProgressReporter, RelationGateway};
use crate::shared::error::ResolutionError;

/// ReconcileDocumentUseCase - checks the codes found on a document against the
/// BOM of its main article
///
/// # Type Parameters
/// * `G` - RelationGateway implementation
/// * `PR` - ProgressReporter implementation
pub struct ReconcileDocumentUseCase<G, PR> {
    resolver: ResolveStructureUseCase<G>,
    progress_reporter: PR,
}

impl<G, PR> ReconcileDocumentUseCase<G, PR>
where
    G: RelationGateway,
    PR: ProgressReporter,
{
    pub fn new(gateway: G, settings: ResolverSettings, progress_reporter: PR) -> Self {
        Self {
            resolver: ResolveStructureUseCase::new(gateway, settings),
            progress_reporter,
        }
    }

    /// Resolves `main_code` and reconciles `extracted_codes` against it
    pub async fn execute<S: AsRef<str>>(
        &self,
        main_code: &str,
        extracted_codes: &[S],
    ) -> Result<DocumentCheckResponse, ResolutionError> {
        self.progress_reporter.report(&format!(
            "🔍 Resolving structure of {}...",
            main_code.trim()
        ));
        let structure = self.resolver.execute(main_code).await?;

        let mode = self.resolver.settings().quantity_mode;
        let report = Reconciler::reconcile(
            structure.origin_code.clone(),
            &structure,
            extracted_codes,
            mode,
        );
        let response = DocumentCheckResponse::new(report, mode);

        tracing::info!(
            target: "bom_trace::reconciler",
            analysis_id = %response.analysis_id,
            main_code = %response.report.main_code,
            discrepancies = response.has_discrepancies(),
            "Document checked"
        );

        let summary = if response.has_discrepancies() {
            format!(
                "⚠️  {} missing, {} extra unit(s) against {}",
                response.report.missing_total(),
                response.report.extra_total(),
                response.report.main_code
            )
        } else {
            format!("✅ Document matches the structure of {}", response.report.main_code)
        };
        self.progress_reporter.report_completion(&summary);

        Ok(response)
    }
}
