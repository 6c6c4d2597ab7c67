use super::gateway_call::within_deadline;
use super::ResolveStructureUseCase;
use crate::application::dto::{ComparisonResponse, ResolverSettings};
use crate::bom_structure::domain::{ArticleCode, ResolvedStructure};
use crate::bom_structure::services::StructureDiffer;
use crate::ports::outbound::{ProgressReporter, RelationGateway};
use crate::shared::error::{ComparisonError, ResolutionError};
use crate::shared::Result;

/// CompareStructuresUseCase - resolves several articles and diffs their structures
///
/// Structures imported from reports can be compared alongside the resolved
/// ones. A requested code that does not exist takes part as an empty structure
/// and is listed in the response; any other resolution failure fails the call.
///
/// # Type Parameters
/// * `G` - RelationGateway implementation
/// * `PR` - ProgressReporter implementation
pub struct CompareStructuresUseCase<G, PR> {
    resolver: ResolveStructureUseCase<G>,
    progress_reporter: PR,
}

impl<G, PR> CompareStructuresUseCase<G, PR>
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

    /// Compares the structures of `codes` and `imported` structures
    ///
    /// # Errors
    /// - `ComparisonError::InsufficientInput` when fewer than two structures are given
    /// - any `ResolutionError` other than `NotFound`
    pub async fn execute(
        &self,
        codes: &[String],
        imported: Vec<ResolvedStructure>,
    ) -> Result<ComparisonResponse> {
        let given = codes.len() + imported.len();
        if given < 2 {
            return Err(ComparisonError::InsufficientInput { given }.into());
        }

        let label = codes.join(",");
        let (mut structures, unresolved) = within_deadline(
            self.resolver.settings().deadline,
            &label,
            self.resolve_all(codes),
        )
        .await?;

        if !imported.is_empty() {
            self.progress_reporter.report(&format!(
                "📄 Including {} structure(s) imported from reports",
                imported.len()
            ));
        }
        structures.extend(imported);

        let report = StructureDiffer::compare(&structures)?;

        self.progress_reporter.report_completion(&format!(
            "✅ Compared {} structure(s): {} differing code(s)",
            report.compared.len(),
            report.differences.len()
        ));

        Ok(ComparisonResponse { report, unresolved })
    }

    async fn resolve_all(
        &self,
        codes: &[String],
    ) -> std::result::Result<(Vec<ResolvedStructure>, Vec<ArticleCode>), ResolutionError> {
        let mut structures = Vec::with_capacity(codes.len());
        let mut unresolved = Vec::new();

        for (index, raw) in codes.iter().enumerate() {
            self.progress_reporter
                .report_progress(index + 1, codes.len(), Some(raw.as_str()));

            let code = super::gateway_call::article_code(raw)?;
            match self.resolver.resolve(code.clone()).await {
                Ok(structure) => structures.push(structure),
                Err(ResolutionError::NotFound { .. }) => {
                    self.progress_reporter
                        .report_error(&format!("⚠️  Article not found: {}", code));
                    structures.push(ResolvedStructure::empty(code.clone()));
                    unresolved.push(code);
                }
                Err(error) => return Err(error),
            }
        }

        Ok((structures, unresolved))
    }
}
