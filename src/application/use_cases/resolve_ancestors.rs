use super::gateway_call::{article_code, bounded, within_deadline};
use crate::application::dto::{AncestorKind, AncestorsResponse, ResolverSettings};
use crate::bom_structure::domain::ArticleCode;
use crate::ports::outbound::{RelationGateway, RelationSession};
use crate::shared::error::ResolutionError;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::{BTreeSet, HashSet};

/// ResolveAncestorsUseCase - where-used lookups going up the relation table
///
/// # Type Parameters
/// * `G` - RelationGateway implementation
pub struct ResolveAncestorsUseCase<G> {
    gateway: G,
    settings: ResolverSettings,
}

impl<G> ResolveAncestorsUseCase<G>
where
    G: RelationGateway,
{
    pub fn new(gateway: G, settings: ResolverSettings) -> Self {
        Self { gateway, settings }
    }

    /// Direct parents of `child_code`, distinct, in the order the store returns them
    pub async fn parents(&self, child_code: &str) -> Result<AncestorsResponse, ResolutionError> {
        let code = article_code(child_code)?;
        let label = code.to_string();

        within_deadline(self.settings.deadline, &label, async {
            let limit = self.settings.query_timeout;
            let session = bounded(&code, limit, self.gateway.open_session()).await?;
            let edges = bounded(&code, limit, session.parents_of(&code)).await?;

            let mut seen = HashSet::new();
            let parents: Vec<ArticleCode> = edges
                .into_iter()
                .map(|edge| edge.parent_code)
                .filter(|parent| seen.insert(parent.clone()))
                .collect();

            Ok(AncestorsResponse::new(
                code.clone(),
                AncestorKind::DirectParents,
                parents,
            ))
        })
        .await
    }

    /// Top-level articles `child_code` rolls up into
    ///
    /// Walks upwards one generation at a time. Every code is queried at most
    /// once, which also ends the walk on cyclic relations. A code with no
    /// parents is terminal; a code nobody uses is therefore its own terminal
    /// ancestor.
    pub async fn terminal_ancestors(
        &self,
        child_code: &str,
    ) -> Result<AncestorsResponse, ResolutionError> {
        let code = article_code(child_code)?;
        let label = code.to_string();

        within_deadline(self.settings.deadline, &label, async {
            let limit = self.settings.query_timeout;
            let session = bounded(&code, limit, self.gateway.open_session()).await?;

            let mut queried: HashSet<ArticleCode> = HashSet::from([code.clone()]);
            let mut terminal = BTreeSet::new();
            let mut generation = vec![code.clone()];
            let mut parent_queries = 0usize;

            while !generation.is_empty() {
                parent_queries += generation.len();
                let answers: Vec<(ArticleCode, Vec<ArticleCode>)> =
                    stream::iter(generation.iter().map(|current| {
                        let session = &session;
                        async move {
                            let edges = bounded(current, limit, session.parents_of(current)).await?;
                            let parents = edges.into_iter().map(|edge| edge.parent_code).collect();
                            Ok::<_, ResolutionError>((current.clone(), parents))
                        }
                    }))
                    .buffered(self.settings.max_workers.max(1))
                    .try_collect()
                    .await?;

                let mut next = Vec::new();
                for (current, parents) in answers {
                    if parents.is_empty() {
                        terminal.insert(current);
                        continue;
                    }
                    for parent in parents {
                        if queried.insert(parent.clone()) {
                            next.push(parent);
                        }
                    }
                }
                generation = next;
            }

            tracing::debug!(
                target: "bom_trace::ancestors",
                code = %code,
                parent_queries,
                terminal = terminal.len(),
                "Terminal ancestors resolved"
            );

            Ok(AncestorsResponse::new(
                code.clone(),
                AncestorKind::TerminalAncestors,
                terminal.into_iter().collect(),
            ))
        })
        .await
    }
}
