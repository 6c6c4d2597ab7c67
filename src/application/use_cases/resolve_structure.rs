use super::attribute_hydrator::AttributeHydrator;
use super::gateway_call::{article_code, bounded, within_deadline};
use crate::application::dto::ResolverSettings;
use crate::bom_structure::domain::{
    ArticleAttributes, ArticleCode, ChildEdge, CycleTruncation, NodeId, ResolvedStructure,
    TreeArena,
};
use crate::ports::outbound::{RelationGateway, RelationSession};
use crate::shared::error::ResolutionError;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::time::Instant;

/// ResolveStructureUseCase - expands an article into its full component tree
///
/// The walk is breadth-first over a [`TreeArena`]: every level of the frontier
/// is queried with at most `max_workers` children queries in flight, and
/// results are applied in frontier order so the tree is the same whatever the
/// completion order. A code already on the path from the root to the node being
/// expanded is skipped and recorded as a [`CycleTruncation`]; the same code may
/// still appear on other branches. A component below `max_depth` fails the
/// whole walk.
///
/// # Type Parameters
/// * `G` - RelationGateway implementation
pub struct ResolveStructureUseCase<G> {
    gateway: G,
    settings: ResolverSettings,
    hydrator: AttributeHydrator,
}

impl<G> ResolveStructureUseCase<G>
where
    G: RelationGateway,
{
    pub fn new(gateway: G, settings: ResolverSettings) -> Self {
        let hydrator = AttributeHydrator::new(&settings);
        Self {
            gateway,
            settings,
            hydrator,
        }
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Resolves the structure of `root_code` under the configured deadline
    ///
    /// # Errors
    /// - `NotFound` if the article has neither components nor attributes
    /// - `Timeout` if a single gateway call does not answer in time
    /// - `DeadlineExceeded` if the whole walk takes longer than the deadline
    /// - `DepthExceeded` if a component sits below `max_depth`
    /// - `Gateway` if the relation store fails
    pub async fn execute(&self, root_code: &str) -> Result<ResolvedStructure, ResolutionError> {
        let code = article_code(root_code)?;
        let label = code.to_string();
        within_deadline(self.settings.deadline, &label, self.resolve(code)).await
    }

    /// Resolves without applying the deadline; callers combining several
    /// resolutions apply one deadline over all of them
    pub(crate) async fn resolve(
        &self,
        code: ArticleCode,
    ) -> Result<ResolvedStructure, ResolutionError> {
        let started = Instant::now();
        let session = bounded(
            &code,
            self.settings.query_timeout,
            self.gateway.open_session(),
        )
        .await?;

        let mut arena = TreeArena::with_root(code.clone());
        let mut truncations = Vec::new();
        let mut frontier = vec![TreeArena::ROOT];
        let mut children_queries = 0usize;

        while !frontier.is_empty() {
            children_queries += frontier.len();
            let expansions = self.expand(&session, &arena, &frontier).await?;

            let mut next = Vec::new();
            for (parent, edges) in expansions {
                for edge in edges {
                    if arena.path_contains(parent, &edge.child_code) {
                        let truncation = CycleTruncation {
                            parent: arena.code(parent).clone(),
                            repeated: edge.child_code,
                            level: arena.level(parent) + 1,
                        };
                        tracing::warn!(
                            target: "bom_trace::resolver",
                            root = %code,
                            parent = %truncation.parent,
                            repeated = %truncation.repeated,
                            level = truncation.level,
                            "Cycle in relation table, repeated code omitted"
                        );
                        truncations.push(truncation);
                        continue;
                    }

                    if arena.level(parent) >= self.settings.max_depth {
                        tracing::warn!(
                            target: "bom_trace::resolver",
                            root = %code,
                            parent = %arena.code(parent),
                            max_depth = self.settings.max_depth,
                            "Depth limit exceeded, resolution aborted"
                        );
                        return Err(ResolutionError::DepthExceeded {
                            code: code.to_string(),
                            max_depth: self.settings.max_depth,
                        });
                    }

                    next.push(arena.push_child(parent, edge.child_code, edge.quantity));
                }
            }
            frontier = next;
        }

        let attributes = self.hydrator.hydrate(&session, &arena.codes()).await?;
        let root_unknown = attributes
            .get(&code)
            .map_or(true, ArticleAttributes::is_empty);
        if arena.children(TreeArena::ROOT).is_empty() && root_unknown {
            tracing::debug!(target: "bom_trace::resolver", code = %code, "Article not found");
            return Err(ResolutionError::NotFound {
                code: code.to_string(),
            });
        }

        tracing::debug!(
            target: "bom_trace::resolver",
            root = %code,
            nodes = arena.len(),
            children_queries,
            truncations = truncations.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Structure resolved"
        );

        let root = arena.into_tree(&attributes);
        Ok(ResolvedStructure::new(code, vec![root]).with_truncations(truncations))
    }

    /// Queries the children of every frontier node, at most `max_workers` at once
    async fn expand(
        &self,
        session: &G::Session,
        arena: &TreeArena,
        frontier: &[NodeId],
    ) -> Result<Vec<(NodeId, Vec<ChildEdge>)>, ResolutionError> {
        let limit = self.settings.query_timeout;

        stream::iter(frontier.iter().map(|&id| {
            let code = arena.code(id).clone();
            async move {
                let mut edges = bounded(&code, limit, session.children_of(&code)).await?;
                edges.sort_by_key(|edge| edge.sequence);
                Ok::<_, ResolutionError>((id, edges))
            }
        }))
        .buffered(self.settings.max_workers.max(1))
        .try_collect()
        .await
    }
}
