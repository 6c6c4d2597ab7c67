use super::gateway_call::bounded;
use crate::application::dto::ResolverSettings;
use crate::bom_structure::domain::{ArticleAttributes, ArticleCode};
use crate::ports::outbound::RelationSession;
use crate::shared::error::ResolutionError;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

/// AttributeHydrator - fetches descriptions and revision letters in chunks
///
/// Runs once per resolution, after the tree is complete, instead of once per
/// node. Chunks may be in flight concurrently; results are merged by code so
/// the outcome does not depend on completion order.
#[derive(Debug, Clone)]
pub struct AttributeHydrator {
    chunk_size: usize,
    max_workers: usize,
    query_timeout: Duration,
}

impl AttributeHydrator {
    pub fn new(settings: &ResolverSettings) -> Self {
        Self {
            chunk_size: settings.chunk_size.max(1),
            max_workers: settings.max_workers.max(1),
            query_timeout: settings.query_timeout,
        }
    }

    pub async fn hydrate<S: RelationSession>(
        &self,
        session: &S,
        codes: &BTreeSet<ArticleCode>,
    ) -> Result<HashMap<ArticleCode, ArticleAttributes>, ResolutionError> {
        let codes: Vec<ArticleCode> = codes.iter().cloned().collect();
        let limit = self.query_timeout;

        let parts: Vec<HashMap<ArticleCode, ArticleAttributes>> = stream::iter(
            codes
                .chunks(self.chunk_size)
                .enumerate()
                .map(|(index, chunk)| async move {
                    tracing::debug!(
                        target: "bom_trace::hydrator",
                        chunk = index,
                        size = chunk.len(),
                        "Fetching article attributes"
                    );
                    bounded(&chunk[0], limit, session.attributes_for(chunk)).await
                }),
        )
        .buffered(self.max_workers)
        .try_collect()
        .await?;

        let mut merged = HashMap::with_capacity(codes.len());
        for part in parts {
            merged.extend(part);
        }
        Ok(merged)
    }
}
