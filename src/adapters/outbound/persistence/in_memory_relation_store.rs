use crate::bom_structure::domain::{
    ArticleAttributes, ArticleCode, ChildEdge, ParentEdge, Quantity, RelationEdge,
};
use crate::ports::outbound::{RelationGateway, RelationSession};
use crate::shared::Result;
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Call counters shared by a store and every session it opened
#[derive(Debug, Default)]
pub struct QueryStats {
    sessions_opened: AtomicUsize,
    sessions_active: AtomicUsize,
    children_queries: AtomicUsize,
    parents_queries: AtomicUsize,
    attribute_queries: AtomicUsize,
    largest_attribute_batch: AtomicUsize,
}

impl QueryStats {
    pub fn sessions_opened(&self) -> usize {
        self.sessions_opened.load(Ordering::SeqCst)
    }

    /// Sessions not yet dropped
    pub fn sessions_active(&self) -> usize {
        self.sessions_active.load(Ordering::SeqCst)
    }

    pub fn children_queries(&self) -> usize {
        self.children_queries.load(Ordering::SeqCst)
    }

    pub fn parents_queries(&self) -> usize {
        self.parents_queries.load(Ordering::SeqCst)
    }

    pub fn attribute_queries(&self) -> usize {
        self.attribute_queries.load(Ordering::SeqCst)
    }

    pub fn largest_attribute_batch(&self) -> usize {
        self.largest_attribute_batch.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Default)]
struct RelationTable {
    relations: Vec<RelationEdge>,
    articles: HashMap<ArticleCode, ArticleAttributes>,
    latency: Option<Duration>,
    failing_codes: Vec<ArticleCode>,
    refuse_sessions: bool,
}

/// InMemoryRelationStore adapter holding a relation table in memory
///
/// Used for tests and for structures assembled outside a database. Clones
/// share the same table and counters.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRelationStore {
    table: Arc<RelationTable>,
    stats: Arc<QueryStats>,
}

impl InMemoryRelationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an active relation; codes are normalized like the database does
    pub fn with_relation(
        self,
        parent: &str,
        child: &str,
        quantity: Option<&str>,
        sequence: i64,
    ) -> Result<Self> {
        let edge = RelationEdge::new(
            ArticleCode::new(parent).context("Invalid parent code")?,
            ArticleCode::new(child).context("Invalid child code")?,
            Quantity::parse(quantity),
            sequence,
        );
        Ok(self.with_edge(edge))
    }

    pub fn with_edge(mut self, edge: RelationEdge) -> Self {
        Arc::make_mut(&mut self.table).relations.push(edge);
        self
    }

    pub fn with_article(mut self, code: &str, description: &str, revision_letter: &str) -> Result<Self> {
        let code = ArticleCode::new(code).context("Invalid article code")?;
        Arc::make_mut(&mut self.table)
            .articles
            .insert(code, ArticleAttributes::new(description, revision_letter));
        Ok(self)
    }

    /// Delays every query by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        Arc::make_mut(&mut self.table).latency = Some(latency);
        self
    }

    /// Makes every relation query about `code` fail
    pub fn failing_on(mut self, code: &str) -> Result<Self> {
        let code = ArticleCode::new(code).context("Invalid article code")?;
        Arc::make_mut(&mut self.table).failing_codes.push(code);
        Ok(self)
    }

    /// Makes `open_session` fail
    pub fn refusing_sessions(mut self) -> Self {
        Arc::make_mut(&mut self.table).refuse_sessions = true;
        self
    }

    pub fn stats(&self) -> &QueryStats {
        &self.stats
    }
}

#[async_trait]
impl RelationGateway for InMemoryRelationStore {
    type Session = InMemoryRelationSession;

    async fn open_session(&self) -> Result<Self::Session> {
        if self.table.refuse_sessions {
            return Err(anyhow!("relation store refused the connection"));
        }
        self.stats.sessions_opened.fetch_add(1, Ordering::SeqCst);
        self.stats.sessions_active.fetch_add(1, Ordering::SeqCst);
        Ok(InMemoryRelationSession {
            table: Arc::clone(&self.table),
            stats: Arc::clone(&self.stats),
        })
    }
}

/// Session over an [`InMemoryRelationStore`]; dropping it releases the slot
#[derive(Debug)]
pub struct InMemoryRelationSession {
    table: Arc<RelationTable>,
    stats: Arc<QueryStats>,
}

impl InMemoryRelationSession {
    async fn simulate(&self, code: &ArticleCode) -> Result<()> {
        if let Some(latency) = self.table.latency {
            tokio::time::sleep(latency).await;
        }
        if self.table.failing_codes.contains(code) {
            return Err(anyhow!("simulated failure querying {}", code));
        }
        Ok(())
    }
}

impl Drop for InMemoryRelationSession {
    fn drop(&mut self) {
        self.stats.sessions_active.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl RelationSession for InMemoryRelationSession {
    async fn children_of(&self, code: &ArticleCode) -> Result<Vec<ChildEdge>> {
        self.stats.children_queries.fetch_add(1, Ordering::SeqCst);
        self.simulate(code).await?;

        let mut children: Vec<ChildEdge> = self
            .table
            .relations
            .iter()
            .filter(|edge| edge.is_active() && &edge.parent_code == code)
            .map(|edge| ChildEdge {
                child_code: edge.child_code.clone(),
                quantity: edge.quantity.clone(),
                sequence: edge.sequence,
            })
            .collect();
        children.sort_by_key(|edge| edge.sequence);
        Ok(children)
    }

    async fn parents_of(&self, code: &ArticleCode) -> Result<Vec<ParentEdge>> {
        self.stats.parents_queries.fetch_add(1, Ordering::SeqCst);
        self.simulate(code).await?;

        Ok(self
            .table
            .relations
            .iter()
            .filter(|edge| edge.is_active() && &edge.child_code == code)
            .map(|edge| ParentEdge {
                parent_code: edge.parent_code.clone(),
            })
            .collect())
    }

    async fn attributes_for(
        &self,
        codes: &[ArticleCode],
    ) -> Result<HashMap<ArticleCode, ArticleAttributes>> {
        self.stats.attribute_queries.fetch_add(1, Ordering::SeqCst);
        self.stats
            .largest_attribute_batch
            .fetch_max(codes.len(), Ordering::SeqCst);
        if let Some(latency) = self.table.latency {
            tokio::time::sleep(latency).await;
        }

        Ok(codes
            .iter()
            .filter_map(|code| {
                self.table
                    .articles
                    .get(code)
                    .map(|attributes| (code.clone(), attributes.clone()))
            })
            .collect())
    }
}
