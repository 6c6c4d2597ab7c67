use crate::bom_structure::domain::{ArticleAttributes, ArticleCode, ChildEdge, ParentEdge};
use crate::ports::outbound::{RelationGateway, RelationSession};
use crate::shared::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashMap;

/// CachingRelationGateway wraps a RelationGateway and memoizes relation queries
/// per session.
///
/// Shared subassemblies appear on many branches of a structure; with the cache
/// their children are queried once per resolution. The cache lives and dies with
/// the session, so a new resolution always sees the current table.
pub struct CachingRelationGateway<G: RelationGateway> {
    inner: G,
}

impl<G: RelationGateway> CachingRelationGateway<G> {
    pub fn new(inner: G) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }
}

#[async_trait]
impl<G: RelationGateway> RelationGateway for CachingRelationGateway<G> {
    type Session = CachingRelationSession<G::Session>;

    async fn open_session(&self) -> Result<Self::Session> {
        Ok(CachingRelationSession::new(self.inner.open_session().await?))
    }
}

/// Session decorator holding the children and parents already fetched
pub struct CachingRelationSession<S: RelationSession> {
    inner: S,
    children: DashMap<ArticleCode, Vec<ChildEdge>>,
    parents: DashMap<ArticleCode, Vec<ParentEdge>>,
}

impl<S: RelationSession> CachingRelationSession<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            children: DashMap::new(),
            parents: DashMap::new(),
        }
    }

    /// Number of codes whose children are cached
    pub fn cached_children(&self) -> usize {
        self.children.len()
    }
}

#[async_trait]
impl<S: RelationSession> RelationSession for CachingRelationSession<S> {
    async fn children_of(&self, code: &ArticleCode) -> Result<Vec<ChildEdge>> {
        if let Some(cached) = self.children.get(code) {
            return Ok(cached.clone());
        }

        let children = self.inner.children_of(code).await?;
        self.children.insert(code.clone(), children.clone());
        Ok(children)
    }

    async fn parents_of(&self, code: &ArticleCode) -> Result<Vec<ParentEdge>> {
        if let Some(cached) = self.parents.get(code) {
            return Ok(cached.clone());
        }

        let parents = self.inner.parents_of(code).await?;
        self.parents.insert(code.clone(), parents.clone());
        Ok(parents)
    }

    /// Attribute lookups already run once per resolution and are not cached
    async fn attributes_for(
        &self,
        codes: &[ArticleCode],
    ) -> Result<HashMap<ArticleCode, ArticleAttributes>> {
        self.inner.attributes_for(codes).await
    }
}
