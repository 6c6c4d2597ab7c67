use crate::bom_structure::domain::{ArticleAttributes, ArticleCode, ChildEdge, ParentEdge};
use crate::shared::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// RelationGateway port for read-only access to the legacy structure table
///
/// The gateway hands out sessions; a session is the scoped connection a single
/// resolution runs on. Dropping the session releases the connection, so every
/// exit path of a resolution (success, error, timeout, cancellation) gives it
/// back.
#[async_trait]
pub trait RelationGateway: Send + Sync {
    type Session: RelationSession;

    /// Acquires a session for the duration of one resolution
    ///
    /// # Errors
    /// Returns an error if the underlying connection cannot be established
    async fn open_session(&self) -> Result<Self::Session>;
}

/// RelationSession port exposing the query shapes the core needs
///
/// Every method only reads. Codes passed in are already normalized; rows
/// returned are decoded into typed structs at this boundary.
///
/// # Async Support
/// Implementations must be `Send + Sync`: independent branches of a structure
/// and hydration chunks may be queried concurrently on the same session.
#[async_trait]
pub trait RelationSession: Send + Sync {
    /// Active children of `code`, ordered by sequence ascending
    ///
    /// Only relations without an end date are returned.
    async fn children_of(&self, code: &ArticleCode) -> Result<Vec<ChildEdge>>;

    /// Active parents of `code`
    async fn parents_of(&self, code: &ArticleCode) -> Result<Vec<ParentEdge>>;

    /// Attributes of the given codes, in one query
    ///
    /// Callers keep `codes` below the backend's parameter limit; codes without
    /// an article record are absent from the map.
    async fn attributes_for(
        &self,
        codes: &[ArticleCode],
    ) -> Result<HashMap<ArticleCode, ArticleAttributes>>;
}
