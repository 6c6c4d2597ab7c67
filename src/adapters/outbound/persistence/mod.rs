/// Relation store adapters implementing the RelationGateway port
mod caching_relation_gateway;
mod in_memory_relation_store;
mod sqlite_relation_store;

pub use caching_relation_gateway::{CachingRelationGateway, CachingRelationSession};
pub use in_memory_relation_store::{InMemoryRelationSession, InMemoryRelationStore, QueryStats};
pub use sqlite_relation_store::{
    insert_article, insert_relation, install_schema, SqliteRelationSession, SqliteRelationStore,
};
