//! bom-trace - Bill-of-Materials resolution over legacy relation tables
//!
//! This library expands article codes into component trees, looks up where
//! articles are used, compares structures, and checks the codes read from a
//! document against the structure of its main article. It follows hexagonal
//! architecture and Domain-Driven Design principles.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`bom_structure`): Value objects, tree model, diff and reconciliation
//! - **Application Layer** (`application`): Use cases, DTOs and factories
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```
//! use bom_trace::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<()> {
//! // Relation table held in memory
//! let store = InMemoryRelationStore::new()
//!     .with_relation("A", "B", Some("2"), 10)?
//!     .with_relation("A", "C", Some("1"), 20)?
//!     .with_relation("B", "D", Some("3"), 10)?;
//!
//! // Create use case
//! let use_case = ResolveStructureUseCase::new(store, ResolverSettings::default());
//!
//! // Execute
//! let structure = use_case.execute("a").await?;
//! assert_eq!(structure.node_count(), 4);
//!
//! // Format output
//! let formatter = MarkdownFormatter::new();
//! println!("{}", formatter.format_structure(&structure)?);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod bom_structure;
pub mod cli;
pub mod config;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        FileSystemReader, FileSystemWriter, StdoutPresenter,
    };
    pub use crate::adapters::outbound::formatters::{JsonFormatter, MarkdownFormatter};
    pub use crate::adapters::outbound::persistence::{
        CachingRelationGateway, InMemoryRelationStore, SqliteRelationStore,
    };
    pub use crate::application::dto::{
        AncestorKind, AncestorsResponse, ComparisonResponse, DocumentCheckResponse, OutputFormat,
        ResolverSettings,
    };
    pub use crate::application::use_cases::{
        CompareStructuresUseCase, ReconcileDocumentUseCase, ResolveAncestorsUseCase,
        ResolveStructureUseCase,
    };
    pub use crate::bom_structure::domain::{
        ArticleAttributes, ArticleCode, BomNode, CodeCounts, CycleTruncation, DiffEntry,
        DiffReport, NodeStatus, Quantity, ReconciliationReport, RelationEdge, ResolvedStructure,
    };
    pub use crate::bom_structure::policies::QuantityMode;
    pub use crate::bom_structure::services::{Reconciler, ReportStructureParser, StructureDiffer};
    pub use crate::ports::outbound::{
        InputReader, OutputPresenter, ProgressReporter, RelationGateway, RelationSession,
        ReportFormatter,
    };
    pub use crate::shared::error::{BomError, ComparisonError, ExitCode, ResolutionError};
    pub use crate::shared::Result;
}
