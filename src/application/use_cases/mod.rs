/// Use cases module containing application business logic orchestration
mod attribute_hydrator;
mod compare_structures;
mod gateway_call;
mod reconcile_document;
mod resolve_ancestors;
mod resolve_structure;

pub use attribute_hydrator::AttributeHydrator;
pub use compare_structures::CompareStructuresUseCase;
pub use reconcile_document::ReconcileDocumentUseCase;
pub use resolve_ancestors::ResolveAncestorsUseCase;
pub use resolve_structure::ResolveStructureUseCase;
