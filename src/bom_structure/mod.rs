/// Domain layer - BOM structures, comparison and reconciliation
///
/// Pure business logic with no I/O: value objects, the node arena used while
/// resolving, and the algorithms that compare and reconcile resolved trees.
pub mod domain;
pub mod policies;
pub mod services;
