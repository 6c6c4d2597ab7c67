/// Data Transfer Objects for application layer
///
/// DTOs carry settings into the use cases and results out to the formatters,
/// keeping the domain layer isolated from presentation concerns.
mod ancestors_response;
mod comparison_response;
mod document_check_response;
mod output_format;
mod resolver_settings;

pub use ancestors_response::{AncestorKind, AncestorsResponse};
pub use comparison_response::ComparisonResponse;
pub use document_check_response::DocumentCheckResponse;
pub use output_format::OutputFormat;
pub use resolver_settings::ResolverSettings;
