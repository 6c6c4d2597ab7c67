/// Type alias for Result with anyhow::Error as the error type.
/// Ports and adapters use it; use cases convert into the typed errors in `shared::error`.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
