use crate::shared::Result;

/// OutputPresenter port for delivering a rendered report
///
/// Abstracts where the formatted result ends up (stdout, a file).
pub trait OutputPresenter {
    /// Presents the formatted content
    ///
    /// # Errors
    /// Returns an error if writing to the destination fails
    fn present(&self, content: &str) -> Result<()>;
}
