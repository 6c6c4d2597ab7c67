/// ProgressReporter port for user-facing progress during a command
///
/// Progress goes to the terminal user (stderr), separately from the structured
/// diagnostics emitted through `tracing`.
pub trait ProgressReporter {
    /// Reports a progress message
    fn report(&self, message: &str);

    /// Reports progress of a multi-step operation
    ///
    /// # Arguments
    /// * `current` - Steps done so far
    /// * `total` - Total number of steps
    /// * `message` - Optional message shown next to the bar
    fn report_progress(&self, current: usize, total: usize, message: Option<&str>);

    /// Reports an error or warning message
    fn report_error(&self, message: &str);

    /// Reports completion of an operation
    fn report_completion(&self, message: &str);
}
