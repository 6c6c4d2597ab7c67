/// Shared helpers for the integration and end-to-end suites
pub mod log_capture;
pub mod mocks;
