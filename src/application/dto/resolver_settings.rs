use crate::bom_structure::policies::QuantityMode;
use crate::shared::error::BomError;
use std::time::Duration;

/// Codes per attribute query; stays below common driver parameter limits
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Concurrent gateway calls per resolution
pub const DEFAULT_MAX_WORKERS: usize = 5;

pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Deepest level a component may sit at; deeper structures fail to resolve
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// ResolverSettings - tuning knobs shared by every resolution use case
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverSettings {
    /// Codes per attribute hydration call
    pub chunk_size: usize,
    /// Upper bound of gateway calls in flight at once
    pub max_workers: usize,
    /// Timeout applied to every single gateway call
    pub query_timeout: Duration,
    /// Overall budget for one top-level call; `None` means unbounded
    pub deadline: Option<Duration>,
    pub max_depth: usize,
    pub quantity_mode: QuantityMode,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_workers: DEFAULT_MAX_WORKERS,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            deadline: None,
            max_depth: DEFAULT_MAX_DEPTH,
            quantity_mode: QuantityMode::default(),
        }
    }
}

impl ResolverSettings {
    /// Rejects settings the walk cannot run with
    pub fn validate(&self) -> Result<(), BomError> {
        if self.chunk_size == 0 {
            return Err(BomError::Validation {
                message: "chunk_size must be greater than 0".to_string(),
            });
        }
        if self.max_workers == 0 {
            return Err(BomError::Validation {
                message: "max_workers must be greater than 0".to_string(),
            });
        }
        if self.query_timeout.is_zero() {
            return Err(BomError::Validation {
                message: "query_timeout_ms must be greater than 0".to_string(),
            });
        }
        if self.max_depth == 0 {
            return Err(BomError::Validation {
                message: "max_depth must be greater than 0".to_string(),
            });
        }
        if self.deadline.is_some_and(|deadline| deadline.is_zero()) {
            return Err(BomError::Validation {
                message: "deadline_ms must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}
