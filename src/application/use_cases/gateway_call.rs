use crate::bom_structure::domain::ArticleCode;
use crate::shared::error::ResolutionError;
use std::future::Future;
use std::time::Duration;

/// Parses a caller-supplied code; a code that cannot exist is reported as not found
pub(crate) fn article_code(raw: &str) -> Result<ArticleCode, ResolutionError> {
    ArticleCode::new(raw).map_err(|_| ResolutionError::NotFound {
        code: raw.trim().to_string(),
    })
}

/// Runs one gateway call under `limit`
///
/// A call that does not answer in time is a `Timeout`, never an empty result.
pub(crate) async fn bounded<T, F>(
    code: &ArticleCode,
    limit: Duration,
    call: F,
) -> Result<T, ResolutionError>
where
    F: Future<Output = crate::shared::Result<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(error)) => Err(ResolutionError::gateway(code.as_str(), error)),
        Err(_) => {
            tracing::warn!(
                target: "bom_trace::gateway",
                code = %code,
                timeout_ms = limit.as_millis() as u64,
                "Gateway call timed out"
            );
            Err(ResolutionError::Timeout {
                code: code.to_string(),
                after: limit,
            })
        }
    }
}

/// Applies the caller deadline, if any, to a whole top-level call
pub(crate) async fn within_deadline<T, F>(
    deadline: Option<Duration>,
    label: &str,
    call: F,
) -> Result<T, ResolutionError>
where
    F: Future<Output = Result<T, ResolutionError>>,
{
    let Some(deadline) = deadline else {
        return call.await;
    };

    tokio::time::timeout(deadline, call).await.unwrap_or_else(|_| {
        tracing::warn!(
            target: "bom_trace::resolver",
            code = label,
            deadline_ms = deadline.as_millis() as u64,
            "Deadline exceeded, discarding partial result"
        );
        Err(ResolutionError::DeadlineExceeded {
            code: label.to_string(),
        })
    })
}
