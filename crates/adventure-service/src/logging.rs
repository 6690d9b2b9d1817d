//! Logging decorator for cache orchestration entry points.
//!
//! Read-through and propagation calls are wrapped explicitly instead of being
//! intercepted: each call runs inside a span carrying the operation and entity
//! kind, and its duration and outcome are logged when it finishes.

use crate::cache::EntityKind;
use adventure_core::AdventureResult;
use std::future::Future;
use std::time::Instant;
use tracing::{debug, debug_span, warn, Instrument};

/// Runs `future` inside an operation span and logs how it ended.
///
/// Failures are logged at `warn` and returned unchanged.
pub async fn logged<T, F>(
    operation: &'static str,
    kind: EntityKind,
    future: F,
) -> AdventureResult<T>
where
    F: Future<Output = AdventureResult<T>>,
{
    let span = debug_span!("catalog", operation, kind = kind.as_str());

    async move {
        let start = Instant::now();
        debug!("started");

        let result = future.await;
        let duration_ms = start.elapsed().as_millis();

        match &result {
            Ok(_) => debug!(duration_ms, "completed"),
            Err(error) => warn!(
                duration_ms,
                error_code = error.error_code(),
                error = %error,
                "failed"
            ),
        }

        result
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use adventure_core::AdventureError;

    #[tokio::test]
    async fn test_logged_passes_results_through() {
        let ok = logged("find_by_id", EntityKind::Tour, async { Ok(7) }).await;
        assert_eq!(ok.unwrap(), 7);

        let err = logged::<(), _>("update", EntityKind::Country, async {
            Err(AdventureError::internal("boom"))
        })
        .await;
        assert_eq!(err.unwrap_err().error_code(), "INTERNAL_ERROR");
    }
}
