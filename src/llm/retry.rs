//! Retry with exponential backoff for transient LLM failures

use super::{LlmError, LlmRequest, LlmResponse, LlmService};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

pub const MAX_RETRY_ATTEMPTS: u32 = 3;

const BASE_DELAY: Duration = Duration::from_secs(1);

/// Longest provider `retry_after` hint that is honoured. Longer hints end
/// the request with the provider's error instead of sleeping.
pub const MAX_RETRY_AFTER: Duration = Duration::from_secs(60);

/// Wraps a service and retries retryable errors.
///
/// Attempts are capped at [`MAX_RETRY_ATTEMPTS`]. The delay before attempt
/// `n + 1` is `base * 2^(n-1)` (1s, 2s, ...) unless the provider sent a
/// `retry_after` hint, which wins. Hints above [`MAX_RETRY_AFTER`] are not
/// waited out.
pub struct RetryingService {
    inner: Arc<dyn LlmService>,
    base_delay: Duration,
    max_attempts: u32,
}

impl RetryingService {
    pub fn new(inner: Arc<dyn LlmService>) -> Self {
        Self {
            inner,
            base_delay: BASE_DELAY,
            max_attempts: MAX_RETRY_ATTEMPTS,
        }
    }

    #[cfg(test)]
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    fn retry_delay(&self, attempt: u32) -> Duration {
        self.base_delay * (1 << (attempt - 1))
    }
}

#[async_trait]
impl LlmService for RetryingService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let mut attempt = 1;
        loop {
            match self.inner.complete(request).await {
                Ok(response) => return Ok(response),
                Err(e) if e.kind.is_retryable() && attempt < self.max_attempts => {
                    if let Some(hint) = e.retry_after.filter(|d| *d > MAX_RETRY_AFTER) {
                        tracing::warn!(
                            model = %self.inner.model_id(),
                            attempt,
                            retry_after_secs = hint.as_secs(),
                            error = %e.message,
                            "Provider retry hint exceeds limit, not retrying"
                        );
                        return Err(e);
                    }
                    let delay = e.retry_after.unwrap_or_else(|| self.retry_delay(attempt));
                    tracing::warn!(
                        model = %self.inner.model_id(),
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = %delay.as_millis(),
                        error = %e.message,
                        "Retrying LLM request"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmErrorKind;
    use crate::testing::MockLlmService;

    fn retrying(mock: &Arc<MockLlmService>) -> RetryingService {
        RetryingService::new(mock.clone()).with_base_delay(Duration::ZERO)
    }

    #[test]
    fn test_backoff_doubles() {
        let mock = Arc::new(MockLlmService::new("m"));
        let service = RetryingService::new(mock);
        assert_eq!(service.retry_delay(1), Duration::from_secs(1));
        assert_eq!(service.retry_delay(2), Duration::from_secs(2));
        assert_eq!(service.retry_delay(3), Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failures() {
        let mock = Arc::new(MockLlmService::new("m"));
        mock.queue_error(LlmError::network("reset"));
        mock.queue_error(LlmError::server_error("502"));
        mock.queue_text("itinerary");

        let resp = retrying(&mock)
            .complete(&LlmRequest::user_prompt("x"))
            .await
            .unwrap();
        assert_eq!(resp.text, "itinerary");
        assert_eq!(mock.recorded_requests().len(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let mock = Arc::new(MockLlmService::new("m"));
        for _ in 0..5 {
            mock.queue_error(LlmError::rate_limit("busy").with_retry_after(Duration::ZERO));
        }

        let err = retrying(&mock)
            .complete(&LlmRequest::user_prompt("x"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, LlmErrorKind::RateLimit);
        assert_eq!(mock.recorded_requests().len(), MAX_RETRY_ATTEMPTS as usize);
    }

    #[tokio::test]
    async fn test_long_retry_hint_fails_fast() {
        let mock = Arc::new(MockLlmService::new("m"));
        let one_day = Duration::from_secs(86_400);
        mock.queue_error(LlmError::rate_limit("tomorrow").with_retry_after(one_day));
        mock.queue_text("never reached");

        let err = tokio::time::timeout(
            Duration::from_secs(5),
            retrying(&mock).complete(&LlmRequest::user_prompt("x")),
        )
        .await
        .expect("must not wait out the hint")
        .unwrap_err();
        assert_eq!(err.kind, LlmErrorKind::RateLimit);
        assert_eq!(mock.recorded_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_saturated_retry_hint_fails_fast() {
        let mock = Arc::new(MockLlmService::new("m"));
        mock.queue_error(LlmError::rate_limit("busy").with_retry_after(Duration::MAX));

        let err = retrying(&mock)
            .complete(&LlmRequest::user_prompt("x"))
            .await
            .unwrap_err();
        assert_eq!(err.retry_after, Some(Duration::MAX));
        assert_eq!(mock.recorded_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_auth_failure_is_not_retried() {
        let mock = Arc::new(MockLlmService::new("m"));
        mock.queue_error(LlmError::auth("bad key"));
        mock.queue_text("never reached");

        let err = retrying(&mock)
            .complete(&LlmRequest::user_prompt("x"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, LlmErrorKind::Auth);
        assert_eq!(mock.recorded_requests().len(), 1);
    }
}
