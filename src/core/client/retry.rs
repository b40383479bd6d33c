use super::execute::{AttemptOutcome, RequestParts};
use crate::core::{ResponseBody, TsError};
use reqwest::Method;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Configuration for the automatic retry mechanism.
///
/// The pause between attempts is fixed; there is no backoff and no jitter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryConfig {
    /// The number of retries. The total number of attempts will be `num_retries + 1`.
    pub num_retries: u32,
    /// The pause after each retryable failure.
    pub interval: Duration,
}

impl super::TsClient {
    /// Drives one logical call across nodes until it succeeds, fails terminally, or runs out of
    /// attempts, in which case the last retryable error is returned.
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    pub(crate) async fn perform_request(
        &self,
        method: Method,
        endpoint: &str,
        parts: RequestParts<'_>,
    ) -> Result<ResponseBody, TsError> {
        self.config.validate()?;

        let request_number = self.next_request_number();
        #[cfg(feature = "tracing")]
        tracing::debug!(request = request_number, %method, endpoint, "performing request");

        let attempts = self.retry.num_retries.saturating_add(1);
        let mut last_error = None;
        for attempt in 1..=attempts {
            let node = self.selector.select_node(request_number);
            if parts.is_cancelled() {
                return Err(TsError::Cancelled);
            }
            #[cfg(feature = "tracing")]
            tracing::debug!(request = request_number, attempt, node = %node.index(), "attempting request");

            match self
                .execute_attempt(node, &method, endpoint, &parts, request_number)
                .await
            {
                AttemptOutcome::Success(body) => return Ok(body),
                AttemptOutcome::Terminal(e) => return Err(e),
                AttemptOutcome::Retryable(e) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        request = request_number,
                        node = %node.index(),
                        error = %e,
                        interval = ?self.retry.interval,
                        "request failed, sleeping before retry"
                    );
                    last_error = Some(e);
                    pause(self.retry.interval, parts.signal).await;
                }
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(request = request_number, "no retries left, raising last error");
        Err(last_error.unwrap_or_else(|| TsError::Data("no attempt was made".into())))
    }
}

/// Sleeps for the retry interval, cut short if the caller cancels.
async fn pause(interval: Duration, signal: Option<&CancellationToken>) {
    match signal {
        Some(token) => {
            tokio::select! {
                () = token.cancelled() => {}
                () = tokio::time::sleep(interval) => {}
            }
        }
        None => tokio::time::sleep(interval).await,
    }
}
