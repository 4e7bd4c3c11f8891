use crate::config::RetryPolicy;
use reqwest::{RequestBuilder, Response, StatusCode};

/// Send a request built by `build`, retrying transient failures per `policy`.
///
/// Timeouts, connection errors, HTTP 429 and HTTP 5xx are retried with
/// exponential backoff. Any other HTTP response, including client errors, is
/// handed back for the caller to interpret. When retries run out on a
/// retryable status the last response is returned as-is. Other request
/// errors (a malformed URL, a body that cannot be built) fail immediately.
pub(crate) async fn send_with_retry<F>(
    policy: &RetryPolicy,
    service: &str,
    build: F,
) -> Result<Response, String>
where
    F: Fn() -> RequestBuilder,
{
    let mut retry_count = 0;

    loop {
        match build().timeout(policy.timeout).send().await {
            Ok(response) => {
                let status = response.status();
                let is_retryable =
                    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();

                if is_retryable && retry_count < policy.max_retries {
                    retry_count += 1;
                    let backoff = policy.backoff(retry_count);
                    tracing::warn!(
                        service = service,
                        status = %status,
                        "{} returned HTTP {}, retrying in {}ms (attempt {}/{})",
                        service,
                        status,
                        backoff.as_millis(),
                        retry_count + 1,
                        policy.max_retries + 1
                    );
                    tokio::time::sleep(backoff).await;
                    continue;
                }

                return Ok(response);
            }
            Err(e) => {
                let error_msg = if e.is_timeout() {
                    "Request timed out".to_string()
                } else {
                    format!("Request failed: {}", e)
                };

                if is_transient(&e) && retry_count < policy.max_retries {
                    retry_count += 1;
                    let backoff = policy.backoff(retry_count);
                    tracing::warn!(
                        service = service,
                        "{} {}, retrying in {}ms (attempt {}/{})",
                        service,
                        error_msg,
                        backoff.as_millis(),
                        retry_count + 1,
                        policy.max_retries + 1
                    );
                    tokio::time::sleep(backoff).await;
                    continue;
                }

                return Err(format!("{} after {} attempts", error_msg, retry_count + 1));
            }
        }
    }
}

fn is_transient(error: &reqwest::Error) -> bool {
    error.is_timeout() || error.is_connect()
}
