use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use crate::{
    options::{FetchOptions, FetchRequest},
    signal::{CancelCause, EffectiveSignal},
    FetchError, Result,
};

/// Resilient JSON HTTP client.
///
/// Wraps a shared connection pool with a per-call deadline, bounded
/// exponential-backoff retries and cooperative cancellation. Cloning is
/// cheap and shares the pool; concurrent calls share nothing else.
#[derive(Clone, Debug, Default)]
pub struct FetchClient {
    http: reqwest::Client,
    options: FetchOptions,
}

impl FetchClient {
    /// Creates a client with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies client options such as deadline and retry behavior.
    pub fn with_options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    /// Fetches `url` with a plain GET and decodes the JSON response into `T`.
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.fetch_json_with(url, FetchRequest::new()).await
    }

    /// Fetches `url` per `request` and decodes the JSON response into `T`.
    ///
    /// Transport failures, deadline expiry and 5xx statuses are retried up
    /// to the configured count with exponential backoff. A cancel from the
    /// caller's signal, a 4xx status and a JSON decode failure are terminal.
    pub async fn fetch_json_with<T: DeserializeOwned>(
        &self,
        url: &str,
        request: FetchRequest,
    ) -> Result<T> {
        let body = self.send_with_retry(url, &request).await?;
        serde_json::from_str::<T>(&body)
            .map_err(|err| FetchError::Decode(format!("invalid JSON from {url}: {err}")))
    }

    async fn send_with_retry(&self, url: &str, request: &FetchRequest) -> Result<String> {
        let timeout_ms = request.timeout_ms.unwrap_or(self.options.timeout_ms);
        let retries = request.retries.unwrap_or(self.options.max_retries);
        let base_delay_ms = request.retry_delay_ms.unwrap_or(self.options.retry_base_ms);

        // One deadline per call, fixed at entry; it spans every attempt
        // and every backoff wait.
        let signal = EffectiveSignal::new(
            request.signal.clone(),
            Duration::from_millis(timeout_ms),
        );

        let mut attempt = 0u32;
        loop {
            match self.attempt(url, request, &signal).await {
                Ok(body) => return Ok(body),
                Err(failure) => {
                    if failure.retryable() && (attempt as usize) < retries {
                        self.wait_before_retry(attempt, base_delay_ms, &signal)
                            .await?;
                        attempt += 1;
                        continue;
                    }
                    return Err(failure.into_error(url, timeout_ms));
                }
            }
        }
    }

    /// Issues one attempt: send, status check, body read.
    async fn attempt(
        &self,
        url: &str,
        request: &FetchRequest,
        signal: &EffectiveSignal,
    ) -> std::result::Result<String, AttemptFailure> {
        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .headers(merge_headers(&request.headers));
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        // Racing the send against the signal drops the request future on a
        // cancel, which aborts the in-flight exchange.
        let response = tokio::select! {
            biased;
            cause = signal.fired() => return Err(cause.into()),
            sent = builder.send() => sent.map_err(AttemptFailure::Network)?,
        };

        let status = response.status();
        if !status.is_success() {
            let body = read_diagnostic_body(response, signal).await;
            return Err(AttemptFailure::Http { status, body });
        }

        let text = tokio::select! {
            biased;
            cause = signal.fired() => return Err(cause.into()),
            read = response.text() => read.map_err(AttemptFailure::Network)?,
        };
        Ok(text)
    }

    /// Waits `base * 2^attempt` ms before the next attempt.
    ///
    /// Only the caller signal interrupts the wait; deadline expiry is
    /// observed by the next attempt instead.
    async fn wait_before_retry(
        &self,
        attempt: u32,
        base_delay_ms: u64,
        signal: &EffectiveSignal,
    ) -> Result<()> {
        let delay = retry_delay(attempt, Duration::from_millis(base_delay_ms));

        #[cfg(feature = "tracing")]
        tracing::debug!("retrying request after {} ms", delay.as_millis());

        match signal.caller() {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(FetchError::Cancelled),
                _ = sleep(delay) => Ok(()),
            },
            None => {
                sleep(delay).await;
                Ok(())
            }
        }
    }
}

/// Outcome of one failed attempt, before the retry decision.
enum AttemptFailure {
    Network(reqwest::Error),
    Timeout,
    Cancelled,
    Http {
        status: StatusCode,
        body: Option<String>,
    },
}

impl AttemptFailure {
    fn retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout => true,
            Self::Http { status, .. } => should_retry_status(*status),
            Self::Cancelled => false,
        }
    }

    fn into_error(self, url: &str, timeout_ms: u64) -> FetchError {
        match self {
            Self::Network(err) => FetchError::Network(err),
            Self::Timeout => FetchError::Timeout { timeout_ms },
            Self::Cancelled => FetchError::Cancelled,
            Self::Http { status, body } => FetchError::Http {
                status: status.as_u16(),
                url: url.to_owned(),
                body,
            },
        }
    }
}

impl From<CancelCause> for AttemptFailure {
    fn from(cause: CancelCause) -> Self {
        match cause {
            CancelCause::Caller => Self::Cancelled,
            CancelCause::Deadline => Self::Timeout,
        }
    }
}

/// Only server errors are worth another attempt; 4xx is the caller's
/// fault and never retried.
fn should_retry_status(status: StatusCode) -> bool {
    status.is_server_error()
}

/// Backoff before the retry that follows `attempt`: `base * 2^attempt`,
/// saturating instead of overflowing.
fn retry_delay(attempt: u32, base: Duration) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt))
}

/// Default headers merged under the caller's, so the caller wins on
/// conflicting keys.
fn merge_headers(extra: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(extra.len() + 2);
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    for (name, value) in extra {
        headers.insert(name, value.clone());
    }
    headers
}

/// Best-effort body capture for a non-success response. Read failures and
/// cancellation during the read yield `None`; a cancel is then observed
/// at the next suspension point.
async fn read_diagnostic_body(response: Response, signal: &EffectiveSignal) -> Option<String> {
    tokio::select! {
        biased;
        _ = signal.fired() => None,
        read = response.text() => read.ok(),
    }
}
