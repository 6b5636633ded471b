use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use tokio_util::sync::CancellationToken;

/// Configures deadline and retry defaults for a client.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FetchOptions {
    /// Per-call deadline in milliseconds, spanning all attempts.
    pub timeout_ms: u64,
    /// Maximum number of retries after the initial attempt.
    pub max_retries: usize,
    /// Base retry backoff in milliseconds (exponential strategy).
    pub retry_base_ms: u64,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            max_retries: 0,
            retry_base_ms: 300,
        }
    }
}

/// Per-call request descriptor.
///
/// The zero-value descriptor is a plain GET inheriting the client's
/// [`FetchOptions`]. Bodies are sent as-is; callers pre-serialize them.
#[derive(Clone, Debug, Default)]
pub struct FetchRequest {
    /// HTTP method, GET by default.
    pub method: Method,
    /// Pre-serialized request body, sent without transformation.
    pub body: Option<String>,
    /// Extra headers; these win over the client's defaults on conflict.
    pub headers: HeaderMap,
    /// Deadline override in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Retry-count override.
    pub retries: Option<usize>,
    /// Base backoff override in milliseconds.
    pub retry_delay_ms: Option<u64>,
    /// Caller-owned cancellation signal, observed but never fired here.
    pub signal: Option<CancellationToken>,
}

impl FetchRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn with_retries(mut self, retries: usize) -> Self {
        self.retries = Some(retries);
        self
    }

    pub fn with_retry_delay_ms(mut self, retry_delay_ms: u64) -> Self {
        self.retry_delay_ms = Some(retry_delay_ms);
        self
    }

    pub fn with_signal(mut self, signal: CancellationToken) -> Self {
        self.signal = Some(signal);
        self
    }
}
