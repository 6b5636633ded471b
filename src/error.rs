/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Network or request execution error from `reqwest`.
    #[error("network error: {0}")]
    Network(reqwest::Error),
    /// The per-call deadline elapsed before the exchange completed.
    #[error("timeout after {timeout_ms} ms")]
    Timeout {
        /// Effective deadline for the call, in milliseconds.
        timeout_ms: u64,
    },
    /// The caller-owned cancellation signal fired.
    #[error("request cancelled")]
    Cancelled,
    /// Non-success HTTP status code with the request URL and raw body.
    #[error("http error {status} for {url}")]
    Http {
        status: u16,
        url: String,
        /// Response body text, captured best-effort for diagnostics.
        body: Option<String>,
    },
    /// Response body is not the expected JSON despite a success status.
    #[error("decode error: {0}")]
    Decode(String),
}
