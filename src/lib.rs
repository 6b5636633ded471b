//! `renderlab-http` is a resilient async JSON HTTP client.
//!
//! One entry point wraps JSON retrieval with a per-call deadline, bounded
//! exponential-backoff retries, cooperative cancellation and a typed error
//! taxonomy:
//! - [`FetchClient::fetch_json`]
//! - [`FetchClient::fetch_json_with`]
//!
//! [`PlaceholderApi`] layers the typed data loaders used by the RenderLab
//! demo pages on top of the client.

mod api;
mod client;
mod error;
mod options;
mod signal;
mod types;

pub use api::PlaceholderApi;
pub use client::FetchClient;
pub use error::FetchError;
pub use options::{FetchOptions, FetchRequest};
pub use types::{Company, Post, User};

pub type Result<T> = std::result::Result<T, FetchError>;
