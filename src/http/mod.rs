//! HTTP client layer — `OracleHttp` with per-endpoint retry policies.

pub mod client;
pub mod retry;

pub use client::OracleHttp;
pub use retry::{RetryConfig, RetryPolicy};
