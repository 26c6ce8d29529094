//! Outbound HTTP layer shared by every remote API call.
//!
//! - `executor`: a single request/response exchange behind the
//!   [`HttpExecutor`] trait, with a `reqwest` implementation
//! - `retry`: the [`RetryPolicy`] value and [`ResilientTransport`], which
//!   bounds each attempt with a deadline and retries transport failures
//!
//! A received HTTP response of any status ends the retry loop. Only failures
//! that prevent a response from arriving are retried.

mod error;
mod executor;
mod retry;

pub use error::HttpClientError;
pub use executor::{HttpExecutor, HttpRequest, HttpResponse, ReqwestExecutor};
pub use retry::{ResilientTransport, RetryPolicy};
