//! HTTP client for an OmniPath legacy web service.
//!
//! [`HttpQueryService`] implements [`omniprobe_core::QueryService`] over
//! `reqwest`. Response bodies are decoded by [`decode`] into
//! [`omniprobe_core::QueryOutput`] values.

pub mod decode;
pub mod http;

pub use http::HttpQueryService;
