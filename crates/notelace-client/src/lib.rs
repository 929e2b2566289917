//! # notelace-client
//!
//! Transport boundary for the notelace engine: the [`NotebookApi`] trait
//! every engine component consumes, the reqwest-backed [`HttpApi`], and a
//! deterministic [`MockApi`] for tests.
//!
//! All response parsing happens here. A 2xx body that fails strict
//! deserialization is classified as `MalformedResponse` at this boundary;
//! nothing downstream ever sees a partially-parsed payload.

pub mod api;
pub mod config;
pub mod http;
pub mod mock;

pub use api::NotebookApi;
pub use config::ClientConfig;
pub use http::HttpApi;
pub use mock::MockApi;
