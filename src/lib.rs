//! Async client helper for a form-encoded CGI service endpoint
//!
//! The pieces compose leaves first:
//! - [`ServiceConfig`] fixes the endpoint every request targets
//! - [`SiteBlocker`] toggles the `blocker` overlay of a [`Document`], and
//!   [`parse_json_safe`] turns untrusted bodies into JSON or nothing
//! - [`FormRequest`] encodes ordered key-value pairs as a form body
//! - [`Ajax`] sends requests through an [`HttpTransport`] and resolves each
//!   one exactly once with its response body
//! - [`Handler`] implements the user facing actions on top of them

mod config;
mod constants;
mod error;
mod handler;
mod request;
mod support;
mod transport;

pub use config::ServiceConfig;
pub use constants::{BLOCKER_ELEMENT_ID, CGI_ENDPOINT, DEFAULT_BASE_URL};
pub use error::{Error, Result};
pub use handler::{Handler, ServiceOutcome, evaluate_response};
pub use request::{FormRequest, KeyValuePair};
pub use support::{
    DisplayStyle, Document, MemoryDocument, SiteBlocker, init_tracing, parse_json,
    parse_json_safe,
};
pub use transport::{
    Ajax, HttpRequest, HttpTransport, PendingResponse, ReadyState, ReqwestTransport,
    StateNotifier,
};
