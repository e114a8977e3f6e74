//! User interaction handlers
//!
//! Each handler action builds a form request, sends it through the injected
//! [`Ajax`] engine and reports the service's `Success`/`Reason` envelope in
//! the log. Nothing is returned to the caller.

use reqwest::Method;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::ServiceConfig;
use crate::constants::{
    CGI_DO_NOTHING, MSG_NO_OP_FAILED, MSG_NO_REASON, MSG_SERVICE_SUCCEEDED, PARAM_CGI,
};
use crate::request::FormRequest;
use crate::support::parse_json_safe;
use crate::transport::Ajax;

/// Application level result carried by a response envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceOutcome {
    /// `Success` was exactly `true`
    Succeeded,
    /// `Success` was anything else
    Failed {
        /// Server supplied `Reason` as text, `None` when the field is absent
        reason: Option<String>,
    },
}

/// Response envelope produced by the service
#[derive(Debug, Default, Deserialize)]
struct WebResponse {
    #[serde(rename = "Success", default)]
    success: Value,
    // Present-but-null stays `Some(Value::Null)`, only a missing field is `None`
    #[serde(rename = "Reason", default, deserialize_with = "present")]
    reason:  Option<Value>,
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl WebResponse {
    fn into_outcome(self) -> ServiceOutcome {
        if self.success == Value::Bool(true) {
            return ServiceOutcome::Succeeded;
        }

        let reason = self.reason.map(|reason| match reason {
            Value::String(reason) => reason,
            other => other.to_string(),
        });
        ServiceOutcome::Failed { reason }
    }
}

/// Interpret a raw response body
///
/// Returns `None` when the body is not JSON (or is JSON `null`). Any other JSON
/// value is judged by its `Success` field; values that are not objects have no
/// such field and count as failures.
#[must_use]
pub fn evaluate_response(text: &str) -> Option<ServiceOutcome> {
    let value = parse_json_safe(text)?;

    match value {
        Value::Null => None,
        Value::Object(_) => Some(
            serde_json::from_value::<WebResponse>(value)
                .unwrap_or_default()
                .into_outcome(),
        ),
        _ => Some(WebResponse::default().into_outcome()),
    }
}

/// Handlers for user interaction
#[derive(Debug, Clone)]
pub struct Handler {
    config: ServiceConfig,
    ajax:   Ajax,
}

impl Handler {
    /// Create a handler sending to `config`'s endpoint through `ajax`
    pub const fn new(config: ServiceConfig, ajax: Ajax) -> Self {
        Self { config, ajax }
    }

    /// The configuration requests are sent with
    #[must_use]
    pub const fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Perform a no-op on the server
    ///
    /// Blocks the site while the request is in flight and logs whether the
    /// service reported success. Unparseable responses are ignored.
    pub async fn no_op(&self) {
        let mut request = FormRequest::new();
        request.append(PARAM_CGI, CGI_DO_NOTHING);

        let response = self
            .ajax
            .request(Method::POST, &self.config.cgi_url(), request.data(), true)
            .await;

        match evaluate_response(&response) {
            Some(ServiceOutcome::Succeeded) => info!("{}", MSG_SERVICE_SUCCEEDED),
            Some(ServiceOutcome::Failed { reason }) => warn!(
                "{}: {}",
                MSG_NO_OP_FAILED,
                reason.as_deref().unwrap_or(MSG_NO_REASON)
            ),
            None => debug!("Ignoring no-op response that is not JSON"),
        }
    }
}
