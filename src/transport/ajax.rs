//! Asynchronous request engine
//!
//! [`Ajax::request`] hands an exchange to an [`HttpTransport`] on the Tokio
//! runtime and returns at once. The [`PendingResponse`] it returns resolves
//! exactly once, with the raw response body, after the exchange is done.
//!
//! When blocking is requested the site overlay is shown on every ready state
//! change, intermediate ones included, and hidden once the exchange completes.
//! Overlapping blocking requests are not serialized, so the overlay ends up in
//! whatever state the last completion leaves it.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::future::BoxFuture;
use reqwest::Method;
use tokio::sync::oneshot;
use tracing::{Instrument, debug, info_span, warn};
use uuid::Uuid;

use crate::constants::FORM_CONTENT_TYPE;
use crate::error::Result;
use crate::support::SiteBlocker;

/// Progress of a single exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReadyState {
    /// Not started
    Unsent,
    /// Request opened, not yet sent
    Opened,
    /// Response status and headers received
    HeadersReceived,
    /// A chunk of the response body arrived
    Loading,
    /// The exchange completed, successfully or not
    Done,
}

impl ReadyState {
    /// Numeric code of the state, `4` meaning done
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Unsent => 0,
            Self::Opened => 1,
            Self::HeadersReceived => 2,
            Self::Loading => 3,
            Self::Done => 4,
        }
    }

    /// Whether the exchange has completed
    #[must_use]
    pub const fn is_done(self) -> bool {
        matches!(self, Self::Done)
    }
}

/// A request as handed to the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// HTTP method
    pub method:       Method,
    /// Absolute target URL
    pub url:          String,
    /// Value of the `Content-Type` header
    pub content_type: &'static str,
    /// Request payload
    pub body:         String,
}

/// Callback receiving every ready state change of an exchange
pub type StateNotifier = Arc<dyn Fn(ReadyState) + Send + Sync>;

/// Asynchronous HTTP primitive used by [`Ajax`]
pub trait HttpTransport: Send + Sync {
    /// Perform one exchange and return the response body
    ///
    /// Implementations report `HeadersReceived` and `Loading` through
    /// `notify`. `Opened` and `Done` are reported by the engine. The body is
    /// returned whatever the HTTP status; an error means no body could be read.
    fn exchange(
        &self,
        request: HttpRequest,
        notify: StateNotifier,
    ) -> BoxFuture<'static, Result<String>>;
}

/// Request engine
#[derive(Clone)]
pub struct Ajax {
    transport: Arc<dyn HttpTransport>,
    blocker:   SiteBlocker,
}

impl Ajax {
    /// Create an engine sending through `transport` and toggling `blocker`
    pub fn new(transport: Arc<dyn HttpTransport>, blocker: SiteBlocker) -> Self {
        Self { transport, blocker }
    }

    /// Send a form encoded request
    ///
    /// Returns immediately. Await the returned [`PendingResponse`] for the
    /// response body, or drop it to discard the response. Must be called from
    /// within a Tokio runtime.
    pub fn request(
        &self,
        method: Method,
        url: &str,
        body: impl Into<String>,
        block: bool,
    ) -> PendingResponse {
        let request_id = Uuid::new_v4();
        let span = info_span!("ajax", %request_id, %method, url);
        let (sender, receiver) = oneshot::channel();

        let notify: StateNotifier = {
            let blocker = self.blocker.clone();
            Arc::new(move |state: ReadyState| {
                debug!("Ready state changed to {:?} ({})", state, state.code());
                blocker.set_blocked(block);
            })
        };

        let request = HttpRequest {
            method,
            url: url.to_string(),
            content_type: FORM_CONTENT_TYPE,
            body: body.into(),
        };

        span.in_scope(|| {
            debug!("Sending {} byte body", request.body.len());
            notify(ReadyState::Opened);
        });

        let exchange = self.transport.exchange(request, Arc::clone(&notify));
        let blocker = self.blocker.clone();

        tokio::spawn(
            async move {
                let content = match exchange.await {
                    Ok(content) => content,
                    Err(e) => {
                        warn!("Request failed, delivering empty response: {}", e);
                        String::new()
                    }
                };

                notify(ReadyState::Done);
                if block {
                    blocker.set_blocked(false);
                }

                if sender.send(content).is_err() {
                    debug!("Response discarded, nobody is waiting for it");
                }
            }
            .instrument(span),
        );

        PendingResponse { receiver }
    }
}

impl fmt::Debug for Ajax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ajax")
            .field("blocker", &self.blocker)
            .finish_non_exhaustive()
    }
}

/// Response body of an exchange still in flight
///
/// Resolves once, after the exchange is done. If the exchange task dies
/// without answering the body resolves empty.
#[derive(Debug)]
pub struct PendingResponse {
    receiver: oneshot::Receiver<String>,
}

impl PendingResponse {
    /// Deliver the response body to `callback` once the exchange completes
    pub fn on_complete<F>(self, callback: F)
    where
        F: FnOnce(String) + Send + 'static,
    {
        tokio::spawn(async move { callback(self.await) });
    }
}

impl Future for PendingResponse {
    type Output = String;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|result| result.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use std::time::Duration;

    use super::*;
    use crate::constants::BLOCKER_ELEMENT_ID;
    use crate::support::{DisplayStyle, MemoryDocument};
    use crate::transport::testing::{Reply, ScriptedTransport};

    const URL: &str = "http://localhost:8080/cgi-bin/service";

    fn engine(transport: &ScriptedTransport) -> (Ajax, Arc<MemoryDocument>) {
        let document = Arc::new(MemoryDocument::with_element(
            BLOCKER_ELEMENT_ID,
            DisplayStyle::Hidden,
        ));
        let ajax = Ajax::new(
            Arc::new(transport.clone()),
            SiteBlocker::new(document.clone()),
        );
        (ajax, document)
    }

    #[tokio::test]
    async fn test_request_sends_form_body() {
        let transport = ScriptedTransport::new(Reply::Body(r#"{"Success":true}"#.to_string()));
        let (ajax, _document) = engine(&transport);

        let content = ajax.request(Method::POST, URL, "cgi=do-nothing", false).await;

        assert_eq!(content, r#"{"Success":true}"#);
        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(requests[0].url, URL);
        assert_eq!(requests[0].content_type, "application/x-www-form-urlencoded");
        assert_eq!(requests[0].body, "cgi=do-nothing");
    }

    #[tokio::test]
    async fn test_blocking_request_shows_overlay_on_every_state_change() {
        let transport = ScriptedTransport::new(Reply::Body("{}".to_string()));
        let (ajax, document) = engine(&transport);

        let _ = ajax.request(Method::POST, URL, "", true).await;

        // Opened, HeadersReceived, Loading and Done, then the final unblock
        assert_eq!(
            document.history_of(BLOCKER_ELEMENT_ID),
            vec![
                DisplayStyle::Block,
                DisplayStyle::Block,
                DisplayStyle::Block,
                DisplayStyle::Block,
                DisplayStyle::Hidden,
            ]
        );
        assert_eq!(
            document.display_of(BLOCKER_ELEMENT_ID),
            Some(DisplayStyle::Hidden)
        );
    }

    #[tokio::test]
    async fn test_non_blocking_request_never_shows_overlay() {
        let transport = ScriptedTransport::new(Reply::Body("{}".to_string()));
        let (ajax, document) = engine(&transport);

        let _ = ajax.request(Method::GET, URL, "", false).await;

        let history = document.history_of(BLOCKER_ELEMENT_ID);
        assert!(!history.is_empty());
        assert!(history.iter().all(|style| *style == DisplayStyle::Hidden));
    }

    #[tokio::test]
    async fn test_request_returns_before_completion() {
        let (transport, gate) = ScriptedTransport::gated(Reply::Body("late".to_string()));
        let (ajax, document) = engine(&transport);

        let mut pending = ajax.request(Method::POST, URL, "", true);

        // Opened fires synchronously, the response is held back by the gate
        assert_eq!(
            document.display_of(BLOCKER_ELEMENT_ID),
            Some(DisplayStyle::Block)
        );
        let early = tokio::time::timeout(Duration::from_millis(20), &mut pending).await;
        assert!(early.is_err());
        assert_eq!(
            document.display_of(BLOCKER_ELEMENT_ID),
            Some(DisplayStyle::Block)
        );

        gate.notify_one();
        assert_eq!(pending.await, "late");
        assert_eq!(
            document.display_of(BLOCKER_ELEMENT_ID),
            Some(DisplayStyle::Hidden)
        );
    }

    #[tokio::test]
    async fn test_transport_failure_delivers_empty_body() {
        let transport = ScriptedTransport::new(Reply::Fail("connection refused".to_string()));
        let (ajax, document) = engine(&transport);

        let content = ajax.request(Method::POST, URL, "cgi=do-nothing", true).await;

        assert_eq!(content, "");
        assert_eq!(
            document.display_of(BLOCKER_ELEMENT_ID),
            Some(DisplayStyle::Hidden)
        );
    }

    #[tokio::test]
    async fn test_on_complete_runs_once() {
        let transport = ScriptedTransport::new(Reply::Body("done".to_string()));
        let (ajax, _document) = engine(&transport);
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        ajax.request(Method::POST, URL, "", false)
            .on_complete(move |content| tx.send(content).unwrap());

        assert_eq!(rx.recv().await.as_deref(), Some("done"));
        // The sender is dropped with the callback, so the channel closes
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_dropped_response_still_unblocks() {
        let (transport, gate) = ScriptedTransport::gated(Reply::Body("ignored".to_string()));
        let (ajax, document) = engine(&transport);

        drop(ajax.request(Method::POST, URL, "", true));
        gate.notify_one();

        for _ in 0..100 {
            if document.display_of(BLOCKER_ELEMENT_ID) == Some(DisplayStyle::Hidden) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("overlay still shown after the exchange completed");
    }

    #[test]
    fn test_ready_state_codes() {
        assert_eq!(ReadyState::Unsent.code(), 0);
        assert_eq!(ReadyState::Done.code(), 4);
        assert!(ReadyState::Done.is_done());
        assert!(!ReadyState::Loading.is_done());
        assert!(ReadyState::Loading < ReadyState::Done);
    }
}
