//! Scripted transport for exercising the engine without a network

use std::sync::{Arc, Mutex};

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::Notify;

use super::{HttpRequest, HttpTransport, ReadyState, StateNotifier};
use crate::error::{Error, Result};

/// What the scripted exchange answers with
#[derive(Debug, Clone)]
pub enum Reply {
    /// Report headers and one body chunk, then return the body
    Body(String),
    /// Fail before any response arrives
    Fail(String),
}

#[derive(Clone)]
pub struct ScriptedTransport {
    reply:    Reply,
    gate:     Option<Arc<Notify>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl ScriptedTransport {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            gate: None,
            requests: Arc::default(),
        }
    }

    /// A transport holding every reply back until the returned gate is notified
    pub fn gated(reply: Reply) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let transport = Self {
            gate: Some(Arc::clone(&gate)),
            ..Self::new(reply)
        };
        (transport, gate)
    }

    /// Requests seen so far
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl HttpTransport for ScriptedTransport {
    fn exchange(
        &self,
        request: HttpRequest,
        notify: StateNotifier,
    ) -> BoxFuture<'static, Result<String>> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        let reply = self.reply.clone();
        let gate = self.gate.clone();

        async move {
            if let Some(gate) = gate {
                gate.notified().await;
            }
            match reply {
                Reply::Body(body) => {
                    notify(ReadyState::HeadersReceived);
                    notify(ReadyState::Loading);
                    Ok(body)
                }
                Reply::Fail(reason) => Err(Error::Transport(reason)),
            }
        }
        .boxed()
    }
}
