// Transport layer: the request engine and the HTTP primitives it drives

mod ajax;
mod http_client;
#[cfg(test)]
pub(crate) mod testing;

pub use ajax::{Ajax, HttpRequest, HttpTransport, PendingResponse, ReadyState, StateNotifier};
pub use http_client::ReqwestTransport;
