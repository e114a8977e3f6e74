//! Runs the no-op action once against a running service
//!
//! Usage: `service-client [BASE_URL]`, logging filtered by `RUST_LOG`.

use std::error::Error;
use std::sync::Arc;

use service_client::{
    Ajax, BLOCKER_ELEMENT_ID, DEFAULT_BASE_URL, DisplayStyle, Handler, MemoryDocument,
    ReqwestTransport, ServiceConfig, SiteBlocker, init_tracing,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let base_url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let config = ServiceConfig::new(&base_url)?;
    info!("Sending no-op to {}", config.cgi_url());

    // Headless run: the overlay lives in an in-memory document
    let document = Arc::new(MemoryDocument::with_element(
        BLOCKER_ELEMENT_ID,
        DisplayStyle::Hidden,
    ));
    let ajax = Ajax::new(
        Arc::new(ReqwestTransport::new()),
        SiteBlocker::new(document),
    );

    Handler::new(config, ajax).no_op().await;
    Ok(())
}
