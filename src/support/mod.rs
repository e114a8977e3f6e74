// Local support modules: overlay handling, JSON parsing, logging setup

mod blocker;
mod json;
mod logging;

pub use blocker::{DisplayStyle, Document, MemoryDocument, SiteBlocker};
pub use json::{parse_json, parse_json_safe};
pub use logging::init_tracing;
