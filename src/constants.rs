// This file contains constants shared by the client, its transport and the handlers
// Constants that only matter to a single module live next to that module

// Endpoint constants
/// Path of the CGI endpoint every request targets
pub const CGI_ENDPOINT: &str = "/cgi-bin/service";
/// Base URL used when none is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

// Document constants
/// Id of the overlay element that blocks user interaction
pub const BLOCKER_ELEMENT_ID: &str = "blocker";

// Request encoding constants
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
pub const FORM_FIELD_SEPARATOR: char = '&';
pub const FORM_KEY_VALUE_SEPARATOR: char = '=';

// CGI parameter constants
pub const PARAM_CGI: &str = "cgi";
pub const CGI_DO_NOTHING: &str = "do-nothing";

// HTTP client constants
pub const HTTP_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const HTTP_POOL_IDLE_TIMEOUT_SECS: u64 = 30;
pub const HTTP_POOL_MAX_IDLE_PER_HOST: usize = 10;

// Log messages
pub const MSG_SERVICE_SUCCEEDED: &str = "Service responded successfully.";
pub const MSG_NO_OP_FAILED: &str = "No-op failed";
pub const MSG_NO_REASON: &str = "no reason given";
