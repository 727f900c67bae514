//! Authentication module
//!
//! - `state`: signed single-use OAuth state tokens (CSRF/replay guard)
//! - `session`: session store behind the session_id cookie
//! - `oauth`: Google authorization-code flow
//! - `middleware`: CurrentUser extractor
//! - `cookies`: cookie construction and the Secure heuristic

pub mod cookies;
pub mod middleware;
pub mod oauth;
pub mod session;
pub mod state;

pub use middleware::CurrentUser;
pub use oauth::oauth_router;
pub use session::{InMemorySessionStore, SessionStore};
pub use state::{InMemoryReplayLedger, ReplayLedger, StateProtocol, StateRejection};
